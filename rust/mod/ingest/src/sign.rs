//! Request signatures.
//!
//! ```text
//! tag = base64( HMAC-SHA256( secret, "{timestamp}.{hex(sha256(body))}" ) )
//! ```
//!
//! `body` is the exact request payload and `timestamp` the exact
//! `X-Timestamp` header string. Devices and the server share this
//! module, so both sides compute the input the same way.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use ingest_core::ServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex SHA-256 of the raw body.
pub fn body_digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// The string fed to the HMAC.
pub fn signing_input(timestamp: &str, body: &[u8]) -> String {
    format!("{}.{}", timestamp, body_digest(body))
}

/// Compute the tag a correctly configured device would send.
pub fn expected_tag(secret: &[u8], timestamp: &str, body: &[u8]) -> Result<String, ServiceError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ServiceError::Internal(format!("invalid signing key: {}", e)))?;
    mac.update(signing_input(timestamp, body).as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check `provided` against the expected tag in constant time.
///
/// Unequal lengths are a plain mismatch.
pub fn verify(secret: &[u8], timestamp: &str, body: &[u8], provided: &str) -> bool {
    let Ok(expected) = expected_tag(secret, timestamp, body) else {
        return false;
    };
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"FLw_7nQm2Zt9bH6cJ4Vr";
    const TS: &str = "1757567400000";
    const BODY: &[u8] = br#"{"schemaVersion":1,"hardwareSN":"MB-SN-FLOW-001","observedAt":"2025-09-11T05:10:00.000Z","data":{"flow.rate.lpm":42.3}}"#;

    #[test]
    fn digest_of_empty_body() {
        assert_eq!(
            body_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn signing_input_joins_with_dot() {
        let input = signing_input("42", b"");
        assert_eq!(
            input,
            "42.e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn tag_is_padded_base64_of_32_bytes() {
        let tag = expected_tag(SECRET, TS, BODY).unwrap();
        assert_eq!(tag.len(), 44);
        assert!(tag.ends_with('='));
        let raw = base64::engine::general_purpose::STANDARD.decode(&tag).unwrap();
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn tag_matches_manual_hmac() {
        let mut mac = HmacSha256::new_from_slice(SECRET).unwrap();
        mac.update(format!("{}.{}", TS, body_digest(BODY)).as_bytes());
        let manual = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());
        assert_eq!(expected_tag(SECRET, TS, BODY).unwrap(), manual);
    }

    #[test]
    fn verify_accepts_own_tag() {
        let tag = expected_tag(SECRET, TS, BODY).unwrap();
        assert!(verify(SECRET, TS, BODY, &tag));
    }

    #[test]
    fn any_flipped_body_byte_fails() {
        let tag = expected_tag(SECRET, TS, BODY).unwrap();
        for i in 0..BODY.len() {
            let mut body = BODY.to_vec();
            body[i] ^= 0x01;
            assert!(!verify(SECRET, TS, &body, &tag), "body byte {} flipped", i);
        }
    }

    #[test]
    fn any_flipped_timestamp_byte_fails() {
        let tag = expected_tag(SECRET, TS, BODY).unwrap();
        for i in 0..TS.len() {
            let mut ts = TS.as_bytes().to_vec();
            ts[i] ^= 0x01;
            let ts = String::from_utf8(ts).unwrap();
            assert!(!verify(SECRET, &ts, BODY, &tag), "timestamp byte {} flipped", i);
        }
    }

    #[test]
    fn any_flipped_tag_byte_fails() {
        let tag = expected_tag(SECRET, TS, BODY).unwrap();
        for i in 0..tag.len() {
            let mut bad = tag.as_bytes().to_vec();
            bad[i] ^= 0x01;
            let bad = String::from_utf8(bad).unwrap();
            assert!(!verify(SECRET, TS, BODY, &bad), "tag byte {} flipped", i);
        }
    }

    #[test]
    fn wrong_secret_or_length_fails() {
        let tag = expected_tag(SECRET, TS, BODY).unwrap();
        assert!(!verify(b"VOLT_1_aBc123", TS, BODY, &tag));
        assert!(!verify(SECRET, TS, BODY, &tag[..43]));
        assert!(!verify(SECRET, TS, BODY, ""));
        assert!(!verify(SECRET, TS, BODY, &format!("{}A", tag)));
    }
}
