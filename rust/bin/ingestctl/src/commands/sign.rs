//! Print the auth headers for a body file, for use with curl.

use std::path::Path;

use anyhow::Result;

use ingest::sign;

pub fn sign_file(device_id: &str, secret: &str, timestamp_ms: Option<i64>, file: &Path) -> Result<()> {
    let body = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let timestamp = timestamp_ms
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
        .to_string();
    for line in header_lines(device_id, secret, &timestamp, &body)? {
        println!("{}", line);
    }
    Ok(())
}

fn header_lines(device_id: &str, secret: &str, timestamp: &str, body: &[u8]) -> Result<Vec<String>> {
    let signature = sign::expected_tag(secret.as_bytes(), timestamp, body)?;
    Ok(vec![
        format!("X-Device-ID: {}", device_id),
        format!("X-Timestamp: {}", timestamp),
        format!("X-Device-Sign: {}", signature),
        format!("# body sha256: {}", sign::body_digest(body)),
    ])
}
