//! Send synthetic frames to an ingest server.
//!
//! `ingestctl send http://localhost:3000 flow-board dev-flow-001 <secret> MB-SN-FLOW-001`

use std::time::Duration;

use anyhow::Result;
use serde_json::{Map, Value};

use ingest::sign;

use crate::board;

pub struct SendArgs<'a> {
    pub base: &'a str,
    pub board: &'a str,
    pub device_id: &'a str,
    pub secret: &'a str,
    pub hardware_sn: &'a str,
    pub path: &'a str,
    pub period_secs: Option<u64>,
}

/// A frame ready to POST: exact body bytes plus its auth headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFrame {
    pub body: String,
    pub timestamp: String,
    pub signature: String,
}

/// Serialize a frame once and sign the resulting bytes.
pub fn signed_frame(
    secret: &str,
    hardware_sn: &str,
    observed_at: &str,
    data: Map<String, Value>,
    timestamp_ms: i64,
) -> Result<SignedFrame> {
    let body = serde_json::to_string(&serde_json::json!({
        "schemaVersion": 1,
        "hardwareSN": hardware_sn,
        "observedAt": observed_at,
        "data": data,
    }))?;
    let timestamp = timestamp_ms.to_string();
    let signature = sign::expected_tag(secret.as_bytes(), &timestamp, body.as_bytes())?;
    Ok(SignedFrame {
        body,
        timestamp,
        signature,
    })
}

/// Send once, or forever every `period_secs` seconds.
pub fn send(args: &SendArgs<'_>) -> Result<()> {
    let fields = board::profile(args.board).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown board type: {}\nValid: {}",
            args.board,
            board::BOARDS.join(", ")
        )
    })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let url = format!("{}{}", args.base.trim_end_matches('/'), args.path);

    match args.period_secs {
        Some(secs) if secs > 0 => {
            println!(
                "Start periodic sending every {}s, board={}, device={}",
                secs, args.board, args.device_id
            );
            loop {
                // Transient failures are reported, not fatal.
                if let Err(e) = send_once(&client, &url, args, fields) {
                    eprintln!("[{}] ERROR {}", chrono::Utc::now().to_rfc3339(), e);
                }
                std::thread::sleep(Duration::from_secs(secs));
            }
        }
        _ => send_once(&client, &url, args, fields),
    }
}

fn send_once(
    client: &reqwest::blocking::Client,
    url: &str,
    args: &SendArgs<'_>,
    fields: &[board::FieldProfile],
) -> Result<()> {
    let now = chrono::Utc::now();
    let data = board::build_data(fields, &mut rand::thread_rng());
    let frame = signed_frame(
        args.secret,
        args.hardware_sn,
        &now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        data,
        now.timestamp_millis(),
    )?;

    let resp = client
        .post(url)
        .header("Content-Type", "application/json")
        .header("X-Device-ID", args.device_id)
        .header("X-Timestamp", &frame.timestamp)
        .header("X-Device-Sign", &frame.signature)
        .body(frame.body)
        .send()
        .map_err(|e| anyhow::anyhow!("failed to connect to server: {}", e))?;

    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    println!("[{}] STATUS {}", chrono::Utc::now().to_rfc3339(), status.as_u16());
    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}
