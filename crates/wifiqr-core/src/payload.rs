//! Wi-Fi QR payload encoding
//!
//! Builds the `WIFI:T:<sec>;S:<ssid>;P:<password>;H:true;;` string that phone
//! cameras understand. [`encode`] is the only producer of payloads: preview,
//! PNG, PDF and print all go through it.

use crate::error::{Result, WifiQrError};
use crate::escape::qr_escape;
use crate::model::NetworkRecord;
use crate::security::{expand, normalize_label, SecurityMode, Target};
use tracing::debug;

const PREFIX: &str = "WIFI:";

/// Build the QR payload for a record
pub fn encode(record: &NetworkRecord) -> Result<String> {
    record.validate()?;

    let mut payload = String::from(PREFIX);
    payload.push_str("T:");
    payload.push_str(expand(record.security, Target::QrPayload));
    payload.push_str(";S:");
    payload.push_str(&qr_escape(&record.ssid));
    payload.push(';');

    if !record.security.is_open() {
        payload.push_str("P:");
        payload.push_str(&qr_escape(&record.password));
        payload.push(';');
    }

    if record.hidden {
        payload.push_str("H:true;");
    }

    payload.push(';');

    debug!(ssid = %record.ssid, len = payload.len(), "Encoded QR payload");
    Ok(payload)
}

/// Fields recovered from a payload string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub security: SecurityMode,
    pub ssid: String,
    /// `None` when the payload has no `P:` field
    pub password: Option<String>,
    pub hidden: bool,
}

/// Parse a payload produced by [`encode`] (or any conforming generator)
pub fn decode(payload: &str) -> Result<DecodedPayload> {
    let body = payload
        .strip_prefix(PREFIX)
        .ok_or_else(|| WifiQrError::Format(format!("Payload must start with '{}'", PREFIX)))?;

    let mut security = None;
    let mut ssid = None;
    let mut password = None;
    let mut hidden = false;

    for (key, value) in split_fields(body)? {
        match key.as_str() {
            "T" => {
                let normalized = normalize_label(&value);
                if !normalized.recognized {
                    return Err(WifiQrError::Format(format!(
                        "Unknown security type in payload: {}",
                        value
                    )));
                }
                security = Some(normalized.mode);
            }
            "S" => ssid = Some(value),
            "P" => password = Some(value),
            "H" => hidden = value.eq_ignore_ascii_case("true"),
            other => debug!(key = other, "Ignoring unknown payload field"),
        }
    }

    let ssid = ssid.ok_or_else(|| WifiQrError::Format("Payload has no S: field".to_string()))?;

    Ok(DecodedPayload {
        // A missing T: means an open network by convention
        security: security.unwrap_or(SecurityMode::Open),
        ssid,
        password,
        hidden,
    })
}

/// Split `K:v;K:v;;` into unescaped key/value pairs
fn split_fields(body: &str) -> Result<Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut chars = body.chars();
    let mut current = String::new();
    let mut key: Option<String> = None;
    let mut terminated = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or_else(|| {
                    WifiQrError::Format("Payload ends with a dangling escape".to_string())
                })?;
                current.push(escaped);
            }
            ':' if key.is_none() => {
                key = Some(std::mem::take(&mut current));
            }
            ';' => match key.take() {
                Some(k) => fields.push((k, std::mem::take(&mut current))),
                None if current.is_empty() => {
                    terminated = true;
                    break;
                }
                None => {
                    return Err(WifiQrError::Format(format!(
                        "Payload field '{}' has no key",
                        current
                    )))
                }
            },
            _ => current.push(c),
        }
    }

    if !terminated {
        return Err(WifiQrError::Format(
            "Payload is not terminated with ';;'".to_string(),
        ));
    }
    if chars.next().is_some() {
        return Err(WifiQrError::Format(
            "Unexpected data after payload terminator".to_string(),
        ));
    }

    Ok(fields)
}
