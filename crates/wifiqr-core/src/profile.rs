//! Apple configuration profile (`.mobileconfig`) generation

use crate::error::{Result, WifiQrError};
use crate::escape::xml_escape;
use crate::model::NetworkRecord;
use crate::security::{expand, Target};
use tracing::debug;
use uuid::Uuid;

const IDENTIFIER_PREFIX: &str = "com.wifiqr.profile";
const DISPLAY_NAME: &str = "WifiQR Wi-Fi";
const ORGANIZATION: &str = "WifiQR";

/// A generated configuration profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileExport {
    /// Top-level `PayloadIdentifier`, unique per export
    pub identifier: String,
    pub content: String,
}

/// Build one profile carrying a Wi-Fi payload per record, in order
///
/// Identifiers are generated on every call; two exports of the same records
/// never share a UUID.
pub fn generate(records: &[NetworkRecord]) -> Result<ProfileExport> {
    if records.is_empty() {
        return Err(WifiQrError::Validation("No networks provided".to_string()));
    }
    for record in records {
        record.validate()?;
    }

    let profile_uuid = new_uuid();
    let identifier = format!("{}.{}", IDENTIFIER_PREFIX, profile_uuid);

    let mut out = PlistWriter::new();
    out.line(0, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.line(
        0,
        r#"<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#,
    );
    out.line(0, r#"<plist version="1.0">"#);
    out.line(0, "<dict>");
    out.key(1, "PayloadContent");
    out.line(1, "<array>");
    for record in records {
        let wifi_uuid = new_uuid();
        wifi_payload(
            &mut out,
            record,
            &format!("{}.wifi.{}", identifier, wifi_uuid),
            &wifi_uuid,
        );
    }
    out.line(1, "</array>");
    out.string(1, "PayloadType", "Configuration");
    out.integer(1, "PayloadVersion", 1);
    out.string(1, "PayloadIdentifier", &identifier);
    out.string(1, "PayloadUUID", &profile_uuid);
    out.string(1, "PayloadDisplayName", DISPLAY_NAME);
    out.string(1, "PayloadOrganization", ORGANIZATION);
    out.boolean(1, "PayloadRemovalDisallowed", false);
    out.line(0, "</dict>");
    out.line(0, "</plist>");

    let content = out.finish();
    debug!(networks = records.len(), identifier = %identifier, "Generated configuration profile");
    Ok(ProfileExport { identifier, content })
}

fn wifi_payload(out: &mut PlistWriter, record: &NetworkRecord, identifier: &str, uuid: &str) {
    let ssid = xml_escape(&record.ssid);

    out.line(2, "<dict>");
    out.string(3, "PayloadType", "com.apple.wifi.managed");
    out.integer(3, "PayloadVersion", 1);
    out.string(3, "PayloadIdentifier", identifier);
    out.string(3, "PayloadUUID", uuid);
    out.string(3, "PayloadDisplayName", &format!("WiFi {}", ssid));
    let location = record.location.trim();
    if !location.is_empty() {
        out.string(3, "PayloadDescription", &xml_escape(location));
    }
    out.string(3, "SSID_STR", &ssid);
    out.boolean(3, "HIDDEN_NETWORK", record.hidden);
    out.boolean(3, "AutoJoin", true);
    out.string(3, "EncryptionType", expand(record.security, Target::Profile));
    if !record.security.is_open() {
        out.string(3, "Password", &xml_escape(&record.password));
    }
    out.line(2, "</dict>");
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

/// Tab-indented plist text; values passed in must already be escaped
struct PlistWriter {
    buf: String,
}

impl PlistWriter {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.buf.push('\t');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn key(&mut self, depth: usize, key: &str) {
        self.line(depth, &format!("<key>{}</key>", key));
    }

    fn string(&mut self, depth: usize, key: &str, value: &str) {
        self.key(depth, key);
        self.line(depth, &format!("<string>{}</string>", value));
    }

    fn integer(&mut self, depth: usize, key: &str, value: i64) {
        self.key(depth, key);
        self.line(depth, &format!("<integer>{}</integer>", value));
    }

    fn boolean(&mut self, depth: usize, key: &str, value: bool) {
        self.key(depth, key);
        self.line(depth, if value { "<true/>" } else { "<false/>" });
    }

    fn finish(self) -> String {
        self.buf
    }
}
