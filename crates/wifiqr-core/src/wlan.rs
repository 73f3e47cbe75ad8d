//! Windows WLAN profile XML

use crate::escape::xml_escape;
use crate::model::NetworkRecord;
use crate::security::script_security;

const WLAN_NAMESPACE: &str = "http://www.microsoft.com/networking/WLAN/profile/v1";

/// WLAN profile for one network, one XML element per line
///
/// `connectionMode` is always `auto` so Windows joins the network whenever it
/// is in range.
pub fn profile_lines(record: &NetworkRecord) -> Vec<String> {
    let security = script_security(record.security);
    let ssid = xml_escape(&record.ssid);
    let hidden = if record.hidden { "true" } else { "false" };

    let mut lines = vec![
        r#"<?xml version="1.0"?>"#.to_string(),
        format!(r#"<WLANProfile xmlns="{}">"#, WLAN_NAMESPACE),
        format!("<name>{}</name>", ssid),
        "<SSIDConfig>".to_string(),
        "<SSID>".to_string(),
        format!("<name>{}</name>", ssid),
        "</SSID>".to_string(),
        format!("<nonBroadcast>{}</nonBroadcast>", hidden),
        "</SSIDConfig>".to_string(),
        "<connectionType>ESS</connectionType>".to_string(),
        "<connectionMode>auto</connectionMode>".to_string(),
        "<MSM>".to_string(),
        "<security>".to_string(),
        "<authEncryption>".to_string(),
        format!("<authentication>{}</authentication>", security.authentication),
        format!("<encryption>{}</encryption>", security.encryption),
        "<useOneX>false</useOneX>".to_string(),
        "</authEncryption>".to_string(),
    ];

    if let Some(key_type) = security.key_type {
        lines.push("<sharedKey>".to_string());
        lines.push(format!("<keyType>{}</keyType>", key_type));
        lines.push("<protected>false</protected>".to_string());
        lines.push(format!(
            "<keyMaterial>{}</keyMaterial>",
            xml_escape(&record.password)
        ));
        lines.push("</sharedKey>".to_string());
    }

    lines.push("</security>".to_string());
    lines.push("</MSM>".to_string());
    lines.push("</WLANProfile>".to_string());
    lines
}

/// WLAN profile as a single XML document
pub fn profile_xml(record: &NetworkRecord) -> String {
    profile_lines(record).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::SecurityMode;

    #[test]
    fn test_wpa_profile() {
        let xml = profile_xml(&NetworkRecord::new("HomeNet", "secret", SecurityMode::Wpa));
        assert!(xml.contains("<name>HomeNet</name>"));
        assert!(xml.contains("<authentication>WPA2PSK</authentication>"));
        assert!(xml.contains("<encryption>AES</encryption>"));
        assert!(xml.contains("<keyType>passPhrase</keyType>"));
        assert!(xml.contains("<keyMaterial>secret</keyMaterial>"));
        assert!(xml.contains("<connectionMode>auto</connectionMode>"));
        assert!(xml.contains("<nonBroadcast>false</nonBroadcast>"));
    }

    #[test]
    fn test_wep_profile() {
        let xml = profile_xml(&NetworkRecord::new("Old", "abcde", SecurityMode::Wep).with_hidden(true));
        assert!(xml.contains("<authentication>open</authentication>"));
        assert!(xml.contains("<encryption>WEP</encryption>"));
        assert!(xml.contains("<keyType>networkKey</keyType>"));
        assert!(xml.contains("<nonBroadcast>true</nonBroadcast>"));
    }

    #[test]
    fn test_open_profile_has_no_key() {
        let xml = profile_xml(&NetworkRecord::open("Cafe"));
        assert!(xml.contains("<encryption>none</encryption>"));
        assert!(!xml.contains("sharedKey"));
        assert!(!xml.contains("keyMaterial"));
    }

    #[test]
    fn test_text_is_xml_escaped() {
        let xml = profile_xml(&NetworkRecord::new("A&B <5G>", "p<w>", SecurityMode::Wpa));
        assert!(xml.contains("<name>A&amp;B &lt;5G&gt;</name>"));
        assert!(xml.contains("<keyMaterial>p&lt;w&gt;</keyMaterial>"));
    }
}
