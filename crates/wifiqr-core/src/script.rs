//! Windows connect script generation
//!
//! The script writes one WLAN profile per network to `%TEMP%`, imports it with
//! `netsh wlan add profile`, removes the temp file, and finally connects to
//! the last network. It must be run as Administrator.

use crate::error::{Result, WifiQrError};
use crate::escape::{cmd_escape_echo, cmd_quote};
use crate::model::NetworkRecord;
use crate::wlan::profile_lines;
use tracing::debug;

const LINE_ENDING: &str = "\r\n";

/// A generated connect script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptExport {
    /// SSID the script connects to once all profiles are installed
    pub ssid: String,
    pub content: String,
}

/// Build a script installing every record, in the order given
///
/// A single-network script is a batch of one.
pub fn generate(records: &[NetworkRecord]) -> Result<ScriptExport> {
    let last = records
        .last()
        .ok_or_else(|| WifiQrError::Validation("No networks provided".to_string()))?;
    for record in records {
        record.validate()?;
    }

    let mut lines = vec!["@echo off".to_string(), "setlocal DisableDelayedExpansion".to_string()];

    for (idx, record) in records.iter().enumerate() {
        lines.extend(profile_block(idx + 1, record));
    }

    lines.push(format!("netsh wlan connect name=\"{}\"", cmd_quote(&last.ssid)));
    lines.push("endlocal".to_string());

    let mut content = lines.join(LINE_ENDING);
    content.push_str(LINE_ENDING);

    debug!(networks = records.len(), bytes = content.len(), "Generated connect script");
    Ok(ScriptExport {
        ssid: last.ssid.clone(),
        content,
    })
}

fn profile_block(number: usize, record: &NetworkRecord) -> Vec<String> {
    let location = record.location.trim();
    let header = if location.is_empty() {
        format!("rem [{}] {}", number, record.ssid)
    } else {
        format!("rem [{}] {} - {}", number, record.ssid, location)
    };

    let mut lines = vec![
        cmd_escape_echo(&header),
        format!("set \"PROFILE_PATH=%TEMP%\\wifi-profile-{}.xml\"", number),
        "> \"%PROFILE_PATH%\" (".to_string(),
    ];
    lines.extend(
        profile_lines(record)
            .iter()
            .map(|line| format!("echo {}", cmd_escape_echo(line))),
    );
    lines.push(")".to_string());
    lines.push("netsh wlan add profile filename=\"%PROFILE_PATH%\" user=all".to_string());
    lines.push("del /f /q \"%PROFILE_PATH%\"".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::SecurityMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_script() {
        let script = generate(&[NetworkRecord::new("HomeNet", "secret", SecurityMode::Wpa)]).unwrap();
        assert_eq!(script.ssid, "HomeNet");
        assert!(script.content.starts_with("@echo off\r\n"));
        assert!(script.content.ends_with("endlocal\r\n"));
        assert!(script.content.contains("echo ^<name^>HomeNet^</name^>"));
        assert!(script.content.contains("echo ^<authentication^>WPA2PSK^</authentication^>"));
        assert!(script.content.contains("echo ^<keyMaterial^>secret^</keyMaterial^>"));
        assert!(script.content.contains("netsh wlan add profile filename=\"%PROFILE_PATH%\" user=all"));
        assert!(script.content.contains("netsh wlan connect name=\"HomeNet\""));
    }

    #[test]
    fn test_open_network_has_no_key_material() {
        let script = generate(&[NetworkRecord::open("Cafe")]).unwrap();
        assert!(!script.content.contains("keyMaterial"));
        assert!(script.content.contains("^<encryption^>none^</encryption^>"));
    }

    #[test]
    fn test_batch_order_and_count() {
        let records = vec![
            NetworkRecord::open("First"),
            NetworkRecord::new("Second", "pw2", SecurityMode::Wep),
            NetworkRecord::new("First", "pw3", SecurityMode::Wpa),
        ];
        let script = generate(&records).unwrap();

        assert_eq!(script.content.matches("netsh wlan add profile").count(), 3);
        let first = script.content.find("wifi-profile-1.xml").unwrap();
        let second = script.content.find("wifi-profile-2.xml").unwrap();
        let third = script.content.find("wifi-profile-3.xml").unwrap();
        assert!(first < second && second < third);
        assert_eq!(script.ssid, "First");
        assert_eq!(script.content.matches("netsh wlan connect").count(), 1);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let record = NetworkRecord::new("Tom & \"Jerry\" 100%", "p&w%d", SecurityMode::Wpa)
            .with_location("Lab (2nd floor)");
        let script = generate(&[record]).unwrap();

        assert!(script
            .content
            .contains("echo ^<name^>Tom ^&amp; ^&quot;Jerry^&quot; 100%%^</name^>"));
        assert!(script.content.contains("^<keyMaterial^>p^&amp;w%%d^</keyMaterial^>"));
        assert!(script
            .content
            .contains("netsh wlan connect name=\"Tom & \"\"Jerry\"\" 100%%\""));
        assert!(script.content.contains("rem [1] Tom ^& "));
        assert!(script.content.contains("Lab ^(2nd floor^)"));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = generate(&[]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_line_breaks_cannot_start_new_commands() {
        let location = NetworkRecord::new("Net", "pw", SecurityMode::Wpa)
            .with_location("Lobby\r\ndel /q C:\\important\\*");
        let err = generate(&[location]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("location contains control character"));

        let password = NetworkRecord::new("Net", "pw\nshutdown /s", SecurityMode::Wpa);
        let err = generate(&[password]).unwrap_err();
        assert!(err.to_string().contains("password contains control character"));
    }

    #[test]
    fn test_every_line_is_a_known_statement() {
        let record = NetworkRecord::new("Net", "pw", SecurityMode::Wpa).with_location("Lobby");
        let script = generate(&[record]).unwrap();
        for line in script.content.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(
                ["@echo", "setlocal", "rem ", "set ", "> ", "echo ", ")", "netsh ", "del ", "endlocal"]
                    .iter()
                    .any(|prefix| line.starts_with(prefix)),
                "unexpected line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_invalid_record_rejected() {
        let err = generate(&[NetworkRecord::new("Net", "", SecurityMode::Wpa)]).unwrap_err();
        assert!(err.is_validation());
    }
}
