//! Security mode normalization and per-format vocabulary
//!
//! User-facing labels ("WPA2", "No Password", ...) are folded into one of three
//! canonical modes here, before any encoder sees them. Each output format then
//! asks [`expand`] for its own spelling of the mode, so the QR payload, the
//! connect script and the configuration profile all read from a single table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Canonical security mode of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecurityMode {
    /// No password
    Open,
    /// Legacy WEP key
    Wep,
    /// WPA, WPA2 or WPA3 personal
    #[default]
    Wpa,
}

impl SecurityMode {
    /// Labels offered to users, in display order
    pub const OPTIONS: [&'static str; 3] = ["WPA/WPA2/WPA3", "WEP", "None"];

    /// All modes
    pub const ALL: [SecurityMode; 3] = [SecurityMode::Open, SecurityMode::Wep, SecurityMode::Wpa];

    /// User-facing label
    pub fn label(self) -> &'static str {
        match self {
            SecurityMode::Wpa => Self::OPTIONS[0],
            SecurityMode::Wep => Self::OPTIONS[1],
            SecurityMode::Open => Self::OPTIONS[2],
        }
    }

    /// Whether a password is needed for this mode
    pub fn requires_password(self) -> bool {
        !matches!(self, SecurityMode::Open)
    }

    pub fn is_open(self) -> bool {
        matches!(self, SecurityMode::Open)
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SecurityMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(normalize(s))
    }
}

impl Serialize for SecurityMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SecurityMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(normalize(&label))
    }
}

/// Output format a mode is being spelled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `T:` field of the Wi-Fi QR payload
    QrPayload,
    /// Windows WLAN profile embedded in the connect script
    Script,
    /// Apple configuration profile `EncryptionType`
    Profile,
}

/// Authentication settings for a Windows WLAN profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSecurity {
    pub authentication: &'static str,
    pub encryption: &'static str,
    /// `None` means the profile carries no shared key block
    pub key_type: Option<&'static str>,
}

struct Vocabulary {
    mode: SecurityMode,
    qr: &'static str,
    script_token: &'static str,
    script: ScriptSecurity,
    profile: &'static str,
}

const VOCABULARY: [Vocabulary; 3] = [
    Vocabulary {
        mode: SecurityMode::Open,
        qr: "nopass",
        script_token: "open",
        script: ScriptSecurity {
            authentication: "open",
            encryption: "none",
            key_type: None,
        },
        profile: "None",
    },
    Vocabulary {
        mode: SecurityMode::Wep,
        qr: "WEP",
        script_token: "WEP",
        script: ScriptSecurity {
            authentication: "open",
            encryption: "WEP",
            key_type: Some("networkKey"),
        },
        profile: "WEP",
    },
    Vocabulary {
        mode: SecurityMode::Wpa,
        qr: "WPA",
        script_token: "WPA2PSK",
        script: ScriptSecurity {
            authentication: "WPA2PSK",
            encryption: "AES",
            key_type: Some("passPhrase"),
        },
        profile: "WPA",
    },
];

const ALIASES: [(&str, SecurityMode); 12] = [
    ("WPA", SecurityMode::Wpa),
    ("WPA2", SecurityMode::Wpa),
    ("WPA3", SecurityMode::Wpa),
    ("WPA/WPA2/WPA3", SecurityMode::Wpa),
    ("WPA2PSK", SecurityMode::Wpa),
    ("WEP", SecurityMode::Wep),
    ("NONE", SecurityMode::Open),
    ("OPEN", SecurityMode::Open),
    ("NO PASSWORD", SecurityMode::Open),
    ("NOPASS", SecurityMode::Open),
    ("NO-PASS", SecurityMode::Open),
    ("", SecurityMode::Open),
];

fn vocabulary(mode: SecurityMode) -> &'static Vocabulary {
    match mode {
        SecurityMode::Open => &VOCABULARY[0],
        SecurityMode::Wep => &VOCABULARY[1],
        SecurityMode::Wpa => &VOCABULARY[2],
    }
}

/// Result of normalizing a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub mode: SecurityMode,
    /// False when the label was unknown and fell back to [`SecurityMode::Open`]
    pub recognized: bool,
}

/// Normalize a label, reporting whether it was recognized
///
/// Unknown labels map to `Open` and are logged at warn level.
pub fn normalize_label(label: &str) -> Normalized {
    let key = label.trim().to_uppercase();
    match ALIASES.iter().find(|(alias, _)| *alias == key) {
        Some((_, mode)) => Normalized {
            mode: *mode,
            recognized: true,
        },
        None => {
            warn!(label = %label, "Unrecognized security label, treating network as open");
            Normalized {
                mode: SecurityMode::Open,
                recognized: false,
            }
        }
    }
}

/// Normalize a user-facing label into a canonical mode
pub fn normalize(label: &str) -> SecurityMode {
    normalize_label(label).mode
}

/// Spell a mode the way the given output format expects
pub fn expand(mode: SecurityMode, target: Target) -> &'static str {
    let entry = vocabulary(mode);
    debug_assert_eq!(entry.mode, mode);
    match target {
        Target::QrPayload => entry.qr,
        Target::Script => entry.script_token,
        Target::Profile => entry.profile,
    }
}

/// Full WLAN profile authentication settings for a mode
pub fn script_security(mode: SecurityMode) -> ScriptSecurity {
    vocabulary(mode).script
}
