//! Escaping grammars for the three output formats
//!
//! Each output has its own metacharacters, so each gets its own function.
//! The same SSID may legitimately come out differently in all three.

/// Characters that must be backslash-escaped inside a Wi-Fi QR field
pub const QR_SPECIAL: [char; 5] = ['\\', ';', ',', '"', ':'];

/// Escape a value for the `S:` or `P:` field of a Wi-Fi QR payload
///
/// Every character in [`QR_SPECIAL`] gets a leading backslash; nothing else
/// changes.
pub fn qr_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if QR_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape XML text content (`& < > " '`)
pub fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a line of text for a `cmd.exe` `echo` or `rem` statement
///
/// Outside double quotes the batch metacharacters `^ & < > | ( )` are
/// caret-escaped. Inside quotes carets are literal, so only `%` is touched.
/// `%` is doubled everywhere because batch files expand it before parsing.
pub fn cmd_escape_echo(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                out.push(c);
            }
            '%' => out.push_str("%%"),
            '^' | '&' | '<' | '>' | '|' | '(' | ')' if !quoted => {
                out.push('^');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value placed between double quotes on a batch command line
///
/// Embedded quotes are doubled so the argument stays quoted; `%` is doubled
/// to survive variable expansion.
pub fn cmd_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '"' => out.push_str("\"\""),
            '%' => out.push_str("%%"),
            _ => out.push(c),
        }
    }
    out
}
