// ============================
// crates/backend-lib/src/redact.rs
// ============================
//! Obfuscation of personal data in log lines.
use regex::{NoExpand, Regex};

/// Fields never written to the logs verbatim
pub const PII_FIELDS: [&str; 2] = ["email", "password"];

/// Placeholder substituted for redacted values
pub const REDACTION: &str = "***";

/// Replace the value of every `field=value` pair in `message` with `redaction`.
///
/// A value runs until the next `separator` (or the end of the message).
pub fn filter_datum(fields: &[&str], redaction: &str, message: &str, separator: &str) -> String {
    let stop = if separator.is_empty() {
        String::new()
    } else {
        regex::escape(separator)
    };

    fields.iter().fold(message.to_owned(), |message, field| {
        let pattern = if stop.is_empty() {
            format!("{}=.*", regex::escape(field))
        } else {
            format!("{}=(?:[^{}])*", regex::escape(field), stop)
        };
        match Regex::new(&pattern) {
            Ok(re) => {
                let replacement = format!("{field}={redaction}");
                re.replace_all(&message, NoExpand(&replacement)).into_owned()
            },
            Err(_) => message,
        }
    })
}

/// Redact [`PII_FIELDS`] in a `;`-separated log line
pub fn redact_pii(message: &str) -> String {
    filter_datum(&PII_FIELDS, REDACTION, message, ";")
}
