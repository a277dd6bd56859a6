//! JSON helpers for log output.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Renders a value as indented JSON for debug logs.
///
/// Uses a one-space indent and keeps non-ASCII text as is. Values that
/// fail to serialize are rendered as a placeholder instead of an error.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
    if value.serialize(&mut serializer).is_err() {
        return "<unserializable>".to_string();
    }
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
