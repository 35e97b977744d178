//! JSON rendering for scenes and diagrams.

use crate::error::{Error, Result};
use crate::model::Diagram;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any value (usually a [`Scene`](super::Scene)) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            value
                .serialize(&mut ser)
                .map(|_| String::from_utf8_lossy(&buf).into_owned())
        }
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize the raw detection model.
pub fn to_diagram_json(diagram: &Diagram, format: JsonFormat) -> Result<String> {
    to_json(diagram, format)
}
