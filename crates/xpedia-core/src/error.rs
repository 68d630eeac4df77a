/// Errors that abort a ruleset load. Everything recoverable (missing keys,
/// dangling references, undecodable entity records) is logged and skipped
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum RulesetError {
    /// A section that must hold a sequence of records holds something else.
    #[error("section '{section}' must be {expected}, found {found}")]
    SectionShape {
        section: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Short name of a JSON value's shape, for diagnostics.
pub(crate) fn shape_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a mapping",
    }
}
