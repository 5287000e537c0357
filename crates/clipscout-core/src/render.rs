// crates/clipscout-core/src/render.rs
//
// Turn a raw /analyze response body into the text shown in the output card.
// The response is opaque to the client: any well-formed JSON value is
// accepted and re-serialized with 2-space indentation. No schema, no
// status-dependent shaping — a server-side error object prints like any
// other result.

use serde_json::Value;

/// Parse `body` as JSON and pretty-print it.
///
/// Returns `Err` when the body is not valid JSON; the caller surfaces that
/// as a failed submission rather than rendering garbage.
pub fn pretty_json(body: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    serde_json::to_string_pretty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_is_indented_two_spaces() {
        assert_eq!(
            pretty_json(r#"{"label":"cat"}"#).unwrap(),
            "{\n  \"label\": \"cat\"\n}"
        );
    }

    #[test]
    fn any_json_value_is_accepted() {
        assert_eq!(pretty_json("42").unwrap(), "42");
        assert_eq!(pretty_json("[1,2]").unwrap(), "[\n  1,\n  2\n]");
        assert_eq!(pretty_json("null").unwrap(), "null");
    }

    #[test]
    fn nested_values_keep_structure() {
        let out = pretty_json(r#"{"teams":["A","B"],"frames_analyzed":12}"#).unwrap();
        assert!(out.contains("\"teams\": [\n"));
        assert!(out.contains("\"frames_analyzed\": 12"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(pretty_json("<html>busy</html>").is_err());
        assert!(pretty_json("").is_err());
    }
}
