use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ClassifyError;
use crate::models::{ClassificationResult, Scale};
use crate::schema::fields::{ResponseSchema, BRIEF_FIELD, SCALE_FIELD};

/// First fenced block, with or without a `json` language tag.
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?(.*?)```").expect("fence pattern compiles"));

impl ResponseSchema {
    /// Parse a model reply into a [`ClassificationResult`].
    ///
    /// Values are taken verbatim, with no coercion or range check: a `scale`
    /// of 7, `"4"`, `"high"` or `4.5` all come back as sent. Only text that
    /// is not a JSON object with every declared key fails, with
    /// [`ClassifyError::MalformedResponse`].
    pub fn parse(&self, raw: &str) -> Result<ClassificationResult, ClassifyError> {
        let object = self.extract_fields(raw)?;

        let scale = object
            .get(SCALE_FIELD)
            .ok_or_else(|| missing_key(SCALE_FIELD, raw))
            .map(read_scale)?;
        let brief = object
            .get(BRIEF_FIELD)
            .ok_or_else(|| missing_key(BRIEF_FIELD, raw))
            .map(read_brief)?;

        Ok(ClassificationResult::new(scale, brief))
    }

    /// Decode the reply as a JSON object and check that every declared field
    /// is present. Extra keys are kept but ignored by [`parse`](Self::parse).
    pub fn extract_fields(&self, raw: &str) -> Result<Map<String, Value>, ClassifyError> {
        let body = json_body(raw);

        let value: Value = serde_json::from_str(body).map_err(|e| {
            ClassifyError::MalformedResponse(format!("Got invalid JSON object. Error: {}", e))
        })?;

        let Value::Object(object) = value else {
            return Err(ClassifyError::MalformedResponse(format!(
                "Expected a JSON object, got: {}",
                body
            )));
        };

        for field in self.fields() {
            if !object.contains_key(field.name) {
                return Err(missing_key(field.name, raw));
            }
        }

        Ok(object)
    }
}

/// The contents of the first fenced block, or the whole text when there is none.
fn json_body(raw: &str) -> &str {
    FENCED_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str())
        .trim()
}

fn read_scale(value: &Value) -> Scale {
    match value {
        Value::Number(n) => n.as_i64().map_or_else(|| Scale::Other(n.to_string()), Scale::Score),
        Value::String(s) => Scale::Other(s.clone()),
        other => Scale::Other(other.to_string()),
    }
}

fn read_brief(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn missing_key(key: &str, raw: &str) -> ClassifyError {
    ClassifyError::MalformedResponse(format!(
        "Got invalid return object. Expected key `{}` to be present, but got {}",
        key, raw
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::ResponseField;

    fn schema() -> ResponseSchema {
        ResponseSchema::classification()
    }

    fn assert_malformed(raw: &str) {
        match schema().parse(raw) {
            Err(ClassifyError::MalformedResponse(_)) => {}
            other => panic!("expected MalformedResponse for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = "```json\n{\n\t\"scale\": \"5\",\n\t\"brief\": \"SCADA HMI runtime\"\n}\n```";
        let result = schema().parse(raw).unwrap();
        // quoted values stay quoted
        assert_eq!(result.scale(), &Scale::Other("5".to_string()));
        assert_eq!(result.brief(), "SCADA HMI runtime");
    }

    #[test]
    fn test_parse_bare_json() {
        let result = schema()
            .parse(r#"{"scale": 5, "brief": "SCADA HMI engineering software"}"#)
            .unwrap();
        assert_eq!(result.scale(), &Scale::Score(5));
        assert_eq!(result.brief(), "SCADA HMI engineering software");
    }

    #[test]
    fn test_parse_fence_surrounded_by_prose() {
        let raw = "\nSure, here it is:\n```\n{\"scale\": 0, \"brief\": \"Web browser\"}\n```\nHope it helps.";
        let result = schema().parse(raw).unwrap();
        assert_eq!(result.scale(), &Scale::Score(0));
        assert_eq!(result.brief(), "Web browser");
    }

    #[test]
    fn test_round_trip_from_format_instructions() {
        // Fill the schema skeleton from describe() with literal values.
        let instructions = schema().describe();
        let start = instructions.find("```json").unwrap();
        let skeleton = &instructions[start..];
        let filled = skeleton
            .replace(
                "\"scale\": string  // a confidence scale 0 to 5, higher scale means highly confident to be a OT/ICS software",
                "\"scale\": 3,",
            )
            .replace(
                "\"brief\": string  // a brief description of the software capability in 1 line",
                "\"brief\": \"Historian for plant data\"",
            );

        let result = schema().parse(&filled).unwrap();
        assert_eq!(result.scale(), &Scale::Score(3));
        assert_eq!(result.brief(), "Historian for plant data");
    }

    #[test]
    fn test_out_of_range_scale_passes_through() {
        let result = schema().parse(r#"{"scale": 7, "brief": ""}"#).unwrap();
        assert_eq!(result.scale(), &Scale::Score(7));
        assert_eq!(result.brief(), "");
    }

    #[test]
    fn test_extra_keys_ignored() {
        let result = schema()
            .parse(r#"{"scale": 1, "brief": "Office suite", "vendor": "x"}"#)
            .unwrap();
        assert_eq!(result.scale(), &Scale::Score(1));
    }

    #[test]
    fn test_non_string_brief_is_rendered() {
        let result = schema().parse(r#"{"scale": 2, "brief": 42}"#).unwrap();
        assert_eq!(result.brief(), "42");
    }

    #[test]
    fn test_free_text_is_malformed() {
        assert_malformed("I think it's OT software");
    }

    #[test]
    fn test_missing_key_is_malformed() {
        assert_malformed(r#"{"scale": 4}"#);
        assert_malformed(r#"{"brief": "PLC programming"}"#);
    }

    #[test]
    fn test_non_integer_scale_passes_through() {
        let cases = [
            (r#"{"scale": "high", "brief": "PLC programming"}"#, "high"),
            (r#"{"scale": 4.5, "brief": "PLC programming"}"#, "4.5"),
            (r#"{"scale": 5.0, "brief": "PLC programming"}"#, "5.0"),
            (r#"{"scale": null, "brief": "PLC programming"}"#, "null"),
        ];
        for (raw, expected) in cases {
            let result = schema().parse(raw).unwrap();
            assert_eq!(result.scale(), &Scale::Other(expected.to_string()));
            assert_eq!(result.brief(), "PLC programming");
            assert!(!result.is_failed());
        }
    }

    #[test]
    fn test_bare_backslash_is_malformed() {
        assert_malformed(r#"{"scale": 4, "brief": "Installs to C:\Program Files\Vendor"}"#);
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert_malformed("[5, \"SCADA\"]");
    }

    #[test]
    fn test_extract_fields_checks_declared_keys() {
        let schema = ResponseSchema::new(vec![ResponseField {
            name: "label",
            description: "a label",
        }]);
        let object = schema.extract_fields(r#"{"label": "ot"}"#).unwrap();
        assert_eq!(object["label"], "ot");
        assert!(schema.extract_fields(r#"{"other": 1}"#).is_err());
    }
}
