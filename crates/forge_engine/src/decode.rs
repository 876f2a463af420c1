use forge_core::GeneratedCode;
use serde_json::{Map, Value};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("the model returned no content")]
    Empty,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("model output is not a JSON object")]
    NotAnObject,
    #[error("model output is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("model output field `{field}` is not {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Decode the model's text into a [`GeneratedCode`], validating every field.
///
/// A single surrounding markdown fence (```` ```json ... ``` ````) is tolerated.
pub fn decode_generated_code(text: &str) -> Result<GeneratedCode, DecodeError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|err| DecodeError::InvalidJson(err.to_string()))?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    Ok(GeneratedCode {
        code: string_field(object, "code")?,
        explanation: string_field(object, "explanation")?,
        libraries: string_list_field(object, "libraries")?,
    })
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(DecodeError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn string_list_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, DecodeError> {
    let wrong_type = DecodeError::WrongType {
        field,
        expected: "an array of strings",
    };
    match object.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(field)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(ToOwned::to_owned).ok_or(wrong_type.clone()))
            .collect(),
        Some(_) => Err(wrong_type),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (`json`) on the opening line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}
