use serde_json::{json, Value};

/// Structured-output schema every response must follow.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "code": {
                "type": "STRING",
                "description": "Complete Python source code"
            },
            "explanation": {
                "type": "STRING",
                "description": "Detailed explanation of the code logic and the XPath selectors"
            },
            "libraries": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "pip packages required to run the script"
            }
        },
        "required": ["code", "explanation", "libraries"]
    })
}

/// `generationConfig` block requesting JSON constrained by [`response_schema`].
pub fn generation_config() -> Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": response_schema(),
    })
}
