use serde::{Deserialize, Serialize};

use crate::traits::Message;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunRequest {
    pub messages: Vec<Message>,
}

/// Envelope returned by `/ai/run/{model}`. Only `result` carries model output;
/// the rest is kept for error reporting.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RunResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// Pick the model output out of a Workers AI response body.
///
/// Text-generation models answer under `result.response`, some task models
/// under `result.output`; anything else falls back to `result` itself and
/// finally to the whole body.
pub(crate) fn resolve_output(body: serde_json::Value) -> serde_json::Value {
    if body.get("result").map_or(true, serde_json::Value::is_null) {
        return body;
    }
    let result = &body["result"];

    for key in ["response", "output"] {
        if let Some(value) = result.get(key) {
            if !value.is_null() {
                return value.clone();
            }
        }
    }

    result.clone()
}
