use crate::error::{Result, WeatherbotError};
use serde_json::Value;

/// `choices[0].message` of a non-streaming chat-completions response.
pub fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| WeatherbotError::Other("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| WeatherbotError::Other("Empty choices array".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| WeatherbotError::Other("No message in response".to_string()))
}

/// Raw tool call objects requested by the model, `None` when there are none.
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<Value>>> {
    let message = first_message(response_json)?;

    if let Some(tool_calls) = message.get("tool_calls").and_then(|tc| tc.as_array()) {
        if !tool_calls.is_empty() {
            return Ok(Some(tool_calls.clone()));
        }
    }

    Ok(None)
}

pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

/// Reasoning text; vLLM and Ollama disagree on the field name.
pub fn extract_reasoning(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(["reasoning_content", "reasoning"]
        .iter()
        .find_map(|field| message.get(*field).and_then(|r| r.as_str()))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string()))
}
