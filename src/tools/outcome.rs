use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Success,
    Simulated,
    Error,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Success => "success",
            ToolStatus::Simulated => "simulated",
            ToolStatus::Error => "error",
        }
    }
}

/// Why a tool produced no data. Not sent to the model; it only sees the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownTool,
    InvalidArguments,
    Network,
    InvalidResponse,
    UnknownTimezone,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Map<String, Value>),
    /// Placeholder data produced because no data-source credential is configured.
    Simulated(Map<String, Value>),
    Error {
        kind: ErrorKind,
        message: String,
        details: Map<String, Value>,
    },
}

impl ToolOutcome {
    pub fn success<T: Serialize>(payload: &T) -> Self {
        match to_map(payload) {
            Ok(map) => ToolOutcome::Success(map),
            Err(err) => err,
        }
    }

    pub fn simulated<T: Serialize>(payload: &T) -> Self {
        match to_map(payload) {
            Ok(map) => ToolOutcome::Simulated(map),
            Err(err) => err,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        ToolOutcome::Error {
            kind,
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::error(ErrorKind::UnknownTool, format!("Unknown tool: {}", name))
    }

    /// Attach extra context to an error; no-op for data outcomes.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let ToolOutcome::Error { details, .. } = &mut self {
            details.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn status(&self) -> ToolStatus {
        match self {
            ToolOutcome::Success(_) => ToolStatus::Success,
            ToolOutcome::Simulated(_) => ToolStatus::Simulated,
            ToolOutcome::Error { .. } => ToolStatus::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ToolOutcome::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Wire form: payload fields (or error details plus `error`) and `status`.
    pub fn to_value(&self) -> Value {
        let mut map = match self {
            ToolOutcome::Success(payload) | ToolOutcome::Simulated(payload) => payload.clone(),
            ToolOutcome::Error {
                message, details, ..
            } => {
                let mut map = details.clone();
                map.insert("error".to_string(), Value::String(message.clone()));
                map
            }
        };
        map.insert(
            "status".to_string(),
            Value::String(self.status().as_str().to_string()),
        );
        Value::Object(map)
    }

    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

fn to_map<T: Serialize>(payload: &T) -> Result<Map<String, Value>, ToolOutcome> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            Ok(map)
        }
        Err(e) => Err(ToolOutcome::error(
            ErrorKind::Unexpected,
            format!("Unexpected error: {}", e),
        )),
    }
}
