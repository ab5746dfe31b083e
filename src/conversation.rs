use crate::api::response::{extract_content, extract_reasoning, first_message, parse_tool_calls};
use crate::api::{ChatClient, RequestBody};
use crate::config::defaults::{is_ollama_base, OPENAI_API_BASE};
use crate::config::Config;
use crate::error::Result;
use crate::models::{FunctionCall, Message, ToolCall};
use crate::tools::{dispatch, format_tools_for_llm, ErrorKind, ToolContext, ToolOutcome};
use colored::*;
use serde_json::{Map, Value};

/// History length above which the interactive window is trimmed.
pub const WINDOW_LIMIT: usize = 10;
/// Messages kept after the leading system message when trimming.
pub const WINDOW_TAIL: usize = 8;

#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub verbose: bool,
}

impl TurnSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            verbose: config.verbose,
        }
    }
}

/// One executed tool call, kept for display.
#[derive(Debug, Clone)]
pub struct ToolExchange {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
    pub outcome: ToolOutcome,
}

#[derive(Debug, Clone)]
pub struct TurnReport {
    pub content: Option<String>,
    pub reasoning: Option<String>,
    pub exchanges: Vec<ToolExchange>,
    /// Message list as sent on the last request.
    pub messages: Vec<Message>,
}

impl TurnReport {
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn used_simulated_data(&self) -> bool {
        self.exchanges
            .iter()
            .any(|e| matches!(e.outcome, ToolOutcome::Simulated(_)))
    }
}

pub struct Assistant {
    client: ChatClient,
    tools: ToolContext,
    settings: TurnSettings,
}

impl Assistant {
    pub fn new(client: ChatClient, tools: ToolContext, settings: TurnSettings) -> Self {
        Self {
            client,
            tools,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ChatClient::from_config(config)?,
            ToolContext::new(config.weather.clone(), config.verbose)?,
            TurnSettings::from_config(config),
        ))
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    /// Ask the server for its model list; fails when it is unreachable.
    pub async fn check_connection(&self) -> Result<Vec<String>> {
        self.log(&format!("Checking server at {}", self.client.api_base()));
        self.client.list_models().await
    }

    pub fn connection_hints(&self) -> Vec<String> {
        connection_hints(self.client.api_base(), &self.settings.model)
    }

    /// Answer one user message. At most two model round trips: the first
    /// offers the tool schema, the second (only if tools were called)
    /// carries the tool results and has no schema.
    pub async fn ask(&self, user_message: &str) -> Result<TurnReport> {
        let system_prompt = format!(
            "{} Today's date is {}.",
            self.settings.system_prompt,
            Config::get_current_date()
        );
        let mut messages = vec![
            Message::system(system_prompt),
            Message::user(user_message),
        ];

        let tools = format_tools_for_llm();
        self.log(&format!(
            "Using model: {} with {} tool(s)",
            self.settings.model,
            tools.len()
        ));

        let first_request = self.request(&messages).with_tools(tools);
        self.log("Making API request...");
        let first_response = self.client.chat(&first_request).await?;

        let raw_calls = parse_tool_calls(&first_response)?.unwrap_or_default();
        if raw_calls.is_empty() {
            self.log("No tool calls; using assistant message content.");
            return Ok(TurnReport {
                content: extract_content(&first_response)?,
                reasoning: extract_reasoning(&first_response)?,
                exchanges: Vec::new(),
                messages,
            });
        }

        self.log(&format!("Model requested {} tool call(s)", raw_calls.len()));

        let pending: Vec<PendingCall> = raw_calls.iter().map(PendingCall::from_raw).collect();
        let assistant_content = first_message(&first_response)?
            .get("content")
            .and_then(|c| c.as_str())
            .map(|s| s.to_string());
        messages.push(Message::assistant_tool_calls(
            assistant_content,
            pending.iter().map(PendingCall::to_tool_call).collect(),
        ));

        let mut exchanges = Vec::with_capacity(pending.len());
        for call in pending {
            let exchange = call.execute(&self.tools).await;
            messages.push(Message::tool_result(
                exchange.call_id.clone(),
                exchange.name.clone(),
                exchange.outcome.to_json_string(),
            ));
            exchanges.push(exchange);
        }

        self.log("Making follow-up request with tool results...");
        let followup_request = self.request(&messages);
        let followup_response = self.client.chat(&followup_request).await?;

        if let Some(ignored) = parse_tool_calls(&followup_response)? {
            self.log(&format!(
                "Ignoring {} tool call(s) requested after tool results",
                ignored.len()
            ));
        }

        Ok(TurnReport {
            content: extract_content(&followup_response)?,
            reasoning: extract_reasoning(&followup_response)?,
            exchanges,
            messages,
        })
    }

    fn request(&self, messages: &[Message]) -> RequestBody {
        RequestBody::new(&self.settings.model, messages.to_vec())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
    }

    fn log(&self, message: &str) {
        if self.settings.verbose {
            eprintln!("{}", format!("[AI] {}", message).dimmed());
        }
    }
}

/// A tool call as the model sent it, with whatever was missing filled in
/// so that a paired result can always be produced.
#[derive(Debug)]
struct PendingCall {
    id: String,
    name: Option<String>,
    raw_arguments: String,
    arguments: std::result::Result<Value, String>,
}

impl PendingCall {
    fn from_raw(raw: &Value) -> Self {
        let id = raw
            .get("id")
            .and_then(|i| i.as_str())
            .filter(|i| !i.is_empty())
            .map(|i| i.to_string())
            .unwrap_or_else(|| format!("error_{}", uuid::Uuid::new_v4()));

        let function = raw.get("function");
        let name = function
            .and_then(|f| f.get("name"))
            .and_then(|n| n.as_str())
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string());

        // Most servers send a JSON-encoded string; some send the object itself
        let (raw_arguments, arguments) = match function.and_then(|f| f.get("arguments")) {
            None | Some(Value::Null) => ("{}".to_string(), Ok(Value::Object(Map::new()))),
            Some(Value::String(s)) if s.trim().is_empty() => {
                (s.clone(), Ok(Value::Object(Map::new())))
            }
            Some(Value::String(s)) => (
                s.clone(),
                serde_json::from_str::<Value>(s).map_err(|e| e.to_string()),
            ),
            Some(other) => (other.to_string(), Ok(other.clone())),
        };

        Self {
            id,
            name,
            raw_arguments,
            arguments,
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }

    fn to_tool_call(&self) -> ToolCall {
        ToolCall {
            id: self.id.clone(),
            tool_type: "function".to_string(),
            function: FunctionCall {
                name: self.display_name().to_string(),
                arguments: self.raw_arguments.clone(),
            },
        }
    }

    async fn execute(self, context: &ToolContext) -> ToolExchange {
        let (arguments, outcome) = match (&self.name, &self.arguments) {
            (None, _) => (
                Value::Null,
                ToolOutcome::error(
                    ErrorKind::InvalidArguments,
                    format!("Tool call {} missing required 'function.name' field", self.id),
                ),
            ),
            (Some(name), Err(e)) => (
                Value::String(self.raw_arguments.clone()),
                ToolOutcome::error(
                    ErrorKind::InvalidArguments,
                    format!("Failed to parse arguments for tool '{}': {}", name, e),
                ),
            ),
            (Some(name), Ok(args)) => (args.clone(), dispatch(context, name, args).await),
        };

        ToolExchange {
            name: self.display_name().to_string(),
            call_id: self.id,
            arguments,
            outcome,
        }
    }
}

/// What to tell the user when the startup check fails.
pub fn connection_hints(api_base: &str, model: &str) -> Vec<String> {
    if is_ollama_base(api_base) {
        vec![
            "Make sure Ollama is running:".to_string(),
            "   1. Start Ollama: ollama serve".to_string(),
            "   2. Verify model: ollama list".to_string(),
            format!("   3. Pull model if needed: ollama pull {}", model),
        ]
    } else if api_base == OPENAI_API_BASE {
        vec![
            "Could not reach the OpenAI API.".to_string(),
            "   Check OPENAI_API_KEY and your network connection.".to_string(),
        ]
    } else {
        vec![
            format!("Make sure the server at {} is running", api_base),
            "Check service status with:".to_string(),
            "   ssh user@your-vm-ip".to_string(),
            "   sudo journalctl -u gpt-oss.service -f".to_string(),
        ]
    }
}

/// Keep the leading message plus the last [`WINDOW_TAIL`] once the history
/// grows beyond [`WINDOW_LIMIT`].
pub fn trim_conversation_window(messages: &mut Vec<Message>) {
    if messages.len() <= WINDOW_LIMIT {
        return;
    }

    let tail = messages.split_off(messages.len() - WINDOW_TAIL);
    messages.truncate(1);
    messages.extend(tail);
}

