//! Smoke tests for a deployed chat-completions endpoint.

use crate::api::response::extract_content;
use crate::api::{ChatClient, RequestBody};
use crate::cli::ProbeArgs;
use crate::conversation::trim_conversation_window;
use crate::deployment::{DeploymentRecord, Platform};
use crate::error::{Result, WeatherbotError};
use crate::models::Message;
use crate::ui::{display_error, is_exit_command, LineReader};
use colored::*;
use std::path::Path;

pub const PROBE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const PREVIEW_CHARS: usize = 200;
const TEMPERATURE: f32 = 0.7;

pub const WEATHER_QUESTIONS: [&str; 4] = [
    "What's the weather like in Tokyo?",
    "Should I wear a jacket in London today?",
    "What time is it in New York?",
    "Can you get me a 5-day forecast for Paris?",
];

const WEATHER_SYSTEM_PROMPT: &str = "You are a helpful weather assistant. When users ask about weather, time, or forecasts, explain that you would normally use weather APIs to get real-time data, but for this demo you can provide general information.";
const CHAT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant running on GPT OSS. You can discuss weather, time, and general topics. Be friendly and informative.";
const REASONING_PROMPT: &str = "I'm planning a trip to Japan in March. What should I consider about the weather, and what would be the best tools to check current conditions?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Flag,
    Platform(Platform),
    Detected(Platform),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub source: EndpointSource,
}

/// `--endpoint`, else the `--platform` record, else the first record found.
pub fn resolve_endpoint(
    endpoint: Option<&str>,
    platform: Option<Platform>,
    dir: &Path,
) -> Result<ResolvedEndpoint> {
    if let Some(url) = endpoint {
        return Ok(ResolvedEndpoint {
            url: url.to_string(),
            source: EndpointSource::Flag,
        });
    }

    if let Some(platform) = platform {
        let record = DeploymentRecord::load(platform, dir)?;
        return Ok(ResolvedEndpoint {
            url: record.api_endpoint,
            source: EndpointSource::Platform(platform),
        });
    }

    DeploymentRecord::detect(dir)
        .map(|(platform, record)| ResolvedEndpoint {
            url: record.api_endpoint,
            source: EndpointSource::Detected(platform),
        })
        .ok_or_else(|| {
            WeatherbotError::Deployment(
                "No endpoint specified and no deployment info found".to_string(),
            )
        })
}

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub struct Probe {
    client: ChatClient,
    model: String,
}

impl Probe {
    pub fn new(endpoint: &str, model: &str) -> Result<Self> {
        Ok(Self {
            client: ChatClient::new(endpoint, None, PROBE_TIMEOUT_SECS)?,
            model: model.to_string(),
        })
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub async fn check_connection(&self) -> Result<Vec<String>> {
        self.client.list_models().await
    }

    /// Plain completion without tools; returns the assistant text.
    pub async fn complete(&self, messages: &[Message], max_tokens: u32) -> Result<String> {
        let request = RequestBody::new(&self.model, messages.to_vec())
            .with_temperature(TEMPERATURE)
            .with_max_tokens(Some(max_tokens));

        let response = self.client.chat(&request).await?;
        Ok(extract_content(&response)?.unwrap_or_default())
    }

    pub async fn test_basic_chat(&self) {
        println!("\n{}", "Testing basic chat...".cyan());
        let messages = [Message::user("Hello! Can you introduce yourself?")];

        match self.complete(&messages, DEFAULT_MAX_TOKENS).await {
            Ok(reply) => println!("{} {}", "Assistant:".green(), reply),
            Err(e) => display_error(&e.to_string()),
        }
    }

    pub async fn test_weather_questions(&self) {
        println!("\n{}", "Testing weather questions...".cyan());

        for question in WEATHER_QUESTIONS {
            println!("\n{} {}", "Question:".bold(), question);
            let messages = [
                Message::system(WEATHER_SYSTEM_PROMPT),
                Message::user(question),
            ];

            match self.complete(&messages, 256).await {
                Ok(reply) => println!(
                    "{} {}",
                    "Assistant:".green(),
                    preview(&reply, PREVIEW_CHARS)
                ),
                Err(e) => display_error(&e.to_string()),
            }
        }
    }

    pub async fn test_reasoning(&self) {
        println!("\n{}", "Testing reasoning...".cyan());
        let messages = [Message::user(REASONING_PROMPT)];

        match self.complete(&messages, 400).await {
            Ok(reply) => println!("{} {}", "Assistant:".green(), reply),
            Err(e) => display_error(&e.to_string()),
        }
    }

    pub async fn run_canned_tests(&self) {
        self.test_basic_chat().await;
        self.test_weather_questions().await;
        self.test_reasoning().await;

        println!("\n{}", "All tests completed!".green().bold());
        println!("Run with --interactive for chat mode");
    }

    pub async fn interactive_chat(&self) -> Result<()> {
        println!("\n{}", "Interactive chat mode (type 'quit' to exit)".cyan());
        println!("{}", "-".repeat(50).dimmed());

        let mut conversation = vec![Message::system(CHAT_SYSTEM_PROMPT)];
        let mut reader = LineReader::new();

        loop {
            let Some(input) = reader.prompt("You: ").await? else {
                break;
            };

            if is_exit_command(&input) {
                break;
            }
            if input.is_empty() {
                continue;
            }

            conversation.push(Message::user(input));
            println!("{}", "Thinking...".dimmed());

            match self.complete(&conversation, DEFAULT_MAX_TOKENS).await {
                Ok(reply) => {
                    println!("{} {}", "Assistant:".green(), reply);
                    conversation.push(Message::assistant(reply));
                }
                Err(e) => display_error(&e.to_string()),
            }

            trim_conversation_window(&mut conversation);
        }

        println!("Goodbye!");
        Ok(())
    }
}

fn print_usage_hints() {
    println!("Usage:");
    println!("   weatherbot-probe --endpoint http://YOUR_VM_IP:8000");
    println!("   weatherbot-probe --platform aws");
    println!("   weatherbot-probe --platform azure");
}

/// Entry point of the `weatherbot-probe` binary; `Err` means exit non-zero.
pub async fn run(args: ProbeArgs) -> Result<()> {
    println!("{}", "GPT OSS Client Test".bold());
    println!("{}", "=".repeat(30));

    let endpoint = match resolve_endpoint(args.endpoint.as_deref(), args.platform, Path::new("."))
    {
        Ok(endpoint) => endpoint,
        Err(e) => {
            if args.platform.is_none() {
                print_usage_hints();
            }
            return Err(e);
        }
    };

    match endpoint.source {
        EndpointSource::Flag => {}
        EndpointSource::Platform(platform) => println!(
            "Using {} endpoint: {}",
            platform.as_str().to_uppercase(),
            endpoint.url
        ),
        EndpointSource::Detected(platform) => println!(
            "Auto-detected {} endpoint: {}",
            platform.as_str().to_uppercase(),
            endpoint.url
        ),
    }

    let probe = Probe::new(&endpoint.url, &args.model)?;

    match probe.check_connection().await {
        Ok(models) => {
            println!("{}", "Server is responding".green());
            println!("Available models: {:?}", models);
        }
        Err(e) => {
            println!("Make sure your VM is running and the service has started");
            println!("Check service status with:");
            println!("   ssh user@your-vm-ip");
            println!("   sudo journalctl -u gpt-oss.service -f");
            return Err(e);
        }
    }

    if args.interactive {
        probe.interactive_chat().await
    } else {
        probe.run_canned_tests().await;
        Ok(())
    }
}
