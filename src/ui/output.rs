use crate::conversation::{ToolExchange, TurnReport};
use crate::tools::ToolOutcome;
use crate::ui::highlight::{rule, Highlighter};
use colored::*;
use serde_json::Value;
use std::sync::OnceLock;

fn highlighter() -> &'static Highlighter {
    static HIGHLIGHTER: OnceLock<Highlighter> = OnceLock::new();
    HIGHLIGHTER.get_or_init(Highlighter::new)
}

pub fn display_tool_call(name: &str, arguments: &Value) {
    println!(
        "{}",
        format!("Calling tool: {} with args: {}", name, arguments).cyan()
    );
}

/// Display a tool result as a highlighted JSON box
pub fn display_tool_result(name: &str, outcome: &ToolOutcome) {
    let body = serde_json::to_string_pretty(&outcome.to_value())
        .unwrap_or_else(|_| outcome.to_json_string());
    let title = format!("TOOL: {} ({})", name, outcome.status().as_str());
    print!("{}", highlighter().boxed(&title, &body, "json"));
}

pub fn display_tool_error(name: &str, error: &str) {
    let title = format!("TOOL ERROR: {}", name);
    print!("{}", highlighter().boxed(&title, error, "txt"));
}

pub fn display_exchange(exchange: &ToolExchange) {
    display_tool_call(&exchange.name, &exchange.arguments);
    match &exchange.outcome {
        ToolOutcome::Error { message, .. } => display_tool_error(&exchange.name, message),
        outcome => display_tool_result(&exchange.name, outcome),
    }
}

pub fn display_reasoning(reasoning: &str) {
    let cleaned = reasoning.replace("**", "");
    print!("{}", highlighter().boxed("REASONING", cleaned.trim(), "txt"));
}

pub fn display_assistant(content: &str) {
    println!("{} {}", "Assistant:".green().bold(), content);
}

/// Everything a finished turn produced, in the order it happened.
pub fn display_turn(report: &TurnReport, show_reasoning: bool) {
    for exchange in &report.exchanges {
        display_exchange(exchange);
    }

    if show_reasoning {
        if let Some(reasoning) = &report.reasoning {
            display_reasoning(reasoning);
        }
    }

    match &report.content {
        Some(content) if !content.trim().is_empty() => display_assistant(content),
        _ => println!("{}", "(no content in response)".dimmed()),
    }
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

pub fn display_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

pub fn display_simulated_warning() {
    display_warning(
        "Warning: OPENWEATHER_API_KEY not found. Weather functions will use simulated data.",
    );
    display_warning("   Get a free API key at: https://openweathermap.org/api");
}

pub fn separator() {
    println!("{}", rule('-').dimmed());
}

pub fn banner(title: &str) {
    println!("{}", title.bold());
    println!("{}", rule('=').dimmed());
}
