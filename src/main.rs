use clap::Parser;
use colored::*;
use std::process;

use weatherbot::cli::Args;
use weatherbot::config::Config;
use weatherbot::conversation::Assistant;
use weatherbot::error::Result;
use weatherbot::ui::{
    banner, display_error, display_simulated_warning, display_turn, display_warning,
    is_exit_command, separator, LineReader,
};

const DEMO_QUERIES: [&str; 3] = [
    "What's the weather like in Tokyo right now?",
    "What time is it in London?",
    "Should I wear a jacket in New York today?",
];

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    let assistant = match Assistant::from_config(&config) {
        Ok(assistant) => assistant,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    if config.verbose {
        eprintln!(
            "{}",
            format!("[AI] Endpoint: {} model: {}", config.api_base, config.model).dimmed()
        );
    }

    match assistant.check_connection().await {
        Ok(models) => {
            if config.verbose {
                eprintln!("{}", format!("[AI] Server models: {:?}", models).dimmed());
            }
        }
        Err(e) => {
            display_error(&format!("Cannot connect to {}: {}", config.api_base, e));
            for hint in assistant.connection_hints() {
                display_warning(&hint);
            }
            process::exit(1);
        }
    }

    if config.weather.usable_key().is_none() {
        display_simulated_warning();
    }

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        if let Err(e) = answer(&assistant, &query).await {
            display_error(&e.to_string());
            process::exit(1);
        }
        if !args.interactive {
            return;
        }
    } else {
        banner("Weather & Time Assistant");
        run_demo(&assistant).await;
    }

    if let Err(e) = interactive(&assistant).await {
        display_error(&e.to_string());
        process::exit(1);
    }
}

async fn answer(assistant: &Assistant, query: &str) -> Result<()> {
    let report = assistant.ask(query).await?;
    display_turn(&report, assistant.settings().verbose);
    Ok(())
}

async fn run_demo(assistant: &Assistant) {
    println!("\n{}\n", "Running test queries...".cyan());

    for (i, query) in DEMO_QUERIES.iter().enumerate() {
        println!(
            "\n[{}/{}] {} {}",
            i + 1,
            DEMO_QUERIES.len(),
            "User:".bold(),
            query
        );
        separator();

        if let Err(e) = answer(assistant, query).await {
            display_error(&e.to_string());
        }
    }
}

async fn interactive(assistant: &Assistant) -> Result<()> {
    println!("\n{}", "Interactive mode (type 'quit' to exit):".cyan());
    separator();

    let mut reader = LineReader::new();
    while let Some(input) = reader.prompt("You: ").await? {
        if is_exit_command(&input) {
            break;
        }
        if input.is_empty() {
            continue;
        }

        if let Err(e) = answer(assistant, &input).await {
            display_error(&e.to_string());
        }
    }

    println!("Goodbye!");
    Ok(())
}
