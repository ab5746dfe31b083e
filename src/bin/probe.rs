use clap::Parser;
use std::process;
use weatherbot::cli::ProbeArgs;
use weatherbot::ui::display_error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = ProbeArgs::parse();

    if let Err(e) = weatherbot::probe::run(args).await {
        display_error(&e.to_string());
        process::exit(1);
    }
}
