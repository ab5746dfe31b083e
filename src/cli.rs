use crate::deployment::Platform;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "weatherbot")]
#[command(
    about = "Weather and time assistant using chat-completions tool calling",
    long_about = None
)]
pub struct Args {
    #[arg(
        long = "endpoint",
        help = "API endpoint URL (e.g., http://1.2.3.4:8000 or http://localhost:11434/v1)"
    )]
    pub endpoint: Option<String>,

    #[arg(
        long = "platform",
        value_enum,
        help = "Load the endpoint from {platform}_deployment_info.json"
    )]
    pub platform: Option<Platform>,

    #[arg(short = 'm', long = "model", help = "Model name to request")]
    pub model: Option<String>,

    #[arg(
        short = 'i',
        long = "interactive",
        help = "Start an interactive session after answering"
    )]
    pub interactive: bool,

    #[arg(short = 'v', long = "verbose", help = "Print request diagnostics")]
    pub verbose: bool,

    #[arg(help = "Question to ask; runs the demo queries when omitted")]
    pub query: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(name = "weatherbot-probe")]
#[command(about = "Test a deployed chat-completions endpoint", long_about = None)]
pub struct ProbeArgs {
    #[arg(long = "endpoint", help = "API endpoint URL (e.g., http://1.2.3.4:8000)")]
    pub endpoint: Option<String>,

    #[arg(
        long = "platform",
        value_enum,
        help = "Load endpoint from deployment info file"
    )]
    pub platform: Option<Platform>,

    #[arg(long = "interactive", help = "Start interactive chat session")]
    pub interactive: bool,

    #[arg(
        short = 'm',
        long = "model",
        default_value = "openai/gpt-oss-20b",
        help = "Model name served by the endpoint"
    )]
    pub model: String,
}
