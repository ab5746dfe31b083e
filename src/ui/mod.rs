pub mod highlight;
mod output;
mod prompt;

pub use output::{
    banner, display_assistant, display_error, display_exchange, display_reasoning,
    display_simulated_warning, display_tool_call, display_tool_error, display_tool_result,
    display_turn, display_warning, separator,
};
pub use prompt::{is_exit_command, LineReader};
