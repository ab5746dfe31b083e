mod dispatch;
mod outcome;
mod registry;
pub mod time;
pub mod weather;

pub use dispatch::{dispatch, execute, ToolContext};
pub use outcome::{ErrorKind, ToolOutcome, ToolStatus};
pub use registry::{format_tools_for_llm, tool_descriptors, ToolDescriptor, ToolName};
