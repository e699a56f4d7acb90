pub mod audio;
pub mod completion;
pub mod provider;
pub mod tool;

pub use audio::Transcriber;
pub use completion::{Completer, CompletionRequest, CompletionResponse};
pub use provider::{
    ChatMessage, ChatRequest, ChatResponse, Provider, Role, ToolCall, ToolChoice, Usage,
};
pub use tool::{Tool, ToolResult, ToolSpec};
