pub mod agent;
pub mod config;
pub mod error;
pub mod providers;
pub mod tokenizer;
pub mod tools;
pub mod traits;

#[cfg(test)]
mod testing;

pub use agent::{Conversation, DispatchLoop, DispatchOptions, ToolRegistry, TurnOutcome};
pub use config::*;
pub use error::*;
pub use providers::*;
pub use tools::*;
pub use traits::*;
