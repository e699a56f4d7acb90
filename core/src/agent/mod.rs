pub mod loop_;
pub mod registry;
pub mod session;

pub use loop_::{DispatchLoop, DispatchOptions, ToolInvocation, TurnOutcome};
pub use registry::ToolRegistry;
pub use session::Conversation;
