use thiserror::Error;

/// Registry, advertised schema and configuration disagree.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("tool '{0}' is registered twice")]
    DuplicateTool(String),

    #[error("tool '{0}' is enabled in the config but not registered")]
    UnknownEnabledTool(String),

    #[error("model requested unregistered tool '{name}' (call {call_id})")]
    UnregisteredTool { name: String, call_id: String },

    #[error("no API key for {service}; set {env_var} or add it to the config file")]
    MissingApiKey {
        service: &'static str,
        env_var: &'static str,
    },
}

/// Tool arguments produced by the model could not be decoded.
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("arguments for '{tool}' are not valid JSON: {source}")]
    MalformedJson {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("arguments for '{tool}' do not match its schema: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A call to one of the weather lookup services failed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unexpected body: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },

    #[error("no coordinates found for '{0}'")]
    LocationNotFound(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid role '{0}', expected one of system, user, assistant, tool")]
    InvalidRole(String),

    #[error("tool message is missing its tool_call_id")]
    MissingToolCallId,

    #[error("tool call id '{0}' appears more than once in one reply")]
    DuplicateToolCallId(String),

    #[error("tool result '{0}' does not answer any pending tool call")]
    UnexpectedToolResult(String),

    #[error("tool calls left unanswered: {}", .0.join(", "))]
    UnansweredToolCalls(Vec<String>),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("model call failed: {0:#}")]
    Provider(anyhow::Error),
}
