use crate::agent::{Conversation, ToolRegistry};
use crate::error::{ConfigurationError, DispatchError};
use crate::tools::parse_arguments;
use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, Provider, ToolCall, ToolChoice, ToolResult, ToolSpec,
    Usage,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub tool_choice: ToolChoice,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: None,
            tool_choice: ToolChoice::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub call_id: String,
    pub name: String,
    pub result: ToolResult,
}

#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    pub reply: String,
    pub invocations: Vec<ToolInvocation>,
    pub model_calls: usize,
    pub usage: Usage,
}

impl TurnOutcome {
    pub fn failed_invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.invocations.iter().filter(|i| !i.result.success)
    }
}

/// Drives one user turn: model call, tool dispatch, follow-up model call.
pub struct DispatchLoop {
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    options: DispatchOptions,
}

impl DispatchLoop {
    pub fn new(provider: Arc<dyn Provider>, tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tool_registry,
            options: DispatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.options.max_tokens = max_tokens;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.options.tool_choice = tool_choice;
        self
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    pub async fn run_turn(
        &self,
        session: &mut Conversation,
        input: &str,
    ) -> Result<TurnOutcome, DispatchError> {
        session.append(ChatMessage::user(input))?;

        let mut outcome = TurnOutcome::default();
        let specs = self.tool_registry.get_specs();
        let tools = if specs.is_empty() {
            None
        } else {
            Some(specs.as_slice())
        };

        let response = self.call_model(session, tools, &mut outcome).await?;

        if !response.has_tool_calls() {
            outcome.reply = response.text.unwrap_or_default();
            session.append(ChatMessage::assistant(outcome.reply.clone()))?;
            return Ok(outcome);
        }

        // Refuse the whole reply before touching the session so it never
        // holds calls that can't be answered.
        if let Some(unknown) = response
            .tool_calls
            .iter()
            .find(|c| !self.tool_registry.contains(&c.name))
        {
            error!(
                session = session.id(),
                tool = %unknown.name,
                call_id = %unknown.id,
                "Model requested an unregistered tool"
            );
            return Err(ConfigurationError::UnregisteredTool {
                name: unknown.name.clone(),
                call_id: unknown.id.clone(),
            }
            .into());
        }

        session.append(ChatMessage::assistant_with_tool_calls(
            response.text_or_empty(),
            response.tool_calls.clone(),
        ))?;

        for call in &response.tool_calls {
            let result = self.dispatch(call).await?;
            session.append(ChatMessage::tool_result(
                &call.id,
                &call.name,
                result.content_for_model(),
            ))?;
            outcome.invocations.push(ToolInvocation {
                call_id: call.id.clone(),
                name: call.name.clone(),
                result,
            });
        }

        let follow_up = self.call_model(session, None, &mut outcome).await?;
        if follow_up.has_tool_calls() {
            warn!(
                session = session.id(),
                count = follow_up.tool_calls.len(),
                "Ignoring tool calls in follow-up reply"
            );
        }

        outcome.reply = follow_up.text.unwrap_or_default();
        session.append(ChatMessage::assistant(outcome.reply.clone()))?;
        Ok(outcome)
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<ToolResult, ConfigurationError> {
        let args = match parse_arguments(&call.name, &call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Bad tool arguments");
                return Ok(ToolResult::error(e.to_string()));
            }
        };

        info!(tool = %call.name, call_id = %call.id, "Invoking tool");
        let result = self
            .tool_registry
            .execute(&call.name, args)
            .await
            .map_err(|e| match e {
                ConfigurationError::UnregisteredTool { name, .. } => {
                    ConfigurationError::UnregisteredTool {
                        name,
                        call_id: call.id.clone(),
                    }
                }
                other => other,
            })?;

        if !result.success {
            warn!(
                tool = %call.name,
                call_id = %call.id,
                error = result.error.as_deref().unwrap_or(""),
                "Tool returned a failure"
            );
        }
        Ok(result)
    }

    async fn call_model(
        &self,
        session: &Conversation,
        tools: Option<&[ToolSpec]>,
        outcome: &mut TurnOutcome,
    ) -> Result<ChatResponse, DispatchError> {
        session.ensure_answered()?;

        let request = ChatRequest {
            messages: session.snapshot(),
            tools,
            tool_choice: tools.map(|_| &self.options.tool_choice),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        debug!(
            session = session.id(),
            messages = session.len(),
            tools = tools.map_or(0, |t| t.len()),
            "Calling model"
        );

        let response = self
            .provider
            .chat(request)
            .await
            .map_err(DispatchError::Provider)?;

        outcome.model_calls += 1;
        if let Some(usage) = response.usage {
            outcome.usage += usage;
        }
        Ok(response)
    }
}
