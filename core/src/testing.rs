//! In-crate fakes shared by the unit tests.

use crate::error::UpstreamError;
use crate::tools::typed_args;
use crate::tools::weather::{Conditions, Coordinates, WeatherService};
use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, Provider, Tool, ToolCall, ToolChoice, ToolResult,
    ToolSpec,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct EchoTool {
    name: String,
}

impl EchoTool {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Deserialize)]
struct EchoArgs {
    text: String,
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echo the given text"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let args: EchoArgs = typed_args(&self.name, args)?;
        Ok(ToolResult::success(args.text))
    }
}

pub struct FakeWeather {
    coordinates: Coordinates,
    kelvin: f64,
    description: String,
    fail_geocode: bool,
    conditions_calls: AtomicUsize,
}

impl FakeWeather {
    pub fn new(coordinates: Coordinates, kelvin: f64, description: &str) -> Self {
        Self {
            coordinates,
            kelvin,
            description: description.into(),
            fail_geocode: false,
            conditions_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_geocode() -> Self {
        Self {
            fail_geocode: true,
            ..Self::new(Coordinates { lat: 0.0, lon: 0.0 }, 0.0, "")
        }
    }

    pub fn conditions_calls(&self) -> usize {
        self.conditions_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherService for FakeWeather {
    async fn geocode(&self, _place: &str) -> Result<Coordinates, UpstreamError> {
        if self.fail_geocode {
            return Err(UpstreamError::Status {
                service: "geocoding",
                status: 401,
                body: "Invalid API key".into(),
            });
        }
        Ok(self.coordinates)
    }

    async fn current_conditions(&self, _at: Coordinates) -> Result<Conditions, UpstreamError> {
        self.conditions_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Conditions {
            temperature_kelvin: self.kelvin,
            description: self.description.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Option<Vec<ToolSpec>>,
    pub tool_choice: Option<ToolChoice>,
}

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: request.messages.to_vec(),
            tools: request.tools.map(|t| t.to_vec()),
            tool_choice: request.tool_choice.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted response left"))
    }
}

pub fn text_reply(text: &str) -> ChatResponse {
    ChatResponse {
        text: Some(text.into()),
        ..Default::default()
    }
}

pub fn tool_reply(calls: &[(&str, &str, &str)]) -> ChatResponse {
    ChatResponse {
        text: None,
        tool_calls: calls
            .iter()
            .map(|(id, name, arguments)| ToolCall {
                id: (*id).into(),
                name: (*name).into(),
                arguments: (*arguments).into(),
            })
            .collect(),
        usage: None,
    }
}
