use crate::error::ConfigurationError;
use crate::traits::{Tool, ToolResult, ToolSpec};
use std::sync::Arc;

/// Tools the model may call. Built once at startup, read-only afterwards;
/// the advertised schema is always derived from the registered tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ConfigurationError> {
        if self.contains(tool.name()) {
            return Err(ConfigurationError::DuplicateTool(tool.name().to_string()));
        }
        tracing::debug!(tool = tool.name(), "Registered tool");
        self.tools.push(tool);
        Ok(())
    }

    /// Keeps only the tools named in `enabled`, failing on names that were
    /// never registered. An empty list keeps everything.
    pub fn retain_enabled(&mut self, enabled: &[String]) -> Result<(), ConfigurationError> {
        if enabled.is_empty() {
            return Ok(());
        }
        if let Some(missing) = enabled.iter().find(|name| !self.contains(name)) {
            return Err(ConfigurationError::UnknownEnabledTool(missing.clone()));
        }
        self.tools
            .retain(|t| enabled.iter().any(|name| name == t.name()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Runs a registered tool. Argument errors come back as failed results
    /// so they can be shown to the model.
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ConfigurationError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ConfigurationError::UnregisteredTool {
                name: name.to_string(),
                call_id: String::new(),
            })?;

        match tool.execute(args).await {
            Ok(result) => Ok(result),
            Err(e) => Ok(ToolResult::error(format!("{:#}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EchoTool;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new("echo"))).unwrap();
        registry.register(Arc::new(EchoTool::new("shout"))).unwrap();
        registry
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = registry();
        let err = registry
            .register(Arc::new(EchoTool::new("echo")))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateTool(name) if name == "echo"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn specs_follow_registration_order() {
        let names: Vec<String> = registry().get_specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo", "shout"]);
    }

    #[test]
    fn retain_enabled_filters_and_validates() {
        let mut registry = registry();
        registry.retain_enabled(&["shout".into()]).unwrap();
        assert_eq!(registry.names(), vec!["shout"]);

        let err = registry.retain_enabled(&["missing".into()]).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownEnabledTool(name) if name == "missing"));
    }

    #[tokio::test]
    async fn execute_unknown_tool_is_configuration_error() {
        let err = registry().execute("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ConfigurationError::UnregisteredTool { name, .. } if name == "nope"));
    }

    #[tokio::test]
    async fn execute_turns_argument_errors_into_failed_results() {
        let result = registry().execute("echo", json!({})).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("echo"));

        let result = registry()
            .execute("echo", json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::success("hi"));
    }
}
