use crate::error::SessionError;
use crate::traits::{ChatMessage, Role};
use uuid::Uuid;

/// Ordered, append-only message history for one conversation.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(system_prompt: Option<&str>) -> Self {
        let mut messages = Vec::new();
        if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
            messages.push(ChatMessage::system(prompt));
        }

        Self {
            id: Uuid::new_v4().to_string(),
            messages,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append(&mut self, message: ChatMessage) -> Result<(), SessionError> {
        if message.role == Role::Tool {
            let call_id = message
                .tool_call_id
                .as_deref()
                .ok_or(SessionError::MissingToolCallId)?;

            if !self.unanswered_tool_calls().contains(&call_id) {
                return Err(SessionError::UnexpectedToolResult(call_id.to_string()));
            }
        }

        // Answers are matched by id, so ids within one reply must be unique.
        if let Some(calls) = &message.tool_calls {
            for (i, call) in calls.iter().enumerate() {
                if calls[..i].iter().any(|earlier| earlier.id == call.id) {
                    return Err(SessionError::DuplicateToolCallId(call.id.clone()));
                }
            }
        }

        self.messages.push(message);
        Ok(())
    }

    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Ids requested by the latest assistant tool-call message that have no
    /// tool result yet, in request order.
    pub fn unanswered_tool_calls(&self) -> Vec<&str> {
        let Some(pos) = self.messages.iter().rposition(|m| m.has_tool_calls()) else {
            return vec![];
        };

        let answered: Vec<&str> = self.messages[pos + 1..]
            .iter()
            .filter(|m| m.role == Role::Tool)
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();

        self.messages[pos]
            .tool_calls
            .iter()
            .flatten()
            .map(|call| call.id.as_str())
            .filter(|id| !answered.contains(id))
            .collect()
    }

    pub fn ensure_answered(&self) -> Result<(), SessionError> {
        let pending = self.unanswered_tool_calls();
        if pending.is_empty() {
            Ok(())
        } else {
            Err(SessionError::UnansweredToolCalls(
                pending.into_iter().map(String::from).collect(),
            ))
        }
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ToolCall;

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "get_current_weather".into(),
            arguments: "{}".into(),
        }
    }

    #[test]
    fn snapshot_keeps_append_order() {
        let mut session = Conversation::new(Some("You are a helpful assistant"));
        session.append(ChatMessage::user("hi")).unwrap();
        session.append(ChatMessage::assistant("hello")).unwrap();

        let roles: Vec<Role> = session.snapshot().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(session.last().unwrap().content, "hello");
    }

    #[test]
    fn blank_system_prompt_is_skipped() {
        let session = Conversation::new(Some("  "));
        assert!(session.is_empty());
    }

    #[test]
    fn tracks_unanswered_tool_calls() {
        let mut session = Conversation::new(None);
        session
            .append(ChatMessage::assistant_with_tool_calls(
                "",
                vec![call("a"), call("b")],
            ))
            .unwrap();
        assert_eq!(session.unanswered_tool_calls(), vec!["a", "b"]);

        session
            .append(ChatMessage::tool_result("a", "get_current_weather", "{}"))
            .unwrap();
        assert_eq!(session.unanswered_tool_calls(), vec!["b"]);
        assert_eq!(
            session.ensure_answered(),
            Err(SessionError::UnansweredToolCalls(vec!["b".into()]))
        );

        session
            .append(ChatMessage::tool_result("b", "get_current_weather", "{}"))
            .unwrap();
        assert!(session.ensure_answered().is_ok());
    }

    #[test]
    fn rejects_tool_result_without_matching_call() {
        let mut session = Conversation::new(None);
        let err = session
            .append(ChatMessage::tool_result("nope", "get_current_weather", ""))
            .unwrap_err();
        assert_eq!(err, SessionError::UnexpectedToolResult("nope".into()));

        let mut orphan = ChatMessage::tool_result("x", "get_current_weather", "");
        orphan.tool_call_id = None;
        assert_eq!(
            session.append(orphan).unwrap_err(),
            SessionError::MissingToolCallId
        );
    }

    #[test]
    fn rejects_duplicate_answer() {
        let mut session = Conversation::new(None);
        session
            .append(ChatMessage::assistant_with_tool_calls("", vec![call("a")]))
            .unwrap();
        session
            .append(ChatMessage::tool_result("a", "get_current_weather", "{}"))
            .unwrap();
        assert!(
            session
                .append(ChatMessage::tool_result("a", "get_current_weather", "{}"))
                .is_err()
        );
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn rejects_repeated_call_id_in_one_reply() {
        let mut session = Conversation::new(None);
        let err = session
            .append(ChatMessage::assistant_with_tool_calls(
                "",
                vec![call("a"), call("b"), call("a")],
            ))
            .unwrap_err();
        assert_eq!(err, SessionError::DuplicateToolCallId("a".into()));
        assert!(session.is_empty());
        assert!(session.ensure_answered().is_ok());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        assert_ne!(Conversation::new(None).id(), Conversation::new(None).id());
    }
}
