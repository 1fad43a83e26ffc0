//! Message Log domain types.
//!
//! The Message Log is the only state the reasoning step sees. It is an
//! append-only sequence of typed entries:
//! user query → reasoning output → tool results → reasoning output → ...

use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tool::ToolOutput;

/// A request to execute a tool, emitted by a reasoning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Call ID, unique within one reasoning output
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value (expected to be an object)
    pub arguments: serde_json::Value,
}

impl ToolRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// What a single tool call produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool ran and returned output.
    Output {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// The call failed; the error is fed back to the model as an observation.
    Error { error: ToolError },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Output { .. })
    }

    /// The text the model observes for this outcome.
    pub fn observation(&self) -> String {
        match self {
            Self::Output { content, .. } => content.clone(),
            Self::Error { error } => format!("Error: {error}"),
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            Self::Error { error } => Some(error),
            Self::Output { .. } => None,
        }
    }
}

impl From<Result<ToolOutput, ToolError>> for ToolOutcome {
    fn from(result: Result<ToolOutput, ToolError>) -> Self {
        match result {
            Ok(output) => Self::Output {
                content: output.content,
                data: output.data,
            },
            Err(error) => Self::Error { error },
        }
    }
}

/// A single entry in the Message Log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// The query that started the run.
    UserQuery { text: String },

    /// One reasoning step's output. No tool requests means a final answer.
    ReasoningOutput {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_requests: Vec<ToolRequest>,
    },

    /// The observation for one tool request.
    ToolResult {
        request_id: String,
        tool_name: String,
        outcome: ToolOutcome,
    },
}

impl Message {
    pub fn user_query(text: impl Into<String>) -> Self {
        Self::UserQuery { text: text.into() }
    }

    pub fn reasoning(text: impl Into<String>, tool_requests: Vec<ToolRequest>) -> Self {
        Self::ReasoningOutput {
            text: text.into(),
            tool_requests,
        }
    }

    /// Build a tool result entry answering `request`.
    pub fn tool_result(request: &ToolRequest, outcome: ToolOutcome) -> Self {
        Self::ToolResult {
            request_id: request.id.clone(),
            tool_name: request.name.clone(),
            outcome,
        }
    }

    /// Textual content of the entry (the observation for tool results).
    pub fn text(&self) -> String {
        match self {
            Self::UserQuery { text } | Self::ReasoningOutput { text, .. } => text.clone(),
            Self::ToolResult { outcome, .. } => outcome.observation(),
        }
    }

    /// Tool requests carried by a reasoning output; empty for other entries.
    pub fn tool_requests(&self) -> &[ToolRequest] {
        match self {
            Self::ReasoningOutput { tool_requests, .. } => tool_requests,
            _ => &[],
        }
    }

    pub fn is_final_answer(&self) -> bool {
        matches!(self, Self::ReasoningOutput { tool_requests, .. } if tool_requests.is_empty())
    }
}

/// The ordered, append-only record passed to every reasoning step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log seeded with a user query.
    pub fn with_query(query: impl Into<String>) -> Self {
        let mut log = Self::new();
        log.push(Message::user_query(query));
        log
    }

    /// Append an entry. Entries are never removed or reordered.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Requests of the latest reasoning output that have no result yet.
    pub fn unanswered_requests(&self) -> Vec<&ToolRequest> {
        let Some(pos) = self
            .messages
            .iter()
            .rposition(|m| matches!(m, Message::ReasoningOutput { .. }))
        else {
            return Vec::new();
        };

        let answered: Vec<&str> = self.messages[pos + 1..]
            .iter()
            .filter_map(|m| match m {
                Message::ToolResult { request_id, .. } => Some(request_id.as_str()),
                _ => None,
            })
            .collect();

        self.messages[pos]
            .tool_requests()
            .iter()
            .filter(|r| !answered.contains(&r.id.as_str()))
            .collect()
    }

    /// Text of the most recent non-empty reasoning output.
    pub fn latest_reasoning_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::ReasoningOutput { text, .. } if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of reasoning outputs recorded.
    pub fn reasoning_steps(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, Message::ReasoningOutput { .. }))
            .count()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, name: &str) -> ToolRequest {
        ToolRequest::new(id, name, serde_json::json!({}))
    }

    #[test]
    fn seeded_log_starts_with_query() {
        let log = MessageLog::with_query("Hello, agent!");
        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0], Message::user_query("Hello, agent!"));
    }

    #[test]
    fn final_answer_has_no_requests() {
        assert!(Message::reasoning("done", vec![]).is_final_answer());
        assert!(!Message::reasoning("", vec![request("c1", "add")]).is_final_answer());
        assert!(!Message::user_query("hi").is_final_answer());
    }

    #[test]
    fn unanswered_requests_tracks_latest_batch() {
        let mut log = MessageLog::with_query("q");
        let r1 = request("c1", "add");
        let r2 = request("c2", "multiply");
        log.push(Message::reasoning("", vec![r1.clone(), r2.clone()]));
        assert_eq!(log.unanswered_requests().len(), 2);

        log.push(Message::tool_result(
            &r1,
            ToolOutcome::Output {
                content: "3".into(),
                data: None,
            },
        ));
        let pending = log.unanswered_requests();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "c2");

        log.push(Message::tool_result(
            &r2,
            ToolOutcome::Error {
                error: ToolError::execution_failed("boom"),
            },
        ));
        assert!(log.unanswered_requests().is_empty());
    }

    #[test]
    fn latest_reasoning_text_skips_empty() {
        let mut log = MessageLog::with_query("q");
        log.push(Message::reasoning("thinking about it", vec![request("c1", "add")]));
        log.push(Message::reasoning("   ", vec![request("c2", "add")]));
        assert_eq!(log.latest_reasoning_text(), Some("thinking about it"));
        assert_eq!(log.reasoning_steps(), 2);
    }

    #[test]
    fn error_observation_is_prefixed() {
        let outcome = ToolOutcome::Error {
            error: ToolError::UnknownTool { name: "foo".into() },
        };
        assert_eq!(outcome.observation(), "Error: Unknown tool: foo");
        assert!(!outcome.is_success());
    }

    #[test]
    fn message_json_is_tagged() {
        let msg = Message::reasoning("", vec![request("c1", "add")]);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"reasoning_output""#));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
