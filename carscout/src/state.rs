//! Search request and conversation state threaded through the agent graph.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::{FieldBasedUpdater, StateUpdater};
use crate::message::Message;

/// Radius in miles used when the caller does not give one.
pub const DEFAULT_DISTANCE: u32 = 25;

fn default_distance() -> u32 {
    DEFAULT_DISTANCE
}

/// Structured vehicle search supplied at graph-invocation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    /// 5-digit US ZIP code.
    pub zip_code: String,
    /// Search radius in miles.
    #[serde(default = "default_distance")]
    pub distance: u32,
}

impl SearchRequest {
    /// Builds a request with the default radius of 25 miles.
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            zip_code: zip_code.into(),
            distance: DEFAULT_DISTANCE,
        }
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }
}

/// Request plus the ordered message history of one invocation.
///
/// Nodes return a *delta* state whose `messages` hold only what they produced; the
/// graph merges it with [`append_messages_updater`], so history is never reordered
/// or truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub request: SearchRequest,
    pub messages: Vec<Message>,
}

impl ConversationState {
    /// Fresh state with an empty history.
    pub fn new(request: SearchRequest) -> Self {
        Self {
            request,
            messages: Vec::new(),
        }
    }

    /// Delta state carrying the same request and only `messages`.
    pub fn delta(&self, messages: Vec<Message>) -> Self {
        Self {
            request: self.request.clone(),
            messages,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the final assistant message, if the conversation ended on one.
    pub fn summary(&self) -> Option<String> {
        match self.messages.last() {
            Some(Message::Assistant { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }
}

/// Updater that appends a node's messages to the history and keeps the request.
pub fn append_messages_updater() -> Arc<dyn StateUpdater<ConversationState>> {
    Arc::new(FieldBasedUpdater::new(
        |current: &mut ConversationState, update: &ConversationState| {
            current.messages.extend(update.messages.iter().cloned());
        },
    ))
}
