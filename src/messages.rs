//! Conversation message model and history capability
//!
//! The agent reads an ordered snapshot of conversational turns from a
//! [`MessageManager`]. It never mutates the shared history in place; any
//! transformation (like vision stripping) happens on a locally owned copy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Who produced a conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    Human,
    Ai,
    Tool,
}

/// Source reference for an image part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub url: String,
}

/// One typed part of a multi-part message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageSource },
}

/// Message body — plain text or a structured sequence of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenate the text-typed parts, in original order, dropping images
    ///
    /// Plain text content is returned unchanged.
    pub fn flattened_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => {
                let mut out = String::new();
                for part in parts {
                    if let ContentPart::Text { text } = part {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    /// True if any part carries image content
    pub fn has_images(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|p| matches!(p, ContentPart::ImageUrl { .. })),
        }
    }
}

/// A single conversational turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn human(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Ai,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A human turn with structured multi-part content
    pub fn human_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::Human,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Read capability over the session's conversation history
///
/// The history store owns retention and trimming policy; agents only
/// snapshot the current ordered sequence.
#[async_trait]
pub trait MessageManager: Send + Sync {
    /// Snapshot the ordered message sequence
    async fn get_messages(&self) -> Vec<Message>;
}

/// In-memory message manager for single-process use and testing
#[derive(Default)]
pub struct MemoryMessageManager {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MemoryMessageManager {
    /// Create a manager pre-seeded with history
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(messages)),
        }
    }

    /// Append a message to the history
    pub async fn add_message(&self, message: Message) {
        let mut messages = self.messages.write().await;
        messages.push(message);
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    /// True if no messages are stored
    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageManager for MemoryMessageManager {
    async fn get_messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_text_plain() {
        let content = MessageContent::Text("hello".to_string());
        assert_eq!(content.flattened_text(), "hello");
        assert!(!content.has_images());
    }

    #[test]
    fn test_flattened_text_drops_images_preserves_order() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "before ".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageSource {
                    url: "data:image/png;base64,xyz".to_string(),
                },
            },
            ContentPart::Text {
                text: "after".to_string(),
            },
        ]);

        assert!(content.has_images());
        assert_eq!(content.flattened_text(), "before after");
    }

    #[test]
    fn test_content_part_wire_format() {
        let part = ContentPart::Text {
            text: "hi".to_string(),
        };
        let json = serde_json::to_string(&part).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hi"}"#);

        let image: ContentPart =
            serde_json::from_str(r#"{"type":"image_url","imageUrl":{"url":"u"}}"#).unwrap();
        assert!(matches!(image, ContentPart::ImageUrl { .. }));
    }

    #[test]
    fn test_message_content_untagged_roundtrip() {
        let text: MessageContent = serde_json::from_str(r#""plain""#).unwrap();
        assert_eq!(text, MessageContent::Text("plain".to_string()));

        let parts: MessageContent =
            serde_json::from_str(r#"[{"type":"text","text":"a"}]"#).unwrap();
        assert!(matches!(parts, MessageContent::Parts(ref p) if p.len() == 1));
    }

    #[tokio::test]
    async fn test_memory_manager_snapshot() {
        let manager = MemoryMessageManager::default();
        assert!(manager.is_empty().await);

        manager.add_message(Message::system("instructions")).await;
        manager.add_message(Message::human("do the thing")).await;

        let snapshot = manager.get_messages().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, MessageRole::System);

        // Snapshot is a copy, not a live view
        manager.add_message(Message::ai("ok")).await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(manager.len().await, 3);
    }
}
