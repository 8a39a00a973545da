use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{ImageSource, ToolResultContent};
use super::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// A single block inside a message body
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },

    /// Image input.
    Image { source: ImageSource },

    /// A tool invocation requested by the model. Only assistant turns may
    /// carry these.
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },

    /// The result of a previously requested tool invocation, linked by call
    /// id. Only user turns may carry these.
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: ToolResultContent,
    },
}

impl ContentBlock {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Get the text if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<(&str, &str, &Value)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// A message body: the wire format's string shorthand or a full block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Create a new user message with an empty block list
    pub fn user() -> Self {
        Message {
            role: Role::User,
            content: MessageContent::Blocks(Vec::new()),
        }
    }

    /// Create a new assistant message with an empty block list
    pub fn assistant() -> Self {
        Message {
            role: Role::Assistant,
            content: MessageContent::Blocks(Vec::new()),
        }
    }

    /// Replace the body with the plain string shorthand
    pub fn with_plain_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content = MessageContent::Text(text.into());
        self
    }

    /// Add any ContentBlock to the message
    pub fn with_content(mut self, block: ContentBlock) -> Self {
        match &mut self.content {
            MessageContent::Blocks(blocks) => blocks.push(block),
            MessageContent::Text(text) => {
                // Promote the string shorthand to a block list.
                let blocks = vec![
                    ContentBlock::Text {
                        text: std::mem::take(text),
                    },
                    block,
                ];
                self.content = MessageContent::Blocks(blocks);
            }
        }
        self
    }

    /// Add a text block to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(ContentBlock::text(text))
    }

    /// Add an image block to the message
    pub fn with_image(self, source: ImageSource) -> Self {
        self.with_content(ContentBlock::Image { source })
    }

    /// Add a tool use block to the message
    pub fn with_tool_use<I: Into<String>, N: Into<String>>(
        self,
        id: I,
        name: N,
        input: Value,
    ) -> Self {
        self.with_content(ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        })
    }

    /// Add a tool result block to the message
    pub fn with_tool_result<S: Into<String>>(
        self,
        tool_use_id: S,
        content: ToolResultContent,
    ) -> Self {
        self.with_content(ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content,
        })
    }
}
