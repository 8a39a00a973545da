use serde::{Deserialize, Serialize};

/// Where the bytes of an image block come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

impl ImageSource {
    pub fn base64<M: Into<String>, D: Into<String>>(media_type: M, data: D) -> Self {
        ImageSource::Base64 {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn url<U: Into<String>>(url: U) -> Self {
        ImageSource::Url { url: url.into() }
    }

    /// Render the source as a URL an `image_url` part accepts: a `data:` URI
    /// for embedded bytes, or the remote URL verbatim.
    pub fn to_url(&self) -> String {
        match self {
            ImageSource::Base64 { media_type, data } => {
                format!("data:{};base64,{}", media_type, data)
            }
            ImageSource::Url { url } => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// Content carried inside a tool result, text or image only
pub enum Content {
    Text { text: String },
    Image { source: ImageSource },
}

impl Content {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image(source: ImageSource) -> Self {
        Content::Image { source }
    }

    /// Get the text if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Tool result content is either a string shorthand or a block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResultContent {
    Text(String),
    Blocks(Vec<Content>),
}

impl Default for ToolResultContent {
    fn default() -> Self {
        ToolResultContent::Text(String::new())
    }
}

impl ToolResultContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ToolResultContent::Text(text.into())
    }

    pub fn blocks(blocks: Vec<Content>) -> Self {
        ToolResultContent::Blocks(blocks)
    }
}
