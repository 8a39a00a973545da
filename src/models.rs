//! These models represent the messages exchanged with LLM providers.
//!
//! There are two related formats we need to interact with:
//! - conversational messages, the extension's own schema built from typed
//!   content blocks (text, images, tool use, tool results)
//! - chat completion messages, sent to OpenAI-compatible endpoints
//!
//! The conversational schema is the internal representation. Outgoing
//! requests are converted to the chat completion format and responses are
//! converted back by `crate::providers::formats`, so the rest of the code
//! never touches the provider wire format directly.
pub mod completion;
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
