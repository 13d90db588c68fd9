//! Transcript record shapes for Claude Code JSONL files.
//!
//! Records are decoded leniently: every field is optional and a field with an
//! unexpected JSON type decodes to `None` instead of failing the whole line.
//! Only the fields the classification rules need are projected.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::Value;

use crate::models::lenient::{is_truthy, lenient};


/// Markers that identify slash-command traffic rather than a typed prompt.
const COMMAND_MARKERS: [&str; 2] = ["<command-name>", "<local-command-stdout>"];


/// One line of a transcript.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub record_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<String>,
    /// Raw value; any truthy JSON marks the record as meta.
    #[serde(default)]
    pub is_meta: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<Message>,
}


/// The nested `message` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<MessageContent>,
}


/// Message content is either plain text or a list of blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    Other(Value),
}


/// A structured content block (`text`, `tool_use`, `tool_result`, ...).
///
/// Decodes from any JSON value; non-objects become an empty block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ContentBlock {
    pub block_type: Option<String>,
    pub text: Option<String>,
    pub input: Option<Value>,
    pub content: Vec<ContentBlock>,
}


impl From<Value> for ContentBlock {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let block_type = map.get("type").and_then(Value::as_str).map(String::from);
        let text = map.get("text").and_then(Value::as_str).map(String::from);
        let input = map.remove("input").filter(|v| !v.is_null());
        let content = match map.remove("content") {
            Some(Value::Array(items)) => items.into_iter().map(Self::from).collect(),
            _ => Vec::new(),
        };

        Self { block_type, text, input, content }
    }
}


/// Model family an assistant response is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Opus,
    Sonnet,
    Unattributed,
}


impl ModelFamily {
    /// Case-insensitive substring match on the model identifier.
    pub fn from_model_id(model: &str) -> Self {
        let model = model.to_lowercase();
        if model.contains("opus") {
            Self::Opus
        } else if model.contains("sonnet") {
            Self::Sonnet
        } else {
            Self::Unattributed
        }
    }
}


/// What a record counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A user-typed prompt that counts toward usage.
    UserPrompt,
    /// A user record that is meta, internal, empty or a command.
    UserOther,
    Assistant(ModelFamily),
    Unrecognized,
}


impl TranscriptRecord {
    /// Classify this record for session counters.
    pub fn classify(&self) -> RecordKind {
        match self.record_type.as_deref() {
            Some("user") if self.is_qualifying_prompt() => RecordKind::UserPrompt,
            Some("user") => RecordKind::UserOther,
            Some("assistant") => {
                let model = self
                    .message
                    .as_ref()
                    .and_then(|m| m.model.as_deref())
                    .unwrap_or("");
                RecordKind::Assistant(ModelFamily::from_model_id(model))
            }
            _ => RecordKind::Unrecognized,
        }
    }

    fn is_qualifying_prompt(&self) -> bool {
        let Some(message) = &self.message else {
            return false;
        };

        if message.role.as_deref() != Some("user")
            || self.is_meta.as_ref().is_some_and(is_truthy)
            || self.user_type.as_deref() != Some("external")
        {
            return false;
        }

        match &message.content {
            Some(content) => !content.is_empty() && !content.is_command_message(),
            None => false,
        }
    }

    /// Characters of visible text carried by this record, for token estimation.
    ///
    /// Only user and assistant records carry countable content.
    pub fn content_chars(&self) -> usize {
        if !matches!(self.record_type.as_deref(), Some("user" | "assistant")) {
            return 0;
        }

        match self.message.as_ref().and_then(|m| m.content.as_ref()) {
            Some(MessageContent::Text(text)) => text.chars().count(),
            Some(MessageContent::Blocks(blocks)) => blocks.iter().map(ContentBlock::chars).sum(),
            _ => 0,
        }
    }
}


impl MessageContent {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Blocks(blocks) => blocks.is_empty(),
            Self::Other(value) => !is_truthy(value),
        }
    }

    /// True for slash-command invocations and their captured output.
    pub fn is_command_message(&self) -> bool {
        match self {
            Self::Text(text) => contains_command_marker(text),
            Self::Blocks(blocks) => blocks.iter().any(|block| {
                block.block_type.as_deref() == Some("text")
                    && block.text.as_deref().is_some_and(contains_command_marker)
            }),
            Self::Other(_) => false,
        }
    }
}


impl ContentBlock {
    /// Text length, serialized tool input length, and nested text.
    ///
    /// Empty or falsy tool input counts as nothing.
    fn chars(&self) -> usize {
        let text = self.text.as_deref().map_or(0, |t| t.chars().count());
        let input = self
            .input
            .as_ref()
            .filter(|input| is_truthy(input))
            .map_or(0, spaced_json_len);
        let nested: usize = self.content.iter().map(ContentBlock::nested_text_chars).sum();
        text + input + nested
    }

    fn nested_text_chars(&self) -> usize {
        let own = self.text.as_deref().map_or(0, |t| t.chars().count());
        own + self.content.iter().map(ContentBlock::nested_text_chars).sum::<usize>()
    }
}


fn contains_command_marker(text: &str) -> bool {
    COMMAND_MARKERS.iter().any(|marker| text.contains(marker))
}


/// Length of `value` serialized with `", "` and `": "` separators and
/// non-ASCII characters written as `\uXXXX` escapes.
fn spaced_json_len(value: &Value) -> usize {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
    match value.serialize(&mut serializer) {
        Ok(()) => out.len(),
        Err(_) => 0,
    }
}


/// JSON formatter with spaced separators and ASCII-only output.
struct SpacedAsciiFormatter;


impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
