//! Shared wire contracts for assistant-issued UI commands.
//!
//! This crate is intentionally runtime-agnostic. It defines the serializable
//! command batch the assistant emits, the loosely-typed creation/update
//! payloads, and the reply parser that separates conversational prose from
//! the fenced command payload. It does not depend on the window model or any
//! host adapter.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Verb of a single UI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandAction {
    /// Create a window (singletons are revealed instead of duplicated).
    Create,
    /// Merge a partial spec into an existing window or component.
    Update,
    /// Remove a window or component by id.
    Delete,
    /// Capture a component's visible content into the clipboard slot.
    Copy,
    /// Append the clipboard slot to a component's value.
    Paste,
}

impl CommandAction {
    /// Returns the wire token, used verbatim in audit notifications.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Copy => "COPY",
            Self::Paste => "PASTE",
        }
    }
}

/// Addressed element class of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Top-level window.
    Window,
    /// Component inside some window.
    Component,
}

impl ElementKind {
    /// Returns the wire token, used verbatim in audit notifications.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Component => "component",
        }
    }
}

/// Window geometry in percent coordinates of the workspace (`0..=100`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl UiRect {
    /// Convenience constructor used by engine defaults and tests.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Component class tokens accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// Static text.
    Label,
    /// Clickable button, usually carrying an `action` token.
    Button,
    /// Single-line input.
    Input,
    /// Multi-line input.
    Textarea,
    /// Image display.
    Image,
    /// Embedded page.
    Iframe,
    /// Live media view backed by a captured stream.
    LiveView,
}

/// Capture source for a live-view component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    /// Webcam stream.
    Camera,
    /// Screen-share stream.
    Screen,
}

/// Partial component payload carried by CREATE/UPDATE specs.
///
/// Every field is optional; absent fields leave the target untouched on
/// UPDATE and fall back to defaults on CREATE.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    /// Stable component identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Component class.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ComponentKind>,
    /// Sub-rect within the owning window, percent coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<UiRect>,
    /// Display text for labels and buttons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Placeholder for inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Source URL for images and iframes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Current value for inputs, textareas, and buttons carrying payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Namespaced interaction token such as `calculator:digit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Semantic role such as `calculator-display`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Capture source for live views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MediaSource>,
    /// Assistant prompt dispatched when the component is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Free-form style hints, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

/// Partial window payload carried by CREATE/UPDATE specs.
///
/// The assistant mixes window and component fields into one loosely-typed
/// object, so this struct carries both; the engine reads the fields relevant
/// to the addressed element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    /// Explicit window identifier. Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Window kind token such as `calculator` or `encrypted-note`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_type: Option<String>,
    /// Alias for [`Self::window_type`] accepted from older assistant output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Window title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Window geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<UiRect>,
    /// Visibility override; honored even when `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    /// Secure item name targeted by encrypted-note windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    /// Secure item kind (`note` or `photo`) when provisioning via CREATE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Countdown length in seconds for timer and focus windows. This field
    /// alone is snake_case on the wire.
    #[serde(
        default,
        rename = "timer_duration_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub timer_duration_seconds: Option<u64>,
    /// Initial components for the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentSpec>>,
    /// One-level-deep internal-state patch, interpreted per window kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_state: Option<Value>,

    // Component fields, read when the command addresses a component.
    /// Component class.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub component_kind: Option<ComponentKind>,
    /// Display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Input placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Image/iframe source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Current value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Namespaced interaction token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Semantic role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Capture source for live views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MediaSource>,
    /// Assistant prompt dispatched on activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Free-form style hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

impl CommandSpec {
    /// Projects the component fields of this spec into a component payload,
    /// for commands that address a component.
    pub fn as_component_spec(&self) -> ComponentSpec {
        ComponentSpec {
            id: self.id.clone(),
            kind: self.component_kind,
            rect: self.rect,
            text: self.text.clone(),
            placeholder: self.placeholder.clone(),
            src: self.src.clone(),
            value: self.value.clone(),
            action: self.action.clone(),
            role: self.role.clone(),
            source: self.source,
            prompt: self.prompt.clone(),
            style: self.style.clone(),
        }
    }
}

/// One assistant-issued UI command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiCommand {
    /// Command verb.
    pub action: CommandAction,
    /// Addressed element class.
    pub element_type: ElementKind,
    /// Target identifier for UPDATE and DELETE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Creation/update payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<CommandSpec>,
    /// COPY source component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_component_id: Option<String>,
    /// PASTE destination component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_component_id: Option<String>,
}

impl UiCommand {
    /// Resolves the identifier quoted in the audit notification for this
    /// command: the target id, then the spec id, then the spec note name,
    /// then the copy source.
    pub fn audit_target(&self) -> &str {
        self.target_id
            .as_deref()
            .or_else(|| self.spec.as_ref().and_then(|s| s.id.as_deref()))
            .or_else(|| self.spec.as_ref().and_then(|s| s.note_name.as_deref()))
            .or(self.source_component_id.as_deref())
            .unwrap_or("")
    }

    /// Formats the audit notification line for this command.
    pub fn audit_line(&self) -> String {
        format!(
            "{} {} {}",
            self.action.as_str(),
            self.element_type.as_str(),
            self.audit_target()
        )
        .trim_end()
        .to_string()
    }
}

/// Error raised while extracting commands from an assistant reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplyParseError {
    /// The fenced payload was not valid JSON or did not match the command
    /// schema. Carries the raw block so callers can surface it verbatim.
    #[error("invalid command payload: {message}")]
    InvalidPayload {
        /// Deserializer message.
        message: String,
        /// Raw text of the fenced block.
        raw: String,
    },
}

/// Outcome of parsing one complete assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    /// No fenced payload; the whole reply is conversational prose.
    Prose,
    /// A fenced payload validated into an ordered command batch.
    Commands(Vec<UiCommand>),
}

/// Extracts the first fenced ```json block from a reply, if any.
///
/// Matching is lazy: the block ends at the first closing fence. Returns the
/// trimmed inner text.
pub fn extract_json_block(reply: &str) -> Option<&str> {
    let start = reply.find("```json")?;
    let body = &reply[start + "```json".len()..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Parses a complete assistant reply into prose or a command batch.
///
/// A single JSON object and a JSON array of objects are both accepted; the
/// object form becomes a one-element batch. Streamed replies must be
/// accumulated before calling this.
///
/// # Errors
///
/// Returns [`ReplyParseError::InvalidPayload`] when a fenced block exists
/// but does not deserialize into commands.
pub fn parse_reply(reply: &str) -> Result<ParsedReply, ReplyParseError> {
    let Some(block) = extract_json_block(reply) else {
        return Ok(ParsedReply::Prose);
    };
    let invalid = |e: serde_json::Error| ReplyParseError::InvalidPayload {
        message: e.to_string(),
        raw: block.to_string(),
    };
    let value: Value = serde_json::from_str(block).map_err(invalid)?;
    let commands = match value {
        Value::Array(_) => serde_json::from_value::<Vec<UiCommand>>(value).map_err(invalid)?,
        _ => vec![serde_json::from_value::<UiCommand>(value).map_err(invalid)?],
    };
    Ok(ParsedReply::Commands(commands))
}
