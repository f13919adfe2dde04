//! Assistant collaborator contract.
//!
//! The runtime treats the language model as an external service behind this
//! trait: it hands over a prompt plus pre-built context and receives the
//! complete reply text. Streaming, transport, and model selection are the
//! adapter's concern.

use std::{cell::RefCell, collections::VecDeque, future::Future, pin::Pin};

/// Object-safe boxed future used by host collaborator traits.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Error surfaced by an assistant backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantError {
    /// Human-readable failure description.
    pub message: String,
}

impl AssistantError {
    /// Creates an assistant error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AssistantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assistant call failed: {}", self.message)
    }
}

impl std::error::Error for AssistantError {}

/// External language-model backend.
pub trait AssistantService {
    /// Generates a complete reply for a prompt. The `context` string is the
    /// serialized workspace snapshot the runtime attaches to every request.
    fn generate_reply<'a>(
        &'a self,
        prompt: &'a str,
        context: &'a str,
    ) -> HostFuture<'a, Result<String, AssistantError>>;

    /// Asks for a single game move. The reply is expected to be a bare cell
    /// number; callers validate it and fall back on anything else.
    fn suggest_move<'a>(
        &'a self,
        prompt: &'a str,
    ) -> HostFuture<'a, Result<String, AssistantError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Assistant stub that fails every call, for offline and baseline tests.
pub struct NoopAssistantService;

impl AssistantService for NoopAssistantService {
    fn generate_reply<'a>(
        &'a self,
        _prompt: &'a str,
        _context: &'a str,
    ) -> HostFuture<'a, Result<String, AssistantError>> {
        Box::pin(async { Err(AssistantError::new("no assistant backend configured")) })
    }

    fn suggest_move<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> HostFuture<'a, Result<String, AssistantError>> {
        Box::pin(async { Err(AssistantError::new("no assistant backend configured")) })
    }
}

#[derive(Debug, Default)]
/// Assistant stub that replays queued replies in order, for tests.
///
/// Both trait methods drain the same queue. An exhausted queue fails the
/// call, which exercises the callers' fallback paths.
pub struct ScriptedAssistantService {
    replies: RefCell<VecDeque<String>>,
}

impl ScriptedAssistantService {
    /// Queues replies to be returned by subsequent calls.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: RefCell::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    fn next_reply(&self) -> Result<String, AssistantError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| AssistantError::new("scripted replies exhausted"))
    }
}

impl AssistantService for ScriptedAssistantService {
    fn generate_reply<'a>(
        &'a self,
        _prompt: &'a str,
        _context: &'a str,
    ) -> HostFuture<'a, Result<String, AssistantError>> {
        Box::pin(async move { self.next_reply() })
    }

    fn suggest_move<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> HostFuture<'a, Result<String, AssistantError>> {
        Box::pin(async move { self.next_reply() })
    }
}
