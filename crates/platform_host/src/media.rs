//! Media-capture collaborator contract.
//!
//! Live-view components need a camera or screen stream before their window
//! may exist. The engine acquires through this trait and releases the handle
//! once no visible live view remains.

use std::cell::RefCell;

use command_contract::MediaSource;

use crate::assistant::HostFuture;

/// Opaque handle to an acquired capture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaStreamHandle(pub u64);

/// Error surfaced when a capture source cannot be acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCaptureError {
    /// Source that was requested.
    pub source: MediaSource,
    /// Human-readable failure description.
    pub message: String,
}

impl std::fmt::Display for MediaCaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "media capture failed: {}", self.message)
    }
}

impl std::error::Error for MediaCaptureError {}

/// External capture-device backend.
pub trait MediaCaptureService {
    /// Acquires a stream for the given source. Permission denial and missing
    /// hardware surface as [`MediaCaptureError`].
    fn acquire<'a>(
        &'a self,
        source: MediaSource,
    ) -> HostFuture<'a, Result<MediaStreamHandle, MediaCaptureError>>;

    /// Releases a previously acquired stream. Releasing an unknown handle is
    /// a no-op.
    fn release(&self, handle: MediaStreamHandle);
}

#[derive(Debug, Clone, Copy, Default)]
/// Capture stub that denies every request, for permission-failure tests.
pub struct FailingMediaCaptureService;

impl MediaCaptureService for FailingMediaCaptureService {
    fn acquire<'a>(
        &'a self,
        source: MediaSource,
    ) -> HostFuture<'a, Result<MediaStreamHandle, MediaCaptureError>> {
        Box::pin(async move {
            Err(MediaCaptureError {
                source,
                message: "capture permission denied".to_string(),
            })
        })
    }

    fn release(&self, _handle: MediaStreamHandle) {}
}

#[derive(Debug, Default)]
/// Capture stub that grants every request and records handle lifecycles.
pub struct RecordingMediaCaptureService {
    next_handle: RefCell<u64>,
    released: RefCell<Vec<MediaStreamHandle>>,
}

impl RecordingMediaCaptureService {
    /// Handles released so far, in release order.
    pub fn released(&self) -> Vec<MediaStreamHandle> {
        self.released.borrow().clone()
    }

    /// Number of streams acquired so far.
    pub fn acquired_count(&self) -> u64 {
        *self.next_handle.borrow()
    }
}

impl MediaCaptureService for RecordingMediaCaptureService {
    fn acquire<'a>(
        &'a self,
        _source: MediaSource,
    ) -> HostFuture<'a, Result<MediaStreamHandle, MediaCaptureError>> {
        Box::pin(async move {
            let mut next = self.next_handle.borrow_mut();
            *next += 1;
            Ok(MediaStreamHandle(*next))
        })
    }

    fn release(&self, handle: MediaStreamHandle) {
        self.released.borrow_mut().push(handle);
    }
}
