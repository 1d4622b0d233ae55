//! Brand change events
//!
//! The write path publishes one event per affected brand after its store
//! commit succeeds. Sinks decide how the event reaches its handler: inline on
//! the publishing thread, or queued to background workers
//! (see [`crate::dispatcher::EventDispatcher`]).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use catalog_core::{BrandId, Result};

/// Something changed about a brand's qualifying products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrandEvent {
    /// A product of the brand was created, updated or deleted, or the brand
    /// was renamed
    Changed(BrandId),
    /// The brand and all its products were deleted
    Deleted(BrandId),
}

impl BrandEvent {
    /// Brand the event is about
    pub fn brand_id(&self) -> BrandId {
        match self {
            BrandEvent::Changed(id) | BrandEvent::Deleted(id) => *id,
        }
    }
}

impl fmt::Display for BrandEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrandEvent::Changed(id) => write!(f, "BrandChanged({})", id),
            BrandEvent::Deleted(id) => write!(f, "BrandDeleted({})", id),
        }
    }
}

/// Consumer of brand events
pub trait EventHandler: Send + Sync {
    /// Apply one event
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be applied; the sink decides
    /// whether to retry or drop it.
    fn handle(&self, event: &BrandEvent) -> Result<()>;
}

/// Destination for events published after a commit
pub trait EventSink: Send + Sync {
    /// Hand an event over for delivery
    ///
    /// Never fails the caller: the commit that produced the event is already
    /// durable.
    fn publish(&self, event: BrandEvent);
}

/// Sink that runs the handler on the publishing thread
pub struct InlineSink {
    handler: Arc<dyn EventHandler>,
}

impl InlineSink {
    /// Deliver every event straight to `handler`
    pub fn new(handler: Arc<dyn EventHandler>) -> Self {
        Self { handler }
    }
}

impl EventSink for InlineSink {
    fn publish(&self, event: BrandEvent) {
        if let Err(e) = self.handler.handle(&event) {
            warn!(
                target: "catalog::events",
                event = %event,
                error = %e,
                "Event handler failed, event dropped"
            );
        }
    }
}

/// Sink that records events instead of delivering them
///
/// Useful to observe what the write path publishes.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: parking_lot::Mutex<Vec<BrandEvent>>,
}

impl RecordingSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every event recorded so far
    pub fn take(&self) -> Vec<BrandEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: BrandEvent) {
        self.events.lock().push(event);
    }
}
