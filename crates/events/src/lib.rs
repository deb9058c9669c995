//! `orgspine-events` - append-only event log, emission API and dispatch seam.
//!
//! Events are the write model: immutable, versioned per stream, append-only.
//! Everything queryable is derived from them by projection handlers living in
//! the infrastructure layer; this crate only knows the dispatch *contract*.

pub mod dispatch;
pub mod emitter;
pub mod metadata;
pub mod notify;
pub mod record;
pub mod store;
pub mod stream;

pub use dispatch::{DispatchError, EventDispatcher};
pub use emitter::{EmitError, EmitOutcome, EmitReceipt, Emitter};
pub use metadata::EventMetadata;
pub use notify::{ChannelNotifier, Notification, NotificationChannel, NullNotifier};
pub use record::{DomainEvent, NewEvent};
pub use store::{EventStore, InMemoryEventStore, StoreError};
pub use stream::StreamType;
