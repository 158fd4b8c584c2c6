//! Controlled List
//!
//! Two-way binding between a parent-owned JSON value and a locally edited
//! list, without feedback loops.
//!
//! - record: the record contract and the course learning item
//! - codec: JSON parsing, serialization, legacy value normalization
//! - synchronizer: local list state, echo suppression, reset keys
//! - validate: form-level checks on the serialized value

mod codec;
mod config;
mod ids;
mod record;
mod synchronizer;
mod validate;

pub use codec::{normalize_legacy, parse_items, serialize_items, CodecError};
pub use config::{ExternalChangePolicy, ListConfig};
pub use ids::{ClockIds, IdSource, SequentialIds};
pub use record::{LearningField, LearningItem, ListRecord, DEFAULT_EMOJI};
pub use synchronizer::{Added, ControlledList, Popover, Reconciliation};
pub use validate::{validate_learnings, LearningsError};
