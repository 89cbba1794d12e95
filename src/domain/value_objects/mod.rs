//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`Severity`]: ordered outcome classification of a service reply
//! - [`Notification`]: one coded message attached to a reply
//! - [`Timestamp`]: UTC timestamp used for ship dates and delivery times

pub mod notification;
pub mod severity;
pub mod timestamp;

pub use notification::Notification;
pub use severity::{ParseSeverityError, Severity};
pub use timestamp::Timestamp;
