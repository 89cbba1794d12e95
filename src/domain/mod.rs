//! # Domain Layer
//!
//! Contract model and the values that flow through requests and replies.
//!
//! - [`contract`]: contract types, the per-contract catalog and its document format
//! - [`typed_object`]: contract-shaped objects and the factory that creates them
//! - [`envelope`]: request metadata, reply trees and classified responses
//! - [`value_objects`]: severities, notifications and timestamps
//! - [`errors`]: contract-level error type

pub mod contract;
pub mod envelope;
pub mod errors;
pub mod typed_object;
pub mod value_objects;
