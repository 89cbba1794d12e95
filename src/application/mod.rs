//! # Application Layer
//!
//! Request builders and reply classification.
//!
//! - [`request_builder`]: generic per-operation builder and sender
//! - [`rate`]: the rate operation
//! - [`classifier`]: severity aggregation and rejection
//! - [`error`]: errors surfaced to callers

pub mod classifier;
pub mod error;
pub mod rate;
pub mod request_builder;

pub use classifier::ResponseClassifier;
pub use error::{ClientError, ClientResult};
pub use rate::{Money, RateReplyDetail, RateRequestBuilder};
pub use request_builder::{ClientSettings, RequestBuilder};
