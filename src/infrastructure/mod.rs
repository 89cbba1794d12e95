//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`transport`]: the transport port, HTTP and scripted transports, codec, invoker
//! - [`contract`]: contract locations, loaders and the catalog registry
//! - [`config`]: service configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod contract;
pub mod telemetry;
pub mod transport;
