//! # Transport
//!
//! Request delivery: the [`Transport`] port, its HTTP and scripted
//! implementations, the payload codec and the [`TransportInvoker`].

pub mod codec;
pub mod error;
pub mod http_client;
pub mod http_transport;
pub mod in_memory;
pub mod invoker;
pub mod traits;

pub use error::{TransportError, TransportResult};
pub use http_client::HttpClient;
pub use http_transport::HttpTransport;
pub use in_memory::ScriptedTransport;
pub use invoker::TransportInvoker;
pub use traits::{OutboundRequest, Transport};
