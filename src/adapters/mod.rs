// Adapters layer: concrete implementations of the domain ports.

pub mod clerk;
pub mod http;

pub use clerk::ClerkClient;
pub use http::ReqwestTransport;
