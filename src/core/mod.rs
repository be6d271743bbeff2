pub mod batch;
pub mod student;
pub mod verifier;

pub use crate::domain::model::{
    DomainLookup, GithubToken, OutboundRequest, SessionState, StudentStatus,
};
pub use crate::domain::ports::{ConfigProvider, HttpTransport, SessionAuthenticator};
pub use crate::utils::error::Result;
