//! Domain and remote-call errors

mod domain_error;
mod remote_error;

pub use domain_error::DomainError;
pub use remote_error::RemoteError;
