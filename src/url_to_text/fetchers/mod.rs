mod identity;
mod request;

pub use identity::{IdentityProfile, DEFAULT_IDENTITIES};
pub use request::{status_error, RequestFetcher};
