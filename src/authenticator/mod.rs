//! The token endpoint client authentication flow: method negotiation,
//! shared secret validation, signed assertion verification and mutual TLS

mod assertion;
#[allow(clippy::module_inception)]
mod authenticator;
mod credentials;
mod mtls;

pub use authenticator::{Authenticator, CLIENT_ASSERTION_JWT_BEARER_TYPE};
