//! # Types Module
//! The client record, request and error types of the authentication core

mod client;
mod errors;
mod token_request;

pub use client::{OidcAuthConfig, RegisteredClient};
pub use errors::{ErrorKind, OAuthError};
pub use token_request::TokenRequest;
