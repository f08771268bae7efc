//! ID Token claim shaping

mod id_token;

pub use id_token::IdTokenClaims;
