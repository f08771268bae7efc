mod authenticator;
pub(crate) mod helpers;
