use std::fmt;

/// The category an [OAuthError] belongs to. Each kind maps to a stable
/// error code suitable for the `error` member of an RFC 6749 error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request is missing a parameter or is otherwise malformed
    InvalidRequest,
    /// Client authentication failed
    InvalidClient,
    /// The client assertion's `jti` was already used
    JtiKnown,
    /// The authorization server itself is not set up correctly
    Misconfiguration,
    /// A collaborator (store, fetcher, hasher) failed
    StoreError,
}

impl ErrorKind {
    /// The wire-level error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::InvalidClient => "invalid_client",
            ErrorKind::JtiKnown => "jti_known",
            ErrorKind::Misconfiguration => "misconfiguration",
            ErrorKind::StoreError => "store_error",
        }
    }
}

/// # OAuthError
/// Error returned from the client authentication core. The
/// `error_description` is safe to hand back to the client as the RFC 6749
/// `error_description` member; `debug` carries the underlying cause and is
/// meant for operator logs only.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthError {
    /// Error kind, mapping to the wire-level `error` code
    pub kind: ErrorKind,
    /// Human readable hint, returned to the client
    pub error_description: String,
    /// Underlying cause. Never returned to the client.
    pub debug: Option<String>,
}

impl OAuthError {
    /// Creates a new instance of the [OAuthError]
    pub fn new(kind: ErrorKind, error_description: &str) -> Self {
        Self {
            kind,
            error_description: error_description.to_string(),
            debug: None,
        }
    }

    /// Creates an `invalid_request` error
    pub fn invalid_request(error_description: &str) -> Self {
        Self::new(ErrorKind::InvalidRequest, error_description)
    }

    /// Creates an `invalid_client` error
    pub fn invalid_client(error_description: &str) -> Self {
        Self::new(ErrorKind::InvalidClient, error_description)
    }

    /// Creates a `jti_known` error
    pub fn jti_known(error_description: &str) -> Self {
        Self::new(ErrorKind::JtiKnown, error_description)
    }

    /// Creates a `misconfiguration` error
    pub fn misconfiguration(error_description: &str) -> Self {
        Self::new(ErrorKind::Misconfiguration, error_description)
    }

    /// Creates a `store_error` error
    pub fn store_error(error_description: &str) -> Self {
        Self::new(ErrorKind::StoreError, error_description)
    }

    /// Attaches the underlying cause
    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = Some(debug.into());
        self
    }

    /// The wire-level error code
    pub fn error(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.error_description)
    }
}

impl std::error::Error for OAuthError {}
