use std::collections::HashMap;

use url::form_urlencoded;

/// # TokenRequest
/// The slice of an HTTP token endpoint request the authentication core
/// consumes: the `Authorization` header, the urlencoded form body and the
/// TLS peer certificate chain. The HTTP framework in front of the core is
/// expected to build one of these per request.
#[derive(Debug, Default, Clone)]
pub struct TokenRequest {
    /// Raw value of the `Authorization` header, if any
    pub(crate) authorization: Option<String>,
    /// Parsed `application/x-www-form-urlencoded` body
    pub(crate) form: HashMap<String, String>,
    /// DER encoded certificates presented by the TLS peer, leaf first
    pub(crate) peer_certificates: Vec<Vec<u8>>,
}

impl TokenRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` body into a request.
    /// Repeated parameters keep the last value.
    pub fn from_form_body(body: &str) -> Self {
        Self {
            form: form_urlencoded::parse(body.as_bytes()).into_owned().collect(),
            ..Self::default()
        }
    }

    /// Sets the raw `Authorization` header value
    pub fn authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }

    /// Sets a single form parameter
    pub fn form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    /// Appends a DER encoded TLS peer certificate
    pub fn peer_certificate(mut self, der: Vec<u8>) -> Self {
        self.peer_certificates.push(der);
        self
    }

    /// The form value for `name`, or the empty string when absent
    pub fn form_value(&self, name: &str) -> &str {
        self.form.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether the transport layer provided at least one peer certificate.
    /// This is the sole gate on attempting mutual TLS authentication; it
    /// does not matter where the TLS was terminated as long as the
    /// certificate chain was forwarded.
    pub fn has_peer_certificate(&self) -> bool {
        !self.peer_certificates.is_empty()
    }
}
