use std::collections::HashMap;

use josekit::jwt::JwtPayload;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::types::OAuthError;

const DATE_CLAIMS: [&str; 5] = ["exp", "iat", "rat", "auth_time", "nbf"];

/// # IdTokenClaims
/// The claims of an OpenID Connect ID Token, shaped for handing to a JWT
/// signing library. Instants are Unix seconds; `None` means the claim is
/// absent. Claims the struct does not model go into `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdTokenClaims {
    /// JWT ID. When empty, [to_map](Self::to_map) generates a fresh UUID.
    pub jti: String,
    /// Issuer identifier of the authorization server
    pub issuer: String,
    /// Subject the token was issued for
    pub subject: String,
    /// Audiences of the token
    pub audience: Vec<String>,
    /// Value binding the token to the authorization request
    pub nonce: String,
    /// Expiry
    pub expires_at: Option<i64>,
    /// Time of issuance
    pub issued_at: Option<i64>,
    /// Time the underlying authorization request was made
    pub requested_at: Option<i64>,
    /// Time the end user last authenticated
    pub auth_time: Option<i64>,
    /// Access token hash (`at_hash`)
    pub access_token_hash: String,
    /// Authentication Context Class Reference (`acr`)
    pub authentication_context_class_reference: String,
    /// Authentication Methods Reference (`amr`)
    pub authentication_methods_reference: String,
    /// Authorization code hash (`c_hash`)
    pub code_hash: String,
    /// Additional claims, passed through verbatim unless a modeled field
    /// claims the same key
    pub extra: HashMap<String, Value>,
}

impl IdTokenClaims {
    /// Transforms the claims into a map for signing. Reserved keys are
    /// always controlled by the struct fields: a set field overwrites any
    /// `extra` entry of the same name, an unset one removes it. `jti` and
    /// `aud` are always present in the output. Numeric dates are encoded
    /// as doubles because several JWT signing libraries reject integer
    /// typed NumericDate values.
    pub fn to_map(&self) -> HashMap<String, Value> {
        let mut ret = self.extra.clone();

        if !self.subject.is_empty() {
            ret.insert("sub".to_string(), json!(self.subject));
        } else {
            ret.remove("sub");
        }

        if !self.issuer.is_empty() {
            ret.insert("iss".to_string(), json!(self.issuer));
        } else {
            ret.remove("iss");
        }

        if !self.jti.is_empty() {
            ret.insert("jti".to_string(), json!(self.jti));
        } else {
            ret.insert("jti".to_string(), json!(Uuid::new_v4().to_string()));
        }

        ret.insert("aud".to_string(), json!(self.audience));

        if let Some(issued_at) = self.issued_at {
            ret.insert("iat".to_string(), json!(issued_at as f64));
        } else {
            ret.remove("iat");
        }

        if let Some(expires_at) = self.expires_at {
            ret.insert("exp".to_string(), json!(expires_at as f64));
        } else {
            ret.remove("exp");
        }

        if let Some(requested_at) = self.requested_at {
            ret.insert("rat".to_string(), json!(requested_at as f64));
        } else {
            ret.remove("rat");
        }

        if let Some(auth_time) = self.auth_time {
            ret.insert("auth_time".to_string(), json!(auth_time as f64));
        } else {
            ret.remove("auth_time");
        }

        if !self.nonce.is_empty() {
            ret.insert("nonce".to_string(), json!(self.nonce));
        } else {
            ret.remove("nonce");
        }

        if !self.access_token_hash.is_empty() {
            ret.insert("at_hash".to_string(), json!(self.access_token_hash));
        } else {
            ret.remove("at_hash");
        }

        if !self.code_hash.is_empty() {
            ret.insert("c_hash".to_string(), json!(self.code_hash));
        } else {
            ret.remove("c_hash");
        }

        if !self.authentication_context_class_reference.is_empty() {
            ret.insert(
                "acr".to_string(),
                json!(self.authentication_context_class_reference),
            );
        } else {
            ret.remove("acr");
        }

        if !self.authentication_methods_reference.is_empty() {
            ret.insert(
                "amr".to_string(),
                json!(self.authentication_methods_reference),
            );
        } else {
            ret.remove("amr");
        }

        ret
    }

    /// Adds a key-value pair to the extra claims
    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// The value `key` would take in the shaped output
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().get(key).cloned()
    }

    /// Converts the shaped claims into a [JwtPayload]. The payload wants
    /// integer NumericDates, so the double encoding of
    /// [to_map](Self::to_map) is collapsed back to whole seconds here.
    pub fn to_payload(&self) -> Result<JwtPayload, OAuthError> {
        let mut map: Map<String, Value> = self.to_map().into_iter().collect();

        for claim in DATE_CLAIMS {
            if let Some(Value::Number(value)) = map.get(claim) {
                if let Some(seconds) = value.as_f64() {
                    map.insert(claim.to_string(), json!(seconds as i64));
                }
            }
        }

        JwtPayload::from_map(map).map_err(|e| {
            OAuthError::invalid_request("The ID Token claims do not form a valid JWT payload.")
                .with_debug(e.to_string())
        })
    }
}
