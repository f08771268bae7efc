use josekit::{
    jwk::Jwk,
    jws::{
        alg::{ecdsa::EcdsaJwsAlgorithm, rsassa::RsassaJwsAlgorithm, rsassa_pss::RsassaPssJwsAlgorithm},
        JwsVerifier,
    },
};
use serde::{Deserialize, Serialize};

use crate::types::OAuthError;

/// The asymmetric key family a signing algorithm requires. Client
/// assertions must be signed with an asymmetric key; HMAC algorithms have
/// no family here and are rejected before key resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningKeyFamily {
    /// RSASSA-PKCS1-v1_5 and RSASSA-PSS signatures, verified with an RSA key
    Rsa,
    /// ECDSA signatures, verified with an EC key
    Ecdsa,
}

impl SigningKeyFamily {
    /// The family required by a JWS `alg` value, per RFC 7518. `None` for
    /// HMAC and unrecognized algorithms.
    pub fn for_algorithm(alg: &str) -> Option<SigningKeyFamily> {
        match alg.get(0..2) {
            Some("RS") | Some("PS") => Some(SigningKeyFamily::Rsa),
            Some("ES") => Some(SigningKeyFamily::Ecdsa),
            _ => None,
        }
    }

    /// The JWK `kty` value keys of this family carry
    pub(crate) fn key_type(&self) -> &'static str {
        match self {
            SigningKeyFamily::Rsa => "RSA",
            SigningKeyFamily::Ecdsa => "EC",
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            SigningKeyFamily::Rsa => "RSA",
            SigningKeyFamily::Ecdsa => "ECDSA",
        }
    }
}

pub(crate) trait CustomJwk {
    fn to_verifier(&self, alg: &str) -> Result<Box<dyn JwsVerifier>, OAuthError>;
}

impl CustomJwk for Jwk {
    fn to_verifier(&self, alg: &str) -> Result<Box<dyn JwsVerifier>, OAuthError> {
        let error = |e: josekit::JoseError| {
            OAuthError::invalid_client("The registered JSON Web Key cannot verify this signature.")
                .with_debug(e.to_string())
        };

        match alg {
            "RS256" => {
                let algorithm = RsassaJwsAlgorithm::Rs256;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "RS384" => {
                let algorithm = RsassaJwsAlgorithm::Rs384;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "RS512" => {
                let algorithm = RsassaJwsAlgorithm::Rs512;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "PS256" => {
                let algorithm = RsassaPssJwsAlgorithm::Ps256;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "PS384" => {
                let algorithm = RsassaPssJwsAlgorithm::Ps384;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "PS512" => {
                let algorithm = RsassaPssJwsAlgorithm::Ps512;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "ES256" => {
                let algorithm = EcdsaJwsAlgorithm::Es256;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "ES384" => {
                let algorithm = EcdsaJwsAlgorithm::Es384;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            "ES512" => {
                let algorithm = EcdsaJwsAlgorithm::Es512;
                Ok(Box::new(algorithm.verifier_from_jwk(self).map_err(error)?))
            }
            _ => Err(OAuthError::invalid_client(&format!(
                "The 'client_assertion' request parameter uses unsupported signing algorithm '{}'.",
                alg
            ))),
        }
    }
}

/// Jwks that wraps a list of [josekit::jwk::Jwk]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Jwks {
    keys: Vec<Jwk>,
}

impl From<Vec<Jwk>> for Jwks {
    fn from(value: Vec<Jwk>) -> Self {
        Self { keys: value }
    }
}

impl Jwks {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Finds the verification key for a client assertion. When the JWT
    /// header declared a `kid` the candidate set is restricted to keys with
    /// that identifier first; within the candidates, the first key marked
    /// `use=sig` whose type matches the required family wins.
    pub(crate) fn find_verification_key(
        &self,
        kid: Option<&str>,
        family: SigningKeyFamily,
    ) -> Result<&Jwk, OAuthError> {
        if self.keys.is_empty() {
            return Err(OAuthError::invalid_request(
                "The retrieved JSON Web Key Set does not contain any keys.",
            ));
        }

        let candidates: Vec<&Jwk> = match kid {
            Some(kid) => self
                .keys
                .iter()
                .filter(|key| key.key_id() == Some(kid))
                .collect(),
            None => self.keys.iter().collect(),
        };

        if candidates.is_empty() {
            return Err(OAuthError::invalid_request(&format!(
                "The JSON Web Token uses signing key with kid '{}', which could not be found.",
                kid.unwrap_or_default()
            )));
        }

        candidates
            .into_iter()
            .find(|key| key.key_use() == Some("sig") && key.key_type() == family.key_type())
            .ok_or_else(|| {
                OAuthError::invalid_request(&format!(
                    "Unable to find {} public key with use='sig' for kid '{}' in JSON Web Key Set.",
                    family.name(),
                    kid.unwrap_or_default()
                ))
            })
    }
}
