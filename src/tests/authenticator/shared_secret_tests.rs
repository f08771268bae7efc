#[cfg(test)]
mod when_client_secret_basic {
    use crate::tests::helpers::{basic_header, setup, shared_secret_client};
    use crate::types::{ErrorKind, TokenRequest};

    #[tokio::test]
    async fn authenticates_with_basic_header() {
        let test = setup(vec![shared_secret_client(
            "acme",
            "correct horse",
            "client_secret_basic",
        )]);

        let request =
            TokenRequest::new().authorization(basic_header("acme", "correct horse"));

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("acme", client.client_id);
    }

    #[tokio::test]
    async fn decodes_percent_encoded_credentials() {
        let test = setup(vec![shared_secret_client(
            "acme",
            "sécret:with/reserved",
            "client_secret_basic",
        )]);

        let request = TokenRequest::new()
            .authorization(basic_header("acme", "sécret:with/reserved"));

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("acme", client.client_id);
    }

    #[tokio::test]
    async fn rejects_credentials_in_form_body() {
        let test = setup(vec![shared_secret_client(
            "acme",
            "correct horse",
            "client_secret_basic",
        )]);

        let request = TokenRequest::new()
            .form_param("client_id", "acme")
            .form_param("client_secret", "correct horse");

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidClient, err.kind);
        assert!(err.error_description.contains("client_secret_basic"));
    }

    #[tokio::test]
    async fn rejects_a_wrong_secret() {
        let test = setup(vec![shared_secret_client(
            "acme",
            "correct horse",
            "client_secret_basic",
        )]);

        let request = TokenRequest::new().authorization(basic_header("acme", "battery staple"));

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidClient, err.kind);
        assert!(err.debug.is_some());
    }
}

#[cfg(test)]
mod when_client_secret_post {
    use crate::tests::helpers::{basic_header, setup, shared_secret_client};
    use crate::types::{ErrorKind, TokenRequest};

    #[tokio::test]
    async fn authenticates_with_body_credentials() {
        let test = setup(vec![shared_secret_client(
            "acme",
            "correct horse",
            "client_secret_post",
        )]);

        let request = TokenRequest::from_form_body(
            "grant_type=client_credentials&client_id=acme&client_secret=correct+horse",
        );

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("acme", client.client_id);
    }

    #[tokio::test]
    async fn rejects_the_basic_header() {
        let test = setup(vec![shared_secret_client(
            "acme",
            "correct horse",
            "client_secret_post",
        )]);

        let request = TokenRequest::new().authorization(basic_header("acme", "correct horse"));

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidClient, err.kind);
        assert!(err.error_description.contains("client_secret_post"));
    }
}

#[cfg(test)]
mod when_public_client {
    use crate::tests::helpers::setup;
    use crate::types::{ErrorKind, OidcAuthConfig, RegisteredClient, TokenRequest};

    fn public_client(method: &str) -> RegisteredClient {
        RegisteredClient {
            client_id: "spa".to_string(),
            public: true,
            oidc: Some(OidcAuthConfig {
                token_endpoint_auth_method: method.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn authenticates_without_a_secret() {
        let test = setup(vec![public_client("none")]);

        let request = TokenRequest::new().form_param("client_id", "spa");

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("spa", client.client_id);
        assert!(client.is_public());
    }

    #[tokio::test]
    async fn rejects_a_method_other_than_none() {
        let test = setup(vec![public_client("client_secret_basic")]);

        let request = TokenRequest::new().form_param("client_id", "spa");

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidClient, err.kind);
        assert!(err.error_description.contains("client_secret_basic"));
    }
}

#[cfg(test)]
mod when_plain_oauth_client {
    use crate::store::Sha256Hasher;
    use crate::tests::helpers::setup;
    use crate::types::{RegisteredClient, TokenRequest};

    #[tokio::test]
    async fn skips_method_enforcement() {
        let test = setup(vec![RegisteredClient {
            client_id: "legacy".to_string(),
            hashed_secret: Sha256Hasher::hash(b"correct horse"),
            ..Default::default()
        }]);

        let request = TokenRequest::new()
            .form_param("client_id", "legacy")
            .form_param("client_secret", "correct horse");

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("legacy", client.client_id);
    }
}

#[cfg(test)]
mod when_the_request_is_malformed {
    use crate::tests::helpers::setup;
    use crate::types::{ErrorKind, TokenRequest};

    #[tokio::test]
    async fn missing_credentials_fail_with_invalid_request() {
        let test = setup(vec![]);

        let err = test
            .authenticator
            .authenticate_client(&TokenRequest::new())
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidRequest, err.kind);
        assert!(err.error_description.contains("missing or malformed"));
    }

    #[tokio::test]
    async fn unknown_assertion_type_fails_with_invalid_request() {
        let test = setup(vec![]);

        let request = TokenRequest::new()
            .form_param("client_assertion_type", "urn:example:unknown")
            .form_param("client_assertion", "irrelevant");

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidRequest, err.kind);
        assert!(err
            .error_description
            .contains("Unknown client_assertion_type 'urn:example:unknown'"));
    }

    #[tokio::test]
    async fn a_missing_assertion_fails_with_invalid_request() {
        let test = setup(vec![]);

        let request = TokenRequest::new().form_param(
            "client_assertion_type",
            crate::CLIENT_ASSERTION_JWT_BEARER_TYPE,
        );

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidRequest, err.kind);
        assert!(err
            .error_description
            .contains("client_assertion request parameter must be set"));
    }

    #[tokio::test]
    async fn unknown_client_fails_with_invalid_client() {
        let test = setup(vec![]);

        let request = TokenRequest::new()
            .form_param("client_id", "ghost")
            .form_param("client_secret", "anything");

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidClient, err.kind);
        assert!(err.debug.is_some());
    }
}
