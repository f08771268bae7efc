#[cfg(test)]
mod when_authenticating_with_tls {
    use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};

    use crate::tests::helpers::setup;
    use crate::types::{ErrorKind, OidcAuthConfig, RegisteredClient, TokenRequest};

    /// A DER encoded self-signed certificate with the given common name
    fn client_certificate(common_name: &str) -> Vec<u8> {
        let key_pair = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, "ACME");
        dn.push(DnType::CommonName, common_name);
        params.distinguished_name = dn;

        params.self_signed(&key_pair).unwrap().der().to_vec()
    }

    fn tls_client(field: &str, value: &str) -> RegisteredClient {
        RegisteredClient {
            client_id: "acme".to_string(),
            certificate_subject_field: Some(field.to_string()),
            certificate_subject_value: Some(value.to_string()),
            oidc: Some(OidcAuthConfig {
                token_endpoint_auth_method: "tls_client_auth".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn tls_request(der: Vec<u8>) -> TokenRequest {
        TokenRequest::new()
            .form_param("client_id", "acme")
            .peer_certificate(der)
    }

    #[tokio::test]
    async fn a_matching_subject_authenticates() {
        let test = setup(vec![tls_client("DN", "CN=acme-client")]);

        let request = tls_request(client_certificate("acme-client"));

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("acme", client.client_id);
    }

    #[tokio::test]
    async fn a_mismatching_subject_is_rejected() {
        let test = setup(vec![tls_client("DN", "CN=acme-client")]);

        let request = tls_request(client_certificate("someone-else"));

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidRequest, err.kind);
        let debug = err.debug.unwrap();
        assert!(debug.contains("Given("));
        assert!(debug.contains("Expected(CN=acme-client)"));
    }

    #[tokio::test]
    async fn an_unsupported_subject_field_is_rejected() {
        let test = setup(vec![tls_client("SAN", "acme.example.org")]);

        let request = tls_request(client_certificate("acme-client"));

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidClient, err.kind);
        assert!(err
            .error_description
            .contains("Client certificate field not supported: SAN"));
    }

    #[tokio::test]
    async fn a_missing_client_id_is_rejected() {
        let test = setup(vec![tls_client("DN", "CN=acme-client")]);

        let request = TokenRequest::new().peer_certificate(client_certificate("acme-client"));

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidRequest, err.kind);
        assert!(err.error_description.contains("client_id"));
    }

    #[tokio::test]
    async fn a_client_registered_for_another_method_is_rejected() {
        let test = setup(vec![RegisteredClient {
            client_id: "acme".to_string(),
            certificate_subject_field: Some("DN".to_string()),
            certificate_subject_value: Some("CN=acme-client".to_string()),
            oidc: Some(OidcAuthConfig {
                token_endpoint_auth_method: "client_secret_basic".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let request = tls_request(client_certificate("acme-client"));

        let err = test
            .authenticator
            .authenticate_client(&request)
            .await
            .unwrap_err();

        assert_eq!(ErrorKind::InvalidRequest, err.kind);
        assert!(err.error_description.contains("client_secret_basic"));
    }

    #[tokio::test]
    async fn a_plain_oauth_client_may_use_tls_auth() {
        let test = setup(vec![RegisteredClient {
            client_id: "acme".to_string(),
            certificate_subject_field: Some("DN".to_string()),
            certificate_subject_value: Some("CN=acme-client".to_string()),
            ..Default::default()
        }]);

        let request = tls_request(client_certificate("acme-client"));

        let client = test.authenticator.authenticate_client(&request).await.unwrap();

        assert_eq!("acme", client.client_id);
    }
}
