use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::ClientConfiguration;
use crate::providers::transip::error::TransipError;
use crate::providers::transip::repository::DomainRepository;
use crate::providers::transip::signer;
use crate::providers::transip::types::*;

const TOKEN_EXPIRATION: &str = "30 minutes";
const TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 60);
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
    value: String,
    // None for tokens issued outside this client; those are never refreshed.
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn fixed(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_fresh(&self) -> bool {
        self.expires_at
            .is_none_or(|at| Instant::now() + REFRESH_MARGIN < at)
    }
}

/// Session with the TransIP REST API.
pub struct TransipClient {
    client: Client,
    api_url: String,
    account_name: String,
    private_key_path: String,
    test_mode: bool,
    token: Mutex<AccessToken>,
}

impl TransipClient {
    pub async fn connect(config: &ClientConfiguration) -> Result<Self, TransipError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let api_url = config.api_url.trim_end_matches('/').to_string();

        let token = match &config.access_token {
            Some(token) => AccessToken::fixed(token.clone()),
            None => {
                if config.account_name.is_empty() || config.private_key_path.is_empty() {
                    return Err(TransipError::InvalidConfig(
                        "an access token or an account name and private key path are required"
                            .to_string(),
                    ));
                }
                Self::authenticate(
                    &client,
                    &api_url,
                    &config.account_name,
                    &config.private_key_path,
                )
                .await?
            }
        };

        info!(
            "Connected to TransIP API at {} as {}",
            api_url, config.account_name
        );

        Ok(Self {
            client,
            api_url,
            account_name: config.account_name.clone(),
            private_key_path: config.private_key_path.clone(),
            test_mode: config.test_mode,
            token: Mutex::new(token),
        })
    }

    async fn authenticate(
        client: &Client,
        api_url: &str,
        account_name: &str,
        private_key_path: &str,
    ) -> Result<AccessToken, TransipError> {
        let nonce = Uuid::new_v4().simple().to_string();
        let request = AuthRequest {
            login: account_name,
            label: format!("transip-dns-{nonce}"),
            nonce,
            read_only: false,
            expiration_time: TOKEN_EXPIRATION,
            global_key: true,
        };
        let body = serde_json::to_vec(&request)?;
        let signature = signer::sign(private_key_path, &body).await?;

        let response = client
            .post(format!("{api_url}/auth"))
            .header(CONTENT_TYPE, "application/json")
            .header("Signature", signature)
            .body(body)
            .send()
            .await?;
        let auth: AuthResponse = check_status(response).await?.json().await?;

        Ok(AccessToken {
            value: auth.token,
            expires_at: Some(Instant::now() + TOKEN_LIFETIME),
        })
    }

    async fn bearer(&self) -> Result<String, TransipError> {
        let mut token = self.token.lock().await;
        if !token.is_fresh() {
            debug!("Refreshing TransIP access token for {}", self.account_name);
            *token = Self::authenticate(
                &self.client,
                &self.api_url,
                &self.account_name,
                &self.private_key_path,
            )
            .await?;
        }
        Ok(token.value.clone())
    }

    async fn send(
        &self,
        method: Method,
        domain: &str,
        entry: Option<&DnsEntry>,
    ) -> Result<Response, TransipError> {
        let url = format!("{}/domains/{}/dns", self.api_url, domain);
        debug!("{method} {url}");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(self.bearer().await?);
        if self.test_mode {
            request = request.query(&[("test", "1")]);
        }
        if let Some(dns_entry) = entry {
            request = request.json(&DnsEntryRequest { dns_entry });
        }

        check_status(request.send().await?).await
    }
}

async fn check_status(response: Response) -> Result<Response, TransipError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.json::<ApiErrorBody>().await.ok();
    Err(TransipError::from_response(status.as_u16(), body))
}

#[async_trait]
impl DomainRepository for TransipClient {
    async fn get_dns_entries(&self, domain: &str) -> Result<Vec<DnsEntry>, TransipError> {
        let body: DnsEntriesResponse = self.send(Method::GET, domain, None).await?.json().await?;
        Ok(body.dns_entries)
    }

    async fn add_dns_entry(&self, domain: &str, entry: DnsEntry) -> Result<(), TransipError> {
        self.send(Method::POST, domain, Some(&entry)).await?;
        Ok(())
    }

    async fn remove_dns_entry(&self, domain: &str, entry: DnsEntry) -> Result<(), TransipError> {
        self.send(Method::DELETE, domain, Some(&entry)).await?;
        Ok(())
    }

    async fn update_dns_entry(&self, domain: &str, entry: DnsEntry) -> Result<(), TransipError> {
        self.send(Method::PATCH, domain, Some(&entry)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;
    use serde_json::json;
    use tokio_test::assert_ok;

    fn token_config(server: &MockServer) -> ClientConfiguration {
        ClientConfiguration {
            access_token: Some("test-token".into()),
            api_url: server.base_url(),
            ..Default::default()
        }
    }

    fn www_entry() -> DnsEntry {
        DnsEntry {
            name: "www".into(),
            expire: 300,
            entry_type: "A".into(),
            content: "192.0.2.1".into(),
        }
    }

    #[tokio::test]
    async fn test_list_entries_with_token() {
        let server = MockServer::start_async().await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/domains/example.com/dns")
                    .header("Authorization", "Bearer test-token");
                then.status(200).json_body(json!({
                    "dnsEntries": [
                        { "name": "www", "expire": 300, "type": "A", "content": "192.0.2.1" },
                        { "name": "@", "expire": 86400, "type": "MX", "content": "10 mail.example.com." }
                    ]
                }));
            })
            .await;

        let client = TransipClient::connect(&token_config(&server)).await.unwrap();
        let entries = client.get_dns_entries("example.com").await.unwrap();

        list_mock.assert_async().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], www_entry());
        assert_eq!(entries[1].entry_type, "MX");
    }

    #[tokio::test]
    async fn test_mutations_send_wrapped_entry() {
        let server = MockServer::start_async().await;
        let body = json!({
            "dnsEntry": { "name": "www", "expire": 300, "type": "A", "content": "192.0.2.1" }
        });
        let add_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/domains/example.com/dns")
                    .json_body(body.clone());
                then.status(201);
            })
            .await;
        let update_mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH)
                    .path("/domains/example.com/dns")
                    .json_body(body.clone());
                then.status(204);
            })
            .await;
        let remove_mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/domains/example.com/dns")
                    .json_body(body.clone());
                then.status(204);
            })
            .await;

        let client = TransipClient::connect(&token_config(&server)).await.unwrap();
        assert_ok!(client.add_dns_entry("example.com", www_entry()).await);
        assert_ok!(client.update_dns_entry("example.com", www_entry()).await);
        assert_ok!(client.remove_dns_entry("example.com", www_entry()).await);

        add_mock.assert_async().await;
        update_mock.assert_async().await;
        remove_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_test_mode_adds_query_param() {
        let server = MockServer::start_async().await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/domains/example.com/dns")
                    .query_param("test", "1");
                then.status(200).json_body(json!({ "dnsEntries": [] }));
            })
            .await;

        let config = ClientConfiguration {
            test_mode: true,
            ..token_config(&server)
        };
        let client = TransipClient::connect(&config).await.unwrap();
        let entries = client.get_dns_entries("example.com").await.unwrap();

        list_mock.assert_async().await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_body_is_surfaced() {
        let server = MockServer::start_async().await;
        let add_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/domains/example.com/dns");
                then.status(406)
                    .json_body(json!({ "error": "This is not a valid DNS entry" }));
            })
            .await;

        let client = TransipClient::connect(&token_config(&server)).await.unwrap();
        let result = client.add_dns_entry("example.com", www_entry()).await;

        add_mock.assert_async().await;
        assert_matches!(
            result,
            Err(TransipError::Api { status: 406, ref message }) if message == "This is not a valid DNS entry"
        );
    }

    #[tokio::test]
    async fn test_api_error_without_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/domains/example.com/dns");
                then.status(500);
            })
            .await;

        let client = TransipClient::connect(&token_config(&server)).await.unwrap();
        let result = client.get_dns_entries("example.com").await;
        assert_matches!(result, Err(TransipError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_connect_without_credentials() {
        let config = ClientConfiguration {
            account_name: String::new(),
            private_key_path: String::new(),
            ..Default::default()
        };
        let result = TransipClient::connect(&config).await;
        assert_matches!(result.err(), Some(TransipError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_connect_with_unreadable_key_does_not_call_api() {
        let server = MockServer::start_async().await;
        let auth_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth");
                then.status(201).json_body(json!({ "token": "signed-token" }));
            })
            .await;

        let config = ClientConfiguration {
            account_name: "example".into(),
            private_key_path: "/nonexistent/transip.key".into(),
            api_url: server.base_url(),
            ..Default::default()
        };
        let result = TransipClient::connect(&config).await;

        assert_matches!(result.err(), Some(TransipError::KeyFile { .. }));
        auth_mock.assert_hits_async(0).await;
    }

    #[test]
    fn test_token_freshness() {
        assert!(AccessToken::fixed("t".into()).is_fresh());

        let issued = AccessToken {
            value: "t".into(),
            expires_at: Some(Instant::now() + TOKEN_LIFETIME),
        };
        assert!(issued.is_fresh());

        let expiring = AccessToken {
            value: "t".into(),
            expires_at: Some(Instant::now() + Duration::from_secs(30)),
        };
        assert!(!expiring.is_fresh());
    }
}
