use std::env;

pub const DEFAULT_API_URL: &str = "https://api.transip.nl/v6";

/// Settings for reaching the TransIP API.
///
/// Either `access_token` or `account_name` plus `private_key_path` must be
/// set. A pre-issued token takes precedence over key signing.
#[derive(Clone, Debug)]
pub struct ClientConfiguration {
    pub account_name: String,
    pub private_key_path: String,
    pub access_token: Option<String>,
    pub api_url: String,
    pub test_mode: bool,
}

impl ClientConfiguration {
    pub fn new(account_name: impl Into<String>, private_key_path: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            private_key_path: private_key_path.into(),
            access_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            test_mode: false,
        }
    }

    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(ClientConfiguration {
            account_name: env::var("TRANSIP_ACCOUNT_NAME")?,
            private_key_path: env::var("TRANSIP_PRIVATE_KEY_PATH").unwrap_or_default(),
            access_token: env::var("TRANSIP_ACCESS_TOKEN").ok(),
            api_url: env::var("TRANSIP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            test_mode: env::var("TRANSIP_TEST_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
