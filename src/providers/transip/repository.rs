//! The registrar side of the provider: something that stores DNS entries per
//! domain, and something that knows how to open a session to it.

use async_trait::async_trait;

use crate::config::ClientConfiguration;
use crate::providers::transip::client::TransipClient;
use crate::providers::transip::error::TransipError;
use crate::providers::transip::types::DnsEntry;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn get_dns_entries(&self, domain: &str) -> Result<Vec<DnsEntry>, TransipError>;
    async fn add_dns_entry(&self, domain: &str, entry: DnsEntry) -> Result<(), TransipError>;
    async fn remove_dns_entry(&self, domain: &str, entry: DnsEntry) -> Result<(), TransipError>;
    async fn update_dns_entry(&self, domain: &str, entry: DnsEntry) -> Result<(), TransipError>;
}

/// Builds a repository session from account settings.
#[async_trait]
pub trait Connector: Send + Sync {
    type Repository: DomainRepository;

    async fn connect(
        &self,
        config: &ClientConfiguration,
    ) -> Result<Self::Repository, TransipError>;
}

/// Connects to the TransIP REST API.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

#[async_trait]
impl Connector for HttpConnector {
    type Repository = TransipClient;

    async fn connect(&self, config: &ClientConfiguration) -> Result<TransipClient, TransipError> {
        TransipClient::connect(config).await
    }
}
