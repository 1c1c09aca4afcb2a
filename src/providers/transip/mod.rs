//! TransIP provider implementation

pub mod client;
pub mod error;
pub mod repository;
mod signer;
pub mod types;


pub use client::TransipClient;
pub use error::TransipError;
pub use repository::{Connector, DomainRepository, HttpConnector};
pub use types::{DnsEntry, to_dns_entry, to_rr};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::config::ClientConfiguration;
use crate::core::provider::DnsProvider;
use crate::core::record::{Record, RecordError};
use crate::error::Error;

/// An entry the registrar returned that does not parse as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: DnsEntry,
    pub error: RecordError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordListing {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedEntry>,
}

/// DNS provider backed by a TransIP account.
///
/// The repository session is opened on first use and kept for the lifetime
/// of the provider. A single lock covers session setup and every registrar
/// call, so at most one request per provider is in flight.
pub struct TransipProvider<C: Connector = HttpConnector> {
    config: ClientConfiguration,
    connector: C,
    repository: Mutex<Option<C::Repository>>,
}

impl TransipProvider<HttpConnector> {
    pub fn new(config: ClientConfiguration) -> Self {
        Self::with_connector(config, HttpConnector)
    }
}

impl<C: Connector> TransipProvider<C> {
    pub fn with_connector(config: ClientConfiguration, connector: C) -> Self {
        Self {
            config,
            connector,
            repository: Mutex::new(None),
        }
    }

    /// Open the repository session up front instead of on first use.
    pub async fn connect(config: ClientConfiguration, connector: C) -> Result<Self, Error> {
        let repository = connector.connect(&config).await.map_err(Error::Setup)?;
        info!("TransIP repository ready for {}", config.account_name);
        Ok(Self {
            config,
            connector,
            repository: Mutex::new(Some(repository)),
        })
    }

    // Must be called with the repository lock held.
    async fn setup_repository<'a>(
        &self,
        slot: &'a mut Option<C::Repository>,
    ) -> Result<&'a C::Repository, Error> {
        let repository = match slot.take() {
            Some(repository) => repository,
            None => {
                let repository = self
                    .connector
                    .connect(&self.config)
                    .await
                    .map_err(Error::Setup)?;
                info!("TransIP repository ready for {}", self.config.account_name);
                repository
            }
        };
        Ok(slot.insert(repository))
    }

    /// List a zone, keeping the entries that could not be parsed apart.
    pub async fn list_records_detailed(&self, zone: &str) -> Result<RecordListing, Error> {
        let mut guard = self.repository.lock().await;
        let repository = self.setup_repository(&mut guard).await?;

        let entries = repository
            .get_dns_entries(zone)
            .await
            .map_err(Error::Repository)?;

        let mut listing = RecordListing::default();
        for entry in entries {
            match to_rr(&entry).parse() {
                Ok(record) => listing.records.push(record),
                Err(error) => listing.skipped.push(SkippedEntry { entry, error }),
            }
        }
        Ok(listing)
    }
}

#[async_trait]
impl<C: Connector> DnsProvider for TransipProvider<C> {
    fn name(&self) -> &str {
        "transip"
    }

    /// Entries that do not parse are left out of the result and logged at
    /// `warn` level. Use [`TransipProvider::list_records_detailed`] to get
    /// them back.
    async fn list_records(&self, zone: &str) -> Result<Vec<Record>, Error> {
        let listing = self.list_records_detailed(zone).await?;
        for skipped in &listing.skipped {
            warn!(
                "Skipping {} entry {:?} in {}: {}",
                skipped.entry.entry_type, skipped.entry.name, zone, skipped.error
            );
        }
        Ok(listing.records)
    }

    async fn add_record(&self, zone: &str, record: Record) -> Result<Record, Error> {
        let mut guard = self.repository.lock().await;
        let repository = self.setup_repository(&mut guard).await?;

        let entry = to_dns_entry(&record.rr());
        debug!("Adding {} entry {:?} to {}", entry.entry_type, entry.name, zone);
        repository
            .add_dns_entry(zone, entry)
            .await
            .map_err(Error::Repository)?;
        Ok(record)
    }

    async fn update_record(&self, zone: &str, record: Record) -> Result<Record, Error> {
        let mut guard = self.repository.lock().await;
        let repository = self.setup_repository(&mut guard).await?;

        let entry = to_dns_entry(&record.rr());
        debug!("Updating {} entry {:?} in {}", entry.entry_type, entry.name, zone);
        repository
            .update_dns_entry(zone, entry)
            .await
            .map_err(Error::Repository)?;
        Ok(record)
    }

    async fn remove_record(&self, zone: &str, record: Record) -> Result<Record, Error> {
        let mut guard = self.repository.lock().await;
        let repository = self.setup_repository(&mut guard).await?;

        let entry = to_dns_entry(&record.rr());
        debug!("Removing {} entry {:?} from {}", entry.entry_type, entry.name, zone);
        repository
            .remove_dns_entry(zone, entry)
            .await
            .map_err(Error::Repository)?;
        Ok(record)
    }
}
