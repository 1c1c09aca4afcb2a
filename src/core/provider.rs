use crate::core::record::Record;
use crate::error::Error;
use async_trait::async_trait;

/// Record management for the zones a provider hosts.
///
/// `zone` is the domain name as the registrar knows it, passed through
/// unchanged. Mutating calls hand the caller's record back on success.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    fn name(&self) -> &str;
    /// Records the provider cannot parse are dropped from the result and
    /// logged as a warning, not returned as an error.
    async fn list_records(&self, zone: &str) -> Result<Vec<Record>, Error>;
    async fn add_record(&self, zone: &str, record: Record) -> Result<Record, Error>;
    async fn update_record(&self, zone: &str, record: Record) -> Result<Record, Error>;
    async fn remove_record(&self, zone: &str, record: Record) -> Result<Record, Error>;
}
