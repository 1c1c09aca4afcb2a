//! DNS record management for domains hosted at TransIP.
//!
//! [`TransipProvider`] implements [`DnsProvider`] by translating generic
//! resource records into TransIP DNS entries and back. The registrar session
//! is opened lazily through a [`Connector`] (the REST API by default) and
//! every call is serialized behind one lock.
//!
//! ```no_run
//! use transip_dns::{ClientConfiguration, DnsProvider, TransipProvider};
//!
//! # async fn run() -> Result<(), transip_dns::Error> {
//! let provider = TransipProvider::new(ClientConfiguration::new(
//!     "example",
//!     "/run/secrets/transip.key",
//! ));
//! for record in provider.list_records("example.com").await? {
//!     println!("{} {} {}", record.name, record.record_type(), record.data);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod providers;

pub use crate::config::ClientConfiguration;
pub use crate::core::provider::DnsProvider;
pub use crate::core::record::{Record, RecordData, RecordError, Rr};
pub use crate::error::Error;
pub use crate::providers::transip::{
    Connector, DnsEntry, DomainRepository, HttpConnector, RecordListing, SkippedEntry,
    TransipError, TransipProvider,
};
