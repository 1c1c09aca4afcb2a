use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::record::Rr;

/// A DNS entry as the TransIP API stores it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DnsEntry {
    pub name: String,
    pub expire: u64,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct DnsEntryRequest<'a> {
    #[serde(rename = "dnsEntry")]
    pub dns_entry: &'a DnsEntry,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DnsEntriesResponse {
    #[serde(rename = "dnsEntries")]
    pub dns_entries: Vec<DnsEntry>,
}

#[derive(Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub login: &'a str,
    pub nonce: String,
    pub read_only: bool,
    pub expiration_time: &'a str,
    pub label: String,
    pub global_key: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AuthResponse {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorBody {
    pub error: String,
}

/// Sub-second parts of the TTL are dropped.
pub fn to_dns_entry(rr: &Rr) -> DnsEntry {
    DnsEntry {
        name: rr.name.clone(),
        expire: rr.ttl.as_secs(),
        entry_type: rr.record_type.clone(),
        content: rr.data.clone(),
    }
}

pub fn to_rr(entry: &DnsEntry) -> Rr {
    Rr {
        name: entry.name.clone(),
        record_type: entry.entry_type.clone(),
        data: entry.content.clone(),
        ttl: Duration::from_secs(entry.expire),
    }
}
