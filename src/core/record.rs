use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {record_type} data {data:?}: {reason}")]
pub struct RecordError {
    pub record_type: String,
    pub data: String,
    pub reason: &'static str,
}

/// Flat resource record, the shape registrars speak.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rr {
    pub name: String,
    pub record_type: String,
    pub data: String,
    pub ttl: Duration,
}

/// Typed record data.
///
/// MX and SRV targets and CAA tags are written back space separated, so
/// they must be non-empty and free of whitespace to render as parsable
/// data. CAA values are always quoted on output, with `"` and `\`
/// escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordData {
    /// A or AAAA, depending on the address family.
    Address(IpAddr),
    Cname(String),
    Ns(String),
    Txt(String),
    Mx {
        preference: u16,
        target: String,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Caa {
        flags: u8,
        tag: String,
        value: String,
    },
    Other {
        record_type: String,
        data: String,
    },
}

/// Typed resource record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub name: String,
    pub ttl: Duration,
    pub data: RecordData,
    /// Data text exactly as it was parsed. [`Record::rr`] sends it back
    /// unchanged as long as it still describes `data`, so registrars that
    /// match entries on their stored text see the same bytes they returned.
    pub raw_data: Option<String>,
}

impl RecordData {
    /// Parse the type-specific encoding of `data`.
    ///
    /// Types without a dedicated variant are kept verbatim as
    /// [`RecordData::Other`]. Type names are matched exactly.
    pub fn parse(record_type: &str, data: &str) -> Result<Self, &'static str> {
        let parsed = match record_type {
            "A" => match data.parse::<IpAddr>() {
                Ok(addr @ IpAddr::V4(_)) => RecordData::Address(addr),
                _ => return Err("not an IPv4 address"),
            },
            "AAAA" => match data.parse::<IpAddr>() {
                Ok(addr @ IpAddr::V6(_)) => RecordData::Address(addr),
                _ => return Err("not an IPv6 address"),
            },
            "CNAME" => RecordData::Cname(data.to_string()),
            "NS" => RecordData::Ns(data.to_string()),
            "TXT" => RecordData::Txt(data.to_string()),
            "MX" => {
                let fields: Vec<&str> = data.split_whitespace().collect();
                let &[preference, target] = fields.as_slice() else {
                    return Err("expected 'preference target'");
                };
                RecordData::Mx {
                    preference: preference.parse().map_err(|_| "invalid preference")?,
                    target: target.to_string(),
                }
            }
            "SRV" => {
                let fields: Vec<&str> = data.split_whitespace().collect();
                let &[priority, weight, port, target] = fields.as_slice() else {
                    return Err("expected 'priority weight port target'");
                };
                RecordData::Srv {
                    priority: priority.parse().map_err(|_| "invalid priority")?,
                    weight: weight.parse().map_err(|_| "invalid weight")?,
                    port: port.parse().map_err(|_| "invalid port")?,
                    target: target.to_string(),
                }
            }
            "CAA" => {
                let mut fields = data.splitn(3, ' ');
                let (Some(flags), Some(tag), Some(value)) =
                    (fields.next(), fields.next(), fields.next())
                else {
                    return Err("expected 'flags tag value'");
                };
                if tag.is_empty() {
                    return Err("empty tag");
                }
                RecordData::Caa {
                    flags: flags.parse().map_err(|_| "invalid flags")?,
                    tag: tag.to_string(),
                    value: unquote(value),
                }
            }
            _ => RecordData::Other {
                record_type: record_type.to_string(),
                data: data.to_string(),
            },
        };
        Ok(parsed)
    }

    pub fn record_type(&self) -> &str {
        match self {
            RecordData::Address(IpAddr::V4(_)) => "A",
            RecordData::Address(IpAddr::V6(_)) => "AAAA",
            RecordData::Cname(_) => "CNAME",
            RecordData::Ns(_) => "NS",
            RecordData::Txt(_) => "TXT",
            RecordData::Mx { .. } => "MX",
            RecordData::Srv { .. } => "SRV",
            RecordData::Caa { .. } => "CAA",
            RecordData::Other { record_type, .. } => record_type,
        }
    }
}

// A value wrapped in double quotes loses one pair and its backslash
// escapes. Anything else is taken as is.
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::Address(addr) => write!(f, "{addr}"),
            RecordData::Cname(target) | RecordData::Ns(target) => write!(f, "{target}"),
            RecordData::Txt(text) => write!(f, "{text}"),
            RecordData::Mx { preference, target } => write!(f, "{preference} {target}"),
            RecordData::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {target}"),
            RecordData::Caa { flags, tag, value } => {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "{flags} {tag} \"{escaped}\"")
            }
            RecordData::Other { data, .. } => write!(f, "{data}"),
        }
    }
}

impl Record {
    pub fn new(name: impl Into<String>, ttl: Duration, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
            raw_data: None,
        }
    }

    pub fn record_type(&self) -> &str {
        self.data.record_type()
    }

    /// Flatten back into registrar form.
    pub fn rr(&self) -> Rr {
        let record_type = self.record_type();
        let data = match &self.raw_data {
            Some(raw) if RecordData::parse(record_type, raw).is_ok_and(|d| d == self.data) => {
                raw.clone()
            }
            _ => self.data.to_string(),
        };
        Rr {
            name: self.name.clone(),
            record_type: record_type.to_string(),
            data,
            ttl: self.ttl,
        }
    }
}

impl Rr {
    /// Parse `data` into a typed record, see [`RecordData::parse`].
    pub fn parse(&self) -> Result<Record, RecordError> {
        let data = RecordData::parse(&self.record_type, &self.data).map_err(|reason| RecordError {
            record_type: self.record_type.clone(),
            data: self.data.clone(),
            reason,
        })?;

        Ok(Record {
            name: self.name.clone(),
            ttl: self.ttl,
            data,
            raw_data: Some(self.data.clone()),
        })
    }
}
