//! Host validation and canonicalization.
//!
//! A host is classified as a bracketed IP literal (IPv6 or IPvFuture), a
//! dotted-quad IPv4 address, or a registered name. Registered names go
//! through IDNA 2008 (UTS 46, non-transitional) with a per-label punycode
//! fallback for names only valid under the 2003 rules. The expensive steps
//! are memoized in the [`cache`](crate::cache) module's LRU caches.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::cache;
use crate::encoding::table;
use crate::error::Error;

/// Kind of a canonicalized host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum HostKind {
    Ipv4,
    Ipv6,
    IpvFuture,
    RegName,
}

impl HostKind {
    /// IP literals of these kinds are bracketed in the authority.
    pub(crate) fn is_bracketed(self) -> bool {
        matches!(self, HostKind::Ipv6 | HostKind::IpvFuture)
    }
}

/// A canonicalized host: the text is stored without brackets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct EncodedHost {
    pub(crate) text: String,
    pub(crate) kind: HostKind,
}

/// A parsed bare IP address, as stored in the `ip_address` cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct IpLiteral {
    pub(crate) compressed: String,
    pub(crate) v6: bool,
}

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
const IPV_FUTURE: &table::Table = &table::UNRESERVED.or(table::SUB_DELIMS).or(&table::Table::new(b":"));

/// Validates and canonicalizes a host for storage.
pub(crate) fn encode_host(host: &str) -> Result<EncodedHost, Error> {
    if let Some(inner) = host.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| Error::invalid_host(format!("invalid IP literal {host:?}")))?;
        return parse_bracketed(inner);
    }

    // A zone identifier is split off before IP parsing and carried
    // through verbatim.
    let (ip_part, zone) = match host.find('%') {
        Some(i) => (&host[..i], &host[i..]),
        None => (host, ""),
    };
    if let Some(literal) = parse_ip(ip_part) {
        let mut text = literal.compressed;
        text.push_str(zone);
        let kind = if literal.v6 {
            HostKind::Ipv6
        } else {
            HostKind::Ipv4
        };
        return Ok(EncodedHost { text, kind });
    }

    let lower = host.to_lowercase();
    let text = if lower.is_ascii() {
        cache::HOST_VALIDATE.get_or_insert_with(&lower, validate_reg_name)?
    } else {
        cache::IDNA_ENCODE.get_or_insert_with(&lower, idna_encode)?
    };
    Ok(EncodedHost {
        text,
        kind: HostKind::RegName,
    })
}

/// Canonicalizes a host for human-readable output: IP literals are
/// compressed and IPv6 re-bracketed, registered names only lowercased.
pub(crate) fn encode_host_human(host: &str) -> String {
    let inner = host
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(host);
    let (ip_part, zone) = match inner.find('%') {
        Some(i) => (&inner[..i], &inner[i..]),
        None => (inner, ""),
    };
    match parse_ip(ip_part) {
        Some(literal) if literal.v6 => format!("[{}{}]", literal.compressed, zone),
        Some(literal) => literal.compressed + zone,
        None => host.to_lowercase(),
    }
}

/// Computes the decoded view of a stored host.
pub(crate) fn decode_host(raw: &str, kind: HostKind) -> String {
    if kind != HostKind::RegName || raw.contains('%') {
        // IP literals are already readable; a "%" marks a zone identifier
        // or an escape that IDNA cannot see through.
        return raw.to_owned();
    }
    if raw.contains("xn--") {
        cache::IDNA_DECODE.get_or_insert_with(raw, idna_decode)
    } else {
        raw.to_owned()
    }
}

/// Classifies a host that is taken as already encoded, without
/// validating or canonicalizing it.
pub(crate) fn classify_encoded(host: &str) -> EncodedHost {
    if let Some(inner) = host.strip_prefix('[') {
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        let kind = if inner.starts_with('v') || inner.starts_with('V') {
            HostKind::IpvFuture
        } else {
            HostKind::Ipv6
        };
        return EncodedHost {
            text: inner.to_owned(),
            kind,
        };
    }
    let kind = if host.contains(':') {
        HostKind::Ipv6
    } else if host.parse::<Ipv4Addr>().is_ok() {
        HostKind::Ipv4
    } else {
        HostKind::RegName
    };
    EncodedHost {
        text: host.to_owned(),
        kind,
    }
}

fn parse_bracketed(inner: &str) -> Result<EncodedHost, Error> {
    if inner.starts_with('v') || inner.starts_with('V') {
        return parse_ipv_future(inner);
    }
    let (ip_part, zone) = match inner.find('%') {
        Some(i) => (&inner[..i], &inner[i..]),
        None => (inner, ""),
    };
    match parse_ip(ip_part) {
        Some(literal) if literal.v6 => Ok(EncodedHost {
            text: literal.compressed + zone,
            kind: HostKind::Ipv6,
        }),
        _ => Err(Error::invalid_host(format!(
            "invalid IP literal [{inner}]"
        ))),
    }
}

fn parse_ipv_future(inner: &str) -> Result<EncodedHost, Error> {
    let bytes = inner.as_bytes();
    let dot = inner.find('.');
    let valid = match dot {
        Some(dot) if dot > 1 => {
            bytes[1..dot].iter().all(|&x| table::HEXDIG.allows(x))
                && bytes[dot + 1..].iter().all(|&x| IPV_FUTURE.allows(x))
                && dot + 1 < bytes.len()
        }
        _ => false,
    };
    if valid {
        Ok(EncodedHost {
            text: inner.to_ascii_lowercase(),
            kind: HostKind::IpvFuture,
        })
    } else {
        Err(Error::invalid_host(format!(
            "invalid IPvFuture literal [{inner}]"
        )))
    }
}

fn parse_ip(s: &str) -> Option<IpLiteral> {
    if s.is_empty() {
        return None;
    }
    cache::IP_ADDRESS.get_or_insert_with(s, |s| {
        if let Ok(addr) = s.parse::<Ipv4Addr>() {
            return Some(IpLiteral {
                compressed: addr.to_string(),
                v6: false,
            });
        }
        s.parse::<Ipv6Addr>().ok().map(|addr| IpLiteral {
            compressed: addr.to_string(),
            v6: true,
        })
    })
}

/// Checks a lowercased ASCII registered name against the `reg-name`
/// grammar.
fn validate_reg_name(host: &str) -> Result<String, Error> {
    match table::REG_NAME.validate_enc(host.as_bytes()) {
        Ok(()) => Ok(host.to_owned()),
        Err(i) => {
            let ch = host.as_bytes()[i] as char;
            let mut message = format!("host {host:?} cannot contain {ch:?} (at position {i})");
            if host.contains('@') || ch == ':' {
                message.push_str(
                    "; if the value includes a username, password or port, \
                     pass them through the dedicated parts",
                );
            }
            Err(Error::invalid_host(message))
        }
    }
}

/// IDNA 2008 encoding with a per-label punycode fallback.
fn idna_encode(host: &str) -> Result<String, Error> {
    match idna::domain_to_ascii(host) {
        Ok(ascii) if !ascii.is_empty() => Ok(ascii),
        _ => punycode_labels(host).ok_or_else(|| Error::idna(host)),
    }
}

fn punycode_labels(host: &str) -> Option<String> {
    let mut out = String::with_capacity(host.len());
    for (i, label) in host.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if label.is_ascii() {
            out.push_str(label);
        } else {
            out.push_str("xn--");
            out.push_str(&idna::punycode::encode_str(label)?);
        }
    }
    Some(out)
}

/// IDNA decoding; an undecodable input is returned unchanged.
fn idna_decode(raw: &str) -> String {
    let (unicode, result) = idna::domain_to_unicode(raw);
    if result.is_ok() {
        return unicode;
    }
    raw.split('.')
        .map(|label| match label.strip_prefix("xn--") {
            Some(body) => {
                idna::punycode::decode_to_string(body).unwrap_or_else(|| label.to_owned())
            }
            None => label.to_owned(),
        })
        .collect::<Vec<_>>()
        .join(".")
}
