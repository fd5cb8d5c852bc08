//! Splitting a URL reference into its five components.
//!
//! Implements the decomposition of [Section 3 of RFC 3986][section-3]:
//! fragment first, then query, scheme, authority and path. The splitter
//! performs no decoding or validation beyond structure; the quoting
//! pipeline runs afterwards.
//!
//! [section-3]: https://datatracker.ietf.org/doc/html/rfc3986#section-3

use crate::encoding::table;

/// The raw components of a URL reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SplitUrl<'a> {
    /// Scheme without the trailing `":"`.
    pub(crate) scheme: Option<&'a str>,
    /// Authority without the leading `"//"`; `None` when there is none,
    /// `Some("")` for an empty authority.
    pub(crate) authority: Option<&'a str>,
    pub(crate) path: &'a str,
    /// Query without the leading `"?"`.
    pub(crate) query: Option<&'a str>,
    /// Fragment without the leading `"#"`.
    pub(crate) fragment: Option<&'a str>,
}

/// The subcomponents of an authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SplitAuthority<'a> {
    pub(crate) user: Option<&'a str>,
    pub(crate) password: Option<&'a str>,
    /// Host as written, brackets included for IP literals.
    pub(crate) host: &'a str,
    /// Raw port digits; `Some("")` for a lone colon.
    pub(crate) port: Option<&'a str>,
}

/// Checks the `scheme` ABNF rule.
pub(crate) fn is_valid_scheme(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&x) if x.is_ascii_alphabetic() => bytes.iter().all(|&x| table::SCHEME.allows(x)),
        _ => false,
    }
}

/// Splits a URL reference into its components.
pub(crate) fn split(s: &str) -> SplitUrl<'_> {
    let (rest, fragment) = match s.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (s, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (rest, None),
    };
    let (scheme, rest) = match rest.split_once(':') {
        Some((scheme, after)) if is_valid_scheme(scheme) => (Some(scheme), after),
        _ => (None, rest),
    };
    let (authority, path) = match rest.strip_prefix("//") {
        Some(after) => match after.find('/') {
            Some(i) => (Some(&after[..i]), &after[i..]),
            None => (Some(after), ""),
        },
        None => (None, rest),
    };
    SplitUrl {
        scheme,
        authority,
        path,
        query,
        fragment,
    }
}

/// Splits an authority at the rightmost `"@"`, the first `":"` of the
/// userinfo, and the rightmost `":"` outside brackets.
pub(crate) fn split_authority(netloc: &str) -> SplitAuthority<'_> {
    let (userinfo, host_port) = match netloc.rfind('@') {
        Some(i) => (Some(&netloc[..i]), &netloc[i + 1..]),
        None => (None, netloc),
    };
    let (user, password) = match userinfo {
        Some(userinfo) => match userinfo.split_once(':') {
            Some((user, password)) => (Some(user), Some(password)),
            None => (Some(userinfo), None),
        },
        None => (None, None),
    };

    let bracket_end = host_port.rfind(']');
    let colon = match host_port.rfind(':') {
        Some(i) if bracket_end.map_or(true, |b| i > b) => Some(i),
        _ => None,
    };
    let (host, port) = match colon {
        Some(i) => (&host_port[..i], Some(&host_port[i + 1..])),
        None => (host_port, None),
    };
    SplitAuthority {
        user,
        password,
        host,
        port,
    }
}
