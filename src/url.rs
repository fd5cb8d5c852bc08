use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash;
use std::ops::{Div, Rem};
use std::str::FromStr;

use once_cell::sync::OnceCell;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::builder::UrlBuilder;
use crate::encoding::{
    imp, FRAGMENT_QUOTER, PATH_QUOTER, PATH_SAFE_UNQUOTER, PATH_UNQUOTER, QS_UNQUOTER, QUOTER,
    UNQUOTER,
};
use crate::error::Error;
use crate::host::{self, EncodedHost};
use crate::path;
use crate::query::{Query, ToQuery};
use crate::resolve;
use crate::split;

/// Returns the registered default port of a scheme.
///
/// The registry is consulted for port elision and for the fallback of
/// [`Url::port`], never for validation.
pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

/// Schemes that do not require a host, for which a scheme change is
/// permitted on a relative URL.
const SCHEMES_WITHOUT_HOST: &[&str] = &["data", "mailto", "tel", "urn"];

/// Lazily computed decoded views of a URL.
#[derive(Clone, Debug, Default)]
struct ViewCache {
    string: OnceCell<String>,
    user: OnceCell<Option<String>>,
    password: OnceCell<Option<String>>,
    host: OnceCell<Option<String>>,
    authority: OnceCell<String>,
    raw_authority: OnceCell<String>,
    path: OnceCell<String>,
    path_safe: OnceCell<String>,
    path_qs: OnceCell<String>,
    raw_path_qs: OnceCell<String>,
    query: OnceCell<Query>,
    query_string: OnceCell<String>,
    fragment: OnceCell<String>,
    raw_parts: OnceCell<Vec<String>>,
    parts: OnceCell<Vec<String>>,
}

/// An immutable URL.
///
/// A `Url` stores every component in its canonical percent-encoded form:
/// the scheme lowercased, the host IDNA-encoded and lowercased, escapes
/// normalized to uppercase hexadecimal, the path of a URL with authority
/// normalized per [Section 5.2.4 of RFC 3986][rds], and a port equal to
/// the scheme's default elided. Decoded, human-readable views of each
/// component are computed on first access and memoized.
///
/// A `Url` is never mutated; every `with_*`, join and query operation
/// returns a new value. Equality, ordering and hashing are defined over
/// the canonical encoded form.
///
/// [rds]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4
///
/// # Examples
///
/// ```
/// use fluent_url::Url;
///
/// let url = Url::parse("http://εμπορικόσήμα.eu/путь/это?a=1&b=2")?;
/// assert_eq!(url.raw_host(), Some("xn--jxagkqfkduily1i.eu"));
/// assert_eq!(url.host(), Some("εμπορικόσήμα.eu"));
/// assert_eq!(url.raw_path(), "/%D0%BF%D1%83%D1%82%D1%8C/%D1%8D%D1%82%D0%BE");
/// assert_eq!(url.path(), "/путь/это");
/// assert_eq!(url.query().get("b"), Some("2"));
/// # Ok::<_, fluent_url::error::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Url {
    /// Lowercase scheme, or empty.
    scheme: String,
    /// Encoded user; never `Some("")`.
    user: Option<String>,
    /// Encoded password; an empty password is distinct from an absent one.
    password: Option<String>,
    /// Canonical host, brackets stripped.
    host: Option<EncodedHost>,
    /// Explicit port; a port equal to the scheme default is elided at
    /// construction.
    port: Option<u16>,
    /// Encoded path; empty or, for a URL with authority, absolute.
    path: String,
    /// Encoded query, empty when absent.
    query: String,
    /// Encoded fragment, empty when absent.
    fragment: String,
    cache: ViewCache,
}

impl Url {
    /// Parses a URL from a string, percent-encoding each component as
    /// needed.
    ///
    /// Already-encoded input passes through unchanged apart from
    /// canonicalization, so parsing is idempotent: parsing the string
    /// form of a `Url` yields an equal `Url`.
    ///
    /// # Errors
    ///
    /// Returns `Err` on an empty host with other authority parts, an
    /// invalid port, or a host rejected by validation or IDNA.
    pub fn parse(input: &str) -> Result<Url, Error> {
        Self::parse_impl(input, false)
    }

    /// Parses a URL, keeping the input's encoding untouched.
    ///
    /// Only the structure is interpreted; no re-quoting, host encoding or
    /// path normalization is performed. This is an escape hatch, not a
    /// correctness guarantee: later derivations may still re-quote.
    ///
    /// # Errors
    ///
    /// Returns `Err` on an empty host with other authority parts or an
    /// invalid port.
    pub fn parse_encoded(input: &str) -> Result<Url, Error> {
        Self::parse_impl(input, true)
    }

    /// Creates a builder for constructing a URL from components.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluent_url::Url;
    ///
    /// let url = Url::builder()
    ///     .scheme("http")
    ///     .user("john.doe")
    ///     .host("www.example.com")
    ///     .port(123)
    ///     .path("/forum/questions/")
    ///     .query_string("tag=networking&order=newest")
    ///     .fragment("top")
    ///     .build()?;
    /// assert_eq!(
    ///     url.as_str(),
    ///     "http://john.doe@www.example.com:123/forum/questions/?tag=networking&order=newest#top"
    /// );
    /// # Ok::<_, fluent_url::error::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> UrlBuilder {
        UrlBuilder::new()
    }

    fn parse_impl(input: &str, encoded: bool) -> Result<Url, Error> {
        let parts = split::split(input);

        let scheme = parts
            .scheme
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let (user, password, host, port) = match parts.authority.filter(|a| !a.is_empty()) {
            Some(netloc) => {
                let auth = split::split_authority(netloc);
                if auth.host.is_empty() {
                    return Err(Error::invalid_argument(format!(
                        "invalid URL {input:?}: host is required when an authority is present"
                    )));
                }
                let host = if encoded {
                    host::classify_encoded(auth.host)
                } else {
                    host::encode_host(auth.host)?
                };
                let quote =
                    |s: &str| -> String { if encoded { s.to_owned() } else { QUOTER.quote(s).into_owned() } };
                let user = auth.user.map(|u| quote(u)).filter(|u| !u.is_empty());
                let password = auth.password.map(|p| quote(p));
                (user, password, Some(host), parse_port(auth.port)?)
            }
            None => (None, None, None, None),
        };

        let (path, query, fragment);
        if encoded {
            path = parts.path.to_owned();
            query = parts.query.unwrap_or("").to_owned();
            fragment = parts.fragment.unwrap_or("").to_owned();
        } else {
            let quoted_path = PATH_QUOTER.quote(parts.path);
            path = if host.is_some() {
                path::normalize(&quoted_path).into_owned()
            } else {
                quoted_path.into_owned()
            };
            query = crate::encoding::QUERY_QUOTER
                .quote(parts.query.unwrap_or(""))
                .into_owned();
            fragment = FRAGMENT_QUOTER
                .quote(parts.fragment.unwrap_or(""))
                .into_owned();
        }

        Ok(Url::from_parts(Parts {
            scheme,
            user,
            password,
            host,
            port,
            path,
            query,
            fragment,
        }))
    }

    /// Assembles a URL from canonicalized parts, applying port elision
    /// and keeping an authority-less path from masquerading as one.
    pub(crate) fn from_parts(mut parts: Parts) -> Url {
        if parts.port == default_port(&parts.scheme) {
            parts.port = None;
        }
        if parts.host.is_none() && parts.path.starts_with("//") {
            parts.path.insert_str(0, "/.");
        }
        Url {
            scheme: parts.scheme,
            user: parts.user,
            password: parts.password,
            host: parts.host,
            port: parts.port,
            path: parts.path,
            query: parts.query,
            fragment: parts.fragment,
            cache: ViewCache::default(),
        }
    }

    pub(crate) fn to_parts(&self) -> Parts {
        Parts {
            scheme: self.scheme.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }
    }

    fn has_host(&self) -> bool {
        self.host.is_some()
    }

    fn require_host(&self, what: &str) -> Result<(), Error> {
        if self.has_host() {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "{what} replacement is not allowed for relative URLs"
            )))
        }
    }

    // Accessors.

    /// Returns the scheme, or an empty string for a relative URL.
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the encoded user.
    #[inline]
    #[must_use]
    pub fn raw_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the decoded user.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.cache
            .user
            .get_or_init(|| {
                self.user
                    .as_deref()
                    .map(|u| UNQUOTER.unquote(u).into_owned())
            })
            .as_deref()
    }

    /// Returns the encoded password.
    ///
    /// An empty password is distinct from an absent one.
    #[inline]
    #[must_use]
    pub fn raw_password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the decoded password.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.cache
            .password
            .get_or_init(|| {
                self.password
                    .as_deref()
                    .map(|p| UNQUOTER.unquote(p).into_owned())
            })
            .as_deref()
    }

    /// Returns the encoded host, without brackets.
    ///
    /// `None` for a URL without authority.
    #[inline]
    #[must_use]
    pub fn raw_host(&self) -> Option<&str> {
        self.host.as_ref().map(|h| h.text.as_str())
    }

    /// Returns the decoded host: the U-label form of an IDNA-encoded
    /// registered name, or the raw text of an IP literal.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.cache
            .host
            .get_or_init(|| {
                self.host
                    .as_ref()
                    .map(|h| host::decode_host(&h.text, h.kind))
            })
            .as_deref()
    }

    /// Returns the host subcomponent as it appears in the authority:
    /// IPv6 and IPvFuture literals are enclosed in brackets.
    #[must_use]
    pub fn host_subcomponent(&self) -> Option<Cow<'_, str>> {
        self.host.as_ref().map(|h| {
            if h.kind.is_bracketed() {
                Cow::Owned(format!("[{}]", h.text))
            } else {
                Cow::Borrowed(h.text.as_str())
            }
        })
    }

    /// Returns the port, falling back to the scheme's default.
    #[inline]
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }

    /// Returns the explicit port, without scheme-based fallback.
    ///
    /// A port equal to the scheme's default is elided at construction and
    /// reads back as `None`.
    #[inline]
    #[must_use]
    pub fn explicit_port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the encoded authority, or an empty string for a URL
    /// without one.
    #[must_use]
    pub fn raw_authority(&self) -> &str {
        self.cache.raw_authority.get_or_init(|| {
            make_netloc(
                self.raw_user(),
                self.raw_password(),
                self.host_subcomponent().as_deref(),
                self.port,
            )
        })
    }

    /// Returns the decoded authority, with the effective port.
    #[must_use]
    pub fn authority(&self) -> &str {
        self.cache.authority.get_or_init(|| {
            make_netloc(self.user(), self.password(), self.host(), self.port())
        })
    }

    /// Returns the encoded path: `"/"` for a URL with authority and an
    /// empty path.
    #[must_use]
    pub fn raw_path(&self) -> &str {
        if self.path.is_empty() && self.has_host() {
            "/"
        } else {
            &self.path
        }
    }

    /// Returns the decoded path.
    ///
    /// `%2F` decodes to `"/"` here; use [`path_safe`](Self::path_safe)
    /// for a decoded view that keeps it encoded.
    #[must_use]
    pub fn path(&self) -> &str {
        self.cache
            .path
            .get_or_init(|| PATH_UNQUOTER.unquote(self.raw_path()).into_owned())
    }

    /// Returns the decoded path, with `%2F` and `%25` left encoded so
    /// that the result can be split on `"/"` and re-encoded without loss.
    #[must_use]
    pub fn path_safe(&self) -> &str {
        self.cache
            .path_safe
            .get_or_init(|| PATH_SAFE_UNQUOTER.unquote(self.raw_path()).into_owned())
    }

    /// Returns the decoded path and query string.
    #[must_use]
    pub fn path_qs(&self) -> &str {
        self.cache.path_qs.get_or_init(|| {
            if self.query.is_empty() {
                self.path().to_owned()
            } else {
                format!("{}?{}", self.path(), self.query_string())
            }
        })
    }

    /// Returns the encoded path and query string.
    #[must_use]
    pub fn raw_path_qs(&self) -> &str {
        self.cache.raw_path_qs.get_or_init(|| {
            if self.query.is_empty() {
                self.raw_path().to_owned()
            } else {
                format!("{}?{}", self.raw_path(), self.query)
            }
        })
    }

    /// Returns the encoded query string, empty when absent.
    #[inline]
    #[must_use]
    pub fn raw_query_string(&self) -> &str {
        &self.query
    }

    /// Returns the decoded query string.
    ///
    /// Separators and a decoded `"+"` are kept percent-encoded so that
    /// the result still parses as the same query.
    #[must_use]
    pub fn query_string(&self) -> &str {
        self.cache
            .query_string
            .get_or_init(|| QS_UNQUOTER.unquote(&self.query).into_owned())
    }

    /// Returns the query parsed into an ordered multi-map.
    #[must_use]
    pub fn query(&self) -> &Query {
        self.cache.query.get_or_init(|| Query::parse(&self.query))
    }

    /// Returns the encoded fragment, empty when absent.
    #[inline]
    #[must_use]
    pub fn raw_fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns the decoded fragment.
    #[must_use]
    pub fn fragment(&self) -> &str {
        self.cache
            .fragment
            .get_or_init(|| UNQUOTER.unquote(&self.fragment).into_owned())
    }

    /// Returns the encoded path segments, with a leading `"/"` sentinel
    /// for an absolute path.
    #[must_use]
    pub fn raw_parts(&self) -> &[String] {
        self.cache.raw_parts.get_or_init(|| {
            let path = &self.path;
            if self.has_host() {
                if path.is_empty() {
                    vec!["/".to_owned()]
                } else {
                    std::iter::once("/")
                        .chain(path[1..].split('/'))
                        .map(str::to_owned)
                        .collect()
                }
            } else if let Some(rest) = path.strip_prefix('/') {
                std::iter::once("/")
                    .chain(rest.split('/'))
                    .map(str::to_owned)
                    .collect()
            } else {
                path.split('/').map(str::to_owned).collect()
            }
        })
    }

    /// Returns the decoded path segments.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        self.cache.parts.get_or_init(|| {
            self.raw_parts()
                .iter()
                .map(|part| UNQUOTER.unquote(part).into_owned())
                .collect()
        })
    }

    /// Returns the last encoded path segment, empty when there is none.
    #[must_use]
    pub fn raw_name(&self) -> &str {
        let parts = self.raw_parts();
        let parts = if self.has_host() { &parts[1..] } else { parts };
        parts.last().map_or("", String::as_str)
    }

    /// Returns the last decoded path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        let parts = self.parts();
        let parts = if self.has_host() { &parts[1..] } else { parts };
        parts.last().map_or("", String::as_str)
    }

    /// Returns the file extension of [`raw_name`](Self::raw_name),
    /// including the dot.
    #[must_use]
    pub fn raw_suffix(&self) -> &str {
        suffix_of(self.raw_name())
    }

    /// Returns the file extension of [`name`](Self::name).
    #[must_use]
    pub fn suffix(&self) -> &str {
        suffix_of(self.name())
    }

    /// Returns all file extensions of [`raw_name`](Self::raw_name).
    #[must_use]
    pub fn raw_suffixes(&self) -> Vec<String> {
        suffixes_of(self.raw_name())
    }

    /// Returns all file extensions of [`name`](Self::name).
    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        suffixes_of(self.name())
    }

    /// Returns a URL with the last path segment removed and the query and
    /// fragment cleared.
    ///
    /// The parent of a root is the root itself.
    #[must_use]
    pub fn parent(&self) -> Url {
        let path = self.raw_path();
        if path.is_empty() || path == "/" {
            let mut parts = self.to_parts();
            parts.query = String::new();
            parts.fragment = String::new();
            return Url::from_parts(parts);
        }
        let cut = path.rfind('/').unwrap_or(0);
        let mut parts = self.to_parts();
        parts.path = path[..cut].to_owned();
        parts.query = String::new();
        parts.fragment = String::new();
        Url::from_parts(parts)
    }

    /// Checks whether the URL is absolute: it has a scheme or an
    /// authority.
    #[inline]
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty() || self.has_host()
    }

    /// Checks whether the effective port is the scheme's default, e.g.
    /// for `http://example.com` and `http://example.com:80` alike.
    ///
    /// `false` for a relative URL.
    #[must_use]
    pub fn is_default_port(&self) -> bool {
        match self.port {
            None => self.port().is_some(),
            Some(port) => default_port(&self.scheme) == Some(port),
        }
    }

    /// Checks whether the URL is empty: no authority, path, query or
    /// fragment. A scheme alone does not make a URL non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_host() && self.path.is_empty() && self.query.is_empty() && self.fragment.is_empty()
    }

    /// Returns the canonical string form.
    ///
    /// The result is pure ASCII; its bytes are the byte form of the URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.cache.string.get_or_init(|| self.encode_with(false))
    }

    fn encode_with(&self, force_root: bool) -> String {
        let mut out = String::new();
        if !self.scheme.is_empty() {
            out.push_str(&self.scheme);
            out.push(':');
        }
        if self.has_host() {
            out.push_str("//");
            out.push_str(self.raw_authority());
        }
        if self.path.is_empty()
            && self.has_host()
            && (force_root || !self.query.is_empty() || !self.fragment.is_empty())
        {
            out.push('/');
        } else {
            out.push_str(&self.path);
        }
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(&self.fragment);
        }
        out
    }

    /// The form compared by equality, ordering and hashing: the canonical
    /// string with an empty path of a URL with authority read as `"/"`.
    fn cmp_form(&self) -> Cow<'_, str> {
        if self.path.is_empty() && self.has_host() {
            Cow::Owned(self.encode_with(true))
        } else {
            Cow::Borrowed(self.as_str())
        }
    }

    // Derivations.

    /// Returns a URL with the scheme replaced.
    ///
    /// For a URL without authority the change is only permitted to a
    /// scheme that does not require a host (`data`, `mailto`, `tel`,
    /// `urn`). The change may alter default-port elision.
    ///
    /// # Errors
    ///
    /// Returns `Err` on invalid scheme syntax or a scheme change not
    /// permitted for the URL.
    pub fn with_scheme(&self, scheme: &str) -> Result<Url, Error> {
        if !split::is_valid_scheme(scheme) {
            return Err(Error::invalid_argument(format!(
                "invalid scheme {scheme:?}"
            )));
        }
        let scheme = scheme.to_ascii_lowercase();
        if !self.has_host() && !SCHEMES_WITHOUT_HOST.contains(&scheme.as_str()) {
            return Err(Error::invalid_argument(format!(
                "scheme replacement is not allowed for relative URLs \
                 unless the scheme does not require a host, got {scheme:?}"
            )));
        }
        let mut parts = self.to_parts();
        parts.scheme = scheme;
        // Port elision is rechecked against the new scheme's default.
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the user replaced; `None` clears both user and
    /// password.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a URL without authority.
    pub fn with_user(&self, user: Option<&str>) -> Result<Url, Error> {
        self.require_host("user")?;
        let mut parts = self.to_parts();
        match user {
            Some(user) => {
                parts.user = Some(QUOTER.quote_literal(user).into_owned()).filter(|u| !u.is_empty());
            }
            None => {
                parts.user = None;
                parts.password = None;
            }
        }
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the password replaced; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a URL without authority.
    pub fn with_password(&self, password: Option<&str>) -> Result<Url, Error> {
        self.require_host("password")?;
        let mut parts = self.to_parts();
        parts.password = password.map(|p| QUOTER.quote_literal(p).into_owned());
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the host replaced.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a URL without authority, for an empty host, or
    /// when the new host fails validation.
    pub fn with_host(&self, host: &str) -> Result<Url, Error> {
        self.require_host("host")?;
        if host.is_empty() {
            return Err(Error::invalid_argument("host removing is not allowed"));
        }
        let mut parts = self.to_parts();
        parts.host = Some(host::encode_host(host)?);
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the port replaced; `None` clears it. A port
    /// equal to the scheme's default is elided.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a URL without authority, or for port zero.
    pub fn with_port(&self, port: Option<u16>) -> Result<Url, Error> {
        self.require_host("port")?;
        if port == Some(0) {
            return Err(Error::invalid_argument(
                "port 0 is not a valid explicit port",
            ));
        }
        let mut parts = self.to_parts();
        parts.port = port;
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the path replaced, keeping query and fragment.
    ///
    /// The path is percent-encoded and, for a URL with authority,
    /// normalized and rooted with a leading `"/"`.
    #[must_use]
    pub fn with_path(&self, new_path: &str) -> Url {
        let quoted = PATH_QUOTER.quote_literal(new_path).into_owned();
        self.replace_path(quoted)
    }

    /// Returns a URL with the path replaced, keeping the given encoding.
    #[must_use]
    pub fn with_path_encoded(&self, new_path: &str) -> Url {
        self.replace_path(new_path.to_owned())
    }

    fn replace_path(&self, mut new_path: String) -> Url {
        if self.has_host() {
            new_path = path::normalize(&new_path).into_owned();
            if !new_path.is_empty() && !new_path.starts_with('/') {
                new_path.insert(0, '/');
            }
        }
        let mut parts = self.to_parts();
        parts.path = new_path;
        Url::from_parts(parts)
    }

    /// Returns a URL with the query replaced; `None` clears it.
    ///
    /// Accepts a whole query string, a slice, array or vector of
    /// key-value pairs, or a [`Query`].
    ///
    /// # Errors
    ///
    /// Returns `Err` when a query value cannot be serialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluent_url::Url;
    ///
    /// let url = Url::parse("http://example.com/path")?;
    /// assert_eq!(
    ///     url.with_query(&[("a", "1"), ("b", "c d")])?.as_str(),
    ///     "http://example.com/path?a=1&b=c+d"
    /// );
    /// assert_eq!(url.with_query(None::<&str>)?.as_str(), "http://example.com/path");
    /// # Ok::<_, fluent_url::error::Error>(())
    /// ```
    pub fn with_query<Q: ToQuery>(&self, query: Q) -> Result<Url, Error> {
        let mut parts = self.to_parts();
        parts.query = query.to_query_string()?.unwrap_or_default();
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the query updated with dictionary semantics:
    /// existing entries of an updated key are replaced in place, new keys
    /// are appended, duplicate new values are kept. `None` clears the
    /// query.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a query value cannot be serialized.
    pub fn update_query<Q: ToQuery>(&self, query: Q) -> Result<Url, Error> {
        let mut parts = self.to_parts();
        parts.query = match query.to_query_string()? {
            Some(s) => self.query().update(&Query::parse(&s)).encode(),
            None => String::new(),
        };
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the given entries appended to the query,
    /// keeping existing duplicates.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a query value cannot be serialized.
    pub fn extend_query<Q: ToQuery>(&self, query: Q) -> Result<Url, Error> {
        let mut parts = self.to_parts();
        if let Some(s) = query.to_query_string()? {
            parts.query = self.query().extend(&Query::parse(&s)).encode();
        }
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL without the query entries whose key is in `keys`.
    #[must_use]
    pub fn without_query_params(&self, keys: &[&str]) -> Url {
        let mut parts = self.to_parts();
        parts.query = self.query().without(keys).encode();
        Url::from_parts(parts)
    }

    /// Returns a URL with the fragment replaced; `None` clears it.
    #[must_use]
    pub fn with_fragment(&self, fragment: Option<&str>) -> Url {
        let mut parts = self.to_parts();
        parts.fragment = fragment
            .map(|f| FRAGMENT_QUOTER.quote_literal(f).into_owned())
            .unwrap_or_default();
        Url::from_parts(parts)
    }

    /// Returns a URL with the last path segment replaced and the query
    /// and fragment cleared.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the name contains a slash or encodes to `"."`
    /// or `".."`.
    pub fn with_name(&self, name: &str) -> Result<Url, Error> {
        if name.contains('/') {
            return Err(Error::invalid_argument("slash in name is not allowed"));
        }
        let name = PATH_QUOTER.quote_literal(name).into_owned();
        if name == "." || name == ".." {
            return Err(Error::invalid_argument(
                "\".\" and \"..\" names are forbidden",
            ));
        }
        let mut segments: Vec<String> = self.raw_parts().to_vec();
        if self.has_host() {
            if segments.len() == 1 {
                segments.push(name);
            } else {
                *segments.last_mut().unwrap() = name;
            }
            segments[0] = String::new();
        } else {
            *segments.last_mut().unwrap() = name;
            if segments[0] == "/" {
                segments[0] = String::new();
            }
        }
        let mut parts = self.to_parts();
        parts.path = segments.join("/");
        parts.query = String::new();
        parts.fragment = String::new();
        Ok(Url::from_parts(parts))
    }

    /// Returns a URL with the file extension of the name replaced and the
    /// query and fragment cleared. An empty suffix removes the extension.
    ///
    /// # Errors
    ///
    /// Returns `Err` for an invalid suffix or when the URL has no name.
    pub fn with_suffix(&self, suffix: &str) -> Result<Url, Error> {
        if (!suffix.is_empty() && !suffix.starts_with('.')) || suffix == "." {
            return Err(Error::invalid_argument(format!(
                "invalid suffix {suffix:?}"
            )));
        }
        let name = self.raw_name();
        if name.is_empty() {
            return Err(Error::invalid_argument("URL has an empty name"));
        }
        let old = self.raw_suffix();
        let stem = &name[..name.len() - old.len()];
        self.with_name(&format!("{stem}{suffix}"))
    }

    /// Returns a URL with the segments appended to the path, dropping the
    /// query and fragment.
    ///
    /// Segments are percent-encoded; `"."` segments are dropped and, for
    /// a URL with authority, the resulting path is normalized. Empty
    /// trailing segments of the base are removed, but an empty trailing
    /// segment of the appended path is kept.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a segment starts with `"/"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluent_url::Url;
    ///
    /// let base = Url::parse("http://example.com/path/")?;
    /// assert_eq!(
    ///     base.joinpath(&["to", "файл"])?.as_str(),
    ///     "http://example.com/path/to/%D1%84%D0%B0%D0%B9%D0%BB"
    /// );
    /// # Ok::<_, fluent_url::error::Error>(())
    /// ```
    pub fn joinpath(&self, segments: &[&str]) -> Result<Url, Error> {
        self.make_child(segments, false)
    }

    /// Like [`joinpath`](Self::joinpath), keeping the given encoding.
    pub fn joinpath_encoded(&self, segments: &[&str]) -> Result<Url, Error> {
        self.make_child(segments, true)
    }

    fn make_child(&self, paths: &[&str], encoded: bool) -> Result<Url, Error> {
        let mut appended: Vec<String> = Vec::new();
        for (idx, piece) in paths.iter().rev().enumerate() {
            let last = idx == 0;
            if piece.starts_with('/') {
                return Err(Error::invalid_argument(format!(
                    "appending path {piece:?} starting from slash is forbidden"
                )));
            }
            let piece = if encoded {
                Cow::Borrowed(*piece)
            } else {
                PATH_QUOTER.quote_literal(piece)
            };
            let segments: Vec<&str> = piece.split('/').rev().filter(|seg| *seg != ".").collect();
            if segments.is_empty() {
                continue;
            }
            // Drop the trailing empty segment of every piece but the last.
            let start = usize::from(!last && segments[0].is_empty());
            appended.extend(segments[start..].iter().map(|s| (*s).to_owned()));
        }
        appended.reverse();

        let mut merged: Vec<String> = Vec::new();
        if !self.path.is_empty() {
            let old: Vec<&str> = self.path.split('/').collect();
            let cutoff = if old.last() == Some(&"") {
                old.len() - 1
            } else {
                old.len()
            };
            merged.extend(old[..cutoff].iter().map(|s| (*s).to_owned()));
        }
        merged.append(&mut appended);

        if self.has_host() {
            merged = path::normalize_segments(&merged);
            if merged.first().is_some_and(|seg| !seg.is_empty()) {
                merged.insert(0, String::new());
            }
        }

        let mut parts = self.to_parts();
        parts.path = merged.join("/");
        parts.query = String::new();
        parts.fragment = String::new();
        Ok(Url::from_parts(parts))
    }

    /// Resolves `other` against this URL per [Section 5.2 of RFC 3986]
    /// [section-5.2]. Empty path segments are preserved.
    ///
    /// [section-5.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2
    ///
    /// # Examples
    ///
    /// ```
    /// use fluent_url::Url;
    ///
    /// let base = Url::parse("http://a/b/c/d;p?q")?;
    /// let join = |r| Ok::<_, fluent_url::error::Error>(base.join(&Url::parse(r)?));
    /// assert_eq!(join("g")?.as_str(), "http://a/b/c/g");
    /// assert_eq!(join("../../g")?.as_str(), "http://a/g");
    /// assert_eq!(join("?y")?.as_str(), "http://a/b/c/d;p?y");
    /// assert_eq!(join("//other/y")?.as_str(), "http://other/y");
    /// # Ok::<_, fluent_url::error::Error>(())
    /// ```
    #[must_use]
    pub fn join(&self, other: &Url) -> Url {
        resolve::resolve(self, other)
    }

    /// Returns a URL with the scheme, host and non-default port only.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a URL without authority or scheme.
    pub fn origin(&self) -> Result<Url, Error> {
        if !self.has_host() {
            return Err(Error::invalid_argument("URL should be absolute"));
        }
        if self.scheme.is_empty() {
            return Err(Error::invalid_argument("URL should have scheme"));
        }
        Ok(Url::from_parts(Parts {
            scheme: self.scheme.clone(),
            user: None,
            password: None,
            host: self.host.clone(),
            port: self.port,
            path: String::new(),
            query: String::new(),
            fragment: String::new(),
        }))
    }

    /// Returns the relative part: path, query and fragment only.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a URL without authority.
    pub fn relative(&self) -> Result<Url, Error> {
        if !self.has_host() {
            return Err(Error::invalid_argument("URL should be absolute"));
        }
        Ok(Url::from_parts(Parts {
            scheme: String::new(),
            user: None,
            password: None,
            host: None,
            port: None,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }))
    }

    /// Returns a decoded string form for humans.
    ///
    /// Characters that would be structurally ambiguous are re-encoded,
    /// but the result is lossy in general and not guaranteed to parse
    /// back into an equal URL.
    #[must_use]
    pub fn human_repr(&self) -> String {
        let user = self.user().map(|u| human_quote(u, "#/:?@[]"));
        let password = self.password().map(|p| human_quote(p, "#/:?@[]"));
        let host = self.host().map(host::encode_host_human);
        let path = human_quote(self.path(), "#?");
        let query = self
            .query()
            .iter()
            .map(|(k, v)| format!("{}={}", human_quote(k, "#&+;="), human_quote(v, "#&+;=")))
            .collect::<Vec<_>>()
            .join("&");
        let fragment = human_quote(self.fragment(), "");

        let mut out = String::new();
        if !self.scheme.is_empty() {
            out.push_str(&self.scheme);
            out.push(':');
        }
        if self.has_host() {
            out.push_str("//");
            out.push_str(&make_netloc(
                user.as_deref(),
                password.as_deref(),
                host.as_deref(),
                self.port,
            ));
        }
        out.push_str(&path);
        if !query.is_empty() {
            out.push('?');
            out.push_str(&query);
        }
        if !fragment.is_empty() {
            out.push('#');
            out.push_str(&fragment);
        }
        out
    }
}

/// The owned component record passed to [`Url::from_parts`].
pub(crate) struct Parts {
    pub(crate) scheme: String,
    pub(crate) user: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) host: Option<EncodedHost>,
    pub(crate) port: Option<u16>,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) fragment: String,
}

pub(crate) fn parse_port(port: Option<&str>) -> Result<Option<u16>, Error> {
    match port {
        None | Some("") => Ok(None),
        Some(digits) => {
            if digits.bytes().all(|x| x.is_ascii_digit()) {
                if let Ok(port) = digits.parse::<u16>() {
                    return Ok(Some(port));
                }
            }
            Err(Error::invalid_argument(format!(
                "invalid port {digits:?}"
            )))
        }
    }
}

/// Assembles `[user[:password]@]host[:port]`.
fn make_netloc(
    user: Option<&str>,
    password: Option<&str>,
    host: Option<&str>,
    port: Option<u16>,
) -> String {
    let Some(host) = host else {
        return String::new();
    };
    let mut out = String::new();
    match (user, password) {
        (user, Some(password)) => {
            out.push_str(user.unwrap_or(""));
            out.push(':');
            out.push_str(password);
            out.push('@');
        }
        (Some(user), None) if !user.is_empty() => {
            out.push_str(user);
            out.push('@');
        }
        _ => {}
    }
    out.push_str(host);
    if let Some(port) = port {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out
}

fn suffix_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => &name[i..],
        _ => "",
    }
}

fn suffixes_of(name: &str) -> Vec<String> {
    if name.ends_with('.') {
        return Vec::new();
    }
    let name = name.trim_start_matches('.');
    name.split('.')
        .skip(1)
        .map(|suffix| format!(".{suffix}"))
        .collect()
}

/// Escapes `"%"`, the given unsafe characters and control characters for
/// human-readable output.
fn human_quote(s: &str, unsafe_chars: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '%' || unsafe_chars.contains(ch) {
            imp::encode_byte(ch as u8, &mut out);
        } else if ch.is_control() {
            for x in ch.encode_utf8(&mut [0; 4]).bytes() {
                imp::encode_byte(x, &mut out);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

impl Default for Url {
    /// Creates the empty relative URL.
    fn default() -> Url {
        Url {
            scheme: String::new(),
            user: None,
            password: None,
            host: None,
            port: None,
            path: String::new(),
            query: String::new(),
            fragment: String::new(),
            cache: ViewCache::default(),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Url {
    type Err = Error;

    fn from_str(s: &str) -> Result<Url, Error> {
        Url::parse(s)
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_form() == other.cmp_form()
    }
}

impl Eq for Url {}

impl hash::Hash for Url {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.cmp_form().hash(state);
    }
}

impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Url {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_form().cmp(&other.cmp_form())
    }
}

impl PartialEq<str> for Url {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Url {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Url> for str {
    fn eq(&self, other: &Url) -> bool {
        self == other.as_str()
    }
}

/// Appends a single path segment, as [`Url::joinpath`] with one segment.
impl Div<&str> for &Url {
    type Output = Result<Url, Error>;

    fn div(self, segment: &str) -> Result<Url, Error> {
        self.joinpath(&[segment])
    }
}

/// Appends a single path segment, as [`Url::joinpath`] with one segment.
impl Div<&str> for Url {
    type Output = Result<Url, Error>;

    fn div(self, segment: &str) -> Result<Url, Error> {
        (&self) / segment
    }
}

/// Updates the query, as [`Url::update_query`].
impl<Q: ToQuery> Rem<Q> for &Url {
    type Output = Result<Url, Error>;

    fn rem(self, query: Q) -> Result<Url, Error> {
        self.update_query(query)
    }
}

/// Updates the query, as [`Url::update_query`].
impl<Q: ToQuery> Rem<Q> for Url {
    type Output = Result<Url, Error>;

    fn rem(self, query: Q) -> Result<Url, Error> {
        self.update_query(query)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Url {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Url {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Url, D::Error> {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(de::Error::custom)
    }
}
