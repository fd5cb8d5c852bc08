//! Error types.

use std::borrow::Cow;
use std::fmt;

/// Detailed cause of an [`Error`].
///
/// Misuses that the type system already prevents, such as an out-of-range
/// port or a boolean query value, have no kind here; they simply do not
/// compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value is structurally invalid where it was used: a non-ASCII
    /// character in a quoter set, port zero, a rootless path on a URL
    /// with authority, a component change not permitted for the URL.
    InvalidArgument,
    /// An ASCII host contains a character forbidden in registered names
    /// by [Section 3.2.2 of RFC 3986][reg-name].
    ///
    /// [reg-name]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
    InvalidHost,
    /// A hostname was rejected by both IDNA 2008 and the punycode
    /// fallback.
    Idna,
    /// A `"%"` is not followed by two hexadecimal digits.
    ///
    /// Surfaced only by the strict codec entry points; the default policy
    /// repairs the escape in place.
    MalformedPercent,
    /// Both a parsed query and a raw query string were supplied to the
    /// builder.
    AmbiguousQuery,
}

/// An error returned by the URL constructors, builders, derivations and
/// codecs.
///
/// All errors are reported synchronously at the call site; the message
/// names the offending component and, where practical, the offending
/// substring.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl Error {
    /// Returns the detailed cause of the error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Error {
        Error {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(ErrorKind::InvalidArgument, message)
    }

    pub(crate) fn invalid_host(message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(ErrorKind::InvalidHost, message)
    }

    pub(crate) fn idna(host: &str) -> Error {
        Error::new(
            ErrorKind::Idna,
            format!("host {host:?} is not a valid internationalized domain name"),
        )
    }

    pub(crate) fn malformed_percent(s: &str, index: usize) -> Error {
        let tail: String = s[index..].chars().take(3).collect();
        Error::new(
            ErrorKind::MalformedPercent,
            format!("malformed percent-escape {tail:?} at index {index}"),
        )
    }

    pub(crate) fn ambiguous_query() -> Error {
        Error::new(
            ErrorKind::AmbiguousQuery,
            "only one of query and query_string should be given",
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
