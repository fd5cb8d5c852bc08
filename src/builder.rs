//! A builder for constructing URLs from components.

use crate::encoding::{FRAGMENT_QUOTER, PATH_QUOTER, QUERY_QUOTER, QUOTER};
use crate::error::Error;
use crate::host;
use crate::path;
use crate::query::ToQuery;
use crate::split;
use crate::url::{parse_port, Parts, Url};

/// A builder for [`Url`], created by [`Url::builder`].
///
/// Components may be set in any order; everything is validated when
/// [`build`](Self::build) runs. The builder rejects combinations that
/// cannot form a well-formed URL: an `authority` together with any of
/// `user`, `password`, `host` or `port`; both `query` and `query_string`;
/// userinfo or port without a host; and port zero.
///
/// With [`encoded`](Self::encoded) set, the given parts are taken
/// verbatim instead of being percent-encoded.
#[must_use]
#[derive(Debug, Default)]
pub struct UrlBuilder {
    scheme: Option<String>,
    authority: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    query_string: Option<String>,
    fragment: Option<String>,
    encoded: bool,
    error: Option<Error>,
}

impl UrlBuilder {
    pub(crate) fn new() -> UrlBuilder {
        UrlBuilder::default()
    }

    /// Sets the scheme.
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = Some(scheme.to_owned());
        self
    }

    /// Sets the whole authority; mutually exclusive with
    /// [`user`](Self::user), [`password`](Self::password),
    /// [`host`](Self::host) and [`port`](Self::port).
    pub fn authority(mut self, authority: &str) -> Self {
        self.authority = Some(authority.to_owned());
        self
    }

    /// Sets the user.
    pub fn user(mut self, user: &str) -> Self {
        self.user = Some(user.to_owned());
        self
    }

    /// Sets the password. An empty password is kept, distinct from no
    /// password.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_owned());
        self
    }

    /// Sets the host.
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_owned()).filter(|h| !h.is_empty());
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the path.
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_owned());
        self
    }

    /// Sets the query from pairs or a [`Query`](crate::Query); mutually
    /// exclusive with [`query_string`](Self::query_string).
    pub fn query<Q: ToQuery>(mut self, query: Q) -> Self {
        match query.to_query_string() {
            Ok(query) => self.query = query,
            Err(e) => self.error = self.error.or(Some(e)),
        }
        self
    }

    /// Sets the raw query string; mutually exclusive with
    /// [`query`](Self::query).
    pub fn query_string(mut self, query_string: &str) -> Self {
        self.query_string = Some(query_string.to_owned());
        self
    }

    /// Sets the fragment.
    pub fn fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_owned());
        self
    }

    /// Takes all parts verbatim instead of percent-encoding them.
    pub fn encoded(mut self, encoded: bool) -> Self {
        self.encoded = encoded;
        self
    }

    /// Builds the URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` on any of the conflicts listed on [`UrlBuilder`], an
    /// invalid scheme, port zero, a host that fails validation, or a
    /// non-empty rootless path combined with an authority.
    pub fn build(self) -> Result<Url, Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.authority.is_some()
            && (self.user.is_some()
                || self.password.is_some()
                || self.host.is_some()
                || self.port.is_some())
        {
            return Err(Error::invalid_argument(
                "can't mix authority with user, password, host or port",
            ));
        }
        if self.query.as_deref().is_some_and(|q| !q.is_empty()) && self.query_string.is_some() {
            return Err(Error::ambiguous_query());
        }
        if self.host.is_none() && self.authority.is_none() {
            if self.port.is_some() {
                return Err(Error::invalid_argument(
                    "can't build URL with port but without host",
                ));
            }
            if self.user.is_some() || self.password.is_some() {
                return Err(Error::invalid_argument(
                    "can't build URL with user or password but without host",
                ));
            }
        }
        if self.port == Some(0) {
            return Err(Error::invalid_argument(
                "port 0 is not a valid explicit port",
            ));
        }

        let scheme = match self.scheme {
            Some(scheme) => {
                if !split::is_valid_scheme(&scheme) {
                    return Err(Error::invalid_argument(format!(
                        "invalid scheme {scheme:?}"
                    )));
                }
                scheme.to_ascii_lowercase()
            }
            None => String::new(),
        };

        let (user, password, host, port) = match &self.authority {
            Some(authority) if !authority.is_empty() => {
                let auth = split::split_authority(authority);
                if auth.host.is_empty() {
                    return Err(Error::invalid_argument(
                        "host is required when an authority is present",
                    ));
                }
                let host = if self.encoded {
                    host::classify_encoded(auth.host)
                } else {
                    host::encode_host(auth.host)?
                };
                let quote = |s: &str| -> String {
                    if self.encoded {
                        s.to_owned()
                    } else {
                        QUOTER.quote_literal(s).into_owned()
                    }
                };
                (
                    auth.user.map(quote).filter(|u| !u.is_empty()),
                    auth.password.map(quote),
                    Some(host),
                    parse_port(auth.port)?,
                )
            }
            _ => match &self.host {
                Some(host) => {
                    let host = if self.encoded {
                        host::classify_encoded(host)
                    } else {
                        host::encode_host(host)?
                    };
                    let quote = |s: &str| -> String {
                        if self.encoded {
                            s.to_owned()
                        } else {
                            QUOTER.quote_literal(s).into_owned()
                        }
                    };
                    (
                        self.user.as_deref().map(quote).filter(|u| !u.is_empty()),
                        self.password.as_deref().map(quote),
                        Some(host),
                        self.port,
                    )
                }
                None => (None, None, None, None),
            },
        };

        let mut path = self.path.unwrap_or_default();
        if !self.encoded {
            path = PATH_QUOTER.quote_literal(&path).into_owned();
            if host.is_some() {
                path = path::normalize(&path).into_owned();
            }
        }
        if host.is_some() && !path.is_empty() && !path.starts_with('/') {
            return Err(Error::invalid_argument(format!(
                "path in a URL with authority should start with a slash, got {path:?}"
            )));
        }

        let query = if let Some(query) = self.query.filter(|q| !q.is_empty()) {
            query
        } else if let Some(query_string) = self.query_string {
            if self.encoded {
                query_string
            } else {
                QUERY_QUOTER.quote_literal(&query_string).into_owned()
            }
        } else {
            String::new()
        };

        let fragment = match self.fragment {
            Some(fragment) => {
                if self.encoded {
                    fragment
                } else {
                    FRAGMENT_QUOTER.quote_literal(&fragment).into_owned()
                }
            }
            None => String::new(),
        };

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
}
