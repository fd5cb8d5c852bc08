#![warn(rust_2018_idioms, unreachable_pub, missing_docs)]
//! An immutable URL type built on canonical percent-encoded storage.
//!
//! The [`Url`] value keeps every component in its canonical encoded form
//! and exposes decoded, human-readable views on demand. Parsing,
//! recomposition and reference resolution follow IETF [RFC 3986] with a
//! few pragmatic, browser-compatible deviations; internationalized hosts
//! are handled per IDNA ([RFC 5891]) with UTS 46 processing.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//! [RFC 5891]: https://datatracker.ietf.org/doc/html/rfc5891/
//!
//! # Examples
//!
//! ```
//! use fluent_url::Url;
//!
//! let url = Url::parse("https://www.example.com/путь?a=1#frag")?;
//! assert_eq!(url.scheme(), "https");
//! assert_eq!(url.host(), Some("www.example.com"));
//! assert_eq!(url.port(), Some(443));
//! assert_eq!(url.explicit_port(), None);
//! assert_eq!(url.raw_path(), "/%D0%BF%D1%83%D1%82%D1%8C");
//! assert_eq!(url.path(), "/путь");
//!
//! let child = (&url / "subpath")?;
//! assert_eq!(child.as_str(), "https://www.example.com/%D0%BF%D1%83%D1%82%D1%8C/subpath");
//! # Ok::<_, fluent_url::error::Error>(())
//! ```

/// Bounded caches for host encoding.
pub mod cache;

/// Percent-encoding utilities.
pub mod encoding;

/// Error types.
pub mod error;

/// Query strings as an ordered multi-map.
pub mod query;

mod builder;
mod host;
mod path;
mod resolve;
mod split;
mod url;

pub use crate::builder::UrlBuilder;
pub use crate::query::{Query, ToQuery, ToQueryValue};
pub use crate::url::Url;
