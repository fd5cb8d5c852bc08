//! Reference resolution as per [Section 5.2 of RFC 3986][section-5.2].
//!
//! [section-5.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2

use crate::path::remove_dot_segments;
use crate::url::{Parts, Url};

/// Resolves `r` against `base` with the strict transformation algorithm:
/// a reference with a scheme keeps all of its components, and empty path
/// segments are never collapsed.
pub(crate) fn resolve(base: &Url, r: &Url) -> Url {
    let r_parts = r.to_parts();
    let base_parts = base.to_parts();

    let target = if !r_parts.scheme.is_empty() {
        Parts {
            path: dedot(&r_parts.path),
            ..r_parts
        }
    } else if r_parts.host.is_some() {
        Parts {
            scheme: base_parts.scheme,
            path: dedot(&r_parts.path),
            ..r_parts
        }
    } else if r_parts.path.is_empty() {
        Parts {
            scheme: base_parts.scheme,
            user: base_parts.user,
            password: base_parts.password,
            host: base_parts.host,
            port: base_parts.port,
            path: base_parts.path,
            query: if r_parts.query.is_empty() {
                base_parts.query
            } else {
                r_parts.query
            },
            fragment: r_parts.fragment,
        }
    } else {
        let path = if r_parts.path.starts_with('/') {
            remove_dot_segments(&r_parts.path)
        } else {
            remove_dot_segments(&merge(&base_parts, &r_parts.path))
        };
        Parts {
            scheme: base_parts.scheme,
            user: base_parts.user,
            password: base_parts.password,
            host: base_parts.host,
            port: base_parts.port,
            path,
            query: r_parts.query,
            fragment: r_parts.fragment,
        }
    };
    Url::from_parts(target)
}

/// Applies `remove_dot_segments` to rooted paths only, so that a
/// rootless path of a non-hierarchical reference stays untouched.
fn dedot(path: &str) -> String {
    if path.starts_with('/') {
        remove_dot_segments(path)
    } else {
        path.to_owned()
    }
}

/// Merges a relative-path reference with the base path, as per
/// [Section 5.2.3 of RFC 3986][section-5.2.3].
///
/// [section-5.2.3]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.3
fn merge(base: &Parts, r_path: &str) -> String {
    if base.host.is_some() && base.path.is_empty() {
        return format!("/{r_path}");
    }
    match base.path.rfind('/') {
        Some(i) => format!("{}{}", &base.path[..=i], r_path),
        None => r_path.to_owned(),
    }
}
