//! Path normalization.

use std::borrow::Cow;

/// Drops `"."` and `".."` from a sequence of path segments.
///
/// A `".."` beyond the root is absorbed. When the last segment is a dot
/// segment, an empty segment is appended so that the path keeps its
/// trailing slash.
pub(crate) fn normalize_segments<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::with_capacity(segments.len());

    for seg in segments {
        match seg.as_ref() {
            ".." => {
                resolved.pop();
            }
            "." => {}
            seg => resolved.push(seg.to_owned()),
        }
    }

    if let Some(last) = segments.last() {
        if matches!(last.as_ref(), "." | "..") {
            resolved.push(String::new());
        }
    }
    resolved
}

/// Drops `"."` and `".."` from a path, preserving the root `"/"` of an
/// absolute path as per Sections 5.2.4 and 6.2.2.3 of RFC 3986.
pub(crate) fn normalize(path: &str) -> Cow<'_, str> {
    if !path.split('/').any(|seg| matches!(seg, "." | "..")) {
        return Cow::Borrowed(path);
    }
    let (prefix, rest) = match path.strip_prefix('/') {
        Some(rest) => ("/", rest),
        None => ("", path),
    };
    let segments: Vec<&str> = rest.split('/').collect();
    Cow::Owned(format!("{}{}", prefix, normalize_segments(&segments).join("/")))
}

/// The `remove_dot_segments` algorithm of [Section 5.2.4 of RFC 3986]
/// [section-5.2.4]. Empty segments are preserved.
///
/// [section-5.2.4]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut out = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            out.truncate(out.rfind('/').unwrap_or(0));
            input = &input[3..];
        } else if input == "/.." {
            out.truncate(out.rfind('/').unwrap_or(0));
            input = "/";
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..]
                .find('/')
                .map_or(input.len(), |i| i + start);
            out.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_dot_segments() {
        assert_eq!(normalize("/a/./b/../c"), "/a/c");
        assert_eq!(normalize("/a/b/c/./../../g"), "/a/g");
        assert_eq!(normalize("a/../b"), "b");
    }

    #[test]
    fn normalize_keeps_empty_segments() {
        assert_eq!(normalize("/a//b"), "/a//b");
        assert_eq!(normalize("//a/./b"), "//a/b");
    }

    #[test]
    fn normalize_parent_beyond_root_is_absorbed() {
        assert_eq!(normalize("/../a"), "/a");
        assert_eq!(normalize("/a/../../.."), "/");
    }

    #[test]
    fn normalize_trailing_dot_keeps_slash() {
        assert_eq!(normalize("/a/b/."), "/a/b/");
        assert_eq!(normalize("/a/b/.."), "/a/");
    }

    #[test]
    fn dot_segments_per_rfc() {
        assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
        assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
        assert_eq!(remove_dot_segments("/./"), "/");
        assert_eq!(remove_dot_segments("/../x"), "/x");
        assert_eq!(remove_dot_segments("..") , "");
        assert_eq!(remove_dot_segments("/.//a//"), "//a//");
    }
}
