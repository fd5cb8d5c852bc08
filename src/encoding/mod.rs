//! Percent-encoding utilities.
//!
//! This module implements the two string-level codecs the [`Url`] type is
//! built on: the [`Quoter`], which turns arbitrary Unicode strings into
//! canonical percent-encoded ASCII, and the [`Unquoter`], which computes
//! the decoded view of a percent-encoded string.
//!
//! Both codecs are *requoting*: input that already contains percent-encoded
//! octets is never double-encoded, and percent-escapes are normalized to
//! uppercase hexadecimal on the way through. A malformed escape (a `"%"`
//! not followed by two hexadecimal digits) is repaired in place by encoding
//! the percent character itself; use [`Quoter::quote_strict`] to surface it
//! as an error instead.
//!
//! [`Url`]: crate::Url

pub(crate) mod imp;
pub mod table;

pub use table::Table;

use crate::error::Error;
use std::borrow::Cow;

/// A percent-encoder for a fixed configuration.
///
/// A quoter passes through the characters of its *effective safe table*
/// (the unreserved characters and a profile-dependent subset of sub-delims,
/// extended by the caller-supplied `safe` and `protected` sets) and
/// percent-encodes the UTF-8 octets of everything else.
///
/// Already-encoded octets are handled by a small state machine: a valid
/// `%HH` escape is decoded once and re-emitted either as the literal
/// character (when safe and not protected) or as the canonical uppercase
/// escape; an invalid escape has its `"%"` encoded as `"%25"` and the
/// remainder reprocessed as ordinary characters.
///
/// # Examples
///
/// ```
/// use fluent_url::encoding::Quoter;
///
/// let quoter = Quoter::new("@:", "/+", false)?;
/// assert_eq!(quoter.quote("/path%2fto/a b"), "/path%2Fto/a%20b");
///
/// // Already-canonical input is passed through unchanged.
/// assert!(matches!(
///     quoter.quote("/path%2Fto/a%20b"),
///     std::borrow::Cow::Borrowed(_)
/// ));
/// # Ok::<_, fluent_url::error::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Quoter {
    /// Effective safe table: base ∪ safe ∪ protected.
    safe: Table,
    /// Octets that stay percent-encoded even though the safe table
    /// would otherwise allow them literally.
    protected: Table,
    /// Encode space as `"+"` and treat `+?=;&` as significant.
    qs: bool,
}

impl Quoter {
    /// Creates a quoter from the given `safe` and `protected` character
    /// sets.
    ///
    /// With `qs` set, the quoter produces `application/x-www-form-urlencoded`
    /// style output: space becomes `"+"`, and the characters `+?=;&` are
    /// excluded from the base safe table.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `safe` or `protected` contains a non-ASCII
    /// character.
    pub fn new(safe: &str, protected: &str, qs: bool) -> Result<Quoter, Error> {
        Ok(Quoter::from_tables(
            Table::parse(safe)?,
            Table::parse(protected)?,
            qs,
        ))
    }

    pub(crate) const fn from_tables(safe: Table, protected: Table, qs: bool) -> Quoter {
        let base = if qs { *table::BASE_QS } else { *table::BASE };
        Quoter {
            safe: base.or(&safe).or(&protected),
            protected,
            qs,
        }
    }

    /// Percent-encodes a string, repairing malformed escapes in place.
    ///
    /// Returns [`Cow::Borrowed`] when the input is already in canonical
    /// form.
    #[must_use]
    pub fn quote<'a>(&self, s: &'a str) -> Cow<'a, str> {
        self.quote_impl(s, true)
    }

    /// Percent-encodes a string that carries no escapes of its own:
    /// every `"%"` is data and becomes `"%25"`.
    ///
    /// This is the variant for caller-supplied component values, where
    /// `"50%"` means the three characters `5`, `0` and `%`.
    #[must_use]
    pub fn quote_literal<'a>(&self, s: &'a str) -> Cow<'a, str> {
        self.quote_impl(s, false)
    }

    fn quote_impl<'a>(&self, s: &'a str, requote: bool) -> Cow<'a, str> {
        let bytes = s.as_bytes();
        let mut out = String::with_capacity(bytes.len());
        let mut changed = false;
        let mut i = 0;

        while i < bytes.len() {
            let x = bytes[i];
            if x == b'%' {
                if requote && imp::is_triplet(bytes, i) {
                    let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
                    let octet = imp::decode_octet(hi, lo);
                    if !self.protected.allows(octet) && self.safe.allows(octet) {
                        out.push(octet as char);
                        changed = true;
                    } else {
                        imp::encode_byte(octet, &mut out);
                        changed |= hi.is_ascii_lowercase() || lo.is_ascii_lowercase();
                    }
                    i += 3;
                } else {
                    out.push_str("%25");
                    changed = true;
                    i += 1;
                }
            } else if self.qs && x == b' ' {
                out.push('+');
                changed = true;
                i += 1;
            } else if self.safe.allows(x) {
                out.push(x as char);
                i += 1;
            } else {
                imp::encode_byte(x, &mut out);
                changed = true;
                i += 1;
            }
        }

        if changed {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(s)
        }
    }

    /// Percent-encodes a string, failing on a malformed escape instead of
    /// repairing it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input contains a `"%"` that is not followed by
    /// two hexadecimal digits.
    pub fn quote_strict<'a>(&self, s: &'a str) -> Result<Cow<'a, str>, Error> {
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                if !imp::is_triplet(bytes, i) {
                    return Err(Error::malformed_percent(s, i));
                }
                i += 3;
            } else {
                i += 1;
            }
        }
        Ok(self.quote(s))
    }
}

/// A percent-decoder for a fixed configuration.
///
/// Contiguous runs of `%HH` escapes are decoded as UTF-8; a run that does
/// not decode is preserved verbatim, hexadecimal case included. Decoded
/// characters from the `unsafe` set are re-quoted so that the output can
/// be re-encoded without changing meaning, and escapes whose octet falls
/// in the `ignore` set are left untouched.
///
/// # Examples
///
/// ```
/// use fluent_url::encoding::Unquoter;
///
/// let unquoter = Unquoter::new("", "", false)?;
/// assert_eq!(unquoter.unquote("abc%20def"), "abc def");
/// // A run that is not valid UTF-8 is kept as-is.
/// assert_eq!(unquoter.unquote("%F8ab"), "%F8ab");
/// # Ok::<_, fluent_url::error::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Unquoter {
    /// Octets whose escapes are preserved verbatim.
    ignore: Table,
    /// Characters that are re-quoted rather than decoded.
    unsafe_set: Table,
    /// Decode `"+"` to space.
    qs: bool,
    /// Re-quote decoded characters significant to query strings.
    requote_qs: bool,
}

impl Unquoter {
    /// Creates an unquoter from the given `ignore` and `unsafe` character
    /// sets.
    ///
    /// With `qs` set, a literal `"+"` decodes to a space and decoded
    /// occurrences of `+=&;` are re-quoted to keep the output parseable
    /// as a query string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `ignore` or `unsafe_chars` contains a non-ASCII
    /// character.
    pub fn new(ignore: &str, unsafe_chars: &str, qs: bool) -> Result<Unquoter, Error> {
        Ok(Unquoter::from_tables(
            Table::parse(ignore)?,
            Table::parse(unsafe_chars)?,
            qs,
        ))
    }

    pub(crate) const fn from_tables(ignore: Table, unsafe_set: Table, qs: bool) -> Unquoter {
        Unquoter {
            ignore,
            unsafe_set,
            qs,
            requote_qs: qs,
        }
    }

    /// A `+`-to-space decoder without the query-string re-quote rule,
    /// for tokens that have already been split on the separators.
    pub(crate) const fn plus_only() -> Unquoter {
        Unquoter {
            ignore: Table::EMPTY,
            unsafe_set: Table::EMPTY,
            qs: true,
            requote_qs: false,
        }
    }

    /// Percent-decodes a string.
    ///
    /// Returns [`Cow::Borrowed`] when decoding leaves the input unchanged.
    /// An incomplete escape at the end of input is preserved literally.
    #[must_use]
    pub fn unquote<'a>(&self, s: &'a str) -> Cow<'a, str> {
        let bytes = s.as_bytes();
        let mut out = String::with_capacity(bytes.len());
        let mut changed = false;
        // Decoded octets of the current escape run and its start index.
        let mut run: Vec<u8> = Vec::new();
        let mut run_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if imp::is_triplet(bytes, i) {
                let octet = imp::decode_octet(bytes[i + 1], bytes[i + 2]);
                if self.ignore.allows(octet) {
                    self.flush_run(&mut run, &s[run_start..i], &mut out, &mut changed);
                    out.push_str(&s[i..i + 3]);
                } else {
                    if run.is_empty() {
                        run_start = i;
                    }
                    run.push(octet);
                }
                i += 3;
                continue;
            }

            self.flush_run(&mut run, &s[run_start..i], &mut out, &mut changed);

            let x = bytes[i];
            if x < 128 {
                if x == b'+' {
                    if self.qs && !self.unsafe_set.allows(b'+') {
                        out.push(' ');
                        changed = true;
                    } else {
                        out.push('+');
                    }
                } else if self.unsafe_set.allows(x) && !table::BASE.allows(x) {
                    imp::encode_byte(x, &mut out);
                    changed = true;
                } else {
                    out.push(x as char);
                }
                i += 1;
            } else {
                // Copy a whole non-ASCII character verbatim.
                let len = match x {
                    0xc0..=0xdf => 2,
                    0xe0..=0xef => 3,
                    _ => 4,
                };
                out.push_str(&s[i..i + len]);
                i += len;
            }
        }
        self.flush_run(&mut run, &s[run_start..], &mut out, &mut changed);

        if changed {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(s)
        }
    }

    /// Decodes an accumulated escape run, or preserves it verbatim when it
    /// is not valid UTF-8.
    fn flush_run(&self, run: &mut Vec<u8>, raw: &str, out: &mut String, changed: &mut bool) {
        if run.is_empty() {
            return;
        }
        let before = out.len();
        match std::str::from_utf8(run) {
            Ok(decoded) => {
                for ch in decoded.chars() {
                    if self.unsafe_set.allows_char(ch) {
                        table::BASE.encode(ch, out);
                    } else if self.requote_qs && matches!(ch, '+' | '=' | '&' | ';') {
                        table::BASE_QS.encode(ch, out);
                    } else {
                        out.push(ch);
                    }
                }
                *changed |= &out[before..] != raw;
            }
            Err(_) => out.push_str(raw),
        }
        run.clear();
    }
}

// Quoter profiles shared by the URL pipeline. The safe/protected sets
// follow the component grammars of RFC 3986 section 3.

pub(crate) const QUOTER: &Quoter = &Quoter::from_tables(Table::EMPTY, Table::EMPTY, false);
pub(crate) const PATH_QUOTER: &Quoter =
    &Quoter::from_tables(Table::new(b"@:"), Table::new(b"/+"), false);
pub(crate) const QUERY_QUOTER: &Quoter =
    &Quoter::from_tables(Table::new(b"?/:@"), Table::new(b"=+&;"), true);
pub(crate) const QUERY_PART_QUOTER: &Quoter =
    &Quoter::from_tables(Table::new(b"?/:@"), Table::EMPTY, true);
pub(crate) const FRAGMENT_QUOTER: &Quoter =
    &Quoter::from_tables(Table::new(b"?/:@"), Table::EMPTY, false);

pub(crate) const UNQUOTER: &Unquoter =
    &Unquoter::from_tables(Table::EMPTY, Table::EMPTY, false);
pub(crate) const PATH_UNQUOTER: &Unquoter =
    &Unquoter::from_tables(Table::EMPTY, Table::new(b"+"), false);
pub(crate) const PATH_SAFE_UNQUOTER: &Unquoter =
    &Unquoter::from_tables(Table::new(b"/%"), Table::new(b"+"), false);
pub(crate) const QS_UNQUOTER: &Unquoter =
    &Unquoter::from_tables(Table::EMPTY, Table::EMPTY, true);
pub(crate) const QS_PART_UNQUOTER: &Unquoter = &Unquoter::plus_only();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requote_malformed() {
        let q = QUOTER;
        assert_eq!(q.quote("%HH"), "%25HH");
        assert_eq!(q.quote("%"), "%25");
        assert_eq!(q.quote("%2"), "%252");
        assert_eq!(q.quote("a%2zb"), "a%252zb");
    }

    #[test]
    fn requote_canonicalizes_case() {
        assert_eq!(QUOTER.quote("%d1%84"), "%D1%84");
        assert_eq!(QUOTER.quote("%41"), "A");
    }

    #[test]
    fn sub_delims_pass_through() {
        assert_eq!(QUOTER.quote("!$&'()*+,;="), "!$&'()*+,;=");
        assert_eq!(
            QUOTER.quote("%21%24%26%27%28%29%2A%2B%2C%3B%3D"),
            "!$&'()*+,;="
        );
    }

    #[test]
    fn qs_plus_and_space() {
        let plain = QUOTER;
        let qs = &Quoter::from_tables(Table::EMPTY, Table::EMPTY, true);
        assert_eq!(plain.quote("alpha+beta gamma"), "alpha+beta%20gamma");
        assert_eq!(qs.quote("alpha+beta gamma"), "alpha%2Bbeta+gamma");
    }

    #[test]
    fn protected_stays_encoded() {
        let q = Quoter::new("", "/", false).unwrap();
        assert_eq!(q.quote("/path%2fto/three"), "/path%2Fto/three");
    }

    #[test]
    fn non_ascii_safe_rejected() {
        assert!(Quoter::new("é", "", false).is_err());
        assert!(Unquoter::new("", "é", false).is_err());
    }

    #[test]
    fn strict_surfaces_malformed_percent() {
        assert!(QUOTER.quote_strict("a%2zb").is_err());
        assert_eq!(QUOTER.quote_strict("a%2Fb").unwrap(), "a%2Fb");
    }

    #[test]
    fn unquote_unsafe() {
        let u = Unquoter::new("", "@", false).unwrap();
        assert_eq!(u.unquote("%40"), "%40");
        assert_eq!(u.unquote("a@b"), "a%40b");
    }

    #[test]
    fn unquote_qs_requotes_significant() {
        assert_eq!(QS_UNQUOTER.unquote("a%2Bb=?%3D%2B%26"), "a%2Bb=?%3D%2B%26");
        assert_eq!(QS_UNQUOTER.unquote("a+b"), "a b");
        let u = Unquoter::new("", "+", true).unwrap();
        assert_eq!(u.unquote("a+b"), "a+b");
    }

    #[test]
    fn unquote_ignore_preserves_escape() {
        assert_eq!(
            PATH_SAFE_UNQUOTER.unquote("/%2Fseg%41/%25"),
            "/%2FsegA/%25"
        );
    }

    #[test]
    fn unquote_tail() {
        assert_eq!(UNQUOTER.unquote("%"), "%");
        assert_eq!(UNQUOTER.unquote("%2"), "%2");
        assert_eq!(UNQUOTER.unquote("%F8"), "%F8");
    }

    #[test]
    fn unquote_multibyte_run() {
        assert_eq!(UNQUOTER.unquote("%D0%BF%D1%83"), "пу");
    }
}
