//! Byte classification tables from RFC 3986.
//!
//! The predefined table constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

use crate::error::Error;

/// A 128-bit set specifying the ASCII bytes allowed to appear
/// unencoded in a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table {
    bits: u128,
}

impl Table {
    /// An empty table.
    pub const EMPTY: Table = Table { bits: 0 };

    /// Creates a table that allows the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Table {
        let mut bits = 0u128;
        while let [cur, rem @ ..] = bytes {
            assert!(cur.is_ascii(), "cannot allow non-ASCII byte");
            bits |= 1 << *cur;
            bytes = rem;
        }
        Table { bits }
    }

    /// Creates a table from a caller-supplied character set.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the set contains a non-ASCII character.
    pub fn parse(set: &str) -> Result<Table, Error> {
        if !set.is_ascii() {
            return Err(Error::invalid_argument(format!(
                "non-ASCII character in set {set:?}"
            )));
        }
        Ok(Table::new(set.as_bytes()))
    }

    /// Combines two tables into one.
    ///
    /// Returns a new table that allows all the bytes allowed
    /// by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: &Table) -> Table {
        Table {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether the table allows the given byte.
    #[inline]
    #[must_use]
    pub const fn allows(&self, x: u8) -> bool {
        x < 128 && self.bits >> x & 1 == 1
    }

    /// Checks whether the table allows the given character.
    #[inline]
    #[must_use]
    pub const fn allows_char(&self, ch: char) -> bool {
        (ch as u32) < 128 && self.bits >> ch as u32 & 1 == 1
    }

    /// Appends the character to the buffer, percent-encoding its UTF-8
    /// bytes unless the table allows it.
    pub(crate) fn encode(&self, ch: char, buf: &mut String) {
        if self.allows_char(ch) {
            buf.push(ch);
        } else {
            for x in ch.encode_utf8(&mut [0; 4]).bytes() {
                super::imp::encode_byte(x, buf);
            }
        }
    }

    /// Validates the given string with the table, permitting
    /// percent-encoded octets.
    ///
    /// On failure returns the index of the offending byte.
    pub(crate) fn validate_enc(&self, s: &[u8]) -> Result<(), usize> {
        let mut i = 0;
        while i < s.len() {
            let x = s[i];
            if x == b'%' {
                if i + 2 >= s.len()
                    || !(s[i + 1].is_ascii_hexdigit() && s[i + 2].is_ascii_hexdigit())
                {
                    return Err(i);
                }
                i += 3;
            } else {
                if !self.allows(x) {
                    return Err(i);
                }
                i += 1;
            }
        }
        Ok(())
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

// Rules from RFC 3986:

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: &Table = &new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: &Table = &new(b"0123456789");

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`
pub const HEXDIG: &Table = &DIGIT.or(&new(b"ABCDEFabcdef"));

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: &Table = &ALPHA.or(DIGIT).or(&new(b"+-."));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: &Table = &ALPHA.or(DIGIT).or(&new(b"-._~"));

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: &Table = &new(b"!$&'()*+,;=");

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: &Table = &new(b":/?#[]@");

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME: &Table = &UNRESERVED.or(SUB_DELIMS);

// Quoter bases:

/// The sub-delims that never carry query-string meaning.
pub(crate) const SUB_DELIMS_NO_QS: &Table = &new(b"!$'()*,");

/// The characters significant in `application/x-www-form-urlencoded`
/// query strings, plus `"?"`.
pub(crate) const QS_SIGNIFICANT: &Table = &new(b"+?=;&");

/// Base table for query-string quoting.
pub(crate) const BASE_QS: &Table = &UNRESERVED.or(SUB_DELIMS_NO_QS);

/// Base table for general quoting.
pub(crate) const BASE: &Table = &BASE_QS.or(QS_SIGNIFICANT);
