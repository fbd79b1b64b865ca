//! Raw record model and attribute decoding.
//!
//! The directory returns every attribute as protocol-native bytes, and almost
//! always as a sequence even for single-valued fields. [`decode`] flattens
//! that encoding into usable text, optionally collapsing one-element
//! sequences into a plain string since that is what most callers want.

use std::collections::HashMap;

/// A raw attribute value as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// A single binary value. Rare on the wire, but the protocol permits it.
    Single(Vec<u8>),

    /// An ordered sequence of binary values.
    Seq(Vec<Vec<u8>>),
}

/// One directory entry: a distinguished name plus its attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Distinguished name of the entry.
    pub dn: String,

    /// Attribute name to raw value(s).
    pub attrs: HashMap<String, AttrValue>,
}

impl RawEntry {
    /// Creates an entry from a DN and attribute map.
    #[must_use]
    pub fn new(dn: impl Into<String>, attrs: HashMap<String, AttrValue>) -> Self {
        Self {
            dn: dn.into(),
            attrs,
        }
    }
}

/// The full result of one search: zero or more entries.
///
/// A successful single-entity query yields exactly one entry; absence yields
/// an empty vector.
pub type RawRecord = Vec<RawEntry>;

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The record set was empty or the key was absent.
    Missing,

    /// A single text value.
    One(String),

    /// An ordered sequence of text values.
    Many(Vec<String>),
}

impl Decoded {
    /// Consumes the value in scalar mode.
    ///
    /// `Missing` becomes the empty string; a multi-valued result yields its
    /// first value.
    #[must_use]
    pub fn into_scalar(self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::One(s) => s,
            Self::Many(values) => values.into_iter().next().unwrap_or_default(),
        }
    }

    /// Consumes the value in sequence mode.
    ///
    /// `Missing` becomes an empty vector; a scalar becomes a one-element
    /// vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Missing => Vec::new(),
            Self::One(s) => vec![s],
            Self::Many(values) => values,
        }
    }

    /// Checks whether the key was absent.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Decodes an attribute of the first entry in a record.
///
/// When `collapse_single` is true and the stored sequence has exactly one
/// element, the result is [`Decoded::One`] instead of a one-element
/// [`Decoded::Many`]. Byte values are decoded as UTF-8; invalid sequences are
/// replaced rather than rejected.
#[must_use]
pub fn decode(record: &[RawEntry], key: &str, collapse_single: bool) -> Decoded {
    let Some(entry) = record.first() else {
        return Decoded::Missing;
    };
    match entry.attrs.get(key) {
        None => Decoded::Missing,
        Some(AttrValue::Single(bytes)) => Decoded::One(decode_bytes(bytes)),
        Some(AttrValue::Seq(values)) => {
            let mut decoded: Vec<String> = values.iter().map(|v| decode_bytes(v)).collect();
            if collapse_single && decoded.len() == 1 {
                Decoded::One(decoded.remove(0))
            } else {
                Decoded::Many(decoded)
            }
        }
    }
}

fn decode_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(key: &str, value: AttrValue) -> RawRecord {
        let mut attrs = HashMap::new();
        attrs.insert(key.to_string(), value);
        vec![RawEntry::new("uid=jdoe,ou=People,dc=example,dc=edu", attrs)]
    }

    fn seq(values: &[&str]) -> AttrValue {
        AttrValue::Seq(values.iter().map(|v| v.as_bytes().to_vec()).collect())
    }

    #[test]
    fn empty_record_decodes_to_missing() {
        let record: RawRecord = Vec::new();

        let decoded = decode(&record, "displayName", true);

        assert!(decoded.is_missing());
        assert_eq!(decoded.clone().into_scalar(), "");
        assert_eq!(decoded.into_vec(), Vec::<String>::new());
    }

    #[test]
    fn absent_key_decodes_to_missing() {
        let record = entry_with("displayName", seq(&["Natalie Emcard"]));

        assert!(decode(&record, "mail", true).is_missing());
        assert!(decode(&record, "mail", false).is_missing());
    }

    #[test]
    fn single_binary_scalar_decodes_to_text() {
        let record = entry_with("note", AttrValue::Single(b"plain scalar".to_vec()));

        assert_eq!(
            decode(&record, "note", true),
            Decoded::One("plain scalar".to_string())
        );
    }

    #[test]
    fn one_element_sequence_collapses_when_asked() {
        let record = entry_with("displayName", seq(&["Natalie Emcard"]));

        assert_eq!(
            decode(&record, "displayName", true),
            Decoded::One("Natalie Emcard".to_string())
        );
        assert_eq!(
            decode(&record, "displayName", false),
            Decoded::Many(vec!["Natalie Emcard".to_string()])
        );
    }

    #[test]
    fn multi_element_sequence_never_collapses() {
        let record = entry_with("role", seq(&["FacultyAA", "Retiree"]));

        assert_eq!(
            decode(&record, "role", true),
            Decoded::Many(vec!["FacultyAA".to_string(), "Retiree".to_string()])
        );
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let record = entry_with("blob", AttrValue::Single(vec![0x66, 0xff, 0x6f]));

        let text = decode(&record, "blob", true).into_scalar();

        assert!(text.starts_with('f'));
        assert!(text.ends_with('o'));
    }

    #[test]
    fn only_the_first_entry_is_consulted() {
        let mut record = entry_with("uid", seq(&["first"]));
        record.extend(entry_with("uid", seq(&["second"])));

        assert_eq!(decode(&record, "uid", true), Decoded::One("first".to_string()));
    }
}
