//! On-disk session format.
//!
//! A session file is a flat sequence of `key=value&` records with no header
//! and no escaping. Keys and values containing `=` or `&` do not survive a
//! round trip: `&` always ends a record and the first `=` of a record always
//! ends the key.

use std::collections::BTreeMap;
use std::io::{self, Write};

use thiserror::Error;

use super::SessionValue;

/// Ends a record.
pub const RECORD_DELIMITER: u8 = b'&';

/// Separates a key from its value.
pub const KEY_VALUE_SEPARATOR: u8 = b'=';

/// Entries as held by a session.
pub type Entries = BTreeMap<String, SessionValue>;

/// Content that cannot be decoded into entries.
#[derive(Error, Debug)]
#[error("record {record} is not valid UTF-8: {source}")]
pub struct DecodeError {
    /// Zero-based index of the offending record.
    pub record: usize,
    #[source]
    pub source: std::str::Utf8Error,
}

/// Write every entry as `key=value&`.
///
/// Returns the number of records written.
pub fn serialize<W: Write>(entries: &Entries, out: &mut W) -> io::Result<usize> {
    let mut count = 0;
    for (key, value) in entries {
        out.write_all(key.as_bytes())?;
        out.write_all(&[KEY_VALUE_SEPARATOR])?;
        out.write_all(value.as_str().as_bytes())?;
        out.write_all(&[RECORD_DELIMITER])?;
        count += 1;
    }
    Ok(count)
}

/// Decode the records in `bytes`.
///
/// Empty records are skipped. A record without `=` becomes a key with an
/// empty value. If a key repeats, the first occurrence is kept.
pub fn deserialize(bytes: &[u8]) -> Result<Entries, DecodeError> {
    let mut entries = Entries::new();

    for (record, chunk) in bytes
        .split(|b| *b == RECORD_DELIMITER)
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
    {
        let text = std::str::from_utf8(chunk).map_err(|source| DecodeError { record, source })?;
        let (key, value) = text
            .split_once(KEY_VALUE_SEPARATOR as char)
            .unwrap_or((text, ""));

        entries
            .entry(key.to_owned())
            .or_insert_with(|| SessionValue::from(value));
    }

    Ok(entries)
}
