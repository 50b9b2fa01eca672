//! Persisted pattern lists
//!
//! Only pattern texts are persisted, never compiled state. Layout, all
//! integers little-endian:
//!
//! ```text
//! u64 count
//! count × { u64 len, len bytes }
//! ```

use crate::error::{ParaglobError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

/// Encode a list of patterns
pub fn serialize_patterns<I, P>(patterns: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let patterns: Vec<P> = patterns.into_iter().collect();
    let mut buf = Vec::with_capacity(
        8 + patterns
            .iter()
            .map(|p| 8 + p.as_ref().len())
            .sum::<usize>(),
    );

    buf.write_u64::<LittleEndian>(patterns.len() as u64)?;
    for pattern in &patterns {
        let bytes = pattern.as_ref();
        buf.write_u64::<LittleEndian>(bytes.len() as u64)?;
        buf.extend_from_slice(bytes);
    }
    Ok(buf)
}

fn ended_early() -> ParaglobError {
    ParaglobError::Serialization("Serialization data ended unexpectedly".to_string())
}

/// Decode a list of patterns
///
/// Fails if the data ends inside a record, holds fewer records than
/// announced, or has bytes left after the last record.
pub fn unserialize_patterns(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut cursor = Cursor::new(data);
    let count = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| ended_early())?;

    // Every record needs at least its length prefix
    let plausible = (data.len() as u64).saturating_sub(8) / 8;
    let mut patterns = Vec::with_capacity(count.min(plausible) as usize);

    for _ in 0..count {
        let remaining = data.len() as u64 - cursor.position();
        if remaining == 0 {
            return Err(ParaglobError::Serialization(
                "Read fewer patterns than expected".to_string(),
            ));
        }
        let len = cursor
            .read_u64::<LittleEndian>()
            .map_err(|_| ended_early())?;
        if len > data.len() as u64 - cursor.position() {
            return Err(ended_early());
        }
        let mut pattern = vec![0u8; len as usize];
        cursor.read_exact(&mut pattern).map_err(|_| ended_early())?;
        patterns.push(pattern);
    }

    if cursor.position() != data.len() as u64 {
        return Err(ParaglobError::Serialization(
            "Read more patterns than expected".to_string(),
        ));
    }
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ParaglobError) -> String {
        match err {
            ParaglobError::Serialization(msg) => msg,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_layout() {
        let data = serialize_patterns(["ab", "*"]).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"ab");
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(b"*");
        assert_eq!(data, expected);
    }

    #[test]
    fn test_decode() {
        let data = serialize_patterns(["abc*def", "", "x\0y"]).unwrap();
        let patterns = unserialize_patterns(&data).unwrap();
        assert_eq!(patterns, vec![b"abc*def".to_vec(), Vec::new(), b"x\0y".to_vec()]);
    }

    #[test]
    fn test_empty_list() {
        let data = serialize_patterns(Vec::<&[u8]>::new()).unwrap();
        assert_eq!(data, 0u64.to_le_bytes());
        assert!(unserialize_patterns(&data).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_header() {
        let err = unserialize_patterns(&[1, 0, 0]).unwrap_err();
        assert_eq!(message(err), "Serialization data ended unexpectedly");
    }

    #[test]
    fn test_truncated_record() {
        let mut data = serialize_patterns(["abcdef"]).unwrap();
        data.truncate(data.len() - 2);
        let err = unserialize_patterns(&data).unwrap_err();
        assert_eq!(message(err), "Serialization data ended unexpectedly");
    }

    #[test]
    fn test_fewer_records_than_announced() {
        let mut data = serialize_patterns(["a", "b"]).unwrap();
        data[0] = 3;
        let err = unserialize_patterns(&data).unwrap_err();
        assert_eq!(message(err), "Read fewer patterns than expected");
    }

    #[test]
    fn test_trailing_data() {
        let mut data = serialize_patterns(["a"]).unwrap();
        data.extend_from_slice(&1u64.to_le_bytes());
        data.push(b'b');
        let err = unserialize_patterns(&data).unwrap_err();
        assert_eq!(message(err), "Read more patterns than expected");
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        let data = u64::MAX.to_le_bytes();
        let err = unserialize_patterns(&data).unwrap_err();
        assert_eq!(message(err), "Read fewer patterns than expected");
    }
}
