//! Property-based tests for the newc encoder.
//!
//! These tests use proptest to generate arbitrary entries and verify that the
//! layout invariants hold for every one of them.

#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use mkcpio_core::ArchiveWriter;
use mkcpio_core::CpioError;
use mkcpio_core::NormalizedMetadata;
use mkcpio_core::format::newc::padding_len;
use mkcpio_core::format::newc::trailer_bytes;
use mkcpio_core::resolve::basename;
use mkcpio_core::test_utils::parse_archive;
use proptest::prelude::*;
use std::path::PathBuf;

fn entry_strategy() -> impl Strategy<Value = (Vec<u8>, u32, Vec<u8>)> {
    (
        prop::collection::vec(1u8..=255, 1..64),
        0u32..0o7777,
        prop::collection::vec(any::<u8>(), 0..2048),
    )
}

fn encode(entries: &[(Vec<u8>, u32, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ArchiveWriter::new(Vec::new());
    for (name, perm, data) in entries {
        let meta = NormalizedMetadata::regular(data.len() as u64, *perm);
        writer
            .append(name, &meta, &mut data.as_slice())
            .expect("append failed");
    }
    writer.into_inner().expect("finish failed")
}

proptest! {
    /// Every archive reads back to exactly what was written.
    #[test]
    fn prop_archive_reads_back(entries in prop::collection::vec(entry_strategy(), 0..8)) {
        let bytes = encode(&entries);
        let parsed = parse_archive(&bytes).expect("archive did not parse");

        prop_assert_eq!(parsed.len(), entries.len());
        for (got, (name, perm, data)) in parsed.iter().zip(&entries) {
            prop_assert_eq!(&got.name, name);
            prop_assert_eq!(got.mode, 0o100_000 | perm);
            prop_assert_eq!(&got.data, data);
        }
    }

    /// Archive length is always a multiple of 4 and ends with the trailer.
    #[test]
    fn prop_archive_is_aligned(entries in prop::collection::vec(entry_strategy(), 0..8)) {
        let bytes = encode(&entries);
        prop_assert_eq!(bytes.len() % 4, 0);
        prop_assert!(bytes.ends_with(&trailer_bytes()));
    }

    /// Each record occupies header + name + NUL + data, each part padded.
    #[test]
    fn prop_record_length((name, perm, data) in entry_strategy()) {
        let bytes = encode(&[(name.clone(), perm, data.clone())]);
        let head = 110 + name.len() + 1;
        let record = head + padding_len(head as u64) + data.len() + padding_len(data.len() as u64);
        prop_assert_eq!(bytes.len(), record + 124);
    }

    /// Encoding is a pure function of names, permissions and contents.
    #[test]
    fn prop_encoding_is_deterministic(entries in prop::collection::vec(entry_strategy(), 0..4)) {
        prop_assert_eq!(encode(&entries), encode(&entries));
    }

    /// A source longer than declared is reported and leaves an aligned stream.
    #[test]
    fn prop_grown_source_keeps_alignment(
        declared in 0usize..64,
        extra in 1usize..64,
    ) {
        let data = vec![7u8; declared + extra];
        let mut writer = ArchiveWriter::new(Vec::new());
        let meta = NormalizedMetadata::regular(declared as u64, 0o644);
        let err = writer.append(b"grown", &meta, &mut data.as_slice()).expect_err("should fail");
        let is_mismatch = matches!(err, CpioError::ContentLengthMismatch { .. });
        prop_assert!(is_mismatch);
        prop_assert!(err.is_recoverable());

        let bytes = writer.into_inner().expect("finish failed");
        let parsed = parse_archive(&bytes).expect("archive did not parse");
        prop_assert_eq!(parsed[0].data.len(), declared);
    }

    /// The entry name is always the last path component.
    #[test]
    fn prop_basename_is_last_component(
        dirs in prop::collection::vec("[a-z0-9_.-]{1,8}", 0..4),
        file in "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,15}",
    ) {
        let mut path = PathBuf::new();
        for dir in &dirs {
            path.push(dir);
        }
        path.push(&file);
        prop_assert_eq!(basename(&path), Some(file.as_bytes()));
    }
}
