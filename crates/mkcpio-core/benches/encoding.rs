//! Benchmarks for newc encoding throughput.
//!
//! Measures header encoding, in-memory entry streaming across content sizes,
//! and end-to-end creation from files on disk.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_possible_truncation,
    clippy::uninlined_format_args
)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use mkcpio_core::ArchiveConfig;
use mkcpio_core::ArchiveWriter;
use mkcpio_core::NormalizedMetadata;
use mkcpio_core::create_archive;
use mkcpio_core::format::NewcHeader;
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes `count` files of `size` bytes each and returns their paths.
fn create_inputs(temp: &TempDir, count: usize, size: usize) -> Vec<PathBuf> {
    let content = vec![0xA5u8; size];
    (0..count)
        .map(|i| {
            let path = temp.path().join(format!("input_{:04}.bin", i));
            fs::write(&path, &content).unwrap();
            path
        })
        .collect()
}

fn benchmark_header_encoding(c: &mut Criterion) {
    let meta = NormalizedMetadata::regular(1000, 0o644);
    c.bench_function("encode_header", |b| {
        b.iter(|| {
            let header = NewcHeader::for_entry(black_box(b"kernel.elf"), black_box(&meta));
            black_box(header.encode().unwrap())
        });
    });
}

fn benchmark_entry_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_sizes");

    for size in [0usize, 1, 4 * 1024, 1024 * 1024] {
        let content = vec![0x5Au8; size];
        let meta = NormalizedMetadata::regular(size as u64, 0o644);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("append", size), &content, |b, content| {
            b.iter(|| {
                let mut writer = ArchiveWriter::new(Vec::with_capacity(size + 256));
                writer
                    .append(b"payload.bin", &meta, &mut content.as_slice())
                    .unwrap();
                black_box(writer.into_inner().unwrap())
            });
        });
    }

    group.finish();
}

fn benchmark_create_from_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_archive");
    let temp = TempDir::new().unwrap();

    for count in [10usize, 100] {
        let inputs = create_inputs(&temp, count, 4 * 1024);
        let config = ArchiveConfig::default();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("files", count), &inputs, |b, inputs| {
            b.iter(|| {
                let output = temp.path().join("output.cpio");
                let _ = create_archive(black_box(&output), black_box(inputs), &config);
                fs::remove_file(&output).ok();
            });
        });
    }

    group.finish();
}

fn benchmark_buffer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_sizes");
    let temp = TempDir::new().unwrap();
    let inputs = create_inputs(&temp, 4, 1024 * 1024);

    for buffer_size in [4 * 1024usize, 64 * 1024, 1024 * 1024] {
        let config = ArchiveConfig::default().with_buffer_size(buffer_size);
        group.bench_with_input(
            BenchmarkId::new("buffer", buffer_size),
            &config,
            |b, config| {
                b.iter(|| {
                    let output = temp.path().join("output.cpio");
                    let _ = create_archive(&output, &inputs, black_box(config));
                    fs::remove_file(&output).ok();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_header_encoding,
    benchmark_entry_sizes,
    benchmark_create_from_files,
    benchmark_buffer_sizes,
);
criterion_main!(benches);
