//! Offset index build / persist / load tests

use std::io::Write;
use std::path::PathBuf;

use bzip2::Compression;
use bzip2::write::BzEncoder;
use wikidump_rs::{BlockOffsetIndex, DumpError};

fn compress(text: &str) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("wikidump-index-{}-{name}", std::process::id()));
    path
}

#[test]
fn test_build_is_strictly_ascending_without_duplicates() {
    // repeated and out-of-order offsets in the raw source
    let raw = compress(
        "900:30:Gamma\n0:1:Alpha\n900:31:Delta\n450:20:Beta\n0:2:Epsilon\n450:21:Zeta\n",
    );
    let index = BlockOffsetIndex::build(&raw[..]).unwrap();
    assert_eq!(index.offsets(), &[0, 450, 900]);
    assert!(index.offsets().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_persist_load_round_trip() {
    let index = BlockOffsetIndex::from(vec![0, 1024, 9_999_999_999]);
    let path = temp_path("roundtrip.txt");

    index.persist(&path).unwrap();
    let loaded = BlockOffsetIndex::load(&path).unwrap();
    assert_eq!(loaded, index);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_persisted_format_is_one_decimal_per_line() {
    let index = BlockOffsetIndex::from(vec![5, 10]);
    let path = temp_path("format.txt");

    index.persist(&path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "5\n10\n");

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_load_missing_file() {
    let err = BlockOffsetIndex::load(temp_path("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, DumpError::MissingIndexFile(_)));
}

#[test]
fn test_load_malformed_line_is_reported_with_line_number() {
    let path = temp_path("malformed.txt");
    std::fs::write(&path, "12\n34\nnot-a-number\n56\n").unwrap();

    let err = BlockOffsetIndex::load(&path).unwrap_err();
    match err {
        DumpError::MalformedIndexFile { line, content } => {
            assert_eq!(line, 3);
            assert_eq!(content, "not-a-number");
        }
        other => panic!("unexpected error: {other}"),
    }

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_build_to_file_writes_reloadable_offsets() {
    let raw = compress("640:10:One\n0:1:Two\n640:11:Three\n");
    let index_path = temp_path("raw-index.bz2");
    let offsets_path = temp_path("offsets.txt");
    std::fs::write(&index_path, &raw).unwrap();

    let built = BlockOffsetIndex::build_to_file(&index_path, &offsets_path).unwrap();
    assert_eq!(built.offsets(), &[0, 640]);

    let loaded = BlockOffsetIndex::load(&offsets_path).unwrap();
    assert_eq!(loaded, built);

    std::fs::remove_file(index_path).unwrap();
    std::fs::remove_file(offsets_path).unwrap();
}
