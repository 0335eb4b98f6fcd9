//! Archive pack/unpack tests against real files on disk.

use std::io::Write;

use nx3::archive::{self, ArchivePayload, EntryRole, MAX_UNCOMPRESSED_SIZE};
use nx3::metadata::{MetadataRecord, Properties, PropertyShape};
use nx3::Error;
use serde_json::{json, Value};

fn glb(len: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"glTF");
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.resize(len as usize, 0x20);
    buf
}

/// Write a zip with arbitrary entries, bypassing `pack`.
fn raw_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).expect("create zip");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).expect("start entry");
        zip.write_all(data).expect("write entry");
    }
    zip.finish().expect("finish zip");
}

#[test]
fn test_pack_unpack_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("asset.nx3");

    let model = glb(64);
    let weights: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let props = match json!({"Cube": {"mass": 2.5, "tag": "v2.0"}}) {
        Value::Object(m) => Properties::classify(m),
        _ => unreachable!(),
    };
    let record = MetadataRecord::builder("asset")
        .collection("Props")
        .properties(props)
        .build();
    let metadata = record.serialize().expect("serialize");

    archive::pack(
        &path,
        &ArchivePayload {
            model: &model,
            metadata: &metadata,
            weights: &weights,
        },
    )
    .expect("pack");

    let unpacked = archive::unpack(&path).expect("unpack");
    assert_eq!(unpacked.read_model().expect("model"), model);
    assert_eq!(unpacked.read_weights().expect("weights"), Some(weights));

    let read_back = unpacked.read_metadata().expect("metadata").expect("present");
    let a: Value = serde_json::from_slice(&read_back).expect("json");
    let b: Value = serde_json::from_slice(&metadata).expect("json");
    assert_eq!(a, b);

    let parsed = MetadataRecord::parse(&read_back).expect("parse");
    assert_eq!(parsed, record);
    assert_eq!(parsed.properties.shape(), PropertyShape::Nested);
    assert_eq!(parsed.geometry_name(), Some("asset"));
}

#[test]
fn test_repack_replaces_destination() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("asset.nx3");
    std::fs::write(&path, b"stale bytes, not a zip").expect("seed");

    let model = glb(32);
    archive::pack(
        &path,
        &ArchivePayload {
            model: &model,
            metadata: b"{}",
            weights: &[],
        },
    )
    .expect("pack over existing");

    let unpacked = archive::unpack(&path).expect("unpack");
    assert_eq!(unpacked.read_model().expect("model"), model);
    assert_eq!(unpacked.read_weights().expect("weights"), Some(Vec::new()));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .collect();
    assert_eq!(leftovers, [std::ffi::OsString::from("asset.nx3")]);
}

#[test]
fn test_foreign_entry_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("foreign.nx3");
    let model = glb(16);
    raw_zip(
        &path,
        &[
            ("Scene.GLB", model.as_slice()),
            ("notes.txt", &br#"{"version": "1.0", "properties": {"a": "1"}}"#[..]),
            ("props.JSON", &br#"{"version": "2.0", "properties": {"b": "2"}}"#[..]),
            ("readme.md", &b"ignored"[..]),
        ],
    );

    let unpacked = archive::unpack(&path).expect("unpack");
    assert_eq!(unpacked.model().expect("model").name, "Scene.GLB");
    let meta = unpacked.metadata().expect("metadata");
    assert_eq!(meta.name, "props.JSON");
    assert_eq!(meta.role, Some(EntryRole::Metadata { legacy: false }));
    assert!(unpacked.weights().is_none());
    assert_eq!(unpacked.entries().len(), 4);
}

#[test]
fn test_not_a_zip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.nx3");
    std::fs::write(&path, glb(64)).expect("write");

    let err = archive::unpack(&path).expect_err("must fail");
    assert!(matches!(err, Error::CorruptArchive(_)), "got {err:?}");
}

#[test]
fn test_size_guard_rejects_before_extracting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("big.nx3");
    let model = vec![0u8; 1 << 16];
    raw_zip(
        &path,
        &[("model.glb", model.as_slice()), ("nx3.safetensor", model.as_slice())],
    );

    let err = archive::unpack_with_limit(&path, 100_000).expect_err("too large");
    match err {
        Error::ArchiveTooLarge { size, limit } => {
            assert_eq!(size, 2 << 16);
            assert_eq!(limit, 100_000);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Under the default cap the same archive is fine.
    assert!(archive::unpack_with_limit(&path, MAX_UNCOMPRESSED_SIZE).is_ok());
}

#[test]
fn test_extraction_dir_is_scoped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("asset.nx3");
    archive::pack(
        &path,
        &ArchivePayload {
            model: &glb(16),
            metadata: b"{}",
            weights: &[],
        },
    )
    .expect("pack");

    let extracted = {
        let unpacked = archive::unpack(&path).expect("unpack");
        assert!(unpacked.dir().is_dir());
        unpacked.dir().to_path_buf()
    };
    assert!(!extracted.exists());
}
