//! End-to-end import/export through the in-memory scene.

use nx3::archive::{self, ArchivePayload};
use nx3::matcher::MatchKind;
use nx3::metadata::{PropertyShape, PropertyValue};
use nx3::ops::{export_archive, export_objects, import_archive, ExportOptions, ImportOptions};
use nx3::scene::{ManifestCodec, MemoryObject, MemoryScene, ObjectKind, Scene, SceneCodec};
use nx3::{Error, Result};
use serde_json::json;

struct FailingCodec;

impl SceneCodec for FailingCodec {
    fn encode(&self, _scene: &dyn Scene, _objects: &[String]) -> Result<Vec<u8>> {
        Err(Error::codec("encoder unavailable"))
    }

    fn decode(&self, _scene: &mut dyn Scene, _payload: &[u8]) -> Result<Vec<String>> {
        Err(Error::codec("decoder unavailable"))
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Seat, Leg, Back meshes plus a Lamp, all selected.
fn chair_scene() -> MemoryScene {
    let mut scene = MemoryScene::new();
    scene.set_active_collection("Furniture");
    scene.add(
        MemoryObject::mesh("Seat", 10)
            .with_modifier("Bevel")
            .with_property("mass", 2i64)
            .with_property("finish", "matte"),
    );
    scene.add(MemoryObject::mesh("Leg", 4));
    scene.add(MemoryObject::mesh("Back", 6).with_property("color", "oak"));
    scene.add(MemoryObject::new("Lamp", ObjectKind::Light).with_property("watts", "60"));
    scene
        .select(&names(&["Seat", "Leg", "Back"]))
        .expect("select");
    scene
}

fn unmerged() -> ExportOptions {
    ExportOptions {
        combine_meshes: false,
        ..Default::default()
    }
}

#[test]
fn test_combined_export_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scene = chair_scene();
    let before = scene.clone();

    let report = export_archive(
        dir.path().join("chair"),
        &mut scene,
        &ManifestCodec,
        &ExportOptions::default(),
    )
    .expect("export");

    assert_eq!(report.path, dir.path().join("chair.nx3"));
    assert_eq!(report.objects, ["chair"]);
    assert_eq!(report.metadata.properties.shape(), PropertyShape::Flat);
    assert_eq!(report.metadata.geometry_name(), Some("chair"));
    assert_eq!(scene, before);

    let mut target = MemoryScene::new();
    let imported = import_archive(&report.path, &mut target, &ManifestCodec, &ImportOptions::default())
        .expect("import");
    assert_eq!(imported.objects, ["chair"]);
    assert_eq!(imported.weights, Some(Vec::new()));
    assert!(imported.matches.failures.is_empty());

    let chair = target.get("chair").expect("chair");
    assert_eq!(chair.properties["mass"], PropertyValue::Int(2));
    assert_eq!(chair.properties["finish"], PropertyValue::Text("matte".into()));
    assert!(chair.needs_redraw);

    let geometry = imported
        .metadata
        .as_ref()
        .and_then(|m| m.geometry.clone())
        .expect("geometry block");
    assert_eq!(
        geometry,
        json!({"name": "chair", "collection": "Furniture", "3d_format": "nx3-manifest"})
    );
}

#[test]
fn test_per_object_export_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scene = chair_scene();
    scene
        .select(&names(&["Seat", "Leg", "Back", "Lamp"]))
        .expect("select");

    let report = export_archive(dir.path().join("set.nx3"), &mut scene, &ManifestCodec, &unmerged())
        .expect("export");
    assert_eq!(report.objects, ["Seat.001", "Leg.001", "Back.001", "Lamp.001"]);

    let props = report.metadata.properties.as_map();
    assert_eq!(props.len(), 3);
    assert!(!props.contains_key("Leg.001"));

    // Import back into the source scene; the staged names are free again.
    let imported = import_archive(&report.path, &mut scene, &ManifestCodec, &ImportOptions::default())
        .expect("import");
    assert_eq!(imported.matches.shape, PropertyShape::Nested);
    assert_eq!(imported.objects.len(), 4);

    let seat = scene.get("Seat.001").expect("seat copy");
    assert_eq!(seat.properties["mass"], PropertyValue::Int(2));
    assert_eq!(seat.mesh.as_ref().map(|m| m.vertices), Some(0));
    let lamp = scene.get("Lamp.001").expect("lamp copy");
    assert_eq!(lamp.kind, ObjectKind::Light);
    assert_eq!(lamp.properties["watts"], PropertyValue::Int(60));
    assert!(scene.get("Leg.001").expect("leg copy").properties.is_empty());
}

#[test]
fn test_suffixed_object_gets_base_name_properties() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cube.nx3");

    let mut source = MemoryScene::new();
    source.add(MemoryObject::mesh("Cube", 8));
    let model = ManifestCodec.encode(&source, &names(&["Cube"])).expect("encode");
    let metadata = serde_json::to_vec(&json!({
        "version": "1.0",
        "type": "nx3_properties",
        "properties": {"Cube": {"size": "1.5", "label": "v1.0.3"}}
    }))
    .expect("json");
    archive::pack(
        &path,
        &ArchivePayload {
            model: &model,
            metadata: &metadata,
            weights: &[],
        },
    )
    .expect("pack");

    let mut scene = MemoryScene::new();
    scene.add(MemoryObject::mesh("Cube", 8));
    let report = import_archive(&path, &mut scene, &ManifestCodec, &ImportOptions::default())
        .expect("import");

    assert_eq!(report.objects, ["Cube.001"]);
    let m = report.matches.match_for("Cube.001").expect("matched");
    assert_eq!(m.kind, MatchKind::BaseName);

    let cube = scene.get("Cube.001").expect("imported cube");
    assert_eq!(cube.properties["size"], PropertyValue::Float(1.5));
    assert_eq!(cube.properties["label"], PropertyValue::Text("v1.0.3".into()));
    assert!(scene.get("Cube").expect("original").properties.is_empty());
}

#[test]
fn test_export_is_idempotent() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    let mut scene = chair_scene();

    let a = export_archive(first.path().join("chair.nx3"), &mut scene, &ManifestCodec, &ExportOptions::default())
        .expect("first export");
    let b = export_archive(second.path().join("chair.nx3"), &mut scene, &ManifestCodec, &ExportOptions::default())
        .expect("second export");

    let a = archive::unpack(&a.path).expect("unpack a");
    let b = archive::unpack(&b.path).expect("unpack b");
    assert_eq!(a.read_model().expect("model"), b.read_model().expect("model"));
    assert_eq!(a.read_metadata().expect("meta"), b.read_metadata().expect("meta"));
    assert_eq!(a.read_weights().expect("weights"), b.read_weights().expect("weights"));
}

#[test]
fn test_merge_bookkeeping_with_non_mesh() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scene = chair_scene();

    let report = export_objects(
        dir.path().join("lit.nx3"),
        &mut scene,
        &names(&["Seat", "Lamp", "Back"]),
        &ManifestCodec,
        &ExportOptions::default(),
    )
    .expect("export");
    assert_eq!(report.objects, ["lit", "Lamp.001"]);

    // The flat set follows the last selected object, here the lamp.
    let props = report.metadata.properties.as_map();
    assert_eq!(props.get("watts"), Some(&json!("60")));
    assert!(!props.contains_key("mass"));
}

#[test]
fn test_encode_failure_leaves_scene_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chair.nx3");
    let mut scene = chair_scene();
    let before = scene.clone();

    let err = export_archive(&path, &mut scene, &FailingCodec, &ExportOptions::default())
        .expect_err("codec fails");
    assert!(matches!(err, Error::Codec(_)));
    assert_eq!(scene, before);
    assert!(!path.exists());
}

#[test]
fn test_nothing_selected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scene = chair_scene();
    scene.select(&[]).expect("deselect");

    let err = export_archive(dir.path().join("x.nx3"), &mut scene, &ManifestCodec, &ExportOptions::default())
        .expect_err("empty selection");
    assert!(matches!(err, Error::NothingSelected));
}

#[test]
fn test_busy_destination_cleans_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chair.nx3");
    std::fs::create_dir(&path).expect("mkdir");
    let mut scene = chair_scene();
    let before = scene.clone();

    let err = export_archive(&path, &mut scene, &ManifestCodec, &ExportOptions::default())
        .expect_err("directory in the way");
    assert!(matches!(err, Error::DestinationBusy { .. }), "got {err:?}");
    assert_eq!(scene, before);
}

#[test]
fn test_malformed_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.nx3");
    let mut source = MemoryScene::new();
    source.add(MemoryObject::mesh("Cube", 8));
    let model = ManifestCodec.encode(&source, &names(&["Cube"])).expect("encode");
    archive::pack(
        &path,
        &ArchivePayload {
            model: &model,
            metadata: b"{\"properties\": ",
            weights: &[],
        },
    )
    .expect("pack");

    let mut lenient = MemoryScene::new();
    let report = import_archive(&path, &mut lenient, &ManifestCodec, &ImportOptions::default())
        .expect("lenient import");
    assert!(report.metadata.is_none());
    assert_eq!(report.objects, ["Cube"]);

    let mut strict = MemoryScene::new();
    let err = import_archive(
        &path,
        &mut strict,
        &ManifestCodec,
        &ImportOptions { strict_metadata: true },
    )
    .expect_err("strict import");
    assert!(matches!(err, Error::InvalidMetadata(_)));
    assert!(strict.is_empty());
}

#[test]
fn test_missing_model() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.nx3");
    {
        use std::io::Write;
        let file = std::fs::File::create(&path).expect("create");
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("nx3.json", zip::write::SimpleFileOptions::default())
            .expect("entry");
        zip.write_all(b"{}").expect("write");
        zip.finish().expect("finish");
    }

    let mut scene = MemoryScene::new();
    let err = import_archive(&path, &mut scene, &ManifestCodec, &ImportOptions::default())
        .expect_err("no model");
    assert!(matches!(err, Error::MissingModel));
    assert!(scene.is_empty());
}

#[test]
fn test_decode_failure_mutates_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scene = chair_scene();
    let report = export_archive(dir.path().join("chair.nx3"), &mut scene, &ManifestCodec, &ExportOptions::default())
        .expect("export");

    let mut target = MemoryScene::new();
    let err = import_archive(&report.path, &mut target, &FailingCodec, &ImportOptions::default())
        .expect_err("decode fails");
    assert!(matches!(err, Error::Codec(_)));
    assert!(target.is_empty());
}
