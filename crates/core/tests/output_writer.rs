//! Tests for merging fragments into the on-disk manifest

use assetmap_core::{KindMap, Manifest, ManifestError, ManifestFileWriter, UnparseablePolicy};
use serde_json::{Value, json};
use tempfile::TempDir;

fn fragment(value: Value) -> Manifest {
    serde_json::from_value(value).unwrap()
}

fn read_json(writer: &ManifestFileWriter) -> Value {
    let content = std::fs::read_to_string(writer.target()).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_missing_file_is_created_with_fragment() {
    let temp = TempDir::new().unwrap();
    let writer = ManifestFileWriter::new(temp.path().join("nested/dir/webpack-assets.json"));

    writer
        .persist_fragment(fragment(json!({ "main": { "js": "/main.js" } })))
        .unwrap();

    assert_eq!(read_json(&writer), json!({ "main": { "js": "/main.js" } }));
}

#[test]
fn test_disjoint_fragments_accumulate() {
    let temp = TempDir::new().unwrap();
    let writer = ManifestFileWriter::new(temp.path().join("webpack-assets.json"));

    writer
        .persist_fragment(fragment(json!({ "client": { "js": "client.js" } })))
        .unwrap();
    writer
        .persist_fragment(fragment(json!({ "server": { "js": "server.js" } })))
        .unwrap();

    assert_eq!(
        read_json(&writer),
        json!({
            "client": { "js": "client.js" },
            "server": { "js": "server.js" }
        })
    );
}

#[test]
fn test_later_fragment_replaces_overlapping_chunk() {
    let temp = TempDir::new().unwrap();
    let writer = ManifestFileWriter::new(temp.path().join("webpack-assets.json"));

    writer
        .persist_fragment(fragment(json!({
            "main": { "js": "main-1.js", "css": "main-1.css" },
            "admin": { "js": "admin-1.js" }
        })))
        .unwrap();
    writer
        .persist_fragment(fragment(json!({ "main": { "js": "main-2.js" } })))
        .unwrap();

    assert_eq!(
        read_json(&writer),
        json!({
            "main": { "js": "main-2.js" },
            "admin": { "js": "admin-1.js" }
        })
    );
}

#[test]
fn test_unparseable_file_fails_and_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("webpack-assets.json");
    std::fs::write(&target, "{ not json").unwrap();
    let writer = ManifestFileWriter::new(target.clone());

    let err = writer
        .persist_fragment(fragment(json!({ "main": { "js": "main.js" } })))
        .unwrap_err();

    assert!(matches!(err, ManifestError::Parse { ref path, .. } if path == &target));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "{ not json");
}

#[test]
fn test_wrong_shape_counts_as_unparseable() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("webpack-assets.json");
    std::fs::write(&target, r#"{"main": {"js": 42}}"#).unwrap();
    let writer = ManifestFileWriter::new(target);

    assert!(matches!(
        writer.read_existing(),
        Err(ManifestError::Parse { .. })
    ));
}

#[test]
fn test_overwrite_policy_replaces_unparseable_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("webpack-assets.json");
    std::fs::write(&target, "garbage").unwrap();
    let writer =
        ManifestFileWriter::new(target).with_unparseable_policy(UnparseablePolicy::Overwrite);

    writer
        .persist_fragment(fragment(json!({ "main": { "js": "main.js" } })))
        .unwrap();

    assert_eq!(read_json(&writer), json!({ "main": { "js": "main.js" } }));
}

#[test]
fn test_update_disabled_replaces_file() {
    let temp = TempDir::new().unwrap();
    let writer = ManifestFileWriter::new(temp.path().join("webpack-assets.json")).with_update(false);

    writer
        .persist_fragment(fragment(json!({ "a": { "js": "a.js" } })))
        .unwrap();
    writer
        .persist_fragment(fragment(json!({ "b": { "js": "b.js" } })))
        .unwrap();

    assert_eq!(read_json(&writer), json!({ "b": { "js": "b.js" } }));
}

#[test]
fn test_pretty_print_and_no_temp_file_left() {
    let temp = TempDir::new().unwrap();
    let writer =
        ManifestFileWriter::new(temp.path().join("webpack-assets.json")).with_pretty_print(true);

    let mut main = KindMap::new();
    main.insert("js".to_string(), "main.js".to_string());
    let mut manifest = Manifest::new();
    manifest.insert("main".to_string(), main);
    writer.persist_fragment(manifest).unwrap();

    let content = std::fs::read_to_string(writer.target()).unwrap();
    assert_eq!(content, "{\n  \"main\": {\n    \"js\": \"main.js\"\n  }\n}");

    let leftovers: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("webpack-assets.json")]);
}

#[test]
fn test_compact_output_keeps_chunk_order() {
    let temp = TempDir::new().unwrap();
    let writer = ManifestFileWriter::new(temp.path().join("webpack-assets.json"));

    let mut first = Manifest::new();
    first.insert("zeta".to_string(), KindMap::new());
    first.insert("alpha".to_string(), KindMap::new());
    writer.persist_fragment(first).unwrap();

    let mut css = KindMap::new();
    css.insert("css".to_string(), "b.css".to_string());
    let mut second = Manifest::new();
    second.insert("beta".to_string(), css);
    second.insert("zeta".to_string(), KindMap::new());
    writer.persist_fragment(second).unwrap();

    let content = std::fs::read_to_string(writer.target()).unwrap();
    assert_eq!(content, r#"{"zeta":{},"alpha":{},"beta":{"css":"b.css"}}"#);
}

#[test]
fn test_failed_rename_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("webpack-assets.json");
    // A non-empty directory cannot be replaced by a file.
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), "x").unwrap();
    let writer = ManifestFileWriter::new(target.clone()).with_update(false);

    let err = writer
        .persist_fragment(fragment(json!({ "main": { "js": "main.js" } })))
        .unwrap_err();

    assert!(matches!(err, ManifestError::Io(_)));
    assert!(!temp.path().join(".webpack-assets.json.tmp").exists());
    assert!(target.join("keep").exists());
}
