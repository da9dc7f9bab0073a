//! Versionado, alias y deduplicación del store en disco.

use std::fs;
use std::path::Path;

use flow_core::{ArtifactRef, ArtifactStore, NewArtifact, StoreError};
use flow_persistence::FsArtifactStore;

fn publish(store: &mut FsArtifactStore, dir: &Path, name: &str, body: &str) -> flow_core::ArtifactVersion {
    let src = dir.join(format!("src-{}", body.len()));
    fs::write(&src, body).unwrap();
    store.publish(NewArtifact { name,
                                kind: "raw_data",
                                description: "sample",
                                source: &src })
         .unwrap()
}

#[test]
fn versions_increase_and_latest_moves() {
    let home = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(home.path().join("artifacts"));

    let v0 = publish(&mut store, home.path(), "sample.csv", "a,b\n1,2\n");
    let v1 = publish(&mut store, home.path(), "sample.csv", "a,b\n1,2\n3,4\n");

    assert_eq!((v0.version, v1.version), (0, 1));
    let latest = store.resolve(&ArtifactRef::latest("sample.csv")).unwrap();
    assert_eq!(latest.version, 1);
    let all = store.versions("sample.csv").unwrap();
    assert_eq!(all.iter().filter(|v| v.has_alias("latest")).count(), 1);
    assert!(!all[0].has_alias("latest"));
}

#[test]
fn identical_content_is_not_versioned_twice() {
    let home = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(home.path());

    let first = publish(&mut store, home.path(), "clean.csv", "x\n1\n");
    let again = publish(&mut store, home.path(), "clean.csv", "x\n1\n");

    assert_eq!(first, again);
    assert_eq!(store.versions("clean.csv").unwrap().len(), 1);
}

#[test]
fn fetch_returns_a_copy_of_the_published_file() {
    let home = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(home.path().join("artifacts"));
    publish(&mut store, home.path(), "sample.csv", "id\n7\n");

    let (version, path) = store.fetch(&"sample.csv:v0".parse().unwrap()).unwrap();

    assert_eq!(version.id(), "sample.csv:v0");
    assert!(path.starts_with(home.path().join("artifacts")));
    assert_eq!(fs::read_to_string(path).unwrap(), "id\n7\n");
}

#[test]
fn alias_is_unique_per_name() {
    let home = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(home.path());
    publish(&mut store, home.path(), "model", "m0");
    publish(&mut store, home.path(), "model", "m-one");

    store.add_alias(&"model:v0".parse().unwrap(), "prod").unwrap();
    store.add_alias(&"model:v1".parse().unwrap(), "prod").unwrap();

    let prod = store.resolve(&"model:prod".parse().unwrap()).unwrap();
    assert_eq!(prod.version, 1);
    let holders = store.versions("model").unwrap().into_iter().filter(|v| v.has_alias("prod")).count();
    assert_eq!(holders, 1);
}

#[test]
fn unknown_names_and_tags_are_not_found() {
    let home = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(home.path());
    publish(&mut store, home.path(), "sample.csv", "a\n");

    assert!(matches!(store.resolve(&"missing.csv".parse().unwrap()), Err(StoreError::ArtifactNotFound(_))));
    assert!(matches!(store.resolve(&"sample.csv:prod".parse().unwrap()), Err(StoreError::ArtifactNotFound(_))));
    assert!(matches!(store.resolve(&"sample.csv:v9".parse().unwrap()), Err(StoreError::ArtifactNotFound(_))));
}

#[test]
fn manifest_survives_a_new_store_instance() {
    let home = tempfile::tempdir().unwrap();
    {
        let mut store = FsArtifactStore::new(home.path());
        publish(&mut store, home.path(), "sample.csv", "a\n1\n");
    }
    let reopened = FsArtifactStore::new(home.path());
    assert_eq!(reopened.resolve(&ArtifactRef::latest("sample.csv")).unwrap().version, 0);
}
