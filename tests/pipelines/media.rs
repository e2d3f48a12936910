use cardshift::core::catalog::Catalog;
use cardshift::core::config::Config;
use cardshift::core::content_store::ContentStore;
use cardshift::core::error::CardshiftError;
use cardshift::pipelines::media::MediaMigrator;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn config_for(root: &Path) -> Config {
    Config {
        db_connection: format!("sqlite://{}", root.join("catalog.db").display()),
        card_static_dir: root.join("static/card"),
        media_originals_dir: root.join("media/originals"),
        remap: None,
    }
}

fn seed_cards(root: &Path, schema: &str, cids: &[&str]) {
    let conn = Connection::open(root.join("catalog.db")).expect("open catalog");
    conn.execute(schema, []).expect("create cards table");
    for cid in cids {
        conn.execute(
            "INSERT INTO cards (cid, cimage) VALUES (?1, 'legacy.png')",
            rusqlite::params![cid],
        )
        .expect("seed card");
    }
}

fn place_image(root: &Path, cid: &str, bytes: &[u8]) {
    let dir = root.join("static/card").join(cid);
    fs::create_dir_all(&dir).expect("card dir");
    fs::write(dir.join("card-image"), bytes).expect("write image");
}

fn cimage_of(root: &Path, cid: &str) -> String {
    let conn = Connection::open(root.join("catalog.db")).expect("reopen catalog");
    conn.query_row(
        "SELECT cimage FROM cards WHERE cid=?1",
        rusqlite::params![cid],
        |row| row.get(0),
    )
    .expect("read cimage")
}

const PLAIN_SCHEMA: &str = "CREATE TABLE cards (cid TEXT PRIMARY KEY, cimage TEXT)";

#[test]
fn rehomes_images_dedups_and_skips() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    seed_cards(root, PLAIN_SCHEMA, &["a", "b", "c", "d"]);
    place_image(root, "a", b"shared bytes");
    place_image(root, "b", b"shared bytes");
    place_image(root, "c", b"distinct bytes");
    // "d" never had an upload.

    let config = config_for(root);
    let catalog = Catalog::connect(&config).expect("connect");
    let store = ContentStore::new(config.media_originals_dir.clone());
    let report = MediaMigrator::new(&catalog, &store, &config)
        .run()
        .expect("run");

    assert_eq!(report.migrated, 3);
    assert_eq!(report.skipped, 1);
    assert!(report.failed.is_empty());

    // Identical bytes collapse to one stored file.
    let stored = fs::read_dir(root.join("media/originals"))
        .expect("read store")
        .count();
    assert_eq!(stored, 2);

    let digest_a = cimage_of(root, "a");
    assert_eq!(digest_a, cimage_of(root, "b"));
    assert_ne!(digest_a, cimage_of(root, "c"));
    assert_eq!(digest_a.len(), 64);
    assert_eq!(cimage_of(root, "d"), "legacy.png", "untouched without an upload");

    assert!(store.contains(&digest_a));
    assert!(!root.join("static/card/a/card-image").exists());
}

#[test]
fn rerun_is_a_no_op() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    seed_cards(root, PLAIN_SCHEMA, &["a"]);
    place_image(root, "a", b"bytes");

    let config = config_for(root);
    let catalog = Catalog::connect(&config).expect("connect");
    let store = ContentStore::new(config.media_originals_dir.clone());

    let first = MediaMigrator::new(&catalog, &store, &config)
        .run()
        .expect("first run");
    assert_eq!(first.migrated, 1);
    let digest = cimage_of(root, "a");

    let second = MediaMigrator::new(&catalog, &store, &config)
        .run()
        .expect("second run");
    assert_eq!(second.migrated, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(cimage_of(root, "a"), digest);
}

#[test]
fn per_card_failures_do_not_stop_the_walk() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    // Digests are 64 chars, so every update trips the constraint.
    seed_cards(
        root,
        "CREATE TABLE cards (cid TEXT PRIMARY KEY, cimage TEXT CHECK (length(cimage) < 64))",
        &["a", "b"],
    );
    place_image(root, "a", b"alpha");
    place_image(root, "b", b"beta");

    let config = config_for(root);
    let catalog = Catalog::connect(&config).expect("connect");
    let store = ContentStore::new(config.media_originals_dir.clone());
    let report = MediaMigrator::new(&catalog, &store, &config)
        .run()
        .expect("run");

    assert_eq!(report.migrated, 0);
    assert_eq!(report.failed.len(), 2, "both cards reported, walk continued");
    for failure in &report.failed {
        // Bytes already reached the store; the digest makes them recoverable.
        let digest = failure.digest.as_ref().expect("digest recorded");
        assert!(store.contains(digest));
    }
}

#[test]
fn unwritable_store_root_is_fatal() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    seed_cards(root, PLAIN_SCHEMA, &["a"]);
    fs::create_dir_all(root.join("media")).expect("media dir");
    fs::write(root.join("media/originals"), b"not a directory").expect("block store path");

    let config = config_for(root);
    let catalog = Catalog::connect(&config).expect("connect");
    let store = ContentStore::new(config.media_originals_dir.clone());
    let err = MediaMigrator::new(&catalog, &store, &config)
        .run()
        .expect_err("store init must fail");
    assert!(matches!(err, CardshiftError::StoreWrite { .. }));
}
