//! Saving and loading pattern lists

use paraglob::{Paraglob, ParaglobConfig, ParaglobError};
use tempfile::tempdir;

#[test]
fn save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patterns.pg");

    let mut pg: Paraglob<String> = Paraglob::new();
    pg.insert("*.example.com", "domains".to_string()).unwrap();
    pg.insert("admin-*", "admins".to_string()).unwrap();
    pg.compile().unwrap();
    pg.save(&path).unwrap();

    let loaded: Paraglob<String> = Paraglob::load(&path, ParaglobConfig::new(), |_, p| {
        String::from_utf8_lossy(p).into_owned()
    })
    .unwrap();

    assert_eq!(loaded, pg);
    assert!(loaded.is_compiled());

    let mut hits = Vec::new();
    loaded
        .find("admin-1.example.com", |_, c| hits.push(c.clone()))
        .unwrap();
    hits.sort();
    assert_eq!(hits, vec!["*.example.com", "admin-*"]);
}

#[test]
fn uncompiled_engine_can_be_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pending.pg");

    let mut pg: Paraglob<u64> = Paraglob::new();
    pg.insert("a*", 0).unwrap();
    pg.save(&path).unwrap();

    let loaded: Paraglob<u64> =
        Paraglob::load(&path, ParaglobConfig::new(), |i, _| i as u64).unwrap();
    assert_eq!(loaded.count("abc").unwrap(), 1);
}

#[test]
fn load_missing_file() {
    let dir = tempdir().unwrap();
    let err = Paraglob::<u64>::load(dir.path().join("absent"), ParaglobConfig::new(), |i, _| {
        i as u64
    })
    .unwrap_err();
    assert!(matches!(err, ParaglobError::Io(_)));
}

#[test]
fn load_truncated_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.pg");

    let pg = Paraglob::build_from_patterns(&["abcdef*"], ParaglobConfig::new()).unwrap();
    let mut data = pg.serialize().unwrap();
    data.truncate(data.len() - 3);
    std::fs::write(&path, data).unwrap();

    let err = Paraglob::<u64>::load(&path, ParaglobConfig::new(), |i, _| i as u64).unwrap_err();
    assert_eq!(
        err,
        ParaglobError::Serialization("Serialization data ended unexpectedly".to_string())
    );
}

#[test]
fn load_applies_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.pg");

    let pg = Paraglob::build_from_patterns(&["*.TXT"], ParaglobConfig::new()).unwrap();
    pg.save(&path).unwrap();

    let config = ParaglobConfig::new().match_mode(paraglob::MatchMode::CaseInsensitive);
    let loaded: Paraglob<u64> = Paraglob::load(&path, config, |i, _| i as u64).unwrap();
    assert_eq!(loaded.count("notes.txt").unwrap(), 1);
    assert_eq!(pg.count("notes.txt").unwrap(), 0);
}
