use std::fs;

use assert_matches::assert_matches;

use g2ko::config::{Config, ConfigLoader, DEFAULT_OUTPUT_FILE, OrganismEntry, OrganismEntryObject};
use g2ko::error::G2koError;
use g2ko::kegg::MAX_TIMEOUT_SECS;

#[test]
fn parse_config_mixed_entries() {
    let config = Config {
        schema_version: None,
        organisms: vec![
            OrganismEntry::Shorthand("eco".to_string()),
            OrganismEntry::Detailed(OrganismEntryObject {
                code: "hsa".to_string(),
                name: Some("Human".to_string()),
            }),
        ],
        include_functions: Some(false),
        output: None,
        kegg: None,
    };

    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.organisms.len(), 2);
    assert_eq!(resolved.organisms[0].display_name(), "Organism 1");
    assert_eq!(resolved.organisms[1].display_name(), "Human");
    assert!(!resolved.include_functions);
    assert_eq!(resolved.output, DEFAULT_OUTPUT_FILE);
}

#[test]
fn resolve_from_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("g2ko.json");
    fs::write(
        &path,
        r#"{
            "organisms": ["eco", {"code": "hsa", "name": "Human"}],
            "output": "out/report.txt",
            "kegg": {"link_timeout_secs": 0}
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.organisms[1].code().as_str(), "hsa");
    assert_eq!(resolved.output, "out/report.txt");
    assert_eq!(resolved.kegg.base_url, "https://rest.kegg.jp");
    assert_eq!(resolved.kegg.link_timeout_secs, 1);
    assert_eq!(resolved.kegg.list_timeout_secs, 25);
}

#[test]
fn invalid_json_reported() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("g2ko.json");
    fs::write(&path, "{ organisms: ").unwrap();

    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, G2koError::ConfigParse(_));
}

#[test]
fn unreadable_explicit_path() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("missing.json");

    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, G2koError::ConfigRead(_));
}

#[test]
fn empty_organism_list_leaves_requests_unset() {
    let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
    assert!(resolved.requests().is_none());

    let config: Config = serde_json::from_str(r#"{"organisms": ["eco"]}"#).unwrap();
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.requests().map(<[_]>::len), Some(1));
}

#[test]
fn oversized_timeouts_are_clamped() {
    let config: Config = serde_json::from_str(
        r#"{
            "organisms": ["eco"],
            "kegg": {"link_timeout_secs": 18446744073709551615, "list_timeout_secs": 301}
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.kegg.link_timeout_secs, MAX_TIMEOUT_SECS);
    assert_eq!(resolved.kegg.list_timeout_secs, MAX_TIMEOUT_SECS);
}

#[test]
fn insecure_base_url_rejected() {
    let config: Config = serde_json::from_str(
        r#"{"organisms": ["eco"], "kegg": {"base_url": "http://rest.kegg.jp"}}"#,
    )
    .unwrap();

    let err = ConfigLoader::resolve_config(config).unwrap_err();
    assert_matches!(err, G2koError::ConfigParse(message) if message.contains("https"));
}
