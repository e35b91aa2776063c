use pagewalk::config::{PagingConfig, TlbConfig};
use pagewalk::{Config, ConfigError, Policy};
use pretty_assertions::assert_eq;

#[test]
fn test_empty_document_uses_defaults() {
    let cfg = Config::from_toml_str("").unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.tlb.entries, 16);
    assert_eq!(cfg.paging.frames, 4);
    assert_eq!(cfg.tlb.policy, Policy::Lru);
}

#[test]
fn test_full_document() {
    let src = r#"
        [tlb]
        entries = 64
        policy = "fifo"

        [paging]
        frames = 8
        policy = "CLOCK"
        seed = 42
    "#;
    let cfg = Config::from_toml_str(src).unwrap();
    assert_eq!(
        cfg,
        Config {
            tlb: TlbConfig {
                entries: 64,
                policy: Policy::Fifo,
                seed: None,
            },
            paging: PagingConfig {
                frames: 8,
                policy: Policy::Clock,
                seed: Some(42),
            },
        }
    );
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let cfg = Config::from_toml_str("[paging]\npolicy = \"random\"\n").unwrap();
    assert_eq!(cfg.paging.policy, Policy::Random);
    assert_eq!(cfg.paging.frames, 4);
    assert_eq!(cfg.tlb, TlbConfig::default());
}

#[test]
fn test_unknown_policy_is_parse_error() {
    let err = Config::from_toml_str("[tlb]\npolicy = \"MRU\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("MRU"));
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = Config::from_toml_str("[tlb]\nsize = 4\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_loads_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[tlb]\nentries = 2").unwrap();
    let src = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(Config::from_toml_str(&src).unwrap().tlb.entries, 2);
}
