// tests/ingest_config.rs
use briefed::config::{load_config_default, load_config_from, BriefedConfig, ENV_CONFIG_PATH, ENV_OUTPUT_PATH};
use std::path::PathBuf;
use std::{env, fs};

const MINIMAL: &str = r#"
[pipeline]
items_per_source = 3

[[sources]]
name = "Only"
url = "https://only.test/feed"
"#;

#[test]
fn load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("briefed.toml");
    fs::write(&p, MINIMAL).unwrap();

    let cfg = load_config_from(&p).unwrap();
    assert_eq!(cfg.sources.len(), 1);
    assert_eq!(cfg.pipeline.items_per_source, 3);
    assert_eq!(cfg.pipeline.summary_sentences, 2);
    assert_eq!(cfg.pipeline.timeout_secs, 10);
}

#[test]
fn invalid_file_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("empty.toml");
    fs::write(&p, "[pipeline]\nitems_per_source = 3\n").unwrap();
    let err = load_config_from(&p).unwrap_err();
    assert!(format!("{err:#}").contains("no feed sources configured"));

    let p2 = dir.path().join("garbage.toml");
    fs::write(&p2, "this is = = not toml").unwrap();
    assert!(load_config_from(&p2).is_err());
}

#[test]
fn shipped_config_file_is_valid() {
    let p = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/briefed.toml");
    let cfg = load_config_from(&p).unwrap();
    assert_eq!(cfg.sources, BriefedConfig::default_seed().sources);
    assert_eq!(cfg.categories, BriefedConfig::default_seed().categories);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_OUTPUT_PATH);

    // 1) Nothing on disk → built-in seed
    let v = load_config_default().unwrap();
    assert_eq!(v, BriefedConfig::default_seed());

    // 2) ./config/briefed.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("briefed.toml"), MINIMAL).unwrap();
    let v2 = load_config_default().unwrap();
    assert_eq!(v2.sources[0].name, "Only");

    // 3) Env path wins
    let p_env = tmp.path().join("other.toml");
    fs::write(
        &p_env,
        "[[sources]]\nname = \"Env\"\nurl = \"http://env.test/rss\"\n",
    )
    .unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let v3 = load_config_default().unwrap();
    assert_eq!(v3.sources[0].name, "Env");

    // 4) Env path to nowhere is an error, not a silent fallback
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    // 5) Output override
    env::set_var(ENV_OUTPUT_PATH, "public/index.html");
    let v5 = load_config_default().unwrap();
    assert_eq!(v5.pipeline.output_path, PathBuf::from("public/index.html"));
    env::remove_var(ENV_OUTPUT_PATH);

    env::set_current_dir(&old).unwrap();
}
