//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use std::path::PathBuf;

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use seed_config::{SeedConfig, UpdatePolicy};

#[test]
fn loads_general_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
data_dir = "seed-data"
store_path = "state/store.jsonl"
fail_fast = true
"#,
        )?;

        let config: SeedConfig = Figment::from(Serialized::defaults(SeedConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.data_dir, PathBuf::from("seed-data"));
        assert_eq!(config.general.store_path, PathBuf::from("state/store.jsonl"));
        assert!(config.general.fail_fast);
        Ok(())
    });
}

#[test]
fn updatable_objects_accepts_keyword() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[updates]
updatable_objects = "all"
"#,
        )?;

        let config: SeedConfig = Figment::from(Serialized::defaults(SeedConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.updates.updatable_objects, UpdatePolicy::All);
        Ok(())
    });
}

#[test]
fn updatable_objects_accepts_list() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[updates]
updatable_objects = ["Device", "Site"]
"#,
        )?;

        let config: SeedConfig = Figment::from(Serialized::defaults(SeedConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let policy = config.updates.updatable_objects;
        assert!(policy.allows("device"));
        assert!(policy.allows("SITE"));
        assert!(!policy.allows("Rack"));
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".seedbed")?;
        jail.create_file(
            ".seedbed/config.toml",
            r#"
[general]
data_dir = "from-project"
"#,
        )?;

        let config: SeedConfig = SeedConfig::figment().extract()?;
        assert_eq!(config.general.data_dir, PathBuf::from("from-project"));
        assert!(config.updates.updatable_objects.is_none());
        Ok(())
    });
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "")?;

        let config: SeedConfig = Figment::from(Serialized::defaults(SeedConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.data_dir, PathBuf::from("initializers"));
        assert_eq!(config.updates.updatable_objects, UpdatePolicy::None);
        Ok(())
    });
}
