use figment::Jail;
use seed_config::{SeedConfig, UpdatePolicy};

#[test]
fn env_sets_update_policy_keyword() {
    Jail::expect_with(|jail| {
        jail.set_env("SEEDBED_UPDATES__UPDATABLE_OBJECTS", "all");
        let config: SeedConfig = SeedConfig::figment().extract()?;
        assert_eq!(config.updates.updatable_objects, UpdatePolicy::All);
        Ok(())
    });
}

#[test]
fn env_comma_separated_names_become_allow_list() {
    Jail::expect_with(|jail| {
        jail.set_env("SEEDBED_UPDATES__UPDATABLE_OBJECTS", "device,site");
        let config: SeedConfig = SeedConfig::figment().extract()?;
        assert_eq!(
            config.updates.updatable_objects,
            UpdatePolicy::only(["device", "site"])
        );
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".seedbed")?;
        jail.create_file(
            ".seedbed/config.toml",
            r#"
[general]
fail_fast = false
"#,
        )?;
        jail.set_env("SEEDBED_GENERAL__FAIL_FAST", "true");

        let config: SeedConfig = SeedConfig::figment().extract()?;
        assert!(config.general.fail_fast);
        Ok(())
    });
}
