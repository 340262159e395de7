//! Build the settings of a binary from layered sources
//!
//! ---
//! The configuration is read, in order, from:
//!
//! 1. the file at `BALLOT_CONFIG_PATH` (`base_config/config.toml` by default),
//!    which ships with the repository and must exist;
//! 2. the file at `BALLOT_CONFIG_OVERRIDE_PATH` (`config/config.toml` by
//!    default), if present. The deploy script persists contract addresses there;
//! 3. the user configuration directory of the application, if present;
//! 4. environment variables prefixed with the binary prefix, nested keys
//!    separated by `__` (e.g. `BALLOT_CLIENT_CONTRACTS__VOTING`).
//!
//! Later sources override earlier ones.
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Default path of the base configuration
pub const BASE_CONFIG_PATH: &str = "base_config/config.toml";
/// Default path of the override configuration
pub const OVERRIDE_CONFIG_PATH: &str = "config/config.toml";

/// Merge the settings sources described in the module documentation
pub fn build_ballot_settings<T: DeserializeOwned>(
    app_name: &str,
    env_prefix: &str,
) -> Result<T, config::ConfigError> {
    let mut builder = config::Config::builder();
    let config_path =
        std::env::var("BALLOT_CONFIG_PATH").unwrap_or_else(|_| BASE_CONFIG_PATH.to_string());

    builder = builder.add_source(config::File::with_name(&config_path));

    let config_override_path = std::env::var("BALLOT_CONFIG_OVERRIDE_PATH")
        .unwrap_or_else(|_| OVERRIDE_CONFIG_PATH.to_string());

    if Path::new(&config_override_path).is_file() {
        builder = builder.add_source(config::File::with_name(&config_override_path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "Ballot", app_name) {
        // Portable user config loading
        let user_config_path = proj_dirs.config_dir().join("config.toml");
        if user_config_path.is_file() {
            builder = builder.add_source(config::File::from(user_config_path));
        }
    }

    builder
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serial_test::serial;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Contracts {
        whitelist: String,
        voting: String,
    }

    #[derive(Debug, Deserialize)]
    struct TestSettings {
        history: usize,
        contracts: Contracts,
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    #[serial]
    fn test_override_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_file(
            dir.path(),
            "base.toml",
            "history = 10\n[contracts]\nwhitelist = \"\"\nvoting = \"\"\n",
        );
        let over = write_file(
            dir.path(),
            "override.toml",
            "[contracts]\nwhitelist = \"0x01\"\nvoting = \"0x02\"\n",
        );
        std::env::set_var("BALLOT_CONFIG_PATH", &base);
        std::env::set_var("BALLOT_CONFIG_OVERRIDE_PATH", &over);
        std::env::set_var("BALLOT_SETTINGS_TEST_CONTRACTS__VOTING", "0x03");

        let settings: TestSettings =
            build_ballot_settings("ballot-settings-test", "BALLOT_SETTINGS_TEST").unwrap();

        std::env::remove_var("BALLOT_CONFIG_PATH");
        std::env::remove_var("BALLOT_CONFIG_OVERRIDE_PATH");
        std::env::remove_var("BALLOT_SETTINGS_TEST_CONTRACTS__VOTING");

        assert_eq!(settings.history, 10);
        assert_eq!(settings.contracts.whitelist, "0x01");
        assert_eq!(settings.contracts.voting, "0x03");
    }

    #[test]
    #[serial]
    fn test_missing_base_config_is_an_error() {
        std::env::set_var("BALLOT_CONFIG_PATH", "/nonexistent/ballot/config.toml");
        let settings: Result<TestSettings, _> =
            build_ballot_settings("ballot-settings-test", "BALLOT_SETTINGS_TEST");
        std::env::remove_var("BALLOT_CONFIG_PATH");
        assert!(settings.is_err());
    }
}
