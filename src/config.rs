use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    const DEFAULT_PATH: &str = "prisma/dev.db";

    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from(Self::DEFAULT_PATH),
        }
    }

    fn ensure_valid(&mut self) {
        if self.path.as_os_str().is_empty() {
            eprintln!(
                "Config error: database path is empty - using default of '{}'",
                Self::DEFAULT_PATH
            );
            self.path = PathBuf::from(Self::DEFAULT_PATH);
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub productseed: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    const PRODUCTSEED_LEVEL: &str = "info";

    fn default() -> Self {
        LoggingConfig {
            productseed: Self::PRODUCTSEED_LEVEL.to_string(),
        }
    }

    /// flexi_logger spec: dependencies at `warn`, this crate at the configured level.
    pub fn log_spec(&self) -> String {
        format!("warn, productseed={}", self.productseed)
    }

    fn ensure_valid(&mut self) {
        let str_original = self.productseed.clone();
        self.productseed = self.productseed.trim().to_ascii_lowercase();
        if !Self::LOG_LEVELS.contains(&self.productseed.as_str()) {
            eprintln!(
                "Config error: productseed log level of '{}' is invalid - using default of '{}'",
                str_original,
                Self::PRODUCTSEED_LEVEL
            );
            self.productseed = Self::PRODUCTSEED_LEVEL.to_owned();
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Config {
    const ENV_PREFIX: &str = "PRODUCTSEED_";

    pub fn default() -> Self {
        Config {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Loads `config.toml` from the app's config directory, writing the
    /// defaults there first if the file doesn't exist yet.
    pub fn load_config(project_dirs: &ProjectDirs) -> Self {
        let config_path = project_dirs.config_dir().join("config.toml");

        if !config_path.exists() {
            Self::write_default(&config_path);
        }

        Self::load_from(&config_path)
    }

    /// Defaults, then the TOML file (if it exists), then `PRODUCTSEED_*`
    /// environment variables. Nested keys use `__`, e.g. `PRODUCTSEED_DATABASE__PATH`.
    /// Falls back to defaults if extraction fails.
    pub fn load_from(config_path: &Path) -> Self {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"));

        let mut config = figment.extract().unwrap_or_else(|err| {
            eprintln!(
                "Could not load config file {}: {}. Using default configuration.",
                config_path.display(),
                err
            );
            Config::default()
        });

        config.ensure_valid();

        config
    }

    fn write_default(config_path: &Path) {
        if let Some(parent) = config_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!(
                    "Failed to create configuration directory {}: {}",
                    parent.display(),
                    e
                );
            }
        }
        match toml::to_string_pretty(&Config::default()) {
            Ok(toml_string) => {
                if let Err(e) = fs::write(config_path, toml_string) {
                    eprintln!(
                        "Failed to write default config to {}: {}",
                        config_path.display(),
                        e
                    );
                }
            }
            Err(_) => eprintln!("Failed to serialize default config."),
        }
    }

    fn ensure_valid(&mut self) {
        self.database.ensure_valid();
        self.logging.ensure_valid();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Path::new("absent.toml"));
            assert_eq!(config, Config::default());
            assert_eq!(config.database.path, PathBuf::from("prisma/dev.db"));
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [database]
                path = "from_file.db"

                [logging]
                productseed = "debug"
                "#,
            )?;
            let config = Config::load_from(Path::new("config.toml"));
            assert_eq!(config.database.path, PathBuf::from("from_file.db"));
            assert_eq!(config.logging.productseed, "debug");

            jail.set_env("PRODUCTSEED_DATABASE__PATH", "from_env.db");
            let config = Config::load_from(Path::new("config.toml"));
            assert_eq!(config.database.path, PathBuf::from("from_env.db"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_log_level_falls_back() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[logging]\nproductseed = \" LOUD \"\n")?;
            let config = Config::load_from(Path::new("config.toml"));
            assert_eq!(config.logging.productseed, "info");
            Ok(())
        });
    }

    #[test]
    fn test_log_level_is_normalized() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[logging]\nproductseed = \" DEBUG \"\n")?;
            let config = Config::load_from(Path::new("config.toml"));
            assert_eq!(config.logging.productseed, "debug");
            assert_eq!(config.logging.log_spec(), "warn, productseed=debug");
            Ok(())
        });
    }

    #[test]
    fn test_write_default_round_trips() {
        Jail::expect_with(|_jail| {
            let path = Path::new("nested/config.toml");
            Config::write_default(path);
            assert!(path.exists());
            assert_eq!(Config::load_from(path), Config::default());
            Ok(())
        });
    }
}
