use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File};
use home::home_dir;
use log::debug;
use serde::Deserialize;

const CONFIG_FILE: &str = ".repofetch/config.toml";

pub struct RepofetchConfig {
    pub cache_dir: Option<PathBuf>,
    pub git_program: Option<String>,
    pub default_host: Option<String>,
}

impl RepofetchConfig {
    /// Loads `$HOME/.repofetch/config.toml` overridden by `REPOFETCH_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        let config_file = home_dir().map(|home| home.join(CONFIG_FILE));
        if let Some(config_file) = &config_file {
            debug!("Loading configuration from {}", config_file.display());
        }
        let raw_config = RawConfig::load(config_file.as_deref(), None)?;

        Ok(Self {
            cache_dir: raw_config.cache.dir,
            git_program: raw_config.git.program,
            default_host: raw_config.git.host,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    git: GitConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct CacheConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct GitConfig {
    program: Option<String>,
    host: Option<String>,
}

impl RawConfig {
    fn load(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(config_file) = config_file {
            builder = builder.add_source(File::from(config_file).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("REPOFETCH")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_empty() {
        let env = HashMap::from([]);
        let config = RawConfig::load(None, Some(env)).unwrap();
        assert_eq!(config, RawConfig::default())
    }

    #[test]
    fn load_environment() {
        let env = HashMap::from([
            ("REPOFETCH_CACHE_DIR".to_owned(), "/cache".to_owned()),
            ("REPOFETCH_GIT_PROGRAM".to_owned(), "/opt/git/bin/git".to_owned()),
            (
                "REPOFETCH_GIT_HOST".to_owned(),
                "git@example.com:".to_owned(),
            ),
        ]);
        let config = RawConfig::load(None, Some(env)).unwrap();
        assert_eq!(
            config,
            RawConfig {
                cache: CacheConfig {
                    dir: Some("/cache".into())
                },
                git: GitConfig {
                    program: Some("/opt/git/bin/git".to_owned()),
                    host: Some("git@example.com:".to_owned()),
                }
            }
        )
    }

    #[test]
    fn load_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let config =
            RawConfig::load(Some(&temp.path().join("config.toml")), Some(HashMap::new())).unwrap();
        assert_eq!(config, RawConfig::default())
    }

    #[test]
    fn environment_overrides_file() {
        let temp = tempfile::tempdir().unwrap();
        let config_file = temp.path().join("config.toml");
        std::fs::write(
            &config_file,
            r#"
                [cache]
                dir = "/from/file"

                [git]
                host = "https://gitlab.com/"
            "#,
        )
        .unwrap();
        let env = HashMap::from([("REPOFETCH_CACHE_DIR".to_owned(), "/from/env".to_owned())]);

        let config = RawConfig::load(Some(&config_file), Some(env)).unwrap();

        assert_eq!(
            config,
            RawConfig {
                cache: CacheConfig {
                    dir: Some("/from/env".into())
                },
                git: GitConfig {
                    program: None,
                    host: Some("https://gitlab.com/".to_owned()),
                }
            }
        )
    }
}
