use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

const DEFAULT_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Shared secret the auth provider signs session tokens with.
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_page_limit")]
    page_limit: i64,
}

fn default_page_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Config {
    pub fn from_toml(bytes: &[u8]) -> ConfigResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(toml::from_str(text)?)
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match read_config(use_local).and_then(|bytes| Self::from_toml(&bytes)) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn page_limit(&self) -> i64 {
        self.page_limit.max(1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
    }

    #[test]
    fn optional_keys_fall_back() {
        let config = Config::from_toml(
            br#"
            [host]
            bindto = "0.0.0.0:80"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/db"
            "#,
        )
        .unwrap();

        assert!(!config.app().docs());
        assert_eq!(config.app().page_limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn missing_section_is_an_error() {
        let result = Config::from_toml(b"[host]\nbindto = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }
}
