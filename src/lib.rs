use config::{Config, ConfigError};
use serde::Deserialize;

pub mod domain;
pub mod infrastructure;

const CONFIG_FILE: &str = "superhotel.toml";
const ENV_PREFIX: &str = "SUPERHOTEL";

#[derive(Clone, Debug, Deserialize)]
pub struct SuperHotelConfig {
    pub database: Database,
    pub logger: Logger,
}

impl SuperHotelConfig {
    /// `superhotel.toml` を読み込み、`SUPERHOTEL__SECTION__KEY` 環境変数で上書きする
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_file(CONFIG_FILE)
    }

    pub fn load_file(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<SuperHotelConfig>()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(default = "Database::default_max_connections")]
    pub max_connections: u32,
}

impl Database {
    /// 接続ごとに独立したインメモリデータベース。接続を1本に保ち、データを維持する
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        }
    }

    fn default_max_connections() -> u32 {
        5
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
