use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub channel_manager: ChannelManagerConfig,
    #[serde(default)]
    pub season: SeasonConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HS256 secret. Tokens are issued by the auth provider; this
    /// service only verifies them.
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelManagerConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_cod_channel")]
    pub cod_channel: String,
    #[serde(default = "default_id_rate")]
    pub id_rate: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Directory holding the "SAISON <year>.csv" calendar files.
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: String,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            calendar_dir: default_calendar_dir(),
        }
    }
}

fn default_cod_channel() -> String {
    "BE".to_string()
}

fn default_id_rate() -> i32 {
    1
}

fn default_calendar_dir() -> String {
    "./assets".to_string()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build from environment variables and defaults.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL").ok_or(
                    "DATABASE_URL is not set and no config.toml was found",
                )?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                    },
                    channel_manager: ChannelManagerConfig {
                        base_url: get_env("CM_BASE_URL").unwrap_or_default(),
                        username: get_env("CM_USERNAME").unwrap_or_default(),
                        password: get_env("CM_PASSWORD").unwrap_or_default(),
                        cod_channel: get_env("CM_COD_CHANNEL")
                            .unwrap_or_else(default_cod_channel),
                        id_rate: get_env_parse("CM_ID_RATE", default_id_rate()),
                    },
                    season: SeasonConfig {
                        calendar_dir: get_env("SEASON_CALENDAR_DIR")
                            .unwrap_or_else(default_calendar_dir),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment variables win over file values.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("CM_BASE_URL") {
            config.channel_manager.base_url = v;
        }
        if let Ok(v) = env::var("CM_USERNAME") {
            config.channel_manager.username = v;
        }
        if let Ok(v) = env::var("CM_PASSWORD") {
            config.channel_manager.password = v;
        }
        if let Ok(v) = env::var("CM_COD_CHANNEL") {
            config.channel_manager.cod_channel = v;
        }
        if let Ok(v) = env::var("CM_ID_RATE")
            && let Ok(r) = v.parse()
        {
            config.channel_manager.id_rate = r;
        }
        if let Ok(v) = env::var("SEASON_CALENDAR_DIR") {
            config.season.calendar_dir = v;
        }

        Ok(config)
    }
}
