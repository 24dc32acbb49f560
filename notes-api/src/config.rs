use std::sync::OnceLock;

use serde::Deserialize;

pub const DEV_JWT_SECRET: &str = "notes-api-dev-secret";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,

    // auth
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    // http
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default)]
    pub log_json: bool,

    // build
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8181
}

fn default_database_url() -> String {
    "sqlite.db".into()
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.into()
}

fn default_token_ttl_secs() -> u64 {
    72 * 60 * 60
}

fn default_local() -> String {
    "local".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            cors_allowed_origins: Vec::new(),
            log_json: false,
            source: default_local(),
            git_commit: default_local(),
            pipeline_id: default_local(),
            version: default_local(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Installs the process-wide config. The first call wins.
pub fn init(config: Config) -> &'static Config {
    CONFIG.get_or_init(|| config)
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
