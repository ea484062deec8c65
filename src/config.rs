use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database URL (`sqlite://path` or `sqlite::memory:`)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// bcrypt work factor used when seeding users
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Password shared by every user created from a MovieLens import
    #[serde(default = "default_import_password")]
    pub import_password: String,
}

fn default_database_url() -> String {
    "sqlite://./data/app.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_import_password() -> String {
    "movielens".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            host: default_host(),
            port: default_port(),
            bcrypt_cost: default_bcrypt_cost(),
            import_password: default_import_password(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
