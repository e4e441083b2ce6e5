use thiserror::Error;

/// レコードストアの実装の選択
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// プロセス内メモリ（再起動で消える）
    Memory,
    /// PostgreSQL
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

/// 起動時に作成する管理者アカウント
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub storage: StorageConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("STORAGE=postgres requires DATABASE_URL")]
    MissingDatabaseUrl,

    /// 管理者のユーザー名とパスワードは両方指定するか、両方省略する
    #[error("BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together")]
    IncompleteBootstrapAdmin,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl Config {
    /// 環境変数から設定を読み込む
    ///
    /// - `PORT`（既定 3000）
    /// - `STORAGE`: `memory` / `postgres`（既定は `DATABASE_URL` があれば postgres）
    /// - `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`（既定 5）
    /// - `BOOTSTRAP_ADMIN_USERNAME`, `BOOTSTRAP_ADMIN_PASSWORD`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む（テスト用に環境変数を差し替えられる）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;

        let database_url = var("DATABASE_URL");
        let storage = match var("STORAGE").as_deref() {
            Some("memory") => StorageConfig::Memory,
            Some("postgres") => postgres_config(database_url, &var)?,
            None if database_url.is_some() => postgres_config(database_url, &var)?,
            None => StorageConfig::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "STORAGE",
                    value: other.to_string(),
                });
            }
        };

        let bootstrap_admin = match (
            var("BOOTSTRAP_ADMIN_USERNAME"),
            var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteBootstrapAdmin),
        };

        Ok(Self {
            port,
            storage,
            bootstrap_admin,
        })
    }
}

fn postgres_config(
    database_url: Option<String>,
    var: &impl Fn(&str) -> Option<String>,
) -> Result<StorageConfig, ConfigError> {
    let database_url = database_url.ok_or(ConfigError::MissingDatabaseUrl)?;
    let max_connections = parse_or(
        var("DATABASE_MAX_CONNECTIONS"),
        "DATABASE_MAX_CONNECTIONS",
        DEFAULT_MAX_CONNECTIONS,
    )?;
    Ok(StorageConfig::Postgres {
        database_url,
        max_connections,
    })
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
