use std::time::Duration;

use allersafe_core::domain::common::{
    AllerSafeConfig, AnalysisConfig, DatabaseConfig, LLMConfig,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "allersafe", version, about = "Ingredient allergen analysis service")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    /// Prefix applied to every route, e.g. `/api`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    #[arg(
        id = "database_host",
        long = "database-host",
        env = "DATABASE_HOST",
        default_value = "localhost"
    )]
    pub host: String,

    #[arg(
        id = "database_port",
        long = "database-port",
        env = "DATABASE_PORT",
        default_value_t = 5432
    )]
    pub port: u16,

    #[arg(long = "database-user", env = "DATABASE_USER", default_value = "postgres")]
    pub user: String,

    #[arg(
        long = "database-password",
        env = "DATABASE_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub password: String,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "allersafe")]
    pub name: String,

    #[arg(
        long = "database-max-connections",
        env = "DATABASE_MAX_CONNECTIONS",
        default_value_t = 10
    )]
    pub max_connections: u32,

    #[arg(
        long = "database-connect-timeout-secs",
        env = "DATABASE_CONNECT_TIMEOUT_SECS",
        default_value_t = 10
    )]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    /// Without a key every analysis is answered by the text matcher.
    #[arg(long = "llm-api-key", env = "LLM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(
        long = "llm-base-url",
        env = "LLM_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub base_url: String,

    #[arg(long = "llm-model", env = "LLM_MODEL", default_value = "gpt-3.5-turbo")]
    pub model: String,

    #[arg(
        long = "llm-request-timeout-secs",
        env = "LLM_REQUEST_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub request_timeout_secs: u64,

    #[arg(
        long = "llm-max-concurrency",
        env = "LLM_MAX_CONCURRENCY",
        default_value_t = 8
    )]
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, clap::Args)]
pub struct AnalysisArgs {
    #[arg(
        long = "analysis-llm-timeout-secs",
        env = "ANALYSIS_LLM_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub llm_timeout_secs: u64,

    #[arg(
        long = "analysis-store-timeout-secs",
        env = "ANALYSIS_STORE_TIMEOUT_SECS",
        default_value_t = 5
    )]
    pub store_timeout_secs: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(
        long = "log-filter",
        env = "LOG_FILTER",
        default_value = "info,sqlx=warn,tower_http=debug"
    )]
    pub filter: String,

    /// Emit one JSON object per log line.
    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

impl From<Args> for AllerSafeConfig {
    fn from(args: Args) -> Self {
        AllerSafeConfig {
            database: DatabaseConfig {
                host: args.db.host,
                port: args.db.port,
                username: args.db.user,
                password: args.db.password,
                name: args.db.name,
                max_connections: args.db.max_connections,
                connect_timeout: Duration::from_secs(args.db.connect_timeout_secs),
            },
            llm: LLMConfig {
                api_key: args.llm.api_key,
                base_url: args.llm.base_url,
                model: args.llm.model,
                request_timeout: Duration::from_secs(args.llm.request_timeout_secs),
                max_concurrency: args.llm.max_concurrency,
            },
            analysis: AnalysisConfig {
                llm_timeout: Duration::from_secs(args.analysis.llm_timeout_secs),
                store_timeout: Duration::from_secs(args.analysis.store_timeout_secs),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_map_into_config() {
        let args = Args::parse_from([
            "allersafe",
            "--database-host",
            "db.internal",
            "--database-port",
            "6543",
            "--llm-api-key",
            "sk-test",
            "--analysis-llm-timeout-secs",
            "12",
            "--allowed-origins",
            "https://a.example,https://b.example",
        ]);

        assert_eq!(args.server.allowed_origins.len(), 2);

        let config = AllerSafeConfig::from(args);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.analysis.llm_timeout, Duration::from_secs(12));
    }
}
