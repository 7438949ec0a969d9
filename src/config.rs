use std::env;

/// Process configuration, read once at startup and passed by reference
/// (or cloned into `Extension` layers) from there on. No module-level state.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub token_ttl_secs: i64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Config {
        // DATABASE_URL wins when set; otherwise compose it from the same
        // POSTGRES_* variables the deployment already provides.
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = env_or("POSTGRES_HOST", "db");
            let port = env_or("POSTGRES_PORT", "5432");
            let name = env_or("POSTGRES_DB", "escuela_db");
            let user = env_or("DB_USUARIO", "escuela_user");
            let password = env_or("POSTGRES_PASSWORD", "escuela_password123");
            format!(
                "postgresql://{}:{}@{}:{}/{}",
                user, password, host, port, name
            )
        });

        Config {
            database_url,
            jwt_secret: env_or("JWT_SECRETO", "jwt-secret-key"),
            port: env_or("BACKEND_PORT", "5000").parse().unwrap_or(5000),
            token_ttl_secs: 3600,
        }
    }
}
