use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub url_prefix: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub uploads: UploadConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://chefchecker.db".into());
        let uploads = UploadConfig {
            dir: std::env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "public/uploads".into())
                .into(),
            url_prefix: std::env::var("UPLOADS_URL_PREFIX")
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "/uploads".into()),
            max_bytes: parse_var("MAX_UPLOAD_BYTES", 3 * 1024 * 1024)?,
        };
        Ok(Self {
            database_url,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("APP_PORT", 3000)?,
            uploads,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let v: u16 = parse_var("CHEFCHECKER_TEST_UNSET_VAR", 4242).unwrap();
        assert_eq!(v, 4242);
    }

    #[test]
    fn parse_var_reports_bad_numbers() {
        std::env::set_var("CHEFCHECKER_TEST_BAD_PORT", "eighty");
        let err = parse_var::<u16>("CHEFCHECKER_TEST_BAD_PORT", 80).unwrap_err();
        assert!(err.to_string().contains("CHEFCHECKER_TEST_BAD_PORT"));
    }
}
