use std::env;
use std::path::PathBuf;

pub const DEFAULT_FIXTURE_PATH: &str = "fixtures/tests_data.json";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://publisher_sales.db?mode=rwc";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub fixture_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration from any key/value source.
    ///
    /// `DATABASE_URL` wins; otherwise a DSN is assembled from `DRIVER`,
    /// `LOGIN`, `PASSWORD`, `HOST`, `PORT` and `BD` when `DRIVER` and `BD`
    /// are both present; otherwise a local SQLite file is used.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL")
            .or_else(|| dsn_from_parts(&var))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Self {
            database_url,
            fixture_path: var("FIXTURE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE_PATH)),
        }
    }

    /// Database URL with the password masked, for logs
    pub fn redacted_database_url(&self) -> String {
        redact_password(&self.database_url)
    }
}

fn dsn_from_parts<F>(var: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let driver = var("DRIVER")?;
    let database = var("BD")?;
    let host = var("HOST").unwrap_or_else(|| "localhost".to_string());

    let credentials = match (var("LOGIN"), var("PASSWORD")) {
        (Some(login), Some(password)) => format!("{}:{}@", login, password),
        (Some(login), None) => format!("{}@", login),
        _ => String::new(),
    };

    let port = var("PORT").map(|p| format!(":{}", p)).unwrap_or_default();

    Some(format!(
        "{}://{}{}{}/{}",
        driver, credentials, host, port, database
    ))
}

fn redact_password(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    match rest[..at].find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &url[..scheme_end + 3],
            &rest[..colon],
            &rest[at..]
        ),
        None => url.to_string(),
    }
}
