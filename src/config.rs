use crate::error::{MissingEnvVarSnafu, ParsePortSnafu, ParseServerIpSnafu, RosterResult};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::{OptionExt, ResultExt};
use std::{net::SocketAddr, sync::Arc};

pub const DEFAULT_SERVER_IP: &str = "127.0.0.1:4000";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: SocketAddr,
    db_config: Option<Arc<DbConfig>>,
    api_base_url: Option<String>,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Self::from_lookup(|name| var(name).ok())
    }

    /// Builds the configuration from any variable source, `None` meaning unset.
    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> RosterResult<Self> {
        let server_ip = match (lookup("ROSTER_SERVER_IP"), lookup("PORT")) {
            (Some(ip), _) => ip,
            (None, Some(port)) => {
                let port: u16 = port.trim().parse().context(ParsePortSnafu)?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => DEFAULT_SERVER_IP.to_string(),
        };
        let server_ip: SocketAddr = server_ip
            .parse()
            .context(ParseServerIpSnafu { original: server_ip })?;

        let db_config = if lookup("DB_PATH").is_some() {
            Some(Arc::new(DbConfig::from_lookup(&lookup)?))
        } else {
            None
        };

        Ok(Self {
            server_ip,
            db_config,
            api_base_url: lookup("ROSTER_API_BASE_URL").filter(|url| !url.trim().is_empty()),
        })
    }

    pub const fn server_ip(&self) -> SocketAddr {
        self.server_ip
    }

    pub fn db_config(&self) -> Option<Arc<DbConfig>> {
        self.db_config.clone()
    }

    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> RosterResult<Self> {
        let get_env_var = |name| lookup(name).context(MissingEnvVarSnafu { name });

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?.parse().context(ParsePortSnafu)?,
            database: get_env_var("DB_NAME")?,
        })
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
