use std::env;

use log::*;
use ofg_common::Secret;

const DEFAULT_OFG_HOST: &str = "127.0.0.1";
const DEFAULT_OFG_PORT: u16 = 8410;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The API key that privileged routes (funding-target mutations, full contribution listings)
    /// require in the `ofg-api-key` header.
    pub admin_api_key: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OFG_HOST.to_string(),
            port: DEFAULT_OFG_PORT,
            database_url: String::default(),
            admin_api_key: Secret::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OFG_HOST").ok().unwrap_or_else(|| DEFAULT_OFG_HOST.into());
        let port = env::var("OFG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OFG_PORT. {e} Using the default, {DEFAULT_OFG_PORT}, instead."
                    );
                    DEFAULT_OFG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OFG_PORT);
        let database_url = env::var("OFG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ OFG_DATABASE_URL is not set. Please set it to the URL for the OpenFund database.");
            String::default()
        });
        let admin_api_key = env::var("OFG_ADMIN_API_KEY").ok().unwrap_or_else(|| {
            warn!(
                "🪛️ OFG_ADMIN_API_KEY is not set. All admin routes will be refused until it is configured."
            );
            String::default()
        });
        let admin_api_key = Secret::new(admin_api_key);
        Self { host, port, database_url, admin_api_key }
    }
}
