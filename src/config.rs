use std::{fmt, net::SocketAddr};

use clap::ValueEnum;

use crate::error::Result;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/recolhaki.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Decides whether failures show a developer error page or the generic one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Settings for the web application, gathered from the command line and
/// environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind: SocketAddr,
    pub environment: Environment,
}

impl Config {
    pub fn new(database_url: &str, bind: &str, environment: Environment) -> Result<Self> {
        if database_url.trim().is_empty() {
            return Err(crate::error::Error::Config(
                "DATABASE_URL must not be empty".to_string(),
            ));
        }

        Ok(Self {
            database_url: database_url.to_string(),
            bind: bind.parse()?,
            environment,
        })
    }
}
