use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_BIND, DEFAULT_DATABASE_URL, Environment};

#[derive(Parser)]
#[command(about = "Recolhaki collector registration")]
pub struct Args {
    /// SQLite connection string
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web application
    Serve {
        /// Address to listen on
        #[arg(long, env = "RECOLHAKI_BIND", default_value = DEFAULT_BIND)]
        bind: String,
        /// Controls how much error detail is shown to clients
        #[arg(long, env = "RECOLHAKI_ENV", value_enum, default_value_t = Environment::Production)]
        environment: Environment,
    },
    /// Create the people table
    InitDb {
        /// Drop the existing table first
        #[arg(long)]
        reset: bool,
    },
    /// Register randomly generated collectors
    Seed {
        /// The number of collectors to create
        count: u32,
    },
    /// Import collectors from a CSV file
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
}
