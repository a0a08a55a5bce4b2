//! CLI interface for Schoolhub

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schoolhub")]
#[command(version)]
#[command(about = "School management authentication server and client", long_about = None)]
pub struct Cli {
    /// Path to schoolhub.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "SCHOOLHUB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the client commands
#[derive(clap::Args, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the schoolhub server
    #[arg(long, env = "SCHOOLHUB_SERVER", default_value = "http://localhost:5000")]
    pub server: String,

    /// File holding the session token
    #[arg(long, env = "SCHOOLHUB_TOKEN_FILE", default_value = ".schoolhub_token")]
    pub token_file: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default schoolhub.toml in the current directory
    Init,

    /// Print a random signing secret suitable for JWT_SECRET
    Secret,

    /// Create the users table in the configured PostgreSQL database
    Migrate,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create an account on the server
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Forget the stored session token
    Logout {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Show the signed-in user
    Whoami {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// List registered users (requires a session)
    Users {
        #[command(flatten)]
        client: ClientArgs,
    },
}
