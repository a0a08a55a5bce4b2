use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolhub::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolhub=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Secret => cli::commands::secret().await,
        Commands::Migrate => cli::commands::migrate(config).await,
        Commands::Serve { host, port } => cli::commands::serve(config, host, port).await,
        Commands::Register {
            name,
            email,
            password,
            client,
        } => cli::commands::register(name, email, password, &client).await,
        Commands::Login {
            email,
            password,
            client,
        } => cli::commands::login(email, password, &client).await,
        Commands::Logout { client } => cli::commands::logout(&client).await,
        Commands::Whoami { client } => cli::commands::whoami(&client).await,
        Commands::Users { client } => cli::commands::users(&client).await,
    }
}
