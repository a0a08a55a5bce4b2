//! CLI command implementations

use anyhow::{bail, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fs;
use std::path::Path;

use crate::auth::{
    ClientSession, FileTokenStorage, LoginRequest, RegisterRequest, RouteDecision,
};
use crate::cli::{error, info, print_user_table, success, warn, ClientArgs};
use crate::client::{user_message, ApiClient};
use crate::config::{self, loader::CONFIG_FILENAME, Config, StoreBackend};
use crate::store::PgUserStore;

/// Initialize a new schoolhub.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Export JWT_SECRET (see 'schoolhub secret') and run 'schoolhub serve'");

    Ok(())
}

/// Generate a random signing secret
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

pub async fn secret() -> Result<()> {
    println!("{}", generate_secret());
    Ok(())
}

/// Create the users table
pub async fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    if config.database.backend != StoreBackend::Postgres {
        warn("database.backend is not 'postgres'; nothing to migrate");
        return Ok(());
    }

    let Some(url) = config.database.url.as_deref() else {
        bail!("database.url is required for the postgres backend");
    };

    let store = PgUserStore::connect(url).await?;
    store.migrate().await?;
    success("users table is up to date");
    Ok(())
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

/// Register an account
pub async fn register(name: String, email: String, password: String, client: &ClientArgs) -> Result<()> {
    let api = ApiClient::new(&client.server);
    let req = RegisterRequest {
        name,
        email,
        password,
    };

    match api.register(&req).await {
        Ok(created) => {
            success(&format!("Registered {} (id {})", created.email, created.id));
            info("Sign in with 'schoolhub login'");
            Ok(())
        }
        Err(e) => {
            error(&user_message(&e));
            Err(e.into())
        }
    }
}

/// Sign in and persist the token
pub async fn login(email: String, password: String, client: &ClientArgs) -> Result<()> {
    let mut session = open_session(client)?;
    let api = ApiClient::new(&client.server);

    match api.login(&LoginRequest { email, password }).await {
        Ok(response) => {
            session.login(&response.token)?;
            success(&format!("Signed in as {}", response.user.email));
            Ok(())
        }
        Err(e) => {
            error(&user_message(&e));
            Err(e.into())
        }
    }
}

/// Drop the stored token
pub async fn logout(client: &ClientArgs) -> Result<()> {
    let mut session = open_session(client)?;
    session.logout()?;
    success("Signed out");
    Ok(())
}

/// Show the current session
pub async fn whoami(client: &ClientArgs) -> Result<()> {
    let session = open_session(client)?;

    match session.claims() {
        Some(claims) => {
            println!("{} (id {})", claims.email, claims.id);
            if let Some(exp) = claims.exp.and_then(|exp| chrono::DateTime::from_timestamp(exp, 0)) {
                info(&format!("Session expires {}", exp.to_rfc3339()));
            }
        }
        None => warn("Not signed in"),
    }
    Ok(())
}

/// List users through the protected endpoint
pub async fn users(client: &ClientArgs) -> Result<()> {
    let session = open_session(client)?;

    if let RouteDecision::Redirect(_) | RouteDecision::Wait = session.guard() {
        bail!("Not signed in. Run 'schoolhub login' first.");
    }

    let Some(token) = session.token()? else {
        bail!("Not signed in. Run 'schoolhub login' first.");
    };

    let api = ApiClient::new(&client.server);
    match api.users(&token).await {
        Ok(users) => {
            print_user_table(&users);
            Ok(())
        }
        Err(e) => {
            error(&user_message(&e));
            Err(e.into())
        }
    }
}

fn open_session(client: &ClientArgs) -> Result<ClientSession<FileTokenStorage>> {
    let mut session = ClientSession::new(FileTokenStorage::new(&client.token_file));
    session.load()?;
    Ok(session)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    };
    Ok(config)
}
