use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pantry::config::Overrides;
use pantry::store::user;
use pantry::{Error, Loader, auth, db, server};

#[derive(Parser)]
#[command(name = "pantry", version, about = "Recipe-management API service")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database URL (file path, `:memory:`, or `libsql://...`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// JWT signing secret, at least 32 bytes
    #[arg(long, global = true)]
    jwt_secret: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Provision a user and print a bearer token for them
    Add { email: String },
    /// Print a fresh bearer token for an existing user
    Token { email: String },
}

#[tokio::main]
async fn main() -> pantry::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (host, port) = match &cli.command {
        Command::Serve { host, port } => (host.as_deref(), *port),
        Command::User { .. } => (None, None),
    };
    let config = Loader::default().load(
        cli.config.as_deref(),
        &Overrides {
            host,
            port,
            database_url: cli.database_url.as_deref(),
            jwt_secret: cli.jwt_secret.as_deref(),
        },
    )?;

    let handle = db::open(&config.database.url).await?;

    match cli.command {
        Command::Serve { .. } => {
            let router = pantry::app::router();
            server::run(config, Some(handle), router.into_handle()).await
        }
        Command::User { action } => {
            let conn = db::connection(&handle).await?;
            let account = match action {
                UserAction::Add { email } => user::create(&conn, &email).await?,
                UserAction::Token { email } => user::find_by_email(&conn, &email)
                    .await?
                    .ok_or_else(|| Error::NotFound(format!("No user with email {email}")))?,
            };
            let token = auth::create_token(&config.auth, &account.id.to_string())?;
            println!("{token}");
            Ok(())
        }
    }
}
