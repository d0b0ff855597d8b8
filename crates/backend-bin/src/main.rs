// ============================
// crates/backend-bin/src/main.rs
// ============================
use anyhow::Context;
use clap::{Parser, Subcommand};
use sessiongate_lib::{
    accounts::Accounts,
    config::Settings,
    models::User,
    router::create_router,
    storage::{FileObjectStore, ObjectStore},
    AppState,
};
use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "sessiongate", version, about = "Session authentication API server")]
struct Cli {
    /// TOML config file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Add a user to the user store; the password is read from the first line of stdin
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let settings = Settings::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::CreateUser {
            email,
            first_name,
            last_name,
        } => {
            let password = read_password(io::stdin().lock())?;
            create_user(&settings, &email, &password, first_name, last_name).await
        },
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr();
    let state = AppState::new(settings).await?;
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// First line of `input`, without the line ending
fn read_password(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("reading password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("no password on stdin");
    }
    Ok(password.to_owned())
}

async fn create_user(
    settings: &Settings,
    email: &str,
    password: &str,
    first_name: Option<String>,
    last_name: Option<String>,
) -> anyhow::Result<()> {
    let users = Arc::new(FileObjectStore::<User>::new(&settings.storage.path)?);
    users.load_all().await?;

    let accounts = Accounts::new(users, settings.auth.password_cost);
    let user = accounts
        .register_user(email, password, first_name, last_name)
        .await?;

    info!(user_id = %user.id, "user created");
    Ok(())
}
