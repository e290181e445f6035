//! Studyflow - terminal client for the Studyflow scheduling service.
//!
//! Sign in, submit a free-text task list and a time budget, and walk the
//! generated schedule task by task.

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studyflow::api::ApiClient;
use studyflow::core::{Config, Session, SessionStore};
use studyflow::{tui, App, APP_NAME};

/// Terminal client for the Studyflow scheduling service
#[derive(Parser)]
#[command(name = "studyflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the scheduling service base URL
    #[arg(long, global = true, env = "STUDYFLOW_SERVER")]
    server: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive schedule walker (default)
    Run,

    /// Authenticate and store the session
    Login {
        /// Username to sign in with
        #[arg(short, long)]
        username: String,

        /// Password to sign in with
        #[arg(short, long)]
        password: String,

        /// Register a new account before signing in
        #[arg(short, long)]
        register: bool,
    },

    /// Clear the stored session
    Logout,

    /// Show the stored identity
    Whoami,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    let session = SessionStore::open(SessionStore::default_path()?);

    match cli.command {
        None | Some(Commands::Run) => {
            let app = App::new(config, session)?;
            tui::run_tui(app)
        }
        Some(Commands::Login { username, password, register }) => {
            cmd_login(&config, session, &username, &password, register)
        }
        Some(Commands::Logout) => cmd_logout(session),
        Some(Commands::Whoami) => cmd_whoami(&session),
        Some(Commands::Completions { shell }) => {
            generate(shell, &mut Cli::command(), APP_NAME, &mut io::stdout());
            Ok(())
        }
    }
}

/// Authenticate from the command line and persist the session.
fn cmd_login(
    config: &Config,
    mut session: SessionStore,
    username: &str,
    password: &str,
    register: bool,
) -> Result<()> {
    let api = ApiClient::new(
        config.server.base_url.clone(),
        Duration::from_secs(config.server.timeout_secs),
    )?;

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    let new_session = rt.block_on(async {
        if register {
            api.register(username, password).await?;
        }
        let token = api.login(username, password).await?;
        let info = api.user_info(&token).await?;
        Ok::<Session, studyflow::ApiError>(Session { token, user_id: info.id })
    })?;

    let user_id = new_session.user_id;
    session.persist(new_session)?;
    println!("Logged in as {username} (user {user_id})");
    Ok(())
}

/// Clear the stored session.
fn cmd_logout(mut session: SessionStore) -> Result<()> {
    if session.current().is_none() {
        println!("Not logged in");
        return Ok(());
    }
    session.clear()?;
    println!("Logged out");
    Ok(())
}

/// Print the stored identity, if any.
fn cmd_whoami(session: &SessionStore) -> Result<()> {
    match session.current() {
        Some(s) => println!("Logged in as user {}", s.user_id),
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Initialize tracing with an env-filter.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "studyflow=debug" } else { "studyflow=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();
}
