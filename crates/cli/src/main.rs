mod config;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gate::Credentials;
use grant::Grant;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::{DEFAULT_CONFIG, load_grants};
use error::{Error, Result};

/// Exit status for a request that was evaluated and denied.
const EXIT_DENIED: i32 = 2;

#[derive(Parser)]
#[command(name = "gatecheck")]
#[command(about = "Check access requests against configured grants", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the gate config
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a caller may access a path
    Check {
        /// Path of the resource being accessed
        path: PathBuf,
        /// Bearer token
        #[arg(short, long, conflicts_with_all = ["user", "password", "header"])]
        token: Option<String>,
        /// Basic auth username
        #[arg(short, long, conflicts_with = "header")]
        user: Option<String>,
        /// Basic auth password
        #[arg(short, long, conflicts_with = "header")]
        password: Option<String>,
        /// Raw Authorization header value
        #[arg(long)]
        header: Option<String>,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured grants and whether each is still valid
    Grants,
}

/// Outcome of a `check` command.
#[derive(Debug, Serialize)]
struct Decision {
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Decision {
    fn from_result(result: grant::Result<bool>) -> Self {
        match result {
            Ok(allowed) => Self {
                allowed,
                error: None,
            },
            Err(e) => Self {
                allowed: false,
                error: Some(e.to_string()),
            },
        }
    }
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DENIED),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            path,
            token,
            user,
            password,
            header,
            json,
        } => {
            let credentials = credentials(token, user, password, header)?;
            cmd_check(&cli.config, &credentials, path, json)
        }
        Commands::Grants => cmd_grants(&cli.config),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn credentials(
    token: Option<String>,
    user: Option<String>,
    password: Option<String>,
    header: Option<String>,
) -> Result<Credentials> {
    if let Some(header) = header {
        return Ok(Credentials::from_header(&header)?);
    }
    if let Some(token) = token {
        return Ok(Credentials::bearer(token));
    }
    match (user, password) {
        (Some(user), Some(password)) => Ok(Credentials::basic(user, password)),
        (None, None) => Ok(Credentials::default()),
        _ => Err(Error::IncompleteBasicAuth),
    }
}

fn cmd_check(config: &Path, credentials: &Credentials, path: PathBuf, json: bool) -> Result<bool> {
    let grants = load_grants(config)?;
    debug!(grants = grants.len(), path = %path.display(), "checking access");

    let decision = Decision::from_result(grant::check(credentials, &path, &grants));

    if json {
        println!("{}", serde_json::to_string(&decision)?);
    } else {
        match (decision.allowed, &decision.error) {
            (true, _) => println!("allowed"),
            (false, None) => println!("denied"),
            (false, Some(e)) => println!("denied: {e}"),
        }
    }

    Ok(decision.allowed)
}

fn cmd_grants(config: &Path) -> Result<bool> {
    let grants = load_grants(config)?;

    if grants.is_empty() {
        println!("No grants configured.");
        return Ok(true);
    }

    println!("{:<24}  STATUS", "GRANT");
    println!("{}", "-".repeat(40));

    for named in &grants {
        let status = if named.valid() { "valid" } else { "expired" };
        println!("{:<24}  {status}", named.name);
    }

    Ok(true)
}
