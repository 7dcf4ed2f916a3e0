//! Route management CLI.
//!
//! Edits the route file directly (no running gateway or credentials
//! needed). A running gateway picks the changes up on its next start.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use pi_gateway::routing::{NewRoute, RouteError, RouteList};
use pi_gateway::store::RouteStore;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Route manager for the Pi Gateway", long_about = None)]
#[command(after_help = "Examples:
  gateway-cli add /blog http://localhost:3001 My Blog
  gateway-cli add /api http://localhost:4000 \"API Server\"
  gateway-cli remove /blog
  gateway-cli toggle /api")]
struct Cli {
    /// Route file to edit.
    #[arg(short, long, env = "GATEWAY_ROUTES", default_value = "config/routes.json", global = true)]
    routes: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all routes
    List,
    /// Add a new route
    Add {
        path: String,
        target: String,
        /// Display name; remaining words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Remove a route
    Remove { path: String },
    /// Enable/disable a route
    Toggle { path: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(e),
    };

    let Some(command) = cli.command else {
        print_help();
        return ExitCode::SUCCESS;
    };

    let store = RouteStore::new(cli.routes);
    match run(command, &store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, store: &RouteStore) -> Result<(), String> {
    let mut routes = store.load().await;

    let message = match command {
        Commands::List => {
            print_routes(&routes);
            return Ok(());
        }
        Commands::Add { path, target, name } => {
            let route = routes
                .add(NewRoute::new(path, target, name.join(" ")))
                .map_err(describe)?;
            format!("Added route: {} -> {} ({})", route.path, route.target, route.name)
        }
        Commands::Remove { path } => {
            let route = routes.remove(&path).map_err(describe)?;
            format!("Removed route: {} ({})", route.path, route.name)
        }
        Commands::Toggle { path } => {
            let route = routes.toggle(&path).map_err(describe)?;
            let state = if route.enabled { "enabled" } else { "disabled" };
            format!("Route {} is now {}", route.path, state)
        }
    };

    store.save(&routes).await.map_err(|e| e.to_string())?;
    println!("{}", message);
    Ok(())
}

fn describe(err: RouteError) -> String {
    match err {
        RouteError::Duplicate(path) => format!("Route with path \"{}\" already exists.", path),
        RouteError::NotFound(path) => format!("Route with path \"{}\" not found.", path),
        other => other.to_string(),
    }
}

fn print_routes(routes: &RouteList) {
    println!();
    println!("Configured Routes:");
    println!("==================");
    if routes.is_empty() {
        println!("No routes configured.");
    } else {
        for (i, route) in routes.iter().enumerate() {
            let status = if route.enabled { '✓' } else { '✗' };
            println!("{}. [{}] {} -> {} ({})", i + 1, status, route.path, route.target, route.name);
        }
    }
    println!();
}

fn print_help() {
    let _ = Cli::command().print_help();
    println!();
}

/// Help and unknown commands print usage (exit 0); bad arguments exit 1.
fn parse_failure(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::InvalidSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            print_help();
            ExitCode::SUCCESS
        }
        _ => {
            let _ = e.print();
            ExitCode::FAILURE
        }
    }
}
