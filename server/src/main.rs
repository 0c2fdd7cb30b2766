use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use gigstock_server::cli_error::CliError;
use log::warn;
use std::path::PathBuf;

fn main() {
    let args = CliArgs::parse();
    let dotenv_result = dotenv();

    let env = env_logger::Env::new().filter_or(
        "RUST_LOG",
        match args.global_opts.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    );
    env_logger::Builder::from_env(env).init();
    if dotenv_result.is_err() {
        warn!("Could not read .env file: {}", dotenv_result.unwrap_err());
    }

    let result = run_command(args.command);
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_command(command: Command) -> Result<(), CliError> {
    match command {
        Command::Serve => {
            gigstock_server::cli::database_migration::check_migration_state()?;
            gigstock_server::web::serve()
        }
        Command::MigrateDatabase => gigstock_server::cli::database_migration::run_migrations(),
        Command::ListUsers => gigstock_server::cli::manage_users::print_user_list(),
        Command::CreateUser => gigstock_server::cli::manage_users::create_user_interactive(),
        Command::LoadData { path } => gigstock_server::cli::load_data::load_data_from_file(&path),
    }
}

/// Asset management and gig booking server
#[derive(Debug, Parser)]
#[clap(name = "gigstock-server", version)]
pub struct CliArgs {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the GigStock web application
    Serve,
    /// Migrate the database schema to the current version
    MigrateDatabase,
    /// List all user accounts
    ListUsers,
    /// Interactively create a new user account
    CreateUser,
    /// Import a data set from a JSON file into a fresh database
    LoadData {
        /// The path of the JSON file to read from
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Verbosity level (can be specified multiple times)
    #[clap(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}
