mod config;
mod report;

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use card_sync::ledger::Ledger as _;
use card_sync_monarch::MonarchClient;
use clap::{Args as ClapArgs, CommandFactory as _, Parser, Subcommand};
use tracing::info;

use config::ConfigFile;

/// Exit status when required settings are missing.
const EXIT_CONFIGURATION: u8 = 2;

#[derive(Parser)]
#[command(
    name = "card-sync",
    about = "Sync additional-card transactions in Monarch Money to the primary card"
)]
#[command(disable_help_subcommand = true)]
struct Args {
    /// Config file [default: card-sync.toml or .card-sync.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    sync: SyncArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(ClapArgs, Default)]
pub(crate) struct ConnectionArgs {
    /// Monarch API token, as sent by the web app in "Authorization: Token <token>"
    #[arg(long, global = true, env = "MONARCH_API_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    #[arg(
        long,
        global = true,
        env = "MONARCH_BEARER_TOKEN",
        hide = true,
        hide_env_values = true
    )]
    pub(crate) bearer_token: Option<String>,

    /// GraphQL endpoint
    #[arg(long, global = true, env = "MONARCH_GRAPHQL_URL")]
    pub(crate) api_url: Option<String>,
}

#[derive(ClapArgs, Default)]
pub(crate) struct SyncArgs {
    /// Account id of the primary card
    #[arg(long, global = true, env = "MAIN_ACCOUNT_ID")]
    pub(crate) primary_account: Option<String>,

    /// Account id of the additional card
    #[arg(long, global = true, env = "ADDL_ACCOUNT_ID")]
    pub(crate) additional_account: Option<String>,

    /// Label marking synced additional-card transactions [default: synced]
    #[arg(long, global = true, env = "SYNC_TAG_NAME")]
    pub(crate) label: Option<String>,

    /// Only log what would change. Anything but "false" keeps the dry run on [default: true]
    #[arg(long, global = true, env = "DRY_RUN", value_parser = config::parse_dry_run)]
    pub(crate) dry_run: Option<bool>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Reconcile the additional card against the primary card (default)
    Sync,
    /// List the household's labels and exit
    Labels,
}

pub async fn run(args: impl IntoIterator<Item = String>) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "card_sync=info,card_sync_monarch=info,card_sync_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    clap_complete::CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse_from(args);
    let file = match &args.config {
        Some(path) => ConfigFile::load_from_file(path)?,
        None => ConfigFile::find_and_load()?.unwrap_or_default(),
    };

    let color = std::io::stdout().is_terminal();
    match args.command.unwrap_or(Commands::Sync) {
        Commands::Sync => sync(args.connection, args.sync, &file, color).await,
        Commands::Labels => labels(args.connection, args.sync, &file, color).await,
    }
}

/// Missing or invalid configuration gets its own exit status, everything else is a plain failure.
pub fn exit_code(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<card_sync::Error>() {
        Some(card_sync::Error::Configuration { .. } | card_sync::Error::InvalidSetting { .. }) => {
            ExitCode::from(EXIT_CONFIGURATION)
        }
        _ => ExitCode::FAILURE,
    }
}

async fn sync(
    connection: ConnectionArgs,
    args: SyncArgs,
    file: &ConfigFile,
    color: bool,
) -> Result<()> {
    let (connection, options) = config::resolve_sync(connection, args, file)?;
    if options.mode.is_dry_run() {
        info!("Dry run enabled, nothing will be changed");
    }

    let client = MonarchClient::with_url(&connection.token, connection.api_url)?;
    let report = card_sync::sync::run(&client, &options)
        .await
        .context("Sync aborted")?;

    println!();
    print!("{}", report::render_sync(&report, color));
    Ok(())
}

async fn labels(
    connection: ConnectionArgs,
    args: SyncArgs,
    file: &ConfigFile,
    color: bool,
) -> Result<()> {
    let connection = config::resolve_connection(connection, file)?;
    let sync_label = config::sync_label(args.label, file);

    let client = MonarchClient::with_url(&connection.token, connection.api_url)?;
    let labels = client.labels().await.context("Failed to list labels")?;

    print!("{}", report::render_labels(&labels, &sync_label, color));
    Ok(())
}
