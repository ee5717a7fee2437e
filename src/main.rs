use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use invengo::cli::{
    handle_accounts_command, handle_bill_command, handle_export_command, handle_history_command,
    handle_import_command, handle_stock_command,
};
use invengo::config::{InvenGoPaths, Settings};
use invengo::storage::{initialize_workbook, Storage};

#[derive(Parser)]
#[command(
    name = "invengo",
    version,
    about = "Inventory, billing and ledger tool for a single retail store",
    long_about = "InvenGo keeps the stock catalog, issues numbered bills, and tracks \
                  customer spend, cash and digital sales, discounts and expenses in \
                  one workbook."
)]
struct Cli {
    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "INVENGO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the settings file and an empty workbook
    Init,

    /// Show current configuration and paths
    Config,

    /// Catalog and stock commands
    #[command(subcommand)]
    Stock(invengo::cli::StockCommands),

    /// Create, show and send bills
    #[command(subcommand)]
    Bill(invengo::cli::BillCommands),

    /// Sales summary, expenses and customers
    #[command(subcommand)]
    Accounts(invengo::cli::AccountsCommands),

    /// Import catalog items from a CSV file
    Import {
        /// Path to CSV file
        file: String,
        /// Only show the preview
        #[arg(long)]
        dry_run: bool,
    },

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(invengo::cli::ExportCommands),

    /// Show recent ledger journal entries
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only entries for this ledger (item, bill, customer, accounts, expense, counter)
        #[arg(short, long)]
        entity: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("INVENGO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => InvenGoPaths::with_base_dir(dir),
        None => InvenGoPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("InvenGo - inventory and billing for the terminal");
        println!();
        println!("Run 'invengo --help' for usage information.");
        println!("Run 'invengo init' to set up a new shop.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing InvenGo at: {}", paths.base_dir().display());
            let created = initialize_workbook(&paths)?;
            settings.save(&paths)?;
            if created {
                println!("Workbook created: {}", paths.workbook_file().display());
                println!();
                println!("Run 'invengo stock add' or 'invengo import' to fill the catalog.");
            } else {
                println!("Workbook already exists; left unchanged.");
            }
        }
        Commands::Config => {
            println!("InvenGo Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Workbook:         {}", paths.workbook_file().display());
            println!("Ledger journal:   {}", paths.ledger_log().display());
            println!("Outbox:           {}", paths.outbox_dir().display());
            println!();
            println!("Settings:");
            println!("  Bill prefix:    {}", settings.bill_prefix);
            println!("  Bill format:    {}", settings.bill_format);
            println!("  Message style:  {}", settings.message_style);
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Shop name:      {}", settings.shop_name);
        }
        command => {
            let storage = Storage::open(paths)?;
            match command {
                Commands::Stock(cmd) => handle_stock_command(&storage, &settings, cmd)?,
                Commands::Bill(cmd) => handle_bill_command(&storage, &settings, cmd)?,
                Commands::Accounts(cmd) => handle_accounts_command(&storage, &settings, cmd)?,
                Commands::Import { file, dry_run } => {
                    handle_import_command(&storage, &file, dry_run)?
                }
                Commands::Export(cmd) => handle_export_command(&storage, cmd)?,
                Commands::History { limit, entity } => {
                    handle_history_command(&storage, limit, entity.as_deref())?
                }
                Commands::Init | Commands::Config => {}
            }
        }
    }

    Ok(())
}
