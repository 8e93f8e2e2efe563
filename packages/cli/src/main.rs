#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for the arrest map.
//!
//! ```text
//! arrest_map serve
//! arrest_map summary
//! arrest_map table
//! arrest_map tooltip "NCT of Delhi"
//! arrest_map regions
//! arrest_map --email admin@example.com set Maharashtra 100 --fir 40
//! arrest_map --email admin@example.com delete Goa
//! arrest_map --email admin@example.com batch updates.json [--additive]
//! arrest_map media list
//! arrest_map --email admin@example.com media add Kerala https://... "Title" --kind video
//! arrest_map --email admin@example.com media delete <id>
//! ```
//!
//! Running with no subcommand enters interactive mode. The database path
//! comes from `--db`, then `ARREST_MAP_DB`; the acting user from `--email`,
//! then `ARREST_MAP_EMAIL`. `serve` takes its whole configuration from the
//! environment.

mod interactive;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use arrest_map_admin::{AdminIdentity, AdminService};
use arrest_map_region::valid_regions;
use arrest_map_stats::{CountValue, RecordUpdate};
use arrest_map_store::{SqliteDocumentStore, db_path_from_env};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arrest_map", about = "Inspect and edit arrest map data")]
struct Cli {
    /// Path to the document database
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Email of the acting user for admin commands
    #[arg(long, global = true)]
    email: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// List every accepted region key
    Regions,
    /// Show totals and map fills
    Summary,
    /// Show the ranked table
    Table,
    /// Show hover details for a region name
    Tooltip {
        /// Region or boundary feature name
        name: String,
    },
    /// Set the counts for a region
    Set {
        /// Region name
        region: String,
        /// Arrest count
        arrests: String,
        /// FIR count
        #[arg(long, default_value = "0")]
        fir: String,
        /// Add to the stored counts instead of replacing them
        #[arg(long)]
        additive: bool,
    },
    /// Delete the record for a region
    Delete {
        /// Region name
        region: String,
    },
    /// Apply a JSON array of `{ "region", "arrests", "fir" }` updates
    Batch {
        /// Path to the JSON file
        file: PathBuf,
        /// Add to the stored counts instead of replacing them
        #[arg(long)]
        additive: bool,
    },
    /// Manage media links
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },
}

#[derive(Subcommand)]
enum MediaCommands {
    /// List media grouped by region
    List,
    /// Add a media link to a region
    Add {
        /// Region name
        region: String,
        /// Link
        url: String,
        /// Title
        title: String,
        /// `article` or `video`
        #[arg(long)]
        kind: Option<String>,
    },
    /// Delete a media item
    Delete {
        /// Media ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(db_path_from_env);
    let store = SqliteDocumentStore::open(&db_path).await?;
    let service = AdminService::new(Some(Arc::new(store)), AdminIdentity::from_env());
    let email = cli.email.or_else(|| std::env::var("ARREST_MAP_EMAIL").ok());

    let Some(command) = cli.command else {
        return interactive::run(service, email).await;
    };

    let session = service.session_for(email.as_deref());

    match command {
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(arrest_map_server::run_server())
            })
            .await??;
        }
        Commands::Regions => {
            for region in valid_regions() {
                println!("{region}");
            }
        }
        Commands::Summary => {
            output::print_summary(&interactive::load_snapshot(&service).await);
        }
        Commands::Table => {
            output::print_table(&interactive::load_snapshot(&service).await.table());
        }
        Commands::Tooltip { name } => {
            output::print_tooltip(&interactive::load_snapshot(&service).await.tooltip(&name));
        }
        Commands::Set {
            region,
            arrests,
            fir,
            additive,
        } => {
            let update = service
                .set_counts(
                    &session,
                    &region,
                    &CountValue::Text(arrests),
                    &CountValue::Text(fir),
                    additive,
                )
                .await?;
            println!(
                "{} now has {} arrests and {} FIRs",
                update.region, update.arrests, update.fir
            );
        }
        Commands::Delete { region } => {
            let region = service.delete_record(&session, &region).await?;
            println!("Deleted {region}");
        }
        Commands::Batch { file, additive } => {
            let text = std::fs::read_to_string(&file)?;
            let updates: Vec<RecordUpdate> = serde_json::from_str(&text)?;
            let written = service.batch_update(&session, &updates, additive).await?;
            for update in &written {
                println!("{:<32} {:>9} {:>9}", update.region, update.arrests, update.fir);
            }
            println!("\n{} region(s) written", written.len());
        }
        Commands::Media { command } => match command {
            MediaCommands::List => {
                output::print_media(&service.load_media().await?);
            }
            MediaCommands::Add {
                region,
                url,
                title,
                kind,
            } => {
                let id = service
                    .add_media(&session, &region, &url, &title, kind.as_deref())
                    .await?;
                println!("Added media {id}");
            }
            MediaCommands::Delete { id } => {
                service.delete_media(&session, &id).await?;
                println!("Deleted media {id}");
            }
        },
    }

    Ok(())
}
