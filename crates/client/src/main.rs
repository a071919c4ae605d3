//! cellar CLI entry point.

use std::sync::Arc;

use anyhow::Result;
use cellar_client::cli::{Cli, Commands, OutputFormat};
use cellar_client::intake::{Intake, IntakeReceipt};
use cellar_client::occupancy::OccupancyService;
use cellar_client::output::{format_output, pretty};
use cellar_client::search::{ResultsView, SearchExecutor};
use cellar_client::TableClient;
use cellar_core::location::{parse_location, rack_from_code};
use cellar_core::occupancy::OccupancyIndex;
use cellar_core::record::RecordId;
use chrono::Datelike;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet {
        "cellar=warn,cellar_client=warn"
    } else {
        "cellar=info,cellar_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Offline commands need no credentials.
    match &cli.command {
        Commands::ParseLocation(cmd) => {
            let parsed = parse_location(&cmd.text);
            println!(
                "{}",
                format_output(&parsed, cli.format, pretty::format_parsed_location)
            );
            return Ok(());
        }
        Commands::RackCode(cmd) => {
            let rack = rack_from_code(&cmd.code)
                .ok_or_else(|| anyhow::anyhow!("Unrecognized rack code: {}", cmd.code))?;
            println!(
                "{}",
                format_output(&rack, cli.format, |rack| format!("Rack {}", rack))
            );
            return Ok(());
        }
        _ => {}
    }

    let settings = Arc::new(cli.settings()?);
    let client = Arc::new(TableClient::new(&settings)?);
    let occupancy = OccupancyService::new(client.clone(), settings.clone());
    let year = chrono::Local::now().year();

    match cli.command {
        Commands::Search(cmd) => {
            let executor = Arc::new(SearchExecutor::new(client.clone(), settings.clone()));
            let index = if cmd.no_locate {
                None
            } else {
                rebuild_or_warn(&occupancy).await
            };

            if cmd.interactive {
                interactive(executor, index, cli.format, year).await?;
            } else {
                executor.search(&cmd.phrase()).await?;
                print_view(&executor.view(), index.as_deref(), cli.format, year);
            }
        }
        Commands::Grid => {
            let index = occupancy.rebuild().await?;
            let racks = index.grid().paint(&index);
            println!(
                "{}",
                format_output(&racks, cli.format, |racks| {
                    pretty::format_grid(racks).trim_end().to_string()
                })
            );
        }
        Commands::Locate { wine } => {
            let index = occupancy.rebuild().await?;
            let id = RecordId::from(wine.as_str());
            let positions = index.positions(&id);
            println!(
                "{}",
                format_output(positions, cli.format, |positions| {
                    pretty::format_positions(&wine_label(&index, &id), positions)
                })
            );
        }
        Commands::Inventory => {
            let index = occupancy.rebuild().await?;
            println!(
                "{}",
                format_output(index.inventory(), cli.format, pretty::format_inventory)
            );
        }
        Commands::Add(cmd) => {
            let intake = Intake::new(client.clone(), settings.clone());
            let receipt = intake
                .add_bottle(&cmd.wine(), &cmd.location, cmd.quantity)
                .await?;
            rebuild_or_warn(&occupancy).await;
            print_receipt(&receipt, cli.format, cli.quiet);
        }
        Commands::Place(cmd) => {
            let intake = Intake::new(client.clone(), settings.clone());
            let wine = RecordId::from(cmd.wine.as_str());
            let (location, placement) = intake
                .place_at(&wine, &cmd.location, cmd.quantity)
                .await?;
            rebuild_or_warn(&occupancy).await;
            let receipt = IntakeReceipt {
                wine,
                location,
                placement,
                quantity: cmd.quantity,
            };
            print_receipt(&receipt, cli.format, cli.quiet);
        }
        Commands::ParseLocation(_) | Commands::RackCode(_) => {}
    }

    Ok(())
}

/// Runs one search per stdin line, printing whichever results end up published.
async fn interactive(
    executor: Arc<SearchExecutor<TableClient>>,
    index: Option<Arc<OccupancyIndex>>,
    format: OutputFormat,
    year: i32,
) -> Result<()> {
    let mut views = executor.subscribe();
    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            print_view(&view, index.as_deref(), format, year);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = Vec::new();
    while let Some(line) = lines.next_line().await? {
        searches.push(tokio::spawn(executor.start(line)));
    }
    for search in searches {
        if let Err(error) = search.await? {
            tracing::warn!(%error, "search failed");
        }
    }

    drop(executor);
    printer.await?;
    Ok(())
}

async fn rebuild_or_warn(occupancy: &OccupancyService<TableClient>) -> Option<Arc<OccupancyIndex>> {
    match occupancy.rebuild().await {
        Ok(index) => Some(index),
        Err(error) => {
            tracing::warn!(%error, "could not load cellar positions");
            None
        }
    }
}

fn print_view(view: &ResultsView, index: Option<&OccupancyIndex>, format: OutputFormat, year: i32) {
    println!(
        "{}",
        format_output(view, format, |view| pretty::format_view(view, year, index))
    );
}

fn print_receipt(receipt: &IntakeReceipt, format: OutputFormat, quiet: bool) {
    if format == OutputFormat::Pretty && quiet {
        return;
    }
    println!("{}", format_output(receipt, format, pretty::format_receipt));
}

/// Name of a wine as labelled in the index, falling back to its ID.
fn wine_label(index: &OccupancyIndex, id: &RecordId) -> String {
    index
        .occupied_cells()
        .flat_map(|(_, occupants)| occupants)
        .find(|occupant| &occupant.item == id)
        .map(|occupant| occupant.label.to_string())
        .unwrap_or_else(|| id.to_string())
}
