//! crmsync CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crmsync::cli::customers::{FilterArgs, ListArgs};
use crmsync::cli::{Cli, Commands, OutputFormat};
use crmsync::config::Config;
use crmsync::mutation::MutationEvent;
use crmsync::output::{format_output, pretty};
use crmsync::state::AppState;
use crmsync::view::CustomerListView;
use crmsync_core::auth::demo_credentials;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = AppState::new(&config);
    let session = state
        .login(&demo_credentials())
        .await
        .context("demo login failed")?;
    tracing::debug!(user = %session.user.email, "Session started");
    let mut outcomes = state.mutations.subscribe();

    match cli.command {
        Commands::List(ListArgs { filter, page }) => {
            let mut view = filtered_view(&state, filter)?;
            view.set_page(page);
            let page = view.render().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&page, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_page(&page)),
            }
        }
        Commands::Stats => {
            let stats = state.stats().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&stats, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_stats(&stats)),
            }
        }
        Commands::Export(args) => {
            let mut view = filtered_view(&state, args.filter)?;
            let csv = view.export_csv().await?;
            let rows = view.filtered().await?.len();
            let path = args
                .output
                .unwrap_or_else(|| PathBuf::from(&config.export_filename));
            tokio::fs::write(&path, csv.as_bytes())
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !cli.quiet {
                println!("Exported {} customers to {}", rows, path.display());
            }
        }
        Commands::Create(args) => {
            let result = state.create_customer(args.into()).await;
            print_outcomes(&mut outcomes, cli.quiet);
            let customer = result?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&customer, cli.format)),
                OutputFormat::Pretty => {
                    println!("Created:\n{}", pretty::format_customer(&customer))
                }
            }
        }
        Commands::Update(args) => {
            let (id, request) = args.into_request();
            if request.is_empty() {
                anyhow::bail!("nothing to update for customer {id}");
            }
            let result = state.update_customer(&id, request).await;
            print_outcomes(&mut outcomes, cli.quiet);
            let customer = result?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&customer, cli.format)),
                OutputFormat::Pretty => {
                    println!("Updated:\n{}", pretty::format_customer(&customer))
                }
            }
        }
        Commands::Delete { id } => {
            let result = state.delete_customer(&id).await;
            print_outcomes(&mut outcomes, cli.quiet);
            result?;
            if !cli.quiet {
                println!("Deleted customer {}", id);
            }
        }
        Commands::Demo => {
            let report = crmsync::demo::run(&state).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&report, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_demo(&report)),
            }
        }
    }

    Ok(())
}

/// Opens a list view with the search committed and the status filter set.
fn filtered_view(state: &AppState, filter: FilterArgs) -> Result<CustomerListView> {
    let mut view = state.list_view()?;
    if let Some(search) = filter.search {
        view.commit_search(search);
    }
    view.set_status_filter(filter.status);
    Ok(view)
}

/// Prints the message of every mutation that settled since the last call.
fn print_outcomes(events: &mut broadcast::Receiver<MutationEvent>, quiet: bool) {
    while let Ok(event) = events.try_recv() {
        if let Some(message) = event.mutation.outcome_message() {
            if !quiet {
                eprintln!("{message}");
            }
        }
    }
}
