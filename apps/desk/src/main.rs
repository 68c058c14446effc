//! Shelf Desk entry point.
//!
//! ```text
//! shelf-desk quote   <script.json> [--json]
//! shelf-desk submit  <script.json>
//! shelf-desk pay     <order-id> <payment.json> --due <amount>
//! shelf-desk payments <list.json> [--delimiter ';']
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use shelf_core::report::{self, PaymentRow};
use shelf_core::{CatalogSnapshot, EntryMode, Money, PaymentDraft};
use shelf_desk::commands::SessionScript;
use shelf_desk::receipt::Receipt;
use shelf_desk::session::OrderSession;
use shelf_desk::state::DeskConfig;

#[derive(Debug, Parser)]
#[command(name = "shelf-desk", version, about = "Order entry for inventory and POS sales")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a session script and print the receipt preview
    Quote {
        script: PathBuf,
        /// Print totals and the order payload as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Replay a session script and submit the order
    Submit { script: PathBuf },
    /// Record a payment against a submitted order
    Pay {
        order_id: String,
        payment: PathBuf,
        /// Outstanding due on the order, e.g. "185.00"
        #[arg(long)]
        due: String,
    },
    /// Print a payments listing as delimited text
    Payments {
        list: PathBuf,
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelf_desk::init_tracing();

    let cli = Cli::parse();
    let config = DeskConfig::load(cli.config).context("Failed to load desk configuration")?;
    info!(store = %config.store.name, "Shelf desk starting");

    match cli.command {
        Command::Quote { script, json } => {
            let session = open(&script, &config).await?;
            if json {
                let preview = serde_json::json!({
                    "totals": session.totals(),
                    "payload": session.preview_payload().ok(),
                });
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                let receipt = Receipt::for_session(&session, &config.store, None, Local::now());
                println!("{}", receipt.render_text(&config.store));
            }
        }
        Command::Submit { script } => {
            let mut session = open(&script, &config).await?;
            let submission = session.submit().await.map_err(|e| anyhow!(e))?;
            let invoice = submission
                .order
                .invoice_no
                .as_deref()
                .unwrap_or(&submission.order.id);
            let receipt = Receipt::for_draft(
                &session,
                &submission.draft,
                submission.totals,
                &config.store,
                Some(invoice),
                Local::now(),
            );
            println!("{}", receipt.render_text(&config.store));
        }
        Command::Pay {
            order_id,
            payment,
            due,
        } => {
            let due = Money::parse(&due).map_err(|e| anyhow!("Invalid --due: {}", e))?;
            let text = std::fs::read_to_string(&payment)
                .with_context(|| format!("Failed to read {}", payment.display()))?;
            let draft: PaymentDraft = serde_json::from_str(&text)?;

            let submitter = shelf_desk::build_submitter(&config).map_err(|e| anyhow!(e))?;
            let session = OrderSession::new(
                EntryMode::Inventory,
                CatalogSnapshot::default(),
                config.pricing,
                submitter,
            );
            let recorded = session
                .record_payment(&order_id, due, draft)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("Payment {} recorded", recorded.id);
        }
        Command::Payments { list, delimiter } => {
            let text = std::fs::read_to_string(&list)
                .with_context(|| format!("Failed to read {}", list.display()))?;
            let rows: Vec<PaymentRow> = serde_json::from_str(&text)?;
            print!("{}", report::payments_table(&rows).to_delimited(delimiter));
        }
    }

    Ok(())
}

async fn open(script: &Path, config: &DeskConfig) -> anyhow::Result<OrderSession> {
    let script = SessionScript::load(script)
        .with_context(|| format!("Failed to load {}", script.display()))?;
    let submitter = shelf_desk::build_submitter(config).map_err(|e| anyhow!(e))?;
    shelf_desk::replay(script, config, submitter)
        .await
        .map_err(|(step, e)| anyhow!("Step {}: {}", step, e))
}
