//! # place-order
//!
//! Loads the menu, applies an order draft and submits it.
//!
//! ```text
//! place-order <draft.json> [config.toml]
//! ```
//!
//! Exits non-zero when the menu cannot be loaded, the draft does not apply,
//! or the backend refuses the order.

use std::path::PathBuf;
use std::process::ExitCode;

use orderdesk_client::{init_tracing, ClientResult, OrderDesk, OrderDeskConfig, OrderDraft};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args_os().skip(1);
    let Some(draft_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: place-order <draft.json> [config.toml]");
        return ExitCode::from(2);
    };
    let config_path = args.next().map(PathBuf::from);

    match run(draft_path, config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Order not placed");
            ExitCode::FAILURE
        }
    }
}

async fn run(draft_path: PathBuf, config_path: Option<PathBuf>) -> ClientResult<()> {
    let config = OrderDeskConfig::load(config_path)?;
    let draft = OrderDraft::from_path(&draft_path)?;

    let mut desk = OrderDesk::init(config).await?;
    desk.apply_draft(draft)?;

    let totals = desk.cart().totals();
    info!(
        items = totals.total_number,
        subtotal = %totals.subtotal,
        delivery_fee = %totals.delivery_fee,
        total = %totals.total_price,
        "Submitting order"
    );

    let receipt = desk.place_order().await?;
    println!("{}", serde_json::to_string_pretty(&receipt.response).unwrap_or_default());
    Ok(())
}
