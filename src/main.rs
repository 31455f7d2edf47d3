#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod render;
mod sink;
mod store;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Outcome, Report},
    prelude::*,
    store::UsageStore,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    tracing_subscriber::fmt().without_time().compact().with_max_level(args.log_level()).init();
    info!(version = crate_version!(), date = %args.date, scout = args.scout, "starting…");

    let provider = args.octopus.new_client();
    let notifier = args.telegram.new_notifier(args.scout)?;
    let stores: Vec<Box<dyn UsageStore>> =
        if args.scout { Vec::new() } else { args.store.new_stores()? };
    if stores.is_empty() {
        debug!("no stores configured");
    }

    let outcome = Report::builder()
        .provider(&provider)
        .notifier(notifier.as_ref())
        .stores(&stores)
        .zone(args.zone())
        .build()
        .run(args.date)?;
    match outcome {
        Outcome::Notified { n_overnight } => info!(n_overnight, "done"),
        outcome => info!(?outcome, "done"),
    }
    Ok(())
}
