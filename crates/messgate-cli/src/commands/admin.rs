//! Admin feed commands.

use std::sync::Arc;
use std::time::Duration;

use messgate_client::{GateApi, LivePoller, LOAD_ENTRIES_FAILED, LOAD_STATS_FAILED};
use tracing::info;

use super::{service_error, CliError};
use crate::config::ServiceArgs;
use crate::output::{format_stats, print_entries};

/// Prints the live entries once, or keeps refreshing until Ctrl-C.
pub async fn entries(service: &ServiceArgs, watch: bool, interval: u64) -> Result<(), CliError> {
    let api = service.connect()?;
    if !watch {
        let feed = api
            .live_entries()
            .await
            .map_err(service_error(LOAD_ENTRIES_FAILED))?;
        print_entries(&feed);
        return Ok(());
    }

    let poller = LivePoller::spawn(
        Arc::new(api),
        Duration::from_secs(interval),
        |result| match result {
            Ok(feed) => {
                print_entries(&feed);
                println!();
            }
            Err(e) => eprintln!("Error: {}", e.message_or(LOAD_ENTRIES_FAILED)),
        },
    );
    tokio::signal::ctrl_c().await?;
    info!("stopping live entries feed");
    poller.stop().await;
    Ok(())
}

pub async fn stats(service: &ServiceArgs) -> Result<(), CliError> {
    let api = service.connect()?;
    let stats = api
        .event_stats()
        .await
        .map_err(service_error(LOAD_STATS_FAILED))?;
    println!("{}", format_stats(&stats));
    Ok(())
}
