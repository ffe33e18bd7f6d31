//! Tray menu event loop.
//!
//! Bridges the tray's crossbeam menu-event channel into the async side
//! and turns menu clicks into actions: opening the configuration file
//! or requesting shutdown.

use crate::{AppError, AppResult, MachineEvent};

use std::{panic::Location, path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use tray_icon::menu::{MenuEvent, MenuId};

/// Run the tray menu loop until exit is clicked or the machine stops.
///
/// MenuEvent::receiver() returns a crossbeam_channel::Receiver which has
/// blocking recv() -- a single persistent blocking task forwards events
/// with zero polling. When this loop ends the forwarder's next
/// blocking_send() fails, breaking it out of recv().
pub(crate) async fn run_menu_loop(
    config_item_id: MenuId,
    exit_item_id: MenuId,
    config_path: PathBuf,
    event_tx: mpsc::Sender<MachineEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    let (menu_tx, mut menu_rx) = mpsc::channel(32);

    let forwarder = tokio::task::spawn_blocking(move || {
        let receiver = MenuEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if menu_tx.blocking_send(event).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                info!("Tray menu loop shutting down");
                break;
            }
            Some(event) = menu_rx.recv() => {
                if event.id == config_item_id {
                    // Settings are file-based; hand the TOML to the OS.
                    let _ = open::that(&config_path);
                    info!(config_path = ?config_path, "Opened configuration file");
                } else if event.id == exit_item_id {
                    info!("Exit requested from tray menu");
                    event_tx.send(MachineEvent::Shutdown).await.map_err(|e| {
                        AppError::ChannelSendFailed {
                            message: format!("Failed to send Shutdown: {}", e),
                            location: ErrorLocation::from(Location::caller()),
                        }
                    })?;
                    break;
                }
            }
        }
    }

    // Drop menu_rx to unblock the forwarder's next blocking_send().
    drop(menu_rx);

    // Best-effort join: the forwarder may be stuck in recv() until one
    // more menu event arrives. The runtime cleans it up on exit anyway.
    match tokio::time::timeout(Duration::from_secs(1), forwarder).await {
        Ok(Ok(())) => debug!("Menu event forwarder stopped cleanly"),
        Ok(Err(e)) => warn!(error = ?e, "Menu event forwarder task panicked"),
        Err(_) => debug!(
            "Menu event forwarder did not stop within timeout, \
                 will be cleaned up on exit"
        ),
    }

    Ok(())
}
