//! Holdspeak: push-to-talk dictation with local Whisper transcription.
//!
//! Hold the configured hotkey chord, speak, release; the recording is
//! transcribed on-device and typed into the focused window.

mod config;
mod dictation_state;
mod error;
mod events;
mod hotkey_monitor;
mod injector;
mod machine;
mod session;
mod status;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_events;
mod tray_manager;

pub(crate) use {
    dictation_state::DictationState,
    error::{AppError, Result as AppResult},
    events::MachineEvent,
    hotkey_monitor::HotkeyMonitor,
    injector::{KeystrokeInjector, TextInjector},
    machine::DictationMachine,
    session::Session,
    status::{DictationPhase, StatusSink, TraySink},
    tray_command::TrayCommand,
    tray_manager::TrayManager,
};

use crate::config::Config;

use holdspeak_core::{Recorder, SpeechEngine};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

/// Open the capture device and load the Whisper model.
///
/// Both are fatal startup checks: without a microphone or a model there
/// is nothing the pipeline can do, so failures abort before any hotkey
/// is watched.
fn init_audio(config: &Config) -> AppResult<(Recorder, SpeechEngine)> {
    let recorder = Recorder::new()?;
    let engine = SpeechEngine::new(
        &config.whisper.model_path,
        config.whisper.use_gpu,
        &config.whisper.language,
    )?;
    Ok((recorder, engine))
}

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("holdspeak=debug")
        .init();

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState(phase) => {
                        if let Err(e) = tray_manager.update_state(phase) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                if let Err(e) = config.validate_model_path() {
                    error!("Model validation failed: {:?}", e);
                    std::process::exit(1);
                }

                let chord = match config.hotkey.resolve() {
                    Ok(keys) => keys,
                    Err(e) => {
                        error!("Invalid hotkey chord: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let config_path = match Config::config_path() {
                    Ok(p) => p,
                    Err(e) => {
                        error!("Failed to resolve config path: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let (event_tx, event_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // The listener thread is never joined: rdev has no
                // unsubscribe, so it parks until the process exits.
                let _hotkey_thread = HotkeyMonitor::spawn(chord, event_tx.clone());
                info!(chord = ?config.hotkey.chord, "Hotkey monitor started");

                let tray_proxy = tray_proxy.clone();
                let config_item_id = tray_manager.config_item_id().clone();
                let exit_item_id = tray_manager.exit_item_id().clone();

                // Spawn tokio runtime on a separate thread.
                // TrayManager stays on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        // The recorder holds the CPAL stream (!Send), so it is
                        // built here on the thread that will drive it.
                        let (recorder, engine) = match init_audio(&config) {
                            Ok(pair) => pair,
                            Err(e) => {
                                error!("Audio startup failed: {:?}", e);
                                std::process::exit(1);
                            }
                        };

                        let injector =
                            match KeystrokeInjector::new(config.behaviour.copy_to_clipboard) {
                                Ok(inj) => inj,
                                Err(e) => {
                                    error!("Failed to create injector: {:?}", e);
                                    std::process::exit(1);
                                }
                            };

                        let machine = DictationMachine::new(
                            recorder,
                            engine,
                            injector,
                            TraySink::new(tray_proxy.clone()),
                            config.behaviour.min_utterance_ms,
                            event_tx.clone(),
                            shutdown_tx,
                        );

                        tokio::join!(
                            async {
                                if let Err(e) = machine.run(event_rx).await {
                                    error!(error = ?e, "Dictation machine error");
                                }
                            },
                            async {
                                if let Err(e) = tray_events::run_menu_loop(
                                    config_item_id,
                                    exit_item_id,
                                    config_path,
                                    event_tx,
                                    shutdown_rx,
                                )
                                .await
                                {
                                    error!(error = ?e, "Tray menu loop error");
                                }
                            }
                        );

                        // Both loops are done (exit request or fatal fault):
                        // close the tray and end the process.
                        let _ = tray_proxy.send_event(TrayCommand::Shutdown);
                        info!("Holdspeak shut down");
                    });
                });
            }
            _ => {}
        }
    });
}
