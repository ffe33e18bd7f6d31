//! System tray icon with phase-based updates.
//!
//! Shows one of three glyphs (green Idle, red Listening, blue
//! Transcribing) and a context menu for opening the configuration file
//! and exiting. Icons are drawn in code at startup, so no image assets
//! ship with the binary.

use crate::{AppError, AppResult, DictationPhase};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 64;
const ICON_RADIUS: i32 = 16;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    config_item_id: MenuId,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a new tray manager in the Idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let config_item = MenuItem::new("Open Config", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let config_id = config_item.id().clone();
        let exit_id = exit_item.id().clone();

        menu.append(&config_item).map_err(|e| AppError::TrayError {
            reason: format!("Failed to add config menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        menu.append(&exit_item).map_err(|e| AppError::TrayError {
            reason: format!("Failed to add exit menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = render_icon(DictationPhase::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip("Holdspeak - Ready")
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            config_item_id: config_id,
            exit_item_id: exit_id,
        })
    }

    /// Update the tray icon for a new pipeline phase.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, phase: DictationPhase) -> AppResult<()> {
        let tooltip = match phase {
            DictationPhase::Idle => "Holdspeak - Ready",
            DictationPhase::Listening => "Holdspeak - Listening...",
            DictationPhase::Transcribing => "Holdspeak - Transcribing...",
        };

        self.tray_icon
            .set_icon(Some(render_icon(phase)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Get the open-config menu item ID.
    pub fn config_item_id(&self) -> &MenuId {
        &self.config_item_id
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }
}

/// Fill color per phase: green idle, red listening, blue transcribing.
fn phase_color(phase: DictationPhase) -> [u8; 4] {
    match phase {
        DictationPhase::Idle => [60, 179, 113, 255],
        DictationPhase::Listening => [255, 0, 0, 255],
        DictationPhase::Transcribing => [0, 0, 255, 255],
    }
}

/// Render the phase glyph: a filled circle on a transparent square.
#[track_caller]
fn render_icon(phase: DictationPhase) -> AppResult<Icon> {
    let color = phase_color(phase);
    let center = (ICON_SIZE / 2) as i32;
    let mut rgba = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];

    for y in 0..ICON_SIZE as i32 {
        for x in 0..ICON_SIZE as i32 {
            let (dx, dy) = (x - center, y - center);
            if dx * dx + dy * dy <= ICON_RADIUS * ICON_RADIUS {
                let offset = ((y * ICON_SIZE as i32 + x) * 4) as usize;
                rgba[offset..offset + 4].copy_from_slice(&color);
            }
        }
    }

    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| AppError::TrayError {
        reason: format!("Failed to create icon from RGBA: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}
