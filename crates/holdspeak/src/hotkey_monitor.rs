//! Global hotkey chord monitor.
//!
//! Watches raw key-down/key-up events from the OS input layer, tracks
//! the set of currently depressed keys, and emits edge-triggered
//! engage/disengage events when the configured chord becomes fully held
//! or loses a member. Chord membership is a set test, not an ordering.

use crate::MachineEvent;

use std::collections::HashSet;
use std::thread::{self, JoinHandle};

use rdev::{Event, EventType, Key};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Edge produced by the chord tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordEdge {
    /// The chord went from not fully held to fully held.
    Engage,
    /// A fully held chord lost at least one member.
    Disengage,
}

/// Set-membership chord state over raw key events.
///
/// Key-repeat events for an already-down key are no-ops, so a held
/// chord emits exactly one engage until some member is released.
#[derive(Debug)]
pub struct ChordTracker {
    chord: HashSet<Key>,
    pressed: HashSet<Key>,
    satisfied: bool,
}

impl ChordTracker {
    /// Create a tracker for the given chord.
    pub fn new(chord: HashSet<Key>) -> Self {
        Self {
            chord,
            pressed: HashSet::new(),
            satisfied: false,
        }
    }

    /// Record a key press; returns the edge it caused, if any.
    pub fn key_down(&mut self, key: Key) -> Option<ChordEdge> {
        if !self.pressed.insert(key) {
            // OS key-repeat for a key that is already down.
            return None;
        }
        self.edge()
    }

    /// Record a key release; returns the edge it caused, if any.
    pub fn key_up(&mut self, key: Key) -> Option<ChordEdge> {
        if !self.pressed.remove(&key) {
            return None;
        }
        self.edge()
    }

    fn edge(&mut self) -> Option<ChordEdge> {
        // An empty chord can never be satisfied.
        let satisfied_now =
            !self.chord.is_empty() && self.chord.iter().all(|k| self.pressed.contains(k));

        match (self.satisfied, satisfied_now) {
            (false, true) => {
                self.satisfied = true;
                Some(ChordEdge::Engage)
            }
            (true, false) => {
                self.satisfied = false;
                Some(ChordEdge::Disengage)
            }
            _ => None,
        }
    }
}

/// Forwards chord edges from the OS input hook to the machine channel.
pub struct HotkeyMonitor;

impl HotkeyMonitor {
    /// Spawn the OS input listener on a dedicated thread.
    ///
    /// `rdev::listen` parks the thread for the process lifetime; there
    /// is no unsubscribe, so the handle is detached and the thread dies
    /// with the process. If the hook cannot be established (missing
    /// input permissions, no display server), a `HotkeyFault` event is
    /// delivered and the orchestrator aborts.
    pub fn spawn(chord: HashSet<Key>, event_tx: mpsc::Sender<MachineEvent>) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut tracker = ChordTracker::new(chord);
            let edge_tx = event_tx.clone();

            info!("Subscribing to global key events");

            let result = rdev::listen(move |event: Event| {
                let edge = match event.event_type {
                    EventType::KeyPress(key) => tracker.key_down(key),
                    EventType::KeyRelease(key) => tracker.key_up(key),
                    _ => None,
                };

                let machine_event = match edge {
                    Some(ChordEdge::Engage) => MachineEvent::Engage,
                    Some(ChordEdge::Disengage) => MachineEvent::Disengage,
                    None => return,
                };

                // The machine being gone means the process is shutting
                // down; there is no way to stop the hook, so edges are
                // simply dropped from here on.
                let _ = edge_tx.blocking_send(machine_event);
            });

            if let Err(e) = result {
                warn!(error = ?e, "Could not subscribe to OS input events");
                let _ = event_tx.blocking_send(MachineEvent::HotkeyFault {
                    reason: format!("{:?}", e),
                });
            }
        })
    }
}
