//! Typed channels between the editor and its hosting application.
//!
//! The surrounding operations console (template library, drill switcher,
//! persistence transport) talks to the editor through explicit message
//! channels instead of ambient global state: inbound [`HostEvent`]s replace
//! the scene wholesale, outbound [`SceneChanged`] notifications carry the
//! current scene to whatever store the host uses. Outbound sends are
//! debounced and best-effort; a host that went away just stops receiving.

use crate::constants::AUTOSAVE_DEBOUNCE_SECS;
use crate::types::Scene;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Commands the host can send into the editor.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Replace the whole scene (template or drill switch)
    Apply(Scene),
    /// Empty the scene
    Clear,
    /// Mute exactly one pending debounced scene-changed notification
    SuppressNextAutosave,
}

/// Who caused a scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// A direct edit in the editor
    User,
    /// A programmatic load: template apply, drill switch, file open
    External,
}

/// A debounced snapshot of the scene after it changed.
#[derive(Debug, Clone)]
pub struct SceneChanged {
    /// The scene as of the flush
    pub scene: Scene,
    /// Whether a user edit or an external apply triggered it
    pub source: ChangeSource,
}

/// The editor's end of the host channels plus the autosave debounce state.
#[derive(Debug)]
pub struct HostLink {
    event_rx: Receiver<HostEvent>,
    event_tx: Sender<HostEvent>,
    changed_tx: Option<Sender<SceneChanged>>,
    dirty_since: Option<f64>,
    dirty_source: ChangeSource,
    suppress_next: bool,
}

impl Default for HostLink {
    fn default() -> Self {
        let (event_tx, event_rx) = channel();
        Self {
            event_rx,
            event_tx,
            changed_tx: None,
            dirty_since: None,
            dirty_source: ChangeSource::User,
            suppress_next: false,
        }
    }
}

impl HostLink {
    /// Creates an unconnected link; the host wires itself up via
    /// [`HostLink::sender`] and [`HostLink::subscribe`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender the host can keep to inject [`HostEvent`]s.
    pub fn sender(&self) -> Sender<HostEvent> {
        self.event_tx.clone()
    }

    /// Registers the host's receiver side for scene-changed notifications.
    pub fn subscribe(&mut self, tx: Sender<SceneChanged>) {
        self.changed_tx = Some(tx);
    }

    /// Drains all inbound events that arrived since the last frame.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            if matches!(event, HostEvent::SuppressNextAutosave) {
                self.suppress_next = true;
            } else {
                events.push(event);
            }
        }
        events
    }

    /// Records that the scene changed at `now`, restarting the debounce
    /// window. Later changes within the window coalesce into one flush; the
    /// most recent source tag wins.
    pub fn mark_changed(&mut self, now: f64, source: ChangeSource) {
        self.dirty_since = Some(now);
        self.dirty_source = source;
    }

    /// True while a notification is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Flushes the pending notification once the quiet period has elapsed.
    ///
    /// A suppression mutes exactly the one flush it precedes. A send to a
    /// disconnected host is dropped silently: persistence is best-effort and
    /// must never interrupt editing.
    pub fn flush_due(&mut self, now: f64, scene: &Scene) {
        let Some(since) = self.dirty_since else {
            return;
        };
        if now - since < AUTOSAVE_DEBOUNCE_SECS {
            return;
        }
        self.dirty_since = None;
        if self.suppress_next {
            self.suppress_next = false;
            return;
        }
        if let Some(tx) = &self.changed_tx {
            if tx
                .send(SceneChanged {
                    scene: scene.clone(),
                    source: self.dirty_source,
                })
                .is_err()
            {
                log::debug!("scene-changed receiver disconnected; notification dropped");
            }
        }
    }
}
