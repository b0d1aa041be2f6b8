//! Per-session overlay options

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which overlays to draw on annotated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Gaze panel: eye circles with direction arrows
    pub gaze_direction: bool,
    /// Pupil centre markers
    pub pupils: bool,
    /// Eye outlines
    pub eye_contours: bool,
    /// Iris outlines
    pub iris_contours: bool,
    /// Every landmark as a dot
    pub landmarks: bool,
    /// Mirror the frame before drawing the gaze panel
    pub mirror: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            gaze_direction: true,
            pupils: true,
            eye_contours: true,
            iris_contours: false,
            landmarks: false,
            mirror: true,
        }
    }
}

impl OverlayOptions {
    /// Plain frame, nothing drawn
    pub fn none() -> Self {
        Self {
            gaze_direction: false,
            pupils: false,
            eye_contours: false,
            iris_contours: false,
            landmarks: false,
            mirror: false,
        }
    }
}

/// Overlay options keyed by session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, OverlayOptions>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, returning its id
    pub fn create(&mut self, options: OverlayOptions) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, options);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<OverlayOptions> {
        self.sessions.get(id).copied()
    }

    /// Replace the options of an existing session
    pub fn update(&mut self, id: &Uuid, options: OverlayOptions) -> Option<OverlayOptions> {
        let slot = self.sessions.get_mut(id)?;
        *slot = options;
        Some(options)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<OverlayOptions> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionStore::new();
        let a = store.create(OverlayOptions::default());
        let b = store.create(OverlayOptions::none());

        let mut changed = OverlayOptions::default();
        changed.landmarks = true;
        store.update(&a, changed).unwrap();

        assert!(store.get(&a).unwrap().landmarks);
        assert_eq!(store.get(&b), Some(OverlayOptions::none()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_session() {
        let mut store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(store.get(&id).is_none());
        assert!(store.update(&id, OverlayOptions::none()).is_none());
        assert!(store.remove(&id).is_none());
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: OverlayOptions = serde_json::from_str(r#"{"landmarks": true}"#).unwrap();
        assert!(options.landmarks);
        assert!(options.gaze_direction);
        assert!(options.mirror);
    }
}
