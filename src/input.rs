//! Frame input state.
//!
//! The window layer feeds raw events in; this tracks per-frame edges
//! (just-pressed / just-released) and converts physical coordinates into
//! the virtual canvas space everything else works in. A frame of input can
//! be recorded and replayed byte-for-byte for deterministic dispatch tests.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::Position;

#[derive(Default, Debug, Clone)]
pub struct InputState {
    // Keys identified by string names (e.g. "KeyA", "Space")
    pub pressed: HashSet<String>,
    pub just_pressed: HashSet<String>,
    pub just_released: HashSet<String>,
    prev_pressed: HashSet<String>,
    // Pointer, virtual coordinates
    pub pointer: Option<Position>,
    pub lmb_down: bool,
    pub lmb_just_pressed: bool,
    pub lmb_just_released: bool,
    prev_lmb_down: bool,
    /// Wheel movement this frame, in detents (positive scrolls content up).
    pub wheel: f32,
}

impl InputState {
    pub fn update_from_keys<I: IntoIterator<Item = String>>(&mut self, keys: I) {
        let current: HashSet<String> = keys.into_iter().collect();
        self.just_pressed = current.difference(&self.prev_pressed).cloned().collect();
        self.just_released = self.prev_pressed.difference(&current).cloned().collect();
        self.pressed = current.clone();
        self.prev_pressed = current;
    }

    pub fn update_pointer(&mut self, pointer: Option<Position>, lmb_down_now: bool) {
        self.pointer = pointer;
        self.lmb_just_pressed = lmb_down_now && !self.prev_lmb_down;
        self.lmb_just_released = !lmb_down_now && self.prev_lmb_down;
        self.lmb_down = lmb_down_now;
        self.prev_lmb_down = lmb_down_now;
    }

    pub fn set_wheel(&mut self, detents: f32) {
        self.wheel = detents;
    }

    /// Clear one-frame data after the frame consumed it.
    pub fn end_frame(&mut self) {
        self.wheel = 0.0;
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn is_just_pressed(&self, key: &str) -> bool {
        self.just_pressed.contains(key)
    }

    pub fn any_key_just_pressed(&self) -> bool {
        !self.just_pressed.is_empty()
    }
}

/// Physical window coordinates to virtual canvas coordinates.
pub fn physical_to_virtual(x: f64, y: f64, scale_factor: f32) -> Position {
    Position {
        x: (x as f32 / scale_factor) as i32,
        y: (y as f32 / scale_factor) as i32,
    }
}

/// One frame of input, serializable for record/replay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FrameInputRecord {
    pub pressed_keys: Vec<String>,
    pub pointer: Option<(i32, i32)>,
    pub lmb_down: bool,
    pub wheel: f32,
}

impl FrameInputRecord {
    pub fn from_state(input: &InputState) -> Self {
        Self {
            pressed_keys: input.pressed.iter().cloned().collect(),
            pointer: input.pointer.map(|p| (p.x, p.y)),
            lmb_down: input.lmb_down,
            wheel: input.wheel,
        }
    }

    pub fn apply_to(&self, input: &mut InputState) {
        input.update_from_keys(self.pressed_keys.clone());
        input.update_pointer(self.pointer.map(|(x, y)| Position::new(x, y)), self.lmb_down);
        input.set_wheel(self.wheel);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplayScript {
    pub frames: Vec<FrameInputRecord>,
}

impl ReplayScript {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("replay script serializes")
    }

    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_edges() {
        let mut input = InputState::default();
        input.update_from_keys(vec!["Space".to_string()]);
        assert!(input.is_pressed("Space"));
        assert!(input.is_just_pressed("Space"));
        input.update_from_keys(vec!["Space".to_string()]);
        assert!(input.is_pressed("Space"));
        assert!(!input.is_just_pressed("Space"));
        input.update_from_keys(Vec::<String>::new());
        assert!(!input.is_pressed("Space"));
        assert!(input.just_released.contains("Space"));
    }

    #[test]
    fn pointer_edges() {
        let mut input = InputState::default();
        input.update_pointer(Some(Position::new(10, 20)), true);
        assert!(input.lmb_just_pressed);
        input.update_pointer(Some(Position::new(15, 25)), true);
        assert!(!input.lmb_just_pressed);
        input.update_pointer(Some(Position::new(15, 25)), false);
        assert!(input.lmb_just_released);
    }

    #[test]
    fn physical_coordinates_scale_down() {
        let p = physical_to_virtual(200.0, 100.0, 2.0);
        assert_eq!(p, Position::new(100, 50));
    }

    #[test]
    fn record_roundtrips_through_json() {
        let mut input = InputState::default();
        input.update_from_keys(vec!["Enter".to_string()]);
        input.update_pointer(Some(Position::new(42, 24)), true);
        input.set_wheel(-1.5);
        let rec = FrameInputRecord::from_state(&input);
        let script = ReplayScript { frames: vec![rec] };
        let parsed = ReplayScript::from_json(&script.to_json()).unwrap();
        let mut replayed = InputState::default();
        parsed.frames[0].apply_to(&mut replayed);
        assert!(replayed.is_pressed("Enter"));
        assert_eq!(replayed.pointer, Some(Position::new(42, 24)));
        assert!(replayed.lmb_down);
        assert_eq!(replayed.wheel, -1.5);
    }
}
