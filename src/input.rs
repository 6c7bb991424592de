/// Input state shared between the event reader and the simulation.
///
/// Events write into [`InputState`]; the tick reads it at its start.  There is
/// no queue: the latest pressed/released state of a key wins.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
    ];
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    pressed: HashMap<Key, bool>,
    drag_dx: f32,
    drag_dy: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, is_down: bool) {
        self.pressed.insert(key, is_down);
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.get(&key).copied().unwrap_or(false)
    }

    /// Accumulate a pointer-drag delta relative to the previous sample.
    pub fn add_drag(&mut self, dx: f32, dy: f32) {
        self.drag_dx += dx;
        self.drag_dy += dy;
    }

    pub fn drag(&self) -> (f32, f32) {
        (self.drag_dx, self.drag_dy)
    }

    /// Hand the pending drag to the caller and zero it.
    pub fn take_drag(&mut self) -> (f32, f32) {
        let drag = self.drag();
        self.drag_dx = 0.0;
        self.drag_dy = 0.0;
        drag
    }

    /// Direction vector from the held keys: each axis is −1, 0 or +1.
    /// Opposite keys held together cancel out.
    pub fn direction(&self) -> (f32, f32) {
        let up = self.is_down(Key::W) || self.is_down(Key::ArrowUp);
        let down = self.is_down(Key::S) || self.is_down(Key::ArrowDown);
        let left = self.is_down(Key::A) || self.is_down(Key::ArrowLeft);
        let right = self.is_down(Key::D) || self.is_down(Key::ArrowRight);
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        (axis(left, right), axis(up, down))
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.drag_dx = 0.0;
        self.drag_dy = 0.0;
    }
}
