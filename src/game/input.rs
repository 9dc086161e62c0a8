//! Input Capture and Recording
//!
//! The presentation layer exposes four logical keys through [`KeyState`].
//! Each tick samples them into a one-byte [`InputFrame`]; frames are
//! delta-compressed into an [`InputRecording`] for deterministic replay.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

// =============================================================================
// KEYS
// =============================================================================

/// Logical keys read once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Turn counter-clockwise
    TurnLeft,
    /// Turn clockwise
    TurnRight,
    /// Walk along the heading
    Forward,
    /// Walk against the heading
    Backward,
}

impl Key {
    /// All keys in processing order.
    pub const ALL: [Key; 4] = [Key::TurnLeft, Key::TurnRight, Key::Forward, Key::Backward];

    const fn bit(self) -> u8 {
        match self {
            Key::TurnLeft => InputFrame::FLAG_TURN_LEFT,
            Key::TurnRight => InputFrame::FLAG_TURN_RIGHT,
            Key::Forward => InputFrame::FLAG_FORWARD,
            Key::Backward => InputFrame::FLAG_BACKWARD,
        }
    }
}

/// Key-state query surface implemented by the input source.
pub trait KeyState {
    /// Whether `key` is currently held.
    fn is_down(&self, key: Key) -> bool;
}

impl KeyState for BTreeSet<Key> {
    fn is_down(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Key state for a single tick.
///
/// NO tick field - tick is stored separately for compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held keys (packed bits):
    /// - Bit 0: turn left
    /// - Bit 1: turn right
    /// - Bit 2: forward
    /// - Bit 3: backward
    pub flags: u8,
}

impl InputFrame {
    /// Turn-left flag bit
    pub const FLAG_TURN_LEFT: u8 = 0x01;
    /// Turn-right flag bit
    pub const FLAG_TURN_RIGHT: u8 = 0x02;
    /// Forward flag bit
    pub const FLAG_FORWARD: u8 = 0x04;
    /// Backward flag bit
    pub const FLAG_BACKWARD: u8 = 0x08;

    /// No keys held.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Frame with exactly `keys` held.
    pub fn with_keys(keys: &[Key]) -> Self {
        let mut frame = Self::new();
        for &key in keys {
            frame.set(key, true);
        }
        frame
    }

    /// Read the current key state.
    pub fn sample(keys: &impl KeyState) -> Self {
        let mut frame = Self::new();
        for key in Key::ALL {
            frame.set(key, keys.is_down(key));
        }
        frame
    }

    /// Whether `key` is held in this frame.
    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        self.flags & key.bit() != 0
    }

    /// Set or clear `key`.
    #[inline]
    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.flags |= key.bit();
        } else {
            self.flags &= !key.bit();
        }
    }
}

impl KeyState for InputFrame {
    fn is_down(&self, key: Key) -> bool {
        InputFrame::is_down(self, key)
    }
}

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every tick).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// Input recording encode/decode errors.
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    /// Bincode failure
    #[error("Recording codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Complete input recording for one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Drop seed the world was loaded with
    pub map_seed: u64,

    /// First recorded tick
    pub start_tick: u32,

    /// Number of ticks covered
    pub tick_count: u32,

    /// Only ticks where input CHANGED
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new(map_seed: u64, start_tick: u32) -> Self {
        Self {
            map_seed,
            start_tick,
            tick_count: 0,
            deltas: Vec::with_capacity(128),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Ticks must be recorded in increasing order. Only stores if input
    /// changed from the previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.tick_count = tick.saturating_sub(self.start_tick) + 1;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Extend (or cut) the covered range to end before `end_tick`.
    pub fn finalize(&mut self, end_tick: u32) {
        self.tick_count = end_tick.saturating_sub(self.start_tick);
    }

    /// Iterate every covered tick with its input.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordingError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordingError> {
        let mut recording: Self = bincode::deserialize(bytes)?;
        recording.last_frame = recording
            .deltas
            .last()
            .map(|d| d.frame)
            .unwrap_or_default();
        Ok(recording)
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.recording.start_tick as u64 + self.recording.tick_count as u64;
        if self.current_tick as u64 >= end {
            return None;
        }

        let deltas = &self.recording.deltas;
        while self.delta_idx < deltas.len() && deltas[self.delta_idx].tick <= self.current_tick {
            self.current_frame = deltas[self.delta_idx].frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
