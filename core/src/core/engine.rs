//! Host collaborator contracts. The windowed shell (video, audio output,
//! input capture) lives outside this crate; the core only consumes these
//! handles and appends line segments for the host to draw.

use std::ops::{Add, AddAssign};

use crate::core::error::EmuResult;
use crate::sync::SyncProtocol;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        *self = *self + other;
    }
}

/// One beam segment in integrator space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub p0: Vec2,
    pub p1: Vec2,
}

/// Accumulates drawn segments for the current frame; the host drains it.
#[derive(Default)]
pub struct RenderContext {
    pub lines: Vec<Line>,
}

/// Sound sink handle. Opaque to the core; PSG synthesis is the host's
/// problem.
#[derive(Default)]
pub struct AudioContext;

/// Controller state cached once per frame. Button bits are active-low, as
/// the hardware presents them.
#[derive(Clone, Copy, Debug)]
pub struct Input {
    buttons: u8,
    analog: [i8; 4],
}

impl Input {
    pub fn new() -> Self {
        Self {
            buttons: 0xFF,
            analog: [0; 4],
        }
    }

    pub fn button_state_mask(&self) -> u8 {
        self.buttons
    }

    pub fn analog_state_mask(&self, axis: u8) -> i8 {
        self.analog[(axis & 3) as usize]
    }

    pub fn set_button(&mut self, index: u8, pressed: bool) {
        if pressed {
            self.buttons &= !(1 << index);
        } else {
            self.buttons |= 1 << index;
        }
    }

    pub fn set_analog(&mut self, axis: u8, value: i8) {
        self.analog[(axis & 3) as usize] = value;
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

/// Events the host delivers alongside each frame.
pub enum EmuEvent {
    BreakIntoDebugger,
}

pub type EmuEvents = Vec<EmuEvent>;

/// The machine as the host engine sees it.
pub trait EngineClient {
    fn init(&mut self, args: &[String]) -> EmuResult<()>;

    /// Advance by `frame_time` seconds. Returns `Ok(false)` on clean
    /// shutdown (debugger `quit`).
    #[allow(clippy::too_many_arguments)]
    fn frame_update(
        &mut self,
        frame_time: f64,
        input: &Input,
        events: &EmuEvents,
        render: &mut RenderContext,
        audio: &mut AudioContext,
        sync: &mut dyn SyncProtocol,
    ) -> EmuResult<bool>;

    fn shutdown(&mut self);
}
