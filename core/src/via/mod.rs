//! 6522-style Versatile Interface Adapter. Besides the usual ports and
//! timers it is the analog heart of the console: Port A feeds the DAC, the
//! MUX routes the DAC into the integrators, Timer 1's PB7 output gates
//! /RAMP, and the shift register's CB2 output gates /BLANK.

mod shift;
mod timer;

pub use shift::ShiftRegister;
pub use timer::{Timer, TimerMode};

use std::rc::Rc;

use crate::core::bus::MemoryBusDevice;
use crate::core::engine::{AudioContext, Input, Line, RenderContext, Vec2};
use crate::core::error::{EmuError, EmuResult, ErrorHandler};
use crate::core::Cycles;

mod reg {
    pub const PORT_B: u16 = 0x0;
    pub const PORT_A: u16 = 0x1;
    pub const DATA_DIR_B: u16 = 0x2;
    pub const DATA_DIR_A: u16 = 0x3;
    pub const TIMER1_LOW: u16 = 0x4;
    pub const TIMER1_HIGH: u16 = 0x5;
    pub const TIMER1_LATCH_LOW: u16 = 0x6;
    pub const TIMER1_LATCH_HIGH: u16 = 0x7;
    pub const TIMER2_LOW: u16 = 0x8;
    pub const TIMER2_HIGH: u16 = 0x9;
    pub const SHIFT: u16 = 0xA;
    pub const AUX_CNTL: u16 = 0xB;
    pub const PERIPH_CNTL: u16 = 0xC;
    pub const INTERRUPT_FLAG: u16 = 0xD;
    pub const INTERRUPT_ENABLE: u16 = 0xE;
    pub const PORT_A_NO_HANDSHAKE: u16 = 0xF;
}

mod port_b {
    pub const MUX_DISABLED: u8 = 0x01;
    pub const MUX_SEL_MASK: u8 = 0x06;
    pub const MUX_SEL_SHIFT: u8 = 1;
    pub const SOUND_BC1: u8 = 0x08;
    pub const SOUND_BDIR: u8 = 0x10;
    pub const COMPARATOR: u8 = 0x20;
    pub const RAMP_DISABLED: u8 = 0x80;
}

mod aux_cntl {
    pub const SHIFT_MODE_MASK: u8 = 0x1C;
    pub const SHIFT_MODE_SHIFT: u8 = 2;
    pub const TIMER2_PULSE_COUNTING: u8 = 0x20;
    pub const TIMER1_FREE_RUNNING: u8 = 0x40;
    pub const PB7_FLAG: u8 = 0x80;
}

mod periph_cntl {
    // CA2 -> /ZERO, CB2 -> /BLANK; both fields are 110 (asserted) or 111
    pub const CA2_MASK: u8 = 0x0E;
    pub const CA2_SHIFT: u8 = 1;
    pub const CB2_MASK: u8 = 0xE0;
    pub const CB2_SHIFT: u8 = 5;

    pub fn ca2(value: u8) -> u8 {
        (value & CA2_MASK) >> CA2_SHIFT
    }

    pub fn cb2(value: u8) -> u8 {
        (value & CB2_MASK) >> CB2_SHIFT
    }

    pub fn is_zero_enabled(value: u8) -> bool {
        ca2(value) == 0b110
    }

    pub fn is_blank_enabled(value: u8) -> bool {
        cb2(value) == 0b110
    }
}

mod int_flag {
    pub const TIMER2: u8 = 0x20;
    pub const TIMER1: u8 = 0x40;
}

fn set_bits(value: &mut u8, mask: u8, set: bool) {
    if set {
        *value |= mask;
    } else {
        *value &= !mask;
    }
}

pub struct Via {
    port_a: u8,
    port_b: u8,
    data_dir_a: u8,
    data_dir_b: u8,
    periph_cntl: u8,
    interrupt_enable: u8,
    timer1: Timer,
    timer2: Timer,
    shift_register: ShiftRegister,
    joystick_button_state: u8,
    joystick_analog_state: [i8; 4],
    pos: Vec2,
    velocity_x: i8,
    velocity_y: i8,
    xy_offset: i8,
    brightness: u8,
    blank: bool,
    error_handler: Rc<ErrorHandler>,
}

impl Via {
    pub fn new(error_handler: Rc<ErrorHandler>) -> Self {
        let mut via = Self {
            port_a: 0,
            port_b: 0,
            data_dir_a: 0,
            data_dir_b: 0,
            periph_cntl: 0,
            interrupt_enable: 0,
            timer1: Timer::new(),
            timer2: Timer::new(),
            shift_register: ShiftRegister::new(),
            joystick_button_state: 0xFF,
            joystick_analog_state: [0; 4],
            pos: Vec2::default(),
            velocity_x: 0,
            velocity_y: 0,
            xy_offset: 0,
            brightness: 0,
            blank: true,
            error_handler,
        };
        via.reset();
        via
    }

    pub fn reset(&mut self) {
        self.port_a = 0;
        self.port_b = 0;
        self.data_dir_a = 0;
        self.data_dir_b = 0;
        self.periph_cntl = 0;
        self.interrupt_enable = 0;
        set_bits(&mut self.port_b, port_b::RAMP_DISABLED, true);
    }

    /// Timer interrupt flags gated by the interrupt-enable register.
    pub fn irq_enabled(&self) -> bool {
        (self.interrupt_enable & int_flag::TIMER1 != 0 && self.timer1.interrupt_flag())
            || (self.interrupt_enable & int_flag::TIMER2 != 0 && self.timer2.interrupt_flag())
    }

    /// Nothing on this board drives /FIRQ.
    pub fn firq_enabled(&self) -> bool {
        false
    }

    pub fn beam_position(&self) -> Vec2 {
        self.pos
    }

    pub fn update(
        &mut self,
        cycles: Cycles,
        input: &Input,
        render: &mut RenderContext,
        _audio: &mut AudioContext,
    ) {
        self.joystick_button_state = input.button_state_mask();
        for axis in 0..4u8 {
            self.joystick_analog_state[axis as usize] = input.analog_state_mask(axis);
        }

        // The beam integrates between timer-driven BLANK edges, so this must
        // step one cycle at a time; batching would fuse separate segments.
        let mut cycles_left = cycles;
        while cycles_left > 0 {
            cycles_left -= 1;

            self.timer1.tick();
            self.timer2.tick();
            let shifting = self.shift_register.enabled();
            self.shift_register.tick();

            // The shift register's CB2 line drives /BLANK while shifting
            if shifting {
                self.blank = self.shift_register.cb2_active();
            }

            // Timer 1's PB7 output drives /RAMP when enabled
            if self.timer1.pb7_flag() {
                set_bits(
                    &mut self.port_b,
                    port_b::RAMP_DISABLED,
                    !self.timer1.pb7_signal_low(),
                );
            }

            if periph_cntl::is_zero_enabled(self.periph_cntl) {
                self.pos = Vec2::default();
            }

            let last_pos = self.pos;

            // Integrators accumulate while /RAMP is active (low)
            let integrators_enabled = self.port_b & port_b::RAMP_DISABLED == 0;
            if integrators_enabled {
                self.pos += Vec2 {
                    x: (self.velocity_x as f32 + self.xy_offset as f32) / 128.0,
                    y: (self.velocity_y as f32 + self.xy_offset as f32) / 128.0,
                };
            }

            // Dots can be drawn even while the integrators are off
            let drawing_enabled = !self.blank && self.brightness > 0 && self.brightness <= 128;
            if drawing_enabled {
                render.lines.push(Line {
                    p0: last_pos,
                    p1: self.pos,
                });
            }
        }
    }

    /// Port A feeds the DAC, which feeds both the X integrator directly and
    /// the MUX; the MUX-selected target only updates while the MUX is on.
    fn update_integrators(&mut self) {
        let mux_enabled = self.port_b & port_b::MUX_DISABLED == 0;
        if mux_enabled {
            match (self.port_b & port_b::MUX_SEL_MASK) >> port_b::MUX_SEL_SHIFT {
                0 => self.velocity_y = self.port_a as i8,
                1 => self.xy_offset = self.port_a as i8,
                2 => self.brightness = self.port_a,
                3 => {} // sound output line via the divider network
                _ => unreachable!(),
            }
        }
        self.velocity_x = self.port_a as i8;
    }
}

impl MemoryBusDevice for Via {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        match address & 0xF {
            reg::PORT_B => {
                let mut result = self.port_b;
                // The comparator bit reflects the DAC against the selected
                // analog axis regardless of the MUX enable; the BIOS reads
                // it this way during analog joystick sampling.
                let mux_sel =
                    ((self.port_b & port_b::MUX_SEL_MASK) >> port_b::MUX_SEL_SHIFT) as usize;
                let comparator = (self.port_a as i8) < self.joystick_analog_state[mux_sel];
                set_bits(&mut result, port_b::COMPARATOR, comparator);
                Ok(result)
            }
            reg::PORT_A => {
                // Digital joystick input, routed through the sound chip's
                // port when BDIR is low and BC1 high
                if self.port_b & port_b::SOUND_BDIR == 0
                    && self.port_b & port_b::SOUND_BC1 != 0
                    && self.data_dir_a == 0
                {
                    return Ok(self.joystick_button_state);
                }
                Ok(self.port_a)
            }
            reg::DATA_DIR_B => Ok(self.data_dir_b),
            reg::DATA_DIR_A => Ok(self.data_dir_a),
            reg::TIMER1_LOW => Ok(self.timer1.read_counter_low()),
            reg::TIMER1_HIGH => Ok(self.timer1.read_counter_high()),
            reg::TIMER1_LATCH_LOW => Ok(self.timer1.read_latch_low()),
            reg::TIMER1_LATCH_HIGH => Ok(self.timer1.read_latch_high()),
            reg::TIMER2_LOW => Ok(self.timer2.read_counter_low()),
            reg::TIMER2_HIGH => Ok(self.timer2.read_counter_high()),
            reg::SHIFT => Ok(self.shift_register.value()),
            reg::AUX_CNTL => {
                let mut value = 0b110 << aux_cntl::SHIFT_MODE_SHIFT;
                set_bits(
                    &mut value,
                    aux_cntl::TIMER1_FREE_RUNNING,
                    self.timer1.mode() == TimerMode::FreeRunning,
                );
                set_bits(
                    &mut value,
                    aux_cntl::TIMER2_PULSE_COUNTING,
                    self.timer2.mode() == TimerMode::PulseCounting,
                );
                set_bits(&mut value, aux_cntl::PB7_FLAG, self.timer1.pb7_flag());
                Ok(value)
            }
            reg::PERIPH_CNTL => Ok(self.periph_cntl),
            reg::INTERRUPT_FLAG => {
                let mut value = 0;
                set_bits(&mut value, int_flag::TIMER1, self.timer1.interrupt_flag());
                set_bits(&mut value, int_flag::TIMER2, self.timer2.interrupt_flag());
                Ok(value)
            }
            reg::INTERRUPT_ENABLE => Ok(self.interrupt_enable),
            reg::PORT_A_NO_HANDSHAKE => {
                self.error_handler.report(EmuError::AssertViolation(
                    "port A without handshake not implemented".into(),
                ))?;
                Ok(0)
            }
            _ => unreachable!(),
        }
    }

    fn write(&mut self, address: u16, value: u8) -> EmuResult<()> {
        match address & 0xF {
            reg::PORT_B => {
                self.port_b = value;
                self.update_integrators();
            }
            reg::PORT_A => {
                self.port_a = value;
                if self.data_dir_a == 0xFF {
                    self.update_integrators();
                }
            }
            reg::DATA_DIR_B => self.data_dir_b = value,
            reg::DATA_DIR_A => {
                self.data_dir_a = value;
                if value != 0x00 && value != 0xFF {
                    self.error_handler.report(EmuError::AssertViolation(
                        "DDRA expected to be all inputs or all outputs".into(),
                    ))?;
                }
            }
            reg::TIMER1_LOW => self.timer1.write_counter_low(value),
            reg::TIMER1_HIGH => self.timer1.write_counter_high(value),
            reg::TIMER1_LATCH_LOW => self.timer1.write_latch_low(value),
            reg::TIMER1_LATCH_HIGH => self.timer1.write_latch_high(value),
            reg::TIMER2_LOW => self.timer2.write_counter_low(value),
            reg::TIMER2_HIGH => self.timer2.write_counter_high(value),
            reg::SHIFT => self.shift_register.set_value(value),
            reg::AUX_CNTL => {
                let shift_mode = (value & aux_cntl::SHIFT_MODE_MASK) >> aux_cntl::SHIFT_MODE_SHIFT;
                if shift_mode != 0b110 {
                    self.error_handler.report(EmuError::AssertViolation(
                        "shift register only supports shift-out under o2".into(),
                    ))?;
                }
                let timer1_mode = if value & aux_cntl::TIMER1_FREE_RUNNING != 0 {
                    TimerMode::FreeRunning
                } else {
                    TimerMode::OneShot
                };
                let timer2_mode = if value & aux_cntl::TIMER2_PULSE_COUNTING != 0 {
                    TimerMode::PulseCounting
                } else {
                    TimerMode::OneShot
                };
                if timer1_mode != TimerMode::OneShot {
                    self.error_handler.report(EmuError::AssertViolation(
                        "timer 1 assumed always in one-shot mode".into(),
                    ))?;
                }
                if timer2_mode != TimerMode::OneShot {
                    self.error_handler.report(EmuError::AssertViolation(
                        "timer 2 assumed always in one-shot mode".into(),
                    ))?;
                }
                self.timer1.set_mode(timer1_mode);
                self.timer2.set_mode(timer2_mode);
                self.timer1.set_pb7_flag(value & aux_cntl::PB7_FLAG != 0);
            }
            reg::PERIPH_CNTL => {
                let ca2 = periph_cntl::ca2(value);
                if ca2 != 0b110 && ca2 != 0b111 {
                    self.error_handler.report(EmuError::AssertViolation(
                        "unexpected value for CA2 (/ZERO) bits".into(),
                    ))?;
                }
                let cb2 = periph_cntl::cb2(value);
                if cb2 != 0b110 && cb2 != 0b111 {
                    self.error_handler.report(EmuError::AssertViolation(
                        "unexpected value for CB2 (/BLANK) bits".into(),
                    ))?;
                }
                self.periph_cntl = value;
                if !self.shift_register.enabled() {
                    self.blank = periph_cntl::is_blank_enabled(value);
                }
            }
            reg::INTERRUPT_FLAG => {
                if value & int_flag::TIMER1 != 0 {
                    self.timer1.clear_interrupt_flag();
                }
            }
            reg::INTERRUPT_ENABLE => self.interrupt_enable = value,
            reg::PORT_A_NO_HANDSHAKE => {
                self.error_handler.report(EmuError::AssertViolation(
                    "port A without handshake not implemented".into(),
                ))?;
            }
            _ => unreachable!(),
        }
        Ok(())
    }
}
