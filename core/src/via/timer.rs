/// One VIA interval timer.
///
/// Writing the counter-high register transfers the latch into the counter,
/// clears the interrupt flag and starts the countdown. The counter
/// decrements once per clock; the flag rises on the decrement past zero, so
/// a counter loaded with N fires exactly N+1 cycles after the write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerMode {
    OneShot,
    FreeRunning,
    PulseCounting,
}

pub struct Timer {
    latch: u16,
    counter: u16,
    mode: TimerMode,
    pb7_flag: bool,
    pb7_signal_low: bool,
    interrupt_flag: bool,
    fired: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            latch: 0,
            counter: 0,
            mode: TimerMode::OneShot,
            pb7_flag: false,
            pb7_signal_low: false,
            interrupt_flag: false,
            fired: true, // nothing running until the counter is written
        }
    }

    pub fn tick(&mut self) {
        if self.mode == TimerMode::PulseCounting {
            // Counts PB6 pulses from the sound chip, which is not wired up
            return;
        }
        let (next, underflow) = self.counter.overflowing_sub(1);
        self.counter = next;
        if underflow {
            match self.mode {
                TimerMode::OneShot => {
                    if !self.fired {
                        self.fired = true;
                        self.interrupt_flag = true;
                        self.pb7_signal_low = false;
                    }
                }
                TimerMode::FreeRunning => {
                    self.counter = self.latch;
                    self.interrupt_flag = true;
                    self.pb7_signal_low = !self.pb7_signal_low;
                }
                TimerMode::PulseCounting => {}
            }
        }
    }

    pub fn read_counter_low(&self) -> u8 {
        self.counter as u8
    }

    pub fn read_counter_high(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    pub fn read_latch_low(&self) -> u8 {
        self.latch as u8
    }

    pub fn read_latch_high(&self) -> u8 {
        (self.latch >> 8) as u8
    }

    /// Counter-low writes only stage the value in the latch.
    pub fn write_counter_low(&mut self, value: u8) {
        self.latch = (self.latch & 0xFF00) | value as u16;
    }

    /// Counter-high writes arm the timer: latch transfers to the counter,
    /// the interrupt flag clears, and PB7 goes low while the timer runs.
    pub fn write_counter_high(&mut self, value: u8) {
        self.latch = (self.latch & 0x00FF) | ((value as u16) << 8);
        self.counter = self.latch;
        self.interrupt_flag = false;
        self.fired = false;
        if self.pb7_flag {
            self.pb7_signal_low = true;
        }
    }

    pub fn write_latch_low(&mut self, value: u8) {
        self.latch = (self.latch & 0xFF00) | value as u16;
    }

    pub fn write_latch_high(&mut self, value: u8) {
        self.latch = (self.latch & 0x00FF) | ((value as u16) << 8);
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
    }

    pub fn pb7_flag(&self) -> bool {
        self.pb7_flag
    }

    pub fn set_pb7_flag(&mut self, enabled: bool) {
        self.pb7_flag = enabled;
    }

    pub fn pb7_signal_low(&self) -> bool {
        self.pb7_signal_low
    }

    pub fn interrupt_flag(&self) -> bool {
        self.interrupt_flag
    }

    pub fn clear_interrupt_flag(&mut self) {
        self.interrupt_flag = false;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
