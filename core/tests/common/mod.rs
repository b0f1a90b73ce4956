#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use vectron_core::core::bus::{MemoryBus, MemoryBusDevice, MemoryRange};
use vectron_core::core::engine::{AudioContext, EmuEvents, Input, RenderContext};
use vectron_core::core::error::{EmuResult, ErrorHandler};
use vectron_core::core::Cycles;
use vectron_core::cpu::Cpu;
use vectron_core::debugger::Debugger;
use vectron_core::sync::Standalone;
use vectron_core::via::Via;

/// Flat RAM covering the whole address space, so CPU tests can place code
/// and vectors anywhere without the console's memory map.
pub struct FlatRam {
    pub bytes: Vec<u8>,
}

impl FlatRam {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; 0x10000],
        }
    }
}

impl MemoryBusDevice for FlatRam {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        Ok(self.bytes[address as usize])
    }

    fn write(&mut self, address: u16, value: u8) -> EmuResult<()> {
        self.bytes[address as usize] = value;
        Ok(())
    }
}

/// Bare CPU on a 64 KB RAM.
pub struct TestMachine {
    pub bus: Rc<MemoryBus>,
    pub cpu: Cpu,
    pub ram: Rc<RefCell<FlatRam>>,
}

impl TestMachine {
    pub fn new() -> Self {
        let bus = Rc::new(MemoryBus::new());
        let ram = Rc::new(RefCell::new(FlatRam::new()));
        bus.connect_device(ram.clone(), MemoryRange::new(0x0000, 0xFFFF));
        let cpu = Cpu::new(Rc::clone(&bus));
        Self { bus, cpu, ram }
    }

    pub fn load(&self, address: u16, data: &[u8]) {
        let start = address as usize;
        self.ram.borrow_mut().bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn read(&self, address: u16) -> u8 {
        self.ram.borrow().bytes[address as usize]
    }

    pub fn step(&mut self) -> Cycles {
        self.cpu
            .execute_instruction(false, false)
            .expect("instruction failed")
    }
}

/// CPU + VIA + debugger wired like the console, with flat RAM everywhere
/// else.
pub struct DebugMachine {
    pub bus: Rc<MemoryBus>,
    pub cpu: Rc<RefCell<Cpu>>,
    pub via: Rc<RefCell<Via>>,
    pub ram: Rc<RefCell<FlatRam>>,
    pub error_handler: Rc<ErrorHandler>,
    pub debugger: Debugger,
}

impl DebugMachine {
    pub fn new() -> Self {
        let error_handler = Rc::new(ErrorHandler::new());
        let bus = Rc::new(MemoryBus::new());
        let ram = Rc::new(RefCell::new(FlatRam::new()));
        bus.connect_device(ram.clone(), MemoryRange::new(0x0000, 0xCFFF));
        bus.connect_device(ram.clone(), MemoryRange::new(0xE000, 0xFFFF));
        let via = Rc::new(RefCell::new(Via::new(Rc::clone(&error_handler))));
        bus.connect_device(via.clone(), MemoryRange::new(0xD000, 0xDFFF));
        let cpu = Rc::new(RefCell::new(Cpu::new(Rc::clone(&bus))));
        let debugger = Debugger::new(
            Rc::clone(&bus),
            Rc::clone(&cpu),
            Rc::clone(&via),
            Rc::clone(&error_handler),
        );
        Self {
            bus,
            cpu,
            via,
            ram,
            error_handler,
            debugger,
        }
    }

    pub fn load(&self, address: u16, data: &[u8]) {
        let start = address as usize;
        self.ram.borrow_mut().bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn set_pc(&self, pc: u16) {
        self.cpu.borrow_mut().reg.pc = pc;
    }

    /// One standalone frame at 60 Hz.
    pub fn frame(&mut self) -> bool {
        let input = Input::new();
        let events = EmuEvents::new();
        let mut render = RenderContext::default();
        let mut audio = AudioContext::default();
        let mut sync = Standalone;
        self.debugger
            .frame_update(1.0 / 60.0, &input, &events, &mut render, &mut audio, &mut sync)
            .expect("frame failed")
    }

    /// One frame against a caller-provided sync protocol.
    pub fn frame_with_sync(&mut self, sync: &mut dyn vectron_core::sync::SyncProtocol) -> bool {
        let input = Input::new();
        let events = EmuEvents::new();
        let mut render = RenderContext::default();
        let mut audio = AudioContext::default();
        self.debugger
            .frame_update(1.0 / 60.0, &input, &events, &mut render, &mut audio, sync)
            .expect("frame failed")
    }
}
