use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vectron_core::core::bus::MemoryBus;
use vectron_core::core::engine::{
    AudioContext, EmuEvents, EngineClient, Input, RenderContext,
};
use vectron_core::core::error::{EmuResult, ErrorHandler};
use vectron_core::cpu::Cpu;
use vectron_core::debugger::Debugger;
use vectron_core::device::{BiosRom, Cartridge, Ram, UnmappedDevice};
use vectron_core::sync::SyncProtocol;
use vectron_core::via::Via;

use crate::memory_map;

/// The assembled console: bus, CPU, VIA, memory devices and debugger.
pub struct Console {
    bus: Rc<MemoryBus>,
    cpu: Rc<RefCell<Cpu>>,
    via: Rc<RefCell<Via>>,
    ram: Rc<RefCell<Ram>>,
    bios: Rc<RefCell<BiosRom>>,
    cartridge: Rc<RefCell<Cartridge>>,
    debugger: Debugger,
    error_handler: Rc<ErrorHandler>,
}

impl Console {
    pub fn new() -> Self {
        let error_handler = Rc::new(ErrorHandler::new());
        let bus = Rc::new(MemoryBus::new());
        let cpu = Rc::new(RefCell::new(Cpu::new(Rc::clone(&bus))));
        let via = Rc::new(RefCell::new(Via::new(Rc::clone(&error_handler))));
        let ram = Rc::new(RefCell::new(Ram::new()));
        let bios = Rc::new(RefCell::new(BiosRom::new(Rc::clone(&error_handler))));
        let cartridge = Rc::new(RefCell::new(Cartridge::new(Rc::clone(&error_handler))));
        let unmapped = Rc::new(RefCell::new(UnmappedDevice::new(Rc::clone(&error_handler))));

        bus.connect_device(cartridge.clone(), memory_map::CARTRIDGE);
        bus.connect_device(unmapped, memory_map::UNMAPPED);
        bus.connect_device(ram.clone(), memory_map::RAM);
        bus.connect_device(via.clone(), memory_map::VIA);
        bus.connect_device(bios.clone(), memory_map::BIOS);

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
            bios,
            cartridge,
            debugger,
            error_handler,
        }
    }

    pub fn load_bios(&self, data: &[u8]) -> EmuResult<()> {
        self.bios.borrow_mut().load(data)
    }

    pub fn load_cartridge(&self, data: &[u8]) -> EmuResult<()> {
        self.cartridge.borrow_mut().load(data)
    }

    /// Some games depend on the random power-on contents of RAM. The same
    /// seed reproduces the same machine, which lockstep runs rely on.
    pub fn randomize_ram(&self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.ram.borrow_mut().randomize(|| rng.gen());
    }

    pub fn reset(&mut self) -> EmuResult<()> {
        self.via.borrow_mut().reset();
        self.debugger.reset();
        self.cpu.borrow_mut().reset()
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    pub fn cpu(&self) -> Rc<RefCell<Cpu>> {
        Rc::clone(&self.cpu)
    }

    pub fn via(&self) -> Rc<RefCell<Via>> {
        Rc::clone(&self.via)
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    pub fn error_handler(&self) -> &ErrorHandler {
        &self.error_handler
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineClient for Console {
    /// The first argument, when present, is a cartridge ROM path.
    fn init(&mut self, args: &[String]) -> EmuResult<()> {
        if let Some(path) = args.first() {
            let rom = std::fs::read(path)?;
            log::info!("loaded {} byte cartridge from {path}", rom.len());
            self.load_cartridge(&rom)?;
        }
        Ok(())
    }

    fn frame_update(
        &mut self,
        frame_time: f64,
        input: &Input,
        events: &EmuEvents,
        render: &mut RenderContext,
        audio: &mut AudioContext,
        sync: &mut dyn SyncProtocol,
    ) -> EmuResult<bool> {
        self.debugger
            .frame_update(frame_time, input, events, render, audio, sync)
    }

    fn shutdown(&mut self) {}
}
