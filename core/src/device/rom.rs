use std::rc::Rc;

use crate::core::bus::MemoryBusDevice;
use crate::core::error::{EmuError, EmuResult, ErrorHandler};

/// 8 KB system ROM.
pub struct BiosRom {
    bytes: Box<[u8; BiosRom::SIZE]>,
    error_handler: Rc<ErrorHandler>,
}

impl BiosRom {
    pub const SIZE: usize = 0x2000;

    pub fn new(error_handler: Rc<ErrorHandler>) -> Self {
        Self {
            bytes: Box::new([0; Self::SIZE]),
            error_handler,
        }
    }

    pub fn load(&mut self, data: &[u8]) -> EmuResult<()> {
        if data.len() > Self::SIZE {
            return Err(EmuError::AssertViolation(format!(
                "BIOS image of {} bytes exceeds {} byte ROM",
                data.len(),
                Self::SIZE
            )));
        }
        self.bytes[..data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl MemoryBusDevice for BiosRom {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        Ok(self.bytes[address as usize % Self::SIZE])
    }

    fn write(&mut self, address: u16, _value: u8) -> EmuResult<()> {
        self.error_handler.report(EmuError::AssertViolation(format!(
            "write to BIOS ROM at ${address:04x}"
        )))
    }
}

/// 32 KB cartridge window. Unloaded space reads back zero.
pub struct Cartridge {
    bytes: Box<[u8; Cartridge::SIZE]>,
    error_handler: Rc<ErrorHandler>,
}

impl Cartridge {
    pub const SIZE: usize = 0x8000;

    pub fn new(error_handler: Rc<ErrorHandler>) -> Self {
        Self {
            bytes: Box::new([0; Self::SIZE]),
            error_handler,
        }
    }

    pub fn load(&mut self, data: &[u8]) -> EmuResult<()> {
        if data.len() > Self::SIZE {
            return Err(EmuError::AssertViolation(format!(
                "cartridge image of {} bytes exceeds {} byte window",
                data.len(),
                Self::SIZE
            )));
        }
        self.bytes.fill(0);
        self.bytes[..data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl MemoryBusDevice for Cartridge {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        Ok(self.bytes[address as usize % Self::SIZE])
    }

    fn write(&mut self, address: u16, _value: u8) -> EmuResult<()> {
        self.error_handler.report(EmuError::AssertViolation(format!(
            "write to cartridge ROM at ${address:04x}"
        )))
    }
}
