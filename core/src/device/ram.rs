use crate::core::bus::MemoryBusDevice;
use crate::core::error::EmuResult;

/// 1 KB of system RAM, mirrored across its bus window.
pub struct Ram {
    bytes: [u8; Ram::SIZE],
}

impl Ram {
    pub const SIZE: usize = 0x400;

    pub fn new() -> Self {
        Self {
            bytes: [0; Self::SIZE],
        }
    }

    /// Power-on contents are random on real hardware, and some games seed
    /// themselves from it.
    pub fn randomize(&mut self, mut next: impl FnMut() -> u8) {
        for byte in &mut self.bytes {
            *byte = next();
        }
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBusDevice for Ram {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        Ok(self.bytes[address as usize % Self::SIZE])
    }

    fn write(&mut self, address: u16, value: u8) -> EmuResult<()> {
        self.bytes[address as usize % Self::SIZE] = value;
        Ok(())
    }
}
