//! Fixed bus regions of the console. RAM and the VIA are small parts
//! mirrored across their whole windows.

use vectron_core::core::bus::MemoryRange;

pub const CARTRIDGE: MemoryRange = MemoryRange::new(0x0000, 0x7FFF);
pub const UNMAPPED: MemoryRange = MemoryRange::new(0x8000, 0xC7FF);
pub const RAM: MemoryRange = MemoryRange::new(0xC800, 0xCFFF);
pub const VIA: MemoryRange = MemoryRange::new(0xD000, 0xDFFF);
pub const BIOS: MemoryRange = MemoryRange::new(0xE000, 0xFFFF);
