mod ram;
mod rom;
mod unmapped;

pub use ram::Ram;
pub use rom::{BiosRom, Cartridge};
pub use unmapped::UnmappedDevice;
