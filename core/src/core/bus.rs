use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::error::{AccessKind, EmuError, EmuResult};

/// Inclusive 16-bit address range served by one device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRange {
    pub start: u16,
    pub end: u16,
}

impl MemoryRange {
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, address: u16) -> bool {
        address >= self.start && address <= self.end
    }
}

/// A bus endpoint. Devices receive the absolute address and apply their own
/// mirroring mask.
pub trait MemoryBusDevice {
    fn read(&mut self, address: u16) -> EmuResult<u8>;
    fn write(&mut self, address: u16, value: u8) -> EmuResult<()>;
}

/// Observer invoked after a bus access with the address and the value that
/// was actually read or written.
pub type AccessCallback = Box<dyn Fn(u16, u8)>;

struct MappedDevice {
    range: MemoryRange,
    device: Rc<RefCell<dyn MemoryBusDevice>>,
}

/// Routes 16-bit addresses to connected devices and notifies registered
/// read/write observers.
///
/// Observers can be disabled as a group; the debugger does this around its
/// own instruction decode so the lookahead reads never show up in a trace.
pub struct MemoryBus {
    devices: RefCell<Vec<MappedDevice>>,
    on_read: RefCell<Option<AccessCallback>>,
    on_write: RefCell<Option<AccessCallback>>,
    callbacks_enabled: Cell<bool>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self {
            devices: RefCell::new(Vec::new()),
            on_read: RefCell::new(None),
            on_write: RefCell::new(None),
            callbacks_enabled: Cell::new(true),
        }
    }

    /// Connect `device` to serve `range`. Each address belongs to at most one
    /// device; the table is kept sorted by start address for lookup.
    pub fn connect_device(&self, device: Rc<RefCell<dyn MemoryBusDevice>>, range: MemoryRange) {
        let mut devices = self.devices.borrow_mut();
        debug_assert!(
            devices
                .iter()
                .all(|mapped| range.end < mapped.range.start || range.start > mapped.range.end),
            "overlapping device ranges"
        );
        devices.push(MappedDevice { range, device });
        devices.sort_by_key(|mapped| mapped.range.start);
    }

    pub fn register_callbacks(&self, on_read: AccessCallback, on_write: AccessCallback) {
        *self.on_read.borrow_mut() = Some(on_read);
        *self.on_write.borrow_mut() = Some(on_write);
    }

    pub fn set_callbacks_enabled(&self, enabled: bool) {
        self.callbacks_enabled.set(enabled);
    }

    pub fn read(&self, address: u16) -> EmuResult<u8> {
        let device = self.find(address, AccessKind::Read)?;
        let value = device.borrow_mut().read(address)?;
        if self.callbacks_enabled.get() {
            if let Some(on_read) = &*self.on_read.borrow() {
                on_read(address, value);
            }
        }
        Ok(value)
    }

    pub fn write(&self, address: u16, value: u8) -> EmuResult<()> {
        let device = self.find(address, AccessKind::Write)?;
        device.borrow_mut().write(address, value)?;
        if self.callbacks_enabled.get() {
            if let Some(on_write) = &*self.on_write.borrow() {
                on_write(address, value);
            }
        }
        Ok(())
    }

    /// All multi-byte values on this bus are big-endian.
    pub fn read16(&self, address: u16) -> EmuResult<u16> {
        let high = self.read(address)?;
        let low = self.read(address.wrapping_add(1))?;
        Ok(u16::from_be_bytes([high, low]))
    }

    pub fn write16(&self, address: u16, value: u16) -> EmuResult<()> {
        let bytes = value.to_be_bytes();
        self.write(address, bytes[0])?;
        self.write(address.wrapping_add(1), bytes[1])
    }

    fn find(&self, address: u16, kind: AccessKind) -> EmuResult<Rc<RefCell<dyn MemoryBusDevice>>> {
        let devices = self.devices.borrow();
        let index = devices.partition_point(|mapped| mapped.range.start <= address);
        if index > 0 && devices[index - 1].range.contains(address) {
            return Ok(Rc::clone(&devices[index - 1].device));
        }
        Err(EmuError::InvalidMemoryAccess { kind, address })
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}
