use std::rc::Rc;

use crate::core::bus::MemoryBusDevice;
use crate::core::error::{AccessKind, EmuError, EmuResult, ErrorHandler};

/// Catch-all for address space with no hardware behind it. Every access is
/// routed through the error handler; reads come back zero when the policy
/// lets execution continue.
pub struct UnmappedDevice {
    error_handler: Rc<ErrorHandler>,
}

impl UnmappedDevice {
    pub fn new(error_handler: Rc<ErrorHandler>) -> Self {
        Self { error_handler }
    }
}

impl MemoryBusDevice for UnmappedDevice {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        self.error_handler.report(EmuError::InvalidMemoryAccess {
            kind: AccessKind::Read,
            address,
        })?;
        Ok(0)
    }

    fn write(&mut self, address: u16, _value: u8) -> EmuResult<()> {
        self.error_handler.report(EmuError::InvalidMemoryAccess {
            kind: AccessKind::Write,
            address,
        })
    }
}
