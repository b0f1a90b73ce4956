use std::cell::RefCell;
use std::rc::Rc;

use vectron_core::core::bus::{MemoryBus, MemoryBusDevice, MemoryRange};
use vectron_core::core::error::{EmuError, EmuResult, ErrorHandler, ErrorPolicy};
use vectron_core::device::{Ram, UnmappedDevice};

/// Device that records the addresses it was asked for.
struct Probe {
    tag: u8,
    accesses: Vec<u16>,
}

impl Probe {
    fn new(tag: u8) -> Self {
        Self {
            tag,
            accesses: Vec::new(),
        }
    }
}

impl MemoryBusDevice for Probe {
    fn read(&mut self, address: u16) -> EmuResult<u8> {
        self.accesses.push(address);
        Ok(self.tag)
    }

    fn write(&mut self, address: u16, _value: u8) -> EmuResult<()> {
        self.accesses.push(address);
        Ok(())
    }
}

#[test]
fn test_reads_route_by_range() {
    let bus = MemoryBus::new();
    let low = Rc::new(RefCell::new(Probe::new(1)));
    let high = Rc::new(RefCell::new(Probe::new(2)));
    bus.connect_device(low.clone(), MemoryRange::new(0x0000, 0x7FFF));
    bus.connect_device(high.clone(), MemoryRange::new(0x8000, 0xFFFF));

    assert_eq!(bus.read(0x0000).unwrap(), 1);
    assert_eq!(bus.read(0x7FFF).unwrap(), 1);
    assert_eq!(bus.read(0x8000).unwrap(), 2);
    assert_eq!(bus.read(0xFFFF).unwrap(), 2);
    assert_eq!(low.borrow().accesses, vec![0x0000, 0x7FFF]);
    assert_eq!(high.borrow().accesses, vec![0x8000, 0xFFFF]);
}

#[test]
fn test_unconnected_address_is_an_error() {
    let bus = MemoryBus::new();
    let device = Rc::new(RefCell::new(Probe::new(1)));
    bus.connect_device(device, MemoryRange::new(0x1000, 0x1FFF));

    assert!(matches!(
        bus.read(0x0FFF),
        Err(EmuError::InvalidMemoryAccess { .. })
    ));
    assert!(matches!(
        bus.write(0x2000, 0),
        Err(EmuError::InvalidMemoryAccess { .. })
    ));
}

#[test]
fn test_read16_is_big_endian() {
    let bus = MemoryBus::new();
    let ram = Rc::new(RefCell::new(Ram::new()));
    bus.connect_device(ram, MemoryRange::new(0x0000, 0x03FF));

    bus.write(0x0010, 0x12).unwrap();
    bus.write(0x0011, 0x34).unwrap();
    assert_eq!(bus.read16(0x0010).unwrap(), 0x1234);

    bus.write16(0x0020, 0xBEEF).unwrap();
    assert_eq!(bus.read(0x0020).unwrap(), 0xBE);
    assert_eq!(bus.read(0x0021).unwrap(), 0xEF);
}

#[test]
fn test_observers_fire_after_access_with_actual_value() {
    let bus = MemoryBus::new();
    let ram = Rc::new(RefCell::new(Ram::new()));
    bus.connect_device(ram, MemoryRange::new(0x0000, 0x03FF));

    let reads: Rc<RefCell<Vec<(u16, u8)>>> = Rc::new(RefCell::new(Vec::new()));
    let writes: Rc<RefCell<Vec<(u16, u8)>>> = Rc::new(RefCell::new(Vec::new()));
    let reads_cb = Rc::clone(&reads);
    let writes_cb = Rc::clone(&writes);
    bus.register_callbacks(
        Box::new(move |address, value| reads_cb.borrow_mut().push((address, value))),
        Box::new(move |address, value| writes_cb.borrow_mut().push((address, value))),
    );

    bus.write(0x0040, 0x7E).unwrap();
    assert_eq!(*writes.borrow(), vec![(0x0040, 0x7E)]);

    let value = bus.read(0x0040).unwrap();
    assert_eq!(value, 0x7E);
    assert_eq!(*reads.borrow(), vec![(0x0040, 0x7E)]);
}

#[test]
fn test_disabled_observers_stay_silent() {
    let bus = MemoryBus::new();
    let ram = Rc::new(RefCell::new(Ram::new()));
    bus.connect_device(ram, MemoryRange::new(0x0000, 0x03FF));

    let count = Rc::new(RefCell::new(0u32));
    let read_count = Rc::clone(&count);
    let write_count = Rc::clone(&count);
    bus.register_callbacks(
        Box::new(move |_, _| *read_count.borrow_mut() += 1),
        Box::new(move |_, _| *write_count.borrow_mut() += 1),
    );

    bus.set_callbacks_enabled(false);
    bus.write(0x0000, 1).unwrap();
    bus.read(0x0000).unwrap();
    assert_eq!(*count.borrow(), 0);

    bus.set_callbacks_enabled(true);
    bus.read(0x0000).unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_unmapped_device_follows_error_policy() {
    let handler = Rc::new(ErrorHandler::new());
    let bus = MemoryBus::new();
    let unmapped = Rc::new(RefCell::new(UnmappedDevice::new(Rc::clone(&handler))));
    bus.connect_device(unmapped, MemoryRange::new(0x8000, 0xBFFF));

    handler.set_policy(ErrorPolicy::Ignore);
    assert_eq!(bus.read(0x9000).unwrap(), 0);
    assert!(bus.write(0x9000, 1).is_ok());

    handler.set_policy(ErrorPolicy::Fail);
    assert!(bus.read(0x9000).is_err());
    assert!(bus.write(0x9000, 1).is_err());
}

#[test]
fn test_ram_mirrors_through_its_window() {
    let bus = MemoryBus::new();
    let ram = Rc::new(RefCell::new(Ram::new()));
    bus.connect_device(ram, MemoryRange::new(0xC800, 0xCFFF));

    bus.write(0xC800, 0x42).unwrap();
    assert_eq!(bus.read(0xCC00).unwrap(), 0x42); // 1 KB mirror
}
