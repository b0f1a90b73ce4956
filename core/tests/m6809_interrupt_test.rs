mod common;

use common::TestMachine;
use vectron_core::cpu::registers::CcFlag;

fn setup_vectors(m: &TestMachine) {
    m.load(0xFFF6, &[0xF0, 0x00]); // FIRQ
    m.load(0xFFF8, &[0xE0, 0x00]); // IRQ
    m.load(0xFFFC, &[0xD0, 0x00]); // NMI
    m.load(0xFFFE, &[0x01, 0x00]); // RESET
}

#[test]
fn test_reset_loads_vector_and_masks_interrupts() {
    let mut m = TestMachine::new();
    setup_vectors(&m);

    m.cpu.reset().unwrap();

    assert_eq!(m.cpu.reg.pc, 0x0100);
    assert!(m.cpu.reg.flag(CcFlag::I));
    assert!(m.cpu.reg.flag(CcFlag::F));
}

#[test]
fn test_masked_irq_is_ignored() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = CcFlag::I as u8;
    m.load(0x0000, &[0x12]); // NOP

    let cycles = m.cpu.execute_instruction(true, false).unwrap();

    assert_eq!(m.cpu.reg.pc, 0x0001);
    assert_eq!(cycles, 2);
}

#[test]
fn test_irq_stacks_entire_state() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = 0x00;
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.pc = 0x0123;

    let cycles = m.cpu.execute_instruction(true, false).unwrap();

    assert_eq!(m.cpu.reg.pc, 0xE000);
    assert!(m.cpu.reg.flag(CcFlag::I));
    assert!(!m.cpu.reg.flag(CcFlag::F));
    assert!(m.cpu.reg.flag(CcFlag::E));
    assert_eq!(m.cpu.reg.s, 0x0400 - 12);
    assert_eq!(cycles, 19);
    // Interrupted PC on top of the frame
    assert_eq!(m.read(0x03FE), 0x01);
    assert_eq!(m.read(0x03FF), 0x23);
}

#[test]
fn test_firq_stacks_minimal_state() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = 0x00;
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.pc = 0x0123;

    let cycles = m.cpu.execute_instruction(false, true).unwrap();

    assert_eq!(m.cpu.reg.pc, 0xF000);
    assert!(m.cpu.reg.flag(CcFlag::I));
    assert!(m.cpu.reg.flag(CcFlag::F));
    assert!(!m.cpu.reg.flag(CcFlag::E));
    assert_eq!(m.cpu.reg.s, 0x0400 - 3); // PC + CC only
    assert_eq!(cycles, 10);
}

#[test]
fn test_firq_has_priority_over_irq() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = 0x00;
    m.cpu.reg.s = 0x0400;

    m.cpu.execute_instruction(true, true).unwrap();

    assert_eq!(m.cpu.reg.pc, 0xF000);
}

#[test]
fn test_nmi_overrides_masks() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = CcFlag::I as u8 | CcFlag::F as u8;
    m.cpu.reg.s = 0x0400;
    m.cpu.signal_nmi();

    m.cpu.execute_instruction(false, false).unwrap();

    assert_eq!(m.cpu.reg.pc, 0xD000);
    assert_eq!(m.cpu.reg.s, 0x0400 - 12);
}

#[test]
fn test_sync_waits_until_interrupt_line() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = CcFlag::I as u8; // IRQ masked
    m.load(0x0000, &[0x13, 0x12]); // SYNC, NOP

    let cycles = m.cpu.execute_instruction(false, false).unwrap();
    assert_eq!(cycles, 2); // SYNC itself

    // Parked: no interrupt line, nothing happens
    let cycles = m.cpu.execute_instruction(false, false).unwrap();
    assert_eq!(cycles, 0);
    assert_eq!(m.cpu.reg.pc, 0x0001);

    // Masked interrupt line resumes execution without vectoring
    let cycles = m.cpu.execute_instruction(true, false).unwrap();
    assert_eq!(cycles, 2); // the NOP
    assert_eq!(m.cpu.reg.pc, 0x0002);
}

#[test]
fn test_cwai_waits_then_vectors() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = CcFlag::I as u8;
    m.cpu.reg.s = 0x0400;
    m.load(0x0000, &[0x3C, 0xEF]); // CWAI #$EF (clears I)

    let cycles = m.cpu.execute_instruction(false, false).unwrap();
    assert_eq!(cycles, 20);
    assert!(m.cpu.reg.flag(CcFlag::E));
    assert_eq!(m.cpu.reg.s, 0x0400 - 12); // frame already stacked

    // Parked with nothing pending
    let cycles = m.cpu.execute_instruction(false, false).unwrap();
    assert_eq!(cycles, 0);

    // IRQ arrives: vector without re-stacking
    let cycles = m.cpu.execute_instruction(true, false).unwrap();
    assert_eq!(m.cpu.reg.pc, 0xE000);
    assert_eq!(m.cpu.reg.s, 0x0400 - 12);
    assert!(cycles > 0 && cycles < 19);
}

#[test]
fn test_irq_return_with_rti() {
    let mut m = TestMachine::new();
    setup_vectors(&m);
    m.cpu.reg.cc = 0x00;
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.a = 0x5A;
    m.cpu.reg.pc = 0x0200;
    m.load(0x0200, &[0x12]); // NOP at the interrupted address
    m.load(0xE000, &[0x3B]); // IRQ handler: RTI

    m.cpu.execute_instruction(true, false).unwrap();
    m.cpu.reg.a = 0x00; // handler clobbers A
    m.cpu.execute_instruction(false, false).unwrap();

    assert_eq!(m.cpu.reg.pc, 0x0200);
    assert_eq!(m.cpu.reg.a, 0x5A);
    assert!(!m.cpu.reg.flag(CcFlag::I)); // restored pre-interrupt CC
}
