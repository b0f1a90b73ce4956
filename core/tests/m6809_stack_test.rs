mod common;

use common::TestMachine;
use vectron_core::cpu::registers::CcFlag;

#[test]
fn test_pshs_a_b_x() {
    let mut m = TestMachine::new();
    m.cpu.reg.s = 0x03FF;
    m.cpu.reg.a = 0x11;
    m.cpu.reg.b = 0x22;
    m.cpu.reg.x = 0x3344;
    m.load(0x0000, &[0x34, 0x16]); // PSHS A,B,X

    let cycles = m.step();

    assert_eq!(m.read(0x03FE), 0x44);
    assert_eq!(m.read(0x03FD), 0x33);
    assert_eq!(m.read(0x03FC), 0x22);
    assert_eq!(m.read(0x03FB), 0x11);
    assert_eq!(m.cpu.reg.s, 0x03FB);
    assert_eq!(cycles, 9); // 5 base + 4 bytes
}

#[test]
fn test_pshs_puls_round_trip() {
    let mut m = TestMachine::new();
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.a = 0xAA;
    m.cpu.reg.b = 0xBB;
    m.cpu.reg.dp = 0xDD;
    m.cpu.reg.x = 0x1111;
    m.cpu.reg.y = 0x2222;
    m.cpu.reg.u = 0x3333;
    m.load(0x0000, &[0x34, 0x7F]); // PSHS CC,A,B,DP,X,Y,U
    m.load(0x0002, &[0x35, 0x7F]); // PULS CC,A,B,DP,X,Y,U

    m.step();
    assert_eq!(m.cpu.reg.s, 0x0400 - 11);

    // Scramble, then pull back
    m.cpu.reg.a = 0;
    m.cpu.reg.b = 0;
    m.cpu.reg.dp = 0;
    m.cpu.reg.x = 0;
    m.cpu.reg.y = 0;
    m.cpu.reg.u = 0;
    m.step();

    assert_eq!(m.cpu.reg.a, 0xAA);
    assert_eq!(m.cpu.reg.b, 0xBB);
    assert_eq!(m.cpu.reg.dp, 0xDD);
    assert_eq!(m.cpu.reg.x, 0x1111);
    assert_eq!(m.cpu.reg.y, 0x2222);
    assert_eq!(m.cpu.reg.u, 0x3333);
    assert_eq!(m.cpu.reg.s, 0x0400);
}

#[test]
fn test_puls_pc_acts_as_return() {
    let mut m = TestMachine::new();
    m.cpu.reg.s = 0x03FE;
    m.ram.borrow_mut().bytes[0x03FE] = 0x12;
    m.ram.borrow_mut().bytes[0x03FF] = 0x34;
    m.load(0x0000, &[0x35, 0x80]); // PULS PC

    m.step();

    assert_eq!(m.cpu.reg.pc, 0x1234);
    assert_eq!(m.cpu.reg.s, 0x0400);
}

#[test]
fn test_pshu_uses_user_stack_and_pushes_s() {
    let mut m = TestMachine::new();
    m.cpu.reg.u = 0x0500;
    m.cpu.reg.s = 0x1234;
    m.load(0x0000, &[0x36, 0x40]); // PSHU S

    m.step();

    assert_eq!(m.cpu.reg.u, 0x04FE);
    assert_eq!(m.read(0x04FE), 0x12);
    assert_eq!(m.read(0x04FF), 0x34);
    assert_eq!(m.cpu.reg.s, 0x1234); // S itself unchanged
}

#[test]
fn test_pulu() {
    let mut m = TestMachine::new();
    m.cpu.reg.u = 0x04FE;
    m.ram.borrow_mut().bytes[0x04FE] = 0x56;
    m.ram.borrow_mut().bytes[0x04FF] = 0x78;
    m.load(0x0000, &[0x37, 0x10]); // PULU X

    m.step();

    assert_eq!(m.cpu.reg.x, 0x5678);
    assert_eq!(m.cpu.reg.u, 0x0500);
}

#[test]
fn test_swi_stacks_everything_and_vectors() {
    let mut m = TestMachine::new();
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.a = 0x11;
    m.cpu.reg.pc = 0x0100;
    m.load(0x0100, &[0x3F]); // SWI
    m.load(0xFFFA, &[0xE0, 0x00]); // SWI vector

    let cycles = m.step();

    assert_eq!(m.cpu.reg.pc, 0xE000);
    assert!(m.cpu.reg.flag(CcFlag::E));
    assert!(m.cpu.reg.flag(CcFlag::I));
    assert!(m.cpu.reg.flag(CcFlag::F));
    assert_eq!(m.cpu.reg.s, 0x0400 - 12);
    assert_eq!(cycles, 19);
    // Return address on top of the frame
    assert_eq!(m.read(0x03FE), 0x01);
    assert_eq!(m.read(0x03FF), 0x01);
}

#[test]
fn test_swi_rti_round_trip() {
    let mut m = TestMachine::new();
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.a = 0x42;
    m.cpu.reg.x = 0x1234;
    m.cpu.reg.pc = 0x0100;
    m.load(0x0100, &[0x3F, 0x12]); // SWI, then NOP on return
    m.load(0xFFFA, &[0xE0, 0x00]);
    m.load(0xE000, &[0x3B]); // RTI

    m.step();
    // Scramble state inside the handler
    m.cpu.reg.a = 0;
    m.cpu.reg.x = 0;

    let cycles = m.step();

    assert_eq!(m.cpu.reg.pc, 0x0101);
    assert_eq!(m.cpu.reg.a, 0x42);
    assert_eq!(m.cpu.reg.x, 0x1234);
    assert_eq!(m.cpu.reg.s, 0x0400);
    assert_eq!(cycles, 15); // entire frame restored
}

#[test]
fn test_swi2_does_not_mask_interrupts() {
    let mut m = TestMachine::new();
    m.cpu.reg.s = 0x0400;
    m.cpu.reg.cc = 0x00;
    m.load(0x0000, &[0x10, 0x3F]); // SWI2
    m.load(0xFFF4, &[0xD0, 0x00]);

    m.step();

    assert_eq!(m.cpu.reg.pc, 0xD000);
    assert!(!m.cpu.reg.flag(CcFlag::I));
    assert!(!m.cpu.reg.flag(CcFlag::F));
}
