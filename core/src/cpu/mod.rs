mod alu;
mod indexed;
pub mod optable;
pub mod registers;
mod stack;

use std::rc::Rc;

use crate::core::bus::MemoryBus;
use crate::core::error::{EmuError, EmuResult};
use crate::core::Cycles;

use optable::{is_page1_prefix, is_page2_prefix, lookup_op, AddressingMode, CpuOp};
use registers::{CcFlag, CpuRegisters, RegisterId};

const VEC_SWI3: u16 = 0xFFF2;
const VEC_SWI2: u16 = 0xFFF4;
const VEC_FIRQ: u16 = 0xFFF6;
const VEC_IRQ: u16 = 0xFFF8;
const VEC_SWI: u16 = 0xFFFA;
const VEC_NMI: u16 = 0xFFFC;
const VEC_RESET: u16 = 0xFFFE;

// Entry overhead: twelve stacked bytes plus the vector fetch for IRQ/NMI,
// three bytes for FIRQ. Resuming from CWAI only fetches the vector.
const IRQ_CYCLES: Cycles = 19;
const FIRQ_CYCLES: Cycles = 10;
const CWAI_RESUME_CYCLES: Cycles = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum WaitMode {
    None,
    Cwai,
    Sync,
}

#[derive(Copy, Clone, Debug)]
enum Interrupt {
    Nmi,
    Firq,
    Irq,
}

pub struct Cpu {
    pub reg: CpuRegisters,
    bus: Rc<MemoryBus>,
    wait: WaitMode,
    nmi_pending: bool,
    extra_cycles: Cycles,
}

impl Cpu {
    pub fn new(bus: Rc<MemoryBus>) -> Self {
        Self {
            reg: CpuRegisters::default(),
            bus,
            wait: WaitMode::None,
            nmi_pending: false,
            extra_cycles: 0,
        }
    }

    pub fn registers(&self) -> &CpuRegisters {
        &self.reg
    }

    pub fn registers_mut(&mut self) -> &mut CpuRegisters {
        &mut self.reg
    }

    /// Latch a non-maskable interrupt for the next instruction boundary.
    pub fn signal_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Load PC from the reset vector with both interrupt masks set.
    pub fn reset(&mut self) -> EmuResult<()> {
        self.reg = CpuRegisters::default();
        self.reg.cc = CcFlag::I as u8 | CcFlag::F as u8;
        self.reg.pc = self.bus.read16(VEC_RESET)?;
        self.wait = WaitMode::None;
        self.nmi_pending = false;
        Ok(())
    }

    /// Execute one instruction (or service one interrupt) and return the
    /// cycles consumed. Returns 0 when parked in CWAI/SYNC with nothing
    /// pending, which callers treat as "idle".
    pub fn execute_instruction(&mut self, irq: bool, firq: bool) -> EmuResult<Cycles> {
        if self.nmi_pending {
            self.nmi_pending = false;
            return self.service_interrupt(Interrupt::Nmi);
        }
        if firq && !self.reg.flag(CcFlag::F) {
            return self.service_interrupt(Interrupt::Firq);
        }
        if irq && !self.reg.flag(CcFlag::I) {
            return self.service_interrupt(Interrupt::Irq);
        }

        match self.wait {
            WaitMode::Cwai => return Ok(0),
            WaitMode::Sync => {
                if !(irq || firq) {
                    return Ok(0);
                }
                // A masked interrupt line ends the wait without vectoring
                self.wait = WaitMode::None;
            }
            WaitMode::None => {}
        }

        self.extra_cycles = 0;
        let mut page = 0u8;
        let mut op_code = self.fetch8()?;
        if is_page1_prefix(op_code) {
            page = 1;
            op_code = self.fetch8()?;
        } else if is_page2_prefix(op_code) {
            page = 2;
            op_code = self.fetch8()?;
        }
        let op = lookup_op(page, op_code);
        self.execute_op(op)?;
        Ok(op.cycles as Cycles + self.extra_cycles)
    }

    fn service_interrupt(&mut self, interrupt: Interrupt) -> EmuResult<Cycles> {
        // CWAI already stacked the entire state
        let resuming = self.wait == WaitMode::Cwai;
        self.wait = WaitMode::None;
        match interrupt {
            Interrupt::Nmi | Interrupt::Irq => {
                if !resuming {
                    self.push_entire_state()?;
                }
                self.reg.set_flag(CcFlag::I, true);
                if matches!(interrupt, Interrupt::Nmi) {
                    self.reg.set_flag(CcFlag::F, true);
                }
                let vector = if matches!(interrupt, Interrupt::Nmi) {
                    VEC_NMI
                } else {
                    VEC_IRQ
                };
                self.reg.pc = self.bus.read16(vector)?;
                Ok(if resuming { CWAI_RESUME_CYCLES } else { IRQ_CYCLES })
            }
            Interrupt::Firq => {
                if !resuming {
                    self.reg.set_flag(CcFlag::E, false);
                    self.push_s16(self.reg.pc)?;
                    self.push_s8(self.reg.cc)?;
                }
                self.reg.set_flag(CcFlag::I, true);
                self.reg.set_flag(CcFlag::F, true);
                self.reg.pc = self.bus.read16(VEC_FIRQ)?;
                Ok(if resuming {
                    CWAI_RESUME_CYCLES
                } else {
                    FIRQ_CYCLES
                })
            }
        }
    }

    // --- Operand fetch and effective addresses ---

    fn fetch8(&mut self) -> EmuResult<u8> {
        let value = self.bus.read(self.reg.pc)?;
        self.reg.pc = self.reg.pc.wrapping_add(1);
        Ok(value)
    }

    fn fetch16(&mut self) -> EmuResult<u16> {
        let high = self.fetch8()?;
        let low = self.fetch8()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    fn direct_addr(&mut self) -> EmuResult<u16> {
        let low = self.fetch8()?;
        Ok(u16::from_be_bytes([self.reg.dp, low]))
    }

    fn indexed_addr(&mut self, op: &CpuOp) -> EmuResult<u16> {
        let resolved = indexed::resolve(&mut self.reg, &self.bus, op.page, op.op_code)?;
        if let Some((id, delta)) = resolved.side_effect {
            let value = self.reg.reg16(id).wrapping_add(delta as i16 as u16);
            self.reg.set_reg16(id, value);
        }
        self.extra_cycles += resolved.extra_cycles;
        Ok(resolved.address)
    }

    fn operand_addr(&mut self, op: &'static CpuOp) -> EmuResult<u16> {
        match op.addr_mode {
            AddressingMode::Direct => self.direct_addr(),
            AddressingMode::Extended => self.fetch16(),
            AddressingMode::Indexed => self.indexed_addr(op),
            _ => Err(invalid_op(op)),
        }
    }

    fn operand8(&mut self, op: &'static CpuOp) -> EmuResult<u8> {
        if op.addr_mode == AddressingMode::Immediate {
            self.fetch8()
        } else {
            let address = self.operand_addr(op)?;
            self.bus.read(address)
        }
    }

    fn operand16(&mut self, op: &'static CpuOp) -> EmuResult<u16> {
        if op.addr_mode == AddressingMode::Immediate {
            self.fetch16()
        } else {
            let address = self.operand_addr(op)?;
            self.bus.read16(address)
        }
    }

    fn branch_condition(&self, condition: u8) -> bool {
        let carry = self.reg.flag(CcFlag::C);
        let zero = self.reg.flag(CcFlag::Z);
        let overflow = self.reg.flag(CcFlag::V);
        let negative = self.reg.flag(CcFlag::N);
        match condition & 0x0F {
            0x0 => true,                           // BRA
            0x1 => false,                          // BRN
            0x2 => !carry && !zero,                // BHI
            0x3 => carry || zero,                  // BLS
            0x4 => !carry,                         // BCC
            0x5 => carry,                          // BCS
            0x6 => !zero,                          // BNE
            0x7 => zero,                           // BEQ
            0x8 => !overflow,                      // BVC
            0x9 => overflow,                       // BVS
            0xA => !negative,                      // BPL
            0xB => negative,                       // BMI
            0xC => negative == overflow,           // BGE
            0xD => negative != overflow,           // BLT
            0xE => !zero && negative == overflow,  // BGT
            _ => zero || negative != overflow,     // BLE
        }
    }

    fn exg_register(nibble: u8) -> Option<RegisterId> {
        match nibble {
            0x0 => Some(RegisterId::D),
            0x1 => Some(RegisterId::X),
            0x2 => Some(RegisterId::Y),
            0x3 => Some(RegisterId::U),
            0x4 => Some(RegisterId::S),
            0x5 => Some(RegisterId::Pc),
            0x8 => Some(RegisterId::A),
            0x9 => Some(RegisterId::B),
            0xA => Some(RegisterId::Cc),
            0xB => Some(RegisterId::Dp),
            _ => None,
        }
    }

    fn exg_tfr_pair(&mut self, op: &'static CpuOp) -> EmuResult<(RegisterId, RegisterId)> {
        let postbyte = self.fetch8()?;
        let src = Self::exg_register(postbyte >> 4).ok_or_else(|| invalid_op(op))?;
        let dst = Self::exg_register(postbyte & 0x0F).ok_or_else(|| invalid_op(op))?;
        if src.is_wide() != dst.is_wide() {
            return Err(invalid_op(op));
        }
        Ok((src, dst))
    }

    // --- Execution ---

    fn execute_op(&mut self, op: &'static CpuOp) -> EmuResult<()> {
        match (op.page, op.op_code) {
            // Loads
            (0, 0x86) | (0, 0x96) | (0, 0xA6) | (0, 0xB6) => {
                let value = self.operand8(op)?;
                self.reg.a = value;
                self.flags_nz8(value);
            }
            (0, 0xC6) | (0, 0xD6) | (0, 0xE6) | (0, 0xF6) => {
                let value = self.operand8(op)?;
                self.reg.b = value;
                self.flags_nz8(value);
            }
            (0, 0xCC) | (0, 0xDC) | (0, 0xEC) | (0, 0xFC) => {
                let value = self.operand16(op)?;
                self.reg.set_d(value);
                self.flags_nz16(value);
            }
            (0, 0x8E) | (0, 0x9E) | (0, 0xAE) | (0, 0xBE) => {
                let value = self.operand16(op)?;
                self.reg.x = value;
                self.flags_nz16(value);
            }
            (1, 0x8E) | (1, 0x9E) | (1, 0xAE) | (1, 0xBE) => {
                let value = self.operand16(op)?;
                self.reg.y = value;
                self.flags_nz16(value);
            }
            (0, 0xCE) | (0, 0xDE) | (0, 0xEE) | (0, 0xFE) => {
                let value = self.operand16(op)?;
                self.reg.u = value;
                self.flags_nz16(value);
            }
            (1, 0xCE) | (1, 0xDE) | (1, 0xEE) | (1, 0xFE) => {
                let value = self.operand16(op)?;
                self.reg.s = value;
                self.flags_nz16(value);
            }

            // Stores
            (0, 0x97) | (0, 0xA7) | (0, 0xB7) => {
                let address = self.operand_addr(op)?;
                self.bus.write(address, self.reg.a)?;
                self.flags_nz8(self.reg.a);
            }
            (0, 0xD7) | (0, 0xE7) | (0, 0xF7) => {
                let address = self.operand_addr(op)?;
                self.bus.write(address, self.reg.b)?;
                self.flags_nz8(self.reg.b);
            }
            (0, 0xDD) | (0, 0xED) | (0, 0xFD) => {
                let address = self.operand_addr(op)?;
                self.bus.write16(address, self.reg.d())?;
                self.flags_nz16(self.reg.d());
            }
            (0, 0x9F) | (0, 0xAF) | (0, 0xBF) => {
                let address = self.operand_addr(op)?;
                self.bus.write16(address, self.reg.x)?;
                self.flags_nz16(self.reg.x);
            }
            (1, 0x9F) | (1, 0xAF) | (1, 0xBF) => {
                let address = self.operand_addr(op)?;
                self.bus.write16(address, self.reg.y)?;
                self.flags_nz16(self.reg.y);
            }
            (0, 0xDF) | (0, 0xEF) | (0, 0xFF) => {
                let address = self.operand_addr(op)?;
                self.bus.write16(address, self.reg.u)?;
                self.flags_nz16(self.reg.u);
            }
            (1, 0xDF) | (1, 0xEF) | (1, 0xFF) => {
                let address = self.operand_addr(op)?;
                self.bus.write16(address, self.reg.s)?;
                self.flags_nz16(self.reg.s);
            }

            // 8-bit arithmetic on A
            (0, 0x80) | (0, 0x90) | (0, 0xA0) | (0, 0xB0) => {
                let value = self.operand8(op)?;
                self.reg.a = self.sub8(self.reg.a, value, false);
            }
            (0, 0x81) | (0, 0x91) | (0, 0xA1) | (0, 0xB1) => {
                let value = self.operand8(op)?;
                self.sub8(self.reg.a, value, false);
            }
            (0, 0x82) | (0, 0x92) | (0, 0xA2) | (0, 0xB2) => {
                let value = self.operand8(op)?;
                let borrow = self.reg.flag(CcFlag::C);
                self.reg.a = self.sub8(self.reg.a, value, borrow);
            }
            (0, 0x89) | (0, 0x99) | (0, 0xA9) | (0, 0xB9) => {
                let value = self.operand8(op)?;
                let carry = self.reg.flag(CcFlag::C);
                self.reg.a = self.add8(self.reg.a, value, carry);
            }
            (0, 0x8B) | (0, 0x9B) | (0, 0xAB) | (0, 0xBB) => {
                let value = self.operand8(op)?;
                self.reg.a = self.add8(self.reg.a, value, false);
            }
            (0, 0x84) | (0, 0x94) | (0, 0xA4) | (0, 0xB4) => {
                let value = self.operand8(op)?;
                self.reg.a &= value;
                self.flags_nz8(self.reg.a);
            }
            (0, 0x85) | (0, 0x95) | (0, 0xA5) | (0, 0xB5) => {
                let value = self.operand8(op)?;
                let result = self.reg.a & value;
                self.flags_nz8(result);
            }
            (0, 0x88) | (0, 0x98) | (0, 0xA8) | (0, 0xB8) => {
                let value = self.operand8(op)?;
                self.reg.a ^= value;
                self.flags_nz8(self.reg.a);
            }
            (0, 0x8A) | (0, 0x9A) | (0, 0xAA) | (0, 0xBA) => {
                let value = self.operand8(op)?;
                self.reg.a |= value;
                self.flags_nz8(self.reg.a);
            }

            // 8-bit arithmetic on B
            (0, 0xC0) | (0, 0xD0) | (0, 0xE0) | (0, 0xF0) => {
                let value = self.operand8(op)?;
                self.reg.b = self.sub8(self.reg.b, value, false);
            }
            (0, 0xC1) | (0, 0xD1) | (0, 0xE1) | (0, 0xF1) => {
                let value = self.operand8(op)?;
                self.sub8(self.reg.b, value, false);
            }
            (0, 0xC2) | (0, 0xD2) | (0, 0xE2) | (0, 0xF2) => {
                let value = self.operand8(op)?;
                let borrow = self.reg.flag(CcFlag::C);
                self.reg.b = self.sub8(self.reg.b, value, borrow);
            }
            (0, 0xC9) | (0, 0xD9) | (0, 0xE9) | (0, 0xF9) => {
                let value = self.operand8(op)?;
                let carry = self.reg.flag(CcFlag::C);
                self.reg.b = self.add8(self.reg.b, value, carry);
            }
            (0, 0xCB) | (0, 0xDB) | (0, 0xEB) | (0, 0xFB) => {
                let value = self.operand8(op)?;
                self.reg.b = self.add8(self.reg.b, value, false);
            }
            (0, 0xC4) | (0, 0xD4) | (0, 0xE4) | (0, 0xF4) => {
                let value = self.operand8(op)?;
                self.reg.b &= value;
                self.flags_nz8(self.reg.b);
            }
            (0, 0xC5) | (0, 0xD5) | (0, 0xE5) | (0, 0xF5) => {
                let value = self.operand8(op)?;
                let result = self.reg.b & value;
                self.flags_nz8(result);
            }
            (0, 0xC8) | (0, 0xD8) | (0, 0xE8) | (0, 0xF8) => {
                let value = self.operand8(op)?;
                self.reg.b ^= value;
                self.flags_nz8(self.reg.b);
            }
            (0, 0xCA) | (0, 0xDA) | (0, 0xEA) | (0, 0xFA) => {
                let value = self.operand8(op)?;
                self.reg.b |= value;
                self.flags_nz8(self.reg.b);
            }

            // 16-bit arithmetic and compares
            (0, 0x83) | (0, 0x93) | (0, 0xA3) | (0, 0xB3) => {
                let value = self.operand16(op)?;
                let result = self.sub16(self.reg.d(), value);
                self.reg.set_d(result);
            }
            (0, 0xC3) | (0, 0xD3) | (0, 0xE3) | (0, 0xF3) => {
                let value = self.operand16(op)?;
                let result = self.add16(self.reg.d(), value);
                self.reg.set_d(result);
            }
            (0, 0x8C) | (0, 0x9C) | (0, 0xAC) | (0, 0xBC) => {
                let value = self.operand16(op)?;
                self.sub16(self.reg.x, value);
            }
            (1, 0x83) | (1, 0x93) | (1, 0xA3) | (1, 0xB3) => {
                let value = self.operand16(op)?;
                self.sub16(self.reg.d(), value);
            }
            (1, 0x8C) | (1, 0x9C) | (1, 0xAC) | (1, 0xBC) => {
                let value = self.operand16(op)?;
                self.sub16(self.reg.y, value);
            }
            (2, 0x83) | (2, 0x93) | (2, 0xA3) | (2, 0xB3) => {
                let value = self.operand16(op)?;
                self.sub16(self.reg.u, value);
            }
            (2, 0x8C) | (2, 0x9C) | (2, 0xAC) | (2, 0xBC) => {
                let value = self.operand16(op)?;
                self.sub16(self.reg.s, value);
            }

            // Inherent unary on A
            (0, 0x40) => self.reg.a = self.neg8(self.reg.a),
            (0, 0x43) => self.reg.a = self.com8(self.reg.a),
            (0, 0x44) => self.reg.a = self.lsr8(self.reg.a),
            (0, 0x46) => self.reg.a = self.ror8(self.reg.a),
            (0, 0x47) => self.reg.a = self.asr8(self.reg.a),
            (0, 0x48) => self.reg.a = self.asl8(self.reg.a),
            (0, 0x49) => self.reg.a = self.rol8(self.reg.a),
            (0, 0x4A) => self.reg.a = self.dec8(self.reg.a),
            (0, 0x4C) => self.reg.a = self.inc8(self.reg.a),
            (0, 0x4D) => self.tst8(self.reg.a),
            (0, 0x4F) => {
                self.reg.a = 0;
                self.reg.set_flag(CcFlag::N, false);
                self.reg.set_flag(CcFlag::Z, true);
                self.reg.set_flag(CcFlag::V, false);
                self.reg.set_flag(CcFlag::C, false);
            }

            // Inherent unary on B
            (0, 0x50) => self.reg.b = self.neg8(self.reg.b),
            (0, 0x53) => self.reg.b = self.com8(self.reg.b),
            (0, 0x54) => self.reg.b = self.lsr8(self.reg.b),
            (0, 0x56) => self.reg.b = self.ror8(self.reg.b),
            (0, 0x57) => self.reg.b = self.asr8(self.reg.b),
            (0, 0x58) => self.reg.b = self.asl8(self.reg.b),
            (0, 0x59) => self.reg.b = self.rol8(self.reg.b),
            (0, 0x5A) => self.reg.b = self.dec8(self.reg.b),
            (0, 0x5C) => self.reg.b = self.inc8(self.reg.b),
            (0, 0x5D) => self.tst8(self.reg.b),
            (0, 0x5F) => {
                self.reg.b = 0;
                self.reg.set_flag(CcFlag::N, false);
                self.reg.set_flag(CcFlag::Z, true);
                self.reg.set_flag(CcFlag::V, false);
                self.reg.set_flag(CcFlag::C, false);
            }

            // Read-modify-write on memory
            (0, 0x00) | (0, 0x60) | (0, 0x70) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.neg8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x03) | (0, 0x63) | (0, 0x73) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.com8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x04) | (0, 0x64) | (0, 0x74) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.lsr8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x06) | (0, 0x66) | (0, 0x76) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.ror8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x07) | (0, 0x67) | (0, 0x77) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.asr8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x08) | (0, 0x68) | (0, 0x78) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.asl8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x09) | (0, 0x69) | (0, 0x79) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.rol8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x0A) | (0, 0x6A) | (0, 0x7A) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.dec8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x0C) | (0, 0x6C) | (0, 0x7C) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                let result = self.inc8(value);
                self.bus.write(address, result)?;
            }
            (0, 0x0D) | (0, 0x6D) | (0, 0x7D) => {
                let address = self.operand_addr(op)?;
                let value = self.bus.read(address)?;
                self.tst8(value);
            }
            (0, 0x0F) | (0, 0x6F) | (0, 0x7F) => {
                let address = self.operand_addr(op)?;
                self.bus.read(address)?; // hardware performs a dummy read
                self.bus.write(address, 0)?;
                self.reg.set_flag(CcFlag::N, false);
                self.reg.set_flag(CcFlag::Z, true);
                self.reg.set_flag(CcFlag::V, false);
                self.reg.set_flag(CcFlag::C, false);
            }

            // Jumps and subroutines
            (0, 0x0E) | (0, 0x6E) | (0, 0x7E) => {
                self.reg.pc = self.operand_addr(op)?;
            }
            (0, 0x9D) | (0, 0xAD) | (0, 0xBD) => {
                let address = self.operand_addr(op)?;
                self.push_s16(self.reg.pc)?;
                self.reg.pc = address;
            }
            (0, 0x8D) => {
                let offset = self.fetch8()? as i8;
                self.push_s16(self.reg.pc)?;
                self.reg.pc = self.reg.pc.wrapping_add(offset as i16 as u16);
            }
            (0, 0x17) => {
                let offset = self.fetch16()?;
                self.push_s16(self.reg.pc)?;
                self.reg.pc = self.reg.pc.wrapping_add(offset);
            }
            (0, 0x39) => {
                self.reg.pc = self.pull_s16()?;
            }

            // Branches
            (0, 0x16) => {
                let offset = self.fetch16()?;
                self.reg.pc = self.reg.pc.wrapping_add(offset);
            }
            (0, 0x20..=0x2F) => {
                let offset = self.fetch8()? as i8;
                if self.branch_condition(op.op_code) {
                    self.reg.pc = self.reg.pc.wrapping_add(offset as i16 as u16);
                }
            }
            (1, 0x21..=0x2F) => {
                let offset = self.fetch16()?;
                if self.branch_condition(op.op_code) {
                    self.reg.pc = self.reg.pc.wrapping_add(offset);
                    self.extra_cycles += 1;
                }
            }

            // Load effective address
            (0, 0x30) => {
                let address = self.indexed_addr(op)?;
                self.reg.x = address;
                self.reg.set_flag(CcFlag::Z, address == 0);
            }
            (0, 0x31) => {
                let address = self.indexed_addr(op)?;
                self.reg.y = address;
                self.reg.set_flag(CcFlag::Z, address == 0);
            }
            (0, 0x32) => {
                self.reg.s = self.indexed_addr(op)?;
            }
            (0, 0x33) => {
                self.reg.u = self.indexed_addr(op)?;
            }

            // Stack register lists
            (0, 0x34) => {
                let mask = self.fetch8()?;
                self.op_pshs(mask)?;
            }
            (0, 0x35) => {
                let mask = self.fetch8()?;
                self.op_puls(mask)?;
            }
            (0, 0x36) => {
                let mask = self.fetch8()?;
                self.op_pshu(mask)?;
            }
            (0, 0x37) => {
                let mask = self.fetch8()?;
                self.op_pulu(mask)?;
            }

            // Register transfers
            (0, 0x1E) => {
                let (src, dst) = self.exg_tfr_pair(op)?;
                let src_value = self.reg.reg16(src);
                let dst_value = self.reg.reg16(dst);
                self.reg.set_reg16(dst, src_value);
                self.reg.set_reg16(src, dst_value);
            }
            (0, 0x1F) => {
                let (src, dst) = self.exg_tfr_pair(op)?;
                let value = self.reg.reg16(src);
                self.reg.set_reg16(dst, value);
            }

            // Condition-code immediates
            (0, 0x1A) => {
                let value = self.fetch8()?;
                self.reg.cc |= value;
            }
            (0, 0x1C) => {
                let value = self.fetch8()?;
                self.reg.cc &= value;
            }

            // Misc inherent
            (0, 0x12) => {}
            (0, 0x13) => {
                self.wait = WaitMode::Sync;
            }
            (0, 0x19) => self.op_daa(),
            (0, 0x1D) => self.op_sex(),
            (0, 0x3A) => {
                self.reg.x = self.reg.x.wrapping_add(self.reg.b as u16);
            }
            (0, 0x3D) => self.op_mul(),

            // Interrupt-related
            (0, 0x3B) => self.op_rti()?,
            (0, 0x3C) => {
                let value = self.fetch8()?;
                self.reg.cc &= value;
                self.push_entire_state()?;
                self.wait = WaitMode::Cwai;
            }
            (0, 0x3F) => {
                self.push_entire_state()?;
                self.reg.set_flag(CcFlag::I, true);
                self.reg.set_flag(CcFlag::F, true);
                self.reg.pc = self.bus.read16(VEC_SWI)?;
            }
            (1, 0x3F) => {
                self.push_entire_state()?;
                self.reg.pc = self.bus.read16(VEC_SWI2)?;
            }
            (2, 0x3F) => {
                self.push_entire_state()?;
                self.reg.pc = self.bus.read16(VEC_SWI3)?;
            }

            _ => return Err(invalid_op(op)),
        }
        Ok(())
    }
}

fn invalid_op(op: &CpuOp) -> EmuError {
    EmuError::InvalidOpcode {
        page: op.page,
        op_code: op.op_code,
    }
}
