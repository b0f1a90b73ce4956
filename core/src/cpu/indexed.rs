//! Indexed-addressing postbyte decode.
//!
//! Bit 7 clear selects a 5-bit signed offset from the register in bits 6:5.
//! Bit 7 set selects one of sixteen variants by the low nibble, with bit 4
//! requesting indirection where the variant allows it. The auto-increment
//! and -decrement side effects are returned explicitly so the caller decides
//! when to apply them.

use crate::core::bus::MemoryBus;
use crate::core::error::{EmuError, EmuResult};
use crate::core::Cycles;
use crate::cpu::registers::{CpuRegisters, RegisterId};

/// A resolved indexed operand: the effective address, the register mutation
/// the variant calls for, and the cycle penalty on top of the op's base
/// cycles.
pub struct IndexedAddress {
    pub address: u16,
    pub side_effect: Option<(RegisterId, i8)>,
    pub extra_cycles: Cycles,
}

fn index_register(postbyte: u8) -> RegisterId {
    match (postbyte >> 5) & 0b11 {
        0b00 => RegisterId::X,
        0b01 => RegisterId::Y,
        0b10 => RegisterId::U,
        _ => RegisterId::S,
    }
}

/// Sign-extends the low 5 bits of the postbyte.
fn offset5(postbyte: u8) -> u16 {
    if postbyte & 0x10 != 0 {
        (postbyte & 0x1F) as u16 | 0xFFE0
    } else {
        (postbyte & 0x1F) as u16
    }
}

fn fetch8(regs: &mut CpuRegisters, bus: &MemoryBus) -> EmuResult<u8> {
    let value = bus.read(regs.pc)?;
    regs.pc = regs.pc.wrapping_add(1);
    Ok(value)
}

fn fetch16(regs: &mut CpuRegisters, bus: &MemoryBus) -> EmuResult<u16> {
    let high = fetch8(regs, bus)?;
    let low = fetch8(regs, bus)?;
    Ok(u16::from_be_bytes([high, low]))
}

/// Reads the postbyte (and any offset bytes) at PC and computes the
/// effective address. Does not apply the returned side effect.
pub fn resolve(
    regs: &mut CpuRegisters,
    bus: &MemoryBus,
    page: u8,
    op_code: u8,
) -> EmuResult<IndexedAddress> {
    let postbyte = fetch8(regs, bus)?;
    let illegal = || EmuError::InvalidOpcode { page, op_code };

    if postbyte & 0x80 == 0 {
        let reg = regs.reg16(index_register(postbyte));
        return Ok(IndexedAddress {
            address: reg.wrapping_add(offset5(postbyte)),
            side_effect: None,
            extra_cycles: 1,
        });
    }

    let id = index_register(postbyte);
    let reg = regs.reg16(id);
    let indirect = postbyte & 0x10 != 0;

    let (mut address, side_effect, mut extra_cycles): (u16, Option<(RegisterId, i8)>, Cycles) =
        match postbyte & 0x0F {
            0b0000 => {
                // ,R+ — no indirection allowed
                if indirect {
                    return Err(illegal());
                }
                (reg, Some((id, 1)), 2)
            }
            0b0001 => (reg, Some((id, 2)), 3), // ,R++
            0b0010 => {
                // ,-R — no indirection allowed
                if indirect {
                    return Err(illegal());
                }
                (reg.wrapping_sub(1), Some((id, -1)), 2)
            }
            0b0011 => (reg.wrapping_sub(2), Some((id, -2)), 3), // ,--R
            0b0100 => (reg, None, 0),                           // ,R
            0b0101 => (reg.wrapping_add(regs.b as i8 as i16 as u16), None, 1), // B,R
            0b0110 => (reg.wrapping_add(regs.a as i8 as i16 as u16), None, 1), // A,R
            0b1000 => {
                // n8,R
                let offset = fetch8(regs, bus)? as i8;
                (reg.wrapping_add(offset as i16 as u16), None, 1)
            }
            0b1001 => {
                // n16,R
                let offset = fetch16(regs, bus)?;
                (reg.wrapping_add(offset), None, 4)
            }
            0b1011 => (reg.wrapping_add(regs.d()), None, 4), // D,R
            0b1100 => {
                // n8,PC — relative to PC after the offset byte
                let offset = fetch8(regs, bus)? as i8;
                (regs.pc.wrapping_add(offset as i16 as u16), None, 1)
            }
            0b1101 => {
                // n16,PC
                let offset = fetch16(regs, bus)?;
                (regs.pc.wrapping_add(offset), None, 5)
            }
            0b1111 if indirect => {
                // [n16] extended indirect
                let address = fetch16(regs, bus)?;
                (address, None, 2)
            }
            _ => return Err(illegal()),
        };

    if indirect {
        address = bus.read16(address)?;
        extra_cycles += 3;
    }

    Ok(IndexedAddress {
        address,
        side_effect,
        extra_cycles,
    })
}
