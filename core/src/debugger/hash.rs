//! Running CRC-32C fold over executed instructions, used by the lockstep
//! determinism check.

use crate::cpu::registers::CpuRegisters;
use crate::debugger::trace::InstructionTraceInfo;

// CRC-32C (Castagnoli) polynomial in reversed bit order.
const POLY: u32 = 0x82F6_3B78;

pub fn crc32c(crc: u32, data: &[u8]) -> u32 {
    let mut crc = !crc;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
        }
    }
    !crc
}

// The fold is `hash + crc32c(hash, field)`. The addition is deliberate and
// both sides of a lockstep pair must agree on it.
fn fold(hash: u32, data: &[u8]) -> u32 {
    hash.wrapping_add(crc32c(hash, data))
}

fn fold_registers(mut hash: u32, regs: &CpuRegisters) -> u32 {
    hash = fold(hash, &[regs.a, regs.b, regs.dp, regs.cc]);
    hash = fold(hash, &regs.x.to_le_bytes());
    hash = fold(hash, &regs.y.to_le_bytes());
    hash = fold(hash, &regs.u.to_le_bytes());
    hash = fold(hash, &regs.s.to_le_bytes());
    fold(hash, &regs.pc.to_le_bytes())
}

pub fn hash_instruction_trace(mut hash: u32, trace: &InstructionTraceInfo) -> u32 {
    hash = fold(hash, &[trace.instruction.cpu_op.op_code]);
    hash = fold(hash, &[trace.instruction.cpu_op.addr_mode as u8]);
    hash = fold(hash, &[trace.instruction.page]);
    hash = fold(hash, &trace.elapsed_cycles.to_le_bytes());
    for access in trace.accesses() {
        hash = fold(hash, &access.address.to_le_bytes());
        hash = fold(hash, &[access.read as u8]);
        hash = fold(hash, &access.value.to_le_bytes());
    }
    hash = fold_registers(hash, &trace.pre_op_registers);
    fold_registers(hash, &trace.post_op_registers)
}
