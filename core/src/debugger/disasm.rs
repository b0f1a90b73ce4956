//! Renders a traced instruction as hex, mnemonic and comment, with symbol
//! annotation and the instruction's recorded memory accesses appended.

use std::fmt::Write as _;

use crate::cpu::optable::AddressingMode;
use crate::cpu::registers::CpuRegisters;
use crate::debugger::symbols::SymbolTable;
use crate::debugger::trace::{Instruction, InstructionTraceInfo};

pub struct DisassembledOp {
    pub hex_instruction: String,
    pub disasm_instruction: String,
    pub comment: String,
    pub description: &'static str,
}

fn index_register_name(postbyte: u8) -> &'static str {
    match (postbyte >> 5) & 0b11 {
        0b00 => "X",
        0b01 => "Y",
        0b10 => "U",
        _ => "S",
    }
}

fn index_register_value(regs: &CpuRegisters, postbyte: u8) -> u16 {
    match (postbyte >> 5) & 0b11 {
        0b00 => regs.x,
        0b01 => regs.y,
        0b10 => regs.u,
        _ => regs.s,
    }
}

/// EXG/TFR postbyte: bit 3 picks the 8-bit register table.
fn disassemble_exg_tfr(instruction: &Instruction) -> (String, String) {
    let postbyte = instruction.operand(0);
    let src = ((postbyte >> 4) & 0b111) as usize;
    let dst = (postbyte & 0b111) as usize;
    let names: &[&str] = if postbyte & 0x08 != 0 {
        &["A", "B", "CC", "DP"]
    } else {
        &["D", "X", "Y", "U", "S", "PC"]
    };
    let disasm = format!(
        "{} {},{}",
        instruction.cpu_op.name,
        names.get(src).unwrap_or(&"?"),
        names.get(dst).unwrap_or(&"?")
    );
    (disasm, String::new())
}

/// PSH/PUL postbyte is a register bitmask. Bit 6 names the other stack
/// pointer: U for PSHS/PULS (opcodes below 0x36), S for PSHU/PULU.
fn disassemble_psh_pul(instruction: &Instruction) -> (String, String) {
    let value = instruction.operand(0);
    let mut registers: Vec<&str> = Vec::new();
    if value & 0x01 != 0 {
        registers.push("CC");
    }
    if value & 0x02 != 0 {
        registers.push("A");
    }
    if value & 0x04 != 0 {
        registers.push("B");
    }
    if value & 0x08 != 0 {
        registers.push("DP");
    }
    if value & 0x10 != 0 {
        registers.push("X");
    }
    if value & 0x20 != 0 {
        registers.push("Y");
    }
    if value & 0x40 != 0 {
        registers.push(if instruction.cpu_op.op_code < 0x36 { "U" } else { "S" });
    }
    if value & 0x80 != 0 {
        registers.push("PC");
    }

    let disasm = format!("{} {}", instruction.cpu_op.name, registers.join(","));
    let comment = format!("#${value:02x} ({value})");
    (disasm, comment)
}

fn disassemble_indexed(instruction: &Instruction, regs: &CpuRegisters) -> (String, String) {
    let postbyte = instruction.operand(0);
    let name = instruction.cpu_op.name;
    let reg_name = index_register_name(postbyte);
    let reg = index_register_value(regs, postbyte);

    let mut ea: u16 = 0;
    let mut supports_indirect = true;
    let mut operands;
    let mut comment = String::new();

    if postbyte & 0x80 == 0 {
        // 5-bit two's complement offset
        let mut offset = (postbyte & 0x1F) as i8;
        if postbyte & 0x10 != 0 {
            offset = (offset as u8 | 0xE0) as i8;
        }
        ea = reg.wrapping_add(offset as i16 as u16);
        supports_indirect = false;
        operands = format!("{offset},{reg_name}");
        comment = format!("{offset},${reg:04x}");
    } else {
        match postbyte & 0x0F {
            0b0000 => {
                ea = reg;
                supports_indirect = false;
                operands = format!(",{reg_name}+");
                comment = format!(",${reg:04x}+");
            }
            0b0001 => {
                ea = reg;
                operands = format!(",{reg_name}++");
                comment = format!(",${reg:04x}++");
            }
            0b0010 => {
                ea = reg.wrapping_sub(1);
                supports_indirect = false;
                operands = format!(",-{reg_name}");
                comment = format!(",-${reg:04x}");
            }
            0b0011 => {
                ea = reg.wrapping_sub(2);
                operands = format!(",--{reg_name}");
                comment = format!(",--${reg:04x}");
            }
            0b0100 => {
                ea = reg;
                operands = format!(",{reg_name}");
                comment = format!(",${reg:04x}");
            }
            0b0101 => {
                let offset = regs.b as i8 as i16;
                ea = reg.wrapping_add(offset as u16);
                operands = format!("B,{reg_name}");
                comment = format!("{offset},${reg:04x}");
            }
            0b0110 => {
                let offset = regs.a as i8 as i16;
                ea = reg.wrapping_add(offset as u16);
                operands = format!("A,{reg_name}");
                comment = format!("{offset},${reg:04x}");
            }
            0b1000 => {
                let offset = instruction.operand(1) as i8 as i16;
                ea = reg.wrapping_add(offset as u16);
                operands = format!("{offset},{reg_name}");
                comment = format!("{offset},${reg:04x}");
            }
            0b1001 => {
                let offset =
                    i16::from_be_bytes([instruction.operand(1), instruction.operand(2)]);
                ea = reg.wrapping_add(offset as u16);
                operands = format!("{offset},{reg_name}");
                comment = format!("{offset},${reg:04x}");
            }
            0b1011 => {
                let offset = regs.d() as i16;
                ea = reg.wrapping_add(offset as u16);
                operands = format!("D,{reg_name}");
                comment = format!("{offset},${reg:04x}");
            }
            0b1100 => {
                let offset = instruction.operand(1) as i8 as i16;
                ea = regs.pc.wrapping_add(offset as u16);
                operands = format!("{offset},PC");
                comment = format!("{offset},${:04x}", regs.pc);
            }
            0b1101 => {
                let offset =
                    i16::from_be_bytes([instruction.operand(1), instruction.operand(2)]);
                ea = regs.pc.wrapping_add(offset as u16);
                operands = format!("{offset},PC");
                comment = format!("{offset},${:04x}", regs.pc);
            }
            0b1111 => {
                ea = u16::from_be_bytes([instruction.operand(1), instruction.operand(2)]);
                operands = String::new();
            }
            _ => {
                // 0b0111, 0b1010, 0b1110 are illegal postbyte variants
                operands = "???".to_string();
                supports_indirect = false;
            }
        }
    }

    if supports_indirect && postbyte & 0x10 != 0 {
        operands = format!("[${ea:04x}]");
    }

    (format!("{name} {operands}"), comment)
}

pub fn disassemble_op(trace: &InstructionTraceInfo, symbols: &SymbolTable) -> DisassembledOp {
    let instruction = &trace.instruction;
    let regs = &trace.pre_op_registers;
    let cpu_op = instruction.cpu_op;

    let mut hex_instruction = String::new();
    for byte in &instruction.op_bytes[..cpu_op.size as usize] {
        let _ = write!(hex_instruction, "{byte:02x}");
    }

    // Instruction-specific renderers first; the addressing-mode renderers
    // don't know enough for these.
    let special = if instruction.page == 0 {
        match cpu_op.op_code {
            0x1E | 0x1F => Some(disassemble_exg_tfr(instruction)),
            0x34..=0x37 => Some(disassemble_psh_pul(instruction)),
            _ => None,
        }
    } else {
        None
    };

    let (disasm_instruction, mut comment) = special.unwrap_or_else(|| match cpu_op.addr_mode {
        AddressingMode::Inherent => (cpu_op.name.to_string(), String::new()),
        AddressingMode::Immediate => {
            if cpu_op.size == 2 {
                let value = instruction.operand(0);
                (
                    format!("{} #${value:02x}", cpu_op.name),
                    format!("({value})"),
                )
            } else {
                let value = u16::from_be_bytes([instruction.operand(0), instruction.operand(1)]);
                (
                    format!("{} #${value:04x}", cpu_op.name),
                    format!("({value})"),
                )
            }
        }
        AddressingMode::Extended => {
            let ea = u16::from_be_bytes([instruction.operand(0), instruction.operand(1)]);
            (format!("{} ${ea:04x}", cpu_op.name), String::new())
        }
        AddressingMode::Direct => {
            let ea = u16::from_be_bytes([regs.dp, instruction.operand(0)]);
            (
                format!("{} ${:02x}", cpu_op.name, instruction.operand(0)),
                format!("DP:(PC) = ${ea:02x}"),
            )
        }
        AddressingMode::Indexed => disassemble_indexed(instruction, regs),
        AddressingMode::Relative => {
            let next_pc = regs.pc.wrapping_add(cpu_op.size as u16);
            if cpu_op.size == 2 {
                let offset = instruction.operand(0) as i8;
                let target = next_pc.wrapping_add(offset as i16 as u16);
                (
                    format!("{} ${:02x}", cpu_op.name, offset as u8),
                    format!("({offset}), PC + offset = ${target:04x}"),
                )
            } else {
                let offset =
                    i16::from_be_bytes([instruction.operand(0), instruction.operand(1)]);
                let target = next_pc.wrapping_add(offset as u16);
                (
                    format!("{} ${:04x}", cpu_op.name, offset as u16),
                    format!("({offset}), PC + offset = ${target:04x}"),
                )
            }
        }
        AddressingMode::Illegal | AddressingMode::Variant => (cpu_op.name.to_string(), String::new()),
    });

    // Recorded memory accesses, minus the instruction's own fetch bytes
    let skip = cpu_op.size as usize;
    let initial_space = !comment.is_empty();
    for (i, access) in trace.accesses().iter().enumerate().skip(skip) {
        let separator = if i == skip && !initial_space { "" } else { " " };
        let _ = write!(
            comment,
            "{}${:04x}{}${:x}",
            separator,
            access.address,
            if access.read { "->" } else { "<-" },
            access.value
        );
    }

    DisassembledOp {
        hex_instruction,
        disasm_instruction: append_symbols(&disasm_instruction, symbols),
        comment: append_symbols(&comment, symbols),
        description: cpu_op.description,
    }
}

/// Replaces each `$XXXX` (four hex digits) with `$XXXX{sym1|sym2}` when the
/// address has symbols.
fn append_symbols(s: &str, symbols: &SymbolTable) -> String {
    if symbols.is_empty() {
        return s.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '$'
            && i + 4 < chars.len()
            && chars[i + 1..i + 5].iter().all(|c| c.is_ascii_hexdigit())
        {
            let hex: String = chars[i..i + 5].iter().collect();
            out.push_str(&hex);
            if let Ok(address) = u16::from_str_radix(&hex[1..], 16) {
                if let Some(names) = symbols.get(address) {
                    out.push('{');
                    out.push_str(&names.join("|"));
                    out.push('}');
                }
            }
            i += 5;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
