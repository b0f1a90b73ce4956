//! Static description of every opcode, looked up by `(page, op_code)`.
//! Pages 1 and 2 are selected by the 0x10/0x11 prefix bytes. The tables are
//! total: undefined slots come back as `Illegal` entries so lookup never
//! fails.

use once_cell::sync::Lazy;

use AddressingMode::{Direct, Extended, Immediate, Indexed, Inherent, Relative, Variant};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Relative,
    Inherent,
    Immediate,
    Extended,
    Direct,
    Indexed,
    Illegal,
    Variant,
}

#[derive(Copy, Clone, Debug)]
pub struct CpuOp {
    pub page: u8,
    pub op_code: u8,
    pub name: &'static str,
    pub addr_mode: AddressingMode,
    pub cycles: u8,
    pub size: u8,
    pub description: &'static str,
}

pub const PAGE_1_PREFIX: u8 = 0x10;
pub const PAGE_2_PREFIX: u8 = 0x11;

pub fn is_page1_prefix(op_code: u8) -> bool {
    op_code == PAGE_1_PREFIX
}

pub fn is_page2_prefix(op_code: u8) -> bool {
    op_code == PAGE_2_PREFIX
}

const fn op(
    page: u8,
    op_code: u8,
    name: &'static str,
    addr_mode: AddressingMode,
    cycles: u8,
    size: u8,
    description: &'static str,
) -> CpuOp {
    CpuOp {
        page,
        op_code,
        name,
        addr_mode,
        cycles,
        size,
        description,
    }
}

#[rustfmt::skip]
const PAGE0_OPS: &[CpuOp] = &[
    op(0, 0x00, "NEG",   Direct,    6, 2, "Negate memory"),
    op(0, 0x03, "COM",   Direct,    6, 2, "Complement memory"),
    op(0, 0x04, "LSR",   Direct,    6, 2, "Logical shift right memory"),
    op(0, 0x06, "ROR",   Direct,    6, 2, "Rotate memory right through carry"),
    op(0, 0x07, "ASR",   Direct,    6, 2, "Arithmetic shift right memory"),
    op(0, 0x08, "ASL",   Direct,    6, 2, "Arithmetic shift left memory"),
    op(0, 0x09, "ROL",   Direct,    6, 2, "Rotate memory left through carry"),
    op(0, 0x0A, "DEC",   Direct,    6, 2, "Decrement memory"),
    op(0, 0x0C, "INC",   Direct,    6, 2, "Increment memory"),
    op(0, 0x0D, "TST",   Direct,    6, 2, "Test memory"),
    op(0, 0x0E, "JMP",   Direct,    3, 2, "Jump"),
    op(0, 0x0F, "CLR",   Direct,    6, 2, "Clear memory"),
    op(0, 0x10, "PG1",   Variant,   1, 1, "Page 1 opcode prefix"),
    op(0, 0x11, "PG2",   Variant,   1, 1, "Page 2 opcode prefix"),
    op(0, 0x12, "NOP",   Inherent,  2, 1, "No operation"),
    op(0, 0x13, "SYNC",  Inherent,  2, 1, "Synchronize to interrupt"),
    op(0, 0x16, "LBRA",  Relative,  5, 3, "Long branch always"),
    op(0, 0x17, "LBSR",  Relative,  9, 3, "Long branch to subroutine"),
    op(0, 0x19, "DAA",   Inherent,  2, 1, "Decimal adjust A"),
    op(0, 0x1A, "ORCC",  Immediate, 3, 2, "OR condition codes"),
    op(0, 0x1C, "ANDCC", Immediate, 3, 2, "AND condition codes"),
    op(0, 0x1D, "SEX",   Inherent,  2, 1, "Sign extend B into A"),
    op(0, 0x1E, "EXG",   Inherent,  8, 2, "Exchange registers"),
    op(0, 0x1F, "TFR",   Inherent,  6, 2, "Transfer register"),
    op(0, 0x20, "BRA",   Relative,  3, 2, "Branch always"),
    op(0, 0x21, "BRN",   Relative,  3, 2, "Branch never"),
    op(0, 0x22, "BHI",   Relative,  3, 2, "Branch if higher"),
    op(0, 0x23, "BLS",   Relative,  3, 2, "Branch if lower or same"),
    op(0, 0x24, "BCC",   Relative,  3, 2, "Branch if carry clear"),
    op(0, 0x25, "BCS",   Relative,  3, 2, "Branch if carry set"),
    op(0, 0x26, "BNE",   Relative,  3, 2, "Branch if not equal"),
    op(0, 0x27, "BEQ",   Relative,  3, 2, "Branch if equal"),
    op(0, 0x28, "BVC",   Relative,  3, 2, "Branch if overflow clear"),
    op(0, 0x29, "BVS",   Relative,  3, 2, "Branch if overflow set"),
    op(0, 0x2A, "BPL",   Relative,  3, 2, "Branch if plus"),
    op(0, 0x2B, "BMI",   Relative,  3, 2, "Branch if minus"),
    op(0, 0x2C, "BGE",   Relative,  3, 2, "Branch if greater or equal"),
    op(0, 0x2D, "BLT",   Relative,  3, 2, "Branch if less than"),
    op(0, 0x2E, "BGT",   Relative,  3, 2, "Branch if greater than"),
    op(0, 0x2F, "BLE",   Relative,  3, 2, "Branch if less or equal"),
    op(0, 0x30, "LEAX",  Indexed,   4, 2, "Load effective address into X"),
    op(0, 0x31, "LEAY",  Indexed,   4, 2, "Load effective address into Y"),
    op(0, 0x32, "LEAS",  Indexed,   4, 2, "Load effective address into S"),
    op(0, 0x33, "LEAU",  Indexed,   4, 2, "Load effective address into U"),
    op(0, 0x34, "PSHS",  Immediate, 5, 2, "Push registers onto hardware stack"),
    op(0, 0x35, "PULS",  Immediate, 5, 2, "Pull registers from hardware stack"),
    op(0, 0x36, "PSHU",  Immediate, 5, 2, "Push registers onto user stack"),
    op(0, 0x37, "PULU",  Immediate, 5, 2, "Pull registers from user stack"),
    op(0, 0x39, "RTS",   Inherent,  5, 1, "Return from subroutine"),
    op(0, 0x3A, "ABX",   Inherent,  3, 1, "Add B to X"),
    op(0, 0x3B, "RTI",   Inherent,  6, 1, "Return from interrupt"),
    op(0, 0x3C, "CWAI",  Immediate, 20, 2, "Clear CC bits and wait for interrupt"),
    op(0, 0x3D, "MUL",   Inherent,  11, 1, "Multiply A by B"),
    op(0, 0x3F, "SWI",   Inherent,  19, 1, "Software interrupt"),
    op(0, 0x40, "NEGA",  Inherent,  2, 1, "Negate A"),
    op(0, 0x43, "COMA",  Inherent,  2, 1, "Complement A"),
    op(0, 0x44, "LSRA",  Inherent,  2, 1, "Logical shift right A"),
    op(0, 0x46, "RORA",  Inherent,  2, 1, "Rotate A right through carry"),
    op(0, 0x47, "ASRA",  Inherent,  2, 1, "Arithmetic shift right A"),
    op(0, 0x48, "ASLA",  Inherent,  2, 1, "Arithmetic shift left A"),
    op(0, 0x49, "ROLA",  Inherent,  2, 1, "Rotate A left through carry"),
    op(0, 0x4A, "DECA",  Inherent,  2, 1, "Decrement A"),
    op(0, 0x4C, "INCA",  Inherent,  2, 1, "Increment A"),
    op(0, 0x4D, "TSTA",  Inherent,  2, 1, "Test A"),
    op(0, 0x4F, "CLRA",  Inherent,  2, 1, "Clear A"),
    op(0, 0x50, "NEGB",  Inherent,  2, 1, "Negate B"),
    op(0, 0x53, "COMB",  Inherent,  2, 1, "Complement B"),
    op(0, 0x54, "LSRB",  Inherent,  2, 1, "Logical shift right B"),
    op(0, 0x56, "RORB",  Inherent,  2, 1, "Rotate B right through carry"),
    op(0, 0x57, "ASRB",  Inherent,  2, 1, "Arithmetic shift right B"),
    op(0, 0x58, "ASLB",  Inherent,  2, 1, "Arithmetic shift left B"),
    op(0, 0x59, "ROLB",  Inherent,  2, 1, "Rotate B left through carry"),
    op(0, 0x5A, "DECB",  Inherent,  2, 1, "Decrement B"),
    op(0, 0x5C, "INCB",  Inherent,  2, 1, "Increment B"),
    op(0, 0x5D, "TSTB",  Inherent,  2, 1, "Test B"),
    op(0, 0x5F, "CLRB",  Inherent,  2, 1, "Clear B"),
    op(0, 0x60, "NEG",   Indexed,   6, 2, "Negate memory"),
    op(0, 0x63, "COM",   Indexed,   6, 2, "Complement memory"),
    op(0, 0x64, "LSR",   Indexed,   6, 2, "Logical shift right memory"),
    op(0, 0x66, "ROR",   Indexed,   6, 2, "Rotate memory right through carry"),
    op(0, 0x67, "ASR",   Indexed,   6, 2, "Arithmetic shift right memory"),
    op(0, 0x68, "ASL",   Indexed,   6, 2, "Arithmetic shift left memory"),
    op(0, 0x69, "ROL",   Indexed,   6, 2, "Rotate memory left through carry"),
    op(0, 0x6A, "DEC",   Indexed,   6, 2, "Decrement memory"),
    op(0, 0x6C, "INC",   Indexed,   6, 2, "Increment memory"),
    op(0, 0x6D, "TST",   Indexed,   6, 2, "Test memory"),
    op(0, 0x6E, "JMP",   Indexed,   3, 2, "Jump"),
    op(0, 0x6F, "CLR",   Indexed,   6, 2, "Clear memory"),
    op(0, 0x70, "NEG",   Extended,  7, 3, "Negate memory"),
    op(0, 0x73, "COM",   Extended,  7, 3, "Complement memory"),
    op(0, 0x74, "LSR",   Extended,  7, 3, "Logical shift right memory"),
    op(0, 0x76, "ROR",   Extended,  7, 3, "Rotate memory right through carry"),
    op(0, 0x77, "ASR",   Extended,  7, 3, "Arithmetic shift right memory"),
    op(0, 0x78, "ASL",   Extended,  7, 3, "Arithmetic shift left memory"),
    op(0, 0x79, "ROL",   Extended,  7, 3, "Rotate memory left through carry"),
    op(0, 0x7A, "DEC",   Extended,  7, 3, "Decrement memory"),
    op(0, 0x7C, "INC",   Extended,  7, 3, "Increment memory"),
    op(0, 0x7D, "TST",   Extended,  7, 3, "Test memory"),
    op(0, 0x7E, "JMP",   Extended,  4, 3, "Jump"),
    op(0, 0x7F, "CLR",   Extended,  7, 3, "Clear memory"),
    op(0, 0x80, "SUBA",  Immediate, 2, 2, "Subtract from A"),
    op(0, 0x81, "CMPA",  Immediate, 2, 2, "Compare with A"),
    op(0, 0x82, "SBCA",  Immediate, 2, 2, "Subtract with carry from A"),
    op(0, 0x83, "SUBD",  Immediate, 4, 3, "Subtract from D"),
    op(0, 0x84, "ANDA",  Immediate, 2, 2, "AND with A"),
    op(0, 0x85, "BITA",  Immediate, 2, 2, "Bit test A"),
    op(0, 0x86, "LDA",   Immediate, 2, 2, "Load A"),
    op(0, 0x88, "EORA",  Immediate, 2, 2, "Exclusive OR with A"),
    op(0, 0x89, "ADCA",  Immediate, 2, 2, "Add with carry to A"),
    op(0, 0x8A, "ORA",   Immediate, 2, 2, "OR with A"),
    op(0, 0x8B, "ADDA",  Immediate, 2, 2, "Add to A"),
    op(0, 0x8C, "CMPX",  Immediate, 4, 3, "Compare with X"),
    op(0, 0x8D, "BSR",   Relative,  7, 2, "Branch to subroutine"),
    op(0, 0x8E, "LDX",   Immediate, 3, 3, "Load X"),
    op(0, 0x90, "SUBA",  Direct,    4, 2, "Subtract from A"),
    op(0, 0x91, "CMPA",  Direct,    4, 2, "Compare with A"),
    op(0, 0x92, "SBCA",  Direct,    4, 2, "Subtract with carry from A"),
    op(0, 0x93, "SUBD",  Direct,    6, 2, "Subtract from D"),
    op(0, 0x94, "ANDA",  Direct,    4, 2, "AND with A"),
    op(0, 0x95, "BITA",  Direct,    4, 2, "Bit test A"),
    op(0, 0x96, "LDA",   Direct,    4, 2, "Load A"),
    op(0, 0x97, "STA",   Direct,    4, 2, "Store A"),
    op(0, 0x98, "EORA",  Direct,    4, 2, "Exclusive OR with A"),
    op(0, 0x99, "ADCA",  Direct,    4, 2, "Add with carry to A"),
    op(0, 0x9A, "ORA",   Direct,    4, 2, "OR with A"),
    op(0, 0x9B, "ADDA",  Direct,    4, 2, "Add to A"),
    op(0, 0x9C, "CMPX",  Direct,    6, 2, "Compare with X"),
    op(0, 0x9D, "JSR",   Direct,    7, 2, "Jump to subroutine"),
    op(0, 0x9E, "LDX",   Direct,    5, 2, "Load X"),
    op(0, 0x9F, "STX",   Direct,    5, 2, "Store X"),
    op(0, 0xA0, "SUBA",  Indexed,   4, 2, "Subtract from A"),
    op(0, 0xA1, "CMPA",  Indexed,   4, 2, "Compare with A"),
    op(0, 0xA2, "SBCA",  Indexed,   4, 2, "Subtract with carry from A"),
    op(0, 0xA3, "SUBD",  Indexed,   6, 2, "Subtract from D"),
    op(0, 0xA4, "ANDA",  Indexed,   4, 2, "AND with A"),
    op(0, 0xA5, "BITA",  Indexed,   4, 2, "Bit test A"),
    op(0, 0xA6, "LDA",   Indexed,   4, 2, "Load A"),
    op(0, 0xA7, "STA",   Indexed,   4, 2, "Store A"),
    op(0, 0xA8, "EORA",  Indexed,   4, 2, "Exclusive OR with A"),
    op(0, 0xA9, "ADCA",  Indexed,   4, 2, "Add with carry to A"),
    op(0, 0xAA, "ORA",   Indexed,   4, 2, "OR with A"),
    op(0, 0xAB, "ADDA",  Indexed,   4, 2, "Add to A"),
    op(0, 0xAC, "CMPX",  Indexed,   6, 2, "Compare with X"),
    op(0, 0xAD, "JSR",   Indexed,   7, 2, "Jump to subroutine"),
    op(0, 0xAE, "LDX",   Indexed,   5, 2, "Load X"),
    op(0, 0xAF, "STX",   Indexed,   5, 2, "Store X"),
    op(0, 0xB0, "SUBA",  Extended,  5, 3, "Subtract from A"),
    op(0, 0xB1, "CMPA",  Extended,  5, 3, "Compare with A"),
    op(0, 0xB2, "SBCA",  Extended,  5, 3, "Subtract with carry from A"),
    op(0, 0xB3, "SUBD",  Extended,  7, 3, "Subtract from D"),
    op(0, 0xB4, "ANDA",  Extended,  5, 3, "AND with A"),
    op(0, 0xB5, "BITA",  Extended,  5, 3, "Bit test A"),
    op(0, 0xB6, "LDA",   Extended,  5, 3, "Load A"),
    op(0, 0xB7, "STA",   Extended,  5, 3, "Store A"),
    op(0, 0xB8, "EORA",  Extended,  5, 3, "Exclusive OR with A"),
    op(0, 0xB9, "ADCA",  Extended,  5, 3, "Add with carry to A"),
    op(0, 0xBA, "ORA",   Extended,  5, 3, "OR with A"),
    op(0, 0xBB, "ADDA",  Extended,  5, 3, "Add to A"),
    op(0, 0xBC, "CMPX",  Extended,  7, 3, "Compare with X"),
    op(0, 0xBD, "JSR",   Extended,  8, 3, "Jump to subroutine"),
    op(0, 0xBE, "LDX",   Extended,  6, 3, "Load X"),
    op(0, 0xBF, "STX",   Extended,  6, 3, "Store X"),
    op(0, 0xC0, "SUBB",  Immediate, 2, 2, "Subtract from B"),
    op(0, 0xC1, "CMPB",  Immediate, 2, 2, "Compare with B"),
    op(0, 0xC2, "SBCB",  Immediate, 2, 2, "Subtract with carry from B"),
    op(0, 0xC3, "ADDD",  Immediate, 4, 3, "Add to D"),
    op(0, 0xC4, "ANDB",  Immediate, 2, 2, "AND with B"),
    op(0, 0xC5, "BITB",  Immediate, 2, 2, "Bit test B"),
    op(0, 0xC6, "LDB",   Immediate, 2, 2, "Load B"),
    op(0, 0xC8, "EORB",  Immediate, 2, 2, "Exclusive OR with B"),
    op(0, 0xC9, "ADCB",  Immediate, 2, 2, "Add with carry to B"),
    op(0, 0xCA, "ORB",   Immediate, 2, 2, "OR with B"),
    op(0, 0xCB, "ADDB",  Immediate, 2, 2, "Add to B"),
    op(0, 0xCC, "LDD",   Immediate, 3, 3, "Load D"),
    op(0, 0xCE, "LDU",   Immediate, 3, 3, "Load U"),
    op(0, 0xD0, "SUBB",  Direct,    4, 2, "Subtract from B"),
    op(0, 0xD1, "CMPB",  Direct,    4, 2, "Compare with B"),
    op(0, 0xD2, "SBCB",  Direct,    4, 2, "Subtract with carry from B"),
    op(0, 0xD3, "ADDD",  Direct,    6, 2, "Add to D"),
    op(0, 0xD4, "ANDB",  Direct,    4, 2, "AND with B"),
    op(0, 0xD5, "BITB",  Direct,    4, 2, "Bit test B"),
    op(0, 0xD6, "LDB",   Direct,    4, 2, "Load B"),
    op(0, 0xD7, "STB",   Direct,    4, 2, "Store B"),
    op(0, 0xD8, "EORB",  Direct,    4, 2, "Exclusive OR with B"),
    op(0, 0xD9, "ADCB",  Direct,    4, 2, "Add with carry to B"),
    op(0, 0xDA, "ORB",   Direct,    4, 2, "OR with B"),
    op(0, 0xDB, "ADDB",  Direct,    4, 2, "Add to B"),
    op(0, 0xDC, "LDD",   Direct,    5, 2, "Load D"),
    op(0, 0xDD, "STD",   Direct,    5, 2, "Store D"),
    op(0, 0xDE, "LDU",   Direct,    5, 2, "Load U"),
    op(0, 0xDF, "STU",   Direct,    5, 2, "Store U"),
    op(0, 0xE0, "SUBB",  Indexed,   4, 2, "Subtract from B"),
    op(0, 0xE1, "CMPB",  Indexed,   4, 2, "Compare with B"),
    op(0, 0xE2, "SBCB",  Indexed,   4, 2, "Subtract with carry from B"),
    op(0, 0xE3, "ADDD",  Indexed,   6, 2, "Add to D"),
    op(0, 0xE4, "ANDB",  Indexed,   4, 2, "AND with B"),
    op(0, 0xE5, "BITB",  Indexed,   4, 2, "Bit test B"),
    op(0, 0xE6, "LDB",   Indexed,   4, 2, "Load B"),
    op(0, 0xE7, "STB",   Indexed,   4, 2, "Store B"),
    op(0, 0xE8, "EORB",  Indexed,   4, 2, "Exclusive OR with B"),
    op(0, 0xE9, "ADCB",  Indexed,   4, 2, "Add with carry to B"),
    op(0, 0xEA, "ORB",   Indexed,   4, 2, "OR with B"),
    op(0, 0xEB, "ADDB",  Indexed,   4, 2, "Add to B"),
    op(0, 0xEC, "LDD",   Indexed,   5, 2, "Load D"),
    op(0, 0xED, "STD",   Indexed,   5, 2, "Store D"),
    op(0, 0xEE, "LDU",   Indexed,   5, 2, "Load U"),
    op(0, 0xEF, "STU",   Indexed,   5, 2, "Store U"),
    op(0, 0xF0, "SUBB",  Extended,  5, 3, "Subtract from B"),
    op(0, 0xF1, "CMPB",  Extended,  5, 3, "Compare with B"),
    op(0, 0xF2, "SBCB",  Extended,  5, 3, "Subtract with carry from B"),
    op(0, 0xF3, "ADDD",  Extended,  7, 3, "Add to D"),
    op(0, 0xF4, "ANDB",  Extended,  5, 3, "AND with B"),
    op(0, 0xF5, "BITB",  Extended,  5, 3, "Bit test B"),
    op(0, 0xF6, "LDB",   Extended,  5, 3, "Load B"),
    op(0, 0xF7, "STB",   Extended,  5, 3, "Store B"),
    op(0, 0xF8, "EORB",  Extended,  5, 3, "Exclusive OR with B"),
    op(0, 0xF9, "ADCB",  Extended,  5, 3, "Add with carry to B"),
    op(0, 0xFA, "ORB",   Extended,  5, 3, "OR with B"),
    op(0, 0xFB, "ADDB",  Extended,  5, 3, "Add to B"),
    op(0, 0xFC, "LDD",   Extended,  6, 3, "Load D"),
    op(0, 0xFD, "STD",   Extended,  6, 3, "Store D"),
    op(0, 0xFE, "LDU",   Extended,  6, 3, "Load U"),
    op(0, 0xFF, "STU",   Extended,  6, 3, "Store U"),
];

#[rustfmt::skip]
const PAGE1_OPS: &[CpuOp] = &[
    op(1, 0x21, "LBRN",  Relative,  5, 4, "Long branch never"),
    op(1, 0x22, "LBHI",  Relative,  5, 4, "Long branch if higher"),
    op(1, 0x23, "LBLS",  Relative,  5, 4, "Long branch if lower or same"),
    op(1, 0x24, "LBCC",  Relative,  5, 4, "Long branch if carry clear"),
    op(1, 0x25, "LBCS",  Relative,  5, 4, "Long branch if carry set"),
    op(1, 0x26, "LBNE",  Relative,  5, 4, "Long branch if not equal"),
    op(1, 0x27, "LBEQ",  Relative,  5, 4, "Long branch if equal"),
    op(1, 0x28, "LBVC",  Relative,  5, 4, "Long branch if overflow clear"),
    op(1, 0x29, "LBVS",  Relative,  5, 4, "Long branch if overflow set"),
    op(1, 0x2A, "LBPL",  Relative,  5, 4, "Long branch if plus"),
    op(1, 0x2B, "LBMI",  Relative,  5, 4, "Long branch if minus"),
    op(1, 0x2C, "LBGE",  Relative,  5, 4, "Long branch if greater or equal"),
    op(1, 0x2D, "LBLT",  Relative,  5, 4, "Long branch if less than"),
    op(1, 0x2E, "LBGT",  Relative,  5, 4, "Long branch if greater than"),
    op(1, 0x2F, "LBLE",  Relative,  5, 4, "Long branch if less or equal"),
    op(1, 0x3F, "SWI2",  Inherent,  20, 2, "Software interrupt 2"),
    op(1, 0x83, "CMPD",  Immediate, 5, 4, "Compare with D"),
    op(1, 0x8C, "CMPY",  Immediate, 5, 4, "Compare with Y"),
    op(1, 0x8E, "LDY",   Immediate, 4, 4, "Load Y"),
    op(1, 0x93, "CMPD",  Direct,    7, 3, "Compare with D"),
    op(1, 0x9C, "CMPY",  Direct,    7, 3, "Compare with Y"),
    op(1, 0x9E, "LDY",   Direct,    6, 3, "Load Y"),
    op(1, 0x9F, "STY",   Direct,    6, 3, "Store Y"),
    op(1, 0xA3, "CMPD",  Indexed,   7, 3, "Compare with D"),
    op(1, 0xAC, "CMPY",  Indexed,   7, 3, "Compare with Y"),
    op(1, 0xAE, "LDY",   Indexed,   6, 3, "Load Y"),
    op(1, 0xAF, "STY",   Indexed,   6, 3, "Store Y"),
    op(1, 0xB3, "CMPD",  Extended,  8, 4, "Compare with D"),
    op(1, 0xBC, "CMPY",  Extended,  8, 4, "Compare with Y"),
    op(1, 0xBE, "LDY",   Extended,  7, 4, "Load Y"),
    op(1, 0xBF, "STY",   Extended,  7, 4, "Store Y"),
    op(1, 0xCE, "LDS",   Immediate, 4, 4, "Load S"),
    op(1, 0xDE, "LDS",   Direct,    6, 3, "Load S"),
    op(1, 0xDF, "STS",   Direct,    6, 3, "Store S"),
    op(1, 0xEE, "LDS",   Indexed,   6, 3, "Load S"),
    op(1, 0xEF, "STS",   Indexed,   6, 3, "Store S"),
    op(1, 0xFE, "LDS",   Extended,  7, 4, "Load S"),
    op(1, 0xFF, "STS",   Extended,  7, 4, "Store S"),
];

#[rustfmt::skip]
const PAGE2_OPS: &[CpuOp] = &[
    op(2, 0x3F, "SWI3",  Inherent,  20, 2, "Software interrupt 3"),
    op(2, 0x83, "CMPU",  Immediate, 5, 4, "Compare with U"),
    op(2, 0x8C, "CMPS",  Immediate, 5, 4, "Compare with S"),
    op(2, 0x93, "CMPU",  Direct,    7, 3, "Compare with U"),
    op(2, 0x9C, "CMPS",  Direct,    7, 3, "Compare with S"),
    op(2, 0xA3, "CMPU",  Indexed,   7, 3, "Compare with U"),
    op(2, 0xAC, "CMPS",  Indexed,   7, 3, "Compare with S"),
    op(2, 0xB3, "CMPU",  Extended,  8, 4, "Compare with U"),
    op(2, 0xBC, "CMPS",  Extended,  8, 4, "Compare with S"),
];

fn build_page(page: u8, ops: &[CpuOp]) -> Box<[CpuOp; 256]> {
    let mut table = Box::new(
        [CpuOp {
            page,
            op_code: 0,
            name: "???",
            addr_mode: AddressingMode::Illegal,
            cycles: 1,
            size: 1,
            description: "Illegal opcode",
        }; 256],
    );
    for (op_code, slot) in table.iter_mut().enumerate() {
        slot.op_code = op_code as u8;
    }
    for defined in ops {
        table[defined.op_code as usize] = *defined;
    }
    table
}

static PAGE0: Lazy<Box<[CpuOp; 256]>> = Lazy::new(|| build_page(0, PAGE0_OPS));
static PAGE1: Lazy<Box<[CpuOp; 256]>> = Lazy::new(|| build_page(1, PAGE1_OPS));
static PAGE2: Lazy<Box<[CpuOp; 256]>> = Lazy::new(|| build_page(2, PAGE2_OPS));

/// Total lookup: every `(page, op_code)` pair has an entry.
pub fn lookup_op(page: u8, op_code: u8) -> &'static CpuOp {
    match page {
        0 => &PAGE0[op_code as usize],
        1 => &PAGE1[op_code as usize],
        _ => &PAGE2[op_code as usize],
    }
}
