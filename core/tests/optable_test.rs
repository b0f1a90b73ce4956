use vectron_core::cpu::optable::{lookup_op, AddressingMode};

#[test]
fn test_lookup_is_total_for_every_page() {
    for page in 0..=2u8 {
        for op_code in 0..=255u8 {
            let op = lookup_op(page, op_code);
            assert_eq!(op.op_code, op_code);
            assert_eq!(op.page, page);
            assert!(op.size >= 1);
            assert!(op.cycles >= 1);
        }
    }
}

#[test]
fn test_undefined_slots_are_illegal() {
    assert_eq!(lookup_op(0, 0x01).addr_mode, AddressingMode::Illegal);
    assert_eq!(lookup_op(0, 0x38).addr_mode, AddressingMode::Illegal);
    assert_eq!(lookup_op(1, 0x00).addr_mode, AddressingMode::Illegal);
    assert_eq!(lookup_op(2, 0x20).addr_mode, AddressingMode::Illegal);
}

#[test]
fn test_page_prefixes_are_variants() {
    assert_eq!(lookup_op(0, 0x10).addr_mode, AddressingMode::Variant);
    assert_eq!(lookup_op(0, 0x11).addr_mode, AddressingMode::Variant);
}

#[test]
fn test_known_entries() {
    let lda = lookup_op(0, 0x86);
    assert_eq!(lda.name, "LDA");
    assert_eq!(lda.addr_mode, AddressingMode::Immediate);
    assert_eq!(lda.size, 2);
    assert_eq!(lda.cycles, 2);

    let lda_indexed = lookup_op(0, 0xA6);
    assert_eq!(lda_indexed.name, "LDA");
    assert_eq!(lda_indexed.addr_mode, AddressingMode::Indexed);

    let cmpd = lookup_op(1, 0x83);
    assert_eq!(cmpd.name, "CMPD");
    assert_eq!(cmpd.size, 4); // prefix + opcode + 16-bit operand

    let cmps = lookup_op(2, 0x8C);
    assert_eq!(cmps.name, "CMPS");

    let swi2 = lookup_op(1, 0x3F);
    assert_eq!(swi2.name, "SWI2");
    assert_eq!(swi2.addr_mode, AddressingMode::Inherent);
}

#[test]
fn test_mode_rows_are_consistent() {
    // The four columns of the 8-bit ALU rows share names and differ only in
    // addressing mode
    for (imm, dir, idx, ext) in [(0x80u8, 0x90u8, 0xA0u8, 0xB0u8), (0x86, 0x96, 0xA6, 0xB6)] {
        let name = lookup_op(0, imm).name;
        assert_eq!(lookup_op(0, dir).name, name);
        assert_eq!(lookup_op(0, idx).name, name);
        assert_eq!(lookup_op(0, ext).name, name);
        assert_eq!(lookup_op(0, imm).addr_mode, AddressingMode::Immediate);
        assert_eq!(lookup_op(0, dir).addr_mode, AddressingMode::Direct);
        assert_eq!(lookup_op(0, idx).addr_mode, AddressingMode::Indexed);
        assert_eq!(lookup_op(0, ext).addr_mode, AddressingMode::Extended);
    }
}
