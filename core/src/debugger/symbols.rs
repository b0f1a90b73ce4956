use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::error::EmuResult;

/// Address to symbol names. Multiple symbols may alias one address, and one
/// name may appear at several addresses.
#[derive(Default)]
pub struct SymbolTable {
    symbols: BTreeMap<u16, Vec<String>>,
}

impl SymbolTable {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn insert(&mut self, address: u16, name: &str) {
        self.symbols.entry(address).or_default().push(name.to_string());
    }

    pub fn get(&self, address: u16) -> Option<&[String]> {
        self.symbols.get(&address).map(Vec::as_slice)
    }

    /// Parses `NAME [EQU|equ|:] ADDR ...` lines from an assembler listing;
    /// anything else is skipped.
    pub fn load_file(&mut self, path: &Path) -> EmuResult<()> {
        let text = fs::read_to_string(path)?;
        for line in text.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() >= 3
                && (tokens[1].contains("EQU") || tokens[1].contains("equ") || tokens[1] == ":")
            {
                if let Some(address) = parse_integral(tokens[2]) {
                    self.insert(address as u16, tokens[0]);
                }
            }
        }
        Ok(())
    }
}

/// Accepts decimal, `$hex`, `0xhex` and `0Xhex`.
pub fn parse_integral(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('$') {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    s.parse().ok()
}
