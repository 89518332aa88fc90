//! The instruction set: mnemonic -> opcode and the three operand-arity groups
//!
//! The numbering below is pinned (see DESIGN.md for the rationale behind
//! `not`/`clr`/`lea`'s exact positions).

/// An opcode number in the 0..=15 range
pub type Opcode = u8;

/// Look up the opcode for a mnemonic, case-sensitive (mnemonics are always lowercase)
pub fn lookup(mnemonic: &str) -> Option<Opcode> {
    Some(match mnemonic {
        "mov" => 0,
        "cmp" => 1,
        "add" => 2,
        "sub" => 3,
        "not" => 4,
        "clr" => 5,
        "lea" => 6,
        "inc" => 7,
        "dec" => 8,
        "jmp" => 9,
        "bne" => 10,
        "red" => 11,
        "prn" => 12,
        "jsr" => 13,
        "rts" => 14,
        "stop" => 15,
        _ => return None,
    })
}

/// Mnemonics that take both a source and a destination operand
pub const TWO_OPERAND: &[&str] = &["mov", "cmp", "add", "sub", "lea"];

/// Mnemonics that take only a destination operand
pub const ONE_OPERAND: &[&str] = &[
    "clr", "not", "inc", "dec", "jmp", "bne", "red", "jsr", "prn",
];

/// Mnemonics that take no operands
pub const ZERO_OPERAND: &[&str] = &["rts", "stop"];

/// All sixteen reserved mnemonics, used to reject them as label/macro names
pub fn is_reserved_mnemonic(word: &str) -> bool {
    TWO_OPERAND.contains(&word) || ONE_OPERAND.contains(&word) || ZERO_OPERAND.contains(&word)
}

/// Directive keywords, also reserved for label/macro name validation
pub const DIRECTIVES: &[&str] = &[".data", ".string", ".entry", ".extern"];

pub fn is_directive(word: &str) -> bool {
    DIRECTIVES.contains(&word)
}
