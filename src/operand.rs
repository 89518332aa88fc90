//! Operand model & validators: addressing-mode classification and the
//! per-operand / per-instruction validation rules for each opcode group.

use crate::opcode::{ONE_OPERAND, TWO_OPERAND};
use crate::word::AddressingMode;

/// Classify an operand string by its addressing mode. `r0` is broadened
/// into the register forms rather than classified as Direct (see
/// DESIGN.md's open-question ledger).
pub fn classify(operand: &str) -> AddressingMode {
    if operand.starts_with('#') {
        return AddressingMode::Immediate;
    }
    if let Some(rest) = operand.strip_prefix('*') {
        if is_register_token(rest) {
            return AddressingMode::IndirectRegister;
        }
    }
    if is_register_token(operand) {
        return AddressingMode::DirectRegister;
    }
    AddressingMode::Direct
}

fn is_register_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 2 && bytes[0] == b'r' && bytes[1].is_ascii_digit() && (b'0'..=b'7').contains(&bytes[1])
}

/// Register digit (0..=7) of a register-style operand, already classified
/// as [AddressingMode::DirectRegister] or [AddressingMode::IndirectRegister]
pub fn register_number(operand: &str) -> u16 {
    let token = operand.strip_prefix('*').unwrap_or(operand);
    (token.as_bytes()[1] - b'0') as u16
}

/// Validate and parse an immediate operand's value (`#5`, `#-3`)
pub fn parse_immediate(operand: &str) -> Option<i32> {
    let digits = operand.strip_prefix('#')?;
    parse_signed_decimal(digits)
}

/// Validate a label reference: starts with a letter, isn't reserved, isn't a macro name
pub fn validate_label_reference(name: &str, is_macro: impl Fn(&str) -> bool) -> bool {
    is_valid_label_name(name) && !is_macro(name)
}

/// Structural validity of a label name on its own (used for both references
/// and definitions): starts with a letter, isn't a reserved mnemonic/directive
pub fn is_valid_label_name(name: &str) -> bool {
    let starts_with_letter = name.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    starts_with_letter && !crate::opcode::is_reserved_mnemonic(name) && !crate::opcode::is_directive(name)
}

/// Validate a `"..."`-enclosed string literal, returning its inner text
pub fn validate_string_literal(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    if inner.chars().all(|c| (c as u32) >= 32 && (c as u32) <= 126) {
        Some(inner.to_string())
    } else {
        None
    }
}

/// Validate one entry of a `.data` list: optional leading sign, then decimal digits
pub fn parse_data_entry(entry: &str) -> Option<i32> {
    parse_signed_decimal(entry)
}

fn parse_signed_decimal(text: &str) -> Option<i32> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().map(|v| v * sign)
}

/// Why an instruction's operands were rejected, independent of file/line —
/// the encoder attaches provenance when turning this into a [crate::diagnostics::Diagnostic]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandViolation {
    SourceRequired,
    SourceForbidden,
    DestRequired,
    DestForbidden,
    DestImmediateForbidden,
    LeaSourceMustBeDirect,
}

/// Validate operand presence and addressing modes for an instruction,
/// per its opcode-group rules
pub fn validate_instruction_operands(
    mnemonic: &str,
    source: AddressingMode,
    dest: AddressingMode,
) -> Result<(), OperandViolation> {
    let has_source = source != AddressingMode::Undefined;
    let has_dest = dest != AddressingMode::Undefined;

    if TWO_OPERAND.contains(&mnemonic) {
        if !has_source {
            return Err(OperandViolation::SourceRequired);
        }
        if !has_dest {
            return Err(OperandViolation::DestRequired);
        }
        if mnemonic != "cmp" && dest == AddressingMode::Immediate {
            return Err(OperandViolation::DestImmediateForbidden);
        }
        if mnemonic == "lea" {
            if source != AddressingMode::Direct {
                return Err(OperandViolation::LeaSourceMustBeDirect);
            }
            if dest == AddressingMode::Immediate {
                return Err(OperandViolation::DestImmediateForbidden);
            }
        }
        Ok(())
    } else if ONE_OPERAND.contains(&mnemonic) {
        if has_source {
            return Err(OperandViolation::SourceForbidden);
        }
        if !has_dest {
            return Err(OperandViolation::DestRequired);
        }
        match mnemonic {
            "jmp" | "bne" | "jsr" | "clr" | "not" | "inc" | "dec" | "red" => {
                if dest == AddressingMode::Immediate {
                    return Err(OperandViolation::DestImmediateForbidden);
                }
            }
            "prn" => {}
            _ => unreachable!("exhaustive over ONE_OPERAND"),
        }
        Ok(())
    } else {
        // zero-operand group
        if has_source {
            return Err(OperandViolation::SourceForbidden);
        }
        if has_dest {
            return Err(OperandViolation::DestForbidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_immediate() {
        assert_eq!(classify("#5"), AddressingMode::Immediate);
        assert_eq!(classify("#-3"), AddressingMode::Immediate);
    }

    #[test]
    fn classifies_indirect_register() {
        assert_eq!(classify("*r3"), AddressingMode::IndirectRegister);
        assert_eq!(classify("*r0"), AddressingMode::IndirectRegister);
    }

    #[test]
    fn classifies_direct_register() {
        assert_eq!(classify("r7"), AddressingMode::DirectRegister);
        assert_eq!(classify("r0"), AddressingMode::DirectRegister);
    }

    #[test]
    fn classifies_direct_label() {
        assert_eq!(classify("LOOP"), AddressingMode::Direct);
        assert_eq!(classify("r8"), AddressingMode::Direct);
        assert_eq!(classify("r"), AddressingMode::Direct);
    }

    #[test]
    fn register_number_extraction() {
        assert_eq!(register_number("r5"), 5);
        assert_eq!(register_number("*r2"), 2);
    }

    #[test]
    fn parses_signed_immediates() {
        assert_eq!(parse_immediate("#5"), Some(5));
        assert_eq!(parse_immediate("#-5"), Some(-5));
        assert_eq!(parse_immediate("#+5"), Some(5));
        assert_eq!(parse_immediate("#"), None);
        assert_eq!(parse_immediate("#5a"), None);
    }

    #[test]
    fn string_literal_validation() {
        assert_eq!(validate_string_literal("\"AB\""), Some("AB".to_string()));
        assert_eq!(validate_string_literal("\"\""), Some("".to_string()));
        assert_eq!(validate_string_literal("AB"), None);
        assert_eq!(validate_string_literal("\"A\x01B\""), None);
    }

    #[test]
    fn two_operand_group_requires_both_operands() {
        assert_eq!(
            validate_instruction_operands("mov", AddressingMode::Undefined, AddressingMode::DirectRegister),
            Err(OperandViolation::SourceRequired)
        );
        assert_eq!(
            validate_instruction_operands("mov", AddressingMode::Immediate, AddressingMode::Undefined),
            Err(OperandViolation::DestRequired)
        );
    }

    #[test]
    fn mov_forbids_immediate_destination_but_cmp_allows_it() {
        assert_eq!(
            validate_instruction_operands("mov", AddressingMode::Immediate, AddressingMode::Immediate),
            Err(OperandViolation::DestImmediateForbidden)
        );
        assert!(validate_instruction_operands("cmp", AddressingMode::Immediate, AddressingMode::Immediate).is_ok());
    }

    #[test]
    fn lea_requires_direct_source() {
        assert_eq!(
            validate_instruction_operands("lea", AddressingMode::Immediate, AddressingMode::DirectRegister),
            Err(OperandViolation::LeaSourceMustBeDirect)
        );
        assert!(validate_instruction_operands("lea", AddressingMode::Direct, AddressingMode::DirectRegister).is_ok());
    }

    #[test]
    fn jump_group_forbids_only_immediate_destination() {
        assert_eq!(
            validate_instruction_operands("jmp", AddressingMode::Undefined, AddressingMode::Immediate),
            Err(OperandViolation::DestImmediateForbidden)
        );
        assert!(validate_instruction_operands("jmp", AddressingMode::Undefined, AddressingMode::Direct).is_ok());
        assert!(validate_instruction_operands("jmp", AddressingMode::Undefined, AddressingMode::DirectRegister).is_ok());
    }

    #[test]
    fn prn_allows_any_destination() {
        assert!(validate_instruction_operands("prn", AddressingMode::Undefined, AddressingMode::Immediate).is_ok());
        assert!(validate_instruction_operands("prn", AddressingMode::Undefined, AddressingMode::Direct).is_ok());
    }

    #[test]
    fn zero_operand_group_forbids_any_operand() {
        assert_eq!(
            validate_instruction_operands("stop", AddressingMode::Undefined, AddressingMode::DirectRegister),
            Err(OperandViolation::DestForbidden)
        );
        assert!(validate_instruction_operands("rts", AddressingMode::Undefined, AddressingMode::Undefined).is_ok());
    }
}
