//! First-pass encoder: parses directives and instructions, appends words to
//! the instruction/data streams, and records labels and forward references
//! in the shared symbol table. A label may resolve to another file in the
//! group or stay unresolved past this pass, so every label-referencing word
//! is pushed as a placeholder (`WordNode.label_name`) for the second pass.

use regex::Regex;

use crate::diagnostics::{DiagnosticSink, ErrorKind};
use crate::macro_table::MacroTable;
use crate::opcode;
use crate::operand::{self, OperandViolation};
use crate::symbol_table::SymbolTable;
use crate::word::{AddressingMode, Are, Word, BASE_ADDRESS};

/// One word in the instruction or data stream. `label_name` is set only for
/// a placeholder word whose final contents depend on a label address, to be
/// patched by the second-pass resolver.
#[derive(Debug, Clone)]
pub struct WordNode {
    pub address: u16,
    pub word: Word,
    pub label_name: Option<String>,
}

/// Shared state threaded across every file in a translation unit group:
/// the symbol table and the two word streams accumulate across files so
/// that the group's address space is contiguous.
#[derive(Default)]
pub struct FirstPassState {
    pub symbol_table: SymbolTable,
    pub instruction_words: Vec<WordNode>,
    pub data_words: Vec<WordNode>,
    ic: u16,
    dc: u16,
}

impl FirstPassState {
    pub fn new() -> FirstPassState {
        FirstPassState::default()
    }

    pub fn reset(&mut self) {
        self.symbol_table.reset();
        self.instruction_words.clear();
        self.data_words.clear();
        self.ic = 0;
        self.dc = 0;
    }

    /// Final instruction-word count, before the +100 offset
    pub fn ic_final(&self) -> u16 {
        self.ic
    }

    /// Final data-word count
    pub fn dc_final(&self) -> u16 {
        self.dc
    }

    /// Encode one preprocessed file, appending to the shared streams
    pub fn encode_file(
        &mut self,
        source: &str,
        file_name: &str,
        macros: &MacroTable,
        diagnostics: &mut DiagnosticSink,
    ) {
        for (line_number, raw_line) in source.lines().enumerate() {
            let line_number = line_number + 1;
            let line = strip_comment(raw_line);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            self.encode_line(line, file_name, line_number, macros, diagnostics);
        }
    }

    fn encode_line(
        &mut self,
        line: &str,
        file_name: &str,
        line_number: usize,
        macros: &MacroTable,
        diagnostics: &mut DiagnosticSink,
    ) {
        let (label, body) = split_label(line);
        let body = body.trim();
        if body.is_empty() {
            // A label definition with nothing after it is not addressable;
            // treat as an unexpected token (nothing to classify or encode).
            if label.is_some() {
                diagnostics.add(ErrorKind::UnexpectedToken, file_name, line_number, line);
            }
            return;
        }

        let (head, rest) = split_head(body);

        if head == ".entry" || head == ".extern" {
            // .entry/.extern never define a label, even with a label prefix present.
            self.encode_extern_or_entry(head, rest.trim(), file_name, line_number, diagnostics);
            return;
        }

        if let Some(name) = label {
            if !self.define_label(name, head, file_name, line_number, macros, diagnostics) {
                return;
            }
        }

        match head {
            ".data" => self.encode_data(rest, file_name, line_number, diagnostics),
            ".string" => self.encode_string(rest, file_name, line_number, diagnostics),
            _ => self.encode_instruction(head, rest, file_name, line_number, macros, diagnostics),
        }
    }

    /// Validate and register a label definition. Returns false if the
    /// definition itself was rejected (caller should not encode the rest of the line).
    fn define_label(
        &mut self,
        name: &str,
        head: &str,
        file_name: &str,
        line_number: usize,
        macros: &MacroTable,
        diagnostics: &mut DiagnosticSink,
    ) -> bool {
        if !operand::is_valid_label_name(name) {
            diagnostics.add(ErrorKind::InvalidLabelName, file_name, line_number, name);
            return false;
        }
        if macros.contains(name) {
            diagnostics.add(ErrorKind::LabelNameUsedAsMacro, file_name, line_number, name);
            return false;
        }

        let is_instruction = head != ".data" && head != ".string";
        let address = if is_instruction { self.ic } else { self.dc };

        let record = self.symbol_table.entry(name, file_name, line_number);
        if record.declared {
            diagnostics.add(ErrorKind::LabelAlreadyDeclared, file_name, line_number, name);
            return false;
        }
        record.declared = true;
        record.is_instruction = is_instruction;
        record.address = address;
        record.file_name = file_name.to_string();
        record.line_number = line_number;
        true
    }

    fn encode_extern_or_entry(
        &mut self,
        head: &str,
        name: &str,
        file_name: &str,
        line_number: usize,
        diagnostics: &mut DiagnosticSink,
    ) {
        if !operand::is_valid_label_name(name) {
            diagnostics.add(ErrorKind::InvalidLabelName, file_name, line_number, name);
            return;
        }

        let record = self.symbol_table.entry(name, file_name, line_number);
        if head == ".extern" {
            if record.declared {
                diagnostics.add(ErrorKind::LabelDeclaredAsExternal, file_name, line_number, name);
            } else if record.entry {
                diagnostics.add(ErrorKind::EntryLabelExternal, file_name, line_number, name);
            } else if record.external {
                diagnostics.add(ErrorKind::LabelAlreadyDeclared, file_name, line_number, name);
            } else {
                record.external = true;
            }
        } else {
            if record.external {
                diagnostics.add(ErrorKind::EntryLabelExternal, file_name, line_number, name);
            } else if record.entry {
                diagnostics.add(ErrorKind::LabelAlreadyDeclared, file_name, line_number, name);
            } else if record.declared && record.file_name != file_name {
                diagnostics.add(ErrorKind::LabelAlreadyDeclared, file_name, line_number, name);
            } else {
                record.entry = true;
            }
        }
    }

    fn encode_data(&mut self, rest: &str, file_name: &str, line_number: usize, diagnostics: &mut DiagnosticSink) {
        for entry in split_operands(rest) {
            match operand::parse_data_entry(entry) {
                Some(value) => {
                    self.data_words.push(WordNode {
                        address: self.dc,
                        word: Word::from_signed(value),
                        label_name: None,
                    });
                    self.dc += 1;
                }
                None => diagnostics.add(ErrorKind::InvalidData, file_name, line_number, entry),
            }
        }
    }

    fn encode_string(&mut self, rest: &str, file_name: &str, line_number: usize, diagnostics: &mut DiagnosticSink) {
        match operand::validate_string_literal(rest.trim()) {
            Some(text) => {
                for byte in text.bytes() {
                    self.data_words.push(WordNode {
                        address: self.dc,
                        word: Word::from_signed(byte as i32),
                        label_name: None,
                    });
                    self.dc += 1;
                }
                self.data_words.push(WordNode {
                    address: self.dc,
                    word: Word::from_signed(0),
                    label_name: None,
                });
                self.dc += 1;
            }
            None => diagnostics.add(ErrorKind::InvalidString, file_name, line_number, rest.trim()),
        }
    }

    fn encode_instruction(
        &mut self,
        mnemonic: &str,
        rest: &str,
        file_name: &str,
        line_number: usize,
        macros: &MacroTable,
        diagnostics: &mut DiagnosticSink,
    ) {
        let opcode = match opcode::lookup(mnemonic) {
            Some(op) => op,
            None => {
                diagnostics.add(ErrorKind::UnexpectedToken, file_name, line_number, mnemonic);
                return;
            }
        };

        let operands = split_operands(rest);
        let expected: &[usize] = if opcode::TWO_OPERAND.contains(&mnemonic) {
            &[2]
        } else if opcode::ONE_OPERAND.contains(&mnemonic) {
            &[1]
        } else {
            &[0]
        };
        if !expected.contains(&operands.len()) {
            diagnostics.add(ErrorKind::InvalidInstruction, file_name, line_number, rest.trim());
            return;
        }

        let (source_text, dest_text) = match operands.len() {
            2 => (Some(operands[0]), Some(operands[1])),
            1 => (None, Some(operands[0])),
            _ => (None, None),
        };

        let source_mode = source_text.map(operand::classify).unwrap_or(AddressingMode::Undefined);
        let dest_mode = dest_text.map(operand::classify).unwrap_or(AddressingMode::Undefined);

        if let Some(text) = source_text {
            if !validate_operand_syntax(text, source_mode, macros) {
                diagnostics.add(ErrorKind::InvalidSourceOperand, file_name, line_number, text);
                return;
            }
        }
        if let Some(text) = dest_text {
            if !validate_operand_syntax(text, dest_mode, macros) {
                diagnostics.add(ErrorKind::InvalidDestOperand, file_name, line_number, text);
                return;
            }
        }

        if let Err(violation) = operand::validate_instruction_operands(mnemonic, source_mode, dest_mode) {
            let kind = match violation {
                OperandViolation::SourceRequired | OperandViolation::SourceForbidden => ErrorKind::InvalidSourceOperand,
                OperandViolation::DestRequired | OperandViolation::DestForbidden => ErrorKind::InvalidDestOperand,
                OperandViolation::DestImmediateForbidden | OperandViolation::LeaSourceMustBeDirect => {
                    ErrorKind::InvalidAddressMode
                }
            };
            diagnostics.add(kind, file_name, line_number, rest.trim());
            return;
        }

        let header = (opcode as u16) << 11 | source_mode.bits() << 7 | dest_mode.bits() << 3 | Are::Absolute.bits();
        self.push_instruction_word(Word::from_bits(header), None);

        let source_is_register = matches!(source_mode, AddressingMode::DirectRegister | AddressingMode::IndirectRegister);
        let dest_is_register = matches!(dest_mode, AddressingMode::DirectRegister | AddressingMode::IndirectRegister);

        if source_is_register && dest_is_register {
            let src_reg = operand::register_number(source_text.unwrap());
            let dst_reg = operand::register_number(dest_text.unwrap());
            let bits = src_reg << 3 | dst_reg << 6 | Are::Absolute.bits();
            self.push_instruction_word(Word::from_bits(bits), None);
        } else {
            if let Some(text) = source_text {
                self.encode_extra_word(text, source_mode);
            }
            if let Some(text) = dest_text {
                self.encode_extra_word(text, dest_mode);
            }
        }
    }

    fn encode_extra_word(&mut self, text: &str, mode: AddressingMode) {
        match mode {
            AddressingMode::Immediate => {
                let value = operand::parse_immediate(text).unwrap_or(0);
                let bits = ((value as u16) & 0x0FFF) << 3 | Are::Absolute.bits();
                self.push_instruction_word(Word::from_bits(bits), None);
            }
            AddressingMode::Direct => {
                // Address and ARE are unknown until the label resolves; the
                // second pass overwrites this word entirely.
                self.push_instruction_word(Word::from_bits(0), Some(text.to_string()));
            }
            AddressingMode::DirectRegister | AddressingMode::IndirectRegister => {
                let register = operand::register_number(text);
                let bits = register << 6 | Are::Absolute.bits();
                self.push_instruction_word(Word::from_bits(bits), None);
            }
            AddressingMode::Undefined => unreachable!("extra word requested for an absent operand"),
        }
    }

    fn push_instruction_word(&mut self, word: Word, label_name: Option<String>) {
        self.instruction_words.push(WordNode {
            address: self.ic,
            word,
            label_name,
        });
        self.ic += 1;
    }

    /// Offset every recorded address by the final base addresses — run
    /// once, after every file in the group has been encoded.
    pub fn finalize(&mut self) {
        let ic_final = self.ic;
        for node in &mut self.instruction_words {
            node.address += BASE_ADDRESS;
        }
        for node in &mut self.data_words {
            node.address += BASE_ADDRESS + ic_final;
        }
        for record in self.symbol_table.iter_mut() {
            if !record.declared {
                continue;
            }
            if record.is_instruction {
                record.address += BASE_ADDRESS;
            } else {
                record.address += BASE_ADDRESS + ic_final;
            }
        }
    }
}

fn validate_operand_syntax(text: &str, mode: AddressingMode, macros: &MacroTable) -> bool {
    match mode {
        AddressingMode::Immediate => operand::parse_immediate(text).is_some(),
        AddressingMode::Direct => operand::validate_label_reference(text, |n| macros.contains(n)),
        AddressingMode::DirectRegister | AddressingMode::IndirectRegister => true,
        AddressingMode::Undefined => false,
    }
}

/// Strip a `;`-comment, ignoring `;` characters inside a `"..."` string so a
/// string literal's contents are never mistaken for a comment.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            ';' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split an optional `LABEL:` prefix off the front of a line
fn split_label(line: &str) -> (Option<&str>, &str) {
    let trimmed = line.trim_start();
    let colon = match trimmed.find(':') {
        Some(i) => i,
        None => return (None, line),
    };
    let candidate = &trimmed[..colon];
    if candidate.is_empty() || candidate.contains(char::is_whitespace) {
        return (None, line);
    }
    (Some(candidate), &trimmed[colon + 1..])
}

/// Split off the first whitespace-delimited token and the trimmed remainder
fn split_head(body: &str) -> (&str, &str) {
    match body.find(char::is_whitespace) {
        Some(i) => (&body[..i], body[i..].trim_start()),
        None => (body, ""),
    }
}

/// Split a comma-separated operand list into its lexemes using a
/// quote-aware scan: a quoted string, or a run of non-comma non-space
/// characters. An empty remainder (no operands) yields an empty vector.
fn split_operands(rest: &str) -> Vec<&str> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Vec::new();
    }
    let lexeme = Regex::new(r#""[^"]*"|[^,\s]+"#).unwrap();
    lexeme.find_iter(rest).map(|m| m.as_str()).collect()
}
