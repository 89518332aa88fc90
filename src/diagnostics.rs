//! Diagnostics sink: a closed error taxonomy and the accumulator that every
//! pass threads through instead of unwinding.

use std::fmt;

/// The closed taxonomy of error kinds. Each variant names a trigger, never
/// a free-form string, so callers can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    MacroNameMissing,
    MacroNameInvalid,
    MemoryAllocationFailed,
    UnexpectedToken,
    InvalidLabelName,
    LabelNameUsedAsMacro,
    ReservedWord,
    InvalidData,
    InvalidString,
    InvalidInstruction,
    InvalidSourceOperand,
    InvalidDestOperand,
    InvalidAddressMode,
    LabelAlreadyDeclared,
    LabelDeclaredAsExternal,
    EntryLabelExternal,
    LabelNotDeclared,
}

impl ErrorKind {
    /// The fixed message template for this kind. `{}` is substituted with
    /// the diagnostic's `detail`.
    fn template(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file not found or unreadable: {}",
            ErrorKind::MacroNameMissing => "macro definition is missing a name: {}",
            ErrorKind::MacroNameInvalid => "invalid macro name: {}",
            ErrorKind::MemoryAllocationFailed => "memory allocation failed: {}",
            ErrorKind::UnexpectedToken => "unexpected token: {}",
            ErrorKind::InvalidLabelName => "invalid label name: {}",
            ErrorKind::LabelNameUsedAsMacro => "label name collides with a macro: {}",
            ErrorKind::ReservedWord => "name is a reserved word: {}",
            ErrorKind::InvalidData => "invalid .data value: {}",
            ErrorKind::InvalidString => "invalid .string literal: {}",
            ErrorKind::InvalidInstruction => "invalid instruction: {}",
            ErrorKind::InvalidSourceOperand => "invalid source operand: {}",
            ErrorKind::InvalidDestOperand => "invalid destination operand: {}",
            ErrorKind::InvalidAddressMode => "addressing mode not allowed here: {}",
            ErrorKind::LabelAlreadyDeclared => "label already declared: {}",
            ErrorKind::LabelDeclaredAsExternal => "label already declared external: {}",
            ErrorKind::EntryLabelExternal => "label cannot be both entry and external: {}",
            ErrorKind::LabelNotDeclared => "label never declared: {}",
        }
    }
}

/// One accumulated diagnostic, tied to exact file/line provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub file: String,
    pub line: usize,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.kind.template().replace("{}", &self.detail);
        write!(
            f,
            "Error in file {} at line {}: {}",
            self.file, self.line, message
        )
    }
}

/// Accumulates diagnostics across the whole pipeline. Never thrown through;
/// callers add to it and keep going so one run can surface every error.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> DiagnosticSink {
        DiagnosticSink::default()
    }

    pub fn add(&mut self, kind: ErrorKind, file: impl Into<String>, line: usize, detail: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            kind,
            file: file.into(),
            line,
            detail: detail.into(),
        });
    }

    /// True once at least one diagnostic has been added
    pub fn any(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Write every accumulated diagnostic to `writer`, one per line
    pub fn drain(&self, writer: &mut impl fmt::Write) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{}", diagnostic)?;
        }
        Ok(())
    }

    /// Clear all accumulated diagnostics so the sink can be reused
    pub fn reset(&mut self) {
        self.diagnostics.clear();
    }
}
