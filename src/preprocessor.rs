//! Preprocessor: macro definition capture (phase 1) and expansion (phase 2).
//! Comment stripping happens later, in the encoder, since a `;` inside a
//! `.string` literal must not be treated as a comment start.

use crate::diagnostics::{DiagnosticSink, ErrorKind};
use crate::macro_table::{Macro, MacroTable};
use crate::opcode::is_reserved_mnemonic;
use crate::source::SourceReader;

fn is_register_name(word: &str) -> bool {
    matches!(word, "r0" | "r1" | "r2" | "r3" | "r4" | "r5" | "r6" | "r7")
}

fn is_valid_macro_name(name: &str) -> bool {
    let starts_with_letter = name.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    starts_with_letter
        && !is_reserved_mnemonic(name)
        && name != "macr"
        && name != "endmacr"
        && !is_register_name(name)
}

/// Phase 1: scan `reader` for `macr ... endmacr` blocks and populate `table`.
/// Malformed definitions are reported but never abort the scan.
pub fn collect_macros(
    reader: &SourceReader,
    table: &mut MacroTable,
    diagnostics: &mut DiagnosticSink,
    file_name: &str,
) {
    let mut lines = reader.iter().peekable();
    while let Some(line) = lines.next() {
        let trimmed = line.text.trim_start();
        let mut tokens = trimmed.split_whitespace();
        let first = match tokens.next() {
            Some(t) => t,
            None => continue,
        };
        if first != "macr" {
            continue;
        }

        let name_token = tokens.next();
        let name = match name_token {
            None => {
                diagnostics.add(ErrorKind::MacroNameMissing, file_name, line.number, trimmed);
                None
            }
            Some(name) if !is_valid_macro_name(name) => {
                diagnostics.add(ErrorKind::MacroNameInvalid, file_name, line.number, name);
                None
            }
            Some(name) => Some(name.to_string()),
        };

        let mut body = Vec::new();
        for body_line in lines.by_ref() {
            if body_line.text.trim_start().starts_with("endmacr") {
                break;
            }
            body.push(body_line.text.clone());
        }

        if let Some(name) = name {
            table.add(Macro { name, body });
        }
    }
}

/// Phase 2: re-walk `reader`, suppressing macro definition bodies and
/// expanding every call site of a known macro in place.
pub fn expand(reader: &SourceReader, table: &MacroTable) -> String {
    let mut output = Vec::new();
    let mut inside_macro_body = false;

    for line in reader.iter() {
        let trimmed = line.text.trim_start();
        if inside_macro_body {
            if trimmed.starts_with("endmacr") {
                inside_macro_body = false;
            }
            continue;
        }
        if trimmed.starts_with("macr") {
            inside_macro_body = true;
            continue;
        }

        if trimmed.is_empty() {
            output.push(String::new());
            continue;
        }

        let first_token = trimmed.split_whitespace().next().unwrap_or("");
        match table.find(first_token) {
            Some(macro_def) => output.extend(macro_def.body.iter().cloned()),
            None => output.push(line.text.clone()),
        }
    }

    output.join("\n")
}

/// Run both phases over `source`, returning the expanded text
pub fn preprocess(
    source: &str,
    diagnostics: &mut DiagnosticSink,
    file_name: &str,
) -> String {
    let reader = SourceReader::from_str(source);
    let mut table = MacroTable::new();
    collect_macros(&reader, &mut table, diagnostics, file_name);
    expand(&reader, &table)
}
