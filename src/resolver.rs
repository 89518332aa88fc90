//! Second-pass resolver: backfills placeholder words that reference a
//! label, then runs the global entry/extern/undeclared checks.

use crate::diagnostics::{DiagnosticSink, ErrorKind};
use crate::encoder::FirstPassState;
use crate::word::{Are, Word};

/// One use site of an external label: the address of the referencing word.
/// Collected here so the emitter doesn't need to re-walk instruction nodes.
#[derive(Debug, Clone)]
pub struct ExternalUse {
    pub name: String,
    pub address: u16,
}

pub struct ResolveResult {
    pub external_uses: Vec<ExternalUse>,
}

/// Patch every placeholder instruction word and run the global entry/
/// extern/undeclared cross-checks. Diagnostics are added to `diagnostics`;
/// the caller decides whether to emit artifacts based on `diagnostics.any()`.
pub fn resolve(state: &mut FirstPassState, file_name_for_group_errors: &str, diagnostics: &mut DiagnosticSink) -> ResolveResult {
    let mut external_uses = Vec::new();

    for node in &mut state.instruction_words {
        let label_name = match &node.label_name {
            Some(name) => name.clone(),
            None => continue,
        };

        let record = match state.symbol_table.find(&label_name) {
            Some(r) => r,
            None => {
                diagnostics.add(ErrorKind::LabelNotDeclared, file_name_for_group_errors, 0, &label_name);
                continue;
            }
        };

        if record.external {
            node.word = Word::from_bits(Are::External.bits());
            external_uses.push(ExternalUse {
                name: label_name,
                address: node.address,
            });
        } else if !record.declared {
            diagnostics.add(ErrorKind::LabelNotDeclared, file_name_for_group_errors, 0, &label_name);
        } else {
            let bits = record.address << 3 | Are::Relocatable.bits();
            node.word = Word::from_bits(bits);
        }
    }

    for record in state.symbol_table.iter() {
        if record.external && record.entry {
            diagnostics.add(ErrorKind::EntryLabelExternal, &record.file_name, record.line_number, &record.name);
        }
        if record.external && record.declared {
            diagnostics.add(ErrorKind::LabelDeclaredAsExternal, &record.file_name, record.line_number, &record.name);
        }
        if record.entry && !record.declared {
            diagnostics.add(ErrorKind::LabelNotDeclared, &record.file_name, record.line_number, &record.name);
        } else if !record.declared && !record.external {
            diagnostics.add(ErrorKind::LabelNotDeclared, &record.file_name, record.line_number, &record.name);
        }
    }

    ResolveResult { external_uses }
}
