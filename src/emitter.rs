//! Emitter: writes `.ob`, `.ent`, `.ext` in the exact formats the
//! second-pass resolver's output feeds. Rendering is kept as a pure
//! function of state, with file I/O at the edge, so it stays testable.

use std::fs;
use std::io;

use crate::encoder::FirstPassState;
use crate::resolver::ExternalUse;

/// The base name shared by the three artifacts: the input file stems
/// joined with `_`.
pub fn base_name(input_paths: &[String]) -> String {
    input_paths
        .iter()
        .map(|path| stem(path))
        .collect::<Vec<_>>()
        .join("_")
}

fn stem(path: &str) -> String {
    let after_last_slash = match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    };
    let before_last_dot = match after_last_slash.rfind('.') {
        Some(i) => &after_last_slash[..i],
        None => after_last_slash,
    };
    before_last_dot
        .replace(' ', "_")
        .replace('/', "_")
        .replace('\\', "_")
        .replace('.', "_")
}

/// Render the `.ob` file contents
pub fn render_object(state: &FirstPassState) -> String {
    let mut out = String::new();
    out.push_str(&format!("   {} {}\n", state.instruction_words.len(), state.data_words.len()));
    for node in &state.instruction_words {
        out.push_str(&format!("{:04} {}\n", node.address, node.word.to_octal_string()));
    }
    for node in &state.data_words {
        out.push_str(&format!("{:04} {}\n", node.address, node.word.to_octal_string()));
    }
    out
}

/// Render the `.ent` file contents: one line per `entry`-flagged label
pub fn render_entries(state: &FirstPassState) -> String {
    let mut out = String::new();
    for record in state.symbol_table.iter() {
        if record.entry {
            out.push_str(&format!("{} {:03}\n", record.name, record.address));
        }
    }
    out
}

/// Render the `.ext` file contents: one line per use site of an external label
pub fn render_externals(external_uses: &[ExternalUse]) -> String {
    let mut out = String::new();
    for use_site in external_uses {
        out.push_str(&format!("{} {:04}\n", use_site.name, use_site.address));
    }
    out
}

/// Write all three artifacts for a group to disk, skipping the `.ent`/`.ext`
/// files if they'd be empty (matching scenario S4/S1 where no entries or
/// externals exist at all).
pub fn write_artifacts(
    base: &str,
    state: &FirstPassState,
    external_uses: &[ExternalUse],
) -> io::Result<()> {
    fs::write(format!("{}.ob", base), render_object(state))?;

    let entries = render_entries(state);
    if !entries.is_empty() {
        fs::write(format!("{}.ent", base), entries)?;
    }

    let externals = render_externals(external_uses);
    if !externals.is_empty() {
        fs::write(format!("{}.ext", base), externals)?;
    }

    Ok(())
}
