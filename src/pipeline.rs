//! Pipeline: orchestrates preprocessing, first-pass encoding, second-pass
//! resolution and emission across one translation unit group — many input
//! files sharing one symbol table and emitting one artifact trio.

use std::fmt;
use std::io;

use crate::diagnostics::DiagnosticSink;
use crate::emitter;
use crate::encoder::FirstPassState;
use crate::logging;
use crate::macro_table::MacroTable;
use crate::preprocessor;
use crate::resolver;
use crate::source::SourceReader;

/// Failures that abort a run outright instead of accumulating as a
/// [crate::diagnostics::Diagnostic].
#[derive(Debug)]
pub enum Error {
    FileNotFound(String),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileNotFound(path) => write!(f, "file not found or unreadable: {}", path),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

/// Owned, reusable pipeline state: the shared symbol table, word streams and
/// diagnostics sink, threaded explicitly rather than kept as process globals.
#[derive(Default)]
pub struct Pipeline {
    state: FirstPassState,
    diagnostics: DiagnosticSink,
}

impl Pipeline {
    pub fn new() -> Pipeline {
        Pipeline::default()
    }

    /// Clear every owned table/counter/sink so a second invocation in the
    /// same process leaves no residue.
    pub fn reset(&mut self) {
        self.state.reset();
        self.diagnostics.reset();
    }

    /// The diagnostics accumulated by the most recent [`Pipeline::run`].
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    /// The first-pass state built by the most recent [`Pipeline::run`].
    pub fn state(&self) -> &FirstPassState {
        &self.state
    }

    /// Run one translation unit group: preprocess and encode each input file
    /// in order, resolve labels, then emit `.ob`/`.ent`/`.ext` iff no
    /// diagnostic was accumulated along the way. Returns whether artifacts
    /// were written; either way accumulated diagnostics are printed.
    pub fn run(&mut self, input_paths: &[String]) -> Result<bool, Error> {
        for path in input_paths {
            let content = std::fs::read_to_string(path).map_err(|_| Error::FileNotFound(path.clone()))?;

            let reader = SourceReader::from_str(&content);
            for line_number in reader.overlong_lines() {
                logging::warning(format!("{} exceeds 80 characters", path), line_number);
            }

            let mut macros = MacroTable::new();
            preprocessor::collect_macros(&reader, &mut macros, &mut self.diagnostics, path);
            let expanded = preprocessor::expand(&reader, &macros);

            self.state.encode_file(&expanded, path, &macros, &mut self.diagnostics);
        }

        self.state.finalize();
        let group_name = input_paths.last().map(String::as_str).unwrap_or("");
        let result = resolver::resolve(&mut self.state, group_name, &mut self.diagnostics);

        if self.diagnostics.any() {
            for diagnostic in self.diagnostics.iter() {
                logging::diagnostic(diagnostic);
            }
            return Ok(false);
        }

        let base = emitter::base_name(input_paths);
        emitter::write_artifacts(&base, &self.state, &result.external_uses).map_err(Error::Io)?;
        Ok(true)
    }
}
