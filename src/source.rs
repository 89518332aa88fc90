//! Source reader: yields logical lines from a file with 1-based line numbers

use std::fs;
use std::io;

/// Maximum visible characters a source line should have. Longer lines are
/// not a syntax error but are flagged with a warning.
pub const MAX_LINE_LENGTH: usize = 80;

/// One physical line of source, terminating newline stripped, other
/// whitespace preserved, numbered from 1.
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// Reads a whole file into numbered [SourceLine]s
pub struct SourceReader {
    lines: Vec<SourceLine>,
}

impl SourceReader {
    pub fn read(path: &str) -> io::Result<SourceReader> {
        let content = fs::read_to_string(path)?;
        Ok(SourceReader::from_str(&content))
    }

    pub fn from_str(content: &str) -> SourceReader {
        let lines = content
            .lines()
            .enumerate()
            .map(|(i, text)| SourceLine {
                number: i + 1,
                text: text.to_string(),
            })
            .collect();
        SourceReader { lines }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceLine> {
        self.lines.iter()
    }

    /// Line numbers (1-based) of every line longer than [MAX_LINE_LENGTH]
    pub fn overlong_lines(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|l| l.text.chars().count() > MAX_LINE_LENGTH)
            .map(|l| l.number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_start_at_one() {
        let reader = SourceReader::from_str("a\nb\nc");
        let numbers: Vec<usize> = reader.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn preserves_inner_whitespace() {
        let reader = SourceReader::from_str("  LOOP:   inc r1  ");
        let line = reader.iter().next().unwrap();
        assert_eq!(line.text, "  LOOP:   inc r1  ");
    }

    #[test]
    fn flags_lines_over_eighty_characters() {
        let long = "a".repeat(81);
        let reader = SourceReader::from_str(&long);
        assert_eq!(reader.overlong_lines(), vec![1]);
    }

    #[test]
    fn eighty_characters_is_not_overlong() {
        let reader = SourceReader::from_str(&"a".repeat(80));
        assert!(reader.overlong_lines().is_empty());
    }
}
