//! Symbol table: insertion-ordered mapping from label name to its record
//!
//! The emitter walks labels in declaration order, so this is a `Vec` of
//! records plus a name -> index map rather than a bare hash map.

use std::collections::HashMap;

/// A single label's bookkeeping record
#[derive(Debug, Clone)]
pub struct SymbolRecord {
    pub name: String,
    pub address: u16,
    pub is_instruction: bool,
    pub entry: bool,
    pub external: bool,
    pub declared: bool,
    pub file_name: String,
    pub line_number: usize,
}

impl SymbolRecord {
    fn new(name: &str, file_name: &str, line_number: usize) -> SymbolRecord {
        SymbolRecord {
            name: name.to_string(),
            address: 0,
            is_instruction: false,
            entry: false,
            external: false,
            declared: false,
            file_name: file_name.to_string(),
            line_number,
        }
    }
}

/// Insertion-ordered `name -> record` mapping. A reference to an undeclared
/// label creates a placeholder record; a later definition upgrades it in
/// place so existing indices and iteration order stay valid.
#[derive(Debug, Default)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn find(&self, name: &str) -> Option<&SymbolRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut SymbolRecord> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.records[i]),
            None => None,
        }
    }

    /// Get or create the record for `name`, inserting an undeclared
    /// placeholder (all flags false, address 0) the first time it's seen.
    pub fn entry(&mut self, name: &str, file_name: &str, line_number: usize) -> &mut SymbolRecord {
        if !self.index.contains_key(name) {
            self.index.insert(name.to_string(), self.records.len());
            self.records.push(SymbolRecord::new(name, file_name, line_number));
        }
        self.find_mut(name).unwrap()
    }

    /// Insertion-order iteration, the order the emitter walks in
    pub fn iter(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.records.iter()
    }

    /// Mutable insertion-order iteration, used by the first pass's final
    /// address-offsetting step
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SymbolRecord> {
        self.records.iter_mut()
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}
