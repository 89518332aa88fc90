//! Macro table: private to the preprocessor, `name -> captured body lines`

use std::collections::HashMap;

/// A macro definition: a name and its ordered, verbatim body lines
#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub body: Vec<String>,
}

/// `name -> Macro` mapping, owned by a single preprocessor run and reset
/// between invocations so repeated runs in one process don't see stale macros.
#[derive(Debug, Default)]
pub struct MacroTable {
    macros: HashMap<String, Macro>,
}

impl MacroTable {
    pub fn new() -> MacroTable {
        MacroTable::default()
    }

    pub fn add(&mut self, macro_def: Macro) {
        self.macros.insert(macro_def.name.clone(), macro_def);
    }

    pub fn find(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn reset(&mut self) {
        self.macros.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_find() {
        let mut table = MacroTable::new();
        table.add(Macro {
            name: "INC1".to_string(),
            body: vec!["inc r1".to_string()],
        });
        assert!(table.contains("INC1"));
        assert_eq!(table.find("INC1").unwrap().body, vec!["inc r1".to_string()]);
    }

    #[test]
    fn unknown_name_is_absent() {
        let table = MacroTable::new();
        assert!(!table.contains("NOPE"));
        assert!(table.find("NOPE").is_none());
    }

    #[test]
    fn reset_empties_the_table() {
        let mut table = MacroTable::new();
        table.add(Macro { name: "M".to_string(), body: vec![] });
        table.reset();
        assert!(!table.contains("M"));
    }
}
