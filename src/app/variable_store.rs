/// insertion-ordered store of user-defined variables `name -> expression
/// text`, and the textual substitution engine that inlines them into plot
/// equations. A stored variable is never evaluated on its own; it only ever
/// reaches the evaluator after being inlined into an equation right-hand side.
use crate::app::commands::EquationEntry;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableStore {
    order: Vec<String>,
    defs: HashMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            defs: HashMap::new(),
        }
    }

    /// Stores a definition. Redefinition replaces the expression in place,
    /// keeping the original position in iteration order (last write wins).
    pub fn insert(&mut self, name: &str, expression: &str) {
        if !self.defs.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.defs.insert(name.to_string(), expression.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.defs.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.defs[name].as_str()))
    }

    /// Rewrites every whole-word occurrence of a stored variable name in
    /// `rhs` with its parenthesized definition. One pass per variable, in
    /// insertion order, so a definition inlined early is itself rewritten by
    /// variables stored later in the iteration. Assignments therefore must
    /// appear in the script before the plot that uses them.
    pub fn substitute(&self, rhs: &str) -> String {
        let mut rewritten = rhs.to_string();
        for (name, definition) in self.iter() {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(name))).unwrap();
            let replacement = format!("({})", definition);
            rewritten = pattern
                .replace_all(&rewritten, regex::NoExpand(replacement.as_str()))
                .into_owned();
        }
        rewritten
    }

    /// Substitution applies to the right-hand side of an equation only; the
    /// label is left untouched.
    pub fn substitute_entry(&self, entry: &EquationEntry) -> EquationEntry {
        EquationEntry {
            label: entry.label.clone(),
            expression: self.substitute(&entry.expression),
        }
    }

    pub fn substitute_list(&self, list: &[EquationEntry]) -> Vec<EquationEntry> {
        list.iter().map(|entry| self.substitute_entry(entry)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_substitution_only() {
        let mut store = VariableStore::new();
        store.insert("kf", "k * exp(v)");
        // "kfb" must not be rewritten, "kf" must
        assert_eq!(store.substitute("kf + kfb"), "(k * exp(v)) + kfb");
    }

    #[test]
    fn test_substitution_parenthesizes_definition() {
        let mut store = VariableStore::new();
        store.insert("a", "b + c");
        assert_eq!(store.substitute("2 * a"), "2 * (b + c)");
    }

    #[test]
    fn test_nested_substitution_in_store_order() {
        let mut store = VariableStore::new();
        store.insert("kf", "k0 * exp(v)");
        store.insert("k0", "A * 2");
        // kf is inlined first, then the later k0 pass rewrites the inlined text
        assert_eq!(store.substitute("kf"), "((A * 2) * exp(v))");
    }

    #[test]
    fn test_redefinition_last_write_wins() {
        let mut store = VariableStore::new();
        store.insert("n", "1");
        store.insert("n", "2");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("n"), Some("2"));
        assert_eq!(store.substitute("n * x"), "(2) * x");
    }

    #[test]
    fn test_substitute_entry_leaves_label_alone() {
        let mut store = VariableStore::new();
        store.insert("i", "q / t");
        let entry = EquationEntry {
            label: "i".to_string(),
            expression: "i0 + i".to_string(),
        };
        let rewritten = store.substitute_entry(&entry);
        assert_eq!(rewritten.label, "i");
        assert_eq!(rewritten.expression, "i0 + (q / t)");
    }

    #[test]
    fn test_no_remaining_occurrence_after_substitution() {
        let mut store = VariableStore::new();
        store.insert("kf", "k * exp(-beta * (v - U))");
        store.insert("kb", "k * exp((1 - beta) * (v - U))");
        let rewritten = store.substitute("kf * c - kb * c");
        for (name, _) in store.iter() {
            let pattern = Regex::new(&format!(r"\b{}\b", name)).unwrap();
            assert!(
                !pattern.is_match(&rewritten),
                "'{}' still occurs in '{}'",
                name,
                rewritten
            );
        }
    }
}
