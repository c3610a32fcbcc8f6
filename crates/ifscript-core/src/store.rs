//! The variable store (spec.md §3 "Variable Store").

use indexmap::IndexMap;

use crate::value::Value;

/// Synthetic key written when a fork completes or is left by `goto`
/// (spec.md §3, §4.4.2, glossary "Visited variable").
pub fn visited_key(fork: &str) -> String {
    format!("visited{fork}")
}

/// An ordered mapping from lowercase, whitespace-free identifier to `Value`.
///
/// Backed by `IndexMap` so iteration order matches insertion order, which
/// the evaluator's re-registration step (spec.md §4.1) and any
/// deterministic-dump tooling rely on.
#[derive(Clone, Debug, Default)]
pub struct VariableStore {
    vars: IndexMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self {
            vars: IndexMap::new(),
        }
    }

    /// Clears all variables — invoked on `load new`, on restart, and on a
    /// fresh file load (spec.md §3).
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn mark_visited(&mut self, fork: &str) {
        self.set(visited_key(fork), Value::Boolean(true));
    }

    pub fn is_visited(&self, fork: &str) -> bool {
        matches!(self.get(&visited_key(fork)), Some(Value::Boolean(true)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_then_reassign() {
        let mut store = VariableStore::new();
        store.set("x", Value::Decimal("1".parse().unwrap()));
        assert_eq!(store.get("x").unwrap().to_string(), "1");
        store.set("x", Value::Decimal("2".parse().unwrap()));
        assert_eq!(store.get("x").unwrap().to_string(), "2");
    }

    #[test]
    fn visited_round_trip() {
        let mut store = VariableStore::new();
        assert!(!store.is_visited("start"));
        store.mark_visited("start");
        assert!(store.is_visited("start"));
        assert_eq!(store.get("visitedstart"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn clear_empties_store() {
        let mut store = VariableStore::new();
        store.set("x", Value::Boolean(true));
        store.clear();
        assert!(store.is_empty());
    }
}
