//! State of one population call.

use crate::random::ValueSource;
use std::collections::HashMap;

/// Per-call population state.
///
/// Tracks how often each type occurs on the path from the root to the object
/// currently being populated. Entering a type increments its count and
/// exiting decrements it, so sibling branches never see each other's
/// ancestors.
#[derive(Debug)]
pub struct PopulationContext<'a> {
    source: &'a mut ValueSource,
    depth_limit: usize,
    path_counts: HashMap<String, usize>,
    visits: HashMap<String, usize>,
    field_path: Vec<String>,
    placeholders: usize,
}

impl<'a> PopulationContext<'a> {
    /// Create a context drawing from `source`, allowing each type at most
    /// `depth_limit` times on a single path.
    pub fn new(source: &'a mut ValueSource, depth_limit: usize) -> Self {
        Self {
            source,
            depth_limit,
            path_counts: HashMap::new(),
            visits: HashMap::new(),
            field_path: Vec::new(),
            placeholders: 0,
        }
    }

    /// The session value source.
    pub fn source(&mut self) -> &mut ValueSource {
        self.source
    }

    /// Enter `type_name` on the current path.
    ///
    /// Returns `false`, leaving the path untouched, when the type already
    /// occurs `depth_limit` times; the caller then produces a placeholder.
    pub fn try_enter(&mut self, type_name: &str) -> bool {
        let count = self.path_counts.get(type_name).copied().unwrap_or(0);
        if count >= self.depth_limit {
            self.placeholders += 1;
            return false;
        }
        self.path_counts.insert(type_name.to_string(), count + 1);
        *self.visits.entry(type_name.to_string()).or_insert(0) += 1;
        true
    }

    /// Leave `type_name`, undoing the matching [`try_enter`](Self::try_enter).
    pub fn exit(&mut self, type_name: &str) {
        if let Some(count) = self.path_counts.get_mut(type_name) {
            *count -= 1;
            if *count == 0 {
                self.path_counts.remove(type_name);
            }
        }
    }

    /// Occurrences of `type_name` on the current path.
    pub fn occurrences(&self, type_name: &str) -> usize {
        self.path_counts.get(type_name).copied().unwrap_or(0)
    }

    /// Number of objects of `type_name` populated so far in this call.
    pub fn visits(&self, type_name: &str) -> usize {
        self.visits.get(type_name).copied().unwrap_or(0)
    }

    /// Number of objects currently open on the path.
    pub fn depth(&self) -> usize {
        self.path_counts.values().sum()
    }

    pub fn push_field(&mut self, name: &str) {
        self.field_path.push(name.to_string());
    }

    pub fn pop_field(&mut self) {
        self.field_path.pop();
    }

    /// Dotted path of the field being populated, `<root>` at the top level.
    pub fn current_path(&self) -> String {
        if self.field_path.is_empty() {
            "<root>".to_string()
        } else {
            self.field_path.join(".")
        }
    }

    /// Number of placeholders produced by the cycle guard.
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_respects_limit() {
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 2);

        assert!(ctx.try_enter("Node"));
        assert!(ctx.try_enter("Node"));
        assert!(!ctx.try_enter("Node"));
        assert_eq!(ctx.occurrences("Node"), 2);
        assert_eq!(ctx.placeholders(), 1);

        ctx.exit("Node");
        assert!(ctx.try_enter("Node"));
        assert_eq!(ctx.visits("Node"), 3);
    }

    #[test]
    fn test_sibling_branches_get_full_budget() {
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);

        assert!(ctx.try_enter("Person"));
        assert!(ctx.try_enter("Address"));
        ctx.exit("Address");
        assert!(ctx.try_enter("Address"));
        assert_eq!(ctx.depth(), 2);
        ctx.exit("Address");
        ctx.exit("Person");
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.occurrences("Person"), 0);
    }

    #[test]
    fn test_field_path() {
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);
        assert_eq!(ctx.current_path(), "<root>");

        ctx.push_field("address");
        ctx.push_field("street");
        assert_eq!(ctx.current_path(), "address.street");
        ctx.pop_field();
        assert_eq!(ctx.current_path(), "address");
    }
}
