use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

/// State shared by every context derived from one top-level generation.
#[derive(Debug, Default)]
struct SharedState {
    counters: HashMap<String, i64>,
    root_resolved: HashMap<String, Value>,
}

/// Scope of one node during template evaluation.
///
/// `path` is the dotted chain of property names from the root (list indices
/// never appear in it). Increment counters and the root store of resolved
/// values are shared by all contexts of one generation run, so repeated
/// siblings at the same path continue each other's counters. The local store
/// is copied when a child is derived: values recorded in one branch are not
/// visible to a sibling branch except through their absolute path.
///
/// Cloning a context shares the run state and copies the local store.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    path: String,
    shared: Rc<RefCell<SharedState>>,
    local_resolved: HashMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn child(&self, name: &str) -> Self {
        Self {
            path: self.counter_key(name),
            shared: Rc::clone(&self.shared),
            local_resolved: self.local_resolved.clone(),
        }
    }

    /// Absolute key of a property below this context.
    pub fn counter_key(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    /// Returns the counter under `key` and advances it by `step`.
    ///
    /// The first call for a key seeds the counter with `seed` and returns it.
    pub fn next_counter(&self, key: &str, seed: i64, step: i64) -> i64 {
        let mut shared = self.shared.borrow_mut();
        let counter = shared.counters.entry(key.to_string()).or_insert(seed);
        let current = *counter;
        *counter = current.saturating_add(step);
        current
    }

    pub fn counter(&self, key: &str) -> Option<i64> {
        self.shared.borrow().counters.get(key).copied()
    }

    /// Records a generated property value under `name` locally and under its
    /// absolute path in the run-wide store.
    pub fn record(&mut self, name: &str, value: &Value) {
        let absolute = self.counter_key(name);
        self.shared
            .borrow_mut()
            .root_resolved
            .insert(absolute, value.clone());
        self.local_resolved.insert(name.to_string(), value.clone());
    }

    pub fn resolved(&self, name: &str) -> Option<Value> {
        self.local_resolved.get(name).cloned()
    }

    pub fn resolved_absolute(&self, path: &str) -> Option<Value> {
        self.shared.borrow().root_resolved.get(path).cloned()
    }

    /// Looks up a reference: dotted names are absolute paths, plain names are
    /// local to this scope.
    pub fn lookup(&self, reference: &str) -> Option<Value> {
        if reference.contains('.') {
            self.resolved_absolute(reference)
        } else {
            self.resolved(reference)
        }
    }
}
