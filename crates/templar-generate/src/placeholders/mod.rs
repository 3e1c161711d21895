//! Name-to-function registry behind `@placeholder` tokens.
//!
//! Built-ins are plain function pointers keyed by lowercase name, one
//! [`Signature`] per overload; the overload is chosen by argument count.
//! User-defined placeholders live in a separate [`ExtensionRegistry`].

mod args;
mod builtins;
mod extensions;

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::errors::ResolutionError;
use crate::random::MockRandom;

pub use args::{PhoneTypeTokens, TokenCoercer, coerce_token, parse_args};
pub use extensions::ExtensionRegistry;

pub type PlaceholderFn = fn(&MockRandom, &[Value]) -> Result<Value, ResolutionError>;

/// Number of arguments an overload accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => count == expected,
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(count) => write!(f, "{count}"),
            Arity::AtLeast(min) => write!(f, "{min}+"),
        }
    }
}

/// One overload of a built-in placeholder.
#[derive(Clone, Copy)]
pub struct Signature {
    pub name: &'static str,
    pub arity: Arity,
    pub call: PlaceholderFn,
}

impl Signature {
    pub const fn new(name: &'static str, arity: Arity, call: PlaceholderFn) -> Self {
        Self { name, arity, call }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Registry of built-in placeholder functions.
#[derive(Debug, Clone)]
pub struct PlaceholderRegistry {
    functions: HashMap<String, Vec<Signature>>,
}

impl PlaceholderRegistry {
    /// Registry preloaded with the built-in catalogue.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtins::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register(&mut self, signature: Signature) {
        self.functions
            .entry(signature.name.to_lowercase())
            .or_default()
            .push(signature);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn signatures(&self, name: &str) -> &[Signature] {
        self.functions
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Calls the first overload accepting `args.len()` arguments that
    /// succeeds.
    pub fn call(
        &self,
        name: &str,
        random: &MockRandom,
        args: &[Value],
    ) -> Result<Value, ResolutionError> {
        let signatures = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| ResolutionError::UnknownPlaceholder(name.to_string()))?;

        let mut last_error = None;
        for signature in signatures
            .iter()
            .filter(|signature| signature.arity.accepts(args.len()))
        {
            match (signature.call)(random, args) {
                Ok(value) => return Ok(value),
                Err(err) => last_error = Some(err),
            }
        }

        Err(last_error.unwrap_or_else(|| ResolutionError::ArityMismatch {
            name: name.to_string(),
            arity: args.len(),
        }))
    }

    /// Registered names with their accepted arities, sorted by name.
    pub fn catalogue(&self) -> Vec<(String, Vec<Arity>)> {
        let mut entries: Vec<(String, Vec<Arity>)> = self
            .functions
            .iter()
            .map(|(name, signatures)| {
                (
                    name.clone(),
                    signatures.iter().map(|signature| signature.arity).collect(),
                )
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl Default for PlaceholderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
