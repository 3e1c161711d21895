use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::errors::ResolutionError;

pub type ExtensionFn = Arc<dyn Fn() -> Result<Value, String> + Send + Sync>;
pub type ExtensionArgsFn = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

#[derive(Default)]
struct Extensions {
    plain: HashMap<String, ExtensionFn>,
    with_args: HashMap<String, ExtensionArgsFn>,
}

/// User-registered placeholders, consulted after the built-ins.
///
/// Names are case-insensitive. A name may carry both a no-argument and an
/// argument-taking form; registering again replaces the previous form.
#[derive(Default)]
pub struct ExtensionRegistry {
    inner: RwLock<Extensions>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Extensions> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Extensions> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register<F>(&self, name: &str, generator: F)
    where
        F: Fn() -> Result<Value, String> + Send + Sync + 'static,
    {
        self.write()
            .plain
            .insert(name.to_lowercase(), Arc::new(generator));
    }

    pub fn register_with_args<F>(&self, name: &str, generator: F)
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.write()
            .with_args
            .insert(name.to_lowercase(), Arc::new(generator));
    }

    /// Invokes the extension registered under `name`.
    ///
    /// Without arguments the plain form wins and the argument form is called
    /// with an empty slice as a fallback. With arguments only the argument
    /// form applies.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ResolutionError> {
        let key = name.to_lowercase();
        let (plain, with_args) = {
            let guard = self.read();
            (
                guard.plain.get(&key).cloned(),
                guard.with_args.get(&key).cloned(),
            )
        };

        let outcome = match (args.is_empty(), plain, with_args) {
            (true, Some(generator), _) => generator(),
            (_, _, Some(generator)) => generator(args),
            (false, Some(_), None) => {
                return Err(ResolutionError::ArityMismatch {
                    name: name.to_string(),
                    arity: args.len(),
                });
            }
            (_, None, None) => return Err(ResolutionError::UnknownPlaceholder(name.to_string())),
        };

        outcome.map_err(|message| ResolutionError::Extension {
            name: name.to_string(),
            message,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        let guard = self.read();
        guard.plain.contains_key(&key) || guard.with_args.contains_key(&key)
    }

    /// Removes both forms; returns whether anything was registered.
    pub fn remove(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        let mut guard = self.write();
        let plain = guard.plain.remove(&key).is_some();
        let with_args = guard.with_args.remove(&key).is_some();
        plain || with_args
    }

    pub fn clear(&self) {
        let mut guard = self.write();
        guard.plain.clear();
        guard.with_args.clear();
    }

    /// Registered names, sorted and deduplicated.
    pub fn names(&self) -> Vec<String> {
        let guard = self.read();
        let mut names: Vec<String> = guard
            .plain
            .keys()
            .chain(guard.with_args.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ExtensionRegistry;
    use crate::errors::ResolutionError;

    #[test]
    fn names_are_case_insensitive() {
        let registry = ExtensionRegistry::new();
        registry.register("Greeting", || Ok(json!("hi")));
        assert!(registry.contains("GREETING"));
        assert_eq!(registry.call("greeting", &[]), Ok(json!("hi")));
        assert_eq!(registry.names(), vec!["greeting".to_string()]);
    }

    #[test]
    fn args_form_serves_empty_calls_when_alone() {
        let registry = ExtensionRegistry::new();
        registry.register_with_args("count", |args| Ok(json!(args.len())));
        assert_eq!(registry.call("count", &[]), Ok(json!(0)));
        assert_eq!(registry.call("count", &[json!(1), json!(2)]), Ok(json!(2)));
    }

    #[test]
    fn failures_and_removal() {
        let registry = ExtensionRegistry::new();
        registry.register("broken", || Err("boom".to_string()));
        assert!(matches!(
            registry.call("broken", &[]),
            Err(ResolutionError::Extension { .. })
        ));
        assert!(matches!(
            registry.call("broken", &[json!(1)]),
            Err(ResolutionError::ArityMismatch { arity: 1, .. })
        ));
        assert!(registry.remove("BROKEN"));
        assert!(!registry.remove("broken"));
        assert_eq!(
            registry.call("broken", &[]),
            Err(ResolutionError::UnknownPlaceholder("broken".to_string()))
        );
    }
}
