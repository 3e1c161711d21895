use std::sync::Arc;

use serde_json::{Map, Value};
use templar_core::ValueType;
use tracing::trace;

use crate::context::ExecutionContext;
use crate::errors::GenerationError;
use crate::executor::RuleExecutor;
use crate::model::MockOptions;
use crate::parser;
use crate::placeholders::{ExtensionRegistry, PhoneTypeTokens, PlaceholderRegistry, TokenCoercer};
use crate::random::MockRandom;
use crate::resolvers::{PlaceholderResolver, RegexResolver, Sources};

/// Recursive template evaluator.
///
/// The engine holds no per-call state: every [`MockEngine::generate`] call
/// starts from a fresh [`ExecutionContext`], so counters and cross-references
/// never leak between calls. One engine may serve several threads.
pub struct MockEngine {
    random: Arc<MockRandom>,
    placeholders: PlaceholderRegistry,
    extensions: Arc<ExtensionRegistry>,
    coercers: Vec<Box<dyn TokenCoercer>>,
    patterns: RegexResolver,
    resolver: PlaceholderResolver,
}

impl MockEngine {
    pub fn builder() -> MockEngineBuilder {
        MockEngineBuilder::default()
    }

    pub fn from_options(options: &MockOptions) -> Self {
        let random = match options.seed {
            Some(seed) => MockRandom::seeded(seed),
            None => MockRandom::new(),
        };
        Self::builder()
            .random(random.with_locale(options.locale))
            .build()
    }

    pub fn random(&self) -> &MockRandom {
        &self.random
    }

    pub fn placeholders(&self) -> &PlaceholderRegistry {
        &self.placeholders
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Generates one value from `template` in a fresh context.
    pub fn generate(&self, template: &Value) -> Value {
        let context = ExecutionContext::new();
        self.generate_in(template, &context)
    }

    /// Parses JSON text, generates once and serializes the result compactly.
    pub fn generate_json(&self, text: &str) -> Result<String, GenerationError> {
        let template = templar_core::parse(text)?;
        let output = self.generate(&template);
        Ok(templar_core::stringify(&output)?)
    }

    /// Generates `value` within an existing context.
    pub fn generate_in(&self, value: &Value, context: &ExecutionContext) -> Value {
        match value {
            Value::Object(map) => self.generate_object(map, context),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.generate_in(item, context))
                    .collect(),
            ),
            Value::String(text) => self.resolve_string(text, context),
            other => other.clone(),
        }
    }

    fn generate_object(&self, map: &Map<String, Value>, context: &ExecutionContext) -> Value {
        let executor = RuleExecutor::new(&self.random);
        let recurse = |value: &Value, context: &ExecutionContext| self.generate_in(value, context);

        let mut scope = context.clone();
        let mut output = Map::with_capacity(map.len());
        for (key, value) in map {
            let Some(value_type) = ValueType::of(value) else {
                let name = parser::strip_rule(key);
                scope.record(name, &Value::Null);
                output.insert(name.to_string(), Value::Null);
                continue;
            };

            let parsed = parser::parse(key, value_type);
            let child = scope.child(&parsed.name);
            let result = executor.execute(&parsed, value, &child, &recurse);
            trace!(path = child.path(), "property generated");

            scope.record(&parsed.name, &result);
            output.insert(parsed.name, result);
        }
        Value::Object(output)
    }

    fn resolve_string(&self, text: &str, context: &ExecutionContext) -> Value {
        let expanded = self.patterns.resolve(text, &self.random);
        let sources = Sources {
            random: &self.random,
            placeholders: &self.placeholders,
            extensions: &self.extensions,
            coercers: &self.coercers,
        };
        self.resolver.resolve(&expanded, sources, context)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEngine")
            .field("random", &self.random)
            .field("extensions", &self.extensions)
            .field("coercers", &self.coercers.len())
            .finish_non_exhaustive()
    }
}

/// Assembles a [`MockEngine`] from injected collaborators. Anything left
/// unset falls back to the process defaults.
pub struct MockEngineBuilder {
    random: Option<Arc<MockRandom>>,
    placeholders: Option<PlaceholderRegistry>,
    extensions: Option<Arc<ExtensionRegistry>>,
    coercers: Vec<Box<dyn TokenCoercer>>,
}

impl Default for MockEngineBuilder {
    fn default() -> Self {
        Self {
            random: None,
            placeholders: None,
            extensions: None,
            coercers: vec![Box::new(PhoneTypeTokens)],
        }
    }
}

impl MockEngineBuilder {
    pub fn random(mut self, random: MockRandom) -> Self {
        self.random = Some(Arc::new(random));
        self
    }

    pub fn shared_random(mut self, random: Arc<MockRandom>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn seed(self, seed: u64) -> Self {
        self.random(MockRandom::seeded(seed))
    }

    pub fn placeholders(mut self, placeholders: PlaceholderRegistry) -> Self {
        self.placeholders = Some(placeholders);
        self
    }

    pub fn extensions(mut self, extensions: Arc<ExtensionRegistry>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Adds a token coercer after the ones already configured.
    pub fn coercer(mut self, coercer: impl TokenCoercer + 'static) -> Self {
        self.coercers.push(Box::new(coercer));
        self
    }

    pub fn without_coercers(mut self) -> Self {
        self.coercers.clear();
        self
    }

    pub fn build(self) -> MockEngine {
        MockEngine {
            random: self.random.unwrap_or_default(),
            placeholders: self.placeholders.unwrap_or_default(),
            extensions: self.extensions.unwrap_or_default(),
            coercers: self.coercers,
            patterns: RegexResolver::new(),
            resolver: PlaceholderResolver::new(),
        }
    }
}
