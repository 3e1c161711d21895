//! Rule-driven template evaluator for templar.
//!
//! A template is a JSON-like tree whose keys may carry a generation rule
//! (`"name|rule"`) and whose string leaves may embed `/pattern/` literals and
//! `@placeholder(args)` tokens. [`MockEngine`] walks the tree and produces a
//! structurally matching value with every rule and placeholder resolved.

pub mod context;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod model;
pub mod parser;
pub mod placeholders;
pub mod random;
pub mod resolvers;
pub mod rule;

pub use context::ExecutionContext;
pub use engine::{MockEngine, MockEngineBuilder};
pub use errors::{GenerationError, ResolutionError, RuleError};
pub use model::MockOptions;
pub use placeholders::{ExtensionRegistry, PhoneTypeTokens, PlaceholderRegistry, TokenCoercer};
pub use random::{LocaleKey, MockRandom};
pub use rule::{ParsedRule, Rule};
