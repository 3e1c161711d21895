use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::errors::ResolutionError;
use crate::placeholders::{ExtensionRegistry, PlaceholderRegistry, TokenCoercer, parse_args};
use crate::random::MockRandom;

const TOKEN: &str = r"@([A-Za-z][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)(?:\(([^)]*)\))?";

/// Everything a placeholder may resolve against.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub random: &'a MockRandom,
    pub placeholders: &'a PlaceholderRegistry,
    pub extensions: &'a ExtensionRegistry,
    pub coercers: &'a [Box<dyn TokenCoercer>],
}

/// Expands `@name` and `@name(args)` tokens inside string leaves.
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    token: Option<Regex>,
    single: Option<Regex>,
}

impl PlaceholderResolver {
    pub fn new() -> Self {
        Self {
            token: Regex::new(TOKEN).ok(),
            single: Regex::new(&format!("^{TOKEN}$")).ok(),
        }
    }

    /// Resolves every token in `text`.
    ///
    /// A string consisting of exactly one token (ignoring surrounding
    /// whitespace) yields the resolved value with its own JSON type; anything
    /// else yields a string. Tokens that cannot be resolved stay as written.
    pub fn resolve(&self, text: &str, sources: Sources<'_>, context: &ExecutionContext) -> Value {
        let (Some(token), Some(single)) = (&self.token, &self.single) else {
            return Value::String(text.to_string());
        };
        if !text.contains('@') {
            return Value::String(text.to_string());
        }

        if let Some(caps) = single.captures(text.trim()) {
            return match self.resolve_token(&caps, sources, context) {
                Ok(value) => value,
                Err(_) => Value::String(text.to_string()),
            };
        }

        let rendered = token.replace_all(text, |caps: &Captures<'_>| {
            match self.resolve_token(caps, sources, context) {
                Ok(Value::String(resolved)) => resolved,
                Ok(other) => other.to_string(),
                Err(_) => caps[0].to_string(),
            }
        });
        Value::String(rendered.into_owned())
    }

    /// Single fallback point: every failure is logged here and reported to
    /// the caller, which keeps the literal token.
    fn resolve_token(
        &self,
        caps: &Captures<'_>,
        sources: Sources<'_>,
        context: &ExecutionContext,
    ) -> Result<Value, ResolutionError> {
        let name = &caps[1];
        let raw_args = caps.get(2).map_or("", |m| m.as_str());
        let args = parse_args(raw_args, sources.coercers);

        let outcome = lookup(name, &args, sources, context);
        if let Err(err) = &outcome {
            debug!(token = &caps[0], error = %err, "placeholder left unresolved");
        }
        outcome
    }
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Cross-reference first, then the built-in catalogue, then extensions.
fn lookup(
    name: &str,
    args: &[Value],
    sources: Sources<'_>,
    context: &ExecutionContext,
) -> Result<Value, ResolutionError> {
    if args.is_empty() {
        if let Some(value) = context.lookup(name) {
            return Ok(value);
        }
    }

    if sources.placeholders.contains(name) {
        match sources.placeholders.call(name, sources.random, args) {
            Ok(value) => return Ok(value),
            Err(err) if !sources.extensions.contains(name) => return Err(err),
            Err(_) => {}
        }
    }

    sources.extensions.call(name, args)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{PlaceholderResolver, Sources};
    use crate::context::ExecutionContext;
    use crate::placeholders::{ExtensionRegistry, PlaceholderRegistry};
    use crate::random::MockRandom;

    fn resolve(text: &str, context: &ExecutionContext) -> Value {
        let random = MockRandom::seeded(4);
        let placeholders = PlaceholderRegistry::new();
        let extensions = ExtensionRegistry::new();
        let sources = Sources {
            random: &random,
            placeholders: &placeholders,
            extensions: &extensions,
            coercers: &[],
        };
        PlaceholderResolver::new().resolve(text, sources, context)
    }

    #[test]
    fn single_token_keeps_its_type() {
        let value = resolve("@integer(5, 5)", &ExecutionContext::new());
        assert_eq!(value, json!(5));
        let value = resolve("  @boolean  ", &ExecutionContext::new());
        assert!(value.is_boolean());
    }

    #[test]
    fn tokens_inside_text_render_as_text() {
        let value = resolve("n=@integer(7,7) @lower('AB')", &ExecutionContext::new());
        assert_eq!(value, json!("n=7 ab"));
    }

    #[test]
    fn unknown_tokens_stay_literal() {
        let context = ExecutionContext::new();
        assert_eq!(resolve("@totallyMadeUp", &context), json!("@totallyMadeUp"));
        assert_eq!(resolve("x @nope(1) y", &context), json!("x @nope(1) y"));
        assert_eq!(resolve("me@", &context), json!("me@"));
    }

    #[test]
    fn references_resolve_before_builtins() {
        let mut context = ExecutionContext::new();
        context.record("name", &json!({"first": "Ana"}));
        assert_eq!(resolve("@name", &context), json!({"first": "Ana"}));
        assert_eq!(resolve("hi @name", &context), json!(r#"hi {"first":"Ana"}"#));
    }
}
