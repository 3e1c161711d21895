//! Randomisation algorithms behind each [`Rule`] variant.

use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::context::ExecutionContext;
use crate::random::MockRandom;
use crate::rule::{MAX_REPEAT, ParsedRule, Rule};

/// Generates a nested template value in the given context.
pub type Recurse<'r> = &'r dyn Fn(&Value, &ExecutionContext) -> Value;

/// Suffix keeping sequential-pick indices apart from numeric counters on the
/// same path.
const INDEX_SUFFIX: &str = "[index]";

pub struct RuleExecutor<'a> {
    random: &'a MockRandom,
}

impl<'a> RuleExecutor<'a> {
    pub fn new(random: &'a MockRandom) -> Self {
        Self { random }
    }

    /// Applies `parsed` to `value`. `context` is the property's own context.
    ///
    /// Missing or invalid rules fall through to `recurse`; a rule applied to
    /// a value of the wrong shape returns the value unchanged.
    pub fn execute(
        &self,
        parsed: &ParsedRule,
        value: &Value,
        context: &ExecutionContext,
        recurse: Recurse<'_>,
    ) -> Value {
        let Some(rule) = parsed.rule else {
            return recurse(value, context);
        };
        if let Err(err) = rule.validate() {
            debug!(property = %parsed.name, ?rule, error = %err, "invalid rule; generating without it");
            return recurse(value, context);
        }
        trace!(path = context.path(), ?rule, "executing rule");

        match rule {
            Rule::StringRange { min, max } => repeat_text(value, self.random.integer(min, max)),
            Rule::StringCount { count } => repeat_text(value, count),
            Rule::NumberIncrement { step } => self.increment(value, step, context),
            Rule::NumberRange { min, max } => Value::from(self.random.integer(min, max)),
            Rule::FloatRange {
                min,
                max,
                dmin,
                dmax,
            } => self.float(
                self.random.integer(min, max),
                self.random.integer(dmin, dmax),
                value,
            ),
            Rule::FloatCount { count, dmin, dmax } => {
                self.float(count, self.random.integer(dmin, dmax), value)
            }
            Rule::FloatRangeFixed { min, max, dcount } => {
                self.float(self.random.integer(min, max), dcount, value)
            }
            Rule::FloatFixed { count, dcount } => self.float(count, dcount, value),
            Rule::BooleanRandom => Value::Bool(self.random.boolean()),
            Rule::BooleanWeighted { min, max } => {
                // validate() guarantees a positive total.
                let probability = min as f64 / (min as f64 + max as f64);
                Value::Bool(self.random.chance(probability))
            }
            Rule::ObjectCount { count } => self.pick_properties(value, count, context, recurse),
            Rule::ObjectRange { min, max } => {
                let count = self.random.integer(min, max);
                self.pick_properties(value, count, context, recurse)
            }
            Rule::ArrayPickOne => match value {
                Value::Array(items) if !items.is_empty() => {
                    recurse(&items[self.random.index(items.len())], context)
                }
                _ => value.clone(),
            },
            Rule::ArrayPickSequential { step } => match value {
                Value::Array(items) if !items.is_empty() => {
                    let key = format!("{}{INDEX_SUFFIX}", context.path());
                    let index = context.next_counter(&key, 0, step);
                    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
                    let slot = usize::try_from(index.rem_euclid(len)).unwrap_or(0);
                    recurse(&items[slot], context)
                }
                _ => value.clone(),
            },
            Rule::ArrayRepeatRange { min, max } => {
                let count = self.random.integer(min, max);
                self.repeat_picks(value, count, context, recurse)
            }
            Rule::ArrayRepeatCount { count } => self.repeat_picks(value, count, context, recurse),
        }
    }

    /// Running counter keyed by the property path. Numeric literals seed the
    /// counter; anything else counts `step, 2 * step, ...`.
    fn increment(&self, value: &Value, step: i64, context: &ExecutionContext) -> Value {
        let key = context.path();
        let seed = match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float as i64))
                .unwrap_or(0),
            _ => step,
        };
        Value::from(context.next_counter(key, seed, step))
    }

    /// `integer` plus a random fraction with exactly `places` digits.
    fn float(&self, integer: i64, places: i64, original: &Value) -> Value {
        let places = places.clamp(0, crate::rule::MAX_DECIMAL_PLACES);
        let scale = 10_i64.pow(places as u32);
        let fraction = self.random.integer(0, scale - 1);
        let raw = integer as f64 + fraction as f64 / scale as f64;

        let digits = places as usize;
        format!("{raw:.digits$}")
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| original.clone(), Value::Number)
    }

    /// Keeps `count` randomly chosen properties in source order and generates
    /// the restricted object.
    fn pick_properties(
        &self,
        value: &Value,
        count: i64,
        context: &ExecutionContext,
        recurse: Recurse<'_>,
    ) -> Value {
        let Value::Object(map) = value else {
            return value.clone();
        };
        let amount = usize::try_from(count).unwrap_or(0);
        let chosen = self.random.sample_indices(map.len(), amount);

        let mut restricted = Map::with_capacity(chosen.len());
        let mut chosen = chosen.into_iter().peekable();
        for (idx, (key, entry)) in map.iter().enumerate() {
            if chosen.peek() == Some(&idx) {
                chosen.next();
                restricted.insert(key.clone(), entry.clone());
            }
        }
        recurse(&Value::Object(restricted), context)
    }

    /// `count` independent picks from the source array, each generated on
    /// its own.
    fn repeat_picks(
        &self,
        value: &Value,
        count: i64,
        context: &ExecutionContext,
        recurse: Recurse<'_>,
    ) -> Value {
        let Value::Array(items) = value else {
            return value.clone();
        };
        if items.is_empty() {
            return Value::Array(Vec::new());
        }
        let count = usize::try_from(count.clamp(0, MAX_REPEAT)).unwrap_or(0);
        let picks = (0..count)
            .map(|_| recurse(&items[self.random.index(items.len())], context))
            .collect();
        Value::Array(picks)
    }
}

/// Repeats the text form of `value`. Counts past [`MAX_REPEAT`] or a byte
/// length overflowing `usize` leave the value as it was.
fn repeat_text(value: &Value, count: i64) -> Value {
    let Some(count) = (count <= MAX_REPEAT)
        .then(|| usize::try_from(count).ok())
        .flatten()
    else {
        return value.clone();
    };
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    match text.len().checked_mul(count) {
        Some(_) => Value::String(text.repeat(count)),
        None => value.clone(),
    }
}
