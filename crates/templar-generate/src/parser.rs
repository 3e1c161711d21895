//! `name|rule` key grammar.
//!
//! Rule text is interpreted according to the kind of the value it decorates:
//! `"3"` repeats a string, picks three object properties, or builds an array
//! of three picks. Malformed rule text never fails; it yields no rule.

use templar_core::ValueType;

use crate::rule::{ParsedRule, Rule};

/// Parses a template key into its output name and optional rule.
pub fn parse(key: &str, value_type: ValueType) -> ParsedRule {
    match split_key(key) {
        Some((name, rule)) => ParsedRule {
            name: name.to_string(),
            rule: parse_rule(rule, value_type),
        },
        None => ParsedRule::plain(key),
    }
}

/// Splits `name|rule` on the first `|` that leaves both sides non-empty.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.match_indices('|')
        .map(|(idx, _)| idx)
        .find(|&idx| idx > 0 && idx + 1 < key.len())
        .map(|idx| (&key[..idx], &key[idx + 1..]))
}

/// Returns the output name for a key without interpreting its rule.
pub fn strip_rule(key: &str) -> &str {
    split_key(key).map_or(key, |(name, _)| name)
}

pub fn parse_rule(rule: &str, value_type: ValueType) -> Option<Rule> {
    if let Some(step) = rule.strip_prefix('+') {
        let step = step.parse::<i64>().unwrap_or(1);
        return Some(match value_type {
            ValueType::Array => Rule::ArrayPickSequential { step },
            _ => Rule::NumberIncrement { step },
        });
    }

    if rule.contains('.') {
        return parse_float_rule(rule);
    }

    if rule.contains('-') {
        let (min, max) = parse_range(rule)?;
        return Some(match value_type {
            ValueType::String => Rule::StringRange { min, max },
            ValueType::Number => Rule::NumberRange { min, max },
            ValueType::Boolean => Rule::BooleanWeighted { min, max },
            ValueType::Object => Rule::ObjectRange { min, max },
            ValueType::Array => Rule::ArrayRepeatRange { min, max },
        });
    }

    let count = rule.parse::<i64>().ok()?;
    Some(match value_type {
        ValueType::String => Rule::StringCount { count },
        ValueType::Number => Rule::NumberRange {
            min: count,
            max: count,
        },
        // Only `|1` flips a coin; other counts leave the boolean alone.
        ValueType::Boolean if count == 1 => Rule::BooleanRandom,
        ValueType::Boolean => return None,
        ValueType::Object => Rule::ObjectCount { count },
        ValueType::Array if count == 1 => Rule::ArrayPickOne,
        ValueType::Array => Rule::ArrayRepeatCount { count },
    })
}

/// Either side of a float rule: `min-max` or a bare count.
enum Bound {
    Range(i64, i64),
    Count(i64),
}

fn parse_float_rule(rule: &str) -> Option<Rule> {
    let (int_part, dec_part) = rule.split_once('.')?;
    if dec_part.contains('.') {
        return None;
    }

    let rule = match (parse_bound(int_part)?, parse_bound(dec_part)?) {
        (Bound::Range(min, max), Bound::Range(dmin, dmax)) => Rule::FloatRange {
            min,
            max,
            dmin,
            dmax,
        },
        (Bound::Count(count), Bound::Range(dmin, dmax)) => Rule::FloatCount { count, dmin, dmax },
        (Bound::Range(min, max), Bound::Count(dcount)) => {
            Rule::FloatRangeFixed { min, max, dcount }
        }
        (Bound::Count(count), Bound::Count(dcount)) => Rule::FloatFixed { count, dcount },
    };
    Some(rule)
}

fn parse_bound(text: &str) -> Option<Bound> {
    if text.contains('-') {
        parse_range(text).map(|(min, max)| Bound::Range(min, max))
    } else {
        text.parse::<i64>().ok().map(Bound::Count)
    }
}

fn parse_range(text: &str) -> Option<(i64, i64)> {
    let mut parts = text.split('-');
    let min = parts.next()?.parse::<i64>().ok()?;
    let max = parts.next()?.parse::<i64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((min, max))
}
