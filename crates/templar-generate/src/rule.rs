use crate::errors::RuleError;

/// Largest fractional digit count a float rule may request.
pub const MAX_DECIMAL_PLACES: i64 = 10;

/// Largest repeat count a string or array rule may request, and the largest
/// length or element count a built-in placeholder will produce.
pub const MAX_REPEAT: i64 = 10_000;

/// Generation directive parsed from the `|rule` suffix of a template key.
///
/// Each variant corresponds to one (syntax shape, value kind) pair; the same
/// rule text maps to different variants depending on the value it decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `'name|min-max': "text"` repeats the string a random number of times.
    StringRange { min: i64, max: i64 },
    /// `'name|count': "text"` repeats the string exactly `count` times.
    StringCount { count: i64 },
    /// `'name|+step': 1` is a running counter seeded by the literal.
    NumberIncrement { step: i64 },
    /// `'name|min-max': 1` draws an integer in `[min, max]`.
    NumberRange { min: i64, max: i64 },
    /// `'name|min-max.dmin-dmax': 1`
    FloatRange { min: i64, max: i64, dmin: i64, dmax: i64 },
    /// `'name|count.dmin-dmax': 1`
    FloatCount { count: i64, dmin: i64, dmax: i64 },
    /// `'name|min-max.dcount': 1`
    FloatRangeFixed { min: i64, max: i64, dcount: i64 },
    /// `'name|count.dcount': 1`
    FloatFixed { count: i64, dcount: i64 },
    /// `'name|1': true` flips a fair coin.
    BooleanRandom,
    /// `'name|min-max': true` yields true with probability `min / (min + max)`.
    BooleanWeighted { min: i64, max: i64 },
    /// `'name|count': {..}` keeps `count` random properties.
    ObjectCount { count: i64 },
    /// `'name|min-max': {..}` keeps between `min` and `max` random properties.
    ObjectRange { min: i64, max: i64 },
    /// `'name|1': [..]` replaces the array by one of its elements.
    ArrayPickOne,
    /// `'name|+step': [..]` walks the array across repeated generations.
    ArrayPickSequential { step: i64 },
    /// `'name|min-max': [..]` builds an array of random picks.
    ArrayRepeatRange { min: i64, max: i64 },
    /// `'name|count': [..]` builds an array of exactly `count` random picks.
    ArrayRepeatCount { count: i64 },
}

impl Rule {
    pub fn validate(&self) -> Result<(), RuleError> {
        match *self {
            Rule::StringRange { min, max } | Rule::ArrayRepeatRange { min, max } => {
                non_negative(min)?;
                ordered(min, max)?;
                repeat_limit(max)
            }
            Rule::StringCount { count } | Rule::ArrayRepeatCount { count } => {
                non_negative(count)?;
                repeat_limit(count)
            }
            // Property counts clamp to the number of keys.
            Rule::ObjectRange { min, max } => {
                non_negative(min)?;
                non_negative(max)?;
                ordered(min, max)
            }
            Rule::ObjectCount { count } => non_negative(count),
            Rule::NumberIncrement { step } | Rule::ArrayPickSequential { step } => {
                if step == 0 {
                    Err(RuleError::ZeroStep)
                } else {
                    Ok(())
                }
            }
            Rule::NumberRange { min, max } => ordered(min, max),
            Rule::FloatRange {
                min,
                max,
                dmin,
                dmax,
            } => {
                ordered(min, max)?;
                decimal_range(dmin, dmax)
            }
            Rule::FloatCount { dmin, dmax, .. } => decimal_range(dmin, dmax),
            Rule::FloatRangeFixed { min, max, dcount } => {
                ordered(min, max)?;
                decimal_places(dcount)
            }
            Rule::FloatFixed { dcount, .. } => decimal_places(dcount),
            Rule::BooleanRandom | Rule::ArrayPickOne => Ok(()),
            Rule::BooleanWeighted { min, max } => {
                non_negative(min)?;
                non_negative(max)?;
                if min.saturating_add(max) > 0 {
                    Ok(())
                } else {
                    Err(RuleError::ZeroWeight)
                }
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A template key split into its output name and optional rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub name: String,
    pub rule: Option<Rule>,
}

impl ParsedRule {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule: None,
        }
    }
}

fn non_negative(value: i64) -> Result<(), RuleError> {
    if value < 0 {
        Err(RuleError::NegativeBound(value))
    } else {
        Ok(())
    }
}

fn ordered(min: i64, max: i64) -> Result<(), RuleError> {
    if min > max {
        Err(RuleError::InvertedRange { min, max })
    } else {
        Ok(())
    }
}

fn repeat_limit(value: i64) -> Result<(), RuleError> {
    if value > MAX_REPEAT {
        Err(RuleError::RepeatLimit(value))
    } else {
        Ok(())
    }
}

fn decimal_places(value: i64) -> Result<(), RuleError> {
    if (0..=MAX_DECIMAL_PLACES).contains(&value) {
        Ok(())
    } else {
        Err(RuleError::DecimalPlaces(value))
    }
}

fn decimal_range(dmin: i64, dmax: i64) -> Result<(), RuleError> {
    decimal_places(dmin)?;
    decimal_places(dmax)?;
    ordered(dmin, dmax)
}
