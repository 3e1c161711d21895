use serde_json::{Number, Value};

use crate::errors::ResolutionError;
use crate::placeholders::{Arity, PlaceholderRegistry, Signature};
use crate::random::{ALPHANUMERIC, MockRandom, PhoneKind, capitalize};
use crate::rule::MAX_REPEAT;

const INT_MIN: i64 = i32::MIN as i64;
const INT_MAX: i64 = i32::MAX as i64;
const FLOAT_BOUND: f64 = 9_007_199_254_740_992.0;
const STRING_LENGTH: usize = 10;
const DATE_FORMAT: &str = "yyyy-MM-dd";
const TIME_FORMAT: &str = "HH:mm:ss";
const DATETIME_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

type Outcome = Result<Value, ResolutionError>;

const BUILTINS: &[Signature] = &[
    Signature::new("boolean", Arity::Exact(0), |random, _| {
        Ok(Value::Bool(random.boolean()))
    }),
    Signature::new("boolean", Arity::Exact(1), |random, args| {
        let probability = float_arg("boolean", args, 0)?;
        Ok(Value::Bool(random.chance(probability)))
    }),
    Signature::new("natural", Arity::Exact(0), |random, _| {
        Ok(Value::from(random.natural(0, INT_MAX)))
    }),
    Signature::new("natural", Arity::Exact(1), |random, args| {
        let min = int_arg("natural", args, 0)?;
        Ok(Value::from(random.natural(min, INT_MAX)))
    }),
    Signature::new("natural", Arity::Exact(2), |random, args| {
        let (min, max) = (int_arg("natural", args, 0)?, int_arg("natural", args, 1)?);
        Ok(Value::from(random.natural(min, max)))
    }),
    Signature::new("integer", Arity::Exact(0), |random, _| {
        Ok(Value::from(random.integer(INT_MIN, INT_MAX)))
    }),
    Signature::new("integer", Arity::Exact(1), |random, args| {
        let min = int_arg("integer", args, 0)?;
        Ok(Value::from(random.integer(min, INT_MAX)))
    }),
    Signature::new("integer", Arity::Exact(2), |random, args| {
        let (min, max) = (int_arg("integer", args, 0)?, int_arg("integer", args, 1)?);
        Ok(Value::from(random.integer(min, max)))
    }),
    Signature::new("float", Arity::Exact(0), |random, _| {
        float_value("float", random.float(-FLOAT_BOUND, FLOAT_BOUND))
    }),
    Signature::new("float", Arity::Exact(1), |random, args| {
        let min = float_arg("float", args, 0)?;
        float_value("float", random.float(min, FLOAT_BOUND))
    }),
    Signature::new("float", Arity::Exact(2), |random, args| {
        let (min, max) = (float_arg("float", args, 0)?, float_arg("float", args, 1)?);
        float_value("float", random.float(min, max))
    }),
    Signature::new("character", Arity::Exact(0), |random, _| {
        character("character", random, ALPHANUMERIC)
    }),
    Signature::new("character", Arity::Exact(1), |random, args| {
        let pool = str_arg("character", args, 0)?;
        character("character", random, &pool)
    }),
    Signature::new("string", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.string(STRING_LENGTH, ALPHANUMERIC)))
    }),
    Signature::new("string", Arity::Exact(1), |random, args| {
        let len = count_arg("string", args, 0)?;
        Ok(Value::String(random.string(len, ALPHANUMERIC)))
    }),
    Signature::new("string", Arity::Exact(2), |random, args| {
        let len = count_arg("string", args, 0)?;
        let pool = str_arg("string", args, 1)?;
        if pool.is_empty() {
            return Err(ResolutionError::invalid_argument("string", "empty pool"));
        }
        Ok(Value::String(random.string(len, &pool)))
    }),
    Signature::new("range", Arity::Exact(2), |random, args| {
        let (start, stop) = (int_arg("range", args, 0)?, int_arg("range", args, 1)?);
        range("range", random, start, stop, 1)
    }),
    Signature::new("range", Arity::Exact(3), |random, args| {
        let (start, stop) = (int_arg("range", args, 0)?, int_arg("range", args, 1)?);
        let step = int_arg("range", args, 2)?;
        if step <= 0 {
            return Err(ResolutionError::invalid_argument("range", "step must be positive"));
        }
        range("range", random, start, stop, step)
    }),
    Signature::new("date", Arity::Exact(0), |random, _| {
        formatted("date", random.date(DATE_FORMAT))
    }),
    Signature::new("date", Arity::Exact(1), |random, args| {
        let format = str_arg("date", args, 0)?;
        formatted("date", random.date(&format))
    }),
    Signature::new("time", Arity::Exact(0), |random, _| {
        formatted("time", random.time(TIME_FORMAT))
    }),
    Signature::new("time", Arity::Exact(1), |random, args| {
        let format = str_arg("time", args, 0)?;
        formatted("time", random.time(&format))
    }),
    Signature::new("datetime", Arity::Exact(0), |random, _| {
        formatted("datetime", random.datetime(DATETIME_FORMAT))
    }),
    Signature::new("datetime", Arity::Exact(1), |random, args| {
        let format = str_arg("datetime", args, 0)?;
        formatted("datetime", random.datetime(&format))
    }),
    Signature::new("now", Arity::Exact(0), |random, _| {
        formatted("now", random.now(DATETIME_FORMAT))
    }),
    Signature::new("now", Arity::Exact(1), |random, args| {
        let format = str_arg("now", args, 0)?;
        formatted("now", random.now(&format))
    }),
    Signature::new("word", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.word()))
    }),
    Signature::new("word", Arity::Exact(2), |random, args| {
        let (min, max) = (count_arg("word", args, 0)?, count_arg("word", args, 1)?);
        Ok(Value::String(random.word_between(min, max)))
    }),
    Signature::new("sentence", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.sentence(12, 18)))
    }),
    Signature::new("sentence", Arity::Exact(2), |random, args| {
        let (min, max) = (count_arg("sentence", args, 0)?, count_arg("sentence", args, 1)?);
        Ok(Value::String(random.sentence(min, max)))
    }),
    Signature::new("paragraph", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.paragraph(3, 7)))
    }),
    Signature::new("paragraph", Arity::Exact(2), |random, args| {
        let (min, max) = (
            count_arg("paragraph", args, 0)?,
            count_arg("paragraph", args, 1)?,
        );
        Ok(Value::String(random.paragraph(min, max)))
    }),
    Signature::new("title", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.title(3, 7)))
    }),
    Signature::new("title", Arity::Exact(2), |random, args| {
        let (min, max) = (count_arg("title", args, 0)?, count_arg("title", args, 1)?);
        Ok(Value::String(random.title(min, max)))
    }),
    Signature::new("first", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.first()))
    }),
    Signature::new("last", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.last()))
    }),
    Signature::new("name", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.name()))
    }),
    Signature::new("url", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.url()))
    }),
    Signature::new("domain", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.domain()))
    }),
    Signature::new("email", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.email()))
    }),
    Signature::new("ip", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.ip()))
    }),
    Signature::new("tld", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.tld()))
    }),
    Signature::new("capitalize", Arity::Exact(1), |_, args| {
        Ok(Value::String(capitalize(&text_arg("capitalize", args, 0)?)))
    }),
    Signature::new("upper", Arity::Exact(1), |_, args| {
        Ok(Value::String(text_arg("upper", args, 0)?.to_uppercase()))
    }),
    Signature::new("lower", Arity::Exact(1), |_, args| {
        Ok(Value::String(text_arg("lower", args, 0)?.to_lowercase()))
    }),
    Signature::new("pick", Arity::AtLeast(1), |random, args| {
        random
            .pick(args)
            .cloned()
            .ok_or_else(|| ResolutionError::invalid_argument("pick", "nothing to pick from"))
    }),
    Signature::new("guid", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.guid()))
    }),
    Signature::new("uuid", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.guid()))
    }),
    Signature::new("id", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.id()))
    }),
    Signature::new("color", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.color()))
    }),
    Signature::new("city", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.city()))
    }),
    Signature::new("province", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.province()))
    }),
    Signature::new("company", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.company()))
    }),
    Signature::new("profession", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.profession()))
    }),
    Signature::new("streetname", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.street_name()))
    }),
    Signature::new("emaildomain", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.email_domain()))
    }),
    Signature::new("phone", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.phone(None, None)))
    }),
    Signature::new("phone", Arity::Exact(1), |random, args| phone("phone", random, args)),
    Signature::new("phone", Arity::Exact(2), |random, args| phone("phone", random, args)),
    Signature::new("phonenumber", Arity::Exact(0), |random, _| {
        Ok(Value::String(random.phone(None, None)))
    }),
    Signature::new("phonenumber", Arity::Exact(1), |random, args| {
        phone("phonenumber", random, args)
    }),
    Signature::new("phonenumber", Arity::Exact(2), |random, args| {
        phone("phonenumber", random, args)
    }),
];

pub fn register(registry: &mut PlaceholderRegistry) {
    for signature in BUILTINS {
        registry.register(*signature);
    }
}

/// `phone(kind)`, `phone(format)` or `phone(format, kind)`.
fn phone(name: &str, random: &MockRandom, args: &[Value]) -> Outcome {
    let first = str_arg(name, args, 0)?;
    let (format, kind) = match args.len() {
        1 => match PhoneKind::parse(&first) {
            Some(kind) => (None, Some(kind)),
            None => (Some(first), None),
        },
        _ => {
            let kind = str_arg(name, args, 1)?;
            let kind = PhoneKind::parse(&kind).ok_or_else(|| {
                ResolutionError::invalid_argument(name, format!("unknown phone type '{kind}'"))
            })?;
            (Some(first), Some(kind))
        }
    };
    Ok(Value::String(random.phone(format.as_deref(), kind)))
}

fn range(name: &str, random: &MockRandom, start: i64, stop: i64, step: i64) -> Outcome {
    // step > 0 here; an inverted range is empty.
    let span = i128::from(stop) - i128::from(start);
    if span / i128::from(step) >= i128::from(MAX_REPEAT) {
        return Err(ResolutionError::invalid_argument(
            name,
            format!("more than {MAX_REPEAT} elements"),
        ));
    }
    Ok(Value::from(random.range(start, stop, step)))
}

fn character(name: &str, random: &MockRandom, pool: &str) -> Outcome {
    random
        .character(pool)
        .map(|ch| Value::String(ch.to_string()))
        .ok_or_else(|| ResolutionError::invalid_argument(name, "empty pool"))
}

fn formatted(name: &str, value: Option<String>) -> Outcome {
    value
        .map(Value::String)
        .ok_or_else(|| ResolutionError::invalid_argument(name, "unsupported format"))
}

fn float_value(name: &str, value: f64) -> Outcome {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| ResolutionError::invalid_argument(name, "non-finite result"))
}

fn arg<'a>(name: &str, args: &'a [Value], idx: usize) -> Result<&'a Value, ResolutionError> {
    args.get(idx)
        .ok_or_else(|| ResolutionError::invalid_argument(name, format!("missing argument {idx}")))
}

fn int_arg(name: &str, args: &[Value], idx: usize) -> Result<i64, ResolutionError> {
    let value = arg(name, args, idx)?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        })
        .ok_or_else(|| ResolutionError::invalid_argument(name, format!("expected integer, got {value}")))
}

/// A length or count in `0..=MAX_REPEAT`.
fn count_arg(name: &str, args: &[Value], idx: usize) -> Result<usize, ResolutionError> {
    let value = int_arg(name, args, idx)?;
    if value > MAX_REPEAT {
        return Err(ResolutionError::invalid_argument(
            name,
            format!("{value} exceeds the limit of {MAX_REPEAT}"),
        ));
    }
    usize::try_from(value).map_err(|_| {
        ResolutionError::invalid_argument(name, format!("expected non-negative integer, got {value}"))
    })
}

fn float_arg(name: &str, args: &[Value], idx: usize) -> Result<f64, ResolutionError> {
    let value = arg(name, args, idx)?;
    value
        .as_f64()
        .ok_or_else(|| ResolutionError::invalid_argument(name, format!("expected number, got {value}")))
}

fn str_arg(name: &str, args: &[Value], idx: usize) -> Result<String, ResolutionError> {
    match arg(name, args, idx)? {
        Value::String(text) => Ok(text.clone()),
        other => Err(ResolutionError::invalid_argument(
            name,
            format!("expected string, got {other}"),
        )),
    }
}

/// Any scalar rendered as text; used by the string transforms.
fn text_arg(name: &str, args: &[Value], idx: usize) -> Result<String, ResolutionError> {
    match arg(name, args, idx)? {
        Value::String(text) => Ok(text.clone()),
        Value::Null => Err(ResolutionError::invalid_argument(name, "expected text, got null")),
        other => Ok(other.to_string()),
    }
}
