use serde_json::{Number, Value};

use crate::random::PhoneKind;

/// Converts an unquoted placeholder argument the built-in coercion does not
/// recognise into a typed value.
pub trait TokenCoercer: Send + Sync {
    fn coerce(&self, token: &str) -> Option<Value>;
}

impl<F> TokenCoercer for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn coerce(&self, token: &str) -> Option<Value> {
        self(token)
    }
}

/// Maps phone-type codes (`mobile`, `PT.M`, `tollfree`, ...) to the kind
/// names understood by the `phone` placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneTypeTokens;

impl TokenCoercer for PhoneTypeTokens {
    fn coerce(&self, token: &str) -> Option<Value> {
        let upper = token.to_ascii_uppercase();
        let code = upper
            .strip_prefix("PT.")
            .or_else(|| upper.strip_prefix("PHONETYPE."))
            .unwrap_or(&upper);
        let kind = match code {
            "M" => PhoneKind::Mobile,
            "L" => PhoneKind::Landline,
            "TF" => PhoneKind::TollFree,
            "P" => PhoneKind::Premium,
            other => PhoneKind::parse(other)?,
        };
        Some(Value::String(kind.as_str().to_string()))
    }
}

/// Splits a raw `a, 'b', 3` argument list and coerces every token.
pub fn parse_args(raw: &str, coercers: &[Box<dyn TokenCoercer>]) -> Vec<Value> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|token| coerce_token(token.trim(), coercers))
        .collect()
}

/// Quoted text, then integer, float, boolean, registered coercers and
/// finally the raw token.
pub fn coerce_token(token: &str, coercers: &[Box<dyn TokenCoercer>]) -> Value {
    if let Some(inner) = unquote(token) {
        return Value::String(inner.to_string());
    }
    if let Ok(int) = token.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = token.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    coercers
        .iter()
        .find_map(|coercer| coercer.coerce(token))
        .unwrap_or_else(|| Value::String(token.to_string()))
}

fn unquote(token: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        token
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}
