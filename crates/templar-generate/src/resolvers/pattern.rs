use regex::{Captures, Regex};
use tracing::debug;

use crate::random::{ALPHANUMERIC, DIGITS, LOWERCASE, MockRandom, UPPERCASE, WORD_CHARS};
use crate::rule::MAX_REPEAT;

const DEFAULT_LENGTH: (usize, usize) = (5, 10);
const EMAIL_USER_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
const EMAIL_TLDS: &[&str] = &["com", "org", "net", "edu"];

/// Character classes the synthesiser understands, with their pools.
const CLASSES: &[(&str, &str)] = &[
    (r"\d", DIGITS),
    (r"\w", WORD_CHARS),
    ("[a-z]", LOWERCASE),
    ("[A-Z]", UPPERCASE),
    ("[0-9]", DIGITS),
];

/// Expands `/pattern/` literals into random strings shaped like the pattern.
///
/// This is a heuristic generator for the common shapes (emails, digit runs,
/// capitalised words), not a regex engine. Patterns that do not compile are
/// left in place.
#[derive(Debug, Clone)]
pub struct RegexResolver {
    scanner: Option<Regex>,
    parts: Option<Regex>,
    quantifier: Option<Regex>,
}

impl RegexResolver {
    pub fn new() -> Self {
        Self {
            scanner: Regex::new(r"/(.+?)/").ok(),
            parts: Regex::new(r"(\[A-Z\]|\[a-z\]|\[0-9\]|\\d|\\w)(?:\{(\d+)(?:,(\d+))?\})?").ok(),
            quantifier: Regex::new(r"\{(\d+)(?:,(\d+))?\}").ok(),
        }
    }

    /// Replaces every `/pattern/` span in one pass over `text`.
    pub fn resolve(&self, text: &str, random: &MockRandom) -> String {
        let Some(scanner) = &self.scanner else {
            return text.to_string();
        };
        if !text.contains('/') {
            return text.to_string();
        }
        scanner
            .replace_all(text, |caps: &Captures<'_>| {
                let pattern = &caps[1];
                if Regex::new(pattern).is_err() {
                    debug!(pattern, "pattern does not compile; keeping literal");
                    return caps[0].to_string();
                }
                self.generate(pattern, random)
            })
            .into_owned()
    }

    /// Synthesises one string for a single pattern body.
    pub fn generate(&self, pattern: &str, random: &MockRandom) -> String {
        if pattern.contains('@') && pattern.contains(r"\.") {
            let user = random.string_between(5, 10, EMAIL_USER_CHARS);
            let domain = random.string_between(3, 8, LOWERCASE);
            let tld = random.pick(EMAIL_TLDS).copied().unwrap_or("com");
            return format!("{user}@{domain}.{tld}");
        }

        if pattern.contains("[A-Z]") && pattern.contains("[a-z]") {
            return self.generate_parts(pattern, random);
        }

        for (class, pool) in CLASSES {
            if pattern.contains(class) {
                let (min, max) = self.length_for(pattern, class);
                return random.string_between(min, max, pool);
            }
        }

        random.string_between(DEFAULT_LENGTH.0, DEFAULT_LENGTH.1, ALPHANUMERIC)
    }

    /// Walks `[A-Z][a-z]{4,9}`-style sequences class by class.
    fn generate_parts(&self, pattern: &str, random: &MockRandom) -> String {
        let mut out = String::new();
        if let Some(parts) = &self.parts {
            for caps in parts.captures_iter(pattern) {
                let pool = CLASSES
                    .iter()
                    .find(|(class, _)| *class == &caps[1])
                    .map_or(ALPHANUMERIC, |(_, pool)| *pool);
                let min = caps.get(2).and_then(|m| quantity(m.as_str())).unwrap_or(1);
                let max = caps
                    .get(3)
                    .and_then(|m| quantity(m.as_str()))
                    .unwrap_or(min);
                out.push_str(&random.string_between(min, max, pool));
            }
        }
        if out.is_empty() {
            random.string_between(DEFAULT_LENGTH.0, DEFAULT_LENGTH.1, ALPHANUMERIC)
        } else {
            out
        }
    }

    /// Quantifier directly after `class`, else the first quantifier anywhere
    /// in the pattern, else the default length.
    fn length_for(&self, pattern: &str, class: &str) -> (usize, usize) {
        let Some(quantifier) = &self.quantifier else {
            return DEFAULT_LENGTH;
        };
        let attached = pattern.match_indices(class).find_map(|(idx, _)| {
            let rest = &pattern[idx + class.len()..];
            quantifier
                .captures(rest)
                .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
        });
        attached
            .or_else(|| quantifier.captures(pattern))
            .and_then(|caps| bounds(&caps))
            .unwrap_or(DEFAULT_LENGTH)
    }
}

impl Default for RegexResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn bounds(caps: &Captures<'_>) -> Option<(usize, usize)> {
    let min = quantity(caps.get(1)?.as_str())?;
    let max = match caps.get(2) {
        Some(m) => quantity(m.as_str())?,
        None => min,
    };
    Some((min, max))
}

/// A quantifier bound, ignored past [`MAX_REPEAT`].
fn quantity(text: &str) -> Option<usize> {
    let value = text.parse::<usize>().ok()?;
    i64::try_from(value)
        .is_ok_and(|value| value <= MAX_REPEAT)
        .then_some(value)
}
