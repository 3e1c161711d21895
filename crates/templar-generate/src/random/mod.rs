//! Default random-primitive provider.
//!
//! Every random draw made by the engine, the rule executor, the pattern
//! resolver and the built-in placeholders goes through one [`MockRandom`], so
//! a seeded instance makes a whole generation run reproducible.

mod locales;

use std::fmt::{self, Write as _};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use fake::Fake;
use fake::faker::address::raw::{CityName, StateName, StreetName};
use fake::faker::company::raw::{CompanyName, Profession};
use fake::faker::internet::raw::FreeEmailProvider;
use fake::faker::lorem::raw::Word;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::{EN, PT_BR, ZH_CN};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use locales::LocaleKey;

pub const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const WORD_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

const DOMAINS: &[&str] = &["example.com", "test.org", "sample.net", "demo.io", "mock.dev"];
const TLDS: &[&str] = &["com", "org", "net", "edu", "gov", "io", "co", "me"];

/// Phone number families, each with its own dialing prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneKind {
    Mobile,
    Landline,
    TollFree,
    Premium,
}

impl PhoneKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "mobile" => Some(Self::Mobile),
            "landline" => Some(Self::Landline),
            "toll_free" | "tollfree" => Some(Self::TollFree),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Landline => "landline",
            Self::TollFree => "toll_free",
            Self::Premium => "premium",
        }
    }

    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Mobile => &["134", "135", "136", "137", "138", "139"],
            Self::Landline => &["010", "020", "021", "022", "023", "024"],
            Self::TollFree => &["800", "888", "877", "866", "855", "844"],
            Self::Premium => &["900", "976", "970", "540", "550", "560"],
        }
    }
}

/// Thread-safe random source plus the primitive generators built on it.
pub struct MockRandom {
    rng: Mutex<Box<dyn RngCore + Send>>,
    locale: LocaleKey,
}

macro_rules! localized {
    ($self:ident, $faker:ident) => {{
        let mut guard = $self.rng();
        let rng = &mut **guard;
        let value: String = match $self.locale {
            LocaleKey::EnUs => $faker(EN).fake_with_rng(rng),
            LocaleKey::PtBr => $faker(PT_BR).fake_with_rng(rng),
            LocaleKey::ZhCn => $faker(ZH_CN).fake_with_rng(rng),
        };
        value
    }};
}

impl MockRandom {
    /// Unseeded provider backed by ChaCha8 seeded from the thread RNG.
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
            locale: LocaleKey::default(),
        }
    }

    pub fn with_locale(mut self, locale: LocaleKey) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> LocaleKey {
        self.locale
    }

    fn rng(&self) -> MutexGuard<'_, Box<dyn RngCore + Send>> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Basic draws

    pub fn boolean(&self) -> bool {
        self.rng().random_bool(0.5)
    }

    /// True with the given probability, clamped to `[0, 1]`.
    pub fn chance(&self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng().random_bool(probability.clamp(0.0, 1.0))
    }

    /// Uniform integer in `[min, max]`; bounds are swapped when inverted.
    pub fn integer(&self, min: i64, max: i64) -> i64 {
        let (min, max) = ordered(min, max);
        if min == max {
            return min;
        }
        self.rng().random_range(min..=max)
    }

    pub fn natural(&self, min: i64, max: i64) -> i64 {
        self.integer(min.max(0), max.max(0))
    }

    /// Uniform float in `[min, max)`.
    pub fn float(&self, min: f64, max: f64) -> f64 {
        let unit: f64 = self.rng().random_range(0.0..1.0);
        min + unit * (max - min)
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    pub fn index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng().random_range(0..len)
    }

    /// `amount` distinct indices out of `0..len`, in ascending order.
    pub fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        let mut picked = rand::seq::index::sample(&mut **self.rng(), len, amount).into_vec();
        picked.sort_unstable();
        picked
    }

    pub fn character(&self, pool: &str) -> Option<char> {
        let chars: Vec<char> = pool.chars().collect();
        if chars.is_empty() {
            return None;
        }
        Some(chars[self.index(chars.len())])
    }

    pub fn string(&self, len: usize, pool: &str) -> String {
        let chars: Vec<char> = pool.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let mut guard = self.rng();
        (0..len)
            .map(|_| chars[guard.random_range(0..chars.len())])
            .collect()
    }

    pub fn string_between(&self, min: usize, max: usize, pool: &str) -> String {
        let len = self.integer(to_i64(min), to_i64(max));
        self.string(usize::try_from(len).unwrap_or(0), pool)
    }

    /// Inclusive arithmetic progression from `start` towards `stop`.
    pub fn range(&self, start: i64, stop: i64, step: i64) -> Vec<i64> {
        let mut values = Vec::new();
        if step == 0 || (step > 0 && start > stop) || (step < 0 && start < stop) {
            return values;
        }
        let mut current = start;
        while (step > 0 && current <= stop) || (step < 0 && current >= stop) {
            values.push(current);
            match current.checked_add(step) {
                Some(next) => current = next,
                None => break,
            }
        }
        values
    }

    // Date and time

    /// Random date between the Unix epoch and now. `None` for a bad format.
    pub fn date(&self, format: &str) -> Option<String> {
        format_datetime(&self.random_datetime(), format)
    }

    pub fn time(&self, format: &str) -> Option<String> {
        let (hour, minute, second) = {
            let mut guard = self.rng();
            (
                guard.random_range(0..24),
                guard.random_range(0..60),
                guard.random_range(0..60),
            )
        };
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        let date = NaiveDate::from_ymd_opt(1970, 1, 1)?;
        format_datetime(&NaiveDateTime::new(date, time), format)
    }

    pub fn datetime(&self, format: &str) -> Option<String> {
        format_datetime(&self.random_datetime(), format)
    }

    pub fn now(&self, format: &str) -> Option<String> {
        format_datetime(&Utc::now().naive_utc(), format)
    }

    fn random_datetime(&self) -> NaiveDateTime {
        let seconds = self.integer(0, Utc::now().timestamp());
        DateTime::from_timestamp(seconds, 0)
            .unwrap_or_default()
            .naive_utc()
    }

    // Text

    pub fn word(&self) -> String {
        localized!(self, Word)
    }

    /// A localized word cut or padded to a length in `[min, max]`.
    pub fn word_between(&self, min: usize, max: usize) -> String {
        let base = self.word();
        let target = usize::try_from(self.integer(to_i64(min), to_i64(max))).unwrap_or(0);
        let current = base.chars().count();
        if current >= target {
            base.chars().take(target).collect()
        } else {
            let padding = self.string(target - current, LOWERCASE);
            format!("{base}{padding}")
        }
    }

    pub fn sentence(&self, min: usize, max: usize) -> String {
        let count = self.integer(to_i64(min), to_i64(max));
        let words: Vec<String> = (0..count).map(|_| self.word()).collect();
        format!("{}.", capitalize(&words.join(" ")))
    }

    pub fn paragraph(&self, min: usize, max: usize) -> String {
        let count = self.integer(to_i64(min), to_i64(max));
        let sentences: Vec<String> = (0..count).map(|_| self.sentence(12, 18)).collect();
        sentences.join(" ")
    }

    pub fn title(&self, min: usize, max: usize) -> String {
        let count = self.integer(to_i64(min), to_i64(max));
        let words: Vec<String> = (0..count).map(|_| capitalize(&self.word())).collect();
        words.join(" ")
    }

    // Names

    pub fn first(&self) -> String {
        localized!(self, FirstName)
    }

    pub fn last(&self) -> String {
        localized!(self, LastName)
    }

    pub fn name(&self) -> String {
        let first = self.first();
        let last = self.last();
        format!("{first} {last}")
    }

    // Web

    pub fn url(&self) -> String {
        let protocol = if self.boolean() { "http" } else { "https" };
        format!("{protocol}://{}", self.domain())
    }

    pub fn domain(&self) -> String {
        DOMAINS[self.index(DOMAINS.len())].to_string()
    }

    pub fn email(&self) -> String {
        let user = self.string_between(5, 11, LOWERCASE);
        format!("{user}@{}", self.domain())
    }

    pub fn ip(&self) -> String {
        let mut guard = self.rng();
        let octets: Vec<String> = (0..4)
            .map(|_| guard.random_range(0..=255_u8).to_string())
            .collect();
        octets.join(".")
    }

    pub fn tld(&self) -> String {
        TLDS[self.index(TLDS.len())].to_string()
    }

    // Miscellaneous

    pub fn guid(&self) -> String {
        let mut bytes = [0_u8; 16];
        self.rng().fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }

    pub fn id(&self) -> String {
        self.string(24, "abcdefghijklmnopqrstuvwxyz0123456789")
    }

    pub fn color(&self) -> String {
        let mut guard = self.rng();
        let (r, g, b): (u8, u8, u8) = (
            guard.random_range(0..=255),
            guard.random_range(0..=255),
            guard.random_range(0..=255),
        );
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    // Localized catalogue

    pub fn city(&self) -> String {
        localized!(self, CityName)
    }

    pub fn province(&self) -> String {
        localized!(self, StateName)
    }

    pub fn company(&self) -> String {
        localized!(self, CompanyName)
    }

    pub fn profession(&self) -> String {
        localized!(self, Profession)
    }

    pub fn street_name(&self) -> String {
        localized!(self, StreetName)
    }

    pub fn email_domain(&self) -> String {
        localized!(self, FreeEmailProvider)
    }

    /// Phone number from a `#`-digit format, optionally led by a dialing
    /// prefix of the given kind.
    pub fn phone(&self, format: Option<&str>, kind: Option<PhoneKind>) -> String {
        let format = format.unwrap_or(match kind {
            Some(_) => "###-####",
            None => "###-###-####",
        });
        let digits: String = {
            let mut guard = self.rng();
            format
                .chars()
                .map(|ch| {
                    if ch == '#' {
                        char::from(b'0' + guard.random_range(0..10_u8))
                    } else {
                        ch
                    }
                })
                .collect()
        };
        match kind {
            Some(kind) => {
                let prefixes = kind.prefixes();
                format!("{}-{digits}", prefixes[self.index(prefixes.len())])
            }
            None => digits,
        }
    }

    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.index(items.len()))
    }
}

impl Default for MockRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRandom")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Formats with either a strftime pattern or Java-style tokens
/// (`yyyy-MM-dd HH:mm:ss`). Returns `None` for patterns chrono rejects.
pub fn format_datetime(value: &NaiveDateTime, pattern: &str) -> Option<String> {
    let strftime = to_strftime(pattern);
    let items: Vec<Item<'_>> = StrftimeItems::new(&strftime).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", value.format_with_items(items.into_iter())).ok()?;
    Some(out)
}

fn to_strftime(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut quoted = false;
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        if ch == '\'' {
            quoted = !quoted;
            idx += 1;
            continue;
        }
        if quoted || !ch.is_ascii_alphabetic() {
            out.push(ch);
            idx += 1;
            continue;
        }
        let run = chars[idx..].iter().take_while(|&&next| next == ch).count();
        let spec = match (ch, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('E', _) => "%a",
            _ => "",
        };
        if spec.is_empty() {
            out.extend(std::iter::repeat_n(ch, run));
        } else {
            out.push_str(spec);
        }
        idx += run;
    }
    out
}
