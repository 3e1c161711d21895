//! Expansion of string leaves: `/pattern/` literals first, then
//! `@placeholder` tokens.

mod pattern;
mod placeholder;

pub use pattern::RegexResolver;
pub use placeholder::{PlaceholderResolver, Sources};
