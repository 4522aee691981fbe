//! Fake text generation for Fabula.
//!
//! Two mechanisms live here: placeholder and pattern rewriting (`#`, `?`,
//! and a restricted regex grammar), and `#{...}` reference resolution over
//! locale stores with fallback. [`Faker`] wraps both behind a shared,
//! seedable random source.

pub mod errors;
pub mod faker;
pub mod locales;
pub mod pattern;
pub mod random;
pub mod regexify;
pub mod resolver;

pub use errors::GenerationError;
pub use faker::Faker;
pub use locales::LocaleKey;
pub use pattern::{letterify, numerify, numerify_and_letterify};
pub use random::{random_alphanumeric, random_choice, random_int, random_int64, random_repeat};
pub use regexify::{RewriteStage, regexify};
pub use resolver::{DEFAULT_MAX_DEPTH, ResolutionContext, fetch};
