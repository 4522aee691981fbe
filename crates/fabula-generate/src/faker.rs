use std::sync::{Arc, Mutex, OnceLock, RwLock};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use fabula_core::LocaleStore;

use crate::errors::GenerationError;
use crate::locales::LocaleKey;
use crate::pattern;
use crate::random;
use crate::regexify;
use crate::resolver::{self, DEFAULT_MAX_DEPTH, ResolutionContext};

/// Thread-safe entry point bundling a random source with locale selection.
///
/// The general-purpose source is seeded once and serialized behind a mutex.
/// The active locale can be swapped between calls; each resolution works on
/// the snapshot it started with.
#[derive(Debug)]
pub struct Faker {
    active: RwLock<Arc<LocaleStore>>,
    fallback: Arc<LocaleStore>,
    rng: Mutex<ChaCha8Rng>,
    max_depth: usize,
}

impl Faker {
    /// Faker resolving against `fallback` only.
    pub fn new(fallback: LocaleStore) -> Self {
        let fallback = Arc::new(fallback);
        Self {
            active: RwLock::new(Arc::clone(&fallback)),
            fallback,
            rng: Mutex::new(ChaCha8Rng::from_rng(&mut rand::rng())),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_locale(active: LocaleStore, fallback: LocaleStore) -> Self {
        let faker = Self::new(fallback);
        Self {
            active: RwLock::new(Arc::new(active)),
            ..faker
        }
    }

    /// Faker for a bundled locale, falling back to [`LocaleKey::FALLBACK`].
    pub fn from_key(key: LocaleKey) -> Result<Self, GenerationError> {
        let fallback = LocaleKey::FALLBACK.load()?;
        if key == LocaleKey::FALLBACK {
            return Ok(Self::new(fallback));
        }
        Ok(Self::with_locale(key.load()?, fallback))
    }

    /// Process-wide default faker using the bundled fallback locale.
    pub fn global() -> Result<&'static Faker, GenerationError> {
        static GLOBAL: OnceLock<Faker> = OnceLock::new();
        if let Some(faker) = GLOBAL.get() {
            return Ok(faker);
        }
        let faker = Self::from_key(LocaleKey::FALLBACK)?;
        Ok(GLOBAL.get_or_init(|| faker))
    }

    /// Replace the random source with one seeded from `seed`.
    pub fn seeded(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Reference nesting limit; clamped to at least 1 so plain values resolve.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
            ..self
        }
    }

    /// Swap the active locale. In-flight resolutions keep their snapshot.
    pub fn set_locale(&self, store: LocaleStore) -> Result<(), GenerationError> {
        let mut active = self
            .active
            .write()
            .map_err(|_| GenerationError::Poisoned("active locale".to_string()))?;
        info!(from = %active.name, to = %store.name, "switching active locale");
        *active = Arc::new(store);
        Ok(())
    }

    pub fn set_locale_key(&self, key: LocaleKey) -> Result<(), GenerationError> {
        self.set_locale(key.load()?)
    }

    pub fn active_locale_name(&self) -> Result<String, GenerationError> {
        Ok(self.active_snapshot()?.name.clone())
    }

    pub fn fetch(&self, path: &str) -> Result<String, GenerationError> {
        let active = self.active_snapshot()?;
        let ctx =
            ResolutionContext::new(&active, &self.fallback).with_max_depth(self.max_depth);
        self.with_rng(|rng| resolver::fetch(rng, path, &ctx))?
    }

    /// [`Faker::fetch`] followed by `#` and `?` placeholder substitution.
    pub fn fetch_bothified(&self, path: &str) -> Result<String, GenerationError> {
        let value = self.fetch(path)?;
        self.numerify_and_letterify(&value)
    }

    pub fn regexify(&self, pattern: &str) -> Result<String, GenerationError> {
        self.with_rng(|rng| regexify::regexify(rng, pattern))?
    }

    pub fn numerify(&self, value: &str) -> Result<String, GenerationError> {
        self.with_rng(|rng| pattern::numerify(rng, value))
    }

    pub fn letterify(&self, value: &str) -> Result<String, GenerationError> {
        self.with_rng(|rng| pattern::letterify(rng, value))
    }

    pub fn numerify_and_letterify(&self, value: &str) -> Result<String, GenerationError> {
        self.with_rng(|rng| pattern::numerify_and_letterify(rng, value))
    }

    pub fn random_int(&self, min: i32, max: i32) -> Result<i32, GenerationError> {
        self.with_rng(|rng| random::random_int(rng, min, max))
    }

    pub fn random_int64(&self, min: i64, max: i64) -> Result<i64, GenerationError> {
        self.with_rng(|rng| random::random_int64(rng, min, max))
    }

    pub fn random_repeat(&self, value: &str, min: i32, max: i32) -> Result<String, GenerationError> {
        self.with_rng(|rng| random::random_repeat(rng, value, min, max))
    }

    pub fn random_choice<T: Clone>(&self, items: &[T]) -> Result<Option<T>, GenerationError> {
        self.with_rng(|rng| random::random_choice(rng, items).cloned())
    }

    /// Does not touch the seeded source; see [`random::random_alphanumeric`].
    pub fn random_alphanumeric(&self, len: usize) -> String {
        random::random_alphanumeric(len)
    }

    fn active_snapshot(&self) -> Result<Arc<LocaleStore>, GenerationError> {
        let active = self
            .active
            .read()
            .map_err(|_| GenerationError::Poisoned("active locale".to_string()))?;
        Ok(Arc::clone(&active))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> Result<T, GenerationError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GenerationError::Poisoned("random source".to_string()))?;
        Ok(f(&mut *rng))
    }
}
