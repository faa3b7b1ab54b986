//! Short identifier generation and input validation.
//!
//! [`IdGenerator`] draws fixed-length codes uniformly from a configured
//! alphabet. The random source is an injected [`StdRng`], seeded either
//! from the OS or from an explicit `u64` so tests get deterministic ids.

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::error::ShortenerError;

/// Longest accepted custom id.
pub const MAX_CUSTOM_ID_LEN: usize = 64;

/// Path segments already claimed by fixed routes.
pub const RESERVED_IDS: [&str; 4] = ["create", "analytics", "health", "openapi.json"];

/// Random short id source.
///
/// Generation does not probe the store for collisions; a collision surfaces
/// as a uniqueness violation on insert.
#[derive(Debug)]
pub struct IdGenerator {
    alphabet: Vec<char>,
    length: usize,
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Creates a generator over `alphabet` producing ids of `length` chars.
    ///
    /// Duplicate characters in `alphabet` are dropped so every symbol keeps
    /// the same probability. With `seed` set the output sequence is
    /// reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if `alphabet` is empty or `length` is zero.
    pub fn new(alphabet: &str, length: usize, seed: Option<u64>) -> anyhow::Result<Self> {
        let mut symbols: Vec<char> = Vec::with_capacity(alphabet.len());
        for c in alphabet.chars() {
            if !symbols.contains(&c) {
                symbols.push(c);
            }
        }
        anyhow::ensure!(!symbols.is_empty(), "short id alphabet must not be empty");
        anyhow::ensure!(length > 0, "short id length must be at least 1");

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            alphabet: symbols,
            length,
            rng: Mutex::new(rng),
        })
    }

    /// Returns the configured id length.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Draws a fresh id.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..self.length)
            .filter_map(|_| self.alphabet.choose(&mut *rng).copied())
            .collect()
    }
}

/// Checks that `url` is a well-formed absolute URL.
///
/// # Errors
///
/// Returns [`ShortenerError::InvalidInput`] when the URL is empty, contains
/// control characters, or does not parse.
pub fn validate_original_url(url: &str) -> Result<(), ShortenerError> {
    if url.trim().is_empty() {
        return Err(ShortenerError::InvalidInput("url is required".to_string()));
    }
    // The parser strips tabs and newlines; the raw string is stored and
    // becomes the `Location` header.
    if url.chars().any(char::is_control) {
        return Err(ShortenerError::InvalidInput(
            "url must not contain control characters".to_string(),
        ));
    }
    url::Url::parse(url)
        .map(|_| ())
        .map_err(|e| ShortenerError::InvalidInput(format!("invalid url: {e}")))
}

/// Checks a caller-chosen short id.
///
/// # Errors
///
/// Returns [`ShortenerError::InvalidInput`] when the id is too long, collides
/// with a fixed route, or contains characters outside `[A-Za-z0-9_-]`.
pub fn validate_custom_id(id: &str) -> Result<(), ShortenerError> {
    if id.is_empty() || id.len() > MAX_CUSTOM_ID_LEN {
        return Err(ShortenerError::InvalidInput(format!(
            "custom_id must be 1-{MAX_CUSTOM_ID_LEN} characters"
        )));
    }
    if RESERVED_IDS.contains(&id) {
        return Err(ShortenerError::InvalidInput(format!(
            "custom_id '{id}' is reserved"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ShortenerError::InvalidInput(
            "custom_id may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(())
}
