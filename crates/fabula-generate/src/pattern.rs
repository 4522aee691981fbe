use rand::RngCore;

use crate::random::{random_digit, random_nonzero_digit, random_upper_letter};

/// Placeholder replaced by a random digit.
pub const DIGIT_PLACEHOLDER: char = '#';
/// Placeholder replaced by a random uppercase letter.
pub const LETTER_PLACEHOLDER: char = '?';

/// Replace every `#` with a random digit. The first replacement is never `0`
/// so numbers like `###-##` do not start with a leading zero.
pub fn numerify(rng: &mut dyn RngCore, value: &str) -> String {
    let mut first = true;
    value
        .chars()
        .map(|ch| {
            if ch != DIGIT_PLACEHOLDER {
                return ch;
            }
            if first {
                first = false;
                random_nonzero_digit(rng)
            } else {
                random_digit(rng)
            }
        })
        .collect()
}

/// Replace every `?` with a random uppercase ASCII letter.
pub fn letterify(rng: &mut dyn RngCore, value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch == LETTER_PLACEHOLDER {
                random_upper_letter(rng)
            } else {
                ch
            }
        })
        .collect()
}

/// [`numerify`] for pattern text: `#` inside a `[...]` class is a class
/// member, not a placeholder, and is kept.
pub(crate) fn numerify_pattern(rng: &mut dyn RngCore, pattern: &str) -> String {
    let mut first = true;
    let mut in_class = false;
    let mut escaped = false;
    let mut out = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if escaped {
            escaped = false;
            out.push(ch);
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            DIGIT_PLACEHOLDER if !in_class => {
                out.push(if first {
                    first = false;
                    random_nonzero_digit(rng)
                } else {
                    random_digit(rng)
                });
                continue;
            }
            _ => {}
        }
        out.push(ch);
    }
    out
}

/// [`numerify`] then [`letterify`].
pub fn numerify_and_letterify(rng: &mut dyn RngCore, value: &str) -> String {
    let numbered = numerify(rng, value);
    letterify(rng, &numbered)
}
