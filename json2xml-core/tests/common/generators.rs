//! Stochastic input variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("JSON2XML_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Run of JSON whitespace (geometric length, usually empty)
    pub fn whitespace(&mut self) -> String {
        const WS: [char; 4] = [' ', '\t', '\n', '\r'];
        (0..self.geometric(0.4))
            .map(|_| WS[self.rng.gen_range(0..WS.len())])
            .collect()
    }

    /// Read buffer capacity; small values split tokens across refills
    pub fn buffer_capacity(&mut self) -> usize {
        if self.chance(0.5) {
            self.rng.gen_range(1..=8)
        } else {
            8 * 1024
        }
    }

    /// Insert random whitespace around structural characters.
    ///
    /// String literals are copied untouched, so the document's meaning
    /// never changes.
    pub fn sprinkle_whitespace(&mut self, json: &str) -> String {
        let mut out = String::with_capacity(json.len() * 2);
        let mut in_string = false;
        let mut escaped = false;
        out.push_str(&self.whitespace());
        for ch in json.chars() {
            if in_string {
                out.push(ch);
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '{' | '}' | '[' | ']' | ',' | ':' => {
                    out.push_str(&self.whitespace());
                    out.push(ch);
                    out.push_str(&self.whitespace());
                }
                '"' => {
                    in_string = true;
                    out.push(ch);
                }
                _ => out.push(ch),
            }
        }
        out.push_str(&self.whitespace());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.whitespace(), g2.whitespace());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_strings_untouched() {
        let mut gen = Gen::new(7);
        for _ in 0..50 {
            let out = gen.sprinkle_whitespace(r#"{"a, b":"x\":[y]"}"#);
            assert!(out.contains(r#""a, b""#), "{out:?}");
            assert!(out.contains(r#""x\":[y]""#), "{out:?}");
        }
    }
}
