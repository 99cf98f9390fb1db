//! Random password generation and strength scoring

use rand::Rng;
use serde::{Deserialize, Serialize};

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 128;

/// Character classes and length of a generated password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 20,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.clamp(MIN_LENGTH, MAX_LENGTH);
        self
    }

    fn charset(&self) -> Vec<u8> {
        let mut charset = Vec::new();

        if self.uppercase {
            charset.extend_from_slice(UPPERCASE);
        }
        if self.lowercase {
            charset.extend_from_slice(LOWERCASE);
        }
        if self.numbers {
            charset.extend_from_slice(NUMBERS);
        }
        if self.symbols {
            charset.extend_from_slice(SYMBOLS);
        }

        // No class selected falls back to lowercase
        if charset.is_empty() {
            charset.extend_from_slice(LOWERCASE);
        }

        charset
    }
}

/// Generate a password with the thread-local RNG
pub fn generate_password(options: &GeneratorOptions) -> String {
    generate_password_with(options, &mut rand::thread_rng())
}

pub fn generate_password_with<R: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut R) -> String {
    let charset = options.charset();
    (0..options.length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Coarse strength bucket for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Weak,
    Fair,
    Good,
    Strong,
    Excellent,
}

impl Strength {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=20 => Self::Weak,
            21..=40 => Self::Fair,
            41..=60 => Self::Good,
            61..=80 => Self::Strong,
            _ => Self::Excellent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
            Self::Excellent => "Excellent",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Weak => "strength-weak",
            Self::Fair => "strength-fair",
            Self::Good => "strength-good",
            Self::Strong => "strength-strong",
            Self::Excellent => "strength-excellent",
        }
    }
}

/// Score a password from 0 to 100
///
/// Up to 40 points for length, 15 for each character class present.
pub fn calculate_strength(password: &str) -> u32 {
    if password.is_empty() {
        return 0;
    }

    let mut score = (password.chars().count() as u32).min(40);

    if password.chars().any(|c| c.is_lowercase()) {
        score += 15;
    }
    if password.chars().any(|c| c.is_uppercase()) {
        score += 15;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 15;
    }
    if password.chars().any(|c| !c.is_alphanumeric()) {
        score += 15;
    }

    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_length() {
        let options = GeneratorOptions::default().with_length(32);
        assert_eq!(generate_password(&options).len(), 32);
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(GeneratorOptions::default().with_length(1).length, MIN_LENGTH);
        assert_eq!(GeneratorOptions::default().with_length(500).length, MAX_LENGTH);
    }

    #[test]
    fn test_respects_character_classes() {
        let options = GeneratorOptions {
            length: 64,
            uppercase: false,
            lowercase: false,
            numbers: true,
            symbols: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let password = generate_password_with(&options, &mut rng);
        assert!(password.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_empty_selection_falls_back_to_lowercase() {
        let options = GeneratorOptions {
            length: 16,
            uppercase: false,
            lowercase: false,
            numbers: false,
            symbols: false,
        };
        let password = generate_password(&options);
        assert!(password.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_strength() {
        assert_eq!(calculate_strength(""), 0);
        assert_eq!(calculate_strength("abcd"), 19);
        assert_eq!(Strength::from_score(calculate_strength("abcd")), Strength::Weak);
        assert_eq!(calculate_strength("Abcdefgh1!"), 70);
        assert_eq!(
            Strength::from_score(calculate_strength(&"Aa1!".repeat(10))),
            Strength::Excellent
        );
    }
}
