//! Password hashing and the strength rules new passwords have to meet.

use crate::config::SecurityPolicy;
use argon2::{
    password_hash::{rand_core::CryptoRngCore, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const MAX_SIMILARITY: f64 = 0.7;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "123456789", "12345678", "password", "qwerty", "qwerty123", "1q2w3e4r",
    "1234567890", "password1", "password123", "abc12345", "abcd1234", "iloveyou", "admin123",
    "welcome1", "letmein1", "monkey123", "dragon12", "football1", "baseball1", "sunshine1",
    "princess1", "passw0rd", "p@ssw0rd", "trustno1", "master123", "qwertyuiop", "asdfghjkl",
    "zxcvbnm1", "superman1", "michael1", "shadow12", "whatever1", "starwars1", "computer1",
    "internet1", "samsung1", "charlie1", "jennifer1", "hello123", "test1234", "login123",
    "changeme1", "secret123", "aa123456", "a1b2c3d4", "q1w2e3r4", "1qaz2wsx", "zaq12wsx",
    "mathhint1",
];

pub fn hash_password(
    password: &str,
    rng: &mut impl CryptoRngCore,
) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(rng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(hash) = PasswordHash::new(hash) else {
        warn!("stored password hash could not be parsed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

/// Checks `password` against the policy and returns one message per broken
/// rule. `attributes` are the user's username and email.
pub fn validate_password(
    password: &str,
    policy: &SecurityPolicy,
    attributes: &[&str],
) -> Vec<String> {
    let mut messages = Vec::new();

    if password.chars().count() < policy.password_min_length {
        messages.push(format!(
            "This password is too short. It must contain at least {} characters.",
            policy.password_min_length
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        messages.push("This password is entirely numeric.".to_owned());
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        messages.push("This password is too common.".to_owned());
    }

    if attributes
        .iter()
        .any(|attribute| too_similar(&lowered, &attribute.to_lowercase()))
    {
        messages.push("The password is too similar to your personal information.".to_owned());
    }

    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        messages.push("The password must contain both letters and digits.".to_owned());
    }

    messages
}

/// The attribute is compared whole and split on non alphanumeric characters,
/// so `taro.yamada@example.com` also matches against `taro` and `yamada`.
fn too_similar(password: &str, attribute: &str) -> bool {
    if attribute.is_empty() {
        return false;
    }

    std::iter::once(attribute)
        .chain(attribute.split(|c: char| !c.is_alphanumeric()))
        .filter(|part| part.chars().count() >= 3)
        .any(|part| similarity(password, part) >= MAX_SIMILARITY)
}

/// Ratio of matching characters in the style of a sequence matcher:
/// `2 * M / (len(a) + len(b))` where `M` is found by repeatedly taking the
/// longest common substring.
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_substring(a, b);

    if len == 0 {
        return 0;
    }

    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        let mut current = vec![0usize; b.len() + 1];

        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                current[j] = previous[j - 1] + 1;

                if current[j] > best.2 {
                    best = (i - current[j], j - current[j], current[j]);
                }
            }
        }

        previous = current;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn policy() -> SecurityPolicy {
        SecurityPolicy::default()
    }

    #[test]
    fn hash_round_trip() {
        let hash = hash_password("s3cret-pass", &mut OsRng).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("s3cret-pasS", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not a hash"));
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_password("kuma2024tree", &policy(), &["taro", "taro@example.com"]).is_empty());
    }

    #[test]
    fn short_numeric_password_breaks_several_rules() {
        let messages = validate_password("1234", &policy(), &[]);

        assert!(messages.iter().any(|m| m.contains("too short")));
        assert!(messages.iter().any(|m| m.contains("entirely numeric")));
        assert!(messages.iter().any(|m| m.contains("letters and digits")));
    }

    #[test]
    fn common_password_is_rejected() {
        let messages = validate_password("Password123", &policy(), &[]);

        assert!(messages.iter().any(|m| m.contains("too common")));
    }

    #[test]
    fn password_similar_to_username_is_rejected() {
        let messages = validate_password("yamada123", &policy(), &["yamada", "yamada@example.com"]);

        assert!(messages.iter().any(|m| m.contains("too similar")));
    }

    #[test]
    fn similarity_matches_sequence_ratio() {
        assert!((similarity("abcd", "abcd") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("abcd", "wxyz").abs() < f64::EPSILON);
        assert!((similarity("abcd", "bcde") - 0.75).abs() < f64::EPSILON);
    }
}
