//! Random value generation shared by the built-in sanitizers

use rand::distributions::Alphanumeric;
use rand::Rng;

const VOWELS: &[&str] = &["a", "e", "i", "o", "u"];
const CONSONANTS: &[&str] = &[
    "b", "c", "d", "g", "h", "j", "k", "l", "m", "n", "p", "r", "s", "t", "v", "w", "tr", "cr",
    "br", "fr", "th", "dr", "ch", "ph", "wr", "st", "sp", "sw", "pr", "sl", "cl", "sh",
];

/// Pronounceable lowercase word of exactly `length` characters, built from
/// alternating consonant and vowel clusters.
pub fn word(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut word = String::with_capacity(length + 2);
    while word.len() < length {
        word.push_str(CONSONANTS[rng.gen_range(0..CONSONANTS.len())]);
        word.push_str(VOWELS[rng.gen_range(0..VOWELS.len())]);
    }
    word.truncate(length);
    word
}

/// Alphanumeric string that always starts with a lowercase letter, suitable
/// for machine-readable inputs.
pub fn name(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(length);
    out.push(rng.gen_range(b'a'..=b'z') as char);
    while out.len() < length {
        out.push(rng.sample(Alphanumeric) as char);
    }
    out
}

/// Plain alphanumeric string.
pub fn string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
