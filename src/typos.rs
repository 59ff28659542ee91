use rand::Rng;

use crate::keyboard::{random_lowercase, wrong_char_for};

/// Where to mistype a word and what to hit instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypoPlan {
    /// Character index of the wrong keystroke, strictly interior to the word.
    pub position: usize,
    pub wrong_char: char,
}

/// Plan a single mistyped keystroke for a word.
///
/// The typo position is never the first or last character, so words of one or
/// two characters are never mutated and `None` is returned for them.
pub fn plan_typo(word: &str, rng: &mut impl Rng) -> Option<TypoPlan> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 2 {
        return None;
    }

    let position = rng.gen_range(1..=chars.len() - 2);
    let wrong_char = wrong_char_for(chars[position], rng);
    Some(TypoPlan {
        position,
        wrong_char,
    })
}

/// Produce a plausible near-miss spelling of a word.
///
/// Candidates cover the usual ways people misremember a word: truncated
/// endings, wrong common suffixes, a doubled middle letter, the ei/ie swap, a
/// stray trailing vowel, or a wrong first letter. Candidates equal to the
/// original or differing in length by more than 3 are discarded; if nothing
/// survives, the fallback is the word with an extra 'x'.
pub fn make_wrong_word(word: &str, rng: &mut impl Rng) -> String {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let head = |keep: usize| -> String { chars[..keep.min(n)].iter().collect() };

    const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

    let mut candidates: Vec<String> = Vec::new();

    // Missing last letter(s).
    candidates.push(if n > 2 {
        head(n - 1)
    } else {
        format!("{word}x")
    });
    candidates.push(if n > 3 { head(n - 2) } else { head(n.saturating_sub(1)) });

    // Wrong common endings.
    candidates.push(if n > 4 {
        format!("{}ing", head(n - 3))
    } else {
        format!("{word}ing")
    });
    candidates.push(if n > 3 {
        format!("{}ed", head(n - 2))
    } else {
        format!("{word}ed")
    });
    candidates.push(if word.ends_with('s') {
        head(n - 1)
    } else {
        format!("{word}s")
    });

    // Doubled letter in the middle.
    candidates.push(if n > 3 {
        let mid = n / 2;
        let mut doubled: Vec<char> = chars[..mid].to_vec();
        doubled.push(chars[mid]);
        doubled.extend_from_slice(&chars[mid..]);
        doubled.into_iter().collect()
    } else {
        format!("{word}x")
    });

    // The classic ei/ie confusion.
    candidates.push(if word.contains("ei") {
        word.replace("ei", "ie")
    } else {
        word.replace("ie", "ei")
    });

    // Random extra vowel.
    candidates.push(format!("{word}{}", VOWELS[rng.gen_range(0..VOWELS.len())]));

    // Wrong first letter.
    candidates.push(if n > 2 {
        let mut swapped = String::with_capacity(word.len());
        swapped.push(random_lowercase(rng));
        swapped.extend(chars[1..].iter());
        swapped
    } else {
        format!("{word}x")
    });

    let valid: Vec<String> = candidates
        .into_iter()
        .filter(|v| {
            v.as_str() != word && !v.is_empty() && v.chars().count().abs_diff(n) <= 3
        })
        .collect();

    if valid.is_empty() {
        format!("{word}x")
    } else {
        valid[rng.gen_range(0..valid.len())].clone()
    }
}
