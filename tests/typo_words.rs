use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use retype::keyboard::{adjacent_keys, wrong_char_for};
use retype::typos::{make_wrong_word, plan_typo};

#[test]
fn typo_position_is_strictly_interior() {
    let mut positions = HashSet::new();

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let typo = plan_typo("testing", &mut rng).expect("7-char word should get a typo");
        assert!(
            (1..=5).contains(&typo.position),
            "typo at position {} would hit the first or last character",
            typo.position
        );
        positions.insert(typo.position);
    }

    assert!(
        positions.len() >= 3,
        "expected the typo position to vary across seeds"
    );
}

#[test]
fn short_words_are_never_mutated() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(plan_typo("ab", &mut rng), None);
    assert_eq!(plan_typo("a", &mut rng), None);
    assert_eq!(plan_typo("", &mut rng), None);
}

#[test]
fn wrong_char_preserves_case_and_stays_a_letter() {
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);

        let upper = wrong_char_for('A', &mut rng);
        assert!(upper.is_ascii_uppercase(), "got {upper:?} for 'A'");

        let lower = wrong_char_for('s', &mut rng);
        assert!(lower.is_ascii_lowercase(), "got {lower:?} for 's'");

        // Non-letters fall back to a random lowercase letter.
        let digit = wrong_char_for('3', &mut rng);
        assert!(digit.is_ascii_lowercase(), "got {digit:?} for '3'");
    }
}

#[test]
fn adjacency_table_matches_qwerty_neighbors() {
    assert_eq!(adjacent_keys('q'), Some("wa"));
    assert_eq!(adjacent_keys('a'), Some("qwsz"));
    assert_eq!(adjacent_keys('p'), Some("ol"));
    assert_eq!(adjacent_keys('m'), Some("njk"));
    assert_eq!(adjacent_keys('0'), None);

    for c in 'a'..='z' {
        let neighbors = adjacent_keys(c).expect("every letter has neighbors");
        assert!(!neighbors.is_empty());
        assert!(
            !neighbors.contains(c),
            "{c} must not be its own neighbor"
        );
        assert!(neighbors.chars().all(|n| n.is_ascii_lowercase()));
    }
}

#[test]
fn wrong_word_never_matches_original_and_stays_close() {
    let words = ["because", "testing", "keyboard", "the", "receive", "miss"];

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        for word in words {
            let wrong = make_wrong_word(word, &mut rng);
            assert_ne!(wrong, word, "variant must differ from the original");
            assert!(!wrong.is_empty());
            assert!(
                wrong.chars().count().abs_diff(word.chars().count()) <= 3,
                "variant {wrong:?} strays too far from {word:?}"
            );
        }
    }
}
