use rand::Rng;

/// Physically neighboring keys on a standard QWERTY layout, one entry per
/// letter. Used to bias simulated typos toward plausible fat-finger errors.
pub fn adjacent_keys(c: char) -> Option<&'static str> {
    let neighbors = match c {
        'q' => "wa",
        'w' => "qeas",
        'e' => "wrds",
        'r' => "etdf",
        't' => "ryfg",
        'y' => "tugh",
        'u' => "yihj",
        'i' => "uojk",
        'o' => "ipkl",
        'p' => "ol",
        'a' => "qwsz",
        's' => "awedxz",
        'd' => "serfcx",
        'f' => "drtgvc",
        'g' => "ftyhbv",
        'h' => "gyujnb",
        'j' => "hiumk",
        'k' => "jiolm",
        'l' => "kop",
        'z' => "asx",
        'x' => "zsdc",
        'c' => "xdfv",
        'v' => "cfgb",
        'b' => "vghn",
        'n' => "bhjm",
        'm' => "njk",
        _ => return None,
    };
    Some(neighbors)
}

/// Pick a realistic wrong character for a mistyped key.
///
/// Letters take an adjacent key 70% of the time and a random lowercase letter
/// otherwise; anything without an adjacency entry always takes a random
/// letter. The case of the original character is preserved.
pub fn wrong_char_for(correct: char, rng: &mut impl Rng) -> char {
    let wrong = match adjacent_keys(correct.to_ascii_lowercase()) {
        Some(neighbors) if rng.gen_bool(0.7) => {
            let bytes = neighbors.as_bytes();
            bytes[rng.gen_range(0..bytes.len())] as char
        }
        _ => random_lowercase(rng),
    };

    if correct.is_uppercase() {
        wrong.to_ascii_uppercase()
    } else {
        wrong
    }
}

pub(crate) fn random_lowercase(rng: &mut impl Rng) -> char {
    (b'a' + rng.gen_range(0..26u8)) as char
}
