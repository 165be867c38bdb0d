//! Porter stemmer
//!
//! Suffix-stripping stemmer following the Porter algorithm in the flavour
//! the training vocabulary was built with:
//! - an irregular-form table consulted before any rule
//! - words of two letters or fewer are returned unchanged
//! - four letter `-ies`/`-ied` words keep their `ie`
//! - `alli` is reduced before the other step 2 rules, and step 2 also knows
//!   `fulli` and `logi`
//! - a two letter vowel-consonant word counts as ending in CVC
//!
//! The stemmer holds no state, so one instance is shared by every caller.
//!
//! ```
//! use sentilyze_classifiers::stemmer::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("relational"), "relat");
//! ```

/// A rule condition evaluated on the stem left after removing the suffix.
type Condition = fn(&str) -> bool;

/// `(suffix, replacement, condition)`; the first rule whose suffix matches
/// decides the outcome, whether or not its condition holds.
type Rule = (&'static str, &'static str, Condition);

const STEP1A: &[Rule] = &[
    ("sses", "ss", always),
    ("ies", "i", always),
    ("ss", "ss", always),
    ("s", "", always),
];

const STEP1C: &[Rule] = &[("y", "i", ends_in_consonant)];

const STEP2: &[Rule] = &[
    ("ational", "ate", positive_measure),
    ("tional", "tion", positive_measure),
    ("enci", "ence", positive_measure),
    ("anci", "ance", positive_measure),
    ("izer", "ize", positive_measure),
    ("bli", "ble", positive_measure),
    ("alli", "al", positive_measure),
    ("entli", "ent", positive_measure),
    ("eli", "e", positive_measure),
    ("ousli", "ous", positive_measure),
    ("ization", "ize", positive_measure),
    ("ation", "ate", positive_measure),
    ("ator", "ate", positive_measure),
    ("alism", "al", positive_measure),
    ("iveness", "ive", positive_measure),
    ("fulness", "ful", positive_measure),
    ("ousness", "ous", positive_measure),
    ("aliti", "al", positive_measure),
    ("iviti", "ive", positive_measure),
    ("biliti", "ble", positive_measure),
    ("fulli", "ful", positive_measure),
    // the `l` stays with the stem so short stems like `geo` still qualify
    ("logi", "log", positive_measure_with_l),
];

const STEP3: &[Rule] = &[
    ("icate", "ic", positive_measure),
    ("ative", "", positive_measure),
    ("alize", "al", positive_measure),
    ("iciti", "ic", positive_measure),
    ("ical", "ic", positive_measure),
    ("ful", "", positive_measure),
    ("ness", "", positive_measure),
];

const STEP4: &[Rule] = &[
    ("al", "", measure_gt_1),
    ("ance", "", measure_gt_1),
    ("ence", "", measure_gt_1),
    ("er", "", measure_gt_1),
    ("ic", "", measure_gt_1),
    ("able", "", measure_gt_1),
    ("ible", "", measure_gt_1),
    ("ant", "", measure_gt_1),
    ("ement", "", measure_gt_1),
    ("ment", "", measure_gt_1),
    ("ent", "", measure_gt_1),
    ("ion", "", measure_gt_1_after_s_or_t),
    ("ou", "", measure_gt_1),
    ("ism", "", measure_gt_1),
    ("ate", "", measure_gt_1),
    ("iti", "", measure_gt_1),
    ("ous", "", measure_gt_1),
    ("ive", "", measure_gt_1),
    ("ize", "", measure_gt_1),
];

const STEP5B: &[Rule] = &[("ll", "l", measure_gt_1_with_l)];

/// Porter stemming algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new stemmer
    pub fn new() -> Self {
        Self
    }

    /// Stem a single word. The word is lowercased first; words containing
    /// non-ASCII characters are returned lowercased but otherwise untouched.
    pub fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();

        if let Some(stem) = irregular_form(&word) {
            return stem.to_string();
        }

        if word.len() <= 2 || !word.is_ascii() {
            return word;
        }

        let word = step1a(&word);
        let word = step1b(&word);
        let word = apply_rules(&word, STEP1C);
        let word = step2(&word);
        let word = apply_rules(&word, STEP3);
        let word = apply_rules(&word, STEP4);
        let word = step5a(&word);
        apply_rules(&word, STEP5B)
    }
}

fn irregular_form(word: &str) -> Option<&'static str> {
    let stem = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "innings" | "inning" => "inning",
        "outings" | "outing" => "outing",
        "cannings" | "canning" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(stem)
}

fn apply_rules(word: &str, rules: &[Rule]) -> String {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = word.strip_suffix(suffix) {
            return if condition(stem) {
                format!("{stem}{replacement}")
            } else {
                word.to_string()
            };
        }
    }
    word.to_string()
}

fn step1a(word: &str) -> String {
    if word.len() == 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}ie");
        }
    }
    apply_rules(word, STEP1A)
}

fn step1b(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        return if word.len() == 4 {
            format!("{stem}ie")
        } else {
            format!("{stem}i")
        };
    }

    if let Some(stem) = word.strip_suffix("eed") {
        return if measure(stem) > 0 {
            format!("{stem}ee")
        } else {
            word.to_string()
        };
    }

    let intermediate = ["ed", "ing"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix).filter(|stem| contains_vowel(stem)));
    let Some(stem) = intermediate else {
        return word.to_string();
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = stem.strip_suffix(suffix) {
            return format!("{base}{replacement}");
        }
    }

    if ends_double_consonant(stem) {
        let last = stem.as_bytes()[stem.len() - 1];
        return if matches!(last, b'l' | b's' | b'z') {
            stem.to_string()
        } else {
            stem[..stem.len() - 1].to_string()
        };
    }

    if measure(stem) == 1 && ends_cvc(stem) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn step2(word: &str) -> String {
    // `alli` goes first and the result runs through step 2 again
    if let Some(stem) = word.strip_suffix("alli") {
        if positive_measure(stem) {
            return step2(&format!("{stem}al"));
        }
    }
    apply_rules(word, STEP2)
}

fn step5a(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in the word.
fn measure(stem: &str) -> usize {
    let bytes = stem.as_bytes();
    let mut m = 0;
    let mut previous_vowel = false;
    for i in 0..bytes.len() {
        let consonant = is_consonant(bytes, i);
        if consonant && previous_vowel {
            m += 1;
        }
        previous_vowel = !consonant;
    }
    m
}

fn contains_vowel(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    (0..bytes.len()).any(|i| !is_consonant(bytes, i))
}

fn ends_double_consonant(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    n >= 2 && bytes[n - 1] == bytes[n - 2] && is_consonant(bytes, n - 1)
}

fn ends_cvc(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    if n >= 3 {
        is_consonant(bytes, n - 3)
            && !is_consonant(bytes, n - 2)
            && is_consonant(bytes, n - 1)
            && !matches!(bytes[n - 1], b'w' | b'x' | b'y')
    } else {
        n == 2 && !is_consonant(bytes, 0) && is_consonant(bytes, 1)
    }
}

fn always(_stem: &str) -> bool {
    true
}

fn positive_measure(stem: &str) -> bool {
    measure(stem) > 0
}

fn positive_measure_with_l(stem: &str) -> bool {
    positive_measure(&format!("{stem}l"))
}

fn measure_gt_1(stem: &str) -> bool {
    measure(stem) > 1
}

fn measure_gt_1_with_l(stem: &str) -> bool {
    measure_gt_1(&format!("{stem}l"))
}

fn measure_gt_1_after_s_or_t(stem: &str) -> bool {
    measure_gt_1(stem) && matches!(stem.as_bytes().last(), Some(b's' | b't'))
}

fn ends_in_consonant(stem: &str) -> bool {
    stem.len() > 1 && is_consonant(stem.as_bytes(), stem.len() - 1)
}
