//! Tense catalogue.
//!
//! Tense identifiers are the French display names stored with every puzzle;
//! the same strings key the grammar rules and the learner's tense filter.

/// Tenses whose forms are a single conjugated word.
pub const SIMPLE_TENSES: &[&str] = &[
    "Présent",
    "Imparfait",
    "Futur Simple",
    "Conditionnel Présent",
    "Subjonctif Présent",
    "Passé Simple",
    "Subjonctif Imparfait",
];

/// Tenses built from an auxiliary plus a past participle.
pub const COMPOUND_TENSES: &[&str] = &[
    "Passé Composé",
    "Plus-que-parfait",
    "Futur Antérieur",
    "Conditionnel Passé",
    "Subjonctif Passé",
    "Passé Antérieur",
    "Subjonctif Plus-que-parfait",
];

/// Every tense the game knows, simple tenses first.
pub fn all_tenses() -> Vec<String> {
    SIMPLE_TENSES
        .iter()
        .chain(COMPOUND_TENSES)
        .map(|t| t.to_string())
        .collect()
}

pub fn is_simple_tense(tense: &str) -> bool {
    SIMPLE_TENSES.contains(&tense)
}

pub fn is_compound_tense(tense: &str) -> bool {
    COMPOUND_TENSES.contains(&tense)
}

pub fn is_known_tense(tense: &str) -> bool {
    is_simple_tense(tense) || is_compound_tense(tense)
}

/// Subjunctive tenses display their pronoun with a "que" marker.
pub fn is_subjunctive(tense: &str) -> bool {
    tense.starts_with("Subjonctif")
}
