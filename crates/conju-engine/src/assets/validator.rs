//! Deterministic checks for generated dataset batches.
//!
//! Run over every [`VerbEntry`] before it is shipped. `Fatal` issues make a
//! puzzle unplayable, `Strong` ones are almost certainly linguistic
//! mistakes, `Warning`s are worth a look.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::assets::dataset::{Dataset, DatasetPuzzle, VerbEntry};
use crate::core::tense;

/// Grammatical persons, compared case-insensitively.
pub const PERSONS: [&str; 8] = ["je", "tu", "il", "elle", "nous", "vous", "ils", "elles"];

/// First letters that force "je" to elide to "j'".
const ELIDING_INITIALS: &str = "aeiouhé";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueLevel {
    Fatal,
    Strong,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub level: IssueLevel,
    /// Location inside the batch, e.g. `puzzles[3].pronoun`.
    pub path: String,
    pub message: String,
}

impl Issue {
    fn fatal(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: IssueLevel::Fatal, path: path.into(), message: message.into() }
    }

    fn strong(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: IssueLevel::Strong, path: path.into(), message: message.into() }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: IssueLevel::Warning, path: path.into(), message: message.into() }
    }
}

/// Check one verb batch.
pub fn validate_batch(batch: &VerbEntry) -> Vec<Issue> {
    let mut issues = Vec::new();

    if batch.infinitive.trim().is_empty() {
        issues.push(Issue::fatal("infinitive", "Missing infinitive"));
    }
    if batch.puzzles.is_empty() {
        issues.push(Issue::fatal("puzzles", "Batch has no puzzles"));
        return issues;
    }

    for (index, puzzle) in batch.puzzles.iter().enumerate() {
        validate_puzzle(puzzle, &format!("puzzles[{}]", index), &mut issues);
    }
    check_person_coverage(batch, &mut issues);
    issues
}

/// Check every batch of a dataset; paths are prefixed with `verb[i]`.
pub fn validate_dataset(dataset: &Dataset) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, verb) in dataset.verbs.iter().enumerate() {
        issues.extend(validate_batch(verb).into_iter().map(|mut issue| {
            issue.path = format!("verb[{}].{}", i, issue.path);
            issue
        }));
    }
    log::info!(
        "validated {} verb(s): {} fatal, {} total issue(s)",
        dataset.verbs.len(),
        issues.iter().filter(|i| i.level == IssueLevel::Fatal).count(),
        issues.len()
    );
    issues
}

fn validate_puzzle(p: &DatasetPuzzle, base: &str, issues: &mut Vec<Issue>) {
    for (field, value) in [
        ("verb", &p.verb),
        ("tense", &p.tense),
        ("person", &p.person),
        ("pronoun", &p.pronoun),
        ("correctStem", &p.correct_stem),
    ] {
        if value.trim().is_empty() {
            issues.push(Issue::fatal(format!("{}.{}", base, field), "Missing required field"));
        }
    }

    let person = p.person.to_lowercase();
    if !PERSONS.contains(&person.as_str()) {
        issues.push(Issue::fatal(
            format!("{}.person", base),
            format!("Invalid person '{}', must be one of {}", p.person, PERSONS.join(", ")),
        ));
    }

    let compound = tense::is_compound_tense(&p.tense);
    let simple = tense::is_simple_tense(&p.tense);
    if !compound && !simple {
        issues.push(Issue::fatal(format!("{}.tense", base), format!("Unknown tense '{}'", p.tense)));
    }
    if compound && p.aux_stem.as_deref().map_or(true, |s| s.trim().is_empty()) {
        issues.push(Issue::fatal(base, "Compound tense requires auxStem and auxEnding"));
    }
    if simple && p.aux_stem.is_some() {
        issues.push(Issue::strong(base, "Simple tense must not include auxiliary fields"));
    }

    if tense::is_subjunctive(&p.tense)
        && !(p.pronoun.starts_with("Que ") || p.pronoun.starts_with("Qu'"))
    {
        issues.push(Issue::fatal(
            format!("{}.pronoun", base),
            "Subjonctif must start with 'Que' or 'Qu''",
        ));
    }

    if person == "je" {
        check_elision(p, base, issues);
    }

    check_distractors(Some(&p.correct_stem), Some(&p.distractor_stems), &format!("{}.distractorStems", base), issues);
    check_distractors(
        p.correct_ending.as_deref(),
        p.distractor_endings.as_deref(),
        &format!("{}.distractorEndings", base),
        issues,
    );
    check_distractors(
        p.aux_stem.as_deref(),
        p.distractor_aux_stems.as_deref(),
        &format!("{}.distractorAuxStems", base),
        issues,
    );
    check_distractors(
        p.aux_ending.as_deref(),
        p.distractor_aux_endings.as_deref(),
        &format!("{}.distractorAuxEndings", base),
        issues,
    );

    if p.correct_ending.is_some() && p.distractor_endings.as_ref().map_or(true, Vec::is_empty) {
        issues.push(Issue::warning(
            format!("{}.distractorEndings", base),
            "Ending has no distractors",
        ));
    }
}

/// "je" elides before a vowel or mute h: the conjugated form's first letter
/// (auxiliary first for compound tenses) decides.
fn check_elision(p: &DatasetPuzzle, base: &str, issues: &mut Vec<Issue>) {
    let first = p
        .aux_stem
        .as_deref()
        .unwrap_or(&p.correct_stem)
        .chars()
        .next()
        .and_then(|c| c.to_lowercase().next());
    let should_elide = first.is_some_and(|c| ELIDING_INITIALS.contains(c));
    let elided = p.pronoun.starts_with("J'") || p.pronoun.starts_with("j'") || p.pronoun.starts_with("Que j'");

    if should_elide && !elided {
        issues.push(Issue::strong(
            format!("{}.pronoun", base),
            "Je must elide to j' before vowel or mute h",
        ));
    }
    if !should_elide && elided {
        issues.push(Issue::strong(
            format!("{}.pronoun", base),
            "J' used incorrectly before consonant",
        ));
    }
}

fn check_distractors(correct: Option<&str>, distractors: Option<&[String]>, path: &str, issues: &mut Vec<Issue>) {
    let (Some(correct), Some(distractors)) = (correct, distractors) else {
        return;
    };
    let unique: HashSet<&str> = distractors.iter().map(String::as_str).collect();
    if unique.len() != distractors.len() {
        issues.push(Issue::fatal(path, "Duplicate values in distractors"));
    }
    if unique.contains(correct) {
        issues.push(Issue::fatal(path, "Distractor must not be identical to correct value"));
    }
}

/// Every tense present in the batch must cover each person exactly once.
fn check_person_coverage(batch: &VerbEntry, issues: &mut Vec<Issue>) {
    let mut by_tense: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for p in &batch.puzzles {
        by_tense.entry(p.tense.as_str()).or_default().push(p.person.to_lowercase());
    }
    for (tense, persons) in by_tense {
        let distinct: BTreeSet<&str> = persons.iter().map(String::as_str).collect();
        if persons.len() != PERSONS.len() || distinct.len() != PERSONS.len() {
            issues.push(Issue::fatal(
                "puzzles",
                format!(
                    "Expected exactly {} persons for '{}', got {} ({} distinct)",
                    PERSONS.len(),
                    tense,
                    persons.len(),
                    distinct.len()
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn puzzle(tense: &str, person: &str, pronoun: &str, stem: &str) -> DatasetPuzzle {
        DatasetPuzzle {
            id: None,
            verb: "aimer".into(),
            tense: tense.into(),
            person: person.into(),
            pronoun: pronoun.into(),
            is_regular: true,
            correct_stem: stem.into(),
            correct_ending: Some("e".into()),
            distractor_stems: vec!["xx".into()],
            distractor_endings: Some(vec!["es".into()]),
            aux_stem: None,
            aux_ending: None,
            distractor_aux_stems: None,
            distractor_aux_endings: None,
            rule_summary: String::new(),
            explanations: HashMap::new(),
        }
    }

    fn batch(puzzles: Vec<DatasetPuzzle>) -> VerbEntry {
        VerbEntry {
            infinitive: "aimer".into(),
            translations: HashMap::new(),
            puzzles,
        }
    }

    fn full_present() -> Vec<DatasetPuzzle> {
        PERSONS
            .iter()
            .map(|&person| {
                let pronoun = if person == "je" { "J'" } else { person };
                puzzle("Présent", person, pronoun, "aim")
            })
            .collect()
    }

    fn messages(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    fn clean_batch_has_no_issues() {
        assert_eq!(validate_batch(&batch(full_present())), Vec::new());
    }

    #[test]
    fn elision_both_directions() {
        let mut puzzles = full_present();
        puzzles[0].pronoun = "Je".into();
        let issues = validate_batch(&batch(puzzles));
        assert_eq!(messages(&issues), ["Je must elide to j' before vowel or mute h"]);
        assert_eq!(issues[0].level, IssueLevel::Strong);
        assert_eq!(issues[0].path, "puzzles[0].pronoun");

        let mut puzzles = full_present();
        puzzles[0].correct_stem = "parl".into();
        let issues = validate_batch(&batch(puzzles));
        assert_eq!(messages(&issues), ["J' used incorrectly before consonant"]);
    }

    #[test]
    fn elision_follows_auxiliary() {
        let mut p = puzzle("Passé Composé", "je", "J'", "parl");
        p.aux_stem = Some("ai".into());
        let mut issues = Vec::new();
        validate_puzzle(&p, "p", &mut issues);
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn tense_structure_rules() {
        let mut issues = Vec::new();
        validate_puzzle(&puzzle("Passé Composé", "tu", "Tu", "aim"), "p", &mut issues);
        assert_eq!(messages(&issues), ["Compound tense requires auxStem and auxEnding"]);

        let mut p = puzzle("Présent", "tu", "Tu", "aim");
        p.aux_stem = Some("as".into());
        let mut issues = Vec::new();
        validate_puzzle(&p, "p", &mut issues);
        assert_eq!(issues[0].level, IssueLevel::Strong);

        let mut issues = Vec::new();
        validate_puzzle(&puzzle("Futur Proche", "tu", "Tu", "aim"), "p", &mut issues);
        assert_eq!(messages(&issues), ["Unknown tense 'Futur Proche'"]);
    }

    #[test]
    fn subjunctive_pronoun() {
        let mut issues = Vec::new();
        validate_puzzle(&puzzle("Subjonctif Présent", "tu", "Tu", "aim"), "p", &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "p.pronoun");

        for pronoun in ["Que tu", "Qu'il"] {
            let mut issues = Vec::new();
            let person = if pronoun == "Qu'il" { "il" } else { "tu" };
            validate_puzzle(&puzzle("Subjonctif Présent", person, pronoun, "aim"), "p", &mut issues);
            assert!(issues.is_empty(), "{}: {:?}", pronoun, issues);
        }
    }

    #[test]
    fn distractor_integrity() {
        let mut p = puzzle("Présent", "tu", "Tu", "aim");
        p.distractor_stems = vec!["aim".into(), "xx".into(), "xx".into()];
        let mut issues = Vec::new();
        validate_puzzle(&p, "p", &mut issues);
        assert_eq!(
            messages(&issues),
            ["Duplicate values in distractors", "Distractor must not be identical to correct value"]
        );
        assert!(issues.iter().all(|i| i.path == "p.distractorStems"));
    }

    #[test]
    fn missing_fields_and_bad_person() {
        let p = puzzle("Présent", "on", "", "aim");
        let mut issues = Vec::new();
        validate_puzzle(&p, "p", &mut issues);
        assert!(issues.iter().any(|i| i.path == "p.pronoun" && i.message == "Missing required field"));
        assert!(issues.iter().any(|i| i.path == "p.person" && i.level == IssueLevel::Fatal));
    }

    #[test]
    fn coverage_counts_persons_per_tense() {
        let mut puzzles = full_present();
        puzzles.pop();
        let issues = validate_batch(&batch(puzzles));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "puzzles");
        assert!(issues[0].message.contains("'Présent', got 7"));
    }

    #[test]
    fn dataset_paths_are_prefixed() {
        let dataset = Dataset {
            verbs: vec![batch(full_present()), batch(Vec::new())],
        };
        let issues = validate_dataset(&dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "verb[1].puzzles");
    }
}
