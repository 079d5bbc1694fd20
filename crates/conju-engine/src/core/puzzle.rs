use serde::{Deserialize, Serialize};

use crate::api::types::SlotKind;

/// One conjugation challenge.
///
/// The answer key is partially nullable: `correct_stem` always exists,
/// `correct_ending` is `None` for indivisible forms ("vais"), and the
/// auxiliary pair only exists for compound tenses (`aux_stem` is `Some`).
/// Records are immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    #[serde(default)]
    pub id: Option<String>,
    /// Infinitive, e.g. "parler".
    pub verb: String,
    pub tense: String,
    /// Grammatical person ("Je", "Tu", ...).
    pub person: String,
    /// Display pronoun; may be elided ("J'") or subjunctive ("Que je").
    #[serde(default)]
    pub pronoun: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub is_regular: bool,

    pub correct_stem: String,
    #[serde(default)]
    pub correct_ending: Option<String>,
    #[serde(default)]
    pub distractor_stems: Vec<String>,
    #[serde(default)]
    pub distractor_endings: Option<Vec<String>>,

    #[serde(default)]
    pub aux_stem: Option<String>,
    #[serde(default)]
    pub aux_ending: Option<String>,
    #[serde(default)]
    pub aux_distractor_stems: Option<Vec<String>>,
    #[serde(default)]
    pub aux_distractor_endings: Option<Vec<String>>,

    #[serde(default)]
    pub rule_summary: String,
    #[serde(default)]
    pub explanation: String,
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PuzzleRecord {
    /// Create a simple-tense record with no ending, auxiliary or distractors.
    pub fn new(verb: &str, tense: &str, person: &str, correct_stem: &str) -> Self {
        Self {
            id: None,
            verb: verb.to_string(),
            tense: tense.to_string(),
            person: person.to_string(),
            pronoun: person.to_string(),
            translation: String::new(),
            is_regular: true,
            correct_stem: correct_stem.to_string(),
            correct_ending: None,
            distractor_stems: Vec::new(),
            distractor_endings: None,
            aux_stem: None,
            aux_ending: None,
            aux_distractor_stems: None,
            aux_distractor_endings: None,
            rule_summary: String::new(),
            explanation: String::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_pronoun(mut self, pronoun: &str) -> Self {
        self.pronoun = pronoun.to_string();
        self
    }

    /// Set the ending piece and its distractors.
    pub fn with_ending(mut self, ending: &str, distractors: &[&str]) -> Self {
        self.correct_ending = Some(ending.to_string());
        self.distractor_endings = Some(distractors.iter().map(|d| d.to_string()).collect());
        self
    }

    pub fn with_distractor_stems(mut self, distractors: &[&str]) -> Self {
        self.distractor_stems = distractors.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Set the auxiliary pair. `ending = None` marks an indivisible auxiliary.
    pub fn with_auxiliary(
        mut self,
        stem: &str,
        ending: Option<&str>,
        stem_distractors: &[&str],
        ending_distractors: &[&str],
    ) -> Self {
        self.aux_stem = Some(stem.to_string());
        self.aux_ending = ending.map(str::to_string);
        self.aux_distractor_stems = Some(stem_distractors.iter().map(|d| d.to_string()).collect());
        self.aux_distractor_endings =
            Some(ending_distractors.iter().map(|d| d.to_string()).collect());
        self
    }

    /// Canonicalise a record coming from an external source: answer pieces
    /// are trimmed like the tray labels, blank optional pieces become `None`
    /// and an empty pronoun falls back to the person.
    pub fn normalized(mut self) -> Self {
        self.correct_stem = self.correct_stem.trim().to_string();
        self.correct_ending = trimmed_or_none(self.correct_ending);
        self.aux_stem = trimmed_or_none(self.aux_stem);
        self.aux_ending = trimmed_or_none(self.aux_ending);
        if self.pronoun.trim().is_empty() {
            self.pronoun = self.person.clone();
        }
        self
    }

    /// Compound tense: the puzzle has auxiliary slots.
    pub fn is_compound(&self) -> bool {
        self.aux_stem.is_some()
    }

    /// Whether `slot` exists for this puzzle.
    pub fn has_slot(&self, slot: SlotKind) -> bool {
        match slot {
            SlotKind::Stem => true,
            SlotKind::Ending => self.correct_ending.is_some(),
            SlotKind::AuxStem => self.aux_stem.is_some(),
            SlotKind::AuxEnding => self.aux_stem.is_some() && self.aux_ending.is_some(),
        }
    }

    /// The correct label for `slot`, or `None` when the slot does not exist.
    pub fn answer(&self, slot: SlotKind) -> Option<&str> {
        if !self.has_slot(slot) {
            return None;
        }
        match slot {
            SlotKind::Stem => Some(self.correct_stem.as_str()),
            SlotKind::Ending => self.correct_ending.as_deref(),
            SlotKind::AuxStem => self.aux_stem.as_deref(),
            SlotKind::AuxEnding => self.aux_ending.as_deref(),
        }
    }

    /// Distractor pool for `slot`. Never used for scoring.
    pub fn distractors(&self, slot: SlotKind) -> Option<&[String]> {
        match slot {
            SlotKind::Stem => Some(self.distractor_stems.as_slice()),
            SlotKind::Ending => self.distractor_endings.as_deref(),
            SlotKind::AuxStem => self.aux_distractor_stems.as_deref(),
            SlotKind::AuxEnding => self.aux_distractor_endings.as_deref(),
        }
    }

    /// The assembled answer, e.g. "ai mangé" or "parle".
    pub fn solution(&self) -> String {
        let main = format!(
            "{}{}",
            self.correct_stem,
            self.correct_ending.as_deref().unwrap_or("")
        );
        match &self.aux_stem {
            Some(aux) => format!("{}{} {}", aux, self.aux_ending.as_deref().unwrap_or(""), main),
            None => main,
        }
    }
}
