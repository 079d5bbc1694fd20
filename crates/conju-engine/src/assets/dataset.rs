use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::error::{DatasetError, FetchError};
use crate::api::locale::Language;
use crate::core::puzzle::PuzzleRecord;
use crate::core::queue::{BatchQuery, PuzzleSource};
use crate::core::rng::Rng;

/// Explanation shown when a puzzle has none in the requested language or English.
pub const MISSING_EXPLANATION: &str = "No explanation available.";

/// Offline puzzle dataset, one entry per verb.
/// Loaded from a JSON file shaped `{"verb": [ ... ]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "verb", default)]
    pub verbs: Vec<VerbEntry>,
}

/// All puzzles generated for one infinitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerbEntry {
    pub infinitive: String,
    /// Verb meaning by language code ("en" → "to speak").
    #[serde(default)]
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub puzzles: Vec<DatasetPuzzle>,
}

/// A puzzle as stored in the dataset, before localization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPuzzle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub verb: String,
    pub tense: String,
    pub person: String,
    #[serde(default)]
    pub pronoun: String,
    #[serde(rename = "is_regular", alias = "isRegular", default)]
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
    pub distractor_aux_stems: Option<Vec<String>>,
    #[serde(default)]
    pub distractor_aux_endings: Option<Vec<String>>,

    #[serde(default)]
    pub rule_summary: String,
    /// Explanation by language code.
    #[serde(default)]
    pub explanations: HashMap<String, String>,
}

fn localized<'a>(table: &'a HashMap<String, String>, language: Language) -> Option<&'a str> {
    [language.code(), "en"]
        .into_iter()
        .filter_map(|code| table.get(code))
        .find(|text| !text.trim().is_empty())
        .map(String::as_str)
}

impl VerbEntry {
    /// Build the playable record for `puzzle` in `language`.
    ///
    /// Translation and explanation fall back to English, then to the
    /// infinitive and [`MISSING_EXPLANATION`] respectively.
    pub fn localize(&self, puzzle: &DatasetPuzzle, language: Language) -> PuzzleRecord {
        let verb = if puzzle.verb.is_empty() {
            self.infinitive.clone()
        } else {
            puzzle.verb.clone()
        };
        PuzzleRecord {
            id: puzzle.id.clone(),
            verb,
            tense: puzzle.tense.clone(),
            person: puzzle.person.clone(),
            pronoun: puzzle.pronoun.clone(),
            translation: localized(&self.translations, language)
                .unwrap_or(&self.infinitive)
                .to_string(),
            is_regular: puzzle.is_regular,
            correct_stem: puzzle.correct_stem.clone(),
            correct_ending: puzzle.correct_ending.clone(),
            distractor_stems: puzzle.distractor_stems.clone(),
            distractor_endings: puzzle.distractor_endings.clone(),
            aux_stem: puzzle.aux_stem.clone(),
            aux_ending: puzzle.aux_ending.clone(),
            aux_distractor_stems: puzzle.distractor_aux_stems.clone(),
            aux_distractor_endings: puzzle.distractor_aux_endings.clone(),
            rule_summary: puzzle.rule_summary.clone(),
            explanation: localized(&puzzle.explanations, language)
                .unwrap_or(MISSING_EXPLANATION)
                .to_string(),
        }
        .normalized()
    }
}

impl Dataset {
    /// Parse a dataset from a JSON string. A dataset without verbs is an error.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        if dataset.verbs.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(dataset)
    }

    /// Total number of puzzles across all verbs.
    pub fn len(&self) -> usize {
        self.verbs.iter().map(|v| v.puzzles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positions (verb, puzzle) of every puzzle passing the query's tense filter.
    fn eligible(&self, query: &BatchQuery) -> Vec<(usize, usize)> {
        self.verbs
            .iter()
            .enumerate()
            .flat_map(|(vi, verb)| {
                verb.puzzles
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| query.allows(&p.tense))
                    .map(move |(pi, _)| (vi, pi))
            })
            .collect()
    }
}

/// Serves batches from an in-memory [`Dataset`].
///
/// Puzzles are drawn at random among those matching the tense filter; one
/// batch never repeats a puzzle, consecutive batches may.
pub struct DatasetSource {
    dataset: Dataset,
    rng: Rng,
}

impl DatasetSource {
    pub fn new(dataset: Dataset, seed: u64) -> Self {
        Self {
            dataset,
            rng: Rng::new(seed),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Draw up to `query.count` localized puzzles.
    pub fn draw(&mut self, query: &BatchQuery) -> Vec<PuzzleRecord> {
        let mut positions = self.dataset.eligible(query);
        self.rng.shuffle(&mut positions);
        positions.truncate(query.count);
        log::debug!(
            "dataset drew {} puzzle(s) for {:?} in {}",
            positions.len(),
            query.tenses,
            query.language.code()
        );
        positions
            .into_iter()
            .map(|(vi, pi)| {
                let verb = &self.dataset.verbs[vi];
                verb.localize(&verb.puzzles[pi], query.language)
            })
            .collect()
    }
}

impl PuzzleSource for DatasetSource {
    fn fetch(&mut self, query: &BatchQuery) -> Result<Vec<PuzzleRecord>, FetchError> {
        Ok(self.draw(query))
    }
}
