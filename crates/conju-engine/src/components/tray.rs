//! Per-puzzle candidate pools and the trays derived from them.

use serde::Serialize;

use crate::api::types::{SlotKind, TrayColor};
use crate::components::selection::SelectionState;
use crate::core::puzzle::PuzzleRecord;
use crate::core::rng::Rng;

/// Deduplicate, trim, drop blanks, then shuffle.
///
/// The correct answer (when present) is always kept; the all-absent case
/// yields an empty list.
pub fn clean_and_shuffle(
    correct: Option<&str>,
    distractors: Option<&[String]>,
    rng: &mut Rng,
) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    let candidates = correct
        .into_iter()
        .chain(distractors.unwrap_or_default().iter().map(String::as_str));
    for candidate in candidates {
        let trimmed = candidate.trim();
        if trimmed.is_empty() || labels.iter().any(|l| l == trimmed) {
            continue;
        }
        labels.push(trimmed.to_string());
    }
    rng.shuffle(&mut labels);
    labels
}

/// One selectable group of pieces for one slot, as shown in a tray.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateGroup {
    pub id: String,
    pub slot: SlotKind,
    pub labels: Vec<String>,
    pub selected: Option<String>,
    pub color: TrayColor,
    /// The piece visually joins its stem/ending partner.
    pub show_connectors: bool,
    /// Locale key of the tray title.
    pub title_key: &'static str,
}

impl CandidateGroup {
    /// Create a standalone group; used by hosts that build trays themselves.
    pub fn new(slot: SlotKind, labels: &[&str]) -> Self {
        Self {
            id: slot.id().to_string(),
            slot,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            selected: None,
            color: if slot.is_auxiliary() { TrayColor::Amber } else { TrayColor::Blue },
            show_connectors: false,
            title_key: "",
        }
    }

    pub fn with_connectors(mut self, show: bool) -> Self {
        self.show_connectors = show;
        self
    }
}

/// Ephemeral state of the puzzle currently on screen: shuffled pools and
/// the learner's selection. Replaced wholesale on every new puzzle.
#[derive(Debug, Clone)]
pub struct Round {
    puzzle: PuzzleRecord,
    aux_stems: Vec<String>,
    aux_endings: Vec<String>,
    stems: Vec<String>,
    endings: Vec<String>,
    selection: SelectionState,
}

impl Round {
    pub fn new(puzzle: PuzzleRecord, rng: &mut Rng) -> Self {
        let mut pool = |slot: SlotKind| {
            if puzzle.has_slot(slot) {
                clean_and_shuffle(puzzle.answer(slot), puzzle.distractors(slot), rng)
            } else {
                Vec::new()
            }
        };
        let aux_stems = pool(SlotKind::AuxStem);
        let aux_endings = pool(SlotKind::AuxEnding);
        let stems = pool(SlotKind::Stem);
        let endings = pool(SlotKind::Ending);
        Self {
            puzzle,
            aux_stems,
            aux_endings,
            stems,
            endings,
            selection: SelectionState::new(),
        }
    }

    pub fn puzzle(&self) -> &PuzzleRecord {
        &self.puzzle
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Shuffled candidate labels for `slot` (empty when the slot does not exist).
    pub fn pool(&self, slot: SlotKind) -> &[String] {
        match slot {
            SlotKind::AuxStem => &self.aux_stems,
            SlotKind::AuxEnding => &self.aux_endings,
            SlotKind::Stem => &self.stems,
            SlotKind::Ending => &self.endings,
        }
    }

    /// Toggle `label` into `slot`. Labels outside the slot's pool are ignored.
    pub fn select(&mut self, slot: SlotKind, label: &str) -> bool {
        if !self.pool(slot).iter().any(|l| l == label) {
            return false;
        }
        self.selection.select(slot, label);
        true
    }

    /// Trays for the current puzzle, auxiliary first, skipping empty pools.
    pub fn groups(&self) -> Vec<CandidateGroup> {
        SlotKind::ALL
            .into_iter()
            .filter(|&slot| !self.pool(slot).is_empty())
            .map(|slot| CandidateGroup {
                id: slot.id().to_string(),
                slot,
                labels: self.pool(slot).to_vec(),
                selected: self.selection.get(slot).map(str::to_string),
                color: if slot.is_auxiliary() { TrayColor::Amber } else { TrayColor::Blue },
                show_connectors: self.puzzle.has_slot(partner(slot)),
                title_key: self.title_key(slot),
            })
            .collect()
    }

    fn title_key(&self, slot: SlotKind) -> &'static str {
        match slot {
            SlotKind::AuxStem if self.puzzle.has_slot(SlotKind::AuxEnding) => "lbl_aux_stem",
            SlotKind::AuxStem => "lbl_aux",
            SlotKind::AuxEnding => "lbl_aux_ending",
            SlotKind::Stem if self.puzzle.has_slot(SlotKind::Ending) => "lbl_verb_stem",
            SlotKind::Stem => "lbl_verb",
            SlotKind::Ending => "lbl_verb_ending",
        }
    }
}

fn partner(slot: SlotKind) -> SlotKind {
    match slot {
        SlotKind::AuxStem => SlotKind::AuxEnding,
        SlotKind::AuxEnding => SlotKind::AuxStem,
        SlotKind::Stem => SlotKind::Ending,
        SlotKind::Ending => SlotKind::Stem,
    }
}
