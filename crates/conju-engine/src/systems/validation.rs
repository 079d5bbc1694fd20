//! Answer scoring.
//!
//! Slots that do not exist for a puzzle are never scored and never block
//! success; they are reported as `None` rather than `false`.

use serde::{Deserialize, Serialize};

use crate::api::types::SlotKind;
use crate::components::selection::SelectionState;
use crate::core::puzzle::PuzzleRecord;

/// Per-slot outcome of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub stem: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aux_stem: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aux_ending: Option<bool>,
    pub all_correct: bool,
}

impl ValidationResult {
    /// Outcome for `slot`, `None` when the slot was not scored.
    pub fn slot(&self, slot: SlotKind) -> Option<bool> {
        match slot {
            SlotKind::Stem => Some(self.stem),
            SlotKind::Ending => self.ending,
            SlotKind::AuxStem => self.aux_stem,
            SlotKind::AuxEnding => self.aux_ending,
        }
    }
}

fn score(puzzle: &PuzzleRecord, selection: &SelectionState, slot: SlotKind) -> Option<bool> {
    let answer = puzzle.answer(slot)?;
    Some(selection.get(slot) == Some(answer))
}

/// Score `selection` against the answer key of `puzzle`.
pub fn validate(puzzle: &PuzzleRecord, selection: &SelectionState) -> ValidationResult {
    let stem = score(puzzle, selection, SlotKind::Stem).unwrap_or(false);
    let ending = score(puzzle, selection, SlotKind::Ending);
    let aux_stem = score(puzzle, selection, SlotKind::AuxStem);
    let aux_ending = score(puzzle, selection, SlotKind::AuxEnding);

    let all_correct = stem
        && ending.unwrap_or(true)
        && aux_stem.unwrap_or(true)
        && aux_ending.unwrap_or(true);

    ValidationResult {
        stem,
        ending,
        aux_stem,
        aux_ending,
        all_correct,
    }
}

/// Every slot that exists has a selection. Gates the "check" action.
pub fn is_complete(puzzle: &PuzzleRecord, selection: &SelectionState) -> bool {
    SlotKind::ALL
        .into_iter()
        .filter(|&slot| puzzle.has_slot(slot))
        .all(|slot| selection.get(slot).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parler() -> PuzzleRecord {
        PuzzleRecord::new("parler", "Présent", "Je", "parl")
            .with_distractor_stems(&["fin"])
            .with_ending("e", &["es", "ons"])
    }

    fn pick(stem: Option<&str>, ending: Option<&str>, aux_stem: Option<&str>, aux_ending: Option<&str>) -> SelectionState {
        SelectionState {
            stem: stem.map(str::to_string),
            ending: ending.map(str::to_string),
            aux_stem: aux_stem.map(str::to_string),
            aux_ending: aux_ending.map(str::to_string),
        }
    }

    #[test]
    fn regular_present_scores_each_slot() {
        let p = parler();
        let ok = validate(&p, &pick(Some("parl"), Some("e"), None, None));
        assert!(ok.all_correct);

        let wrong = validate(&p, &pick(Some("parl"), Some("es"), None, None));
        assert!(!wrong.all_correct);
        assert!(wrong.stem);
        assert_eq!(wrong.ending, Some(false));
        assert_eq!(wrong.aux_stem, None);
        assert_eq!(wrong.aux_ending, None);
    }

    #[test]
    fn indivisible_form_needs_only_stem() {
        let p = PuzzleRecord::new("aller", "Présent", "Je", "Vais").with_distractor_stems(&["Va", "Allons"]);
        let sel = pick(Some("Vais"), None, None, None);
        assert!(is_complete(&p, &sel));
        let r = validate(&p, &sel);
        assert!(r.all_correct);
        assert_eq!(r.ending, None);
    }

    #[test]
    fn indivisible_auxiliary_is_skipped() {
        let p = PuzzleRecord::new("manger", "Passé Composé", "Il", "mang")
            .with_ending("é", &["er"])
            .with_auxiliary("a", None, &["est"], &[]);
        let r = validate(&p, &pick(Some("mang"), Some("é"), Some("a"), None));
        assert!(r.all_correct);
        assert_eq!(r.aux_ending, None);
        assert_eq!(r.aux_stem, Some(true));
    }

    #[test]
    fn missing_selection_in_existing_slot_is_false() {
        let p = parler();
        let r = validate(&p, &SelectionState::new());
        assert!(!r.stem);
        assert_eq!(r.ending, Some(false));
        assert!(!r.all_correct);
    }

    #[test]
    fn skipped_slots_are_absent_from_json() {
        let p = PuzzleRecord::new("aller", "Présent", "Je", "Vais");
        let r = validate(&p, &pick(Some("Vais"), None, None, None));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"stem":true,"allCorrect":true}"#);
    }

    #[test]
    fn completeness_over_all_sixteen_key_shapes() {
        for mask in 0u8..16 {
            let has = |bit: u8| mask & (1 << bit) != 0;
            // bit 0 is the stem: a blank stem still yields a stem slot
            let mut p = PuzzleRecord::new("v", "Présent", "Je", if has(0) { "st" } else { "" });
            if has(1) {
                p.correct_ending = Some("en".into());
            }
            if has(2) {
                p.aux_stem = Some("as".into());
            }
            if has(3) {
                p.aux_ending = Some("ae".into());
            }
            let mut existing = vec![SlotKind::Stem];
            if has(1) {
                existing.push(SlotKind::Ending);
            }
            if has(2) {
                existing.push(SlotKind::AuxStem);
                if has(3) {
                    existing.push(SlotKind::AuxEnding);
                }
            }

            // every subset of filled slots
            for fill in 0u8..16 {
                let mut sel = SelectionState::new();
                for (i, slot) in SlotKind::ALL.into_iter().enumerate() {
                    if fill & (1 << i) != 0 {
                        sel.select(slot, "x");
                    }
                }
                let expected = existing.iter().all(|&s| sel.get(s).is_some());
                assert_eq!(is_complete(&p, &sel), expected, "key {:04b} fill {:04b}", mask, fill);
            }
        }
    }

    proptest! {
        #[test]
        fn simple_indivisible_depends_only_on_stem(
            stem in "[a-z]{1,5}",
            chosen in proptest::option::of("[a-z]{1,5}"),
            noise in proptest::collection::vec(proptest::option::of("[a-z]{1,3}"), 3),
        ) {
            let p = PuzzleRecord::new("v", "Présent", "Je", &stem);
            let sel = SelectionState {
                stem: chosen.clone(),
                ending: noise[0].clone(),
                aux_stem: noise[1].clone(),
                aux_ending: noise[2].clone(),
            };
            let r = validate(&p, &sel);
            prop_assert_eq!(r.all_correct, chosen.as_deref() == Some(stem.as_str()));
        }
    }
}
