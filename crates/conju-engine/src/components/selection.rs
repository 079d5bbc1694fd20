use serde::{Deserialize, Serialize};

use crate::api::types::SlotKind;

/// The learner's current answer attempt: one optional label per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub stem: Option<String>,
    pub ending: Option<String>,
    pub aux_stem: Option<String>,
    pub aux_ending: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotKind) -> Option<&str> {
        self.slot(slot).as_deref()
    }

    fn slot(&self, slot: SlotKind) -> &Option<String> {
        match slot {
            SlotKind::Stem => &self.stem,
            SlotKind::Ending => &self.ending,
            SlotKind::AuxStem => &self.aux_stem,
            SlotKind::AuxEnding => &self.aux_ending,
        }
    }

    fn slot_mut(&mut self, slot: SlotKind) -> &mut Option<String> {
        match slot {
            SlotKind::Stem => &mut self.stem,
            SlotKind::Ending => &mut self.ending,
            SlotKind::AuxStem => &mut self.aux_stem,
            SlotKind::AuxEnding => &mut self.aux_ending,
        }
    }

    /// Toggle `label` into `slot`: selecting the current value again clears
    /// the slot, any other value replaces it.
    pub fn select(&mut self, slot: SlotKind, label: &str) {
        let current = self.slot_mut(slot);
        if current.as_deref() == Some(label) {
            *current = None;
        } else {
            *current = Some(label.to_string());
        }
    }

    pub fn clear_slot(&mut self, slot: SlotKind) {
        *self.slot_mut(slot) = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        SlotKind::ALL.iter().all(|&slot| self.slot(slot).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_twice_clears() {
        let mut sel = SelectionState::new();
        sel.select(SlotKind::Stem, "parl");
        assert_eq!(sel.get(SlotKind::Stem), Some("parl"));
        sel.select(SlotKind::Stem, "parl");
        assert_eq!(sel.get(SlotKind::Stem), None);
        assert!(sel.is_empty());
    }

    #[test]
    fn selecting_other_value_replaces() {
        let mut sel = SelectionState::new();
        sel.select(SlotKind::Ending, "e");
        sel.select(SlotKind::Ending, "es");
        assert_eq!(sel.get(SlotKind::Ending), Some("es"));
    }

    #[test]
    fn slots_are_independent() {
        let mut sel = SelectionState::new();
        sel.select(SlotKind::AuxStem, "Av");
        sel.select(SlotKind::Stem, "mang");
        sel.clear_slot(SlotKind::AuxStem);
        assert_eq!(sel.get(SlotKind::AuxStem), None);
        assert_eq!(sel.get(SlotKind::Stem), Some("mang"));
        sel.clear();
        assert!(sel.is_empty());
    }
}
