use serde::{Deserialize, Serialize};

/// One answer slot of a puzzle.
/// Auxiliary slots only exist for compound tenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotKind {
    AuxStem,
    AuxEnding,
    Stem,
    Ending,
}

impl SlotKind {
    /// All slots in display order (auxiliary first, then the main verb).
    pub const ALL: [SlotKind; 4] = [
        SlotKind::AuxStem,
        SlotKind::AuxEnding,
        SlotKind::Stem,
        SlotKind::Ending,
    ];

    /// Stable identifier used by the view layer and the wire snapshot.
    pub fn id(self) -> &'static str {
        match self {
            SlotKind::AuxStem => "aux-stem",
            SlotKind::AuxEnding => "aux-ending",
            SlotKind::Stem => "stem",
            SlotKind::Ending => "ending",
        }
    }

    /// Parse the identifier produced by [`SlotKind::id`].
    pub fn from_id(id: &str) -> Option<Self> {
        SlotKind::ALL.into_iter().find(|slot| slot.id() == id)
    }

    pub fn is_auxiliary(self) -> bool {
        matches!(self, SlotKind::AuxStem | SlotKind::AuxEnding)
    }

}

/// Viewport class used to pick layout calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Compact,
    Wide,
}

impl Viewport {
    /// Classify a viewport width against the compact/wide breakpoint.
    /// Widths at or above the breakpoint are wide.
    pub fn classify(viewport_width_px: f32, breakpoint_px: f32) -> Self {
        if viewport_width_px >= breakpoint_px {
            Viewport::Wide
        } else {
            Viewport::Compact
        }
    }
}

/// Colour theme of a tray. Auxiliary trays are amber, verb trays blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrayColor {
    Amber,
    Blue,
}
