use serde::{Deserialize, Serialize};

use crate::api::locale::Language;
use crate::api::types::SlotKind;

/// Learner actions the session understands.
/// The host pushes them as the UI fires; the session drains them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    /// A piece was tapped. Tapping the selected piece again deselects it.
    Select { slot: SlotKind, label: String },
    /// Submit the current selection.
    Check,
    /// Move on to the next puzzle.
    Advance,
    /// Retry after a load error.
    Retry,
    SetLanguage { language: Language },
    /// Restrict puzzles to these tenses; empty means all tenses.
    SetTenses { tenses: Vec<String> },
    /// Hide feedback before its timer runs out.
    DismissFeedback,
    /// Show or hide the rule hint of the current puzzle.
    ToggleHint,
    /// The learner closed the onboarding screen.
    MarkOnboardingSeen,
}

/// A queue of learner intents.
pub struct IntentQueue {
    intents: Vec<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self {
            intents: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Drain all pending intents in arrival order.
    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }
}

impl Default for IntentQueue {
    fn default() -> Self {
        Self::new()
    }
}
