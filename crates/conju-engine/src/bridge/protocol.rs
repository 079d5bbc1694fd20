/// JSON view protocol.
/// Must stay in sync with the TypeScript `ViewSnapshot` type.
///
/// The view layer renders exclusively from the latest snapshot:
/// ```text
/// { protocolVersion, phase, score, language, tenses, onboardingSeen,
///   puzzle?, groups[], validation?, feedback?, hintVisible, complete }
/// ```
/// Optional sections are omitted, never `null`.

use serde::Serialize;

use crate::api::game::Feedback;
use crate::api::locale::Language;
use crate::components::tray::CandidateGroup;
use crate::core::queue::GamePhase;
use crate::systems::validation::ValidationResult;

/// Protocol version written into every snapshot.
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub protocol_version: u32,
    pub phase: GamePhase,
    pub score: u32,
    pub language: Language,
    pub tenses: Vec<String>,
    pub onboarding_seen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<PuzzleView>,
    pub groups: Vec<GroupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackView>,
    pub hint_visible: bool,
    /// The check action is enabled.
    pub complete: bool,
}

/// Header of the current puzzle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleView {
    pub verb: String,
    pub translation: String,
    /// Tense id, stable across languages.
    pub tense: String,
    /// Tense name in the interface language.
    pub tense_label: String,
    pub pronoun: String,
    pub is_regular: bool,
    /// Present while the hint is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_summary: Option<String>,
    /// Only revealed once solved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

/// A tray with its localized title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: CandidateGroup,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackView {
    pub kind: Feedback,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

impl ViewSnapshot {
    /// Serialize for the JS side.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SlotKind;

    fn loading() -> ViewSnapshot {
        ViewSnapshot {
            protocol_version: PROTOCOL_VERSION,
            phase: GamePhase::Loading,
            score: 0,
            language: Language::Fr,
            tenses: Vec::new(),
            onboarding_seen: false,
            puzzle: None,
            groups: Vec::new(),
            validation: None,
            feedback: None,
            hint_visible: false,
            complete: false,
        }
    }

    #[test]
    fn loading_snapshot_omits_optional_sections() {
        let json: serde_json::Value = serde_json::from_str(&loading().to_json().unwrap()).unwrap();
        assert_eq!(json["protocolVersion"], 1);
        assert_eq!(json["hintVisible"], false);
        assert_eq!(json["phase"], "LOADING");
        assert_eq!(json["language"], "fr");
        assert!(json.get("puzzle").is_none());
        assert!(json.get("feedback").is_none());
    }

    #[test]
    fn group_fields_are_flattened() {
        let mut snapshot = loading();
        snapshot.groups.push(GroupView {
            group: CandidateGroup::new(SlotKind::AuxStem, &["Av", "S"]).with_connectors(true),
            title: "Aux · Base".into(),
        });
        snapshot.feedback = Some(FeedbackView {
            kind: Feedback::Wrong,
            message: "Oups ! Essaie encore.".into(),
            milestone: None,
        });
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        let group = &json["groups"][0];
        assert_eq!(group["id"], "aux-stem");
        assert_eq!(group["slot"], "aux-stem");
        assert_eq!(group["color"], "amber");
        assert_eq!(group["showConnectors"], true);
        assert_eq!(group["title"], "Aux · Base");
        assert_eq!(json["feedback"]["kind"], "wrong");
    }
}
