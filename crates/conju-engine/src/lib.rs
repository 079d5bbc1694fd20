pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Feedback, GameConfig, GameSession};
pub use api::error::{DatasetError, FetchError, PrefsError};
pub use api::locale::{GrammarRule, Language, Locale, LocaleTables};
pub use api::prefs::{KeyValueStore, MemoryStore, Preferences};
pub use api::types::{SlotKind, TrayColor, Viewport};
pub use core::puzzle::PuzzleRecord;
pub use core::queue::{
    Advance, BatchQuery, Completion, FetchKind, FetchRequest, GamePhase,
    PuzzleFilter, PuzzleQueue, PuzzleSource, QueueConfig,
};
pub use core::rng::Rng;
pub use core::time::Countdown;
pub use components::selection::SelectionState;
pub use components::tray::{clean_and_shuffle, CandidateGroup, Round};
pub use systems::layout::{compute_layout, Columns, LayoutConfig, LayoutPlan, TrayLayout, ViewportMetrics};
pub use systems::text::{AdvanceMeasure, FontSpec, NullMeasure, TextMeasure};
pub use systems::validation::{is_complete, validate, ValidationResult};
pub use input::queue::{Intent, IntentQueue};
pub use assets::dataset::{Dataset, DatasetSource, VerbEntry};
pub use assets::validator::{validate_batch, validate_dataset, Issue, IssueLevel};
pub use bridge::protocol::{ViewSnapshot, PROTOCOL_VERSION};
