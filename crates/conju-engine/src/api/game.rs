use serde::{Deserialize, Serialize};

use crate::api::error::FetchError;
use crate::api::locale::{Language, Locale};
use crate::api::prefs::{KeyValueStore, Preferences, KEY_LANGUAGE};
use crate::api::types::SlotKind;
use crate::bridge::protocol::{FeedbackView, GroupView, PuzzleView, ViewSnapshot, PROTOCOL_VERSION};
use crate::components::tray::{CandidateGroup, Round};
use crate::core::puzzle::PuzzleRecord;
use crate::core::queue::{
    Advance, Completion, FetchRequest, GamePhase, PuzzleFilter, PuzzleQueue, PuzzleSource, QueueConfig,
};
use crate::core::rng::Rng;
use crate::core::time::Countdown;
use crate::input::queue::{Intent, IntentQueue};
use crate::systems::layout::{compute_layout, LayoutConfig, LayoutPlan};
use crate::systems::text::TextMeasure;
use crate::systems::validation::{is_complete, validate, ValidationResult};

/// Configuration for a session, provided by the host.
/// Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub queue: QueueConfig,
    pub layout: LayoutConfig,
    /// Seconds before wrong-answer feedback hides itself (default: 3).
    pub feedback_clear_secs: f32,
    /// Seed for piece shuffling.
    pub rng_seed: u64,
    /// Language used when no preference is stored.
    pub language: Language,
    /// Show the milestone banner every N solved puzzles. 0 disables it.
    pub milestone_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            layout: LayoutConfig::default(),
            feedback_clear_secs: 3.0,
            rng_seed: 0x2545_F491_4F6C_DD1D,
            language: Language::default(),
            milestone_every: 1,
        }
    }
}

impl GameConfig {
    /// Parse a JSON override; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// Stays until the next puzzle.
    Correct,
    /// Hides on the next selection, on dismissal or after a delay.
    Wrong,
}

impl Feedback {
    /// Locale key of the message.
    pub fn message_key(self) -> &'static str {
        match self {
            Feedback::Correct => "correct",
            Feedback::Wrong => "wrong",
        }
    }
}

/// One learner session: the puzzle queue, the current round, feedback,
/// score and preferences.
///
/// Sans-IO: operations that need puzzles return [`FetchRequest`]s which the
/// host performs and reports back with [`GameSession::complete_fetch`].
pub struct GameSession {
    config: GameConfig,
    queue: PuzzleQueue,
    round: Option<Round>,
    rng: Rng,
    prefs: Preferences,
    store: Box<dyn KeyValueStore>,
    locale: Locale,
    intents: IntentQueue,
    score: u32,
    feedback: Option<Feedback>,
    validation: Option<ValidationResult>,
    feedback_timer: Countdown,
    hint_visible: bool,
}

impl GameSession {
    /// Create a session. Preferences are read from `store`; the configured
    /// language applies when none is stored.
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>) -> Self {
        let mut prefs = Preferences::load_or_default(store.as_ref());
        if store.get(KEY_LANGUAGE).is_none() {
            prefs.language = config.language;
        }
        let filter = PuzzleFilter {
            language: prefs.language,
            tenses: prefs.tenses.clone(),
        };
        Self {
            queue: PuzzleQueue::new(config.queue.clone(), filter),
            rng: Rng::new(config.rng_seed),
            locale: Locale::new(prefs.language),
            round: None,
            prefs,
            store,
            intents: IntentQueue::new(),
            score: 0,
            feedback: None,
            validation: None,
            feedback_timer: Countdown::new(),
            hint_visible: false,
            config,
        }
    }

    /// Request the first puzzle.
    pub fn start(&mut self) -> Vec<FetchRequest> {
        log::info!(
            "session start: language={} tenses={:?}",
            self.prefs.language.code(),
            self.prefs.tenses
        );
        let advance = self.queue.advance();
        self.apply(advance)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.queue.phase()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn locale_mut(&mut self) -> &mut Locale {
        &mut self.locale
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn puzzle(&self) -> Option<&PuzzleRecord> {
        self.round.as_ref().map(Round::puzzle)
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Every existing slot of the current puzzle has a selection.
    pub fn is_complete(&self) -> bool {
        self.round
            .as_ref()
            .is_some_and(|r| is_complete(r.puzzle(), r.selection()))
    }

    fn apply(&mut self, advance: Advance) -> Vec<FetchRequest> {
        let requests = advance.requests();
        match advance {
            Advance::Served { puzzle, .. } => self.begin_round(puzzle),
            Advance::Fetching(_) => self.end_round(),
        }
        requests
    }

    fn begin_round(&mut self, puzzle: PuzzleRecord) {
        log::debug!("new puzzle: {} / {} / {}", puzzle.verb, puzzle.tense, puzzle.person);
        self.round = Some(Round::new(puzzle, &mut self.rng));
        self.feedback = None;
        self.validation = None;
        self.feedback_timer.cancel();
        self.hint_visible = false;
    }

    fn end_round(&mut self) {
        self.round = None;
        self.feedback = None;
        self.validation = None;
        self.feedback_timer.cancel();
        self.hint_visible = false;
    }

    /// Queue an intent for the next [`GameSession::process_intents`].
    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Handle every queued intent in order.
    pub fn process_intents(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        for intent in self.intents.drain() {
            requests.extend(self.handle(intent));
        }
        requests
    }

    /// Apply one learner intent. Returns the fetches it requires.
    pub fn handle(&mut self, intent: Intent) -> Vec<FetchRequest> {
        match intent {
            Intent::Select { slot, label } => {
                self.select(slot, &label);
                Vec::new()
            }
            Intent::Check => {
                self.check();
                Vec::new()
            }
            Intent::Advance => {
                let advance = self.queue.advance();
                self.apply(advance)
            }
            Intent::Retry => match self.queue.retry() {
                Some(advance) => self.apply(advance),
                None => Vec::new(),
            },
            Intent::SetLanguage { language } => self.set_language(language),
            Intent::SetTenses { tenses } => self.set_tenses(tenses),
            Intent::DismissFeedback => {
                self.clear_wrong_feedback();
                Vec::new()
            }
            Intent::ToggleHint => {
                if self.round.is_some() {
                    self.hint_visible = !self.hint_visible;
                }
                Vec::new()
            }
            Intent::MarkOnboardingSeen => {
                if !self.prefs.onboarding_seen {
                    self.prefs.onboarding_seen = true;
                    self.prefs.save(self.store.as_mut());
                }
                Vec::new()
            }
        }
    }

    /// Toggle a piece. Ignored unless a puzzle is being played.
    pub fn select(&mut self, slot: SlotKind, label: &str) -> bool {
        if self.queue.phase() != GamePhase::Playing {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        if !round.select(slot, label) {
            log::debug!("ignoring unknown piece {:?} for {:?}", label, slot);
            return false;
        }
        self.validation = None;
        self.clear_wrong_feedback();
        true
    }

    fn clear_wrong_feedback(&mut self) {
        if self.feedback == Some(Feedback::Wrong) {
            self.feedback = None;
            self.feedback_timer.cancel();
        }
    }

    /// Score the current selection. `None` when nothing can be checked:
    /// no puzzle in play or an incomplete selection.
    pub fn check(&mut self) -> Option<ValidationResult> {
        if self.queue.phase() != GamePhase::Playing {
            return None;
        }
        let round = self.round.as_ref()?;
        if !is_complete(round.puzzle(), round.selection()) {
            log::debug!("check refused: selection incomplete");
            return None;
        }
        let result = validate(round.puzzle(), round.selection());
        if result.all_correct {
            self.score += 1;
            self.queue.mark_success();
            self.feedback = Some(Feedback::Correct);
            self.feedback_timer.cancel();
            log::info!("solved, score {}", self.score);
        } else {
            self.feedback = Some(Feedback::Wrong);
            self.feedback_timer.start(self.config.feedback_clear_secs);
        }
        self.validation = Some(result);
        Some(result)
    }

    fn set_language(&mut self, language: Language) -> Vec<FetchRequest> {
        self.locale.set_language(language);
        if self.prefs.language == language {
            return Vec::new();
        }
        self.prefs.language = language;
        self.prefs.save(self.store.as_mut());
        self.reset_queue()
    }

    fn set_tenses(&mut self, tenses: Vec<String>) -> Vec<FetchRequest> {
        let mut deduped: Vec<String> = Vec::with_capacity(tenses.len());
        for tense in tenses {
            if !deduped.contains(&tense) {
                deduped.push(tense);
            }
        }
        if self.prefs.tenses == deduped {
            return Vec::new();
        }
        self.prefs.tenses = deduped;
        self.prefs.save(self.store.as_mut());
        self.reset_queue()
    }

    fn reset_queue(&mut self) -> Vec<FetchRequest> {
        let filter = PuzzleFilter {
            language: self.prefs.language,
            tenses: self.prefs.tenses.clone(),
        };
        let advance = self.queue.reset(filter);
        self.apply(advance)
    }

    /// Feed back the outcome of a request returned by this session.
    pub fn complete_fetch(
        &mut self,
        request: &FetchRequest,
        result: Result<Vec<PuzzleRecord>, FetchError>,
    ) -> Completion {
        let completion = self.queue.complete(request, result);
        match &completion {
            Completion::Served(puzzle) => self.begin_round(puzzle.clone()),
            Completion::Failed => self.end_round(),
            Completion::Buffered(_) | Completion::Stale => {}
        }
        completion
    }

    /// Perform `requests` against a synchronous source, in order.
    pub fn fulfill(&mut self, source: &mut dyn PuzzleSource, requests: Vec<FetchRequest>) {
        for request in requests {
            let result = source.fetch(&request.query);
            self.complete_fetch(&request, result);
        }
    }

    /// Advance timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.feedback_timer.tick(dt) && self.feedback == Some(Feedback::Wrong) {
            self.feedback = None;
        }
    }

    /// Trays of the current puzzle, auxiliary first.
    pub fn groups(&self) -> Vec<CandidateGroup> {
        self.round.as_ref().map(Round::groups).unwrap_or_default()
    }

    /// Layout plan for the current trays.
    pub fn layout<M: TextMeasure + ?Sized>(
        &self,
        container_width_px: f32,
        viewport_width_px: f32,
        measure: &mut M,
    ) -> LayoutPlan {
        let viewport = self.config.layout.classify(viewport_width_px);
        compute_layout(&self.groups(), container_width_px, viewport, &self.config.layout, measure)
    }

    fn milestone(&self) -> Option<String> {
        let every = self.config.milestone_every;
        let reached = self.phase() == GamePhase::Success && every > 0 && self.score > 0 && self.score % every == 0;
        reached.then(|| self.locale.milestone(self.score))
    }

    /// Everything the view layer renders, localized.
    pub fn snapshot(&self) -> ViewSnapshot {
        let phase = self.phase();
        let puzzle = self.round.as_ref().map(|round| {
            let p = round.puzzle();
            let solved = phase == GamePhase::Success;
            PuzzleView {
                verb: p.verb.clone(),
                translation: p.translation.clone(),
                tense: p.tense.clone(),
                tense_label: self.locale.tense(&p.tense).to_string(),
                pronoun: p.pronoun.clone(),
                is_regular: p.is_regular,
                rule_summary: self.hint_visible.then(|| p.rule_summary.clone()),
                explanation: solved.then(|| p.explanation.clone()),
                solution: solved.then(|| p.solution()),
            }
        });
        let groups = self
            .groups()
            .into_iter()
            .map(|group| GroupView {
                title: self.locale.t(group.title_key).to_string(),
                group,
            })
            .collect();
        let feedback = self.feedback.map(|kind| FeedbackView {
            kind,
            message: self.locale.t(kind.message_key()).to_string(),
            milestone: if kind == Feedback::Correct { self.milestone() } else { None },
        });

        ViewSnapshot {
            protocol_version: PROTOCOL_VERSION,
            phase,
            score: self.score,
            language: self.prefs.language,
            tenses: self.prefs.tenses.clone(),
            onboarding_seen: self.prefs.onboarding_seen,
            puzzle,
            groups,
            validation: self.validation,
            feedback,
            hint_visible: self.hint_visible,
            complete: self.is_complete(),
        }
    }
}
