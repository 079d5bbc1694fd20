//! Prefetching puzzle queue.
//!
//! The queue never performs I/O itself. It hands out [`FetchRequest`]s that
//! the host executes (asynchronously in the browser, inline in tests) and
//! feeds back through [`PuzzleQueue::complete`]. Every request carries the
//! filter generation it was issued under; results for a superseded
//! generation are dropped so a language or tense change never surfaces
//! stale puzzles.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::api::error::FetchError;
use crate::api::locale::Language;
use crate::core::puzzle::PuzzleRecord;

/// Game phase as seen by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GamePhase {
    Loading,
    Playing,
    Success,
    Error,
}

/// Buffer sizing. Tuning constants, not correctness-critical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueConfig {
    /// Batch size of a foreground fetch on an empty buffer.
    pub initial_batch: usize,
    /// Start a background refill when at most this many puzzles remain.
    pub low_water: usize,
    /// Batch size of a background refill. 0 disables background refills.
    pub refill_batch: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_batch: 5,
            low_water: 2,
            refill_batch: 3,
        }
    }
}

/// Which puzzles the learner wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PuzzleFilter {
    pub language: Language,
    /// Allowed tense ids; empty means every tense.
    pub tenses: Vec<String>,
}

/// Arguments of one call to the puzzle source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchQuery {
    pub count: usize,
    /// Allowed tense ids; empty means no tense filter.
    pub tenses: Vec<String>,
    pub language: Language,
}

impl BatchQuery {
    /// Whether `tense` passes the tense filter.
    pub fn allows(&self, tense: &str) -> bool {
        self.tenses.is_empty() || self.tenses.iter().any(|t| t == tense)
    }
}

/// Something that answers batch queries synchronously.
///
/// Hosts with asynchronous transports execute [`FetchRequest`]s themselves
/// and never need this; offline datasets and tests implement it.
pub trait PuzzleSource {
    /// Up to `query.count` puzzles; an empty vec when nothing matches.
    fn fetch(&mut self, query: &BatchQuery) -> Result<Vec<PuzzleRecord>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Awaited by the learner: the buffer was empty.
    Foreground,
    /// Background top-up; failures are silent.
    Refill,
}

/// A fetch the host must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: FetchKind,
    pub generation: u64,
    pub query: BatchQuery,
}

/// Outcome of [`PuzzleQueue::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// A buffered puzzle is now current. `refill` asks for a background top-up.
    Served {
        puzzle: PuzzleRecord,
        refill: Option<FetchRequest>,
    },
    /// The buffer is empty. `None` when a foreground fetch is already in flight.
    Fetching(Option<FetchRequest>),
}

impl Advance {
    /// Requests the host has to execute.
    pub fn requests(&self) -> Vec<FetchRequest> {
        match self {
            Advance::Served { refill, .. } => refill.iter().cloned().collect(),
            Advance::Fetching(request) => request.iter().cloned().collect(),
        }
    }
}

/// Outcome of [`PuzzleQueue::complete`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A foreground fetch delivered; this puzzle is now current.
    Served(PuzzleRecord),
    /// A refill, or a foreground batch arriving while a puzzle is already
    /// current, appended this many puzzles (0 when it failed).
    Buffered(usize),
    /// A foreground fetch failed or came back empty; phase is `Error`.
    Failed,
    /// The result belonged to a superseded filter and was dropped.
    Stale,
}

pub struct PuzzleQueue {
    config: QueueConfig,
    filter: PuzzleFilter,
    buffer: VecDeque<PuzzleRecord>,
    phase: GamePhase,
    generation: u64,
    foreground_in_flight: bool,
    refill_in_flight: bool,
}

impl PuzzleQueue {
    pub fn new(config: QueueConfig, filter: PuzzleFilter) -> Self {
        Self {
            config,
            filter,
            buffer: VecDeque::new(),
            phase: GamePhase::Loading,
            generation: 0,
            foreground_in_flight: false,
            refill_in_flight: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_refilling(&self) -> bool {
        self.refill_in_flight
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn request(&self, kind: FetchKind, count: usize) -> FetchRequest {
        FetchRequest {
            kind,
            generation: self.generation,
            query: BatchQuery {
                count,
                tenses: self.filter.tenses.clone(),
                language: self.filter.language,
            },
        }
    }

    /// Serve the next puzzle, or request one.
    pub fn advance(&mut self) -> Advance {
        match self.buffer.pop_front() {
            Some(puzzle) => {
                self.set_phase(GamePhase::Playing);
                let refill = self.maybe_refill();
                Advance::Served { puzzle, refill }
            }
            None => {
                self.set_phase(GamePhase::Loading);
                if self.foreground_in_flight {
                    return Advance::Fetching(None);
                }
                self.foreground_in_flight = true;
                Advance::Fetching(Some(self.request(FetchKind::Foreground, self.config.initial_batch)))
            }
        }
    }

    fn maybe_refill(&mut self) -> Option<FetchRequest> {
        if self.config.refill_batch == 0
            || self.refill_in_flight
            || self.buffer.len() > self.config.low_water
        {
            return None;
        }
        self.refill_in_flight = true;
        log::debug!("buffer at {}, requesting refill", self.buffer.len());
        Some(self.request(FetchKind::Refill, self.config.refill_batch))
    }

    /// Feed back the result of a request issued by this queue.
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        result: Result<Vec<PuzzleRecord>, FetchError>,
    ) -> Completion {
        if request.generation != self.generation {
            log::debug!(
                "dropping {:?} result for generation {} (now {})",
                request.kind,
                request.generation,
                self.generation
            );
            return Completion::Stale;
        }

        match request.kind {
            FetchKind::Refill => {
                self.refill_in_flight = false;
                match result {
                    Ok(puzzles) => {
                        let n = puzzles.len();
                        self.buffer.extend(puzzles.into_iter().map(PuzzleRecord::normalized));
                        Completion::Buffered(n)
                    }
                    Err(e) => {
                        log::warn!("background refill failed: {}", e);
                        Completion::Buffered(0)
                    }
                }
            }
            FetchKind::Foreground => {
                self.foreground_in_flight = false;
                if matches!(self.phase, GamePhase::Playing | GamePhase::Success) {
                    // A refill already put a puzzle on screen; keep it.
                    return match result {
                        Ok(puzzles) => {
                            let n = puzzles.len();
                            self.buffer.extend(puzzles.into_iter().map(PuzzleRecord::normalized));
                            log::debug!("late foreground batch buffered ({} puzzle(s))", n);
                            Completion::Buffered(n)
                        }
                        Err(e) => {
                            log::warn!("late foreground fetch failed: {}", e);
                            Completion::Buffered(0)
                        }
                    };
                }
                match result {
                    Ok(puzzles) if !puzzles.is_empty() => {
                        self.buffer.extend(puzzles.into_iter().map(PuzzleRecord::normalized));
                        match self.buffer.pop_front() {
                            Some(puzzle) => {
                                self.set_phase(GamePhase::Playing);
                                Completion::Served(puzzle)
                            }
                            None => {
                                self.set_phase(GamePhase::Error);
                                Completion::Failed
                            }
                        }
                    }
                    Ok(_) => {
                        log::warn!("no puzzle matches {:?}", request.query);
                        self.set_phase(GamePhase::Error);
                        Completion::Failed
                    }
                    Err(e) => {
                        log::error!("puzzle fetch failed: {}", e);
                        self.set_phase(GamePhase::Error);
                        Completion::Failed
                    }
                }
            }
        }
    }

    /// Switch filter: drop everything buffered or in flight and start over.
    pub fn reset(&mut self, filter: PuzzleFilter) -> Advance {
        self.generation += 1;
        self.filter = filter;
        self.buffer.clear();
        self.foreground_in_flight = false;
        self.refill_in_flight = false;
        log::info!("queue reset (generation {})", self.generation);
        self.advance()
    }

    /// Retry after an error. Ignored in any other phase.
    pub fn retry(&mut self) -> Option<Advance> {
        if self.phase != GamePhase::Error {
            return None;
        }
        Some(self.advance())
    }

    /// The current puzzle was solved.
    pub fn mark_success(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Success);
        }
    }
}
