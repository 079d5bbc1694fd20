//! End-to-end session flows through the public API.

use std::collections::VecDeque;

use conju_engine::{
    AdvanceMeasure, BatchQuery, Columns, Completion, Dataset, DatasetSource, FetchError,
    FetchKind, GameConfig, GamePhase, GameSession, Intent, Language, MemoryStore, PuzzleRecord,
    PuzzleSource, QueueConfig, SlotKind,
};

/// Replays scripted batches and counts calls.
struct Scripted {
    batches: VecDeque<Result<Vec<PuzzleRecord>, FetchError>>,
    calls: Vec<BatchQuery>,
}

impl Scripted {
    fn new(batches: Vec<Result<Vec<PuzzleRecord>, FetchError>>) -> Self {
        Self {
            batches: batches.into(),
            calls: Vec::new(),
        }
    }
}

impl PuzzleSource for Scripted {
    fn fetch(&mut self, query: &BatchQuery) -> Result<Vec<PuzzleRecord>, FetchError> {
        self.calls.push(query.clone());
        self.batches.pop_front().unwrap_or(Ok(Vec::new()))
    }
}

fn parler() -> PuzzleRecord {
    PuzzleRecord::new("parler", "Présent", "Je", "parl")
        .with_distractor_stems(&["fin"])
        .with_ending("e", &["es", "ons"])
}

fn aller() -> PuzzleRecord {
    PuzzleRecord::new("aller", "Présent", "Je", "Vais").with_distractor_stems(&["Va", "Allons"])
}

fn manger() -> PuzzleRecord {
    PuzzleRecord::new("manger", "Passé Composé", "Nous", "mang")
        .with_ending("é", &["er", "ez"])
        .with_distractor_stems(&["mange"])
        .with_auxiliary("Av", Some("ons"), &["S", "Ét"], &["ez", "ont"])
}

fn config(queue: QueueConfig) -> GameConfig {
    GameConfig {
        queue,
        ..Default::default()
    }
}

fn started(batches: Vec<Result<Vec<PuzzleRecord>, FetchError>>, queue: QueueConfig) -> (GameSession, Scripted) {
    let mut session = GameSession::new(config(queue), Box::new(MemoryStore::new()));
    let mut source = Scripted::new(batches);
    let requests = session.start();
    session.fulfill(&mut source, requests);
    (session, source)
}

#[test]
fn simple_regular_present() {
    let (mut s, _) = started(vec![Ok(vec![parler(), parler()])], QueueConfig::default());
    assert_eq!(s.phase(), GamePhase::Playing);

    s.handle(Intent::Select { slot: SlotKind::Stem, label: "parl".into() });
    s.handle(Intent::Select { slot: SlotKind::Ending, label: "es".into() });
    let wrong = s.check().expect("complete selection");
    assert!(!wrong.all_correct);
    assert!(wrong.stem);
    assert_eq!(wrong.ending, Some(false));

    s.handle(Intent::Select { slot: SlotKind::Ending, label: "e".into() });
    let right = s.check().expect("complete selection");
    assert!(right.all_correct);
    assert_eq!(s.phase(), GamePhase::Success);
    assert_eq!(s.score(), 1);
}

#[test]
fn indivisible_irregular_needs_one_piece() {
    let (mut s, _) = started(vec![Ok(vec![aller()])], QueueConfig::default());
    let groups = s.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].slot, SlotKind::Stem);

    assert!(!s.is_complete());
    s.handle(Intent::Select { slot: SlotKind::Stem, label: "Vais".into() });
    assert!(s.is_complete());
    assert!(s.check().expect("complete").all_correct);
}

#[test]
fn compound_split_on_both_sides_lays_out_by_viewport() {
    let (s, _) = started(vec![Ok(vec![manger()])], QueueConfig::default());
    let slots: Vec<SlotKind> = s.groups().iter().map(|g| g.slot).collect();
    assert_eq!(slots, SlotKind::ALL.to_vec());

    let mut measure = AdvanceMeasure::default();
    let wide = s.layout(1000.0, 1280.0, &mut measure);
    assert_eq!(wide.len(), 4);
    assert!(wide.iter().all(|t| t.columns == Columns::One));

    let narrow = s.layout(360.0, 360.0, &mut measure);
    assert!(narrow.iter().all(|t| t.columns == Columns::Two));
}

#[test]
fn draining_the_buffer_fetches_once_per_exhaustion() {
    const N: usize = 3;
    let batch: Vec<PuzzleRecord> = (0..N).map(|_| parler()).collect();
    let queue = QueueConfig {
        initial_batch: N,
        low_water: 0,
        refill_batch: 0,
    };
    let (mut s, mut source) = started(vec![Ok(batch.clone()), Ok(batch)], queue);
    assert_eq!(source.calls.len(), 1);

    // the first puzzle is on screen; N-1 remain buffered
    for _ in 0..N - 1 {
        assert!(s.handle(Intent::Advance).is_empty());
        assert_eq!(s.phase(), GamePhase::Playing);
    }
    let requests = s.handle(Intent::Advance);
    assert_eq!(requests.len(), 1);
    assert_eq!(s.phase(), GamePhase::Loading);
    // asking again while loading does not duplicate the fetch
    assert!(s.handle(Intent::Advance).is_empty());

    s.fulfill(&mut source, requests);
    assert_eq!(source.calls.len(), 2);
    assert_eq!(s.phase(), GamePhase::Playing);
}

#[test]
fn background_refill_keeps_buffer_topped_up() {
    let five: Vec<PuzzleRecord> = (0..5).map(|_| parler()).collect();
    let three: Vec<PuzzleRecord> = (0..3).map(|_| aller()).collect();
    let (mut s, mut source) = started(vec![Ok(five), Ok(three)], QueueConfig::default());

    assert!(s.handle(Intent::Advance).is_empty());
    let requests = s.handle(Intent::Advance);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, FetchKind::Refill);
    assert_eq!(requests[0].query.count, 3);
    s.fulfill(&mut source, requests);

    // 2 parler left, then the 3 refilled aller
    for _ in 0..2 {
        s.handle(Intent::Advance);
    }
    assert_eq!(s.puzzle().map(|p| p.verb.as_str()), Some("parler"));
    s.handle(Intent::Advance);
    assert_eq!(s.puzzle().map(|p| p.verb.as_str()), Some("aller"));
}

#[test]
fn late_result_for_old_filter_is_dropped() {
    let mut s = GameSession::new(GameConfig::default(), Box::new(MemoryStore::new()));
    let first = s.start();
    assert_eq!(first.len(), 1);

    let second = s.handle(Intent::SetLanguage { language: Language::Ja });
    assert_eq!(second.len(), 1);

    // the French batch arrives after the switch
    let completion = s.complete_fetch(&first[0], Ok(vec![parler()]));
    assert_eq!(completion, Completion::Stale);
    assert_eq!(s.phase(), GamePhase::Loading);
    assert!(s.puzzle().is_none());

    let completion = s.complete_fetch(&second[0], Ok(vec![aller()]));
    assert!(matches!(completion, Completion::Served(_)));
    assert_eq!(s.puzzle().map(|p| p.verb.as_str()), Some("aller"));
}

#[test]
fn empty_result_errors_and_retry_recovers() {
    let (mut s, mut source) = started(
        vec![Ok(Vec::new()), Err(FetchError::Transport("timeout".into())), Ok(vec![parler()])],
        QueueConfig::default(),
    );
    assert_eq!(s.phase(), GamePhase::Error);

    let requests = s.handle(Intent::Retry);
    s.fulfill(&mut source, requests);
    assert_eq!(s.phase(), GamePhase::Error);

    let requests = s.handle(Intent::Retry);
    s.fulfill(&mut source, requests);
    assert_eq!(s.phase(), GamePhase::Playing);
    assert_eq!(source.calls.len(), 3);
}

#[test]
fn offline_dataset_drives_a_session() {
    let json = r#"{"verb": [{
        "infinitive": "aimer",
        "translations": {"en": "to love"},
        "puzzles": [
            {"verb": "aimer", "tense": "Présent", "person": "je", "pronoun": "J'",
             "is_regular": true, "correctStem": "aim", "correctEnding": "e",
             "distractorStems": ["aime"], "distractorEndings": ["es"],
             "explanations": {"en": "Regular -er verb."}},
            {"verb": "aimer", "tense": "Imparfait", "person": "je", "pronoun": "J'",
             "is_regular": true, "correctStem": "aim", "correctEnding": "ais",
             "distractorStems": ["aime"], "distractorEndings": ["ait"],
             "explanations": {}}
        ]
    }]}"#;
    let mut source = DatasetSource::new(Dataset::from_json(json).expect("dataset"), 7);
    let mut s = GameSession::new(GameConfig::default(), Box::new(MemoryStore::new()));
    let requests = s.start();
    s.fulfill(&mut source, requests);

    let requests = s.handle(Intent::SetTenses { tenses: vec!["Imparfait".into()] });
    s.fulfill(&mut source, requests);
    let puzzle = s.puzzle().expect("puzzle served");
    assert_eq!(puzzle.tense, "Imparfait");
    assert_eq!(puzzle.translation, "to love");
    assert_eq!(puzzle.explanation, "No explanation available.");

    s.handle(Intent::Select { slot: SlotKind::Stem, label: "aim".into() });
    s.handle(Intent::Select { slot: SlotKind::Ending, label: "ais".into() });
    assert!(s.check().expect("complete").all_correct);

    let snapshot = s.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Success);
    let json = snapshot.to_json().expect("snapshot json");
    assert!(json.contains("\"solution\":\"aimais\""));
    assert!(json.contains("\"tenseLabel\":\"Imparfait\""));
}

#[test]
fn late_foreground_batch_keeps_current_puzzle_and_selection() {
    let queue = QueueConfig {
        initial_batch: 2,
        low_water: 2,
        refill_batch: 3,
    };
    let mut s = GameSession::new(config(queue), Box::new(MemoryStore::new()));
    let first = s.start();
    s.complete_fetch(&first[0], Ok(vec![parler(), parler()]));

    let refill = s.handle(Intent::Advance);
    assert_eq!(refill[0].kind, FetchKind::Refill);
    let foreground = s.handle(Intent::Advance);
    assert_eq!(foreground[0].kind, FetchKind::Foreground);
    assert_eq!(s.phase(), GamePhase::Loading);

    s.complete_fetch(&refill[0], Ok(vec![aller(), parler(), parler()]));
    s.handle(Intent::Advance);
    assert_eq!(s.puzzle().map(|p| p.verb.as_str()), Some("aller"));
    s.handle(Intent::Select { slot: SlotKind::Stem, label: "Vais".into() });

    let completion = s.complete_fetch(&foreground[0], Ok(vec![parler(), parler()]));
    assert_eq!(completion, Completion::Buffered(2));
    assert_eq!(s.puzzle().map(|p| p.verb.as_str()), Some("aller"));
    assert!(s.is_complete());
}

#[test]
fn hint_reveals_rule_summary_for_the_current_puzzle_only() {
    let mut hinted = parler();
    hinted.rule_summary = "Radical + terminaison (-e, -es, -e)".into();
    let (mut s, _) = started(vec![Ok(vec![hinted, aller()])], QueueConfig::default());

    let json = s.snapshot().to_json().expect("snapshot json");
    assert!(!json.contains("ruleSummary"));

    s.handle(Intent::ToggleHint);
    let json = s.snapshot().to_json().expect("snapshot json");
    assert!(json.contains("\"hintVisible\":true"));
    assert!(json.contains("\"ruleSummary\":\"Radical + terminaison (-e, -es, -e)\""));

    s.handle(Intent::Advance);
    assert!(!s.hint_visible());
}
