use conju_engine::{
    BatchQuery, Dataset, DatasetError, DatasetSource, FetchError, FetchRequest, GameConfig,
    GamePhase, GameSession, Intent, PuzzleRecord,
};
use js_sys::{Array, Function, Promise};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::measure::CanvasMeasure;
use crate::storage::LocalStorageStore;

/// Where puzzle batches come from.
pub enum PuzzleBackend {
    /// Nothing yet; fetches fail with [`FetchError::Unavailable`].
    Unconfigured,
    /// `fetch_fn(count, tenses, language) -> Promise<PuzzleRecord[]>` supplied by JS.
    Js(Function),
    /// Offline dataset, answered synchronously.
    Dataset(DatasetSource),
}

/// A fetch handed to JS, awaiting its promise.
pub struct PendingFetch {
    pub request: FetchRequest,
    pub promise: Result<Promise, FetchError>,
}

/// Wires the session to the browser: puzzle backend, canvas metrics and
/// localStorage preferences.
///
/// `wasm-bindgen` cannot export the session directly, so the crate keeps one
/// runner in a `thread_local!` and exports free functions over it.
pub struct GameRunner {
    session: GameSession,
    backend: PuzzleBackend,
    measure: CanvasMeasure,
    started: bool,
}

impl GameRunner {
    pub fn new(config: GameConfig, backend: PuzzleBackend) -> Self {
        Self {
            session: GameSession::new(config, Box::new(LocalStorageStore::new())),
            backend,
            measure: CanvasMeasure::new(),
            started: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Start the session once a backend exists.
    pub fn start(&mut self) -> Vec<PendingFetch> {
        if self.started || matches!(self.backend, PuzzleBackend::Unconfigured) {
            return Vec::new();
        }
        self.started = true;
        let requests = self.session.start();
        self.dispatch(requests)
    }

    /// Switch to an offline dataset. Starts the session, or retries a failed load.
    pub fn load_dataset(&mut self, json: &str) -> Result<Vec<PendingFetch>, DatasetError> {
        let dataset = Dataset::from_json(json)?;
        log::info!("dataset loaded: {} puzzle(s)", dataset.len());
        let seed = self.session.config().rng_seed.rotate_left(17);
        self.backend = PuzzleBackend::Dataset(DatasetSource::new(dataset, seed));
        if !self.started {
            return Ok(self.start());
        }
        if self.session.phase() == GamePhase::Error {
            let requests = self.session.handle(Intent::Retry);
            return Ok(self.dispatch(requests));
        }
        Ok(Vec::new())
    }

    /// Queue an intent; it is applied on the next tick.
    pub fn push_intent(&mut self, intent: Intent) {
        self.session.push_intent(intent);
    }

    /// Apply queued intents and advance timers.
    pub fn tick(&mut self, dt: f32) -> Vec<PendingFetch> {
        let requests = self.session.process_intents();
        self.session.tick(dt);
        self.dispatch(requests)
    }

    fn dispatch(&mut self, requests: Vec<FetchRequest>) -> Vec<PendingFetch> {
        if requests.is_empty() {
            return Vec::new();
        }
        match &mut self.backend {
            PuzzleBackend::Dataset(source) => {
                self.session.fulfill(source, requests);
                Vec::new()
            }
            PuzzleBackend::Unconfigured => {
                for request in requests {
                    self.session.complete_fetch(&request, Err(FetchError::Unavailable));
                }
                Vec::new()
            }
            PuzzleBackend::Js(fetch_fn) => requests
                .into_iter()
                .map(|request| PendingFetch {
                    promise: call_fetch(fetch_fn, &request.query),
                    request,
                })
                .collect(),
        }
    }

    /// Report a resolved fetch.
    pub fn complete(&mut self, request: &FetchRequest, result: Result<Vec<PuzzleRecord>, FetchError>) {
        self.session.complete_fetch(request, result);
    }

    pub fn layout_json(&mut self, container_width_px: f32, viewport_width_px: f32) -> String {
        let plan = self
            .session
            .layout(container_width_px, viewport_width_px, &mut self.measure);
        serde_json::to_string(&plan).unwrap_or_else(|e| {
            log::error!("layout encode failed: {}", e);
            "[]".to_string()
        })
    }

    pub fn snapshot_json(&self) -> String {
        self.session.snapshot().to_json().unwrap_or_else(|e| {
            log::error!("snapshot encode failed: {}", e);
            "{}".to_string()
        })
    }
}

/// Render a thrown JS value as text.
pub fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    format!("{:?}", error)
}

fn call_fetch(fetch_fn: &Function, query: &BatchQuery) -> Result<Promise, FetchError> {
    let tenses: Array = query.tenses.iter().map(|t| JsValue::from_str(t)).collect();
    let value = fetch_fn
        .call3(
            &JsValue::NULL,
            &JsValue::from(query.count as u32),
            &tenses,
            &JsValue::from_str(query.language.code()),
        )
        .map_err(|e| FetchError::Transport(js_err(e)))?;
    Ok(match value.dyn_into::<Promise>() {
        Ok(promise) => promise,
        Err(plain) => Promise::resolve(&plain),
    })
}

/// Await a fetch promise and decode its puzzle array.
pub async fn resolve_fetch(promise: Promise) -> Result<Vec<PuzzleRecord>, FetchError> {
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| FetchError::Transport(js_err(e)))?;
    if value.is_null() || value.is_undefined() {
        return Ok(Vec::new());
    }
    let json = js_sys::JSON::stringify(&value)
        .map_err(|e| FetchError::Transport(js_err(e)))?
        .as_string()
        .ok_or_else(|| FetchError::Transport("fetch result is not serializable".to_string()))?;
    let puzzles: Vec<PuzzleRecord> = serde_json::from_str(&json)?;
    Ok(puzzles)
}
