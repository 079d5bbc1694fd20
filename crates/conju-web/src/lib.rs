pub mod measure;
pub mod runner;
pub mod storage;

use std::cell::RefCell;

use conju_engine::{GameConfig, Intent, Language, SlotKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

pub use runner::{GameRunner, PendingFetch, PuzzleBackend};

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::error!("conju: not initialized, call app_init() first");
                None
            }
        }
    })
}

/// Fill an empty slot with the value built by `make`, returning the extra
/// output. An occupied slot is left alone and `make` is not called.
fn install<T, R>(slot: &RefCell<Option<T>>, make: impl FnOnce() -> (T, R)) -> Option<R> {
    let mut borrow = slot.borrow_mut();
    if borrow.is_some() {
        return None;
    }
    let (value, out) = make();
    *borrow = Some(value);
    Some(out)
}

/// Await each JS fetch and feed its result back into the runner.
fn spawn_fetches(pending: Vec<PendingFetch>) {
    for PendingFetch { request, promise } in pending {
        spawn_local(async move {
            let result = match promise {
                Ok(promise) => runner::resolve_fetch(promise).await,
                Err(e) => Err(e),
            };
            with_runner(|r| r.complete(&request, result));
        });
    }
}

fn log_level(config: &serde_json::Value) -> log::Level {
    config
        .get("logLevel")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(log::Level::Info)
}

/// Create the session.
///
/// `config_json` overrides [`GameConfig`] fields (empty string for defaults)
/// and may carry a `logLevel`. `fetch_fn(count, tenses, language)` must
/// return a promise of puzzle records; pass `null` to play from a dataset
/// given later to [`app_load_dataset`]. Calls after the first are ignored:
/// fetches still in flight belong to the existing session.
#[wasm_bindgen]
pub fn app_init(config_json: &str, fetch_fn: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let raw: serde_json::Value = if config_json.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    let _ = console_log::init_with_level(log_level(&raw));

    let mut config = GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if raw.get("rngSeed").is_none() {
        config.rng_seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    }

    let backend = match fetch_fn.dyn_into::<js_sys::Function>() {
        Ok(f) => PuzzleBackend::Js(f),
        Err(_) => PuzzleBackend::Unconfigured,
    };
    let installed = RUNNER.with(|cell| {
        install(cell, || {
            let mut runner = GameRunner::new(config, backend);
            let pending = runner.start();
            (runner, pending)
        })
    });
    let Some(pending) = installed else {
        log::warn!("conju: already initialized, ignoring app_init()");
        return Ok(());
    };
    spawn_fetches(pending);
    log::info!("conju: initialized");
    Ok(())
}

/// Play from an offline dataset (`{"verb": [...]}`) instead of `fetch_fn`.
#[wasm_bindgen]
pub fn app_load_dataset(json: &str) -> Result<(), JsValue> {
    let pending = with_runner(|r| r.load_dataset(json))
        .ok_or_else(|| JsValue::from_str("not initialized"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    spawn_fetches(pending);
    Ok(())
}

/// Merge extra locale tables (`{"en": {"ui": {...}, "rules": {...}}}`).
#[wasm_bindgen]
pub fn app_merge_locale(json: &str) -> Result<(), JsValue> {
    with_runner(|r| r.session_mut().locale_mut().merge_json(json))
        .ok_or_else(|| JsValue::from_str("not initialized"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn app_select(slot: &str, label: &str) {
    let Some(slot) = SlotKind::from_id(slot) else {
        log::warn!("unknown slot `{}`", slot);
        return;
    };
    with_runner(|r| {
        r.push_intent(Intent::Select {
            slot,
            label: label.to_string(),
        })
    });
}

#[wasm_bindgen]
pub fn app_check() {
    with_runner(|r| r.push_intent(Intent::Check));
}

#[wasm_bindgen]
pub fn app_advance() {
    with_runner(|r| r.push_intent(Intent::Advance));
}

#[wasm_bindgen]
pub fn app_retry() {
    with_runner(|r| r.push_intent(Intent::Retry));
}

#[wasm_bindgen]
pub fn app_set_language(code: &str) {
    let Some(language) = Language::from_code(code) else {
        log::warn!("unsupported language `{}`", code);
        return;
    };
    with_runner(|r| r.push_intent(Intent::SetLanguage { language }));
}

/// `tenses_json` is a JSON array of tense ids; `[]` selects every tense.
#[wasm_bindgen]
pub fn app_set_tenses(tenses_json: &str) -> Result<(), JsValue> {
    let tenses: Vec<String> =
        serde_json::from_str(tenses_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_runner(|r| r.push_intent(Intent::SetTenses { tenses }));
    Ok(())
}

#[wasm_bindgen]
pub fn app_dismiss_feedback() {
    with_runner(|r| r.push_intent(Intent::DismissFeedback));
}

#[wasm_bindgen]
pub fn app_toggle_hint() {
    with_runner(|r| r.push_intent(Intent::ToggleHint));
}

#[wasm_bindgen]
pub fn app_mark_onboarding_seen() {
    with_runner(|r| r.push_intent(Intent::MarkOnboardingSeen));
}

/// Apply queued intents and advance timers by `dt` seconds. Call once per frame.
#[wasm_bindgen]
pub fn app_tick(dt: f32) {
    if let Some(pending) = with_runner(|r| r.tick(dt)) {
        spawn_fetches(pending);
    }
}

/// Layout plan (JSON array of `{columns, pieceWidthPx}`) for the current trays.
#[wasm_bindgen]
pub fn app_layout(container_width_px: f32, viewport_width_px: f32) -> String {
    with_runner(|r| r.layout_json(container_width_px, viewport_width_px)).unwrap_or_else(|| "[]".to_string())
}

/// Current view snapshot as JSON.
#[wasm_bindgen]
pub fn app_snapshot() -> String {
    with_runner(|r| r.snapshot_json()).unwrap_or_else(|| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_keeps_the_first_value() {
        let slot = RefCell::new(None);
        assert_eq!(install(&slot, || (1, "first")), Some("first"));

        let mut called = false;
        let second = install(&slot, || {
            called = true;
            (2, "second")
        });
        assert_eq!(second, None);
        assert!(!called);
        assert_eq!(*slot.borrow(), Some(1));
    }

    #[test]
    fn log_level_from_config() {
        let config: serde_json::Value = serde_json::from_str(r#"{"logLevel": "debug"}"#).unwrap();
        assert_eq!(log_level(&config), log::Level::Debug);
        assert_eq!(log_level(&serde_json::Value::Null), log::Level::Info);
        let config: serde_json::Value = serde_json::from_str(r#"{"logLevel": "loud"}"#).unwrap();
        assert_eq!(log_level(&config), log::Level::Info);
    }
}
