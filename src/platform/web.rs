//! Browser bindings
//!
//! JS owns the render loop and the wallet. It hands us a ledger object with
//! two promise-returning methods:
//!
//! ```js
//! ledger.submit(requestJson)   // -> Promise<void>
//! ledger.latest(ownerString)   // -> Promise<record | recordJson | null>
//! ```
//!
//! and drives [`WebGame`] once per animation frame.

use std::time::Duration;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::LedgerError;
use crate::fingerprint::SubmissionRequest;
use crate::ledger::{LedgerClient, OwnerId, SubmissionRecord, submission_channel};
use crate::platform::{PcgRandom, SystemClock};
use crate::session::GameSession;
use crate::settings::GameConfig;
use crate::sim::DirectionInput;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Red Light / Green Light starting...");
}

/// Best-effort text for a thrown JS value
fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .or_else(|| js_sys::JSON::stringify(value).ok().and_then(|s| s.as_string()))
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Ledger backed by a JS object
struct JsLedger {
    this: JsValue,
    submit: Function,
    latest: Function,
}

impl JsLedger {
    fn new(ledger: JsValue) -> Result<Self, JsError> {
        let method = |name: &str| -> Result<Function, JsError> {
            Reflect::get(&ledger, &JsValue::from_str(name))
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok())
                .ok_or_else(|| JsError::new(&format!("ledger.{name} must be a function")))
        };
        Ok(Self {
            submit: method("submit")?,
            latest: method("latest")?,
            this: ledger,
        })
    }

    /// Call `f(arg)` and await the returned value (promise or not)
    async fn call(&self, f: &Function, arg: &str) -> Result<JsValue, LedgerError> {
        let returned = f
            .call1(&self.this, &JsValue::from_str(arg))
            .map_err(|err| LedgerError::Transport(describe(&err)))?;
        JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|err| LedgerError::Transport(describe(&err)))
    }
}

impl LedgerClient for JsLedger {
    async fn submit(&self, request: &SubmissionRequest) -> Result<(), LedgerError> {
        let json =
            serde_json::to_string(request).map_err(|e| LedgerError::Malformed(e.to_string()))?;
        self.call(&self.submit, &json).await.map(|_| ())
    }

    async fn latest_record(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<SubmissionRecord>, LedgerError> {
        let value = self.call(&self.latest, owner.as_str()).await?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }

        let json = match value.as_string() {
            Some(text) => text,
            None => js_sys::JSON::stringify(&value)
                .ok()
                .and_then(|s| s.as_string())
                .ok_or_else(|| LedgerError::Malformed("record is not JSON".into()))?,
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| LedgerError::Malformed(e.to_string()))
    }
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<SystemClock, PcgRandom>,
}

#[wasm_bindgen]
impl WebGame {
    /// `config_json` overrides the tunables stored in LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new(ledger: JsValue, config_json: Option<String>) -> Result<WebGame, JsError> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(|e| JsError::new(&e.to_string()))?,
            None => GameConfig::load(),
        };
        let timeout = Duration::from_millis(config.ledger_timeout_ms);
        let (handle, worker) = submission_channel(JsLedger::new(ledger)?, timeout);
        wasm_bindgen_futures::spawn_local(worker.run());

        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let session = GameSession::new(config, SystemClock::new(), PcgRandom::new(seed), handle)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(WebGame { session })
    }

    pub fn connect(&mut self, owner: String) {
        self.session.connect(OwnerId::new(owner));
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }

    /// Start or restart a round; returns the new round generation
    pub fn start(&mut self) -> Result<f64, JsError> {
        self.session
            .start()
            .map(|generation| generation as f64)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Advance one frame with the currently held keys; returns the status name
    pub fn tick(&mut self, up: bool, down: bool, left: bool, right: bool) -> String {
        let status = self.session.tick(DirectionInput {
            up,
            down,
            left,
            right,
        });
        serde_json::to_value(status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default()
    }

    /// Current snapshot as JSON for the renderer
    pub fn snapshot(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.session.snapshot()).map_err(|e| JsError::new(&e.to_string()))
    }
}
