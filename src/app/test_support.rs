use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::state::{AppState, BackendEvent};
use crate::error::TranslateError;
use crate::language::TargetLanguage;
use crate::translator::Translator;

type Script = Box<dyn Fn(&str) -> Result<String, TranslateError> + Send + Sync>;

/// In-memory translator that records calls and answers from a script.
/// When gated, each call waits for a permit handed out by `release`.
pub struct ScriptedTranslator {
    script: Script,
    calls: Mutex<Vec<(String, TargetLanguage)>>,
    gated: AtomicBool,
    gate: Semaphore,
}

impl ScriptedTranslator {
    pub fn new(
        script: impl Fn(&str) -> Result<String, TranslateError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
        })
    }

    pub fn echo() -> Arc<Self> {
        Self::new(|html| Ok(html.to_string()))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(TranslateError::MissingApiKey))
    }

    pub fn gated(self: Arc<Self>) -> Arc<Self> {
        self.gated.store(true, Ordering::SeqCst);
        self
    }

    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub fn calls(&self) -> Vec<(String, TargetLanguage)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(
        &self,
        html: &str,
        language: TargetLanguage,
    ) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push((html.to_string(), language));
        if self.gated.load(Ordering::SeqCst) {
            self.gate.acquire().await.unwrap().forget();
        }
        (self.script)(html)
    }
}

pub fn new_state(
    translator: Arc<ScriptedTranslator>,
) -> (AppState, async_channel::Receiver<BackendEvent>) {
    let (tx, rx) = async_channel::unbounded();
    let state = AppState::new(translator, TargetLanguage::default(), tx);
    (state, rx)
}
