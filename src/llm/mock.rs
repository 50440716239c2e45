//! Scripted [`LlmProvider`] test double.
//!
//! Each call pops the next scripted step (optional delay + outcome).  When
//! the script runs out the provider repeats its `otherwise` outcome, or fails
//! if none was set.  Calls and prompts are recorded for assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::provider::{GenerateOptions, LlmError, LlmProvider, ProviderError};

enum Outcome {
    Text(String),
    Fail(fn() -> LlmError),
}

struct Step {
    delay: Duration,
    outcome: Outcome,
}

pub struct ScriptedProvider {
    name: String,
    script: Mutex<VecDeque<Step>>,
    otherwise: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// A provider with an empty script that fails every call.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            otherwise: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A provider that always answers `text`.
    pub fn always(name: &str, text: impl Into<String>) -> Self {
        Self {
            otherwise: Some(text.into()),
            ..Self::new(name)
        }
    }

    /// Append a successful step.
    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.push(Duration::ZERO, Outcome::Text(text.into()))
    }

    /// Append a successful step that completes after `delay`.
    pub fn then_ok_after(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(delay, Outcome::Text(text.into()))
    }

    /// Append a failing step.
    pub fn then_fail(self, error: fn() -> LlmError) -> Self {
        self.push(Duration::ZERO, Outcome::Fail(error))
    }

    /// Append a failing step that completes after `delay`.
    pub fn then_fail_after(self, delay: Duration, error: fn() -> LlmError) -> Self {
        self.push(delay, Outcome::Fail(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn push(self, delay: Duration, outcome: Outcome) -> Self {
        self.script.lock().unwrap().push_back(Step { delay, outcome });
        self
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: GenerateOptions,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let step = self.script.lock().unwrap().pop_front();
        let outcome = match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    tokio::time::sleep(step.delay).await;
                }
                step.outcome
            }
            None => match &self.otherwise {
                Some(text) => Outcome::Text(text.clone()),
                None => Outcome::Fail(|| LlmError::Request("script exhausted".into())),
            },
        };

        match outcome {
            Outcome::Text(text) => Ok(text),
            Outcome::Fail(make) => Err(ProviderError::new(self.name.clone(), make())),
        }
    }
}
