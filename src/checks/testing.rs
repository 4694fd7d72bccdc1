//! Test doubles for checks and the fix UI.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::checks::traits::{Check, Diagnosis};
use crate::core::environment::EnvironmentSnapshot;
use crate::fixers::traits::{FixContext, Progress, ProgressFactory};

pub type FixLog = Arc<Mutex<Vec<String>>>;

pub struct ScriptedCheck {
    label: String,
    required: bool,
    visible: bool,
    needs_fix: bool,
    has_fix: bool,
    diagnose_error: Option<String>,
    fix_error: Option<String>,
    fix_log: FixLog,
    diagnoses: Arc<AtomicUsize>,
}

impl ScriptedCheck {
    pub fn passing(label: &str) -> Self {
        Self {
            label: label.to_string(),
            required: true,
            visible: true,
            needs_fix: false,
            has_fix: true,
            diagnose_error: None,
            fix_error: None,
            fix_log: FixLog::default(),
            diagnoses: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(label: &str) -> Self {
        Self {
            needs_fix: true,
            ..Self::passing(label)
        }
    }

    pub fn advisory(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn without_fix(mut self) -> Self {
        self.has_fix = false;
        self
    }

    pub fn broken_diagnosis(mut self, message: &str) -> Self {
        self.diagnose_error = Some(message.to_string());
        self
    }

    pub fn broken_fix(mut self, message: &str) -> Self {
        self.fix_error = Some(message.to_string());
        self
    }

    pub fn logging_to(mut self, log: &FixLog) -> Self {
        self.fix_log = Arc::clone(log);
        self
    }

    pub fn diagnose_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.diagnoses)
    }

    pub fn arc(self) -> Arc<dyn Check> {
        Arc::new(self)
    }
}

#[async_trait]
impl Check for ScriptedCheck {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn visible(&self) -> bool {
        self.visible
    }

    async fn diagnose(&self, _environment: &EnvironmentSnapshot) -> Result<Diagnosis> {
        self.diagnoses.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.diagnose_error {
            return Err(anyhow!(message.clone()));
        }
        Ok(Diagnosis {
            needs_fix: self.needs_fix,
            version: None,
        })
    }

    fn has_fix(&self) -> bool {
        self.has_fix
    }

    async fn apply_fix(&self, ctx: &FixContext<'_>) -> Result<()> {
        self.fix_log.lock().unwrap().push(self.label.clone());
        if let Some(message) = &self.fix_error {
            return Err(anyhow!(message.clone()));
        }
        ctx.progress.stop();
        Ok(())
    }
}

/// Records every progress call, shared across all indicators it creates.
#[derive(Default, Clone)]
pub struct RecordingProgress {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Progress for RecordingProgress {
    fn start(&self, message: &str) {
        self.events.lock().unwrap().push(format!("start:{}", message));
    }

    fn stop(&self) {
        self.events.lock().unwrap().push("stop".to_string());
    }

    fn fail(&self) {
        self.events.lock().unwrap().push("fail".to_string());
    }
}

impl ProgressFactory for RecordingProgress {
    fn create(&self) -> Box<dyn Progress> {
        Box::new(self.clone())
    }
}
