use crate::error::FormError;
use crate::result::ProcessingResult;
use crate::upload::SubmitOutcome;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    Idle,
    Submitting {
        file_name: String,
        customer_name: String,
        started: Instant,
    },
    Success(String),
    Error(FormError),
}

impl Default for FormPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Names the stored result was produced for; used for the download name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultOrigin {
    pub file_name: String,
    pub customer_name: String,
}

#[derive(Default)]
pub struct FormState {
    pub phase: FormPhase,
    result: Option<(ProcessingResult, ResultOrigin)>,
    /// Outcome of the last "Download" click for the current result.
    pub download: Option<Result<PathBuf, FormError>>,
    pub outcome_receiver: Option<Receiver<SubmitOutcome>>,
}

impl FormState {
    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref().map(|(result, _)| result)
    }

    pub fn result_origin(&self) -> Option<&ResultOrigin> {
        self.result.as_ref().map(|(_, origin)| origin)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting { .. })
    }

    pub fn begin_submit(
        &mut self,
        file_name: String,
        customer_name: String,
        receiver: Receiver<SubmitOutcome>,
    ) {
        self.result = None;
        self.download = None;
        self.outcome_receiver = Some(receiver);
        self.phase = FormPhase::Submitting {
            file_name,
            customer_name,
            started: Instant::now(),
        };
    }

    pub fn fail(&mut self, error: FormError) {
        self.result = None;
        self.download = None;
        self.outcome_receiver = None;
        self.phase = FormPhase::Error(error);
    }

    pub fn complete(&mut self, outcome: SubmitOutcome) {
        self.outcome_receiver = None;
        match outcome.result {
            Ok(body) => {
                self.phase = FormPhase::Success(format!(
                    "File '{}' processed successfully for customer '{}'!",
                    outcome.file_name, outcome.customer_name
                ));
                self.result = Some((
                    ProcessingResult::new(body),
                    ResultOrigin {
                        file_name: outcome.file_name,
                        customer_name: outcome.customer_name,
                    },
                ));
            }
            Err(error) => self.fail(error),
        }
    }

    /// Dismisses a finished notice; the stored result is kept.
    pub fn acknowledge(&mut self) {
        if matches!(self.phase, FormPhase::Success(_) | FormPhase::Error(_)) {
            self.phase = FormPhase::Idle;
        }
    }
}
