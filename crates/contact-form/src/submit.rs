// File: src/submit.rs
// Purpose: Completion interface invoked with the values of a valid submit

use crate::field::FormValues;
use crate::schema::FormErrors;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Default artificial delay before a submit is reported complete
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// Why a submit did not complete
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// At least one field fails validation; the form is left untouched
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FormErrors),

    /// A previous submit is still pending
    #[error("a submit is already in progress")]
    InProgress,

    /// The completion handler reported a failure
    #[error("submit handler failed: {0}")]
    Handler(anyhow::Error),
}

/// Receives the values of a form that passed validation
///
/// Implementations replace the blocking confirmation dialog: they may
/// persist, forward or simply report the values.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, values: FormValues) -> anyhow::Result<()>;
}

/// Waits a fixed delay, then reports the values
///
/// Every completed submission is logged and, if a receiver was requested
/// through [`DelayedSubmit::with_channel`], forwarded on that channel.
#[derive(Debug, Clone)]
pub struct DelayedSubmit {
    delay: Duration,
    sink: Option<mpsc::UnboundedSender<FormValues>>,
}

impl DelayedSubmit {
    pub fn new(delay: Duration) -> Self {
        Self { delay, sink: None }
    }

    /// Also publish each submission on a channel
    pub fn with_channel(delay: Duration) -> (Self, mpsc::UnboundedReceiver<FormValues>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { delay, sink: Some(tx) }, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for DelayedSubmit {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl SubmitHandler for DelayedSubmit {
    async fn submit(&self, values: FormValues) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;

        let report = values.to_pretty_json();
        info!(submission = %report, "Contact form submitted");

        if let Some(sink) = &self.sink {
            // A dropped receiver only means nobody is listening any more
            let _ = sink.send(values);
        }
        Ok(())
    }
}
