use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// A failure escaping one stage of a frame. The session does not survive it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameFault {
    #[error("{stage} step panicked: {message}")]
    Panic {
        stage: &'static str,
        message: String,
    },
    #[error("{stage} step failed: {message}")]
    Failed {
        stage: &'static str,
        message: String,
    },
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Runs one frame stage, turning both an `Err` and a panic into a [`FrameFault`].
pub fn guarded<E: Display>(
    stage: &'static str,
    f: impl FnOnce() -> Result<(), E>,
) -> Result<(), FrameFault> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(FrameFault::Failed {
            stage,
            message: e.to_string(),
        }),
        Err(payload) => Err(FrameFault::Panic {
            stage,
            message: panic_message(&*payload),
        }),
    }
}
