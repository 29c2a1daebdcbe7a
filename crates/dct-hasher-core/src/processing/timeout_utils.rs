use log::info;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Extract panic info from panic value
pub fn extract_panic_info(panic_err: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic_err.downcast_ref::<&str>() {
        format!("Panic with message: {}", s)
    } else if let Some(s) = panic_err.downcast_ref::<String>() {
        format!("Panic with message: {}", s)
    } else {
        "Unknown panic occurred".to_string()
    }
}

/// Run `task`, turning a panic into `Error::Unknown`
pub fn catch_panic<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(result) => result,
        Err(panic_err) => Err(Error::Unknown(extract_panic_info(panic_err))),
    }
}

/// Execute a function with a timeout.
///
/// The task runs on its own thread. When the timeout elapses the thread is
/// left to finish in the background and its result is discarded.
pub fn execute_with_timeout<T, F>(path: &Path, timeout: Duration, task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let handle = thread::Builder::new()
        .name("hash-with-timeout".to_string())
        .spawn(move || {
            let _ = tx.send(catch_panic(task));
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            let _ = handle.join();
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            info!(
                "TIMEOUT: hashing took too long for '{}'",
                path.display()
            );
            Err(Error::Timeout {
                path: path.to_path_buf(),
                seconds: timeout.as_secs(),
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(Error::Unknown(format!(
            "hash worker for '{}' exited without a result",
            path.display()
        ))),
    }
}
