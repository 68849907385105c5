//! Progress reporting hooks for long-running operations.

/// Receives `(percent, message)` checkpoints. Percent is in `0..=100`.
pub trait ProgressObserver {
    fn on_progress(&mut self, percent: u8, message: &str);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _percent: u8, _message: &str) {}
}

/// Forwards checkpoints to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, percent: u8, message: &str) {
        log::info!("[{:>3}%] {}", percent, message);
    }
}

impl<F: FnMut(u8, &str)> ProgressObserver for F {
    fn on_progress(&mut self, percent: u8, message: &str) {
        self(percent, message)
    }
}
