//! Display provider traits for dependency injection

/// Provider trait for all user-facing communication
pub trait DisplayProvider {
    /// Display status messages with semantic meaning
    fn status(&self) -> Box<dyn StatusProvider>;

    /// Display progress for long-running operations
    fn progress(&self) -> Box<dyn ProgressProvider>;
}

/// Provider trait for status updates and user feedback
pub trait StatusProvider {
    /// Display a success status with optional details
    fn success(&self, item: &str, details: &str);

    /// Display an error status with details
    fn error(&self, item: &str, details: &str);

    /// Display a warning status
    fn warning(&self, message: &str);

    /// Display an info status
    fn info(&self, message: &str);

    /// Display a simple message without status symbols
    fn message(&self, text: &str);

    /// Display a list of items with bullets
    fn list(&self, items: &[&str]);
}

/// Provider trait for progress tracking
pub trait ProgressProvider {
    /// Create a spinner for operations with unknown duration
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker>;
}

/// Individual progress tracker interface
pub trait ProgressTracker {
    /// Update the message
    fn set_message(&self, message: &str);

    /// Finish with success message
    fn finish(&self, message: &str);

    /// Abandon with error message
    fn abandon(&self, message: &str);

    /// Finish and clear the spinner
    fn finish_clear(&self);
}
