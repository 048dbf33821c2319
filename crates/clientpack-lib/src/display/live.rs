//! Live display provider implementation
//!
//! Production implementation printing status lines to stdout and drawing
//! spinners with indicatif.

use super::providers::*;
use super::styling::StyleManager;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Live implementation of DisplayProvider that owns display state for the command lifecycle
pub struct LiveDisplayProvider {
    multi_progress: MultiProgress,
    styling: Arc<StyleManager>,
}

impl LiveDisplayProvider {
    pub fn new(styling: StyleManager) -> Self {
        Self::new_with_multi_progress(&MultiProgress::new(), styling)
    }

    pub fn new_with_multi_progress(multi_progress: &MultiProgress, styling: StyleManager) -> Self {
        Self {
            multi_progress: multi_progress.clone(),
            styling: Arc::new(styling),
        }
    }
}

impl DisplayProvider for LiveDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(LiveStatusProvider {
            styling: self.styling.clone(),
        })
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(LiveProgressProvider {
            parent: self.multi_progress.clone(),
            styling: self.styling.clone(),
        })
    }
}

/// Live implementation of StatusProvider
struct LiveStatusProvider {
    styling: Arc<StyleManager>,
}

impl StatusProvider for LiveStatusProvider {
    fn success(&self, item: &str, details: &str) {
        println!("{}", self.styling.format_success(&join_details(item, details)));
    }

    fn error(&self, item: &str, details: &str) {
        eprintln!("{}", self.styling.format_error(&join_details(item, details)));
    }

    fn warning(&self, message: &str) {
        eprintln!("{}", self.styling.format_warning(message));
    }

    fn info(&self, message: &str) {
        println!("{}", self.styling.format_info(message));
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }

    fn list(&self, items: &[&str]) {
        for item in items {
            println!("{}", self.styling.format_list_item(item));
        }
    }
}

fn join_details(item: &str, details: &str) -> String {
    if details.is_empty() {
        item.to_string()
    } else {
        format!("{}: {}", item, details)
    }
}

/// Live implementation of ProgressProvider
struct LiveProgressProvider {
    parent: MultiProgress,
    styling: Arc<StyleManager>,
}

impl ProgressProvider for LiveProgressProvider {
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker> {
        let bar = self.parent.add(ProgressBar::new_spinner());
        let template = if self.styling.colors_enabled() {
            "{spinner:.green} {msg}"
        } else {
            "{spinner} {msg}"
        };
        // Template is a literal; fall back to the default style if it ever fails to parse
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(self.styling.tick_strings());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Box::new(LiveProgressTracker {
            bar,
            styling: self.styling.clone(),
        })
    }
}

/// Spinner backed by an indicatif progress bar
struct LiveProgressTracker {
    bar: ProgressBar,
    styling: Arc<StyleManager>,
}

impl ProgressTracker for LiveProgressTracker {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn finish(&self, message: &str) {
        self.bar
            .finish_with_message(self.styling.format_success(message));
    }

    fn abandon(&self, message: &str) {
        self.bar
            .abandon_with_message(self.styling.format_error(message));
    }

    fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}
