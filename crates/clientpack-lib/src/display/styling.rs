//! Color- and glyph-aware formatting for status lines

use console::Style;

/// Style manager resolved once per session from the color intent
#[derive(Debug, Clone)]
pub struct StyleManager {
    colors: bool,
    unicode: bool,
}

impl StyleManager {
    pub fn new(colors: bool) -> Self {
        let unicode = console::Term::stderr().features().wants_emoji();
        Self { colors, unicode }
    }

    /// Plain ASCII, no color. Used by tests and non-interactive output.
    pub fn plain() -> Self {
        Self {
            colors: false,
            unicode: false,
        }
    }

    pub fn colors_enabled(&self) -> bool {
        self.colors
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colors {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn glyph(&self, unicode: &'static str, ascii: &'static str) -> &'static str {
        if self.unicode { unicode } else { ascii }
    }

    pub fn format_success(&self, message: &str) -> String {
        let symbol = self.glyph("✓", "+");
        self.paint(Style::new().green(), &format!("{symbol} {message}"))
    }

    pub fn format_error(&self, message: &str) -> String {
        let symbol = self.glyph("✗", "x");
        self.paint(Style::new().red(), &format!("{symbol} {message}"))
    }

    pub fn format_warning(&self, message: &str) -> String {
        self.paint(Style::new().yellow(), &format!("! {message}"))
    }

    pub fn format_info(&self, message: &str) -> String {
        let symbol = self.glyph("·", "-");
        self.paint(Style::new().cyan(), &format!("{symbol} {message}"))
    }

    pub fn format_list_item(&self, item: &str) -> String {
        format!("  {} {item}", self.glyph("•", "*"))
    }

    /// Spinner frames for indicatif
    pub fn tick_strings(&self) -> &'static [&'static str] {
        if self.unicode {
            &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]
        } else {
            &["-", "\\", "|", "/", "+"]
        }
    }
}

#[cfg(test)]
mod tests {
    include!("styling.test.rs");
}
