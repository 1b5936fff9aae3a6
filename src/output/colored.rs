//! Terminal colors for live view lines

use super::renderer::{LiveLine, Tone};
use colored::*;

/// Color per line tone
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub heading: Color,
    pub normal: Option<Color>,
    pub good: Color,
    pub warning: Color,
    pub bad: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            heading: Color::Blue,
            normal: None,
            good: Color::Green,
            warning: Color::Yellow,
            bad: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    /// Apply the tone's color; the text itself is left untouched
    pub fn paint(&self, line: &LiveLine) -> String {
        let text = line.text.as_str();
        match line.tone {
            Tone::Heading => text.color(self.heading).bold().to_string(),
            Tone::Normal => match self.normal {
                Some(color) => text.color(color).to_string(),
                None => text.to_string(),
            },
            Tone::Good => text.color(self.good).to_string(),
            Tone::Warning => text.color(self.warning).to_string(),
            Tone::Bad => text.color(self.bad).bold().to_string(),
            Tone::Muted => text.color(self.muted).to_string(),
        }
    }
}
