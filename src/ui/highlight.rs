use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use terminal_size::{terminal_size, Width};

const THEME: &str = "Solarized (dark)";
const FALLBACK_WIDTH: usize = 60;
const MAX_WIDTH: usize = 100;

/// Width of separators and box rules, following the terminal when known.
pub fn rule_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize).clamp(20, MAX_WIDTH),
        None => FALLBACK_WIDTH,
    }
}

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(rule_width())
}

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// 24-bit escaped rendering of `code`; plain text when the language
    /// or theme is unknown.
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return code.to_string();
        };

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
                Err(_) => output.push_str(line),
            }
        }

        // Reset so colours don't bleed into the footer
        output.push_str("\x1b[0m");
        output
    }

    /// Boxed block with a `[title]` header, as used for tool output.
    pub fn boxed(&self, title: &str, body: &str, lang: &str) -> String {
        let width = rule_width();
        let header_fill = width.saturating_sub(title.chars().count() + 4);
        let body = if body.ends_with('\n') {
            body.to_string()
        } else {
            format!("{}\n", body)
        };

        format!(
            "{}[{}]{}\n{}{}\n",
            "┌─".dimmed(),
            title.cyan(),
            "─".repeat(header_fill).dimmed(),
            self.highlight(&body, lang),
            format!("└{}", "─".repeat(width.saturating_sub(1))).dimmed()
        )
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
