//! A terminal realization of the Console contract (spec.md §6).
//!
//! Grounded on `plotnik-cli`'s `cli/args.rs` `ColorChoice` pattern for
//! detecting terminal capability, but otherwise a fresh module: nothing
//! in the teacher drives an interactive read loop, so this mirrors only
//! the shape of "one `Console` impl, printing plainly."

use std::io::{self, IsTerminal, Write};

use ifscript_vm::{Command, Console, TextStyle};

/// One pending clickable target: its display label and the fork it
/// navigates to, either from the options pane or an inline `link@`.
#[derive(Clone, Debug)]
pub struct PendingChoice {
    pub label: String,
    pub target: String,
    /// Set for the auto-synthesized restart option (spec.md §4.4.2):
    /// selecting it must clear the variable store before re-entering
    /// `target`, unlike an ordinary option or link.
    pub clear_vars: bool,
}

pub struct TermConsole {
    use_color: bool,
    pub input_enabled: bool,
    pub pending_choices: Vec<PendingChoice>,
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            use_color: io::stdout().is_terminal(),
            input_enabled: false,
            pending_choices: Vec::new(),
        }
    }

    fn style_codes(style: TextStyle) -> &'static str {
        match style {
            TextStyle::Normal => "",
            TextStyle::Italic => "\x1b[3m",
            TextStyle::Bold => "\x1b[1m",
            TextStyle::BoldItalic => "\x1b[1;3m",
        }
    }

    fn print_styled(&self, text: &str, style: TextStyle, color: Option<ifscript_core::Color>) {
        if !self.use_color {
            print!("{text}");
            return;
        }
        let mut prefix = Self::style_codes(style).to_string();
        if let Some(c) = color {
            prefix.push_str(&format!("\x1b[38;2;{};{};{}m", c.r, c.g, c.b));
        }
        if prefix.is_empty() {
            print!("{text}");
        } else {
            print!("{prefix}{text}\x1b[0m");
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TermConsole {
    fn emit(&mut self, command: Command) {
        match command {
            Command::Clear => {
                self.pending_choices.clear();
                println!();
            }
            Command::SetTitle(title) => log::debug!("title: {title}"),
            Command::SetWidth(w) => log::debug!("window width (ignored in terminal): {w}"),
            Command::SetHeight(h) => log::debug!("window height (ignored in terminal): {h}"),
            Command::SetInputEnabled(enabled) => self.input_enabled = enabled,
            Command::SetOptionColor(c) => log::debug!("option color (ignored): {c}"),
            Command::SetOptionHoverColor(c) => log::debug!("option hover color (ignored): {c}"),
            Command::SetBackgroundColor(c) => log::debug!("background color (ignored): {c}"),
            Command::SetFont {
                output_font,
                option_font,
                output_font_size,
                option_font_size,
            } => log::debug!(
                "font preferences (ignored in terminal): output={output_font:?}@{output_font_size:?}, option={option_font:?}@{option_font_size:?}"
            ),
            Command::AddText(run) => {
                self.print_styled(&run.text, run.style, run.color);
            }
            Command::AddLink(run, target) => {
                let n = self.pending_choices.len() + 1;
                self.print_styled(&format!("[{n}: {}]", run.text), run.style, run.color);
                self.pending_choices.push(PendingChoice {
                    label: run.text,
                    target,
                    clear_vars: false,
                });
            }
            Command::AddOption(run, target) => {
                let n = self.pending_choices.len() + 1;
                println!("  {n}) {}", run.text);
                self.pending_choices.push(PendingChoice {
                    label: run.text,
                    target,
                    clear_vars: false,
                });
            }
            Command::AddRestartOption(run, target) => {
                let n = self.pending_choices.len() + 1;
                println!("  {n}) {}", run.text);
                self.pending_choices.push(PendingChoice {
                    label: run.text,
                    target,
                    clear_vars: true,
                });
            }
            Command::AddImage(path) => println!("[image: {path}]"),
            Command::PlaySound(path) => println!("[sound: {path}]"),
            Command::Speak(text) => println!("[spoken: {text}]"),
            Command::SpeakStop => log::debug!("speech stopped"),
            Command::Listen(phrase) => log::debug!("listening for speech phrase: {phrase}"),
        }
        let _ = io::stdout().flush();
    }
}
