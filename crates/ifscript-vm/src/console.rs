//! The Console contract (spec.md §6) and its command stream.
//!
//! Grounded on `plotnik-vm`'s `engine/effect.rs`: a single `RuntimeEffect`
//! enum pushed through one trait method, rather than one trait method per
//! side effect. The Interpreter never reads the Console back; it only
//! pushes `Command`s forward.

use ifscript_core::Color;

/// Text weight/slant selected by trailing `*`/`**`/`***` on output, option,
/// and `type` lines (spec.md §4.4.5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextStyle {
    #[default]
    Normal,
    Italic,
    Bold,
    BoldItalic,
}

impl TextStyle {
    /// Parse a run of trailing `*` (0 to 3) into a style.
    pub fn from_asterisks(count: usize) -> Self {
        match count {
            0 => TextStyle::Normal,
            1 => TextStyle::Italic,
            2 => TextStyle::Bold,
            _ => TextStyle::BoldItalic,
        }
    }
}

/// A run of output text carrying a style and, for `color <hex>`, an
/// explicit foreground override.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
    pub color: Option<Color>,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::Normal,
            color: None,
        }
    }
}

/// One effect emitted by the Interpreter toward the presentation surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Clear,
    SetTitle(String),
    SetWidth(u32),
    SetHeight(u32),
    SetInputEnabled(bool),
    SetOptionColor(Color),
    SetOptionHoverColor(Color),
    SetBackgroundColor(Color),
    /// Font family/size preferences read from the header (spec.md §4.4.1,
    /// §6). Any field left `None` means "leave that preference at the
    /// host's default."
    SetFont {
        output_font: Option<String>,
        option_font: Option<String>,
        output_font_size: Option<f64>,
        option_font_size: Option<f64>,
    },
    AddText(StyledRun),
    /// An inline `link@display@fork` anchor rendered inside the output
    /// stream, as opposed to the options pane.
    AddLink(StyledRun, String),
    /// A clickable option in the bottom options pane: the rendered run,
    /// and the normalized fork it navigates to.
    AddOption(StyledRun, String),
    /// The auto-synthesized fallback option emitted when a fork's walk
    /// produced none of its own (spec.md §4.4.2): selecting it must clear
    /// the variable store before re-entering the named (first) fork,
    /// unlike an ordinary `AddOption`.
    AddRestartOption(StyledRun, String),
    AddImage(String),
    PlaySound(String),
    Speak(String),
    SpeakStop,
    /// Register a speech-recognition grammar; the Interpreter learns the
    /// host recognized it through [`crate::Interpreter::on_speech_recognized`].
    Listen(String),
}

/// The presentation surface. `emit` is the only method; a host renders
/// each `Command` however it likes (terminal, GUI, test recorder).
pub trait Console {
    fn emit(&mut self, command: Command);
}

/// Test double: records every emitted command in order, mirroring the
/// teacher's `EffectLog` replay-for-inspection pattern (repurposed here
/// from "replay for backtracking" — this engine has none — to "replay for
/// assertions").
#[derive(Default, Debug, Clone)]
pub struct RecordingConsole {
    pub commands: Vec<Command>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_runs(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::AddText(run) => Some(run.text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn option_labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::AddOption(run, _) | Command::AddRestartOption(run, _) => {
                    Some(run.text.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

impl Console for RecordingConsole {
    fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asterisk_count_selects_style() {
        assert_eq!(TextStyle::from_asterisks(0), TextStyle::Normal);
        assert_eq!(TextStyle::from_asterisks(1), TextStyle::Italic);
        assert_eq!(TextStyle::from_asterisks(2), TextStyle::Bold);
        assert_eq!(TextStyle::from_asterisks(3), TextStyle::BoldItalic);
    }

    #[test]
    fn recording_console_captures_text_and_options() {
        let mut console = RecordingConsole::new();
        console.emit(Command::AddText(StyledRun::plain("hi")));
        console.emit(Command::AddOption(StyledRun::plain("Go"), "next".into()));
        assert_eq!(console.text_runs(), vec!["hi"]);
        assert_eq!(console.option_labels(), vec!["Go"]);
    }
}
