//! `ProcessText` — line-level command dispatch (spec.md §4.4.5).
//!
//! The body text is split into lines once per call and walked by index so
//! a `type` command can suspend mid-body and resume at the following
//! line once its timer finishes (see [`crate::timers::TimerPurpose::Typewriter`]).

use ifscript_core::{InterpretError, Value};
use ifscript_parser::{ForkTree, NodeId};

use crate::clock::Clock;
use crate::console::{Command, Console, StyledRun, TextStyle};
use crate::escape::decode;
use crate::Interpreter;

const RESERVED_IDENTS: &[&str] = &["true", "false", "and", "or", "not", "visited"];

impl<C: Console, K: Clock> Interpreter<C, K> {
    pub(crate) fn process_text_lines(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        start_at: usize,
    ) -> Result<(), InterpretError> {
        let lines: Vec<String> = tree
            .node(node)
            .text
            .lines()
            .map(|l| l.to_string())
            .collect();

        let mut idx = start_at;
        while idx < lines.len() {
            if self.stop_evaluation {
                return Ok(());
            }
            let line = lines[idx].trim();
            if line.is_empty() {
                idx += 1;
                continue;
            }
            if self.dispatch_line(tree, node, idx, line)? {
                // line deferred the rest of the body (a `type` command);
                // the timer continuation will resume at idx + 1.
                return Ok(());
            }
            idx += 1;
        }
        Ok(())
    }

    /// Returns `Ok(true)` if the line deferred further processing of this
    /// node's body (scheduled a timer and should stop the loop here).
    fn dispatch_line(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        line_idx: usize,
        line: &str,
    ) -> Result<bool, InterpretError> {
        if let Some(stripped) = strip_braces(line) {
            self.cmd_output(stripped);
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("link@") {
            self.cmd_link(rest)?;
            return Ok(false);
        }
        if let Some(style_suffix) = type_prefix(line) {
            let (style, remainder) = style_suffix;
            self.cmd_type(node, line_idx, style, remainder);
            return Ok(true);
        }
        if let Some(rest) = line.strip_prefix("set ").or_else(|| {
            if line == "set" {
                Some("")
            } else {
                None
            }
        }) {
            self.cmd_set(rest)?;
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("get ") {
            self.cmd_get(rest);
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("goto ") {
            self.cmd_goto(rest)?;
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("img ") {
            self.cmd_img(rest)?;
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("snd ") {
            self.cmd_snd(rest)?;
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("speak ") {
            self.cmd_speak(rest);
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("load ") {
            self.cmd_load(rest)?;
            return Ok(false);
        }
        if let Some(rest) = line.strip_prefix("color ") {
            self.cmd_color(rest)?;
            return Ok(false);
        }
        if line.contains('@') {
            self.cmd_option(line)?;
            return Ok(false);
        }
        self.fault(InterpretError::MalformedCommand(line.to_string()))?;
        Ok(false)
    }

    fn cmd_output(&mut self, body: &str) {
        let stars = body.chars().rev().take_while(|&c| c == '*').count().min(3);
        let payload = &body[..body.len() - stars];
        let run = StyledRun {
            text: decode(payload),
            style: TextStyle::from_asterisks(stars),
            color: self.current_color,
        };
        self.console.emit(Command::AddText(run));
    }

    fn cmd_link(&mut self, rest: &str) -> Result<(), InterpretError> {
        let mut parts = rest.splitn(2, '@');
        let display = parts.next().unwrap_or("");
        let fork = parts.next();
        let Some(fork) = fork else {
            return self.fault(InterpretError::MalformedCommand(format!("link@{rest}")));
        };
        let target = self.normalize_fork(fork);
        if self.prefs.link_style_text {
            // "inline link@… anchors are rendered as plain output (no
            // hover)" (spec.md §4.4.1 `link-style-text`).
            self.console.emit(Command::AddText(StyledRun::plain(decode(display))));
        } else {
            self.console
                .emit(Command::AddLink(StyledRun::plain(decode(display)), target));
        }
        Ok(())
    }

    fn cmd_option(&mut self, line: &str) -> Result<(), InterpretError> {
        let mut parts = line.splitn(2, '@');
        let display = parts.next().unwrap_or("");
        let fork = parts.next();
        let Some(fork) = fork else {
            return self.fault(InterpretError::MalformedCommand(line.to_string()));
        };
        let target = self.normalize_fork(fork);
        self.console.emit(Command::AddOption(
            StyledRun::plain(decode(display)),
            target,
        ));
        self.options_emitted += 1;
        Ok(())
    }

    fn cmd_type(&mut self, node: NodeId, line_idx: usize, style: TextStyle, remainder: &str) {
        let mut parts = remainder.splitn(2, char::is_whitespace);
        let ms_str = parts.next().unwrap_or("");
        let text_raw = parts.next().unwrap_or("");
        let ms: u64 = ms_str.trim().parse().unwrap_or(0);
        let decoded = decode(text_raw);
        self.schedule_typewriter(node, line_idx + 1, style, &decoded, ms);
    }

    fn cmd_set(&mut self, rest: &str) -> Result<(), InterpretError> {
        let rest = rest.trim();
        if rest.is_empty() {
            return self.fault(InterpretError::MalformedCommand("set".to_string()));
        }
        if let Some(eq) = rest.find('=') {
            let lhs = rest[..eq].trim();
            let rhs = rest[eq + 1..].trim();
            return self.assign(lhs, rhs);
        }
        if let Some(name) = rest.strip_prefix('!') {
            if !name.contains(char::is_whitespace) {
                return self.assign_bool(name, false);
            }
        }
        if !rest.contains(char::is_whitespace) {
            return self.assign_bool(rest, true);
        }
        let mut parts = rest.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or("");
        let ident = ifscript_core::names::normalize_ident(first);
        if self.variables.contains(&ident) {
            return self.assign(first, rest);
        }
        self.fault(InterpretError::MalformedCommand(format!("set {rest}")))
    }

    fn assign(&mut self, lhs: &str, rhs: &str) -> Result<(), InterpretError> {
        let ident = ifscript_core::names::normalize_ident(lhs);
        if ident.chars().next().is_some_and(|c| c.is_ascii_digit())
            || RESERVED_IDENTS.contains(&ident.as_str())
        {
            return self.fault(InterpretError::MalformedCommand(format!(
                "set {lhs} = {rhs}"
            )));
        }
        let value = self.eval_expr_value(rhs)?;
        self.variables.set(ident, value);
        Ok(())
    }

    fn assign_bool(&mut self, name: &str, value: bool) -> Result<(), InterpretError> {
        let ident = ifscript_core::names::normalize_ident(name);
        if ident.chars().next().is_some_and(|c| c.is_ascii_digit())
            || RESERVED_IDENTS.contains(&ident.as_str())
        {
            return self.fault(InterpretError::MalformedCommand(format!("set {name}")));
        }
        self.variables.set(ident, Value::Boolean(value));
        Ok(())
    }

    fn cmd_get(&mut self, name: &str) {
        let ident = ifscript_core::names::normalize_ident(name.trim());
        let text = self
            .variables
            .get(&ident)
            .map(|v| v.to_string())
            .unwrap_or_default();
        self.console.emit(Command::AddText(StyledRun {
            text,
            style: TextStyle::Normal,
            color: self.current_color,
        }));
    }

    fn cmd_goto(&mut self, fork: &str) -> Result<(), InterpretError> {
        let target = self.normalize_fork(fork);
        self.mark_current_visited();
        self.set_fork(&target)?;
        self.stop_evaluation = true;
        Ok(())
    }

    fn cmd_img(&mut self, rel_path: &str) -> Result<(), InterpretError> {
        let path = self.resolve_resource(&decode(rel_path.trim()));
        if !path.is_file() {
            return self.fault(InterpretError::MissingResource(path.display().to_string()));
        }
        self.console.emit(Command::AddImage(path.display().to_string()));
        Ok(())
    }

    fn cmd_snd(&mut self, rel_path: &str) -> Result<(), InterpretError> {
        let path = self.resolve_resource(&decode(rel_path.trim()));
        if !path.is_file() {
            return self.fault(InterpretError::MissingResource(path.display().to_string()));
        }
        self.console.emit(Command::PlaySound(path.display().to_string()));
        Ok(())
    }

    fn cmd_speak(&mut self, text: &str) {
        self.console.emit(Command::Speak(decode(text.trim())));
    }

    fn cmd_load(&mut self, rest: &str) -> Result<(), InterpretError> {
        let (clear_vars, rel_path) = match rest.strip_prefix("new ") {
            Some(p) => (true, p),
            None => (false, rest),
        };
        let path = self.resolve_resource(&decode(rel_path.trim()));
        self.load_file(&path, clear_vars)?;
        self.stop_evaluation = true;
        Ok(())
    }

    fn cmd_color(&mut self, hex: &str) -> Result<(), InterpretError> {
        match ifscript_core::Color::parse_hex(hex.trim()) {
            Ok(c) => {
                self.current_color = Some(c);
                Ok(())
            }
            Err(_) => self.fault(InterpretError::MalformedCommand(format!("color {hex}"))),
        }
    }
}

/// `{payload***}` -> the payload with trailing style asterisks stripped,
/// or `None` if the line isn't a brace-delimited output line.
fn strip_braces(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('{')?.strip_suffix('}')?;
    Some(inner)
}

/// Matches `type`, `type*`, `type**`, `type***` as a line-command prefix
/// and returns the selected style plus the remaining `<ms> <text>`.
fn type_prefix(line: &str) -> Option<(TextStyle, &str)> {
    for (variant, style) in [
        ("type*** ", TextStyle::BoldItalic),
        ("type** ", TextStyle::Bold),
        ("type* ", TextStyle::Italic),
        ("type ", TextStyle::Normal),
    ] {
        if let Some(rest) = line.strip_prefix(variant) {
            return Some((style, rest));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_output_braces_and_style() {
        assert_eq!(strip_braces("{hi}"), Some("hi"));
        assert_eq!(strip_braces("{hi**}"), Some("hi**"));
        assert_eq!(strip_braces("plain"), None);
    }

    #[test]
    fn recognizes_type_variants() {
        assert!(matches!(type_prefix("type 10 hi"), Some((TextStyle::Normal, "10 hi"))));
        assert!(matches!(
            type_prefix("type** 10 hi"),
            Some((TextStyle::Bold, "10 hi"))
        ));
        assert_eq!(type_prefix("typewriter"), None);
    }
}
