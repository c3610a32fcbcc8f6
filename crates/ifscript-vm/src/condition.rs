//! `ProcessIf` — condition dispatch (spec.md §4.4.4).

use ifscript_core::InterpretError;
use ifscript_parser::{ForkTree, NodeId};

use crate::clock::Clock;
use crate::console::{Command, Console, TextStyle};
use crate::escape::decode;
use crate::timers::{split_query_words, SpeechHandler, SubmitHandler, TextPredicate, Timer, TimerPurpose};
use crate::Interpreter;

impl<C: Console, K: Clock> Interpreter<C, K> {
    pub(crate) fn process_if(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        textbox_text: &str,
    ) -> Result<bool, InterpretError> {
        let condition = tree.node(node).condition.clone();
        let rest = condition
            .strip_prefix("if")
            .unwrap_or(condition.as_str())
            .trim_start();
        if rest.is_empty() {
            return Ok(true);
        }

        let mut parts = rest.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or("");
        let remainder = parts.next().unwrap_or("").trim_start();

        match first {
            "timer" => self.process_if_timer(node, remainder),
            "speak" => self.process_if_speak(node, remainder),
            "text" => self.process_if_text(tree, node, remainder, textbox_text),
            "type" | "type*" | "type**" | "type***" => {
                let stars = first.matches('*').count();
                self.process_if_type(node, TextStyle::from_asterisks(stars), remainder)
            }
            _ => {
                let b = self.eval_condition_bool(rest)?;
                Ok(b)
            }
        }
    }

    fn process_if_timer(&mut self, node: NodeId, remainder: &str) -> Result<bool, InterpretError> {
        let Some(seconds_str) = remainder.strip_prefix("is") else {
            return self.fault(InterpretError::MalformedCommand(format!(
                "if timer {remainder}"
            )));
        };
        let seconds_str = seconds_str.trim();
        let seconds: f64 = match seconds_str.parse() {
            Ok(v) => v,
            Err(_) => return self.fault(InterpretError::InvalidNumber(seconds_str.to_string())),
        };
        if !seconds.is_finite() || seconds <= 0.0 {
            return self.fault(InterpretError::InvalidNumber(seconds_str.to_string()));
        }
        let ms = (seconds * 1000.0).round() as u64;
        let due = self.clock.now_ms() + ms;
        self.timers.push(Timer {
            due_ms: due,
            interval_ms: ms,
            purpose: TimerPurpose::Once { node },
        });
        log::debug!("scheduled one-shot timer: {ms}ms");
        Ok(false)
    }

    fn process_if_speak(&mut self, node: NodeId, remainder: &str) -> Result<bool, InterpretError> {
        let phrase = decode(remainder.trim());
        self.console.emit(Command::Listen(phrase.clone()));
        self.speech_handlers.push(SpeechHandler { node, phrase });
        Ok(false)
    }

    fn process_if_text(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        remainder: &str,
        textbox_text: &str,
    ) -> Result<bool, InterpretError> {
        let mut parts = remainder.splitn(2, char::is_whitespace);
        let kind = parts.next().unwrap_or("");
        let raw_query = decode(parts.next().unwrap_or("").trim());

        let predicate = match kind {
            "is" => TextPredicate::Is(raw_query),
            "!is" => TextPredicate::NotIs(raw_query),
            "has" => TextPredicate::Has(split_query_words(&raw_query)),
            "!has" => TextPredicate::NotHas(split_query_words(&raw_query)),
            "pick" => TextPredicate::Pick(split_query_words(&raw_query)),
            _ => {
                return self.fault(InterpretError::MalformedCommand(format!(
                    "if text {remainder}"
                )))
            }
        };

        self.console.emit(Command::SetInputEnabled(true));
        if textbox_text.is_empty() {
            self.submit_handlers.push(SubmitHandler { node, predicate });
        } else if predicate.matches(textbox_text) {
            self.run_node_body_and_children(tree, node, 0, textbox_text)?;
        }
        Ok(false)
    }

    fn process_if_type(
        &mut self,
        node: NodeId,
        style: TextStyle,
        remainder: &str,
    ) -> Result<bool, InterpretError> {
        let mut parts = remainder.splitn(2, char::is_whitespace);
        let ms_str = parts.next().unwrap_or("").trim();
        let text_raw = parts.next().unwrap_or("");
        let ms: u64 = match ms_str.parse() {
            Ok(v) => v,
            Err(_) => return self.fault(InterpretError::InvalidNumber(ms_str.to_string())),
        };
        let decoded = decode(text_raw);
        self.schedule_typewriter(node, 0, style, &decoded, ms);
        Ok(false)
    }
}
