//! The Interpreter (C4, spec.md §4.4): walks a fork's tree, mutates the
//! variable store, and drives the Console.
//!
//! Grounded on `plotnik-vm`'s `engine/vm.rs` execution loop and
//! `engine/mod.rs` module shape, adapted from bytecode dispatch to
//! tree-walking dispatch over `ParseNode`.

use std::path::{Path, PathBuf};

use ifscript_core::{Color, InterpretError, ParseError, Value, VariableStore};
use ifscript_eval::{EvalConfig, Evaluator};
use ifscript_parser::{ForkTree, NodeId, Parser};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::console::{Command, Console, StyledRun, TextStyle};
use crate::header::{process_header_options, Preferences};
use crate::timers::{SpeechHandler, SubmitHandler, Timer, TimerPurpose};

/// State owned by the Interpreter (spec.md §4.4 preamble): current fork
/// name, fork table, variable store, live timers, registered submit
/// handlers, a stop-evaluation flag, presentation preferences, and a
/// reference to the Console.
pub struct Interpreter<C: Console, K: Clock> {
    pub(crate) config: EngineConfig,
    pub(crate) console: C,
    pub(crate) clock: K,
    pub(crate) evaluator: Evaluator,
    pub(crate) variables: VariableStore,
    pub(crate) prefs: Preferences,
    game_dir: PathBuf,
    parsed_header: String,
    forks: indexmap::IndexMap<String, ForkTree>,
    pub(crate) current_fork: Option<String>,
    pub(crate) current_tree: Option<ForkTree>,
    pub(crate) stop_evaluation: bool,
    pub(crate) timers: Vec<Timer>,
    pub(crate) submit_handlers: Vec<SubmitHandler>,
    pub(crate) speech_handlers: Vec<SpeechHandler>,
    pub(crate) options_emitted: u32,
    pub(crate) current_color: Option<Color>,
}

impl<C: Console, K: Clock> Interpreter<C, K> {
    pub fn new(console: C, clock: K, config: EngineConfig) -> Self {
        Self {
            config,
            console,
            clock,
            evaluator: Evaluator::new(),
            variables: VariableStore::new(),
            prefs: Preferences::default(),
            game_dir: PathBuf::new(),
            parsed_header: String::new(),
            forks: indexmap::IndexMap::new(),
            current_fork: None,
            current_tree: None,
            stop_evaluation: false,
            timers: Vec::new(),
            submit_handlers: Vec::new(),
            speech_handlers: Vec::new(),
            options_emitted: 0,
            current_color: None,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Load a file and enter its first fork (spec.md §4.3 step 6, §6 CLI
    /// surface bootstrap). `clear_vars` clears the variable store first,
    /// mirroring `load new`'s effect (testable property 4).
    pub fn load_file(&mut self, path: &Path, clear_vars: bool) -> Result<(), InterpretError> {
        let parsed = match Parser::parse_file(path) {
            Ok(p) => p,
            Err(e) => return self.report_parse_error(e, &path.display().to_string()),
        };
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        self.enter_parsed(parsed, dir, clear_vars)
    }

    /// Load an in-memory game source, as `load_file` does for a path.
    /// `game_dir` resolves any relative `img`/`snd`/`load` paths the
    /// source references. Exposed separately so tests and embedders don't
    /// need a filesystem, mirroring `Parser::parse_file`/`parse_str`.
    pub fn load_str(
        &mut self,
        source: &str,
        game_dir: PathBuf,
        clear_vars: bool,
    ) -> Result<(), InterpretError> {
        let parsed = match Parser::parse_str(source) {
            Ok(p) => p,
            Err(e) => return self.report_parse_error(e, "<in-memory source>"),
        };
        self.enter_parsed(parsed, game_dir, clear_vars)
    }

    fn report_parse_error(&self, err: ParseError, context: &str) -> Result<(), InterpretError> {
        log::debug!("parse error loading {context}: {err}");
        if self.config.strict_errors {
            Err(InterpretError::ParseFailed {
                context: context.to_string(),
                source: err,
            })
        } else {
            Ok(())
        }
    }

    fn enter_parsed(
        &mut self,
        parsed: ifscript_parser::ParsedFile,
        game_dir: PathBuf,
        clear_vars: bool,
    ) -> Result<(), InterpretError> {
        if clear_vars {
            self.variables.clear();
        }
        self.game_dir = game_dir;
        self.parsed_header = parsed.header;
        self.forks = parsed.forks;
        self.prefs = process_header_options(&self.parsed_header);
        self.apply_preferences();
        let first = self.forks.keys().next().cloned();
        match first {
            Some(name) => self.set_fork(&name),
            None => Ok(()),
        }
    }

    /// Push the window/option/background/font preferences read from the
    /// header down to the Console once, on load (spec.md §4.4.1, §6).
    fn apply_preferences(&mut self) {
        if let Some(w) = self.prefs.window_width {
            self.console.emit(Command::SetWidth(w));
        }
        if let Some(h) = self.prefs.window_height {
            self.console.emit(Command::SetHeight(h));
        }
        if let Some(c) = self.prefs.option_color {
            self.console.emit(Command::SetOptionColor(c));
        }
        if let Some(c) = self.prefs.option_hover_color {
            self.console.emit(Command::SetOptionHoverColor(c));
        }
        if let Some(c) = self.prefs.background_color {
            self.console.emit(Command::SetBackgroundColor(c));
        }
        if self.prefs.output_font.is_some()
            || self.prefs.option_font.is_some()
            || self.prefs.output_font_size.is_some()
            || self.prefs.option_font_size.is_some()
        {
            self.console.emit(Command::SetFont {
                output_font: self.prefs.output_font.clone(),
                option_font: self.prefs.option_font.clone(),
                output_font_size: self.prefs.output_font_size,
                option_font_size: self.prefs.option_font_size,
            });
        }
    }

    /// `SetFork` (spec.md §4.4.2): the atomic fork-entry sequence.
    pub fn set_fork(&mut self, fork_name: &str) -> Result<(), InterpretError> {
        let result = self.set_fork_inner(fork_name);
        self.guard_outer(result)
    }

    /// Catch a strict fault at the outer fork-load boundary when
    /// `print_errors` is set (spec.md §7): clear the screen, show the
    /// message in yellow, restore input, and swallow the error instead of
    /// propagating it to the host.
    fn guard_outer(&mut self, result: Result<(), InterpretError>) -> Result<(), InterpretError> {
        match result {
            Err(e) if self.config.print_errors => {
                self.console.emit(Command::Clear);
                self.console.emit(Command::AddText(StyledRun {
                    text: e.to_string(),
                    style: TextStyle::Normal,
                    color: Some(Color {
                        r: 255,
                        g: 255,
                        b: 0,
                    }),
                }));
                self.console.emit(Command::SetInputEnabled(true));
                Ok(())
            }
            other => other,
        }
    }

    fn set_fork_inner(&mut self, fork_name: &str) -> Result<(), InterpretError> {
        let normalized = ifscript_core::names::normalize_fork_name(fork_name);
        self.console.emit(Command::Clear);
        self.console.emit(Command::SetInputEnabled(false));
        self.console.emit(Command::SpeakStop);
        self.timers.clear();
        self.submit_handlers.clear();
        self.speech_handlers.clear();
        self.stop_evaluation = false;
        self.options_emitted = 0;
        self.current_color = None;

        let Some(tree) = self.forks.get(&normalized).cloned() else {
            return self.fault(InterpretError::UnknownFork(normalized));
        };
        self.current_fork = Some(normalized.clone());
        self.current_tree = Some(tree.clone());

        self.preorder_process(&tree, tree.root, "")?;

        if !self.stop_evaluation {
            self.mark_current_visited();
            if self.options_emitted == 0 && !self.prefs.option_default_disable {
                let label = self.prefs.option_default_text.clone();
                let restart_target = self.forks.keys().next().cloned().unwrap_or_default();
                self.console.emit(Command::AddRestartOption(
                    StyledRun::plain(label),
                    restart_target,
                ));
            }
        }
        Ok(())
    }

    /// Selecting the auto-synthesized restart option (spec.md §4.4.2):
    /// clear the variable store, then re-enter `fork_name` (always the
    /// first fork, the value carried on `Command::AddRestartOption`).
    pub fn restart_fork(&mut self, fork_name: &str) -> Result<(), InterpretError> {
        self.variables.clear();
        self.set_fork(fork_name)
    }

    pub(crate) fn mark_current_visited(&mut self) {
        if let Some(fork) = self.current_fork.clone() {
            self.variables.mark_visited(&fork);
        }
    }

    pub(crate) fn normalize_fork(&self, raw: &str) -> String {
        ifscript_core::names::normalize_fork_name(raw)
    }

    pub(crate) fn resolve_resource(&self, rel_path: &str) -> PathBuf {
        self.game_dir.join(rel_path)
    }

    /// Fail, returning an error if `strict_errors`, otherwise swallowing
    /// it and yielding `T::default()` (spec.md §4.4.7/§7).
    pub(crate) fn fault<T: Default>(&self, err: InterpretError) -> Result<T, InterpretError> {
        if self.config.strict_errors {
            log::debug!("fatal interpret error: {err}");
            Err(err)
        } else {
            log::trace!("swallowed interpret error: {err}");
            Ok(T::default())
        }
    }

    pub(crate) fn prepare_evaluator(&mut self) {
        self.evaluator.reset(EvalConfig {
            include_unknowns: true,
        });
        let vars: Vec<(String, Value)> = self
            .variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        for (name, value) in vars {
            self.evaluator.register(name, value);
        }
        if let Some(fork) = self.current_fork.clone() {
            self.evaluator
                .register("visited", Value::Boolean(self.variables.is_visited(&fork)));
        }
    }

    pub(crate) fn eval_condition_bool(&mut self, expr: &str) -> Result<bool, InterpretError> {
        self.prepare_evaluator();
        match self.evaluator.eval(expr) {
            Ok(Value::Boolean(b)) => Ok(b),
            Ok(_) => self.fault(InterpretError::NonBooleanCondition(expr.to_string())),
            Err(e) => self.fault(InterpretError::Evaluator(e.to_string())),
        }
    }

    pub(crate) fn eval_expr_value(&mut self, expr: &str) -> Result<Value, InterpretError> {
        self.prepare_evaluator();
        match self.evaluator.eval(expr) {
            Ok(v) => Ok(v),
            Err(e) => self.fault(InterpretError::Evaluator(e.to_string())),
        }
    }

    pub(crate) fn schedule_typewriter(
        &mut self,
        node: NodeId,
        resume_at: usize,
        style: TextStyle,
        text: &str,
        ms: u64,
    ) {
        let remaining: Vec<char> = text.chars().collect();
        let due = self.clock.now_ms() + ms;
        self.timers.push(Timer {
            due_ms: due,
            interval_ms: ms,
            purpose: TimerPurpose::Typewriter {
                node,
                resume_at,
                style,
                remaining,
            },
        });
    }

    /// Pre-order walk (spec.md §4.4.3 `PreorderProcess`).
    pub(crate) fn preorder_process(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        textbox_text: &str,
    ) -> Result<(), InterpretError> {
        if self.stop_evaluation {
            return Ok(());
        }
        if self.process_if(tree, node, textbox_text)? {
            self.process_text_lines(tree, node, 0)?;
            if self.stop_evaluation {
                return Ok(());
            }
            self.recurse_children(tree, node, textbox_text)?;
        }
        Ok(())
    }

    pub(crate) fn recurse_children(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        textbox_text: &str,
    ) -> Result<(), InterpretError> {
        let children = tree.node(node).children.clone();
        for child in children {
            if self.stop_evaluation {
                break;
            }
            self.preorder_process(tree, child, textbox_text)?;
        }
        Ok(())
    }

    /// Resume a node whose condition already fired (timer, typewriter,
    /// matched submit/speech handler): run its body from `resume_at`,
    /// then its children, without re-evaluating `ProcessIf`.
    pub(crate) fn run_node_body_and_children(
        &mut self,
        tree: &ForkTree,
        node: NodeId,
        resume_at: usize,
        textbox_text: &str,
    ) -> Result<(), InterpretError> {
        self.process_text_lines(tree, node, resume_at)?;
        if self.stop_evaluation {
            return Ok(());
        }
        self.recurse_children(tree, node, textbox_text)?;
        Ok(())
    }

    /// Host entry point: the textbox received `text` (spec.md §4.4.4
    /// `if text …`).
    pub fn on_submit(&mut self, text: &str) -> Result<(), InterpretError> {
        let result = self.on_submit_inner(text);
        self.guard_outer(result)
    }

    fn on_submit_inner(&mut self, text: &str) -> Result<(), InterpretError> {
        let Some(tree) = self.current_tree.clone() else {
            return Ok(());
        };
        let matched: Vec<NodeId> = self
            .submit_handlers
            .iter()
            .filter(|h| h.predicate.matches(text))
            .map(|h| h.node)
            .collect();
        self.submit_handlers.retain(|h| !h.predicate.matches(text));
        for node in matched {
            if self.stop_evaluation {
                break;
            }
            self.run_node_body_and_children(&tree, node, 0, text)?;
        }
        Ok(())
    }

    /// Host entry point: the speech recognizer matched `phrase` (spec.md
    /// §4.4.4 `if speak …`).
    pub fn on_speech_recognized(&mut self, phrase: &str) -> Result<(), InterpretError> {
        let result = self.on_speech_recognized_inner(phrase);
        self.guard_outer(result)
    }

    fn on_speech_recognized_inner(&mut self, phrase: &str) -> Result<(), InterpretError> {
        let Some(tree) = self.current_tree.clone() else {
            return Ok(());
        };
        let matched: Vec<NodeId> = self
            .speech_handlers
            .iter()
            .filter(|h| h.phrase.eq_ignore_ascii_case(phrase.trim()))
            .map(|h| h.node)
            .collect();
        self.speech_handlers
            .retain(|h| !h.phrase.eq_ignore_ascii_case(phrase.trim()));
        for node in matched {
            if self.stop_evaluation {
                break;
            }
            self.run_node_body_and_children(&tree, node, 0, "")?;
        }
        Ok(())
    }

    /// Host entry point: drive every timer whose delay has elapsed
    /// (spec.md §5 "Suspension points"). The host calls this between
    /// reading input; nothing here spawns a real OS timer or thread.
    pub fn fire_due_timers(&mut self) -> Result<(), InterpretError> {
        let result = self.fire_due_timers_inner();
        self.guard_outer(result)
    }

    fn fire_due_timers_inner(&mut self) -> Result<(), InterpretError> {
        loop {
            let now = self.clock.now_ms();
            let Some(idx) = self.timers.iter().position(|t| t.due_ms <= now) else {
                break;
            };
            let timer = self.timers.remove(idx);
            match timer.purpose {
                TimerPurpose::Once { node } => {
                    let Some(tree) = self.current_tree.clone() else {
                        continue;
                    };
                    self.run_node_body_and_children(&tree, node, 0, "")?;
                }
                TimerPurpose::Typewriter {
                    node,
                    resume_at,
                    style,
                    mut remaining,
                } => {
                    if remaining.is_empty() {
                        // Every character has already been emitted on a
                        // prior tick; this tick resumes the node's body.
                        let Some(tree) = self.current_tree.clone() else {
                            continue;
                        };
                        self.run_node_body_and_children(&tree, node, resume_at, "")?;
                    } else {
                        let ch = remaining.remove(0);
                        self.console.emit(Command::AddText(StyledRun {
                            text: ch.to_string(),
                            style,
                            color: self.current_color,
                        }));
                        self.timers.push(Timer {
                            due_ms: now + timer.interval_ms,
                            interval_ms: timer.interval_ms,
                            purpose: TimerPurpose::Typewriter {
                                node,
                                resume_at,
                                style,
                                remaining,
                            },
                        });
                    }
                }
            }
            if self.stop_evaluation {
                break;
            }
        }
        Ok(())
    }
}
