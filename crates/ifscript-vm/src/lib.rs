//! The Interpreter crate (C4/C5, spec.md §4.4): fork-entry semantics,
//! line/condition dispatch, timers, and the Console contract it drives.
//!
//! Grounded throughout on `plotnik-vm`'s module split: `engine/` owns
//! execution state and dispatch, a single effect trait decouples it from
//! presentation. This crate keeps that split — `interpreter` owns the
//! walk, `console` is the effect boundary, `commands`/`condition` are the
//! two dispatch tables the teacher's engine also splits apart.

mod clock;
mod commands;
mod condition;
mod config;
mod console;
mod escape;
mod header;
mod interpreter;
mod timers;

pub use clock::{Clock, ManualClock};
pub use config::EngineConfig;
pub use console::{Command, Console, RecordingConsole, StyledRun, TextStyle};
pub use header::{process_header_options, Preferences};
pub use interpreter::Interpreter;
pub use timers::{SpeechHandler, SubmitHandler, TextPredicate, Timer, TimerPurpose};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn interp() -> Interpreter<RecordingConsole, ManualClock> {
        Interpreter::new(RecordingConsole::new(), ManualClock::new(), EngineConfig::default())
    }

    #[test]
    fn s1_minimal_fork_shows_text_and_auto_restart_option() {
        let mut vm = interp();
        vm.load_str("@start\n{Hello, world.}", PathBuf::from("."), false)
            .unwrap();
        assert_eq!(vm.console().text_runs(), vec!["Hello, world."]);
        assert_eq!(vm.console().option_labels(), vec!["restart"]);
        assert!(matches!(
            vm.console().commands.last(),
            Some(Command::AddRestartOption(_, target)) if target == "start"
        ));
    }

    #[test]
    fn restart_option_clears_variables_before_reentering_first_fork() {
        let mut vm = interp();
        vm.load_str(
            "@start\nGo@second\n@second\nset score = 5\n{in second}",
            PathBuf::from("."),
            false,
        )
        .unwrap();

        vm.set_fork("second").unwrap();
        assert_eq!(vm.variables().get("score").unwrap().to_string(), "5");

        vm.restart_fork("start").unwrap();
        assert_eq!(vm.variables().get("score"), None);
        assert!(matches!(
            vm.console().commands.last(),
            Some(Command::AddOption(run, target))
                if run.text == "Go" && target == "second"
        ));
    }

    #[test]
    fn s2_conditional_branch_picks_the_true_arm() {
        let mut vm = interp();
        vm.load_str(
            "@start\nset x = 2\nif x > 1\n{big}\nendif\nif x < 1\n{small}\nendif",
            PathBuf::from("."),
            false,
        )
        .unwrap();
        assert_eq!(vm.console().text_runs(), vec!["big"]);
        assert_eq!(vm.variables().get("x").unwrap().to_string(), "2");
        assert_eq!(
            vm.variables().get("visitedstart"),
            Some(&ifscript_core::Value::Boolean(true))
        );
    }

    #[test]
    fn s3_option_navigation_transitions_fork_and_marks_both_visited() {
        let mut vm = interp();
        vm.load_str("@start\nGo@next\n@next\n{arrived}", PathBuf::from("."), false)
            .unwrap();
        assert_eq!(vm.console().option_labels(), vec!["Go"]);

        vm.set_fork("next").unwrap();
        assert_eq!(vm.console().text_runs(), vec!["arrived"]);
        assert!(vm.variables().is_visited("start"));
        assert!(vm.variables().is_visited("next"));
    }

    #[test]
    fn s4_textbox_pick_matches_whole_words_only() {
        let mut vm = interp();
        vm.load_str(
            "@start\nif text pick red,blue,green\n{color chosen}\nendif",
            PathBuf::from("."),
            false,
        )
        .unwrap();

        vm.on_submit("none").unwrap();
        assert!(vm.console().text_runs().is_empty());

        vm.on_submit("I like BLUE best").unwrap();
        assert_eq!(vm.console().text_runs(), vec!["color chosen"]);
    }

    #[test]
    fn s5_typed_output_emits_one_character_per_tick_then_resumes_body() {
        let mut vm = interp();
        vm.load_str("@start\nif type 10 hi\n{done}\nendif", PathBuf::from("."), false)
            .unwrap();
        assert!(vm.console().text_runs().is_empty());

        advance_and_fire(&mut vm, 10);
        assert_eq!(vm.console().text_runs(), vec!["h"]);
        advance_and_fire(&mut vm, 10);
        assert_eq!(vm.console().text_runs(), vec!["h", "i"]);
        advance_and_fire(&mut vm, 10);
        assert_eq!(vm.console().text_runs(), vec!["h", "i", "done"]);
    }

    fn advance_and_fire(vm: &mut Interpreter<RecordingConsole, ManualClock>, ms: u64) {
        vm.clock_mut().advance(ms);
        vm.fire_due_timers().unwrap();
    }

    #[test]
    fn strict_parse_failure_reports_the_real_defect_not_a_missing_resource() {
        let mut vm = Interpreter::new(
            RecordingConsole::new(),
            ManualClock::new(),
            EngineConfig {
                strict_errors: true,
                print_errors: false,
            },
        );
        let err = vm
            .load_str("@start\nif x > 1\n{big}", PathBuf::from("."), false)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unbalanced if/endif"), "{message}");
        assert!(!message.contains("missing resource"), "{message}");
    }

    #[test]
    fn s6_goto_short_circuits_remaining_body() {
        let mut vm = interp();
        vm.load_str("@start\ngoto next\n{never}\n@next\n{here}", PathBuf::from("."), false)
            .unwrap();
        assert_eq!(vm.console().text_runs(), vec!["here"]);
    }
}
