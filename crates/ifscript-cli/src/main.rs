mod args;
mod clock;
mod term_console;

use std::io::{self, BufRead, Write};

use clap::Parser;
use ifscript_vm::{EngineConfig, Interpreter};

use args::Cli;
use clock::WallClock;
use term_console::TermConsole;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = EngineConfig {
        strict_errors: cli.strict,
        print_errors: cli.print_errors,
    };
    let mut vm = Interpreter::new(TermConsole::new(), WallClock::new(), config);

    if let Err(e) = vm.load_file(&cli.game_file, false) {
        eprintln!("failed to load {}: {e}", cli.game_file.display());
        std::process::exit(1);
    }
    if let Some(fork) = &cli.fork {
        if let Err(e) = vm.set_fork(fork) {
            eprintln!("failed to enter fork {fork:?}: {e}");
            std::process::exit(1);
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        // A `print_errors` fault is already caught and displayed by the
        // interpreter itself (spec.md §7); reaching an `Err` here means
        // strict mode halted with nothing to show the player.
        if let Err(e) = vm.fire_due_timers() {
            eprintln!("error: {e}");
            std::process::exit(2);
        }

        if vm.console().input_enabled {
            print!("> ");
        } else {
            print!("[enter] ");
        }
        let _ = io::stdout().flush();

        let Some(line) = lines.next() else {
            break;
        };
        let Ok(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let choice = vm
            .console()
            .pending_choices
            .iter()
            .enumerate()
            .find(|(i, c)| (i + 1).to_string() == line || c.label.eq_ignore_ascii_case(line))
            .map(|(_, c)| (c.target.clone(), c.clear_vars));

        let result = match choice {
            Some((target, true)) => vm.restart_fork(&target),
            Some((target, false)) => vm.set_fork(&target),
            None => vm.on_submit(line),
        };
        if let Err(e) = result {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}
