use RustedRoots::Examples::equation_catalogue::EquationCatalogue;
use RustedRoots::Examples::roots_examples::roots_examples;
use RustedRoots::Utils::logger::{init_logger, log_file_name};
use RustedRoots::Utils::menu::Menu;
use RustedRoots::Utils::settings::{AppSettings, SETTINGS_FILE};
use log::{error, info};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = match AppSettings::load(Path::new(SETTINGS_FILE)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}; using default settings", e);
            AppSettings::default()
        }
    };
    let log_file = settings.log_to_file.then(|| PathBuf::from(log_file_name()));
    init_logger(settings.loglevel, log_file.as_deref());

    // `RustedRoots example <n>` runs one of the examples instead of the menu
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("example") => {
            return match args.get(2).and_then(|n| n.parse::<usize>().ok()) {
                Some(example) => {
                    roots_examples(example);
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("usage: RustedRoots example <number>");
                    ExitCode::FAILURE
                }
            };
        }
        Some(other) => {
            eprintln!("unknown command '{}'; run without arguments for the menu", other);
            return ExitCode::FAILURE;
        }
    }

    let catalogue = EquationCatalogue::default();
    let stdin = io::stdin();
    let mut menu = Menu::new(&catalogue, &settings, stdin.lock(), io::stdout());
    match menu.run() {
        Ok(()) => {
            info!("menu closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("console input/output failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
