use crate::Utils::report::trace_rows;
use crate::numerical::root_result::RootResult;
use chrono::Local;
use csv::Writer;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// "debug" | "info" | "warn" | "error" | "off" (also "none")
pub fn parse_loglevel(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" | "none" => Some(LevelFilter::Off),
        _ => None,
    }
}

/// log file name stamped with the local date and time
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("rusted_roots_log_{}.txt", date_and_time)
}

/// Terminal logger plus an optional file logger. Returns false when logging is off or a
/// global logger is already installed.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> bool {
    if level == LevelFilter::Off {
        return false;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", path.display(), e),
        }
    }
    CombinedLogger::init(loggers).is_ok()
}

/// iteration trace as CSV
pub fn save_trace_to_csv(result: &RootResult, filename: &Path) -> Result<(), csv::Error> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    let (headers, rows) = trace_rows(result);
    writer.write_record(&headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
