//! Contact book CLI entry point.
//!
//! # Responsibility
//! - Resolve storage and logging configuration from flags/environment.
//! - Load the contact book once and hand it to the interactive session.

mod session;

use clap::Parser;
use contactbook_core::{default_log_level, init_logging, ContactBook, JsonFileStore};
use log::error;
use session::Session;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Local contact book manager.
#[derive(Parser, Debug)]
#[command(name = "contactbook", author, version, about, long_about = None)]
struct Cli {
    /// Contact storage file (JSON).
    #[arg(short, long, env = "CONTACTBOOK_FILE", default_value = "contacts.json")]
    file: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "CONTACTBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "CONTACTBOOK_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(cli.effective_log_level(), log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let mut book = match ContactBook::open(JsonFileStore::new(&cli.file)) {
        Ok(book) => book,
        Err(err) => {
            error!("event=app_open module=cli status=error error={}", err);
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&mut book, stdin.lock(), BufWriter::new(stdout.lock()));
    match session.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_run module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use contactbook_core::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "contactbook",
            "--file",
            "/tmp/book.json",
            "--log-dir",
            "/tmp/contactbook-logs",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("/tmp/book.json"));
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/contactbook-logs")));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn log_level_falls_back_to_build_default() {
        let cli = Cli::try_parse_from(["contactbook", "--log-level", "error"]).unwrap();
        assert_eq!(cli.effective_log_level(), "error");

        let cli = Cli {
            log_level: None,
            ..cli
        };
        assert_eq!(cli.effective_log_level(), default_log_level());
    }
}
