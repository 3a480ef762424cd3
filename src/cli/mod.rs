//! CLI commands for linkq using clap.

pub mod interpreter;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use crate::config::{load_settings_or_default, Settings};
use interpreter::{Interpreter, Summary};

/// linkq - drive a linked string queue from command scripts.
#[derive(Parser)]
#[command(name = "linkq")]
#[command(version = "0.1.0")]
#[command(about = "linkq - linked string queue driver", long_about = None)]
pub struct Commands {
    /// Settings file (default: ~/.linkq/settings.json)
    #[arg(long, global = true, env = "LINKQ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a command script, or read commands from stdin
    Run {
        /// Script file
        script: Option<PathBuf>,
    },

    /// Run each argument as one command line
    Exec {
        /// Command lines, e.g. "new" "it a" "show"
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Show the effective settings
    Config,
}

impl Commands {
    /// Load the settings this invocation runs with.
    pub fn settings(&self) -> Result<Settings> {
        Ok(load_settings_or_default(self.config.as_deref())?)
    }

    /// Run the command. Returns whether every interpreter command succeeded.
    pub fn run(&self, settings: &Settings) -> Result<bool> {
        match &self.command {
            Command::Run { script } => cmd_run(settings, script.as_deref()),
            Command::Exec { lines } => cmd_exec(settings, lines),
            Command::Config => cmd_config(settings),
        }
    }
}

// Command implementations

fn cmd_run(settings: &Settings, script: Option<&std::path::Path>) -> Result<bool> {
    let mut interp = Interpreter::new(&settings.interpreter, io::stdout().lock());

    let summary = match script {
        Some(path) => {
            tracing::info!("Running script {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            interp.run(BufReader::new(file))?
        }
        None => interp.run(io::stdin().lock())?,
    };

    Ok(report(summary))
}

fn cmd_exec(settings: &Settings, lines: &[String]) -> Result<bool> {
    let mut interp = Interpreter::new(&settings.interpreter, io::stdout().lock());

    for line in lines {
        if interp.run_line(line)? == interpreter::Flow::Quit {
            break;
        }
    }

    Ok(report(interp.summary()))
}

fn cmd_config(settings: &Settings) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(true)
}

fn report(summary: Summary) -> bool {
    if summary.is_success() {
        tracing::info!("{} commands, no errors", summary.commands);
    } else {
        tracing::warn!("{} commands, {} errors", summary.commands, summary.errors);
    }
    summary.is_success()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_run_with_script_and_config() {
        let args = Commands::try_parse_from([
            "linkq",
            "--config",
            "/tmp/linkq.json",
            "run",
            "traces/sort.cmd",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("/tmp/linkq.json")));
        match args.command {
            Command::Run { script } => assert_eq!(script, Some(PathBuf::from("traces/sort.cmd"))),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_exec_requires_lines() {
        assert!(Commands::try_parse_from(["linkq", "exec"]).is_err());

        let args = Commands::try_parse_from(["linkq", "exec", "new", "it a"]).unwrap();
        match args.command {
            Command::Exec { lines } => assert_eq!(lines, vec!["new", "it a"]),
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_settings_come_from_config_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "interpreter": { "bufsize": 8 } }"#).unwrap();

        let args = Commands::try_parse_from([
            "linkq",
            "--config",
            path.to_str().unwrap(),
            "config",
        ])
        .unwrap();
        assert_eq!(args.settings().unwrap().interpreter.bufsize, 8);
    }

    #[test]
    fn test_run_reports_script_errors() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("trace.cmd");
        std::fs::write(&script, "new\nit a\nrh b\n").unwrap();

        let ok = cmd_run(&Settings::default(), Some(script.as_path())).unwrap();
        assert!(!ok);

        let missing = dir.path().join("missing.cmd");
        assert!(cmd_run(&Settings::default(), Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_bundled_traces_pass() {
        let traces = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("traces");
        for name in ["trace-01-ops.cmd", "trace-02-reverse.cmd", "trace-03-sort.cmd"] {
            let file = File::open(traces.join(name)).unwrap();
            let mut interp = Interpreter::new(&Settings::default().interpreter, Vec::new());
            let summary = interp.run(BufReader::new(file)).unwrap();

            let output = String::from_utf8(interp.into_output()).unwrap();
            assert!(summary.is_success(), "{} failed:\n{}", name, output);
        }
    }
}
