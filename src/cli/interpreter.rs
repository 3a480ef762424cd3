//! Line-oriented command interpreter that drives a queue.
//!
//! The interpreter owns an optional queue which stays absent until `new`. Each
//! line holds one command; `#` starts a comment and blank lines are skipped.
//! Failed checks are reported as `ERROR:` lines and counted, and the run keeps
//! going. Operations a correct queue is allowed to refuse (absent or empty queue)
//! only produce a `Warning:` line.

use std::io::{BufRead, Write};

use crate::config;
use crate::core::{buffer, handle, Queue, QueueError};
use crate::error::{Error, Result};

const HELP: &str = "\
Commands:
  new                 Create new queue
  free                Delete queue
  ih str [n]          Insert string str at head of queue n times (default: n == 1)
  it str [n]          Insert string str at tail of queue n times (default: n == 1)
  rh [str]            Remove from head of queue. Optionally compare to expected value str
  rhq                 Remove from head of queue without reporting value
  size [n]            Compute queue size. Optionally compare to expected value n
  reverse             Reverse queue
  sort                Sort queue in ascending order
  show                Show queue contents
  option name value   Set option: bufsize <n> | echo <0|1>
  help                Show this help
  quit                Exit interpreter";

/// Largest repeat count accepted by `ih` and `it`.
pub const MAX_REPEAT: usize = 1_000_000;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    New,
    Free,
    InsertHead { value: &'a str, count: usize },
    InsertTail { value: &'a str, count: usize },
    RemoveHead { expected: Option<&'a str> },
    RemoveHeadQuiet,
    Size { expected: Option<usize> },
    Reverse,
    Sort,
    Show,
    SetOption { name: &'a str, value: &'a str },
    Help,
    Quit,
}

impl<'a> Command<'a> {
    /// Parse a line. Returns `Ok(None)` for blank and comment lines.
    pub fn parse(line: &'a str) -> Result<Option<Self>> {
        let line = match line.find('#') {
            Some(at) => &line[..at],
            None => line,
        };

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("new", []) => Command::New,
            ("free", []) => Command::Free,
            ("ih", &[value]) => Command::InsertHead { value, count: 1 },
            ("ih", &[value, count]) => Command::InsertHead {
                value,
                count: parse_count(name, count)?,
            },
            ("it", &[value]) => Command::InsertTail { value, count: 1 },
            ("it", &[value, count]) => Command::InsertTail {
                value,
                count: parse_count(name, count)?,
            },
            ("rh", []) => Command::RemoveHead { expected: None },
            ("rh", &[expected]) => Command::RemoveHead {
                expected: Some(expected),
            },
            ("rhq", []) => Command::RemoveHeadQuiet,
            ("size", []) => Command::Size { expected: None },
            ("size", &[expected]) => Command::Size {
                expected: Some(parse_number(name, expected)?),
            },
            ("reverse", []) => Command::Reverse,
            ("sort", []) => Command::Sort,
            ("show", []) => Command::Show,
            ("option", &[name, value]) => Command::SetOption { name, value },
            ("help", []) => Command::Help,
            ("quit", []) => Command::Quit,
            ("new" | "free" | "ih" | "it" | "rh" | "rhq" | "size" | "reverse" | "sort"
            | "show" | "option" | "help" | "quit", _) => {
                return Err(Error::Command(format!(
                    "wrong number of arguments for '{}'",
                    name
                )));
            }
            _ => return Err(Error::Command(format!("unknown command '{}'", name))),
        };

        Ok(Some(command))
    }
}

fn parse_number(command: &str, word: &str) -> Result<usize> {
    word.parse().map_err(|_| {
        Error::Command(format!(
            "'{}' expects a non-negative number, got '{}'",
            command, word
        ))
    })
}

fn parse_count(command: &str, word: &str) -> Result<usize> {
    let count = parse_number(command, word)?;
    if count > MAX_REPEAT {
        return Err(Error::Command(format!(
            "'{}' repeat count {} exceeds the limit of {}",
            command, count, MAX_REPEAT
        )));
    }
    Ok(count)
}

/// Whether the interpreter should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Totals for one interpreter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub commands: usize,
    pub errors: usize,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

/// Drives a queue from text commands, reporting to `out`.
pub struct Interpreter<W> {
    queue: Option<Queue>,
    bufsize: usize,
    echo: bool,
    out: W,
    summary: Summary,
}

impl<W: Write> Interpreter<W> {
    pub fn new(settings: &config::Interpreter, out: W) -> Self {
        Self {
            queue: None,
            bufsize: settings.bufsize.max(1),
            echo: settings.echo,
            out,
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn queue(&self) -> Option<&Queue> {
        self.queue.as_ref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run every line of `input` until it ends or `quit` is read.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<Summary> {
        for line in input.lines() {
            if self.run_line(&line?)? == Flow::Quit {
                break;
            }
        }
        Ok(self.summary)
    }

    /// Run a single command line. Only output failures are returned as errors.
    pub fn run_line(&mut self, line: &str) -> Result<Flow> {
        if self.echo && !line.trim().is_empty() {
            writeln!(self.out, "cmd> {}", line.trim())?;
        }

        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                self.error(&e.to_string())?;
                return Ok(Flow::Continue);
            }
        };

        tracing::debug!(?command, "running command");
        self.summary.commands += 1;
        self.execute(command)
    }

    fn execute(&mut self, command: Command<'_>) -> Result<Flow> {
        match command {
            Command::New => {
                handle::destroy(self.queue.take());
                self.queue = handle::new();
                self.show()?;
            }
            Command::Free => {
                handle::destroy(self.queue.take());
                self.show()?;
            }
            Command::InsertHead { value, count } => {
                self.insert(value, count, "insert head", handle::insert_head)?;
            }
            Command::InsertTail { value, count } => {
                self.insert(value, count, "insert tail", handle::insert_tail)?;
            }
            Command::RemoveHead { expected } => self.remove_head(expected)?,
            Command::RemoveHeadQuiet => {
                match handle::remove_head(self.queue.as_mut(), None) {
                    Ok(_) => {}
                    Err(e) => self.refused("remove head", e)?,
                }
                self.show()?;
            }
            Command::Size { expected } => {
                let size = handle::size(self.queue.as_ref());
                match expected {
                    Some(expected) if expected != size => self.error(&format!(
                        "Computed queue size as {}, but expected {}",
                        size, expected
                    ))?,
                    _ => writeln!(self.out, "Queue size = {}", size)?,
                }
            }
            Command::Reverse => {
                if self.queue.is_none() {
                    self.warn("Calling reverse on null queue")?;
                }
                handle::reverse(self.queue.as_mut());
                self.show()?;
            }
            Command::Sort => {
                if self.queue.is_none() {
                    self.warn("Calling sort on null queue")?;
                }
                handle::sort(self.queue.as_mut());
                self.check_sorted()?;
                self.show()?;
            }
            Command::Show => self.show()?,
            Command::SetOption { name, value } => self.set_option(name, value)?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => {
                handle::destroy(self.queue.take());
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn insert(
        &mut self,
        value: &str,
        count: usize,
        what: &str,
        op: fn(Option<&mut Queue>, &str) -> std::result::Result<(), QueueError>,
    ) -> Result<()> {
        for _ in 0..count {
            if let Err(e) = op(self.queue.as_mut(), value) {
                self.refused(what, e)?;
                break;
            }
        }
        self.show()
    }

    fn remove_head(&mut self, expected: Option<&str>) -> Result<()> {
        let mut buf = vec![0u8; self.bufsize];

        match handle::remove_head(self.queue.as_mut(), Some(&mut buf)) {
            Ok(_) => {
                let removed = String::from_utf8_lossy(buffer::terminated(&buf)).into_owned();
                match expected {
                    Some(expected) if expected != removed => self.error(&format!(
                        "Removed value {} != expected value {}",
                        removed, expected
                    ))?,
                    _ => writeln!(self.out, "Removed {} from queue", removed)?,
                }
            }
            Err(e) => {
                self.refused("remove head", e)?;
                if let Some(expected) = expected {
                    self.error(&format!(
                        "Expected {} but nothing was removed",
                        expected
                    ))?;
                }
            }
        }
        self.show()
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "bufsize" => match value.parse::<usize>() {
                Ok(size) if size > 0 => self.bufsize = size,
                _ => return self.error(&format!("Invalid bufsize '{}'", value)),
            },
            "echo" => match value {
                "1" | "true" => self.echo = true,
                "0" | "false" => self.echo = false,
                _ => return self.error(&format!("Invalid echo value '{}'", value)),
            },
            _ => return self.error(&format!("Unknown option '{}'", name)),
        }
        tracing::debug!(name, value, "option set");
        Ok(())
    }

    fn check_sorted(&mut self) -> Result<()> {
        let Some(queue) = self.queue.as_ref() else {
            return Ok(());
        };

        let values: Vec<&str> = queue.values().collect();
        if values.windows(2).all(|pair| pair[0] <= pair[1]) {
            return Ok(());
        }
        self.error("Not sorted in ascending order")
    }

    fn show(&mut self) -> Result<()> {
        let Some(queue) = self.queue.as_ref() else {
            writeln!(self.out, "q = NULL")?;
            return Ok(());
        };

        let values: Vec<&str> = queue.values().collect();
        writeln!(self.out, "q = [{}]", values.join(" "))?;

        if !queue.is_consistent() {
            return self.error("Queue structure is inconsistent");
        }
        Ok(())
    }

    /// Report an operation the queue declined.
    fn refused(&mut self, what: &str, e: QueueError) -> Result<()> {
        match e {
            QueueError::NullQueue => self.warn(&format!("Calling {} on null queue", what)),
            QueueError::EmptyQueue => self.warn(&format!("Calling {} on empty queue", what)),
            QueueError::AllocationFailure => self.error(&format!("{} failed: {}", what, e)),
        }
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "Warning: {}", message)?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        tracing::debug!("command error: {}", message);
        self.summary.errors += 1;
        writeln!(self.out, "ERROR: {}", message)?;
        Ok(())
    }
}
