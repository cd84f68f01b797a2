use std::borrow::Cow;

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

const CHAT_COMMANDS: &[&str] = &["/new", "/image", "/ticket", "/tickets", "/expand", "/help"];
const TICKET_COMMANDS: &[&str] = &["/attach", "/remove", "/files", "/show", "/submit", "/cancel"];

/// Which prompt is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Ticket,
}

/// Rustyline helper: completes and hints the commands of the active prompt,
/// and file paths after `/image` and `/attach`.
pub struct CliHelper {
    mode: Mode,
    files: FilenameCompleter,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            mode: Mode::Chat,
            files: FilenameCompleter::new(),
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn commands(&self) -> &'static [&'static str] {
        match self.mode {
            Mode::Chat => CHAT_COMMANDS,
            Mode::Ticket => TICKET_COMMANDS,
        }
    }

    fn takes_path(command: &str) -> bool {
        matches!(command, "/image" | "/attach")
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        match typed.split_once(' ') {
            Some((command, _)) if Self::takes_path(command) => self.files.complete(line, pos, ctx),
            Some(_) => Ok((pos, vec![])),
            None if typed.starts_with('/') => {
                let candidates = self
                    .commands()
                    .iter()
                    .filter(|name| name.starts_with(typed))
                    .map(|name| Pair {
                        display: name.to_string(),
                        replacement: name.to_string(),
                    })
                    .collect();
                Ok((0, candidates))
            }
            None => Ok((pos, vec![])),
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Cow::Borrowed(line);
        }
        let command = line.split_whitespace().next().unwrap_or(line);
        if self.commands().iter().any(|name| name.starts_with(command)) {
            Cow::Owned(line.bright_cyan().to_string())
        } else {
            Cow::Owned(line.red().to_string())
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        self.commands()
            .iter()
            .find(|name| name.starts_with(line) && name.len() > line.len())
            .map(|name| name[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}
