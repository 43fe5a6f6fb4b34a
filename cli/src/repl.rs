//! Line-oriented front end for the session shell.
//!
//! Each input line is split into words, quotes grouping a title or password
//! that contains spaces, then parsed with clap into a `Command` and dispatched
//! to the shell. Requests run to completion before the next prompt, so one command
//! never overlaps another.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use todolist_core::forms::ConfirmState;
use todolist_core::list::Status;
use todolist_core::{
    AuthEvent, AuthMode, DeleteConfirm, FormError, Route, Shell, Todo, TodoModal, Transport, View,
};

#[derive(Debug, Parser)]
#[command(no_binary_name = true, name = "todolist", disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Log in and open the todo list.
    Login { username: String, password: String },
    /// Create an account.
    Register { username: String, password: String },
    /// Show the todo list.
    List,
    /// Add a todo.
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Mark it completed already.
        #[arg(long)]
        done: bool,
    },
    /// Edit a todo by list number or id.
    Edit {
        target: String,
        #[arg(long, num_args = 1..)]
        title: Option<Vec<String>>,
        #[arg(long, conflicts_with = "pending")]
        done: bool,
        #[arg(long)]
        pending: bool,
    },
    /// Delete a todo by list number or id.
    Delete {
        target: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the current route.
    Route,
    /// Go to a route, e.g. `/todos?token=...`.
    Open { path: String },
    /// Forget the session and return to the login view.
    Logout,
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<T, R, W> {
    shell: Shell<T>,
    input: R,
    output: W,
}

impl<T: Transport, R: BufRead, W: Write> Repl<T, R, W> {
    pub fn new(shell: Shell<T>, input: R, output: W) -> Self {
        Self {
            shell,
            input,
            output,
        }
    }

    #[cfg(test)]
    fn shell(&self) -> &Shell<T> {
        &self.shell
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> io::Result<()> {
        if self.shell.view() == View::Todos {
            self.render_list()?;
        }
        loop {
            let prompt = match self.shell.view() {
                View::Login => "login> ",
                View::Todos => "todos> ",
            };
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            if line.is_empty() {
                continue;
            }
            let Some(words) = split_words(&line) else {
                writeln!(self.output, "Unclosed quote.")?;
                continue;
            };
            let parsed = match Line::try_parse_from(words) {
                Ok(parsed) => parsed,
                Err(err) => {
                    write!(self.output, "{}", err.render())?;
                    continue;
                }
            };
            if let Flow::Quit = self.dispatch(parsed.command)? {
                return Ok(());
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Login { username, password } => self.authenticate(AuthMode::Login, username, password)?,
            Command::Register { username, password } => {
                self.authenticate(AuthMode::Register, username, password)?
            }
            Command::Route => writeln!(self.output, "{}", self.shell.route().to_path())?,
            Command::Open { path } => {
                self.shell.navigate(Route::parse(&path));
                self.render_view()?;
            }
            Command::Logout => {
                self.shell.logout();
                writeln!(self.output, "Logged out.")?;
            }
            Command::Quit => return Ok(Flow::Quit),
            command if self.shell.view() == View::Login => {
                writeln!(self.output, "Log in first to use `{}`.", name_of(&command))?;
            }
            Command::List => {
                self.shell.reload();
                self.render_list()?;
            }
            Command::Add { title, done } => {
                let mut modal = TodoModal::add();
                modal.open();
                modal.set_title(title.join(" "));
                modal.set_completed(done);
                self.submit(&mut modal)?;
            }
            Command::Edit {
                target,
                title,
                done,
                pending,
            } => {
                let Some(todo) = self.resolve(&target) else {
                    writeln!(self.output, "No todo matches `{target}`.")?;
                    return Ok(Flow::Continue);
                };
                let mut modal = TodoModal::edit(&todo);
                modal.open();
                if let Some(title) = title {
                    modal.set_title(title.join(" "));
                }
                if done || pending {
                    modal.set_completed(done);
                }
                self.submit(&mut modal)?;
            }
            Command::Delete { target, yes } => self.delete(&target, yes)?,
        }
        Ok(Flow::Continue)
    }

    fn authenticate(&mut self, mode: AuthMode, username: String, password: String) -> io::Result<()> {
        let form = self.shell.auth_form_mut();
        form.set_mode(mode);
        form.set_username(username);
        form.set_password(password);
        match self.shell.submit_auth() {
            Ok(AuthEvent::LoggedIn(_)) => {
                writeln!(self.output, "Logged in. Route: {}", self.shell.route().to_path())?;
                self.render_list()
            }
            Ok(AuthEvent::Registered) | Ok(AuthEvent::Rejected) => self.render_auth_messages(),
            Err(FormError::Invalid(errors)) => {
                for error in errors.errors() {
                    writeln!(self.output, "  {error}")?;
                }
                Ok(())
            }
            Err(_) => self.render_auth_messages(),
        }
    }

    fn submit(&mut self, modal: &mut TodoModal) -> io::Result<()> {
        match self.shell.submit_modal(modal) {
            Ok(()) => self.render_list(),
            Err(FormError::Invalid(errors)) => {
                for error in errors.errors() {
                    writeln!(self.output, "  {error}")?;
                }
                Ok(())
            }
            Err(err) => writeln!(self.output, "Error: {}", err.inline_message()),
        }
    }

    fn delete(&mut self, target: &str, yes: bool) -> io::Result<()> {
        let Some(todo) = self.resolve(target) else {
            return writeln!(self.output, "No todo matches `{target}`.");
        };
        let mut dialog = DeleteConfirm::new(todo.id.clone());
        dialog.request();
        if !yes {
            write!(
                self.output,
                "Delete \"{}\"? This action cannot be undone. [y/N] ",
                todo.title
            )?;
            self.output.flush()?;
            let answer = self.read_line()?.unwrap_or_default();
            if !matches!(answer.as_str(), "y" | "Y" | "yes") {
                dialog.cancel();
                return writeln!(self.output, "Cancelled.");
            }
        }
        match self.shell.confirm_delete(&mut dialog) {
            Ok(()) => self.render_list(),
            Err(_) => match dialog.state() {
                ConfirmState::Failed(message) => writeln!(self.output, "Error: {message}"),
                _ => Ok(()),
            },
        }
    }

    /// `target` is a 1-based list number or a todo id.
    fn resolve(&self, target: &str) -> Option<Todo> {
        let todos = self.shell.list().todos();
        target
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| todos.get(index))
            .or_else(|| self.shell.list().get(target))
            .cloned()
    }

    fn render_view(&mut self) -> io::Result<()> {
        match self.shell.view() {
            View::Login => writeln!(self.output, "Please log in or register."),
            View::Todos => self.render_list(),
        }
    }

    fn render_auth_messages(&mut self) -> io::Result<()> {
        let form = self.shell.auth_form();
        if let Some(message) = form.success_message() {
            writeln!(self.output, "{message}")?;
        }
        if let Some(message) = form.error_message() {
            writeln!(self.output, "Error: {message}")?;
        }
        Ok(())
    }

    fn render_list(&mut self) -> io::Result<()> {
        let cards = self.shell.list().cards();
        if cards.is_empty() {
            return writeln!(self.output, "No todos found");
        }
        for (n, card) in cards.iter().enumerate() {
            writeln!(
                self.output,
                "{:>3}. [{}] {}  ({})",
                n + 1,
                if card.status == Status::Completed { "x" } else { " " },
                card.title,
                card.status.label()
            )?;
            write!(self.output, "       Created: {}", card.created)?;
            if let Some(updated) = &card.updated {
                write!(self.output, "  Updated: {updated}")?;
            }
            writeln!(self.output, "  id: {}", card.id)?;
        }
        Ok(())
    }
}

/// Split a line into words. Quotes keep spaces inside a word; outside single
/// quotes a backslash escapes the next character. `None` on an unclosed quote.
fn split_words(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote = None;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some('\''), c) => word.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (_, '\\') => {
                word.extend(chars.next());
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (_, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(word);
    }
    Some(words)
}

fn name_of(command: &Command) -> &'static str {
    match command {
        Command::Login { .. } => "login",
        Command::Register { .. } => "register",
        Command::List => "list",
        Command::Add { .. } => "add",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::Route => "route",
        Command::Open { .. } => "open",
        Command::Logout => "logout",
        Command::Quit => "quit",
    }
}
