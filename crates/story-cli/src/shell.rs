//! Interactive shell over the application.

use crate::command::{COMMAND_NAMES, Command, HELP};
use crate::render::{alert_line, plain_text};
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::BTreeMap;
use std::sync::Arc;
use story_application::{App, Document, InMemoryDocument, UiEvent};
use story_infrastructure::HeadlessMapFactory;

/// Completion and hints for shell commands.
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, Vec::new()));
        }
        let candidates = COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(line))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once(' ') {
            Some((name, rest)) if COMMAND_NAMES.contains(&name) => {
                Owned(format!("{} {}", name.bright_cyan(), rest))
            }
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMAND_NAMES
            .iter()
            .find(|name| name.starts_with(line) && name.len() > line.len())
            .map(|name| name[line.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

pub struct Shell {
    app: App,
    document: Arc<InMemoryDocument>,
    maps: Arc<HeadlessMapFactory>,
    shown: BTreeMap<String, String>,
    mounts: u64,
}

impl Shell {
    pub fn new(app: App, document: Arc<InMemoryDocument>, maps: Arc<HeadlessMapFactory>) -> Self {
        Self {
            app,
            document,
            maps,
            shown: BTreeMap::new(),
            mounts: 0,
        }
    }

    /// Opens `initial` and reads commands until `quit` or end of input.
    pub async fn run(&mut self, initial: &str) -> Result<()> {
        let mut editor: Editor<ShellHelper, _> = Editor::new()?;
        editor.set_helper(Some(ShellHelper));

        println!("{}", "=== Story Share ===".bright_magenta().bold());
        println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());

        self.app.open(initial).await;
        let mut running = self.app.run_until_idle().await;
        self.print_changes();

        while running {
            let prompt = format!("{}> ", self.app.router().current().unwrap_or("/"));
            let line = match editor.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("{}", format!("Error: {:?}", e).red());
                    break;
                }
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e.to_string().red());
                    continue;
                }
            };
            let _ = editor.add_history_entry(line.as_str());
            running = self.execute(command).await;
        }

        self.app.stop().await;
        println!("{}", "Goodbye!".bright_green());
        Ok(())
    }

    /// Applies one command. Returns false when the shell should exit.
    async fn execute(&mut self, command: Command) -> bool {
        let navigator = self.app.navigator();
        match command {
            Command::Go(fragment) => {
                navigator.go(fragment);
            }
            Command::Submit { form, fields } => {
                navigator.dispatch(UiEvent::submit(form, fields));
            }
            Command::Click { target, data } => {
                navigator.dispatch(UiEvent::click_with(target, data));
            }
            Command::Show => {
                self.print_document();
                return true;
            }
            Command::Maps => {
                self.print_maps();
                return true;
            }
            Command::Help => {
                println!("{}", HELP);
                return true;
            }
            Command::Quit => return false,
        }

        let running = self.app.run_until_idle().await;
        self.print_changes();
        running
    }

    /// Prints what changed since the last command: the page when a new
    /// one was mounted, otherwise only updated regions, then alerts.
    fn print_changes(&mut self) {
        let mounts = self.document.mount_count();
        if mounts != self.mounts {
            self.mounts = mounts;
            self.shown.clear();
            self.print_heading();
            println!("{}", plain_text(&self.document.markup()));
        }

        let regions = self.document.regions();
        for (id, markup) in &regions {
            if self.shown.get(id) != Some(markup) {
                print_region(id, markup);
            }
        }
        self.shown = regions;

        for alert in self.document.take_alerts() {
            println!("{}", alert_line(&alert));
        }
    }

    fn print_heading(&self) {
        let router = self.app.router();
        println!(
            "{}",
            format!(
                "--- {} ({}) ---",
                router.current().unwrap_or("-"),
                router.active_page().unwrap_or("none")
            )
            .bright_yellow()
        );
    }

    fn print_document(&mut self) {
        self.print_heading();
        println!("{}", plain_text(&self.document.markup()));
        let regions = self.document.regions();
        for (id, markup) in &regions {
            print_region(id, markup);
        }
        self.shown = regions;
    }

    fn print_maps(&self) {
        let maps = self.maps.live_maps();
        if maps.is_empty() {
            println!("{}", "No live maps".bright_black());
        }
        for (handle, state) in maps {
            println!(
                "map {} in #{} at {:.4}, {:.4} (zoom {}, {} markers)",
                handle.0,
                state.container_id,
                state.options.center.lat,
                state.options.center.lon,
                state.options.zoom,
                state.markers.len()
            );
            for (at, marker) in state.markers {
                println!("  - {} at {:.4}, {:.4}", marker.title, at.lat, at.lon);
            }
        }
    }
}

fn print_region(id: &str, markup: &str) {
    println!("{}", format!("#{}", id).bright_blue());
    let text = plain_text(markup);
    if !text.is_empty() {
        println!("{}", text);
    }
}
