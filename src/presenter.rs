//! Presentation layer consumed by the conversation controller.

use crossterm::style::Stylize;
use std::io::{self, Write};

/// Who produced a transcript entry. Display-only errors render as assistant
/// entries, matching the sender label they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Transcript and input-state collaborators. The controller calls these at
/// fixed points in a turn (disable/enable bracketing the whole turn, typing
/// indicator bracketing the network call) but owns none of the rendering.
pub trait Presenter {
    fn show_typing_indicator(&mut self);
    fn hide_typing_indicator(&mut self);
    fn disable_input(&mut self);
    fn enable_input(&mut self);
    fn append_to_transcript(&mut self, sender: &str, fragment: &str, role: Role);
}

/// Plain terminal transcript with role-colored sender labels.
pub struct TerminalPresenter {
    input_enabled: bool,
    typing_visible: bool,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            input_enabled: true,
            typing_visible: false,
        }
    }

    fn entry_header(&self, sender: &str, role: Role) -> String {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let label = match role {
            Role::User => sender.blue().bold(),
            Role::Assistant => sender.green().bold(),
        };
        format!("{} {}", label, format!("{}", timestamp).dark_grey())
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn show_typing_indicator(&mut self) {
        if self.typing_visible {
            return;
        }
        self.typing_visible = true;
        println!("{}", "assistant is typing...".dark_grey().italic());
    }

    fn hide_typing_indicator(&mut self) {
        if !self.typing_visible {
            return;
        }
        self.typing_visible = false;
        // Erase the indicator line printed above.
        let _ = crossterm::execute!(
            io::stdout(),
            crossterm::cursor::MoveUp(1),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::CurrentLine),
        );
    }

    fn disable_input(&mut self) {
        self.input_enabled = false;
    }

    fn enable_input(&mut self) {
        self.input_enabled = true;
        print!("{} ", ">".dark_grey());
        let _ = io::stdout().flush();
    }

    fn append_to_transcript(&mut self, sender: &str, fragment: &str, role: Role) {
        println!("{}", self.entry_header(sender, role));
        println!("  {}\n", fragment);
    }
}
