//! User-facing dialogs
//!
//! The installer only ever warns: every dialog is a title, a message and a
//! single button. Hosts decide how to present it. The terminal host prompts
//! with `inquire` when attached to a TTY and prints a styled warning otherwise.

pub mod display;

use console::{Style, Term};
use inquire::{InquireError, Select};

use crate::error::Result;

/// A blocking warning with one button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub ok: String,
}

impl Dialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>, ok: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ok: ok.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    /// The button was chosen
    Ok,
    /// The prompt was dismissed (Esc)
    Dismissed,
}

/// Presents dialogs to the user
pub trait DialogHost {
    fn show(&self, dialog: &Dialog) -> Result<DialogResponse>;
}

/// Dialogs on the terminal
pub struct TerminalDialog {
    interactive: bool,
}

impl TerminalDialog {
    /// Prompt only when stderr is a terminal and input is allowed
    pub fn detect(no_input: bool) -> Self {
        Self {
            interactive: !no_input && Term::stderr().is_term(),
        }
    }
}

impl DialogHost for TerminalDialog {
    fn show(&self, dialog: &Dialog) -> Result<DialogResponse> {
        tracing::debug!(title = %dialog.title, "showing dialog");

        let term = Term::stderr();
        let _ = term.write_line(&format!(
            "{} {}",
            Style::new().yellow().bold().apply_to("warning:"),
            Style::new().bold().apply_to(&dialog.title)
        ));
        let _ = term.write_line(&format!("  {}", dialog.message));

        if !self.interactive {
            return Ok(DialogResponse::Ok);
        }

        match Select::new("Continue with", vec![dialog.ok.as_str()])
            .without_help_message()
            .prompt()
        {
            Ok(_) => Ok(DialogResponse::Ok),
            Err(InquireError::OperationCanceled) => Ok(DialogResponse::Dismissed),
            Err(e) => Err(e.into()),
        }
    }
}

/// Records dialogs instead of showing them
#[cfg(test)]
#[derive(Default)]
pub struct RecordingDialog {
    shown: std::cell::RefCell<Vec<Dialog>>,
}

#[cfg(test)]
impl RecordingDialog {
    pub fn shown(&self) -> Vec<Dialog> {
        self.shown.borrow().clone()
    }
}

#[cfg(test)]
impl DialogHost for RecordingDialog {
    fn show(&self, dialog: &Dialog) -> Result<DialogResponse> {
        self.shown.borrow_mut().push(dialog.clone());
        Ok(DialogResponse::Ok)
    }
}
