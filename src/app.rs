//! Application state machine.
//! Uses trait objects for git, generics for terminal (due to dyn-compatibility).

use crate::domain::fixup::{FIND_BASE_COMMIT_TITLE, ONLY_ADDED_LINES_WARNING};
use crate::domain::{Commit, FileChange, FixupOutcome, FixupTarget};
use crate::ports::{GitRepo, KeyCode, KeyModifiers, Terminal, TerminalEvent};
use crate::services::FixupNavigator;
use crate::session::Session;
use crate::ui;
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{ListState, TableState};
use std::time::Duration;

/// Current view in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Files,
    Commits,
    Help,
}

/// Popup shown on top of the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Message {
        title: String,
        body: String,
        is_error: bool,
    },
    /// Accepting runs the pending fixup navigation; declining drops it.
    Confirm {
        title: String,
        prompt: String,
        pending: FixupTarget,
    },
}

/// Application state.
pub struct App {
    pub session: Session,
    pub branch: String,
    pub commits: Vec<Commit>,
    pub files: Vec<FileChange>,
    pub view: View,
    pub previous_view: Option<View>,
    pub dialog: Option<Dialog>,
    pub selected_commit: usize,
    pub selected_file: usize,
    pub should_quit: bool,
    pub table_state: TableState,
    pub list_state: ListState,
}

impl App {
    pub fn new(git: &dyn GitRepo, session: Session) -> Result<Self> {
        let mut app = Self {
            session,
            branch: git.current_branch()?,
            commits: Vec::new(),
            files: Vec::new(),
            view: View::Files,
            previous_view: None,
            dialog: None,
            selected_commit: 0,
            selected_file: 0,
            should_quit: false,
            table_state: TableState::default(),
            list_state: ListState::default(),
        };
        app.reload_files(git)?;
        app.reload_commits(git)?;
        Ok(app)
    }

    pub fn run<T: Terminal>(&mut self, terminal: &mut T, git: &dyn GitRepo) -> Result<()> {
        while !self.should_quit {
            self.draw(terminal)?;

            if let Some(event) = terminal.poll_event(Duration::from_millis(100))? {
                self.handle_event(event, git)?;
            }
        }
        Ok(())
    }

    fn draw<T: Terminal>(&mut self, terminal: &mut T) -> Result<()> {
        let view = &self.view;
        let underlying = match view {
            View::Help => self.previous_view.as_ref().unwrap_or(&View::Files),
            other => other,
        };
        let commits = &self.commits;
        let files = &self.files;
        let branch = &self.branch;
        let selected_commit = self.selected_commit;
        let selected_file = self.selected_file;
        let dialog = &self.dialog;
        let table_state = &mut self.table_state;
        let list_state = &mut self.list_state;

        terminal.draw(|frame| {
            let area = frame.area();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(area);
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(rows[0]);

            ui::files::render(
                frame,
                columns[0],
                files,
                selected_file,
                *underlying == View::Files,
                list_state,
            );
            ui::commits::render(
                frame,
                columns[1],
                commits,
                selected_commit,
                branch,
                *underlying == View::Commits,
                table_state,
            );
            ui::commits::render_help(frame, rows[1]);

            if *view == View::Help {
                ui::help::render(frame, area);
            }
            if let Some(dialog) = dialog {
                ui::dialog::render(frame, area, dialog);
            }
        })
    }

    fn handle_event(&mut self, event: TerminalEvent, git: &dyn GitRepo) -> Result<()> {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key.code, key.modifiers, git),
            TerminalEvent::Resize(_, _) => Ok(()),
        }
    }

    fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        git: &dyn GitRepo,
    ) -> Result<()> {
        // Ctrl+C quit, even with a dialog open
        if code == KeyCode::Char('c') && modifiers.ctrl {
            self.should_quit = true;
            return Ok(());
        }

        if let Some(dialog) = self.dialog.take() {
            return self.handle_dialog_key(dialog, code, git);
        }

        if code == KeyCode::Char('q') && !modifiers.ctrl {
            self.should_quit = true;
            return Ok(());
        }

        // Help toggle (except when already in help)
        if code == KeyCode::Char('?') && self.view != View::Help {
            self.previous_view = Some(self.view.clone());
            self.view = View::Help;
            return Ok(());
        }

        match self.view {
            View::Help => {
                // Any key closes help
                self.view = self.previous_view.take().unwrap_or(View::Files);
            }

            View::Files | View::Commits => match code {
                KeyCode::Tab | KeyCode::BackTab => {
                    self.view = if self.view == View::Files {
                        View::Commits
                    } else {
                        View::Files
                    };
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let (selected, len) = self.selection_mut();
                    if *selected < len.saturating_sub(1) {
                        *selected += 1;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    let (selected, _) = self.selection_mut();
                    *selected = selected.saturating_sub(1);
                }
                KeyCode::Char('g') | KeyCode::Home => {
                    let (selected, _) = self.selection_mut();
                    *selected = 0;
                }
                KeyCode::Char('G') | KeyCode::End => {
                    let (selected, len) = self.selection_mut();
                    *selected = len.saturating_sub(1);
                }
                KeyCode::Char('f') => self.find_base_commit(git),
                KeyCode::Char('b') => self.show_merge_base(),
                KeyCode::Char('r') => {
                    if let Err(e) = self.reload_files(git).and_then(|_| self.reload_commits(git)) {
                        self.show_error("Refresh failed", &e);
                    }
                }
                _ => {}
            },
        }

        Ok(())
    }

    fn handle_dialog_key(
        &mut self,
        dialog: Dialog,
        code: KeyCode,
        git: &dyn GitRepo,
    ) -> Result<()> {
        match dialog {
            // Any key closes a message
            Dialog::Message { .. } => {}
            Dialog::Confirm { pending, .. }
                if matches!(code, KeyCode::Char('y') | KeyCode::Enter) =>
            {
                self.apply_fixup(&pending, git);
            }
            Dialog::Confirm { .. } if matches!(code, KeyCode::Char('n') | KeyCode::Esc) => {
                tracing::debug!("Fixup navigation declined");
            }
            confirm => self.dialog = Some(confirm),
        }
        Ok(())
    }

    fn selection_mut(&mut self) -> (&mut usize, usize) {
        if self.view == View::Commits {
            (&mut self.selected_commit, self.commits.len())
        } else {
            (&mut self.selected_file, self.files.len())
        }
    }

    pub fn reload_files(&mut self, git: &dyn GitRepo) -> Result<()> {
        self.files = git.file_changes()?;
        self.selected_file = self.selected_file.min(self.files.len().saturating_sub(1));
        Ok(())
    }

    /// Reload the history window; commits at or below the merge base with the
    /// main branches are marked merged.
    pub fn reload_commits(&mut self, git: &dyn GitRepo) -> Result<()> {
        let merge_base = self.session.main_branches().merge_base("HEAD");
        self.commits = git.commits(self.session.config.history_limit, Some(&merge_base))?;
        self.selected_commit = self.selected_commit.min(self.commits.len().saturating_sub(1));
        Ok(())
    }

    fn find_base_commit(&mut self, git: &dyn GitRepo) {
        let outcome = match self.session.fixup_locator().find_base_commit(&self.commits) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Finding base commit failed: {:#}", e);
                self.show_error(FIND_BASE_COMMIT_TITLE, &e);
                return;
            }
        };
        tracing::info!("Find base commit: {:?}", outcome);

        match outcome {
            FixupOutcome::Resolved(target) if target.needs_confirmation => {
                self.dialog = Some(Dialog::Confirm {
                    title: FIND_BASE_COMMIT_TITLE.to_string(),
                    prompt: ONLY_ADDED_LINES_WARNING.to_string(),
                    pending: target,
                });
            }
            FixupOutcome::Resolved(target) => self.apply_fixup(&target, git),
            other => {
                self.dialog = Some(Dialog::Message {
                    title: FIND_BASE_COMMIT_TITLE.to_string(),
                    body: other.message().unwrap_or_default(),
                    is_error: other.is_error(),
                });
            }
        }
    }

    fn apply_fixup(&mut self, target: &FixupTarget, git: &dyn GitRepo) {
        let locator = self.session.fixup_locator();
        let mut navigation = Navigation { app: self, git };
        if let Err(e) = locator.apply(target, &mut navigation) {
            tracing::error!("Navigating to base commit failed: {:#}", e);
            self.show_error(FIND_BASE_COMMIT_TITLE, &e);
        }
    }

    fn show_merge_base(&mut self) {
        let main_branches = self.session.main_branches().get();
        let merge_base = self.session.main_branches().merge_base("HEAD");
        let body = if main_branches.is_empty() {
            format!(
                "None of the configured main branches exist: {}",
                self.session.config.main_branches.join(", ")
            )
        } else if merge_base.is_empty() {
            format!("HEAD has no common history with {}", main_branches.join(", "))
        } else {
            format!("{}\n\nMain branches: {}", merge_base, main_branches.join(", "))
        };
        self.dialog = Some(Dialog::Message {
            title: "Merge base".to_string(),
            body,
            is_error: false,
        });
    }

    fn show_error(&mut self, title: &str, err: &anyhow::Error) {
        self.dialog = Some(Dialog::Message {
            title: title.to_string(),
            body: format!("{:#}", err),
            is_error: true,
        });
    }
}

/// Lets the fixup locator drive the app once a base commit is found.
struct Navigation<'a> {
    app: &'a mut App,
    git: &'a dyn GitRepo,
}

impl FixupNavigator for Navigation<'_> {
    fn refresh_files(&mut self) -> Result<()> {
        self.app.reload_files(self.git)
    }

    fn select_commit(&mut self, index: usize) {
        self.app.selected_commit = index;
    }

    fn show_commits(&mut self) {
        self.app.view = View::Commits;
    }
}
