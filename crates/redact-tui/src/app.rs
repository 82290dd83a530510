use anyhow::Result;
use redact_admin::{LogsView, Outcome, UsersView, guard};
use redact_client::{AdminApi, RedactionService};
use redact_core::{LogLevel, Navigation, RedactionCategory, Route, Session};
use redact_engine::{DownloadSink, SubmitError, Submission, UploadForm};
use redact_storage::Storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Tool,
    Users,
    Logs,
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Tool => Route::Tool,
            Screen::Users => Route::AdminUsers,
            Screen::Logs => Route::AdminLogs,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Tool => "Redact a document",
            Screen::Users => "Manage users",
            Screen::Logs => "Activity log",
        }
    }

    fn next(self) -> Self {
        match self {
            Screen::Tool => Screen::Users,
            Screen::Users => Screen::Logs,
            Screen::Logs => Screen::Tool,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EnteringPath,
    ConfirmDelete,
    ShowingHelp,
}

/// A redaction running in the background; hands the form back when done
type SubmitTask = JoinHandle<(UploadForm, Result<Submission, SubmitError>)>;

/// Everything the app talks to outside its own state
pub struct Services {
    pub redaction: Arc<dyn RedactionService>,
    pub sink: Arc<dyn DownloadSink>,
    pub admin: Arc<dyn AdminApi>,
    pub storage: Option<Storage>,
}

pub struct App {
    pub form: UploadForm,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub selected_category: usize,
    pub selected_user: usize,
    pub users: UsersView,
    pub logs: LogsView,
    pub session: Option<Session>,
    pub last_output: Option<PathBuf>,
    pub status_message: Option<String>,
    services: Services,
    submission: Option<SubmitTask>,
}

impl App {
    pub fn new(form: UploadForm, services: Services, session: Option<Session>) -> Self {
        Self {
            form,
            screen: Screen::Tool,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            selected_category: 0,
            selected_user: 0,
            users: UsersView::new(),
            logs: LogsView::new(),
            session,
            last_output: None,
            status_message: None,
            services,
            submission: None,
        }
    }

    pub fn current_category(&self) -> RedactionCategory {
        RedactionCategory::ALL[self.selected_category.min(RedactionCategory::ALL.len() - 1)]
    }

    pub fn next(&mut self) {
        match self.screen {
            Screen::Tool => {
                if self.selected_category + 1 < RedactionCategory::ALL.len() {
                    self.selected_category += 1;
                }
            }
            Screen::Users => {
                if self.selected_user + 1 < self.users.users().len() {
                    self.selected_user += 1;
                }
            }
            Screen::Logs => {}
        }
    }

    pub fn previous(&mut self) {
        match self.screen {
            Screen::Tool => self.selected_category = self.selected_category.saturating_sub(1),
            Screen::Users => self.selected_user = self.selected_user.saturating_sub(1),
            Screen::Logs => {}
        }
    }

    pub fn toggle_category(&mut self) {
        let category = self.current_category();
        self.form.toggle(category);
    }

    pub fn toggle_all(&mut self) {
        self.form.toggle_all();
    }

    pub fn start_select_file(&mut self) {
        self.input_mode = InputMode::EnteringPath;
        self.input_buffer.clear();
    }

    pub async fn confirm_select_file(&mut self) -> Result<()> {
        let path = self.input_buffer.trim().to_string();
        self.cancel_input();
        if path.is_empty() {
            self.status_message = Some("Path cannot be empty".to_string());
            return Ok(());
        }

        match self.form.select(Path::new(&path)).await {
            Ok(()) => {
                let name = self.form.file().map(|f| f.name.clone()).unwrap_or_default();
                self.status_message = Some(format!("Selected {}", name));
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
        Ok(())
    }

    /// Start redacting the current document. The form is edited only
    /// through the task until it finishes.
    pub fn submit(&mut self) {
        if self.submission.is_some() {
            return;
        }

        let mut form = self.form.clone();
        let redaction = self.services.redaction.clone();
        let sink = self.services.sink.clone();
        let storage = self.services.storage.clone();
        self.submission = Some(tokio::spawn(async move {
            let result = form
                .submit(redaction.as_ref(), sink.as_ref(), storage.as_ref())
                .await;
            (form, result)
        }));
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    /// Pick up a finished submission without waiting for a running one
    pub async fn poll_submission(&mut self) -> Result<()> {
        if self.submission.as_ref().is_some_and(|task| task.is_finished()) {
            self.finish_submission().await?;
        }
        Ok(())
    }

    /// Wait for the running submission, if any, and show its result
    pub async fn finish_submission(&mut self) -> Result<()> {
        let Some(task) = self.submission.take() else {
            return Ok(());
        };
        let (form, result) = task.await?;
        self.form = form;

        match result {
            Ok(submission) => {
                self.status_message =
                    Some(format!("✓ Saved {}", submission.path.display()));
                self.last_output = Some(submission.path);
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
        Ok(())
    }

    pub async fn cycle_screen(&mut self) -> Result<()> {
        let next = self.screen.next();
        self.show(next).await
    }

    /// Switch screens through the route guard
    pub async fn show(&mut self, screen: Screen) -> Result<()> {
        let now = OffsetDateTime::now_utc();
        match guard(screen.route(), self.session.as_ref(), now) {
            Navigation::Render(_) => {
                self.screen = screen;
                self.refresh().await
            }
            Navigation::Redirect(route) => {
                debug!("{} redirected to {}", screen.route(), route);
                self.screen = Screen::Tool;
                self.status_message = Some(
                    "Admin session missing or expired. Run `redact admin login` first.".to_string(),
                );
                Ok(())
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let admin = self.services.admin.clone();
        let failure = match self.screen {
            Screen::Tool => None,
            Screen::Users => {
                let failure = self.users.load(admin.as_ref()).await;
                self.selected_user = 0;
                failure
            }
            Screen::Logs => self.logs.load(admin.as_ref()).await,
        };

        match failure {
            Some(e) if e.is_unauthorized() => self.expire_session().await?,
            Some(e) => self.status_message = Some(format!("Showing sample data: {}", e)),
            None => {}
        }
        Ok(())
    }

    pub async fn toggle_block_selected(&mut self) -> Result<()> {
        let Some(user) = self.users.users().get(self.selected_user).cloned() else {
            return Ok(());
        };
        let Some((id, block)) = self.users.begin_toggle_block(user.id) else {
            return Ok(());
        };

        let result = self.services.admin.set_blocked(user.id, block).await.map(|_| ());
        let unauthorized = matches!(&result, Err(e) if e.is_unauthorized());
        let verb = if block { "Blocked" } else { "Unblocked" };
        let outcome = self.users.settle(id, result);
        self.report(outcome, verb, &user.name);

        if unauthorized {
            self.expire_session().await?;
        }
        Ok(())
    }

    pub fn start_delete(&mut self) {
        if self.users.users().get(self.selected_user).is_some() {
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        self.cancel_input();
        let Some(user) = self.users.users().get(self.selected_user).cloned() else {
            return Ok(());
        };
        let Some(id) = self.users.begin_delete(user.id) else {
            return Ok(());
        };
        let last = self.users.users().len().saturating_sub(1);
        self.selected_user = self.selected_user.min(last);

        let result = self.services.admin.delete_user(user.id).await;
        let unauthorized = matches!(&result, Err(e) if e.is_unauthorized());
        let outcome = self.users.settle(id, result);
        self.report(outcome, "Deleted", &user.name);

        if unauthorized {
            self.expire_session().await?;
        }
        Ok(())
    }

    fn report(&mut self, outcome: Option<Outcome>, verb: &str, name: &str) {
        self.status_message = match outcome {
            Some(Outcome::Confirmed) => Some(format!("✓ {} {}", verb, name)),
            Some(Outcome::RolledBack { notice }) | Some(Outcome::Superseded { notice }) => {
                Some(notice)
            }
            None => None,
        };
    }

    /// Cycle the log filter: all, info, warn, error
    pub fn cycle_log_level(&mut self) {
        let next = match self.logs.level() {
            None => Some(LogLevel::Info),
            Some(LogLevel::Info) => Some(LogLevel::Warn),
            Some(LogLevel::Warn) => Some(LogLevel::Error),
            Some(LogLevel::Error) => None,
        };
        self.logs.set_level(next);
    }

    async fn expire_session(&mut self) -> Result<()> {
        warn!("Admin session rejected, signing out");
        self.session = None;
        if let Some(storage) = &self.services.storage {
            storage.clear_session().await?;
        }
        self.screen = Screen::Tool;
        self.status_message =
            Some("Session expired. Run `redact admin login` to sign in again.".to_string());
        Ok(())
    }

    pub fn toggle_help(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::ShowingHelp => InputMode::Normal,
            _ => InputMode::ShowingHelp,
        };
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn input_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
    }
}
