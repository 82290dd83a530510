//! Interactive terminal front end for the redaction tool and the admin area

mod app;
mod ui;

pub use app::{App, InputMode, Screen, Services};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

pub async fn run(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.poll_submission().await?;
        terminal.draw(|f| ui::draw(f, app))?;

        // Wake up regularly so a finished redaction shows without a key press
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && handle_key(app, key).await? {
                return Ok(());
            }
        }
    }
}

/// Apply one key press. Returns true when the app should exit.
pub async fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.input_mode {
        InputMode::Normal => match (app.screen, key.code) {
            (_, KeyCode::Char('q')) => return Ok(true),
            (_, KeyCode::Char('?')) => app.toggle_help(),
            (_, KeyCode::Tab) => app.cycle_screen().await?,
            (_, KeyCode::Char('j') | KeyCode::Down) => app.next(),
            (_, KeyCode::Char('k') | KeyCode::Up) => app.previous(),
            (Screen::Tool, _) if app.is_submitting() => {}
            (Screen::Tool, KeyCode::Char(' ')) => app.toggle_category(),
            (Screen::Tool, KeyCode::Char('a')) => app.toggle_all(),
            (Screen::Tool, KeyCode::Char('o')) => app.start_select_file(),
            (Screen::Tool, KeyCode::Char('s') | KeyCode::Enter) => app.submit(),
            (Screen::Users, KeyCode::Char('b')) => app.toggle_block_selected().await?,
            (Screen::Users, KeyCode::Char('d')) => app.start_delete(),
            (Screen::Logs, KeyCode::Char('l')) => app.cycle_log_level(),
            (Screen::Users | Screen::Logs, KeyCode::Char('r')) => app.refresh().await?,
            (Screen::Users | Screen::Logs, KeyCode::Esc) => app.show(Screen::Tool).await?,
            _ => {}
        },
        InputMode::EnteringPath => match key.code {
            KeyCode::Enter => app.confirm_select_file().await?,
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.input_backspace(),
            KeyCode::Char(c) => app.input_char(c),
            _ => {}
        },
        InputMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete().await?,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_input(),
            _ => {}
        },
        InputMode::ShowingHelp => match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
            _ => {}
        },
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use redact_client::{AdminApi, ClientError, RedactionService};
    use redact_core::admin::fallback_users;
    use redact_core::error::NO_FILE_MESSAGE;
    use redact_core::{
        AcceptList, AdminUser, FilenamePolicy, LogEntry, RedactedArtifact, RedactionCategory,
        RedactionRequest, Session, UploadedFile,
    };
    use redact_engine::{MemorySink, UploadForm};
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    struct EchoService;

    #[async_trait]
    impl RedactionService for EchoService {
        async fn redact(&self, request: &RedactionRequest) -> redact_client::Result<RedactedArtifact> {
            let disposition = format!("attachment; filename=\"REDACTED_{}\"", request.file_name);
            Ok(RedactedArtifact::new(
                request.bytes.clone(),
                Some("text/plain".to_string()),
                Some(&disposition),
            ))
        }
    }

    /// Holds every request until a permit is released
    struct GatedService {
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl RedactionService for GatedService {
        async fn redact(&self, request: &RedactionRequest) -> redact_client::Result<RedactedArtifact> {
            let _permit = self.gate.acquire().await.unwrap();
            EchoService.redact(request).await
        }
    }

    /// Serves the sample users; optionally rejects every call as unauthorised
    struct FakeAdmin {
        reject: bool,
    }

    #[async_trait]
    impl AdminApi for FakeAdmin {
        async fn list_users(&self) -> redact_client::Result<Vec<AdminUser>> {
            if self.reject {
                return Err(ClientError::Unauthorized);
            }
            Ok(fallback_users())
        }

        async fn set_blocked(&self, id: u64, block: bool) -> redact_client::Result<AdminUser> {
            if self.reject {
                return Err(ClientError::Unauthorized);
            }
            Ok(AdminUser::new(id, "x", "x@example.com", block))
        }

        async fn delete_user(&self, _id: u64) -> redact_client::Result<()> {
            if self.reject {
                return Err(ClientError::Unauthorized);
            }
            Ok(())
        }

        async fn list_logs(&self) -> redact_client::Result<Vec<LogEntry>> {
            Ok(Vec::new())
        }
    }

    fn app(reject: bool, session: Option<Session>) -> App {
        app_with(Arc::new(EchoService), reject, session)
    }

    fn app_with(
        redaction: Arc<dyn RedactionService>,
        reject: bool,
        session: Option<Session>,
    ) -> App {
        let form = UploadForm::new(AcceptList::default(), FilenamePolicy::Preserve);
        let services = Services {
            redaction,
            sink: Arc::new(MemorySink::new()),
            admin: Arc::new(FakeAdmin { reject }),
            storage: None,
        };
        App::new(form, services, session)
    }

    fn session() -> Option<Session> {
        Some(Session::issue("admin", time::Duration::hours(1)))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| ui::draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_category_toggling() {
        let mut app = app(false, None);
        assert!(app.form.is_all_selected());

        handle_key(&mut app, press(KeyCode::Char(' '))).await.unwrap();
        assert!(!app.form.selection().contains(RedactionCategory::ALL[0]));

        handle_key(&mut app, press(KeyCode::Char('j'))).await.unwrap();
        handle_key(&mut app, press(KeyCode::Char(' '))).await.unwrap();
        assert_eq!(app.form.selection().len(), RedactionCategory::ALL.len() - 2);

        // Not everything is selected, so 'a' selects all
        handle_key(&mut app, press(KeyCode::Char('a'))).await.unwrap();
        assert!(app.form.is_all_selected());
        handle_key(&mut app, press(KeyCode::Char('a'))).await.unwrap();
        assert!(app.form.selection().is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_file_shows_error() {
        let mut app = app(false, None);
        handle_key(&mut app, press(KeyCode::Enter)).await.unwrap();
        app.finish_submission().await.unwrap();

        assert_eq!(app.status_message.as_deref(), Some(NO_FILE_MESSAGE));
        assert!(render(&app).contains(NO_FILE_MESSAGE));
    }

    #[tokio::test]
    async fn test_submit_delivers_and_clears() {
        let mut app = app(false, None);
        app.form
            .set_file(UploadedFile::new("memo.txt", b"hello".to_vec()).unwrap());

        handle_key(&mut app, press(KeyCode::Char('s'))).await.unwrap();
        app.finish_submission().await.unwrap();

        assert!(app.form.file().is_none());
        assert!(app.last_output.is_some());
        assert!(app.status_message.as_deref().unwrap().starts_with("✓ Saved"));
    }

    #[tokio::test]
    async fn test_redacting_is_shown_until_the_result_arrives() {
        let gate = Arc::new(Semaphore::new(0));
        let mut app = app_with(Arc::new(GatedService { gate: gate.clone() }), false, None);
        app.form
            .set_file(UploadedFile::new("memo.txt", b"hello".to_vec()).unwrap());

        handle_key(&mut app, press(KeyCode::Enter)).await.unwrap();
        assert!(app.is_submitting());
        assert!(render(&app).contains("Redacting..."));

        // The form is frozen while the request runs
        handle_key(&mut app, press(KeyCode::Char(' '))).await.unwrap();
        assert!(app.form.is_all_selected());
        app.poll_submission().await.unwrap();
        assert!(app.is_submitting());

        gate.add_permits(1);
        app.finish_submission().await.unwrap();

        assert!(!app.is_submitting());
        assert!(app.form.file().is_none());
        assert!(!render(&app).contains("Redacting..."));
    }

    #[tokio::test]
    async fn test_path_entry_can_be_cancelled() {
        let mut app = app(false, None);
        handle_key(&mut app, press(KeyCode::Char('o'))).await.unwrap();
        assert_eq!(app.input_mode, InputMode::EnteringPath);

        handle_key(&mut app, press(KeyCode::Char('x'))).await.unwrap();
        assert!(render(&app).contains("Path: x_"));

        handle_key(&mut app, press(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_buffer.is_empty());
    }

    #[tokio::test]
    async fn test_admin_screens_need_a_session() {
        let mut app = app(false, None);
        handle_key(&mut app, press(KeyCode::Tab)).await.unwrap();

        assert_eq!(app.screen, Screen::Tool);
        assert!(app.status_message.as_deref().unwrap().contains("redact admin login"));
    }

    #[tokio::test]
    async fn test_users_screen_block_and_delete() {
        let mut app = app(false, session());
        handle_key(&mut app, press(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.screen, Screen::Users);
        assert_eq!(app.users.users().len(), 3);
        assert!(render(&app).contains("Hridaya"));

        handle_key(&mut app, press(KeyCode::Char('b'))).await.unwrap();
        assert!(app.users.users()[0].blocked);
        assert_eq!(app.status_message.as_deref(), Some("✓ Blocked Hridaya"));

        handle_key(&mut app, press(KeyCode::Char('j'))).await.unwrap();
        handle_key(&mut app, press(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert!(render(&app).contains("Delete Anita?"));

        handle_key(&mut app, press(KeyCode::Char('y'))).await.unwrap();
        let ids: Vec<u64> = app.users.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_rejected_session_signs_out() {
        let mut app = app(true, session());
        handle_key(&mut app, press(KeyCode::Tab)).await.unwrap();

        assert!(app.session.is_none());
        assert_eq!(app.screen, Screen::Tool);
        assert!(app.status_message.as_deref().unwrap().contains("Session expired"));
    }

    #[tokio::test]
    async fn test_help_overlay() {
        let mut app = app(false, None);
        handle_key(&mut app, press(KeyCode::Char('?'))).await.unwrap();
        assert_eq!(app.input_mode, InputMode::ShowingHelp);
        assert!(render(&app).contains("Help"));

        // 'q' closes help instead of quitting
        assert!(!handle_key(&mut app, press(KeyCode::Char('q'))).await.unwrap());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(handle_key(&mut app, press(KeyCode::Char('q'))).await.unwrap());
    }
}
