//! Application state and lifecycle management.
//!
//! The `App` struct is the central state container: it owns the session
//! store, the API client, the traversal engine, and the per-screen form
//! state, and it is what the TUI layer renders and mutates. Network calls
//! run to completion on an owned tokio runtime, so the UI naturally awaits
//! each round trip before accepting the next action.

use std::time::Duration;

use crate::api::{ApiClient, ApiError};
use crate::core::{Config, Session, SessionStore, Task, TaskAction, Traversal, TraversalState};
use crate::tui::Theme;

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Collecting credentials.
    Login,
    /// Building and walking a schedule.
    Schedule,
}

/// Focusable fields on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Login screen form state.
#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    /// Register a new account before authenticating.
    pub signup: bool,
    pub error: Option<String>,
}

impl LoginForm {
    fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
            signup: false,
            error: None,
        }
    }

    /// The field currently being edited.
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Move focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// Focusable fields on the schedule input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    Tasks,
    Minutes,
}

/// Schedule screen form state.
#[derive(Debug)]
pub struct ScheduleForm {
    /// Free-text task list, e.g. "Watch 3 videos, do 2 homework".
    pub task_text: String,
    /// Available time budget in minutes, as typed.
    pub minutes: String,
    pub focus: ScheduleField,
    pub error: Option<String>,
}

impl ScheduleForm {
    fn new(default_minutes: u32) -> Self {
        Self {
            task_text: String::new(),
            minutes: default_minutes.to_string(),
            focus: ScheduleField::Tasks,
            error: None,
        }
    }

    /// The field currently being edited.
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            ScheduleField::Tasks => &mut self.task_text,
            ScheduleField::Minutes => &mut self.minutes,
        }
    }

    /// Move focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ScheduleField::Tasks => ScheduleField::Minutes,
            ScheduleField::Minutes => ScheduleField::Tasks,
        };
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Which screen is active.
    pub mode: AppMode,

    /// Login screen state.
    pub login: LoginForm,

    /// Schedule input form state.
    pub schedule_form: ScheduleForm,

    /// The traversal engine driving the schedule walk.
    pub traversal: Traversal,

    /// Pending input in the extend-amount prompt.
    pub extend_input: String,

    /// Transient message shown in the status line.
    pub status_message: Option<String>,

    /// Whether the application should quit.
    pub should_quit: bool,

    /// Color theme resolved from config.
    pub theme: Theme,

    /// Application configuration.
    pub config: Config,

    session: SessionStore,
    api: ApiClient,
    rt: tokio::runtime::Runtime,
}

impl App {
    /// Create the app from config and an injected session store.
    ///
    /// A rehydrated session skips the login screen.
    pub fn new(config: Config, session: SessionStore) -> anyhow::Result<Self> {
        let api = ApiClient::new(
            config.server.base_url.clone(),
            Duration::from_secs(config.server.timeout_secs),
        )?;
        let rt = tokio::runtime::Runtime::new()?;

        let mode = if session.current().is_some() { AppMode::Schedule } else { AppMode::Login };
        let theme = Theme::from_name(&config.ui.theme);
        let schedule_form = ScheduleForm::new(config.general.default_minutes);

        Ok(Self {
            mode,
            login: LoginForm::new(),
            schedule_form,
            traversal: Traversal::new(),
            extend_input: String::new(),
            status_message: None,
            should_quit: false,
            theme,
            config,
            session,
            api,
            rt,
        })
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    /// Request application exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Authenticate with the entered credentials, registering first when
    /// signup mode is on. On success the session is persisted and the app
    /// switches to the schedule screen; on failure the error shows inline
    /// and the entered input is kept.
    pub fn submit_login(&mut self) {
        self.login.error = None;

        if self.login.username.trim().is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Enter a username and password".to_string());
            return;
        }

        let username = self.login.username.trim().to_string();
        let password = self.login.password.clone();
        let signup = self.login.signup;
        let api = self.api.clone();

        let result = self.rt.block_on(async {
            if signup {
                api.register(&username, &password).await?;
            }
            let token = api.login(&username, &password).await?;
            let info = api.user_info(&token).await?;
            Ok::<Session, ApiError>(Session { token, user_id: info.id })
        });

        match result {
            Ok(session) => {
                if let Err(e) = self.session.persist(session) {
                    tracing::error!("Failed to persist session: {e}");
                    self.login.error = Some("Could not save the session locally".to_string());
                    return;
                }
                self.login.password.clear();
                self.mode = AppMode::Schedule;
            }
            Err(ApiError::Auth(detail)) => {
                self.login.error = Some(detail);
            }
            Err(e) => {
                tracing::warn!("Login failed: {e}");
                self.login.error = Some("Something went wrong. Please try again.".to_string());
            }
        }
    }

    /// Submit the task text and time budget for generation.
    ///
    /// A bad minutes value is handled locally without touching the
    /// network; generation failures keep the typed task text so the user
    /// can retry.
    pub fn generate_schedule(&mut self) {
        self.schedule_form.error = None;

        let minutes = match self.schedule_form.minutes.trim().parse::<u32>() {
            Ok(m) if m > 0 => m,
            _ => {
                self.schedule_form.error =
                    Some("Enter the available time as a positive number of minutes".to_string());
                return;
            }
        };
        if self.schedule_form.task_text.trim().is_empty() {
            self.schedule_form.error = Some("Enter at least one task".to_string());
            return;
        }

        let Some(session) = self.session.current().cloned() else {
            self.mode = AppMode::Login;
            return;
        };

        let api = self.api.clone();
        let text = self.schedule_form.task_text.clone();
        let result =
            self.rt.block_on(async { api.generate_schedule(&session.token, &text, minutes).await });

        match result {
            Ok(tasks) => {
                if self.traversal.begin(tasks).is_err() {
                    self.schedule_form.error =
                        Some("The service returned an empty schedule".to_string());
                }
            }
            Err(ApiError::Schedule(detail)) => {
                self.schedule_form.error = Some(detail);
            }
            Err(e) => {
                tracing::warn!("Schedule generation failed: {e}");
                self.schedule_form.error =
                    Some("Something went wrong. Please try again.".to_string());
            }
        }
    }

    /// Apply a complete, skip, or defer action to the current task.
    ///
    /// The action is logged to the service first (fire-and-forget), then
    /// the local transition is applied regardless of the log outcome.
    pub fn apply_action(&mut self, action: TaskAction) {
        if self.traversal.state() != TraversalState::InProgress {
            return;
        }
        if action == TaskAction::Extend {
            // Extend goes through the two-phase prompt instead.
            self.begin_extend();
            return;
        }
        let Some(task) = self.traversal.current().cloned() else {
            return;
        };

        self.log_action(&task, action.code(), None);

        let result = match action {
            TaskAction::Complete => self.traversal.complete(),
            TaskAction::Skip => self.traversal.skip(),
            TaskAction::Defer => self.traversal.defer(),
            TaskAction::Extend => unreachable!("handled above"),
        };
        if let Err(e) = result {
            tracing::error!("Traversal action failed: {e}");
        }
    }

    /// Open the extend-amount prompt for the current task.
    pub fn begin_extend(&mut self) {
        if self.traversal.request_extend().is_ok() {
            self.extend_input.clear();
            self.status_message = None;
        }
    }

    /// Close the extend-amount prompt without changes.
    pub fn cancel_extend(&mut self) {
        if self.traversal.cancel_extend().is_ok() {
            self.extend_input.clear();
            self.status_message = None;
        }
    }

    /// Validate the typed extend amount and apply it.
    ///
    /// Invalid input re-prompts without mutating the engine and without
    /// issuing a log request.
    pub fn submit_extend(&mut self) {
        let minutes = match Traversal::parse_extend_amount(&self.extend_input) {
            Ok(minutes) => minutes,
            Err(e) => {
                self.status_message = Some(e.to_string());
                self.extend_input.clear();
                return;
            }
        };

        let Some(task) = self.traversal.current().cloned() else {
            return;
        };
        // Log the task with its extended duration, matching what the
        // engine is about to record.
        let mut logged = task;
        logged.duration += f64::from(minutes);
        self.log_action(&logged, TaskAction::Extend.code(), Some(minutes));

        if let Err(e) = self.traversal.extend(minutes) {
            tracing::error!("Extend failed: {e}");
        }
        self.extend_input.clear();
        self.status_message = None;
    }

    /// Discard the finished schedule and return to the input form.
    pub fn new_schedule(&mut self) {
        self.traversal.reset();
        self.schedule_form.task_text.clear();
        self.schedule_form.focus = ScheduleField::Tasks;
        self.schedule_form.error = None;
        self.status_message = None;
    }

    /// Clear the session and return to the login screen.
    ///
    /// If the persisted copy cannot be removed the in-memory session is
    /// kept too, so the two never disagree.
    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::error!("Logout failed: {e}");
            self.status_message = Some("Could not clear the saved session".to_string());
            return;
        }
        self.traversal.reset();
        self.login = LoginForm::new();
        self.schedule_form = ScheduleForm::new(self.config.general.default_minutes);
        self.extend_input.clear();
        self.status_message = None;
        self.mode = AppMode::Login;
    }

    /// Record an action against the service. Best-effort: failures are
    /// logged and never block or roll back the traversal.
    fn log_action(&self, task: &Task, action: &str, extended_by: Option<u32>) {
        let Some(session) = self.session.current() else {
            return;
        };
        let result = self.rt.block_on(self.api.log_task(
            &session.token,
            session.user_id,
            task,
            action,
            extended_by,
        ));
        if let Err(e) = result {
            tracing::warn!("Failed to log task action {action:?}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_session(session: Option<Session>) -> App {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        let mut store = SessionStore::open(&path);
        if let Some(s) = session {
            store.persist(s).unwrap();
        }
        // The tempdir is gone after this scope, which is fine: these tests
        // never write the session again.
        App::new(Config::default(), store).unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![Task::new("1", "A", 30.0), Task::new("2", "B", 20.0)]
    }

    #[test]
    fn test_starts_on_login_without_session() {
        let app = app_with_session(None);
        assert_eq!(app.mode, AppMode::Login);
    }

    #[test]
    fn test_starts_on_schedule_with_rehydrated_session() {
        let app =
            app_with_session(Some(Session { token: "tok1".to_string(), user_id: 42 }));
        assert_eq!(app.mode, AppMode::Schedule);
        assert_eq!(app.session().unwrap().user_id, 42);
    }

    #[test]
    fn test_empty_credentials_fail_locally() {
        let mut app = app_with_session(None);
        app.submit_login();
        assert!(app.login.error.is_some());
    }

    #[test]
    fn test_bad_minutes_fail_locally() {
        let mut app =
            app_with_session(Some(Session { token: "tok1".to_string(), user_id: 42 }));
        app.schedule_form.task_text = "Read chapter 4".to_string();

        for bad in ["", "abc", "0", "-10"] {
            app.schedule_form.minutes = bad.to_string();
            app.generate_schedule();
            assert!(app.schedule_form.error.is_some(), "minutes {bad:?}");
            assert_eq!(app.traversal.state(), TraversalState::Collecting);
        }
        // The typed task text survives the failures.
        assert_eq!(app.schedule_form.task_text, "Read chapter 4");
    }

    #[test]
    fn test_invalid_extend_input_reprompts_without_mutation() {
        let mut app =
            app_with_session(Some(Session { token: "tok1".to_string(), user_id: 42 }));
        app.traversal.begin(tasks()).unwrap();
        app.begin_extend();
        assert_eq!(app.traversal.state(), TraversalState::AwaitingExtendAmount);

        app.extend_input = "abc".to_string();
        app.submit_extend();

        assert_eq!(app.traversal.state(), TraversalState::AwaitingExtendAmount);
        assert!((app.traversal.tasks()[0].duration - 30.0).abs() < f64::EPSILON);
        assert!(app.status_message.is_some());
        assert!(app.extend_input.is_empty());
    }

    #[test]
    fn test_cancel_extend_keeps_cursor() {
        let mut app =
            app_with_session(Some(Session { token: "tok1".to_string(), user_id: 42 }));
        app.traversal.begin(tasks()).unwrap();
        app.begin_extend();
        app.cancel_extend();
        assert_eq!(app.traversal.state(), TraversalState::InProgress);
        assert_eq!(app.traversal.cursor(), 0);
    }

    #[test]
    fn test_new_schedule_clears_form_and_engine() {
        let mut app =
            app_with_session(Some(Session { token: "tok1".to_string(), user_id: 42 }));
        app.schedule_form.task_text = "old tasks".to_string();
        app.traversal.begin(tasks()).unwrap();
        app.traversal.complete().unwrap();
        app.traversal.complete().unwrap();
        assert_eq!(app.traversal.state(), TraversalState::Completed);

        app.new_schedule();
        assert_eq!(app.traversal.state(), TraversalState::Collecting);
        assert!(app.schedule_form.task_text.is_empty());
    }

    #[test]
    fn test_logout_clears_session_and_returns_to_login() {
        let mut app =
            app_with_session(Some(Session { token: "tok1".to_string(), user_id: 42 }));
        app.traversal.begin(tasks()).unwrap();

        app.logout();
        assert_eq!(app.mode, AppMode::Login);
        assert!(app.session().is_none());
        assert_eq!(app.traversal.state(), TraversalState::Collecting);
        assert!(app.login.username.is_empty());
    }
}
