//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Synchronous classification on submit
//! - Session dashboard toggles and idle expiry

use std::io;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::svm::SvmClassifier;
use crate::application::ClassificationService;
use crate::config::AppConfig;
use crate::domain::Session;
use crate::StrokewatchError;

use super::ui::{
    form::{render_patient_form, PatientFormState},
    render_disclaimer, render_header,
    result::{render_result, ResultState},
    sidebar::render_sidebar,
};

/// Main application state
pub struct App {
    should_quit: bool,

    config: AppConfig,

    service: ClassificationService<SvmClassifier>,

    /// The one interactive session this process serves
    session: Session,

    form_state: PatientFormState,

    result_state: ResultState,
}

impl App {
    /// Create the application, loading the model named by `config`.
    ///
    /// # Errors
    /// Returns error if the model cannot be loaded or verified.
    pub fn new(config: AppConfig) -> Result<Self> {
        let service = ClassificationService::from_config(&config)
            .map_err(|e| anyhow!("Failed to load model from {:?}: {}", config.model_path, e))?;
        Ok(Self::with_dependencies(service, config))
    }

    /// Create application with an injected service.
    #[must_use]
    pub fn with_dependencies(
        service: ClassificationService<SvmClassifier>,
        config: AppConfig,
    ) -> Self {
        let session = Session::start();
        tracing::info!("Session {} started", session.id);
        Self {
            should_quit: false,
            config,
            service,
            session,
            form_state: PatientFormState::default(),
            result_state: ResultState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        // Plaintext inputs do not outlive the UI.
        self.form_state.clear_sensitive();

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .split(chunks[1]);

                let main = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(16), Constraint::Min(7)])
                    .split(body[1]);

                let started = self.session.started_at.format("%H:%M").to_string();
                render_header(f, chunks[0], &started);
                render_sidebar(f, body[0], &self.session);
                render_patient_form(f, main[0], &self.form_state);
                render_result(f, main[1], &self.result_state);
                render_disclaimer(f, chunks[2]);
            })?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Reset the session if it has been idle past the configured timeout.
    fn expire_if_idle(&mut self, now: DateTime<Utc>) {
        let Some(timeout) = self.config.session_idle_timeout else {
            return;
        };
        if self.session.is_expired(timeout, now) {
            tracing::info!(
                "Session {} expired after {} minutes idle; starting a new one",
                self.session.id,
                timeout.num_minutes()
            );
            self.session.reset();
            self.form_state.clear_sensitive();
            self.result_state = ResultState::Idle;
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        self.expire_if_idle(Utc::now());
        self.session.touch();

        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('p') => self.session.reveal_positive_list(),
                KeyCode::Char('n') => self.session.reveal_negative_list(),
                KeyCode::Char('s') => self.form_state.load_sample_data(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => {
                self.form_state.clear_sensitive();
                self.result_state = ResultState::Idle;
            }
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_prev(),
            KeyCode::Right => self.form_state.cycle_next(),
            KeyCode::Char(' ') if self.form_state.on_choice_field() => {
                self.form_state.cycle_next();
            }
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    /// Classify the current form. Form values are kept afterwards.
    fn submit(&mut self) {
        let input = self.form_state.to_patient_input();

        match self.service.classify_and_record(&input, &mut self.session) {
            Ok(result) => {
                self.result_state = ResultState::Complete { result };
            }
            Err(e) => {
                if !matches!(e, StrokewatchError::Validation(_)) {
                    tracing::error!("Classification failed: {}", e);
                }
                self.result_state = ResultState::Error {
                    message: e.user_message(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::svm::{ExportedSvmModel, Kernel};
    use crate::domain::{Outcome, FEATURE_COUNT, FEATURE_NAMES, INCOMPLETE_FORM_MESSAGE};
    use crate::tui::ui::form::{FIELD_AGE, FIELD_PATIENT_ID};
    use std::sync::Arc;

    // f(x) = 0.1 * age - 5 with a sigmoid calibration: age 70 → p ≈ 0.88.
    fn test_app(config: AppConfig) -> App {
        let mut sv = vec![0.0; FEATURE_COUNT];
        sv[0] = 1.0;
        let model = ExportedSvmModel {
            kernel: Kernel::Linear,
            gamma: 0.0,
            coef0: 0.0,
            degree: 3,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            support_vectors: vec![sv],
            dual_coef: vec![0.1],
            intercept: -5.0,
            prob_a: -1.0,
            prob_b: 0.0,
            classes: [0, 1],
        };
        let classifier = SvmClassifier::from_model(model).expect("valid model");
        App::with_dependencies(ClassificationService::new(Arc::new(classifier)), config)
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyCode::Char(c), KeyModifiers::CONTROL);
    }

    fn set_field(app: &mut App, idx: usize, value: &str) {
        app.form_state.selected_field = idx;
        app.form_state.fields[idx].value.clear();
        for c in value.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_sample_submission_is_positive() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Enter);

        match &app.result_state {
            ResultState::Complete { result } => assert_eq!(result.outcome, Outcome::Positive),
            other => panic!("unexpected state: {other:?}"),
        }
        assert_eq!(app.session.registry().positive_ids(), ["IDM1"]);
    }

    #[test]
    fn test_resubmit_appends_duplicate() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.registry().positive_ids(), ["IDM1", "IDM1"]);
    }

    #[test]
    fn test_negative_patient() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 's');
        set_field(&mut app, FIELD_PATIENT_ID, "P4");
        set_field(&mut app, FIELD_AGE, "30");
        press(&mut app, KeyCode::Enter);

        assert!(app.session.registry().positive_ids().is_empty());
        assert_eq!(app.session.registry().negative_ids(), ["P4"]);
    }

    #[test]
    fn test_incomplete_form_shows_generic_message() {
        let mut app = test_app(AppConfig::default());
        set_field(&mut app, FIELD_PATIENT_ID, "P2");
        press(&mut app, KeyCode::Enter);

        match &app.result_state {
            ResultState::Error { message } => assert_eq!(message, INCOMPLETE_FORM_MESSAGE),
            other => panic!("unexpected state: {other:?}"),
        }
        assert!(app.session.registry().is_empty());
    }

    #[test]
    fn test_failed_submission_keeps_form_and_reports_in_result_panel() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 's');
        set_field(&mut app, FIELD_AGE, "");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.result_state, ResultState::Error { .. }));
        assert_eq!(app.form_state.fields[FIELD_PATIENT_ID].value, "IDM1");
        assert!(app.session.registry().is_empty());
    }

    #[test]
    fn test_distinct_identifiers_are_not_merged() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Enter);
        set_field(&mut app, FIELD_PATIENT_ID, " IDM1 ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.registry().positive_ids(), ["IDM1", " IDM1 "]);
    }

    #[test]
    fn test_choice_keys_on_selection_field() {
        let mut app = test_app(AppConfig::default());
        app.form_state.selected_field = 2;
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.form_state.fields[2].selected_option(), Some("No"));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form_state.fields[2].selected_option(), Some("Yes"));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form_state.fields[2].selected_option(), Some("No"));
    }

    #[test]
    fn test_dashboard_toggles_are_monotonic() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 'p');
        ctrl(&mut app, 'p');
        assert!(app.session.visibility().show_positive_list());
        assert!(!app.session.visibility().show_negative_list());

        ctrl(&mut app, 'n');
        press(&mut app, KeyCode::Esc);
        assert!(app.session.visibility().show_positive_list());
        assert!(app.session.visibility().show_negative_list());
    }

    #[test]
    fn test_escape_clears_form_and_result() {
        let mut app = test_app(AppConfig::default());
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.result_state, ResultState::Idle));
        assert!(!app.form_state.to_patient_input().is_complete());
        assert_eq!(app.session.registry().len(), 1);
    }

    #[test]
    fn test_idle_session_is_reset() {
        let config = AppConfig {
            session_idle_timeout: Some(chrono::Duration::minutes(30)),
            ..AppConfig::default()
        };
        let mut app = test_app(config);
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 'p');
        let old_id = app.session.id.clone();

        app.session.last_activity = Utc::now() - chrono::Duration::minutes(31);
        press(&mut app, KeyCode::Down);

        assert_ne!(app.session.id, old_id);
        assert!(app.session.registry().is_empty());
        assert!(!app.session.visibility().show_positive_list());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app(AppConfig::default());
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }
}
