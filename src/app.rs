use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::io;

use crate::api::{self, ApiError};
use crate::config::Config;
use crate::filter::{self, CategoryFilter, StatusFilter, TaskView};
use crate::models::{Profile, Session, Task, TaskCategory, UpdateTask};
use crate::parser;
use crate::validator::{self, AuthFormErrors, TaskFormErrors};

pub struct App {
    /// Canonical task collection for the session, newest first. Mutated
    /// only by `load`, `apply_created`, `apply_updated` and
    /// `apply_deleted`, each after the store confirmed the change.
    pub tasks: Vec<Task>,
    pub state: ListState,
    pub session: Option<Session>,
    pub profile: Option<Profile>,
    pub input_mode: InputMode,
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub category_filter: CategoryFilter,
    pub task_form: TaskForm,
    pub auth_form: AuthForm,
    pub profile_input: String,
    pub notice: Option<String>,
}

pub enum InputMode {
    Auth,
    AuthInsert,
    Normal,
    Search,
    Editing,
    Insert,
    Profile,
}

#[derive(Clone, Copy, Default, PartialEq)]
pub enum ActiveInput {
    #[default]
    Title,
    Description,
    Category,
    DueDate,
}

#[derive(Default)]
pub struct TaskForm {
    pub editing_id: Option<String>,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub due_date: String,
    pub active: ActiveInput,
    pub errors: TaskFormErrors,
    pub due_date_error: Option<String>,
}

impl TaskForm {
    pub fn next_field(&mut self) {
        self.active = match self.active {
            ActiveInput::Title => ActiveInput::Description,
            ActiveInput::Description => ActiveInput::Category,
            ActiveInput::Category => ActiveInput::DueDate,
            ActiveInput::DueDate => ActiveInput::Title,
        };
    }

    pub fn previous_field(&mut self) {
        self.active = match self.active {
            ActiveInput::Title => ActiveInput::DueDate,
            ActiveInput::Description => ActiveInput::Title,
            ActiveInput::Category => ActiveInput::Description,
            ActiveInput::DueDate => ActiveInput::Category,
        };
    }

    fn push(&mut self, c: char) {
        match self.active {
            ActiveInput::Title => self.title.push(c),
            ActiveInput::Description => self.description.push(c),
            ActiveInput::DueDate => self.due_date.push(c),
            ActiveInput::Category => {}
        }
    }

    fn pop(&mut self) {
        match self.active {
            ActiveInput::Title => {
                self.title.pop();
            }
            ActiveInput::Description => {
                self.description.pop();
            }
            ActiveInput::DueDate => {
                self.due_date.pop();
            }
            ActiveInput::Category => {}
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq)]
pub enum ActiveAuthInput {
    Name,
    #[default]
    Email,
    Password,
}

#[derive(Default)]
pub struct AuthForm {
    pub sign_up: bool,
    pub name: String,
    pub email: String,
    pub password: String,
    pub active: ActiveAuthInput,
    pub errors: AuthFormErrors,
}

impl AuthForm {
    pub fn next_field(&mut self) {
        self.active = match (self.sign_up, self.active) {
            (true, ActiveAuthInput::Name) => ActiveAuthInput::Email,
            (_, ActiveAuthInput::Email) => ActiveAuthInput::Password,
            (true, ActiveAuthInput::Password) => ActiveAuthInput::Name,
            (false, ActiveAuthInput::Password) => ActiveAuthInput::Email,
            (false, ActiveAuthInput::Name) => ActiveAuthInput::Email,
        };
    }

    pub fn previous_field(&mut self) {
        self.active = match (self.sign_up, self.active) {
            (true, ActiveAuthInput::Name) => ActiveAuthInput::Password,
            (true, ActiveAuthInput::Email) => ActiveAuthInput::Name,
            (false, ActiveAuthInput::Email) => ActiveAuthInput::Password,
            (_, ActiveAuthInput::Password) => ActiveAuthInput::Email,
            (false, ActiveAuthInput::Name) => ActiveAuthInput::Email,
        };
    }

    fn push(&mut self, c: char) {
        match self.active {
            ActiveAuthInput::Name => self.name.push(c),
            ActiveAuthInput::Email => self.email.push(c),
            ActiveAuthInput::Password => self.password.push(c),
        }
    }

    fn pop(&mut self) {
        match self.active {
            ActiveAuthInput::Name => {
                self.name.pop();
            }
            ActiveAuthInput::Email => {
                self.email.pop();
            }
            ActiveAuthInput::Password => {
                self.password.pop();
            }
        }
    }
}

impl App {
    pub fn new() -> App {
        App {
            tasks: Vec::new(),
            state: ListState::default(),
            session: None,
            profile: None,
            input_mode: InputMode::Auth,
            search_query: String::new(),
            status_filter: StatusFilter::All,
            category_filter: CategoryFilter::All,
            task_form: TaskForm::default(),
            auth_form: AuthForm::default(),
            profile_input: String::new(),
            notice: None,
        }
    }

    pub fn start_session(&mut self, session: Session) {
        self.session = Some(session);
        self.input_mode = InputMode::Normal;
    }

    /// Replaces the whole collection with the store's view. On failure the
    /// previous collection stays as it was and the error is surfaced.
    pub async fn load(&mut self, cfg: &Config) {
        let session = self.session.clone();
        let result = api::fetch_tasks(cfg, session.as_ref()).await;
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.state.select(Some(0));
                self.clamp_selection();
            }
            Err(err) => self.notice = Some(format!("Error fetching tasks: {}", err)),
        }
    }

    pub async fn load_profile(&mut self, cfg: &Config) {
        let session = match self.session.clone() {
            Some(session) => session,
            None => return,
        };
        let result = api::fetch_profile(cfg, &session).await;
        match result {
            Ok(profile) => self.profile = profile,
            Err(err) => self.notice = Some(format!("Error fetching profile: {}", err)),
        }
    }

    pub fn apply_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn apply_updated(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    pub fn apply_deleted(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    /// The filtered view the list renders, derived fresh on every call.
    pub fn view(&self) -> TaskView {
        filter::derive_view(
            &self.tasks,
            &self.search_query,
            self.status_filter,
            self.category_filter,
            Local::now().date_naive(),
        )
    }

    fn selected_task_id(&self) -> Option<String> {
        let view = self.view();
        self.state
            .selected()
            .and_then(|i| view.visible.get(i))
            .map(|task| task.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.view().visible.len();
        match self.state.selected() {
            Some(_) if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None if len > 0 => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.view().visible.len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.view().visible.len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn open_edit_form(&mut self) {
        let id = match self.selected_task_id() {
            Some(id) => id,
            None => return,
        };
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            self.task_form = TaskForm {
                editing_id: Some(task.id.clone()),
                title: task.title.clone(),
                description: task.description.clone().unwrap_or_default(),
                category: task.category,
                due_date: task.due_date.map(|d| d.to_string()).unwrap_or_default(),
                active: ActiveInput::Title,
                errors: TaskFormErrors::default(),
                due_date_error: None,
            };
            self.input_mode = InputMode::Editing;
        }
    }

    async fn toggle_selected(&mut self, cfg: &Config) {
        let id = match self.selected_task_id() {
            Some(id) => id,
            None => return,
        };
        let current = match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => task.status,
            None => return,
        };
        let session = match self.session.clone() {
            Some(session) => session,
            None => {
                self.notice = Some("Error: not signed in".to_string());
                return;
            }
        };

        let changes = UpdateTask {
            status: Some(current.toggled()),
            ..Default::default()
        };
        let result = api::update_task(cfg, &session, &id, &changes).await;
        match result {
            Ok(task) => {
                self.notice = Some(format!("Task marked as {}", task.status));
                self.apply_updated(task);
                self.clamp_selection();
            }
            Err(err) => self.notice = Some(format!("Error updating task: {}", err)),
        }
    }

    async fn delete_selected(&mut self, cfg: &Config) {
        let id = match self.selected_task_id() {
            Some(id) => id,
            None => return,
        };
        let session = match self.session.clone() {
            Some(session) => session,
            None => {
                self.notice = Some("Error: not signed in".to_string());
                return;
            }
        };

        let result = api::delete_task(cfg, &session, &id).await;
        match result {
            Ok(()) => {
                self.apply_deleted(&id);
                self.clamp_selection();
                self.notice = Some("Task deleted".to_string());
            }
            Err(err) => self.notice = Some(format!("Error deleting task: {}", err)),
        }
    }

    async fn submit_task_form(&mut self, cfg: &Config) {
        self.task_form.errors = TaskFormErrors::default();
        self.task_form.due_date_error = None;

        let editing_id = self.task_form.editing_id.clone();

        // Quick-input tokens apply to new tasks only; an edited title is
        // taken literally.
        let (title, category_token, date_token) = if editing_id.is_none() {
            let parsed = parser::parse_task_input(&self.task_form.title);
            (parsed.title, parsed.category, parsed.due_date)
        } else {
            (self.task_form.title.clone(), None, None)
        };

        let fields = match validator::validate_task(&title, &self.task_form.description) {
            Ok(fields) => fields,
            Err(errors) => {
                self.task_form.errors = errors;
                return;
            }
        };

        let due_text = self.task_form.due_date.trim().to_string();
        let due_date = if due_text.is_empty() {
            date_token
        } else {
            match NaiveDate::parse_from_str(&due_text, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    self.task_form.due_date_error =
                        Some("Due date must be YYYY-MM-DD".to_string());
                    return;
                }
            }
        };
        let category = category_token.unwrap_or(self.task_form.category);
        let session = self.session.clone();

        let result = match &editing_id {
            Some(id) => {
                let changes = UpdateTask {
                    title: Some(fields.title.clone()),
                    description: Some(fields.description.clone()),
                    status: None,
                    category: Some(category),
                    due_date: Some(due_date),
                };
                match &session {
                    Some(session) => api::update_task(cfg, session, id, &changes).await,
                    None => Err(ApiError::Auth),
                }
            }
            None => {
                api::create_task(
                    cfg,
                    session.as_ref(),
                    &fields.title,
                    fields.description.as_deref(),
                    Some(category),
                    due_date,
                )
                .await
            }
        };

        match result {
            Ok(task) => {
                if editing_id.is_some() {
                    self.apply_updated(task);
                    self.notice = Some("Task updated".to_string());
                } else {
                    self.apply_created(task);
                    self.state.select(Some(0));
                    self.notice = Some("Task created".to_string());
                }
                self.task_form = TaskForm::default();
                self.input_mode = InputMode::Normal;
                self.clamp_selection();
            }
            Err(err) => self.notice = Some(format!("Error saving task: {}", err)),
        }
    }

    async fn submit_auth(&mut self, cfg: &Config) {
        self.auth_form.errors = AuthFormErrors::default();

        if self.auth_form.sign_up {
            let fields = match validator::validate_sign_up(
                &self.auth_form.name,
                &self.auth_form.email,
                &self.auth_form.password,
            ) {
                Ok(fields) => fields,
                Err(errors) => {
                    self.auth_form.errors = errors;
                    self.input_mode = InputMode::Auth;
                    return;
                }
            };
            let result = api::sign_up(cfg, &fields.name, &fields.email, &fields.password).await;
            self.finish_auth(cfg, result, "Welcome! Your account has been created.")
                .await;
        } else {
            let fields =
                match validator::validate_sign_in(&self.auth_form.email, &self.auth_form.password)
                {
                    Ok(fields) => fields,
                    Err(errors) => {
                        self.auth_form.errors = errors;
                        self.input_mode = InputMode::Auth;
                        return;
                    }
                };
            let result = api::sign_in(cfg, &fields.email, &fields.password).await;
            self.finish_auth(cfg, result, "Welcome back!").await;
        }
    }

    async fn finish_auth(
        &mut self,
        cfg: &Config,
        result: Result<Session, ApiError>,
        notice: &str,
    ) {
        match result {
            Ok(session) => {
                self.session = Some(session);
                self.auth_form = AuthForm::default();
                self.input_mode = InputMode::Normal;
                self.notice = Some(notice.to_string());
                self.load(cfg).await;
                self.load_profile(cfg).await;
            }
            Err(err) => {
                self.notice = Some(format!("Error: {}", err));
                self.input_mode = InputMode::Auth;
            }
        }
    }

    async fn rename_profile(&mut self, cfg: &Config) {
        let name = match validator::check_name(&self.profile_input) {
            Ok(name) => name,
            Err(message) => {
                self.notice = Some(message);
                return;
            }
        };
        let session = match self.session.clone() {
            Some(session) => session,
            None => {
                self.notice = Some("Error: not signed in".to_string());
                return;
            }
        };

        let result = api::update_profile(cfg, &session, &name).await;
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.input_mode = InputMode::Normal;
                self.notice = Some("Profile updated".to_string());
            }
            Err(err) => self.notice = Some(format!("Error updating profile: {}", err)),
        }
    }

    pub async fn handle_input(
        &mut self,
        key: crossterm::event::KeyEvent,
        cfg: &Config,
    ) -> io::Result<bool> {
        match self.input_mode {
            InputMode::Auth => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('i') => self.input_mode = InputMode::AuthInsert,
                KeyCode::Char('m') => {
                    self.auth_form.sign_up = !self.auth_form.sign_up;
                    self.auth_form.errors = AuthFormErrors::default();
                    self.auth_form.active = if self.auth_form.sign_up {
                        ActiveAuthInput::Name
                    } else {
                        ActiveAuthInput::Email
                    };
                }
                KeyCode::Tab | KeyCode::Char('j') => self.auth_form.next_field(),
                KeyCode::BackTab | KeyCode::Char('k') => self.auth_form.previous_field(),
                KeyCode::Enter => self.submit_auth(cfg).await,
                _ => {}
            },

            InputMode::AuthInsert => match key.code {
                KeyCode::Char(c) => self.auth_form.push(c),
                KeyCode::Backspace => self.auth_form.pop(),
                KeyCode::Tab => self.auth_form.next_field(),
                KeyCode::Enter => self.submit_auth(cfg).await,
                KeyCode::Esc => self.input_mode = InputMode::Auth,
                _ => {}
            },

            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('j') | KeyCode::Down => self.next(),
                KeyCode::Char('k') | KeyCode::Up => self.previous(),
                KeyCode::Char('r') => self.load(cfg).await,
                KeyCode::Char('/') => self.input_mode = InputMode::Search,
                KeyCode::Char('s') => {
                    self.status_filter = self.status_filter.cycle();
                    self.clamp_selection();
                }
                KeyCode::Char('c') => {
                    self.category_filter = self.category_filter.cycle();
                    self.clamp_selection();
                }
                KeyCode::Char('x') => {
                    self.search_query.clear();
                    self.status_filter = StatusFilter::All;
                    self.category_filter = CategoryFilter::All;
                    self.clamp_selection();
                }
                KeyCode::Char('a') => {
                    self.task_form = TaskForm::default();
                    self.input_mode = InputMode::Editing;
                }
                KeyCode::Char('e') => self.open_edit_form(),
                KeyCode::Char('n') => {
                    self.profile_input = self
                        .profile
                        .as_ref()
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    self.input_mode = InputMode::Profile;
                }
                KeyCode::Char('d') => self.delete_selected(cfg).await,
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(cfg).await,
                _ => {}
            },

            InputMode::Search => match key.code {
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    self.clamp_selection();
                }
                KeyCode::Backspace => {
                    self.search_query.pop();
                    self.clamp_selection();
                }
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                _ => {}
            },

            InputMode::Editing => match key.code {
                KeyCode::Char('i') => self.input_mode = InputMode::Insert,
                KeyCode::Tab => self.task_form.next_field(),
                KeyCode::BackTab => self.task_form.previous_field(),
                KeyCode::Left if self.task_form.active == ActiveInput::Category => {
                    self.task_form.category = self.task_form.category.previous();
                }
                KeyCode::Right if self.task_form.active == ActiveInput::Category => {
                    self.task_form.category = self.task_form.category.next();
                }
                KeyCode::Enter => self.submit_task_form(cfg).await,
                KeyCode::Esc => {
                    self.task_form = TaskForm::default();
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },

            InputMode::Insert => match key.code {
                KeyCode::Left if self.task_form.active == ActiveInput::Category => {
                    self.task_form.category = self.task_form.category.previous();
                }
                KeyCode::Right if self.task_form.active == ActiveInput::Category => {
                    self.task_form.category = self.task_form.category.next();
                }
                KeyCode::Char(c) => self.task_form.push(c),
                KeyCode::Backspace => self.task_form.pop(),
                KeyCode::Tab => self.task_form.next_field(),
                KeyCode::Enter => self.submit_task_form(cfg).await,
                KeyCode::Esc => self.input_mode = InputMode::Editing,
                _ => {}
            },

            InputMode::Profile => match key.code {
                KeyCode::Char(c) => self.profile_input.push(c),
                KeyCode::Backspace => {
                    self.profile_input.pop();
                }
                KeyCode::Enter => self.rename_profile(cfg).await,
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                _ => {}
            },
        }
        Ok(false)
    }
}
