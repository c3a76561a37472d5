use crate::app::{ActiveAuthInput, ActiveInput, App, InputMode};
use crate::config::Config;
use crate::filter::{is_overdue, CategoryFilter, StatusFilter};
use crate::models::{Task, TaskStatus};
use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event as CEvent};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn field_line(label: &str, value: String, active: bool) -> Line<'static> {
    let label_style = if active {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::raw(value),
    ])
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", message),
        Style::default().fg(Color::Red),
    ))
}

fn key_span(key: &str) -> Span<'static> {
    Span::styled(format!(" {} ", key), Style::default().fg(Color::Red))
}

fn get_legend(input_mode: &InputMode) -> Text<'static> {
    match input_mode {
        InputMode::Normal => Text::from(Line::from(vec![
            key_span("q"),
            Span::raw(": Quit "),
            key_span("j/k"),
            Span::raw(": Move "),
            key_span("Enter"),
            Span::raw(": Toggle Done "),
            key_span("a"),
            Span::raw(": Add "),
            key_span("e"),
            Span::raw(": Edit "),
            key_span("d"),
            Span::raw(": Delete "),
            key_span("/"),
            Span::raw(": Search "),
            key_span("s"),
            Span::raw(": Status "),
            key_span("c"),
            Span::raw(": Category "),
            key_span("x"),
            Span::raw(": Clear Filters "),
            key_span("r"),
            Span::raw(": Refresh "),
            key_span("n"),
            Span::raw(": Rename "),
        ])),
        InputMode::Search => Text::from(Line::from(vec![
            key_span("Enter/Esc"),
            Span::raw(": Done "),
        ])),
        InputMode::Editing => Text::from(Line::from(vec![
            key_span("i"),
            Span::raw(": Edit Field "),
            key_span("Tab"),
            Span::raw(": Next Field "),
            key_span("←/→"),
            Span::raw(": Category "),
            key_span("Enter"),
            Span::raw(": Submit "),
            key_span("Esc"),
            Span::raw(": Cancel "),
        ])),
        InputMode::Insert => Text::from(Line::from(vec![
            key_span("Esc"),
            Span::raw(": Stop Editing "),
            key_span("Tab"),
            Span::raw(": Next Field "),
            key_span("Enter"),
            Span::raw(": Submit "),
        ])),
        InputMode::Profile => Text::from(Line::from(vec![
            key_span("Enter"),
            Span::raw(": Save "),
            key_span("Esc"),
            Span::raw(": Cancel "),
        ])),
        InputMode::Auth => Text::from(Line::from(vec![
            key_span("i"),
            Span::raw(": Edit Field "),
            key_span("Tab"),
            Span::raw(": Next Field "),
            key_span("m"),
            Span::raw(": Sign In/Sign Up "),
            key_span("Enter"),
            Span::raw(": Submit "),
            key_span("q"),
            Span::raw(": Quit "),
        ])),
        InputMode::AuthInsert => Text::from(Line::from(vec![
            key_span("Esc"),
            Span::raw(": Stop Editing "),
            key_span("Tab"),
            Span::raw(": Next Field "),
            key_span("Enter"),
            Span::raw(": Submit "),
        ])),
    }
}

fn task_list_item(task: &Task, today: NaiveDate) -> ListItem<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();

    if task.status == TaskStatus::Completed {
        spans.push(Span::styled("DONE ", Style::default().fg(Color::Green)));
    } else if is_overdue(task, today) {
        spans.push(Span::styled("LATE ", Style::default().fg(Color::Red)));
    }

    spans.push(Span::raw(task.title.clone()));
    spans.push(Span::styled(
        format!(" [{}]", task.category),
        Style::default().fg(Color::Cyan),
    ));

    if let Some(due) = task.due_date {
        let style = if is_overdue(task, today) {
            Style::default().fg(Color::Red)
        } else if due == today {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" ({})", due), style));
    }

    ListItem::new(Line::from(spans))
}

fn render_detail(task: &Task, today: NaiveDate) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(task.status.to_string()),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Category: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(task.category.to_string()),
    ]));

    let due = match task.due_date {
        Some(due) if is_overdue(task, today) => format!("{} (overdue)", due),
        Some(due) if due == today => format!("{} (today)", due),
        Some(due) => due.to_string(),
        None => "No due date".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Due Date: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(due),
    ]));

    let created = task
        .created_at
        .get(..10)
        .unwrap_or(task.created_at.as_str())
        .to_string();
    lines.push(Line::from(vec![
        Span::styled("Created: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(created),
    ]));

    lines.push(Line::from(vec![Span::styled(
        "Description: ",
        Style::default().add_modifier(Modifier::BOLD),
    )]));
    match &task.description {
        Some(description) => lines.push(Line::from(Span::raw(description.clone()))),
        None => lines.push(Line::from(Span::raw("No description".to_string()))),
    }

    lines
}

fn render_auth(f: &mut Frame, app: &App, body: Rect) {
    let form = &app.auth_form;
    let title = if form.sign_up {
        "Create Account"
    } else {
        "Sign In"
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    if form.sign_up {
        lines.push(field_line(
            "Name",
            form.name.clone(),
            form.active == ActiveAuthInput::Name,
        ));
        if let Some(message) = &form.errors.name {
            lines.push(error_line(message));
        }
    }
    lines.push(field_line(
        "Email",
        form.email.clone(),
        form.active == ActiveAuthInput::Email,
    ));
    if let Some(message) = &form.errors.email {
        lines.push(error_line(message));
    }
    lines.push(field_line(
        "Password",
        "*".repeat(form.password.chars().count()),
        form.active == ActiveAuthInput::Password,
    ));
    if let Some(message) = &form.errors.password {
        lines.push(error_line(message));
    }
    lines.push(Line::from(Span::raw("")));
    let hint = if form.sign_up {
        "Press m to sign in with an existing account"
    } else {
        "Press m to create a new account"
    };
    lines.push(Line::from(Span::styled(
        hint.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let popup_area = centered_rect_absolute(56, (lines.len() + 2) as u16, body);
    let popup_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(popup_block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

fn render_task_form(f: &mut Frame, app: &App, body: Rect) {
    let form = &app.task_form;
    let title = if form.editing_id.is_some() {
        "Edit Task"
    } else {
        "Add New Task"
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(field_line(
        "Title",
        form.title.clone(),
        form.active == ActiveInput::Title,
    ));
    if let Some(message) = &form.errors.title {
        lines.push(error_line(message));
    }
    lines.push(field_line(
        "Description",
        form.description.clone(),
        form.active == ActiveInput::Description,
    ));
    if let Some(message) = &form.errors.description {
        lines.push(error_line(message));
    }
    lines.push(field_line(
        "Category",
        format!("< {} >", form.category),
        form.active == ActiveInput::Category,
    ));
    lines.push(field_line(
        "Due Date",
        form.due_date.clone(),
        form.active == ActiveInput::DueDate,
    ));
    if let Some(message) = &form.due_date_error {
        lines.push(error_line(message));
    }
    lines.push(Line::from(Span::raw("")));
    lines.push(Line::from(Span::styled(
        "Tip: #category and @YYYY-MM-DD in the title are picked up".to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let popup_area = centered_rect_absolute(60, (lines.len() + 2) as u16, body);
    let popup_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(popup_block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

fn render_profile_form(f: &mut Frame, app: &App, body: Rect) {
    let popup_area = centered_rect_absolute(48, 3, body);
    let popup_block = Block::default()
        .title("Display Name")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    let input = Paragraph::new(app.profile_input.as_str())
        .style(Style::default().fg(Color::White))
        .block(popup_block);

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let today = Local::now().date_naive();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(size);

    let header_chunk = chunks[0];
    let body_chunk = chunks[1];
    let notice_chunk = chunks[2];
    let footer_chunk = chunks[3];

    if matches!(app.input_mode, InputMode::Auth | InputMode::AuthInsert) {
        let title = Paragraph::new(Line::from(Span::styled(
            " taskdeck",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        f.render_widget(title, header_chunk);
        render_auth(f, app, body_chunk);
    } else {
        let view = app.view();

        // Header: app name, signed-in identity, stats
        let who = match (&app.profile, &app.session) {
            (Some(profile), _) => profile.name.clone(),
            (None, Some(session)) => session.user.email.clone().unwrap_or_default(),
            (None, None) => String::new(),
        };
        let header_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(44)].as_ref())
            .split(header_chunk);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(" taskdeck", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(if who.is_empty() {
                String::new()
            } else {
                format!(" - {}", who)
            }),
        ]));
        f.render_widget(title, header_chunks[0]);

        let mut stat_spans: Vec<Span<'static>> = Vec::new();
        if view.stats.overdue > 0 {
            stat_spans.push(Span::styled(
                format!("{} overdue ", view.stats.overdue),
                Style::default().fg(Color::Red),
            ));
        }
        stat_spans.push(Span::styled(
            format!("{} pending ", view.stats.pending),
            Style::default().fg(Color::Yellow),
        ));
        stat_spans.push(Span::styled(
            format!("{} done", view.stats.completed),
            Style::default().fg(Color::Green),
        ));
        let stats = Paragraph::new(Line::from(stat_spans)).alignment(Alignment::Right);
        f.render_widget(stats, header_chunks[1]);

        // Body: task list and detail panel
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(body_chunk);

        let filters_active = !app.search_query.is_empty()
            || app.status_filter != StatusFilter::All
            || app.category_filter != CategoryFilter::All;

        let search = if matches!(app.input_mode, InputMode::Search) {
            format!("{}_", app.search_query)
        } else {
            app.search_query.clone()
        };
        let list_title = format!(
            "Tasks ({}/{}) | Search: {} | Status: {} | Category: {}",
            view.visible.len(),
            view.stats.total,
            search,
            app.status_filter.label(),
            app.category_filter.label(),
        );

        let tasks_widget = if !view.visible.is_empty() {
            let items: Vec<ListItem> = view
                .visible
                .iter()
                .map(|task| task_list_item(task, today))
                .collect();

            List::new(items)
                .block(Block::default().borders(Borders::ALL).title(list_title))
                .highlight_style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(">> ")
        } else {
            let placeholder = if filters_active {
                "No tasks match your filters"
            } else {
                "No tasks yet. Create your first task!"
            };
            List::new(vec![ListItem::new(placeholder)])
                .block(Block::default().borders(Borders::ALL).title(list_title))
        };
        f.render_stateful_widget(tasks_widget, body_chunks[0], &mut app.state);

        let detail_block = Block::default().borders(Borders::ALL).title("Task Details");
        let selected = app
            .state
            .selected()
            .and_then(|i| view.visible.get(i).cloned());
        if let Some(task) = selected {
            let paragraph = Paragraph::new(render_detail(&task, today))
                .block(detail_block)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, body_chunks[1]);
        } else {
            let paragraph = Paragraph::new("Select a task to view details")
                .block(detail_block)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, body_chunks[1]);
        }

        match app.input_mode {
            InputMode::Editing | InputMode::Insert => render_task_form(f, app, body_chunk),
            InputMode::Profile => render_profile_form(f, app, body_chunk),
            _ => {}
        }
    }

    // Notice line
    if let Some(notice) = &app.notice {
        let style = if notice.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(format!(" {}", notice), style)));
        f.render_widget(paragraph, notice_chunk);
    }

    // Legend in the footer
    let legend = Paragraph::new(get_legend(&app.input_mode))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(legend, footer_chunk);
}

pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    cfg: &Config,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &mut app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                let should_quit = app.handle_input(key, cfg).await?;
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}
