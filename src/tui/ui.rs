//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui. The screens are
//! deliberately thin: they render `App` state and nothing else.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
    Frame,
};

use crate::app::{AppMode, LoginField, ScheduleField};
use crate::core::TraversalState;
use crate::App;

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Login => draw_login(frame, app),
        AppMode::Schedule => match app.traversal.state() {
            TraversalState::Collecting => draw_schedule_form(frame, app),
            TraversalState::InProgress => draw_current_task(frame, app, false),
            TraversalState::AwaitingExtendAmount => draw_current_task(frame, app, true),
            TraversalState::Completed => draw_completed(frame, app),
        },
    }
}

/// Login screen: username/password fields with an inline error line.
fn draw_login(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(50, 14, frame.area());

    let title = if app.login.signup { " Create Account " } else { " Studyflow " };
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(1), // Error
            Constraint::Length(1), // Mode hint
            Constraint::Min(1),    // Key hints
        ])
        .split(inner);

    frame.render_widget(
        input_field("Username", &app.login.username, app.login.focus == LoginField::Username, app),
        chunks[0],
    );
    let masked = "*".repeat(app.login.password.chars().count());
    frame.render_widget(
        input_field("Password", &masked, app.login.focus == LoginField::Password, app),
        chunks[1],
    );

    if let Some(error) = &app.login.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(theme.error)),
            chunks[2],
        );
    }

    let mode_hint = if app.login.signup {
        "Registering a new account, then signing in"
    } else {
        "Signing in with an existing account"
    };
    frame.render_widget(
        Paragraph::new(mode_hint).style(Style::default().fg(theme.text_dim)),
        chunks[3],
    );

    frame.render_widget(
        hints(&[("Enter", "submit"), ("Tab", "switch field"), ("Ctrl+R", "toggle signup"), ("Esc", "quit")], app),
        chunks[4],
    );
}

/// Schedule input form: free-text tasks plus a minutes budget.
fn draw_schedule_form(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(60, 16, frame.area());

    let block = Block::default()
        .title(" Create Your Study Schedule ")
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Tasks
            Constraint::Length(3), // Minutes
            Constraint::Length(1), // Error
            Constraint::Min(1),    // Key hints
        ])
        .split(inner);

    let tasks_focused = app.schedule_form.focus == ScheduleField::Tasks;
    let tasks_text = if app.schedule_form.task_text.is_empty() && !tasks_focused {
        Span::styled(
            "e.g. Watch 3 videos, do 2 homework, 1 leetcode",
            Style::default().fg(theme.text_dim),
        )
    } else {
        Span::styled(app.schedule_form.task_text.as_str(), Style::default().fg(theme.text))
    };
    frame.render_widget(
        Paragraph::new(Line::from(tasks_text))
            .wrap(Wrap { trim: false })
            .block(bordered("Tasks", tasks_focused, app)),
        chunks[0],
    );

    frame.render_widget(
        input_field(
            "Available Time (minutes)",
            &app.schedule_form.minutes,
            app.schedule_form.focus == ScheduleField::Minutes,
            app,
        ),
        chunks[1],
    );

    if let Some(error) = &app.schedule_form.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(theme.error)),
            chunks[2],
        );
    }

    frame.render_widget(
        hints(&[("Enter", "generate"), ("Tab", "switch field"), ("Ctrl+L", "log out"), ("Esc", "quit")], app),
        chunks[3],
    );
}

/// Current-task card with a progress gauge; optionally the extend prompt.
fn draw_current_task(frame: &mut Frame, app: &App, extend_prompt: bool) {
    let theme = &app.theme;
    let area = centered_rect(60, 14, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress
            Constraint::Length(7), // Task card
            Constraint::Length(1), // Status
            Constraint::Min(1),    // Key hints
        ])
        .split(area);

    let progress = app.traversal.progress();
    frame.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)))
            .gauge_style(Style::default().fg(theme.primary))
            .ratio(progress)
            .label(format!("{}/{}", app.traversal.cursor() + 1, app.traversal.len())),
        chunks[0],
    );

    let card = Block::default()
        .title(" Current Task ")
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .padding(Padding::horizontal(1));
    let card_inner = card.inner(chunks[1]);
    frame.render_widget(card, chunks[1]);

    let mut lines = Vec::new();
    if let Some(task) = app.traversal.current() {
        lines.push(Line::from(Span::styled(
            task.description.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("{} mins", task.duration.round() as i64),
            Style::default().fg(theme.text_dim),
        )));
        if extend_prompt {
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("Additional minutes: ", Style::default().fg(theme.text)),
                Span::styled(
                    app.extend_input.clone(),
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
                ),
                Span::styled("▏", Style::default().fg(theme.text_dim)),
            ]));
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), card_inner);

    if let Some(status) = &app.status_message {
        frame.render_widget(
            Paragraph::new(status.as_str()).style(Style::default().fg(theme.error)),
            chunks[2],
        );
    }

    let keys: &[(&str, &str)] = if extend_prompt {
        &[("Enter", "apply"), ("Esc", "cancel")]
    } else {
        &[("c", "complete"), ("s", "skip"), ("d", "defer"), ("e", "extend"), ("q", "quit")]
    };
    frame.render_widget(hints(keys, app), chunks[3]);
}

/// Terminal state: everything done.
fn draw_completed(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(50, 8, frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.success))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new("All tasks complete!")
            .style(Style::default().fg(theme.success).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        chunks[0],
    );

    frame.render_widget(
        hints(&[("n", "new schedule"), ("l", "log out"), ("q", "quit")], app),
        chunks[2],
    );
}

/// Single-line bordered input field.
fn input_field<'a>(label: &'a str, value: &'a str, focused: bool, app: &App) -> Paragraph<'a> {
    Paragraph::new(value.to_string())
        .style(Style::default().fg(app.theme.text))
        .block(bordered(label, focused, app))
}

fn bordered<'a>(label: &'a str, focused: bool, app: &App) -> Block<'a> {
    let border = if focused { app.theme.primary } else { app.theme.border };
    Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Key hint footer line.
fn hints(keys: &[(&str, &str)], app: &App) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ·  ", Style::default().fg(app.theme.text_dim)));
        }
        spans.push(Span::styled(
            (*key).to_string(),
            Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(app.theme.text_dim)));
    }
    Paragraph::new(Line::from(spans))
}

/// Center a fixed-size rect inside `area`, clamped to its bounds.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
