use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Input / status
            Constraint::Length(1), // Footer
        ])
        .split(size);

    let header = Paragraph::new(format!(
        "TASKDECK ({} open)",
        app.store.incomplete_count()
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    draw_task_table(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);
    draw_input_bar(f, app, main_chunks[2]);

    let footer = Paragraph::new(
        "a: add | e: edit | d: delete | space: toggle | /: search | s: sort | n/p: page | c: clear done | t: toggle all | q: quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_task_table(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .store
        .paginated_tasks()
        .iter()
        .map(|task| {
            let status_icon = if task.completed { "✔" } else { "☐" };
            let text_style = if task.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Row::new(vec![
                Span::raw(status_icon),
                Span::raw(task.due_date.clone()),
                Span::styled(task.text.clone(), text_style),
            ])
        })
        .collect();

    let title = format!(
        " Tasks (page {}/{}, sort: {}) ",
        app.store.current_page(),
        app.store.total_pages().max(1),
        app.sort_mode.label()
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(12), // Due
            Constraint::Min(10),    // Text
        ],
    )
    .header(Row::new(vec!["St", "Due", "Task"]).style(Style::default().fg(Color::Yellow)))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let selected = app
        .state
        .selected()
        .and_then(|i| app.store.paginated_tasks().get(i).cloned().cloned());

    if let Some(task) = selected {
        let mut detail_text = vec![
            Line::from(vec![
                Span::styled("Task: ", Style::default().fg(Color::Blue)),
                Span::styled(task.text.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
                Span::raw(task.id.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Due: ", Style::default().fg(Color::Blue)),
                Span::raw(task.due_date.clone()),
            ]),
            Line::from(vec![
                Span::styled("Completed: ", Style::default().fg(Color::Blue)),
                Span::raw(if task.completed { "yes" } else { "no" }),
            ]),
            Line::from(""),
        ];

        if !task.description.is_empty() {
            detail_text.push(Line::from(Span::styled(
                "Description:",
                Style::default().fg(Color::Blue),
            )));
            detail_text.push(Line::from(task.description.clone()));
        }

        let detail_block = Paragraph::new(detail_text)
            .block(
                Block::default()
                    .title(" Detail ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(detail_block, area);
    } else {
        let detail_block = Block::default()
            .title(" Detail ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        f.render_widget(detail_block, area);
    }
}

fn draw_input_bar(f: &mut Frame, app: &App, area: Rect) {
    // A rejected submit stays in its input mode; the validation
    // message takes over the box title so the draft stays editable
    let input_title = |normal: &str| -> String {
        match &app.status {
            Some(message) => format!(" {message} "),
            None => normal.to_string(),
        }
    };

    let (title, content, style) = match app.input_mode {
        InputMode::Adding => (
            input_title(" Add task (text, optional due:YYYY-MM-DD) "),
            app.input.as_str(),
            Style::default().fg(Color::Green),
        ),
        InputMode::Editing => (
            input_title(" Edit task (text, optional due:YYYY-MM-DD) "),
            app.input.as_str(),
            Style::default().fg(Color::Green),
        ),
        InputMode::Searching => (
            " Search ".to_string(),
            app.input.as_str(),
            Style::default().fg(Color::Green),
        ),
        InputMode::Normal => match &app.status {
            Some(message) => (
                " Status ".to_string(),
                message.as_str(),
                Style::default().fg(Color::Red),
            ),
            None => (
                " Status ".to_string(),
                "Ready",
                Style::default().fg(Color::DarkGray),
            ),
        },
    };

    let input = Paragraph::new(content).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(input, area);

    if !matches!(app.input_mode, InputMode::Normal) {
        // Put the terminal cursor where the next character lands
        f.set_cursor_position((
            area.x + 1 + app.cursor_position as u16,
            area.y + 1,
        ));
    }
}
