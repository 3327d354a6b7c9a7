//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a two-row split: the job list (or the detail pane) on
//!   top and a one-line status bar at the bottom.
//! * A job card is a multi-line [`ListItem`]: title and date, a two-line
//!   description preview, then tags and salary.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::api::JobRecord;
use crate::app::{App, Detail, View};
use crate::format::{capitalize, format_date, format_salary, tag_color};
use crate::markdown;

/// Preview lines shown per card.
const PREVIEW_LINES: usize = 2;
const HIGHLIGHT_SYMBOL: &str = "▸ ";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match &app.view {
        View::List => draw_job_list(app, frame, main_area),
        View::Detail(detail) => draw_detail(detail, app.detail_scroll, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable list of job cards.
fn draw_job_list(app: &mut App, frame: &mut Frame, area: Rect) {
    // Borders plus the highlight gutter.
    let text_width = (area.width as usize).saturating_sub(2 + HIGHLIGHT_SYMBOL.chars().count());

    let state = app.loader.state();
    let title = format!(" Latest Jobs ({}/{}) ", state.jobs().len(), state.pagination().total);

    let cards: Vec<ListItem> = state
        .jobs()
        .iter()
        .zip(&app.previews)
        .map(|(job, preview)| job_card(job, preview, text_width))
        .collect();
    let list = List::new(cards)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(HIGHLIGHT_SYMBOL);

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn job_card<'a>(job: &'a JobRecord, preview: &str, width: usize) -> ListItem<'a> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:<14}", format_date(&job.created_at)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(job.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(capitalize(&job.company), Style::default().fg(Color::Gray)),
    ])];

    lines.extend(
        clamp_lines(preview, width, PREVIEW_LINES)
            .into_iter()
            .map(|l| Line::styled(l, Style::default().fg(Color::Gray))),
    );

    let mut badges = Vec::new();
    if let Some(primary) = job.primary_tag() {
        badges.push(Span::styled(
            format!(" {primary} "),
            Style::default()
                .fg(tag_color(primary))
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
        ));
        badges.push(Span::raw(" "));
    }
    badges.extend(tag_spans(job.tags.get(1..).unwrap_or_default(), str::to_string));
    if job.has_salary() {
        badges.push(Span::styled(
            format_salary(job.salary_min, job.salary_max, &job.salary_currency),
            Style::default().fg(Color::Magenta),
        ));
    }
    lines.push(Line::from(badges));
    lines.push(Line::default());

    ListItem::new(lines)
}

/// One colored span per tag, space separated.  The color always comes from
/// the raw tag so it matches across views, whatever `label` does to the text.
fn tag_spans(tags: &[String], label: impl Fn(&str) -> String) -> Vec<Span<'static>> {
    tags.iter()
        .flat_map(|tag| {
            [
                Span::styled(format!(" {} ", label(tag)), Style::default().fg(tag_color(tag))),
                Span::raw(" "),
            ]
        })
        .collect()
}

/// Word-wrap `text` to `width` columns and keep at most `max_lines`,
/// ending the last kept line with `…` when text was cut.  Words wider than
/// a line are split.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let pieces = text.split_whitespace().flat_map(|word| {
        let chars: Vec<char> = word.chars().collect();
        chars
            .chunks(width)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut truncated = false;

    for piece in pieces {
        let len = piece.chars().count();
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
            if lines.len() == max_lines {
                truncated = true;
                break;
            }
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&piece);
        current_len += len;
    }
    if current_len > 0 {
        lines.push(current);
    }

    if truncated {
        if let Some(last) = lines.last_mut() {
            let keep = width.saturating_sub(1).min(last.chars().count());
            *last = last.chars().take(keep).collect::<String>() + "…";
        }
    }
    lines
}

/// Render the detail pane for one job.
fn draw_detail(detail: &Detail, scroll: u16, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Job ").borders(Borders::ALL);

    let lines = match detail {
        Detail::Loading(_) => vec![Line::styled("Loading…", Style::default().fg(Color::Yellow))],
        Detail::NotFound(id) => vec![
            Line::styled("Job not found", Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(format!("No job with id {id}."), Style::default().fg(Color::DarkGray)),
        ],
        Detail::Loaded(job) => detail_lines(job),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Header, rendered description, skills, tags and source link of a job.
pub fn detail_lines(job: &JobRecord) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::styled(
            job.title.to_uppercase(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(capitalize(&job.company), Style::default().fg(Color::Gray)),
        Line::styled(format!("Posted on {}", format_date(&job.created_at)), dim),
        Line::default(),
    ];

    let mut facts = vec![
        Span::styled(format!(" {} ", capitalize(&job.job_type)), Style::default().fg(Color::Blue)),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", capitalize(&job.location_type)),
            Style::default().fg(Color::Green),
        ),
    ];
    if job.has_salary() {
        facts.push(Span::raw(" "));
        facts.push(Span::styled(
            format!(" {} ", format_salary(job.salary_min, job.salary_max, &job.salary_currency)),
            Style::default().fg(Color::Magenta),
        ));
    }
    if !job.location.is_empty() && job.location != "not specified" {
        facts.push(Span::raw(" "));
        facts.push(Span::raw(format!("📍 {}", capitalize(&job.location))));
    }
    lines.push(Line::from(facts));
    lines.push(Line::default());

    lines.extend(markdown::to_lines(&job.job_markdown));

    if !job.skills.is_empty() {
        lines.push(Line::default());
        let mut spans = vec![Span::styled("Skills  ", dim)];
        for skill in &job.skills {
            spans.push(Span::styled(format!(" {} ", capitalize(skill)), Style::default().fg(Color::Blue)));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    if !job.tags.is_empty() {
        lines.push(Line::default());
        let mut spans = vec![Span::styled("Tags    ", dim)];
        spans.extend(tag_spans(&job.tags, capitalize));
        lines.push(Line::from(spans));
    }

    if !job.post_url.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Source  ", dim),
            Span::styled(
                job.post_url.clone(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    lines
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.loader.state();

    let feed = if state.is_loading() {
        Span::styled("⟳ loading", Style::default().fg(Color::Cyan))
    } else if state.has_failed() {
        Span::styled("fetch failed, r: retry", Style::default().fg(Color::Red))
    } else if state.is_terminal() {
        Span::styled(
            format!("All {} jobs loaded", state.jobs().len()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled(
            format!("{} jobs", state.jobs().len()),
            Style::default().fg(Color::Green),
        )
    };

    let help = match app.view {
        View::List => "  q: quit  ↑/↓: scroll  Enter: open  n: more",
        View::Detail(_) => "  Esc: back  ↑/↓: scroll  q: quit",
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        feed,
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}
