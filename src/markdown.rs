//! Markdown handling for job descriptions.
//!
//! Two consumers need the markdown in different shapes:
//!
//! * job cards want a short plain-text preview: [`summarize`] and
//!   [`preview_text`];
//! * the detail view wants styled terminal lines: [`to_lines`].
//!
//! Neither path can fail.  pulldown-cmark accepts any input, so malformed
//! markdown simply degrades to its literal text.

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use scraper::Html;

use crate::api::JobRecord;

/// GitHub-flavored extensions, so tables, strikethrough and task lists are
/// parsed as markup instead of leaking into the text.
const MARKDOWN_OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS);

/// Flatten markdown into one line of plain text.
///
/// The markdown is rendered to HTML, the HTML is parsed and only its text
/// nodes are kept (which also decodes entities such as `&amp;`), then every
/// run of whitespace becomes a single space.  No truncation happens here.
pub fn summarize(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    let events = Parser::new_ext(markdown, MARKDOWN_OPTIONS).flat_map(|event| {
        // Table cells render back to back with nothing between them.
        let gap = matches!(event, Event::End(Tag::TableCell)).then(|| Event::Text(" ".into()));
        std::iter::once(event).chain(gap)
    });
    html::push_html(&mut rendered, events);

    let fragment = Html::parse_fragment(&rendered);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

/// The text a job card previews: the backend's plain-text field when it
/// has one, otherwise the summarized markdown.
pub fn preview_text(job: &JobRecord) -> String {
    match job.job_plain_text.as_deref().map(collapse_whitespace) {
        Some(text) if !text.is_empty() => text,
        _ => summarize(&job.job_markdown),
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Styled rendering for the detail view
// ---------------------------------------------------------------------------

/// Render markdown as terminal lines: bold headings, bulleted or numbered
/// list items, dimmed code blocks, blank lines between blocks.
pub fn to_lines(markdown: &str) -> Vec<Line<'static>> {
    let mut out = LineBuilder::default();
    // Next number for each open list; `None` for bullet lists.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;
    let mut link_target: Option<String> = None;

    for event in Parser::new_ext(markdown, MARKDOWN_OPTIONS) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading(level, ..) => {
                    out.flush();
                    let mut style = Style::default().add_modifier(Modifier::BOLD);
                    if level == HeadingLevel::H1 {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    out.push_style(style);
                }
                Tag::List(start) => {
                    out.flush();
                    lists.push(start);
                }
                Tag::Item => {
                    out.flush();
                    let depth = lists.len().saturating_sub(1);
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{n}. ");
                            *n += 1;
                            marker
                        }
                        _ => "• ".to_string(),
                    };
                    out.raw(format!("{}{marker}", "  ".repeat(depth)));
                }
                Tag::CodeBlock(_) => {
                    out.flush();
                    in_code_block = true;
                }
                Tag::BlockQuote => {
                    out.flush();
                    out.push_style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
                }
                Tag::Table(_) | Tag::TableRow => out.flush(),
                Tag::TableHead => {
                    out.flush();
                    out.push_modifier(Modifier::BOLD);
                }
                Tag::TableCell => {
                    if !out.current.is_empty() {
                        out.styled(" │ ".to_string(), Style::default().fg(Color::DarkGray));
                    }
                }
                Tag::Emphasis => out.push_modifier(Modifier::ITALIC),
                Tag::Strong => out.push_modifier(Modifier::BOLD),
                Tag::Strikethrough => out.push_modifier(Modifier::CROSSED_OUT),
                Tag::Link(_, url, _) => {
                    out.push_style(Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED));
                    link_target = Some(url.into_string());
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                Tag::Heading(..) | Tag::BlockQuote => {
                    out.pop_style();
                    out.flush();
                    out.blank();
                }
                Tag::Paragraph => {
                    out.flush();
                    // Tight list items wrap their text in paragraphs too.
                    if lists.is_empty() {
                        out.blank();
                    }
                }
                Tag::Item | Tag::TableRow => out.flush(),
                Tag::TableHead => {
                    out.pop_style();
                    out.flush();
                }
                Tag::Table(_) => out.blank(),
                Tag::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        out.blank();
                    }
                }
                Tag::CodeBlock(_) => {
                    in_code_block = false;
                    out.blank();
                }
                Tag::Emphasis | Tag::Strong | Tag::Strikethrough => out.pop_style(),
                Tag::Link(..) => {
                    out.pop_style();
                    if let Some(url) = link_target.take() {
                        out.styled(format!(" ({url})"), Style::default().fg(Color::DarkGray));
                    }
                }
                _ => {}
            },
            Event::Text(text) if in_code_block => {
                for line in text.lines() {
                    out.styled(format!("    {line}"), Style::default().fg(Color::DarkGray));
                    out.flush();
                }
            }
            Event::Text(text) => out.text(text.into_string()),
            Event::Code(code) => out.styled(code.into_string(), Style::default().fg(Color::Yellow)),
            Event::SoftBreak => out.text(" ".to_string()),
            Event::HardBreak => out.flush(),
            Event::Rule => {
                out.flush();
                out.styled("─".repeat(40), Style::default().fg(Color::DarkGray));
                out.flush();
                out.blank();
            }
            Event::TaskListMarker(done) => out.raw(if done { "[x] " } else { "[ ] " }.to_string()),
            // Raw HTML is dropped, matching what the preview shows.
            _ => {}
        }
    }

    out.finish()
}

/// Accumulates spans into lines while tracking nested inline styles.
#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
}

impl LineBuilder {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.style().patch(style);
        self.styles.push(merged);
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        self.push_style(Style::default().add_modifier(modifier));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn text(&mut self, text: String) {
        let style = self.style();
        self.current.push(Span::styled(text, style));
    }

    fn styled(&mut self, text: String, style: Style) {
        self.current.push(Span::styled(text, style));
    }

    fn raw(&mut self, text: String) {
        self.current.push(Span::raw(text));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    /// One empty separator line; never two in a row, never at the top.
    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
