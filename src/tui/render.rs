//! Wizard Rendering
//!
//! Render functions for the advisor steps and the GPA calculator.

use super::app::{App, GpaColumn, GpaFocus, UploadFocus};
use crate::wizard::{
    format_credits, format_gpa, format_score, option_label, RequirementField, Step, Tab,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tokio::time::Instant;

/// Main color palette
const BRAND_BLUE: Color = Color::Rgb(70, 130, 180);
const BRAND_GOLD: Color = Color::Rgb(218, 165, 32);
const ACCENT_GOLD: Color = Color::Rgb(184, 134, 11);

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the whole screen
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);

    let mut lines: Vec<Line<'static>> = Vec::new();
    match app.tab() {
        Tab::Advisor => render_advisor(&mut lines, app),
        Tab::Gpa => render_gpa(&mut lines, app),
    }

    let title = match app.tab() {
        Tab::Advisor => format!(
            " {} ({}/{}) ",
            app.step().title(),
            app.step().number(),
            Step::total()
        ),
        Tab::Gpa => " GPA Calculator ".to_string(),
    };
    let scroll = if app.tab() == Tab::Advisor && app.step() == Step::Recommendations {
        app.recommendation_scroll
    } else {
        0
    };

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_BLUE))
                .title(Span::styled(
                    title,
                    Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
                )),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, chunks[1]);

    f.render_widget(Paragraph::new(status_line(app)), chunks[2]);
    f.render_widget(Paragraph::new(footer_line(app)), chunks[3]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.tab() {
        Tab::Advisor => 0,
        Tab::Gpa => 1,
    };
    let tabs = Tabs::new(vec![Tab::Advisor.title(), Tab::Gpa.title()])
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_BLUE))
                .title(Span::styled(
                    " coursewise ",
                    Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

/// Status message while it is still visible, otherwise the loading spinner
fn status_line(app: &App) -> Line<'static> {
    if app.loading {
        let frame = SPINNER[(app.ticks as usize) % SPINNER.len()];
        return Line::from(Span::styled(
            format!(" {} Working...", frame),
            Style::default().fg(BRAND_GOLD),
        ));
    }

    match app.snapshot.status {
        Some(ref status) if status.is_visible(Instant::now()) => {
            let (marker, color) = if status.is_error() {
                ("!", Color::Red)
            } else {
                ("*", Color::Green)
            };
            Line::from(Span::styled(
                format!(" {} {}", marker, status.text),
                Style::default().fg(color),
            ))
        }
        _ => Line::from(""),
    }
}

fn hint(key: &str, label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            format!("[{}] ", key),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{}  ", label), Style::default().fg(Color::White)),
    ]
}

fn footer_line(app: &App) -> Line<'static> {
    let mut footer: Vec<Span<'static>> = vec![Span::raw(" ")];
    footer.extend(hint("Esc", "Quit", Color::Red));
    footer.extend(hint("F2", "Switch Tab", BRAND_BLUE));

    match app.tab() {
        Tab::Advisor => match app.step() {
            Step::Upload => {
                footer.extend(hint("Tab", "Next Field", BRAND_BLUE));
                footer.extend(hint("Enter", "Confirm", ACCENT_GOLD));
            }
            Step::Questions => {
                footer.extend(hint("Up/Down", "Question", BRAND_BLUE));
                footer.extend(hint("1-9 Left/Right", "Answer", BRAND_BLUE));
                footer.extend(hint("Enter", "Submit", ACCENT_GOLD));
            }
            Step::Requirements => {
                footer.extend(hint("Up/Down", "Field", BRAND_BLUE));
                footer.extend(hint("Enter", "Get Recommendations", ACCENT_GOLD));
            }
            Step::Recommendations => {
                footer.extend(hint("Up/Down", "Scroll", BRAND_BLUE));
                footer.extend(hint("Enter", "Start Over", ACCENT_GOLD));
            }
        },
        Tab::Gpa => {
            footer.extend(hint("Tab", "Column", BRAND_BLUE));
            footer.extend(hint("^N", "Add", BRAND_BLUE));
            footer.extend(hint("^D", "Remove", BRAND_BLUE));
            footer.extend(hint("Enter", "Calculate", ACCENT_GOLD));
        }
    }

    Line::from(footer)
}

/// Render progress dots (filled for completed, hollow for remaining)
fn render_progress_dots(step: Step) -> String {
    let current = step.number();
    (1..=Step::total())
        .map(|i| if i <= current { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn input_line(label: &str, value: &str, focused: bool, placeholder: &str) -> Line<'static> {
    let shown = if value.is_empty() && !focused {
        Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else {
        let cursor = if focused { "█" } else { "" };
        Span::styled(
            format!("{}{}", value, cursor),
            Style::default().fg(if focused { Color::White } else { Color::Gray }),
        )
    };

    Line::from(vec![
        Span::styled(
            format!("  {} {:<28}", if focused { ">" } else { " " }, label),
            Style::default().fg(if focused { BRAND_BLUE } else { Color::DarkGray }),
        ),
        shown,
    ])
}

fn render_advisor(lines: &mut Vec<Line<'static>>, app: &App) {
    let step = app.step();
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            render_progress_dots(step),
            Style::default().fg(BRAND_BLUE),
        ))
        .alignment(Alignment::Center),
    );
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            step.subtitle().to_string(),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center),
    );
    lines.push(Line::from(""));

    match step {
        Step::Upload => render_upload(lines, app),
        Step::Questions => render_questions(lines, app),
        Step::Requirements => render_requirements(lines, app),
        Step::Recommendations => render_recommendations(lines, app),
    }
}

// --- Individual step renderers ---

fn render_upload(lines: &mut Vec<Line<'static>>, app: &App) {
    let path_focused = app.upload_focus == UploadFocus::Path;
    lines.push(input_line(
        "Transcript PDF",
        &app.upload_path,
        path_focused,
        "type or paste a path to a .pdf",
    ));
    lines.push(Line::from(""));

    let sample_focused = app.upload_focus == UploadFocus::SampleData;
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {} ", if sample_focused { ">" } else { " " }),
            Style::default().fg(BRAND_GOLD),
        ),
        Span::styled(
            "[ Use sample data ]",
            Style::default()
                .fg(if sample_focused { Color::White } else { Color::DarkGray })
                .add_modifier(Modifier::BOLD),
        ),
    ]));
}

fn render_questions(lines: &mut Vec<Line<'static>>, app: &App) {
    let wizard = &app.snapshot.wizard;
    for (index, question) in wizard.questions.iter().enumerate() {
        let focused = index == app.question_cursor;
        lines.push(Line::from(Span::styled(
            format!(
                "  {} {}. {}",
                if focused { ">" } else { " " },
                index + 1,
                question.question
            ),
            Style::default()
                .fg(if focused { Color::White } else { Color::Gray })
                .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() }),
        )));

        let selected = wizard.selected_option(question.id);
        let mut options: Vec<Span<'static>> = vec![Span::raw("       ")];
        for (n, option) in question.options.iter().enumerate() {
            let chosen = selected == Some(option.as_str());
            options.push(Span::styled(
                format!(
                    "{} {} {}   ",
                    if chosen { "◉" } else { "○" },
                    n + 1,
                    option_label(option)
                ),
                Style::default().fg(if chosen { BRAND_GOLD } else { Color::DarkGray }),
            ));
        }
        lines.push(Line::from(options));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {}/{} answered",
            wizard.answers.len(),
            wizard.questions.len()
        ),
        Style::default().fg(Color::DarkGray),
    )));
}

fn render_requirements(lines: &mut Vec<Line<'static>>, app: &App) {
    let form = &app.snapshot.wizard.requirements_form;
    let focused_field = app.focused_requirement();

    for field in RequirementField::ALL {
        let placeholder = format!("default {}", field.default_value());
        lines.push(input_line(
            field.label(),
            form.get(field),
            field == focused_field,
            &placeholder,
        ));
        if field == RequirementField::CompletedCredits {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "    Required credits by category",
                Style::default().fg(BRAND_GOLD),
            )));
        }
    }

    let scores = &app.snapshot.wizard.interest_scores;
    if !scores.is_empty() {
        lines.push(Line::from(""));
        let summary = scores
            .iter()
            .map(|(category, score)| format!("{} {}", category, format_score(*score)))
            .collect::<Vec<_>>()
            .join("  ·  ");
        lines.push(Line::from(Span::styled(
            format!("    Interests: {}", summary),
            Style::default().fg(Color::DarkGray),
        )));
    }
}

fn render_recommendations(lines: &mut Vec<Line<'static>>, app: &App) {
    let wizard = &app.snapshot.wizard;
    if wizard.recommendations.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No recommendations for these requirements.",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }

    for (rank, rec) in wizard.ranked_recommendations() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  #{} ", rank),
                Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                rec.name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", rec.code),
                Style::default().fg(BRAND_BLUE),
            ),
            Span::styled(
                format!("   Score: {}", format_score(rec.score)),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]));

        if let Some(description) = rec.description() {
            lines.push(Line::from(Span::styled(
                format!("      {}", description),
                Style::default().fg(Color::Gray),
            )));
        }

        for (n, reason) in rec.reasons.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("      {}. {}", n + 1, reason),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }
}

/// Truncate or pad `text` to exactly `width` display columns
fn fit_width(text: &str, width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(out.width())));
    out
}

fn render_gpa(lines: &mut Vec<Line<'static>>, app: &App) {
    let gpa = &app.snapshot.gpa;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("    {:<30} {:<8} {}", "Course", "Grade", "Credits"),
        Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
    )));

    for (index, entry) in gpa.rows().iter().enumerate() {
        let focus_column = match app.gpa_focus {
            GpaFocus::Row { row, column } if row == index => Some(column),
            _ => None,
        };
        let cell = |column: GpaColumn, text: String, width: usize| {
            let focused = focus_column == Some(column);
            let text = if focused { format!("{}█", text) } else { text };
            Span::styled(
                format!("{} ", fit_width(&text, width)),
                Style::default().fg(if focused { Color::White } else { Color::Gray }),
            )
        };

        let name = if entry.course_name.is_empty() && focus_column != Some(GpaColumn::CourseName) {
            format!("Course {}", index + 1)
        } else {
            entry.course_name.clone()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", if focus_column.is_some() { ">" } else { " " }),
                Style::default().fg(BRAND_BLUE),
            ),
            cell(GpaColumn::CourseName, name, 30),
            cell(GpaColumn::Grade, format!("‹{}›", entry.grade), 8),
            cell(GpaColumn::Credits, entry.credits.clone(), 8),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(input_line(
        "Current GPA (optional)",
        &gpa.current_gpa,
        app.gpa_focus == GpaFocus::CurrentGpa,
        "0",
    ));
    lines.push(input_line(
        "Credits completed (optional)",
        &gpa.current_credits,
        app.gpa_focus == GpaFocus::CurrentCredits,
        "0",
    ));

    if let Some(ref result) = gpa.result {
        lines.push(Line::from(""));
        for (label, value) in [
            ("Semester GPA", format_gpa(result.semester())),
            ("Cumulative GPA", format_gpa(result.cumulative())),
            ("Total credits", format_credits(result.total_credits)),
        ] {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {:<28}", label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    value,
                    Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GpaResult, Recommendation};
    use crate::wizard::{Snapshot, StatusKind, StatusMessage};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();

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

    #[test]
    fn test_fit_width_counts_display_columns() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdef", 4), "abcd");
        // wide glyphs take two columns each
        assert_eq!(fit_width("数学分析", 5), "数学 ");
    }

    #[test]
    fn test_progress_dots() {
        assert_eq!(render_progress_dots(Step::Questions), "● ● ○ ○");
    }

    #[test]
    fn test_recommendations_show_rank_and_score() {
        let mut snapshot = Snapshot::default();
        snapshot.wizard.current_step = Step::Recommendations;
        snapshot.wizard.recommendations = vec![
            Recommendation {
                name: "Calculus I".to_string(),
                code: "MATH101".to_string(),
                score: 45.0,
                description: Some(String::new()),
                reasons: vec!["Strong interest in Mathematics".to_string()],
                credits: None,
            },
            Recommendation {
                name: "Data Structures".to_string(),
                code: "CS201".to_string(),
                score: 87.46,
                description: Some("Lists, trees and graphs".to_string()),
                reasons: Vec::new(),
                credits: None,
            },
        ];

        let screen = draw(&App::new(snapshot));
        assert!(screen.contains("#1 Calculus I"));
        assert!(screen.contains("Score: 45.0"));
        assert!(screen.contains("#2 Data Structures"));
        assert!(screen.contains("Score: 87.5"));
        assert!(screen.contains("1. Strong interest in Mathematics"));
        assert!(screen.contains("Lists, trees and graphs"));
    }

    #[test]
    fn test_gpa_result_two_decimals() {
        let mut snapshot = Snapshot::default();
        snapshot.tab = Tab::Gpa;
        snapshot.gpa.result = Some(GpaResult {
            semester_gpa: Some(3.5),
            cumulative_gpa: Some(3.456),
            gpa: None,
            total_credits: 51.0,
        });

        let screen = draw(&App::new(snapshot));
        assert!(screen.contains("3.50"));
        assert!(screen.contains("3.46"));
        assert!(screen.contains("51"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_hidden_once_expired() {
        let mut snapshot = Snapshot::default();
        snapshot.status = Some(StatusMessage {
            text: "Loaded 12 sample courses!".to_string(),
            kind: StatusKind::Success,
            expires_at: Instant::now() + Duration::from_secs(5),
        });
        let app = App::new(snapshot);
        assert!(draw(&app).contains("Loaded 12 sample courses!"));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(!draw(&app).contains("Loaded 12 sample courses!"));
    }

    #[test]
    fn test_loading_spinner() {
        let mut app = App::new(Snapshot::default());
        app.loading = true;
        assert!(draw(&app).contains("Working..."));
    }
}
