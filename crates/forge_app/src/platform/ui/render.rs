use std::fmt::{Display, Write as _};

use chrono::{Local, TimeZone};
use colored::Colorize;
use forge_core::{AppViewModel, FeedbackStatus, HistoryRowView, ResultView, FRAMEWORKS};

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Full-screen text for the current view.
pub fn render(view: &AppViewModel) -> String {
    render_in(view, &Local)
}

pub fn render_in<Tz>(view: &AppViewModel, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", "XPath Forge".bold().cyan());
    let _ = writeln!(out, "{RULE}");

    render_history(&mut out, &view.history, tz);
    render_form(&mut out, view);

    if let Some(error) = &view.error {
        let _ = writeln!(out, "{} {}", "Error:".red().bold(), error.red());
    }

    for (position, result) in view.results.iter().enumerate() {
        render_result(&mut out, position + 1, result);
    }

    if !view.results.is_empty() {
        render_feedback(&mut out, view);
    }

    if let Some(question) = &view.confirmation {
        let _ = writeln!(out, "{} {}", question.yellow().bold(), "(y/n)".dimmed());
    }
    out
}

fn render_history<Tz>(out: &mut String, rows: &[HistoryRowView], tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", "Recent tasks".bold());
    for (position, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {} {}  {}  {}",
            format!("[{}]", position + 1).dimmed(),
            format_timestamp_in(row.timestamp, tz).dimmed(),
            row.hostname.blue(),
            first_line(&row.requirement)
        );
    }
    let _ = writeln!(out, "  {}", "use <n> to reuse, clear-history to forget".dimmed());
    let _ = writeln!(out, "{RULE}");
}

fn render_form(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(out, "{} {}", "URL:".bold(), placeholder(&view.url));
    let _ = writeln!(out, "{}", "Requirement:".bold());
    if view.requirement.trim().is_empty() {
        let _ = writeln!(out, "  {}", "<empty>".dimmed());
    } else {
        for line in view.requirement.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    let templates: Vec<String> = FRAMEWORKS
        .iter()
        .map(|framework| format!("{} ({})", framework.id, framework.name))
        .collect();
    let _ = writeln!(out, "{} {}", "Templates:".dimmed(), templates.join(", ").dimmed());

    if view.show_advanced {
        let _ = writeln!(out, "{}", "HTML context:".bold());
        if view.html_context.trim().is_empty() {
            let _ = writeln!(out, "  {}", "<empty>".dimmed());
        } else {
            for line in view.html_context.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
    }

    let label = if view.submit_enabled {
        view.submit_label.green().bold()
    } else {
        view.submit_label.dimmed()
    };
    let _ = writeln!(out, "[{label}]");
    let _ = writeln!(out, "{RULE}");
}

fn render_result(out: &mut String, position: usize, result: &ResultView) {
    let mut header = format!("[{position}] {}", result.label).bold().to_string();
    if let Some(note) = result.note {
        let _ = write!(header, "  {}", note.green());
    }
    if result.copied {
        let _ = write!(header, "  {}", "Copied".green().bold());
    }
    let _ = writeln!(out, "{header}");

    if !result.explanation.trim().is_empty() {
        let _ = writeln!(out, "{}", result.explanation);
    }
    if result.libraries.is_empty() {
        let _ = writeln!(out, "{}", "No extra libraries required".dimmed());
    } else {
        for library in &result.libraries {
            let _ = writeln!(out, "  {}", format!("pip install {library}").yellow());
        }
    }

    let _ = writeln!(out, "{}", "── scraper.py ──".dimmed());
    for line in result.code.lines() {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "{RULE}");
}

fn render_feedback(out: &mut String, view: &AppViewModel) {
    match view.feedback {
        FeedbackStatus::None => {
            let _ = writeln!(
                out,
                "{}",
                "Does the latest version work? ok | wrong".dimmed()
            );
        }
        FeedbackStatus::Success => {
            let _ = writeln!(out, "{}", "Great, glad it works.".green());
        }
        FeedbackStatus::Fixing => {
            let _ = writeln!(out, "{}", "What went wrong?".bold());
            if view.user_feedback.trim().is_empty() {
                let _ = writeln!(out, "  {}", "<describe the problem with: feedback>".dimmed());
            } else {
                for line in view.user_feedback.lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
            let action = if view.regenerate_enabled {
                "regen".green().bold()
            } else {
                "regen".dimmed()
            };
            let _ = writeln!(out, "[{action}]  {}", "cancel".dimmed());
        }
    }
}

/// Short local-time stamp for history rows.
pub fn format_timestamp_in<Tz>(ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(ms)
        .single()
        .map(|time| time.format("%b %-d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn placeholder(text: &str) -> String {
    if text.trim().is_empty() {
        "<empty>".dimmed().to_string()
    } else {
        text.to_string()
    }
}

fn first_line(text: &str) -> &str {
    text.lines().find(|line| !line.trim().is_empty()).unwrap_or("")
}
