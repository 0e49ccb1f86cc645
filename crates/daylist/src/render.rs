//! Terminal and JSON rendering of projected views.

use std::io::{self, Write};

use daylist_core::{SortOrder, Task, ViewQuery, ViewStats, format_relative_date, is_overdue};
use serde::Serialize;
use time::OffsetDateTime;

/// One rendered task in `--json` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRow<'a> {
    #[serde(flatten)]
    task: &'a Task,
    overdue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_label: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    tasks: Vec<TaskRow<'a>>,
    stats: ViewStats,
}

/// Escape control characters so task text cannot rewrite the terminal.
pub fn display_text(text: &str) -> String {
    text.chars().fold(String::with_capacity(text.len()), |mut out, ch| {
        if ch.is_control() {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
        out
    })
}

/// Single list line: checkbox, id, priority, text, and due marker.
pub fn task_line(task: &Task, now: OffsetDateTime) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let due = task.due_date.map_or_else(String::new, |due| {
        let label = format_relative_date(due, now);
        if is_overdue(task, now) {
            format!("  (overdue: {label})")
        } else {
            format!("  (due {label})")
        }
    });
    format!(
        "{mark} {id:>13}  {priority:<6}  {text}{due}",
        id = task.id,
        priority = task.priority.as_str(),
        text = display_text(&task.text),
    )
}

/// Footer line summarizing the whole collection.
pub fn footer(stats: &ViewStats, sort: SortOrder) -> String {
    let mut parts = vec![stats.items_left_label(), stats.overdue_label()];
    if stats.has_completed() {
        parts.push(format!("{} completed", stats.completed));
    }
    parts.push(format!("sort: {}", sort.label()));
    parts.join(" · ")
}

/// Print the visible tasks followed by the footer, or an empty-state line.
pub fn list(
    out: &mut impl Write,
    visible: &[&Task],
    query: &ViewQuery,
    stats: &ViewStats,
    now: OffsetDateTime,
) -> io::Result<()> {
    if visible.is_empty() {
        if query.is_unfiltered() {
            writeln!(out, "No tasks yet")?;
        } else {
            writeln!(out, "No tasks matched the current view")?;
        }
    } else {
        for task in visible {
            writeln!(out, "{}", task_line(task, now))?;
        }
    }
    writeln!(out, "{}", footer(stats, query.sort))
}

/// Print the visible tasks and stats as pretty JSON.
pub fn list_json(
    out: &mut impl Write,
    visible: &[&Task],
    stats: ViewStats,
    now: OffsetDateTime,
) -> io::Result<()> {
    let output = ListOutput {
        tasks: visible
            .iter()
            .map(|&task| TaskRow {
                task,
                overdue: is_overdue(task, now),
                due_label: task.due_date.map(|due| format_relative_date(due, now)),
            })
            .collect(),
        stats,
    };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)
}
