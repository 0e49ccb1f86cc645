use std::cmp::Ordering;

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::state::{Filter, SortOrder};
use crate::text_matcher::TextMatcher;
use crate::Task;

/// View parameters applied to the task collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Subset selector.
    pub filter: Filter,
    /// Case-insensitive substring; empty means no search.
    pub search: String,
    /// Ordering of the result.
    pub sort: SortOrder,
}

impl ViewQuery {
    /// Whether the query leaves every task visible.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.filter == Filter::All && self.search.is_empty()
    }
}

/// Counts shown in the footer, computed over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewStats {
    /// Tasks not yet completed.
    pub active: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Incomplete tasks past their due date.
    pub overdue: usize,
}

impl ViewStats {
    /// "N items left" with singular handling.
    #[must_use]
    pub fn items_left_label(&self) -> String {
        let plural = if self.active == 1 { "" } else { "s" };
        format!("{} item{plural} left", self.active)
    }

    /// Label of the overdue filter, carrying the count when non-zero.
    #[must_use]
    pub fn overdue_label(&self) -> String {
        if self.overdue > 0 {
            format!("Overdue ({})", self.overdue)
        } else {
            "Overdue".to_owned()
        }
    }

    /// Whether clearing completed tasks would remove anything.
    #[must_use]
    pub const fn has_completed(&self) -> bool {
        self.completed > 0
    }
}

/// Whether `task` is incomplete and due before the calendar day of `now`.
///
/// The day boundary is taken in `now`'s own offset, so callers choose the
/// timezone by choosing the offset of `now`. A task due today is not overdue.
#[must_use]
pub fn is_overdue(task: &Task, now: OffsetDateTime) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < now.date())
}

/// Derive the visible tasks: search, then filter, then a stable sort.
#[must_use]
pub fn project<'a>(tasks: &'a [Task], query: &ViewQuery, now: OffsetDateTime) -> Vec<&'a Task> {
    let matcher = TextMatcher::new(&query.search);
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
        .filter(|task| passes_filter(task, query.filter, now))
        .collect();
    visible.sort_by(|a, b| compare(a, b, query.sort));
    visible
}

fn passes_filter(task: &Task, filter: Filter, now: OffsetDateTime) -> bool {
    match filter {
        Filter::All => true,
        Filter::Active => !task.completed,
        Filter::Completed => task.completed,
        Filter::Overdue => is_overdue(task, now),
    }
}

fn compare(a: &Task, b: &Task, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Date => b.created_at.cmp(&a.created_at),
        SortOrder::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortOrder::DueDate => match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Aggregate counts over the full, unfiltered collection.
#[must_use]
pub fn stats(tasks: &[Task], now: OffsetDateTime) -> ViewStats {
    tasks.iter().fold(ViewStats::default(), |mut acc, task| {
        if task.completed {
            acc.completed += 1;
        } else {
            acc.active += 1;
        }
        if is_overdue(task, now) {
            acc.overdue += 1;
        }
        acc
    })
}

/// "Today", "Tomorrow", or a short `M/D/YYYY` date.
#[must_use]
pub fn format_relative_date(date: Date, now: OffsetDateTime) -> String {
    let today = now.date();
    if date == today {
        return "Today".to_owned();
    }
    if today.next_day() == Some(date) {
        return "Tomorrow".to_owned();
    }
    format!("{}/{}/{}", u8::from(date.month()), date.day(), date.year())
}
