//! Welcome tasks written on first start.

use daylist_core::{Priority, Task, TaskId};
use time::{Duration, OffsetDateTime};

/// The four onboarding tasks, all created at `now`.
#[must_use]
pub fn sample_tasks(now: OffsetDateTime) -> Vec<Task> {
    let sample = |id: u64, text: &str, completed: bool, priority: Priority| Task {
        id: TaskId(id),
        text: text.to_owned(),
        completed,
        priority,
        due_date: None,
        created_at: now,
    };
    vec![
        sample(1, "Welcome to your enhanced Todo List!", false, Priority::High),
        sample(2, "Click the checkbox to mark as complete", true, Priority::Medium),
        sample(3, "Use the filters to view different todo states", false, Priority::Low),
        Task {
            due_date: Some((now + Duration::weeks(1)).date()),
            ..sample(4, "Try sorting by due date to see what is coming up", false, Priority::Medium)
        },
    ]
}
