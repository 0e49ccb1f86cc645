use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use anyhow::{Context, Result};
use daylist_app::{AppConfig, KeyValueStore, StoreChange, TaskStore};
use daylist_core::{SortOrder, TaskId};
use tracing::debug;

use crate::Command;
use crate::render;

/// `--sort` value meaning "advance one step from the configured order".
pub const NEXT_SORT: &str = "next";

pub fn run<S: KeyValueStore>(
    command: Command,
    store: &mut TaskStore<S>,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    let changed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&changed);
    store.subscribe(move |change| {
        debug!(?change, "Store changed");
        if *change != StoreChange::ViewChanged {
            flag.set(true);
        }
    });

    let now = config.view.clock.now();
    match command {
        Command::Add { text, priority, due } => {
            let priority = priority.unwrap_or(config.tasks.default_priority);
            let task = store.add_with_due_input(&text.join(" "), priority, &due)?;
            writeln!(out, "added: {}", render::task_line(&task, now))?;
        }
        Command::Toggle { id } => {
            let id = parse_task_id(&id)?;
            store.toggle_complete(id)?;
            match store.get(id) {
                Some(task) => writeln!(out, "toggled: {}", render::task_line(task, now))?,
                None => writeln!(out, "no task with id {id}")?,
            }
        }
        Command::Rm { id } => {
            let id = parse_task_id(&id)?;
            if store.delete(id)? {
                writeln!(out, "deleted: {id}")?;
            } else {
                writeln!(out, "no task with id {id}")?;
            }
        }
        Command::ClearCompleted => {
            let removed = store.clear_completed()?;
            let plural = if removed == 1 { "" } else { "s" };
            writeln!(out, "cleared {removed} completed task{plural}")?;
        }
        Command::Ls {
            filter,
            search,
            sort,
            json,
        } => {
            if let Some(filter) = filter {
                store.set_filter(filter);
            }
            store.set_search_query(search);
            if let Some(sort) = sort {
                apply_sort(store, &sort)?;
            }

            let visible = store.visible(now);
            let stats = store.stats(now);
            if json {
                render::list_json(out, &visible, stats, now)?;
            } else {
                render::list(out, &visible, store.query(), &stats, now)?;
            }
        }
        Command::Stats { json } => {
            let stats = store.stats(now);
            if json {
                serde_json::to_writer_pretty(&mut *out, &stats)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", render::footer(&stats, store.query().sort))?;
            }
        }
    }

    if changed.get() {
        writeln!(out, "{}", render::footer(&store.stats(now), store.query().sort))?;
    }
    Ok(())
}

fn apply_sort<S>(store: &mut TaskStore<S>, raw: &str) -> Result<()> {
    if raw == NEXT_SORT {
        store.cycle_sort_order();
        return Ok(());
    }
    let order: SortOrder = raw.parse()?;
    store.set_sort_order(order);
    Ok(())
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    raw.parse()
        .with_context(|| format!("invalid task id: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylist_app::{ClockPolicy, MemoryStore};
    use daylist_core::{Filter, Priority};

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.view.clock = ClockPolicy::Utc;
        config.tasks.default_priority = Priority::Low;
        config
    }

    fn exec(store: &mut TaskStore<&MemoryStore>, command: Command) -> String {
        let mut buf = Vec::new();
        run(command, store, &config(), &mut buf).unwrap_or_else(|err| panic!("command failed: {err}"));
        String::from_utf8(buf).unwrap_or_else(|err| panic!("utf8: {err}"))
    }

    fn add(text: &str, priority: Option<Priority>) -> Command {
        Command::Add {
            text: text.split(' ').map(str::to_owned).collect(),
            priority,
            due: String::new(),
        }
    }

    fn ls(filter: Option<Filter>, search: &str, sort: Option<&str>) -> Command {
        Command::Ls {
            filter,
            search: search.to_owned(),
            sort: sort.map(str::to_owned),
            json: false,
        }
    }

    fn open(storage: &MemoryStore) -> TaskStore<&MemoryStore> {
        TaskStore::load(storage).unwrap_or_else(|err| panic!("load: {err}"))
    }

    #[test]
    fn add_uses_configured_default_priority_and_prints_footer() {
        let storage = MemoryStore::new();
        let mut store = open(&storage);
        let out = exec(&mut store, add("water the plants", None));

        assert!(out.starts_with("added: [ ] "));
        assert!(out.contains("low     water the plants"));
        assert!(out.ends_with("1 item left · Overdue · sort: Date\n"));
        assert_eq!(store.all()[0].priority, Priority::Low);
    }

    #[test]
    fn blank_add_is_an_error_and_writes_nothing() {
        let storage = MemoryStore::new();
        let mut store = open(&storage);
        let mut buf = Vec::new();
        let result = run(add(" ", None), &mut store, &config(), &mut buf);

        let Err(err) = result else {
            panic!("blank text must be rejected");
        };
        assert_eq!(err.to_string(), "task text must not be empty");
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn toggle_and_rm_report_unknown_ids() {
        let storage = MemoryStore::new();
        let mut store = open(&storage);
        let toggled = exec(&mut store, Command::Toggle { id: "12".into() });
        assert_eq!(toggled, "no task with id 12\n");
        let removed = exec(&mut store, Command::Rm { id: "12".into() });
        assert_eq!(removed, "no task with id 12\n");

        let mut buf = Vec::new();
        let result = run(Command::Rm { id: "twelve".into() }, &mut store, &config(), &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn ls_applies_filter_search_and_sort() {
        let storage = MemoryStore::new();
        let mut store = open(&storage);
        exec(&mut store, add("Abe", Some(Priority::Low)));
        exec(&mut store, add("cab", Some(Priority::High)));
        exec(&mut store, add("xyz", Some(Priority::Medium)));

        let out = exec(&mut store, ls(None, "ab", Some("priority")));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("cab"));
        assert!(lines[1].ends_with("Abe"));
        assert_eq!(lines[2], "3 items left · Overdue · sort: Priority");

        let out = exec(&mut store, ls(Some(Filter::Completed), "", None));
        assert!(out.starts_with("No tasks matched the current view\n"));
    }

    #[test]
    fn bare_sort_flag_advances_from_configured_order() {
        let storage = MemoryStore::new();
        let mut store = open(&storage).with_query(config().view.initial_query());
        let out = exec(&mut store, ls(None, "", Some(NEXT_SORT)));
        assert!(out.ends_with("sort: Priority\n"));
        assert_eq!(store.query().sort, SortOrder::Priority);
    }

    #[test]
    fn clear_completed_reports_count() {
        let storage = MemoryStore::new();
        let mut store = open(&storage);
        exec(&mut store, add("done soon", None));
        let id = store.all()[0].id.to_string();
        exec(&mut store, Command::Toggle { id });

        let out = exec(&mut store, Command::ClearCompleted);
        assert!(out.starts_with("cleared 1 completed task\n"));
        assert!(store.all().is_empty());

        let out = exec(&mut store, Command::ClearCompleted);
        assert_eq!(out, "cleared 0 completed tasks\n");
    }

    #[test]
    fn stats_json_reports_counts() {
        let storage = MemoryStore::new();
        let mut store = open(&storage);
        exec(&mut store, add("one", None));
        exec(&mut store, add("two", None));

        let out = exec(&mut store, Command::Stats { json: true });
        let value: serde_json::Value =
            serde_json::from_str(&out).unwrap_or_else(|err| panic!("json: {err}"));
        assert_eq!(value["active"], 2);
        assert_eq!(value["completed"], 0);
    }
}
