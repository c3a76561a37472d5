use chrono::NaiveDate;

use crate::models::{Task, TaskCategory, TaskStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::Completed => status == TaskStatus::Completed,
        }
    }

    pub fn cycle(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Done",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TaskCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: TaskCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    pub fn cycle(self) -> CategoryFilter {
        match self {
            CategoryFilter::All => CategoryFilter::Only(TaskCategory::ALL[0]),
            CategoryFilter::Only(current) => {
                match TaskCategory::ALL.iter().position(|c| *c == current) {
                    Some(i) if i + 1 < TaskCategory::ALL.len() => {
                        CategoryFilter::Only(TaskCategory::ALL[i + 1])
                    }
                    _ => CategoryFilter::All,
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

/// Aggregate counts over the whole collection, not the filtered subset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaskView {
    pub visible: Vec<Task>,
    pub stats: TaskStats,
}

/// A pending task with a due date strictly before `today` is overdue.
/// Dates are compared calendar-day to calendar-day, so a task due today
/// never counts.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.status == TaskStatus::Pending && task.due_date.map(|due| due < today).unwrap_or(false)
}

/// Derives the visible subset and the stats line from the canonical
/// collection. Pure: the output depends only on the arguments, and the
/// input order is preserved.
pub fn derive_view(
    tasks: &[Task],
    query: &str,
    status: StatusFilter,
    category: CategoryFilter,
    today: NaiveDate,
) -> TaskView {
    let needle = query.to_lowercase();

    let visible = tasks
        .iter()
        .filter(|task| {
            let matches_search = needle.is_empty()
                || task.title.to_lowercase().contains(&needle)
                || task
                    .description
                    .as_ref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false);
            matches_search && status.matches(task.status) && category.matches(task.category)
        })
        .cloned()
        .collect();

    let stats = TaskStats {
        total: tasks.len(),
        pending: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count(),
        completed: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count(),
        overdue: tasks.iter().filter(|t| is_overdue(t, today)).count(),
    };

    TaskView { visible, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            title: title.to_string(),
            description: None,
            status,
            category: TaskCategory::Other,
            due_date: None,
            created_at: "2026-08-01T09:30:00+00:00".to_string(),
            updated_at: "2026-08-01T09:30:00+00:00".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn yesterday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn test_identity_filter_returns_collection_unchanged() {
        let tasks = vec![
            task("a", "Write report", TaskStatus::Pending),
            task("b", "Buy milk", TaskStatus::Completed),
            task("c", "Call dentist", TaskStatus::Pending),
        ];
        let view = derive_view(&tasks, "", StatusFilter::All, CategoryFilter::All, today());
        assert_eq!(view.visible, tasks);
    }

    #[test]
    fn test_same_inputs_yield_same_view() {
        let mut overdue = task("a", "Write report", TaskStatus::Pending);
        overdue.due_date = Some(yesterday());
        let tasks = vec![overdue, task("b", "Buy milk", TaskStatus::Completed)];
        let first = derive_view(
            &tasks,
            "b",
            StatusFilter::Pending,
            CategoryFilter::All,
            today(),
        );
        let second = derive_view(
            &tasks,
            "b",
            StatusFilter::Pending,
            CategoryFilter::All,
            today(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_matches_title_or_description_case_insensitive() {
        let mut with_desc = task("a", "Errands", TaskStatus::Pending);
        with_desc.description = Some("Pick up the DRY cleaning".to_string());
        let tasks = vec![
            with_desc,
            task("b", "Dry run", TaskStatus::Pending),
            task("c", "Unrelated", TaskStatus::Pending),
        ];
        let view = derive_view(
            &tasks,
            "dry",
            StatusFilter::All,
            CategoryFilter::All,
            today(),
        );
        let ids: Vec<&str> = view.visible.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_description_never_matches() {
        let tasks = vec![task("a", "Errands", TaskStatus::Pending)];
        let view = derive_view(
            &tasks,
            "cleaning",
            StatusFilter::All,
            CategoryFilter::All,
            today(),
        );
        assert!(view.visible.is_empty());
    }

    #[test]
    fn test_all_three_predicates_must_hold() {
        let mut work = task("a", "Ship release", TaskStatus::Pending);
        work.category = TaskCategory::Work;
        let mut done_work = task("b", "Ship docs", TaskStatus::Completed);
        done_work.category = TaskCategory::Work;
        let mut health = task("c", "Ship nothing", TaskStatus::Pending);
        health.category = TaskCategory::Health;
        let tasks = vec![work, done_work, health];

        let view = derive_view(
            &tasks,
            "ship",
            StatusFilter::Pending,
            CategoryFilter::Only(TaskCategory::Work),
            today(),
        );
        let ids: Vec<&str> = view.visible.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_total_is_pending_plus_completed() {
        let tasks = vec![
            task("a", "One", TaskStatus::Pending),
            task("b", "Two", TaskStatus::Completed),
            task("c", "Three", TaskStatus::Pending),
            task("d", "Four", TaskStatus::Completed),
            task("e", "Five", TaskStatus::Pending),
        ];
        let view = derive_view(&tasks, "", StatusFilter::All, CategoryFilter::All, today());
        assert_eq!(view.stats.total, 5);
        assert_eq!(
            view.stats.total,
            view.stats.pending + view.stats.completed
        );
    }

    #[test]
    fn test_only_pending_tasks_count_as_overdue() {
        let mut a = task("a", "Late and pending", TaskStatus::Pending);
        a.due_date = Some(yesterday());
        let mut b = task("b", "Late but done", TaskStatus::Completed);
        b.due_date = Some(yesterday());
        let c = task("c", "No due date", TaskStatus::Pending);
        let tasks = vec![a, b, c];

        let view = derive_view(&tasks, "", StatusFilter::All, CategoryFilter::All, today());
        assert_eq!(view.stats.overdue, 1);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let mut a = task("a", "Due today", TaskStatus::Pending);
        a.due_date = Some(today());
        let view = derive_view(&[a], "", StatusFilter::All, CategoryFilter::All, today());
        assert_eq!(view.stats.overdue, 0);
    }

    #[test]
    fn test_completing_an_overdue_task_clears_it_from_the_count() {
        let mut a = task("a", "Late", TaskStatus::Pending);
        a.due_date = Some(yesterday());
        let tasks = vec![a.clone()];
        let before = derive_view(&tasks, "", StatusFilter::All, CategoryFilter::All, today());
        assert_eq!(before.stats.overdue, 1);

        a.status = TaskStatus::Completed;
        let after = derive_view(&[a], "", StatusFilter::All, CategoryFilter::All, today());
        assert_eq!(after.stats.overdue, 0);
    }

    #[test]
    fn test_stats_cover_whole_collection_regardless_of_filters() {
        let tasks = vec![
            task("a", "One", TaskStatus::Pending),
            task("b", "Two", TaskStatus::Completed),
        ];
        let view = derive_view(
            &tasks,
            "one",
            StatusFilter::Pending,
            CategoryFilter::All,
            today(),
        );
        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.stats.pending, 1);
        assert_eq!(view.stats.completed, 1);
    }

    #[test]
    fn test_status_filter_cycles_through_all_states() {
        let mut filter = StatusFilter::All;
        filter = filter.cycle();
        assert_eq!(filter, StatusFilter::Pending);
        filter = filter.cycle();
        assert_eq!(filter, StatusFilter::Completed);
        filter = filter.cycle();
        assert_eq!(filter, StatusFilter::All);
    }

    #[test]
    fn test_category_filter_cycles_back_to_all() {
        let mut filter = CategoryFilter::All;
        for _ in 0..TaskCategory::ALL.len() {
            filter = filter.cycle();
            assert_ne!(filter, CategoryFilter::All);
        }
        assert_eq!(filter.cycle(), CategoryFilter::All);
    }
}
