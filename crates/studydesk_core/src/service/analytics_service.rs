//! Analytics aggregation over tasks and timetable.
//!
//! # Responsibility
//! - Count completed/pending tasks and tasks per priority.
//! - Summarize weekly class load for the dashboard overview.
//!
//! # Invariants
//! - `completed + pending == total`.
//! - `completion_rate` is a percentage rounded to one decimal, `0.0` when
//!   there are no tasks.

use crate::model::timetable::{TimetableEntry, Weekday};
use crate::model::todo::{Priority, Todo};
use crate::model::UserId;
use crate::repo::timetable_repo::TimetableRepository;
use crate::repo::todo_repo::TodoRepository;
use crate::repo::RepoResult;
use serde::Serialize;

/// Number of tasks shown in the "recent activity" panel.
pub const RECENT_TASKS_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TaskAnalytics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate: f64,
    pub by_priority: PriorityBreakdown,
}

/// Class load of one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayLoad {
    pub day: Weekday,
    pub classes: usize,
    pub minutes: u32,
}

/// Everything the dashboard landing view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub tasks: TaskAnalytics,
    pub recent_tasks: Vec<Todo>,
    pub week: Vec<DayLoad>,
    pub weekly_class_minutes: u32,
}

/// Aggregates task counts.
pub fn summarize_tasks(todos: &[Todo]) -> TaskAnalytics {
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.completed).count();
    let mut by_priority = PriorityBreakdown::default();
    for todo in todos {
        match todo.priority {
            Priority::High => by_priority.high += 1,
            Priority::Medium => by_priority.medium += 1,
            Priority::Low => by_priority.low += 1,
        }
    }

    TaskAnalytics {
        total,
        completed,
        pending: total - completed,
        completion_rate: completion_rate(completed, total),
        by_priority,
    }
}

/// First `limit` tasks of a newest-first list.
pub fn recent_tasks(todos: &[Todo], limit: usize) -> Vec<Todo> {
    todos.iter().take(limit).cloned().collect()
}

/// Classes and minutes per weekday, Monday first.
pub fn weekly_load(entries: &[TimetableEntry]) -> Vec<DayLoad> {
    let mut week: Vec<DayLoad> = Weekday::ALL
        .into_iter()
        .map(|day| DayLoad {
            day,
            classes: 0,
            minutes: 0,
        })
        .collect();
    for entry in entries {
        let load = &mut week[entry.day.index()];
        load.classes += 1;
        load.minutes += entry.duration_minutes();
    }
    week
}

fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = completed as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Read-only analytics over the task and timetable stores.
pub struct AnalyticsService<T: TodoRepository, E: TimetableRepository> {
    todos: T,
    timetable: E,
}

impl<T: TodoRepository, E: TimetableRepository> AnalyticsService<T, E> {
    pub fn new(todos: T, timetable: E) -> Self {
        Self { todos, timetable }
    }

    pub fn task_analytics(&self, user_id: UserId) -> RepoResult<TaskAnalytics> {
        Ok(summarize_tasks(&self.todos.fetch_todos(user_id)?))
    }

    pub fn overview(&self, user_id: UserId) -> RepoResult<DashboardOverview> {
        let todos = self.todos.fetch_todos(user_id)?;
        let entries = self.timetable.fetch_entries(user_id)?;
        let week = weekly_load(&entries);
        let weekly_class_minutes = week.iter().map(|load| load.minutes).sum();

        Ok(DashboardOverview {
            tasks: summarize_tasks(&todos),
            recent_tasks: recent_tasks(&todos, RECENT_TASKS_LIMIT),
            week,
            weekly_class_minutes,
        })
    }
}
