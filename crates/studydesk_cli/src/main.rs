//! CLI entry point.
//!
//! # Responsibility
//! - Without arguments: print a deterministic linkage probe.
//! - With `<db_path> <user_uuid>`: print the dashboard overview for a user.
//!   Logs go to `$STUDYDESK_LOG_DIR`, or to `logs/` next to the database.

use log::error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use studydesk_core::db::open_db;
use studydesk_core::{
    core_version, default_log_level, init_logging, ping, AnalyticsService,
    SqliteTimetableRepository, SqliteTodoRepository,
};
use uuid::Uuid;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            println!("studydesk_core ping={}", ping());
            println!("studydesk_core version={}", core_version());
            ExitCode::SUCCESS
        }
        [db_path, user_id] => {
            start_logging(db_path);
            match print_overview(db_path, user_id) {
                Ok(()) => ExitCode::SUCCESS,
                Err(message) => {
                    error!("event=cli_overview module=cli status=error error={message}");
                    eprintln!("error: {message}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            eprintln!("usage: studydesk [<db_path> <user_uuid>]");
            ExitCode::from(2)
        }
    }
}

fn start_logging(db_path: &str) {
    let configured = std::env::var_os("STUDYDESK_LOG_DIR").map(PathBuf::from);
    let log_dir = log_dir_for(db_path, configured);
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Resolves an absolute log directory; relative values are taken from the
/// working directory.
fn log_dir_for(db_path: &str, configured: Option<PathBuf>) -> PathBuf {
    let dir = configured.unwrap_or_else(|| {
        Path::new(db_path)
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("logs")
    });
    if dir.is_absolute() {
        return dir;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&dir))
        .unwrap_or(dir)
}

fn print_overview(db_path: &str, user_id: &str) -> Result<(), String> {
    let user_id = Uuid::parse_str(user_id).map_err(|err| format!("invalid user id: {err}"))?;
    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let todos = SqliteTodoRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let timetable = SqliteTimetableRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let overview = AnalyticsService::new(todos, timetable)
        .overview(user_id)
        .map_err(|err| err.to_string())?;

    let tasks = &overview.tasks;
    println!(
        "tasks total={} completed={} pending={} completion_rate={:.1}%",
        tasks.total, tasks.completed, tasks.pending, tasks.completion_rate
    );
    println!(
        "priority high={} medium={} low={}",
        tasks.by_priority.high, tasks.by_priority.medium, tasks.by_priority.low
    );
    for load in &overview.week {
        println!(
            "{:<9} classes={} minutes={}",
            load.day.as_str(),
            load.classes,
            load.minutes
        );
    }
    println!("weekly_class_minutes={}", overview.weekly_class_minutes);
    for todo in &overview.recent_tasks {
        let mark = if todo.completed { "x" } else { " " };
        println!("[{mark}] {} ({})", todo.title, todo.priority.as_str());
    }
    Ok(())
}
