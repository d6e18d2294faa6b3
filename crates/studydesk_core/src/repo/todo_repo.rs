//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - `fetch_todos` is sorted by `created_at DESC, id ASC`.
//! - `create_todo` validates input before inserting.
//! - Timestamps come from the caller, never from the system clock.

use crate::model::todo::{NewTodo, Priority, Todo, TodoId};
use crate::model::UserId;
use crate::repo::schema::{bool_to_int, ensure_table, int_to_bool, parse_uuid};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    priority,
    completed,
    due_date,
    created_at,
    updated_at
FROM todos";

/// Store contract for tasks.
pub trait TodoRepository {
    fn fetch_todos(&self, user_id: UserId) -> RepoResult<Vec<Todo>>;
    fn create_todo(&self, user_id: UserId, input: &NewTodo, now_ms: i64) -> RepoResult<Todo>;
    /// Flips the completion flag, bumps `updated_at` and returns the new flag.
    fn toggle_todo_completed(&self, id: TodoId, now_ms: i64) -> RepoResult<bool>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(
            conn,
            "todos",
            &[
                "id",
                "user_id",
                "title",
                "description",
                "priority",
                "completed",
                "due_date",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn fetch_todos(&self, user_id: UserId) -> RepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn create_todo(&self, user_id: UserId, input: &NewTodo, now_ms: i64) -> RepoResult<Todo> {
        input.validate()?;

        let todo = Todo {
            id: Uuid::new_v4(),
            user_id,
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input.priority,
            completed: false,
            due_date: input.due_date,
            created_at: now_ms,
            updated_at: now_ms,
        };

        self.conn.execute(
            "INSERT INTO todos (
                id,
                user_id,
                title,
                description,
                priority,
                completed,
                due_date,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                todo.id.to_string(),
                todo.user_id.to_string(),
                todo.title.as_str(),
                todo.description.as_str(),
                todo.priority.as_str(),
                bool_to_int(todo.completed),
                todo.due_date,
                todo.created_at,
                todo.updated_at,
            ],
        )?;

        Ok(todo)
    }

    fn toggle_todo_completed(&self, id: TodoId, now_ms: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                completed = 1 - completed,
                updated_at = ?2
             WHERE id = ?1;",
            params![id.to_string(), now_ms],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        let completed: i64 = self.conn.query_row(
            "SELECT completed FROM todos WHERE id = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        int_to_bool(completed, "todos.completed")
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in todos.priority"
        ))
    })?;

    Ok(Todo {
        id: parse_uuid(&id_text, "todos.id")?,
        user_id: parse_uuid(&user_text, "todos.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        completed: int_to_bool(row.get("completed")?, "todos.completed")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
