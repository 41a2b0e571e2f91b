use std::path::Path;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row, ToSql};
use serde::Serialize;

use crate::dates;
use crate::error::StoreError;

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    date TEXT,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'completed'))
);";

const SELECT_TASK: &str = "SELECT id, name, date, status FROM tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(FromSqlError::Other(format!("unknown task status: {other}").into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub date: Option<String>,
    pub status: TaskStatus,
}

impl Task {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            name: row.get(1)?,
            date: row.get(2)?,
            status: row.get(3)?,
        })
    }
}

/// Trims the name and rejects it when nothing is left.
fn validate_name(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("Task name cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Missing and blank dates mean "no date"; anything else must be `YYYY-MM-DD`.
fn validate_date(date: Option<&str>) -> Result<Option<String>, StoreError> {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    dates::parse_date(raw)
        .map(|d| Some(dates::format_date(d)))
        .ok_or_else(|| StoreError::Validation(format!("Invalid date: {raw} (expected YYYY-MM-DD)")))
}

pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let store = TaskStore {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = TaskStore {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_TASK} ORDER BY id ASC"))?;
        let tasks = stmt
            .query_map([], Task::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    pub fn find_by_date(&self, date: &str) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_TASK} WHERE date = ?1 ORDER BY id ASC"))?;
        let tasks = stmt
            .query_map([date], Task::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> Result<Task, StoreError> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_TASK} WHERE id = ?1"))?;
        let mut rows = stmt.query_map([id], Task::from_row)?;
        match rows.next() {
            Some(task) => Ok(task?),
            None => Err(StoreError::NotFound(id)),
        }
    }

    pub fn create(&self, name: &str, date: Option<&str>) -> Result<i64, StoreError> {
        let name = validate_name(name)?;
        let date = validate_date(date)?;
        self.conn.execute(
            "INSERT INTO tasks (name, date) VALUES (?1, ?2)",
            params![name, date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // Mutations report NotFound from the affected-row count, so the check and
    // the write are the same statement.
    pub fn update(&self, id: i64, name: &str, date: Option<&str>) -> Result<(), StoreError> {
        let name = validate_name(name)?;
        let date = validate_date(date)?;
        let changed = self.conn.execute(
            "UPDATE tasks SET name = ?1, date = ?2 WHERE id = ?3",
            params![name, date, id],
        )?;
        ensure_changed(changed, id)
    }

    pub fn complete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![TaskStatus::Completed, id],
        )?;
        ensure_changed(changed, id)
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        ensure_changed(changed, id)
    }
}

fn ensure_changed(changed: usize, id: i64) -> Result<(), StoreError> {
    if changed == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}
