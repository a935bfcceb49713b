//! Task list records and CRUD

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TimerError;

/// A single to-do entry. Pure storage, no concurrency concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub done: bool,
    pub id: i64,
}

/// Ordered task list with the widget's input validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Append a task. Blank text is rejected with the inline message the
    /// widget shows under the input field.
    pub fn add(&mut self, text: &str) -> Result<Task, TimerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TimerError::Validation(
                "Task description is required. Please provide details before adding.".to_string(),
            ));
        }
        let id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task {
            text: text.to_string(),
            done: false,
            id,
        };
        self.tasks.push(task.clone());
        info!("Task added: id={}", id);
        Ok(task)
    }

    /// Flip the done flag of the task with the given id.
    pub fn toggle(&mut self, id: i64) -> Result<Task, TimerError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TimerError::Validation(format!("no task with id {}", id)))?;
        task.done = !task.done;
        Ok(task.clone())
    }

    /// Remove the task with the given id, returning it.
    pub fn remove(&mut self, id: i64) -> Result<Task, TimerError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TimerError::Validation(format!("no task with id {}", id)))?;
        let task = self.tasks.remove(index);
        info!("Task removed: id={}", id);
        Ok(task)
    }
}
