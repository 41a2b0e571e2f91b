mod command;
mod gemini;
mod prompt;

pub use command::{classify, Command, Reply};
pub use gemini::{GeminiClient, LanguageModel};
pub use prompt::{build_prompt, SYSTEM_PROMPT};

use tracing::{info, warn};

use crate::dates::{self, Clock};
use crate::error::{ChatError, StoreError};
use crate::store::{Task, TaskStore};

pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";

/// Turns one chat message into one reply, running a tool call if the model asked for one.
pub struct ChatBridge<'a> {
    store: &'a TaskStore,
    model: &'a dyn LanguageModel,
    clock: &'a dyn Clock,
}

impl<'a> ChatBridge<'a> {
    pub fn new(store: &'a TaskStore, model: &'a dyn LanguageModel, clock: &'a dyn Clock) -> Self {
        ChatBridge { store, model, clock }
    }

    pub fn reply(&self, message: &str) -> String {
        let message = message.trim();
        if message.is_empty() {
            return EMPTY_MESSAGE_REPLY.to_string();
        }
        match self.converse(message) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "chat turn failed");
                format!("⚠️ Oh no! I ran into an error: {err}")
            }
        }
    }

    fn converse(&self, message: &str) -> Result<String, ChatError> {
        let text = self.model.generate(&build_prompt(message))?;
        let text = text.trim();
        match classify(text) {
            Reply::PlainText(text) => Ok(text),
            Reply::ToolCall(command) => {
                info!(?command, "running tool call from chat");
                Ok(self.execute(command)?)
            }
        }
    }

    /// Relative words resolve against the clock; anything else is used as given.
    fn resolve_date(&self, raw: Option<String>) -> Option<String> {
        let raw = raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())?;
        dates::resolve(&raw, self.clock).or(Some(raw))
    }

    fn execute(&self, command: Command) -> Result<String, StoreError> {
        match command {
            Command::AddTask {
                description,
                due_date,
            } => {
                let date = self.resolve_date(due_date);
                self.store.create(&description, date.as_deref())?;
                Ok(format!(
                    "✅ On it! I've added '{}' to your list for {}.",
                    description.trim(),
                    date.as_deref().unwrap_or("no date")
                ))
            }
            Command::EditTask {
                task_id,
                new_description,
                new_due_date,
            } => {
                let date = self.resolve_date(new_due_date);
                not_found_as_reply(
                    self.store.update(task_id, &new_description, date.as_deref()),
                    task_id,
                    || {
                        format!(
                            "✏️ All set! Task #{task_id} is now '{}' for {}.",
                            new_description.trim(),
                            date.as_deref().unwrap_or("no date")
                        )
                    },
                )
            }
            Command::CompleteTask { task_id } => {
                not_found_as_reply(self.store.complete(task_id), task_id, || {
                    format!("✅ Great job! I've marked task #{task_id} as completed.")
                })
            }
            Command::DeleteTask { task_id } => {
                not_found_as_reply(self.store.delete(task_id), task_id, || {
                    format!("🗑️ Poof! Task #{task_id} has been deleted.")
                })
            }
            Command::ShowTasks { due_date } => {
                let date = self
                    .resolve_date(due_date)
                    .unwrap_or_else(|| dates::today_iso(self.clock));
                let tasks = self.store.find_by_date(&date)?;
                Ok(render_schedule(&date, &tasks))
            }
            Command::GetCurrentDate => Ok(format!(
                "📅 Today is {}. Let's make it a productive day!",
                dates::today_iso(self.clock)
            )),
        }
    }
}

fn not_found_as_reply<F>(result: Result<(), StoreError>, task_id: i64, done: F) -> Result<String, StoreError>
where
    F: FnOnce() -> String,
{
    match result {
        Ok(()) => Ok(done()),
        Err(StoreError::NotFound(_)) => Ok(format!("🤔 Hmm, I couldn't find task #{task_id}.")),
        Err(err) => Err(err),
    }
}

fn render_schedule(date: &str, tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return format!("🎉 You have no tasks for {date}! Time for a break?");
    }
    let lines: Vec<String> = tasks
        .iter()
        .map(|t| format!("- {}. {} [{}]", t.id, t.name, t.status.as_str()))
        .collect();
    format!("Here are your tasks for {date}:\n{}", lines.join("\n"))
}
