#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;

use time::macros::date;
use time::Date;
use todo_server::chat::LanguageModel;
use todo_server::dates::FixedClock;
use todo_server::error::ChatError;
use todo_server::server::{handle, ApiResponse, App};
use todo_server::store::TaskStore;
use tiny_http::Method;

pub const TODAY: Date = date!(2024 - 05 - 10);

pub fn clock() -> FixedClock {
    FixedClock(TODAY)
}

/// Answers every prompt with the same text (or error) and remembers the prompts.
pub struct ScriptedModel {
    reply: Result<String, String>,
    pub prompts: RefCell<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Self {
        ScriptedModel {
            reply: Ok(text.to_string()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        ScriptedModel {
            reply: Err(message.to_string()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl LanguageModel for ScriptedModel {
    fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone().map_err(ChatError::Transport)
    }
}

pub fn app_with(model: Box<dyn LanguageModel>, web_root: PathBuf) -> App {
    App {
        store: TaskStore::open_in_memory().unwrap(),
        model,
        clock: Box::new(clock()),
        web_root,
    }
}

pub fn app() -> App {
    app_with(
        Box::new(ScriptedModel::replying("Hi! I'm here to help.")),
        PathBuf::from("web"),
    )
}

pub fn request(app: &App, method: Method, url: &str, body: &str) -> ApiResponse {
    handle(app, &method, url, body)
}

pub fn json_body(resp: &ApiResponse) -> serde_json::Value {
    serde_json::from_slice(&resp.body).unwrap()
}
