use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask {
        description: String,
        due_date: Option<String>,
    },
    EditTask {
        task_id: i64,
        new_description: String,
        new_due_date: Option<String>,
    },
    CompleteTask {
        task_id: i64,
    },
    DeleteTask {
        task_id: i64,
    },
    ShowTasks {
        due_date: Option<String>,
    },
    GetCurrentDate,
}

/// What the model's text turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    PlainText(String),
    ToolCall(Command),
}

#[derive(Debug, Deserialize)]
struct RawToolCall {
    function: String,
    #[serde(default)]
    parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct AddParams {
    description: String,
    #[serde(default)]
    due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditParams {
    #[serde(deserialize_with = "task_id")]
    task_id: i64,
    new_description: String,
    #[serde(default)]
    new_due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdParams {
    #[serde(deserialize_with = "task_id")]
    task_id: i64,
}

#[derive(Debug, Deserialize)]
struct ShowParams {
    #[serde(default)]
    due_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskIdRepr {
    Int(i64),
    Text(String),
}

// Models sometimes quote ids.
fn task_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match TaskIdRepr::deserialize(deserializer)? {
        TaskIdRepr::Int(id) => Ok(id),
        TaskIdRepr::Text(raw) => raw.trim().parse().map_err(de::Error::custom),
    }
}

fn params<T: DeserializeOwned>(parameters: Map<String, Value>) -> Option<T> {
    serde_json::from_value(Value::Object(parameters)).ok()
}

/// The span from the first `{` to the last `}`, if there is one.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_command(raw: &str) -> Option<Command> {
    let call: RawToolCall = serde_json::from_str(raw).ok()?;
    let parameters = call.parameters.unwrap_or_default();
    let command = match call.function.as_str() {
        "addTask" => {
            let p: AddParams = params(parameters)?;
            Command::AddTask {
                description: p.description,
                due_date: p.due_date,
            }
        }
        "editTask" => {
            let p: EditParams = params(parameters)?;
            Command::EditTask {
                task_id: p.task_id,
                new_description: p.new_description,
                new_due_date: p.new_due_date,
            }
        }
        "completeTask" => Command::CompleteTask {
            task_id: params::<IdParams>(parameters)?.task_id,
        },
        "deleteTask" => Command::DeleteTask {
            task_id: params::<IdParams>(parameters)?.task_id,
        },
        "showTasks" => Command::ShowTasks {
            due_date: params::<ShowParams>(parameters)?.due_date,
        },
        "getCurrentDate" => Command::GetCurrentDate,
        _ => return None,
    };
    Some(command)
}

pub fn classify(text: &str) -> Reply {
    match extract_json_object(text).and_then(parse_command) {
        Some(command) => Reply::ToolCall(command),
        None => Reply::PlainText(text.to_string()),
    }
}
