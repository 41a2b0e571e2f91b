mod common;

use common::{clock, ScriptedModel};
use pretty_assertions::assert_eq;
use todo_server::chat::{ChatBridge, SYSTEM_PROMPT};
use todo_server::store::{TaskStatus, TaskStore};

fn store() -> TaskStore {
    TaskStore::open_in_memory().unwrap()
}

fn reply(store: &TaskStore, model_text: &str, message: &str) -> String {
    let model = ScriptedModel::replying(model_text);
    let clock = clock();
    ChatBridge::new(store, &model, &clock).reply(message)
}

#[test]
fn add_task_embedded_in_prose_creates_task_for_tomorrow() {
    let store = store();
    let text = "Sure!\n{\"function\":\"addTask\",\"parameters\":{\"description\":\"buy milk\",\"due_date\":\"tomorrow\"}}\nEnjoy!";
    let answer = reply(&store, text, "add buy milk tomorrow");

    assert_ne!(answer, text);
    assert!(answer.contains("buy milk"));
    assert!(answer.contains("2024-05-11"));

    let tasks = store.list().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "buy milk");
    assert_eq!(tasks[0].date.as_deref(), Some("2024-05-11"));
    assert_eq!(tasks[0].status, TaskStatus::Pending);
}

#[test]
fn add_task_keeps_literal_dates_and_allows_none() {
    let store = store();
    let answer = reply(
        &store,
        r#"{"function":"addTask","parameters":{"description":"party","due_date":"2024-12-31"}}"#,
        "party on new year's eve",
    );
    assert_eq!(answer, "✅ On it! I've added 'party' to your list for 2024-12-31.");

    let answer = reply(
        &store,
        r#"{"function":"addTask","parameters":{"description":"read a book","due_date":null}}"#,
        "read a book",
    );
    assert_eq!(answer, "✅ On it! I've added 'read a book' to your list for no date.");
    assert_eq!(store.list().unwrap()[1].date, None);
}

#[test]
fn add_task_with_unusable_date_reports_an_error() {
    let store = store();
    let answer = reply(
        &store,
        r#"{"function":"addTask","parameters":{"description":"gym","due_date":"next week"}}"#,
        "gym next week",
    );
    assert!(answer.starts_with("⚠️ Oh no! I ran into an error:"));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn plain_text_is_returned_unchanged() {
    let store = store();
    let text = "Hello! I can add, edit, complete and delete your tasks.";
    assert_eq!(reply(&store, text, "what can you do?"), text);
}

#[test]
fn unknown_function_is_returned_unchanged() {
    let store = store();
    let text = r#"{"function":"orderPizza","parameters":{"size":"large"}}"#;
    assert_eq!(reply(&store, text, "pizza please"), text);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn empty_message_skips_the_model() {
    let store = store();
    let model = ScriptedModel::replying("should not be used");
    let clock = clock();
    let answer = ChatBridge::new(&store, &model, &clock).reply("   ");
    assert_eq!(answer, "Please enter a message.");
    assert_eq!(model.calls(), 0);
}

#[test]
fn prompt_wraps_the_user_message() {
    let store = store();
    let model = ScriptedModel::replying("ok");
    let clock = clock();
    ChatBridge::new(&store, &model, &clock).reply("  hello  ");
    let prompts = model.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with(SYSTEM_PROMPT));
    assert!(prompts[0].ends_with("\n\nUser: hello"));
}

#[test]
fn model_failure_becomes_a_reply() {
    let store = store();
    let model = ScriptedModel::failing("connection refused");
    let clock = clock();
    let answer = ChatBridge::new(&store, &model, &clock).reply("hi");
    assert_eq!(
        answer,
        "⚠️ Oh no! I ran into an error: request to the language model failed: connection refused"
    );
}

#[test]
fn edit_complete_and_delete_by_id() {
    let store = store();
    let id = store.create("draft", None).unwrap();

    let answer = reply(
        &store,
        &format!(r#"{{"function":"editTask","parameters":{{"task_id":{id},"new_description":"final","new_due_date":"yesterday"}}}}"#),
        "rename it",
    );
    assert_eq!(answer, format!("✏️ All set! Task #{id} is now 'final' for 2024-05-09."));
    assert_eq!(store.get(id).unwrap().date.as_deref(), Some("2024-05-09"));

    let answer = reply(
        &store,
        &format!(r#"{{"function":"completeTask","parameters":{{"task_id":"{id}"}}}}"#),
        "done",
    );
    assert_eq!(answer, format!("✅ Great job! I've marked task #{id} as completed."));
    assert_eq!(store.get(id).unwrap().status, TaskStatus::Completed);

    let answer = reply(
        &store,
        &format!(r#"{{"function":"deleteTask","parameters":{{"task_id":{id}}}}}"#),
        "remove it",
    );
    assert_eq!(answer, format!("🗑️ Poof! Task #{id} has been deleted."));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn unknown_ids_get_the_not_found_reply() {
    let store = store();
    let calls = [
        r#"{"function":"editTask","parameters":{"task_id":5,"new_description":"x"}}"#,
        r#"{"function":"completeTask","parameters":{"task_id":5}}"#,
        r#"{"function":"deleteTask","parameters":{"task_id":5}}"#,
    ];
    for call in calls {
        assert_eq!(reply(&store, call, "task 5"), "🤔 Hmm, I couldn't find task #5.");
    }
}

#[test]
fn show_tasks_defaults_to_today() {
    let store = store();
    let first = store.create("standup", Some("2024-05-10")).unwrap();
    store.create("later", Some("2024-05-11")).unwrap();
    let second = store.create("review", Some("2024-05-10")).unwrap();
    store.complete(second).unwrap();

    let answer = reply(&store, r#"{"function":"showTasks","parameters":{}}"#, "what's up today");
    assert_eq!(
        answer,
        format!("Here are your tasks for 2024-05-10:\n- {first}. standup [pending]\n- {second}. review [completed]")
    );
}

#[test]
fn show_tasks_for_an_empty_day() {
    let store = store();
    store.create("today thing", Some("2024-05-10")).unwrap();
    let answer = reply(
        &store,
        r#"{"function":"showTasks","parameters":{"due_date":"Tomorrow"}}"#,
        "and tomorrow?",
    );
    assert_eq!(answer, "🎉 You have no tasks for 2024-05-11! Time for a break?");
}

#[test]
fn current_date_comes_from_the_clock() {
    let store = store();
    let answer = reply(&store, r#"{"function":"getCurrentDate","parameters":{}}"#, "what day is it");
    assert_eq!(answer, "📅 Today is 2024-05-10. Let's make it a productive day!");
}
