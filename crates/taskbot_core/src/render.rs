//! Everything the bot says in a chat.

use crate::model::Task;

pub const WELCOME: &str = "Hi! I keep a small to-do list for this chat. Pick an action below.";
pub const NO_TASKS: &str = "No tasks found, add some tasks.";
pub const EMPTY_LIST_NOTICE: &str = "Your list is empty! 🎉";
pub const ASK_TASK_TEXT: &str = "Send the task text.";
pub const DELETION_MENU_PROMPT: &str = "🗑️ Select a task to delete, or send its number:";
pub const TASK_ADDED: &str = "Task added, don't forget to do it!";
pub const TASK_DELETED: &str = "Task deleted, great job!";
pub const INVALID_NUMBER: &str = "Please send a valid task number.";
pub const INVALID_INPUT: &str = "I can only read text messages.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that. Use the buttons below.";
pub const HELP: &str = "Add: send a new task\n\
List: show your tasks\n\
Delete: remove a task by tapping it or sending its number\n\
/clear: remove every task in this chat";

pub const DELETE_PAYLOAD_PREFIX: &str = "del_";
const BUTTON_LABEL_MAX_CHARS: usize = 35;
const BUTTON_LABEL_KEEP_CHARS: usize = 32;

pub fn task_line(task: &Task) -> String {
    format!("{}. {}", task.position, task.text)
}

/// Renders the list one task per line, or [`NO_TASKS`] when empty.
pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    tasks.iter().map(task_line).collect::<Vec<_>>().join("\n")
}

pub fn cleared(count: usize) -> String {
    match count {
        0 => "Nothing to clear.".to_string(),
        1 => "Removed 1 task.".to_string(),
        n => format!("Removed {n} tasks."),
    }
}

/// Inline button label for a task, shortened on a character boundary.
pub fn deletion_button_label(task: &Task) -> String {
    let line = task_line(task);
    if line.chars().count() <= BUTTON_LABEL_MAX_CHARS {
        return line;
    }

    let mut label: String = line.chars().take(BUTTON_LABEL_KEEP_CHARS).collect();
    label.push_str("...");
    label
}

pub fn delete_payload(position: i64) -> String {
    format!("{DELETE_PAYLOAD_PREFIX}{position}")
}

/// Extracts the task position from a deletion button payload.
pub fn parse_delete_payload(payload: &str) -> Option<i64> {
    payload
        .strip_prefix(DELETE_PAYLOAD_PREFIX)
        .and_then(|position| position.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{
        NO_TASKS, delete_payload, deletion_button_label, parse_delete_payload, task_list,
    };
    use crate::model::Task;

    fn task(position: i64, text: &str) -> Task {
        Task {
            text: text.to_string(),
            position,
        }
    }

    #[test]
    fn empty_list_renders_no_tasks() {
        assert_eq!(task_list(&[]), NO_TASKS);
    }

    #[test]
    fn list_renders_numbered_lines() {
        let tasks = [task(1, "Buy milk"), task(2, "Call Bob")];
        assert_eq!(task_list(&tasks), "1. Buy milk\n2. Call Bob");
    }

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(deletion_button_label(&task(3, "Water plants")), "3. Water plants");
    }

    #[test]
    fn long_labels_are_truncated_on_char_boundaries() {
        let label = deletion_button_label(&task(1, &"ж".repeat(60)));

        assert_eq!(label.chars().count(), 35);
        assert!(label.ends_with("..."));
        assert!(label.starts_with("1. жж"));
    }

    #[test]
    fn delete_payload_parses_back() {
        assert_eq!(parse_delete_payload(&delete_payload(12)), Some(12));
        assert_eq!(parse_delete_payload("del_x"), None);
        assert_eq!(parse_delete_payload("other_3"), None);
    }
}
