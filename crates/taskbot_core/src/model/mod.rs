mod task;

pub use task::{ChatId, MessageId, Task, TaskList};
