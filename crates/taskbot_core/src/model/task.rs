use serde::{Deserialize, Serialize};

pub type ChatId = i64;
pub type MessageId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub position: i64,
}

/// A chat's tasks in insertion order. Positions are always exactly `1..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn push<T: Into<String>>(&mut self, text: T) -> Task {
        let task = Task {
            text: text.into(),
            position: self.tasks.len() as i64 + 1,
        };
        self.tasks.push(task.clone());
        task
    }

    /// Removes the task at the 1-based `position`; `None` when out of range.
    pub fn remove(&mut self, position: i64) -> Option<Task> {
        if position < 1 || position > self.tasks.len() as i64 {
            return None;
        }

        let removed = self.tasks.remove((position - 1) as usize);
        self.normalize();
        Some(removed)
    }

    pub fn normalize(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.position = index as i64 + 1;
        }
    }
}

impl<T: Into<String>> FromIterator<T> for TaskList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = TaskList::new();
        for text in iter {
            list.push(text);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::TaskList;

    fn positions(list: &TaskList) -> Vec<i64> {
        list.tasks().iter().map(|task| task.position).collect()
    }

    #[test]
    fn push_assigns_next_position() {
        let mut list = TaskList::new();
        let first = list.push("Buy milk");
        let second = list.push("Call Bob");

        assert_eq!(first.position, 1);
        assert_eq!(second.position, 2);
    }

    #[test]
    fn remove_renumbers_remaining_tasks() {
        let mut list: TaskList = ["a", "b", "c", "d"].into_iter().collect();

        let removed = list.remove(2).unwrap();

        assert_eq!(removed.text, "b");
        assert_eq!(positions(&list), vec![1, 2, 3]);
        assert_eq!(list.tasks()[1].text, "c");
    }

    #[test]
    fn remove_rejects_out_of_range_positions() {
        let mut list: TaskList = ["a"].into_iter().collect();

        assert!(list.remove(0).is_none());
        assert!(list.remove(-1).is_none());
        assert!(list.remove(2).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn positions_stay_dense_after_mixed_operations() {
        let mut list = TaskList::new();
        for step in 0..40_i64 {
            if step % 3 == 2 {
                let target = (step * 7) % list.len() as i64 + 1;
                list.remove(target).unwrap();
            } else {
                list.push(format!("task {step}"));
            }

            let expected: Vec<i64> = (1..=list.len() as i64).collect();
            assert_eq!(positions(&list), expected);
        }
    }

    #[test]
    fn normalize_repairs_gaps() {
        let mut list: TaskList =
            serde_json::from_str(r#"[{"text":"a","position":4},{"text":"b","position":4}]"#)
                .unwrap();

        list.normalize();

        assert_eq!(positions(&list), vec![1, 2]);
    }
}
