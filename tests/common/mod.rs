// Shared helpers for review-council integration tests
#![allow(dead_code)]

use review_council::config::ExecutionParams;
use review_council::{TaskError, TaskInvoker, TaskLabel};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Input long enough that the documentation stage runs.
pub const LONG_INPUT: &str = "import os\n\ndef load(path):\n    data = open(path).read()\n    return data\n\ndef parse(data):\n    rows = []\n    for line in data.splitlines():\n        rows.append(line.split(','))\n    return rows\n\ndef main():\n    print(parse(load('x.csv')))\n";

/// Input with fewer code lines than the documentation threshold.
pub const SHORT_INPUT: &str = "# helper\nx = 1\nprint(x)\n";

/// Invoker with a scripted output, failure and delay per task.
///
/// Every call is recorded with the input the task received.
#[derive(Default)]
pub struct ScriptedInvoker {
    outputs: HashMap<TaskLabel, Result<String, TaskError>>,
    delays: HashMap<TaskLabel, Duration>,
    calls: Mutex<Vec<(TaskLabel, String)>>,
}

impl ScriptedInvoker {
    /// Every task answers with an empty-handed but successful output.
    pub fn quiet() -> Self {
        TaskLabel::ALL
            .into_iter()
            .fold(Self::default(), |invoker, task| {
                invoker.output(task, "No issues found.")
            })
    }

    pub fn output(mut self, task: TaskLabel, text: &str) -> Self {
        self.outputs.insert(task, Ok(text.to_string()));
        self
    }

    pub fn failure(mut self, task: TaskLabel, message: &str) -> Self {
        self.outputs.insert(task, Err(TaskError::other(message)));
        self
    }

    pub fn delay(mut self, task: TaskLabel, millis: u64) -> Self {
        self.delays.insert(task, Duration::from_millis(millis));
        self
    }

    pub fn called(&self) -> Vec<TaskLabel> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(task, _)| *task)
            .collect()
    }

    pub fn input_for(&self, task: TaskLabel) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(called, _)| *called == task)
            .map(|(_, input)| input.clone())
    }
}

impl TaskInvoker for ScriptedInvoker {
    fn invoke(
        &self,
        task: TaskLabel,
        input: &str,
        _params: &ExecutionParams,
    ) -> Result<String, TaskError> {
        if let Some(delay) = self.delays.get(&task) {
            std::thread::sleep(*delay);
        }
        self.calls.lock().unwrap().push((task, input.to_string()));
        self.outputs
            .get(&task)
            .cloned()
            .unwrap_or(Err(TaskError::Unregistered(task)))
    }
}

/// Numbered output with one finding per `(line, issue)` pair.
pub fn numbered_output(items: &[(usize, &str)]) -> String {
    let body: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, (line, issue))| format!("{}. Line {}: {}", i + 1, line, issue))
        .collect();
    format!("Found {} issues:\n{}", items.len(), body.join("\n"))
}
