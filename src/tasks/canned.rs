use super::TaskInvoker;
use crate::config::ExecutionParams;
use crate::core::TaskLabel;
use crate::errors::TaskError;
use std::collections::HashMap;
use std::time::Duration;

pub const SAMPLE_FILENAME: &str = "example.py";

/// Built-in sample reviewed by demo mode.
pub const SAMPLE_INPUT: &str = include_str!("../../demos/example.py");

const DEMO_SYNTAX_LOGIC: &str = "Found 1 logic error:

1. **Index Error (Line 12)**: `user_data.remove()` inside index-based loops shrinks the list, so later indexes run past the end
   - Fix: Build a new list of unique entries instead of removing while iterating";

const DEMO_SECURITY: &str = "Found 3 critical security vulnerabilities:

1. **SQL Injection (Line 2)**: The code uses string formatting to build SQL queries
   - Risk: Attackers can execute arbitrary SQL commands
   - Fix: Use parameterized queries: `cursor.execute(\"SELECT * FROM users WHERE id = ?\", (user_input,))`

2. **Hardcoded Credentials (Line 18)**: Password 'admin123' is stored in plain text
   - Risk: Anyone with code access can see credentials
   - Fix: Use environment variables and password hashing (bcrypt)

3. **No Input Validation (Line 1)**: User input is used directly without sanitization
   - Risk: Various injection attacks possible
   - Fix: Validate and sanitize all user inputs before use";

const DEMO_PERFORMANCE: &str = "Identified 2 major performance issues:

1. **O(n²) Algorithm (Lines 9-12)**: Nested loops for duplicate removal
   - Impact: Quadratic time complexity, slow for large datasets
   - Fix: Use a set for O(n) deduplication: `unique_data = list({tuple(d.items()) for d in user_data})`

2. **No Database Indexing**: Queries without proper indexes
   - Impact: Full table scans on every query
   - Fix: Add index on frequently queried columns: `CREATE INDEX idx_user_id ON users(id)`";

const DEMO_ARCHITECTURE: &str = "Found 3 architectural concerns:

1. **Tight Coupling**: Data access logic mixed with business logic
   - Issue: Hard to test and maintain
   - Fix: Implement Repository pattern to separate concerns

2. **No Dependency Injection**: Direct instantiation of dependencies
   - Issue: Makes unit testing difficult
   - Fix: Pass dependencies through constructor

3. **Missing Error Handling**: No try-except blocks for database operations
   - Issue: Application crashes on database errors
   - Fix: Add proper error handling and logging";

const DEMO_TESTING: &str = "Generated test cases and identified gaps:

1. **Missing Unit Tests**: No tests for any functions
   - Add tests for: process_user_data(), UserManager.authenticate()

2. **Edge Cases Not Covered**:
   - Empty input handling
   - SQL injection attempts
   - Invalid user credentials
   - Concurrent access scenarios

3. **Suggested Test Case**: assert that `process_user_data(\"1; DROP TABLE users;\", mock_db)` never reaches the query";

const DEMO_DOCUMENTATION: &str = "Documentation improvements needed:

1. **Missing Function Docstrings**: No documentation for any functions
   - Add docstrings explaining purpose, parameters, and return values

2. **No API Documentation**: UserManager class lacks usage examples
   - Add class-level documentation with example usage";

/// Backend that returns preset outputs per task.
///
/// Tasks without a preset fail with [`TaskError::Unregistered`].
#[derive(Debug, Clone, Default)]
pub struct CannedInvoker {
    responses: HashMap<TaskLabel, Result<String, TaskError>>,
    delay: Option<Duration>,
}

impl CannedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets for every task, matching [`SAMPLE_INPUT`].
    pub fn demo() -> Self {
        Self::new()
            .with_response(TaskLabel::SyntaxLogic, DEMO_SYNTAX_LOGIC)
            .with_response(TaskLabel::Security, DEMO_SECURITY)
            .with_response(TaskLabel::Performance, DEMO_PERFORMANCE)
            .with_response(TaskLabel::Architecture, DEMO_ARCHITECTURE)
            .with_response(TaskLabel::Testing, DEMO_TESTING)
            .with_response(TaskLabel::Documentation, DEMO_DOCUMENTATION)
    }

    pub fn with_response(mut self, task: TaskLabel, output: impl Into<String>) -> Self {
        self.responses.insert(task, Ok(output.into()));
        self
    }

    pub fn with_failure(mut self, task: TaskLabel, error: TaskError) -> Self {
        self.responses.insert(task, Err(error));
        self
    }

    /// Sleep this long before answering, to mimic a remote call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl TaskInvoker for CannedInvoker {
    fn invoke(
        &self,
        task: TaskLabel,
        _input: &str,
        _params: &ExecutionParams,
    ) -> Result<String, TaskError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.responses
            .get(&task)
            .cloned()
            .unwrap_or(Err(TaskError::Unregistered(task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{digest, extract};

    #[test]
    fn test_unregistered_task_fails() {
        let result = CannedInvoker::new().invoke(
            TaskLabel::Security,
            "",
            &ExecutionParams::default(),
        );
        assert_eq!(result, Err(TaskError::Unregistered(TaskLabel::Security)));
    }

    #[test]
    fn test_demo_covers_every_task() {
        let invoker = CannedInvoker::demo();
        for task in TaskLabel::ALL {
            assert!(invoker
                .invoke(task, SAMPLE_INPUT, &ExecutionParams::default())
                .is_ok());
        }
    }

    #[test]
    fn test_demo_security_output_extracts_three_criticals() {
        let findings = extract(DEMO_SECURITY, TaskLabel::Security);
        let lines: Vec<usize> = findings.iter().map(|f| f.line).collect();

        // Each numbered item opens a finding; its "- Risk:" bullet opens another.
        assert_eq!(lines, vec![2, 0, 18, 0, 1, 0]);
        assert_eq!(
            digest(DEMO_SECURITY),
            "Found 3 critical security vulnerabilities:"
        );
    }

    #[test]
    fn test_sample_input_is_long_enough_for_documentation() {
        assert!(SAMPLE_INPUT.lines().count() > 30);
    }
}
