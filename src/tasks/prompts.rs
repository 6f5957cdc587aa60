//! Role and prompt text for each task, used by remote backends.

use crate::core::TaskLabel;

/// Who the model plays for a task.
pub fn role(task: TaskLabel) -> &'static str {
    match task {
        TaskLabel::SyntaxLogic => "code correctness and logic error detection specialist",
        TaskLabel::Security => {
            "security expert focused on vulnerabilities and secure coding practices"
        }
        TaskLabel::Performance => "performance optimization specialist",
        TaskLabel::Architecture => "software architecture expert",
        TaskLabel::Testing => "testing and quality assurance specialist",
        TaskLabel::Documentation => "technical documentation specialist",
    }
}

pub fn system_prompt(task: TaskLabel) -> String {
    format!(
        "You are a {}. Provide specific, actionable feedback.",
        role(task)
    )
}

/// User prompt for `task` with `input` embedded.
pub fn render(task: TaskLabel, input: &str) -> String {
    let (opening, instructions) = template(task);
    format!("{opening}\n\n{input}\n\n{instructions}")
}

fn template(task: TaskLabel) -> (&'static str, &'static str) {
    match task {
        TaskLabel::SyntaxLogic => (
            "Analyze this code for syntax errors, logic bugs, and correctness issues:",
            "Focus ONLY on actual errors and bugs:
1. Syntax errors or near-syntax issues
2. Logic errors (off-by-one, incorrect conditions, infinite loops)
3. Type mismatches or incorrect type usage
4. Unreachable code or dead code paths
5. Resource leaks (unclosed files, connections)
6. Race conditions or concurrency issues
7. Incorrect algorithm implementation

DO NOT report on style, naming conventions, or best practices - only actual bugs.
If there are no syntax or logic errors, simply state \"No syntax or logic errors found.\"

For each issue found, specify:
- The line number where it occurs
- What the error is
- Why it's wrong
- How to fix it",
        ),
        TaskLabel::Security => (
            "Analyze this code for security vulnerabilities:",
            "Focus on:
1. Authentication and authorization issues
2. Input validation and sanitization
3. SQL injection, XSS, CSRF vulnerabilities
4. Encryption and data protection
5. Secure communication patterns
6. Dependency vulnerabilities
7. Secret management

Provide specific vulnerabilities found and how to fix them.",
        ),
        TaskLabel::Performance => (
            "Analyze this code for performance issues:",
            "Focus on:
1. Time complexity analysis
2. Space complexity issues
3. Database query optimization
4. Caching opportunities
5. Algorithmic improvements
6. Resource bottlenecks
7. Async/parallel processing opportunities

Provide specific performance issues and optimization suggestions.",
        ),
        TaskLabel::Architecture => (
            "Review this code for architectural quality:",
            "Focus on:
1. SOLID principles adherence
2. Design pattern usage and appropriateness
3. Code modularity and coupling
4. Separation of concerns
5. Dependency management
6. Scalability considerations
7. Maintainability issues

Provide specific architectural improvements.",
        ),
        TaskLabel::Testing => (
            "Analyze this code for critical testing gaps:",
            "Focus ONLY on significant testing issues:
1. Untested edge cases that could cause failures
2. Missing validation for critical functions
3. Error handling that needs testing
4. Security-critical code without tests
5. Complex logic without test coverage

DO NOT report on:
- Simple getter/setter testing
- Basic CRUD operations
- Trivial functions

If testing needs are minimal, state \"Basic testing adequate for this code.\"

For each critical gap, specify:
- What needs testing (with line reference)
- Why it's important to test
- One specific test case example",
        ),
        TaskLabel::Documentation => (
            "Review and generate documentation for this code:",
            "Focus on:
1. Missing or unclear function/class documentation
2. API documentation needs
3. Complex logic that needs explanation
4. Architecture decisions that should be documented
5. Usage examples needed
6. Parameter and return value documentation
7. Error states and exceptions

Provide specific documentation improvements and generate missing docs.",
        ),
    }
}
