//! Built-in example prompts offered to the user.

pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Create a timer function block that counts down from 10 seconds",
    "Generate a motor control function with start, stop, and emergency stop inputs",
    "Write a PID controller for temperature regulation",
    "Create a traffic light sequence controller with 3 states",
    "Generate a conveyor belt control system with sensors",
    "Write a safety interlock function for industrial equipment",
];

/// Look up an example prompt by zero-based index.
pub fn example(index: usize) -> Option<&'static str> {
    EXAMPLE_PROMPTS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_lookup() {
        assert_eq!(example(2), Some("Write a PID controller for temperature regulation"));
        assert!(example(EXAMPLE_PROMPTS.len()).is_none());
        assert!(EXAMPLE_PROMPTS.iter().all(|p| !p.trim().is_empty()));
    }
}
