/// Abstraction over user-facing output.
///
/// Command modules use this trait instead of `println!`/`eprintln!` so that
/// output can be captured in tests or silenced when only the exit code
/// matters.
pub trait UserOutput: Send + Sync {
    /// Informational status message (e.g., "Validating compose.yml...")
    fn status(&self, message: &str);

    /// Success message (e.g., "Recipe is valid")
    fn success(&self, message: &str);

    /// Warning message (e.g., "Unsupported key 'networks' is ignored")
    fn warning(&self, message: &str);

    /// Error message
    fn error(&self, message: &str);

    /// A blank line separator.
    fn blank(&self);
}

/// Standard CLI output: stdout/stderr with ANSI colors.
pub struct CliOutput;

impl UserOutput for CliOutput {
    fn status(&self, message: &str) {
        println!("{}", message);
    }

    fn success(&self, message: &str) {
        println!("\x1b[32m{}\x1b[0m", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("\x1b[33mWarning: {}\x1b[0m", message);
    }

    fn error(&self, message: &str) {
        eprintln!("\x1b[31m{}\x1b[0m", message);
    }

    fn blank(&self) {
        println!();
    }
}

#[cfg(test)]
pub mod testing {
    use super::UserOutput;
    use std::sync::Mutex;

    /// Records every message, prefixed with its kind.
    #[derive(Default)]
    pub struct RecordingOutput {
        pub lines: Mutex<Vec<String>>,
    }

    impl RecordingOutput {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        fn push(&self, kind: &str, message: &str) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("{}: {}", kind, message));
        }
    }

    impl UserOutput for RecordingOutput {
        fn status(&self, message: &str) {
            self.push("status", message);
        }
        fn success(&self, message: &str) {
            self.push("success", message);
        }
        fn warning(&self, message: &str) {
            self.push("warning", message);
        }
        fn error(&self, message: &str) {
            self.push("error", message);
        }
        fn blank(&self) {
            self.push("blank", "");
        }
    }
}
