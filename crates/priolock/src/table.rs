use priolock_core::{ProcessInfo, ThreadInfo};

pub struct ProcessTableFormatter {
    pid_width: usize,
    name_width: usize,
}

impl ProcessTableFormatter {
    pub fn new(processes: &[ProcessInfo]) -> Self {
        let name_width = processes
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(16)
            .clamp(4, 50);

        Self {
            pid_width: 8,
            name_width,
        }
    }

    pub fn print_table(&self, processes: &[ProcessInfo]) {
        println!(
            "┌{}┬{}┐",
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.name_width + 2)
        );
        println!(
            "│ {:<pid$} │ {:<name$} │",
            "PID",
            "Name",
            pid = self.pid_width,
            name = self.name_width
        );
        println!(
            "├{}┼{}┤",
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.name_width + 2)
        );
        for process in processes {
            println!(
                "│ {:<pid$} │ {:<name$} │",
                process.pid.as_u32(),
                truncate(&process.name, self.name_width),
                pid = self.pid_width,
                name = self.name_width
            );
        }
        println!(
            "└{}┴{}┘",
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.name_width + 2)
        );
    }
}

pub struct ThreadTableFormatter {
    tid_width: usize,
    priority_width: usize,
    value_width: usize,
}

impl ThreadTableFormatter {
    pub fn new() -> Self {
        Self {
            tid_width: 10,
            priority_width: 14,
            value_width: 8,
        }
    }

    pub fn print_table(&self, threads: &[ThreadInfo]) {
        println!(
            "┌{}┬{}┬{}┐",
            "─".repeat(self.tid_width + 2),
            "─".repeat(self.priority_width + 2),
            "─".repeat(self.value_width + 2)
        );
        println!(
            "│ {:<tid$} │ {:<prio$} │ {:<value$} │",
            "Thread ID",
            "Priority",
            "Value",
            tid = self.tid_width,
            prio = self.priority_width,
            value = self.value_width
        );
        println!(
            "├{}┼{}┼{}┤",
            "─".repeat(self.tid_width + 2),
            "─".repeat(self.priority_width + 2),
            "─".repeat(self.value_width + 2)
        );
        for thread in threads {
            let value = thread
                .raw_value
                .map_or("-".to_string(), |raw| raw.to_string());
            println!(
                "│ {:<tid$} │ {:<prio$} │ {:<value$} │",
                thread.tid,
                truncate(&thread.priority_label(), self.priority_width),
                value,
                tid = self.tid_width,
                prio = self.priority_width,
                value = self.value_width
            );
        }
        println!(
            "└{}┴{}┴{}┘",
            "─".repeat(self.tid_width + 2),
            "─".repeat(self.priority_width + 2),
            "─".repeat(self.value_width + 2)
        );
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 process
/// names.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_pads() {
        assert_eq!(truncate("abc", 5), "abc  ");
    }

    #[test]
    fn test_truncate_long_string_adds_ellipsis() {
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_truncate_handles_multibyte() {
        // Must not panic on non-ASCII boundaries.
        let result = truncate("日本語テキスト", 5);
        assert!(result.ends_with("..."));
    }
}
