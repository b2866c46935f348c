//! Source file and line/column utilities

/// A program source with its line information
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Get the display name (file path or `<repl>`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Convert a byte offset to line and column (1-indexed)
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let col = offset.saturating_sub(line_start) + 1;
        (line + 1, col)
    }

    /// Get a line by number (1-indexed)
    pub fn get_line(&self, line: usize) -> Option<&str> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }

        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .map(|&e| e.saturating_sub(1))
            .unwrap_or(self.content.len());

        Some(&self.content[start..end])
    }
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
