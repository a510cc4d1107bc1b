//! Offset → line lookup for a single source text.
//!
//! Offsets are character offsets, not byte offsets, so multi-byte text before
//! a node does not shift its line.

/// Precomputed line starts of one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex {
    /// Character offset at which each line starts. Always contains `0`.
    line_starts: Vec<usize>,
}

impl PositionIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        // LF and a lone CR end a line, the way the YAML scanner counts them.
        // A CRLF pair ends one line, at its LF.
        let mut chars = source.chars().enumerate().peekable();
        while let Some((i, c)) = chars.next() {
            let ends_line = match c {
                '\n' => true,
                '\r' => !matches!(chars.peek(), Some((_, '\n'))),
                _ => false,
            };
            if ends_line {
                line_starts.push(i + 1);
            }
        }
        PositionIndex { line_starts }
    }

    /// 1-based line containing the character at `offset`.
    ///
    /// Offsets past the end resolve to the last line.
    pub fn index_to_line(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// Character offset of a 1-based `line` and 0-based `col`.
    ///
    /// Lines past the end resolve to the start of the last line.
    pub fn line_col_to_index(&self, line: usize, col: usize) -> usize {
        let last = self.line_starts.len() - 1;
        match self.line_starts.get(line.saturating_sub(1)) {
            Some(start) => start + col,
            None => self.line_starts[last],
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
