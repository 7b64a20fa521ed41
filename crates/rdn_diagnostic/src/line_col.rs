//! Line/column resolution for error reporting.
//!
//! Builds a table of line-start byte offsets once per source and resolves
//! any byte offset to a 1-based `(line, column)` pair in O(log L) time.

/// Pre-computed line offset table for efficient line/column lookup.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start. `offsets[0]` is always `0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text. O(n) in the source length.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                offsets.push((i + 1) as u32);
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line number containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (line_idx as u32) + 1
    }

    /// 1-based `(line, column)` from a byte offset. Column counts characters,
    /// not bytes, from the start of the line.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_idx = (line - 1) as usize;
        let line_start = self.offsets.get(line_idx).copied().unwrap_or(0) as usize;
        let offset = (offset as usize).min(source.len());

        let col_bytes = &source[line_start..offset];
        let col = u32::try_from(col_bytes.chars().count()).unwrap_or(u32::MAX - 1) + 1;

        (line, col)
    }
}
