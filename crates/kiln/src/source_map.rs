//! Byte offset to line/column mapping for build files.

/// Start offsets of every line in a source text.
///
/// Lines and columns are 1-based; columns count characters, not bytes, so a
/// location points at the same place an editor shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Index the lines of `source`.
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column of a byte offset.
    ///
    /// Returns `None` if `offset` lies beyond the end of the source or inside
    /// a multi-byte character.
    pub fn position(&self, source: &str, offset: usize) -> Option<(u32, u32)> {
        if offset > self.len || !source.is_char_boundary(offset) {
            return None;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = source[line_start..offset].chars().count();
        Some((to_u32(line + 1)?, to_u32(column + 1)?))
    }

    /// Byte offset of a 1-based line and character column.
    ///
    /// Columns past the end of the line clamp to the line end.
    pub fn offset(&self, source: &str, line: u32, column: u32) -> Option<usize> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map_or(self.len, |next| next.saturating_sub(1));
        let text = source.get(start..end)?;
        let skip = usize::try_from(column).ok()?.saturating_sub(1);
        let within = text
            .char_indices()
            .nth(skip)
            .map_or(text.len(), |(i, _)| i);
        Some(start + within)
    }
}

fn to_u32(value: usize) -> Option<u32> {
    u32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "<project>\n  <echo message=\"héllo\"/>\n</project>\n";

    #[test]
    fn test_line_count() {
        assert_eq!(LineIndex::new(SOURCE).line_count(), 4);
        assert_eq!(LineIndex::new("").line_count(), 1);
    }

    #[test]
    fn test_position_of_line_starts() {
        let index = LineIndex::new(SOURCE);

        assert_eq!(index.position(SOURCE, 0), Some((1, 1)));
        assert_eq!(index.position(SOURCE, 10), Some((2, 1)));
        assert_eq!(index.position(SOURCE, 12), Some((2, 3)));
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new(SOURCE);
        let after = SOURCE.find("llo").unwrap();

        // `é` is two bytes but one column
        assert_eq!(index.position(SOURCE, after), Some((2, 20)));
    }

    #[test]
    fn test_position_out_of_range() {
        let index = LineIndex::new(SOURCE);

        assert_eq!(index.position(SOURCE, SOURCE.len()), Some((4, 1)));
        assert_eq!(index.position(SOURCE, SOURCE.len() + 1), None);
        let inside_char = SOURCE.find('é').unwrap() + 1;
        assert_eq!(index.position(SOURCE, inside_char), None);
    }

    #[test]
    fn test_offset_is_inverse_of_position() {
        let index = LineIndex::new(SOURCE);

        for offset in [0, 10, 12, SOURCE.find("llo").unwrap(), SOURCE.len()] {
            let (line, column) = index.position(SOURCE, offset).unwrap();
            assert_eq!(index.offset(SOURCE, line, column), Some(offset));
        }
    }

    #[test]
    fn test_offset_clamps_long_columns() {
        let index = LineIndex::new(SOURCE);

        assert_eq!(index.offset(SOURCE, 1, 80), Some(9));
        assert_eq!(index.offset(SOURCE, 9, 1), None);
        assert_eq!(index.offset(SOURCE, 0, 1), None);
    }
}
