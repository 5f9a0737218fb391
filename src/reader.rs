/// A one-based line/column position inside the parsed text. Columns count
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub(crate) fn from_index(mut i: usize, data: &[u8]) -> Self {
        // i must not exceed the length of data
        i = i.min(data.len());
        let mut position = Position { line: 1, column: 1 };
        for ch in &data[..i] {
            match *ch {
                b'\n' => {
                    position.line += 1;
                    position.column = 1;
                }
                // UTF-8 continuation byte
                0x80..=0xBF => {}
                _ => {
                    position.column += 1;
                }
            }
        }
        position
    }
}

/// Byte offset of `sub` inside `root`. `sub` must be a subslice of `root`.
#[inline]
pub(crate) fn offset_in(root: &str, sub: &str) -> usize {
    let start = root.as_ptr() as usize;
    (sub.as_ptr() as usize).saturating_sub(start).min(root.len())
}
