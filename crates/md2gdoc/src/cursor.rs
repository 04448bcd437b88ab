use crate::markup::Classified;
use crate::operation::{text_length, EditOperation};

/// Index 0 is not addressable in the target document.
pub const INITIAL_CURSOR: usize = 1;

/// Running insertion offset into the document being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(usize);

impl Cursor {
    pub fn new() -> Self {
        Self(INITIAL_CURSOR)
    }

    pub fn position(self) -> usize {
        self.0
    }

    /// Position after inserting `text` plus its implicit paragraph break.
    pub fn advance(self, text: &str) -> Self {
        Self(self.0 + text_length(text) + 1)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Emits the operations for one classified line and returns the cursor for the
/// next line. Blank lines emit nothing and leave the cursor where it was.
pub fn step(cursor: Cursor, line: &Classified) -> (Cursor, Vec<EditOperation>) {
    if line.is_blank() {
        return (cursor, Vec::new());
    }

    let start = cursor.position();
    let mut operations = vec![EditOperation::InsertText {
        at: start,
        text: line.display.clone(),
    }];

    if let Some(style) = line.kind.style() {
        operations.push(EditOperation::StyleRange {
            start,
            end: start + text_length(&line.display),
            style,
        });
    }

    (cursor.advance(&line.display), operations)
}
