use serde::Serialize;

/// Character style applied over a range of inserted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleSpec {
    pub bold: bool,
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

/// A positional edit against the target document. Offsets are only meaningful
/// after every earlier operation in the same batch has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    /// Insert `text` at `at`. The paragraph break that follows it is implicit.
    InsertText { at: usize, text: String },
    StyleRange {
        start: usize,
        end: usize,
        style: StyleSpec,
    },
}

impl EditOperation {
    pub fn is_insert(&self) -> bool {
        matches!(self, EditOperation::InsertText { .. })
    }
}

/// Length in the units the hosted document indexes by (UTF-16 code units).
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}
