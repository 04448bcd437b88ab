mod cursor;
mod line;
mod markup;
mod operation;
pub mod wire;

pub use cursor::{step, Cursor, INITIAL_CURSOR};
pub use line::{read_lines, split_lines, LineRecord};
pub use markup::{
    classify_line, CheckboxSlicing, Classified, HeadingLevel, MarkupKind, BULLET_GLYPH,
    CHECKBOX_GLYPH,
};
pub use operation::{text_length, EditOperation, StyleSpec};
pub use wire::BatchUpdate;

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    pub checkbox_slicing: CheckboxSlicing,
}

/// Ordered operations for one document plus the cursor after the last line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub operations: Vec<EditOperation>,
    pub cursor: Cursor,
}

impl Translation {
    pub fn batch_update(&self) -> BatchUpdate {
        BatchUpdate::from_operations(&self.operations)
    }
}

/// Translates markdown text into edit operations. Total over any input.
pub fn translate(markdown: &str, options: TranslateOptions) -> Translation {
    translate_lines(&split_lines(markdown), options)
}

pub fn translate_lines(lines: &[LineRecord], options: TranslateOptions) -> Translation {
    let (cursor, operations) = lines.iter().fold(
        (Cursor::new(), Vec::new()),
        |(cursor, mut operations), line| {
            let classified = classify_line(&line.text, options.checkbox_slicing);
            log::debug!(
                "line {}: {:?} at {}",
                line.number,
                classified.kind,
                cursor.position()
            );
            let (next, emitted) = step(cursor, &classified);
            operations.extend(emitted);
            (next, operations)
        },
    );

    Translation { operations, cursor }
}

pub fn translate_from_reader<R: Read>(
    reader: &mut BufReader<R>,
    options: TranslateOptions,
) -> io::Result<Translation> {
    let lines = read_lines(reader)?;
    Ok(translate_lines(&lines, options))
}

pub fn translate_from_path(path: &Path, options: TranslateOptions) -> io::Result<Translation> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    translate_from_reader(&mut reader, options)
}
