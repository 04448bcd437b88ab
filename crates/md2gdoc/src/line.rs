use std::io::{self, BufRead};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub number: usize,
}

/// Splits `input` on `\n`, keeping empty lines. A trailing `\r` is dropped so
/// CRLF input classifies the same as LF input.
pub fn split_lines(input: &str) -> Vec<LineRecord> {
    input
        .split('\n')
        .enumerate()
        .map(|(idx, raw)| LineRecord {
            text: raw.strip_suffix('\r').unwrap_or(raw).to_string(),
            number: idx + 1,
        })
        .collect()
}

/// Reads `reader` to the end, line by line. Line endings are dropped the same
/// way [`split_lines`] drops them, including a `\r` on an unterminated last line.
pub fn read_lines<R: BufRead>(reader: &mut R) -> io::Result<Vec<LineRecord>> {
    let mut lines = Vec::new();
    let mut buffer = String::new();

    while reader.read_line(&mut buffer)? > 0 {
        let text = buffer.strip_suffix('\n').unwrap_or(buffer.as_str());
        let text = text.strip_suffix('\r').unwrap_or(text);
        lines.push(LineRecord {
            text: text.to_string(),
            number: lines.len() + 1,
        });
        buffer.clear();
    }

    Ok(lines)
}
