//! Two-column side-by-side text layout.
//!
//! Lays a pair of texts out in parallel fixed-width columns so both can be
//! read in one viewport. Long logical lines wrap into continuation rows,
//! and the shorter side of each logical line is padded so the two columns
//! stay aligned row for row.

use thiserror::Error;

/// Errors raised by [`side_by_side`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("delimiter ({delimiter} chars) is wider than the column gutter ({padding} chars)")]
    DelimiterWiderThanGutter { delimiter: usize, padding: usize },

    #[error("total width {total} cannot fit the {required}-character gutter")]
    WidthTooNarrow { total: usize, required: usize },
}

/// Layout knobs for [`side_by_side`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Prefix the first wrapped row of each logical line with its 0-based
    /// line index.
    pub line_numbers: bool,
    /// Width of the gutter between the two columns, in characters.
    pub padding: usize,
    /// Delimiter drawn centered inside the gutter. Must not be wider than
    /// the gutter.
    pub delimiter: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_numbers: false,
            padding: 2,
            delimiter: String::new(),
        }
    }
}

/// Render `left` and `right` side by side within `total_width` characters,
/// prepending `header` verbatim as the first line.
///
/// Both inputs are split on newlines. Line `i` of each side shares a band
/// of output rows: each line is wrapped into chunks of
/// `(total_width - gutter) / 2` characters, and the side with fewer chunks
/// is padded with empty ones so the band stays rectangular. Chunking
/// counts characters, never bytes.
///
/// Pure and deterministic; the caller owns all I/O.
pub fn side_by_side(
    left: &str,
    right: &str,
    total_width: usize,
    header: &str,
    options: &LayoutOptions,
) -> Result<String, LayoutError> {
    let delimiter_len = options.delimiter.chars().count();
    if delimiter_len > options.padding {
        return Err(LayoutError::DelimiterWiderThanGutter {
            delimiter: delimiter_len,
            padding: options.padding,
        });
    }

    let left_lines: Vec<&str> = left.split('\n').collect();
    let right_lines: Vec<&str> = right.split('\n').collect();
    let line_count = left_lines.len().max(right_lines.len());

    // Digit width of the line-number column. The estimate is a natural
    // log, so a single-line pair gets a zero-width column.
    let digits = if options.line_numbers {
        (line_count as f64).ln().ceil() as usize
    } else {
        0
    };

    let required = options.padding + digits;
    let column_width = total_width
        .checked_sub(required)
        .ok_or(LayoutError::WidthTooNarrow {
            total: total_width,
            required,
        })?
        / 2;

    let gutter_left = " ".repeat((options.padding - delimiter_len) / 2);
    let gutter_right = " ".repeat(options.padding - delimiter_len - gutter_left.len());

    let mut out = String::new();
    out.push_str(header);
    out.push('\n');

    for i in 0..line_count {
        let left_chunks = wrap_chunks(left_lines.get(i).copied().unwrap_or(""), column_width);
        let right_chunks = wrap_chunks(right_lines.get(i).copied().unwrap_or(""), column_width);

        let rows = left_chunks.len().max(right_chunks.len());
        for j in 0..rows {
            let l = left_chunks.get(j).map(String::as_str).unwrap_or("");
            let r = right_chunks.get(j).map(String::as_str).unwrap_or("");

            if options.line_numbers {
                // Continuation rows of a wrapped line carry no number.
                let number = if j == 0 { i.to_string() } else { String::new() };
                out.push_str(&format!("{number:<digits$}"));
            }
            out.push_str(&format!("{l:<column_width$}"));
            out.push_str(&gutter_left);
            out.push_str(&options.delimiter);
            out.push_str(&gutter_right);
            out.push_str(&format!("{r:<column_width$}"));
            out.push('\n');
        }
    }

    Ok(out)
}

/// Split `line` into consecutive chunks of at most `width` characters.
/// An empty line yields no chunks at all.
fn wrap_chunks(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        // Degenerate viewport; emit the line unwrapped rather than loop.
        if line.is_empty() {
            return Vec::new();
        }
        return vec![line.to_string()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
