//! Positioned words and row grouping over structured-text geometry.

/// A word assembled from adjacent structured-text characters, with its
/// bounding box in page coordinates (y grows downward).
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub x0: f32,
    pub x1: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Word {
    pub fn mid_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// Horizontal gap (pt) beyond which adjacent characters start a new word.
pub const X_TOLERANCE: f32 = 3.0;

/// Vertical distance (pt) within which two words share a row.
pub const Y_TOLERANCE: f32 = 3.0;

/// Group words into rows by vertical midpoint, top to bottom; within a row,
/// words are ordered left to right.
pub fn group_into_rows(mut words: Vec<Word>) -> Vec<Vec<Word>> {
    words.sort_by(|a, b| a.mid_y().total_cmp(&b.mid_y()));

    let mut rows: Vec<Vec<Word>> = Vec::new();
    for word in words {
        match rows.last_mut() {
            Some(row) if (word.mid_y() - row[0].mid_y()).abs() <= Y_TOLERANCE => row.push(word),
            _ => rows.push(vec![word]),
        }
    }
    for row in &mut rows {
        row.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    }
    rows
}

/// Reading-order text for one page: words joined by spaces, rows by newlines.
pub fn rows_to_text(rows: &[Vec<Word>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) fn word(text: &str, x0: f32, top: f32) -> Word {
    Word {
        text: text.to_string(),
        x0,
        x1: x0 + 20.0,
        top,
        bottom: top + 10.0,
    }
}
