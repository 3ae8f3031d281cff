//! Table detection from word geometry.
//!
//! Stream-style detection: columns are left edges that align vertically
//! across enough rows; a table is a run of consecutive rows whose words sit
//! on at least two of those columns. No ruling lines are consulted.

use std::collections::BTreeSet;

use pdfsift_core::Table;

use crate::words::Word;

/// Column-edge alignment tolerance (pt).
const COLUMN_TOLERANCE: f32 = 3.0;

/// A left-edge cluster must gather at least this many words, across at least
/// this many distinct rows, to count as a column.
const MIN_WORDS_VERTICAL: usize = 3;

/// Detect tables in one page's rows. Rows must be in reading order.
pub fn detect_tables(rows: &[Vec<Word>]) -> Vec<Table> {
    let columns = column_starts(rows);
    if columns.len() < 2 {
        return Vec::new();
    }

    let mut tables = Vec::new();
    let mut run: Vec<usize> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        if aligned_columns(row, &columns) >= 2 {
            run.push(idx);
        } else {
            flush_run(&mut tables, rows, &run, &columns);
            run.clear();
        }
    }
    flush_run(&mut tables, rows, &run, &columns);
    tables
}

fn flush_run(tables: &mut Vec<Table>, rows: &[Vec<Word>], run: &[usize], columns: &[f32]) {
    if run.len() < 2 {
        return;
    }
    let table_rows = run.iter().map(|&i| row_cells(&rows[i], columns)).collect();
    tables.push(Table::new(table_rows));
}

/// Left edges that align vertically across enough rows to form columns,
/// as the mean x of each qualifying cluster, left to right.
fn column_starts(rows: &[Vec<Word>]) -> Vec<f32> {
    let mut edges: Vec<(f32, usize)> = rows
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().map(move |w| (w.x0, i)))
        .collect();
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut columns = Vec::new();
    let mut cluster: Vec<(f32, usize)> = Vec::new();
    for (x, row) in edges {
        if let Some(&(last_x, _)) = cluster.last() {
            if x - last_x > COLUMN_TOLERANCE {
                push_column(&mut columns, &cluster);
                cluster.clear();
            }
        }
        cluster.push((x, row));
    }
    push_column(&mut columns, &cluster);
    columns
}

fn push_column(columns: &mut Vec<f32>, cluster: &[(f32, usize)]) {
    if cluster.len() < MIN_WORDS_VERTICAL {
        return;
    }
    let distinct_rows: BTreeSet<usize> = cluster.iter().map(|&(_, r)| r).collect();
    if distinct_rows.len() < MIN_WORDS_VERTICAL {
        return;
    }
    columns.push(cluster.iter().map(|&(x, _)| x).sum::<f32>() / cluster.len() as f32);
}

/// How many distinct columns this row's word left edges land on.
fn aligned_columns(row: &[Word], columns: &[f32]) -> usize {
    columns
        .iter()
        .filter(|&&c| row.iter().any(|w| (w.x0 - c).abs() <= COLUMN_TOLERANCE))
        .count()
}

/// One cell per column span; words inside a span are joined with spaces.
fn row_cells(row: &[Word], columns: &[f32]) -> Vec<String> {
    let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
    for word in row {
        cells[column_index(columns, word.x0)].push(word.text.as_str());
    }
    cells.into_iter().map(|words| words.join(" ")).collect()
}

fn column_index(columns: &[f32], x0: f32) -> usize {
    let mut idx = 0;
    for (i, &c) in columns.iter().enumerate() {
        if x0 + COLUMN_TOLERANCE >= c {
            idx = i;
        } else {
            break;
        }
    }
    idx
}
