use std::collections::HashMap;

use super::model::{CellValue, NumericColumn, TrackTable};

// ---------------------------------------------------------------------------
// Inspection: nulls and duplicates
// ---------------------------------------------------------------------------

/// What the loader noticed about the raw file. Reported, never acted on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inspection {
    /// Null-cell count for every source column, in file column order.
    pub null_counts: Vec<(String, usize)>,
    /// Indices of rows identical to an earlier row.
    pub duplicate_rows: Vec<usize>,
}

impl Inspection {
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, n)| n).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_nulls() == 0 && self.duplicate_rows.is_empty()
    }
}

/// Count null cells per column and find rows repeating an earlier row.
///
/// Rows are compared on every raw cell, including columns the table drops.
pub fn inspect(columns: &[String], rows: &[Vec<CellValue>]) -> Inspection {
    let null_counts = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let nulls = rows
                .iter()
                .filter(|row| row.get(idx).map_or(true, CellValue::is_null))
                .count();
            (name.clone(), nulls)
        })
        .collect();

    let mut first_seen: HashMap<Vec<String>, usize> = HashMap::new();
    let mut duplicate_rows = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let key = row.iter().map(CellValue::to_string).collect();
        if first_seen.insert(key, idx).is_some() {
            duplicate_rows.push(idx);
        }
    }

    Inspection {
        null_counts,
        duplicate_rows,
    }
}

// ---------------------------------------------------------------------------
// Describe: per-column summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// count / mean / std / min / quartiles / max for every numeric column.
pub fn describe(table: &TrackTable) -> Vec<ColumnSummary> {
    NumericColumn::ALL
        .into_iter()
        .map(|column| summarize(column, &table.column(column)))
        .collect()
}

fn summarize(column: NumericColumn, values: &[f64]) -> ColumnSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = mean(&sorted);
    let std = if count > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    ColumnSummary {
        column,
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear-interpolated quantile of already sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient. NaN when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs);
    let my = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Square correlation matrix over [`NumericColumn::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// Row-major, `columns.len()` × `columns.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

/// Pairwise Pearson correlation of every numeric column.
///
/// The diagonal is 1.0 by definition; the upper triangle is mirrored into the
/// lower one so the result is exactly symmetric.
pub fn correlation_matrix(table: &TrackTable) -> CorrelationMatrix {
    let columns = NumericColumn::ALL.to_vec();
    let series: Vec<Vec<f64>> = columns.iter().map(|c| table.column(*c)).collect();
    let n = columns.len();

    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader;
    use crate::data::model::Track;
    use crate::data::test_support::{canonical_dataset, track};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn test_pearson_known_values() {
        assert_close(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_close(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
        assert_close(pearson(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 4.0]), 0.8);
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_correlation_matrix_symmetric_unit_diagonal() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let matrix = correlation_matrix(&table);

        assert_eq!(matrix.len(), 10);
        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), 1.0, "diagonal of {}", matrix.columns[i]);
            for j in 0..matrix.len() {
                let (a, b) = (matrix.get(i, j), matrix.get(j, i));
                assert!(a == b || (a.is_nan() && b.is_nan()));
                if !a.is_nan() {
                    assert!((-1.0..=1.0).contains(&a));
                }
            }
        }
    }

    #[test]
    fn test_correlation_constant_column_keeps_unit_diagonal() {
        // loudness, liveness, valence ... are constant in these fixtures
        let tracks: Vec<Track> = (0..5).map(|i| track("t", "a", "g", i)).collect();
        let table = TrackTable::new(tracks, Inspection::default());
        let matrix = correlation_matrix(&table);

        let loud = NumericColumn::ALL
            .iter()
            .position(|c| *c == NumericColumn::Loudness)
            .expect("loudness column");
        assert_eq!(matrix.get(loud, loud), 1.0);
        assert!(matrix.get(loud, 0).is_nan());
        // bpm and energy move together
        assert_close(matrix.get(0, 1), 1.0);
    }

    #[test]
    fn test_describe_matches_hand_computation() {
        let tracks: Vec<Track> = [0, 1, 2, 3].iter().map(|&b| track("t", "a", "g", b)).collect();
        let table = TrackTable::new(tracks, Inspection::default());
        let summary = describe(&table);

        let pop = summary
            .iter()
            .find(|s| s.column == NumericColumn::Popularity)
            .expect("popularity summary");
        assert_eq!(pop.count, 4);
        assert_close(pop.mean, 81.5);
        assert_close(pop.min, 80.0);
        assert_close(pop.max, 83.0);
        assert_close(pop.median, 81.5);
        assert_close(pop.q25, 80.75);
        assert_close(pop.q75, 82.25);
        assert_close(pop.std, (5.0f64 / 3.0).sqrt());
    }

    #[test]
    fn test_inspect_reports_nulls_and_duplicates() {
        let columns = vec!["Title".to_string(), "Artist".to_string()];
        let rows = vec![
            vec![CellValue::Text("a".into()), CellValue::Null],
            vec![CellValue::Text("b".into()), CellValue::Text("x".into())],
            vec![CellValue::Null],
            vec![CellValue::Text("a".into()), CellValue::Null],
        ];

        let inspection = inspect(&columns, &rows);
        assert_eq!(
            inspection.null_counts,
            vec![("Title".to_string(), 1), ("Artist".to_string(), 3)]
        );
        assert_eq!(inspection.duplicate_rows, vec![3]);
        assert_eq!(inspection.total_nulls(), 4);
        assert!(!inspection.is_clean());
    }
}
