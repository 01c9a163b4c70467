//! Whole-table overview: head, describe, null counts and duplicates.

use super::frame::Table;
use crate::stats::SeriesSummary;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// First look at a freshly loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: Vec<String>,
    /// Leading rows rendered as text.
    pub head: Vec<Vec<String>>,
    /// Summaries of the columns whose non-empty cells are all numeric.
    pub describe: Vec<(String, SeriesSummary)>,
    /// Empty cells per column, in column order.
    pub null_counts: Vec<(String, usize)>,
    pub duplicate_rows: usize,
}

impl DatasetOverview {
    pub fn from_table(table: &Table, head_rows: usize) -> Self {
        let head = table
            .head(head_rows)
            .rows()
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        let mut describe = Vec::new();
        let mut null_counts = Vec::new();
        for (idx, name) in table.columns().iter().enumerate() {
            let cells = table.rows().iter().map(|r| &r[idx]);
            null_counts.push((name.clone(), cells.clone().filter(|c| c.is_empty()).count()));

            let present: Vec<_> = cells.filter(|c| !c.is_empty()).collect();
            let numbers: Option<Vec<f64>> = present.iter().map(|c| c.as_f64()).collect();
            if let Some(numbers) = numbers {
                if let Some(summary) = SeriesSummary::from_values(&numbers) {
                    describe.push((name.clone(), summary));
                }
            }
        }

        Self {
            rows: table.len(),
            columns: table.columns().to_vec(),
            head,
            describe,
            null_counts,
            duplicate_rows: count_duplicates(table),
        }
    }

    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, n)| n).sum()
    }
}

/// Rows identical to an earlier row.
pub fn count_duplicates(table: &Table) -> usize {
    let mut seen = HashSet::new();
    table
        .rows()
        .iter()
        .filter(|row| {
            let key: Vec<String> = row.iter().map(|c| c.fingerprint()).collect();
            !seen.insert(key)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cell::Cell;

    fn sample() -> Table {
        Table::new(
            vec!["Area".to_string(), "Persons".to_string(), "Workers".to_string()],
            vec![
                vec![Cell::from("Total"), Cell::Number(100.0), Cell::Number(40.0)],
                vec![Cell::from("Rural"), Cell::Number(60.0), Cell::Empty],
                vec![Cell::from("Total"), Cell::Number(100.0), Cell::Number(40.0)],
                vec![Cell::from("Urban"), Cell::Number(40.0), Cell::Number(10.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_overview() {
        let overview = DatasetOverview::from_table(&sample(), 2);

        assert_eq!(overview.rows, 4);
        assert_eq!(overview.head.len(), 2);
        assert_eq!(overview.head[0], vec!["Total", "100", "40"]);

        let described: Vec<&str> = overview.describe.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(described, vec!["Persons", "Workers"]);
        assert_eq!(overview.describe[1].1.count, 3);

        assert_eq!(
            overview.null_counts,
            vec![
                ("Area".to_string(), 0),
                ("Persons".to_string(), 0),
                ("Workers".to_string(), 1)
            ]
        );
        assert_eq!(overview.total_nulls(), 1);
        assert_eq!(overview.duplicate_rows, 1);
    }

    #[test]
    fn test_no_duplicates() {
        let table = sample().head(2);
        assert_eq!(count_duplicates(&table), 0);
    }
}
