//! In-memory observation table with filtering and grouping.

use super::cell::Cell;
use crate::error::{LoadError, TableError};
use std::collections::{BTreeMap, HashSet};

/// Row selector applied by [`Table::filter`].
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Keep rows whose cell matches `value`.
    Equals { column: String, value: Cell },
    /// Keep rows whose cell matches none of `values`.
    NotIn { column: String, values: Vec<Cell> },
}

impl Predicate {
    pub fn equals(column: impl Into<String>, value: impl Into<Cell>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn not_in<V: Into<Cell>>(column: impl Into<String>, values: Vec<V>) -> Self {
        Predicate::NotIn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn column(&self) -> &str {
        match self {
            Predicate::Equals { column, .. } | Predicate::NotIn { column, .. } => column,
        }
    }

    fn accepts(&self, cell: &Cell) -> bool {
        match self {
            Predicate::Equals { value, .. } => cell.matches(value),
            Predicate::NotIn { values, .. } => !values.iter().any(|v| cell.matches(v)),
        }
    }
}

/// Per-group column sums produced by [`Table::group_sum`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSum {
    pub key: String,
    pub sums: Vec<f64>,
}

/// A rectangular table: named columns, rows of equal width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, checking the header and row widths.
    ///
    /// Rows shorter than the header are padded with [`Cell::Empty`].
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        for (i, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(LoadError::Schema(format!("column {} has an empty header", i + 1)));
            }
            if !seen.insert(name.as_str()) {
                return Err(LoadError::Schema(format!("duplicate column '{}'", name)));
            }
        }

        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(LoadError::Schema(format!(
                    "row {} has {} cells but the header has {}",
                    i + 1,
                    row.len(),
                    width
                )));
            }
            row.resize(width, Cell::Empty);
            padded.push(row);
        }

        Ok(Self {
            columns,
            rows: padded,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// All cells of one column, in row order.
    pub fn cells(&self, name: &str) -> Result<Vec<&Cell>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// A column as numbers. Empty or non-numeric cells are an error.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row[idx].as_f64().ok_or_else(|| TableError::NotNumeric {
                    column: name.to_string(),
                    row: i + 1,
                    found: row[idx].to_string(),
                })
            })
            .collect()
    }

    /// A column rendered as text.
    pub fn text(&self, name: &str) -> Result<Vec<String>, TableError> {
        Ok(self.cells(name)?.into_iter().map(|c| c.to_string()).collect())
    }

    /// Sum of a numeric column, skipping empty cells.
    pub fn sum(&self, name: &str) -> Result<f64, TableError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .try_fold(0.0, |acc, (i, row)| {
                Ok::<f64, TableError>(acc + numeric_or_zero(&row[idx], name, i)?)
            })
    }

    /// Rows satisfying every predicate.
    pub fn filter(&self, predicates: &[Predicate]) -> Result<Table, TableError> {
        let resolved = predicates
            .iter()
            .map(|p| Ok((self.column_index(p.column())?, p)))
            .collect::<Result<Vec<_>, TableError>>()?;

        let rows = self
            .rows
            .iter()
            .filter(|row| resolved.iter().all(|(idx, p)| p.accepts(&row[*idx])))
            .cloned()
            .collect();

        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Group rows by the rendered value of `by` and sum `columns` per group.
    ///
    /// Groups come back sorted by key. Rows with an empty key are dropped and
    /// empty value cells count as zero.
    pub fn group_sum(&self, by: &str, columns: &[&str]) -> Result<Vec<GroupSum>, TableError> {
        let key_idx = self.column_index(by)?;
        let value_idx = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (i, row) in self.rows.iter().enumerate() {
            if row[key_idx].is_empty() {
                continue;
            }
            let sums = groups
                .entry(row[key_idx].to_string())
                .or_insert_with(|| vec![0.0; columns.len()]);
            for (slot, (&idx, name)) in value_idx.iter().zip(columns).enumerate() {
                sums[slot] += numeric_or_zero(&row[idx], name, i)?;
            }
        }

        Ok(groups
            .into_iter()
            .map(|(key, sums)| GroupSum { key, sums })
            .collect())
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

fn numeric_or_zero(cell: &Cell, column: &str, row: usize) -> Result<f64, TableError> {
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.as_f64().ok_or_else(|| TableError::NotNumeric {
        column: column.to_string(),
        row: row + 1,
        found: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let columns = ["State_Code", "Distt_Code", "Age_group", "Main_Workers"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec![1.0.into(), 0.0.into(), "All ages".into(), 100.0.into()],
            vec![1.0.into(), 0.0.into(), "15-19".into(), 30.0.into()],
            vec![1.0.into(), 0.0.into(), "20-24".into(), 70.0.into()],
            vec![2.0.into(), 0.0.into(), "All ages".into(), 50.0.into()],
            vec![2.0.into(), 0.0.into(), "15-19".into(), Cell::Empty],
            vec![2.0.into(), 5.0.into(), "20-24".into(), 20.0.into()],
        ];
        Table::new(columns, rows).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_schema() {
        let dup = vec!["a".to_string(), "a".to_string()];
        assert!(matches!(Table::new(dup, vec![]), Err(LoadError::Schema(_))));

        let wide = Table::new(vec!["a".to_string()], vec![vec![Cell::Empty, Cell::Empty]]);
        assert!(matches!(wide, Err(LoadError::Schema(_))));
    }

    #[test]
    fn test_new_pads_short_rows() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::Number(1.0)]],
        )
        .unwrap();
        assert_eq!(table.rows()[0], vec![Cell::Number(1.0), Cell::Empty]);
    }

    #[test]
    fn test_filter_equals_and_not_in() {
        let table = sample();

        let state_level = table
            .filter(&[
                Predicate::equals("Distt_Code", 0.0),
                Predicate::equals("Age_group", "All ages"),
            ])
            .unwrap();
        assert_eq!(state_level.len(), 2);
        assert_eq!(state_level.numeric("State_Code").unwrap(), vec![1.0, 2.0]);

        let ages = table
            .filter(&[Predicate::not_in("Age_group", vec!["All ages"])])
            .unwrap();
        assert_eq!(ages.len(), 4);
    }

    #[test]
    fn test_filter_unknown_column() {
        let err = sample()
            .filter(&[Predicate::equals("Nope", 1.0)])
            .unwrap_err();
        assert_eq!(err, TableError::ColumnNotFound("Nope".to_string()));
    }

    #[test]
    fn test_numeric_rejects_empty() {
        let err = sample().numeric("Main_Workers").unwrap_err();
        assert!(matches!(err, TableError::NotNumeric { row: 5, .. }));
    }

    #[test]
    fn test_sum_skips_empty() {
        assert_eq!(sample().sum("Main_Workers").unwrap(), 270.0);
    }

    #[test]
    fn test_group_sum_sorted_by_key() {
        let groups = sample()
            .filter(&[Predicate::not_in("Age_group", vec!["All ages"])])
            .unwrap()
            .group_sum("Age_group", &["Main_Workers"])
            .unwrap();

        assert_eq!(
            groups,
            vec![
                GroupSum {
                    key: "15-19".to_string(),
                    sums: vec![30.0]
                },
                GroupSum {
                    key: "20-24".to_string(),
                    sums: vec![90.0]
                },
            ]
        );
    }

    #[test]
    fn test_head() {
        let table = sample();
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(100).len(), table.len());
    }
}
