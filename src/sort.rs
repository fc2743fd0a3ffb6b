// ↕️ Sorter
// Stable total order: index ascending, then date ascending, missing last

use crate::temporal::{TypedRow, TypedTable};
use std::cmp::Ordering;

/// Present values first (ascending), missing values after
fn cmp_missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_rows(a: &TypedRow, b: &TypedRow) -> Ordering {
    cmp_missing_last(a.index, b.index, f64::total_cmp)
        .then_with(|| cmp_missing_last(a.date, b.date, Ord::cmp))
}

/// Reorder rows; equal keys keep their arrival order and no row is dropped
pub fn sort_table(mut table: TypedTable) -> TypedTable {
    // Vec::sort_by is stable
    table.rows.sort_by(compare_rows);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::merge::MergedRow;
    use chrono::NaiveDate;

    fn row(tag: &str, index: Option<f64>, date: Option<(i32, u32, u32)>) -> TypedRow {
        TypedRow {
            row: MergedRow {
                cells: vec![Cell::text(tag)],
                company: String::new(),
                bank: String::new(),
            },
            index,
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    fn tags(table: &TypedTable) -> Vec<String> {
        table
            .rows
            .iter()
            .map(|r| r.row.cells[0].as_text().into_owned())
            .collect()
    }

    fn typed(rows: Vec<TypedRow>, date_column: Option<usize>) -> TypedTable {
        TypedTable {
            rows,
            width: 1,
            date_column,
        }
    }

    #[test]
    fn test_stable_with_missing_last() {
        let table = typed(
            vec![
                row("three", Some(3.0), None),
                row("one-a", Some(1.0), None),
                row("missing", None, None),
                row("one-b", Some(1.0), None),
            ],
            None,
        );

        let sorted = sort_table(table);
        assert_eq!(tags(&sorted), vec!["one-a", "one-b", "three", "missing"]);
    }

    #[test]
    fn test_date_breaks_ties() {
        let table = typed(
            vec![
                row("no-date", Some(1.0), None),
                row("march", Some(1.0), Some((2024, 3, 1))),
                row("jan", Some(1.0), Some((2024, 1, 15))),
                row("zero", Some(0.0), Some((2030, 1, 1))),
            ],
            Some(1),
        );

        let sorted = sort_table(table);
        assert_eq!(tags(&sorted), vec!["zero", "jan", "march", "no-date"]);
    }

    #[test]
    fn test_sort_keeps_every_row() {
        let rows: Vec<TypedRow> = (0..20)
            .map(|i| row(&i.to_string(), if i % 3 == 0 { None } else { Some((i % 4) as f64) }, None))
            .collect();
        let sorted = sort_table(typed(rows, None));

        let mut seen = tags(&sorted);
        seen.sort();
        let mut expected: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}
