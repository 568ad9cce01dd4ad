use anyhow::{Result, bail};

use crate::records::{TableRow, WorkOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    All,
    Named(String),
}

impl ColumnSelector {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("all columns") {
            ColumnSelector::All
        } else {
            ColumnSelector::Named(trimmed.to_string())
        }
    }
}

pub fn search<'a, R: TableRow>(
    rows: &'a [R],
    keyword: &str,
    column: &ColumnSelector,
) -> Result<Vec<&'a R>> {
    let needle = keyword.to_lowercase();
    match column {
        ColumnSelector::All => Ok(rows
            .iter()
            .filter(|row| {
                R::columns()
                    .iter()
                    .any(|col| cell_contains(*row, col, &needle))
            })
            .collect()),
        ColumnSelector::Named(name) => {
            if !R::columns().contains(&name.as_str()) {
                bail!(
                    "unknown column `{name}`; expected one of: {}",
                    R::columns().join(", ")
                );
            }
            Ok(rows
                .iter()
                .filter(|row| cell_contains(*row, name, &needle))
                .collect())
        }
    }
}

// An empty selection selects nothing, it does not mean "everyone".
pub fn filter_by_person<'a>(
    work_orders: &'a [WorkOrder],
    persons: &[String],
) -> Vec<&'a WorkOrder> {
    work_orders
        .iter()
        .filter(|order| persons.iter().any(|p| p == &order.responsible_person))
        .collect()
}

fn cell_contains<R: TableRow>(row: &R, column: &str, needle: &str) -> bool {
    row.cell(column)
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Rating, WorkOrderStatus};
    use chrono::NaiveDate;

    fn order(event_id: &str, comment: &str, person: &str) -> WorkOrder {
        WorkOrder {
            event_id: event_id.to_string(),
            location: "Processing".to_string(),
            element: "Ceilings".to_string(),
            detector: "aya".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            rating: Rating::Degraded,
            comment: comment.to_string(),
            responsible_person: person.to_string(),
            expected_repair_date: None,
            actual_repair_date: None,
            image_path: String::new(),
            safety_related: false,
            quality_related: false,
            status: WorkOrderStatus::Open,
        }
    }

    #[test]
    fn all_columns_match_is_case_insensitive() {
        let rows = vec![
            order("Work Order 1", "Leak above door", "sameh"),
            order("Work Order 2", "paint chipping", "Kaleed"),
        ];
        let hits = search(&rows, "leak", &ColumnSelector::parse("All Columns")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event_id, "Work Order 1");
    }

    #[test]
    fn named_column_ignores_other_cells() {
        let rows = vec![
            order("Work Order 1", "sameh broke it", "Kaleed"),
            order("Work Order 2", "pipe leak", "sameh"),
        ];
        let hits = search(
            &rows,
            "sameh",
            &ColumnSelector::Named("responsible_person".to_string()),
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event_id, "Work Order 2");
    }

    #[test]
    fn unknown_column_is_an_error() {
        let rows = vec![order("Work Order 1", "", "sameh")];
        let err = search(&rows, "x", &ColumnSelector::Named("priority".to_string())).unwrap_err();
        assert!(err.to_string().contains("unknown column `priority`"));
    }

    #[test]
    fn empty_person_selection_selects_nothing() {
        let rows = vec![order("Work Order 1", "", "sameh")];
        assert!(filter_by_person(&rows, &[]).is_empty());
        let hits = filter_by_person(&rows, &["sameh".to_string()]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn person_filter_is_exact_match() {
        let rows = vec![
            order("Work Order 1", "", "sameh"),
            order("Work Order 2", "", "Shehab Ayman"),
        ];
        let hits = filter_by_person(&rows, &["Shehab Ayman".to_string()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event_id, "Work Order 2");
    }
}
