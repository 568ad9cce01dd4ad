use crate::records::WorkOrder;

pub const WORK_ORDER_PREFIX: &str = "Work Order";

// Derived from the last row in table order, not the maximum. Rows restored
// out of order can repeat an id; carried over from the deployed data.
pub fn next_work_order_id(work_orders: &[WorkOrder]) -> String {
    let counter = match work_orders.last() {
        None => 0,
        Some(last) => trailing_number(&last.event_id),
    };
    format!("{WORK_ORDER_PREFIX} {}", counter.saturating_add(1))
}

// An id that does not end in an integer resets the counter to 0 rather than
// failing; the next id produced is "Work Order 1" again.
fn trailing_number(event_id: &str) -> u64 {
    event_id
        .rsplit(' ')
        .next()
        .and_then(|tail| tail.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Rating, WorkOrderStatus};
    use chrono::NaiveDate;

    fn order(event_id: &str) -> WorkOrder {
        WorkOrder {
            event_id: event_id.to_string(),
            location: "Processing".to_string(),
            element: "Floors".to_string(),
            detector: "inspector".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            rating: Rating::Degraded,
            comment: String::new(),
            responsible_person: "sameh".to_string(),
            expected_repair_date: None,
            actual_repair_date: None,
            image_path: String::new(),
            safety_related: false,
            quality_related: false,
            status: WorkOrderStatus::Open,
        }
    }

    #[test]
    fn empty_table_starts_at_one() {
        assert_eq!(next_work_order_id(&[]), "Work Order 1");
    }

    #[test]
    fn increments_the_last_row_id() {
        let orders = vec![order("Work Order 7")];
        assert_eq!(next_work_order_id(&orders), "Work Order 8");
    }

    #[test]
    fn uses_last_row_not_maximum() {
        let orders = vec![order("Work Order 9"), order("Work Order 3")];
        assert_eq!(next_work_order_id(&orders), "Work Order 4");
    }

    #[test]
    fn unparseable_last_id_falls_back_to_one() {
        let orders = vec![order("Work Order seven")];
        assert_eq!(next_work_order_id(&orders), "Work Order 1");
    }

    #[test]
    fn counter_saturates_instead_of_overflowing() {
        let orders = vec![order("Work Order 18446744073709551615")];
        assert_eq!(
            next_work_order_id(&orders),
            "Work Order 18446744073709551615"
        );
    }
}
