use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use crate::images;
use crate::records::{CHECKLIST_EVENT_ID, ChecklistEntry, Rating, WorkOrder, WorkOrderStatus, ident};
use crate::store::{Store, TableKind};

#[derive(Debug, Clone)]
pub struct EventInput {
    pub location: String,
    pub element: String,
    pub detector: String,
    pub rating: Rating,
    pub comment: String,
    pub responsible_person: String,
    pub safety_related: bool,
    pub quality_related: bool,
    pub image: Option<Vec<u8>>,
}

// A failed photo never blocks the row; the error rides along for the
// caller to report.
#[derive(Debug, Clone)]
pub enum RecordedEvent {
    Checklist {
        entry: ChecklistEntry,
    },
    WorkOrder {
        order: WorkOrder,
        image_error: Option<String>,
    },
}

impl RecordedEvent {
    pub fn event_id(&self) -> &str {
        match self {
            RecordedEvent::Checklist { entry } => &entry.event_id,
            RecordedEvent::WorkOrder { order, .. } => &order.event_id,
        }
    }
}

pub fn record_event(store: &mut Store, input: EventInput) -> Result<RecordedEvent> {
    record_event_at(store, input, Local::now().naive_local())
}

pub fn record_event_at(
    store: &mut Store,
    input: EventInput,
    now: NaiveDateTime,
) -> Result<RecordedEvent> {
    if !input.rating.is_actionable() {
        let entry = ChecklistEntry {
            event_id: CHECKLIST_EVENT_ID.to_string(),
            location: input.location,
            element: input.element,
            detector: input.detector,
            date: now,
            rating: input.rating,
            comment: input.comment,
        };
        store.checklist.push(entry.clone());
        store.save(TableKind::Checklist)?;
        return Ok(RecordedEvent::Checklist { entry });
    }

    let event_id = ident::next_work_order_id(&store.work_orders);

    let mut image_path = String::new();
    let mut image_error = None;
    if let Some(bytes) = &input.image {
        match images::save_normalized(&store.images_dir(), &event_id, bytes) {
            Ok(path) => image_path = path.display().to_string(),
            Err(err) => image_error = Some(format!("{err:#}")),
        }
    }

    let order = WorkOrder {
        event_id,
        location: input.location,
        element: input.element,
        detector: input.detector,
        date: now,
        rating: input.rating,
        comment: input.comment,
        responsible_person: input.responsible_person,
        expected_repair_date: None,
        actual_repair_date: None,
        image_path,
        safety_related: input.safety_related,
        quality_related: input.quality_related,
        status: WorkOrderStatus::Open,
    };
    store.work_orders.push(order.clone());
    store.save(TableKind::WorkOrders)?;
    Ok(RecordedEvent::WorkOrder { order, image_error })
}
