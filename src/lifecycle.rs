use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::config::SiteConfig;
use crate::records::{ChangeKind, ChangeLogEntry, WorkOrder, WorkOrderStatus};
use crate::store::{Store, TableKind};

// Rejections are values, not errors: nothing is mutated or saved unless
// the outcome is Updated.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated {
        order: WorkOrder,
        log: ChangeLogEntry,
    },
    UnknownModifier { modifier: String },
    NotFound { event_id: String },
    AlreadyDone { event_id: String },
}

pub fn set_expected_date(
    store: &mut Store,
    site: &SiteConfig,
    event_id: &str,
    date: NaiveDate,
    modifier: &str,
) -> Result<UpdateOutcome> {
    set_expected_date_at(
        store,
        site,
        event_id,
        date,
        modifier,
        Local::now().naive_local(),
    )
}

pub fn set_expected_date_at(
    store: &mut Store,
    site: &SiteConfig,
    event_id: &str,
    date: NaiveDate,
    modifier: &str,
    now: NaiveDateTime,
) -> Result<UpdateOutcome> {
    let idx = match locate_open(store, site, event_id, modifier) {
        Ok(idx) => idx,
        Err(outcome) => return Ok(outcome),
    };

    store.work_orders[idx].expected_repair_date = Some(date);
    let order = store.work_orders[idx].clone();
    store.save(TableKind::WorkOrders)?;

    let log = append_log(store, event_id, modifier, now, ChangeKind::ExpectedDate, date)?;
    Ok(UpdateOutcome::Updated { order, log })
}

pub fn set_actual_date(
    store: &mut Store,
    site: &SiteConfig,
    event_id: &str,
    date: NaiveDate,
    modifier: &str,
) -> Result<UpdateOutcome> {
    set_actual_date_at(
        store,
        site,
        event_id,
        date,
        modifier,
        Local::now().naive_local(),
    )
}

// The terminal transition: the order flips to Done and a full copy of the
// finished row is appended to the completed table. The original row stays.
pub fn set_actual_date_at(
    store: &mut Store,
    site: &SiteConfig,
    event_id: &str,
    date: NaiveDate,
    modifier: &str,
    now: NaiveDateTime,
) -> Result<UpdateOutcome> {
    let idx = match locate_open(store, site, event_id, modifier) {
        Ok(idx) => idx,
        Err(outcome) => return Ok(outcome),
    };

    store.work_orders[idx].actual_repair_date = Some(date);
    store.work_orders[idx].status = WorkOrderStatus::Done;
    let order = store.work_orders[idx].clone();
    store.completed.push(order.clone());
    store.save(TableKind::WorkOrders)?;
    store.save(TableKind::Completed)?;

    let log = append_log(store, event_id, modifier, now, ChangeKind::ActualDate, date)?;
    Ok(UpdateOutcome::Updated { order, log })
}

// Gate order mirrors the intake flow: the modifier is checked before
// the order is even looked up.
fn locate_open(
    store: &Store,
    site: &SiteConfig,
    event_id: &str,
    modifier: &str,
) -> std::result::Result<usize, UpdateOutcome> {
    if !site.has_person(modifier) {
        return Err(UpdateOutcome::UnknownModifier {
            modifier: modifier.to_string(),
        });
    }
    let Some(idx) = store
        .work_orders
        .iter()
        .position(|order| order.event_id == event_id)
    else {
        return Err(UpdateOutcome::NotFound {
            event_id: event_id.to_string(),
        });
    };
    if store.work_orders[idx].status == WorkOrderStatus::Done {
        return Err(UpdateOutcome::AlreadyDone {
            event_id: event_id.to_string(),
        });
    }
    Ok(idx)
}

fn append_log(
    store: &mut Store,
    event_id: &str,
    modifier: &str,
    now: NaiveDateTime,
    kind: ChangeKind,
    new_date: NaiveDate,
) -> Result<ChangeLogEntry> {
    let log = ChangeLogEntry {
        event_id: event_id.to_string(),
        modifier: modifier.to_string(),
        modified_at: now,
        kind,
        new_date,
    };
    store.change_log.push(log.clone());
    store.save(TableKind::ChangeLog)?;
    Ok(log)
}
