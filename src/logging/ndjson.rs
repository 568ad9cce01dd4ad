use crate::records::ChangeLogEntry;
use crate::recorder::RecordedEvent;
use anyhow::Result;
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub fn mirror_recorded(path: &Path, recorded: &RecordedEvent) -> Result<()> {
    let line = match recorded {
        RecordedEvent::Checklist { entry } => json!({
            "ts": entry.date,
            "op": "record",
            "table": "checklist",
            "event": entry.event_id,
            "location": entry.location,
            "element": entry.element,
            "rating": entry.rating
        }),
        RecordedEvent::WorkOrder { order, .. } => json!({
            "ts": order.date,
            "op": "record",
            "table": "work_orders",
            "event": order.event_id,
            "location": order.location,
            "element": order.element,
            "rating": order.rating
        }),
    };
    append_line(path, &line)
}

pub fn mirror_change(path: &Path, entry: &ChangeLogEntry) -> Result<()> {
    let line = json!({
        "ts": entry.modified_at,
        "op": entry.kind,
        "event": entry.event_id,
        "modifier": entry.modifier,
        "new_date": entry.new_date
    });
    append_line(path, &line)
}

fn append_line(path: &Path, line: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{}", line)?;
    Ok(())
}
