use crate::config;
use crate::lifecycle::{self, UpdateOutcome};
use crate::logging::ndjson;
use crate::query::{self, ColumnSelector};
use crate::recorder::{self, EventInput, RecordedEvent};
use crate::records::{Rating, TableRow, WorkOrder, WorkOrderStatus};
use crate::store::{Store, TableKind, codec};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RecordCommand {
    pub location: String,
    pub element: String,
    pub detector: String,
    pub rating: String,
    pub comment: String,
    pub person: String,
    pub safety: bool,
    pub quality: bool,
    pub image: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub log: Option<PathBuf>,
}

pub fn record_inspection(cmd: RecordCommand) -> Result<()> {
    let rating: Rating = cmd.rating.parse()?;
    let image = cmd
        .image
        .as_deref()
        .map(|path| fs::read(path).with_context(|| format!("read image {}", path.display())))
        .transpose()?;

    let dir = cmd.data_dir.clone().unwrap_or_else(default_data_dir);
    let mut store = Store::open(&dir)?;
    let recorded = recorder::record_event(
        &mut store,
        EventInput {
            location: cmd.location,
            element: cmd.element,
            detector: cmd.detector,
            rating,
            comment: cmd.comment,
            responsible_person: cmd.person,
            safety_related: cmd.safety,
            quality_related: cmd.quality,
            image,
        },
    )?;
    if let Some(path) = cmd.log.as_deref() {
        ndjson::mirror_recorded(path, &recorded)?;
    }

    match &recorded {
        RecordedEvent::Checklist { entry } => {
            println!(
                "Recorded checklist entry for {} / {} (rating {})",
                entry.location, entry.element, entry.rating
            );
        }
        RecordedEvent::WorkOrder { order, image_error } => {
            println!(
                "Opened {} for {} / {} (rating {}, assigned to {})",
                order.event_id,
                order.location,
                order.element,
                order.rating,
                display_person(&order.responsible_person)
            );
            if !order.image_path.is_empty() {
                println!("Image saved to {}", order.image_path);
            }
            if let Some(err) = image_error {
                eprintln!("Image skipped: {err}");
            }
        }
    }
    Ok(())
}

pub fn update_expected_date(
    event_id: &str,
    date: &str,
    modifier: &str,
    data_dir: Option<PathBuf>,
    log: Option<PathBuf>,
) -> Result<()> {
    let date = parse_date(date)?;
    let dir = data_dir.unwrap_or_else(default_data_dir);
    let site = config::load_or_builtin(&dir)?;
    let mut store = Store::open(&dir)?;
    let outcome = lifecycle::set_expected_date(&mut store, &site, event_id, date, modifier)?;
    report_update(outcome, "expected repair date", log.as_deref())
}

pub fn update_actual_date(
    event_id: &str,
    date: &str,
    modifier: &str,
    data_dir: Option<PathBuf>,
    log: Option<PathBuf>,
) -> Result<()> {
    let date = parse_date(date)?;
    let dir = data_dir.unwrap_or_else(default_data_dir);
    let site = config::load_or_builtin(&dir)?;
    let mut store = Store::open(&dir)?;
    let outcome = lifecycle::set_actual_date(&mut store, &site, event_id, date, modifier)?;
    report_update(outcome, "actual repair date", log.as_deref())
}

fn report_update(outcome: UpdateOutcome, what: &str, log: Option<&Path>) -> Result<()> {
    match outcome {
        UpdateOutcome::Updated { order, log: entry } => {
            if let Some(path) = log {
                ndjson::mirror_change(path, &entry)?;
            }
            println!(
                "{}: {what} set to {} by {}",
                order.event_id, entry.new_date, entry.modifier
            );
            if order.status == WorkOrderStatus::Done {
                println!("{} is done; copied to completed work orders", order.event_id);
            }
            Ok(())
        }
        UpdateOutcome::UnknownModifier { modifier } => {
            bail!("modifier `{modifier}` is not a recognized responsible person")
        }
        UpdateOutcome::NotFound { event_id } => {
            bail!("no work order with event id `{event_id}`")
        }
        UpdateOutcome::AlreadyDone { event_id } => {
            bail!("`{event_id}` is already done; completed orders do not change")
        }
    }
}

pub fn list_table(
    table: TableKind,
    persons: Vec<String>,
    open_only: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let store = Store::open(&data_dir.unwrap_or_else(default_data_dir))?;
    if table != TableKind::WorkOrders && (!persons.is_empty() || open_only) {
        bail!("--person and --open only apply to the work-orders table");
    }
    match table {
        TableKind::Checklist => print_rows(&store.checklist),
        TableKind::Completed => print_rows(&store.completed),
        TableKind::ChangeLog => print_rows(&store.change_log),
        TableKind::WorkOrders => {
            let mut rows: Vec<WorkOrder> = if persons.is_empty() {
                store.work_orders.clone()
            } else {
                query::filter_by_person(&store.work_orders, &persons)
                    .into_iter()
                    .cloned()
                    .collect()
            };
            if open_only {
                rows.retain(|order| order.status == WorkOrderStatus::Open);
            }
            print_rows(&rows)
        }
    }
}

pub fn search_table(
    table: TableKind,
    keyword: &str,
    column: &str,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let store = Store::open(&data_dir.unwrap_or_else(default_data_dir))?;
    let column = ColumnSelector::parse(column);
    match table {
        TableKind::Checklist => {
            let rows: Vec<_> = query::search(&store.checklist, keyword, &column)?
                .into_iter()
                .cloned()
                .collect();
            print_rows(&rows)
        }
        TableKind::WorkOrders => {
            let rows: Vec<_> = query::search(&store.work_orders, keyword, &column)?
                .into_iter()
                .cloned()
                .collect();
            print_rows(&rows)
        }
        TableKind::Completed => {
            let rows: Vec<_> = query::search(&store.completed, keyword, &column)?
                .into_iter()
                .cloned()
                .collect();
            print_rows(&rows)
        }
        TableKind::ChangeLog => {
            let rows: Vec<_> = query::search(&store.change_log, keyword, &column)?
                .into_iter()
                .cloned()
                .collect();
            print_rows(&rows)
        }
    }
}

pub fn export_table(table: TableKind, output: PathBuf, data_dir: Option<PathBuf>) -> Result<()> {
    let store = Store::open(&data_dir.unwrap_or_else(default_data_dir))?;
    store.export(table, &output)?;
    println!(
        "Exported {} {} rows to {}",
        store.row_count(table),
        table,
        output.display()
    );
    Ok(())
}

pub fn import_table(table: TableKind, input: PathBuf, data_dir: Option<PathBuf>) -> Result<()> {
    let mut store = Store::open(&data_dir.unwrap_or_else(default_data_dir))?;
    let count = store.import(table, &input)?;
    println!("Imported {count} rows into {table} from {}", input.display());
    Ok(())
}

pub fn clear_table(table: TableKind, data_dir: Option<PathBuf>) -> Result<()> {
    let mut store = Store::open(&data_dir.unwrap_or_else(default_data_dir))?;
    let had = store.row_count(table);
    store.clear(table)?;
    println!("Cleared {table} ({had} rows removed)");
    Ok(())
}

pub fn show_guide(data_dir: Option<PathBuf>) -> Result<()> {
    let dir = data_dir.unwrap_or_else(default_data_dir);
    let site = config::load_or_builtin(&dir)?;
    println!("Locations:");
    for location in &site.locations {
        println!("  - {location}");
    }
    println!();
    println!("Elements:");
    for element in &site.elements {
        println!("  {}:", element.name);
        for prompt in &element.prompts {
            println!("    * {prompt}");
        }
    }
    println!();
    println!("Responsible personnel:");
    for person in &site.personnel {
        println!("  - {person}");
    }
    Ok(())
}

fn print_rows<R: TableRow + Serialize>(rows: &[R]) -> Result<()> {
    print!("{}", codec::to_csv_string(rows)?);
    Ok(())
}

fn display_person(person: &str) -> &str {
    if person.is_empty() { "(unassigned)" } else { person }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("parse date `{raw}`; expected YYYY-MM-DD"))
}

fn default_data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("upkeep");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("upkeep");
    }
    PathBuf::from(".upkeep")
}
