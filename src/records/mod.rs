pub mod ident;

use anyhow::bail;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CHECKLIST_EVENT_ID: &str = "check";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "0")]
    Good,
    #[serde(rename = "1")]
    Moderate,
    #[serde(rename = "2")]
    Degraded,
    #[serde(rename = "3")]
    Serious,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Rating {
    pub fn is_actionable(&self) -> bool {
        matches!(self, Rating::Moderate | Rating::Degraded | Rating::Serious)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = match self {
            Rating::Good => "0",
            Rating::Moderate => "1",
            Rating::Degraded => "2",
            Rating::Serious => "3",
            Rating::NotApplicable => "N/A",
        };
        f.write_str(wire)
    }
}

impl FromStr for Rating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Rating::Good),
            "1" => Ok(Rating::Moderate),
            "2" => Ok(Rating::Degraded),
            "3" => Ok(Rating::Serious),
            "N/A" | "n/a" | "NA" | "na" => Ok(Rating::NotApplicable),
            other => bail!("invalid rating `{other}`; expected 0, 1, 2, 3 or N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    Open,
    Done,
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkOrderStatus::Open => f.write_str("Open"),
            WorkOrderStatus::Done => f.write_str("Done"),
        }
    }
}

// Wire strings kept verbatim from the deployed change logs so old exports
// keep importing cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "update Expected repair Date")]
    ExpectedDate,
    #[serde(rename = "update Actual Repair Date")]
    ActualDate,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::ExpectedDate => f.write_str("update Expected repair Date"),
            ChangeKind::ActualDate => f.write_str("update Actual Repair Date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub event_id: String,
    pub location: String,
    pub element: String,
    pub detector: String,
    #[serde(deserialize_with = "de_naive_datetime")]
    pub date: NaiveDateTime,
    pub rating: Rating,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub event_id: String,
    pub location: String,
    pub element: String,
    pub detector: String,
    #[serde(deserialize_with = "de_naive_datetime")]
    pub date: NaiveDateTime,
    pub rating: Rating,
    pub comment: String,
    pub responsible_person: String,
    pub expected_repair_date: Option<NaiveDate>,
    pub actual_repair_date: Option<NaiveDate>,
    pub image_path: String,
    pub safety_related: bool,
    pub quality_related: bool,
    pub status: WorkOrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub event_id: String,
    pub modifier: String,
    #[serde(deserialize_with = "de_naive_datetime")]
    pub modified_at: NaiveDateTime,
    pub kind: ChangeKind,
    pub new_date: NaiveDate,
}

pub trait TableRow {
    fn columns() -> &'static [&'static str];
    fn cell(&self, column: &str) -> Option<String>;
}

impl TableRow for ChecklistEntry {
    fn columns() -> &'static [&'static str] {
        &[
            "event_id",
            "location",
            "element",
            "detector",
            "date",
            "rating",
            "comment",
        ]
    }

    fn cell(&self, column: &str) -> Option<String> {
        let value = match column {
            "event_id" => self.event_id.clone(),
            "location" => self.location.clone(),
            "element" => self.element.clone(),
            "detector" => self.detector.clone(),
            "date" => timestamp_cell(self.date),
            "rating" => self.rating.to_string(),
            "comment" => self.comment.clone(),
            _ => return None,
        };
        Some(value)
    }
}

impl TableRow for WorkOrder {
    fn columns() -> &'static [&'static str] {
        &[
            "event_id",
            "location",
            "element",
            "detector",
            "date",
            "rating",
            "comment",
            "responsible_person",
            "expected_repair_date",
            "actual_repair_date",
            "image_path",
            "safety_related",
            "quality_related",
            "status",
        ]
    }

    fn cell(&self, column: &str) -> Option<String> {
        let value = match column {
            "event_id" => self.event_id.clone(),
            "location" => self.location.clone(),
            "element" => self.element.clone(),
            "detector" => self.detector.clone(),
            "date" => timestamp_cell(self.date),
            "rating" => self.rating.to_string(),
            "comment" => self.comment.clone(),
            "responsible_person" => self.responsible_person.clone(),
            "expected_repair_date" => date_cell(self.expected_repair_date),
            "actual_repair_date" => date_cell(self.actual_repair_date),
            "image_path" => self.image_path.clone(),
            "safety_related" => self.safety_related.to_string(),
            "quality_related" => self.quality_related.to_string(),
            "status" => self.status.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

impl TableRow for ChangeLogEntry {
    fn columns() -> &'static [&'static str] {
        &["event_id", "modifier", "modified_at", "kind", "new_date"]
    }

    fn cell(&self, column: &str) -> Option<String> {
        let value = match column {
            "event_id" => self.event_id.clone(),
            "modifier" => self.modifier.clone(),
            "modified_at" => timestamp_cell(self.modified_at),
            "kind" => self.kind.to_string(),
            "new_date" => self.new_date.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

// Same rendering the serde round trip uses, so search terms match what
// the table files actually show.
fn timestamp_cell(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn de_naive_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_naive_datetime(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_naive_datetime(raw: &str) -> anyhow::Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::from_str(raw) {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    bail!("unrecognized timestamp `{raw}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_wire_forms_round_trip() {
        for (text, rating) in [
            ("0", Rating::Good),
            ("1", Rating::Moderate),
            ("2", Rating::Degraded),
            ("3", Rating::Serious),
            ("N/A", Rating::NotApplicable),
        ] {
            assert_eq!(text.parse::<Rating>().unwrap(), rating);
            assert_eq!(rating.to_string(), text);
        }
        assert_eq!("n/a".parse::<Rating>().unwrap(), Rating::NotApplicable);
        assert!("4".parse::<Rating>().is_err());
    }

    #[test]
    fn only_ratings_one_to_three_are_actionable() {
        assert!(!Rating::Good.is_actionable());
        assert!(!Rating::NotApplicable.is_actionable());
        assert!(Rating::Moderate.is_actionable());
        assert!(Rating::Degraded.is_actionable());
        assert!(Rating::Serious.is_actionable());
    }

    #[test]
    fn naive_datetime_parse_accepts_common_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_naive_datetime("2024-05-01T10:30:00").unwrap(), expected);
        assert_eq!(parse_naive_datetime("2024-05-01 10:30:00").unwrap(), expected);
        assert_eq!(
            parse_naive_datetime("2024-05-01T12:30:00+02:00").unwrap(),
            expected
        );
        assert!(parse_naive_datetime("yesterday").is_err());
    }
}
