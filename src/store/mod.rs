pub mod codec;

use anyhow::{Context, Result, bail};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::records::{ChangeLogEntry, ChecklistEntry, WorkOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Checklist,
    WorkOrders,
    Completed,
    ChangeLog,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Checklist,
        TableKind::WorkOrders,
        TableKind::Completed,
        TableKind::ChangeLog,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Checklist => "checklist.csv",
            TableKind::WorkOrders => "work_orders.csv",
            TableKind::Completed => "completed_work_orders.csv",
            TableKind::ChangeLog => "change_log.csv",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Checklist => "checklist",
            TableKind::WorkOrders => "work orders",
            TableKind::Completed => "completed work orders",
            TableKind::ChangeLog => "change log",
        };
        write!(f, "{name}")
    }
}

// Every mutation saves the touched table immediately; the files on disk
// never lag the in-memory rows by more than the call that changed them.
#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    pub checklist: Vec<ChecklistEntry>,
    pub work_orders: Vec<WorkOrder>,
    pub completed: Vec<WorkOrder>,
    pub change_log: Vec<ChangeLogEntry>,
}

impl Store {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create data dir {}", dir.display()))?;
        Ok(Self {
            checklist: codec::read_table(&dir.join(TableKind::Checklist.file_name()))?,
            work_orders: codec::read_table(&dir.join(TableKind::WorkOrders.file_name()))?,
            completed: codec::read_table(&dir.join(TableKind::Completed.file_name()))?,
            change_log: codec::read_table(&dir.join(TableKind::ChangeLog.file_name()))?,
            dir: dir.to_path_buf(),
        })
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dir.join("images")
    }

    pub fn table_path(&self, table: TableKind) -> PathBuf {
        self.dir.join(table.file_name())
    }

    pub fn row_count(&self, table: TableKind) -> usize {
        match table {
            TableKind::Checklist => self.checklist.len(),
            TableKind::WorkOrders => self.work_orders.len(),
            TableKind::Completed => self.completed.len(),
            TableKind::ChangeLog => self.change_log.len(),
        }
    }

    pub fn save(&self, table: TableKind) -> Result<()> {
        let path = self.table_path(table);
        match table {
            TableKind::Checklist => codec::write_table(&path, &self.checklist),
            TableKind::WorkOrders => codec::write_table(&path, &self.work_orders),
            TableKind::Completed => codec::write_table(&path, &self.completed),
            TableKind::ChangeLog => codec::write_table(&path, &self.change_log),
        }
        .with_context(|| format!("save {table} table to {}", path.display()))
    }

    pub fn export(&self, table: TableKind, dest: &Path) -> Result<()> {
        match table {
            TableKind::Checklist => codec::write_table(dest, &self.checklist),
            TableKind::WorkOrders => codec::write_table(dest, &self.work_orders),
            TableKind::Completed => codec::write_table(dest, &self.completed),
            TableKind::ChangeLog => codec::write_table(dest, &self.change_log),
        }
        .with_context(|| format!("export {table} table to {}", dest.display()))
    }

    pub fn import(&mut self, table: TableKind, src: &Path) -> Result<usize> {
        if !src.exists() {
            bail!("import source {} does not exist", src.display());
        }
        let count = match table {
            TableKind::Checklist => {
                self.checklist = codec::read_table(src)?;
                self.checklist.len()
            }
            TableKind::WorkOrders => {
                self.work_orders = codec::read_table(src)?;
                self.work_orders.len()
            }
            TableKind::Completed => {
                self.completed = codec::read_table(src)?;
                self.completed.len()
            }
            TableKind::ChangeLog => {
                self.change_log = codec::read_table(src)?;
                self.change_log.len()
            }
        };
        self.save(table)?;
        Ok(count)
    }

    pub fn clear(&mut self, table: TableKind) -> Result<()> {
        match table {
            TableKind::Checklist => self.checklist.clear(),
            TableKind::WorkOrders => self.work_orders.clear(),
            TableKind::Completed => self.completed.clear(),
            TableKind::ChangeLog => self.change_log.clear(),
        }
        self.save(table)
    }
}
