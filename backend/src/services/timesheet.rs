//! Timesheet editing as explicit commands. An edit is staged as pending,
//! written through the repository, then either confirmed or reverted to the
//! last confirmed state with the affected cells marked dirty for reload.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    error::AppError,
    models::attendance::{AttendanceCell, AttendanceRow, CellKey, DetailedCell},
    repositories::AttendanceRepositoryTrait,
};

use super::day_decoder::normalize_entry;

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Writes the same entry into every key.
    Upsert {
        keys: Vec<CellKey>,
        cell: DetailedCell,
    },
    Delete {
        keys: Vec<CellKey>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub upserted: usize,
    pub deleted: usize,
}

/// Confirmed cells of the loaded range plus in-flight edits.
#[derive(Debug, Default)]
pub struct MonthSheet {
    confirmed: BTreeMap<CellKey, DetailedCell>,
    pending: BTreeMap<CellKey, Option<DetailedCell>>,
    dirty: BTreeSet<CellKey>,
}

impl MonthSheet {
    pub fn from_rows(rows: &[AttendanceRow]) -> Self {
        let confirmed = rows
            .iter()
            .filter(|row| !row.is_blank())
            .filter_map(|row| match row.to_cell() {
                AttendanceCell::Detailed(detail) => Some((row.key(), detail)),
                AttendanceCell::Legacy(_) => None,
            })
            .collect();
        Self {
            confirmed,
            ..Self::default()
        }
    }

    /// Pending edits shadow the confirmed value.
    pub fn get(&self, key: &CellKey) -> Option<&DetailedCell> {
        match self.pending.get(key) {
            Some(pending) => pending.as_ref(),
            None => self.confirmed.get(key),
        }
    }

    pub fn confirmed(&self, key: &CellKey) -> Option<&DetailedCell> {
        self.confirmed.get(key)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn dirty(&self) -> impl Iterator<Item = &CellKey> {
        self.dirty.iter()
    }

    /// Clears the dirty marks once the caller has reloaded those cells.
    pub fn take_dirty(&mut self) -> Vec<CellKey> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub async fn execute(
        &mut self,
        command: EditCommand,
        repo: &dyn AttendanceRepositoryTrait,
    ) -> Result<EditOutcome, AppError> {
        let (upserts, deletes) = self.stage(command);
        let keys: Vec<CellKey> = upserts
            .iter()
            .map(AttendanceRow::key)
            .chain(deletes.iter().copied())
            .collect();

        match Self::persist(&upserts, &deletes, repo).await {
            Ok(()) => {
                self.confirm(&keys);
                Ok(EditOutcome {
                    upserted: upserts.len(),
                    deleted: deletes.len(),
                })
            }
            Err(err) => {
                tracing::warn!(cells = keys.len(), error = ?err, "attendance save failed, reverting");
                self.revert(&keys);
                Err(AppError::SaveFailed { dirty: keys })
            }
        }
    }

    /// Blank entries become deletes; a full day of leave drops worked hours.
    fn stage(&mut self, command: EditCommand) -> (Vec<AttendanceRow>, Vec<CellKey>) {
        let mut upserts = Vec::new();
        let mut deletes = Vec::new();

        match command {
            EditCommand::Upsert { keys, cell } => {
                let cell = normalize_entry(cell);
                for key in dedup(keys) {
                    let row = AttendanceRow::from_cell(key, &cell);
                    if row.is_blank() {
                        self.pending.insert(key, None);
                        deletes.push(key);
                    } else {
                        self.pending.insert(key, Some(cell.clone()));
                        upserts.push(row);
                    }
                }
            }
            EditCommand::Delete { keys } => {
                for key in dedup(keys) {
                    self.pending.insert(key, None);
                    deletes.push(key);
                }
            }
        }

        (upserts, deletes)
    }

    async fn persist(
        upserts: &[AttendanceRow],
        deletes: &[CellKey],
        repo: &dyn AttendanceRepositoryTrait,
    ) -> Result<(), AppError> {
        repo.upsert_many(upserts).await?;
        repo.delete_many(deletes).await?;
        Ok(())
    }

    fn confirm(&mut self, keys: &[CellKey]) {
        for key in keys {
            match self.pending.remove(key) {
                Some(Some(cell)) => {
                    self.confirmed.insert(*key, cell);
                }
                Some(None) => {
                    self.confirmed.remove(key);
                }
                None => {}
            }
            self.dirty.remove(key);
        }
    }

    fn revert(&mut self, keys: &[CellKey]) {
        for key in keys {
            self.pending.remove(key);
            self.dirty.insert(*key);
        }
    }
}

fn dedup(keys: Vec<CellKey>) -> BTreeSet<CellKey> {
    keys.into_iter().collect()
}
