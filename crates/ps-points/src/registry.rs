//! Point registration, read/write/publish, and pending-write draining.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{PointError, PointResult};
use crate::point::{Access, PointId, PointValue, WriteRule};

/// One registered point.
#[derive(Debug, Clone)]
pub struct PointEntry {
    pub name: String,
    pub access: Access,
    pub value: PointValue,
    pub rule: WriteRule,
    /// External writes rejected for this point (type, access or rule).
    pub rejected_writes: u64,
}

/// The point registry: the engine's supervisory read/write surface.
///
/// Accepted external writes take effect in two places: the stored value is
/// updated immediately (so reads echo the last accepted write), and the
/// write is queued for the driver loop to apply to the owning model's config
/// at the top of the next cycle.
#[derive(Debug, Default)]
pub struct PointRegistry {
    points: Vec<PointEntry>,
    by_name: HashMap<String, PointId>,
    pending: Vec<(PointId, PointValue)>,
    rejected_total: u64,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a point and return its stable id.
    pub fn register(
        &mut self,
        name: &str,
        access: Access,
        initial: PointValue,
        rule: WriteRule,
    ) -> PointResult<PointId> {
        if self.by_name.contains_key(name) {
            return Err(PointError::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = PointId::new(self.points.len() as u16);
        self.points.push(PointEntry {
            name: name.to_string(),
            access,
            value: initial,
            rule,
            rejected_writes: 0,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Resolve a name to its id. Registration-time / display use only.
    pub fn lookup(&self, name: &str) -> Option<PointId> {
        self.by_name.get(name).copied()
    }

    fn entry(&self, id: PointId) -> PointResult<&PointEntry> {
        self.points
            .get(id.value() as usize)
            .ok_or(PointError::UnknownId { id: id.value() })
    }

    fn entry_mut(&mut self, id: PointId) -> PointResult<&mut PointEntry> {
        self.points
            .get_mut(id.value() as usize)
            .ok_or(PointError::UnknownId { id: id.value() })
    }

    /// Current stored value of a point.
    pub fn read(&self, id: PointId) -> PointResult<PointValue> {
        Ok(self.entry(id)?.value)
    }

    /// External write: validate, store, and queue for the next cycle.
    pub fn write(&mut self, id: PointId, value: PointValue) -> PointResult<()> {
        let idx = id.value() as usize;
        let Some(entry) = self.points.get(idx) else {
            return Err(PointError::UnknownId { id: id.value() });
        };

        let rejection = if entry.access == Access::ReadOnly {
            Some(PointError::ReadOnly {
                name: entry.name.clone(),
            })
        } else if entry.value.kind() != value.kind() {
            Some(PointError::TypeMismatch {
                name: entry.name.clone(),
                expected: entry.value.kind().as_str(),
                got: value.kind().as_str(),
            })
        } else if !entry.rule.allows(&value) {
            Some(PointError::OutOfRange {
                name: entry.name.clone(),
            })
        } else {
            None
        };

        if let Some(err) = rejection {
            self.points[idx].rejected_writes += 1;
            self.rejected_total += 1;
            warn!(%err, "rejected point write");
            return Err(err);
        }

        self.points[idx].value = value;
        self.pending.push((id, value));
        Ok(())
    }

    /// Engine-side publish of a state-backed point. The value kind must match
    /// the registered kind; a mismatch is a wiring bug, not external input.
    pub fn publish(&mut self, id: PointId, value: PointValue) -> PointResult<()> {
        let entry = self.entry_mut(id)?;
        if entry.value.kind() != value.kind() {
            return Err(PointError::TypeMismatch {
                name: entry.name.clone(),
                expected: entry.value.kind().as_str(),
                got: value.kind().as_str(),
            });
        }
        entry.value = value;
        Ok(())
    }

    /// Take all writes accepted since the last drain, in arrival order.
    pub fn drain_pending(&mut self) -> Vec<(PointId, PointValue)> {
        std::mem::take(&mut self.pending)
    }

    /// Rejected-write count for one point.
    pub fn rejected_writes(&self, id: PointId) -> PointResult<u64> {
        Ok(self.entry(id)?.rejected_writes)
    }

    /// Rejected-write count across all points.
    pub fn rejected_total(&self) -> u64 {
        self.rejected_total
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over registered points in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &PointEntry)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, entry)| (PointId::new(i as u16), entry))
    }
}
