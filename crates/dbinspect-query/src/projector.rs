//! Column to field resolution, computed once per cursor and applied per row.

use dbinspect_core::{Cell, ProjectionError};
use dbinspect_observability::events;

use crate::convert::ConvertError;
use crate::record::{Record, Setter};

enum Slot<R> {
    /// No field matched; the cell is dropped.
    Discard,
    /// Matched a field without a setter; the cell is dropped.
    ReadOnly,
    Write {
        field: &'static str,
        setter: Setter<R>,
    },
}

/// Resolved mapping from cursor columns to the fields of `R`.
///
/// For each column in order, the first not-yet-matched field (in declaration
/// order) accepting it wins. A field with a hint accepts only the hinted
/// column; other fields accept the column equal to their name. Both
/// comparisons ignore case.
pub struct ColumnPlan<R> {
    columns: Vec<String>,
    slots: Vec<Slot<R>>,
}

impl<R: Record> ColumnPlan<R> {
    pub fn build(columns: &[String]) -> Self {
        let bindings = R::bindings();
        let mut matched = vec![false; bindings.len()];
        let mut slots = Vec::with_capacity(columns.len());

        for column in columns {
            let upper = column.to_uppercase();
            let hit = bindings
                .iter()
                .enumerate()
                .find(|(idx, binding)| !matched[*idx] && binding.matches(&upper));

            let slot = match hit {
                None => Slot::Discard,
                Some((idx, binding)) => {
                    matched[idx] = true;
                    match binding.setter {
                        Some(setter) => Slot::Write {
                            field: binding.name,
                            setter,
                        },
                        None => {
                            events::readonly_column_discarded(column, binding.name);
                            Slot::ReadOnly
                        }
                    }
                }
            };
            slots.push(slot);
        }

        Self {
            columns: columns.to_vec(),
            slots,
        }
    }

    /// Field receiving each column, `None` for discarded columns.
    pub fn targets(&self) -> Vec<Option<&'static str>> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Write { field, .. } => Some(*field),
                Slot::Discard | Slot::ReadOnly => None,
            })
            .collect()
    }

    /// Project one row. Any failure rejects the whole row.
    pub fn project(&self, cells: Vec<Cell>) -> Result<R, ProjectionError> {
        if cells.len() != self.slots.len() {
            return Err(ProjectionError::Arity {
                expected: self.slots.len(),
                found: cells.len(),
            });
        }

        let mut record = R::default();
        for ((slot, cell), column) in self.slots.iter().zip(cells).zip(&self.columns) {
            let Slot::Write { field, setter } = slot else {
                continue;
            };
            setter(&mut record, cell).map_err(|err| match err {
                ConvertError::Mismatch { expected, found } => ProjectionError::Conversion {
                    column: column.clone(),
                    field: field.to_string(),
                    expected,
                    found,
                },
                ConvertError::Null => ProjectionError::NullIntoRequired {
                    column: column.clone(),
                    field: field.to_string(),
                },
                ConvertError::Undecodable => ProjectionError::Undecodable {
                    column: column.clone(),
                    field: field.to_string(),
                },
            })?;
        }
        Ok(record)
    }
}
