use std::collections::BTreeMap;

use tracing::debug;

use crate::markers::MarkerTable;
use crate::records::CanonicalMapTable;

use super::types::{Action, ReconcileConfig, ReconcileError, ReconcilePlan, ReconcileSummary};

/// Plans the deletes and adds that make `markers` mirror `maps`.
///
/// Deletes of markers without a map come first, followed by one pass over the maps in id
/// order. Dynmap has no in-place move, so a marker at the wrong position is deleted and
/// added again.
pub fn reconcile(
    maps: &CanonicalMapTable,
    markers: &MarkerTable,
    config: &ReconcileConfig,
) -> Result<ReconcilePlan, ReconcileError> {
    let mut actions = Vec::<Action>::new();
    let mut summary = ReconcileSummary::default();

    for marker in markers.iter() {
        if !maps.contains(&marker.id) {
            debug!(marker_id = %marker.id, "marker_without_map_pruned");
            actions.push(Action::Delete {
                id: marker.id.clone(),
            });
            summary.pruned += 1;
        }
    }

    for (map_id, center) in maps.iter() {
        let id = map_id.to_string();
        let wanted = (center.x, config.marker_y, center.z);
        let add = Action::Add {
            id: id.clone(),
            x: center.x,
            y: config.marker_y,
            z: center.z,
        };
        match markers.get(&id) {
            None => {
                actions.push(add);
                summary.added += 1;
            }
            Some(marker) if marker.position() != wanted => {
                debug!(
                    marker_id = %id,
                    from = ?marker.position(),
                    to = ?wanted,
                    "marker_moved"
                );
                actions.push(Action::Delete { id });
                actions.push(add);
                summary.moved += 1;
            }
            Some(_) => summary.unchanged += 1,
        }
    }

    validate_action_sequence(&actions)?;
    Ok(ReconcilePlan { actions, summary })
}

/// Every id may only see `[]`, `[Delete]`, `[Add]` or `[Delete, Add]`.
pub(crate) fn validate_action_sequence(actions: &[Action]) -> Result<(), ReconcileError> {
    let mut per_id = BTreeMap::<&str, Vec<&Action>>::new();
    for action in actions {
        per_id.entry(action.id()).or_default().push(action);
    }

    for (id, sequence) in per_id {
        let allowed = matches!(
            sequence.as_slice(),
            [Action::Delete { .. }]
                | [Action::Add { .. }]
                | [Action::Delete { .. }, Action::Add { .. }]
        );
        if !allowed {
            return Err(ReconcileError::ConflictingActions {
                id: id.to_string(),
                sequence: sequence
                    .iter()
                    .map(|action| action.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }
    Ok(())
}
