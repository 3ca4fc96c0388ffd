use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::common::collections::HashMap;
use crate::model::workspace::{Workspace, WorkspaceId};
use crate::sys::geometry::Point;
use crate::sys::screen::{Monitor, MonitorId};
use crate::sys::window::WindowId;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkspaceSector {
    pub workspaces: SlotMap<WorkspaceId, Workspace>,
}

/// Window -> workspace and workspace -> monitor assignments. Must always
/// agree with each workspace's own window set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MapSector {
    pub window_to_workspace: HashMap<WindowId, WorkspaceId>,
    pub workspace_to_monitor: HashMap<WorkspaceId, MonitorId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MonitorSector {
    pub monitors: Vec<Monitor>,
}

impl MonitorSector {
    pub fn by_id(&self, id: MonitorId) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == id)
    }

    pub fn at_point(&self, point: Point<i32>) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.contains_point(point))
    }
}

/// One immutable snapshot of the whole store. Sectors are `Arc`-wrapped so
/// a transform that touches only one sector shares the others with the
/// previous generation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RootState {
    pub workspaces: Arc<WorkspaceSector>,
    pub maps: Arc<MapSector>,
    pub monitors: Arc<MonitorSector>,
}

impl RootState {
    pub fn with_monitors(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors: Arc::new(MonitorSector { monitors }),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::{LayoutEngine, Orientation};
    use crate::test_support::single_monitor;

    #[test]
    fn snapshot_round_trips_through_serde() {
        let mut workspaces = WorkspaceSector::default();
        let id = workspaces.workspaces.insert_with_key(|id| {
            Workspace::new(
                id,
                "main".to_owned(),
                vec![LayoutEngine::floating_proxy(LayoutEngine::stack(
                    Orientation::Horizontal,
                ))],
            )
        });
        let state = RootState {
            workspaces: Arc::new(workspaces),
            maps: Arc::new(MapSector::default()),
            monitors: Arc::new(MonitorSector { monitors: vec![single_monitor()] }),
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: RootState = serde_json::from_str(&json).unwrap();

        assert_eq!(back.workspaces.workspaces[id].name, "main");
        assert_eq!(
            back.workspaces.workspaces[id].layout_engines(),
            state.workspaces.workspaces[id].layout_engines()
        );
        assert_eq!(back.monitors.monitors, state.monitors.monitors);
    }
}
