//! Pure read-only queries over a [`RootState`] snapshot. Pickers never
//! mutate and are safe to evaluate from any number of readers concurrently
//! against the same snapshot.

use crate::model::error::StoreError;
use crate::model::state::RootState;
use crate::model::workspace::{Workspace, WorkspaceId};
use crate::sys::geometry::Point;
use crate::sys::screen::{Monitor, MonitorId};
use crate::sys::window::WindowId;

pub fn workspace_by_id(state: &RootState, id: WorkspaceId) -> Result<&Workspace, StoreError> {
    state
        .workspaces
        .workspaces
        .get(id)
        .ok_or(StoreError::WorkspaceNotFound(id))
}

pub fn workspace_by_name<'a>(
    state: &'a RootState,
    name: &str,
) -> Result<&'a Workspace, StoreError> {
    state
        .workspaces
        .workspaces
        .values()
        .find(|ws| ws.name == name)
        .ok_or_else(|| StoreError::NoWorkspaceNamed(name.to_owned()))
}

pub fn workspace_by_window(
    state: &RootState,
    window: WindowId,
) -> Result<&Workspace, StoreError> {
    let id = state
        .maps
        .window_to_workspace
        .get(&window)
        .copied()
        .ok_or(StoreError::NoValidWindow(window))?;
    workspace_by_id(state, id)
}

pub fn workspace_for_monitor(
    state: &RootState,
    monitor: MonitorId,
) -> Result<&Workspace, StoreError> {
    let id = state
        .maps
        .workspace_to_monitor
        .iter()
        .find(|&(_, &m)| m == monitor)
        .map(|(&ws, _)| ws)
        .ok_or(StoreError::NoWorkspaceForMonitor(monitor))?;
    workspace_by_id(state, id)
}

pub fn monitor_by_id(state: &RootState, id: MonitorId) -> Result<&Monitor, StoreError> {
    state.monitors.by_id(id).ok_or(StoreError::MonitorNotFound(id))
}

pub fn monitor_at_point(state: &RootState, point: Point<i32>) -> Result<&Monitor, StoreError> {
    state
        .monitors
        .at_point(point)
        .ok_or(StoreError::NoMonitorFoundAtPoint(point))
}

pub fn monitor_for_workspace(
    state: &RootState,
    workspace: WorkspaceId,
) -> Result<&Monitor, StoreError> {
    let id = state
        .maps
        .workspace_to_monitor
        .get(&workspace)
        .copied()
        .ok_or(StoreError::WorkspaceNotFound(workspace))?;
    monitor_by_id(state, id)
}

/// Every tracked window paired with the workspace that owns it.
pub fn all_windows(state: &RootState) -> impl Iterator<Item = (WindowId, WorkspaceId)> + '_ {
    state.maps.window_to_workspace.iter().map(|(&w, &ws)| (w, ws))
}
