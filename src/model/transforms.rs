use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout_engine::{CustomAction, Direction, Edges, LayoutEngine, Orientation};
use crate::model::error::StoreError;
use crate::model::pickers;
use crate::model::state::{MapSector, RootState, WorkspaceSector};
use crate::model::workspace::{Workspace, WorkspaceId};
use crate::sys::geometry::Point;
use crate::sys::providers::EngineCtx;
use crate::sys::screen::MonitorId;
use crate::sys::window::WindowId;

/// An atomic, validated state change. Execution reads the current snapshot
/// and either produces a whole new one or fails with a typed error leaving
/// the old snapshot untouched; partial application is forbidden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transform {
    CreateWorkspace {
        name: String,
        engines: Vec<LayoutEngine>,
        monitor: MonitorId,
    },
    AddWindow {
        window: WindowId,
        workspace: WorkspaceId,
    },
    RemoveWindow {
        window: WindowId,
    },
    MoveWindowToWorkspace {
        window: WindowId,
        workspace: WorkspaceId,
    },
    MoveWindowToPoint {
        window: WindowId,
        point: Point<f64>,
    },
    /// Deltas are in device pixels; they are normalized against the working
    /// area of the monitor the window's new rectangle lands on. A resize
    /// that drags the window onto another monitor migrates it to that
    /// monitor's workspace first.
    MoveWindowEdgesInDirection {
        edges: Edges,
        pixel_deltas: Point<i32>,
        window: WindowId,
    },
    SwapWindowInDirection {
        workspace: WorkspaceId,
        window: WindowId,
        direction: Direction,
    },
    FocusWindowInDirection {
        workspace: WorkspaceId,
        window: WindowId,
        direction: Direction,
    },
    ActivateNextLayoutEngine {
        workspace: WorkspaceId,
    },
    ActivatePrevLayoutEngine {
        workspace: WorkspaceId,
    },
    PerformCustomAction {
        workspace: WorkspaceId,
        action: CustomAction,
    },
    /// Flips the floating mark of the window in its workspace's active
    /// engine, then re-adds it so a floating proxy migrates it between its
    /// tracker and the inner engine.
    ToggleWindowFloating {
        window: WindowId,
    },
}

impl Transform {
    pub(crate) fn execute(
        &self,
        state: &RootState,
        ctx: &EngineCtx<'_>,
    ) -> Result<RootState, StoreError> {
        match self {
            Transform::CreateWorkspace { name, engines, monitor } => {
                pickers::monitor_by_id(state, *monitor)?;
                let engines = if engines.is_empty() {
                    // A workspace always has an active engine.
                    vec![LayoutEngine::stack(Orientation::Horizontal)]
                } else {
                    engines.clone()
                };
                let mut workspaces = (*state.workspaces).clone();
                let mut maps = (*state.maps).clone();
                let id = workspaces
                    .workspaces
                    .insert_with_key(|id| Workspace::new(id, name.clone(), engines));
                maps.workspace_to_monitor.insert(id, *monitor);
                debug!("created workspace {name:?} on monitor {monitor:?}");
                Ok(commit(state, Some(workspaces), Some(maps)))
            }

            Transform::AddWindow { window, workspace }
            | Transform::MoveWindowToWorkspace { window, workspace } => {
                pickers::workspace_by_id(state, *workspace)?;
                let (workspaces, maps) = assign_window(state, *window, *workspace, ctx);
                Ok(commit(state, Some(workspaces), Some(maps)))
            }

            Transform::RemoveWindow { window } => {
                let owner = pickers::workspace_by_window(state, *window)?.id;
                let mut workspaces = (*state.workspaces).clone();
                let mut maps = (*state.maps).clone();
                if let Some(ws) = workspaces.workspaces.get_mut(owner) {
                    ws.remove_window(*window, ctx);
                }
                maps.window_to_workspace.remove(window);
                ctx.floating.forget_window(*window);
                Ok(commit(state, Some(workspaces), Some(maps)))
            }

            Transform::MoveWindowToPoint { window, point } => {
                let owner = pickers::workspace_by_window(state, *window)?.id;
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[owner].move_window_to_point(*window, *point, ctx);
                Ok(commit(state, Some(workspaces), None))
            }

            Transform::MoveWindowEdgesInDirection { edges, pixel_deltas, window } => {
                move_window_edges(state, ctx, *edges, *pixel_deltas, *window)
            }

            Transform::SwapWindowInDirection { workspace, window, direction } => {
                require_window_in_workspace(state, *window, *workspace)?;
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[*workspace]
                    .swap_window_in_direction(*direction, *window, ctx);
                Ok(commit(state, Some(workspaces), None))
            }

            Transform::FocusWindowInDirection { workspace, window, direction } => {
                require_window_in_workspace(state, *window, *workspace)?;
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[*workspace]
                    .focus_window_in_direction(*direction, *window, ctx);
                Ok(commit(state, Some(workspaces), None))
            }

            Transform::ActivateNextLayoutEngine { workspace } => {
                pickers::workspace_by_id(state, *workspace)?;
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[*workspace].activate_next_engine();
                Ok(commit(state, Some(workspaces), None))
            }

            Transform::ActivatePrevLayoutEngine { workspace } => {
                pickers::workspace_by_id(state, *workspace)?;
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[*workspace].activate_prev_engine();
                Ok(commit(state, Some(workspaces), None))
            }

            Transform::PerformCustomAction { workspace, action } => {
                pickers::workspace_by_id(state, *workspace)?;
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[*workspace].perform_custom_action(action, ctx);
                Ok(commit(state, Some(workspaces), None))
            }

            Transform::ToggleWindowFloating { window } => {
                let owner = pickers::workspace_by_window(state, *window)?.id;
                let identity =
                    pickers::workspace_by_id(state, owner)?.active_engine().identity();
                if ctx.floating.is_floating(*window, identity) {
                    ctx.floating.mark_docked(*window, identity);
                } else {
                    ctx.floating.mark_floating(*window, identity);
                }
                let mut workspaces = (*state.workspaces).clone();
                workspaces.workspaces[owner].re_add_window_to_active(*window, ctx);
                Ok(commit(state, Some(workspaces), None))
            }
        }
    }
}

/// Builds the next snapshot, sharing any sector that did not change.
fn commit(
    state: &RootState,
    workspaces: Option<WorkspaceSector>,
    maps: Option<MapSector>,
) -> RootState {
    RootState {
        workspaces: workspaces.map(Arc::new).unwrap_or_else(|| state.workspaces.clone()),
        maps: maps.map(Arc::new).unwrap_or_else(|| state.maps.clone()),
        monitors: state.monitors.clone(),
    }
}

fn require_window_in_workspace(
    state: &RootState,
    window: WindowId,
    workspace: WorkspaceId,
) -> Result<(), StoreError> {
    let ws = pickers::workspace_by_id(state, workspace)?;
    if !ws.contains_window(window) {
        return Err(StoreError::NoValidWindow(window));
    }
    Ok(())
}

/// Moves `window` into `target`, removing it from its previous workspace if
/// it had one. Both workspaces and the map sector end mutually consistent.
fn assign_window(
    state: &RootState,
    window: WindowId,
    target: WorkspaceId,
    ctx: &EngineCtx<'_>,
) -> (WorkspaceSector, MapSector) {
    let mut workspaces = (*state.workspaces).clone();
    let mut maps = (*state.maps).clone();

    if let Some(old) = maps.window_to_workspace.get(&window).copied()
        && old != target
        && let Some(ws) = workspaces.workspaces.get_mut(old)
    {
        ws.remove_window(window, ctx);
    }
    if let Some(ws) = workspaces.workspaces.get_mut(target) {
        ws.add_window(window, ctx);
        maps.window_to_workspace.insert(window, target);
    }
    (workspaces, maps)
}

fn move_window_edges(
    state: &RootState,
    ctx: &EngineCtx<'_>,
    edges: Edges,
    pixel_deltas: Point<i32>,
    window: WindowId,
) -> Result<RootState, StoreError> {
    let old_workspace = pickers::workspace_by_window(state, window)?.id;

    // Where does the window actually sit right now? A drag may already have
    // carried it onto another monitor.
    let actual = ctx
        .providers
        .window_ops
        .actual_rectangle(window)
        .ok_or(StoreError::RectangleUnavailable(window))?;
    let new_monitor = *pickers::monitor_at_point(state, actual.origin())?;
    let new_workspace = pickers::workspace_for_monitor(state, new_monitor.id)?.id;

    let migrated = new_workspace != old_workspace;
    let (mut workspaces, maps) = if migrated {
        debug!("window {window:?} crossed monitors; moving to workspace {new_workspace:?}");
        assign_window(state, window, new_workspace, ctx)
    } else {
        ((*state.workspaces).clone(), MapSector::default())
    };

    let normalized = new_monitor.working_area.normalize_delta(pixel_deltas);
    workspaces.workspaces[new_workspace]
        .move_window_edges_in_direction(edges, normalized, window, ctx);

    Ok(commit(state, Some(workspaces), migrated.then_some(maps)))
}
