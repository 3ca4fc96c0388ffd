use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use tracing::{debug, warn};

use crate::common::collections::HashSet;
use crate::layout_engine::{CustomAction, Direction, Edges, LayoutEngine};
use crate::sys::geometry::{Point, Rect};
use crate::sys::providers::EngineCtx;
use crate::sys::screen::Monitor;
use crate::sys::window::{WindowId, WindowState};

new_key_type! {
    pub struct WorkspaceId;
}

/// A workspace owns a set of windows and an ordered list of layout engines,
/// one of which is active. Windows are added to and removed from every
/// engine so cycling the active layout preserves membership; directional
/// and geometric operations go to the active engine only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    layout_engines: Vec<LayoutEngine>,
    active_engine_idx: usize,
    windows: HashSet<WindowId>,
}

impl Workspace {
    pub(crate) fn new(id: WorkspaceId, name: String, layout_engines: Vec<LayoutEngine>) -> Self {
        debug_assert!(!layout_engines.is_empty());
        Self {
            id,
            name,
            layout_engines,
            active_engine_idx: 0,
            windows: HashSet::default(),
        }
    }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.windows.contains(&window)
    }

    pub fn windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.iter().copied()
    }

    pub fn window_count(&self) -> usize { self.windows.len() }

    pub fn layout_engines(&self) -> &[LayoutEngine] { &self.layout_engines }

    pub fn active_engine_idx(&self) -> usize { self.active_engine_idx }

    pub fn active_engine(&self) -> &LayoutEngine {
        &self.layout_engines[self.active_engine_idx]
    }

    pub(crate) fn add_window(&mut self, window: WindowId, ctx: &EngineCtx<'_>) {
        if !self.windows.insert(window) {
            debug!("window {window:?} already in workspace {:?}", self.name);
            return;
        }
        for engine in &mut self.layout_engines {
            *engine = engine.add_window(window, ctx);
        }
    }

    pub(crate) fn remove_window(&mut self, window: WindowId, ctx: &EngineCtx<'_>) -> bool {
        if !self.windows.remove(&window) {
            warn!("window {window:?} not in workspace {:?}", self.name);
            return false;
        }
        for engine in &mut self.layout_engines {
            *engine = engine.remove_window(window, ctx);
        }
        true
    }

    /// Re-runs `add_window` on the active engine only, after the window's
    /// floating mark changed. The window must already be a member.
    pub(crate) fn re_add_window_to_active(&mut self, window: WindowId, ctx: &EngineCtx<'_>) {
        let engine = &mut self.layout_engines[self.active_engine_idx];
        *engine = engine.add_window(window, ctx);
    }

    pub(crate) fn move_window_to_point(
        &mut self,
        window: WindowId,
        point: Point<f64>,
        ctx: &EngineCtx<'_>,
    ) {
        let engine = &mut self.layout_engines[self.active_engine_idx];
        *engine = engine.move_window_to_point(window, point, ctx);
    }

    pub(crate) fn move_window_edges_in_direction(
        &mut self,
        edges: Edges,
        deltas: Point<f64>,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) {
        let engine = &mut self.layout_engines[self.active_engine_idx];
        *engine = engine.move_window_edges_in_direction(edges, deltas, window, ctx);
    }

    pub(crate) fn focus_window_in_direction(
        &mut self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) {
        let engine = &mut self.layout_engines[self.active_engine_idx];
        *engine = engine.focus_window_in_direction(direction, window, ctx);
    }

    pub(crate) fn swap_window_in_direction(
        &mut self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) {
        let engine = &mut self.layout_engines[self.active_engine_idx];
        *engine = engine.swap_window_in_direction(direction, window, ctx);
    }

    pub(crate) fn perform_custom_action(&mut self, action: &CustomAction, ctx: &EngineCtx<'_>) {
        let engine = &mut self.layout_engines[self.active_engine_idx];
        *engine = engine.perform_custom_action(action, ctx);
    }

    /// Cycles to the next layout engine. Engine instances are untouched;
    /// only the active index changes.
    pub(crate) fn activate_next_engine(&mut self) {
        self.active_engine_idx = (self.active_engine_idx + 1) % self.layout_engines.len();
    }

    pub(crate) fn activate_prev_engine(&mut self) {
        let len = self.layout_engines.len();
        self.active_engine_idx = (self.active_engine_idx + len - 1) % len;
    }

    /// Delegates to the active engine; read-only.
    pub fn do_layout(
        &self,
        working_area: Rect<i32>,
        monitor: &Monitor,
        ctx: &EngineCtx<'_>,
    ) -> Vec<WindowState> {
        debug!("doing layout for workspace {:?}", self.name);
        self.active_engine().do_layout(working_area, monitor, ctx)
    }
}
