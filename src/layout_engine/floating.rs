use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::common::collections::HashMap;
use crate::sys::geometry::Rect;
use crate::sys::providers::EngineCtx;
use crate::sys::screen::Monitor;
use crate::sys::window::{WindowId, WindowState};

/// Persistent window -> unit-square rectangle mapping. Mutations return a
/// new instance; the unchanged paths hand back the same shared map, so
/// callers can detect "no change" with [`FloatingPositions::ptr_eq`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct FloatingPositions(Arc<HashMap<WindowId, Rect<f64>>>);

impl FloatingPositions {
    pub fn get(&self, window: WindowId) -> Option<Rect<f64>> {
        self.0.get(&window).copied()
    }

    pub fn contains(&self, window: WindowId) -> bool { self.0.contains_key(&window) }

    pub fn insert(&self, window: WindowId, rect: Rect<f64>) -> Self {
        let mut map = (*self.0).clone();
        map.insert(window, rect);
        Self(Arc::new(map))
    }

    pub fn remove(&self, window: WindowId) -> Self {
        let mut map = (*self.0).clone();
        map.remove(&window);
        Self(Arc::new(map))
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowId, Rect<f64>)> + '_ {
        self.0.iter().map(|(&w, &r)| (w, r))
    }

    pub fn first_window(&self) -> Option<WindowId> { self.0.keys().next().copied() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool { Arc::ptr_eq(&a.0, &b.0) }
}

impl PartialEq for FloatingPositions {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

/// Rebuild strategy supplied by every engine that embeds a
/// [`FloatingManager`]: given an updated position mapping, produce the new
/// owning engine generation.
pub(crate) trait RebuildEngine: Clone {
    fn rebuild(&self, positions: FloatingPositions) -> Self;
}

/// Tracks freely positioned windows for an owning layout engine. Membership
/// in the mapping is the single source of truth for "is this window
/// floating in this engine". The manager itself is immutable; every change
/// goes through the owner's [`RebuildEngine`] callback.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct FloatingManager {
    positions: FloatingPositions,
}

impl FloatingManager {
    pub fn with_positions(positions: FloatingPositions) -> Self { Self { positions } }

    pub fn positions(&self) -> &FloatingPositions { &self.positions }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.positions.contains(window)
    }

    pub fn first_window(&self) -> Option<WindowId> { self.positions.first_window() }

    pub fn len(&self) -> usize { self.positions.len() }

    /// No-op success when the window is already tracked; otherwise behaves
    /// like [`FloatingManager::update_window_rectangle`].
    pub fn add_window<E: RebuildEngine>(
        &self,
        engine: &E,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> (E, bool) {
        if self.positions.contains(window) {
            return (engine.clone(), false);
        }
        self.update_window_rectangle(engine, window, ctx)
    }

    /// Removing an untracked window is not a failure; the caller decides
    /// what "not tracked" means.
    pub fn remove_window<E: RebuildEngine>(&self, engine: &E, window: WindowId) -> (E, bool) {
        if self.positions.contains(window) {
            return (engine.rebuild(self.positions.remove(window)), false);
        }
        (engine.clone(), false)
    }

    /// Queries the window's current actual rectangle, normalizes it against
    /// the working area of the monitor it lands on, and stores it if it
    /// changed. The `bool` is the failure flag: `(unchanged, false)` means
    /// nothing to do, `(unchanged, true)` means the rectangle could not be
    /// resolved.
    pub fn update_window_rectangle<E: RebuildEngine>(
        &self,
        engine: &E,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> (E, bool) {
        let old_rect = self.positions.get(window);

        let Some(actual) = ctx.providers.window_ops.actual_rectangle(window) else {
            error!("could not obtain rectangle for floating window {window:?}");
            return (engine.clone(), true);
        };

        let Some(monitor) = ctx.providers.monitors.monitor_at_point(actual.origin()) else {
            error!("no monitor found at {:?} for window {window:?}", actual.origin());
            return (engine.clone(), true);
        };
        let Some(working_area) = ctx.providers.monitors.working_area(monitor) else {
            error!("no working area for monitor {monitor:?}");
            return (engine.clone(), true);
        };

        let unit = working_area.normalize_rect(actual);
        if Some(unit) == old_rect {
            debug!("rectangle for window {window:?} has not changed");
            return (engine.clone(), false);
        }

        (engine.rebuild(self.positions.insert(window, unit)), false)
    }

    /// One entry per tracked window, in the monitor's device space, tagged
    /// with the window's current size state. Iteration order is stable
    /// within one snapshot because the mapping is never mutated in place.
    pub fn do_layout(&self, monitor: &Monitor, ctx: &EngineCtx<'_>) -> Vec<WindowState> {
        self.positions
            .iter()
            .map(|(window, unit)| WindowState {
                window,
                rect: monitor.working_area.to_device(unit),
                size: ctx.providers.window_size(window),
            })
            .collect()
    }
}
