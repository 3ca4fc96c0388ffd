use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::layout_engine::engine::{CustomAction, EngineIdentity, LayoutEngine};
use crate::layout_engine::floating::{FloatingManager, FloatingPositions, RebuildEngine};
use crate::layout_engine::{Direction, Edges};
use crate::sys::geometry::{Point, Rect};
use crate::sys::providers::EngineCtx;
use crate::sys::screen::Monitor;
use crate::sys::window::{WindowId, WindowState};

/// Proxy engine that lets windows float on top of an inner engine. Whether
/// a window is floating is decided by the external
/// [`FloatingRegistry`](crate::layout_engine::FloatingRegistry), keyed by
/// the inner engine's identity; the proxy itself is transparent.
///
/// Invariant: in any one generation, a window is owned by the float tracker
/// or by the inner engine, never both. A tiling operation that absorbs a
/// window reconciles by dropping it from the tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatingProxyEngine {
    inner: Box<LayoutEngine>,
    floating: FloatingManager,
}

impl RebuildEngine for FloatingProxyEngine {
    fn rebuild(&self, positions: FloatingPositions) -> Self {
        Self {
            inner: self.inner.clone(),
            floating: FloatingManager::with_positions(positions),
        }
    }
}

impl FloatingProxyEngine {
    pub fn new(inner: LayoutEngine) -> Self {
        Self {
            inner: Box::new(inner),
            floating: FloatingManager::default(),
        }
    }

    pub fn identity(&self) -> EngineIdentity { self.inner.identity() }

    pub fn inner(&self) -> &LayoutEngine { &self.inner }

    pub fn len(&self) -> usize { self.inner.len() + self.floating.len() }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.floating.contains_window(window) || self.inner.contains_window(window)
    }

    pub fn floating_contains(&self, window: WindowId) -> bool {
        self.floating.contains_window(window)
    }

    pub fn first_window(&self) -> Option<WindowId> {
        self.inner.first_window().or_else(|| self.floating.first_window())
    }

    fn is_window_floating(&self, window: WindowId, ctx: &EngineCtx<'_>) -> bool {
        ctx.floating.is_floating(window, self.inner.identity())
    }

    /// Rebuilds around an updated inner engine. `gc_window` is the window
    /// that triggered the update: once an inner operation has absorbed it,
    /// it is no longer floating, so it is dropped from the tracker.
    fn update_inner(
        &self,
        new_inner: LayoutEngine,
        gc_window: Option<WindowId>,
        _ctx: &EngineCtx<'_>,
    ) -> Self {
        let (reconciled, _) = match gc_window {
            Some(window) => self.floating.remove_window(self, window),
            None => (self.clone(), false),
        };

        if *self.inner == new_inner && reconciled.floating == self.floating {
            self.clone()
        } else {
            Self {
                inner: Box::new(new_inner),
                floating: reconciled.floating,
            }
        }
    }

    fn float_into(&self, tracked: Self, window: WindowId, ctx: &EngineCtx<'_>) -> Self {
        // The tracker now owns the window; the inner engine must not.
        let inner = tracked.inner.remove_window(window, ctx);
        Self {
            inner: Box::new(inner),
            floating: tracked.floating,
        }
    }

    pub fn add_window(&self, window: WindowId, ctx: &EngineCtx<'_>) -> Self {
        if self.is_window_floating(window, ctx) {
            let (tracked, failed) = self.floating.add_window(self, window, ctx);
            if !failed {
                return self.float_into(tracked, window, ctx);
            }
            trace!("failed to float {window:?}; tiling it instead");
        }
        self.update_inner(self.inner.add_window(window, ctx), Some(window), ctx)
    }

    pub fn remove_window(&self, window: WindowId, ctx: &EngineCtx<'_>) -> Self {
        let is_floating = self.is_window_floating(window, ctx);
        if self.floating.contains_window(window) {
            ctx.floating.mark_docked(window, self.inner.identity());
            if is_floating {
                return self.floating.remove_window(self, window).0;
            }
        }
        self.update_inner(self.inner.remove_window(window, ctx), Some(window), ctx)
    }

    pub fn move_window_to_point(
        &self,
        window: WindowId,
        point: Point<f64>,
        ctx: &EngineCtx<'_>,
    ) -> Self {
        if self.is_window_floating(window, ctx) {
            let (tracked, failed) = self.floating.update_window_rectangle(self, window, ctx);
            if !failed {
                return self.float_into(tracked, window, ctx);
            }
        }
        self.update_inner(
            self.inner.move_window_to_point(window, point, ctx),
            Some(window),
            ctx,
        )
    }

    pub fn move_window_edges_in_direction(
        &self,
        edges: Edges,
        deltas: Point<f64>,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> Self {
        if self.is_window_floating(window, ctx) {
            let (tracked, failed) = self.floating.update_window_rectangle(self, window, ctx);
            if !failed && tracked != *self {
                return self.float_into(tracked, window, ctx);
            }
        }
        self.update_inner(
            self.inner.move_window_edges_in_direction(edges, deltas, window, ctx),
            Some(window),
            ctx,
        )
    }

    pub fn focus_window_in_direction(
        &self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> Self {
        if self.is_window_floating(window, ctx) {
            // No notion of "the tiled window next to a floating one" yet;
            // fall back to focusing the inner engine's first window.
            if let Some(first) = self.inner.first_window() {
                ctx.providers.window_ops.focus(first);
            }
            return self.clone();
        }
        self.update_inner(
            self.inner.focus_window_in_direction(direction, window, ctx),
            Some(window),
            ctx,
        )
    }

    pub fn swap_window_in_direction(
        &self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> Self {
        if self.is_window_floating(window, ctx) {
            return self.clone();
        }
        self.update_inner(
            self.inner.swap_window_in_direction(direction, window, ctx),
            Some(window),
            ctx,
        )
    }

    pub fn perform_custom_action(&self, action: &CustomAction, ctx: &EngineCtx<'_>) -> Self {
        if let Some(window) = action.window
            && self.is_window_floating(window, ctx)
        {
            return self.clone();
        }
        self.update_inner(
            self.inner.perform_custom_action(action, ctx),
            action.window,
            ctx,
        )
    }

    /// Floating entries first, then the inner engine's.
    pub fn do_layout(
        &self,
        working_area: Rect<i32>,
        monitor: &Monitor,
        ctx: &EngineCtx<'_>,
    ) -> Vec<WindowState> {
        let mut out = self.floating.do_layout(monitor, ctx);
        out.extend(self.inner.do_layout(working_area, monitor, ctx));
        out
    }
}
