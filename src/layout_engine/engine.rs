use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::layout_engine::free::FreeEngine;
use crate::layout_engine::proxy::FloatingProxyEngine;
use crate::layout_engine::rect_cache::RectCacheEngine;
use crate::layout_engine::stack::StackEngine;
use crate::layout_engine::{Direction, Edges, Orientation};
use crate::sys::geometry::{Point, Rect};
use crate::sys::providers::EngineCtx;
use crate::sys::screen::Monitor;
use crate::sys::window::{WindowId, WindowState};

/// Stable token identifying "the same logical engine" across its immutable
/// generations. Allocated once when the engine is first constructed and
/// carried unchanged through every reconfiguration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EngineIdentity(u64);

impl EngineIdentity {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Escape hatch for engine-specific commands not covered by the common
/// contract. Engines that do not recognize the action return themselves
/// unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomAction {
    pub name: String,
    pub window: Option<WindowId>,
}

impl CustomAction {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), window: None }
    }
}

/// The layout-engine hierarchy as an explicit tagged-variant tree. Every
/// mutating operation returns a new engine; receivers are never mutated and
/// remain valid snapshots of the prior generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutEngine {
    Stack(StackEngine),
    Free(FreeEngine),
    RectCache(RectCacheEngine),
    FloatingProxy(FloatingProxyEngine),
}

impl LayoutEngine {
    pub fn stack(orientation: Orientation) -> Self {
        LayoutEngine::Stack(StackEngine::new(orientation))
    }

    pub fn free() -> Self { LayoutEngine::Free(FreeEngine::new()) }

    pub fn rect_cache() -> Self { LayoutEngine::RectCache(RectCacheEngine::new()) }

    /// Wraps `inner` so that windows marked floating bypass it.
    pub fn floating_proxy(inner: LayoutEngine) -> Self {
        LayoutEngine::FloatingProxy(FloatingProxyEngine::new(inner))
    }

    /// For the proxy this is the identity of the wrapped engine: the proxy
    /// is transparent, not a logical engine of its own.
    pub fn identity(&self) -> EngineIdentity {
        match self {
            LayoutEngine::Stack(e) => e.identity(),
            LayoutEngine::Free(e) => e.identity(),
            LayoutEngine::RectCache(e) => e.identity(),
            LayoutEngine::FloatingProxy(e) => e.identity(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LayoutEngine::Stack(e) => e.len(),
            LayoutEngine::Free(e) => e.len(),
            LayoutEngine::RectCache(e) => e.len(),
            LayoutEngine::FloatingProxy(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn contains_window(&self, window: WindowId) -> bool {
        match self {
            LayoutEngine::Stack(e) => e.contains_window(window),
            LayoutEngine::Free(e) => e.contains_window(window),
            LayoutEngine::RectCache(e) => e.contains_window(window),
            LayoutEngine::FloatingProxy(e) => e.contains_window(window),
        }
    }

    pub fn first_window(&self) -> Option<WindowId> {
        match self {
            LayoutEngine::Stack(e) => e.first_window(),
            LayoutEngine::Free(e) => e.first_window(),
            LayoutEngine::RectCache(e) => e.first_window(),
            LayoutEngine::FloatingProxy(e) => e.first_window(),
        }
    }

    pub fn add_window(&self, window: WindowId, ctx: &EngineCtx<'_>) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => LayoutEngine::Stack(e.add_window(window)),
            LayoutEngine::Free(e) => LayoutEngine::Free(e.add_window(window, ctx)),
            LayoutEngine::RectCache(e) => LayoutEngine::RectCache(e.add_window(window, ctx)),
            LayoutEngine::FloatingProxy(e) => {
                LayoutEngine::FloatingProxy(e.add_window(window, ctx))
            }
        }
    }

    pub fn remove_window(&self, window: WindowId, ctx: &EngineCtx<'_>) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => LayoutEngine::Stack(e.remove_window(window)),
            LayoutEngine::Free(e) => LayoutEngine::Free(e.remove_window(window)),
            LayoutEngine::RectCache(e) => LayoutEngine::RectCache(e.remove_window(window)),
            LayoutEngine::FloatingProxy(e) => {
                LayoutEngine::FloatingProxy(e.remove_window(window, ctx))
            }
        }
    }

    /// Read-only projection: one entry per contained window.
    pub fn do_layout(
        &self,
        working_area: Rect<i32>,
        monitor: &Monitor,
        ctx: &EngineCtx<'_>,
    ) -> Vec<WindowState> {
        match self {
            LayoutEngine::Stack(e) => e.do_layout(working_area, monitor, ctx),
            LayoutEngine::Free(e) => e.do_layout(monitor, ctx),
            LayoutEngine::RectCache(e) => e.do_layout(working_area),
            LayoutEngine::FloatingProxy(e) => e.do_layout(working_area, monitor, ctx),
        }
    }

    pub fn move_window_to_point(
        &self,
        window: WindowId,
        point: Point<f64>,
        ctx: &EngineCtx<'_>,
    ) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => {
                LayoutEngine::Stack(e.move_window_to_point(window, point))
            }
            LayoutEngine::Free(e) => {
                LayoutEngine::Free(e.move_window_to_point(window, point, ctx))
            }
            LayoutEngine::RectCache(e) => {
                LayoutEngine::RectCache(e.move_window_to_point(window, point, ctx))
            }
            LayoutEngine::FloatingProxy(e) => {
                LayoutEngine::FloatingProxy(e.move_window_to_point(window, point, ctx))
            }
        }
    }

    pub fn move_window_edges_in_direction(
        &self,
        edges: Edges,
        deltas: Point<f64>,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => LayoutEngine::Stack(
                e.move_window_edges_in_direction(edges, deltas, window, ctx),
            ),
            LayoutEngine::Free(e) => LayoutEngine::Free(e.move_window_edges(window, ctx)),
            LayoutEngine::RectCache(e) => {
                LayoutEngine::RectCache(e.move_window_edges(window, ctx))
            }
            LayoutEngine::FloatingProxy(e) => LayoutEngine::FloatingProxy(
                e.move_window_edges_in_direction(edges, deltas, window, ctx),
            ),
        }
    }

    pub fn focus_window_in_direction(
        &self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => {
                LayoutEngine::Stack(e.focus_window_in_direction(direction, window, ctx))
            }
            LayoutEngine::Free(_) | LayoutEngine::RectCache(_) => self.clone(),
            LayoutEngine::FloatingProxy(e) => LayoutEngine::FloatingProxy(
                e.focus_window_in_direction(direction, window, ctx),
            ),
        }
    }

    pub fn swap_window_in_direction(
        &self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => {
                LayoutEngine::Stack(e.swap_window_in_direction(direction, window))
            }
            LayoutEngine::Free(_) | LayoutEngine::RectCache(_) => self.clone(),
            LayoutEngine::FloatingProxy(e) => LayoutEngine::FloatingProxy(
                e.swap_window_in_direction(direction, window, ctx),
            ),
        }
    }

    pub fn perform_custom_action(
        &self,
        action: &CustomAction,
        ctx: &EngineCtx<'_>,
    ) -> LayoutEngine {
        match self {
            LayoutEngine::Stack(e) => LayoutEngine::Stack(e.perform_custom_action(action)),
            LayoutEngine::Free(_) | LayoutEngine::RectCache(_) => self.clone(),
            LayoutEngine::FloatingProxy(e) => {
                LayoutEngine::FloatingProxy(e.perform_custom_action(action, ctx))
            }
        }
    }
}
