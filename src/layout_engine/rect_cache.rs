use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout_engine::engine::EngineIdentity;
use crate::layout_engine::floating::{FloatingManager, FloatingPositions, RebuildEngine};
use crate::sys::geometry::{Point, Rect};
use crate::sys::providers::EngineCtx;
use crate::sys::window::{WindowId, WindowSize, WindowState};

/// Flat, unordered engine caching one explicit rectangle per window. Unlike
/// [`FreeEngine`](crate::layout_engine::FreeEngine), layout is projected
/// into the rectangle passed to `do_layout` rather than the monitor's
/// working area, and every entry is reported as `Normal`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectCacheEngine {
    identity: EngineIdentity,
    floating: FloatingManager,
}

impl RebuildEngine for RectCacheEngine {
    fn rebuild(&self, positions: FloatingPositions) -> Self {
        Self {
            identity: self.identity,
            floating: FloatingManager::with_positions(positions),
        }
    }
}

impl RectCacheEngine {
    pub fn new() -> Self {
        Self {
            identity: EngineIdentity::next(),
            floating: FloatingManager::default(),
        }
    }

    pub fn identity(&self) -> EngineIdentity { self.identity }

    pub fn len(&self) -> usize { self.floating.len() }

    pub fn is_empty(&self) -> bool { self.floating.len() == 0 }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.floating.contains_window(window)
    }

    pub fn first_window(&self) -> Option<WindowId> { self.floating.first_window() }

    pub fn add_window(&self, window: WindowId, ctx: &EngineCtx<'_>) -> Self {
        if self.contains_window(window) {
            debug!("window {window:?} already cached");
            return self.clone();
        }
        self.floating.update_window_rectangle(self, window, ctx).0
    }

    pub fn remove_window(&self, window: WindowId) -> Self {
        self.floating.remove_window(self, window).0
    }

    pub fn move_window_to_point(&self, window: WindowId, _point: Point<f64>, ctx: &EngineCtx<'_>) -> Self {
        self.floating.update_window_rectangle(self, window, ctx).0
    }

    pub fn move_window_edges(&self, window: WindowId, ctx: &EngineCtx<'_>) -> Self {
        self.floating.update_window_rectangle(self, window, ctx).0
    }

    /// Projects every cached unit rectangle into `rect`. Directional focus
    /// and swap are no-ops: the cache has no order.
    pub fn do_layout(&self, rect: Rect<i32>) -> Vec<WindowState> {
        self.floating
            .positions()
            .iter()
            .map(|(window, unit)| WindowState {
                window,
                rect: rect.to_device(unit),
                size: WindowSize::Normal,
            })
            .collect()
    }
}

impl Default for RectCacheEngine {
    fn default() -> Self { Self::new() }
}
