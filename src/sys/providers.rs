use std::sync::Arc;

use crate::common::config::LayoutSettings;
use crate::layout_engine::FloatingRegistry;
use crate::sys::geometry::{Point, Rect};
use crate::sys::screen::{Monitor, MonitorId};
use crate::sys::window::{WindowId, WindowSize};

/// Native window operations. `actual_rectangle` returns `None` when the OS
/// cannot report a rectangle for the handle.
pub trait WindowOps: Send + Sync {
    fn actual_rectangle(&self, window: WindowId) -> Option<Rect<i32>>;
    fn set_rectangle(&self, window: WindowId, rect: Rect<i32>);
    fn focus(&self, window: WindowId);
    fn minimize(&self, window: WindowId);
    fn maximize(&self, window: WindowId);
    fn is_minimized(&self, window: WindowId) -> bool;
    fn is_maximized(&self, window: WindowId) -> bool;
}

/// Monitor geometry discovery.
pub trait MonitorGeometry: Send + Sync {
    fn monitors(&self) -> Vec<Monitor>;
    fn working_area(&self, monitor: MonitorId) -> Option<Rect<i32>>;
    fn monitor_at_point(&self, point: Point<i32>) -> Option<MonitorId>;
}

/// Capability providers consumed by the core. Cheap to clone.
#[derive(Clone)]
pub struct Providers {
    pub window_ops: Arc<dyn WindowOps>,
    pub monitors: Arc<dyn MonitorGeometry>,
}

impl Providers {
    pub fn window_size(&self, window: WindowId) -> WindowSize {
        if self.window_ops.is_maximized(window) {
            WindowSize::Maximized
        } else if self.window_ops.is_minimized(window) {
            WindowSize::Minimized
        } else {
            WindowSize::Normal
        }
    }
}

/// Everything a layout-engine operation may consult besides its own state.
#[derive(Clone, Copy)]
pub struct EngineCtx<'a> {
    pub providers: &'a Providers,
    pub floating: &'a FloatingRegistry,
    pub settings: &'a LayoutSettings,
}
