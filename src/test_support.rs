use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::collections::{HashMap, HashSet};
use crate::sys::geometry::{Point, Rect};
use crate::sys::providers::{MonitorGeometry, Providers, WindowOps};
use crate::sys::screen::{Monitor, MonitorId};
use crate::sys::window::WindowId;

pub(crate) fn make_wid(pid: i32, idx: u32) -> WindowId { WindowId::new(pid, idx) }

#[derive(Default)]
pub(crate) struct FakeWindowOps {
    pub rects: RwLock<HashMap<WindowId, Rect<i32>>>,
    pub minimized: RwLock<HashSet<WindowId>>,
    pub maximized: RwLock<HashSet<WindowId>>,
    pub focused: RwLock<Vec<WindowId>>,
}

impl FakeWindowOps {
    pub fn set_actual_rect(&self, window: WindowId, rect: Rect<i32>) {
        self.rects.write().insert(window, rect);
    }

    pub fn clear_actual_rect(&self, window: WindowId) {
        self.rects.write().remove(&window);
    }
}

impl WindowOps for FakeWindowOps {
    fn actual_rectangle(&self, window: WindowId) -> Option<Rect<i32>> {
        self.rects.read().get(&window).copied()
    }

    fn set_rectangle(&self, window: WindowId, rect: Rect<i32>) {
        self.rects.write().insert(window, rect);
    }

    fn focus(&self, window: WindowId) { self.focused.write().push(window); }

    fn minimize(&self, window: WindowId) { self.minimized.write().insert(window); }

    fn maximize(&self, window: WindowId) { self.maximized.write().insert(window); }

    fn is_minimized(&self, window: WindowId) -> bool {
        self.minimized.read().contains(&window)
    }

    fn is_maximized(&self, window: WindowId) -> bool {
        self.maximized.read().contains(&window)
    }
}

pub(crate) struct FakeMonitors(pub Vec<Monitor>);

impl MonitorGeometry for FakeMonitors {
    fn monitors(&self) -> Vec<Monitor> { self.0.clone() }

    fn working_area(&self, monitor: MonitorId) -> Option<Rect<i32>> {
        self.0.iter().find(|m| m.id == monitor).map(|m| m.working_area)
    }

    fn monitor_at_point(&self, point: Point<i32>) -> Option<MonitorId> {
        self.0.iter().find(|m| m.contains_point(point)).map(|m| m.id)
    }
}

pub(crate) fn single_monitor() -> Monitor {
    Monitor {
        id: MonitorId(0),
        frame: Rect::new(0, 0, 1920, 1080),
        working_area: Rect::new(0, 40, 1920, 1040),
    }
}

pub(crate) fn second_monitor() -> Monitor {
    Monitor {
        id: MonitorId(1),
        frame: Rect::new(1921, 0, 2560, 1440),
        working_area: Rect::new(1921, 0, 2560, 1400),
    }
}

pub(crate) fn fake_providers(
    monitors: Vec<Monitor>,
) -> (Providers, Arc<FakeWindowOps>) {
    let window_ops = Arc::new(FakeWindowOps::default());
    let providers = Providers {
        window_ops: window_ops.clone(),
        monitors: Arc::new(FakeMonitors(monitors)),
    };
    (providers, window_ops)
}
