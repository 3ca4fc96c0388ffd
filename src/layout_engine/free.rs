use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout_engine::engine::EngineIdentity;
use crate::layout_engine::floating::{FloatingManager, FloatingPositions, RebuildEngine};
use crate::sys::geometry::Point;
use crate::sys::providers::EngineCtx;
use crate::sys::screen::Monitor;
use crate::sys::window::{WindowId, WindowState};

/// Lays out every window as free-floating. Directional focus and swap have
/// no meaning here and leave the engine untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreeEngine {
    identity: EngineIdentity,
    floating: FloatingManager,
}

impl RebuildEngine for FreeEngine {
    fn rebuild(&self, positions: FloatingPositions) -> Self {
        Self {
            identity: self.identity,
            floating: FloatingManager::with_positions(positions),
        }
    }
}

impl FreeEngine {
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
        debug!("adding window {window:?} to free engine");
        self.floating.add_window(self, window, ctx).0
    }

    pub fn remove_window(&self, window: WindowId) -> Self {
        debug!("removing window {window:?} from free engine");
        self.floating.remove_window(self, window).0
    }

    pub fn move_window_to_point(&self, window: WindowId, _point: Point<f64>, ctx: &EngineCtx<'_>) -> Self {
        self.floating.update_window_rectangle(self, window, ctx).0
    }

    pub fn move_window_edges(&self, window: WindowId, ctx: &EngineCtx<'_>) -> Self {
        self.floating.update_window_rectangle(self, window, ctx).0
    }

    pub fn do_layout(&self, monitor: &Monitor, ctx: &EngineCtx<'_>) -> Vec<WindowState> {
        self.floating.do_layout(monitor, ctx)
    }
}

impl Default for FreeEngine {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::LayoutSettings;
    use crate::layout_engine::FloatingRegistry;
    use crate::sys::geometry::Rect;
    use crate::test_support::{fake_providers, make_wid, single_monitor};

    #[test]
    fn tracks_and_releases_windows() {
        let (providers, ops) = fake_providers(vec![single_monitor()]);
        let registry = FloatingRegistry::new();
        let settings = LayoutSettings::default();
        let ctx = EngineCtx {
            providers: &providers,
            floating: &registry,
            settings: &settings,
        };
        let w = make_wid(1, 1);
        ops.set_actual_rect(w, Rect::new(100, 100, 640, 480));

        let engine = FreeEngine::new();
        let with_window = engine.add_window(w, &ctx);
        assert!(with_window.contains_window(w));
        assert!(!engine.contains_window(w));
        assert_eq!(with_window.identity(), engine.identity());

        let empty = with_window.remove_window(w);
        assert!(!empty.contains_window(w));
    }

    #[test]
    fn layout_projects_into_monitor_space() {
        let (providers, ops) = fake_providers(vec![single_monitor()]);
        let registry = FloatingRegistry::new();
        let settings = LayoutSettings::default();
        let ctx = EngineCtx {
            providers: &providers,
            floating: &registry,
            settings: &settings,
        };
        let monitor = single_monitor();
        let w = make_wid(1, 1);
        ops.set_actual_rect(w, Rect::new(192, 144, 960, 520));

        let engine = FreeEngine::new().add_window(w, &ctx);
        let layout = engine.do_layout(&monitor, &ctx);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].rect, Rect::new(192, 144, 960, 520));
    }
}
