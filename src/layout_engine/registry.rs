use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::collections::{HashMap, HashSet};
use crate::layout_engine::EngineIdentity;
use crate::sys::window::WindowId;

/// Shared table recording which windows are marked floating, and in which
/// logical engines. The floating-proxy engine consults this to decide
/// whether to route an operation to its float tracker or to its inner
/// engine; outer layers (commands, plugins) populate it.
#[derive(Clone, Default, Debug)]
pub struct FloatingRegistry {
    marks: Arc<RwLock<HashMap<WindowId, HashSet<EngineIdentity>>>>,
}

impl FloatingRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn is_floating(&self, window: WindowId, engine: EngineIdentity) -> bool {
        self.marks
            .read()
            .get(&window)
            .is_some_and(|engines| engines.contains(&engine))
    }

    pub fn mark_floating(&self, window: WindowId, engine: EngineIdentity) {
        self.marks.write().entry(window).or_default().insert(engine);
    }

    /// A tiling operation has absorbed the window; it is no longer floating
    /// in that engine.
    pub fn mark_docked(&self, window: WindowId, engine: EngineIdentity) {
        let mut marks = self.marks.write();
        if let Some(engines) = marks.get_mut(&window) {
            engines.remove(&engine);
            if engines.is_empty() {
                marks.remove(&window);
            }
        }
    }

    pub fn forget_window(&self, window: WindowId) {
        self.marks.write().remove(&window);
    }
}
