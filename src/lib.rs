pub mod common;
pub mod layout_engine;
#[cfg(test)]
pub(crate) mod test_support;
pub mod model;
pub mod sys;

pub use layout_engine::{
    CustomAction, Direction, Edges, EngineIdentity, FloatingRegistry, LayoutEngine, Orientation,
};
pub use model::{RootState, Store, StoreError, Transform, WorkspaceId};
pub use sys::geometry::{Point, Rect};
pub use sys::providers::{EngineCtx, MonitorGeometry, Providers, WindowOps};
pub use sys::screen::{Monitor, MonitorId};
pub use sys::window::{WindowId, WindowSize, WindowState};
