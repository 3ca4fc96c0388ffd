use thiserror::Error;

use crate::model::workspace::WorkspaceId;
use crate::sys::geometry::Point;
use crate::sys::screen::MonitorId;
use crate::sys::window::WindowId;

/// Typed failures surfaced by transforms and pickers. A failed transform is
/// a no-op from the state's perspective; the caller surfaces the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no valid window for handle {0:?}")]
    NoValidWindow(WindowId),
    #[error("no monitor found at point {0:?}")]
    NoMonitorFoundAtPoint(Point<i32>),
    #[error("no monitor with id {0:?}")]
    MonitorNotFound(MonitorId),
    #[error("workspace {0:?} not found")]
    WorkspaceNotFound(WorkspaceId),
    #[error("no workspace named {0:?}")]
    NoWorkspaceNamed(String),
    #[error("no workspace assigned to monitor {0:?}")]
    NoWorkspaceForMonitor(MonitorId),
    #[error("could not obtain the actual rectangle of window {0:?}")]
    RectangleUnavailable(WindowId),
}
