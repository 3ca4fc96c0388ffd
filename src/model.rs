mod error;
mod pickers;
mod state;
mod store;
mod swap;
mod transforms;
mod workspace;

pub use error::StoreError;
pub use pickers::{
    all_windows, monitor_at_point, monitor_by_id, monitor_for_workspace, workspace_by_id,
    workspace_by_name, workspace_by_window, workspace_for_monitor,
};
pub use state::{MapSector, MonitorSector, RootState, WorkspaceSector};
pub use store::Store;
pub use swap::SwapArc;
pub use transforms::Transform;
pub use workspace::{Workspace, WorkspaceId};
