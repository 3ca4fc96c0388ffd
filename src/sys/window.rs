use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::sys::geometry::Rect;

#[allow(non_camel_case_types)]
pub type pid_t = i32;

/// Stable, opaque window handle. Identity is handle equality; the window's
/// lifecycle is driven by the external window-identity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId {
    pub pid: pid_t,
    pub idx: NonZeroU32,
}

impl WindowId {
    pub fn new(pid: pid_t, idx: u32) -> Self {
        Self {
            pid,
            idx: NonZeroU32::new(idx).expect("window index must be nonzero"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSize {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// One entry of a layout: where a window should go and in which size state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub window: WindowId,
    pub rect: Rect<i32>,
    pub size: WindowSize,
}
