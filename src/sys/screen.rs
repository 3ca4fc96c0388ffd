use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(pub u32);

/// A physical display: its full device frame and the working area that
/// excludes taskbars and docks. All layout output is expressed relative to
/// the working area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: MonitorId,
    pub frame: Rect<i32>,
    pub working_area: Rect<i32>,
}

impl Monitor {
    pub fn contains_point(&self, point: Point<i32>) -> bool {
        self.frame.contains_point(point)
    }
}
