use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::config::GapSettings;
use crate::layout_engine::engine::{CustomAction, EngineIdentity};
use crate::layout_engine::{Direction, Edges, Orientation};
use crate::sys::geometry::{Point, Rect};
use crate::sys::providers::EngineCtx;
use crate::sys::screen::Monitor;
use crate::sys::window::{WindowId, WindowSize, WindowState};

/// Ordered stack of windows tiled along one axis, with per-window weights.
/// Every mutation returns a new instance; the stack and weight vectors are
/// shared across generations until a change copies them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackEngine {
    identity: EngineIdentity,
    orientation: Orientation,
    stack: Arc<Vec<WindowId>>,
    weights: Arc<Vec<f64>>,
}

impl StackEngine {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            identity: EngineIdentity::next(),
            orientation,
            stack: Arc::new(Vec::new()),
            weights: Arc::new(Vec::new()),
        }
    }

    pub fn identity(&self) -> EngineIdentity { self.identity }

    pub fn orientation(&self) -> Orientation { self.orientation }

    pub fn len(&self) -> usize { self.stack.len() }

    pub fn is_empty(&self) -> bool { self.stack.is_empty() }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.stack.contains(&window)
    }

    pub fn first_window(&self) -> Option<WindowId> { self.stack.first().copied() }

    fn index_of(&self, window: WindowId) -> Option<usize> {
        self.stack.iter().position(|&w| w == window)
    }

    fn with_stack(&self, stack: Vec<WindowId>, weights: Vec<f64>) -> Self {
        debug_assert_eq!(stack.len(), weights.len());
        Self {
            identity: self.identity,
            orientation: self.orientation,
            stack: Arc::new(stack),
            weights: Arc::new(weights),
        }
    }

    pub fn add_window(&self, window: WindowId) -> Self {
        if self.contains_window(window) {
            debug!("window {window:?} already in stack engine");
            return self.clone();
        }
        let mut stack = (*self.stack).clone();
        let mut weights = (*self.weights).clone();
        let weight = if weights.is_empty() {
            1.0
        } else {
            weights.iter().sum::<f64>() / weights.len() as f64
        };
        stack.push(window);
        weights.push(weight);
        self.with_stack(stack, weights)
    }

    pub fn remove_window(&self, window: WindowId) -> Self {
        let Some(idx) = self.index_of(window) else {
            return self.clone();
        };
        let mut stack = (*self.stack).clone();
        let mut weights = (*self.weights).clone();
        stack.remove(idx);
        weights.remove(idx);
        self.with_stack(stack, weights)
    }

    /// Reorders `window` to the slot under `point` (unit-square space), or
    /// inserts it there if it is not yet tracked.
    pub fn move_window_to_point(&self, window: WindowId, point: Point<f64>) -> Self {
        let mut stack = (*self.stack).clone();
        let mut weights = (*self.weights).clone();
        let weight = match self.index_of(window) {
            Some(idx) => {
                stack.remove(idx);
                weights.remove(idx)
            }
            None if weights.is_empty() => 1.0,
            None => weights.iter().sum::<f64>() / weights.len() as f64,
        };
        let along = match self.orientation {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        };
        let slot = ((along * (stack.len() + 1) as f64).floor() as usize).min(stack.len());
        stack.insert(slot, window);
        weights.insert(slot, weight);
        self.with_stack(stack, weights)
    }

    /// Moves the boundary between `window` and its neighbor by the unit
    /// delta. Positive deltas move the affected edge in the direction of
    /// that edge.
    pub fn move_window_edges_in_direction(
        &self,
        edges: Edges,
        deltas: Point<f64>,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> Self {
        let Some(idx) = self.index_of(window) else {
            return self.clone();
        };
        let (leading, trailing, delta) = match self.orientation {
            Orientation::Horizontal => (Edges::LEFT, Edges::RIGHT, deltas.x),
            Orientation::Vertical => (Edges::UP, Edges::DOWN, deltas.y),
        };

        let mut shares = self.normalized_weights();
        let min = ctx.settings.min_stack_ratio;
        if edges.contains(leading) && idx > 0 {
            transfer(&mut shares, idx, idx - 1, delta, min);
        }
        if edges.contains(trailing) && idx + 1 < shares.len() {
            transfer(&mut shares, idx, idx + 1, delta, min);
        }
        if shares == self.normalized_weights() {
            return self.clone();
        }
        self.with_stack((*self.stack).clone(), shares)
    }

    /// Focuses the stack neighbor in `direction`. Off-axis directions are
    /// no-ops. Focus does not change layout state.
    pub fn focus_window_in_direction(
        &self,
        direction: Direction,
        window: WindowId,
        ctx: &EngineCtx<'_>,
    ) -> Self {
        if let Some(target) = self.window_in_direction(direction, window) {
            ctx.providers.window_ops.focus(target);
        }
        self.clone()
    }

    pub fn swap_window_in_direction(&self, direction: Direction, window: WindowId) -> Self {
        let Some(idx) = self.index_of(window) else {
            return self.clone();
        };
        let Some(other) = self.neighbor_index(idx, direction) else {
            return self.clone();
        };
        let mut stack = (*self.stack).clone();
        let mut weights = (*self.weights).clone();
        stack.swap(idx, other);
        weights.swap(idx, other);
        self.with_stack(stack, weights)
    }

    pub fn window_in_direction(&self, direction: Direction, window: WindowId) -> Option<WindowId> {
        let idx = self.index_of(window)?;
        let other = self.neighbor_index(idx, direction)?;
        Some(self.stack[other])
    }

    fn neighbor_index(&self, idx: usize, direction: Direction) -> Option<usize> {
        let backward = direction.is_backward(self.orientation)?;
        let len = self.stack.len();
        if len < 2 {
            return None;
        }
        Some(if backward { (idx + len - 1) % len } else { (idx + 1) % len })
    }

    pub fn perform_custom_action(&self, action: &CustomAction) -> Self {
        match action.name.as_str() {
            "stack.rotate" if self.stack.len() > 1 => {
                let mut stack = (*self.stack).clone();
                let mut weights = (*self.weights).clone();
                stack.rotate_left(1);
                weights.rotate_left(1);
                self.with_stack(stack, weights)
            }
            "stack.reset_weights" if !self.weights.is_empty() => {
                let equal = vec![1.0 / self.weights.len() as f64; self.weights.len()];
                self.with_stack((*self.stack).clone(), equal)
            }
            _ => self.clone(),
        }
    }

    /// Splits the tiling area among non-minimized, non-maximized windows in
    /// stack order, weighted. Maximized windows span the whole working
    /// area; minimized windows keep their spot but are tagged so the caller
    /// minimizes them.
    pub fn do_layout(
        &self,
        working_area: Rect<i32>,
        _monitor: &Monitor,
        ctx: &EngineCtx<'_>,
    ) -> Vec<WindowState> {
        let area = apply_outer_gaps(working_area, &ctx.settings.gaps);
        let sizes: Vec<WindowSize> =
            self.stack.iter().map(|&w| ctx.providers.window_size(w)).collect();

        let tiled: Vec<usize> = (0..self.stack.len())
            .filter(|&i| sizes[i] == WindowSize::Normal)
            .collect();
        let tiled_weight: f64 = tiled.iter().map(|&i| self.weights[i]).sum();

        let (inner_gap, total, cross_start, cross_len) = match self.orientation {
            Orientation::Horizontal => (
                ctx.settings.gaps.inner.horizontal,
                area.width,
                area.y,
                area.height,
            ),
            Orientation::Vertical => (
                ctx.settings.gaps.inner.vertical,
                area.height,
                area.x,
                area.width,
            ),
        };
        let gap_total = inner_gap * tiled.len().saturating_sub(1) as f64;
        let usable = (f64::from(total) - gap_total).max(0.0);

        let mut out = Vec::with_capacity(self.stack.len());
        let mut cursor = match self.orientation {
            Orientation::Horizontal => f64::from(area.x),
            Orientation::Vertical => f64::from(area.y),
        };
        let mut tiled_seen = 0usize;
        for (i, &window) in self.stack.iter().enumerate() {
            match sizes[i] {
                WindowSize::Maximized => out.push(WindowState {
                    window,
                    rect: working_area,
                    size: WindowSize::Maximized,
                }),
                WindowSize::Minimized => out.push(WindowState {
                    window,
                    rect: area,
                    size: WindowSize::Minimized,
                }),
                WindowSize::Normal => {
                    let share = if tiled_weight > 0.0 {
                        self.weights[i] / tiled_weight
                    } else {
                        1.0 / tiled.len().max(1) as f64
                    };
                    tiled_seen += 1;
                    let extent = if tiled_seen == tiled.len() {
                        // Last tile absorbs rounding remainder.
                        match self.orientation {
                            Orientation::Horizontal => f64::from(area.x + area.width) - cursor,
                            Orientation::Vertical => f64::from(area.y + area.height) - cursor,
                        }
                    } else {
                        (share * usable).round()
                    };
                    let rect = match self.orientation {
                        Orientation::Horizontal => Rect::new(
                            cursor.round() as i32,
                            cross_start,
                            extent.round() as i32,
                            cross_len,
                        ),
                        Orientation::Vertical => Rect::new(
                            cross_start,
                            cursor.round() as i32,
                            cross_len,
                            extent.round() as i32,
                        ),
                    };
                    cursor += extent + inner_gap;
                    out.push(WindowState { window, rect, size: WindowSize::Normal });
                }
            }
        }
        out
    }

    fn normalized_weights(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().sum();
        if total <= 0.0 {
            return vec![0.0; self.weights.len()];
        }
        self.weights.iter().map(|w| w / total).collect()
    }
}

/// Shifts `delta` of the total axis from `to` into `from`, clamped so
/// neither share drops below `min`.
fn transfer(shares: &mut [f64], from: usize, to: usize, delta: f64, min: f64) {
    let delta = delta.min((shares[to] - min).max(0.0)).max((-(shares[from] - min)).min(0.0));
    shares[from] += delta;
    shares[to] -= delta;
}

fn apply_outer_gaps(screen: Rect<i32>, gaps: &GapSettings) -> Rect<i32> {
    if gaps.outer.top == 0.0
        && gaps.outer.left == 0.0
        && gaps.outer.bottom == 0.0
        && gaps.outer.right == 0.0
    {
        return screen;
    }
    Rect {
        x: screen.x + gaps.outer.left.round() as i32,
        y: screen.y + gaps.outer.top.round() as i32,
        width: (f64::from(screen.width) - gaps.outer.left - gaps.outer.right).max(0.0).round()
            as i32,
        height: (f64::from(screen.height) - gaps.outer.top - gaps.outer.bottom).max(0.0).round()
            as i32,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::LayoutSettings;
    use crate::layout_engine::FloatingRegistry;
    use crate::sys::providers::WindowOps;
    use crate::test_support::{fake_providers, make_wid, single_monitor};

    struct Fixture {
        providers: crate::sys::providers::Providers,
        ops: std::sync::Arc<crate::test_support::FakeWindowOps>,
        registry: FloatingRegistry,
        settings: LayoutSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let (providers, ops) = fake_providers(vec![single_monitor()]);
            Self {
                providers,
                ops,
                registry: FloatingRegistry::new(),
                settings: LayoutSettings::default(),
            }
        }

        fn ctx(&self) -> EngineCtx<'_> {
            EngineCtx {
                providers: &self.providers,
                floating: &self.registry,
                settings: &self.settings,
            }
        }
    }

    #[test]
    fn add_window_leaves_receiver_untouched() {
        let empty = StackEngine::new(Orientation::Horizontal);
        let one = empty.add_window(make_wid(1, 1));

        assert_eq!(empty.len(), 0);
        assert_eq!(one.len(), 1);
        assert_eq!(one.identity(), empty.identity());
    }

    #[test]
    fn add_existing_window_is_noop() {
        let w = make_wid(1, 1);
        let engine = StackEngine::new(Orientation::Horizontal).add_window(w);
        let again = engine.add_window(w);
        assert_eq!(again, engine);
        assert!(Arc::ptr_eq(&again.stack, &engine.stack));
    }

    #[test]
    fn layout_splits_equally_without_gaps() {
        let fixture = Fixture::new();
        let monitor = single_monitor();
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine =
            StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);

        let layout = engine.do_layout(Rect::new(0, 0, 1000, 500), &monitor, &fixture.ctx());
        assert_eq!(layout, vec![
            WindowState {
                window: w1,
                rect: Rect::new(0, 0, 500, 500),
                size: WindowSize::Normal,
            },
            WindowState {
                window: w2,
                rect: Rect::new(500, 0, 500, 500),
                size: WindowSize::Normal,
            },
        ]);
    }

    #[test]
    fn layout_applies_gaps() {
        let mut fixture = Fixture::new();
        fixture.settings.gaps.outer =
            crate::common::config::OuterGaps { top: 10.0, left: 10.0, bottom: 10.0, right: 10.0 };
        fixture.settings.gaps.inner.horizontal = 20.0;
        let monitor = single_monitor();
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine =
            StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);

        let layout = engine.do_layout(Rect::new(0, 0, 1000, 500), &monitor, &fixture.ctx());
        assert_eq!(layout[0].rect, Rect::new(10, 10, 480, 480));
        assert_eq!(layout[1].rect, Rect::new(510, 10, 480, 480));
    }

    #[test]
    fn minimized_windows_are_excluded_from_split() {
        let fixture = Fixture::new();
        let monitor = single_monitor();
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        fixture.ops.minimize(w2);
        let engine =
            StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);

        let layout = engine.do_layout(Rect::new(0, 0, 1000, 500), &monitor, &fixture.ctx());
        assert_eq!(layout[0].rect, Rect::new(0, 0, 1000, 500));
        assert_eq!(layout[1].size, WindowSize::Minimized);
    }

    #[test]
    fn swap_in_direction_swaps_neighbors() {
        let (w1, w2, w3) = (make_wid(1, 1), make_wid(1, 2), make_wid(1, 3));
        let engine = StackEngine::new(Orientation::Horizontal)
            .add_window(w1)
            .add_window(w2)
            .add_window(w3);

        let swapped = engine.swap_window_in_direction(Direction::Right, w1);
        assert_eq!(*swapped.stack, vec![w2, w1, w3]);
        // Receiver unchanged.
        assert_eq!(*engine.stack, vec![w1, w2, w3]);
    }

    #[test]
    fn swap_off_axis_is_noop() {
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine = StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);
        let same = engine.swap_window_in_direction(Direction::Down, w1);
        assert!(Arc::ptr_eq(&same.stack, &engine.stack));
    }

    #[test]
    fn focus_in_direction_asks_provider() {
        let fixture = Fixture::new();
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine = StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);

        engine.focus_window_in_direction(Direction::Right, w1, &fixture.ctx());
        assert_eq!(*fixture.ops.focused.read(), vec![w2]);
    }

    #[test]
    fn move_edges_transfers_weight_to_neighbor() {
        let fixture = Fixture::new();
        let monitor = single_monitor();
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine = StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);

        let resized = engine.move_window_edges_in_direction(
            Edges::RIGHT,
            Point::new(0.1, 0.0),
            w1,
            &fixture.ctx(),
        );
        let layout = resized.do_layout(Rect::new(0, 0, 1000, 500), &monitor, &fixture.ctx());
        assert_eq!(layout[0].rect.width, 600);
        assert_eq!(layout[1].rect.width, 400);
    }

    #[test]
    fn move_edges_respects_min_ratio() {
        let fixture = Fixture::new();
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine = StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);

        let resized = engine.move_window_edges_in_direction(
            Edges::RIGHT,
            Point::new(5.0, 0.0),
            w1,
            &fixture.ctx(),
        );
        let shares = resized.normalized_weights();
        assert!(shares[1] >= fixture.settings.min_stack_ratio - 1e-9);
    }

    #[test]
    fn move_to_point_reorders() {
        let (w1, w2, w3) = (make_wid(1, 1), make_wid(1, 2), make_wid(1, 3));
        let engine = StackEngine::new(Orientation::Horizontal)
            .add_window(w1)
            .add_window(w2)
            .add_window(w3);

        let moved = engine.move_window_to_point(w3, Point::new(0.1, 0.5));
        assert_eq!(*moved.stack, vec![w3, w1, w2]);
    }

    #[test]
    fn rotate_custom_action() {
        let (w1, w2) = (make_wid(1, 1), make_wid(1, 2));
        let engine = StackEngine::new(Orientation::Horizontal).add_window(w1).add_window(w2);
        let rotated = engine.perform_custom_action(&CustomAction {
            name: "stack.rotate".into(),
            window: None,
        });
        assert_eq!(*rotated.stack, vec![w2, w1]);
    }
}
