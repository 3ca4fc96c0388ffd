use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::common::config::LayoutSettings;
use crate::layout_engine::FloatingRegistry;
use crate::model::error::StoreError;
use crate::model::pickers;
use crate::model::state::RootState;
use crate::model::swap::SwapArc;
use crate::model::transforms::Transform;
use crate::model::workspace::WorkspaceId;
use crate::sys::providers::{EngineCtx, Providers};
use crate::sys::window::{WindowSize, WindowState};

/// Single source of truth for workspace and window state. Writers funnel
/// through [`Store::dispatch`] one at a time; readers grab a lock-free
/// snapshot at any moment and never observe a half-applied transform.
pub struct Store {
    snapshot: SwapArc<RootState>,
    write_lock: Mutex<()>,
    providers: Providers,
    floating: FloatingRegistry,
    settings: LayoutSettings,
}

impl Store {
    /// Seeds the monitor sector from the geometry provider.
    pub fn new(providers: Providers, settings: LayoutSettings) -> Self {
        let monitors = providers.monitors.monitors();
        debug!("store starting with {} monitor(s)", monitors.len());
        Self {
            snapshot: SwapArc::from_value(RootState::with_monitors(monitors)),
            write_lock: Mutex::new(()),
            providers,
            floating: FloatingRegistry::new(),
            settings,
        }
    }

    /// The latest published snapshot. Holding it keeps that generation
    /// alive; later dispatches publish new generations without disturbing it.
    pub fn current(&self) -> Arc<RootState> {
        self.snapshot.load()
    }

    /// Runs a read-only picker against the latest snapshot.
    pub fn pick<R>(&self, picker: impl FnOnce(&RootState) -> R) -> R {
        self.snapshot.with(picker)
    }

    pub fn floating_registry(&self) -> &FloatingRegistry { &self.floating }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    fn engine_ctx(&self) -> EngineCtx<'_> {
        EngineCtx {
            providers: &self.providers,
            floating: &self.floating,
            settings: &self.settings,
        }
    }

    /// Applies a transform. On success the new snapshot is published
    /// atomically; on error the previous snapshot stays current.
    pub fn dispatch(&self, transform: Transform) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load();
        match transform.execute(&current, &self.engine_ctx()) {
            Ok(next) => {
                self.snapshot.store(Arc::new(next));
                Ok(())
            }
            Err(err) => {
                error!("transform {transform:?} failed: {err}");
                Err(err)
            }
        }
    }

    /// Computes the window placements for a workspace on its monitor
    /// without touching the OS.
    pub fn layout_workspace(&self, id: WorkspaceId) -> Result<Vec<WindowState>, StoreError> {
        let state = self.current();
        let workspace = pickers::workspace_by_id(&state, id)?;
        let monitor = *pickers::monitor_for_workspace(&state, id)?;
        Ok(workspace.do_layout(monitor.working_area, &monitor, &self.engine_ctx()))
    }

    /// Computes and pushes a workspace's layout through the window provider.
    pub fn apply_layout(&self, id: WorkspaceId) -> Result<(), StoreError> {
        for placement in self.layout_workspace(id)? {
            let ops = &self.providers.window_ops;
            match placement.size {
                WindowSize::Normal => ops.set_rectangle(placement.window, placement.rect),
                WindowSize::Minimized => ops.minimize(placement.window),
                WindowSize::Maximized => {
                    ops.set_rectangle(placement.window, placement.rect);
                    ops.maximize(placement.window);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::{Direction, Edges, LayoutEngine, Orientation};
    use crate::sys::geometry::{Point, Rect};
    use crate::sys::screen::{Monitor, MonitorId};
    use crate::test_support::{
        FakeWindowOps, fake_providers, make_wid, second_monitor, single_monitor,
    };

    fn store_on(monitors: Vec<Monitor>) -> (Store, Arc<FakeWindowOps>) {
        let (providers, ops) = fake_providers(monitors);
        (Store::new(providers, LayoutSettings::default()), ops)
    }

    fn create_workspace(
        store: &Store,
        name: &str,
        engines: Vec<LayoutEngine>,
        monitor: MonitorId,
    ) -> WorkspaceId {
        store
            .dispatch(Transform::CreateWorkspace {
                name: name.to_owned(),
                engines,
                monitor,
            })
            .unwrap();
        store.pick(|s| pickers::workspace_by_name(s, name).unwrap().id)
    }

    #[test_log::test]
    fn add_window_updates_workspace_and_map_sector() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let w1 = make_wid(100, 1);

        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();

        store.pick(|s| {
            assert!(pickers::workspace_by_id(s, ws).unwrap().contains_window(w1));
            assert_eq!(pickers::workspace_by_window(s, w1).unwrap().id, ws);
            assert_eq!(pickers::all_windows(s).collect::<Vec<_>>(), vec![(w1, ws)]);
        });
    }

    #[test_log::test]
    fn remove_window_keeps_sectors_in_agreement() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let w1 = make_wid(100, 1);
        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();

        store.dispatch(Transform::RemoveWindow { window: w1 }).unwrap();

        store.pick(|s| {
            assert!(!pickers::workspace_by_id(s, ws).unwrap().contains_window(w1));
            assert!(s.maps.window_to_workspace.is_empty());
        });
    }

    #[test_log::test]
    fn swap_touches_only_the_active_engine() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![
                LayoutEngine::stack(Orientation::Horizontal),
                LayoutEngine::stack(Orientation::Vertical),
            ],
            MonitorId(0),
        );
        let (w1, w2) = (make_wid(100, 1), make_wid(100, 2));
        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();
        store.dispatch(Transform::AddWindow { window: w2, workspace: ws }).unwrap();

        let inactive_before = store
            .pick(|s| pickers::workspace_by_id(s, ws).unwrap().layout_engines()[1].clone());

        store
            .dispatch(Transform::SwapWindowInDirection {
                workspace: ws,
                window: w1,
                direction: Direction::Right,
            })
            .unwrap();

        store.pick(|s| {
            let workspace = pickers::workspace_by_id(s, ws).unwrap();
            assert_eq!(workspace.layout_engines()[0].first_window(), Some(w2));
            assert_eq!(workspace.layout_engines()[1], inactive_before);
        });
    }

    #[test_log::test]
    fn failed_transform_leaves_snapshot_untouched() {
        let (store, _) = store_on(vec![single_monitor()]);
        create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let before = store.current();

        let err = store
            .dispatch(Transform::MoveWindowToPoint {
                window: make_wid(99, 1),
                point: Point::new(0.5, 0.5),
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::NoValidWindow(_)));
        assert!(Arc::ptr_eq(&before, &store.current()));
    }

    #[test_log::test]
    fn held_snapshot_survives_later_dispatches() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let w1 = make_wid(100, 1);
        let old = store.current();

        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();

        assert!(!pickers::workspace_by_id(&old, ws).unwrap().contains_window(w1));
        store.pick(|s| {
            assert!(pickers::workspace_by_id(s, ws).unwrap().contains_window(w1));
        });
    }

    #[test_log::test]
    fn unchanged_sectors_are_shared_between_generations() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let before = store.current();

        store
            .dispatch(Transform::ActivateNextLayoutEngine { workspace: ws })
            .unwrap();

        let after = store.current();
        assert!(Arc::ptr_eq(&before.maps, &after.maps));
        assert!(Arc::ptr_eq(&before.monitors, &after.monitors));
        assert!(!Arc::ptr_eq(&before.workspaces, &after.workspaces));
    }

    #[test_log::test]
    fn activating_engines_cycles_without_touching_instances() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![
                LayoutEngine::stack(Orientation::Horizontal),
                LayoutEngine::free(),
            ],
            MonitorId(0),
        );
        let engines_before =
            store.pick(|s| pickers::workspace_by_id(s, ws).unwrap().layout_engines().to_vec());

        store.dispatch(Transform::ActivateNextLayoutEngine { workspace: ws }).unwrap();
        store.pick(|s| {
            assert_eq!(pickers::workspace_by_id(s, ws).unwrap().active_engine_idx(), 1);
        });

        store.dispatch(Transform::ActivateNextLayoutEngine { workspace: ws }).unwrap();
        store.pick(|s| {
            let workspace = pickers::workspace_by_id(s, ws).unwrap();
            assert_eq!(workspace.active_engine_idx(), 0);
            assert_eq!(workspace.layout_engines(), engines_before.as_slice());
        });

        store.dispatch(Transform::ActivatePrevLayoutEngine { workspace: ws }).unwrap();
        store.pick(|s| {
            assert_eq!(pickers::workspace_by_id(s, ws).unwrap().active_engine_idx(), 1);
        });
    }

    #[test_log::test]
    fn dragging_edges_across_monitors_migrates_the_window() {
        let (store, ops) = store_on(vec![single_monitor(), second_monitor()]);
        let main = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let side = create_workspace(
            &store,
            "side",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(1),
        );
        let w1 = make_wid(100, 1);
        store.dispatch(Transform::AddWindow { window: w1, workspace: main }).unwrap();

        // The drag has already put the window's origin on the second monitor.
        ops.set_actual_rect(w1, Rect::new(2000, 100, 800, 600));
        store
            .dispatch(Transform::MoveWindowEdgesInDirection {
                edges: Edges::RIGHT,
                pixel_deltas: Point::new(64, 0),
                window: w1,
            })
            .unwrap();

        store.pick(|s| {
            assert_eq!(pickers::workspace_by_window(s, w1).unwrap().id, side);
            assert!(!pickers::workspace_by_id(s, main).unwrap().contains_window(w1));
            assert!(pickers::workspace_by_id(s, side).unwrap().contains_window(w1));
        });
    }

    #[test_log::test]
    fn edge_move_without_actual_rectangle_fails_cleanly() {
        let (store, _) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let w1 = make_wid(100, 1);
        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();
        let before = store.current();

        let err = store
            .dispatch(Transform::MoveWindowEdgesInDirection {
                edges: Edges::LEFT,
                pixel_deltas: Point::new(-32, 0),
                window: w1,
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::RectangleUnavailable(_)));
        assert!(Arc::ptr_eq(&before, &store.current()));
    }

    #[test_log::test]
    fn toggling_floating_moves_a_window_between_tracker_and_tiles() {
        let (store, ops) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::floating_proxy(LayoutEngine::stack(
                Orientation::Horizontal,
            ))],
            MonitorId(0),
        );
        let (w1, w2) = (make_wid(100, 1), make_wid(100, 2));
        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();
        store.dispatch(Transform::AddWindow { window: w2, workspace: ws }).unwrap();

        let float_rect = Rect::new(200, 140, 640, 400);
        ops.set_actual_rect(w1, float_rect);
        store.dispatch(Transform::ToggleWindowFloating { window: w1 }).unwrap();

        let placements = store.layout_workspace(ws).unwrap();
        let floated = placements.iter().find(|p| p.window == w1).unwrap();
        let tiled = placements.iter().find(|p| p.window == w2).unwrap();
        assert_eq!(floated.rect, float_rect);
        // The remaining tiled window takes the whole working area.
        assert_eq!(tiled.rect, single_monitor().working_area);

        store.dispatch(Transform::ToggleWindowFloating { window: w1 }).unwrap();
        let placements = store.layout_workspace(ws).unwrap();
        let widths: Vec<i32> = placements.iter().map(|p| p.rect.width).collect();
        assert_eq!(widths, vec![960, 960]);
    }

    #[test_log::test]
    fn apply_layout_pushes_rectangles_through_the_provider() {
        let (store, ops) = store_on(vec![single_monitor()]);
        let ws = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let (w1, w2) = (make_wid(100, 1), make_wid(100, 2));
        store.dispatch(Transform::AddWindow { window: w1, workspace: ws }).unwrap();
        store.dispatch(Transform::AddWindow { window: w2, workspace: ws }).unwrap();

        store.apply_layout(ws).unwrap();

        let rects = ops.rects.read();
        assert_eq!(rects[&w1], Rect::new(0, 40, 960, 1040));
        assert_eq!(rects[&w2], Rect::new(960, 40, 960, 1040));
    }

    #[test_log::test]
    fn moving_to_another_workspace_reassigns_membership() {
        let (store, _) = store_on(vec![single_monitor(), second_monitor()]);
        let main = create_workspace(
            &store,
            "main",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(0),
        );
        let side = create_workspace(
            &store,
            "side",
            vec![LayoutEngine::stack(Orientation::Horizontal)],
            MonitorId(1),
        );
        let w1 = make_wid(100, 1);
        store.dispatch(Transform::AddWindow { window: w1, workspace: main }).unwrap();

        store
            .dispatch(Transform::MoveWindowToWorkspace { window: w1, workspace: side })
            .unwrap();

        store.pick(|s| {
            assert!(!pickers::workspace_by_id(s, main).unwrap().contains_window(w1));
            assert_eq!(pickers::workspace_by_window(s, w1).unwrap().id, side);
        });
    }
}
