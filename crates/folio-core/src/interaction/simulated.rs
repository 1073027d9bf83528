//! Headless drag engine driven by explicit pointer positions.

use super::{DragEngine, DragHandle, DragMoveEvent, DragOptions, Restriction};
use crate::ids::BlockId;
use crate::snap::snap_point;
use crate::tree::NodeId;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// Velocity multiplier applied per inertia step.
pub const INERTIA_RESISTANCE: f64 = 0.5;
/// Inertia stops once the velocity drops below this speed (px per step).
pub const INERTIA_MIN_SPEED: f64 = 1.0;
const MAX_INERTIA_STEPS: usize = 32;

#[derive(Debug, Clone)]
struct Draggable {
    id: BlockId,
    options: DragOptions,
}

#[derive(Debug, Clone)]
struct Gesture {
    handle: DragHandle,
    id: BlockId,
    options: DragOptions,
    pointer_start: Point,
    last_pointer: Point,
    position_start: Point,
    /// Last emitted offset.
    position: Point,
    /// Unsnapped offset following the pointer.
    raw: Point,
    velocity: Vec2,
    bounds: Option<Rect>,
}

impl Gesture {
    fn emit(&mut self, target: Point, events: &mut Vec<DragMoveEvent>) {
        let delta = target - self.position;
        if delta == Vec2::ZERO {
            return;
        }
        self.position = target;
        events.push(DragMoveEvent {
            target: self.id.clone(),
            delta,
        });
    }

    fn snapped(&self) -> Point {
        snap_point(self.raw, self.options.snap_grid, self.options.snap_range)
    }

    fn restricted(&self) -> Option<Rect> {
        self.bounds
            .filter(|_| self.options.restrict_to == Restriction::Parent)
    }
}

/// A drag engine that replays pointer paths.
///
/// Implements grid snapping, restriction (continuous or on release),
/// inertial release and gesture cancel. The engine keeps no offsets between
/// gestures: each gesture starts from the offset the caller passes to
/// [`SimulatedDragEngine::begin`], and emitted deltas are relative to the
/// previously emitted offset.
#[derive(Debug, Default)]
pub struct SimulatedDragEngine {
    next_handle: u64,
    draggables: HashMap<DragHandle, Draggable>,
    handles: HashMap<BlockId, DragHandle>,
    gesture: Option<Gesture>,
    events: Vec<DragMoveEvent>,
}

fn clamp(point: Point, bounds: Rect) -> Point {
    Point::new(
        point.x.max(bounds.x0).min(bounds.x1),
        point.y.max(bounds.y0).min(bounds.y1),
    )
}

impl SimulatedDragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a block is registered.
    pub fn is_draggable(&self, id: &BlockId) -> bool {
        self.handles.contains_key(id)
    }

    /// Offset of the block under the active gesture.
    pub fn gesture_position(&self) -> Option<Point> {
        self.gesture.as_ref().map(|g| g.position)
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture on a block currently at `offset`. `bounds` is the
    /// allowed offset range used for parent restriction. Returns false if the
    /// block is not draggable or a gesture is already in progress.
    pub fn begin(&mut self, id: &BlockId, pointer: Point, offset: Vec2, bounds: Option<Rect>) -> bool {
        if self.gesture.is_some() {
            log::warn!("Drag on {} ignored: another gesture is in progress", id);
            return false;
        }
        let Some(&handle) = self.handles.get(id) else {
            return false;
        };
        let Some(draggable) = self.draggables.get(&handle) else {
            return false;
        };
        let start = offset.to_point();
        self.gesture = Some(Gesture {
            handle,
            id: draggable.id.clone(),
            options: draggable.options,
            pointer_start: pointer,
            last_pointer: pointer,
            position_start: start,
            position: start,
            raw: start,
            velocity: Vec2::ZERO,
            bounds,
        });
        true
    }

    /// Move the pointer of the active gesture.
    pub fn move_to(&mut self, pointer: Point) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        gesture.velocity = pointer - gesture.last_pointer;
        gesture.last_pointer = pointer;
        gesture.raw = gesture.position_start + (pointer - gesture.pointer_start);

        let mut target = gesture.snapped();
        if let Some(bounds) = gesture.restricted() {
            if !gesture.options.restrict_end_only {
                target = clamp(target, bounds);
            }
        }
        gesture.emit(target, &mut self.events);
        true
    }

    /// Release the pointer: run inertia, then the end-only restriction.
    pub fn end(&mut self) -> bool {
        let Some(mut gesture) = self.gesture.take() else {
            return false;
        };

        if gesture.options.inertia {
            let mut velocity = gesture.velocity;
            for _ in 0..MAX_INERTIA_STEPS {
                velocity = velocity * INERTIA_RESISTANCE;
                if velocity.hypot() < INERTIA_MIN_SPEED {
                    break;
                }
                gesture.raw += velocity;
                let target = gesture.snapped();
                gesture.emit(target, &mut self.events);
            }
        }

        if let Some(bounds) = gesture.restricted() {
            let target = clamp(gesture.position, bounds);
            gesture.emit(target, &mut self.events);
        }
        true
    }

    /// Abort the active gesture without inertia or restriction.
    pub fn cancel(&mut self) -> bool {
        self.gesture.take().is_some()
    }
}

impl DragEngine for SimulatedDragEngine {
    fn make_draggable(&mut self, _node: NodeId, id: &BlockId, options: DragOptions) -> DragHandle {
        if let Some(&existing) = self.handles.get(id) {
            return existing;
        }
        self.next_handle += 1;
        let handle = DragHandle(self.next_handle);
        self.draggables.insert(
            handle,
            Draggable {
                id: id.clone(),
                options,
            },
        );
        self.handles.insert(id.clone(), handle);
        handle
    }

    fn release(&mut self, handle: DragHandle) -> bool {
        let Some(draggable) = self.draggables.remove(&handle) else {
            return false;
        };
        self.handles.remove(&draggable.id);
        if self.gesture.as_ref().is_some_and(|g| g.handle == handle) {
            self.gesture = None;
        }
        true
    }

    fn drain_moves(&mut self) -> Vec<DragMoveEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(options: DragOptions) -> (SimulatedDragEngine, BlockId) {
        let mut engine = SimulatedDragEngine::new();
        let id = BlockId::new("block_1");
        engine.make_draggable(NodeId(1), &id, options);
        (engine, id)
    }

    fn total(events: &[DragMoveEvent]) -> Vec2 {
        events.iter().fold(Vec2::ZERO, |sum, e| sum + e.delta)
    }

    fn no_inertia() -> DragOptions {
        DragOptions {
            inertia: false,
            ..DragOptions::default()
        }
    }

    #[test]
    fn test_moves_snap_to_grid() {
        let (mut engine, id) = engine_with(no_inertia());
        assert!(engine.begin(&id, Point::new(100.0, 100.0), Vec2::ZERO, None));
        engine.move_to(Point::new(108.0, 104.0));
        engine.move_to(Point::new(131.0, 96.0));
        assert_eq!(engine.gesture_position(), Some(Point::new(30.0, 0.0)));
        engine.end();

        let events = engine.drain_moves();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].delta, Vec2::new(15.0, 0.0));
        assert_eq!(events[1].delta, Vec2::new(15.0, 0.0));
        assert!(engine.drain_moves().is_empty());
        assert_eq!(engine.gesture_position(), None);
    }

    #[test]
    fn test_moves_below_half_grid_emit_nothing() {
        let (mut engine, id) = engine_with(no_inertia());
        engine.begin(&id, Point::ORIGIN, Vec2::ZERO, None);
        engine.move_to(Point::new(4.0, -6.0));
        engine.end();
        assert!(engine.drain_moves().is_empty());
    }

    #[test]
    fn test_gesture_starts_from_given_offset() {
        let (mut engine, id) = engine_with(no_inertia());
        engine.begin(&id, Point::ORIGIN, Vec2::new(45.0, 30.0), None);
        engine.move_to(Point::new(16.0, 0.0));

        let events = engine.drain_moves();
        assert_eq!(total(&events), Vec2::new(15.0, 0.0));
        assert_eq!(engine.gesture_position(), Some(Point::new(60.0, 30.0)));
    }

    #[test]
    fn test_release_clamp_uses_given_offset() {
        let (mut engine, id) = engine_with(no_inertia());
        let bounds = Rect::new(-30.0, -30.0, 700.0, 60.0);
        // The block was already moved to x = 690 outside this engine.
        engine.begin(&id, Point::ORIGIN, Vec2::new(690.0, 0.0), Some(bounds));
        engine.move_to(Point::new(30.0, 0.0));
        engine.end();

        let events = engine.drain_moves();
        assert_eq!(events.last().unwrap().delta, Vec2::new(-20.0, 0.0));
        assert_eq!(Vec2::new(690.0, 0.0) + total(&events), Vec2::new(700.0, 0.0));
    }

    #[test]
    fn test_end_only_restriction() {
        let (mut engine, id) = engine_with(no_inertia());
        let bounds = Rect::new(-30.0, -30.0, 60.0, 60.0);
        engine.begin(&id, Point::ORIGIN, Vec2::ZERO, Some(bounds));
        engine.move_to(Point::new(150.0, 0.0));

        // Unrestricted while moving.
        assert_eq!(engine.gesture_position(), Some(Point::new(150.0, 0.0)));
        engine.end();

        let events = engine.drain_moves();
        assert_eq!(events.last().unwrap().delta, Vec2::new(-90.0, 0.0));
        assert_eq!(total(&events), Vec2::new(60.0, 0.0));
    }

    #[test]
    fn test_continuous_restriction() {
        let (mut engine, id) = engine_with(DragOptions {
            restrict_end_only: false,
            ..no_inertia()
        });
        engine.begin(&id, Point::ORIGIN, Vec2::ZERO, Some(Rect::new(0.0, 0.0, 45.0, 45.0)));
        engine.move_to(Point::new(150.0, -20.0));
        assert_eq!(engine.gesture_position(), Some(Point::new(45.0, 0.0)));
    }

    #[test]
    fn test_inertia_continues_motion() {
        let (mut engine, id) = engine_with(DragOptions::default());
        engine.begin(&id, Point::ORIGIN, Vec2::ZERO, None);
        engine.move_to(Point::new(30.0, 0.0));
        engine.move_to(Point::new(90.0, 0.0));
        engine.end();

        let moved = total(&engine.drain_moves());
        assert!(moved.x > 90.0, "inertia should carry the block further, got {moved:?}");
        assert_eq!(moved.x % 15.0, 0.0);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn test_cancel_stops_gesture() {
        let (mut engine, id) = engine_with(DragOptions::default());
        engine.begin(&id, Point::ORIGIN, Vec2::ZERO, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        engine.move_to(Point::new(45.0, 0.0));
        assert!(engine.cancel());
        assert!(!engine.is_dragging());
        assert!(!engine.move_to(Point::new(90.0, 0.0)));

        let events = engine.drain_moves();
        assert_eq!(total(&events), Vec2::new(45.0, 0.0));
    }

    #[test]
    fn test_single_gesture_at_a_time() {
        let (mut engine, id) = engine_with(DragOptions::default());
        let other = BlockId::new("block_2");
        engine.make_draggable(NodeId(2), &other, DragOptions::default());

        assert!(engine.begin(&id, Point::ORIGIN, Vec2::ZERO, None));
        assert!(!engine.begin(&other, Point::ORIGIN, Vec2::ZERO, None));
        assert!(!engine.begin(&BlockId::new("block_unknown"), Point::ORIGIN, Vec2::ZERO, None));
    }

    #[test]
    fn test_release() {
        let (mut engine, id) = engine_with(DragOptions::default());
        let handle = engine.make_draggable(NodeId(1), &id, DragOptions::default());
        assert!(engine.release(handle));
        assert!(!engine.release(handle));
        assert!(!engine.is_draggable(&id));
        assert!(!engine.begin(&id, Point::ORIGIN, Vec2::ZERO, None));
    }
}
