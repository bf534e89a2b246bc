use crate::layout;
use crate::model::{DragSession, GameState, Phase, Point, Rect};

/// Axis-aligned box intersection over half-open rects: rects that merely
/// touch along an edge do not overlap.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    !(a.right() <= b.x || b.right() <= a.x || a.bottom() <= b.y || b.bottom() <= a.y)
}

impl GameState {
    /// Pointer-down. Returns true when the pointer landed on an item box
    /// (whether or not a drag actually started), so the caller knows not to
    /// treat the press as a baby click.
    pub(crate) fn begin_drag(&mut self, pointer: Point, scene: Rect) -> bool {
        let hit = self
            .items
            .iter()
            .position(|it| layout::item_rect(scene, it.pos).contains(pointer));
        let Some(idx) = hit else {
            return false;
        };
        if self.completed() {
            self.hint("the baby is already clean");
            return true;
        }
        if self.busy() {
            self.hint("hold on, still settling");
            return true;
        }
        if matches!(self.phase, Phase::Dragging(_)) {
            debug_assert!(false, "drag begun while another session is open");
            return true;
        }
        let r = layout::item_rect(scene, self.items[idx].pos);
        self.phase = Phase::Dragging(DragSession {
            item: idx,
            offset: Point {
                x: pointer.x - r.x,
                y: pointer.y - r.y,
            },
        });
        true
    }

    /// Pointer-move. Repositions the active item so the grab point stays
    /// under the pointer, relative to the scene container's current rect
    /// (recomputed by the caller every frame; the container shifts when the
    /// terminal resizes).
    pub(crate) fn drag_move(&mut self, pointer: Point, scene: Rect) {
        let Phase::Dragging(sess) = self.phase else {
            return;
        };
        self.items[sess.item].pos = Point {
            x: pointer.x - scene.x - sess.offset.x,
            y: pointer.y - scene.y - sess.offset.y,
        };
    }

    /// Pointer-up. Evaluates overlap against the baby area and hands a hit to
    /// the step machine. Unless that started a commit hold, the item snaps
    /// back to its registered rest position (items never captured stay put).
    pub(crate) fn end_drag(
        &mut self,
        scene: Rect,
        baby_area: Rect,
        rules: &crate::model::Rules,
    ) {
        let Phase::Dragging(sess) = self.phase else {
            return;
        };
        self.phase = Phase::Idle;

        let r = layout::item_rect(scene, self.items[sess.item].pos);
        if overlaps(r, baby_area) {
            self.attempt_drop(sess.item, scene, baby_area, rules);
        }

        if !self.busy() {
            if let Some(rest) = self.registry.rest_position_of(self.items[sess.item].name) {
                self.items[sess.item].pos = rest;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{self, ITEM_H, ITEM_W};
    use crate::model::{GameState, Point, Rect, Rules, Step};

    fn setup() -> (GameState, layout::Layout, Rules) {
        let l = layout::compute(100, 30);
        let mut st = GameState::new();
        layout::seed(&mut st, &l);
        (st, l, Rules::default())
    }

    #[test]
    fn overlap_is_strict_on_edges() {
        let a = Rect {
            x: 0,
            y: 0,
            w: 4,
            h: 4,
        };
        let touching = Rect {
            x: 4,
            y: 0,
            w: 4,
            h: 4,
        };
        let apart = Rect {
            x: 9,
            y: 9,
            w: 2,
            h: 2,
        };
        let inside = Rect {
            x: 1,
            y: 1,
            w: 2,
            h: 2,
        };
        let crossing = Rect {
            x: 3,
            y: 3,
            w: 4,
            h: 4,
        };
        assert!(!overlaps(a, touching));
        assert!(!overlaps(touching, a));
        assert!(!overlaps(a, apart));
        assert!(overlaps(a, inside));
        assert!(overlaps(a, crossing));
        assert!(overlaps(crossing, a));
    }

    #[test]
    fn drag_keeps_pointer_offset_inside_item() {
        let (mut st, l, _rules) = setup();
        let idx = st.item_index("shampoo").unwrap();
        let r = layout::item_rect(l.scene, st.items[idx].pos);
        let grab = Point {
            x: r.x + 3,
            y: r.y + 1,
        };
        assert!(st.begin_drag(grab, l.scene));

        let dest = Point { x: 50, y: 12 };
        st.drag_move(dest, l.scene);
        let moved = layout::item_rect(l.scene, st.items[idx].pos);
        assert_eq!(moved.x + 3, dest.x);
        assert_eq!(moved.y + 1, dest.y);
    }

    #[test]
    fn miss_snaps_back_to_rest_position() {
        let (mut st, l, rules) = setup();
        let idx = st.item_index("toalla").unwrap();
        let rest = st.items[idx].pos;
        let r = layout::item_rect(l.scene, rest);
        assert!(st.begin_drag(Point { x: r.x, y: r.y }, l.scene));
        // park it somewhere harmless, away from the baby
        st.drag_move(
            Point {
                x: l.scene.x + 1,
                y: l.scene.bottom() - 1,
            },
            l.scene,
        );
        st.end_drag(l.scene, l.baby_area, &rules);
        assert_eq!(st.items[idx].pos, rest);
        assert_eq!(st.step, Step::NotStarted);
        assert!(!st.busy());
    }

    #[test]
    fn unregistered_item_is_left_where_dropped() {
        let l = layout::compute(100, 30);
        let mut st = GameState::new();
        // no seed: registry is empty, positions all (0,0)
        let idx = st.item_index("jabon").unwrap();
        st.items[idx].pos = Point { x: 5, y: 5 };
        let r = layout::item_rect(l.scene, st.items[idx].pos);
        assert!(st.begin_drag(Point { x: r.x, y: r.y }, l.scene));
        st.drag_move(Point { x: 8, y: 20 }, l.scene);
        st.end_drag(l.scene, l.baby_area, &Rules::default());
        // nothing to restore from, so the item stays put
        assert_eq!(
            st.items[idx].pos,
            Point {
                x: 8 - l.scene.x,
                y: 20 - l.scene.y
            }
        );
    }

    #[test]
    fn begin_is_rejected_while_busy_or_complete() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click();
        let idx = st.item_index("shampoo").unwrap();
        st.attempt_drop(idx, l.scene, l.baby_area, &rules);
        assert!(st.busy());

        // pointer lands on the pinned item: consumed, but no session opens
        let pinned = layout::item_rect(l.scene, st.items[idx].pos);
        assert!(st.begin_drag(
            Point {
                x: pinned.x,
                y: pinned.y
            },
            l.scene
        ));
        assert!(st.busy());
        assert!(!matches!(st.phase, crate::model::Phase::Dragging(_)));

        let mut done = GameState::new();
        layout::seed(&mut done, &l);
        done.step = Step::Complete;
        let r = layout::item_rect(l.scene, done.items[0].pos);
        assert!(done.begin_drag(Point { x: r.x, y: r.y }, l.scene));
        assert!(matches!(done.phase, crate::model::Phase::Idle));
    }

    #[test]
    fn drop_on_baby_pins_item_over_target() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click(); // NotStarted -> InTub
        let idx = st.item_index("shampoo").unwrap();
        let r = layout::item_rect(l.scene, st.items[idx].pos);
        assert!(st.begin_drag(Point { x: r.x, y: r.y }, l.scene));
        let c = l.baby_area.center();
        st.drag_move(c, l.scene);
        st.end_drag(l.scene, l.baby_area, &rules);

        assert!(st.busy());
        assert!(st.items[idx].pinned);
        let pinned = layout::item_rect(l.scene, st.items[idx].pos);
        assert_eq!(pinned.x, c.x - ITEM_W / 2);
        assert_eq!(pinned.y, c.y - ITEM_H / 2);
    }
}
