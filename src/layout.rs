use crate::model::{GameState, Point, Rect, ITEM_NAMES};
use std::cmp::{max, min};

pub(crate) const ITEM_W: i32 = 12;
pub(crate) const ITEM_H: i32 = 3;

pub(crate) const HUD_ROWS: i32 = 3;
const FOOTER_ROWS: i32 = 1;

/// Absolute cell rects for the current terminal size. The scene rect is the
/// coordinate container for item positions; everything else is derived.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub(crate) scene: Rect,
    pub(crate) tub: Rect,
    pub(crate) baby_area: Rect,
}

pub(crate) fn compute(cols: u16, rows: u16) -> Layout {
    let cols = max(cols as i32, 40);
    let rows = max(rows as i32, 20);

    let scene = Rect {
        x: 0,
        y: HUD_ROWS,
        w: cols,
        h: rows - HUD_ROWS - FOOTER_ROWS,
    };

    // Shelf of items on the left, tub filling the right side.
    let tub_x = scene.x + ITEM_W + 8;
    let tub_w = min(44, scene.right() - tub_x - 2);
    let tub_h = max(12, scene.h - 4);
    let tub = Rect {
        x: tub_x,
        y: scene.y + 2,
        w: tub_w,
        h: min(tub_h, scene.h - 2),
    };

    let baby_w = min(21, tub.w - 4);
    let baby_h = min(11, tub.h - 2);
    let baby_area = Rect {
        x: tub.x + (tub.w - baby_w) / 2,
        y: tub.y + (tub.h - baby_h) / 2,
        w: baby_w,
        h: baby_h,
    };

    Layout {
        scene,
        tub,
        baby_area,
    }
}

impl Layout {
    /// Rest slots in scene-relative coordinates, one per bath item,
    /// stacked down the left shelf.
    pub(crate) fn rest_slots(&self) -> [(&'static str, Point); 4] {
        let x = 2;
        let mut y = 1;
        let mut slots = [("", Point { x: 0, y: 0 }); 4];
        for (i, name) in ITEM_NAMES.iter().enumerate() {
            slots[i] = (*name, Point { x, y });
            y += ITEM_H + 1;
        }
        slots
    }
}

/// Absolute rect of an item box whose scene-relative origin is `pos`.
pub(crate) fn item_rect(scene: Rect, pos: Point) -> Rect {
    Rect {
        x: scene.x + pos.x,
        y: scene.y + pos.y,
        w: ITEM_W,
        h: ITEM_H,
    }
}

/// Place each item at its shelf slot and capture rest positions. Capture is
/// first-write-wins, so calling this again (e.g. after a resize) cannot
/// rewrite ground truth.
pub(crate) fn seed(st: &mut GameState, l: &Layout) {
    for (name, slot) in l.rest_slots() {
        if let Some(idx) = st.item_index(name) {
            st.items[idx].pos = slot;
            st.registry.capture(st.items[idx].name, slot);
        }
    }
}
