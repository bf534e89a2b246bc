use std::collections::BTreeMap;

pub(crate) const TOTAL_INCREMENTS: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Step {
    NotStarted,
    InTub,
    ShampooApplied,
    SoapApplied,
    Rinsed,
    OutOfTub,
    Complete,
}

impl Step {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Step::NotStarted => "waiting by the tub",
            Step::InTub => "in the tub",
            Step::ShampooApplied => "shampoo lathered",
            Step::SoapApplied => "soaped up",
            Step::Rinsed => "rinsed off",
            Step::OutOfTub => "out of the tub",
            Step::Complete => "all clean!",
        }
    }
}

/// Which baby sprite the renderer shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BabyArt {
    Dirty,
    InTub,
    Wet,
    Clean,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Point {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Rect {
    pub(crate) fn right(&self) -> i32 {
        self.x + self.w
    }
    pub(crate) fn bottom(&self) -> i32 {
        self.y + self.h
    }
    pub(crate) fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
    pub(crate) fn center(&self) -> Point {
        Point {
            x: self.x + self.w / 2,
            y: self.y + self.h / 2,
        }
    }
}

/// One grabbable bath item. `pos` is relative to the scene container and is
/// scratch state; the registry holds the authoritative rest position.
#[derive(Clone, Debug)]
pub(crate) struct Item {
    pub(crate) name: &'static str,
    pub(crate) pos: Point,
    pub(crate) pinned: bool,
}

/// Rest positions keyed by item name, captured from the first laid-out frame.
/// First write wins; later captures never overwrite ground truth.
#[derive(Clone, Debug, Default)]
pub(crate) struct Registry {
    rest: BTreeMap<&'static str, Point>,
}

impl Registry {
    pub(crate) fn capture(&mut self, name: &'static str, pos: Point) {
        self.rest.entry(name).or_insert(pos);
    }

    pub(crate) fn rest_position_of(&self, name: &str) -> Option<Point> {
        self.rest.get(name).copied()
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DragSession {
    pub(crate) item: usize,
    /// Pointer offset inside the item box, so the grab point stays put.
    pub(crate) offset: Point,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PendingCommit {
    pub(crate) item: usize,
    pub(crate) next: Step,
    pub(crate) is_final: bool,
    pub(crate) fire_at_tick: u64,
}

/// Dragging and committing are mutually exclusive by construction; "busy"
/// means a commit hold is outstanding.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Phase {
    Idle,
    Dragging(DragSession),
    Committing(PendingCommit),
}

/// Completed-increment counter; the display value is derived, never
/// accumulated, so rounding cannot drift.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Progress {
    done: u8,
    complete: bool,
}

impl Progress {
    pub(crate) fn advance(&mut self) {
        if self.done < TOTAL_INCREMENTS {
            self.done += 1;
        }
    }

    pub(crate) fn complete(&mut self) {
        self.done = TOTAL_INCREMENTS;
        self.complete = true;
    }

    pub(crate) fn value(&self) -> f64 {
        if self.complete {
            return 100.0;
        }
        let raw = self.done as f64 * 100.0 / TOTAL_INCREMENTS as f64;
        (raw.min(100.0) * 100.0).round() / 100.0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct History {
    pub(crate) valid_drops: u32,
    pub(crate) ignored_drops: u32,
    pub(crate) ignored_clicks: u32,
    pub(crate) holds_completed: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct Rules {
    pub(crate) tick_step_ms: u64,
    pub(crate) hold_ms: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_step_ms: 250,
            hold_ms: 4000,
        }
    }
}

impl Rules {
    pub(crate) fn hold_ticks(&self) -> u64 {
        (self.hold_ms / self.tick_step_ms.max(1)).max(1)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct GameState {
    pub(crate) step: Step,
    pub(crate) baby: BabyArt,
    pub(crate) scene: Scene,
    pub(crate) items: Vec<Item>,
    pub(crate) registry: Registry,
    pub(crate) phase: Phase,
    pub(crate) progress: Progress,
    pub(crate) history: History,
    pub(crate) last_hint: Option<String>,
    pub(crate) sim_ticks: u64,
}

pub(crate) const ITEM_NAMES: [&str; 4] = ["shampoo", "jabon", "regadera", "toalla"];

impl GameState {
    pub(crate) fn new() -> Self {
        let items = ITEM_NAMES
            .iter()
            .map(|&name| Item {
                name,
                pos: Point { x: 0, y: 0 },
                pinned: false,
            })
            .collect();
        Self {
            step: Step::NotStarted,
            baby: BabyArt::Dirty,
            scene: Scene::Main,
            items,
            registry: Registry::default(),
            phase: Phase::Idle,
            progress: Progress::default(),
            history: History::default(),
            last_hint: None,
            sim_ticks: 0,
        }
    }

    pub(crate) fn busy(&self) -> bool {
        matches!(self.phase, Phase::Committing(_))
    }

    pub(crate) fn completed(&self) -> bool {
        self.step == Step::Complete
    }

    pub(crate) fn item_index(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|it| it.name == name)
    }
}
