use crate::layout::{ITEM_H, ITEM_W};
use crate::model::{BabyArt, GameState, PendingCommit, Phase, Point, Rect, Rules, Step};

/// The washing sequence as data: (current step, required item, next step,
/// final). Anything not listed is an ignored mismatch.
pub(crate) const STEP_TABLE: [(Step, &str, Step, bool); 4] = [
    (Step::InTub, "shampoo", Step::ShampooApplied, false),
    (Step::ShampooApplied, "jabon", Step::SoapApplied, false),
    (Step::SoapApplied, "regadera", Step::Rinsed, false),
    (Step::OutOfTub, "toalla", Step::Complete, true),
];

impl GameState {
    pub(crate) fn hint(&mut self, s: &str) {
        self.last_hint = Some(s.to_string());
    }

    /// Tub entry and exit are direct clicks: the step, baby art and progress
    /// all change immediately, with no hold.
    pub(crate) fn handle_baby_click(&mut self) {
        if self.completed() {
            self.history.ignored_clicks += 1;
            return;
        }
        match self.step {
            Step::NotStarted => {
                self.step = Step::InTub;
                self.baby = BabyArt::InTub;
                self.progress.advance();
                self.hint("into the tub!");
            }
            Step::Rinsed => {
                self.step = Step::OutOfTub;
                self.baby = BabyArt::Wet;
                self.progress.advance();
                self.hint("out of the tub, time to dry off");
            }
            _ => {
                self.history.ignored_clicks += 1;
                self.hint("the baby needs something else first");
            }
        }
    }

    /// Validate a dropped item against the step table. A hit never advances
    /// the step directly; it starts the commit hold. Misses and drops while
    /// busy or complete are expected outcomes, counted and hinted only.
    pub(crate) fn attempt_drop(
        &mut self,
        idx: usize,
        scene: Rect,
        baby_area: Rect,
        rules: &Rules,
    ) {
        if self.completed() || self.busy() {
            self.history.ignored_drops += 1;
            return;
        }
        let name = self.items[idx].name;
        let hit = STEP_TABLE
            .iter()
            .find(|(cur, item, _, _)| *cur == self.step && *item == name);
        match hit {
            Some(&(_, _, next, is_final)) => {
                self.history.valid_drops += 1;
                self.start_hold(idx, next, is_final, scene, baby_area, rules);
            }
            None => {
                self.history.ignored_drops += 1;
                self.hint(&format!("not the {name} right now"));
            }
        }
    }

    /// Pin the item centered over the drop target and schedule the one-shot
    /// commit `hold_ms` of simulated time from now.
    fn start_hold(
        &mut self,
        idx: usize,
        next: Step,
        is_final: bool,
        scene: Rect,
        baby_area: Rect,
        rules: &Rules,
    ) {
        debug_assert!(!self.busy(), "hold started while a commit is pending");
        let c = baby_area.center();
        self.items[idx].pos = Point {
            x: c.x - scene.x - ITEM_W / 2,
            y: c.y - scene.y - ITEM_H / 2,
        };
        self.items[idx].pinned = true;
        self.phase = Phase::Committing(PendingCommit {
            item: idx,
            next,
            is_final,
            fire_at_tick: self.sim_ticks + rules.hold_ticks(),
        });
    }

    /// Fixed-step tick. The only deferred work is the pending commit; it
    /// fires exactly once, on the tick its deadline is reached.
    pub(crate) fn tick_fixed_step(&mut self) {
        self.sim_ticks += 1;
        let Phase::Committing(pc) = self.phase else {
            return;
        };
        if self.sim_ticks < pc.fire_at_tick {
            return;
        }
        self.settle_item(pc.item);
        self.step = pc.next;
        if pc.is_final {
            self.baby = BabyArt::Clean;
            self.progress.complete();
            self.hint("all done, squeaky clean!");
        } else {
            self.progress.advance();
            self.hint(self.step.label());
        }
        self.history.holds_completed += 1;
        self.phase = Phase::Idle;
    }

    /// Teardown hook: discard an outstanding hold without committing it.
    /// No user action reaches this; the hosting loop calls it on shutdown so
    /// the timer never outlives the screen it would mutate.
    pub(crate) fn cancel_hold(&mut self) {
        if let Phase::Committing(pc) = self.phase {
            self.settle_item(pc.item);
            self.phase = Phase::Idle;
        }
    }

    fn settle_item(&mut self, idx: usize) {
        self.items[idx].pinned = false;
        if let Some(rest) = self.registry.rest_position_of(self.items[idx].name) {
            self.items[idx].pos = rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;

    fn setup() -> (GameState, layout::Layout, Rules) {
        let l = layout::compute(100, 30);
        let mut st = GameState::new();
        layout::seed(&mut st, &l);
        (st, l, Rules::default())
    }

    fn drop_item(st: &mut GameState, l: &layout::Layout, rules: &Rules, name: &str) {
        let idx = st.item_index(name).unwrap();
        st.attempt_drop(idx, l.scene, l.baby_area, rules);
    }

    fn run_hold(st: &mut GameState, rules: &Rules) {
        for _ in 0..rules.hold_ticks() {
            st.tick_fixed_step();
        }
    }

    #[test]
    fn out_of_order_drop_changes_nothing() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click(); // -> InTub
        let before = st.progress.value();

        drop_item(&mut st, &l, &rules, "jabon");
        assert_eq!(st.step, Step::InTub);
        assert!(!st.busy());
        assert_eq!(st.progress.value(), before);
        assert_eq!(st.history.ignored_drops, 1);
    }

    #[test]
    fn busy_spans_the_whole_hold() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click();
        drop_item(&mut st, &l, &rules, "shampoo");
        assert!(st.busy());

        for _ in 0..rules.hold_ticks() - 1 {
            st.tick_fixed_step();
            assert!(st.busy());
            assert_eq!(st.step, Step::InTub);
        }
        st.tick_fixed_step();
        assert!(!st.busy());
        assert_eq!(st.step, Step::ShampooApplied);
    }

    #[test]
    fn commit_restores_rest_position_not_the_pin() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click();
        let idx = st.item_index("shampoo").unwrap();
        let rest = st.registry.rest_position_of("shampoo").unwrap();

        drop_item(&mut st, &l, &rules, "shampoo");
        assert_ne!(st.items[idx].pos, rest); // pinned over the baby
        run_hold(&mut st, &rules);
        assert_eq!(st.items[idx].pos, rest);
        assert!(!st.items[idx].pinned);
    }

    #[test]
    fn drops_while_busy_are_swallowed() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click();
        drop_item(&mut st, &l, &rules, "shampoo");
        let pending_step = st.step;

        // correct-next item during the hold must not queue or double-advance
        drop_item(&mut st, &l, &rules, "jabon");
        assert_eq!(st.step, pending_step);
        assert_eq!(st.history.ignored_drops, 1);

        run_hold(&mut st, &rules);
        assert_eq!(st.step, Step::ShampooApplied);
        assert_eq!(st.history.holds_completed, 1);
    }

    #[test]
    fn full_bath_reaches_exactly_100() {
        let (mut st, l, rules) = setup();

        st.handle_baby_click();
        assert_eq!(st.step, Step::InTub);
        assert_eq!(st.baby, BabyArt::InTub);
        assert_eq!(st.progress.value(), 16.67);

        drop_item(&mut st, &l, &rules, "shampoo");
        assert_eq!(st.progress.value(), 16.67); // not advanced until the hold fires
        run_hold(&mut st, &rules);
        assert_eq!(st.step, Step::ShampooApplied);
        assert_eq!(st.progress.value(), 33.33);

        drop_item(&mut st, &l, &rules, "jabon");
        run_hold(&mut st, &rules);
        assert_eq!(st.step, Step::SoapApplied);
        assert_eq!(st.progress.value(), 50.0);

        drop_item(&mut st, &l, &rules, "regadera");
        run_hold(&mut st, &rules);
        assert_eq!(st.step, Step::Rinsed);
        assert_eq!(st.progress.value(), 66.67);

        st.handle_baby_click(); // instantaneous exit
        assert_eq!(st.step, Step::OutOfTub);
        assert_eq!(st.baby, BabyArt::Wet);
        assert_eq!(st.progress.value(), 83.33);

        drop_item(&mut st, &l, &rules, "toalla");
        assert!(st.busy());
        run_hold(&mut st, &rules);
        assert_eq!(st.step, Step::Complete);
        assert_eq!(st.baby, BabyArt::Clean);
        assert_eq!(st.progress.value(), 100.0);
        assert!(st.completed());
        assert_eq!(st.history.valid_drops, 4);
        assert_eq!(st.history.holds_completed, 4);
        assert_eq!(st.history.ignored_drops, 0);
    }

    #[test]
    fn complete_is_terminal() {
        let (mut st, l, rules) = setup();
        st.step = Step::Complete;
        st.baby = BabyArt::Clean;
        st.progress.complete();

        st.handle_baby_click();
        drop_item(&mut st, &l, &rules, "toalla");
        st.tick_fixed_step();

        assert_eq!(st.step, Step::Complete);
        assert!(!st.busy());
        assert_eq!(st.progress.value(), 100.0);
        assert_eq!(st.history.ignored_clicks, 1);
        assert_eq!(st.history.ignored_drops, 1);
    }

    #[test]
    fn clicks_mid_wash_are_ignored() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click();
        drop_item(&mut st, &l, &rules, "shampoo");
        run_hold(&mut st, &rules);

        // ShampooApplied: neither entry nor exit click applies
        st.handle_baby_click();
        assert_eq!(st.step, Step::ShampooApplied);
        assert_eq!(st.history.ignored_clicks, 1);
    }

    #[test]
    fn cancel_hold_discards_without_advancing() {
        let (mut st, l, rules) = setup();
        st.handle_baby_click();
        let idx = st.item_index("shampoo").unwrap();
        let rest = st.registry.rest_position_of("shampoo").unwrap();
        drop_item(&mut st, &l, &rules, "shampoo");
        let progress = st.progress.value();

        st.cancel_hold();
        assert!(!st.busy());
        assert_eq!(st.step, Step::InTub);
        assert_eq!(st.progress.value(), progress);
        assert_eq!(st.items[idx].pos, rest);

        // ticking afterwards must not fire the discarded commit
        run_hold(&mut st, &rules);
        assert_eq!(st.step, Step::InTub);
        assert_eq!(st.history.holds_completed, 0);
    }

    #[test]
    fn step_table_walks_the_ordered_sequence() {
        // each table row's next step is the current step of the following
        // row, except the click-gated Rinsed -> OutOfTub seam
        assert_eq!(STEP_TABLE[0].2, STEP_TABLE[1].0);
        assert_eq!(STEP_TABLE[1].2, STEP_TABLE[2].0);
        assert_eq!(STEP_TABLE[2].2, Step::Rinsed);
        assert_eq!(STEP_TABLE[3].0, Step::OutOfTub);
        assert!(STEP_TABLE[3].3);
        assert!(STEP_TABLE.iter().take(3).all(|row| !row.3));
    }
}
