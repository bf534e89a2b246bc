use crate::config::{load_settings, project_paths, save_settings_atomic, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_action, Action};
use crate::layout::{self, Layout};
use crate::model::{GameState, Point, Rules, Scene};
use crate::render::{draw_scene, draw_text, ui_overlay, Cell, Terminal};
use std::cmp::min;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    rules: Rules,
    state: GameState,
    layout: Layout,
    paths: crate::config::Paths,
    term: Terminal,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);
        let rules = Rules::default();

        let term = Terminal::begin()?;
        let layout = layout::compute(term.cols, term.rows);

        let mut state = GameState::new();
        layout::seed(&mut state, &layout);

        Ok(Self {
            settings,
            rules,
            state,
            layout,
            paths,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let sim_step = Duration::from_millis(self.rules.tick_step_ms);

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            if self.term.resize_if_needed()? {
                // rest positions stay as captured; only the container moves
                self.layout = layout::compute(self.term.cols, self.term.rows);
            }

            // input
            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                let Some(action) = map_event_to_action(self.state.scene, ev) else {
                    continue;
                };
                match action {
                    Action::Quit => {
                        self.should_quit = true;
                        break;
                    }
                    Action::HelpToggle => {
                        self.state.scene = match self.state.scene {
                            Scene::Help => Scene::Main,
                            Scene::Main => Scene::Help,
                        };
                    }
                    Action::NewGame => self.new_game(),
                    Action::PointerDown(at) => self.pointer_down(at),
                    Action::PointerMove(at) => {
                        self.state.drag_move(at, self.layout.scene);
                    }
                    Action::PointerUp(_) => {
                        self.state
                            .end_drag(self.layout.scene, self.layout.baby_area, &self.rules);
                    }
                }
            }

            // sim fixed-step; the only deferred work is the commit hold
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            sim_accum = sim_accum.saturating_add(real_dt);

            while sim_accum >= sim_step {
                self.state.tick_fixed_step();
                sim_accum = sim_accum.saturating_sub(sim_step);
            }

            self.render_frame()?;

            spin_sleep(frame_dt, Instant::now());
        }

        // discard any outstanding hold before the screen goes away
        self.state.cancel_hold();
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn pointer_down(&mut self, at: Point) {
        // items sit above the baby, so give the drag layer first refusal
        if self.state.begin_drag(at, self.layout.scene) {
            return;
        }
        if self.layout.baby_area.contains(at) {
            self.state.handle_baby_click();
        }
    }

    fn new_game(&mut self) {
        self.state.cancel_hold();
        self.state = GameState::new();
        layout::seed(&mut self.state, &self.layout);
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let bg = crossterm::style::Color::Black;
        self.term.cur.clear(bg);

        draw_scene(&mut self.term.cur, &self.state, &self.layout, &self.settings);
        ui_overlay(&mut self.term.cur, &self.state, &self.settings);

        if let Scene::Help = self.state.scene {
            self.draw_center_box(
                "How to bathe the baby",
                "Click the baby to put it in the tub, then drag each\n\
    item onto it in order: shampoo, jabon, regadera.\n\
    A correct item settles over the baby for a few seconds\n\
    before the step counts; nothing else works while it does.\n\n\
    When the baby is rinsed, click it to lift it out,\n\
    then dry it off with the toalla.\n\n\
    Wrong item or wrong time? It just snaps back.\n\n\
    Esc or H to close help.",
            )?;
        }

        self.term.present(true)?;
        Ok(())
    }

    fn draw_center_box(&mut self, title: &str, body: &str) -> anyhow::Result<()> {
        let w = self.term.cols;
        let h = self.term.rows;

        let bw = min(58, w.saturating_sub(4));
        let bh = min(16, h.saturating_sub(4));

        let x0 = (w - bw) / 2;
        let y0 = (h - bh) / 2;

        let fg = crossterm::style::Color::White;
        let bg = crossterm::style::Color::Black;
        let cell = |ch| Cell {
            ch,
            fg,
            bg,
            bold: false,
        };

        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                self.term.cur.set(x, y, cell(' '));
            }
        }
        for x in x0..x0 + bw {
            self.term.cur.set(x, y0, cell('─'));
            self.term.cur.set(x, y0 + bh - 1, cell('─'));
        }
        for y in y0..y0 + bh {
            self.term.cur.set(x0, y, cell('│'));
            self.term.cur.set(x0 + bw - 1, y, cell('│'));
        }
        self.term.cur.set(x0, y0, cell('┌'));
        self.term.cur.set(x0 + bw - 1, y0, cell('┐'));
        self.term.cur.set(x0, y0 + bh - 1, cell('└'));
        self.term.cur.set(x0 + bw - 1, y0 + bh - 1, cell('┘'));

        draw_text(&mut self.term.cur, x0 + 2, y0 + 1, title, fg, bg);

        let mut yy = y0 + 3;
        for line in body.lines() {
            if yy >= y0 + bh - 1 {
                break;
            }
            draw_text(&mut self.term.cur, x0 + 2, yy, line, fg, bg);
            yy += 1;
        }

        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
