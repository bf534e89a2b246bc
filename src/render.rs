use crate::config::Settings;
use crate::layout::{self, Layout, ITEM_H, ITEM_W};
use crate::model::{BabyArt, GameState, Phase, Scene, Step};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn set_i32(&mut self, x: i32, y: i32, c: Cell) {
        if x >= 0 && y >= 0 {
            self.set(x as u16, y as u16, c);
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
            c.bold = false;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let prev = CellBuffer::new(cols, rows);
        let cur = CellBuffer::new(cols, rows);

        Ok(Self {
            out,
            cols,
            rows,
            prev,
            cur,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Scene: tub, baby, items
------------------------------ */

fn tint(settings: &Settings, color: Color) -> Color {
    if settings.enable_color {
        color
    } else {
        Color::White
    }
}

pub(crate) fn draw_scene(
    buf: &mut CellBuffer,
    st: &GameState,
    l: &Layout,
    settings: &Settings,
) {
    let bg = Color::Black;

    draw_tub(buf, l, tint(settings, Color::Cyan), bg);

    // Water only while the baby is actually in the tub.
    if matches!(
        st.step,
        Step::InTub | Step::ShampooApplied | Step::SoapApplied | Step::Rinsed
    ) {
        let water = tint(settings, Color::Blue);
        for y in (l.tub.y + l.tub.h * 2 / 3)..(l.tub.bottom() - 1) {
            for x in (l.tub.x + 1)..(l.tub.right() - 1) {
                buf.set_i32(
                    x,
                    y,
                    Cell {
                        ch: '~',
                        fg: water,
                        bg,
                        bold: false,
                    },
                );
            }
        }
    }

    draw_baby(buf, st.baby, l, tint(settings, Color::Magenta), bg);

    // Items last so a dragged or pinned box rides on top of the scene.
    for it in &st.items {
        let grabbed = matches!(st.phase, Phase::Dragging(s) if st.items[s.item].name == it.name);
        let fg = if it.pinned {
            tint(settings, Color::Yellow)
        } else if grabbed {
            tint(settings, Color::Green)
        } else {
            Color::White
        };
        draw_item_box(buf, layout::item_rect(l.scene, it.pos), it.name, fg, bg);
    }
}

fn draw_tub(buf: &mut CellBuffer, l: &Layout, fg: Color, bg: Color) {
    let t = l.tub;
    for x in t.x..t.right() {
        buf.set_i32(x, t.y, Cell { ch: '─', fg, bg, bold: false });
        buf.set_i32(x, t.bottom() - 1, Cell { ch: '─', fg, bg, bold: false });
    }
    for y in t.y..t.bottom() {
        buf.set_i32(t.x, y, Cell { ch: '│', fg, bg, bold: false });
        buf.set_i32(t.right() - 1, y, Cell { ch: '│', fg, bg, bold: false });
    }
    buf.set_i32(t.x, t.y, Cell { ch: '╭', fg, bg, bold: false });
    buf.set_i32(t.right() - 1, t.y, Cell { ch: '╮', fg, bg, bold: false });
    buf.set_i32(t.x, t.bottom() - 1, Cell { ch: '╰', fg, bg, bold: false });
    buf.set_i32(t.right() - 1, t.bottom() - 1, Cell { ch: '╯', fg, bg, bold: false });
}

fn draw_item_box(buf: &mut CellBuffer, r: crate::model::Rect, name: &str, fg: Color, bg: Color) {
    debug_assert!(r.w == ITEM_W && r.h == ITEM_H);
    let inner = (ITEM_W - 2) as usize;
    let mut label = String::with_capacity(inner);
    for ch in name.chars().take(inner) {
        label.push(ch);
    }
    let pad = inner.saturating_sub(label.len());
    let left = pad / 2;

    for dx in 0..r.w {
        let (top, bot) = if dx == 0 {
            ('┌', '└')
        } else if dx == r.w - 1 {
            ('┐', '┘')
        } else {
            ('─', '─')
        };
        buf.set_i32(r.x + dx, r.y, Cell { ch: top, fg, bg, bold: false });
        buf.set_i32(r.x + dx, r.y + 2, Cell { ch: bot, fg, bg, bold: false });
    }
    buf.set_i32(r.x, r.y + 1, Cell { ch: '│', fg, bg, bold: false });
    buf.set_i32(r.right() - 1, r.y + 1, Cell { ch: '│', fg, bg, bold: false });
    let mut row = vec![' '; inner];
    for (i, ch) in label.chars().enumerate() {
        row[left + i] = ch;
    }
    for (i, ch) in row.into_iter().enumerate() {
        buf.set_i32(r.x + 1 + i as i32, r.y + 1, Cell { ch, fg, bg, bold: true });
    }
}

fn baby_sprite(art: BabyArt) -> [&'static str; 7] {
    match art {
        BabyArt::Dirty => [
            "     .-\"\"\"-.     ",
            "    / o   o \\    ",
            "   | .   ~ . |   ",
            "   |  \\___/  |   ",
            "    \\._____./    ",
            "   * .  ,  . *   ",
            "  (needs a bath) ",
        ],
        BabyArt::InTub => [
            "     .-\"\"\"-.     ",
            "    / ^   ^ \\    ",
            "   |    u    |   ",
            "   |  \\___/  |   ",
            "    \\._____./    ",
            "  ~~~~~~~~~~~~~  ",
            "   (in the tub)  ",
        ],
        BabyArt::Wet => [
            "     .-\"\"\"-.     ",
            "  , / o   o \\ ,  ",
            "   |    u    |   ",
            "   |  \\___/  |   ",
            "    \\._____./    ",
            "    '  drip  '   ",
            "  (dripping wet) ",
        ],
        BabyArt::Clean => [
            "     .-\"\"\"-.     ",
            "    / ^   ^ \\    ",
            "   |    w    |   ",
            "   |  \\___/  |   ",
            "    \\._____./    ",
            "    *  .  .  *   ",
            "  (squeaky clean)",
        ],
    }
}

fn draw_baby(buf: &mut CellBuffer, art: BabyArt, l: &Layout, fg: Color, bg: Color) {
    let sprite = baby_sprite(art);
    let c = l.baby_area.center();
    let x0 = c.x - sprite[0].chars().count() as i32 / 2;
    let y0 = c.y - sprite.len() as i32 / 2;
    for (yy, line) in sprite.iter().enumerate() {
        let mut x = x0;
        for ch in line.chars() {
            if ch != ' ' {
                buf.set_i32(x, y0 + yy as i32, Cell { ch, fg, bg, bold: false });
            }
            x += 1;
        }
    }
}

/* -----------------------------
   UI overlay (title, progress, hints)
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg,
                bold: false,
            },
        );
    }
}

fn bar(value01: f64, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f64 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

pub(crate) fn ui_overlay(buf: &mut CellBuffer, st: &GameState, settings: &Settings) {
    let bg = Color::Black;
    let fg = Color::White;

    let title = format!("Bañatina  |  baby: {}", st.step.label());
    draw_text(buf, 1, 0, &title, fg, bg);

    let pct = st.progress.value();
    let line = format!("Bath {} {:>6.2}%", bar(pct / 100.0, 20), pct);
    let bar_fg = if st.completed() {
        if settings.enable_color {
            Color::Green
        } else {
            Color::White
        }
    } else {
        fg
    };
    draw_text(buf, 1, 1, &line, bar_fg, bg);

    if let Some(hint) = &st.last_hint {
        draw_text(buf, 1, 2, hint, Color::Grey, bg);
    }

    let help = if st.completed() {
        "All clean! n new game | h help | q quit"
    } else {
        match st.scene {
            Scene::Main => "Click the baby, drag items onto it | h help | q quit",
            Scene::Help => "Help: esc close | q quit",
        }
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, fg, bg);
}
