use crate::model::{Point, Scene};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub(crate) enum InputEvent {
    Key(KeyCode),
    Mouse(MouseEventKind, Point),
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Action {
    Quit,
    HelpToggle,
    NewGame,
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
}

pub(crate) fn collect_input_nonblocking(
    max_frame_time: Duration,
) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(InputEvent::Key(k.code));
                }
            }
            Event::Mouse(m) => {
                out.push(InputEvent::Mouse(
                    m.kind,
                    Point {
                        x: m.column as i32,
                        y: m.row as i32,
                    },
                ));
            }
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(scene: Scene, ev: InputEvent) -> Option<Action> {
    if matches!(scene, Scene::Help) {
        return match ev {
            InputEvent::Key(KeyCode::Esc)
            | InputEvent::Key(KeyCode::Char('h'))
            | InputEvent::Key(KeyCode::Char('H')) => Some(Action::HelpToggle),
            InputEvent::Key(KeyCode::Char('q')) | InputEvent::Key(KeyCode::Char('Q')) => {
                Some(Action::Quit)
            }
            _ => None,
        };
    }

    match ev {
        InputEvent::Key(code) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::HelpToggle),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::NewGame),
            _ => None,
        },
        InputEvent::Mouse(kind, at) => match kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Action::PointerDown(at)),
            MouseEventKind::Drag(MouseButton::Left) => Some(Action::PointerMove(at)),
            MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp(at)),
            _ => None,
        },
    }
}
