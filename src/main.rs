mod app;
mod games;
mod grid;
mod input;
mod store;
mod time;

use std::{cell::RefCell, io, rc::Rc};

use app::{App, SCREEN_H, SCREEN_W};
use input::{InputEvent, Key};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::widgets::Paragraph;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use store::ArcadeStore;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => Key::from_char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };
    Some(key)
}

/// Milliseconds from `performance.now()`, 0 when the page has no clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// ratzilla only reports key presses; held-key games also need releases.
fn listen_for_key_release(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        web_sys::console::warn_1(&"arcade: no window, key release not tracked".into());
        return;
    };
    let on_keyup = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
        move |e: web_sys::KeyboardEvent| {
            if let Some(key) = Key::from_dom_name(&e.key()) {
                app.borrow_mut().handle_input(InputEvent::KeyUp(key));
            }
        },
    );
    if let Err(e) =
        window.add_event_listener_with_callback("keyup", on_keyup.as_ref().unchecked_ref())
    {
        web_sys::console::warn_1(&format!("arcade: keyup listener failed: {e:?}").into());
    }
    // Lives for the whole page.
    on_keyup.forget();
}

/// Center a `w` x `h` box inside `area`, clipped to it.
fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let app = Rc::new(RefCell::new(App::new(ArcadeStore::browser(), seed)));
    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            if let Some(key) = map_key(key_event.code) {
                app.borrow_mut().handle_input(InputEvent::KeyDown(key));
            }
        }
    });
    listen_for_key_release(app.clone());

    terminal.draw_web(move |f| {
        let mut app = app.borrow_mut();
        app.frame(now_ms());
        let lines = app.render().render().to_lines();
        let area = centered(f.area(), SCREEN_W, SCREEN_H);
        let screen = Paragraph::new(lines).style(Style::default().fg(Color::Gray));
        f.render_widget(screen, area);
    });

    Ok(())
}
