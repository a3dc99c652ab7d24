use crate::{app::App, config::key_match, navigation::NavRequest, navigation::SchoolDay};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

const PAGE_ROWS: u16 = 10;

pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                app.begin_drag(mouse_event.column, mouse_event.row)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                app.end_drag(mouse_event.column, mouse_event.row)
            }
            MouseEventKind::ScrollUp => app.scroll_up(1),
            MouseEventKind::ScrollDown => app.scroll_down(1),
            _ => {}
        },
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let bindings = &app.config.keybindings;

    if app.show_help_popup {
        if key.code == KeyCode::Esc || key_match(&key, &bindings.help) {
            app.show_help_popup = false;
        } else if key_match(&key, &bindings.quit) {
            app.quit();
        }
        return;
    }

    if key_match(&key, &bindings.quit) {
        app.quit();
    } else if key_match(&key, &bindings.help) {
        app.show_help_popup = true;
    } else if key_match(&key, &bindings.next_day) {
        app.navigate(NavRequest::Next);
    } else if key_match(&key, &bindings.prev_day) {
        app.navigate(NavRequest::Previous);
    } else if key_match(&key, &bindings.today) {
        app.navigate(NavRequest::Today);
    } else if key_match(&key, &bindings.reload) {
        app.begin_load();
    } else if key_match(&key, &bindings.scroll_up) {
        app.scroll_up(1);
    } else if key_match(&key, &bindings.scroll_down) {
        app.scroll_down(1);
    } else if key_match(&key, &bindings.page_up) {
        app.scroll_up(PAGE_ROWS);
    } else if key_match(&key, &bindings.page_down) {
        app.scroll_down(PAGE_ROWS);
    } else if let KeyCode::Char(digit @ '1'..='5') = key.code {
        let index = digit as usize - '1' as usize;
        app.navigate(NavRequest::Select(SchoolDay::from_index(index)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::ScheduleSource;
    use chrono::NaiveDate;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn app() -> App {
        // Wednesday.
        let now = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        App::new(Config::default(), ScheduleSource::parse("t.json"), now)
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn arrow_keys_move_between_days() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.current_day, SchoolDay::Thursday);
        handle_event(&mut app, press(KeyCode::Left));
        handle_event(&mut app, press(KeyCode::Left));
        assert_eq!(app.current_day, SchoolDay::Tuesday);
        handle_event(&mut app, press(KeyCode::Char('t')));
        assert_eq!(app.current_day, SchoolDay::Wednesday);
    }

    #[test]
    fn digits_pick_a_day_directly() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Char('5')));
        assert_eq!(app.current_day, SchoolDay::Friday);
        handle_event(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.current_day, SchoolDay::Monday);
    }

    #[test]
    fn help_popup_swallows_navigation() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help_popup);
        handle_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.current_day, SchoolDay::Wednesday);
        handle_event(&mut app, press(KeyCode::Esc));
        assert!(!app.show_help_popup);
    }

    #[test]
    fn mouse_drag_left_goes_to_next_day() {
        let mut app = app();
        handle_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 70, 12));
        handle_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 10, 14));
        assert_eq!(app.current_day, SchoolDay::Thursday);
    }

    #[test]
    fn quit_key_stops_the_app() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
