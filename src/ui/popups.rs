use crate::app::App;
use crate::ui::components::centered_rect;
use crate::ui::theme::ThemeTokens;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

fn join(bindings: &[String]) -> String {
    bindings.join(" / ")
}

pub fn help_lines(app: &App) -> Vec<(String, &'static str)> {
    let keys = &app.config.keybindings;
    vec![
        (join(&keys.next_day), "Next day"),
        (join(&keys.prev_day), "Previous day"),
        ("1-5".to_string(), "Jump to Monday-Friday"),
        (join(&keys.today), "Back to today"),
        ("drag ← / →".to_string(), "Swipe between days"),
        ("click tab".to_string(), "Open that day"),
        (join(&keys.scroll_down), "Scroll down"),
        (join(&keys.scroll_up), "Scroll up"),
        (join(&keys.page_down), "Page down"),
        (join(&keys.page_up), "Page up"),
        (join(&keys.reload), "Reload timetable"),
        (join(&keys.help), "Toggle help"),
        (join(&keys.quit), "Quit"),
    ]
}

pub fn render_help_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.ui_border));
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .margin(2)
        .split(area);

    let entries = help_lines(app);
    let key_width = entries
        .iter()
        .map(|(keys, _)| keys.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = entries
        .into_iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:<key_width$}  "),
                    Style::default()
                        .fg(tokens.tab_active)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(action),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner[0]);
    f.render_widget(
        Paragraph::new("Esc / ?: close").style(Style::default().fg(tokens.status)),
        inner[1],
    );
}
