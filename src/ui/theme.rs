use crate::config::Theme;
use crate::models::BlockKind;
use crate::ui::color_parser::parse_color;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub ui_border: Color,
    pub tab_active: Color,
    pub tab_inactive: Color,
    pub lesson_bg: Color,
    pub free_period_bg: Color,
    pub break_bg: Color,
    pub short_gap_bg: Color,
    pub corner_tag: Color,
    pub gutter: Color,
    pub indicator: Color,
    pub status: Color,
    pub error: Color,
}

impl ThemeTokens {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            ui_border: parse_color(&theme.border),
            tab_active: parse_color(&theme.tab_active),
            tab_inactive: parse_color(&theme.tab_inactive),
            lesson_bg: parse_color(&theme.lesson),
            free_period_bg: parse_color(&theme.free_period),
            break_bg: parse_color(&theme.break_period),
            short_gap_bg: parse_color(&theme.short_gap),
            corner_tag: parse_color(&theme.corner_tag),
            gutter: parse_color(&theme.gutter),
            indicator: parse_color(&theme.indicator),
            status: parse_color(&theme.status),
            error: parse_color(&theme.error),
        }
    }

    pub fn block_background(&self, kind: BlockKind) -> Color {
        match kind {
            BlockKind::Lesson => self.lesson_bg,
            BlockKind::FreePeriod => self.free_period_bg,
            BlockKind::Break => self.break_bg,
            BlockKind::ShortGap => self.short_gap_bg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeTokens;
    use crate::config::Theme;
    use crate::models::BlockKind;
    use ratatui::style::Color;

    #[test]
    fn maps_theme_entries_to_tokens() {
        let theme = Theme {
            lesson: "#102030".to_string(),
            short_gap: "Black".to_string(),
            indicator: "LightRed".to_string(),
            ..Default::default()
        };

        let tokens = ThemeTokens::from_theme(&theme);
        assert_eq!(tokens.block_background(BlockKind::Lesson), Color::Rgb(16, 32, 48));
        assert_eq!(tokens.block_background(BlockKind::ShortGap), Color::Black);
        assert_eq!(tokens.indicator, Color::LightRed);
        assert_eq!(tokens.block_background(BlockKind::Break), Color::Rgb(70, 50, 20));
    }
}
