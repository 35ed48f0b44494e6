use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};
use sortscope::{pseudocode, SessionState};

/// Pseudocode of the selected algorithm with the current checkpoint's line lit.
pub struct CodeView<'a> {
    state: &'a SessionState,
}

impl<'a> CodeView<'a> {
    pub fn new(state: &'a SessionState) -> Self {
        Self { state }
    }
}

impl Widget for CodeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let current = self.state.current_line();
        let lit = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let lines: Vec<Line> = pseudocode::listing(self.state.algorithm)
            .iter()
            .enumerate()
            .map(|(idx, text)| {
                if current == Some(idx) {
                    Line::styled(*text, lit)
                } else {
                    Line::raw(*text)
                }
            })
            .collect();

        let tag = self
            .state
            .current_tag
            .map(|t| format!("Code [{t}]"))
            .unwrap_or_else(|| "Code".to_string());

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(tag))
            .render(area, buf);
    }
}
