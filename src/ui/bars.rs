use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Widget},
};
use sortscope::SessionState;

const BAR_GAP: u16 = 1;

const UNSORTED: Color = Color::Cyan;
const COMPARE_A: Color = Color::Yellow;
const COMPARE_B: Color = Color::Magenta;
const PIVOT: Color = Color::Red;
const SORTED: Color = Color::Green;

/// One bar per element, colored by what the engine is doing with it.
pub struct BarsView<'a> {
    state: &'a SessionState,
}

impl<'a> BarsView<'a> {
    pub fn new(state: &'a SessionState) -> Self {
        Self { state }
    }
}

pub fn bar_color(state: &SessionState, idx: usize) -> Color {
    if state.highlight_c == Some(idx) {
        PIVOT
    } else if state.highlight_a == Some(idx) {
        COMPARE_A
    } else if state.highlight_b == Some(idx) {
        COMPARE_B
    } else if state.sorted.contains(&idx) {
        SORTED
    } else {
        UNSORTED
    }
}

/// Key for the bar colors, shown in the chart's title bar.
pub fn legend() -> Line<'static> {
    let swatch = |color: Color| Span::styled("■", Style::default().fg(color));
    Line::from(vec![
        swatch(UNSORTED),
        Span::raw(" unsorted  "),
        swatch(COMPARE_A),
        swatch(COMPARE_B),
        Span::raw(" compare  "),
        swatch(PIVOT),
        Span::raw(" pivot  "),
        swatch(SORTED),
        Span::raw(" sorted "),
    ])
    .right_aligned()
}

/// Bar widths for `count` bars, leaving room for the gaps.
fn bar_width(inner_width: u16, count: usize) -> u16 {
    let Ok(count) = u16::try_from(count) else {
        return 1;
    };
    if count == 0 {
        return 1;
    }
    let gaps = BAR_GAP.saturating_mul(count.saturating_sub(1));
    (inner_width.saturating_sub(gaps) / count).max(1)
}

impl Widget for BarsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Array")
            .title(legend());
        let inner_width = block.inner(area).width;

        // Bars need non-negative heights; shift so the smallest value is 1 tall.
        let floor = self.state.array.iter().copied().min().unwrap_or(0);
        let bars: Vec<Bar> = self
            .state
            .array
            .iter()
            .enumerate()
            .map(|(idx, &value)| {
                let height = (i64::from(value) - i64::from(floor) + 1) as u64;
                let color = bar_color(self.state, idx);
                Bar::default()
                    .value(height)
                    .text_value(value.to_string())
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        BarChart::default()
            .block(block)
            .bar_width(bar_width(inner_width, bars.len()))
            .bar_gap(BAR_GAP)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }
}
