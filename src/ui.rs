pub mod bars;
pub mod code;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use sortscope::{Mode, RunState, SessionState};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.session.state();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(8),    // bars + side panel
                Constraint::Length(3), // narrative
                Constraint::Length(2), // key help
            ])
            .split(area);

        title(state).render(rows[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(46)])
            .split(rows[1]);

        bars::BarsView::new(state).render(columns[0], buf);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(4)])
            .split(columns[1]);

        stats(state).render(side[0], buf);
        code::CodeView::new(state).render(side[1], buf);

        narrative(state, self.last_error.as_deref()).render(rows[2], buf);
        help(state).render(rows[3], buf);
    }
}

fn title(state: &SessionState) -> Paragraph<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Paragraph::new(Line::from(vec![
        Span::styled("sortscope ", bold.fg(Color::Cyan)),
        Span::styled(state.algorithm.display_name(), bold),
        Span::raw(format!("  ({} elements)", state.array.len())),
    ]))
}

fn run_state_style(run_state: RunState) -> Style {
    match run_state {
        RunState::Idle => Style::default().fg(Color::Gray),
        RunState::Running => Style::default().fg(Color::Yellow),
        RunState::Paused => Style::default().fg(Color::Magenta),
        RunState::Completed => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

fn stats(state: &SessionState) -> Paragraph<'static> {
    let label = Style::default().add_modifier(Modifier::DIM);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<12}"), label), Span::raw(value)])
    };

    let speed = match state.mode {
        Mode::Auto => state.speed.to_string(),
        Mode::Step => format!("{} (unused in step mode)", state.speed),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<12}", "state"), label),
            Span::styled(state.run_state.to_string(), run_state_style(state.run_state)),
        ]),
        row("mode", state.mode.to_string()),
        row("speed", speed),
        row("steps", state.step_count.to_string()),
        row("comparisons", state.comparisons.to_string()),
        row("swaps", state.swaps.to_string()),
        row("sorted", format!("{}/{}", state.sorted.len(), state.array.len())),
    ];

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"))
}

fn narrative(state: &SessionState, error: Option<&str>) -> Paragraph<'static> {
    let line = match (error, state.run_state) {
        (Some(e), _) => Line::styled(e.to_string(), Style::default().fg(Color::Red)),
        (None, RunState::Idle) if state.current_step.is_empty() => {
            Line::styled("Press Enter to start", Style::default().fg(Color::Gray))
        }
        (None, RunState::Completed) => Line::styled(
            state.current_step.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (None, _) => Line::raw(state.current_step.clone()),
    };

    Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Step"))
}

fn help(state: &SessionState) -> Paragraph<'static> {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    let mut push = |k: &'static str, what: &'static str| {
        spans.push(Span::styled(k, key));
        spans.push(Span::raw(format!(" {what}  ")));
    };

    if state.is_active() {
        match state.mode {
            Mode::Auto => push("space", "pause/resume"),
            Mode::Step => push("n/→", "next step"),
        }
        push("+/-", "speed");
        push("x", "stop");
    } else {
        push("1/2/3", "bubble/quick/merge");
        push("enter", "start");
        push("m", "auto/step");
        push("+/-", "speed");
    }
    push("r", "reset");
    push("esc", "quit");

    Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortscope::{Algorithm, Session, VisualizerConfig};

    fn create_test_app(values: &[i32]) -> App {
        let mut session = Session::new(VisualizerConfig {
            seed: Some(1),
            ..VisualizerConfig::default()
        })
        .unwrap();
        session.set_array(values.to_vec());
        App {
            session,
            last_error: None,
        }
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_idle_screen() {
        let app = create_test_app(&[5, 3, 8, 1]);
        let rendered = render(&app, 100, 30);
        assert!(rendered.contains("Bubble Sort"));
        assert!(rendered.contains("Press Enter to start"));
        assert!(rendered.contains("Stats"));
        assert!(rendered.contains("enter"));
    }

    #[test]
    fn test_completed_screen() {
        let mut app = create_test_app(&[3, 1, 2]);
        app.session
            .run_to_completion(Algorithm::Merge, |_| {})
            .unwrap();
        let rendered = render(&app, 100, 30);
        assert!(rendered.contains("Merge Sort"));
        assert!(rendered.contains("Sorting complete!"));
        assert!(rendered.contains("3/3"));
    }

    #[test]
    fn test_error_replaces_the_narrative() {
        let mut app = create_test_app(&[1, 2]);
        app.last_error = Some("worker failed".to_string());
        let rendered = render(&app, 100, 30);
        assert!(rendered.contains("worker failed"));
        assert!(!rendered.contains("Press Enter to start"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let app = create_test_app(&[4, 2, 9, 1, 7]);
        render(&app, 10, 5);
    }

    #[test]
    fn test_run_state_styles_differ() {
        assert_ne!(
            run_state_style(RunState::Running),
            run_state_style(RunState::Completed)
        );
    }
}
