//! Ghungroo rhythm test screen.

use natya::achievements::GuruScore;
use natya::detection::{Phase, Tier};
use natya::practice::PracticeOutcome;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// Everything the screen shows, copied out of the session each frame.
#[derive(Debug, Clone)]
pub struct PracticeView {
    pub tier: Tier,
    pub phase: Phase,
    pub percentage: u8,
    pub beat: u8,
    pub outcome: Option<PracticeOutcome>,
    pub score: GuruScore,
    pub status: Option<String>,
}

pub fn draw_practice_scene(frame: &mut Frame, view: &PracticeView) {
    let area = frame.size();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_camera_panel(frame, columns[0], view);
    draw_controls(frame, columns[1], view);

    if let Some(outcome) = view.outcome {
        draw_outcome_overlay(frame, columns[0], &outcome);
    }
}

fn draw_camera_panel(frame: &mut Frame, area: Rect, view: &PracticeView) {
    let block = Block::default()
        .title(" Camera ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let caption = match view.phase {
        Phase::Idle => "Press Enter to start the rhythm test".to_string(),
        Phase::PreRoll => format!("{} Get ready...", super::spinner_char()),
        Phase::Ramping => format!("{} Listening for ghungroo...", super::spinner_char()),
        Phase::CheckpointFailed | Phase::Succeeded => String::new(),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(caption, Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

fn draw_controls(frame: &mut Frame, area: Rect, view: &PracticeView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    let tier_style = |tier: Tier| {
        if tier == view.tier {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let tier_lines = vec![
        Line::from(vec![
            Span::styled(format!("[1] {}", Tier::Basic), tier_style(Tier::Basic)),
            Span::raw("   "),
            Span::styled(format!("[2] {}", Tier::Advanced), tier_style(Tier::Advanced)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Beat sync: "),
            Span::styled(
                if view.beat == 0 {
                    "-".to_string()
                } else {
                    format!("Tatta Adavu {}", view.beat)
                },
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(tier_lines).block(
            Block::default()
                .title(" Level ")
                .borders(Borders::ALL),
        ),
        rows[0],
    );

    let gauge_color = match view.phase {
        Phase::Succeeded => Color::Green,
        Phase::CheckpointFailed => Color::Red,
        _ => Color::Yellow,
    };
    frame.render_widget(
        Gauge::default()
            .block(
                Block::default()
                    .title(" Detection Progress ")
                    .borders(Borders::ALL),
            )
            .gauge_style(Style::default().fg(gauge_color))
            .percent(u16::from(view.percentage.min(100)))
            .label(format!("{}%", view.percentage)),
        rows[1],
    );

    let score_lines = vec![
        Line::from(vec![
            Span::raw("Guru score: "),
            Span::styled(
                view.score.current.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} this week)", view.score.trend_label()),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(format!("Progress to goal: {}%", view.score.progress)),
    ];
    frame.render_widget(
        Paragraph::new(score_lines).block(Block::default().borders(Borders::ALL)),
        rows[2],
    );

    let mut help = vec![
        Line::from("[Enter] Start   [1/2] Level   [C] Cancel   [Q] Quit"),
    ];
    if let Some(status) = &view.status {
        help.push(Line::from(""));
        help.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Magenta),
        )));
    }
    frame.render_widget(
        Paragraph::new(help)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        rows[3],
    );
}

fn draw_outcome_overlay(frame: &mut Frame, area: Rect, outcome: &PracticeOutcome) {
    let color = if outcome.is_success() {
        Color::Green
    } else {
        Color::Red
    };
    let width = 40.min(area.width.saturating_sub(4));
    let height = 7.min(area.height.saturating_sub(2));
    let dialog = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            outcome.headline(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(outcome.message()),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        dialog,
    );
}
