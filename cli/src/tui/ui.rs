use chrono::Datelike;
use fitlog_core::{CalendarMonth, Dashboard, WeekView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::app::App;

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    hit: Color,
    miss: Color,
    selected: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    hit: Color::Green,
    miss: Color::Blue,
    selected: Color::Yellow,
};

pub fn draw(f: &mut Frame, app: &App) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // header
            Constraint::Min(10),    // week + day card
            Constraint::Length(16), // month
            Constraint::Length(1),  // footer
        ])
        .split(f.area());

    draw_header(f, app, main[0]);

    match &app.dashboard {
        Some(dash) => {
            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(65),
                    Constraint::Length(1),
                    Constraint::Percentage(35),
                ])
                .split(main[1]);
            draw_week(f, app, &dash.week, top[0]);
            draw_day_card(f, dash, top[2]);
            draw_month(f, app, dash, main[2]);
        }
        None => {
            let text = match &app.error {
                Some(err) => format!("Could not load data: {}", err),
                None => "Loading...".to_string(),
            };
            f.render_widget(
                Paragraph::new(text).alignment(Alignment::Center),
                main[1],
            );
        }
    }

    let help = Line::from(vec![
        Span::styled("DAY: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::styled(" WEEK: ", Style::default().fg(THEME.muted)),
        Span::styled("↑/↓ ", Style::default().fg(THEME.text)),
        Span::styled(" MONTH: ", Style::default().fg(THEME.muted)),
        Span::styled("[ ] ", Style::default().fg(THEME.text)),
        Span::styled(" TODAY: ", Style::default().fg(THEME.muted)),
        Span::styled("t ", Style::default().fg(THEME.text)),
        Span::styled(" QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    f.render_widget(Paragraph::new(help).alignment(Alignment::Center), main[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "FITLOG",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)));
    f.render_widget(title, chunks[0]);

    let status = if app.loading { "  loading…" } else { "" };
    let nav = Line::from(vec![
        Span::styled(
            app.selected.format("%a %Y-%m-%d").to_string(),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  target {} steps", app.prefs.effective_daily_target_steps()),
            Style::default().fg(THEME.muted),
        ),
        Span::styled(status, Style::default().fg(THEME.selected)),
    ]);
    let nav = Paragraph::new(nav)
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)));
    f.render_widget(nav, chunks[1]);
}

fn draw_week(f: &mut Frame, app: &App, week: &WeekView, area: Rect) {
    let bars: Vec<Bar> = week
        .days
        .iter()
        .map(|day| {
            let color = if day.date == app.selected {
                THEME.selected
            } else if !day.logged {
                THEME.muted
            } else if day.step_equivalent >= week.target_steps {
                THEME.hit
            } else {
                THEME.miss
            };
            Bar::default()
                .label(day.label.as_str())
                .value(day.step_equivalent as u64)
                .style(Style::default().fg(color))
                .text_value(if day.logged { compact(day.step_equivalent) } else { String::new() })
        })
        .collect();

    let peak = week
        .days
        .iter()
        .map(|d| d.step_equivalent)
        .max()
        .unwrap_or(0)
        .max(week.target_steps) as u64;

    let title = format!(
        " Week of {}  {}/7 on target  {} kcal ",
        week.start.format("%b %-d"),
        week.days_hit_target,
        week.total_kcal()
    );
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(fit(&title, area.width.saturating_sub(2) as usize)),
        )
        .bar_width(6)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars))
        .max(peak.max(1));

    f.render_widget(chart, area);
}

fn draw_day_card(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let today = &dash.today;
    let detail = &today.detail;
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(THEME.muted)),
            Span::styled(value, Style::default().fg(THEME.text)),
        ])
    };

    let mut lines = vec![
        row("Morning", format!("{} kcal", today.morning_kcal)),
        row(
            "Evening",
            format!("{} kcal ({})", today.evening_kcal, detail.evening_mode),
        ),
    ];
    if detail.bike_km > 0.0 {
        lines.push(row("  bike", format!("{:.1} km, {} kcal", detail.bike_km, detail.bike_kcal)));
    }
    if detail.resistance_sets > 0 {
        lines.push(row(
            "  weights",
            format!("{:.0} min, {} kcal", detail.weights_minutes, detail.weights_kcal),
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<10}", "Total"), Style::default().fg(THEME.muted)),
        Span::styled(
            format!("{} kcal", today.total_kcal),
            Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(row("Steps eq.", today.step_equivalent.to_string()));
    if let Some(device) = dash.device_kcal {
        lines.push(row("Device", format!("~{} kcal", device)));
    }

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(format!(" {} ", dash.date.format("%A"))),
    );
    f.render_widget(card, chunks[0]);

    let percent = dash.target_percent();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Daily target ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(if percent >= 100.0 { THEME.hit } else { THEME.miss }))
        .ratio(percent / 100.0)
        .label(format!("{:.0}%", percent));
    f.render_widget(gauge, chunks[1]);
}

fn draw_month(f: &mut Frame, app: &App, dash: &Dashboard, area: Rect) {
    let summary = &dash.month.summary;
    let title = format!(
        " {:04}-{:02}  {} logged  {} on target  {} with weights  {:.1} km bike ",
        summary.year,
        summary.month,
        summary.days_logged,
        summary.days_hit_target,
        summary.days_with_resistance,
        summary.bike_km
    );
    let cell_width = (area.width.saturating_sub(2) / 7).max(3) as usize;

    let table = Table::new(
        calendar_rows(app, &dash.month.calendar, cell_width),
        [Constraint::Ratio(1, 7); 7],
    )
    .header(
        Row::new(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"])
            .style(Style::default().fg(THEME.selected)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(fit(&title, area.width.saturating_sub(2) as usize)),
    );
    f.render_widget(table, area);
}

fn calendar_rows<'a>(app: &App, calendar: &'a CalendarMonth, width: usize) -> Vec<Row<'a>> {
    calendar
        .weeks
        .iter()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|cell| {
                    let mut day_style = Style::default().fg(if cell.in_month { THEME.text } else { THEME.muted });
                    if cell.date == app.selected {
                        day_style = day_style.fg(THEME.selected).add_modifier(Modifier::BOLD);
                    } else if cell.date == app.today {
                        day_style = day_style.add_modifier(Modifier::UNDERLINED);
                    }
                    let value = if cell.logged {
                        let mark = if cell.hit_target { "✔ " } else { "" };
                        Span::styled(
                            fit(&format!("{}{}", mark, compact(cell.step_equivalent)), width),
                            Style::default().fg(if cell.hit_target { THEME.hit } else { THEME.miss }),
                        )
                    } else {
                        Span::raw("")
                    };
                    Cell::from(Text::from(vec![
                        Line::from(Span::styled(cell.date.day().to_string(), day_style)),
                        Line::from(value),
                    ]))
                })
                .collect();
            Row::new(cells).height(2)
        })
        .collect()
}

fn compact(steps: u32) -> String {
    if steps >= 1000 {
        format!("{:.1}k", steps as f64 / 1000.0)
    } else {
        steps.to_string()
    }
}

/// Truncates to `width` terminal columns, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_counts_columns() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("a long title", 6), "a lon…");
        assert_eq!(fit("✔ 12.3k", 7), "✔ 12.3k");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact(950), "950");
        assert_eq!(compact(12_345), "12.3k");
    }
}
