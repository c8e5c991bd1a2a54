//! Top-level layout: input bar, chart container, status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use stockchart_core::render::ContainerContent;

use crate::app::{AppState, StatusLevel, PERIODS};
use crate::panels::CandleChartPanel;

pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_input_bar(f, chunks[0], app);
    draw_chart(f, chunks[1], app);
    draw_status_bar(f, chunks[2], app);
}

fn draw_input_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(true))
        .title(" Stockchart ");

    let mut spans = vec![
        Span::styled("Symbol: ", theme.muted()),
        Span::styled(
            app.symbol_input.clone(),
            Style::default().fg(theme.text_primary),
        ),
        Span::styled("▏", Style::default().fg(theme.accent)),
        Span::raw("   "),
        Span::styled("Period: ", theme.muted()),
    ];
    for (i, period) in PERIODS.iter().enumerate() {
        let style = if i == app.period_idx {
            theme.selected()
        } else {
            Style::default().fg(theme.text_secondary)
        };
        spans.push(Span::styled(format!(" {period} "), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(false))
        .title(" Chart ");

    match app.surface.chart().content() {
        ContainerContent::Figure(figure) => {
            f.render_widget(CandleChartPanel::new(&figure, theme), area);
        }
        ContainerContent::Notice(notice) => {
            let para = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    notice.to_string(),
                    Style::default().fg(theme.notice_color(&notice)),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(block);
            f.render_widget(para, area);
        }
        ContainerContent::Markup(markup) => {
            let para = Paragraph::new(markup)
                .wrap(Wrap { trim: false })
                .block(block);
            f.render_widget(para, area);
        }
        ContainerContent::Empty => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Type a ticker symbol and press Enter to load its chart.",
                    theme.muted(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Tab / ← / → change the period.",
                    theme.muted(),
                )),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " Enter:load  Tab/←/→:period  Esc:quit",
        theme.muted(),
    )];

    if app.is_loading() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("loading", Style::default().fg(theme.accent)));
    }

    if let Some((msg, level)) = &app.status_message {
        let color = match level {
            StatusLevel::Info => theme.accent,
            StatusLevel::Warning => theme.warning,
            StatusLevel::Error => theme.negative,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), Style::default().fg(color)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use stockchart_core::data::{FetchError, PriceSource, TabularResponse};
    use stockchart_core::render::{ChartContainer, Notice, Page};
    use stockchart_core::ChartConfig;

    struct Offline;

    #[async_trait::async_trait]
    impl PriceSource for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        async fn fetch_table(&self, _: &str, _: &str) -> Result<TabularResponse, FetchError> {
            Err(FetchError::Network("offline".into()))
        }
    }

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            out.push('\n');
        }
        out
    }

    fn container(app: &AppState) -> Arc<dyn ChartContainer> {
        app.surface.container("stockChartContainer").unwrap()
    }

    #[test]
    fn empty_state_shows_hint_and_periods() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = AppState::new(&ChartConfig::default(), Arc::new(Offline), rt.handle().clone());
        app.symbol_input = "AAPL".into();
        let text = screen(&app);
        assert!(text.contains("Symbol: AAPL"));
        for p in PERIODS {
            assert!(text.contains(p), "{p}");
        }
        assert!(text.contains("press Enter"));
        assert!(text.contains("Esc:quit"));
    }

    #[test]
    fn notice_is_drawn() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let app = AppState::new(&ChartConfig::default(), Arc::new(Offline), rt.handle().clone());
        container(&app).show_notice(Notice::Failed {
            symbol: "ZZZZ".into(),
            message: "No data found".into(),
        });
        let text = screen(&app);
        assert!(text.contains("Failed to load chart data for ZZZZ: No data found"));
    }

    #[test]
    fn status_message_is_drawn() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = AppState::new(&ChartConfig::default(), Arc::new(Offline), rt.handle().clone());
        app.set_error("boom");
        assert!(screen(&app).contains("| boom"));
    }
}
