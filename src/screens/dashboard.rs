/// Main dashboard screen
///
/// Pure projection of the controller's state into the list, detail, status
/// and footer panes. Nothing here performs I/O or keeps state between frames.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::str::FromStr;

use crate::core::docker::{ContainerDetails, ResourceSample};
use crate::core::state::DashboardState;
use crate::utils::app_config::UiConfig;
use crate::utils::{
    format_bytes, DEFAULT_ACCENT_COLOR, DEFAULT_FOOTER_COLOR, DEFAULT_STATUS_COLOR, FOOTER_HINT,
};

pub const DETAIL_PROMPT: &str = "Select a container to view details.";

/// What the detail pane currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPane {
    Prompt,
    Loaded {
        details: ContainerDetails,
        /// `None` when sampling failed
        sample: Option<ResourceSample>,
    },
    Error(String),
}

/// Colors resolved from the `ui` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub footer: Color,
    pub status: Color,
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

impl Palette {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            footer: parse_color(&ui.footer_color, DEFAULT_FOOTER_COLOR),
            status: parse_color(&ui.status_color, DEFAULT_STATUS_COLOR),
            accent: parse_color(&ui.accent_color, DEFAULT_ACCENT_COLOR),
        }
    }
}

fn parse_color(name: &str, fallback: &str) -> Color {
    Color::from_str(name.trim())
        .or_else(|_| Color::from_str(fallback))
        .unwrap_or(Color::White)
}

/// Borrowed snapshot handed to the renderer for one frame
pub struct DashboardView<'a> {
    pub state: &'a DashboardState,
    pub detail: &'a DetailPane,
    pub status: &'a str,
    pub palette: &'a Palette,
}

pub fn render(frame: &mut Frame, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),     // List + details
            Constraint::Length(1),  // Status
            Constraint::Length(1),  // Footer
        ])
        .split(frame.size());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(rows[0]);

    render_list(frame, body[0], view.state);
    render_detail(frame, body[1], view.detail, view.palette);

    let status = Paragraph::new(view.status.to_string())
        .alignment(Alignment::Left)
        .style(Style::default().fg(view.palette.status));
    frame.render_widget(status, rows[1]);

    let footer = Paragraph::new(FOOTER_HINT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(view.palette.footer));
    frame.render_widget(footer, rows[2]);
}

fn render_list(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let items: Vec<ListItem> = state
        .entries()
        .iter()
        .map(|entry| {
            let subtitle_color = Color::from_str(entry.state().color()).unwrap_or(Color::Gray);
            ListItem::new(vec![
                Line::from(Span::styled(
                    entry.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    entry.subtitle.clone(),
                    Style::default().fg(subtitle_color),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Containers ({})", container_count(state))),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(state.selected());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn container_count(state: &DashboardState) -> usize {
    state.entries().iter().filter(|e| e.target().is_some()).count()
}

fn render_detail(frame: &mut Frame, area: Rect, detail: &DetailPane, palette: &Palette) {
    let paragraph = Paragraph::new(detail_lines(detail, palette))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Details"));

    frame.render_widget(paragraph, area);
}

/// Text of the detail pane
pub fn detail_lines(detail: &DetailPane, palette: &Palette) -> Vec<Line<'static>> {
    match detail {
        DetailPane::Prompt => vec![Line::from(DETAIL_PROMPT)],
        DetailPane::Error(message) => vec![Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(message.clone()),
        ])],
        DetailPane::Loaded { details, sample } => {
            let ports = if details.ports.is_empty() {
                "none".to_string()
            } else {
                details.ports.join(", ")
            };

            let label = Style::default().fg(palette.accent);
            [
                ("ID: ", details.id.clone()),
                ("Name: ", details.name.clone()),
                ("Image: ", details.image.clone()),
                ("Status: ", details.status.clone()),
                ("Created: ", details.created.clone()),
                ("Ports: ", ports),
                ("CPU: ", format_cpu(sample.as_ref())),
                ("Memory: ", format_memory(sample.as_ref())),
            ]
            .into_iter()
            .map(|(name, value)| Line::from(vec![Span::styled(name, label), Span::raw(value)]))
            .collect()
        }
    }
}

/// CPU percentage with two decimals; a missing sample reads as zero
pub fn format_cpu(sample: Option<&ResourceSample>) -> String {
    format!("{:.2}%", sample.map(|s| s.cpu_percent).unwrap_or(0.0))
}

/// `usage / limit (pct%)`, or `N/A` without a sample or a reported limit
pub fn format_memory(sample: Option<&ResourceSample>) -> String {
    match sample {
        Some(s) if s.memory_limit > 0 => format!(
            "{} / {} ({:.2}%)",
            format_bytes(s.memory_usage),
            format_bytes(s.memory_limit),
            s.memory_percent
        ),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::docker::ContainerSummary;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn details() -> ContainerDetails {
        ContainerDetails {
            id: "abc123456789def".to_string(),
            name: "web".to_string(),
            image: "nginx:latest".to_string(),
            status: "running".to_string(),
            created: "2024-05-01 10:00:00".to_string(),
            ports: vec!["0.0.0.0:8080->80/tcp".to_string()],
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_memory_and_cpu_fallback_without_sample() {
        assert_eq!(format_memory(None), "N/A");
        assert_eq!(format_cpu(None), "0.00%");
    }

    #[test]
    fn test_memory_without_limit_is_na() {
        let sample = ResourceSample::new(12.345, 4096, 0);
        assert_eq!(format_memory(Some(&sample)), "N/A");
        assert_eq!(format_cpu(Some(&sample)), "12.35%");
    }

    #[test]
    fn test_memory_line_uses_byte_formatter() {
        let sample = ResourceSample::new(0.5, 512 * 1024 * 1024, 2 * 1024 * 1024 * 1024);
        assert_eq!(format_memory(Some(&sample)), "512.00 MB / 2.00 GB (25.00%)");
    }

    #[test]
    fn test_loaded_detail_lines() {
        let pane = DetailPane::Loaded {
            details: details(),
            sample: None,
        };
        let lines: Vec<String> = detail_lines(&pane, &Palette::default()).iter().map(text).collect();

        assert_eq!(
            lines,
            vec![
                "ID: abc123456789def",
                "Name: web",
                "Image: nginx:latest",
                "Status: running",
                "Created: 2024-05-01 10:00:00",
                "Ports: 0.0.0.0:8080->80/tcp",
                "CPU: 0.00%",
                "Memory: N/A",
            ]
        );
    }

    #[test]
    fn test_error_and_prompt_detail_lines() {
        let palette = Palette::default();
        let error = detail_lines(&DetailPane::Error("inspect container: gone".to_string()), &palette);
        assert_eq!(error.len(), 1);
        assert_eq!(text(&error[0]), "Error: inspect container: gone");

        let prompt = detail_lines(&DetailPane::Prompt, &palette);
        assert_eq!(text(&prompt[0]), DETAIL_PROMPT);
    }

    #[test]
    fn test_palette_parses_names_and_falls_back() {
        let ui = UiConfig {
            footer_color: "cyan".to_string(),
            status_color: "no-such-color".to_string(),
            accent_color: "#ff8800".to_string(),
        };
        let palette = Palette::from_config(&ui);

        assert_eq!(palette.footer, Color::Cyan);
        assert_eq!(palette.status, Color::White);
        assert_eq!(palette.accent, Color::Rgb(0xff, 0x88, 0x00));
        assert_eq!(Palette::default().accent, Color::Yellow);
    }

    #[test]
    fn test_render_draws_all_panes() {
        let state = DashboardState::from_listing(Ok(vec![ContainerSummary {
            id: "abc123456789def".to_string(),
            image: "nginx:latest".to_string(),
            status: "Up 2 minutes".to_string(),
            names: vec!["web".to_string()],
        }]));
        let detail = DetailPane::Loaded {
            details: details(),
            sample: None,
        };
        let palette = Palette::default();
        let view = DashboardView {
            state: &state,
            detail: &detail,
            status: "Container started.",
            palette: &palette,
        };

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| render(f, &view)).unwrap();
        let screen = screen_text(&terminal);

        assert!(screen.contains("web (abc123456789)"));
        assert!(screen.contains("nginx:latest | Up 2 minutes"));
        assert!(screen.contains("Containers (1)"));
        assert!(screen.contains("Memory: N/A"));
        assert!(screen.contains("Container started."));
        assert!(screen.contains(FOOTER_HINT));
    }
}
