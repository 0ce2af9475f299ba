//! Custom TUI widgets

use super::app::DevicePanelState;
use super::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Rate quality band used to color the main reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBand {
    /// Responsive enough for competitive play (>= 500 Hz)
    Good,
    /// Fine for general use (>= 125 Hz)
    Fair,
    /// Below the usual USB full-speed floor
    Poor,
    /// No events this window
    Idle,
}

impl RateBand {
    pub fn classify(rate_hz: f64) -> Self {
        if rate_hz >= 500.0 {
            Self::Good
        } else if rate_hz >= 125.0 {
            Self::Fair
        } else if rate_hz > 0.0 {
            Self::Poor
        } else {
            Self::Idle
        }
    }
}

/// Panel showing one device's latest reading
pub struct DevicePanel<'a> {
    panel: &'a DevicePanelState,
    colors: &'a ThemeColors,
}

impl<'a> DevicePanel<'a> {
    pub fn new(panel: &'a DevicePanelState, colors: &'a ThemeColors) -> Self {
        Self { panel, colors }
    }

    fn band_color(&self, band: RateBand) -> ratatui::style::Color {
        match band {
            RateBand::Good => self.colors.good,
            RateBand::Fair => self.colors.fair,
            RateBand::Poor => self.colors.bad,
            RateBand::Idle => self.colors.dim,
        }
    }

    fn reading_lines(&self) -> Vec<Line<'a>> {
        let value_style = |color| Style::default().fg(color);
        let label_style = Style::default().fg(self.colors.fg);
        let dim = Style::default().fg(self.colors.dim);

        let mut lines = Vec::with_capacity(5);

        match &self.panel.latest {
            Some(m) => {
                let band_color = self.band_color(RateBand::classify(m.rate_hz));
                let latency_s = if m.latency_s().is_finite() {
                    format!("{:.4} s", m.latency_s())
                } else {
                    "inf".to_string()
                };
                let latency_ms = if m.latency_ms().is_finite() {
                    format!("{:.2} ms", m.latency_ms())
                } else {
                    "inf".to_string()
                };

                lines.push(Line::from(vec![
                    Span::styled("Polling Rate: ", label_style),
                    Span::styled(
                        format!("{:.2} Hz", m.rate_hz),
                        value_style(band_color).add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Delay: ", label_style),
                    Span::styled(latency_s, value_style(band_color)),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Delay: ", label_style),
                    Span::styled(latency_ms, value_style(band_color)),
                ]));
            }
            None => {
                lines.push(Line::from(vec![
                    Span::styled("Polling Rate: ", label_style),
                    Span::styled("-- Hz", dim),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Delay: ", label_style),
                    Span::styled("-- s", dim),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Delay: ", label_style),
                    Span::styled("-- ms", dim),
                ]));
            }
        }

        let peak = match self.panel.peak_rate_hz {
            Some(peak) => format!("{:.1} Hz", peak),
            None => "--".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled("Session peak: ", label_style),
            Span::styled(peak, dim),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Counting: ", label_style),
            Span::styled(self.panel.desc.policy.label(), dim),
        ]));

        lines
    }
}

impl Widget for DevicePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_color, title) = if self.panel.lost {
            (
                self.colors.bad,
                format!(" {} - DEVICE LOST ", self.panel.desc.display_name),
            )
        } else {
            (
                self.colors.dim,
                format!(" {} ", self.panel.desc.display_name),
            )
        };

        let block = Block::default()
            .title(Span::styled(
                title,
                Style::default()
                    .fg(if self.panel.lost {
                        self.colors.bad
                    } else {
                        self.colors.accent
                    })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        for line in self.reading_lines() {
            if y >= inner.y + inner.height {
                break;
            }
            buf.set_line(inner.x + 1, y, &line, inner.width.saturating_sub(1));
            y += 1;
        }
    }
}

/// Panel with polling rate guidance for common workloads
pub struct GuidePanel<'a> {
    colors: &'a ThemeColors,
}

impl<'a> GuidePanel<'a> {
    pub fn new(colors: &'a ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for GuidePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" What the numbers mean ")
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(self.colors.dim));

        let inner = block.inner(area);
        block.render(area, buf);

        let guide_text = [
            "",
            " COMPETITIVE AND ACTION GAMES",
            "   500-1000 Hz: fast-paced shooters and action titles benefit from",
            "   high polling rates; the resulting delay is very low and the game",
            "   feels noticeably more responsive.",
            "",
            " CASUAL AND SIMULATION GAMES",
            "   250-500 Hz: simulation and strategy titles do not demand extreme",
            "   responsiveness; rates in this range are generally sufficient.",
            "",
            " GENERAL USE",
            "   125-250 Hz: menu navigation and everyday applications are not",
            "   time-sensitive; rates in this range are perfectly acceptable.",
        ];

        for (i, line) in guide_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.starts_with(' ')
                && line
                    .trim_start()
                    .chars()
                    .next()
                    .map(|c| c.is_uppercase())
                    .unwrap_or(false)
            {
                Style::default()
                    .fg(self.colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    device_count: usize,
    elapsed: &'a str,
    windows: u64,
    message: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a str, device_count: usize, elapsed: &'a str, windows: u64) -> Self {
        Self {
            state,
            device_count,
            elapsed,
            windows,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        use ratatui::style::Color;

        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} | {} device(s) ", self.state, self.device_count);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = Style::default().bg(Color::DarkGray).fg(Color::Yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | Windows: {} ", self.elapsed, self.windows);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}
