pub mod chart;
pub mod reconcile;
pub mod table;

use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::config::Config;
use crate::monitor::{process, LoadSensor, MemorySensor, MetricKind, ProcessSensor, SortKey, SystemMonitor};
use crate::scheduler::Scheduler;
use crate::series::{MetricSeriesStore, ScaleFactor};
use crate::theme::Theme;
use crate::ui::reconcile::ProcessListReconciler;
use crate::ui::table::{padding_for, TableLayout};

/// An armed chord that sees no matching second key within this window
/// falls back to idle.
const CHORD_EXPIRY: Duration = Duration::from_millis(1000);

/// What the event loop should do after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Upgrade,
}

/// Two-key chord detection: `dd` kills the selected process. Any
/// non-matching key, firing, or expiry returns the machine to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChordState {
    Idle,
    Armed { key: char, expires: Instant },
}

impl ChordState {
    fn observe(&mut self, code: KeyCode, now: Instant) -> bool {
        let pressed = match code {
            KeyCode::Char(key) => Some(key),
            _ => None,
        };
        match (*self, pressed) {
            (ChordState::Armed { key, expires }, Some(pressed))
                if pressed == key && now < expires =>
            {
                *self = ChordState::Idle;
                true
            }
            (_, Some('d')) => {
                *self = ChordState::Armed {
                    key: 'd',
                    expires: now + CHORD_EXPIRY,
                };
                false
            }
            _ => {
                *self = ChordState::Idle;
                false
            }
        }
    }
}

/// The five panels of the screen, derived from the terminal size alone so
/// chart and table dimensions can be computed outside the draw closure.
#[derive(Debug, Clone, Copy)]
struct Panels {
    header: Rect,
    cpu: Rect,
    memory: Rect,
    table: Rect,
    footer: Rect,
}

impl Panels {
    fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Percentage(48),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(area);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        Panels {
            header: rows[0],
            cpu: rows[1],
            memory: bottom[0],
            table: bottom[1],
            footer: rows[3],
        }
    }
}

fn chart_columns(area: Rect) -> usize {
    area.width.saturating_sub(3) as usize
}

fn chart_rows(area: Rect) -> usize {
    area.height.saturating_sub(2) as usize
}

/// The whole application state, owned by the event loop. Timer callbacks
/// and key handlers all mutate it from the one serializing task.
pub struct App {
    pub config: Config,
    pub theme: &'static Theme,
    pub scheduler: Scheduler,
    pub monitor: SystemMonitor,
    pub scale: ScaleFactor,
    pub list_state: ListState,
    area: Rect,
    position: u64,
    load_series: MetricSeriesStore,
    memory_series: MetricSeriesStore,
    reconciler: ProcessListReconciler,
    display_rows: Vec<String>,
    table_header: Line<'static>,
    primary_width: usize,
    chord: ChordState,
    upgrade_notice: Option<String>,
    upgrading: bool,
    cpu_chart: Vec<Line<'static>>,
    memory_chart: Vec<Line<'static>>,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        let monitor = SystemMonitor::new();
        let now = Instant::now();
        let polls: Vec<(MetricKind, Duration)> = MetricKind::ALL
            .iter()
            .map(|kind| (*kind, monitor.poll_interval(*kind)))
            .collect();
        let scheduler = Scheduler::new(
            now,
            config.update_interval(),
            &polls,
            config.upgrade_check,
            config.quit_after(),
        );

        Self {
            config,
            theme,
            scheduler,
            monitor,
            scale: ScaleFactor::new(),
            list_state: ListState::default(),
            area: Rect::default(),
            position: 0,
            load_series: MetricSeriesStore::new(),
            memory_series: MetricSeriesStore::new(),
            reconciler: ProcessListReconciler::new(),
            display_rows: Vec::new(),
            table_header: Line::default(),
            primary_width: 0,
            chord: ChordState::Idle,
            upgrade_notice: None,
            upgrading: false,
            cpu_chart: Vec::new(),
            memory_chart: Vec::new(),
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn set_upgrade_notice(&mut self, version: String) {
        self.upgrade_notice = Some(version);
    }

    pub fn upgrading(&self) -> bool {
        self.upgrading
    }

    /// One redraw tick: advance the global position, feed the series,
    /// re-rasterize both charts and, unless navigation has frozen it,
    /// rebuild the table through the reconciler.
    pub fn on_redraw(&mut self, now: Instant) {
        self.position += 1;
        let panels = Panels::compute(self.area);

        if self.monitor.load.initialized() {
            self.load_series
                .append(self.position, self.monitor.load.current_value());
        }
        if self.monitor.memory.initialized() {
            self.memory_series
                .append(self.position, self.monitor.memory.current_value());
        }

        let overlay_style = Style::default().fg(Color::White);
        let load_overlay = format!("{:>3}%", self.monitor.load.current_value().round() as u32);
        if let Some(lines) = chart::render_chart(
            &self.load_series,
            chart_columns(panels.cpu),
            chart_rows(panels.cpu),
            self.scale,
            &load_overlay,
            overlay_style,
            self.monitor.load.initialized(),
        ) {
            self.cpu_chart = lines;
        }

        let memory = &self.monitor.memory;
        let memory_overlay = format!(
            "{:>3}% (Swap Space{:>3}%) [{} available]",
            memory.current_value().round() as u32,
            memory.swap_percent().round() as u32,
            chart::capacity_label(memory.available_mb()),
        );
        if let Some(lines) = chart::render_chart(
            &self.memory_series,
            chart_columns(panels.memory),
            chart_rows(panels.memory),
            self.scale,
            &memory_overlay,
            overlay_style,
            memory.initialized(),
        ) {
            self.memory_chart = lines;
        }

        if !self.scheduler.table_suppressed(now) && self.monitor.process.initialized() {
            self.update_table(panels.table);
        }
    }

    fn update_table(&mut self, panel: Rect) {
        let total_width = panel.width.saturating_sub(3) as usize;
        let layout = TableLayout::compute(&process::COLUMNS, total_width, padding_for(total_width));
        self.table_header = layout.header_line();
        self.primary_width = layout.primary_width;

        let rows: Vec<String> = self
            .monitor
            .process
            .rows()
            .iter()
            .map(|cells| layout.row_text(cells))
            .collect();
        self.display_rows = self.reconciler.reconcile(rows, layout.primary_width);

        // The list widget owns the selection; only clamp it to the new
        // row count and seed it on first data.
        match self.list_state.selected() {
            None if !self.display_rows.is_empty() => self.list_state.select(Some(0)),
            Some(selected)
                if selected >= self.display_rows.len() && !self.display_rows.is_empty() =>
            {
                self.list_state.select(Some(self.display_rows.len() - 1))
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !self.upgrading
            && (matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                || (ctrl && key.code == KeyCode::Char('c')))
        {
            self.scheduler.cancel_all();
            return Action::Quit;
        }

        if self.chord.observe(key.code, now) {
            self.kill_selected();
            return Action::None;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                self.scheduler.suppress_nav(now);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                self.scheduler.suppress_nav(now);
            }
            KeyCode::Char('g') => {
                self.select_first();
                self.scheduler.suppress_nav(now);
            }
            KeyCode::Char('G') => {
                self.select_last();
                self.scheduler.suppress_nav(now);
            }
            KeyCode::Char('c') => self.set_sort(SortKey::Cpu, now),
            KeyCode::Char('m') => self.set_sort(SortKey::Mem, now),
            KeyCode::Left | KeyCode::Char('h') => self.scale.zoom_in(),
            KeyCode::Right | KeyCode::Char('l') => self.scale.zoom_out(),
            KeyCode::Char('u') => {
                if !self.upgrading {
                    self.upgrading = true;
                    self.scheduler.cancel_all();
                    self.reconciler.reset();
                    return Action::Upgrade;
                }
            }
            _ => {}
        }
        Action::None
    }

    pub fn handle_mouse(&mut self, event: MouseEvent, now: Instant) {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.select_previous();
                self.scheduler.suppress_nav(now);
            }
            MouseEventKind::ScrollDown => {
                self.select_next();
                self.scheduler.suppress_nav(now);
            }
            _ => {}
        }
    }

    fn set_sort(&mut self, sort: SortKey, now: Instant) {
        if self.monitor.process.sort_key() != sort {
            self.monitor.process.set_sort(sort);
            self.monitor.poll(MetricKind::Process);
            self.scheduler.schedule_selection_reset(now);
        }
    }

    /// Fired by the scheduler once the post-sort settle delay elapses.
    pub fn reset_selection(&mut self) {
        if !self.display_rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_next(&mut self) {
        let len = self.display_rows.len();
        if len > 0 {
            let next = self.list_state.selected().map_or(0, |index| (index + 1) % len);
            self.list_state.select(Some(next));
        }
    }

    fn select_previous(&mut self) {
        let len = self.display_rows.len();
        if len > 0 {
            let previous = self
                .list_state
                .selected()
                .map_or(0, |index| if index == 0 { len - 1 } else { index - 1 });
            self.list_state.select(Some(previous));
        }
    }

    fn select_first(&mut self) {
        if !self.display_rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.display_rows.is_empty() {
            self.list_state.select(Some(self.display_rows.len() - 1));
        }
    }

    /// Issues a fire-and-forget terminate request for the selected row's
    /// command name; failures are deliberately invisible.
    fn kill_selected(&mut self) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let Some(row) = self.display_rows.get(selected) else {
            return;
        };
        let name = row
            .chars()
            .take(self.primary_width)
            .collect::<String>()
            .trim()
            .to_string();
        if name.is_empty() {
            return;
        }
        let _ = tokio::process::Command::new("killall").arg(name).spawn();
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let panels = Panels::compute(frame.size());
        self.render_header(frame, panels.header);
        self.render_chart_panel(frame, panels.cpu, LoadSensor::TITLE, &self.cpu_chart);
        self.render_chart_panel(frame, panels.memory, MemorySensor::TITLE, &self.memory_chart);
        self.render_footer(frame, panels.footer);
        self.render_table(frame, panels.table);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        let mut spans = vec![
            Span::raw(" "),
            Span::styled("scry", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" for {} ", SystemMonitor::hostname())),
        ];
        if let Some(version) = &self.upgrade_notice {
            spans.push(Span::styled(
                format!(" Press 'u' to upgrade to v{} ", version),
                Style::default().fg(Color::White).bg(Color::Red),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(self.theme.title_style()),
            chunks[0],
        );

        let (one, five, fifteen) = self.monitor.load_average();
        frame.render_widget(
            Paragraph::new(format!("Load Average: {:.2} {:.2} {:.2}", one, five, fifteen))
                .style(self.theme.title_style())
                .alignment(Alignment::Center),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new(Local::now().format("%H:%M:%S ").to_string())
                .style(self.theme.title_style())
                .alignment(Alignment::Right),
            chunks[2],
        );
    }

    fn render_chart_panel(&self, frame: &mut Frame, area: Rect, title: &str, lines: &[Line<'static>]) {
        let paragraph = Paragraph::new(lines.to_vec())
            .style(self.theme.chart_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title(format!(" {} ", title)),
            );
        frame.render_widget(paragraph, area);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(format!(" {} ", ProcessSensor::TITLE));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.table_header.clone()).style(self.theme.table_style()),
            chunks[0],
        );

        let items: Vec<ListItem> = self
            .display_rows
            .iter()
            .map(|row| ListItem::new(row.clone()))
            .collect();
        let list = List::new(items)
            .style(self.theme.table_style())
            .highlight_style(self.theme.selection_style());
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default().fg(Color::White);
        let bindings = [
            ("dd", "Kill process"),
            ("j", "Down"),
            ("k", "Up"),
            ("g", "Jump to top"),
            ("G", "Jump to bottom"),
            ("c", "Sort by CPU"),
            ("m", "Sort by Mem"),
            ("h/l", "Zoom chart"),
            ("u", "Upgrade"),
        ];
        let mut spans = Vec::new();
        for (index, (key, action)) in bindings.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(":{}", action)));
        }
        let footer = Paragraph::new(Line::from(spans))
            .style(self.theme.footer_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title(" Commands "),
            );
        frame.render_widget(footer, area);
    }
}
