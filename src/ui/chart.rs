use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::series::{MetricSeriesStore, ScaleFactor};

/// Dot bit for a pixel within one braille cell, indexed [y % 4][x % 2].
const DOT_BITS: [[u8; 2]; 4] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

const BRAILLE_BASE: u32 = 0x2800;

/// A sub-character pixel canvas: every terminal cell holds a 2x4 dot
/// matrix, so the grid is `2 * columns` pixels wide and `4 * rows` tall.
#[derive(Debug, Clone)]
pub struct BrailleGrid {
    columns: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl BrailleGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![0; columns * rows],
        }
    }

    pub fn width(&self) -> usize {
        self.columns * 2
    }

    pub fn height(&self) -> usize {
        self.rows * 4
    }

    /// Lights the dot at pixel (x, y). Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: f64, y: i64) {
        if x < 0.0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.cells[y / 4 * self.columns + x / 2] |= DOT_BITS[y % 4][x % 2];
    }

    /// The rendered character rows. Unlit cells emit the blank braille
    /// pattern so every row is exactly `columns` characters wide.
    pub fn frame(&self) -> Vec<String> {
        self.cells
            .chunks(self.columns)
            .map(|row| {
                row.iter()
                    .map(|bits| {
                        char::from_u32(BRAILLE_BASE + *bits as u32).unwrap_or(' ')
                    })
                    .collect()
            })
            .collect()
    }
}

/// Maps a percentage to a pixel row; larger values sit higher. Results at
/// or above the top edge (row <= 0) are off the chart and not plotted.
pub fn value_row(value: f64, height: usize) -> i64 {
    height as i64 - (((height as f64 + 1.0) / 100.0) * value).floor() as i64 - 1
}

/// Formats the raw available-capacity figure for the memory overlay,
/// switching from whole megabytes to one-decimal gigabytes at 1024.
pub fn capacity_label(available_mb: u64) -> String {
    if available_mb < 1024 {
        format!("{}MB", available_mb)
    } else {
        format!("{:.1}GB", available_mb as f64 / 1024.0)
    }
}

/// Rasterizes a series into text lines for a panel of `columns` x `rows`
/// cells, then overwrites the tail of the top row with `overlay`. The
/// splice removes exactly as many characters as the overlay renders, so
/// adjacent plot pixels survive intact. Returns None while the backing
/// sensor has produced no data yet; the caller keeps the previous frame.
pub fn render_chart(
    store: &MetricSeriesStore,
    columns: usize,
    rows: usize,
    scale: ScaleFactor,
    overlay: &str,
    overlay_style: Style,
    initialized: bool,
) -> Option<Vec<Line<'static>>> {
    if !initialized || columns == 0 || rows == 0 {
        return None;
    }

    let mut grid = BrailleGrid::new(columns, rows);
    let height = grid.height();
    for point in store.windowed_view(scale, grid.width()) {
        let row = value_row(point.value, height);
        if row > 0 {
            grid.set(point.x, row);
        }
    }

    let mut lines: Vec<Line<'static>> = Vec::with_capacity(rows);
    for (row, text) in grid.frame().into_iter().enumerate() {
        if row == 0 {
            let keep = columns.saturating_sub(overlay.chars().count());
            let prefix: String = text.chars().take(keep).collect();
            lines.push(Line::from(vec![
                Span::raw(prefix),
                Span::styled(overlay.to_string(), overlay_style),
            ]));
        } else {
            lines.push(Line::from(text));
        }
    }
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_row_mapping() {
        assert_eq!(value_row(50.0, 40), 19);
        assert_eq!(value_row(0.0, 40), 39);
        assert!(value_row(100.0, 40) <= 0);
    }

    #[test]
    fn test_grid_sets_single_dot() {
        let mut grid = BrailleGrid::new(2, 1);
        grid.set(0.0, 0);
        let frame = grid.frame();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].chars().count(), 2);
        assert_eq!(frame[0].chars().next(), char::from_u32(0x2801));
        assert_eq!(frame[0].chars().nth(1), char::from_u32(0x2800));
    }

    #[test]
    fn test_grid_ignores_out_of_range() {
        let mut grid = BrailleGrid::new(2, 2);
        grid.set(-1.0, 0);
        grid.set(0.0, -3);
        grid.set(100.0, 0);
        grid.set(0.0, 100);
        assert!(grid.frame().iter().all(|row| row
            .chars()
            .all(|cell| cell == char::from_u32(0x2800).unwrap())));
    }

    #[test]
    fn test_capacity_label_switches_units() {
        assert_eq!(capacity_label(512), "512MB");
        assert_eq!(capacity_label(2048), "2.0GB");
        assert_eq!(capacity_label(1023), "1023MB");
        assert_eq!(capacity_label(1536), "1.5GB");
    }

    #[test]
    fn test_render_not_ready() {
        let store = MetricSeriesStore::new();
        let lines = render_chart(
            &store,
            10,
            4,
            ScaleFactor::new(),
            " 42%",
            Style::default(),
            false,
        );
        assert!(lines.is_none());
    }

    #[test]
    fn test_overlay_splice_preserves_row_width() {
        let mut store = MetricSeriesStore::new();
        for position in 0..50u64 {
            store.append(position, 50.0);
        }
        let overlay = " 50%";
        let lines = render_chart(
            &store,
            10,
            4,
            ScaleFactor::new(),
            overlay,
            Style::default(),
            true,
        )
        .expect("chart should render");
        assert_eq!(lines.len(), 4);
        let top: String = lines[0]
            .spans
            .iter()
            .map(|span| span.content.clone())
            .collect();
        assert_eq!(top.chars().count(), 10);
        assert!(top.ends_with(overlay));
    }
}
