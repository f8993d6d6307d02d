use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// A table column. Exactly one column per table is primary; it is rendered
/// first and absorbs all width left over by the fixed-width columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub is_primary: bool,
}

/// Below this the primary column is unreadable and another column is elided.
pub const MIN_PRIMARY_WIDTH: usize = 12;

/// Inter-column padding grows with the panel width.
pub fn padding_for(total_width: usize) -> usize {
    if total_width > 80 {
        3
    } else if total_width > 50 {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveColumn {
    name: &'static str,
    is_primary: bool,
    width: usize,
    /// Index into the column definitions the layout was computed from.
    index: usize,
}

/// The resolved layout for one table: which columns survived elision and
/// how wide each one is. Pure function of (columns, total width, padding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Still in removal-priority order (primary last); rendering reverses.
    active: Vec<ActiveColumn>,
    pub primary_width: usize,
}

impl TableLayout {
    /// Columns are given in removal-priority order: the first entry is
    /// elided first when space runs out, the primary column comes last and
    /// is never elided. Non-primary columns are `len(name) + padding` wide;
    /// the primary takes the remainder. Columns are dropped one at a time
    /// until the primary is at least MIN_PRIMARY_WIDTH wide or stands alone.
    pub fn compute(columns: &[Column], total_width: usize, padding: usize) -> Self {
        let mut active: Vec<ActiveColumn> = columns
            .iter()
            .enumerate()
            .map(|(index, column)| ActiveColumn {
                name: column.name,
                is_primary: column.is_primary,
                width: 0,
                index,
            })
            .collect();

        loop {
            let fixed: usize = active
                .iter()
                .filter(|column| !column.is_primary)
                .map(|column| column.name.chars().count() + padding)
                .sum();
            let primary_width = total_width.saturating_sub(fixed);

            if primary_width < MIN_PRIMARY_WIDTH && active.len() > 1 {
                if let Some(drop) = active.iter().position(|column| !column.is_primary) {
                    active.remove(drop);
                    continue;
                }
            }

            for column in active.iter_mut() {
                column.width = if column.is_primary {
                    primary_width
                } else {
                    column.name.chars().count() + padding
                };
            }
            return TableLayout {
                active,
                primary_width,
            };
        }
    }

    pub fn width_sum(&self) -> usize {
        self.active.iter().map(|column| column.width).sum()
    }

    /// Names of the surviving columns in removal-priority order.
    pub fn active_names(&self) -> Vec<&'static str> {
        self.active.iter().map(|column| column.name).collect()
    }

    /// Header line, primary column first, the whole line bold.
    pub fn header_line(&self) -> Line<'static> {
        let mut text = String::new();
        for column in self.active.iter().rev() {
            text.push_str(&pad_cell(column.name, column.width));
        }
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    }

    /// One row of cell text. `cells` is parallel to the column definitions
    /// this layout was computed from; elided columns are skipped. Each cell
    /// gets a leading space and is padded or truncated to its column width.
    pub fn row_text(&self, cells: &[String]) -> String {
        let mut text = String::new();
        for column in self.active.iter().rev() {
            let cell = cells.get(column.index).map(String::as_str).unwrap_or("");
            let padded = pad_cell(cell, column.width);
            text.extend(padded.chars().take(column.width));
        }
        text
    }
}

fn pad_cell(text: &str, width: usize) -> String {
    let mut cell = String::with_capacity(width + 1);
    cell.push(' ');
    cell.push_str(text);
    let len = cell.chars().count();
    for _ in len..width {
        cell.push(' ');
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> Vec<Column> {
        vec![
            Column {
                name: "STARTED",
                is_primary: false,
            },
            Column {
                name: "CPU%",
                is_primary: false,
            },
            Column {
                name: "MEM%",
                is_primary: false,
            },
            Column {
                name: "COMMAND",
                is_primary: true,
            },
        ]
    }

    #[test]
    fn test_elision_drops_lowest_priority_first() {
        // At width 40 with padding 2 the fixed columns need 9 + 6 + 6 = 21,
        // leaving only 19 >= 12 for COMMAND, so nothing is dropped yet.
        let layout = TableLayout::compute(&sample_columns(), 40, 2);
        assert_eq!(
            layout.active_names(),
            vec!["STARTED", "CPU%", "MEM%", "COMMAND"]
        );
        assert_eq!(layout.primary_width, 19);
        assert_eq!(layout.width_sum(), 40);

        // Squeeze until COMMAND would fall under 12: STARTED goes first.
        let layout = TableLayout::compute(&sample_columns(), 30, 2);
        assert_eq!(layout.active_names(), vec!["CPU%", "MEM%", "COMMAND"]);
        assert_eq!(layout.primary_width, 18);
        assert_eq!(layout.width_sum(), 30);

        // Then CPU%, then MEM%, never COMMAND.
        let layout = TableLayout::compute(&sample_columns(), 20, 2);
        assert_eq!(layout.active_names(), vec!["MEM%", "COMMAND"]);
        assert_eq!(layout.width_sum(), 20);

        let layout = TableLayout::compute(&sample_columns(), 10, 2);
        assert_eq!(layout.active_names(), vec!["COMMAND"]);
        assert_eq!(layout.primary_width, 10);
    }

    #[test]
    fn test_layout_is_pure() {
        let first = TableLayout::compute(&sample_columns(), 40, 2);
        let second = TableLayout::compute(&sample_columns(), 40, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_padding_tiers() {
        assert_eq!(padding_for(40), 1);
        assert_eq!(padding_for(50), 1);
        assert_eq!(padding_for(51), 2);
        assert_eq!(padding_for(80), 2);
        assert_eq!(padding_for(81), 3);
    }

    #[test]
    fn test_row_cells_are_padded_and_truncated() {
        let layout = TableLayout::compute(&sample_columns(), 40, 2);
        let row = layout.row_text(&[
            "12:00".to_string(),
            "1.5".to_string(),
            "0.3".to_string(),
            "a-very-long-command-name-indeed".to_string(),
        ]);
        assert_eq!(row.chars().count(), 40);
        // Primary renders first and is cut to its width.
        assert!(row.starts_with(" a-very-long-comma"));
        assert!(row.contains(" 12:00"));
    }

    #[test]
    fn test_header_renders_primary_first() {
        let layout = TableLayout::compute(&sample_columns(), 40, 2);
        let header = layout.header_line();
        let text: String = header.spans.iter().map(|span| span.content.clone()).collect();
        assert!(text.starts_with(" COMMAND"));
        assert!(text.trim_end().ends_with("STARTED"));
    }
}
