use std::collections::HashMap;

/// Smooths over the table's churn: rows are re-sorted and re-valued on
/// every poll, so swapping new text straight in makes the list appear to
/// jump under the user. Matching rows by the primary-column prefix and
/// showing the previous text for one render cycle keeps rows visually
/// still while the data beneath them updates. Best-effort only; prefix
/// collisions and renamed rows fall back to the new text immediately.
///
/// The selection index belongs to the list widget and is never touched
/// here.
#[derive(Debug, Default)]
pub struct ProcessListReconciler {
    previous: Vec<String>,
}

impl ProcessListReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the freshly laid-out rows and returns the rows to display
    /// this cycle. The true rows are remembered as "previous", so on the
    /// next call each prefix resolves to its own true text and the
    /// substitution lasts exactly one cycle.
    pub fn reconcile(&mut self, rows: Vec<String>, primary_width: usize) -> Vec<String> {
        let lookup: HashMap<String, &String> = self
            .previous
            .iter()
            .map(|row| (prefix(row, primary_width), row))
            .collect();

        let display = rows
            .iter()
            .map(|row| match lookup.get(&prefix(row, primary_width)) {
                Some(previous) => (*previous).clone(),
                None => row.clone(),
            })
            .collect();

        self.previous = rows;
        display
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

fn prefix(row: &str, width: usize) -> String {
    row.chars().take(width).collect()
}
