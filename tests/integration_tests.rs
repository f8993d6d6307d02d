use scry::config::Config;
use scry::monitor::{process, MetricKind, SystemMonitor};
use scry::series::{MetricSeriesStore, ScaleFactor};
use scry::theme;
use scry::ui::chart;
use scry::ui::table::{padding_for, TableLayout};
use scry::Cli;

#[test]
fn test_system_monitor_polls_without_panicking() {
    let mut monitor = SystemMonitor::new();
    monitor.poll_all();

    assert!(monitor.load.initialized());
    let load = monitor.load.current_value();
    assert!((0.0..=100.0).contains(&load));

    assert!(monitor.memory.initialized());
    let memory = monitor.memory.current_value();
    assert!((0.0..=100.0).contains(&memory));
    assert!((0.0..=100.0).contains(&monitor.memory.swap_percent()));
}

#[test]
fn test_process_sensor_produces_full_rows() {
    let mut monitor = SystemMonitor::new();
    monitor.poll(MetricKind::Process);

    assert!(monitor.process.initialized());
    let rows = monitor.process.rows();
    assert!(!rows.is_empty());
    for row in rows {
        assert_eq!(row.len(), process::COLUMNS.len());
    }
}

#[test]
fn test_config_creation_with_defaults() {
    let cli = Cli {
        theme: None,
        no_mouse: false,
        no_upgrade: false,
        quit_after: None,
        update_interval: None,
    };

    let config = Config::new(cli).expect("Failed to create config");
    assert_eq!(config.theme, "parallax");
    assert!(config.mouse);
    assert!(config.upgrade_check);
    assert!(config.quit_after().is_none());
}

#[test]
fn test_theme_registry() {
    assert!(theme::lookup("parallax").is_some());
    assert!(theme::lookup("monokai").is_some());
    assert!(theme::lookup("does-not-exist").is_none());
}

#[test]
fn test_process_table_layout_fits_width() {
    let total_width = 40;
    let layout = TableLayout::compute(&process::COLUMNS, total_width, padding_for(total_width));
    assert_eq!(layout.width_sum(), total_width);
    assert!(layout.primary_width >= 12);
}

#[test]
fn test_chart_pipeline_end_to_end() {
    let mut store = MetricSeriesStore::new();
    for position in 1..=120u64 {
        store.append(position, (position % 100) as f64);
    }
    let lines = chart::render_chart(
        &store,
        40,
        10,
        ScaleFactor::new(),
        " 42%",
        ratatui::style::Style::default(),
        true,
    )
    .expect("chart should render once initialized");
    assert_eq!(lines.len(), 10);
}
