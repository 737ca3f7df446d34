pub mod dashboard;

// The dashboard is a single screen:
// - Container list (names, short id, image | status)
// - Detail pane (inspect fields plus one CPU/memory sample)
// - Status line and key hints

pub use dashboard::{DashboardView, DetailPane, Palette};
