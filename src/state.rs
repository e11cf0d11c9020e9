use std::path::Path;

use crate::color::CategoryColors;
use crate::config::DashboardConfig;
use crate::data::export::CsvExport;
use crate::data::model::{Track, TrackTable};
use crate::data::views::{self, DashboardViews};
use crate::ui::orbit::Orbit;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// The loaded table. Replaced wholesale when another file is opened.
    pub table: TrackTable,

    /// Everything derived from `table` (cached).
    pub views: DashboardViews,

    /// Colours of the top-N genres.
    pub genre_colors: CategoryColors,

    /// Whether the raw table is expanded.
    pub show_raw_table: bool,

    /// Dropdown choice among the top-N titles.
    pub selected_title: Option<String>,

    /// Camera of the 3D scatter.
    pub orbit: Orbit,

    /// Cached CSV export of `table`.
    pub export: CsvExport,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, table: TrackTable) -> Self {
        let views = DashboardViews::build(&table, config.top_n, config.histogram_bin_width);
        let genre_colors = CategoryColors::new(&views::genres(table.top_n(config.top_n)));
        let selected_title = table.top_n(config.top_n).first().map(|t| t.title.clone());

        Self {
            config,
            table,
            views,
            genre_colors,
            show_raw_table: false,
            selected_title,
            orbit: Orbit::default(),
            export: CsvExport::default(),
            status_message: None,
        }
    }

    /// Swap in a newly loaded table and rebuild everything derived from it.
    pub fn set_table(&mut self, table: TrackTable) {
        let top_n = self.config.top_n;
        self.views = DashboardViews::build(&table, top_n, self.config.histogram_bin_width);
        self.genre_colors = CategoryColors::new(&views::genres(table.top_n(top_n)));
        self.selected_title = table.top_n(top_n).first().map(|t| t.title.clone());
        self.orbit = Orbit::default();
        self.export.invalidate();
        self.table = table;
    }

    /// The top-N slice the lower half of the page works on.
    pub fn top_tracks(&self) -> &[Track] {
        self.table.top_n(self.config.top_n)
    }

    /// Echo of the current dropdown choice.
    pub fn selection_echo(&self) -> Option<String> {
        self.selected_title.as_deref().map(views::selection_echo)
    }

    /// Load a file picked by the user. Failures leave the current table.
    pub fn open(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(table) => {
                self.set_table(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the cached CSV export to `path`.
    pub fn export_to(&mut self, path: &Path) {
        match self.export.save(&self.table, path) {
            Ok(()) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader;
    use crate::data::test_support::canonical_dataset;

    fn state() -> AppState {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        AppState::new(DashboardConfig::default(), table)
    }

    #[test]
    fn test_new_state_selects_first_top_title() {
        let state = state();
        assert_eq!(state.top_tracks().len(), 15);
        assert_eq!(
            state.selected_title.as_deref(),
            Some(state.table.tracks[0].title.as_str())
        );
        assert!(!state.show_raw_table);
        assert!(!state.export.is_cached());
    }

    #[test]
    fn test_every_option_echoes_its_title() {
        let mut state = state();
        let options: Vec<String> = state.top_tracks().iter().map(|t| t.title.clone()).collect();
        for title in options {
            state.selected_title = Some(title.clone());
            let echo = state.selection_echo().expect("echo");
            assert!(echo.ends_with(&title));
            assert_eq!(echo.matches(title.as_str()).count(), 1);
        }
    }

    #[test]
    fn test_failed_open_keeps_table() {
        let mut state = state();
        state.open(Path::new("missing/Top2020.csv"));
        assert_eq!(state.table.len(), 50);
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error")));
    }

    #[test]
    fn test_set_table_drops_cached_export() {
        let mut state = state();
        let table = state.table.clone();
        state.export.bytes(&table).expect("export");
        assert!(state.export.is_cached());

        state.show_raw_table = true;
        state.set_table(table);
        assert!(!state.export.is_cached());
        assert!(state.show_raw_table);
    }

    #[test]
    fn test_export_to_writes_file() {
        let mut state = state();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(&state.config.export_file_name);
        state.export_to(&path);
        assert!(path.exists());
        assert!(state.export.is_cached());
    }
}
