use std::path::PathBuf;

use crate::color::ChartColors;
use crate::config::ViewerConfig;
use crate::data::cache::Loader;
use crate::data::loader::Source;
use crate::page::{render_page, Page, PageRequest};

// ---------------------------------------------------------------------------
// Load lifecycle
// ---------------------------------------------------------------------------

/// Where the current page view is in its blocking load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing to do; `page` is current.
    Idle,
    /// A view was requested; the spinner gets drawn this frame.
    Requested,
    /// The spinner is on screen; the next frame runs the blocking read.
    Ready,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub loader: Loader,

    /// Parameters of the page being shown.
    pub request: PageRequest,

    /// Last rendered page (None until the first load finishes).
    pub page: Option<Page>,

    pub phase: LoadPhase,

    pub colors: ChartColors,
}

impl AppState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            loader: Loader::new(config.load_options()),
            request: config.page_request(),
            page: None,
            phase: LoadPhase::Requested,
            colors: ChartColors::default(),
        }
    }

    /// Whether the blocking read is pending (the spinner should show).
    pub fn loading(&self) -> bool {
        self.phase != LoadPhase::Idle
    }

    /// Ask for a fresh page view of the current request.
    pub fn request_view(&mut self) {
        self.phase = LoadPhase::Requested;
    }

    /// Switch to another source and view it.
    pub fn open_source(&mut self, source: Source) {
        log::info!("Opening {source}");
        self.request.source = source;
        self.request_view();
    }

    pub fn open_path(&mut self, path: PathBuf) {
        self.open_source(Source::from(path));
    }

    /// Empty the cache and view the current source again.
    pub fn clear_cache(&mut self) {
        self.loader.clear();
        self.request_view();
    }

    /// Advance the load lifecycle by one frame. Returns `true` while the
    /// caller should keep repainting.
    pub fn tick(&mut self) -> bool {
        match self.phase {
            LoadPhase::Idle => false,
            LoadPhase::Requested => {
                self.phase = LoadPhase::Ready;
                true
            }
            LoadPhase::Ready => {
                self.page = Some(render_page(&mut self.loader, &self.request));
                self.phase = LoadPhase::Idle;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(path: &std::path::Path) -> ViewerConfig {
        ViewerConfig {
            source: path.display().to_string(),
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn spinner_frame_precedes_the_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soil.csv");
        fs::write(&path, "DATE_TIME,SMANOM_5_CM\n2024010100,0.5\n").unwrap();

        let mut state = AppState::new(&config_for(&path));
        assert!(state.loading());

        assert!(state.tick());
        assert!(state.page.is_none());
        assert!(state.loading());

        assert!(state.tick());
        assert!(!state.loading());
        assert!(state.page.as_ref().is_some_and(Page::is_loaded));

        assert!(!state.tick());
    }

    #[test]
    fn opening_a_missing_file_shows_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soil.csv");
        fs::write(&path, "DATE_TIME,SMANOM_5_CM\n2024010100,0.5\n").unwrap();

        let mut state = AppState::new(&config_for(&path));
        while state.tick() {}

        state.open_path(dir.path().join("other.csv"));
        while state.tick() {}
        assert!(state.page.as_ref().is_some_and(|p| !p.is_loaded()));
    }
}
