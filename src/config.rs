use std::path::PathBuf;

use crate::data::export;

/// Fixed settings of the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Table loaded at start-up.
    pub dataset_path: PathBuf,
    pub header_image_url: String,
    pub video_url: String,
    /// Size of the "top songs" slice.
    pub top_n: usize,
    /// Popularity bin width of the genre histogram.
    pub histogram_bin_width: i64,
    pub export_file_name: String,
    pub export_mime: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/Top2020.csv"),
            header_image_url: "https://storage.googleapis.com/pr-newsroom-wp/1/2020/03/Header.png"
                .to_string(),
            video_url: "https://www.youtube.com/watch?v=4NRXx6U8ABQ".to_string(),
            top_n: 15,
            histogram_bin_width: 5,
            export_file_name: export::FILE_NAME.to_string(),
            export_mime: export::MIME.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Still image for the video link, derived from a YouTube watch URL.
    pub fn video_thumbnail_url(&self) -> Option<String> {
        let (_, query) = self.video_url.split_once('?')?;
        let id = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))?;
        Some(format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"))
    }
}
