use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::canonical_columns;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Page header
// ---------------------------------------------------------------------------

pub fn page_title(ui: &mut Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(text).size(30.0).strong());
    ui.add_space(4.0);
}

/// Title plus header image.
pub fn header(ui: &mut Ui, state: &AppState) {
    page_title(ui, "Top 50 Songs of 2020 on Spotify");
    ui.add(
        egui::Image::new(state.config.header_image_url.as_str())
            .max_width(ui.available_width().min(900.0))
            .corner_radius(4.0),
    );
    ui.separator();
}

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// Checkbox revealing every track in a scrollable table.
pub fn raw_table(ui: &mut Ui, state: &mut AppState) {
    ui.checkbox(&mut state.show_raw_table, "The Top 50 Songs of 2020 Dataset");
    if !state.show_raw_table {
        return;
    }

    let tracks = &state.table.tracks;
    let columns = canonical_columns();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .column(Column::auto().at_least(28.0))
        .columns(Column::auto().at_least(48.0), columns.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in &columns {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, tracks.len(), |mut row| {
                let idx = row.index();
                row.col(|ui| {
                    ui.label(idx.to_string());
                });
                for cell in tracks[idx].cells() {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Counts, describe-style statistics and the load-time inspection.
pub fn summary(ui: &mut Ui, state: &AppState) {
    let table = &state.table;
    let artists = crate::data::views::songs_per_artist(&table.tracks).len();
    let genres = crate::data::views::genres(&table.tracks).len();

    ui.heading("Summary statistics");
    ui.label(format!(
        "{} songs · {artists} artists · {genres} genres",
        table.len()
    ));

    egui::CollapsingHeader::new(RichText::new("Numeric columns").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("describe")
                .striped(true)
                .num_columns(9)
                .show(ui, |ui: &mut Ui| {
                    for h in ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                        ui.strong(h);
                    }
                    ui.end_row();

                    for s in &state.views.summary {
                        ui.label(s.column.name());
                        ui.label(s.count.to_string());
                        for v in [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max] {
                            ui.label(format!("{v:.2}"));
                        }
                        ui.end_row();
                    }
                });
        });

    let inspection = &table.inspection;
    if inspection.is_clean() {
        ui.label(format!(
            "No empty cells and no duplicate rows across {} columns.",
            inspection.null_counts.len()
        ));
    } else {
        for (column, nulls) in inspection.null_counts.iter().filter(|(_, n)| *n > 0) {
            ui.label(RichText::new(format!("{column}: {nulls} empty")).color(Color32::YELLOW));
        }
        if !inspection.duplicate_rows.is_empty() {
            ui.label(
                RichText::new(format!(
                    "Duplicate rows: {:?}",
                    inspection.duplicate_rows
                ))
                .color(Color32::YELLOW),
            );
        }
    }
    ui.separator();
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// Thumbnail linking to the favourite-song video.
pub fn video(ui: &mut Ui, state: &AppState) {
    ui.heading("2020s Favorite Song 🎶");
    let url = &state.config.video_url;

    if let Some(thumbnail) = state.config.video_thumbnail_url() {
        let response = ui
            .add(
                egui::Image::new(thumbnail)
                    .max_width(480.0)
                    .corner_radius(4.0)
                    .sense(egui::Sense::click()),
            )
            .on_hover_text("Play on YouTube");
        if response.clicked() {
            ui.ctx().open_url(egui::OpenUrl::new_tab(url));
        }
    }
    ui.hyperlink_to("▶ Watch the video", url);
    ui.separator();
}

// ---------------------------------------------------------------------------
// Top-N picker
// ---------------------------------------------------------------------------

/// Dropdown over the top-N titles; echoes the choice and nothing else.
pub fn song_picker(ui: &mut Ui, state: &mut AppState) {
    let options: Vec<String> = state.top_tracks().iter().map(|t| t.title.clone()).collect();
    let selected_text = state.selected_title.clone().unwrap_or_default();

    egui::ComboBox::from_label("Which song do you like best?")
        .selected_text(selected_text)
        .width(320.0)
        .show_ui(ui, |ui: &mut Ui| {
            for title in &options {
                ui.selectable_value(&mut state.selected_title, Some(title.clone()), title.as_str());
            }
        });

    if let Some(echo) = state.selection_echo() {
        ui.label(echo);
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// The CSV download button at the bottom of the page.
pub fn download_button(ui: &mut Ui, state: &mut AppState) {
    let mut hint = format!(
        "{} ({})",
        state.config.export_file_name, state.config.export_mime
    );
    if state.export.is_cached() {
        hint.push_str(", ready");
    }
    if ui
        .button("Download Songs data as CSV")
        .on_hover_text(hint)
        .clicked()
    {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} songs loaded, top {} below",
            state.table.len(),
            state.top_tracks().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open songs data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download songs data")
        .set_file_name(&state.config.export_file_name)
        .add_filter(format!("CSV ({})", state.config.export_mime), &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}

