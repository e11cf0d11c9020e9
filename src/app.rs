use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TopSongsApp {
    pub state: AppState,
}

impl TopSongsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for TopSongsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: the dashboard page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

/// The page, top to bottom. Every panel reads the table on its own.
fn dashboard(ui: &mut Ui, state: &mut AppState) {
    panels::header(ui, state);
    panels::raw_table(ui, state);
    ui.add_space(8.0);
    panels::summary(ui, state);
    panels::video(ui, state);

    ui.heading("★ Bar Plot – Danceability per Song");
    plot::danceability_bars(ui, &state.table.tracks);

    ui.heading("★ Bar Plot – Popularity vs. Danceability per Song");
    plot::popularity_bars(ui, &state.table.tracks);

    ui.heading("★ Histogram of # of Songs/Artist");
    plot::artist_histogram(ui, &state.views.artist_counts);

    ui.heading(
        "★ 3D plot showing the position of each track according to Energy, Loudness and Liveness",
    );
    plot::scatter_3d(ui, &state.views.cloud, &mut state.orbit);

    ui.heading("★ Features Correlation Matrix");
    plot::correlation_heatmap(ui, &state.views.correlation);

    ui.separator();
    panels::page_title(ui, &format!("Top {} Songs of 2020", state.config.top_n));
    panels::song_picker(ui, state);

    ui.heading("★ Bar Chart of Songs and Popularity: Beats Per Minute, Energy and Danceability");
    plot::grouped_bars(ui, state.top_tracks());

    ui.heading("★ Scatter Plot – Popularity vs. Genre vs. Energy");
    plot::genre_bubbles(
        ui,
        state.top_tracks(),
        &state.genre_colors,
        state.views.top_max_energy,
    );

    ui.heading("★ Pie Chart of Top Genres");
    plot::genre_pie(ui, &state.views.genre_pie, &state.genre_colors);

    ui.heading("★ Histogram of Top Genres vs. Beats Per Minute and Popularity");
    plot::genre_histogram(ui, &state.views.genre_histogram, &state.genre_colors);

    ui.add_space(12.0);
    panels::download_button(ui, state);
    ui.add_space(24.0);
}
