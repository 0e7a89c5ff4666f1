use eframe::egui::{self, Color32, RichText, ScrollArea, TextStyle, Ui};
use egui_extras::{Column, TableBuilder};

use crate::page::{Page, PageBody, Presentation, TableView, SUCCESS_MESSAGE};
use crate::state::AppState;
use crate::ui::plot;

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
            if ui.button("Reload").clicked() {
                state.request_view();
                ui.close_menu();
            }
            if ui.button("Clear cache").clicked() {
                state.clear_cache();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(state.request.source.to_string()).small());

        ui.separator();
        let request = &state.request;
        if state.loader.contains(&request.source, request.row_cap) {
            ui.label("cached");
        }
        ui.label(format!("{} dataset(s) in cache", state.loader.len()));

        if let Some(Page {
            body: PageBody::Loaded(p),
            ..
        }) = &state.page
        {
            ui.separator();
            ui.label(format!("{} rows loaded", p.dataset.len()));
        }
    });
}

// ---------------------------------------------------------------------------
// Page content (central panel)
// ---------------------------------------------------------------------------

/// Title, description, formula, then either the error or the data.
pub fn page_content(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let Some(page) = &state.page else {
                loading_indicator(ui);
                return;
            };

            page_header(ui, page);
            ui.separator();

            if state.loading() {
                loading_indicator(ui);
                return;
            }

            match &page.body {
                PageBody::Failed(msg) => {
                    ui.label(RichText::new(msg).color(Color32::RED));
                    ui.label(
                        RichText::new("Failed to load data. Please check the URL or network connection.")
                            .color(Color32::RED),
                    );
                }
                PageBody::Loaded(presentation) => {
                    ui.label(RichText::new(SUCCESS_MESSAGE).color(Color32::DARK_GREEN));
                    ui.label(
                        RichText::new(format!(
                            "{} rows from {}",
                            presentation.dataset.len(),
                            presentation.source
                        ))
                        .small(),
                    );
                    if presentation.dataset.is_empty() {
                        ui.label("The file has a header but no rows.");
                        return;
                    }
                    loaded_body(ui, presentation, state);
                }
            }
        });
}

fn page_header(ui: &mut Ui, page: &Page) {
    ui.heading(RichText::new(page.title).size(28.0).strong());
    ui.label(RichText::new(page.header).size(20.0));
    ui.add_space(4.0);
    ui.label(page.description);
    ui.add_space(4.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(page.formula).text_style(TextStyle::Monospace).size(18.0));
    });
}

fn loading_indicator(ui: &mut Ui) {
    ui.horizontal(|ui: &mut Ui| {
        ui.spinner();
        ui.label("Loading data...");
    });
}

fn loaded_body(ui: &mut Ui, presentation: &Presentation, state: &AppState) {
    ui.add_space(6.0);
    ui.heading("Raw data");
    raw_table(ui, &presentation.table);
    ui.add_space(8.0);

    // Histogram and time series side by side.
    ui.columns(2, |cols| {
        plot::histogram_plot(&mut cols[0], &presentation.histogram, &state.colors);
        plot::time_series_plot(&mut cols[1], &presentation.series, &state.colors);
    });

    if let Some(hourly) = &presentation.hourly {
        ui.add_space(8.0);
        plot::hourly_plot(ui, hourly, &state.colors);
    }
}

fn raw_table(ui: &mut Ui, table: &TableView) {
    let row_height = ui.text_style_height(&TextStyle::Body) + 4.0;

    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(260.0)
            .columns(Column::auto().at_least(70.0), table.headers.len())
            .header(row_height, |mut header| {
                for name in &table.headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, table.rows.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open soil moisture CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}
