//! UI panels for the application
//!
//! The sidebar holds the grade layer switches, city and base map selection
//! and loading statistics. A small window shows the tags of the highlighted
//! footway.

use crate::app::state::{AppState, City, TilesProvider};
use egui::{Color32, RichText, Ui};
use footway_lib::{Grade, Style, WayProps};

/// Swatch color of a grade layer
fn grade_color(grade: Grade) -> Color32 {
    let footway_lib::Rgb(r, g, b) = Style::for_grade(grade).color;
    Color32::from_rgb(r, g, b)
}

/// Menu button in the top-right corner of the map, opens and closes the sidebar
pub fn sidebar_button(ui: &mut Ui, state: &mut AppState) -> egui::Response {
    const SIZE: f32 = 36.0;
    const INSET: f32 = 12.0;

    let corner = ui.max_rect().right_top() + egui::vec2(-SIZE - INSET, INSET);
    let area = egui::Rect::from_min_size(corner, egui::vec2(SIZE, SIZE));

    let open = &mut state.ui_settings.sidebar_open;
    let glyph = RichText::new(if *open { "✕" } else { "☰" }).size(18.0);
    let button = egui::Button::new(glyph)
        .corner_radius(egui::CornerRadius::same(6))
        .min_size(area.size());
    let response = ui.put(area, button).on_hover_text("Layers and statistics");
    if response.clicked() {
        *open = !*open;
    }
    response
}

/// Render the sidebar (right side on landscape, bottom on portrait)
pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    if !state.ui_settings.sidebar_open {
        return;
    }

    let screen_size = ctx.viewport_rect().size();
    if screen_size.y > screen_size.x {
        egui::TopBottomPanel::bottom("main_sidebar")
            .default_height(280.0)
            .min_height(180.0)
            .max_height(ctx.viewport_rect().height() * 0.6)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    } else {
        egui::SidePanel::right("main_sidebar")
            .default_width(280.0)
            .min_width(240.0)
            .max_width(420.0)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    }
}

fn render_sidebar_content(ui: &mut Ui, state: &mut AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            render_grades_section(ui, state);
            section_gap(ui);
            render_navigation_section(ui, state);
            section_gap(ui);
            render_stats_section(ui, state);
        });
}

fn section_gap(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.separator();
    ui.add_space(6.0);
}

/// Layer switches, one per grade
fn render_grades_section(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("🚶 Footways").strong());
    ui.add_space(6.0);

    egui::Grid::new("grades_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for grade in Grade::ALL {
                let label = RichText::new(format!("■ {}", grade.label())).color(grade_color(grade));
                ui.checkbox(state.ui_settings.visibility.flag_mut(grade), label);
                ui.label(RichText::new(state.stats.drawn(grade).to_string()).weak());
                ui.end_row();
            }
        });

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Line Width:");
        ui.add(
            egui::Slider::new(&mut state.ui_settings.line_width, 1.0..=10.0)
                .suffix(" px")
                .step_by(0.5),
        );
    });
}

/// City jump and base map selection
fn render_navigation_section(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("🗺 Map").strong());
    ui.add_space(6.0);

    egui::ComboBox::from_label("City")
        .selected_text("Go to...")
        .show_ui(ui, |ui| {
            for city in City::ALL {
                if ui.selectable_label(false, city.name()).clicked() {
                    state.pending_city = Some(city);
                }
            }
        });

    ui.add_space(6.0);
    for provider in TilesProvider::all() {
        let selected = state.ui_settings.tiles_provider == *provider;
        if ui.selectable_label(selected, provider.name()).clicked() {
            state.ui_settings.tiles_provider = *provider;
        }
    }
}

fn render_stats_section(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("📊 Statistics").strong());
    ui.add_space(4.0);

    let stats = &state.stats;
    egui::Grid::new("stats_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Zoom:");
            ui.label(RichText::new(format!("{:.1}", stats.zoom)).strong());
            ui.end_row();

            ui.label("Cached:");
            ui.label(RichText::new(stats.cached_segments.to_string()).strong());
            ui.end_row();

            ui.label("Requests:");
            ui.label(RichText::new(format!("{} ({} pending)", stats.cycles, stats.in_flight)).strong());
            ui.end_row();

            if let Some(summary) = stats.last_summary {
                ui.label("Last Load:");
                ui.label(format!(
                    "+{} new, {} known, {} evicted",
                    summary.added, summary.already_drawn, summary.evicted
                ));
                ui.end_row();
            }
        });

    if let Some(error) = &stats.last_error {
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("⚠ {error}"))
                .small()
                .color(Color32::RED),
        );
    }

    ui.add_space(6.0);
    if ui.button("🔄 Reload").clicked() {
        state.pending_reload = true;
    }
}

/// Tags of the highlighted footway
pub fn way_info_window(ctx: &egui::Context, props: &WayProps) {
    egui::Window::new("Footway")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("way_info_grid")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Difficulty:");
                    ui.label(
                        RichText::new(props.grade.label())
                            .strong()
                            .color(grade_color(props.grade)),
                    );
                    ui.end_row();

                    for (name, value) in [
                        ("Surface:", &props.surface),
                        ("Smoothness:", &props.smoothness),
                        ("Incline:", &props.incline),
                    ] {
                        ui.label(name);
                        ui.label(value.as_deref().unwrap_or("-"));
                        ui.end_row();
                    }

                    if props.steep {
                        ui.label("");
                        ui.label(RichText::new("⛰ steep").color(ui.visuals().warn_fg_color));
                        ui.end_row();
                    }
                });
        });
}
