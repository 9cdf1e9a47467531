use eframe::egui;
use lookdev_app::DisplayerEvent;
use lookdev_core::{Layout, ViewCompositionIndex, ViewIndex};
use lookdev_scene::ObjectHandle;
use tracing_subscriber::filter::LevelFilter;

use super::{LibraryPayload, LookDevApp};

impl eframe::App for LookDevApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.pump_startup(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && self.session.is_open() {
            self.release_gpu_target(frame);
            self.session.dispatch(DisplayerEvent::Closed);
        }

        self.show_top_bar(ctx, frame);
        self.show_library_panel(ctx);
        if self.show_console {
            self.show_console_panel(ctx);
        }
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_composite(ui, frame));
    }
}

impl LookDevApp {
    fn show_top_bar(&mut self, ctx: &egui::Context, frame: &eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Load Config...").clicked() {
                        self.load_config_dialog();
                        ui.close();
                    }
                    if ui.button("Save Config...").clicked() {
                        self.save_config_dialog();
                        ui.close();
                    }
                    if ui.button("Reset Config").clicked() {
                        self.session.reset_config();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Export Composite...").clicked() {
                        self.export_composite_dialog();
                        ui.close();
                    }
                });

                ui.separator();
                ui.label("LookDev");
                ui.separator();

                let current = self.session.context().layout().view_layout;
                egui::ComboBox::from_id_salt("layout")
                    .selected_text(current.style_name())
                    .show_ui(ui, |ui| {
                        for layout in Layout::ALL {
                            if ui
                                .selectable_label(current == layout, layout.style_name())
                                .clicked()
                            {
                                self.session.dispatch(DisplayerEvent::LayoutChanged(layout));
                            }
                        }
                    });
                if self.session.context().layout().is_combined_view()
                    && ui.button("Reset Divider").clicked()
                {
                    self.session.reset_gizmo();
                }

                let mut show_environments = self.session.context().layout().show_environment_panel;
                if ui.checkbox(&mut show_environments, "Environments").changed() {
                    self.session.dispatch(DisplayerEvent::ToggleEnvironmentPanel);
                }
                ui.checkbox(&mut self.show_console, "Console");

                if !self.session.is_open() && ui.button("Open LookDev").clicked() {
                    self.release_gpu_target(frame);
                    self.open_look_dev(ctx);
                }
            });
        });
    }

    fn show_library_panel(&mut self, ctx: &egui::Context) {
        let show_environments = self.session.context().layout().show_environment_panel;
        egui::SidePanel::left("library")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Objects");
                let objects = self.library.objects.clone();
                for object in &objects {
                    self.library_row(ui, object, false);
                }
                if show_environments {
                    ui.separator();
                    ui.heading("Environments");
                    let environments = self.library.environments.clone();
                    for environment in &environments {
                        self.library_row(ui, environment, true);
                    }
                }
                ui.separator();
                for index in ViewIndex::ALL {
                    let view = self.session.context().view_content(index);
                    let object = view
                        .viewed_object_reference()
                        .map(|object| object.name.as_str())
                        .unwrap_or("-");
                    let environment = view
                        .environment_reference()
                        .map(|object| object.name.as_str())
                        .unwrap_or("-");
                    ui.label(format!("{index:?}: {object} / {environment}"));
                }
            });
    }

    fn library_row(&mut self, ui: &mut egui::Ui, object: &ObjectHandle, environment: bool) {
        ui.horizontal(|ui| {
            let payload = LibraryPayload {
                object: object.clone(),
                environment,
            };
            let id = egui::Id::new(("library", object.id));
            ui.dnd_drag_source(id, payload, |ui| {
                ui.label(&object.name);
            });
            for (label, index) in [
                ("1", ViewCompositionIndex::First),
                ("2", ViewCompositionIndex::Second),
            ] {
                if ui.small_button(label).clicked() {
                    self.drop_into_view(object.clone(), environment, index, glam::Vec2::ZERO);
                }
            }
        });
    }

    pub(super) fn drop_into_view(
        &mut self,
        object: ObjectHandle,
        environment: bool,
        index: ViewCompositionIndex,
        local_pos: glam::Vec2,
    ) {
        let object = Some(object);
        let event = if environment {
            DisplayerEvent::ChangingEnvironmentInView {
                object,
                index,
                local_pos,
            }
        } else {
            DisplayerEvent::ChangingObjectInView {
                object,
                index,
                local_pos,
            }
        };
        self.session.dispatch(event);
    }

    fn show_console_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("console")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let current = self.log_level.get();
                    egui::ComboBox::from_id_salt("log_level")
                        .selected_text(format!("{:?}", current))
                        .show_ui(ui, |ui| {
                            for level in [
                                LevelFilter::ERROR,
                                LevelFilter::WARN,
                                LevelFilter::INFO,
                                LevelFilter::DEBUG,
                                LevelFilter::TRACE,
                            ] {
                                if ui
                                    .selectable_label(current == level, format!("{:?}", level))
                                    .clicked()
                                {
                                    self.set_log_level(level);
                                }
                            }
                        });
                    if ui.button("Clear").clicked() {
                        self.console.clear();
                    }
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in self.console.snapshot() {
                            ui.monospace(line);
                        }
                    });
            });
    }
}
