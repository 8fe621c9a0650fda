use super::{CapturePlatform, FormPhase, Tab};
use crate::customer::{CustomerInputMode, CUSTOMER_NAMES};
use crate::result::ExtractedJson;
use crate::upload::SUPPORTED_EXTENSIONS;
use crate::utils::{file_size, json_tree};
use eframe::egui::{self, Color32, RichText};
use log::{info, warn};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
const WARNING: Color32 = Color32::from_rgb(220, 160, 0);

impl CapturePlatform {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Capture Platform – Data Extraction (JSON)");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::ProcessFiles, "🧠 Process Files");
                ui.selectable_value(&mut self.tab, Tab::Instructions, "🖥 Instructions");
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.tab {
                    Tab::ProcessFiles => self.render_process_tab(ui),
                    Tab::Instructions => render_instructions(ui),
                });
        });
    }

    fn render_process_tab(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.heading("🧠 Process Files - Capture Platform (Unified Model)");
        ui.add_space(10.0);

        self.render_customer_input(ui);
        ui.add_space(15.0);
        self.render_file_input(ui);
        ui.add_space(15.0);
        self.render_submit(ui);

        if self.state.result().is_some() {
            ui.add_space(10.0);
            ui.separator();
            self.render_result(ui);
        }
        ui.add_space(20.0);
    }

    fn render_customer_input(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Choose Customer Name Input Method").strong());
            let mut mode = self.customer.mode;
            ui.horizontal(|ui| {
                for option in [CustomerInputMode::Dropdown, CustomerInputMode::FreeText] {
                    ui.radio_value(&mut mode, option, option.label());
                }
            });
            if mode != self.customer.mode {
                let value = match mode {
                    CustomerInputMode::Dropdown => self.customer.dropdown.clone(),
                    CustomerInputMode::FreeText => self.customer.free_text.clone(),
                };
                self.select_customer(mode, &value);
            }

            ui.add_space(8.0);
            match self.customer.mode {
                CustomerInputMode::Dropdown => {
                    let mut selected = self.customer.dropdown.clone();
                    egui::ComboBox::from_label("Select Customer Name")
                        .selected_text(selected.as_str())
                        .show_ui(ui, |ui| {
                            for name in CUSTOMER_NAMES {
                                ui.selectable_value(&mut selected, name.to_string(), name);
                            }
                        })
                        .response
                        .on_hover_text(format!(
                            "Choose a customer name from the predefined list: {}",
                            CUSTOMER_NAMES.join(", ")
                        ));
                    if selected != self.customer.dropdown {
                        self.select_customer(CustomerInputMode::Dropdown, &selected);
                    }
                }
                CustomerInputMode::FreeText => {
                    let mut text = self.customer.free_text.clone();
                    ui.horizontal(|ui| {
                        ui.label("Enter Customer Name");
                        ui.text_edit_singleline(&mut text).on_hover_text(
                            "The backend loads the extraction schema from 'schemas/{customer_name}.json'.",
                        );
                    });
                    if text != self.customer.free_text {
                        self.select_customer(CustomerInputMode::FreeText, &text);
                    }
                }
            }

            ui.add_space(6.0);
            match self.customer.inline_error() {
                Some(error) => {
                    ui.colored_label(ERROR, format!("🚨 {}", error));
                }
                None => {
                    ui.label(format!(
                        "ℹ The Model Prompt and Example Schema are loaded by the backend based on the Customer Name: {}",
                        self.customer.current()
                    ));
                }
            }
        });
    }

    fn render_file_input(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Upload a file (PDF or Image)").strong());
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let picking_allowed = !self.state.is_submitting();
                if ui
                    .add_enabled(picking_allowed, egui::Button::new("📁 Select File"))
                    .clicked()
                {
                    if let Some(path) = FileDialog::new()
                        .add_filter("PDF or Image", &SUPPORTED_EXTENSIONS)
                        .pick_file()
                    {
                        self.attach_path(&path);
                    }
                }
                match &self.attached {
                    Some(file) => {
                        ui.label(format!(
                            "Selected: {} ({})",
                            file.name,
                            file_size::human_size(file.size())
                        ));
                    }
                    None => {
                        ui.label(
                            RichText::new("…or drop a file onto this window")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    }
                }
            });

            if let Some(error) = &self.attach_error {
                ui.colored_label(ERROR, format!("🚨 {}", error));
            }
        });
    }

    fn render_submit(&mut self, ui: &mut egui::Ui) {
        let can_submit = !self.state.is_submitting() && self.customer.inline_error().is_none();
        ui.add_enabled_ui(can_submit, |ui| {
            let button = egui::Button::new("📤 Submit").min_size(egui::vec2(160.0, 36.0));
            if ui.add(button).clicked() {
                self.submit();
            }
        });

        ui.add_space(8.0);
        match &self.state.phase {
            FormPhase::Idle => {}
            FormPhase::Submitting {
                customer_name,
                started,
                ..
            } => {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(format!(
                        "Processing file for '{}'... ({:.1}s)",
                        customer_name,
                        started.elapsed().as_secs_f32()
                    ));
                });
            }
            FormPhase::Success(message) => {
                ui.colored_label(SUCCESS, format!("✅ {}", message));
            }
            FormPhase::Error(error) => {
                let icon = if error.is_validation() { "🚨" } else { "❌" };
                ui.colored_label(ERROR, format!("{} {}", icon, error));
            }
        }
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        let Some(result) = self.state.result() else {
            return;
        };
        let (file_name, customer_name) = match self.state.result_origin() {
            Some(origin) => (Some(origin.file_name.as_str()), origin.customer_name.as_str()),
            None => (None, self.customer.current()),
        };
        let view = result.view(file_name, customer_name);
        let mut pending_save: Option<ExtractedJson> = None;

        match &view.extracted {
            Some(extracted) => {
                ui.heading("📄 Extracted JSON");
                ui.add_space(6.0);
                let mut text = extracted.pretty.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("📥 Download Extracted JSON").clicked() {
                        pending_save = Some(extracted.clone());
                    }
                    match &self.state.download {
                        Some(Ok(path)) => {
                            ui.colored_label(SUCCESS, format!("Saved to {}", path.display()));
                            if ui.link(RichText::new("Open").color(ACCENT)).clicked() {
                                if let Err(e) = open::that(path) {
                                    warn!("Failed to open {}: {}", path.display(), e);
                                }
                            }
                        }
                        Some(Err(error)) => {
                            ui.colored_label(ERROR, error.to_string());
                        }
                        None => {}
                    }
                });
            }
            None => {
                ui.colored_label(
                    WARNING,
                    "⚠ Extracted JSON output not found in the response.",
                );
            }
        }

        ui.add_space(12.0);
        ui.heading("📄 Processed Document : Summary");
        ui.add_space(6.0);
        json_tree::show(ui, "processing_result", view.raw);

        if let Some(extracted) = pending_save {
            self.save_download(&extracted);
        }
    }

    fn save_download(&mut self, extracted: &ExtractedJson) {
        let Some(path) = FileDialog::new()
            .set_file_name(&extracted.download_name)
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            info!("Download cancelled");
            return;
        };

        self.state.download = Some(extracted.save_to(&path).map(|_| path));
    }
}

fn render_instructions(ui: &mut egui::Ui) {
    ui.add_space(10.0);
    ui.heading("📘 How to Use Capture Platform (Unified Model)");
    ui.add_space(10.0);

    ui.label(RichText::new("🧠 Process Files").strong());
    for step in [
        "1. Go to the Process Files tab",
        "2. Select or enter a Customer Name",
        "3. Upload a PDF or Image",
        "4. Click Submit",
        "5. Extracted JSON will be displayed and available for download",
    ] {
        ui.label(step);
    }

    ui.add_space(10.0);
    ui.label(RichText::new("⚙ Backend Logic").strong());
    ui.label("The backend loads the extraction schema based on:");
    ui.code("schemas/{customer_name}.json");
    ui.label("Unified pipeline: OCR → LLM → Structured JSON");

    ui.add_space(10.0);
    ui.label(RichText::new("📌 Notes").strong());
    ui.label("• No database is used");
    ui.label("• Output lives in memory for this session only");
    ui.label("• Closing the application resets results");
}
