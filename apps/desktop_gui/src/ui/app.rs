use std::time::Duration;

use arboard::Clipboard;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{self, Color32, RichText};
use shared::{domain::Department, protocol::InstructorRecord};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    code_input::SegmentedCodeInput,
    events::{context_label, err_label, UiError, UiEvent},
    orchestration::dispatch_backend_command,
    page::{PageController, PageView, SearchOutcome},
    submission::SubmissionOutcome,
};
use crate::ui::{
    theme,
    widgets::{new_code_input, show_code_cells, EguiCell},
};

const CARD_MAX_WIDTH: f32 = 560.0;
const PHOTO_SIZE: f32 = 96.0;
const PHOTO_MAX_EDGE: u32 = 256;
const TOOLTIP_WIDTH: f32 = 300.0;
const AUTHOR_URL: &str = "https://github.com/punyaphatsura";
const TAGLINE: &str =
    "This website is designed to solve the problem: 'Jarn Khon Nee Pen Krai Wa?' in Chula.";

const INFO_NOTE: &str = "This website contains Jarn's data, but it is not yet complete. \
If your abbreviation search is not found, please help us make the data more comprehensive \
by submitting the missing data. Currently, this platform supports only instructors (Jarn) \
from the Computer Engineering Department at Chulalongkorn University (CP CU). If I gather \
enough data from other departments, I will expand this website to support those departments \
as well.";

#[derive(Clone)]
pub struct PhotoImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_photo(bytes: &[u8]) -> Result<PhotoImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic.thumbnail(PHOTO_MAX_EDGE, PHOTO_MAX_EDGE).to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PhotoImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

pub fn not_found_message(abbreviation: &str) -> String {
    format!(
        "No Jarn found for the abbreviation \"{abbreviation}\" in my data. If you believe this \
abbreviation is correct and should be included, please help us expand our database by \
submitting the new data. Your contribution can help make this resource more comprehensive \
and accurate."
    )
}

enum PhotoState {
    Loading,
    Ready(egui::TextureHandle),
    Unavailable,
}

struct RecordPhoto {
    url: String,
    state: PhotoState,
}

enum FormAction {
    Submit,
    Leave,
}

pub struct JarnApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    page: PageController,
    code_input: SegmentedCodeInput<EguiCell>,
    photo: Option<RecordPhoto>,
    status: String,
    info_toggle_rect: Option<egui::Rect>,
    info_rect: Option<egui::Rect>,
}

impl JarnApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        ctx: &egui::Context,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            page: PageController::new(),
            code_input: new_code_input(ctx),
            photo: None,
            status: "Starting backend...".to_string(),
            info_toggle_rect: None,
            info_rect: None,
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::LookupFinished { code, result } => {
                    let result = result.map_err(|err| {
                        self.status = describe_error(&err);
                        err.message().to_string()
                    });
                    let succeeded = result.is_ok();
                    if self.page.finish_lookup(code, result) {
                        if succeeded {
                            self.status = format!("Looked up {code}");
                        }
                        self.request_photo();
                    }
                }
                UiEvent::SubmissionFinished(result) => {
                    let result = result.map_err(|err| {
                        self.status = describe_error(&err);
                        err.message().to_string()
                    });
                    if self.page.finish_submit(result) {
                        self.status = "Submission sent".to_string();
                    }
                }
                UiEvent::PhotoLoaded { url, image } => {
                    if let Some(photo) = self.photo.as_mut().filter(|photo| photo.url == url) {
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(
                            [image.width, image.height],
                            &image.rgba,
                        );
                        photo.state = PhotoState::Ready(ctx.load_texture(
                            format!("instructor_photo:{url}"),
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                UiEvent::PhotoFailed { url, error } => {
                    tracing::debug!(%url, "photo unavailable: {}", error.message());
                    if let Some(photo) = self.photo.as_mut().filter(|photo| photo.url == url) {
                        photo.state = PhotoState::Unavailable;
                    }
                }
                UiEvent::Error(err) => {
                    self.status = describe_error(&err);
                }
            }
        }
    }

    fn start_lookup(&mut self) {
        let Some(code) = self.page.begin_lookup() else {
            return;
        };
        self.photo = None;
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Lookup { code },
            &mut self.status,
        ) {
            self.page.finish_lookup(code, Err(self.status.clone()));
        }
    }

    /// Queues the photo of the record on screen, if it has one.
    fn request_photo(&mut self) {
        self.photo = None;
        let SearchOutcome::Found(record) = self.page.search() else {
            return;
        };
        let Some(url) = record.photo_url.clone() else {
            return;
        };

        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchPhoto { url: url.clone() },
            &mut self.status,
        );
        let state = if queued {
            PhotoState::Loading
        } else {
            PhotoState::Unavailable
        };
        self.photo = Some(RecordPhoto { url, state });
    }

    fn start_submit(&mut self) {
        let Some(request) = self.page.begin_submit() else {
            return;
        };
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SubmitRecord { request },
            &mut self.status,
        ) {
            self.page.finish_submit(Err(self.status.clone()));
        }
    }

    fn show_info_toggle(&mut self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            let toggle = ui
                .add(
                    egui::Button::new(RichText::new("ℹ").size(18.0).color(theme::TEXT_MUTED))
                        .frame(false),
                )
                .on_hover_text("Toggle information");
            if toggle.clicked() {
                self.page.toggle_info();
            }
            self.info_toggle_rect = Some(toggle.rect);
        });
    }

    fn show_search_view(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Jarn Nai").size(44.0).strong().color(theme::ACCENT));
            ui.label(RichText::new(TAGLINE).color(theme::TEXT_STRONG));
            ui.add_space(24.0);
            ui.label(
                RichText::new("Enter Jarn's Abbreviation")
                    .size(22.0)
                    .strong()
                    .color(theme::ACCENT),
            );
            ui.add_space(12.0);
        });

        let enter_pressed = show_code_cells(ui, &mut self.code_input, self.page.code_mut());
        ui.add_space(16.0);

        let loading = self.page.is_loading();
        let search_clicked = ui
            .vertical_centered_justified(|ui| {
                let label = if loading { "Loading..." } else { "Search" };
                let fill = if self.page.can_search() {
                    theme::ACCENT
                } else {
                    theme::CELL_BORDER
                };
                ui.add_enabled(
                    self.page.can_search(),
                    egui::Button::new(RichText::new(label).size(16.0).color(Color32::WHITE))
                        .fill(fill)
                        .corner_radius(12.0)
                        .min_size(egui::vec2(0.0, 44.0)),
                )
                .clicked()
            })
            .inner;
        if search_clicked || enter_pressed {
            self.start_lookup();
        }

        match self.page.search().clone() {
            SearchOutcome::NotFound(abbreviation) => self.show_not_found(ui, &abbreviation),
            SearchOutcome::Found(record) => self.show_record(ui, &record),
            SearchOutcome::Idle | SearchOutcome::Loading => {}
        }
    }

    fn show_not_found(&mut self, ui: &mut egui::Ui, abbreviation: &str) {
        ui.add_space(20.0);
        egui::Frame::NONE
            .fill(theme::NOT_FOUND_FILL)
            .stroke(egui::Stroke::new(1.0, theme::NOT_FOUND_BORDER))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new("⚠ Not Found")
                        .size(18.0)
                        .strong()
                        .color(theme::NOT_FOUND_TEXT),
                );
                ui.add_space(4.0);
                ui.label(
                    RichText::new(not_found_message(abbreviation)).color(theme::NOT_FOUND_TEXT),
                );
            });
        ui.add_space(12.0);

        let clicked = ui
            .vertical_centered_justified(|ui| {
                ui.add(
                    egui::Button::new(RichText::new("Submit the data").color(theme::ACCENT))
                        .fill(theme::CARD_FILL)
                        .stroke(egui::Stroke::new(2.0, theme::ACCENT))
                        .corner_radius(8.0)
                        .min_size(egui::vec2(0.0, 36.0)),
                )
                .clicked()
            })
            .inner;
        if clicked {
            self.page.open_submission();
        }
    }

    fn show_record(&mut self, ui: &mut egui::Ui, record: &InstructorRecord) {
        ui.add_space(20.0);
        egui::Frame::NONE
            .fill(theme::RESULT_FILL)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(16, 14))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    self.show_photo(ui, record);
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(&record.thai_name)
                                .size(22.0)
                                .strong()
                                .color(theme::ACCENT),
                        );
                        ui.label(RichText::new(&record.english_name).color(theme::ACCENT_SOFT));
                    });
                });
                ui.add_space(12.0);

                section_heading(ui, "Education:");
                for line in &record.education_lines {
                    ui.label(format!("- {line}"));
                }
                ui.add_space(8.0);

                ui.columns(2, |columns| {
                    section_heading(&mut columns[0], "Research Interest:");
                    for interest in &record.research_interests {
                        columns[0].label(format!("- {interest}"));
                    }
                    section_heading(&mut columns[1], "Room:");
                    columns[1].label(record.room.as_str());
                });
                ui.add_space(8.0);

                section_heading(ui, "Contact:");
                ui.horizontal_wrapped(|ui| {
                    ui.label("Email:");
                    ui.hyperlink_to(record.email.as_str(), format!("mailto:{}", record.email));
                    if ui.small_button("Copy").clicked() {
                        self.copy_to_clipboard(&record.email);
                    }
                });
                ui.horizontal_wrapped(|ui| {
                    ui.label("Website:");
                    ui.hyperlink_to(record.website.as_str(), &record.website);
                });

                if let Some(reference) = &record.reference_url {
                    ui.add_space(8.0);
                    section_heading(ui, "Reference:");
                    ui.hyperlink_to(reference.as_str(), reference);
                }
            });
    }

    fn show_photo(&self, ui: &mut egui::Ui, record: &InstructorRecord) {
        let Some(photo) = self.photo.as_ref() else {
            return;
        };
        let size = egui::vec2(PHOTO_SIZE, PHOTO_SIZE);
        match &photo.state {
            PhotoState::Ready(texture) => {
                ui.add(
                    egui::Image::new((texture.id(), size))
                        .corner_radius(PHOTO_SIZE / 2.0)
                        .maintain_aspect_ratio(false),
                )
                .on_hover_text(format!("Profile of {}", record.thai_name));
            }
            PhotoState::Loading => {
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.put(rect, egui::Spinner::new());
            }
            PhotoState::Unavailable => {}
        }
        ui.add_space(12.0);
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
            Ok(()) => self.status = "Email copied to clipboard".to_string(),
            Err(err) => {
                tracing::warn!("clipboard unavailable: {err}");
                self.status = format!("Could not copy email: {err}");
            }
        }
    }

    fn show_submission_view(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Submit New Data")
                    .size(24.0)
                    .strong()
                    .color(theme::ACCENT),
            );
        });
        ui.add_space(16.0);

        let Some(form) = self.page.form_mut() else {
            return;
        };
        let submitting = form.is_submitting();
        let mut action = None;

        if form.has_succeeded() {
            show_outcome(ui, form.outcome());
            ui.add_space(12.0);
            if ui.add_enabled(!submitting, egui::Button::new("Go back")).clicked() {
                action = Some(FormAction::Leave);
            }
        } else {
            ui.label(RichText::new("Abbreviation").strong());
            let mut abbreviation = form.abbreviation().to_string();
            ui.add_enabled(
                false,
                egui::TextEdit::singleline(&mut abbreviation).desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);

            ui.label(RichText::new("Full Name (Thai or English)").strong());
            ui.add_enabled(
                !submitting,
                egui::TextEdit::singleline(&mut form.full_name)
                    .hint_text("Enter first and last name")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);

            ui.label(RichText::new("Department").strong());
            ui.add_enabled_ui(!submitting, |ui| {
                egui::ComboBox::from_id_salt("department_select")
                    .selected_text(form.department.as_str())
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for department in Department::ALL {
                            ui.selectable_value(
                                &mut form.department,
                                department,
                                department.as_str(),
                            );
                        }
                    });
            });
            ui.add_space(12.0);

            show_outcome(ui, form.outcome());
            ui.add_space(8.0);

            ui.columns(2, |columns| {
                let button_size = egui::vec2(columns[0].available_width(), 36.0);
                if columns[0]
                    .add_enabled(!submitting, egui::Button::new("Cancel").min_size(button_size))
                    .clicked()
                {
                    action = Some(FormAction::Leave);
                }
                let label = if submitting { "Submitting..." } else { "Submit" };
                if columns[1]
                    .add_enabled(
                        !submitting,
                        egui::Button::new(RichText::new(label).color(Color32::WHITE))
                            .fill(theme::ACCENT_SOFT)
                            .min_size(button_size),
                    )
                    .clicked()
                {
                    action = Some(FormAction::Submit);
                }
            });
        }

        match action {
            Some(FormAction::Submit) => self.start_submit(),
            Some(FormAction::Leave) => {
                self.page.cancel_submission();
            }
            None => {}
        }
    }

    fn show_info_tooltip(&mut self, ctx: &egui::Context) {
        self.info_rect = None;
        if !self.page.info_visible() || self.page.view() != PageView::Searching {
            return;
        }
        let Some(toggle) = self.info_toggle_rect else {
            return;
        };

        let pos = egui::pos2(toggle.right() - TOOLTIP_WIDTH, toggle.bottom() + 4.0);
        let area = egui::Area::new(egui::Id::new("info_tooltip"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(theme::TOOLTIP_FILL)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::same(14))
                    .show(ui, |ui| {
                        ui.set_width(TOOLTIP_WIDTH - 28.0);
                        ui.vertical_centered(|ui| {
                            ui.label(
                                RichText::new("Note:")
                                    .small()
                                    .strong()
                                    .color(theme::TEXT_MUTED),
                            );
                            ui.label(RichText::new(INFO_NOTE).small().color(theme::TEXT_MUTED));
                        });
                    });
            });
        self.info_rect = Some(area.response.rect);
    }

    /// Any press outside the tooltip closes it. The toggle handles its own
    /// clicks, so presses on it are left alone.
    fn dismiss_info_on_outside_press(&mut self, ctx: &egui::Context) {
        if !self.page.info_visible() {
            return;
        }
        let press = ctx.input(|i| {
            if i.pointer.any_pressed() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });
        let Some(pos) = press else {
            return;
        };

        let on_toggle = self.info_toggle_rect.is_some_and(|rect| rect.contains(pos));
        let inside = self.info_rect.is_some_and(|rect| rect.contains(pos));
        if !on_toggle {
            self.page.pointer_pressed(inside);
        }
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Developed by:").small().strong().color(theme::TEXT_MUTED));
            ui.hyperlink_to(RichText::new("punyaphatsura").small(), AUTHOR_URL);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(&self.status).small().color(theme::TEXT_MUTED));
            });
        });
    }
}

fn describe_error(err: &UiError) -> String {
    format!(
        "{} error during {}: {}",
        err_label(err.category()),
        context_label(err.context()),
        err.message()
    )
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).strong().color(theme::TEXT_STRONG));
}

fn show_outcome(ui: &mut egui::Ui, outcome: &SubmissionOutcome) {
    let (message, fill, color) = match outcome {
        SubmissionOutcome::Succeeded(message) => {
            (message, theme::SUCCESS_FILL, theme::SUCCESS_TEXT)
        }
        SubmissionOutcome::Failed(message) => {
            (message, theme::NOT_FOUND_FILL, theme::NOT_FOUND_TEXT)
        }
        SubmissionOutcome::NotSubmitted | SubmissionOutcome::Submitting => return,
    };
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(message).color(color));
        });
}

impl eframe::App for JarnApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::NONE
                    .fill(theme::PAGE_BACKGROUND)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| self.show_footer(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(24.0);
                    ui.vertical_centered(|ui| {
                        ui.set_max_width(CARD_MAX_WIDTH);
                        egui::Frame::NONE
                            .fill(theme::CARD_FILL)
                            .stroke(egui::Stroke::new(1.0, theme::CARD_BORDER))
                            .corner_radius(12.0)
                            .inner_margin(egui::Margin::symmetric(24, 20))
                            .show(ui, |ui| {
                                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                                    self.show_info_toggle(ui);
                                    match self.page.view() {
                                        PageView::Searching => self.show_search_view(ui),
                                        PageView::AddingRecord => self.show_submission_view(ui),
                                    }
                                });
                            });
                    });
                    ui.add_space(24.0);
                });
        });

        self.show_info_tooltip(ctx);
        self.dismiss_info_on_outside_press(ctx);

        if self.page.is_loading()
            || matches!(self.photo.as_ref().map(|photo| &photo.state), Some(PhotoState::Loading))
        {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::controller::events::UiErrorContext;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([30, 64, 175, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn decodes_small_photo_without_resizing() {
        let photo = decode_photo(&encoded_png(4, 2)).expect("decode");
        assert_eq!((photo.width, photo.height), (4, 2));
        assert_eq!(photo.rgba.len(), 4 * 2 * 4);
        assert_eq!(&photo.rgba[..4], &[30, 64, 175, 255]);
    }

    #[test]
    fn shrinks_large_photo_to_thumbnail() {
        let photo = decode_photo(&encoded_png(1024, 512)).expect("decode");
        assert_eq!(photo.width, PHOTO_MAX_EDGE as usize);
        assert_eq!(photo.height, PHOTO_MAX_EDGE as usize / 2);
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        assert!(decode_photo(b"<html>not found</html>").is_err());
    }

    #[test]
    fn status_line_names_the_failed_operation() {
        let err = UiError::from_message(UiErrorContext::Lookup, "service returned status 503");
        assert_eq!(
            describe_error(&err),
            "Network error during lookup: service returned status 503"
        );

        let err = UiError::from_message(UiErrorContext::BackendStartup, "runtime failed");
        assert_eq!(describe_error(&err), "Unexpected error during startup: runtime failed");
    }

    #[test]
    fn not_found_message_quotes_the_abbreviation() {
        let message = not_found_message("XYZ");
        assert!(message.starts_with("No Jarn found for the abbreviation \"XYZ\""));
    }
}
