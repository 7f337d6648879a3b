//! Custom widgets: the three-cell abbreviation input.

use eframe::egui;
use shared::domain::{Code, CODE_LEN};

use crate::controller::code_input::{CellHandle, CellKey, KeyDisposition, SegmentedCodeInput};
use crate::ui::theme;

const CELL_SIZE: egui::Vec2 = egui::vec2(76.0, 84.0);
const CELL_SPACING: f32 = 12.0;

/// Focusable egui cell backing one slot of the abbreviation input.
pub struct EguiCell {
    ctx: egui::Context,
    id: egui::Id,
    value: Option<char>,
}

impl EguiCell {
    pub fn new(ctx: egui::Context, index: usize) -> Self {
        Self {
            ctx,
            id: egui::Id::new(("abbreviation_cell", index)),
            value: None,
        }
    }

    pub fn id(&self) -> egui::Id {
        self.id
    }

    pub fn value(&self) -> Option<char> {
        self.value
    }

    fn has_focus(&self) -> bool {
        self.ctx.memory(|m| m.has_focus(self.id))
    }
}

impl CellHandle for EguiCell {
    fn focus(&mut self) {
        self.ctx.memory_mut(|m| m.request_focus(self.id));
    }

    fn blur(&mut self) {
        self.ctx.memory_mut(|m| m.surrender_focus(self.id));
    }

    fn set_value(&mut self, value: Option<char>) {
        self.value = value;
    }
}

pub fn new_code_input(ctx: &egui::Context) -> SegmentedCodeInput<EguiCell> {
    SegmentedCodeInput::new(std::array::from_fn(|index| EguiCell::new(ctx.clone(), index)))
}

enum CellInput {
    Key(CellKey, Option<egui::Key>),
    Submit,
}

fn focused_cell(input: &SegmentedCodeInput<EguiCell>) -> Option<usize> {
    input.cells().iter().position(EguiCell::has_focus)
}

fn collect_cell_inputs(ui: &egui::Ui) -> Vec<CellInput> {
    ui.input(|i| {
        let mut inputs = Vec::new();
        for event in &i.events {
            match event {
                egui::Event::Text(text) => {
                    inputs.extend(text.chars().map(|c| CellInput::Key(CellKey::Char(c), None)));
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if modifiers.is_none() => {
                    let cell_key = match key {
                        egui::Key::Enter => {
                            inputs.push(CellInput::Submit);
                            continue;
                        }
                        egui::Key::Backspace => CellKey::Backspace,
                        egui::Key::ArrowLeft => CellKey::ArrowLeft,
                        egui::Key::ArrowRight => CellKey::ArrowRight,
                        _ => CellKey::Other,
                    };
                    inputs.push(CellInput::Key(cell_key, Some(*key)));
                }
                _ => {}
            }
        }
        inputs
    })
}

/// Routes this frame's keyboard input to the focused cell. Returns true when
/// Enter was pressed inside the input.
fn handle_cell_keys(
    ui: &egui::Ui,
    input: &mut SegmentedCodeInput<EguiCell>,
    code: &mut Code,
) -> bool {
    let Some(mut index) = focused_cell(input) else {
        return false;
    };

    let mut submit_requested = false;
    for cell_input in collect_cell_inputs(ui) {
        match cell_input {
            CellInput::Submit => submit_requested = true,
            CellInput::Key(key, raw_key) => {
                let disposition = input.handle_key(index, key, code);
                if let (KeyDisposition::Handled, Some(raw_key)) = (disposition, raw_key) {
                    ui.ctx().input_mut(|i| i.consume_key(egui::Modifiers::NONE, raw_key));
                }
            }
        }
        match focused_cell(input) {
            Some(next) => index = next,
            None => break,
        }
    }
    submit_requested
}

/// Enter while nothing holds focus, e.g. right after the last letter released
/// it.
fn enter_without_focus(ui: &egui::Ui) -> bool {
    ui.memory(|m| m.focused().is_none()) && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

/// Draws the abbreviation cells and applies keystrokes to `code`.
/// Returns true when the user asked to search from the keyboard.
pub fn show_code_cells(
    ui: &mut egui::Ui,
    input: &mut SegmentedCodeInput<EguiCell>,
    code: &mut Code,
) -> bool {
    let submit_requested = handle_cell_keys(ui, input, code) || enter_without_focus(ui);
    input.sync(code);

    let total_width = CELL_SIZE.x * CODE_LEN as f32 + CELL_SPACING * (CODE_LEN - 1) as f32;
    ui.horizontal(|ui| {
        ui.add_space(((ui.available_width() - total_width) / 2.0).max(0.0));
        ui.spacing_mut().item_spacing.x = CELL_SPACING;

        for cell in input.cells() {
            let (rect, _) = ui.allocate_exact_size(CELL_SIZE, egui::Sense::hover());
            let response = ui.interact(rect, cell.id(), egui::Sense::click());
            if response.clicked() {
                response.request_focus();
            }

            let focused = response.has_focus();
            if focused {
                ui.memory_mut(|m| {
                    m.set_focus_lock_filter(
                        cell.id(),
                        egui::EventFilter {
                            tab: false,
                            horizontal_arrows: true,
                            vertical_arrows: false,
                            escape: false,
                        },
                    )
                });
            }

            let painter = ui.painter();
            painter.rect_filled(rect, 8.0, theme::CELL_FILL);
            let underline = if focused {
                theme::ACCENT
            } else {
                theme::CELL_BORDER
            };
            painter.line_segment(
                [rect.left_bottom(), rect.right_bottom()],
                egui::Stroke::new(2.5, underline),
            );
            if let Some(letter) = cell.value() {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    letter,
                    egui::FontId::proportional(48.0),
                    theme::TEXT_STRONG,
                );
            }
        }
    });

    submit_requested
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn run_frame(
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        input: &mut SegmentedCodeInput<EguiCell>,
        code: &mut Code,
    ) -> bool {
        let mut submitted = false;
        let _ = ctx.run(
            egui::RawInput {
                events,
                ..Default::default()
            },
            |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    submitted |= show_code_cells(ui, input, code);
                });
            },
        );
        submitted
    }

    #[test]
    fn typing_fills_cells_and_enter_after_last_letter_searches() {
        let ctx = egui::Context::default();
        let mut input = new_code_input(&ctx);
        let mut code = Code::new();

        assert!(!run_frame(&ctx, Vec::new(), &mut input, &mut code));
        let first = input.cells()[0].id();
        ctx.memory_mut(|m| m.request_focus(first));
        assert!(!run_frame(
            &ctx,
            vec![egui::Event::Text("abc".to_string())],
            &mut input,
            &mut code
        ));
        assert_eq!(code.as_string(), "ABC");
        assert!(ctx.memory(|m| m.focused().is_none()));

        assert!(run_frame(
            &ctx,
            vec![key_event(egui::Key::Enter)],
            &mut input,
            &mut code
        ));
    }

    #[test]
    fn enter_with_nothing_focused_requests_search() {
        let ctx = egui::Context::default();
        let mut input = new_code_input(&ctx);
        let mut code = Code::parse("XYZ").expect("code");

        assert!(run_frame(
            &ctx,
            vec![key_event(egui::Key::Enter)],
            &mut input,
            &mut code
        ));
        assert_eq!(input.cells()[2].value(), Some('Z'));
    }
}
