//! Segmented abbreviation input: per-cell key handling and focus movement.
//!
//! The control does not own the code. Every keystroke mutates the caller's
//! [`Code`] directly; the cells only mirror it for display.

use shared::domain::{normalize_letter, Code, CODE_LEN};

const LAST_CELL: usize = CODE_LEN - 1;

/// One focusable input cell as seen by the control.
pub trait CellHandle {
    fn focus(&mut self);
    fn blur(&mut self);
    fn set_value(&mut self, value: Option<char>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKey {
    Char(char),
    Backspace,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Whether the key's default action should be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Handled,
    Ignored,
}

pub struct SegmentedCodeInput<H: CellHandle> {
    cells: [H; CODE_LEN],
}

impl<H: CellHandle> SegmentedCodeInput<H> {
    pub fn new(cells: [H; CODE_LEN]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[H; CODE_LEN] {
        &self.cells
    }

    /// Copies `code` into the display mirrors.
    pub fn sync(&mut self, code: &Code) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.set_value(code.cell(index));
        }
    }

    pub fn handle_key(&mut self, index: usize, key: CellKey, code: &mut Code) -> KeyDisposition {
        if index > LAST_CELL {
            return KeyDisposition::Ignored;
        }

        match key {
            CellKey::Char(c) => {
                let Some(letter) = normalize_letter(c) else {
                    return KeyDisposition::Ignored;
                };
                if code.set(index, letter).is_err() {
                    return KeyDisposition::Ignored;
                }
                self.cells[index].set_value(Some(letter));

                if index == LAST_CELL && code.is_complete() {
                    self.cells[index].blur();
                } else {
                    self.cells[(index + 1).min(LAST_CELL)].focus();
                }
                KeyDisposition::Handled
            }
            CellKey::Backspace => {
                if code.cell(index).is_some() {
                    code.clear(index);
                    self.cells[index].set_value(None);
                } else if index > 0 {
                    code.clear(index - 1);
                    self.cells[index - 1].set_value(None);
                    self.cells[index - 1].focus();
                }
                KeyDisposition::Handled
            }
            CellKey::ArrowLeft if index > 0 => {
                self.cells[index - 1].focus();
                KeyDisposition::Handled
            }
            CellKey::ArrowRight if index < LAST_CELL => {
                self.cells[index + 1].focus();
                KeyDisposition::Handled
            }
            CellKey::ArrowLeft | CellKey::ArrowRight | CellKey::Other => KeyDisposition::Ignored,
        }
    }
}
