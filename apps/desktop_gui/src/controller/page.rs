//! Page-level state machine: search view, not-found handling, and the
//! record submission view.

use client_core::LookupOutcome;
use shared::{
    domain::Code,
    protocol::{InstructorRecord, RecordRequest},
};

use crate::controller::submission::SubmissionForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    Searching,
    AddingRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Idle,
    Loading,
    Found(InstructorRecord),
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct PageController {
    code: Code,
    search: SearchOutcome,
    last_search: String,
    view: PageView,
    form: Option<SubmissionForm>,
    info_visible: bool,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

impl PageController {
    pub fn new() -> Self {
        Self {
            code: Code::new(),
            search: SearchOutcome::Idle,
            last_search: String::new(),
            view: PageView::Searching,
            form: None,
            info_visible: false,
        }
    }

    #[cfg(test)]
    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn code_mut(&mut self) -> &mut Code {
        &mut self.code
    }

    pub fn search(&self) -> &SearchOutcome {
        &self.search
    }

    #[cfg(test)]
    pub fn last_search(&self) -> &str {
        &self.last_search
    }

    pub fn view(&self) -> PageView {
        self.view
    }

    #[cfg(test)]
    pub fn form(&self) -> Option<&SubmissionForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SubmissionForm> {
        self.form.as_mut()
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub fn is_loading(&self) -> bool {
        self.search == SearchOutcome::Loading
    }

    /// Search affordance: three letters entered and no lookup in flight.
    pub fn can_search(&self) -> bool {
        self.code.is_complete() && !self.is_loading()
    }

    /// Starts a lookup for the current code, returning the code to query.
    pub fn begin_lookup(&mut self) -> Option<Code> {
        if !self.can_search() {
            return None;
        }
        self.last_search = self.code.as_string();
        self.search = SearchOutcome::Loading;
        Some(self.code)
    }

    /// Applies a lookup result. Results that do not answer the pending lookup
    /// are dropped; the return value says whether this one was applied.
    pub fn finish_lookup(&mut self, code: Code, result: Result<LookupOutcome, String>) -> bool {
        if !self.is_loading() || code.as_string() != self.last_search {
            tracing::debug!(code = %code, "dropping stale lookup result");
            return false;
        }

        self.search = match result {
            Ok(LookupOutcome::Found(record)) => SearchOutcome::Found(record),
            Ok(LookupOutcome::NotFound(code)) => SearchOutcome::NotFound(code.as_string()),
            Err(err) => {
                tracing::warn!(code = %code, "lookup failed, showing empty result: {err}");
                SearchOutcome::Idle
            }
        };
        true
    }

    pub fn can_open_submission(&self) -> bool {
        self.view == PageView::Searching && matches!(self.search, SearchOutcome::NotFound(_))
    }

    pub fn open_submission(&mut self) -> bool {
        if !self.can_open_submission() {
            return false;
        }
        self.form = Some(SubmissionForm::new(&self.last_search));
        self.view = PageView::AddingRecord;
        true
    }

    /// Leaves the submission view. Disabled while a submission is in flight.
    pub fn cancel_submission(&mut self) -> bool {
        if self.view != PageView::AddingRecord
            || self.form.as_ref().is_some_and(SubmissionForm::is_submitting)
        {
            return false;
        }
        self.form = None;
        self.view = PageView::Searching;
        true
    }

    pub fn begin_submit(&mut self) -> Option<RecordRequest> {
        if self.view != PageView::AddingRecord {
            return None;
        }
        self.form.as_mut()?.begin_submit()
    }

    /// Applies the submission result; success runs the completion step but
    /// leaves the confirmation on screen.
    pub fn finish_submit(&mut self, result: Result<(), String>) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        let succeeded = form.finish_submit(result);
        if succeeded {
            self.on_submission_complete();
        }
        succeeded
    }

    fn on_submission_complete(&mut self) {
        self.last_search.clear();
        self.search = SearchOutcome::Idle;
        self.code.reset();
    }

    pub fn toggle_info(&mut self) {
        self.info_visible = !self.info_visible;
    }

    /// Pointer press somewhere in the window; anything outside the tooltip
    /// dismisses it.
    pub fn pointer_pressed(&mut self, inside_info: bool) {
        if self.info_visible && !inside_info {
            self.info_visible = false;
        }
    }
}
