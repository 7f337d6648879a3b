//! "Submit new data" form shown after a not-found lookup.

use shared::{domain::Department, protocol::RecordRequest};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Submission successful! I will review your data ASAP.";
pub const SUBMIT_FAILURE_MESSAGE: &str = "An error occurred. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    NotSubmitted,
    Submitting,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SubmissionForm {
    abbreviation: String,
    pub full_name: String,
    pub department: Department,
    outcome: SubmissionOutcome,
}

impl SubmissionForm {
    pub fn new(abbreviation: &str) -> Self {
        Self {
            abbreviation: abbreviation.to_ascii_uppercase(),
            full_name: String::new(),
            department: Department::default(),
            outcome: SubmissionOutcome::NotSubmitted,
        }
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }

    pub fn is_submitting(&self) -> bool {
        self.outcome == SubmissionOutcome::Submitting
    }

    pub fn has_succeeded(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Succeeded(_))
    }

    /// Validates the fields and, when they pass, marks the form in flight and
    /// returns the request to send. Returns `None` while a submission is
    /// already in flight or when validation fails.
    pub fn begin_submit(&mut self) -> Option<RecordRequest> {
        if self.is_submitting() {
            return None;
        }

        match RecordRequest::new(&self.abbreviation, &self.full_name, self.department) {
            Ok(request) => {
                self.outcome = SubmissionOutcome::Submitting;
                Some(request)
            }
            Err(err) => {
                self.outcome = SubmissionOutcome::Failed(err.to_string());
                None
            }
        }
    }

    /// Applies the service's answer. Returns true on success, which is the
    /// signal to run the page's completion callback.
    pub fn finish_submit(&mut self, result: Result<(), String>) -> bool {
        if !self.is_submitting() {
            return false;
        }

        match result {
            Ok(()) => {
                self.full_name.clear();
                self.department = Department::default();
                self.outcome = SubmissionOutcome::Succeeded(SUBMIT_SUCCESS_MESSAGE.to_string());
                true
            }
            Err(err) => {
                tracing::warn!(abbreviation = %self.abbreviation, "submission failed: {err}");
                self.outcome = SubmissionOutcome::Failed(SUBMIT_FAILURE_MESSAGE.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_uppercases_abbreviation_and_defaults_department() {
        let form = SubmissionForm::new("xyz");
        assert_eq!(form.abbreviation(), "XYZ");
        assert_eq!(form.full_name, "");
        assert_eq!(form.department, Department::Computer);
        assert_eq!(form.outcome(), &SubmissionOutcome::NotSubmitted);
    }

    #[test]
    fn blank_name_fails_validation_without_request() {
        let mut form = SubmissionForm::new("XYZ");
        form.full_name = "   ".to_string();

        assert_eq!(form.begin_submit(), None);
        assert_eq!(
            form.outcome(),
            &SubmissionOutcome::Failed("Please fill in all fields".to_string())
        );
    }

    #[test]
    fn second_submit_while_in_flight_is_a_no_op() {
        let mut form = SubmissionForm::new("XYZ");
        form.full_name = "Somchai".to_string();

        let request = form.begin_submit().expect("first submit");
        assert_eq!(request.name, "Somchai");
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit(), None);
        assert!(form.is_submitting());
    }

    #[test]
    fn success_resets_fields_to_defaults() {
        let mut form = SubmissionForm::new("XYZ");
        form.full_name = "Somchai".to_string();
        form.department = Department::Nuclear;
        form.begin_submit().expect("submit");

        assert!(form.finish_submit(Ok(())));
        assert_eq!(form.full_name, "");
        assert_eq!(form.department, Department::Computer);
        assert_eq!(
            form.outcome(),
            &SubmissionOutcome::Succeeded(SUBMIT_SUCCESS_MESSAGE.to_string())
        );
    }

    #[test]
    fn failure_keeps_fields_and_allows_resubmit() {
        let mut form = SubmissionForm::new("XYZ");
        form.full_name = "Somchai".to_string();
        form.begin_submit().expect("submit");

        assert!(!form.finish_submit(Err("service returned status 500".to_string())));
        assert_eq!(form.full_name, "Somchai");
        assert_eq!(
            form.outcome(),
            &SubmissionOutcome::Failed(SUBMIT_FAILURE_MESSAGE.to_string())
        );
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn late_result_without_submission_is_ignored() {
        let mut form = SubmissionForm::new("XYZ");
        assert!(!form.finish_submit(Ok(())));
        assert_eq!(form.outcome(), &SubmissionOutcome::NotSubmitted);
    }
}
