//! Backend commands queued from UI to backend worker.

use shared::{domain::Code, protocol::RecordRequest};

pub enum BackendCommand {
    Lookup { code: Code },
    SubmitRecord { request: RecordRequest },
    FetchPhoto { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Lookup { .. } => "lookup",
            BackendCommand::SubmitRecord { .. } => "submit_record",
            BackendCommand::FetchPhoto { .. } => "fetch_photo",
        }
    }
}
