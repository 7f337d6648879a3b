use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::Department, error::ValidationError};

const EDUCATION_SEPARATOR: &str = "\n";
const INTEREST_SEPARATOR: &str = "; ";

/// Record body of `GET /ajarn/abbre/{CODE}` as the service sends it.
///
/// Only the two names decide whether a record is present; the remaining
/// fields may be missing or `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorRecordWire {
    pub thname: String,
    pub enname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "refUrl", default, skip_serializing_if = "Option::is_none")]
    pub ref_url: Option<String>,
    #[serde(rename = "imgSrc", default, skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorRecord {
    pub thai_name: String,
    pub english_name: String,
    pub education_lines: Vec<String>,
    pub research_interests: Vec<String>,
    pub room: String,
    pub email: String,
    pub website: String,
    pub reference_url: Option<String>,
    pub photo_url: Option<String>,
}

impl From<InstructorRecordWire> for InstructorRecord {
    fn from(wire: InstructorRecordWire) -> Self {
        Self {
            thai_name: wire.thname,
            english_name: wire.enname,
            education_lines: split_list(wire.education.as_deref(), EDUCATION_SEPARATOR),
            research_interests: split_list(wire.interested.as_deref(), INTEREST_SEPARATOR),
            room: wire.room.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            website: wire.website.unwrap_or_default(),
            reference_url: non_empty(wire.ref_url),
            photo_url: non_empty(wire.img_src),
        }
    }
}

fn split_list(raw: Option<&str>, separator: &str) -> Vec<String> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };
    raw.split(separator).map(str::to_string).collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// What a successfully decoded lookup body says about the queried code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupBody {
    Record(InstructorRecord),
    NotFound,
}

/// Classifies a lookup body. An embedded `status: 404`, a null body, or an
/// object without a record all mean "not found".
pub fn classify_lookup_body(body: Value) -> LookupBody {
    if body_signals_not_found(&body) {
        return LookupBody::NotFound;
    }
    match serde_json::from_value::<InstructorRecordWire>(body) {
        Ok(wire) => LookupBody::Record(wire.into()),
        Err(_) => LookupBody::NotFound,
    }
}

fn body_signals_not_found(body: &Value) -> bool {
    match body.get("status") {
        Some(Value::Number(n)) => n.as_u64() == Some(404),
        Some(Value::String(s)) => s.trim() == "404",
        _ => false,
    }
}

/// Body of `POST /ajarn/abbre/request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    pub abbreviation: String,
    pub name: String,
    pub department: Department,
}

impl RecordRequest {
    /// Trims every field and rejects the request when any of them is blank.
    pub fn new(
        abbreviation: &str,
        name: &str,
        department: Department,
    ) -> Result<Self, ValidationError> {
        let abbreviation = abbreviation.trim();
        if abbreviation.is_empty() {
            return Err(ValidationError::missing("abbreviation"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::missing("name"));
        }
        if department.as_str().trim().is_empty() {
            return Err(ValidationError::missing("department"));
        }

        Ok(Self {
            abbreviation: abbreviation.to_ascii_uppercase(),
            name: name.to_string(),
            department,
        })
    }
}
