//! document.rs - The content document and its merge and validation rules.
//!
//! A `ContentDocument` is a JSON object keyed by section (`intro`, `services`,
//! `about`, `contact`, optionally `vacation` and `modals`). Each section maps
//! field names to strings, lists of strings, or lists of objects.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::ContentError;
use crate::validators;

/// Sections every document is expected to carry.
pub const REQUIRED_SECTIONS: [&str; 4] = ["intro", "services", "about", "contact"];

/// How an update is folded into the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Per section: fields present in the update overwrite the current fields,
    /// absent fields are kept. A section that is not an object on either side
    /// is replaced wholesale. Sections absent from the update are kept.
    #[default]
    SectionShallow,
    /// The update becomes the whole document.
    Replace,
}

/// The root content record, keyed by section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument(Map<String, Value>);

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ContentDocument {
    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ContentError::NotAnObject(kind(&other))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.0.get(name).and_then(Value::as_object)
    }

    pub fn field(&self, section: &str, field: &str) -> Option<&Value> {
        self.section(section).and_then(|s| s.get(field))
    }

    /// Required sections missing from this document.
    pub fn missing_sections(&self) -> Vec<&'static str> {
        REQUIRED_SECTIONS
            .iter()
            .copied()
            .filter(|name| self.section(name).is_none())
            .collect()
    }

    /// Pretty JSON with two-space indentation, as written to disk.
    pub fn to_pretty_json(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Folds `update` into this document according to `strategy`.
    pub fn apply(&mut self, update: ContentDocument, strategy: MergeStrategy) {
        match strategy {
            MergeStrategy::Replace => *self = update,
            MergeStrategy::SectionShallow => {
                for (section, incoming) in update.0 {
                    match (self.0.get_mut(&section), incoming) {
                        (Some(Value::Object(current)), Value::Object(fields)) => {
                            debug!("Merging {} field(s) into section '{}'.", fields.len(), section);
                            for (field, value) in fields {
                                current.insert(field, value);
                            }
                        }
                        (_, incoming) => {
                            debug!("Replacing section '{}'.", section);
                            self.0.insert(section, incoming);
                        }
                    }
                }
            }
        }
    }

    /// Applies the field rules after sanitization.
    ///
    /// Fails on a present, non-empty `contact.email` that is not an address.
    /// Image fields at any depth holding anything other than an `images/` path
    /// or an http(s) URL are set to `default_image`; the dotted paths of the
    /// corrected fields are returned.
    pub fn validate(&mut self, default_image: &str) -> Result<Vec<String>, ContentError> {
        match self.field("contact", "email") {
            None | Some(Value::Null) => {}
            Some(Value::String(email)) if email.is_empty() => {}
            Some(Value::String(email)) if validators::is_valid_email(email) => {}
            Some(Value::String(email)) => return Err(ContentError::InvalidEmail(email.clone())),
            Some(other) => return Err(ContentError::InvalidEmail(other.to_string())),
        }

        let mut corrected = Vec::new();
        for (name, value) in self.0.iter_mut() {
            correct_images(name, value, validators::is_image_field(name), default_image, &mut corrected);
        }
        for path in &corrected {
            warn!("Replaced invalid image value at '{}' with '{}'.", path, default_image);
        }
        Ok(corrected)
    }
}

fn correct_images(path: &str, value: &mut Value, in_image_field: bool, default_image: &str, corrected: &mut Vec<String>) {
    match value {
        // An image-named list holds image values; each item is checked on its own.
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                correct_images(&item_path, item, in_image_field, default_image, corrected);
            }
        }
        Value::String(s) if in_image_field => {
            if !s.is_empty() && !validators::is_valid_image_url(s) {
                *s = default_image.to_string();
                corrected.push(path.to_string());
            }
        }
        // Anything else under an image-named key (numbers, booleans, null,
        // nested objects) cannot be an image location.
        _ if in_image_field => {
            *value = Value::String(default_image.to_string());
            corrected.push(path.to_string());
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let item_path = format!("{}.{}", path, key);
                correct_images(&item_path, item, validators::is_image_field(key), default_image, corrected);
            }
        }
        _ => {}
    }
}

/// The seed document written on first use and returned when the stored file
/// cannot be read.
pub fn default_document() -> ContentDocument {
    let value = json!({
        "intro": {
            "title": "Willkommen in unserer Praxis",
            "subtitle": "Hausärztliche Versorgung für die ganze Familie",
            "description": "Wir nehmen uns Zeit für Sie. Vereinbaren Sie einen Termin telefonisch oder online.",
            "buttonText": "Termin vereinbaren",
            "doctorImage": "images/doctor.jpg"
        },
        "services": {
            "title": "Unsere Leistungen",
            "subtitle": "Vorsorge, Diagnostik und Behandlung aus einer Hand",
            "items": [
                {
                    "icon": "stethoscope",
                    "title": "Allgemeinmedizin",
                    "description": "Diagnose und Behandlung akuter und chronischer Erkrankungen."
                },
                {
                    "icon": "heart",
                    "title": "Vorsorgeuntersuchungen",
                    "description": "Check-up, Krebsvorsorge und Impfberatung nach aktuellen Empfehlungen."
                },
                {
                    "icon": "syringe",
                    "title": "Impfungen",
                    "description": "Standard- und Reiseimpfungen für Kinder und Erwachsene."
                }
            ]
        },
        "about": {
            "title": "Über uns",
            "text": "Seit über 20 Jahren betreuen wir Patientinnen und Patienten aus der Region.",
            "qualifications": [
                "Fachärztin für Allgemeinmedizin",
                "Zusatzbezeichnung Naturheilverfahren",
                "Akademische Lehrpraxis"
            ],
            "teamImage": "images/team.jpg"
        },
        "contact": {
            "title": "Kontakt",
            "address": "Musterstraße 1, 12345 Musterstadt",
            "phone": "+49 123 456789",
            "email": "info@praxis-example.de",
            "hours": [
                "Mo, Di, Do: 08:00 - 12:00 und 15:00 - 18:00",
                "Mi, Fr: 08:00 - 12:00"
            ]
        }
    });

    ContentDocument::from_value(value).unwrap_or_default()
}
