//! Translation of flat admin form submissions into nested content updates.
//!
//! The admin form posts keys of the shape `section_field` (`intro_title`,
//! `contact_email`, `intro_doctorImage`). The section is everything before the
//! first underscore, the field everything after it. Uploaded images arrive as
//! descriptors carrying the form key and the path the upload was stored under.

use log::{debug, warn};
use serde_json::{Map, Value};

/// An uploaded image that has already been stored by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Form key the image belongs to, e.g. `intro_doctorImage`.
    pub field_key: String,
    /// Stored path relative to the site root, e.g. `images/doctor-1712.jpg`.
    pub stored_path: String,
}

/// A flat form submission, collected in arrival order.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    fields: Vec<(String, Value)>,
    images: Vec<UploadedImage>,
}

fn split_key(key: &str) -> Option<(&str, &str)> {
    match key.split_once('_') {
        Some((section, field)) if !section.is_empty() && !field.is_empty() => Some((section, field)),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a submission from `(key, text)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::new();
        for (key, value) in pairs {
            form.insert(key, Value::String(value.into()));
        }
        form
    }

    /// Adds a field. Later values for the same key win.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> &mut Self {
        self.fields.push((key.into(), value));
        self
    }

    /// Adds a list field, e.g. `contact_hours` or `services_items`.
    pub fn insert_list<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.insert(key, Value::Array(list))
    }

    /// Attaches an uploaded image; it overrides a text value for the same key.
    pub fn with_image(mut self, image: UploadedImage) -> Self {
        self.images.push(image);
        self
    }

    /// The nested update: only fields that were submitted with a value.
    pub fn into_update(self) -> Value {
        let mut update: Map<String, Value> = Map::new();

        let images = self
            .images
            .into_iter()
            .map(|image| (image.field_key, Value::String(image.stored_path)));

        for (key, value) in self.fields.into_iter().chain(images) {
            let Some((section, field)) = split_key(&key) else {
                warn!("Ignoring form key '{}' without a section prefix.", key);
                continue;
            };
            if is_blank(&value) {
                debug!("Skipping blank form field '{}'.", key);
                continue;
            }
            let entry = update
                .entry(section.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = entry {
                fields.insert(field.to_string(), value);
            }
        }

        Value::Object(update)
    }
}
