use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "has already been taken";

/// Field-keyed validation messages, e.g. `{"name": ["can't be blank"]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flattened `"name can't be blank"` style messages for form rendering.
    pub fn full_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                let label = humanize(field);
                messages.iter().map(move |m| format!("{label} {m}"))
            })
            .collect()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

pub fn require_present(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if is_blank(value) {
        errors.add(field, BLANK);
    }
}

/// Validate a project's name for `owner_id`.
///
/// Presence and uniqueness are checked independently. `except` excludes the
/// project being edited from the uniqueness scope. The `(owner_id, name)`
/// constraint still backs this check at write time.
pub async fn check_project_name(
    pool: &PgPool,
    owner_id: Uuid,
    name: Option<&str>,
    except: Option<Uuid>,
) -> Result<ValidationErrors, sqlx::Error> {
    let mut errors = ValidationErrors::new();
    require_present(&mut errors, "name", name);

    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        if db::projects::name_taken(pool, owner_id, name, except).await? {
            errors.add("name", TAKEN);
        }
    }

    Ok(errors)
}
