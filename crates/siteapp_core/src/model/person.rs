//! Person record model.
//!
//! # Responsibility
//! - Define the record managed by the CRUD flow.
//! - Provide the explicit field-by-field merge used by edits.
//!
//! # Invariants
//! - `id` is assigned by storage, stable, and never reused.
//! - `name` is non-empty after trimming.
//! - Text fields respect the column limits below.

use super::validation::{check_len, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned record identifier.
pub type PersonId = i64;

pub const NAME_MAX_CHARS: usize = 120;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const PHONE_MAX_CHARS: usize = 20;
pub const POSTAL_CODE_MAX_CHARS: usize = 9;
pub const STREET_MAX_CHARS: usize = 255;
pub const NEIGHBORHOOD_MAX_CHARS: usize = 120;
pub const CITY_MAX_CHARS: usize = 120;
pub const REGION_MAX_CHARS: usize = 2;

/// Mutable part of a person record.
///
/// Every optional field uses `None` for "absent"; empty strings are never
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFields {
    pub name: String,
    pub age: Option<u32>,
    /// Free-form; not checked against RFC 5322.
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Brazilian CEP, usually `00000-000`.
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code (`SP`, `RJ`, ...).
    pub region: Option<String>,
}

impl PersonFields {
    /// Creates a field set with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Checks name presence and column limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        check_len("name", Some(self.name.as_str()), NAME_MAX_CHARS)?;
        check_len("email", self.email.as_deref(), EMAIL_MAX_CHARS)?;
        check_len("phone", self.phone.as_deref(), PHONE_MAX_CHARS)?;
        check_len(
            "postal_code",
            self.postal_code.as_deref(),
            POSTAL_CODE_MAX_CHARS,
        )?;
        check_len("street", self.street.as_deref(), STREET_MAX_CHARS)?;
        check_len(
            "neighborhood",
            self.neighborhood.as_deref(),
            NEIGHBORHOOD_MAX_CHARS,
        )?;
        check_len("city", self.city.as_deref(), CITY_MAX_CHARS)?;
        check_len("region", self.region.as_deref(), REGION_MAX_CHARS)?;
        Ok(())
    }
}

/// A persisted person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

impl Person {
    pub fn from_fields(id: PersonId, fields: PersonFields) -> Self {
        let mut person = Self {
            id,
            name: String::new(),
            age: None,
            email: None,
            phone: None,
            postal_code: None,
            street: None,
            neighborhood: None,
            city: None,
            region: None,
        };
        person.apply(fields);
        person
    }

    /// Overwrites every mutable field; `None` clears the previous value.
    pub fn apply(&mut self, fields: PersonFields) {
        let PersonFields {
            name,
            age,
            email,
            phone,
            postal_code,
            street,
            neighborhood,
            city,
            region,
        } = fields;
        self.name = name;
        self.age = age;
        self.email = email;
        self.phone = phone;
        self.postal_code = postal_code;
        self.street = street;
        self.neighborhood = neighborhood;
        self.city = city;
        self.region = region;
    }

    /// Returns a copy of the mutable fields.
    pub fn fields(&self) -> PersonFields {
        PersonFields {
            name: self.name.clone(),
            age: self.age,
            email: self.email.clone(),
            phone: self.phone.clone(),
            postal_code: self.postal_code.clone(),
            street: self.street.clone(),
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.fields().validate()
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonFields};
    use crate::model::validation::ValidationError;

    #[test]
    fn apply_clears_fields_missing_from_the_update() {
        let mut person = Person::from_fields(
            7,
            PersonFields {
                name: "Maria".to_string(),
                age: Some(30),
                city: Some("Recife".to_string()),
                ..PersonFields::default()
            },
        );

        person.apply(PersonFields::named("Maria Souza"));

        assert_eq!(person.id, 7);
        assert_eq!(person.name, "Maria Souza");
        assert_eq!(person.age, None);
        assert_eq!(person.city, None);
    }

    #[test]
    fn validate_rejects_blank_name_and_long_region() {
        assert_eq!(
            PersonFields::named("   ").validate(),
            Err(ValidationError::EmptyName)
        );

        let fields = PersonFields {
            region: Some("SPX".to_string()),
            ..PersonFields::named("Ana")
        };
        assert!(matches!(
            fields.validate(),
            Err(ValidationError::TooLong { field: "region", max_chars: 2, actual_chars: 3 })
        ));
    }

    #[test]
    fn display_shows_name_and_id() {
        let person = Person::from_fields(3, PersonFields::named("João"));
        assert_eq!(person.to_string(), "João (3)");
    }
}
