//! Person record use-cases driven by form input.
//!
//! # Responsibility
//! - Normalize raw form values (trim, empty → absent).
//! - Validate name and age before any write.
//! - Provide create/edit/delete/list entry points for the web layer.
//!
//! # Invariants
//! - Edits overwrite every field; a blank form value clears the field.
//! - A rejected form never reaches storage.

use crate::model::person::{Person, PersonFields, PersonId};
use crate::model::validation::ValidationError;
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoError;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for person use-cases.
#[derive(Debug)]
pub enum PersonServiceError {
    /// `nome` is blank.
    MissingName,
    /// `idade` is not a non-negative integer.
    InvalidAge(String),
    /// Any other field rule (length limits).
    Invalid(ValidationError),
    PersonNotFound(PersonId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl PersonServiceError {
    /// Message shown inline on the record form.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingName => "Informe ao menos o nome.".to_string(),
            Self::InvalidAge(_) => "Idade inválida.".to_string(),
            Self::Invalid(ValidationError::TooLong {
                field, max_chars, ..
            }) => format!(
                "{}: no máximo {max_chars} caracteres.",
                form_label(field)
            ),
            Self::Invalid(_) => "Dados inválidos.".to_string(),
            Self::PersonNotFound(_) => "Usuário não encontrado.".to_string(),
            other => format!("Erro ao salvar: {other}"),
        }
    }

    /// Whether the form should be shown again with `user_message()`.
    pub fn is_form_error(&self) -> bool {
        matches!(
            self,
            Self::MissingName | Self::InvalidAge(_) | Self::Invalid(_)
        )
    }
}

/// Form label for a person field name.
fn form_label(field: &str) -> &str {
    match field {
        "name" => "Nome",
        "email" => "E-mail",
        "phone" => "Telefone",
        "postal_code" => "CEP",
        "street" => "Logradouro",
        "neighborhood" => "Bairro",
        "city" => "Cidade",
        "region" => "UF",
        other => other,
    }
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "name is required"),
            Self::InvalidAge(value) => write!(f, "invalid age: `{value}`"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent person state: {details}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PersonNotFound(id),
            RepoError::Validation(ValidationError::EmptyName) => Self::MissingName,
            RepoError::Validation(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

/// Raw person form as submitted by the browser.
///
/// Field names on the wire are the Portuguese form keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonForm {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "uf")]
    pub region: String,
}

impl PersonForm {
    /// Converts the raw form into validated fields.
    ///
    /// Order of checks: name, age, then column limits.
    pub fn normalize(&self) -> Result<PersonFields, PersonServiceError> {
        let name = blank_to_none(&self.name).ok_or(PersonServiceError::MissingName)?;
        let age = blank_to_none(&self.age)
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| PersonServiceError::InvalidAge(raw))
            })
            .transpose()?;

        let fields = PersonFields {
            name,
            age,
            email: blank_to_none(&self.email),
            phone: blank_to_none(&self.phone),
            postal_code: blank_to_none(&self.postal_code),
            street: blank_to_none(&self.street),
            neighborhood: blank_to_none(&self.neighborhood),
            city: blank_to_none(&self.city),
            region: blank_to_none(&self.region),
        };
        fields.validate().map_err(|err| match err {
            ValidationError::EmptyName => PersonServiceError::MissingName,
            other => PersonServiceError::Invalid(other),
        })?;
        Ok(fields)
    }
}

impl From<&Person> for PersonForm {
    fn from(person: &Person) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: person.name.clone(),
            age: person.age.map(|age| age.to_string()).unwrap_or_default(),
            email: text(&person.email),
            phone: text(&person.phone),
            postal_code: text(&person.postal_code),
            street: text(&person.street),
            neighborhood: text(&person.neighborhood),
            city: text(&person.city),
            region: text(&person.region),
        }
    }
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Person use-cases over a repository implementation.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `form` and stores a new record.
    pub fn create_from_form(&self, form: &PersonForm) -> Result<Person, PersonServiceError> {
        let fields = form.normalize()?;
        let id = self.repo.create_person(&fields)?;
        info!("event=person_create module=person status=ok id={id}");

        self.repo
            .get_person(id)?
            .ok_or(PersonServiceError::InconsistentState(
                "created person not found in read-back",
            ))
    }

    /// Loads record `id`, overwrites all fields from `form`, and saves it.
    ///
    /// A missing record is reported before the form is validated.
    pub fn update_from_form(
        &self,
        id: PersonId,
        form: &PersonForm,
    ) -> Result<Person, PersonServiceError> {
        let mut person = self.get(id)?;
        person.apply(form.normalize()?);
        self.repo.update_person(&person)?;
        info!("event=person_update module=person status=ok id={id}");
        Ok(person)
    }

    pub fn get(&self, id: PersonId) -> Result<Person, PersonServiceError> {
        self.repo
            .get_person(id)?
            .ok_or(PersonServiceError::PersonNotFound(id))
    }

    /// All records, `id` ascending.
    pub fn list(&self) -> Result<Vec<Person>, PersonServiceError> {
        Ok(self.repo.list_people()?)
    }

    pub fn delete(&self, id: PersonId) -> Result<(), PersonServiceError> {
        self.repo.delete_person(id)?;
        info!("event=person_delete module=person status=ok id={id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PersonForm, PersonServiceError};
    use crate::model::validation::ValidationError;

    fn form(name: &str, age: &str) -> PersonForm {
        PersonForm {
            name: name.to_string(),
            age: age.to_string(),
            ..PersonForm::default()
        }
    }

    #[test]
    fn normalize_trims_and_maps_blank_to_none() {
        let mut raw = form("  Maria  ", " 31 ");
        raw.city = "   ".to_string();
        raw.region = " PE ".to_string();

        let fields = raw.normalize().unwrap();
        assert_eq!(fields.name, "Maria");
        assert_eq!(fields.age, Some(31));
        assert_eq!(fields.city, None);
        assert_eq!(fields.region.as_deref(), Some("PE"));
    }

    #[test]
    fn normalize_checks_name_before_age() {
        assert!(matches!(
            form(" ", "trinta").normalize(),
            Err(PersonServiceError::MissingName)
        ));
        assert!(matches!(
            form("Maria", "trinta").normalize(),
            Err(PersonServiceError::InvalidAge(value)) if value == "trinta"
        ));
    }

    #[test]
    fn negative_and_fractional_ages_are_rejected() {
        assert!(matches!(
            form("Maria", "-1").normalize(),
            Err(PersonServiceError::InvalidAge(_))
        ));
        assert!(matches!(
            form("Maria", "30.5").normalize(),
            Err(PersonServiceError::InvalidAge(_))
        ));
    }

    #[test]
    fn user_messages_are_form_ready() {
        assert_eq!(
            PersonServiceError::MissingName.user_message(),
            "Informe ao menos o nome."
        );
        assert_eq!(
            PersonServiceError::InvalidAge("x".to_string()).user_message(),
            "Idade inválida."
        );
        assert_eq!(
            PersonServiceError::Invalid(ValidationError::TooLong {
                field: "postal_code",
                max_chars: 9,
                actual_chars: 12,
            })
            .user_message(),
            "CEP: no máximo 9 caracteres."
        );
        assert!(PersonServiceError::MissingName.is_form_error());
        assert!(!PersonServiceError::PersonNotFound(1).is_form_error());
    }
}
