//! Person repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Listing is always ordered by `id ASC`.

use super::{RepoError, RepoResult};
use crate::model::person::{Person, PersonFields, PersonId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    email,
    phone,
    postal_code,
    street,
    neighborhood,
    city,
    region
FROM people";

/// Repository interface for person CRUD operations.
pub trait PersonRepository {
    fn create_person(&self, fields: &PersonFields) -> RepoResult<PersonId>;
    fn update_person(&self, person: &Person) -> RepoResult<()>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    fn delete_person(&self, id: PersonId) -> RepoResult<()>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, fields: &PersonFields) -> RepoResult<PersonId> {
        fields.validate()?;

        self.conn.execute(
            "INSERT INTO people (
                name,
                age,
                email,
                phone,
                postal_code,
                street,
                neighborhood,
                city,
                region
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                fields.name.as_str(),
                fields.age,
                fields.email.as_deref(),
                fields.phone.as_deref(),
                fields.postal_code.as_deref(),
                fields.street.as_deref(),
                fields.neighborhood.as_deref(),
                fields.city.as_deref(),
                fields.region.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE people
             SET
                name = ?1,
                age = ?2,
                email = ?3,
                phone = ?4,
                postal_code = ?5,
                street = ?6,
                neighborhood = ?7,
                city = ?8,
                region = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?10;",
            params![
                person.name.as_str(),
                person.age,
                person.email.as_deref(),
                person.phone.as_deref(),
                person.postal_code.as_deref(),
                person.street.as_deref(),
                person.neighborhood.as_deref(),
                person.city.as_deref(),
                person.region.as_deref(),
                person.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        Ok(())
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;

        let row = stmt
            .query_row([id], |row| Ok(parse_person_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM people WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let age = match row.get::<_, Option<i64>>("age")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!("invalid age `{value}` in people.age"))
        })?),
        None => None,
    };

    let person = Person {
        id: row.get("id")?,
        name: row.get("name")?,
        age,
        email: row.get("email")?,
        phone: row.get("phone")?,
        postal_code: row.get("postal_code")?,
        street: row.get("street")?,
        neighborhood: row.get("neighborhood")?,
        city: row.get("city")?,
        region: row.get("region")?,
    };
    person.validate()?;
    Ok(person)
}
