//! Person record CRUD pages. All routes require a logged-in session.

use crate::context::LoggedIn;
use crate::error::WebError;
use crate::session::FlashMessage;
use crate::state::AppState;
use crate::templates::{self, FormMode};
use crate::PEOPLE_PATH;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use log::warn;
use siteapp_core::{PersonForm, PersonId, PersonService, PersonServiceError, SqlitePersonRepository};

fn with_people<T>(
    state: &AppState,
    f: impl FnOnce(&PersonService<SqlitePersonRepository<'_>>) -> Result<T, PersonServiceError>,
) -> Result<T, WebError> {
    let result = state.with_db(|conn| f(&PersonService::new(SqlitePersonRepository::new(conn))))?;
    Ok(result?)
}

pub async fn list(State(state): State<AppState>, user: LoggedIn) -> Result<Html<String>, WebError> {
    let people = with_people(&state, |service| service.list())?;
    let flashes = user.context.take_flashes(&state).await;
    Ok(Html(templates::people_list_page(
        &user.account,
        &people,
        &flashes,
    )))
}

pub async fn new_form(State(state): State<AppState>, user: LoggedIn) -> Html<String> {
    let flashes = user.context.take_flashes(&state).await;
    Html(templates::person_form_page(
        FormMode::Create,
        &PersonForm::default(),
        None,
        &flashes,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    user: LoggedIn,
    Form(form): Form<PersonForm>,
) -> Result<Response, WebError> {
    let result = state.with_db(|conn| {
        PersonService::new(SqlitePersonRepository::new(conn)).create_from_form(&form)
    })?;

    match result {
        Ok(_) => {
            user.context
                .flash(&state, FlashMessage::success("Usuário cadastrado com sucesso!"))
                .await;
            Ok(Redirect::to(PEOPLE_PATH).into_response())
        }
        Err(err) if err.is_form_error() => {
            warn!("event=person_create module=web status=rejected reason={err}");
            Ok(rerender(FormMode::Create, &form, &err))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    user: LoggedIn,
    Path(id): Path<PersonId>,
) -> Result<Html<String>, WebError> {
    let person = with_people(&state, |service| service.get(id))?;
    let flashes = user.context.take_flashes(&state).await;
    Ok(Html(templates::person_form_page(
        FormMode::Edit(id),
        &PersonForm::from(&person),
        None,
        &flashes,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    user: LoggedIn,
    Path(id): Path<PersonId>,
    Form(form): Form<PersonForm>,
) -> Result<Response, WebError> {
    let result = state.with_db(|conn| {
        PersonService::new(SqlitePersonRepository::new(conn)).update_from_form(id, &form)
    })?;

    match result {
        Ok(_) => {
            user.context
                .flash(&state, FlashMessage::success("Usuário atualizado com sucesso!"))
                .await;
            Ok(Redirect::to(PEOPLE_PATH).into_response())
        }
        Err(err) if err.is_form_error() => {
            warn!("event=person_update module=web status=rejected id={id} reason={err}");
            Ok(rerender(FormMode::Edit(id), &form, &err))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    _user: LoggedIn,
    Path(id): Path<PersonId>,
) -> Result<Html<String>, WebError> {
    let person = with_people(&state, |service| service.get(id))?;
    Ok(Html(templates::confirm_delete_page(&person)))
}

pub async fn delete(
    State(state): State<AppState>,
    user: LoggedIn,
    Path(id): Path<PersonId>,
) -> Result<Redirect, WebError> {
    with_people(&state, |service| service.delete(id))?;
    user.context
        .flash(&state, FlashMessage::success("Usuário excluído."))
        .await;
    Ok(Redirect::to(PEOPLE_PATH))
}

fn rerender(mode: FormMode, form: &PersonForm, err: &PersonServiceError) -> Response {
    Html(templates::person_form_page(
        mode,
        form,
        Some(&err.user_message()),
        &[],
    ))
    .into_response()
}
