use axum::{
    extract::{Query, RawForm, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::app::WriteError;
use crate::error::BookingError;
use crate::forms::FormInput;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use crate::web::templates::{render, ShowFormTemplate, ShowsTemplate};
use crate::web::views::{FormView, Notice, NoticeQuery, ShowFormView};

pub async fn shows(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Html<String>> {
    let shows = state.shows.list_shows().await?;
    Ok(render(&ShowsTemplate {
        notice: query.message("Show"),
        shows,
    })?)
}

async fn form_page(state: &AppState, form: FormView) -> AppResult<Html<String>> {
    let choices = state.shows.form_choices().await?;
    Ok(render(&ShowFormTemplate {
        notice: String::new(),
        view: ShowFormView::new(form, &choices),
    })?)
}

pub async fn create_show_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    form_page(&state, FormView::blank()).await
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> AppResult<Response> {
    let input = FormInput::parse(&body);
    let (status, form) = match state.shows.create_show(&input).await {
        Ok(_) => {
            let target = format!("/shows?notice={}", Notice::Listed.as_str());
            return Ok(Redirect::to(&target).into_response());
        }
        Err(WriteError::Invalid(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            FormView::rejected(input, errors),
        ),
        Err(WriteError::Failed(BookingError::MissingReference { entity, id })) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            FormView::failed(
                input,
                format!(
                    "An error occurred. Show could not be listed: no {} with id {id}.",
                    entity.to_lowercase()
                ),
            ),
        ),
        Err(WriteError::Failed(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            FormView::failed(input, "An error occurred. Show could not be listed."),
        ),
    };
    let page = form_page(&state, form).await?;
    Ok((status, page).into_response())
}
