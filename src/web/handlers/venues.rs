use axum::{
    extract::{Path, Query, RawForm, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::app::WriteError;
use crate::forms::{FormInput, VenueForm};
use crate::web::error::{AppError, AppResult};
use crate::web::state::AppState;
use crate::web::templates::{
    render, SearchTemplate, VenueDetailTemplate, VenueFormTemplate, VenuesTemplate,
};
use crate::web::views::{FormView, Notice, NoticeQuery, ProfileView, SearchForm};

pub async fn venues(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Html<String>> {
    let areas = state.venues.list_venues().await?;
    Ok(render(&VenuesTemplate {
        notice: query.message("Venue"),
        areas,
    })?)
}

pub async fn search_venues(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> AppResult<Html<String>> {
    let results = state.venues.search_venues(&form.search_term).await?;
    Ok(render(&SearchTemplate {
        notice: String::new(),
        section: "venues",
        search_term: form.search_term,
        results,
    })?)
}

pub async fn show_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Html<String>> {
    let detail = state.venues.show_venue(venue_id).await?;
    Ok(render(&VenueDetailTemplate {
        notice: query.message(&format!("Venue {}", detail.venue.name)),
        venue: ProfileView::from(&detail.venue),
        shows: detail.shows,
    })?)
}

fn create_page(form: FormView) -> VenueFormTemplate {
    VenueFormTemplate {
        notice: String::new(),
        action: "/venues/create".to_string(),
        heading: "List a new venue".to_string(),
        form,
    }
}

fn edit_page(venue_id: i64, name: &str, form: FormView) -> VenueFormTemplate {
    VenueFormTemplate {
        notice: String::new(),
        action: format!("/venues/{venue_id}/edit"),
        heading: format!("Edit venue {name}"),
        form,
    }
}

pub async fn create_venue_form() -> AppResult<Html<String>> {
    Ok(render(&create_page(FormView::blank()))?)
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> AppResult<Response> {
    let input = FormInput::parse(&body);
    match state.venues.create_venue(&input).await {
        Ok(venue) => {
            let id = venue.id.unwrap_or_default();
            let target = format!("/venues/{id}?notice={}", Notice::Listed.as_str());
            Ok(Redirect::to(&target).into_response())
        }
        Err(WriteError::Invalid(errors)) => {
            let page = render(&create_page(FormView::rejected(input, errors)))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(WriteError::Failed(_)) => {
            let message = format!(
                "An error occurred. Venue {} could not be listed.",
                input.text("name")
            );
            let page = render(&create_page(FormView::failed(input, message)))?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
        }
    }
}

pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> AppResult<Html<String>> {
    let venue = state.venues.get_venue(venue_id).await?;
    let form = FormView::filled(VenueForm::prefill(&venue));
    Ok(render(&edit_page(venue_id, &venue.name, form))?)
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    RawForm(body): RawForm,
) -> AppResult<Response> {
    let current = state.venues.get_venue(venue_id).await?;
    let input = FormInput::parse(&body);
    let notice = match state.venues.update_venue(venue_id, &input).await {
        Ok(_) => Notice::Updated,
        Err(WriteError::Invalid(errors)) => {
            let page = render(&edit_page(
                venue_id,
                &current.name,
                FormView::rejected(input, errors),
            ))?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
        Err(WriteError::Failed(e)) if e.is_not_found() => return Err(AppError::from(e)),
        Err(WriteError::Failed(_)) => Notice::UpdateFailed,
    };
    Ok(Redirect::to(&format!("/venues/{venue_id}?notice={}", notice.as_str())).into_response())
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> Json<Value> {
    match state.venues.delete_venue(venue_id).await {
        Ok(()) => Json(json!({ "success": 1 })),
        Err(e) => {
            warn!("Delete of venue {} refused: {}", venue_id, e);
            Json(json!({ "success": 0 }))
        }
    }
}
