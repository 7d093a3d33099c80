use axum::{
    extract::{Path, Query, RawForm, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::app::WriteError;
use crate::forms::{ArtistForm, FormInput};
use crate::web::error::{AppError, AppResult};
use crate::web::state::AppState;
use crate::web::templates::{
    render, ArtistDetailTemplate, ArtistFormTemplate, ArtistsTemplate, SearchTemplate,
};
use crate::web::views::{FormView, Notice, NoticeQuery, ProfileView, SearchForm};

pub async fn artists(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Html<String>> {
    let artists = state.artists.list_artists().await?;
    Ok(render(&ArtistsTemplate {
        notice: query.message("Artist"),
        artists,
    })?)
}

pub async fn search_artists(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> AppResult<Html<String>> {
    let results = state.artists.search_artists(&form.search_term).await?;
    Ok(render(&SearchTemplate {
        notice: String::new(),
        section: "artists",
        search_term: form.search_term,
        results,
    })?)
}

pub async fn show_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Html<String>> {
    let detail = state.artists.show_artist(artist_id).await?;
    Ok(render(&ArtistDetailTemplate {
        notice: query.message(&format!("Artist {}", detail.artist.name)),
        artist: ProfileView::from(&detail.artist),
        shows: detail.shows,
    })?)
}

fn form_page(action: String, heading: String, form: FormView) -> ArtistFormTemplate {
    ArtistFormTemplate {
        notice: String::new(),
        action,
        heading,
        form,
    }
}

fn create_page(form: FormView) -> ArtistFormTemplate {
    form_page(
        "/artists/create".to_string(),
        "List a new artist".to_string(),
        form,
    )
}

pub async fn create_artist_form() -> AppResult<Html<String>> {
    Ok(render(&create_page(FormView::blank()))?)
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> AppResult<Response> {
    let input = FormInput::parse(&body);
    match state.artists.create_artist(&input).await {
        Ok(artist) => {
            let id = artist.id.unwrap_or_default();
            let target = format!("/artists/{id}?notice={}", Notice::Listed.as_str());
            Ok(Redirect::to(&target).into_response())
        }
        Err(WriteError::Invalid(errors)) => {
            let page = render(&create_page(FormView::rejected(input, errors)))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(WriteError::Failed(_)) => {
            let message = format!(
                "An error occurred. Artist {} could not be listed.",
                input.text("name")
            );
            let page = render(&create_page(FormView::failed(input, message)))?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
        }
    }
}

pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> AppResult<Html<String>> {
    let artist = state.artists.get_artist(artist_id).await?;
    Ok(render(&form_page(
        format!("/artists/{artist_id}/edit"),
        format!("Edit artist {}", artist.name),
        FormView::filled(ArtistForm::prefill(&artist)),
    ))?)
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
    RawForm(body): RawForm,
) -> AppResult<Response> {
    let current = state.artists.get_artist(artist_id).await?;
    let input = FormInput::parse(&body);
    let notice = match state.artists.update_artist(artist_id, &input).await {
        Ok(_) => Notice::Updated,
        Err(WriteError::Invalid(errors)) => {
            let page = render(&form_page(
                format!("/artists/{artist_id}/edit"),
                format!("Edit artist {}", current.name),
                FormView::rejected(input, errors),
            ))?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
        Err(WriteError::Failed(e)) if e.is_not_found() => return Err(AppError::from(e)),
        Err(WriteError::Failed(_)) => Notice::UpdateFailed,
    };
    Ok(Redirect::to(&format!("/artists/{artist_id}?notice={}", notice.as_str())).into_response())
}

/// Refused (success 0) while the artist still has shows
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Json<Value> {
    match state.artists.delete_artist(artist_id).await {
        Ok(()) => Json(json!({ "success": 1 })),
        Err(e) => {
            warn!("Delete of artist {} refused: {}", artist_id, e);
            Json(json!({ "success": 0 }))
        }
    }
}
