use axum::{routing::{get, post}, Router};
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::web::handlers::artists::{
    artists, create_artist_form, create_artist_submission, delete_artist, edit_artist_form,
    edit_artist_submission, search_artists, show_artist,
};
use crate::web::handlers::pages::{index, not_found};
use crate::web::handlers::shows::{create_show_form, create_show_submission, shows};
use crate::web::handlers::venues::{
    create_venue_form, create_venue_submission, delete_venue, edit_venue_form,
    edit_venue_submission, search_venues, show_venue, venues,
};
use crate::web::state::AppState;

pub fn app_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/venues", get(venues))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", get(create_venue_form).post(create_venue_submission))
        .route("/venues/:id", get(show_venue).delete(delete_venue))
        .route("/venues/:id/edit", get(edit_venue_form).post(edit_venue_submission))
        .route("/artists", get(artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(create_artist_form).post(create_artist_submission))
        .route("/artists/:id", get(show_artist).delete(delete_artist))
        .route("/artists/:id/edit", get(edit_artist_form).post(edit_artist_submission))
        .route("/shows", get(shows))
        .route("/shows/create", get(create_show_form).post(create_show_submission))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
