use askama::Template;
use axum::response::Html;

use crate::aggregate::{SearchResults, ShowPartition, ShowRow, VenueArea};
use crate::app::ArtistListItem;
use crate::error::Result;
use crate::web::views::{FormView, ProfileView, ShowFormView};

/// Render a template into an HTML response body
pub fn render<T: Template>(template: &T) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub notice: String,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub notice: String,
    pub areas: Vec<VenueArea>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub notice: String,
    pub artists: Vec<ArtistListItem>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub notice: String,
    /// "venues" or "artists", used for result links
    pub section: &'static str,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueDetailTemplate {
    pub notice: String,
    pub venue: ProfileView,
    pub shows: ShowPartition,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistDetailTemplate {
    pub notice: String,
    pub artist: ProfileView,
    pub shows: ShowPartition,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub notice: String,
    pub shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormTemplate {
    pub notice: String,
    /// Form target; `/venues/create` or `/venues/{id}/edit`
    pub action: String,
    pub heading: String,
    pub form: FormView,
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormTemplate {
    pub notice: String,
    pub action: String,
    pub heading: String,
    pub form: FormView,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct ShowFormTemplate {
    pub notice: String,
    pub view: ShowFormView,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub notice: String,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub notice: String,
}
