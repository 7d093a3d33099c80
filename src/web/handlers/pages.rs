use axum::{extract::Query, response::Html};

use crate::web::error::{AppError, AppResult};
use crate::web::templates::{render, HomeTemplate};
use crate::web::views::NoticeQuery;

pub async fn index(Query(query): Query<NoticeQuery>) -> AppResult<Html<String>> {
    Ok(render(&HomeTemplate {
        notice: query.message("The listing"),
    })?)
}

pub async fn not_found() -> AppError {
    AppError::NotFound("no such page".to_string())
}
