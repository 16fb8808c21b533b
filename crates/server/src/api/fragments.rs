use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use fragments_core::FragmentId;

use super::AppState;
use super::schemas::{DeleteBody, FragmentBody, ListBody, Success};
use crate::auth::Caller;
use crate::error::ServerError;

/// Query parameters for `GET /v1/fragments`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub expand: Option<String>,
}

impl ListQuery {
    fn expand(&self) -> bool {
        matches!(self.expand.as_deref(), Some("1" | "true"))
    }
}

/// Split `{id}.{ext}` on the last dot. A leading dot is part of the id.
pub fn split_id(raw: &str) -> (&str, Option<&str>) {
    match raw.rsplit_once('.') {
        Some((id, ext)) if !id.is_empty() => (id, Some(ext)),
        _ => (raw, None),
    }
}

/// The request `Content-Type`, or `""` when absent or not visible ASCII.
fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `GET /v1/fragments` -- list the caller's fragment ids, or full metadata
/// with `?expand=1`.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let fragments = state
        .service
        .list(&caller.owner_id, query.expand())
        .await?
        .into_listing();
    Ok(Json(Success::new(ListBody { fragments })))
}

/// `POST /v1/fragments` -- create a fragment from the raw body.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let record = state
        .service
        .create(&caller.owner_id, content_type(&headers), body)
        .await?;
    let location = format!("{}/v1/fragments/{}", state.api_url, record.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Success::new(FragmentBody { fragment: record })),
    ))
}

/// `GET /v1/fragments/{id}[.ext]` -- the payload, converted when an
/// extension is given.
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (id, extension) = split_id(&raw_id);
    info!(fragment_id = id, extension = extension.unwrap_or_default(), "get fragment");
    let rendered = state
        .service
        .read(&caller.owner_id, &FragmentId::new(id), extension)
        .await?;
    Ok((
        [(header::CONTENT_TYPE, rendered.content_type)],
        rendered.data,
    ))
}

/// `GET /v1/fragments/{id}/info` -- metadata only.
pub async fn info(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let fragment = state
        .service
        .info(&caller.owner_id, &FragmentId::new(id))
        .await?;
    Ok(Json(Success::new(FragmentBody { fragment })))
}

/// `PUT /v1/fragments/{id}` -- replace the payload. The Content-Type must
/// match the stored type exactly.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let fragment = state
        .service
        .update(
            &caller.owner_id,
            &FragmentId::new(id),
            content_type(&headers),
            body,
        )
        .await?;
    Ok(Json(Success::new(FragmentBody { fragment })))
}

/// `DELETE /v1/fragments/{id}` -- remove metadata and payload.
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (id, _) = split_id(&raw_id);
    state
        .service
        .delete(&caller.owner_id, &FragmentId::new(id))
        .await?;
    Ok(Json(Success::new(DeleteBody {
        message: format!("Fragment {id} was deleted"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_last_dot() {
        assert_eq!(split_id("abc"), ("abc", None));
        assert_eq!(split_id("abc.md"), ("abc", Some("md")));
        assert_eq!(split_id("abc.tar.gz"), ("abc.tar", Some("gz")));
        assert_eq!(split_id("abc."), ("abc", Some("")));
        assert_eq!(split_id(".hidden"), (".hidden", None));
    }

    #[test]
    fn expand_flag() {
        for (value, expected) in [
            (None, false),
            (Some("1"), true),
            (Some("true"), true),
            (Some("0"), false),
        ] {
            let query = ListQuery {
                expand: value.map(str::to_owned),
            };
            assert_eq!(query.expand(), expected, "{value:?}");
        }
    }
}
