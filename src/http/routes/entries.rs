//! Entry CRUD endpoints under /api/test

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::{Entry, EntryRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

const BASE_PATH: &str = "/api/test";

#[derive(Deserialize)]
pub struct EntryPayload {
    pub name: String,
}

/// GET /api/test - all entries, id ascending. A never-created table reads
/// as an empty collection.
async fn list_entries(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = EntryRepo::new(&state.pool).list().await?;
    Ok(Json(entries))
}

/// GET /api/test/{id}
async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Entry>, ApiError> {
    let entry = EntryRepo::new(&state.pool).get(id).await?;
    Ok(Json(entry))
}

/// POST /api/test - create, 201 with a Location header at the new entry.
async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EntryPayload>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Entry>), ApiError> {
    let entry = EntryRepo::new(&state.pool).create(&payload.name).await?;
    let location = format!("{BASE_PATH}/{}", entry.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(entry),
    ))
}

/// PUT /api/test/{id} - 204 on success
async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<EntryPayload>,
) -> Result<StatusCode, ApiError> {
    EntryRepo::new(&state.pool).update(id, &payload.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/test/{id} - 204 on success
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    EntryRepo::new(&state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Entry routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(BASE_PATH, get(list_entries).post(create_entry))
        .route(
            "/api/test/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::create_pool;
    use crate::http::{app, AppState};

    // Full-stack CRUD scenario - run with DATABASE_URL set:
    // cargo test -- --ignored

    fn test_config(database_url: String) -> Config {
        Config {
            database_url,
            report_url: None,
            default_board_id: None,
            port: 0,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_get_delete_roundtrip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).expect("pool creation failed");
        let app = app(Arc::new(AppState::new(pool, test_config(url))));

        // POST /api/test
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/test")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Alpha"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response
            .headers()
            .get("location")
            .expect("Location header missing")
            .to_str()
            .unwrap()
            .to_owned();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(created["name"], "Alpha");
        assert_eq!(location, format!("/api/test/{}", created["id"]));

        // GET it back
        let response = app
            .clone()
            .oneshot(Request::get(location.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let fetched: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched, created);

        // DELETE, then GET is a 404
        let response = app
            .clone()
            .oneshot(Request::delete(location.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get(location.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_id_is_404_for_get_update_delete() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).expect("pool creation failed");
        let app = app(Arc::new(AppState::new(pool, test_config(url))));

        let response = app
            .clone()
            .oneshot(Request::get("/api/test/999999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(
                Request::put("/api/test/999999")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"ghost"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::delete("/api/test/999999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
