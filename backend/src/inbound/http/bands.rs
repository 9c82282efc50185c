//! Catalogue API handlers.
//!
//! ```text
//! GET  /api/v1/bands?search=cold&genre=Rock&sortByLikes=true&likedOnly=false
//! GET  /api/v1/bands/genres
//! GET  /api/v1/bands/{name}
//! POST /api/v1/bands {"name":"Muse","year":1994,"genre":"Rock",...}
//! POST /api/v1/bands/{name}/like?sortByLikes=true
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::error::ErrorDto;
use crate::domain::{ApiResult, BandDraft, CatalogEntry, Error, GenreFilter, ViewOptions};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_band_validation_error, parse_band_name};

/// View options accepted as query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ViewQuery {
    /// Case-insensitive substring of the band name.
    pub search: Option<String>,
    /// Exact genre, or `all`.
    pub genre: Option<String>,
    /// Order by likes, most liked first.
    pub sort_by_likes: Option<bool>,
    /// Only bands the signed-in user liked.
    pub liked_only: Option<bool>,
}

impl From<ViewQuery> for ViewOptions {
    fn from(query: ViewQuery) -> Self {
        Self {
            search: query.search.unwrap_or_default(),
            genre: query
                .genre
                .as_deref()
                .map(GenreFilter::parse)
                .unwrap_or_default(),
            sort_by_likes: query.sort_by_likes.unwrap_or(false),
            liked_only: query.liked_only.unwrap_or(false),
        }
    }
}

/// Catalogue card as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BandResponse {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    /// Description cut to 100 characters for cards.
    pub short_description: String,
    pub image: String,
    pub link: String,
    pub likes: u32,
    /// Whether the signed-in user liked this band.
    pub liked: bool,
}

impl From<CatalogEntry> for BandResponse {
    fn from(entry: CatalogEntry) -> Self {
        let short_description = entry.band.short_description();
        let band = entry.band;
        Self {
            id: *band.id.as_uuid(),
            name: band.name.into(),
            year: band.year,
            genre: band.genre,
            description: band.description,
            short_description,
            image: band.image,
            link: band.link,
            likes: band.likes,
            liked: entry.liked,
        }
    }
}

/// Year as typed in a form: a number or its text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
}

impl YearInput {
    fn as_text(&self) -> String {
        match self {
            Self::Number(year) => year.to_string(),
            Self::Text(raw) => raw.clone(),
        }
    }
}

/// Body of `POST /api/v1/bands`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBandRequest {
    pub name: String,
    pub year: YearInput,
    pub genre: String,
    pub description: String,
    pub image: String,
    pub link: String,
}

impl TryFrom<NewBandRequest> for BandDraft {
    type Error = Error;

    fn try_from(value: NewBandRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.year.as_text(),
            &value.genre,
            &value.description,
            &value.image,
            &value.link,
        )
        .map_err(map_band_validation_error)
    }
}

/// Result of a like toggle plus the recomputed catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub band_name: String,
    pub liked: bool,
    pub likes: u32,
    pub bands: Vec<BandResponse>,
}

fn to_responses(entries: Vec<CatalogEntry>) -> Vec<BandResponse> {
    entries.into_iter().map(BandResponse::from).collect()
}

/// Browse the catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/bands",
    params(ViewQuery),
    responses(
        (status = 200, description = "Filtered catalogue", body = [BandResponse]),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["bands"],
    operation_id = "listBands",
    security([])
)]
#[get("/bands")]
pub async fn list_bands(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ViewQuery>,
) -> ApiResult<web::Json<Vec<BandResponse>>> {
    let viewer = session.user_id()?;
    let options = ViewOptions::from(query.into_inner());
    let entries = state.catalog.browse(viewer.as_ref(), &options).await?;
    Ok(web::Json(to_responses(entries)))
}

/// Distinct genres for the genre selector.
#[utoipa::path(
    get,
    path = "/api/v1/bands/genres",
    responses(
        (status = 200, description = "Genres in catalogue order", body = [String]),
        (status = 503, description = "Store unavailable", body = ErrorDto)
    ),
    tags = ["bands"],
    operation_id = "listGenres",
    security([])
)]
#[get("/bands/genres")]
pub async fn list_genres(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<String>>> {
    Ok(web::Json(state.catalog.genres().await?))
}

/// Band details by exact name.
#[utoipa::path(
    get,
    path = "/api/v1/bands/{name}",
    params(("name" = String, Path, description = "Exact, case-sensitive band name")),
    responses(
        (status = 200, description = "Band details", body = BandResponse),
        (status = 404, description = "No band with that name", body = ErrorDto)
    ),
    tags = ["bands"],
    operation_id = "getBand",
    security([])
)]
#[get("/bands/{name}")]
pub async fn get_band(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BandResponse>> {
    let name = parse_band_name(&path)?;
    let viewer = session.user_id()?;
    let entry = state.catalog.band_details(viewer.as_ref(), &name).await?;
    Ok(web::Json(entry.into()))
}

/// Add a band. Requires a signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/bands",
    request_body = NewBandRequest,
    responses(
        (status = 201, description = "Band added", body = BandResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorDto),
        (status = 401, description = "Login required", body = ErrorDto),
        (status = 409, description = "Band name already taken", body = ErrorDto)
    ),
    tags = ["bands"],
    operation_id = "addBand"
)]
#[post("/bands")]
pub async fn add_band(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewBandRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = BandDraft::try_from(payload.into_inner())?;
    let band = state.catalog_command.add_band(&author, draft).await?;
    let body = BandResponse::from(CatalogEntry { band, liked: false });
    Ok(HttpResponse::Created().json(body))
}

/// Like or unlike a band, then return the catalogue recomputed with the
/// supplied view options.
#[utoipa::path(
    post,
    path = "/api/v1/bands/{name}/like",
    params(("name" = String, Path, description = "Exact band name"), ViewQuery),
    responses(
        (status = 200, description = "Like toggled", body = LikeResponse),
        (status = 401, description = "Login required", body = ErrorDto),
        (status = 404, description = "No band with that name", body = ErrorDto)
    ),
    tags = ["bands"],
    operation_id = "toggleLike"
)]
#[post("/bands/{name}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<ViewQuery>,
) -> ApiResult<web::Json<LikeResponse>> {
    let user_id = session.require_user_id()?;
    let name = parse_band_name(&path)?;
    let outcome = state.likes.toggle(&user_id, &name).await?;

    let options = ViewOptions::from(query.into_inner());
    let entries = state.catalog.browse(Some(&user_id), &options).await?;
    Ok(web::Json(LikeResponse {
        band_name: outcome.band_name.into(),
        liked: outcome.liked,
        likes: outcome.likes,
        bands: to_responses(entries),
    }))
}

#[cfg(test)]
mod tests {
    //! Handler tests over the in-memory store.
    use super::*;
    use crate::inbound::http::test_utils::{register_and_sign_in, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn band_body(name: &str, genre: &str) -> Value {
        json!({
            "name": name,
            "year": 1996,
            "genre": genre,
            "description": "d",
            "image": "i.png",
            "link": "https://example.com",
        })
    }

    #[actix_web::test]
    async fn add_band_requires_session() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands")
                .set_json(band_body("Muse", "Rock"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn added_band_is_listed_with_zero_likes() {
        let app = test::init_service(test_app()).await;
        let cookie = register_and_sign_in(&app, "ada@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands")
                .cookie(cookie)
                .set_json(band_body("Muse", "Rock"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let listed: Vec<BandResponse> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/bands").to_request(),
        )
        .await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Muse");
        assert_eq!(listed[0].likes, 0);
        assert!(!listed[0].liked);
    }

    #[rstest]
    #[case(json!({"name": "X", "year": "ninety", "genre": "Rock", "description": "d", "image": "i", "link": "l"}), "year", "invalid_year")]
    #[case(json!({"name": "X", "year": 1990, "genre": " ", "description": "d", "image": "i", "link": "l"}), "genre", "missing_field")]
    #[case(json!({"name": "", "year": 1990, "genre": "Rock", "description": "d", "image": "i", "link": "l"}), "name", "missing_field")]
    #[actix_web::test]
    async fn add_band_reports_invalid_field(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = test::init_service(test_app()).await;
        let cookie = register_and_sign_in(&app, "ada@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload: Value = test::read_body_json(res).await;
        assert_eq!(payload["details"]["field"], field);
        assert_eq!(payload["details"]["code"], code);
    }

    #[actix_web::test]
    async fn duplicate_band_is_conflict_and_catalogue_unchanged() {
        let app = test::init_service(test_app()).await;
        let cookie = register_and_sign_in(&app, "ada@example.com").await;

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/v1/bands")
                    .cookie(cookie.clone())
                    .set_json(band_body("ABBA", "Pop"))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), expected);
        }

        let listed: Vec<BandResponse> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/bands").to_request(),
        )
        .await;
        assert_eq!(listed.len(), 1);
    }

    #[actix_web::test]
    async fn filters_apply_from_query_string() {
        let app = test::init_service(test_app()).await;
        let cookie = register_and_sign_in(&app, "ada@example.com").await;
        for (name, genre) in [("Coldplay", "Rock"), ("ABBA", "Pop")] {
            test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/v1/bands")
                    .cookie(cookie.clone())
                    .set_json(band_body(name, genre))
                    .to_request(),
            )
            .await;
        }

        let rock: Vec<BandResponse> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bands?genre=Rock")
                .to_request(),
        )
        .await;
        assert_eq!(rock.len(), 1);
        assert_eq!(rock[0].name, "Coldplay");

        let genres: Vec<String> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/bands/genres").to_request(),
        )
        .await;
        assert_eq!(genres, ["Rock", "Pop"]);
    }

    #[actix_web::test]
    async fn unknown_band_details_are_not_found() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bands/Nobody")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn toggle_like_returns_outcome_and_view() {
        let app = test::init_service(test_app()).await;
        let cookie = register_and_sign_in(&app, "ada@example.com").await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands")
                .cookie(cookie.clone())
                .set_json(band_body("ABBA", "Pop"))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands/ABBA/like?likedOnly=true")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let liked: LikeResponse = test::read_body_json(res).await;
        assert!(liked.liked);
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.bands.len(), 1);
        assert!(liked.bands[0].liked);

        let unliked: LikeResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands/ABBA/like?likedOnly=true")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert!(!unliked.liked);
        assert_eq!(unliked.likes, 0);
        assert!(unliked.bands.is_empty());
    }

    #[actix_web::test]
    async fn liked_only_is_empty_for_user_without_likes() {
        let app = test::init_service(test_app()).await;
        let cookie = register_and_sign_in(&app, "ada@example.com").await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands")
                .cookie(cookie.clone())
                .set_json(band_body("ABBA", "Pop"))
                .to_request(),
        )
        .await;

        let liked: Vec<BandResponse> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bands?likedOnly=true")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert!(liked.is_empty());

        let anonymous: Vec<BandResponse> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bands?likedOnly=true")
                .to_request(),
        )
        .await;
        assert_eq!(anonymous.len(), 1);
    }

    #[actix_web::test]
    async fn toggle_like_requires_session() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bands/ABBA/like")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn view_query_defaults_to_unfiltered() {
        assert_eq!(ViewOptions::from(ViewQuery::default()), ViewOptions::default());
    }
}
