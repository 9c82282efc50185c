//! Light/dark theme preference, kept in the session cookie so it survives
//! reloads without an account.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ApiResult;
use crate::domain::error::ErrorDto;
use crate::inbound::http::session::{SessionContext, Theme};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// Current theme; `light` when never set.
#[utoipa::path(
    get,
    path = "/api/v1/theme",
    responses((status = 200, description = "Current theme", body = ThemeBody)),
    tags = ["preferences"],
    operation_id = "getTheme",
    security([])
)]
#[get("/theme")]
pub async fn get_theme(session: SessionContext) -> web::Json<ThemeBody> {
    web::Json(ThemeBody {
        theme: session.theme(),
    })
}

/// Store a theme for the rest of the session.
#[utoipa::path(
    put,
    path = "/api/v1/theme",
    request_body = ThemeBody,
    responses(
        (status = 200, description = "Theme stored", body = ThemeBody),
        (status = 400, description = "Unknown theme", body = ErrorDto)
    ),
    tags = ["preferences"],
    operation_id = "setTheme",
    security([])
)]
#[put("/theme")]
pub async fn set_theme(
    session: SessionContext,
    payload: web::Json<ThemeBody>,
) -> ApiResult<web::Json<ThemeBody>> {
    let body = payload.into_inner();
    session.persist_theme(body.theme)?;
    Ok(web::Json(body))
}
