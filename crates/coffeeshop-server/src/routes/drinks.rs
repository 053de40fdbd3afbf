//! Drink menu routes.

use crate::error::{ApiError, ApiResult, ErrorContext};
use crate::middleware::Auth;
use crate::models::{DrinkChanges, DrinkLong, DrinkShort, NewDrink};
use crate::response::{DeletedResponse, DrinksResponse};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Request, State,
    },
    handler::Handler,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use tracing::info;

/// Create the drinks router. Every route except the public menu is guarded
/// by its permission before the request body is read. Routes taking a drink
/// id reject a non-numeric id with 404 before the token is looked at.
pub fn router(state: &AppState) -> Router<AppState> {
    let authorizer = &state.authorizer;

    Router::new()
        .route(
            "/drinks",
            get(list_drinks).post(create_drink.layer(authorizer.require("post:drinks"))),
        )
        .route(
            "/drinks-detail",
            get(list_drink_details.layer(authorizer.require("get:drinks-detail"))),
        )
        .route(
            "/drinks/:id",
            patch(update_drink.layer(authorizer.require("patch:drinks")))
                .delete(delete_drink.layer(authorizer.require("delete:drinks")))
                .route_layer(middleware::from_fn(require_numeric_id)),
        )
}

async fn require_numeric_id(
    id: Result<Path<i64>, PathRejection>,
    request: Request,
    next: Next,
) -> Response {
    match id {
        Ok(_) => next.run(request).await,
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

/// `GET /drinks`: the public menu.
async fn list_drinks(State(state): State<AppState>) -> ApiResult<Json<DrinksResponse<DrinkShort>>> {
    let drinks = state.drinks.list().await?;
    Ok(Json(DrinksResponse::new(
        drinks.iter().map(|drink| drink.short()).collect(),
    )))
}

/// `GET /drinks-detail`
async fn list_drink_details(
    State(state): State<AppState>,
) -> ApiResult<Json<DrinksResponse<DrinkLong>>> {
    let drinks = state.drinks.list().await?;
    Ok(Json(DrinksResponse::new(
        drinks.iter().map(|drink| drink.long()).collect(),
    )))
}

/// `POST /drinks`
async fn create_drink(
    State(state): State<AppState>,
    Auth(claims): Auth,
    payload: Result<Json<NewDrink>, JsonRejection>,
) -> ApiResult<Json<DrinksResponse<DrinkLong>>> {
    let Json(body) = payload?;

    let title = body
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ApiError::UnprocessableEntity("title is required".into()))?;
    let recipe = body
        .recipe
        .ok_or_else(|| ApiError::UnprocessableEntity("recipe is required".into()))?
        .into_vec();

    let drink = state.drinks.create(&title, &recipe).await?;
    info!(id = drink.id, title = %drink.title, sub = ?claims.sub, "Drink added to menu");

    Ok(Json(DrinksResponse::new(vec![drink.long()])))
}

/// `PATCH /drinks/:id`
async fn update_drink(
    State(state): State<AppState>,
    Auth(claims): Auth,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DrinkChanges>, JsonRejection>,
) -> ApiResult<Json<DrinksResponse<DrinkLong>>> {
    let Path(id) = id?;

    state
        .drinks
        .get(id)
        .await?
        .not_found(format!("drink {id} not found"))?;

    let Json(changes) = payload?;
    if matches!(&changes.title, Some(title) if title.trim().is_empty()) {
        return Err(ApiError::UnprocessableEntity("title must not be empty".into()));
    }

    let drink = state
        .drinks
        .update(id, changes)
        .await?
        .not_found(format!("drink {id} not found"))?;
    info!(id, sub = ?claims.sub, "Drink updated");

    Ok(Json(DrinksResponse::new(vec![drink.long()])))
}

/// `DELETE /drinks/:id`
async fn delete_drink(
    State(state): State<AppState>,
    Auth(claims): Auth,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Path(id) = id?;

    if !state.drinks.delete(id).await? {
        return Err(ApiError::NotFound(format!("drink {id} not found")));
    }
    info!(id, sub = ?claims.sub, "Drink removed from menu");

    Ok(Json(DeletedResponse::new(id)))
}
