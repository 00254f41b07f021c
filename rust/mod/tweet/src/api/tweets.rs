use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use xtweet_core::{ClientIp, ServiceError};

use super::to_service_error;
use crate::model::{CreateTweet, ReactionCounts, ReactionResponse, TweetView};
use crate::service::TweetService;

type ServiceState = Arc<TweetService>;

pub fn router(service: Arc<TweetService>) -> Router {
    Router::new()
        .route("/api/tweets", get(list_tweets).post(create_tweet))
        .route("/api/tweets/{id}", get(get_tweet))
        .route("/api/tweets/like/{id}", post(like_tweet))
        .route("/api/tweets/dislike/{id}", post(dislike_tweet))
        .with_state(service)
}

// ---------------------------------------------------------------------------
// GET /api/tweets
// ---------------------------------------------------------------------------

async fn list_tweets(
    State(service): State<ServiceState>,
) -> Result<Json<Vec<TweetView>>, ServiceError> {
    let tweets = service
        .list()
        .map_err(|e| to_service_error(e, "fetching tweets"))?;
    Ok(Json(tweets))
}

// ---------------------------------------------------------------------------
// GET /api/tweets/{id}
// ---------------------------------------------------------------------------

async fn get_tweet(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<TweetView>, ServiceError> {
    let tweet = service
        .get_by_id(&id)
        .map_err(|e| to_service_error(e, "fetching tweet"))?;
    Ok(Json(tweet))
}

// ---------------------------------------------------------------------------
// POST /api/tweets
// ---------------------------------------------------------------------------

async fn create_tweet(
    State(service): State<ServiceState>,
    payload: Result<Json<CreateTweet>, JsonRejection>,
) -> Result<(StatusCode, Json<TweetView>), ServiceError> {
    let Json(input) = payload.map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;
    let tweet = service
        .create(input)
        .map_err(|e| to_service_error(e, "creating tweet"))?;
    Ok((StatusCode::CREATED, Json(tweet)))
}

// ---------------------------------------------------------------------------
// POST /api/tweets/like/{id}, POST /api/tweets/dislike/{id}
// ---------------------------------------------------------------------------

fn reaction_response(message: &str, counts: ReactionCounts) -> Json<ReactionResponse> {
    Json(ReactionResponse {
        message: message.to_string(),
        like: counts.like,
        dislike: counts.dislike,
    })
}

async fn like_tweet(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
    ClientIp(client): ClientIp,
) -> Result<Json<ReactionResponse>, ServiceError> {
    let counts = service
        .like(&id, &client)
        .map_err(|e| to_service_error(e, "liking tweet"))?;
    Ok(reaction_response("Tweet liked successfully", counts))
}

async fn dislike_tweet(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
    ClientIp(client): ClientIp,
) -> Result<Json<ReactionResponse>, ServiceError> {
    let counts = service
        .dislike(&id, &client)
        .map_err(|e| to_service_error(e, "disliking tweet"))?;
    Ok(reaction_response("Tweet disliked successfully", counts))
}
