mod tweets;

use std::sync::Arc;

use axum::Router;
use tracing::error;
use xtweet_core::ServiceError;

use crate::service::{TweetError, TweetService};

/// Build the tweet module router.
///
/// Routes:
/// - `GET  /api/tweets`              list, newest first
/// - `POST /api/tweets`              create
/// - `GET  /api/tweets/{id}`         get one
/// - `POST /api/tweets/like/{id}`    like
/// - `POST /api/tweets/dislike/{id}` dislike
pub fn router(service: Arc<TweetService>) -> Router {
    tweets::router(service)
}

/// Convert a domain error into its HTTP form. `action` names what the
/// handler was doing ("fetching tweet", ...) and only appears in the
/// message of unexpected failures, whose detail goes to the log.
pub(crate) fn to_service_error(err: TweetError, action: &str) -> ServiceError {
    match err {
        TweetError::Validation(msg) => ServiceError::Validation(msg),
        TweetError::NotFound(_) => ServiceError::NotFound("Tweet not found".into()),
        TweetError::InvalidId(_) => ServiceError::InvalidId("Invalid tweet ID format".into()),
        TweetError::AlreadyReacted(reaction) => ServiceError::AlreadyReacted(format!(
            "You already {} this tweet",
            reaction.past_tense()
        )),
        err @ (TweetError::Storage(_) | TweetError::Internal(_)) => {
            error!(error = %err, "error while {action}");
            ServiceError::Internal(format!("Server error while {action}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reaction;

    #[test]
    fn maps_domain_errors() {
        assert_eq!(
            to_service_error(TweetError::NotFound("x".into()), "fetching tweet"),
            ServiceError::NotFound("Tweet not found".into())
        );
        assert_eq!(
            to_service_error(TweetError::AlreadyReacted(Reaction::Like), "liking tweet"),
            ServiceError::AlreadyReacted("You already liked this tweet".into())
        );
        assert_eq!(
            to_service_error(TweetError::Storage("disk on fire".into()), "creating tweet"),
            ServiceError::Internal("Server error while creating tweet".into())
        );
    }
}
