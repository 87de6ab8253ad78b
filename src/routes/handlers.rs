use std::time::{Duration, Instant};

use bytes::Bytes;
use log::{debug, o};
use serde::Serialize;
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::BackendError;
use crate::recipe::RecipeDraft;
use crate::routes::{
    query::{IngredientQuery, SearchQuery},
    rejection::{Context, Rejection},
    segment::IdSegment,
};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($body:block) => {{
        let start = Instant::now();

        let result = $body;

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    }};
}

pub async fn create(environment: Environment, body: Bytes) -> RouteResult {
    timed!({
        let error_handler = |e: BackendError| Rejection::new(Context::create(), e);

        let draft = parse_draft(&body).map_err(error_handler)?;
        log_body(&environment, "Received recipe", &draft);

        let recipe = environment
            .service
            .create_recipe(draft)
            .await
            .map_err(error_handler)?;
        log_body(&environment, "Created recipe", &recipe);

        let reply = with_status(json(&recipe), StatusCode::CREATED);

        match recipe.id {
            Some(id) => {
                with_header(reply, "location", environment.urls.recipe(&id).as_str()).into_response()
            }
            None => reply.into_response(),
        }
    })
}

pub async fn list(environment: Environment) -> RouteResult {
    timed!({
        let recipes = environment
            .service
            .get_cocktail_recipes()
            .await
            .map_err(|e| Rejection::new(Context::list(), e))?;
        log_body(&environment, "Sending recipes", &recipes);

        json(&recipes)
    })
}

pub async fn search(environment: Environment, query: SearchQuery) -> RouteResult {
    timed!({
        let SearchQuery { q, cocktails_only } = query;
        let error_handler = |e: BackendError| Rejection::new(Context::search(q.clone()), e);

        let text = required(q.as_deref(), "search").map_err(error_handler)?;
        let cocktails_only = cocktails_only.as_deref() == Some("true");
        debug!(environment.logger, "Searching recipes..."; "query" => text, "cocktails_only" => cocktails_only);

        let recipes = environment
            .service
            .search_recipes(text, cocktails_only)
            .await
            .map_err(error_handler)?;

        json(&recipes)
    })
}

pub async fn by_ingredient(environment: Environment, query: IngredientQuery) -> RouteResult {
    timed!({
        let IngredientQuery { q } = query;
        let error_handler = |e: BackendError| Rejection::new(Context::by_ingredient(q.clone()), e);

        let ingredient = required(q.as_deref(), "ingredient").map_err(error_handler)?;
        debug!(environment.logger, "Finding recipes by ingredient..."; "ingredient" => ingredient);

        let recipes = environment
            .service
            .find_by_ingredient(ingredient)
            .await
            .map_err(error_handler)?;

        json(&recipes)
    })
}

pub async fn retrieve(environment: Environment, id: IdSegment) -> RouteResult {
    timed!({
        let id = id.into_inner();
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Retrieving recipe..."; "id" => %id);

        let recipe = environment
            .service
            .get_recipe_by_id(&id)
            .await
            .map_err(error_handler)?;

        json(&recipe)
    })
}

pub async fn update(environment: Environment, id: IdSegment, body: Bytes) -> RouteResult {
    timed!({
        let id = id.into_inner();
        let error_handler = |e: BackendError| Rejection::new(Context::update(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        let draft = parse_draft(&body).map_err(error_handler)?;

        let logger = environment.logger.new(o!("id" => id.to_string()));
        debug!(logger, "Updating recipe...");
        log_body(&environment, "Received recipe", &draft);

        let recipe = environment
            .service
            .update_recipe(&id, draft)
            .await
            .map_err(error_handler)?;
        log_body(&environment, "Updated recipe", &recipe);

        json(&recipe)
    })
}

pub async fn delete(environment: Environment, id: IdSegment) -> RouteResult {
    timed!({
        let id = id.into_inner();
        let error_handler = |e: BackendError| Rejection::new(Context::delete(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Deleting recipe..."; "id" => %id);

        environment
            .service
            .delete_recipe(&id)
            .await
            .map_err(error_handler)?;

        StatusCode::NO_CONTENT
    })
}

fn parse_id(id: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(id).map_err(|_| BackendError::InvalidId(id.to_owned()))
}

fn parse_draft(body: &[u8]) -> Result<RecipeDraft, BackendError> {
    serde_json::from_slice(body).map_err(|source| BackendError::MalformedBody { source })
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, BackendError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(BackendError::MissingQuery(name))
}

/// Body logging is a development aid and stays off unless configured.
fn log_body(environment: &Environment, message: &'static str, body: &impl Serialize) {
    if !environment.config.log_bodies {
        return;
    }

    match serde_json::to_string(body) {
        Ok(body) => debug!(environment.logger, "{}", message; "body" => body),
        Err(e) => debug!(environment.logger, "{}", message; "body_error" => %e),
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
