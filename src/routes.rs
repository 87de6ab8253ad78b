use std::sync::Arc;

use log::{debug, error, info, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, Reply, WithStatus};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::BackendError;

pub mod health;
mod handlers;
mod query;
mod rejection;
mod response;
mod segment;

pub use internal::*;

/// The largest recipe document to accept. Real recipes are a few
/// kilobytes at most.
const MAX_CONTENT_LENGTH: u64 = 1024 * 1024;

const ALLOWED_HEADERS: &[&str] = &[
    "accept",
    "accept-language",
    "authorization",
    "cache-control",
    "content-language",
    "content-type",
    "origin",
    "x-requested-with",
];

/// All API routes with error recovery, CORS and request logging.
pub fn make_routes(
    environment: Environment,
    allowed_origins: &[String],
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + Send + Sync + 'static {
    let logger = environment.logger.clone();
    let access_logger = environment.logger.clone();

    let routes = make_create_route(environment.clone())
        .or(make_list_route(environment.clone()))
        .or(make_search_route(environment.clone()))
        .or(make_by_ingredient_route(environment.clone()))
        .or(make_retrieve_route(environment.clone()))
        .or(make_update_route(environment.clone()))
        .or(make_delete_route(environment))
        .or(health::make_health_route())
        .recover(move |r| format_rejection(logger.clone(), r));

    let cors = warp::cors()
        .allow_origins(allowed_origins.iter().map(String::as_str))
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(ALLOWED_HEADERS.iter().copied());

    let access_log = warp::log::custom(move |request: warp::log::Info<'_>| {
        info!(access_logger, "Handled request";
            "method" => %request.method(),
            "path" => request.path(),
            "status" => request.status().as_u16(),
            "elapsed_ms" => request.elapsed().as_secs_f64() * 1000.0,
            "remote" => ?request.remote_addr());
    });

    routes.with(cors).with(access_log)
}

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        let status = status_code_for(e);

        if status.is_server_error() {
            error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status, "message" => %r.error);
        } else {
            debug!(logger, "Request rejected"; "context" => ?r.context, "status" => %status, "message" => %r.error);
        }

        let flattened = r.flatten(status);

        return Ok(with_status(json(&flattened), status));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        InvalidRecipe | InvalidId(..) | MalformedBody { .. } | MissingQuery(..) => {
            StatusCode::BAD_REQUEST
        }
        RecipeNotFound(..) => StatusCode::NOT_FOUND,
        Unauthorized => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::body::{bytes, content_length_limit};
    use warp::filters::BoxedFilter;
    use warp::Filter;
    use warp::Reply;
    use warp::{delete, get as g, post, put, query};

    use super::{handlers, query as q, segment::IdSegment, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any().map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_create_route => create, rt; warp::path!("api" / "recipes"), post(), content_length_limit(MAX_CONTENT_LENGTH), bytes());
    route!(make_list_route => list, rt; warp::path!("api" / "recipes"), g());
    route!(make_search_route => search, rt; warp::path!("api" / "recipes" / "search"), g(), query::<q::SearchQuery>());
    route!(make_by_ingredient_route => by_ingredient, rt; warp::path!("api" / "recipes" / "by-ingredient"), g(), query::<q::IngredientQuery>());
    route!(make_retrieve_route => retrieve, rt; warp::path!("api" / "recipes" / IdSegment), g());
    route!(make_update_route => update, rt; warp::path!("api" / "recipes" / IdSegment), put(), content_length_limit(MAX_CONTENT_LENGTH), bytes());
    route!(make_delete_route => delete, rt; warp::path!("api" / "recipes" / IdSegment), delete());
}
