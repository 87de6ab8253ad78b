use warp::reject;
use warp::reply::{json, Reply};
use warp::Filter;

use super::response::SuccessResponse;

pub fn make_health_route(
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    warp::path!("api" / "health").and(warp::get()).map(|| {
        json(&SuccessResponse::Health {
            status: "healthy",
            database: "connected",
        })
    })
}
