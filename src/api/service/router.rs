use axum::routing::get;

use super::{State, endpoints};

pub fn router(state: State) -> axum::Router {
    axum::Router::new()
        .route("/api/markers", get(endpoints::markers))
        .route("/api/nearest", get(endpoints::nearest))
        .route("/api/region", get(endpoints::region))
        .with_state(state)
}
