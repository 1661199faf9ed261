pub mod endpoints;
pub mod router;
pub mod types;

use std::sync::Arc;

use axum::Json;
use axum::response::{IntoResponse, Response};
use reqwest::StatusCode;

use crate::api::{kakao, store};
use crate::geocode::Resolver;

pub type KakaoResolver = Resolver<kakao::Client>;

#[derive(Clone)]
pub struct State {
    pub store: store::Client,
    pub kakao: kakao::Client,
    pub resolver: Arc<KakaoResolver>,
}

impl State {
    pub fn new(store: store::Client, kakao: kakao::Client, city_prefix: impl Into<String>) -> Self {
        let resolver = Resolver::new(kakao.clone(), city_prefix);

        Self {
            store,
            kakao,
            resolver: Arc::new(resolver),
        }
    }
}

impl axum::extract::FromRef<State> for store::Client {
    fn from_ref(input: &State) -> Self {
        input.store.clone()
    }
}

impl axum::extract::FromRef<State> for kakao::Client {
    fn from_ref(input: &State) -> Self {
        input.kakao.clone()
    }
}

impl axum::extract::FromRef<State> for Arc<KakaoResolver> {
    fn from_ref(input: &State) -> Self {
        input.resolver.clone()
    }
}

impl IntoResponse for types::ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl types::ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    fn upstream(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::BAD_GATEWAY,
        }
    }
}
