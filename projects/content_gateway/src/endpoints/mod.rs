pub mod common;

pub mod content {
    pub mod read {
        pub mod index;
    }
    pub mod save {
        pub mod index;
    }
}

pub mod images {
    pub mod read {
        pub mod index;
    }
    pub mod upload {
        pub mod index;
    }
}

pub mod health {
    pub mod index;
}

use axum::{
    http::Method,
    routing::{get, post, MethodRouter},
    Extension, Router,
};

use crate::content::ContentGateway;
use common::{cors_for, method_not_allowed};

/// Adds the 405 fallback and CORS handling (including `OPTIONS`) to a route.
fn guarded(route: MethodRouter, allowed: Method) -> MethodRouter {
    let rejected = allowed.clone();
    route
        .fallback(move || method_not_allowed(rejected.clone()))
        .layer(cors_for(allowed))
}

pub fn router(gateway: ContentGateway) -> Router {
    Router::new()
        .route("/content", guarded(get(content::read::index::handler), Method::GET))
        .route(
            "/get-content",
            guarded(get(content::read::index::totals_handler), Method::GET),
        )
        .route("/images", guarded(get(images::read::index::handler), Method::GET))
        .route("/upload", guarded(post(images::upload::index::handler), Method::POST))
        .route(
            "/save-content",
            guarded(post(content::save::index::handler), Method::POST),
        )
        .route("/health", get(health::index::handler))
        .layer(Extension(gateway))
}
