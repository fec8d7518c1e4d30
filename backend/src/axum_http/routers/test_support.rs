use std::sync::Arc;

use axum::{
    Extension, Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use uuid::Uuid;

use crate::{auth::SupabaseClaims, config::config_loader};

/// Adds the config extension the `AuthUser` extractor reads.
pub fn with_config(router: Router) -> Router {
    router.layer(Extension(Arc::new(config_loader::test_config())))
}

pub fn bearer_for(user_id: Uuid) -> String {
    let config = config_loader::test_config();
    let claims = SupabaseClaims {
        sub: user_id.to_string(),
        role: "authenticated".to_string(),
        email: Some("seller@example.com".to_string()),
        aud: "authenticated".to_string(),
        exp: 9999999999,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.supabase.jwt_secret.as_bytes()),
    )
    .unwrap();

    format!("Bearer {token}")
}

pub fn authed_get(uri: &str, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", bearer_for(user_id))
        .body(Body::empty())
        .unwrap()
}

pub fn authed_post_json(uri: &str, user_id: Uuid, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", bearer_for(user_id))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
