use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Shared secret the test app is configured with.
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

fn sign(claims: serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// `Authorization` header value for a valid one-hour token.
pub fn bearer(user_id: Uuid) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    format!("Bearer {}", sign(serde_json::json!({ "sub": user_id, "exp": exp })))
}

pub fn expired_bearer(user_id: Uuid) -> String {
    let exp = chrono::Utc::now().timestamp() - 3600;
    format!("Bearer {}", sign(serde_json::json!({ "sub": user_id, "exp": exp })))
}
