use axum::extract::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    status: String,
}

pub async fn check() -> Json<Health> {
    Json(Health {
        status: "ok".into(),
    })
}

#[tokio::test]
async fn reports_ok() {
    let Json(health) = check().await;
    assert_eq!(serde_json::to_value(health).unwrap(), serde_json::json!({"status": "ok"}));
}
