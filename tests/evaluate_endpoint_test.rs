use axum::http::StatusCode;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use tradeup_ev::api::{self, AppState};
use tradeup_ev::config::Config;
use tradeup_ev::domain::{Catalog, Rarity, SkinCatalogItem};
use tradeup_ev::pricing::{open_price_cache, PriceCache, PriceTable};

struct TestApp {
    app: axum::Router,
    cache: Arc<dyn PriceCache>,
    _temp: TempDir,
}

fn test_config() -> Config {
    Config {
        port: 0,
        catalog_path: PathBuf::from("skins.csv"),
        fees_rate: 0.02,
        local_prices_path: None,
        price_store_path: None,
        batch_concurrency: 1,
    }
}

fn test_catalog() -> Catalog {
    Catalog::new(vec![
        SkinCatalogItem::new("MP9 | Hydra", "Gamma 2", Rarity::Restricted, 0.0, 1.0),
        SkinCatalogItem::new("AUG | Syd Mead", "Gamma 2", Rarity::Classified, 0.0, 0.5),
        SkinCatalogItem::new("FAMAS | Roll Cage", "Gamma 2", Rarity::Classified, 0.0, 1.0),
    ])
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let cache = open_price_cache(&temp_dir.path().join("prices.json"))
        .await
        .unwrap();

    let mut prices = PriceTable::new();
    prices.insert("MP9 | Hydra (Battle-Scarred)", 150);
    prices.insert("AUG | Syd Mead (Field-Tested)", 1400);
    prices.insert("FAMAS | Roll Cage (Battle-Scarred)", 900);

    let state = AppState::new(
        Arc::new(test_catalog()),
        prices,
        Some(cache.clone()),
        test_config(),
    );

    TestApp {
        app: api::create_router(state),
        cache,
        _temp: temp_dir,
    }
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn contract_body(n: usize, float_value: f64) -> serde_json::Value {
    let entries: Vec<_> = (0..n)
        .map(|_| {
            serde_json::json!({
                "name": "MP9 | Hydra",
                "collection": "Gamma 2",
                "rarity": "restricted",
                "floatValue": float_value,
            })
        })
        .collect();
    serde_json::json!({ "entries": entries })
}

#[tokio::test]
async fn test_health_and_ready() {
    let test_app = setup_test_app().await;

    let (status, body) = request(test_app.app.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = request(test_app.app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["catalogItems"], 3);
    assert_eq!(body["prices"], 3);
}

#[tokio::test]
async fn test_evaluate_contract_returns_camel_case_result() {
    let test_app = setup_test_app().await;

    let (status, body) = request(
        test_app.app,
        "POST",
        "/v1/contracts/evaluate",
        Some(contract_body(10, 0.5)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["rarity"], "restricted");
    assert_eq!(body["stattrak"], false);
    assert_eq!(body["totalInputsCostCents"], 1500);
    assert_eq!(body["feesRate"], 0.02);
    assert_eq!(body["decision"], "not_profitable");

    let outcomes = body["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["name"], "AUG | Syd Mead");
    assert_eq!(outcomes[0]["prob"], 0.5);
    assert_eq!(outcomes[0]["outFloat"], 0.25);
    assert_eq!(outcomes[0]["wear"], "Field-Tested");
    assert_eq!(outcomes[0]["priceCents"], 1400);
    assert_eq!(outcomes[1]["wear"], "Battle-Scarred");

    // 0.5 * 1400 + 0.5 * 900
    let ev_gross = body["evGrossCents"].as_f64().unwrap();
    assert!((ev_gross - 1150.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_evaluate_fee_override() {
    let test_app = setup_test_app().await;

    let mut payload = contract_body(10, 0.5);
    payload["feesRate"] = serde_json::json!(0.0);
    let (status, body) = request(test_app.app.clone(), "POST", "/v1/contracts/evaluate", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feesRate"], 0.0);
    assert_eq!(body["evNetCents"], body["evGrossCents"]);

    let mut payload = contract_body(10, 0.5);
    payload["feesRate"] = serde_json::json!(1.5);
    let (status, _) = request(test_app.app, "POST", "/v1/contracts/evaluate", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_evaluate_structural_errors_are_bad_requests() {
    let test_app = setup_test_app().await;

    let (status, body) = request(
        test_app.app.clone(),
        "POST",
        "/v1/contracts/evaluate",
        Some(contract_body(9, 0.5)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("got 9"));

    let mut payload = contract_body(10, 0.5);
    payload["entries"][0]["name"] = serde_json::json!("Unknown | Skin");
    let (status, body) = request(test_app.app, "POST", "/v1/contracts/evaluate", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown | Skin"));
}

#[tokio::test]
async fn test_catalog_wears() {
    let test_app = setup_test_app().await;

    let (status, body) = request(
        test_app.app.clone(),
        "GET",
        "/v1/catalog/wears?name=AUG%20%7C%20Syd%20Mead&collection=Gamma%202",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["floatMax"], 0.5);
    assert_eq!(
        body["wears"],
        serde_json::json!(["Factory New", "Minimal Wear", "Field-Tested", "Well-Worn", "Battle-Scarred"])
    );

    let (status, _) = request(
        test_app.app,
        "GET",
        "/v1/catalog/wears?name=Nope&collection=Gamma%202",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_then_get_prices() {
    let test_app = setup_test_app().await;

    let (status, body) = request(
        test_app.app.clone(),
        "PUT",
        "/v1/prices",
        Some(serde_json::json!({
            "prices": [
                {"marketHashName": "StatTrak™ MP9 | Hydra (Minimal Wear)", "priceCents": 700}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);
    assert_eq!(
        test_app.cache.get("StatTrak™ MP9 | Hydra (Minimal Wear)").await.unwrap(),
        Some(700)
    );

    let (status, body) = request(
        test_app.app.clone(),
        "GET",
        "/v1/prices?name=MP9%20%7C%20Hydra&wear=mw&stattrak=true",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["marketHashName"], "StatTrak™ MP9 | Hydra (Minimal Wear)");
    assert_eq!(body["priceCents"], 700);

    let (status, body) = request(
        test_app.app.clone(),
        "GET",
        "/v1/prices?name=MP9%20%7C%20Hydra&wear=Well-Worn",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["priceCents"].is_null());

    let (status, _) = request(
        test_app.app,
        "PUT",
        "/v1/prices",
        Some(serde_json::json!({"prices": [{"marketHashName": "no wear here", "priceCents": 5}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_evaluate_accepts_catalog_rarity_spellings() {
    let test_app = setup_test_app().await;

    let mut payload = contract_body(10, 0.5);
    for entry in payload["entries"].as_array_mut().unwrap() {
        entry["rarity"] = serde_json::json!("Restricted Grade");
    }
    let (status, body) = request(test_app.app, "POST", "/v1/contracts/evaluate", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rarity"], "restricted");
    assert_eq!(body["totalInputsCostCents"], 1500);
}
