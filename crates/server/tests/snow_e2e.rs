use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::tasks::TaskStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes;

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let store = TaskStore::with_seed_data();
    let app: Router = routes::build_snow_router(store, cors());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

const TASKS_URL: &str = "/api/now/v2/table/sc_task";

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_list_without_query_returns_all_in_seed_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}{}", app.base_url, TASKS_URL))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let numbers: Vec<&str> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["number"].as_str().unwrap())
        .collect();
    assert_eq!(
        numbers,
        vec![
            "SCTASK001000",
            "SCTASK001001",
            "SCTASK001002",
            "SCTASK001003",
            "SCTASK001004"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn e2e_filter_query_selects_exactly_one_task() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}{}", app.base_url, TASKS_URL))
        .query(&[("sysparm_query", "ci_fqdn=db01.f3.lan^u_backup_tag=mssql")])
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["sys_id"], "a1a2a3a4b5b6c7d8e9f0a1b2c3d4e5f6");
    Ok(())
}

#[tokio::test]
async fn e2e_isempty_filter_is_idempotent() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let first = c
        .get(format!("{}{}", app.base_url, TASKS_URL))
        .query(&[("sysparm_query", "ISEMPTYassigned_to^assignment_group=backup team")])
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let second = c
        .get(format!("{}{}", app.base_url, TASKS_URL))
        .query(&[("sysparm_query", "ISEMPTYassigned_to^assignment_group=backup team")])
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    assert_eq!(first, second);
    assert_eq!(first["result"].as_array().unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn e2e_unrecognized_condition_matches_nothing() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}{}", app.base_url, TASKS_URL))
        .query(&[("sysparm_query", "state=new^ORDERBYnumber")])
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["result"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn e2e_get_single_task() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .get(format!(
            "{}{}/{}",
            app.base_url, TASKS_URL, "ffffffffffffffffffffffffffffffff"
        ))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["result"]["number"], "SCTASK001000");
    assert_eq!(body["result"]["ci_fqdn"], "badhost.f3.lan");

    let res = c
        .get(format!("{}{}/{}", app.base_url, TASKS_URL, "0000"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_patch_appends_work_notes() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let url = format!(
        "{}{}/{}",
        app.base_url, TASKS_URL, "a1a2a3a4b5b6c7d8e9f0a1b2c3d4e5f6"
    );

    let res = c.patch(&url).json(&json!({"work_notes": "a"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["result"]["work_notes"], "a");

    let res = c.patch(&url).json(&json!({"work_notes": "b"})).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["result"]["work_notes"], "a\nb");

    // Untouched fields keep their stored values.
    assert_eq!(body["result"]["state"], "new");
    assert_eq!(body["result"]["assignment_group"], "backup team");
    Ok(())
}

#[tokio::test]
async fn e2e_patch_missing_task_returns_contract_error_body() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .patch(format!("{}{}/{}", app.base_url, TASKS_URL, "0000"))
        .json(&json!({"state": "closed"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!({"error": "Task not found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_dump_db_returns_full_store() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}/debug/dump_db", app.base_url))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let db = body.as_object().expect("dump object");
    assert_eq!(db.len(), 5);
    assert_eq!(
        db["a1a2a3a4b5b6c7d8e9f0a1b2c3d4e5f6"]["short_description"],
        "Provision New Backup: db01.f3.lan"
    );
    Ok(())
}
