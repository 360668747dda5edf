//! HTTP API server for the chat UI.
//!
//! Provides REST endpoints for asking questions and inspecting the agent.

use crate::agent::{Agent, AgentGraph};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::NarcissusError;
use crate::tools::{ToolCallRecord, ToolDefinition};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    agent: Agent,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let agent = Agent::from_settings(&settings).await?;
    let app = router(Arc::new(AppState { agent }));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Narcissus API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Chat", "POST /chat");
    Output::kv("Tools", "GET  /tools");
    Output::kv("Graph", "GET  /graph");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/tools", get(list_tools))
        .route("/graph", get(graph))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    conversation_id: String,
    iterations: usize,
    tool_calls: Vec<ToolCallRecord>,
}

#[derive(Serialize)]
struct ToolsResponse {
    tools: Vec<ToolDefinition>,
    total: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> impl IntoResponse {
    match state.agent.run(&req.message).await {
        Ok(response) => Json(ChatResponse {
            answer: response.content,
            conversation_id: response.conversation.id().to_string(),
            iterations: response.iterations,
            tool_calls: response.tool_calls,
        })
        .into_response(),
        Err(e) => {
            error!("Chat request failed: {}", e);
            let status = match e {
                NarcissusError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                NarcissusError::IterationsExhausted(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn list_tools(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools = state.agent.tool_definitions().to_vec();
    Json(ToolsResponse {
        total: tools.len(),
        tools,
    })
}

async fn graph() -> impl IntoResponse {
    Json(AgentGraph::new())
}
