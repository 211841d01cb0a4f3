#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct StartResponse {
    schema_version: String,
    status: SessionStatus,
    view: ScenarioView,
}

#[derive(Debug, Serialize)]
struct ElapsedResponse {
    schema_version: String,
    elapsed_seconds: Option<f64>,
    status: SessionStatus,
}

#[derive(Debug, Deserialize)]
struct DecideRequest {
    side: Side,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_status(State(state): State<AppState>) -> Json<SessionStatus> {
    let api = state.inner.lock().await;
    Json(api.status())
}

/// An empty body replays the loaded dataset; a JSON body (bare array or
/// `{"scenarios": [...]}`) replaces it first.
async fn start_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartResponse>, HttpApiError> {
    let scenarios = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let set: ScenarioSet = serde_json::from_slice(&body).map_err(|err| {
            HttpApiError::invalid_request("scenario dataset body is not valid json", Some(err.to_string()))
        })?;
        Some(set.into_scenarios())
    };

    let mut api = state.inner.lock().await;
    let view = match scenarios {
        Some(scenarios) => api.start_with(scenarios)?,
        None => api.start()?,
    };

    Ok(Json(StartResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        status: api.status(),
        view,
    }))
}

async fn get_current(State(state): State<AppState>) -> Result<Json<ScenarioView>, HttpApiError> {
    let api = state.inner.lock().await;
    Ok(Json(api.current()?))
}

async fn get_elapsed(State(state): State<AppState>) -> Json<ElapsedResponse> {
    let api = state.inner.lock().await;
    Json(ElapsedResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        elapsed_seconds: api.elapsed_seconds(),
        status: api.status(),
    })
}

async fn decide(
    State(state): State<AppState>,
    Json(request): Json<DecideRequest>,
) -> Result<Json<DecisionOutcome>, HttpApiError> {
    let mut api = state.inner.lock().await;
    Ok(Json(api.decide(request.side)?))
}

async fn advance(State(state): State<AppState>) -> Result<Json<AdvanceOutcome>, HttpApiError> {
    let mut api = state.inner.lock().await;
    Ok(Json(api.advance()?))
}

async fn get_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisReport>, HttpApiError> {
    let api = state.inner.lock().await;
    Ok(Json(api.analysis()?))
}

async fn reset_session(State(state): State<AppState>) -> Json<SessionStatus> {
    let mut api = state.inner.lock().await;
    Json(api.reset())
}
