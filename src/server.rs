use actix_web::http::header;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde_json::json;

use crate::algorithm::{
    aggregate_load, analyze, check_directories, detect_clashes, faculty_involved, faculty_overview, subject_summary,
    AnalysisOptions,
};
use crate::api_json::{parse_grid_update, GridUpdate, GridView, ProgramListing, ReportQuery};
use crate::config::AppConfig;
use crate::export::{clashes_to_csv, load_to_csv, ExportError};
use crate::models::{Snapshot, Weekday};
use crate::store::FlatStore;

pub const ADMIN_SECRET_HEADER: &str = "X-Admin-Secret";
pub const LOAD_CSV_FILENAME: &str = "faculty_load_distribution.csv";
pub const CLASH_CSV_FILENAME: &str = "faculty_clashes.csv";

/// Estado compartido entre workers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: FlatStore,
    pub options: AnalysisOptions,
    pub admin_secret: Option<String>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        AppState {
            store: FlatStore::new(&config.data_dir),
            options: config.analysis.clone(),
            admin_secret: config.admin_secret.clone(),
        }
    }
}

fn load_snapshot(state: &AppState) -> Result<Snapshot, HttpResponse> {
    state.store.load_snapshot().map_err(|e| {
        tracing::error!(error = %e, "failed to load data");
        HttpResponse::InternalServerError().json(json!({"error": format!("failed to load data: {}", e)}))
    })
}

/// Registers every route; shared by `run_server` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/help", web::get().to(help_handler))
        .route("/timetables", web::get().to(timetables_handler))
        .route("/timetables/{program}/{semester}", web::get().to(grid_get_handler))
        .route("/timetables/{program}/{semester}", web::put().to(grid_put_handler))
        .route("/clashes", web::get().to(clashes_handler))
        .route("/load", web::get().to(load_handler))
        .route("/faculty/{code}", web::get().to(faculty_handler))
        .route("/check", web::get().to(check_handler))
        .route("/report", web::get().to(report_handler));
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config));
    if state.admin_secret.is_none() {
        tracing::warn!("no admin secret configured, timetable editing is disabled");
    }
    tracing::info!(bind = %config.bind, data_dir = %config.data_dir.display(), "starting server");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(config.bind.as_str())?
        .run()
        .await
}

/// GET /timetables
async fn timetables_handler(state: web::Data<AppState>) -> impl Responder {
    let snapshot = match load_snapshot(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let listing: Vec<ProgramListing> = snapshot
        .timetables
        .programs()
        .iter()
        .map(|p| ProgramListing {
            program: p.name.clone(),
            semesters: p.semester_labels().into_iter().map(str::to_string).collect(),
        })
        .collect();
    HttpResponse::Ok().json(listing)
}

/// GET /timetables/{program}/{semester}
async fn grid_get_handler(state: web::Data<AppState>, path: web::Path<(String, String)>) -> impl Responder {
    let (program, semester) = path.into_inner();
    let snapshot = match load_snapshot(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let Some(grid) = snapshot.timetables.grid(&program, &semester) else {
        return HttpResponse::NotFound().json(json!({"error": format!("no timetable for {} / {}", program, semester)}));
    };
    let view = GridView {
        subjects: subject_summary(grid, &program, &semester, &snapshot.subjects),
        faculty: faculty_involved(grid, &snapshot.faculties),
        grid: grid.clone(),
        program,
        semester,
    };
    HttpResponse::Ok().json(view)
}

// compara sin cortar en el primer byte distinto
fn secrets_match(provided: &str, expected: &str) -> bool {
    let (a, b) = (provided.as_bytes(), expected.as_bytes());
    let diff = a
        .iter()
        .zip(b.iter())
        .fold(a.len() ^ b.len(), |acc, (x, y)| acc | usize::from(x ^ y));
    diff == 0
}

/// PUT /timetables/{program}/{semester}
/// Reemplaza la grilla completa y devuelve el reporte de choques actualizado.
async fn grid_put_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> impl Responder {
    let (program, semester) = path.into_inner();

    let Some(expected) = state.admin_secret.as_deref() else {
        return HttpResponse::Forbidden().json(json!({"error": "timetable editing is disabled"}));
    };
    let provided = req
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if !provided.is_some_and(|p| secrets_match(p, expected)) {
        tracing::warn!(%program, %semester, "rejected timetable edit with missing or wrong secret");
        return HttpResponse::Forbidden().json(json!({"error": "invalid admin secret"}));
    }

    let update = match std::str::from_utf8(&body).map_err(|e| e.to_string()).and_then(|text| {
        parse_grid_update(text).map_err(|e| e.to_string())
    }) {
        Ok(u) => u,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };
    let grid = match update.into_grid() {
        Ok(g) => g,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    };

    let mut timetables = match state.store.load_timetables() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "failed to load timetables");
            return HttpResponse::InternalServerError().json(json!({"error": format!("failed to load timetables: {}", e)}));
        }
    };
    let replaced = timetables.insert_grid(&program, &semester, grid).is_some();
    if let Err(e) = state.store.save_timetables(&timetables) {
        tracing::error!(error = %e, "failed to save timetables");
        return HttpResponse::InternalServerError().json(json!({"error": format!("failed to save timetables: {}", e)}));
    }
    tracing::info!(%program, %semester, replaced, "timetable saved");

    let report = detect_clashes(state.options.index(&timetables), &state.options.policy);
    HttpResponse::Ok().json(json!({
        "saved": true,
        "program": program,
        "semester": semester,
        "report": report,
    }))
}

/// GET /clashes?policy=admin|checker  (`?format=csv` descarga el CSV)
async fn clashes_handler(state: web::Data<AppState>, query: web::Query<ReportQuery>) -> impl Responder {
    let policy = match query.resolve_policy(state.options.policy) {
        Ok(p) => p,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e})),
    };
    let snapshot = match load_snapshot(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let report = detect_clashes(state.options.index(&snapshot.timetables), &policy);
    if query.wants_csv() {
        return csv_download(clashes_to_csv(&report.clashes), CLASH_CSV_FILENAME);
    }
    HttpResponse::Ok().json(json!({
        "policy": policy,
        "clear": report.is_clear(),
        "clashes": report.clashes,
        "common_subjects": report.common_subjects,
    }))
}

/// GET /load  (`?format=csv` descarga el CSV)
async fn load_handler(state: web::Data<AppState>, query: web::Query<ReportQuery>) -> impl Responder {
    let snapshot = match load_snapshot(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let ranked = aggregate_load(state.options.index(&snapshot.timetables)).ranked(&snapshot.faculties);

    if !query.wants_csv() {
        return HttpResponse::Ok().json(ranked);
    }
    csv_download(load_to_csv(&ranked), LOAD_CSV_FILENAME)
}

fn csv_download(result: Result<String, ExportError>, filename: &str) -> HttpResponse {
    match result {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)))
            .body(csv),
        Err(e) => {
            tracing::error!(error = %e, filename, "csv export failed");
            HttpResponse::InternalServerError().json(json!({"error": format!("export failed: {}", e)}))
        }
    }
}

/// GET /faculty/{code}
async fn faculty_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let code = path.into_inner();
    let snapshot = match load_snapshot(&state) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    if !snapshot.faculties.contains(&code) {
        tracing::debug!(%code, "faculty code not in directory");
    }
    HttpResponse::Ok().json(faculty_overview(&snapshot, &code, &state.options))
}

/// GET /check
async fn check_handler(state: web::Data<AppState>) -> impl Responder {
    match load_snapshot(&state) {
        Ok(snapshot) => HttpResponse::Ok().json(check_directories(&snapshot)),
        Err(resp) => resp,
    }
}

/// GET /report
async fn report_handler(state: web::Data<AppState>, query: web::Query<ReportQuery>) -> impl Responder {
    let mut options = state.options.clone();
    options.policy = match query.resolve_policy(options.policy) {
        Ok(p) => p,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e})),
    };
    match load_snapshot(&state) {
        Ok(snapshot) => HttpResponse::Ok().json(analyze(&snapshot, &options)),
        Err(resp) => resp,
    }
}

/// GET /help
async fn help_handler(state: web::Data<AppState>) -> impl Responder {
    let example = GridUpdate {
        rows: vec![
            vec!["9-10".into(), "P1 (RJ)".into(), "".into(), "L1 (AK,MN)".into(), "".into(), "".into()],
            std::iter::once("12-1".to_string())
                .chain(Weekday::ALL.iter().map(|_| "Lunch".to_string()))
                .collect(),
        ],
    };
    let help = json!({
        "description": "Faculty clash detection and teaching load over the stored timetables.",
        "endpoints": {
            "GET /timetables": "programs and their semesters",
            "GET /timetables/{program}/{semester}": "grid, subject counts and faculty involved",
            "PUT /timetables/{program}/{semester}": format!("replace a grid (header {}), returns the clash report", ADMIN_SECRET_HEADER),
            "GET /clashes": "clash report, ?policy=admin|checker, ?format=csv for a download",
            "GET /load": "ranked teaching load, ?format=csv for a download",
            "GET /faculty/{code}": "consolidated grid, per-semester views and load detail",
            "GET /check": "timetable vs directory consistency",
            "GET /report": "full analysis report, ?policy=admin|checker",
        },
        "put_example": example,
        "time_slots": state.options.time_slots,
        "editing_enabled": state.admin_secret.is_some(),
    });
    HttpResponse::Ok().json(help)
}
