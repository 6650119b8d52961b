use actix_web::{test, web, App};
use serde_json::{json, Value};
use tempfile::TempDir;

use quickslot::algorithm::AnalysisOptions;
use quickslot::logging;
use quickslot::server::{configure, AppState, ADMIN_SECRET_HEADER};
use quickslot::store::FlatStore;

const SECRET: &str = "s3cret";

fn seeded_state(admin_secret: Option<&str>) -> (TempDir, AppState) {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("timetable.json"),
        r#"{
            "CS": {"Semester I": [["10-11", "P1 (RJ)", "", "", "", ""]]},
            "IT": {"Semester I": [["10-11", "P2 (RJ)", "", "", "", ""]]}
        }"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("faculties.json"), r#"{"RJ": "Dr. Joshi"}"#).unwrap();
    let state = AppState {
        store: FlatStore::new(dir.path()),
        options: AnalysisOptions::default(),
        admin_secret: admin_secret.map(str::to_string),
    };
    (dir, state)
}

fn clean_rows() -> Value {
    json!({"rows": [["10-11", "", "P2 (RJ)", "", "", ""]]})
}

#[actix_web::test]
async fn clashes_endpoint_reports_the_double_booking() {
    let (_dir, state) = seeded_state(None);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/clashes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["clear"], json!(false));
    assert_eq!(body["clashes"][0]["faculty"], json!("RJ"));
    assert_eq!(body["clashes"][0]["day"], json!("MON"));

    let req = test::TestRequest::get().uri("/clashes?format=csv").to_request();
    let text = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert_eq!(text.lines().nth(1), Some("RJ,CS,Semester I,P1,IT,Semester I,P2,MON,10-11"));

    let req = test::TestRequest::get().uri("/clashes?policy=nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn put_requires_configured_and_matching_secret() {
    let (_dir, state) = seeded_state(None);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;
    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header((ADMIN_SECRET_HEADER, SECRET))
        .set_json(clean_rows())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let (_dir, state) = seeded_state(Some(SECRET));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;
    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .set_json(clean_rows())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header((ADMIN_SECRET_HEADER, "wrong"))
        .set_json(clean_rows())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn put_rejects_short_rows_and_saves_valid_grid() {
    let (dir, state) = seeded_state(Some(SECRET));
    let store = state.store.clone();
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header((ADMIN_SECRET_HEADER, SECRET))
        .set_json(json!({"rows": [["10-11", "P2 (RJ)"]]}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header((ADMIN_SECRET_HEADER, SECRET))
        .set_json(clean_rows())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["saved"], json!(true));
    assert_eq!(body["report"]["clashes"], json!([]));

    let saved = store.load_timetables().unwrap();
    assert_eq!(
        saved.grid("IT", "Semester I").and_then(|g| g.cell(0, quickslot::models::Weekday::Tue)),
        Some("P2 (RJ)")
    );
    drop(dir);
}

#[actix_web::test]
async fn load_csv_download() {
    let (_dir, state) = seeded_state(None);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/load?format=csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("faculty_load_distribution.csv"));
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert_eq!(text, "Faculty Code,Name,Total Hours/Week\nRJ,Dr. Joshi,2\n");
}

#[actix_web::test]
async fn grid_and_faculty_views() {
    let (_dir, state) = seeded_state(None);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/timetables").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["program"], json!("CS"));
    assert_eq!(body[1]["semesters"], json!(["Semester I"]));

    let req = test::TestRequest::get().uri("/timetables/CS/Semester%20I").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["subjects"][0]["code"], json!("P1"));
    assert_eq!(body["subjects"][0]["name"], json!("Unknown"));
    assert_eq!(body["faculty"][0]["name"], json!("Dr. Joshi"));

    let req = test::TestRequest::get().uri("/timetables/EE/Semester%20I").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::get().uri("/faculty/RJ").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["load"]["total_hours"], json!(2));
    assert_eq!(body["consolidated"][0][0], json!("10-11"));
    assert_eq!(body["consolidated"][0][1], json!("P2 (RJ)"));
    assert_eq!(body["semesters"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["clashes"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn report_check_and_help() {
    let (_dir, state) = seeded_state(None);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/report?policy=checker").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["policy"]["threshold"], json!(0.85));
    assert_eq!(body["clashes"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["load"][0]["hours"], json!(2));
    assert!(body["generated_at"].is_string());

    let req = test::TestRequest::get().uri("/check").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unknown_faculty"], json!([]));
    assert_eq!(body["semesters"][0]["missing"][0]["code"], json!("P1"));

    let req = test::TestRequest::get().uri("/help").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["editing_enabled"], json!(false));
    assert_eq!(body["time_slots"].as_array().map(Vec::len), Some(8));
}

#[actix_web::test]
async fn secret_is_checked_before_the_body() {
    let (_dir, state) = seeded_state(Some(SECRET));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header((ADMIN_SECRET_HEADER, "s3cre"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::put()
        .uri("/timetables/IT/Semester%20I")
        .insert_header((ADMIN_SECRET_HEADER, SECRET))
        .set_payload("{not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}
