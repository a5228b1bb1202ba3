//! Integration tests: auth gate and view models against an in-process mock
//! backend.

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};

use propcalc_api_client::ApiClient;
use propcalc_api_client::services::PolicySortField;
use propcalc_console::gate::{GateState, History, Navigation};
use propcalc_console::notify::Severity;
use propcalc_console::views::{
    AppConfigListView, ClauseEditView, ClauseListView, LoginView, PolicyListView,
    PresetFormMode, ProfileView, TariffPresetFormView, UserFormMode, UserFormView,
    UserListView,
};
use propcalc_console::{Console, Route, SubmitOutcome, ViewError};
use propcalc_core::models::{UserId, UserSummary};
use propcalc_core::roles::Role;
use propcalc_core::session::SessionStore;

use support::{MockBackend, Reply, admin, signed_in};

const CLAUSES: &str = "/api/v1/insurance-policies/admin/insurance-clauses";
const POLICIES: &str = "/api/v1/insurance-policies/admin/policies";

fn clause(id: i64, position: i32, active: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Clause {id}"),
        "tariff_number": 0.5,
        "has_tariff_number": true,
        "tariff_amount": 0,
        "position": position,
        "active": active
    })
}

fn empty_page() -> Value {
    json!({
        "policies": [],
        "pagination": {
            "currentPage": 1, "totalPages": 1, "totalItems": 0,
            "itemsPerPage": 10, "hasNextPage": false, "hasPreviousPage": false
        }
    })
}

// ---------------------------------------------------------------------------
// Auth gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_form_signs_in_and_persists_session() {
    let backend = MockBackend::start(|req| {
        assert_eq!(req.path, "/api/v1/admin/auth/login");
        Reply::json(json!({
            "token": "jwt-1",
            "user": {"id": 1, "email": "admin@example.com", "roles": ["ROLE_ADMIN"]}
        }))
    })
    .await;
    let (mut console, history) = backend.console(SessionStore::in_memory());
    assert_eq!(console.gate.navigate(Route::Clauses), Navigation::Redirect(Route::Login));

    let mut login = LoginView::new(console.notifications.clone());
    login.username = "admin@example.com".into();
    login.password = "secret".into();
    let outcome = login.submit(&mut console.gate).await;

    assert_eq!(outcome, SubmitOutcome::Saved(Route::Home));
    assert!(login.password.is_empty());
    assert_eq!(console.client.session().token().as_deref(), Some("jwt-1"));
    assert!(matches!(console.gate.state(), GateState::Authenticated(u) if u.email == "admin@example.com"));
    assert_eq!(console.gate.navigate(Route::Clauses), Navigation::Render(Route::Clauses));
    assert_eq!(history.entries(), vec![Route::Login]);
}

#[tokio::test]
async fn rejected_login_writes_nothing() {
    let backend = MockBackend::start(|_| {
        Reply::status(StatusCode::UNAUTHORIZED, Some(json!({"message": "Bad credentials"})))
    })
    .await;
    let (mut console, _) = backend.console(SessionStore::in_memory());
    console.gate.navigate(Route::Login);

    let mut login = LoginView::new(console.notifications.clone());
    login.username = "admin@example.com".into();
    login.password = "wrong".into();
    let outcome = login.submit(&mut console.gate).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ViewError::SessionExpired)));
    assert_eq!(login.error.as_deref(), Some("Invalid username or password"));
    assert!(!console.client.session().is_active());
    assert_eq!(console.gate.state(), &GateState::Unauthenticated);
    // Still on the login page, so no redirect is queued.
    assert!(!console.gate.drain_auth_failures());
}

#[tokio::test]
async fn unreachable_backend_gets_network_banner() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ApiClient::with_base_url(
        format!("http://{addr}/").parse().unwrap(),
        SessionStore::in_memory(),
    )
    .unwrap();
    let mut console = Console::with_client(client, Arc::new(History::new()));
    console.gate.navigate(Route::Login);

    let mut login = LoginView::new(console.notifications.clone());
    login.username = "admin@example.com".into();
    login.password = "secret".into();
    let outcome = login.submit(&mut console.gate).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ViewError::Network(_))));
    assert_eq!(
        login.error.as_deref(),
        Some("Could not reach the server. Please try again later.")
    );
    assert_eq!(console.notifications.last().map(|t| t.severity), Some(Severity::Error));
    assert!(!console.client.session().is_active());
}

#[tokio::test]
async fn login_form_requires_both_fields() {
    let backend = MockBackend::start(|_| Reply::empty()).await;
    let (mut console, _) = backend.console(SessionStore::in_memory());

    let mut login = LoginView::new(console.notifications.clone());
    assert_eq!(login.submit(&mut console.gate).await, SubmitOutcome::Invalid);
    assert!(login.field_errors.has("username"));
    assert!(login.field_errors.has("password"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn expired_session_during_load_redirects_to_login() {
    let backend = MockBackend::start(|_| Reply::status(StatusCode::UNAUTHORIZED, None)).await;
    let (mut console, history) = backend.console(signed_in("stale"));
    assert_eq!(console.gate.navigate(Route::Clauses), Navigation::Render(Route::Clauses));

    let mut clauses = ClauseListView::new(console.context());
    clauses.load().await;

    assert_eq!(clauses.error, Some(ViewError::SessionExpired));
    assert!(console.notifications.is_empty());
    assert!(!console.client.session().is_active());

    let failure = console.gate.next_auth_failure().await.expect("auth failure");
    assert_eq!(failure.path, CLAUSES.trim_start_matches('/'));
    assert_eq!(console.gate.state(), &GateState::Unauthenticated);
    assert_eq!(history.last(), Some(Route::Login));
}

#[tokio::test]
async fn navigation_applies_pending_auth_failures() {
    let backend = MockBackend::start(|_| Reply::status(StatusCode::UNAUTHORIZED, None)).await;
    let (mut console, history) = backend.console(signed_in("stale"));
    console.gate.navigate(Route::Users);

    let mut users = UserListView::new(console.context());
    users.load().await;

    assert_eq!(console.gate.navigate(Route::Users), Navigation::Redirect(Route::Login));
    assert_eq!(history.last(), Some(Route::Login));
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clause_list_is_sorted_by_position() {
    let backend = MockBackend::start(|_| {
        Reply::json(json!([clause(1, 3, true), clause(2, 1, true), clause(3, 2, false)]))
    })
    .await;
    let mut view = ClauseListView::new(backend.context(signed_in("t")));
    view.load().await;

    let ids: Vec<i64> = view.clauses.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert!(!view.loading);
}

#[tokio::test]
async fn always_active_clause_is_saved_active() {
    let backend = MockBackend::start(|req| match req.method {
        Method::GET => Reply::json(json!([clause(1, 1, false), clause(2, 2, true)])),
        _ => Reply::json(clause(1, 1, true)),
    })
    .await;
    let ctx = backend.context(signed_in("t"));
    let notifications = ctx.notifications.clone();
    let mut view = ClauseEditView::new(ctx, 1);
    view.load().await;
    assert!(view.active_locked());

    view.set_active(false);
    let outcome = view.submit().await;

    assert_eq!(outcome, SubmitOutcome::Saved(Route::Clauses));
    let put = backend.last();
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.path, format!("{CLAUSES}/1"));
    assert_eq!(put.body.as_ref().unwrap()["active"], true);
    assert_eq!(notifications.last().map(|t| t.severity), Some(Severity::Success));
}

#[tokio::test]
async fn toggling_the_always_active_clause_sends_nothing() {
    let backend = MockBackend::start(|_| Reply::json(json!([clause(1, 1, true)]))).await;
    let ctx = backend.context(signed_in("t"));
    let notifications = ctx.notifications.clone();
    let mut view = ClauseListView::new(ctx);
    view.load().await;

    view.toggle_active(1).await;

    assert!(backend.with_method(Method::PUT).is_empty());
    assert_eq!(notifications.last().map(|t| t.severity), Some(Severity::Info));
}

#[tokio::test]
async fn clause_edit_for_missing_id_reports_not_found() {
    let backend = MockBackend::start(|_| Reply::json(json!([clause(2, 1, true)]))).await;
    let mut view = ClauseEditView::new(backend.context(signed_in("t")), 42);
    view.load().await;

    assert!(matches!(view.error, Some(ViewError::NotFound(_))));
    assert!(view.draft.is_none());
    assert_eq!(view.submit().await, SubmitOutcome::Invalid);
}

#[tokio::test]
async fn backend_validation_keeps_draft_and_session() {
    let backend = MockBackend::start(|req| match req.method {
        Method::GET => Reply::json(json!([clause(2, 1, true)])),
        _ => Reply::status(
            StatusCode::BAD_REQUEST,
            Some(json!({"errors": ["Name is too long"]})),
        ),
    })
    .await;
    let ctx = backend.context(signed_in("t"));
    let session = ctx.client.session().clone();
    let notifications = ctx.notifications.clone();
    let mut view = ClauseEditView::new(ctx, 2);
    view.load().await;
    view.draft.as_mut().unwrap().name = "A very long name".into();

    let outcome = view.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(ViewError::Validation(vec!["Name is too long".into()]))
    );
    assert_eq!(view.draft.as_ref().unwrap().name, "A very long name");
    assert!(view.submit_error.is_some());
    assert!(session.is_active());
    assert_eq!(notifications.last().map(|t| t.message), Some("Name is too long".to_string()));
}

// ---------------------------------------------------------------------------
// Tariff presets and configs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_preset_lists_every_clause_at_zero() {
    let backend = MockBackend::start(|req| match req.method {
        Method::GET => Reply::json(json!([clause(5, 2, true), clause(4, 1, true)])),
        _ => Reply::json(json!({"id": 9, "name": "Standard", "active": true})),
    })
    .await;
    let mut view = TariffPresetFormView::new(backend.context(signed_in("t")), PresetFormMode::Create);
    view.load().await;

    let ids: Vec<i64> = view.lines.iter().map(|l| l.clause.id).collect();
    assert_eq!(ids, vec![4, 5]);
    assert!(view.lines.iter().all(|l| l.amount == "0"));

    view.name = "Standard".into();
    view.set_line_amount(1, "120");
    assert_eq!(view.total(), 120.0);
    assert_eq!(view.submit().await, SubmitOutcome::Saved(Route::TariffPresets));

    let post = backend.last();
    assert_eq!(post.method, Method::POST);
    let body = post.body.unwrap();
    assert_eq!(body["name"], "Standard");
    assert_eq!(body["active"], true);
    assert_eq!(body["tariff_preset_clauses"].as_array().unwrap().len(), 2);
    assert_eq!(body["tariff_preset_clauses"][1]["tariff_amount"], 120.0);
}

#[tokio::test]
async fn config_list_hides_clause_references() {
    let backend = MockBackend::start(|_| {
        Reply::json(json!([
            {"id": 1, "name": "CURRENCY", "value": "лв."},
            {"id": 2, "name": "EARTHQUAKE_ID", "value": 3},
            {"id": 3, "name": "TAX_PERCENTS", "value": "20", "nameBg": "ДДС"}
        ]))
    })
    .await;
    let mut view = AppConfigListView::new(backend.context(signed_in("t")));
    view.load().await;

    let ids: Vec<i64> = view.configs.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filter_changes_reset_page_and_refetch() {
    let backend = MockBackend::start(|req| {
        if req.path.ends_with("/stats") {
            Reply::status(StatusCode::INTERNAL_SERVER_ERROR, None)
        } else {
            Reply::json(empty_page())
        }
    })
    .await;
    let ctx = backend.context(signed_in("t"));
    let notifications = ctx.notifications.clone();
    let mut view = PolicyListView::new(ctx);

    view.set_page(3).await;
    assert_eq!(view.page, 3);
    view.set_search("ivan").await;
    assert_eq!(view.page, 1);
    view.set_sort_by(PolicySortField::Total).await;

    let lists: Vec<_> = backend
        .requests()
        .into_iter()
        .filter(|r| r.path == POLICIES)
        .collect();
    assert_eq!(lists.len(), 3);
    assert_eq!(
        lists[0].query.as_deref(),
        Some("page=3&limit=10&sortBy=createdAt&sortOrder=DESC")
    );
    assert_eq!(
        lists[1].query.as_deref(),
        Some("page=1&limit=10&sortBy=createdAt&sortOrder=DESC&search=ivan")
    );
    assert_eq!(
        lists[2].query.as_deref(),
        Some("page=1&limit=10&sortBy=total&sortOrder=DESC&search=ivan")
    );

    // Stats failures are logged only.
    assert!(view.stats.is_none());
    assert!(view.error.is_none());
    assert!(notifications.is_empty());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn users_json() -> Value {
    json!([
        {"id": 1, "email": "admin@example.com", "roles": ["ROLE_ADMIN"]},
        {"id": 2, "email": "agent@example.com", "roles": ["ROLE_AGENT", "ROLE_USER"]}
    ])
}

#[tokio::test]
async fn deleting_own_account_is_refused_locally() {
    let backend = MockBackend::start(|_| Reply::json(users_json())).await;
    let ctx = backend.context(signed_in("t"));
    let notifications = ctx.notifications.clone();
    let mut view = UserListView::new(ctx);
    view.load().await;

    let me = view.users[0].clone();
    assert!(!view.request_delete(&me));
    assert!(view.pending_delete().is_none());
    view.confirm_delete().await;

    assert!(backend.with_method(Method::DELETE).is_empty());
    let toast = notifications.last().unwrap();
    assert_eq!(toast.severity, Severity::Error);
    assert_eq!(toast.message, "You cannot delete your own account");
}

#[tokio::test]
async fn id_less_session_compares_email() {
    let backend = MockBackend::start(|_| Reply::json(users_json())).await;
    let session = SessionStore::in_memory();
    session
        .save(
            "t",
            &UserSummary {
                id: None,
                email: "agent@example.com".into(),
                full_name: None,
                roles: vec![Role::Agent],
            },
        )
        .unwrap();
    let mut view = UserListView::new(backend.context(session));
    view.load().await;

    let agent = view.users[1].clone();
    assert!(!view.request_delete(&agent));
    let admin_row = view.users[0].clone();
    assert!(view.request_delete(&admin_row));
}

#[tokio::test]
async fn confirmed_delete_removes_other_user_and_reloads() {
    let backend = MockBackend::start(|req| match req.method {
        Method::DELETE => Reply::empty(),
        _ => Reply::json(users_json()),
    })
    .await;
    let mut view = UserListView::new(backend.context(signed_in("t")));
    view.load().await;
    assert_eq!(view.badges(&view.users[1]), vec![Role::Agent]);

    let agent = view.users[1].clone();
    assert!(view.request_delete(&agent));
    view.confirm_delete().await;

    let deletes = backend.with_method(Method::DELETE);
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "/api/v1/admin/user-management/2");
    assert!(view.pending_delete().is_none());
    assert_eq!(backend.last().method, Method::GET);
}

#[tokio::test]
async fn promo_codes_are_managed_from_the_user_form() {
    let backend = MockBackend::start(|req| match (&req.method, req.path.as_str()) {
        (&Method::GET, "/api/v1/admin/user-management/4") => Reply::json(json!({
            "id": 4, "email": "agent@example.com", "firstName": "Ivan", "roles": ["ROLE_AGENT"]
        })),
        (&Method::GET, "/api/v1/admin/promotional-codes/user/4") => Reply::json(json!([])),
        (&Method::POST, _) => Reply::json(json!({"id": 11, "code": "SUMMER", "active": true})),
        _ => Reply::status(StatusCode::NOT_FOUND, None),
    })
    .await;
    let mut view = UserFormView::new(backend.context(signed_in("t")), UserFormMode::Edit(UserId::new("4")));
    view.load().await;
    assert_eq!(view.draft.first_name, "Ivan");
    assert!(!view.loading_codes);

    view.open_create_code(Utc::now());
    assert!(!view.save_code_form().await);
    assert!(backend.with_method(Method::POST).is_empty());

    let form = view.code_form.as_mut().unwrap();
    form.set_code("SUMMER");
    form.set_description("Summer campaign");
    form.set_discount("10");
    assert!(view.save_code_form().await);

    assert!(view.code_form.is_none());
    let post = backend.with_method(Method::POST).pop().unwrap();
    assert_eq!(post.path, "/api/v1/admin/promotional-codes");
    let body = post.body.unwrap();
    assert_eq!(body["code"], "SUMMER");
    assert_eq!(body["discountPercentage"], 10.0);
    assert_eq!(body["user"]["id"], 4);
    assert_eq!(backend.last().path, "/api/v1/admin/promotional-codes/user/4");
}

#[tokio::test]
async fn rejected_promo_code_keeps_form_open() {
    let backend = MockBackend::start(|req| match req.method {
        Method::POST => Reply::status(
            StatusCode::BAD_REQUEST,
            Some(json!({"errors": ["Code already exists"]})),
        ),
        _ => Reply::json(json!([])),
    })
    .await;
    let mut view = UserFormView::new(backend.context(signed_in("t")), UserFormMode::Edit(UserId::new("4")));
    view.open_create_code(Utc::now());
    let form = view.code_form.as_mut().unwrap();
    form.set_code("DUP");
    form.set_description("Duplicate");

    assert!(!view.save_code_form().await);
    let form = view.code_form.as_ref().unwrap();
    assert_eq!(form.errors, vec!["Code already exists".to_string()]);
    assert!(!form.saving);
}

#[tokio::test]
async fn user_edit_omits_blank_password() {
    let backend = MockBackend::start(|req| match req.method {
        Method::GET if req.path.contains("promotional-codes") => Reply::json(json!([])),
        Method::GET => Reply::json(json!({"id": 4, "email": "agent@example.com", "roles": ["ROLE_AGENT"]})),
        _ => Reply::json(json!({
            "id": 4, "email": "agent@example.com", "roles": ["ROLE_AGENT", "ROLE_OFFICE"]
        })),
    })
    .await;
    let mut view = UserFormView::new(backend.context(signed_in("t")), UserFormMode::Edit(UserId::new("4")));
    view.load().await;
    view.toggle_role(Role::Office);

    assert_eq!(view.submit().await, SubmitOutcome::Saved(Route::Users));
    let put = backend.with_method(Method::PUT).pop().unwrap();
    let body = put.body.unwrap();
    assert!(body.get("password").is_none());
    assert_eq!(body["roles"], json!(["ROLE_AGENT", "ROLE_OFFICE"]));
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_update_refreshes_cached_identity() {
    let backend = MockBackend::start(|req| match req.method {
        Method::GET => Reply::json(json!({"firstName": "Ada", "lastName": "Admin", "email": "admin@example.com"})),
        _ => Reply::json(json!({
            "message": "Profile saved",
            "user": {"email": "ada@example.com", "fullName": "Ada Lovelace"}
        })),
    })
    .await;
    let ctx = backend.context(signed_in("t"));
    let session = ctx.client.session().clone();
    let notifications = ctx.notifications.clone();
    let mut view = ProfileView::new(ctx);
    view.load().await;
    assert_eq!(view.draft().first_name, "Ada");

    view.set_email("ada@example.com");
    view.set_password("longenough");
    view.set_confirm_password("longenough");
    assert_eq!(view.submit().await, SubmitOutcome::Saved(Route::Profile));

    assert!(view.draft().password.is_empty());
    assert_eq!(view.success.as_deref(), Some("Profile saved"));
    assert_eq!(notifications.last().map(|t| t.message), Some("Profile saved".to_string()));
    let user = session.current_user().unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(user.id, admin().id);

    let put = backend.last();
    assert_eq!(put.body.unwrap()["password"], "longenough");
}

#[tokio::test]
async fn invalid_profile_is_not_sent() {
    let backend = MockBackend::start(|_| Reply::json(json!({"email": "admin@example.com"}))).await;
    let mut view = ProfileView::new(backend.context(signed_in("t")));
    view.load().await;
    view.set_password("short");
    view.set_confirm_password("short");

    assert_eq!(view.submit().await, SubmitOutcome::Invalid);
    assert!(backend.with_method(Method::PUT).is_empty());
}

// ---------------------------------------------------------------------------
// Unmount
// ---------------------------------------------------------------------------

#[tokio::test]
async fn results_after_unmount_are_dropped() {
    let backend = MockBackend::start_with_delay(Duration::from_millis(200), |_| {
        Reply::json(json!([clause(1, 1, true)]))
    })
    .await;
    let mut view = ClauseListView::new(backend.context(signed_in("t")));
    let handle = view.scope().unmount_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    view.load().await;

    assert!(view.clauses.is_empty());
    assert!(view.loading);
    assert!(!view.scope().is_mounted());

    // Later calls on an unmounted view do nothing.
    view.load().await;
    assert!(view.clauses.is_empty());
}
