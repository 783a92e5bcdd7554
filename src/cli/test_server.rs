//! In-process mock of the patients API for command tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::models::{
    Address, LoginRequest, LogoutRequest, Patient, RefreshRequest, RegisterRequest,
    RenewPasswordRequest, RequestPatient, Tokens, UpdateUserRequest,
};

pub const EMAIL: &str = "anna@example.com";
pub const PASSWORD: &str = "secret123";

#[derive(Debug, Clone)]
struct User {
    name: String,
    surname: String,
    email: String,
    password: String,
    avatar: String,
}

#[derive(Debug, Default)]
pub struct MockState {
    users: Vec<User>,
    patients: Vec<Patient>,
    access_tokens: HashSet<String>,
    refresh_tokens: HashSet<String>,
    issued: u32,
    next_id: u32,
    pub refresh_calls: u32,
    pub refresh_fails: bool,
    pub list_requests: Vec<HashMap<String, String>>,
    pub last_avatar: Option<(String, String, usize)>,
}

impl MockState {
    fn issue(&mut self) -> Tokens {
        self.issued += 1;
        let tokens = Tokens {
            access_token: format!("access-{}", self.issued),
            refresh_token: format!("refresh-{}", self.issued),
        };
        self.access_tokens.insert(tokens.access_token.clone());
        self.refresh_tokens.insert(tokens.refresh_token.clone());
        tokens
    }

    fn add_patient(&mut self, request: RequestPatient) -> String {
        self.next_id += 1;
        let id = format!("p{:03}", self.next_id);
        self.patients.push(Patient {
            id: id.clone(),
            name: request.name,
            surname: request.surname,
            phone_number: request.phone_number.to_string(),
            address: Address {
                id: Some(format!("a{:03}", self.next_id)),
                ..request.address
            },
            photos: Vec::new(),
            created_at: Some("2024-01-01T00:00:00.000Z".to_string()),
            updated_at: Some("2024-01-01T00:00:00.000Z".to_string()),
        });
        id
    }
}

/// Handle to a running mock server.
pub struct MockApi {
    pub url: String,
    state: Arc<Mutex<MockState>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockApi {
    /// Starts the server with one registered user and no patients.
    pub async fn spawn() -> Self {
        let mut state = MockState::default();
        state.users.push(User {
            name: "Anna".to_string(),
            surname: "Nowak".to_string(),
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
            avatar: String::new(),
        });
        let state = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/cms/register", post(register))
            .route("/cms/login", post(login))
            .route("/cms/refresh-token", post(refresh))
            .route("/cms/logout", post(logout))
            .route("/patients", get(list_patients).post(add_patient))
            .route(
                "/patients/{id}",
                get(get_patient).patch(edit_patient).delete(delete_patient),
            )
            .route("/users/me", get(me).put(update_me))
            .route("/users/me/avatar", put(upload_avatar).delete(delete_avatar))
            .route("/users/me/update-password", put(update_password))
            .route("/users/me/delete", axum::routing::delete(delete_account))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
            _handle: handle,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Issues a valid token pair without going through login.
    pub fn sign_in(&self) -> Tokens {
        self.state().issue()
    }

    /// Makes every issued access token invalid so the next private call is
    /// answered with 401.
    pub fn expire_access_tokens(&self) {
        self.state().access_tokens.clear();
    }

    pub fn seed_patients(&self, count: usize) -> Vec<String> {
        let mut state = self.state();
        (0..count)
            .map(|i| {
                state.add_patient(RequestPatient {
                    name: format!("Name{:02}", i + 1),
                    surname: format!("Surname{:02}", i + 1),
                    phone_number: 600_000_000 + i as u64,
                    address: Address {
                        state: "Pomorskie".to_string(),
                        city: if i % 2 == 0 { "Gdansk" } else { "Sopot" }.to_string(),
                        avenue: format!("Dluga {}", i + 1),
                        id: None,
                    },
                })
            })
            .collect()
    }

    pub fn patient_ids(&self) -> Vec<String> {
        self.state().patients.iter().map(|p| p.id.clone()).collect()
    }

    pub fn patient(&self, id: &str) -> Option<Patient> {
        self.state().patients.iter().find(|p| p.id == id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.state().users.len()
    }

    pub fn avatar(&self) -> String {
        self.state().users[0].avatar.clone()
    }

    pub fn password(&self) -> String {
        self.state().users[0].password.clone()
    }
}

type Shared = State<Arc<Mutex<MockState>>>;

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if state.access_tokens.contains(token) => Ok(()),
        _ => Err(message(StatusCode::UNAUTHORIZED, "Unauthorized")),
    }
}

async fn register(State(state): Shared, Json(body): Json<RegisterRequest>) -> Response {
    let mut state = state.lock().unwrap();
    if state.users.iter().any(|u| u.email == body.email) {
        return message(StatusCode::CONFLICT, "User already exists");
    }
    state.users.push(User {
        name: body.name,
        surname: body.surname,
        email: body.email,
        password: body.password,
        avatar: String::new(),
    });
    message(StatusCode::CREATED, "User created")
}

async fn login(State(state): Shared, Json(body): Json<LoginRequest>) -> Response {
    let mut state = state.lock().unwrap();
    let known = state
        .users
        .iter()
        .any(|u| u.email == body.email && u.password == body.password);
    if !known {
        return message(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    Json(state.issue()).into_response()
}

async fn refresh(State(state): Shared, Json(body): Json<RefreshRequest>) -> Response {
    let mut state = state.lock().unwrap();
    state.refresh_calls += 1;
    if state.refresh_fails || !state.refresh_tokens.contains(&body.refresh_token) {
        return message(StatusCode::FORBIDDEN, "Invalid refresh token");
    }
    state.issued += 1;
    let access_token = format!("access-{}", state.issued);
    state.access_tokens.insert(access_token.clone());
    Json(json!({ "accessToken": access_token })).into_response()
}

async fn logout(State(state): Shared, Json(body): Json<LogoutRequest>) -> Response {
    let mut state = state.lock().unwrap();
    state.access_tokens.remove(&body.access_token);
    state.refresh_tokens.remove(&body.refresh_token);
    message(StatusCode::OK, "Logged out")
}

fn sort_value(patient: &Patient, key: &str) -> String {
    match key {
        "surname" => patient.surname.to_lowercase(),
        "phoneNumber" => format!("{:0>20}", patient.phone_number),
        "address.state" => patient.address.state.to_lowercase(),
        "address.city" => patient.address.city.to_lowercase(),
        "address.avenue" => patient.address.avenue.to_lowercase(),
        _ => patient.name.to_lowercase(),
    }
}

fn list_item(patient: &Patient) -> Value {
    let mut value = serde_json::to_value(patient).unwrap();
    let phone: u64 = patient.phone_number.parse().unwrap_or_default();
    value["phoneNumber"] = json!(phone);
    value["__v"] = json!(0);
    value
}

async fn list_patients(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    state.list_requests.push(params.clone());

    let search = params
        .get("search")
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    let mut rows: Vec<&Patient> = state
        .patients
        .iter()
        .filter(|p| {
            search.is_empty()
                || [&p.name, &p.surname, &p.address.city, &p.address.avenue]
                    .iter()
                    .any(|f| f.to_lowercase().contains(&search))
        })
        .collect();

    let key = params.get("sortBy").map(String::as_str).unwrap_or("name");
    rows.sort_by_key(|p| sort_value(p, key));
    if params.get("sortDirection").map(String::as_str) != Some("asc") {
        rows.reverse();
    }

    let page_size: usize = params
        .get("pageSize")
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let current_page: usize = params
        .get("currentPage")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let total = rows.len();
    let data: Vec<Value> = rows
        .into_iter()
        .skip((current_page.max(1) - 1) * page_size)
        .take(page_size)
        .map(list_item)
        .collect();

    Json(json!({ "data": data, "totalItems": total })).into_response()
}

async fn add_patient(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<RequestPatient>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    state.add_patient(body);
    message(StatusCode::CREATED, "Patient created")
}

async fn get_patient(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    match state.patients.iter().find(|p| p.id == id) {
        Some(patient) => Json(json!({ "data": patient })).into_response(),
        None => message(StatusCode::NOT_FOUND, "Patient not found"),
    }
}

async fn edit_patient(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<RequestPatient>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    match state.patients.iter_mut().find(|p| p.id == id) {
        Some(patient) => {
            patient.name = body.name;
            patient.surname = body.surname;
            patient.phone_number = body.phone_number.to_string();
            patient.address.state = body.address.state;
            patient.address.city = body.address.city;
            patient.address.avenue = body.address.avenue;
            message(StatusCode::OK, "Patient updated")
        }
        None => message(StatusCode::NOT_FOUND, "Patient not found"),
    }
}

async fn delete_patient(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let before = state.patients.len();
    state.patients.retain(|p| p.id != id);
    if state.patients.len() == before {
        return message(StatusCode::NOT_FOUND, "Patient not found");
    }
    message(StatusCode::OK, "Patient deleted")
}

async fn me(State(state): Shared, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let user = &state.users[0];
    Json(json!({
        "name": user.name,
        "surname": user.surname,
        "email": user.email,
        "avatar": user.avatar,
    }))
    .into_response()
}

async fn update_me(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<UpdateUserRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let user = &mut state.users[0];
    user.name = body.name;
    user.surname = body.surname;
    user.email = body.email;
    message(StatusCode::OK, "User updated")
}

async fn upload_avatar(
    State(state): Shared,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    {
        let state = state.lock().unwrap();
        if let Err(response) = authorize(&state, &headers) {
            return response;
        }
    }

    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        upload = Some((filename, content_type, bytes));
    }

    let Some((filename, content_type, size)) = upload else {
        return message(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    if !content_type.starts_with("image/") {
        return message(StatusCode::BAD_REQUEST, "Only images are allowed");
    }

    let mut state = state.lock().unwrap();
    state.users[0].avatar = format!("/uploads/avatars/{}", filename);
    state.last_avatar = Some((filename, content_type, size));
    message(StatusCode::OK, "Avatar updated")
}

async fn delete_avatar(State(state): Shared, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    state.users[0].avatar = String::new();
    message(StatusCode::OK, "Avatar deleted")
}

async fn update_password(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<RenewPasswordRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    if body.password != body.repeated_password {
        return message(StatusCode::BAD_REQUEST, "Passwords do not match");
    }
    state.users[0].password = body.password;
    message(StatusCode::OK, "Password updated")
}

async fn delete_account(State(state): Shared, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    state.users.remove(0);
    message(StatusCode::OK, "Account deleted")
}
