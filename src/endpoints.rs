//! Paths of the remote API, relative to its base URL.

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const REGISTER: &str = "/cms/register";
pub const LOGIN: &str = "/cms/login";
pub const REFRESH_TOKEN: &str = "/cms/refresh-token";
pub const LOGOUT: &str = "/cms/logout";

pub const PATIENTS: &str = "/patients";

pub const ME: &str = "/users/me";
pub const AVATAR: &str = "/users/me/avatar";
pub const UPDATE_PASSWORD: &str = "/users/me/update-password";
pub const DELETE_ACCOUNT: &str = "/users/me/delete";

/// Multipart field carrying the avatar image.
pub const AVATAR_FIELD: &str = "file";

pub fn patient(id: &str) -> String {
    format!("{}/{}", PATIENTS, id)
}

/// Joins a base URL and an absolute path without doubling the slash.
pub fn url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
