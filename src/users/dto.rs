use serde::{Deserialize, Serialize};

use crate::auth::dto::PublicUser;

/// Partial profile update. Setting `password` additionally requires
/// `currentPassword` to be present and correct.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub current_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<PublicUser>,
}
