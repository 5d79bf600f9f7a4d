use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for account creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for sign-in (user and admin endpoints share it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Session payload returned after signup or sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client. `role` is only present
/// on the admin sign-in and `/me` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_omitted_when_absent() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("role"));
        assert!(json.contains("ada@example.com"));
    }

    #[test]
    fn admin_role_is_serialized() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: "Root".into(),
            email: "root@example.com".into(),
            role: Some("admin".into()),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains(r#""role":"admin""#));
    }
}
