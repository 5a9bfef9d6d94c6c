use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: Option<String>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

/// Optional profile fields shared by create and update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserProfile {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "apellido")]
    pub surname: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub street: Option<String>,
    #[serde(rename = "ciudad")]
    pub city: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "codigoPostal")]
    pub postal_code: Option<String>,
    #[serde(rename = "rol")]
    pub role: Option<Role>,
}
