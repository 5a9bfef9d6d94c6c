use serde_json::Value;

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserProfile},
    error::{AppError, AppResult},
    mapper::user_from_record,
    models::{Role, User},
    services::{put_opt, required_text},
    store::{CollectionStore, ListQuery, Record, Session, Sort, USERS},
};

pub async fn list_users(store: &dyn CollectionStore, session: &Session) -> AppResult<Vec<User>> {
    let records = store
        .get_full_list(session, USERS, &ListQuery::sorted(Sort::newest_first()))
        .await?;
    Ok(records.iter().map(user_from_record).collect())
}

pub async fn get_user(store: &dyn CollectionStore, session: &Session, id: &str) -> AppResult<User> {
    let record = store.get_one(session, USERS, id, None).await?;
    Ok(user_from_record(&record))
}

/// Creates an account. Email uniqueness is enforced by the store.
pub async fn create_user(
    store: &dyn CollectionStore,
    session: &Session,
    payload: CreateUserRequest,
) -> AppResult<User> {
    let email = required_text(payload.email, "email")?;
    let password = required_text(payload.password, "password")?;
    let password_confirm = payload.password_confirm.unwrap_or_else(|| password.clone());
    if password_confirm != password {
        return Err(AppError::validation(
            "passwordConfirm does not match password",
        ));
    }

    let mut body = Record::new();
    body.insert("email".into(), email.into());
    body.insert("password".into(), password.into());
    body.insert("passwordConfirm".into(), password_confirm.into());
    body.insert("emailVisibility".into(), Value::Bool(true));
    let mut profile = payload.profile;
    profile.role.get_or_insert(Role::Cliente);
    write_profile(&mut body, profile);

    let record = store.create(session, USERS, body).await?;
    let user = user_from_record(&record);
    tracing::info!(user_id = %user.id, "user created");
    Ok(user)
}

pub async fn update_user(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
    payload: UpdateUserRequest,
) -> AppResult<User> {
    let mut body = Record::new();
    if let Some(email) = payload.email {
        body.insert("email".into(), required_text(Some(email), "email")?.into());
    }
    write_profile(&mut body, payload.profile);

    let record = store.update(session, USERS, id, body).await?;
    tracing::info!(user_id = %id, "user updated");
    Ok(user_from_record(&record))
}

pub async fn delete_user(
    store: &dyn CollectionStore,
    session: &Session,
    id: &str,
) -> AppResult<()> {
    store.delete(session, USERS, id).await?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(())
}

fn write_profile(body: &mut Record, profile: UserProfile) {
    put_opt(body, "nombre", profile.name);
    put_opt(body, "apellido", profile.surname);
    put_opt(body, "telefono", profile.phone);
    put_opt(body, "direccion", profile.street);
    put_opt(body, "ciudad", profile.city);
    put_opt(body, "region", profile.region);
    put_opt(body, "codigoPostal", profile.postal_code);
    let role = profile.role.map(|r| match r {
        Role::Admin => "admin",
        Role::Cliente => "cliente",
    });
    put_opt(body, "rol", role);
}
