use crate::auth::CurrentUser;
use crate::auth::role::{Role, RoleAuthorizer};
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::user::{ProfileUpdateRequest, RoleUpdateRequest, UserResponse};
use crate::service::user::UserService;
use rocket::serde::json::Json;
use rocket::{State, get, put};
use rocket_okapi::openapi;
use uuid::Uuid;
use validator::Validate;

fn parse_role_filter(value: Option<&str>) -> Result<Option<Role>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => Role::from_db(Some(raw))
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown role '{}'", raw.trim()))),
    }
}

/// List users, optionally filtered by effective role
#[openapi(tag = "Admin")]
#[get("/users?<role>")]
pub async fn list_users(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    role: Option<&str>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    current_user.require_role(&[Role::Admin])?;
    let role = parse_role_filter(role)?;

    let service = UserService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.list(role).await?))
}

/// Get a user by id
#[openapi(tag = "Admin")]
#[get("/users/<id>")]
pub async fn get_user(repo: &State<Repo>, authorizer: &State<RoleAuthorizer>, current_user: CurrentUser, id: &str) -> Result<Json<UserResponse>, AppError> {
    current_user.require_role(&[Role::Admin])?;
    let uuid = Uuid::parse_str(id)?;

    let service = UserService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.get(&uuid).await?))
}

/// Edit a user's profile
#[openapi(tag = "Admin")]
#[put("/users/<id>", data = "<payload>")]
pub async fn put_user(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<ProfileUpdateRequest>,
) -> Result<Json<UserResponse>, AppError> {
    current_user.require_role(&[Role::Admin])?;
    let uuid = Uuid::parse_str(id)?;
    payload.validate()?;

    let service = UserService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.admin_update_profile(&uuid, &payload).await?))
}

/// Change a user's role between student and instructor
#[openapi(tag = "Admin")]
#[put("/users/<id>/role", data = "<payload>")]
pub async fn put_user_role(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<RoleUpdateRequest>,
) -> Result<Json<UserResponse>, AppError> {
    current_user.require_role(&[Role::Admin])?;
    let uuid = Uuid::parse_str(id)?;

    let service = UserService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.update_role(&current_user, &uuid, payload.role).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_users, get_user, put_user, put_user_role]
}

#[cfg(test)]
mod tests {
    use crate::auth::role::Role;
    use crate::test_utils::{MemoryRepository, STRONG_PASSWORD, TEST_ADMIN_EMAIL, test_client};
    use rocket::http::{ContentType, Header, Status};
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn sign_in(client: &rocket::local::asynchronous::Client, email: &str) -> Header<'static> {
        let response = client
            .post("/api/v1/auth/signin")
            .header(ContentType::JSON)
            .body(json!({"email": email, "password": STRONG_PASSWORD}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.expect("sign-in body");
        let token = body["session"]["token"].as_str().expect("token").to_string();
        Header::new("Authorization", format!("Bearer {token}"))
    }

    #[rocket::async_test]
    async fn admin_lists_users() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_identity(TEST_ADMIN_EMAIL, Role::Admin, STRONG_PASSWORD).await;
        repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        repo.seed_identity("prof@campus.test", Role::Instructor, STRONG_PASSWORD).await;
        let client = test_client(repo).await;
        let auth = sign_in(&client, TEST_ADMIN_EMAIL).await;

        let response = client.get("/api/v1/admin/users").header(auth.clone()).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let users: Value = response.into_json().await.expect("users");
        assert_eq!(users.as_array().map(Vec::len), Some(3));

        let response = client.get("/api/v1/admin/users?role=instructor").header(auth).dispatch().await;
        let users: Value = response.into_json().await.expect("users");
        assert_eq!(users.as_array().map(Vec::len), Some(1));
        assert_eq!(users[0]["email"], "prof@campus.test");
    }

    #[rocket::async_test]
    async fn unknown_role_filter_is_a_bad_request() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_identity(TEST_ADMIN_EMAIL, Role::Admin, STRONG_PASSWORD).await;
        repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let client = test_client(repo).await;
        let auth = sign_in(&client, TEST_ADMIN_EMAIL).await;

        let response = client.get("/api/v1/admin/users?role=teacher").header(auth).dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("error body");
        assert_eq!(body["code"], "bad_request");
    }

    #[rocket::async_test]
    async fn role_filter_uses_the_effective_role() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_identity(TEST_ADMIN_EMAIL, Role::Student, STRONG_PASSWORD).await;
        repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let client = test_client(repo).await;
        let auth = sign_in(&client, TEST_ADMIN_EMAIL).await;

        let response = client.get("/api/v1/admin/users?role=student").header(auth.clone()).dispatch().await;
        let users: Value = response.into_json().await.expect("users");
        assert_eq!(users.as_array().map(Vec::len), Some(1));
        assert_eq!(users[0]["email"], "kid@campus.test");

        let response = client.get("/api/v1/admin/users?role=admin").header(auth).dispatch().await;
        let users: Value = response.into_json().await.expect("users");
        assert_eq!(users.as_array().map(Vec::len), Some(1));
        assert_eq!(users[0]["email"], TEST_ADMIN_EMAIL);
        assert_eq!(users[0]["role"], "admin");
    }

    #[rocket::async_test]
    async fn students_are_forbidden() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let client = test_client(repo).await;
        let auth = sign_in(&client, "kid@campus.test").await;

        let response = client.get("/api/v1/admin/users").header(auth).dispatch().await;
        assert_eq!(response.status(), Status::Forbidden);
        let body: Value = response.into_json().await.expect("error body");
        assert_eq!(body["code"], "forbidden");
    }

    #[rocket::async_test]
    async fn granting_admin_is_a_bad_request() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_identity(TEST_ADMIN_EMAIL, Role::Admin, STRONG_PASSWORD).await;
        let kid = repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let client = test_client(repo).await;
        let auth = sign_in(&client, TEST_ADMIN_EMAIL).await;

        let response = client
            .put(format!("/api/v1/admin/users/{}/role", kid.id))
            .header(auth.clone())
            .header(ContentType::JSON)
            .body(json!({"role": "admin"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .put(format!("/api/v1/admin/users/{}/role", kid.id))
            .header(auth)
            .header(ContentType::JSON)
            .body(json!({"role": "instructor"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.expect("user body");
        assert_eq!(body["role"], "instructor");
    }

    #[rocket::async_test]
    async fn invalid_uuid_is_a_bad_request() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_identity(TEST_ADMIN_EMAIL, Role::Admin, STRONG_PASSWORD).await;
        let client = test_client(repo).await;
        let auth = sign_in(&client, TEST_ADMIN_EMAIL).await;

        let response = client.get("/api/v1/admin/users/not-a-uuid").header(auth).dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
    }
}
