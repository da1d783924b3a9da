use crate::auth::CurrentUser;
use crate::auth::role::Role;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::department::{DepartmentRequest, DepartmentResponse};
use rocket::http::Status;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_okapi::openapi;
use uuid::Uuid;
use validator::Validate;

/// Create a department
#[openapi(tag = "Departments")]
#[post("/", data = "<payload>")]
pub async fn create_department(
    repo: &State<Repo>,
    current_user: CurrentUser,
    payload: Json<DepartmentRequest>,
) -> Result<Created<Json<DepartmentResponse>>, AppError> {
    current_user.require_role(&[Role::Admin])?;
    payload.validate()?;

    let department = repo.create_department(&payload).await?;
    Ok(Created::new(format!("/departments/{}", department.id)).body(Json(DepartmentResponse::from(&department))))
}

/// List all departments
#[openapi(tag = "Departments")]
#[get("/")]
pub async fn list_departments(repo: &State<Repo>, _current_user: CurrentUser) -> Result<Json<Vec<DepartmentResponse>>, AppError> {
    let departments = repo.list_departments().await?;
    Ok(Json(departments.iter().map(DepartmentResponse::from).collect()))
}

/// Get a department by id
#[openapi(tag = "Departments")]
#[get("/<id>")]
pub async fn get_department(repo: &State<Repo>, _current_user: CurrentUser, id: &str) -> Result<Json<DepartmentResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;
    if let Some(department) = repo.get_department_by_id(&uuid).await? {
        Ok(Json(DepartmentResponse::from(&department)))
    } else {
        Err(AppError::NotFound("Department not found".to_string()))
    }
}

/// Update a department
#[openapi(tag = "Departments")]
#[put("/<id>", data = "<payload>")]
pub async fn put_department(
    repo: &State<Repo>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<DepartmentRequest>,
) -> Result<Json<DepartmentResponse>, AppError> {
    current_user.require_role(&[Role::Admin])?;
    let uuid = Uuid::parse_str(id)?;
    payload.validate()?;

    let department = repo.update_department(&uuid, &payload).await?;
    Ok(Json(DepartmentResponse::from(&department)))
}

/// Delete a department
#[openapi(tag = "Departments")]
#[delete("/<id>")]
pub async fn delete_department(repo: &State<Repo>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    current_user.require_role(&[Role::Admin])?;
    let uuid = Uuid::parse_str(id)?;

    repo.delete_department(&uuid).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_department, list_departments, get_department, put_department, delete_department]
}

#[cfg(test)]
mod tests {
    use crate::auth::role::Role;
    use crate::test_utils::{MemoryRepository, STRONG_PASSWORD, TEST_ADMIN_EMAIL, bearer, test_client};
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[rocket::async_test]
    async fn admin_manages_departments_and_everyone_reads() {
        let repo = Arc::new(MemoryRepository::new());
        let admin = repo.seed_identity(TEST_ADMIN_EMAIL, Role::Admin, STRONG_PASSWORD).await;
        let kid = repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let client = test_client(repo).await;

        let response = client
            .post("/api/v1/departments/")
            .header(bearer(&admin))
            .header(ContentType::JSON)
            .body(json!({"code": "cs", "name": "Computer Science"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let department: Value = response.into_json().await.expect("department");
        assert_eq!(department["code"], "CS");

        let duplicate = client
            .post("/api/v1/departments/")
            .header(bearer(&admin))
            .header(ContentType::JSON)
            .body(json!({"code": "CS", "name": "Again"}).to_string())
            .dispatch()
            .await;
        assert_eq!(duplicate.status(), Status::Conflict);

        let forbidden = client
            .post("/api/v1/departments/")
            .header(bearer(&kid))
            .header(ContentType::JSON)
            .body(json!({"code": "MA", "name": "Mathematics"}).to_string())
            .dispatch()
            .await;
        assert_eq!(forbidden.status(), Status::Forbidden);

        let listed = client.get("/api/v1/departments/").header(bearer(&kid)).dispatch().await;
        assert_eq!(listed.status(), Status::Ok);
        let departments: Value = listed.into_json().await.expect("departments");
        assert_eq!(departments.as_array().map(Vec::len), Some(1));
    }
}
