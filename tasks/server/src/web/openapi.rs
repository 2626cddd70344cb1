use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::task::api::{self, DeleteTaskResponse, TaskJson};
use crate::task::validation::{CreateTaskRequest, UpdateTaskRequest};
use crate::web::error::ErrorResponse;
use crate::web::{self, HealthResponse};
use axum::Json;
use utoipa::OpenApi;

/// OpenAPI description of every route the server exposes. Client generators consume the
/// document served at `/swagger.json` or written by the `export_openapi` binary.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tasks API",
        version = "1.0.0",
        description = "REST API for managing tasks"
    ),
    paths(
        web::health_check_handler,
        api::list_tasks_handler,
        api::create_task_handler,
        api::get_task_handler,
        api::update_task_handler,
        api::delete_task_handler,
    ),
    components(schemas(
        HealthResponse,
        TaskJson,
        TaskStatus,
        CreateTaskRequest,
        UpdateTaskRequest,
        DeleteTaskResponse,
        ErrorResponse,
    )),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "tasks", description = "Task management")
    )
)]
pub struct ApiDoc;

/// Handler for GET /swagger.json - Returns the OpenAPI document.
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_document_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/health"));
        assert!(paths.contains(&"/tasks"));
        assert!(paths.contains(&"/tasks/{id}"));
    }

    #[test]
    fn can_describe_task_schemas_and_tags() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert_eq!(doc["info"]["title"], "Tasks API");
        assert_eq!(doc["info"]["version"], "1.0.0");
        let schemas = &doc["components"]["schemas"];
        for name in ["TaskJson", "TaskStatus", "CreateTaskRequest", "UpdateTaskRequest"] {
            assert!(schemas.get(name).is_some(), "missing schema {name}");
        }
        let tags: Vec<&str> = doc["tags"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|tag| tag["name"].as_str())
            .collect();
        assert_eq!(tags, vec!["health", "tasks"]);
    }

    #[test]
    fn can_list_every_method_on_task_item_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let item = &doc["paths"]["/tasks/{id}"];

        assert!(item.get("get").is_some());
        assert!(item.get("put").is_some());
        assert!(item.get("delete").is_some());
    }
}
