use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub mod api;
pub mod validation;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: i64,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: i64,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            created_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status of the task.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the moment the task was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(
            model.id,
            model.title,
            model.description,
            model.status,
            model.created_at,
        )
    }
}

/// Fields to change on an existing task. `None` leaves a field untouched.
///
/// `description` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: std::sync::Arc<sea_orm::DatabaseConnection>,
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl<'a> TaskService<'a> {
    pub fn new(db: &'a sea_orm::DatabaseConnection) -> TaskService<'a> {
        TaskService { db }
    }

    /// Creates a new task.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the task.
    /// * `description` - An optional free-form description.
    /// * `status` - The initial status; `pending` when not given.
    ///
    /// # Returns
    ///
    /// A `Result` containing the persisted `Task`, including its generated ID and creation time.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &self,
        title: String,
        description: Option<String>,
        status: Option<TaskStatus>,
    ) -> Result<Task, TaskServiceError> {
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            status: ActiveValue::Set(status.unwrap_or_default()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created task {}", created_model.id);
        Ok(Task::from(created_model))
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id).one(self.db).await?;
        Ok(task_model.map(Task::from))
    }

    /// Retrieves all tasks ordered by ascending ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Applies `changes` to the task with the given ID.
    ///
    /// Fields absent from `changes` keep their stored values. With no changes the current
    /// record is returned as is.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_by_id(
        &self,
        id: i64,
        changes: TaskChanges,
    ) -> Result<Option<Task>, TaskServiceError> {
        let Some(task_to_update) = task::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };
        if changes.is_empty() {
            return Ok(Some(Task::from(task_to_update)));
        }

        let mut active_model: task::ActiveModel = task_to_update.into();
        if let Some(title) = changes.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(status) = changes.status {
            active_model.status = ActiveValue::Set(status);
        }

        match active_model.update(self.db).await {
            Ok(updated_model) => Ok(Some(Task::from(updated_model))),
            // Deleted between the lookup and the update.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// `true` if a row was removed, `false` if no task had the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: i64) -> Result<bool, TaskServiceError> {
        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected > 0 {
            tracing::info!("Deleted task {}", id);
        }
        Ok(result.rows_affected > 0)
    }
}
