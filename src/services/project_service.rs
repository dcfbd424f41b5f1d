use crate::api::dto::ProjectRequest;
use crate::database::models::{Project, Task};
use crate::database::{DatabaseError, ProjectRepository, TaskFilter, TaskRepository};
use crate::error::ApiError;

#[derive(Clone)]
pub struct ProjectService {
    projects: ProjectRepository,
    tasks: TaskRepository,
}

impl ProjectService {
    pub fn new(projects: ProjectRepository, tasks: TaskRepository) -> Self {
        Self { projects, tasks }
    }

    pub async fn create(&self, request: ProjectRequest) -> Result<Project, ApiError> {
        let name = request.name.trim();
        match self.projects.insert(name).await {
            Ok(project) => {
                tracing::info!(project_id = project.id, name = %project.name, "Created project");
                Ok(project)
            }
            Err(DatabaseError::UniqueViolation(_)) => Err(ApiError::conflict(format!(
                "Project with name '{}' already exists",
                name
            ))),
            Err(other) => Err(other.into()),
        }
    }

    /// Blank search terms list every project
    pub async fn search(&self, name: Option<&str>) -> Result<Vec<Project>, ApiError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        Ok(self.projects.search(name).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Project, ApiError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Project not found with id: {}", id)))
    }

    /// Tasks of one project; `filter.project_id` is overridden with `project_id`
    pub async fn tasks(&self, project_id: i64, mut filter: TaskFilter) -> Result<Vec<Task>, ApiError> {
        if !self.projects.exists(project_id).await? {
            return Err(ApiError::not_found(format!(
                "Project not found with id: {}",
                project_id
            )));
        }
        filter.project_id = Some(project_id);
        Ok(self.tasks.search(&filter).await?)
    }
}
