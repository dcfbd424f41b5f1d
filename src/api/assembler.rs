//! Turns entities into HAL models with links to their related resources

use url::form_urlencoded;

use crate::api::dto::{CommentResponse, ProjectResponse, TaskResponse, UserResponse};
use crate::api::hal::{CollectionModel, EntityModel, Links};
use crate::database::models::{Comment, Project, Task, UserProfile};
use crate::database::TaskFilter;

/// Builds absolute resource URLs under the public base URL
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn href_with_query(&self, path: &str, params: &[(&str, Option<String>)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for (key, value) in params {
            if let Some(value) = value {
                query.append_pair(key, value);
                any = true;
            }
        }
        if any {
            format!("{}{}?{}", self.base, path, query.finish())
        } else {
            self.href(path)
        }
    }

    pub fn user(&self, id: i64) -> String {
        self.href(&format!("/api/users/{}", id))
    }

    pub fn users(&self) -> String {
        self.href("/api/users")
    }

    pub fn me(&self) -> String {
        self.href("/api/auth/me")
    }

    pub fn project(&self, id: i64) -> String {
        self.href(&format!("/api/projects/{}", id))
    }

    pub fn projects(&self, name: Option<&str>) -> String {
        self.href_with_query("/api/projects", &[("name", name.map(str::to_string))])
    }

    pub fn project_tasks(&self, project_id: i64, filter: &TaskFilter) -> String {
        self.href_with_query(
            &format!("/api/projects/{}/tasks", project_id),
            &[
                ("assignedToUserId", filter.assigned_to_user_id.map(|id| id.to_string())),
                ("title", filter.title.clone()),
            ],
        )
    }

    pub fn task(&self, id: i64) -> String {
        self.href(&format!("/api/tasks/{}", id))
    }

    pub fn tasks(&self, filter: &TaskFilter) -> String {
        self.href_with_query(
            "/api/tasks",
            &[
                ("projectId", filter.project_id.map(|id| id.to_string())),
                ("assignedToUserId", filter.assigned_to_user_id.map(|id| id.to_string())),
                ("title", filter.title.clone()),
            ],
        )
    }

    pub fn task_comments(&self, task_id: i64) -> String {
        self.href(&format!("/api/tasks/{}/comments", task_id))
    }

    pub fn comment(&self, task_id: i64, comment_id: i64) -> String {
        self.href(&format!("/api/tasks/{}/comments/{}", task_id, comment_id))
    }
}

#[derive(Debug, Clone)]
pub struct ModelAssembler {
    pub links: LinkBuilder,
}

impl ModelAssembler {
    pub fn new(links: LinkBuilder) -> Self {
        Self { links }
    }

    pub fn user(&self, user: &UserProfile) -> EntityModel<UserResponse> {
        EntityModel::of(
            UserResponse::from(user),
            Links::new().with("self", self.links.user(user.id)),
        )
    }

    pub fn users(&self, users: &[UserProfile]) -> CollectionModel<UserResponse> {
        CollectionModel::of(
            users.iter().map(|u| self.user(u)).collect(),
            Links::new().with("self", self.links.users()),
        )
    }

    pub fn project(&self, project: &Project) -> EntityModel<ProjectResponse> {
        let empty = TaskFilter::default();
        EntityModel::of(
            ProjectResponse::from(project),
            Links::new()
                .with("self", self.links.project(project.id))
                .with("tasks", self.links.project_tasks(project.id, &empty)),
        )
    }

    pub fn projects(&self, projects: &[Project], name: Option<&str>) -> CollectionModel<ProjectResponse> {
        CollectionModel::of(
            projects.iter().map(|p| self.project(p)).collect(),
            Links::new().with("self", self.links.projects(name)),
        )
    }

    pub fn task(&self, task: &Task) -> EntityModel<TaskResponse> {
        let mut links = Links::new()
            .with("self", self.links.task(task.id))
            .with("tasks", self.links.tasks(&TaskFilter::default()))
            .with("reportedBy", self.links.user(task.reported_by.id));
        if let Some(assignee) = &task.assigned_to {
            links.push("assignedTo", self.links.user(assignee.id));
        }
        links.push("project", self.links.project(task.belongs_to.id));
        links.push("comments", self.links.task_comments(task.id));

        EntityModel::of(TaskResponse::from(task), links)
    }

    /// `self_href` is the URL that produced the listing, query included
    pub fn tasks(&self, tasks: &[Task], self_href: String) -> CollectionModel<TaskResponse> {
        CollectionModel::of(
            tasks.iter().map(|t| self.task(t)).collect(),
            Links::new().with("self", self_href),
        )
    }

    pub fn comment(&self, comment: &Comment) -> EntityModel<CommentResponse> {
        EntityModel::of(
            CommentResponse::from(comment),
            Links::new()
                .with("self", self.links.comment(comment.task_id, comment.id))
                .with("author", self.links.user(comment.author_id))
                .with("task", self.links.task(comment.task_id)),
        )
    }

    pub fn comments(&self, task_id: i64, comments: &[Comment]) -> CollectionModel<CommentResponse> {
        CollectionModel::of(
            comments.iter().map(|c| self.comment(c)).collect(),
            Links::new()
                .with("self", self.links.task_comments(task_id))
                .with("task", self.links.task(task_id)),
        )
    }
}
