//! GitHub GraphQL client.
//!
//! Implements [`IssueTracker`] against `POST /graphql` with a bearer token.
//! Each method issues its own request; there is no retry and no caching.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::IssueTracker;
use super::types::{IssueInput, RemoteIssue, RepoRef, RepositoryInfo};
use crate::config::resolve_graphql_endpoint;
use crate::error::{Error, Result};
use crate::model::normalize_title;

const CLIENT_USER_AGENT: &str = concat!("md2issues/", env!("CARGO_PKG_VERSION"));

const LABELS_PAGE: u32 = 100;
const ISSUE_TYPES_PAGE: u32 = 50;
const PROJECTS_PAGE: u32 = 50;
const PARENT_SEARCH_LIMIT: u32 = 10;

const ALREADY_IN_PROJECT: &str = "content already exists in the project";
const DUPLICATE_SUB_ISSUE: &str = "duplicate sub-issues";

const REPOSITORY_ID_QUERY: &str = r"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) { id }
}";

const ISSUE_NODE_ID_QUERY: &str = r"
query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) { id number }
  }
}";

const CREATE_ISSUE_MUTATION: &str = r"
mutation($input: CreateIssueInput!) {
  createIssue(input: $input) {
    issue { id number title }
  }
}";

const UPDATE_ISSUE_MUTATION: &str = r"
mutation($input: UpdateIssueInput!) {
  updateIssue(input: $input) {
    issue { id number title }
  }
}";

const ADD_SUB_ISSUE_MUTATION: &str = r"
mutation($input: AddSubIssueInput!) {
  addSubIssue(input: $input) {
    issue { id title }
  }
}";

const SEARCH_ISSUES_QUERY: &str = r"
query($query: String!, $first: Int!) {
  search(query: $query, type: ISSUE, first: $first) {
    nodes {
      ... on Issue {
        id
        title
        number
        repository { name owner { login } }
      }
    }
  }
}";

const LABELS_QUERY: &str = r"
query($owner: String!, $name: String!, $first: Int!) {
  repository(owner: $owner, name: $name) {
    labels(first: $first) { nodes { id name } }
  }
}";

const ISSUE_TYPES_QUERY: &str = r"
query($owner: String!, $name: String!, $first: Int!) {
  repository(owner: $owner, name: $name) {
    issueTypes(first: $first) { nodes { id name } }
  }
}";

const PROJECTS_QUERY: &str = r"
query($login: String!, $first: Int!, $after: String) {
  organization(login: $login) {
    projectsV2(first: $first, after: $after, orderBy: { field: UPDATED_AT, direction: DESC }) {
      pageInfo { hasNextPage endCursor }
      nodes { id title }
    }
  }
}";

const ADD_TO_PROJECT_MUTATION: &str = r"
mutation($issueId: ID!, $projectId: ID!) {
  addProjectV2ItemById(input: { projectId: $projectId, contentId: $issueId }) {
    item { id }
  }
}";

const REPOSITORY_INFO_QUERY: &str = r"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    id
    name
    owner { login }
    description
    url
    visibility
    hasIssuesEnabled
    defaultBranchRef { name }
    issues(states: OPEN) { totalCount }
  }
}";

/// GitHub GraphQL API client.
pub struct GitHubClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the configured GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: String) -> Result<Self> {
        Self::with_endpoint(token, resolve_graphql_endpoint())
    }

    /// Create a client for a specific GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(token: String, endpoint: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// The GraphQL endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one GraphQL request and decode its `data`.
    async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHub(format!("{status}: {body}")));
        }

        let envelope: GraphQlResponse<T> = response.json().await?;
        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHub(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| Error::GitHub("response contained no data".to_string()))
    }

    async fn resolve_repository_id(&self, repo: &RepoRef) -> Result<String> {
        let data: RepositoryData<NodeId> = self
            .graphql(
                REPOSITORY_ID_QUERY,
                json!({ "owner": repo.owner, "name": repo.name }),
            )
            .await?;

        data.repository
            .map(|r| r.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::NotFound {
                kind: "Repository",
                name: repo.to_string(),
            })
    }

    /// Attach `child_node_id` under `parent_node_id`, replacing any existing parent.
    async fn set_parent(&self, parent_node_id: &str, child_node_id: &str) -> Result<()> {
        let input = json!({
            "issueId": parent_node_id,
            "subIssueId": child_node_id,
            "replaceParent": true,
        });

        match self
            .graphql::<Value>(ADD_SUB_ISSUE_MUTATION, json!({ "input": input }))
            .await
        {
            Ok(_) => Ok(()),
            Err(Error::GitHub(message)) if message.contains(DUPLICATE_SUB_ISSUE) => {
                debug!(child = child_node_id, "Parent relationship already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch summary information about a repository.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository does not exist or is not
    /// visible to the token, or the request error.
    pub async fn repository_info(&self, repo: &RepoRef) -> Result<RepositoryInfo> {
        let data: RepositoryData<RepositoryNode> = self
            .graphql(
                REPOSITORY_INFO_QUERY,
                json!({ "owner": repo.owner, "name": repo.name }),
            )
            .await?;

        let node = data.repository.ok_or_else(|| Error::NotFound {
            kind: "Repository",
            name: repo.to_string(),
        })?;

        Ok(RepositoryInfo {
            id: node.id,
            name: node.name,
            owner: node.owner.login,
            description: node.description.filter(|d| !d.is_empty()),
            url: node.url,
            visibility: node.visibility,
            default_branch: node.default_branch_ref.map(|b| b.name),
            open_issues: node.issues.total_count,
            has_issues_enabled: node.has_issues_enabled,
        })
    }
}

impl IssueTracker for GitHubClient {
    async fn create_issue(&self, repo: &RepoRef, input: &IssueInput) -> Result<RemoteIssue> {
        let repository_id = self.resolve_repository_id(repo).await?;

        let mut payload = json!({
            "repositoryId": repository_id,
            "title": input.title,
            "body": input.body,
        });
        if !input.label_ids.is_empty() {
            payload["labelIds"] = json!(input.label_ids);
        }
        if let Some(parent_id) = &input.parent_id {
            payload["parentIssueId"] = json!(parent_id);
        }
        if let Some(type_id) = &input.type_id {
            payload["issueTypeId"] = json!(type_id);
        }

        let data: CreateIssueData = self
            .graphql(CREATE_ISSUE_MUTATION, json!({ "input": payload }))
            .await?;

        data.create_issue
            .and_then(|payload| payload.issue)
            .filter(|issue| !issue.id.is_empty())
            .map(IssueNode::into_remote)
            .ok_or_else(|| Error::GitHub("createIssue returned an empty issue id".to_string()))
    }

    async fn update_issue(
        &self,
        _repo: &RepoRef,
        node_id: &str,
        input: &IssueInput,
    ) -> Result<RemoteIssue> {
        let mut payload = json!({
            "id": node_id,
            "title": input.title,
            "body": input.body,
        });
        if !input.label_ids.is_empty() {
            payload["labelIds"] = json!(input.label_ids);
        }
        if let Some(type_id) = &input.type_id {
            payload["issueTypeId"] = json!(type_id);
        }

        // UpdateIssueInput has no parent field; the link is a separate mutation.
        if let Some(parent_id) = &input.parent_id {
            match self.set_parent(parent_id, node_id).await {
                Ok(()) => info!(issue = %input.title, "Updated parent relationship"),
                Err(e) => {
                    warn!(issue = %input.title, error = %e, "Failed to update parent relationship");
                }
            }
        }

        let data: UpdateIssueData = self
            .graphql(UPDATE_ISSUE_MUTATION, json!({ "input": payload }))
            .await?;

        data.update_issue
            .and_then(|payload| payload.issue)
            .filter(|issue| !issue.id.is_empty())
            .map(IssueNode::into_remote)
            .ok_or_else(|| Error::GitHub("updateIssue returned an empty issue id".to_string()))
    }

    async fn resolve_issue_node_id(&self, repo: &RepoRef, number: u64) -> Result<String> {
        if number == 0 {
            return Err(Error::InvalidIssueId {
                id: number.to_string(),
            });
        }

        let data: RepositoryData<IssueHolder> = self
            .graphql(
                ISSUE_NODE_ID_QUERY,
                json!({ "owner": repo.owner, "name": repo.name, "number": number }),
            )
            .await?;

        data.repository
            .and_then(|r| r.issue)
            .map(|issue| issue.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::NotFound {
                kind: "Issue",
                name: format!("#{number} in {repo}"),
            })
    }

    async fn resolve_parent_id(&self, repo: &RepoRef, title: &str) -> Result<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidArgument("parent title is empty".to_string()));
        }

        let query = format!("\"{title}\" repo:{repo} in:title");
        let data: SearchData = self
            .graphql(
                SEARCH_ISSUES_QUERY,
                json!({ "query": query, "first": PARENT_SEARCH_LIMIT }),
            )
            .await?;

        let wanted = normalize_title(title);
        data.search
            .nodes
            .into_iter()
            .flatten()
            .find(|hit| {
                !hit.id.is_empty()
                    && normalize_title(&hit.title) == wanted
                    && hit.repository.as_ref().is_some_and(|r| {
                        r.owner.login.eq_ignore_ascii_case(&repo.owner)
                            && r.name.eq_ignore_ascii_case(&repo.name)
                    })
            })
            .map(|hit| hit.id)
            .ok_or_else(|| Error::NotFound {
                kind: "Parent issue",
                name: format!("{title} in {repo}"),
            })
    }

    async fn resolve_label_ids(&self, repo: &RepoRef, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let data: RepositoryData<LabelsHolder> = self
            .graphql(
                LABELS_QUERY,
                json!({ "owner": repo.owner, "name": repo.name, "first": LABELS_PAGE }),
            )
            .await?;

        let available = data
            .repository
            .map(|r| r.labels.nodes)
            .unwrap_or_default();

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let wanted = normalize_title(name);
            match available.iter().find(|l| normalize_title(&l.name) == wanted) {
                Some(label) => ids.push(label.id.clone()),
                None => debug!(label = %name, repo = %repo, "Label not found, skipping"),
            }
        }
        Ok(ids)
    }

    async fn resolve_issue_type_id(&self, repo: &RepoRef, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument("issue type name is empty".to_string()));
        }

        let data: RepositoryData<IssueTypesHolder> = self
            .graphql(
                ISSUE_TYPES_QUERY,
                json!({ "owner": repo.owner, "name": repo.name, "first": ISSUE_TYPES_PAGE }),
            )
            .await?;

        let wanted = normalize_title(name);
        data.repository
            .and_then(|r| r.issue_types)
            .map(|types| types.nodes)
            .unwrap_or_default()
            .into_iter()
            .find(|t| normalize_title(&t.name) == wanted)
            .map(|t| t.id)
            .ok_or_else(|| Error::NotFound {
                kind: "Issue type",
                name: format!("{name} in {repo}"),
            })
    }

    async fn resolve_project_id(&self, owner: &str, name: &str) -> Result<String> {
        let wanted = normalize_title(name);
        let mut after: Option<String> = None;

        loop {
            let data: OrganizationData = self
                .graphql(
                    PROJECTS_QUERY,
                    json!({ "login": owner, "first": PROJECTS_PAGE, "after": after }),
                )
                .await?;

            let Some(projects) = data.organization.map(|o| o.projects_v2) else {
                return Err(Error::NotFound {
                    kind: "Organization",
                    name: owner.to_string(),
                });
            };

            if let Some(project) = projects
                .nodes
                .into_iter()
                .flatten()
                .find(|p| normalize_title(&p.title) == wanted)
            {
                return Ok(project.id);
            }

            match projects.page_info.end_cursor {
                Some(cursor) if projects.page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }

        Err(Error::NotFound {
            kind: "Project",
            name: name.to_string(),
        })
    }

    async fn add_to_project(&self, issue_node_id: &str, project_node_id: &str) -> Result<()> {
        let result = self
            .graphql::<AddToProjectData>(
                ADD_TO_PROJECT_MUTATION,
                json!({ "issueId": issue_node_id, "projectId": project_node_id }),
            )
            .await;

        match result {
            Ok(data) => {
                let linked = data
                    .add_project_v2_item_by_id
                    .and_then(|payload| payload.item)
                    .is_some_and(|item| !item.id.is_empty());
                if linked {
                    Ok(())
                } else {
                    Err(Error::GitHub(
                        "addProjectV2ItemById returned an empty item id".to_string(),
                    ))
                }
            }
            Err(Error::GitHub(message)) if message.contains(ALREADY_IN_PROJECT) => {
                debug!(issue = issue_node_id, "Issue already linked to project");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

// ── Wire types ────────────────────────────────────────────────

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct RepositoryData<T> {
    repository: Option<T>,
}

#[derive(Deserialize)]
struct NodeId {
    id: String,
}

#[derive(Deserialize)]
struct IssueHolder {
    issue: Option<NodeId>,
}

#[derive(Deserialize)]
struct IssueNode {
    id: String,
    number: u64,
}

impl IssueNode {
    fn into_remote(self) -> RemoteIssue {
        RemoteIssue {
            number: self.number,
            node_id: self.id,
        }
    }
}

#[derive(Deserialize)]
struct IssuePayload {
    issue: Option<IssueNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIssueData {
    create_issue: Option<IssuePayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateIssueData {
    update_issue: Option<IssuePayload>,
}

#[derive(Deserialize)]
struct SearchData {
    search: SearchConnection,
}

#[derive(Deserialize)]
struct SearchConnection {
    nodes: Vec<Option<SearchHit>>,
}

// Non-issue hits (pull requests) come back as empty objects.
#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchHit {
    id: String,
    title: String,
    repository: Option<SearchRepository>,
}

#[derive(Deserialize)]
struct SearchRepository {
    name: String,
    owner: Login,
}

#[derive(Deserialize)]
struct Login {
    login: String,
}

#[derive(Deserialize)]
struct NamedNode {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct NamedNodes {
    nodes: Vec<NamedNode>,
}

#[derive(Deserialize)]
struct LabelsHolder {
    labels: NamedNodes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueTypesHolder {
    issue_types: Option<NamedNodes>,
}

#[derive(Deserialize)]
struct OrganizationData {
    organization: Option<OrganizationNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationNode {
    projects_v2: ProjectConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectConnection {
    page_info: PageInfo,
    nodes: Vec<Option<ProjectNode>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct ProjectNode {
    id: String,
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToProjectData {
    add_project_v2_item_by_id: Option<ProjectItemPayload>,
}

#[derive(Deserialize)]
struct ProjectItemPayload {
    item: Option<NodeId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    id: String,
    name: String,
    owner: Login,
    description: Option<String>,
    url: String,
    visibility: String,
    has_issues_enabled: bool,
    default_branch_ref: Option<BranchRef>,
    issues: TotalCount,
}

#[derive(Deserialize)]
struct BranchRef {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}
