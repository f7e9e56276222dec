use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of records requested per page. Not user-configurable.
pub const PAGE_SIZE: u32 = 10;

/// Lifecycle status of a workflow definition, decoded from the server's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStatus {
    Running,
    Deleted,
    /// Any code the console does not know about. Displayed raw.
    Unknown(i64),
}

impl WorkflowStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => WorkflowStatus::Running,
            -1 => WorkflowStatus::Deleted,
            other => WorkflowStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            WorkflowStatus::Running => 1,
            WorkflowStatus::Deleted => -1,
            WorkflowStatus::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Running => write!(f, "Running"),
            WorkflowStatus::Deleted => write!(f, "Deleted"),
            WorkflowStatus::Unknown(code) => write!(f, "{code}"),
        }
    }
}

impl Serialize for WorkflowStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        WorkflowStatus::Unknown(0)
    }
}

impl<'de> Deserialize<'de> for WorkflowStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Some deployments send the code as a string; a missing or unreadable code
        // decodes as Unknown(0) so one bad row cannot sink the whole page
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCode {
            Int(i64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        let status = match Option::<RawCode>::deserialize(deserializer)? {
            Some(RawCode::Int(code)) => WorkflowStatus::from_code(code),
            Some(RawCode::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(WorkflowStatus::from_code)
                .unwrap_or_default(),
            Some(RawCode::Other(_)) | None => WorkflowStatus::default(),
        };
        Ok(status)
    }
}

/// `null` decodes as the type's default instead of failing the record
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One workflow definition with its aggregate run statistics, as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    #[serde(rename = "workflow_id")]
    pub id: String,
    #[serde(rename = "workflow_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_instances: u64,
    #[serde(rename = "total_running_instances", default, deserialize_with = "null_as_default")]
    pub running_instances: u64,
    #[serde(rename = "total_failed_instances", default, deserialize_with = "null_as_default")]
    pub failed_instances: u64,
    #[serde(rename = "create_time", default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(rename = "update_time", default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

impl WorkflowRecord {
    /// A stand-in for a record known only by id, e.g. a delete requested from the command line.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            status: WorkflowStatus::Unknown(0),
            total_instances: 0,
            running_instances: 0,
            failed_instances: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// Status filter selected by the user. `Any` means the status parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Any,
    Running,
    Deleted,
}

impl StatusFilter {
    /// Value sent as the `status` query parameter, or `None` when no filter applies.
    pub fn wire_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::Any => None,
            StatusFilter::Running => Some("1"),
            StatusFilter::Deleted => Some("-1"),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::Any => write!(f, "any"),
            StatusFilter::Running => write!(f, "running"),
            StatusFilter::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "" => Ok(StatusFilter::Any),
            "running" | "1" => Ok(StatusFilter::Running),
            "deleted" | "-1" => Ok(StatusFilter::Deleted),
            other => Err(format!(
                "unknown status filter '{other}' (expected any, running or deleted)"
            )),
        }
    }
}

/// Outcome of one successful list query. Replaced wholesale on every applied fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "workflows", default, deserialize_with = "null_as_default")]
    pub items: Vec<WorkflowRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

/// Query parameters for `GET {api_root}/workflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListParams {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
}

impl ListParams {
    /// Key/value pairs in the order they are sent. Inactive filters produce no pair.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(workflow_id) = &self.workflow_id {
            pairs.push(("workflow_id", workflow_id.clone()));
        }
        pairs
    }
}

/// `max(1, ceil(total / page_size))`
pub fn page_count(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
