/// Dashboard list state
///
/// The entry list is an immutable snapshot replaced wholesale on every
/// refresh. Selection is the only mutable part and always indexes into the
/// current snapshot.

use std::sync::Arc;

use crate::core::docker::ContainerSummary;
use crate::core::error::EngineError;
use crate::utils::ContainerState;

pub const NO_CONTAINERS_TITLE: &str = "No containers found";
pub const ERROR_TITLE: &str = "Error";

/// One row of the container list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardEntry {
    pub title: String,
    pub subtitle: String,
    /// Full engine id; `None` for synthetic rows
    target: Option<String>,
    state: ContainerState,
}

impl DashboardEntry {
    fn from_container(container: &ContainerSummary) -> Self {
        Self {
            title: format!("{} ({})", container.names.join(","), container.short_id()),
            subtitle: format!("{} | {}", container.image, container.status),
            target: Some(container.id.clone()),
            state: container.state(),
        }
    }

    fn placeholder(title: &str, subtitle: String) -> Self {
        Self {
            title: title.to_string(),
            subtitle,
            target: None,
            state: ContainerState::Unknown,
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    entries: Arc<[DashboardEntry]>,
    selected: Option<usize>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
            selected: None,
        }
    }
}

impl DashboardState {
    /// Build a fresh snapshot from the outcome of a container listing
    pub fn from_listing(listing: Result<Vec<ContainerSummary>, EngineError>) -> Self {
        let entries: Vec<DashboardEntry> = match listing {
            Err(e) => vec![DashboardEntry::placeholder(ERROR_TITLE, e.to_string())],
            Ok(containers) if containers.is_empty() => {
                vec![DashboardEntry::placeholder(NO_CONTAINERS_TITLE, String::new())]
            }
            Ok(containers) => containers.iter().map(DashboardEntry::from_container).collect(),
        };

        let selected = if entries.is_empty() { None } else { Some(0) };
        Self {
            entries: Arc::from(entries),
            selected,
        }
    }

    pub fn entries(&self) -> &[DashboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&DashboardEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Identifier of the selected row, if it is a real container
    pub fn selected_target(&self) -> Option<&str> {
        self.selected_entry().and_then(|entry| entry.target())
    }

    /// Move the selection; returns whether it changed
    pub fn select(&mut self, index: usize) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let index = index.min(self.entries.len() - 1);
        let changed = self.selected != Some(index);
        self.selected = Some(index);
        changed
    }

    pub fn select_next(&mut self) -> bool {
        match self.selected {
            Some(i) if i + 1 < self.entries.len() => self.select(i + 1),
            Some(_) => false,
            None => self.select(0),
        }
    }

    pub fn select_previous(&mut self) -> bool {
        match self.selected {
            Some(i) => self.select(i.saturating_sub(1)),
            None => self.select(0),
        }
    }

    pub fn select_first(&mut self) -> bool {
        self.select(0)
    }

    pub fn select_last(&mut self) -> bool {
        self.select(self.entries.len().saturating_sub(1))
    }

    pub fn page_down(&mut self, page: usize) -> bool {
        let current = self.selected.unwrap_or(0);
        self.select(current.saturating_add(page.max(1)))
    }

    pub fn page_up(&mut self, page: usize) -> bool {
        let current = self.selected.unwrap_or(0);
        self.select(current.saturating_sub(page.max(1)))
    }
}
