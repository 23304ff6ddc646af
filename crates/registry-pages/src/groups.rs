//! Groups page

use crate::load::{LoadGuard, LoadState};
use crate::messages;
use crate::notify::NotificationCenter;
use registry_client::RegistryClient;
use registry_model::{Group, GroupId, NewGroup, StudentId};
use std::time::Duration;

/// Parse a comma-separated list of student ids
///
/// Blank items are skipped, so `"1, 2,,3"` yields `[1, 2, 3]` and blank input
/// yields an empty list.
///
/// # Errors
/// The offending item when it is not a whole number
pub fn parse_student_ids(input: &str) -> Result<Vec<StudentId>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<StudentId>().map_err(|_| item.to_string()))
        .collect()
}

/// State of the groups page
#[derive(Debug)]
pub struct GroupsPage {
    client: RegistryClient,
    groups: Vec<Group>,
    selected: Option<Group>,
    search: String,
    state: LoadState,
    guard: LoadGuard,
    notices: NotificationCenter,
}

impl GroupsPage {
    /// Create page
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            groups: Vec::new(),
            selected: None,
            search: String::new(),
            state: LoadState::Idle,
            guard: LoadGuard::new(),
            notices: NotificationCenter::default(),
        }
    }

    /// With notification TTL
    #[inline]
    #[must_use]
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notices = NotificationCenter::new(ttl);
        self
    }

    /// Load all groups
    pub async fn load(&mut self) {
        let ticket = self.guard.begin();
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        let result = self.client.groups().list().await;
        if !self.guard.is_current(ticket) {
            tracing::debug!("discarding stale groups load");
            self.state = previous;
            return;
        }
        match result {
            Ok(groups) => {
                tracing::info!(count = groups.len(), "groups loaded");
                self.groups = groups;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                self.notices.failure(&e, messages::GROUPS_LOAD_FAILED);
                self.state = LoadState::Failed;
            }
        }
    }

    /// Create a group, optionally with initial members
    ///
    /// `members` is the comma-separated id list typed by the user.
    pub async fn create(&mut self, name: &str, members: &str) -> Option<Group> {
        if name.trim().is_empty() {
            self.notices.warning(messages::GROUP_NAME_REQUIRED);
            return None;
        }
        let student_ids = match parse_student_ids(members) {
            Ok(ids) => ids,
            Err(item) => {
                tracing::warn!(%item, "rejected member list");
                self.notices.warning(messages::GROUP_MEMBERS_INVALID);
                return None;
            }
        };

        let draft = NewGroup::new(name).with_students(student_ids);
        match self.client.groups().create(&draft).await {
            Ok(group) => {
                tracing::info!(id = %group.id, "group created");
                self.groups.push(group.clone());
                self.notices.success(messages::GROUP_CREATED);
                Some(group)
            }
            Err(e) => {
                self.notices.failure(&e, messages::GROUP_CREATE_FAILED);
                None
            }
        }
    }

    /// Delete a group
    pub async fn delete(&mut self, id: GroupId) -> bool {
        match self.client.groups().delete(id).await {
            Ok(()) => {
                self.groups.retain(|g| g.id != id);
                if self.selected.as_ref().is_some_and(|g| g.id == id) {
                    self.selected = None;
                }
                self.notices.success(messages::GROUP_DELETED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::GROUP_DELETE_FAILED);
                false
            }
        }
    }

    /// Fetch one group's details into the selection
    pub async fn view(&mut self, id: GroupId) -> Option<&Group> {
        match self.client.groups().get(id).await {
            Ok(group) => {
                self.selected = Some(group);
                self.selected.as_ref()
            }
            Err(e) => {
                self.notices.failure(&e, messages::GROUP_VIEW_FAILED);
                None
            }
        }
    }

    /// Set the search filter
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Groups whose name contains the search term, ignoring case
    #[must_use]
    pub fn visible(&self) -> Vec<&Group> {
        let needle = self.search.trim().to_lowercase();
        self.groups
            .iter()
            .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// All loaded groups
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group shown in the detail view
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&Group> {
        self.selected.as_ref()
    }

    /// Load progress
    #[inline]
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Notifications
    #[inline]
    pub fn notices(&mut self) -> &mut NotificationCenter {
        &mut self.notices
    }

    /// Generation guard; `leave` discards loads in flight
    #[inline]
    #[must_use]
    pub fn guard(&self) -> &LoadGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_list_parsing() {
        let ids = parse_student_ids("1, 2,,3").unwrap();
        assert_eq!(ids, vec![StudentId::new(1), StudentId::new(2), StudentId::new(3)]);
        assert!(parse_student_ids("  ").unwrap().is_empty());
        assert_eq!(parse_student_ids("1, x2").unwrap_err(), "x2");
    }
}
