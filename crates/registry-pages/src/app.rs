//! All pages over one client

use crate::{GroupsPage, LinksPage, MarksPage, StudentsPage, SubjectsPage};
use registry_client::{ClientConfig, RegistryClient, RegistryResult};

/// One controller per page, sharing a client but no other state
#[derive(Debug)]
pub struct App {
    /// Groups page
    pub groups: GroupsPage,
    /// Students page
    pub students: StudentsPage,
    /// Subjects page
    pub subjects: SubjectsPage,
    /// Marks page
    pub marks: MarksPage,
    /// Student-subject links page
    pub links: LinksPage,
}

impl App {
    /// Build every page over `client`
    #[must_use]
    pub fn new(client: &RegistryClient, config: &ClientConfig) -> Self {
        let ttl = config.notification_ttl();
        Self {
            groups: GroupsPage::new(client.clone()).with_notification_ttl(ttl),
            students: StudentsPage::new(client.clone()).with_notification_ttl(ttl),
            subjects: SubjectsPage::new(client.clone()).with_notification_ttl(ttl),
            marks: MarksPage::new(client.clone()).with_notification_ttl(ttl),
            links: LinksPage::new(client.clone()).with_notification_ttl(ttl),
        }
    }

    /// Build every page over an HTTP client for `config`
    ///
    /// # Errors
    /// `RegistryError::Config` if the configuration is invalid
    pub fn from_config(config: &ClientConfig) -> RegistryResult<Self> {
        let client = RegistryClient::from_config(config)?;
        Ok(Self::new(&client, config))
    }
}
