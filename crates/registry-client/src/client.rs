//! Aggregate client exposing every resource service

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::RegistryResult;
use crate::services::{GroupService, LinkService, MarkService, StudentService, SubjectService};
use crate::transport::Transport;
use std::sync::Arc;

/// Entry point bundling all resource services over one transport
#[derive(Debug, Clone)]
pub struct RegistryClient {
    groups: GroupService,
    students: StudentService,
    subjects: SubjectService,
    marks: MarkService,
    links: LinkService,
}

impl RegistryClient {
    /// Create client over an API client
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            groups: GroupService::new(api.clone()),
            students: StudentService::new(api.clone()),
            subjects: SubjectService::new(api.clone()),
            marks: MarkService::new(api.clone()),
            links: LinkService::new(api),
        }
    }

    /// Create client over any transport
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::new(ApiClient::new(transport))
    }

    /// Create HTTP client from configuration
    ///
    /// # Errors
    /// `RegistryError::Config` if the configuration is invalid
    pub fn from_config(config: &ClientConfig) -> RegistryResult<Self> {
        tracing::info!(base_url = %config.base_url, "creating registry client");
        Ok(Self::new(ApiClient::http(config)?))
    }

    /// Group endpoints
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &GroupService {
        &self.groups
    }

    /// Student endpoints
    #[inline]
    #[must_use]
    pub fn students(&self) -> &StudentService {
        &self.students
    }

    /// Subject endpoints
    #[inline]
    #[must_use]
    pub fn subjects(&self) -> &SubjectService {
        &self.subjects
    }

    /// Mark endpoints
    #[inline]
    #[must_use]
    pub fn marks(&self) -> &MarkService {
        &self.marks
    }

    /// Student-subject link endpoints
    #[inline]
    #[must_use]
    pub fn links(&self) -> &LinkService {
        &self.links
    }
}
