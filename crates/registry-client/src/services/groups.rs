//! `/groups` endpoints

use crate::api::{to_body, ApiClient};
use crate::error::RegistryResult;
use crate::transport::ApiRequest;
use registry_model::{Group, GroupId, NewGroup};

const GROUPS: &str = "groups";

/// Group endpoints
#[derive(Debug, Clone)]
pub struct GroupService {
    api: ApiClient,
}

impl GroupService {
    /// Create service
    #[inline]
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /groups`
    pub async fn list(&self) -> RegistryResult<Vec<Group>> {
        self.api.fetch(ApiRequest::get([GROUPS])).await
    }

    /// `GET /groups/{id}`
    pub async fn get(&self, id: GroupId) -> RegistryResult<Group> {
        self.api.fetch(ApiRequest::get([GROUPS.to_string(), id.to_string()])).await
    }

    /// `POST /groups`
    pub async fn create(&self, group: &NewGroup) -> RegistryResult<Group> {
        let request = ApiRequest::post([GROUPS]).with_json(to_body(group)?);
        self.api.fetch(request).await
    }

    /// `DELETE /groups/{id}`
    pub async fn delete(&self, id: GroupId) -> RegistryResult<()> {
        self.api
            .send(ApiRequest::delete([GROUPS.to_string(), id.to_string()]))
            .await
    }
}
