//! `/subjects` endpoints

use crate::api::{to_body, ApiClient};
use crate::error::RegistryResult;
use crate::transport::ApiRequest;
use registry_model::{NewSubject, Subject, SubjectId};

const SUBJECTS: &str = "subjects";

/// Subject endpoints
#[derive(Debug, Clone)]
pub struct SubjectService {
    api: ApiClient,
}

impl SubjectService {
    /// Create service
    #[inline]
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /subjects`
    pub async fn list(&self) -> RegistryResult<Vec<Subject>> {
        self.api.fetch(ApiRequest::get([SUBJECTS])).await
    }

    /// `GET /subjects/{id}`
    pub async fn get(&self, id: SubjectId) -> RegistryResult<Subject> {
        self.api
            .fetch(ApiRequest::get([SUBJECTS.to_string(), id.to_string()]))
            .await
    }

    /// `GET /subjects/name/{name}`
    pub async fn by_name(&self, name: &str) -> RegistryResult<Subject> {
        self.api.fetch(ApiRequest::get([SUBJECTS, "name", name])).await
    }

    /// `POST /subjects`
    pub async fn create(&self, subject: &NewSubject) -> RegistryResult<Subject> {
        let request = ApiRequest::post([SUBJECTS]).with_json(to_body(subject)?);
        self.api.fetch(request).await
    }

    /// `POST /subjects/bulk`
    pub async fn create_bulk(&self, subjects: &[NewSubject]) -> RegistryResult<Vec<Subject>> {
        let request = ApiRequest::post([SUBJECTS, "bulk"]).with_json(to_body(&subjects)?);
        self.api.fetch(request).await
    }

    /// `DELETE /subjects/{id}`
    pub async fn delete(&self, id: SubjectId) -> RegistryResult<()> {
        self.api
            .send(ApiRequest::delete([SUBJECTS.to_string(), id.to_string()]))
            .await
    }

    /// `DELETE /subjects/name/{name}`
    pub async fn delete_by_name(&self, name: &str) -> RegistryResult<()> {
        self.api.send(ApiRequest::delete([SUBJECTS, "name", name])).await
    }
}
