//! `/students` endpoints

use crate::api::{to_body, ApiClient};
use crate::error::RegistryResult;
use crate::transport::ApiRequest;
use registry_model::{GroupId, NewStudent, Student, StudentId, StudentUpdate};

const STUDENTS: &str = "students";

/// Student endpoints
#[derive(Debug, Clone)]
pub struct StudentService {
    api: ApiClient,
}

impl StudentService {
    /// Create service
    #[inline]
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /students`
    pub async fn list(&self) -> RegistryResult<Vec<Student>> {
        self.api.fetch(ApiRequest::get([STUDENTS])).await
    }

    /// `GET /students/{id}`
    pub async fn get(&self, id: StudentId) -> RegistryResult<Student> {
        self.api
            .fetch(ApiRequest::get([STUDENTS.to_string(), id.to_string()]))
            .await
    }

    /// `GET /students/group/{groupId}`
    pub async fn by_group(&self, group: GroupId) -> RegistryResult<Vec<Student>> {
        self.api
            .fetch(ApiRequest::get([STUDENTS.to_string(), "group".to_string(), group.to_string()]))
            .await
    }

    /// `POST /students`
    pub async fn create(&self, student: &NewStudent) -> RegistryResult<Student> {
        let request = ApiRequest::post([STUDENTS]).with_json(to_body(student)?);
        self.api.fetch(request).await
    }

    /// `POST /students/bulk`
    pub async fn create_bulk(&self, students: &[NewStudent]) -> RegistryResult<Vec<Student>> {
        let request = ApiRequest::post([STUDENTS, "bulk"]).with_json(to_body(&students)?);
        self.api.fetch(request).await
    }

    /// `PUT /students/{id}?name=..&age=..`
    pub async fn update(&self, id: StudentId, update: &StudentUpdate) -> RegistryResult<Student> {
        let request = ApiRequest::put([STUDENTS.to_string(), id.to_string()])
            .with_query_pairs(update.to_query());
        self.api.fetch(request).await
    }

    /// `DELETE /students/{id}`
    pub async fn delete(&self, id: StudentId) -> RegistryResult<()> {
        self.api
            .send(ApiRequest::delete([STUDENTS.to_string(), id.to_string()]))
            .await
    }
}
