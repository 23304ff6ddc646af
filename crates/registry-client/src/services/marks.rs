//! `/marks` endpoints

use crate::api::{to_body, ApiClient};
use crate::error::RegistryResult;
use crate::transport::ApiRequest;
use registry_model::{Mark, MarkId, MarkSelector, NewMark, Student, StudentId, Subject, SubjectId};

const MARKS: &str = "marks";

/// Mark endpoints
#[derive(Debug, Clone)]
pub struct MarkService {
    api: ApiClient,
}

impl MarkService {
    /// Create service
    #[inline]
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /marks`
    pub async fn list(&self) -> RegistryResult<Vec<Mark>> {
        self.api.fetch(ApiRequest::get([MARKS])).await
    }

    /// `GET /marks/value/{value}`
    pub async fn by_value(&self, value: i32) -> RegistryResult<Vec<Mark>> {
        self.api
            .fetch(ApiRequest::get([MARKS.to_string(), "value".to_string(), value.to_string()]))
            .await
    }

    /// `GET /marks/average/student/{id}`
    pub async fn average_for_student(&self, id: StudentId) -> RegistryResult<f64> {
        self.api
            .fetch(ApiRequest::get([
                MARKS.to_string(),
                "average".to_string(),
                "student".to_string(),
                id.to_string(),
            ]))
            .await
    }

    /// `GET /marks/average/subject/{id}`
    pub async fn average_for_subject(&self, id: SubjectId) -> RegistryResult<f64> {
        self.api
            .fetch(ApiRequest::get([
                MARKS.to_string(),
                "average".to_string(),
                "subject".to_string(),
                id.to_string(),
            ]))
            .await
    }

    /// `GET /marks/students/{id}`: the graded student record
    pub async fn student(&self, id: StudentId) -> RegistryResult<Student> {
        self.api
            .fetch(ApiRequest::get([MARKS.to_string(), "students".to_string(), id.to_string()]))
            .await
    }

    /// `GET /marks/subjects/{id}`: the graded subject record
    pub async fn subject(&self, id: SubjectId) -> RegistryResult<Subject> {
        self.api
            .fetch(ApiRequest::get([MARKS.to_string(), "subjects".to_string(), id.to_string()]))
            .await
    }

    /// `GET /marks/students/name/{name}`
    pub async fn by_student_name(&self, name: &str) -> RegistryResult<Vec<Mark>> {
        self.api
            .fetch(ApiRequest::get([MARKS, "students", "name", name]))
            .await
    }

    /// `POST /marks`
    pub async fn create(&self, mark: &NewMark) -> RegistryResult<Mark> {
        let request = ApiRequest::post([MARKS]).with_json(to_body(mark)?);
        self.api.fetch(request).await
    }

    /// `POST /marks/bulk`
    pub async fn create_bulk(&self, marks: &[NewMark]) -> RegistryResult<Vec<Mark>> {
        let request = ApiRequest::post([MARKS, "bulk"]).with_json(to_body(&marks)?);
        self.api.fetch(request).await
    }

    /// `DELETE /marks/{id}`
    pub async fn delete(&self, id: MarkId) -> RegistryResult<()> {
        self.api
            .send(ApiRequest::delete([MARKS.to_string(), id.to_string()]))
            .await
    }

    /// `DELETE /marks/delete-specific?studentId&subjectId[&value]`
    pub async fn delete_specific(&self, selector: &MarkSelector) -> RegistryResult<()> {
        let request =
            ApiRequest::delete([MARKS, "delete-specific"]).with_query_pairs(selector.to_query());
        self.api.send(request).await
    }
}
