//! `/student-subjects` endpoints
//!
//! Id-based operations are the canonical way to link; the name-based
//! variants address students and subjects by display name instead.

use crate::api::{to_body, ApiClient};
use crate::error::RegistryResult;
use crate::transport::ApiRequest;
use registry_model::{
    Student, StudentId, StudentWithSubjects, Subject, SubjectId, SubjectWithStudents,
};

const LINKS: &str = "student-subjects";

/// Student-subject link endpoints
#[derive(Debug, Clone)]
pub struct LinkService {
    api: ApiClient,
}

impl LinkService {
    /// Create service
    #[inline]
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /student-subjects/{studentId}/subjects`
    pub async fn subjects_of(&self, student: StudentId) -> RegistryResult<Vec<Subject>> {
        self.api
            .fetch(ApiRequest::get([LINKS.to_string(), student.to_string(), "subjects".to_string()]))
            .await
    }

    /// `GET /student-subjects/{subjectId}/students`
    pub async fn students_of(&self, subject: SubjectId) -> RegistryResult<Vec<Student>> {
        self.api
            .fetch(ApiRequest::get([LINKS.to_string(), subject.to_string(), "students".to_string()]))
            .await
    }

    /// `GET /student-subjects/student/{id}/with-subjects`
    pub async fn student_with_subjects(
        &self,
        student: StudentId,
    ) -> RegistryResult<StudentWithSubjects> {
        self.api
            .fetch(ApiRequest::get([
                LINKS.to_string(),
                "student".to_string(),
                student.to_string(),
                "with-subjects".to_string(),
            ]))
            .await
    }

    /// `GET /student-subjects/subject/{id}/with-students`
    pub async fn subject_with_students(
        &self,
        subject: SubjectId,
    ) -> RegistryResult<SubjectWithStudents> {
        self.api
            .fetch(ApiRequest::get([
                LINKS.to_string(),
                "subject".to_string(),
                subject.to_string(),
                "with-students".to_string(),
            ]))
            .await
    }

    /// `GET /student-subjects/students`
    pub async fn all_students(&self) -> RegistryResult<Vec<StudentWithSubjects>> {
        self.api.fetch(ApiRequest::get([LINKS, "students"])).await
    }

    /// `GET /student-subjects/subjects`
    pub async fn all_subjects(&self) -> RegistryResult<Vec<SubjectWithStudents>> {
        self.api.fetch(ApiRequest::get([LINKS, "subjects"])).await
    }

    /// `POST /student-subjects?studentId&subjectId`
    pub async fn link(&self, student: StudentId, subject: SubjectId) -> RegistryResult<()> {
        let request = ApiRequest::post([LINKS])
            .with_query("studentId", student)
            .with_query("subjectId", subject);
        self.api.send(request).await
    }

    /// `POST /student-subjects/bulk?studentId` with the subject id list as body
    pub async fn link_bulk(&self, student: StudentId, subjects: &[SubjectId]) -> RegistryResult<()> {
        let request = ApiRequest::post([LINKS, "bulk"])
            .with_query("studentId", student)
            .with_json(to_body(&subjects)?);
        self.api.send(request).await
    }

    /// `DELETE /student-subjects?studentId&subjectId`
    pub async fn unlink(&self, student: StudentId, subject: SubjectId) -> RegistryResult<()> {
        let request = ApiRequest::delete([LINKS])
            .with_query("studentId", student)
            .with_query("subjectId", subject);
        self.api.send(request).await
    }

    /// `GET /student-subjects/students/name/{name}/subjects`
    pub async fn subjects_of_named(&self, student_name: &str) -> RegistryResult<Vec<Subject>> {
        self.api
            .fetch(ApiRequest::get([LINKS, "students", "name", student_name, "subjects"]))
            .await
    }

    /// `POST /student-subjects/students/name/{name}/subjects/name/{name}`
    pub async fn link_named(&self, student_name: &str, subject_name: &str) -> RegistryResult<()> {
        self.api
            .send(ApiRequest::post(named_link_path(student_name, subject_name)))
            .await
    }

    /// `DELETE /student-subjects/students/name/{name}/subjects/name/{name}`
    pub async fn unlink_named(&self, student_name: &str, subject_name: &str) -> RegistryResult<()> {
        self.api
            .send(ApiRequest::delete(named_link_path(student_name, subject_name)))
            .await
    }
}

fn named_link_path<'a>(student_name: &'a str, subject_name: &'a str) -> [&'a str; 7] {
    [LINKS, "students", "name", student_name, "subjects", "name", subject_name]
}
