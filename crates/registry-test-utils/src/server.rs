//! In-memory registry server
//!
//! Implements [`Transport`] by routing requests against in-memory tables, so
//! services and controllers can be exercised without a network. Every request
//! is recorded; failures can be injected per method and path.

use async_trait::async_trait;
use parking_lot::Mutex;
use registry_client::{ApiRequest, ApiResponse, Method, RegistryError, RegistryResult, Transport};
use registry_model::{
    Group, GroupId, GroupRef, Mark, MarkId, NewGroup, NewMark, NewStudent, NewSubject, Student,
    StudentId, StudentSubjectLink, StudentWithSubjects, Subject, SubjectId, SubjectWithStudents,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A request as seen by the server
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Injected failure
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// No response at all
    Transport,
    /// Response with a status and optional `message`
    Status(u16, Option<String>),
}

#[derive(Debug, Clone)]
struct FailureRule {
    method: Method,
    path: String,
    failure: Failure,
    remaining: Option<usize>,
}

#[derive(Debug, Default)]
struct Tables {
    groups: BTreeMap<GroupId, Group>,
    students: BTreeMap<StudentId, Student>,
    subjects: BTreeMap<SubjectId, Subject>,
    marks: BTreeMap<MarkId, Mark>,
    links: BTreeSet<StudentSubjectLink>,
    next_id: i64,
}

impl Tables {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn group_ref(&self, id: GroupId) -> GroupRef {
        GroupRef {
            id,
            name: self.groups.get(&id).map(|g| g.name.clone()),
        }
    }

    fn subjects_of(&self, student: StudentId) -> Vec<Subject> {
        self.links
            .iter()
            .filter(|l| l.student_id == student)
            .filter_map(|l| self.subjects.get(&l.subject_id).cloned())
            .collect()
    }

    fn students_of(&self, subject: SubjectId) -> Vec<Student> {
        self.links
            .iter()
            .filter(|l| l.subject_id == subject)
            .filter_map(|l| self.students.get(&l.student_id).cloned())
            .collect()
    }

    fn student_named(&self, name: &str) -> Option<&Student> {
        self.students.values().find(|s| s.name == name)
    }

    fn subject_named(&self, name: &str) -> Option<&Subject> {
        self.subjects.values().find(|s| s.name == name)
    }

    fn with_subjects(&self, student: &Student) -> StudentWithSubjects {
        StudentWithSubjects {
            id: student.id,
            name: student.name.clone(),
            subjects: self.subjects_of(student.id),
        }
    }

    fn with_students(&self, subject: &Subject) -> SubjectWithStudents {
        SubjectWithStudents {
            id: subject.id,
            name: subject.name.clone(),
            students: self.students_of(subject.id),
        }
    }
}

/// In-memory registry implementing [`Transport`]
#[derive(Debug, Default)]
pub struct FakeRegistry {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<Vec<FailureRule>>,
    latency: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, so concurrent requests overlap
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Add a group with a fixed id
    pub fn insert_group(&self, group: Group) {
        let mut tables = self.tables.lock();
        tables.next_id = tables.next_id.max(group.id.get());
        tables.groups.insert(group.id, group);
    }

    /// Add a student with a fixed id
    pub fn insert_student(&self, student: Student) {
        let mut tables = self.tables.lock();
        tables.next_id = tables.next_id.max(student.id.get());
        tables.students.insert(student.id, student);
    }

    /// Add a subject with a fixed id
    pub fn insert_subject(&self, subject: Subject) {
        let mut tables = self.tables.lock();
        tables.next_id = tables.next_id.max(subject.id.get());
        tables.subjects.insert(subject.id, subject);
    }

    /// Add a mark with a fixed id
    ///
    /// The referenced student and subject need not exist.
    pub fn insert_mark(&self, mark: Mark) {
        let mut tables = self.tables.lock();
        tables.next_id = tables.next_id.max(mark.id.get());
        tables.marks.insert(mark.id, mark);
    }

    /// Add a link
    pub fn insert_link(&self, student: StudentId, subject: SubjectId) {
        self.tables
            .lock()
            .links
            .insert(StudentSubjectLink::new(student, subject));
    }

    /// Whether a link exists
    #[must_use]
    pub fn has_link(&self, student: StudentId, subject: SubjectId) -> bool {
        self.tables
            .lock()
            .links
            .contains(&StudentSubjectLink::new(student, subject))
    }

    /// Current student rows
    #[must_use]
    pub fn students(&self) -> Vec<Student> {
        self.tables.lock().students.values().cloned().collect()
    }

    /// Current mark rows
    #[must_use]
    pub fn marks(&self) -> Vec<Mark> {
        self.tables.lock().marks.values().copied().collect()
    }

    /// Fail every matching request
    pub fn fail(&self, method: Method, path: impl Into<String>, failure: Failure) {
        self.failures.lock().push(FailureRule {
            method,
            path: path.into(),
            failure,
            remaining: None,
        });
    }

    /// Fail the next matching request only
    pub fn fail_once(&self, method: Method, path: impl Into<String>, failure: Failure) {
        self.failures.lock().push(FailureRule {
            method,
            path: path.into(),
            failure,
            remaining: Some(1),
        });
    }

    /// Drop all injected failures
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// All requests received so far
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of requests with this method and exact path
    #[must_use]
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    /// Number of requests with this method whose path starts with `prefix`
    #[must_use]
    pub fn count_prefix(&self, method: Method, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.path.starts_with(prefix))
            .count()
    }

    /// Forget recorded requests
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Highest number of requests that were in progress at once
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn take_failure(&self, method: Method, path: &str) -> Option<Failure> {
        let mut rules = self.failures.lock();
        let idx = rules
            .iter()
            .position(|r| r.method == method && r.path == path)?;
        let rule = &mut rules[idx];
        let failure = rule.failure.clone();
        let exhausted = match rule.remaining.as_mut() {
            Some(n) => {
                *n = n.saturating_sub(1);
                *n == 0
            }
            None => false,
        };
        if exhausted {
            rules.remove(idx);
        }
        Some(failure)
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let mut t = self.tables.lock();

        match (request.method, segments.as_slice()) {
            // groups
            (Method::Get, ["groups"]) => ok(&t.groups.values().collect::<Vec<_>>()),
            (Method::Get, ["groups", id]) => match parse::<GroupId>(id) {
                Some(id) => t.groups.get(&id).map_or_else(|| not_found("Группа"), ok),
                None => bad_request("invalid id"),
            },
            (Method::Post, ["groups"]) => match body::<NewGroup>(request) {
                Some(draft) if !draft.name.trim().is_empty() => {
                    let group = Group::new(GroupId::new(t.allocate()), draft.name);
                    for sid in draft.student_ids {
                        let group_ref = GroupRef {
                            id: group.id,
                            name: Some(group.name.clone()),
                        };
                        if let Some(student) = t.students.get_mut(&sid) {
                            student.group = Some(group_ref);
                        }
                    }
                    t.groups.insert(group.id, group.clone());
                    created(&group)
                }
                _ => bad_request("Название группы обязательно"),
            },
            (Method::Delete, ["groups", id]) => match parse::<GroupId>(id) {
                Some(id) if t.groups.remove(&id).is_some() => {
                    for student in t.students.values_mut() {
                        if student.group_id() == Some(id) {
                            student.group = None;
                        }
                    }
                    no_content()
                }
                _ => not_found("Группа"),
            },

            // students
            (Method::Get, ["students"]) => ok(&t.students.values().collect::<Vec<_>>()),
            (Method::Get, ["students", "group", gid]) => match parse::<GroupId>(gid) {
                Some(gid) => ok(&t
                    .students
                    .values()
                    .filter(|s| s.group_id() == Some(gid))
                    .collect::<Vec<_>>()),
                None => bad_request("invalid id"),
            },
            (Method::Get, ["students", id]) => match parse::<StudentId>(id) {
                Some(id) => t.students.get(&id).map_or_else(|| not_found("Студент"), ok),
                None => bad_request("invalid id"),
            },
            (Method::Post, ["students", "bulk"]) => match body::<Vec<NewStudent>>(request) {
                Some(drafts) => {
                    let mut created_rows = Vec::with_capacity(drafts.len());
                    for draft in drafts {
                        let student = insert_student(&mut t, draft);
                        created_rows.push(student);
                    }
                    created(&created_rows)
                }
                None => bad_request("invalid body"),
            },
            (Method::Post, ["students"]) => match body::<NewStudent>(request) {
                Some(draft) if !draft.name.trim().is_empty() => {
                    let student = insert_student(&mut t, draft);
                    created(&student)
                }
                _ => bad_request("Имя студента обязательно"),
            },
            (Method::Put, ["students", id]) => {
                let name = request.query_value("name").map(str::to_string);
                let age = request.query_value("age").and_then(|a| a.parse::<i32>().ok());
                match (parse::<StudentId>(id), name, age) {
                    (Some(id), Some(name), Some(age)) => match t.students.get_mut(&id) {
                        Some(student) => {
                            student.name = name;
                            student.age = age;
                            ok(&*student)
                        }
                        None => not_found("Студент"),
                    },
                    _ => bad_request("name and age are required"),
                }
            }
            (Method::Delete, ["students", id]) => match parse::<StudentId>(id) {
                Some(id) if t.students.remove(&id).is_some() => {
                    t.links.retain(|l| l.student_id != id);
                    no_content()
                }
                _ => not_found("Студент"),
            },

            // subjects
            (Method::Get, ["subjects"]) => ok(&t.subjects.values().collect::<Vec<_>>()),
            (Method::Get, ["subjects", "name", name]) => t
                .subject_named(name)
                .map_or_else(|| not_found("Предмет"), ok),
            (Method::Get, ["subjects", id]) => match parse::<SubjectId>(id) {
                Some(id) => t.subjects.get(&id).map_or_else(|| not_found("Предмет"), ok),
                None => bad_request("invalid id"),
            },
            (Method::Post, ["subjects", "bulk"]) => match body::<Vec<NewSubject>>(request) {
                Some(drafts) => {
                    let mut rows = Vec::with_capacity(drafts.len());
                    for draft in drafts {
                        let subject = Subject::new(SubjectId::new(t.allocate()), draft.name);
                        t.subjects.insert(subject.id, subject.clone());
                        rows.push(subject);
                    }
                    created(&rows)
                }
                None => bad_request("invalid body"),
            },
            (Method::Post, ["subjects"]) => match body::<NewSubject>(request) {
                Some(draft) if !draft.name.trim().is_empty() => {
                    if t.subject_named(&draft.name).is_some() {
                        return conflict("Предмет уже существует");
                    }
                    let subject = Subject::new(SubjectId::new(t.allocate()), draft.name);
                    t.subjects.insert(subject.id, subject.clone());
                    created(&subject)
                }
                _ => bad_request("Название предмета обязательно"),
            },
            (Method::Delete, ["subjects", "name", name]) => {
                match t.subject_named(name).map(|s| s.id) {
                    Some(id) => {
                        t.subjects.remove(&id);
                        t.links.retain(|l| l.subject_id != id);
                        no_content()
                    }
                    None => not_found("Предмет"),
                }
            }
            (Method::Delete, ["subjects", id]) => match parse::<SubjectId>(id) {
                Some(id) if t.subjects.remove(&id).is_some() => {
                    t.links.retain(|l| l.subject_id != id);
                    no_content()
                }
                _ => not_found("Предмет"),
            },

            // marks
            (Method::Get, ["marks"]) => ok(&t.marks.values().collect::<Vec<_>>()),
            (Method::Get, ["marks", "value", value]) => match value.parse::<i32>() {
                Ok(value) => ok(&t
                    .marks
                    .values()
                    .filter(|m| m.value == value)
                    .collect::<Vec<_>>()),
                Err(_) => bad_request("invalid value"),
            },
            (Method::Get, ["marks", "average", "student", id]) => match parse::<StudentId>(id) {
                Some(id) => average(t.marks.values().filter(|m| m.student_id == id)),
                None => bad_request("invalid id"),
            },
            (Method::Get, ["marks", "average", "subject", id]) => match parse::<SubjectId>(id) {
                Some(id) => average(t.marks.values().filter(|m| m.subject_id == id)),
                None => bad_request("invalid id"),
            },
            (Method::Get, ["marks", "students", "name", name]) => match t.student_named(name) {
                Some(student) => {
                    let id = student.id;
                    ok(&t
                        .marks
                        .values()
                        .filter(|m| m.student_id == id)
                        .collect::<Vec<_>>())
                }
                None => not_found("Студент"),
            },
            (Method::Get, ["marks", "students", id]) => match parse::<StudentId>(id) {
                Some(id) => t.students.get(&id).map_or_else(|| not_found("Студент"), ok),
                None => bad_request("invalid id"),
            },
            (Method::Get, ["marks", "subjects", id]) => match parse::<SubjectId>(id) {
                Some(id) => t.subjects.get(&id).map_or_else(|| not_found("Предмет"), ok),
                None => bad_request("invalid id"),
            },
            (Method::Post, ["marks", "bulk"]) => match body::<Vec<NewMark>>(request) {
                Some(drafts) => {
                    let mut rows = Vec::with_capacity(drafts.len());
                    for draft in drafts {
                        rows.push(insert_mark(&mut t, draft));
                    }
                    created(&rows)
                }
                None => bad_request("invalid body"),
            },
            (Method::Post, ["marks"]) => match body::<NewMark>(request) {
                Some(draft) => {
                    if !t.students.contains_key(&draft.student_id) {
                        return not_found("Студент");
                    }
                    if !t.subjects.contains_key(&draft.subject_id) {
                        return not_found("Предмет");
                    }
                    let mark = insert_mark(&mut t, draft);
                    created(&mark)
                }
                None => bad_request("invalid body"),
            },
            (Method::Delete, ["marks", "delete-specific"]) => {
                let student = request.query_value("studentId").and_then(parse::<StudentId>);
                let subject = request.query_value("subjectId").and_then(parse::<SubjectId>);
                let value = request.query_value("value").and_then(|v| v.parse::<i32>().ok());
                match (student, subject) {
                    (Some(student), Some(subject)) => {
                        let before = t.marks.len();
                        t.marks.retain(|_, m| {
                            !(m.student_id == student
                                && m.subject_id == subject
                                && value.map_or(true, |v| m.value == v))
                        });
                        if t.marks.len() == before {
                            not_found("Оценка")
                        } else {
                            no_content()
                        }
                    }
                    _ => bad_request("studentId and subjectId are required"),
                }
            }
            (Method::Delete, ["marks", id]) => match parse::<MarkId>(id) {
                Some(id) if t.marks.remove(&id).is_some() => no_content(),
                _ => not_found("Оценка"),
            },

            // student-subject links
            (Method::Get, ["student-subjects", "students"]) => ok(&t
                .students
                .values()
                .map(|s| t.with_subjects(s))
                .collect::<Vec<_>>()),
            (Method::Get, ["student-subjects", "subjects"]) => ok(&t
                .subjects
                .values()
                .map(|s| t.with_students(s))
                .collect::<Vec<_>>()),
            (Method::Get, ["student-subjects", "student", id, "with-subjects"]) => {
                match parse::<StudentId>(id).and_then(|id| t.students.get(&id)) {
                    Some(student) => ok(&t.with_subjects(student)),
                    None => not_found("Студент"),
                }
            }
            (Method::Get, ["student-subjects", "subject", id, "with-students"]) => {
                match parse::<SubjectId>(id).and_then(|id| t.subjects.get(&id)) {
                    Some(subject) => ok(&t.with_students(subject)),
                    None => not_found("Предмет"),
                }
            }
            (Method::Get, ["student-subjects", "students", "name", name, "subjects"]) => {
                match t.student_named(name) {
                    Some(student) => ok(&t.subjects_of(student.id)),
                    None => not_found("Студент"),
                }
            }
            (Method::Post | Method::Delete, ["student-subjects", "students", "name", student, "subjects", "name", subject]) => {
                let pair = t
                    .student_named(student)
                    .map(|s| s.id)
                    .zip(t.subject_named(subject).map(|s| s.id));
                match pair {
                    Some((student, subject)) => toggle_link(&mut t, request.method, student, subject),
                    None => not_found("Студент или предмет"),
                }
            }
            (Method::Get, ["student-subjects", id, "subjects"]) => match parse::<StudentId>(id) {
                Some(id) if t.students.contains_key(&id) => ok(&t.subjects_of(id)),
                _ => not_found("Студент"),
            },
            (Method::Get, ["student-subjects", id, "students"]) => match parse::<SubjectId>(id) {
                Some(id) if t.subjects.contains_key(&id) => ok(&t.students_of(id)),
                _ => not_found("Предмет"),
            },
            (Method::Post, ["student-subjects", "bulk"]) => {
                let student = request.query_value("studentId").and_then(parse::<StudentId>);
                match (student, body::<Vec<SubjectId>>(request)) {
                    (Some(student), Some(subjects)) => {
                        if !t.students.contains_key(&student) {
                            return not_found("Студент");
                        }
                        for subject in subjects {
                            if t.subjects.contains_key(&subject) {
                                t.links.insert(StudentSubjectLink::new(student, subject));
                            }
                        }
                        no_content()
                    }
                    _ => bad_request("studentId and subject list are required"),
                }
            }
            (Method::Post | Method::Delete, ["student-subjects"]) => {
                let student = request.query_value("studentId").and_then(parse::<StudentId>);
                let subject = request.query_value("subjectId").and_then(parse::<SubjectId>);
                match (student, subject) {
                    (Some(student), Some(subject)) => {
                        if !t.students.contains_key(&student) {
                            return not_found("Студент");
                        }
                        if !t.subjects.contains_key(&subject) {
                            return not_found("Предмет");
                        }
                        toggle_link(&mut t, request.method, student, subject)
                    }
                    _ => bad_request("studentId and subjectId are required"),
                }
            }

            _ => ApiResponse::new(404, Some(json!({"message": "Unknown endpoint"}))),
        }
    }
}

#[async_trait]
impl Transport for FakeRegistry {
    async fn send(&self, request: ApiRequest) -> RegistryResult<ApiResponse> {
        self.calls.lock().push(RecordedCall {
            method: request.method,
            path: request.path(),
            query: request.query.clone(),
            body: request.body.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let result = match self.take_failure(request.method, &request.path()) {
            Some(Failure::Transport) => Err(RegistryError::transport("connection refused")),
            Some(Failure::Status(status, message)) => Ok(ApiResponse::new(
                status,
                message.map(|m| json!({ "message": m })),
            )),
            None => Ok(self.route(&request)),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn insert_student(t: &mut Tables, draft: NewStudent) -> Student {
    let mut student = Student::new(StudentId::new(t.allocate()), draft.name, draft.age);
    student.group = draft.group.map(|g| t.group_ref(g.id));
    t.students.insert(student.id, student.clone());
    student
}

fn insert_mark(t: &mut Tables, draft: NewMark) -> Mark {
    let mark = Mark::new(
        MarkId::new(t.allocate()),
        draft.student_id,
        draft.subject_id,
        draft.value,
    );
    t.marks.insert(mark.id, mark);
    mark
}

fn toggle_link(t: &mut Tables, method: Method, student: StudentId, subject: SubjectId) -> ApiResponse {
    let link = StudentSubjectLink::new(student, subject);
    if method == Method::Post {
        if t.links.insert(link) {
            created(&link)
        } else {
            conflict("Связь уже существует")
        }
    } else if t.links.remove(&link) {
        no_content()
    } else {
        not_found("Связь")
    }
}

fn average<'a>(marks: impl Iterator<Item = &'a Mark>) -> ApiResponse {
    let values: Vec<f64> = marks.map(|m| f64::from(m.value)).collect();
    if values.is_empty() {
        return ok(&0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    ok(&avg)
}

fn parse<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

fn body<T: DeserializeOwned>(request: &ApiRequest) -> Option<T> {
    request
        .body
        .clone()
        .and_then(|b| serde_json::from_value(b).ok())
}

fn ok<T: Serialize + ?Sized>(value: &T) -> ApiResponse {
    ApiResponse::new(200, serde_json::to_value(value).ok())
}

fn created<T: Serialize + ?Sized>(value: &T) -> ApiResponse {
    ApiResponse::new(201, serde_json::to_value(value).ok())
}

fn no_content() -> ApiResponse {
    ApiResponse::new(204, None)
}

fn not_found(what: &str) -> ApiResponse {
    ApiResponse::new(404, Some(json!({ "message": format!("{what} не найден") })))
}

fn bad_request(message: &str) -> ApiResponse {
    ApiResponse::new(400, Some(json!({ "message": message })))
}

fn conflict(message: &str) -> ApiResponse {
    ApiResponse::new(409, Some(json!({ "message": message })))
}
