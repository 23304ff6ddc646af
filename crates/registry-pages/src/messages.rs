//! User-facing notification texts

// Groups
pub const GROUPS_LOAD_FAILED: &str = "Ошибка загрузки данных";
pub const GROUP_CREATED: &str = "Группа успешно создана";
pub const GROUP_CREATE_FAILED: &str = "Ошибка создания группы";
pub const GROUP_DELETED: &str = "Группа удалена";
pub const GROUP_DELETE_FAILED: &str = "Ошибка удаления группы";
pub const GROUP_VIEW_FAILED: &str = "Ошибка получения данных группы";
pub const GROUP_NAME_REQUIRED: &str = "Название обязательно";
pub const GROUP_MEMBERS_INVALID: &str = "Разрешены только числа и запятые";

// Students
pub const STUDENTS_LOAD_FAILED: &str = "Ошибка при загрузке студентов";
pub const STUDENT_FIELDS_REQUIRED: &str = "Заполните все обязательные поля";
pub const STUDENT_CREATED: &str = "Студент успешно добавлен";
pub const STUDENT_CREATE_FAILED: &str = "Ошибка при добавлении студента";
pub const STUDENT_UPDATED: &str = "Данные студента обновлены";
pub const STUDENT_UPDATE_FAILED: &str = "Ошибка при обновлении данных";
pub const STUDENT_DELETED: &str = "Студент удален";
pub const STUDENT_DELETE_FAILED: &str = "Ошибка при удалении студента";

// Subjects
pub const SUBJECTS_LOAD_FAILED: &str = "Ошибка при загрузке предметов";
pub const SUBJECT_NAME_REQUIRED: &str = "Введите название предмета";
pub const SUBJECT_CREATED: &str = "Предмет успешно добавлен";
pub const SUBJECT_CREATE_FAILED: &str = "Ошибка при добавлении предмета";
pub const SUBJECT_DELETED: &str = "Предмет удален";
pub const SUBJECT_DELETE_FAILED: &str = "Ошибка при удалении предмета";

// Marks
pub const MARKS_LOAD_FAILED: &str = "Ошибка при загрузке оценок";
pub const MARK_FIELDS_REQUIRED: &str = "Заполните все поля";
pub const MARK_CREATED: &str = "Оценка успешно добавлена";
pub const MARK_CREATE_FAILED: &str = "Ошибка при добавлении оценки";
pub const MARK_DELETED: &str = "Оценка удалена";
pub const MARK_DELETE_FAILED: &str = "Ошибка при удалении оценки";
pub const AVERAGE_FAILED: &str = "Ошибка при расчёте среднего";

// Student-subject links
pub const LINK_STUDENT_REQUIRED: &str = "Введите ID студента";
pub const LINK_FIELDS_REQUIRED: &str = "Заполните оба поля";
pub const LINKS_LOAD_FAILED: &str = "Ошибка загрузки предметов";
pub const LINK_CREATED: &str = "Связь успешно добавлена";
pub const LINK_CREATE_FAILED: &str = "Ошибка создания связи";
pub const LINK_REMOVED: &str = "Связь успешно удалена";
pub const LINK_REMOVE_FAILED: &str = "Ошибка удаления связи";
