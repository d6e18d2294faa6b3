use studydesk_core::db::open_db_in_memory;
use studydesk_core::{
    NewTimetableEntry, NewTodo, Priority, SqliteTimetableRepository, SqliteTodoRepository,
    TimetableService, TimetableServiceError, TodoService, TodoServiceError, ValidationError,
    Weekday,
};
use uuid::Uuid;

const NOW_MS: i64 = 1_700_000_000_000;

#[test]
fn add_todo_trims_title_and_defaults_to_pending() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let user = Uuid::new_v4();

    let created = service
        .add(
            user,
            NewTodo {
                title: "  Essay draft  ".to_string(),
                description: "History".to_string(),
                priority: Priority::High,
                due_date: Some(1_700_000_000_000),
            },
            NOW_MS,
        )
        .unwrap();

    assert_eq!(created.title, "Essay draft");
    assert!(!created.completed);
    assert_eq!(created.created_at, NOW_MS);
    assert_eq!(created.updated_at, NOW_MS);
    let listed = service.list(user).unwrap();
    assert_eq!(listed, vec![created]);
}

#[test]
fn blank_todo_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let err = service
        .add(Uuid::new_v4(), NewTodo::titled("   "), NOW_MS)
        .unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(ValidationError::BlankField("title"))
    ));
}

#[test]
fn todos_are_listed_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let user = Uuid::new_v4();
    service.add(user, NewTodo::titled("first"), 1000).unwrap();
    service.add(user, NewTodo::titled("second"), 2000).unwrap();

    let titles: Vec<String> = service
        .list(user)
        .unwrap()
        .into_iter()
        .map(|todo| todo.title)
        .collect();
    assert_eq!(titles, vec!["second".to_string(), "first".to_string()]);
}

#[test]
fn toggle_complete_flips_flag() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let user = Uuid::new_v4();
    let todo = service
        .add(user, NewTodo::titled("Read ch. 4"), NOW_MS)
        .unwrap();

    assert!(service.toggle_complete(todo.id, NOW_MS + 500).unwrap());
    let stored = service.list(user).unwrap().remove(0);
    assert!(stored.completed);
    assert_eq!(stored.created_at, NOW_MS);
    assert_eq!(stored.updated_at, NOW_MS + 500);

    assert!(!service.toggle_complete(todo.id, NOW_MS + 900).unwrap());
    let stored = service.list(user).unwrap().remove(0);
    assert!(!stored.completed);
    assert_eq!(stored.updated_at, NOW_MS + 900);
}

#[test]
fn toggle_missing_todo_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();
    assert!(matches!(
        service.toggle_complete(missing, NOW_MS),
        Err(TodoServiceError::TodoNotFound(id)) if id == missing
    ));
}

#[test]
fn delete_missing_todo_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();
    assert!(matches!(
        service.delete(missing),
        Err(TodoServiceError::TodoNotFound(id)) if id == missing
    ));
}

#[test]
fn week_groups_entries_by_day_in_start_order() {
    let conn = open_db_in_memory().unwrap();
    let service = TimetableService::new(SqliteTimetableRepository::try_new(&conn).unwrap());
    let user = Uuid::new_v4();

    service
        .add(
            user,
            NewTimetableEntry::new(Weekday::Monday, "Physics", "13:00", "14:30"),
            NOW_MS,
        )
        .unwrap();
    service
        .add(
            user,
            NewTimetableEntry::new(Weekday::Monday, "Math", "09:00", "10:00"),
            NOW_MS,
        )
        .unwrap();
    service
        .add(
            user,
            NewTimetableEntry::new(Weekday::Friday, "Art", "11:00", "12:00"),
            NOW_MS,
        )
        .unwrap();

    let week = service.week(user).unwrap();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].day, Weekday::Monday);
    let monday: Vec<&str> = week[0]
        .entries
        .iter()
        .map(|entry| entry.subject.as_str())
        .collect();
    assert_eq!(monday, vec!["Math", "Physics"]);
    assert!(week[1].entries.is_empty());
    assert_eq!(week[4].entries[0].subject, "Art");
    assert_eq!(week[6].day, Weekday::Sunday);
}

#[test]
fn invalid_timetable_entry_is_rejected_before_store() {
    let conn = open_db_in_memory().unwrap();
    let service = TimetableService::new(SqliteTimetableRepository::try_new(&conn).unwrap());
    let user = Uuid::new_v4();

    let err = service
        .add(
            user,
            NewTimetableEntry::new(Weekday::Tuesday, "Biology", "25:00", "26:00"),
            NOW_MS,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TimetableServiceError::Validation(ValidationError::InvalidTime { field: "start_time", .. })
    ));
    assert!(service.list(user).unwrap().is_empty());
}

#[test]
fn delete_timetable_entry_removes_it() {
    let conn = open_db_in_memory().unwrap();
    let service = TimetableService::new(SqliteTimetableRepository::try_new(&conn).unwrap());
    let user = Uuid::new_v4();
    let mut input = NewTimetableEntry::new(Weekday::Wednesday, "Chem", "08:00", "09:00");
    input.location = " Lab 2 ".to_string();
    let entry = service.add(user, input, NOW_MS).unwrap();
    assert_eq!(entry.location, "Lab 2");
    assert_eq!(entry.created_at, NOW_MS);

    service.delete(entry.id).unwrap();
    assert!(service.list(user).unwrap().is_empty());
    assert!(matches!(
        service.delete(entry.id),
        Err(TimetableServiceError::EntryNotFound(_))
    ));
}
