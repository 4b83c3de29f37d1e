#[cfg(test)]
mod tests {
    use calendra_db::schema::models::{DayOfWeek, ScheduleAvailability};
    use calendra_db::schema::{
        OnDelete, SqlType, CALENDRA, EVENTS, SCHEDULES, SCHEDULE_AVAILABILITIES,
    };
    use uuid::Uuid;

    #[test]
    fn test_known_tables_resolve() {
        let names: Vec<&str> = CALENDRA.table_names().collect();
        assert_eq!(names, vec![EVENTS, SCHEDULES, SCHEDULE_AVAILABILITIES]);

        assert!(CALENDRA.table("events").is_some());
        assert!(CALENDRA.table("users").is_none());
    }

    #[test]
    fn test_events_columns() {
        let events = CALENDRA.table(EVENTS).unwrap();

        assert_eq!(events.primary_key().map(|c| c.name), Some("id"));
        assert!(events.column("description").unwrap().nullable);
        assert_eq!(
            events.column("durationInMinutes").unwrap().sql_type,
            SqlType::Integer
        );
        assert!(events.column("duration_in_minutes").is_none());

        let required: Vec<&str> = events
            .columns
            .iter()
            .filter(|c| c.is_required())
            .map(|c| c.name)
            .collect();
        assert_eq!(required, vec!["name", "durationInMinutes", "clerkUserId"]);

        assert!(events.column("updatedAt").unwrap().refresh_on_update);
        assert!(!events.column("createdAt").unwrap().refresh_on_update);
        assert_eq!(events.indexes[0].columns, &["clerkUserId"]);
    }

    #[test]
    fn test_availability_references_schedule() {
        let availabilities = CALENDRA.table(SCHEDULE_AVAILABILITIES).unwrap();
        let schedule_id = availabilities.column("scheduleId").unwrap();
        let reference = schedule_id.references.unwrap();

        assert_eq!(reference.table, SCHEDULES);
        assert_eq!(reference.column, "id");
        assert_eq!(reference.on_delete, OnDelete::Cascade);

        let referencing: Vec<&str> = CALENDRA
            .referencing(SCHEDULES)
            .iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(referencing, vec![SCHEDULE_AVAILABILITIES]);
        assert!(CALENDRA.referencing(EVENTS).is_empty());
    }

    #[test]
    fn test_schedule_clerk_user_is_unique() {
        let schedules = CALENDRA.table(SCHEDULES).unwrap();
        assert!(schedules.column("clerkUserId").unwrap().unique);
    }

    #[test]
    fn test_day_of_week_order_and_names() {
        let names: Vec<&str> = DayOfWeek::IN_ORDER.iter().map(|d| d.as_str()).collect();
        assert_eq!(
            names,
            vec!["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
        );
    }

    #[test]
    fn test_availability_serializes_camel_case() {
        let availability = ScheduleAvailability {
            id: Uuid::new_v4(),
            schedule_id: Uuid::new_v4(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            day_of_week: DayOfWeek::Friday,
        };

        let json = serde_json::to_value(&availability).unwrap();
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "17:00");
        assert_eq!(json["dayOfWeek"], "friday");
        assert!(json.get("scheduleId").is_some());
    }
}
