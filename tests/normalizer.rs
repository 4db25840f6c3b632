#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use timesheet::libs::error::TimesheetError;
    use timesheet::libs::normalizer::{
        pad_single_digit_hour, parse_api_started, parse_file_started, FileRow, IssueMeta, PendingWorklog,
    };
    use timesheet::libs::worklog::WorklogFilter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_filter() -> WorklogFilter {
        WorklogFilter::new("Jane Doe", date(2021, 3, 1), date(2021, 3, 7)).unwrap()
    }

    fn row(started: &str, time_spent: &str, author: &str) -> FileRow {
        FileRow {
            issue_type: "Task".to_string(),
            key: "ABC-1".to_string(),
            summary: "Login page".to_string(),
            started: started.to_string(),
            time_spent: time_spent.to_string(),
            author: author.to_string(),
        }
    }

    #[test]
    fn test_pad_single_digit_hour() {
        assert_eq!(pad_single_digit_hour("04/03/2021 9.30.00").unwrap(), "04/03/2021 09.30.00");
        assert_eq!(pad_single_digit_hour("04/03/2021 10.30.00").unwrap(), "04/03/2021 10.30.00");
        assert_eq!(pad_single_digit_hour("04/03/2021 09.30.00").unwrap(), "04/03/2021 09.30.00");
    }

    #[test]
    fn test_pad_without_time_is_malformed() {
        assert!(matches!(pad_single_digit_hour("04/03/2021"), Err(TimesheetError::MalformedDate(_))));
    }

    #[test]
    fn test_parse_file_started() {
        assert_eq!(parse_file_started("04/03/2021 9.30.00").unwrap(), date(2021, 3, 4));
        assert_eq!(parse_file_started("31/12/2020 23.59.59").unwrap(), date(2020, 12, 31));
        assert!(matches!(parse_file_started("2021-03-04 09.30.00"), Err(TimesheetError::MalformedDate(_))));
        assert!(matches!(parse_file_started("04/03/2021 09:30:00"), Err(TimesheetError::MalformedDate(_))));
    }

    #[test]
    fn test_parse_api_started() {
        assert_eq!(parse_api_started("2021-03-04T09:30:00.000+0000").unwrap(), date(2021, 3, 4));
        assert_eq!(parse_api_started("2021-03-04").unwrap(), date(2021, 3, 4));
        assert!(matches!(parse_api_started("04/03/2021"), Err(TimesheetError::MalformedDate(_))));
    }

    #[test]
    fn test_file_row_accepted() {
        let entry = row("04/03/2021 9.30.00", "1h 30m", "Jane Doe")
            .normalize(&march_filter())
            .unwrap()
            .unwrap();
        assert_eq!(entry.issue_key, "ABC-1");
        assert_eq!(entry.issue_type, "Task");
        assert_eq!(entry.summary, "Login page");
        assert_eq!(entry.issue_id, "");
        assert_eq!(entry.started_on, date(2021, 3, 4));
        assert_eq!(entry.duration_minutes, 90);
    }

    #[test]
    fn test_file_row_blank_started_is_skipped() {
        // The bad duration is never looked at.
        assert_eq!(row("", "garbage", "Jane Doe").normalize(&march_filter()).unwrap(), None);
        assert_eq!(row("   ", "garbage", "Jane Doe").normalize(&march_filter()).unwrap(), None);
    }

    #[test]
    fn test_file_row_filtered_before_duration() {
        assert_eq!(row("04/03/2021 9.30.00", "garbage", "John Roe").normalize(&march_filter()).unwrap(), None);
        assert_eq!(row("08/03/2021 9.30.00", "garbage", "Jane Doe").normalize(&march_filter()).unwrap(), None);
    }

    #[test]
    fn test_file_row_author_is_case_sensitive() {
        assert_eq!(row("04/03/2021 9.30.00", "1h", "jane doe").normalize(&march_filter()).unwrap(), None);
    }

    #[test]
    fn test_file_row_interval_bounds_are_inclusive() {
        let filter = march_filter();
        assert!(row("01/03/2021 0.00.00", "1h", "Jane Doe").normalize(&filter).unwrap().is_some());
        assert!(row("07/03/2021 23.59.59", "1h", "Jane Doe").normalize(&filter).unwrap().is_some());
        assert!(row("28/02/2021 23.59.59", "1h", "Jane Doe").normalize(&filter).unwrap().is_none());
    }

    #[test]
    fn test_file_row_accepted_with_bad_duration_fails() {
        let result = row("04/03/2021 9.30.00", "1x", "Jane Doe").normalize(&march_filter());
        assert!(matches!(result, Err(TimesheetError::MalformedDuration { .. })));
    }

    #[test]
    fn test_pending_worklog_keeps_raw_duration() {
        let pending = PendingWorklog::from_api("10001", "Jane Doe", "2021-03-02T10:00:00.000+0000", "not yet", &march_filter())
            .unwrap()
            .unwrap();
        assert_eq!(pending.issue_id, "10001");
        assert_eq!(pending.started_on, date(2021, 3, 2));
        assert_eq!(pending.time_spent, "not yet");
    }

    #[test]
    fn test_pending_worklog_filtered() {
        let filter = march_filter();
        assert!(PendingWorklog::from_api("1", "John Roe", "2021-03-02T10:00:00.000+0000", "1h", &filter)
            .unwrap()
            .is_none());
        assert!(PendingWorklog::from_api("1", "Jane Doe", "2021-03-08T10:00:00.000+0000", "1h", &filter)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_pending_worklog_join() {
        let pending = PendingWorklog::from_api("10001", "Jane Doe", "2021-03-02T10:00:00.000+0000", "2h 15m", &march_filter())
            .unwrap()
            .unwrap();
        let issue = IssueMeta {
            key: "ABC-7".to_string(),
            summary: "Export".to_string(),
            issue_type: "Bug".to_string(),
        };
        let entry = pending.join(&issue).unwrap();
        assert_eq!(entry.issue_key, "ABC-7");
        assert_eq!(entry.issue_id, "10001");
        assert_eq!(entry.issue_type, "Bug");
        assert_eq!(entry.summary, "Export");
        assert_eq!(entry.author, "Jane Doe");
        assert_eq!(entry.duration_minutes, 135);
    }

    #[test]
    fn test_filter_rejects_reversed_interval() {
        let result = WorklogFilter::new("Jane Doe", date(2021, 3, 7), date(2021, 3, 1));
        assert!(matches!(result, Err(TimesheetError::InvalidRange { .. })));
    }
}
