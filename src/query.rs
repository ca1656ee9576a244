//! Filtering and ordering of scanned file records.
//!
//! A query never touches the filesystem: it takes records produced by
//! the scanner and derives a view. Filters AND together; sorting is
//! stable, so records that compare equal keep their scan order.
//!
//! Size buckets are measured in binary megabytes. Date buckets compare
//! whole calendar days (UTC) between a record's modification date and
//! "now", which callers can pin for reproducible results.

use crate::scanner::FileRecord;
use chrono::{DateTime, Utc};

/// Bytes in one binary megabyte, the unit all size buckets use.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Category dimension of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Keep every category.
    #[default]
    All,
    /// Keep records whose category equals this name exactly.
    Category(String),
}

/// Size dimension of a filter, in binary megabytes.
///
/// Exactly 10 MB falls in the middle bucket, as does exactly 100 MB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeFilter {
    #[default]
    All,
    /// Strictly under 10 MB.
    Under10Mb,
    /// 10 MB to 100 MB, both ends included.
    From10To100Mb,
    /// Strictly over 100 MB.
    Over100Mb,
}

/// Modification-date dimension of a filter.
///
/// Buckets nest: a file modified today also passes `LastWeek` and
/// `LastMonth`. Files with a future modification time count as today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Modified today (or later).
    Today,
    /// Modified within the last 7 days.
    LastWeek,
    /// Modified within the last 31 days.
    LastMonth,
    /// Modified more than 31 days ago.
    Older,
}

/// One filter across all three dimensions. A record must pass every
/// dimension to survive. The default keeps everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub type_filter: TypeFilter,
    pub size: SizeFilter,
    pub modified: DateFilter,
}

impl FilterSpec {
    /// Returns true if `record` passes all three dimensions, judging
    /// date buckets against `now`.
    pub fn matches(&self, record: &FileRecord, now: DateTime<Utc>) -> bool {
        self.matches_type(record) && self.matches_size(record) && self.matches_date(record, now)
    }

    fn matches_type(&self, record: &FileRecord) -> bool {
        match &self.type_filter {
            TypeFilter::All => true,
            TypeFilter::Category(name) => record.category == *name,
        }
    }

    fn matches_size(&self, record: &FileRecord) -> bool {
        let bytes = record.size_bytes;
        match self.size {
            SizeFilter::All => true,
            SizeFilter::Under10Mb => bytes < 10 * BYTES_PER_MB,
            SizeFilter::From10To100Mb => {
                bytes >= 10 * BYTES_PER_MB && bytes <= 100 * BYTES_PER_MB
            }
            SizeFilter::Over100Mb => bytes > 100 * BYTES_PER_MB,
        }
    }

    fn matches_date(&self, record: &FileRecord, now: DateTime<Utc>) -> bool {
        let age = age_in_days(record.modified_at, now);
        match self.modified {
            DateFilter::All => true,
            DateFilter::Today => age <= 0,
            DateFilter::LastWeek => age <= 7,
            DateFilter::LastMonth => age <= 31,
            DateFilter::Older => age > 31,
        }
    }
}

/// Whole calendar days between the modification date and now, both
/// taken as UTC dates. Negative for future timestamps.
fn age_in_days(modified: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - modified.date_naive()).num_days()
}

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Size,
    /// Category name, compared lexicographically.
    Type,
    Modified,
}

/// A sort request: one column plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn descending(column: SortColumn) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Alternating sort direction for interactive listings.
///
/// The toggle keeps a single direction flag shared by all columns.
/// Each request consumes the current direction and flips the flag, so
/// repeated requests alternate ascending and descending even when they
/// name different columns. The first request is always ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortToggle {
    descending: bool,
}

impl SortToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the spec for the next sort request on `column` and
    /// flips the stored direction.
    pub fn request(&mut self, column: SortColumn) -> SortSpec {
        let spec = SortSpec {
            column,
            descending: self.descending,
        };
        self.descending = !self.descending;
        spec
    }
}

/// Stable in-place sort by the requested column.
pub fn sort_records(records: &mut [FileRecord], spec: SortSpec) {
    records.sort_by(|a, b| {
        let ordering = match spec.column {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Size => a.size_bytes.cmp(&b.size_bytes),
            SortColumn::Type => a.category.cmp(&b.category),
            SortColumn::Modified => a.modified_at.cmp(&b.modified_at),
        };
        if spec.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Sorts the full record set, then filters it, judging date buckets
/// against the current time.
pub fn query(records: &[FileRecord], filter: &FilterSpec, sort: SortSpec) -> Vec<FileRecord> {
    query_at(records, filter, sort, Utc::now())
}

/// Same as [`query`] with an explicit "now" for the date buckets.
pub fn query_at(
    records: &[FileRecord],
    filter: &FilterSpec,
    sort: SortSpec,
    now: DateTime<Utc>,
) -> Vec<FileRecord> {
    let mut ordered = records.to_vec();
    sort_records(&mut ordered, sort);
    ordered.retain(|r| filter.matches(r, now));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap()
    }

    fn record(
        name: &str,
        size_bytes: u64,
        category: &str,
        modified_at: DateTime<Utc>,
    ) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: PathBuf::from(name),
            size_bytes,
            extension: String::new(),
            modified_at,
            category: category.to_string(),
        }
    }

    fn sized(name: &str, size_bytes: u64) -> FileRecord {
        record(name, size_bytes, "Other", fixed_now())
    }

    fn aged(name: &str, year: i32, month: u32, day: u32) -> FileRecord {
        let modified = Utc.with_ymd_and_hms(year, month, day, 8, 0, 0).unwrap();
        record(name, 0, "Other", modified)
    }

    fn names(records: &[FileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn filter_by_size(size: SizeFilter, records: &[FileRecord]) -> Vec<&str> {
        let filter = FilterSpec {
            size,
            ..FilterSpec::default()
        };
        records
            .iter()
            .filter(|r| filter.matches(r, fixed_now()))
            .map(|r| r.name.as_str())
            .collect()
    }

    fn filter_by_date(modified: DateFilter, records: &[FileRecord]) -> Vec<&str> {
        let filter = FilterSpec {
            modified,
            ..FilterSpec::default()
        };
        records
            .iter()
            .filter(|r| filter.matches(r, fixed_now()))
            .map(|r| r.name.as_str())
            .collect()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let records = vec![
            record("a", 0, "Images", fixed_now()),
            record("b", 500 * BYTES_PER_MB, "Other", fixed_now()),
        ];
        let filter = FilterSpec::default();
        assert!(records.iter().all(|r| filter.matches(r, fixed_now())));
    }

    #[test]
    fn test_type_filter_matches_exact_category() {
        let records = vec![
            record("a", 0, "Images", fixed_now()),
            record("b", 0, "images", fixed_now()),
            record("c", 0, "Documents", fixed_now()),
        ];
        let filter = FilterSpec {
            type_filter: TypeFilter::Category("Images".to_string()),
            ..FilterSpec::default()
        };
        let kept: Vec<&str> = records
            .iter()
            .filter(|r| filter.matches(r, fixed_now()))
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(kept, vec!["a"]);
    }

    #[test]
    fn test_size_buckets_at_exact_boundaries() {
        let records = vec![
            sized("tiny", 0),
            sized("just_under_10", 10 * BYTES_PER_MB - 1),
            sized("exactly_10", 10 * BYTES_PER_MB),
            sized("exactly_100", 100 * BYTES_PER_MB),
            sized("just_over_100", 100 * BYTES_PER_MB + 1),
        ];

        assert_eq!(
            filter_by_size(SizeFilter::Under10Mb, &records),
            vec!["tiny", "just_under_10"]
        );
        assert_eq!(
            filter_by_size(SizeFilter::From10To100Mb, &records),
            vec!["exactly_10", "exactly_100"]
        );
        assert_eq!(
            filter_by_size(SizeFilter::Over100Mb, &records),
            vec!["just_over_100"]
        );
    }

    #[test]
    fn test_date_buckets_at_day_boundaries() {
        let records = vec![
            aged("today", 2024, 5, 31),
            aged("seven_days", 2024, 5, 24),
            aged("eight_days", 2024, 5, 23),
            aged("thirty_one_days", 2024, 4, 30),
            aged("thirty_two_days", 2024, 4, 29),
        ];

        assert_eq!(filter_by_date(DateFilter::Today, &records), vec!["today"]);
        assert_eq!(
            filter_by_date(DateFilter::LastWeek, &records),
            vec!["today", "seven_days"]
        );
        assert_eq!(
            filter_by_date(DateFilter::LastMonth, &records),
            vec!["today", "seven_days", "eight_days", "thirty_one_days"]
        );
        assert_eq!(
            filter_by_date(DateFilter::Older, &records),
            vec!["thirty_two_days"]
        );
    }

    #[test]
    fn test_future_timestamp_counts_as_today() {
        let records = vec![aged("tomorrow", 2024, 6, 1)];
        assert_eq!(filter_by_date(DateFilter::Today, &records), vec!["tomorrow"]);
        assert!(filter_by_date(DateFilter::Older, &records).is_empty());
    }

    #[test]
    fn test_same_day_ignores_time_of_day() {
        // Modified at 00:05, queried at 23:55 the same day: still today.
        let modified = Utc.with_ymd_and_hms(2024, 5, 31, 0, 5, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 23, 55, 0).unwrap();
        let filter = FilterSpec {
            modified: DateFilter::Today,
            ..FilterSpec::default()
        };
        assert!(filter.matches(&record("f", 0, "Other", modified), now));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let records = vec![
            record("hit", 5 * BYTES_PER_MB, "Images", fixed_now()),
            record("wrong_type", 5 * BYTES_PER_MB, "Other", fixed_now()),
            record("wrong_size", 50 * BYTES_PER_MB, "Images", fixed_now()),
        ];
        let filter = FilterSpec {
            type_filter: TypeFilter::Category("Images".to_string()),
            size: SizeFilter::Under10Mb,
            modified: DateFilter::Today,
        };
        let kept: Vec<&str> = records
            .iter()
            .filter(|r| filter.matches(r, fixed_now()))
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(kept, vec!["hit"]);
    }

    #[test]
    fn test_sort_by_each_column() {
        let older = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut records = vec![
            record("b", 300, "Images", fixed_now()),
            record("a", 100, "Videos", older),
            record("c", 200, "Documents", older),
        ];

        sort_records(&mut records, SortSpec::ascending(SortColumn::Name));
        assert_eq!(names(&records), vec!["a", "b", "c"]);

        sort_records(&mut records, SortSpec::ascending(SortColumn::Size));
        assert_eq!(names(&records), vec!["a", "c", "b"]);

        sort_records(&mut records, SortSpec::ascending(SortColumn::Type));
        assert_eq!(names(&records), vec!["c", "b", "a"]);

        sort_records(&mut records, SortSpec::descending(SortColumn::Modified));
        assert_eq!(names(&records)[0], "b");
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut records = vec![
            record("first", 10, "Same", fixed_now()),
            record("second", 20, "Same", fixed_now()),
            record("third", 30, "Same", fixed_now()),
        ];

        sort_records(&mut records, SortSpec::ascending(SortColumn::Type));
        assert_eq!(names(&records), vec!["first", "second", "third"]);

        sort_records(&mut records, SortSpec::descending(SortColumn::Type));
        assert_eq!(names(&records), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_query_sorts_then_filters() {
        let records = vec![
            record("big_doc", 200 * BYTES_PER_MB, "Documents", fixed_now()),
            record("small_image_b", BYTES_PER_MB, "Images", fixed_now()),
            record("small_image_a", 2 * BYTES_PER_MB, "Images", fixed_now()),
        ];
        let filter = FilterSpec {
            type_filter: TypeFilter::Category("Images".to_string()),
            ..FilterSpec::default()
        };

        let view = query_at(
            &records,
            &filter,
            SortSpec::ascending(SortColumn::Name),
            fixed_now(),
        );
        assert_eq!(names(&view), vec!["small_image_a", "small_image_b"]);
    }

    #[test]
    fn test_query_leaves_input_untouched() {
        let records = vec![
            record("b", 0, "Other", fixed_now()),
            record("a", 0, "Other", fixed_now()),
        ];

        let view = query_at(
            &records,
            &FilterSpec::default(),
            SortSpec::ascending(SortColumn::Name),
            fixed_now(),
        );
        assert_eq!(names(&view), vec!["a", "b"]);
        assert_eq!(names(&records), vec!["b", "a"]);
    }

    #[test]
    fn test_toggle_alternates_direction() {
        let mut toggle = SortToggle::new();

        let first = toggle.request(SortColumn::Name);
        assert!(!first.descending);

        let second = toggle.request(SortColumn::Name);
        assert!(second.descending);

        let third = toggle.request(SortColumn::Name);
        assert!(!third.descending);
    }

    #[test]
    fn test_toggle_direction_carries_across_columns() {
        let mut toggle = SortToggle::new();

        let by_name = toggle.request(SortColumn::Name);
        assert!(!by_name.descending);

        // Switching columns does not reset the alternation.
        let by_size = toggle.request(SortColumn::Size);
        assert!(by_size.descending);

        let by_modified = toggle.request(SortColumn::Modified);
        assert!(!by_modified.descending);
    }

    #[test]
    fn test_age_in_days_is_calendar_based() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 30, 0).unwrap();
        // Late yesterday evening, under two hours ago, still one day old.
        let last_night = Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap();
        assert_eq!(age_in_days(last_night, now), 1);
        assert_eq!(age_in_days(now, now), 0);
    }
}
