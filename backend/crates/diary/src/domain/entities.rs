//! Domain Entities

use chrono::{DateTime, NaiveDate, Utc};
use kernel::error::fields::FieldErrors;
use kernel::id::{DiaryId, UserId};

use crate::domain::value_objects::DailyCheck;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const DATE_TAKEN: &str = "Diary with this Date and Created by already exists.";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One day's record, owned by the user who wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diary {
    pub diary_id: DiaryId,
    pub date: NaiveDate,
    pub daily_check: DailyCheck,
    pub daily_record: String,
    pub todo: Option<String>,
    pub remark: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Diary {
    /// New diary owned by `created_by`; the owner never changes
    pub fn new(created_by: UserId, fields: DiaryFields) -> Self {
        let now = Utc::now();

        Self {
            diary_id: DiaryId::new(),
            date: fields.date,
            daily_check: fields.daily_check,
            daily_record: fields.daily_record,
            todo: fields.todo,
            remark: fields.remark,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: DiaryFields) {
        self.date = fields.date;
        self.daily_check = fields.daily_check;
        self.daily_record = fields.daily_record;
        self.todo = fields.todo;
        self.remark = fields.remark;
        self.updated_at = Utc::now();
    }

    /// First eight characters of the record followed by `..`
    pub fn summary(&self) -> String {
        let head: String = self.daily_record.chars().take(8).collect();
        format!("{head}..")
    }
}

/// Raw form values as submitted
#[derive(Debug, Clone, Default)]
pub struct DiaryInput {
    pub date: String,
    pub daily_check: String,
    pub daily_record: String,
    pub todo: String,
    pub remark: String,
}

/// Form values that passed field validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryFields {
    pub date: NaiveDate,
    pub daily_check: DailyCheck,
    pub daily_record: String,
    pub todo: Option<String>,
    pub remark: Option<String>,
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl DiaryInput {
    /// Field validation; every invalid field is reported
    pub fn validate(&self) -> Result<DiaryFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let date = match self.date.trim() {
            "" => {
                errors.add("date", REQUIRED);
                None
            }
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| errors.add("date", INVALID_DATE))
                .ok(),
        };

        let daily_check = DailyCheck::parse(&self.daily_check)
            .map_err(|message| errors.add("daily_check", message))
            .ok();

        let daily_record = optional_text(&self.daily_record);
        if daily_record.is_none() {
            errors.add("daily_record", REQUIRED);
        }

        match (date, daily_check, daily_record) {
            (Some(date), Some(daily_check), Some(daily_record)) if errors.is_empty() => {
                Ok(DiaryFields {
                    date,
                    daily_check,
                    daily_record,
                    todo: optional_text(&self.todo),
                    remark: optional_text(&self.remark),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(date: &str, record: &str) -> DiaryInput {
        DiaryInput {
            date: date.to_string(),
            daily_record: record.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_defaults() {
        let fields = input("2024-03-01", "Checked the firewall rules").validate().unwrap();
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(fields.daily_check, DailyCheck::No);
        assert_eq!(fields.todo, None);
        assert_eq!(fields.remark, None);
    }

    #[test]
    fn test_validate_collects_errors() {
        let errors = DiaryInput {
            daily_check: "maybe".to_string(),
            ..input("", "  ")
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("date"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("daily_record"), [REQUIRED.to_string()]);
        assert!(errors.contains("daily_check"));

        let errors = input("2024-02-30", "x").validate().unwrap_err();
        assert_eq!(errors.get("date"), [INVALID_DATE.to_string()]);
    }

    #[test]
    fn test_summary() {
        let fields = input("2024-03-01", "Rotated keys today").validate().unwrap();
        let diary = Diary::new(UserId::new(), fields);
        assert_eq!(diary.summary(), "Rotated ..");
    }
}
