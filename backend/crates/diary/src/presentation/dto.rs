//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{DATE_FORMAT, Diary, DiaryInput};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiaryForm {
    pub date: String,
    pub daily_check: String,
    pub daily_record: String,
    pub todo: String,
    pub remark: String,
}

impl DiaryForm {
    pub fn to_input(&self) -> DiaryInput {
        DiaryInput {
            date: self.date.clone(),
            daily_check: self.daily_check.clone(),
            daily_record: self.daily_record.clone(),
            todo: self.todo.clone(),
            remark: self.remark.clone(),
        }
    }
}

/// Values to prefill a form with
impl From<&Diary> for DiaryForm {
    fn from(diary: &Diary) -> Self {
        Self {
            date: diary.date.format(DATE_FORMAT).to_string(),
            daily_check: diary.daily_check.as_str().to_string(),
            daily_record: diary.daily_record.clone(),
            todo: diary.todo.clone().unwrap_or_default(),
            remark: diary.remark.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryResponse {
    pub id: String,
    pub date: String,
    pub daily_check: &'static str,
    pub daily_record: String,
    pub summary: String,
    pub todo: Option<String>,
    pub remark: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Diary> for DiaryResponse {
    fn from(diary: &Diary) -> Self {
        Self {
            id: diary.diary_id.to_string(),
            date: diary.date.format(DATE_FORMAT).to_string(),
            daily_check: diary.daily_check.as_str(),
            daily_record: diary.daily_record.clone(),
            summary: diary.summary(),
            todo: diary.todo.clone(),
            remark: diary.remark.clone(),
            created_by: diary.created_by.to_string(),
            created_at: diary.created_at,
            updated_at: diary.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryListResponse {
    pub diaries: Vec<DiaryResponse>,
    pub is_paginated: bool,
    /// Absent when everything is on one page
    pub page: Option<PageInfo>,
}

/// GET on a create or update route
#[derive(Debug, Clone, Serialize)]
pub struct DiaryFormResponse {
    pub action: String,
    pub values: DiaryForm,
    pub daily_check_choices: [&'static str; 2],
}

/// GET on a delete route
#[derive(Debug, Clone, Serialize)]
pub struct DeleteConfirmation {
    pub action: String,
    pub diary: DiaryResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::UserId;

    #[test]
    fn test_form_prefill_from_diary() {
        let input = DiaryInput {
            date: "2024-03-01".to_string(),
            daily_check: "yes".to_string(),
            daily_record: "Reviewed the NAT rules".to_string(),
            ..Default::default()
        };
        let diary = Diary::new(UserId::new(), input.validate().unwrap());

        let form = DiaryForm::from(&diary);
        assert_eq!(form.date, "2024-03-01");
        assert_eq!(form.daily_check, "yes");
        assert_eq!(form.todo, "");

        let response = DiaryResponse::from(&diary);
        assert_eq!(response.summary, "Reviewed..");
        assert_eq!(response.todo, None);
    }
}
