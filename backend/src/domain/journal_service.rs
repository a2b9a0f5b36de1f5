//! # Journal Service
//!
//! Daily activity journal entries and the summary cards above the journal.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use shared::{
    JournalEntry, JournalEntryUpdate, JournalFilter, JournalSummary, NewJournalEntry,
    SortDirection,
};
use tracing::info;

use crate::storage::{collections, Query, QueryResult, Repository, RowStore};

#[derive(Clone)]
pub struct JournalService {
    entries: Repository<JournalEntry>,
}

pub(crate) fn journal_query(user_id: &str, filter: &JournalFilter) -> Query {
    let mut query = Query::new().eq("user_id", user_id);

    if let Some(start) = filter.start_date {
        query = query.gte("entry_date", start.to_string());
    }
    if let Some(end) = filter.end_date {
        query = query.lte("entry_date", end.to_string());
    }
    if let Some(activity) = &filter.activity_type {
        query = query.eq("activity_type", activity.as_str());
    }
    if let Some(skill) = &filter.aet_skill {
        query = query.contains("aet_skills", skill.as_str());
    }

    query.order("entry_date", SortDirection::Desc)
}

impl JournalService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            entries: Repository::new(store, collections::JOURNAL_ENTRIES),
        }
    }

    pub async fn get_journal_entries(
        &self,
        user_id: &str,
        filter: &JournalFilter,
    ) -> QueryResult<Vec<JournalEntry>> {
        info!("Listing journal entries for user {} with {:?}", user_id, filter);
        let result = self.entries.list(&journal_query(user_id, filter)).await;
        QueryResult::logged("list journal entries", result)
    }

    pub async fn create_journal_entry(&self, entry: &NewJournalEntry) -> QueryResult<JournalEntry> {
        info!("Creating {} journal entry for user {}", entry.activity_type, entry.user_id);
        QueryResult::logged("create journal entry", self.entries.create(entry).await)
    }

    pub async fn update_journal_entry(
        &self,
        entry_id: &str,
        update: &JournalEntryUpdate,
    ) -> QueryResult<JournalEntry> {
        info!("Updating journal entry {}", entry_id);
        QueryResult::logged("update journal entry", self.entries.update(entry_id, update).await)
    }

    pub async fn delete_journal_entry(&self, entry_id: &str) -> QueryResult<()> {
        info!("Deleting journal entry {}", entry_id);
        QueryResult::logged("delete journal entry", self.entries.delete(entry_id).await)
    }

    /// Entries dated within the seven days up to `today` count as this week
    pub fn summarize(entries: &[JournalEntry], today: NaiveDate) -> JournalSummary {
        let week_start = today - Duration::days(7);
        let skills: HashSet<&str> = entries
            .iter()
            .flat_map(|e| e.aet_skills.iter().map(String::as_str))
            .collect();

        JournalSummary {
            total_entries: entries.len(),
            total_hours: entries.iter().filter_map(|e| e.hours_spent).sum(),
            unique_skills: skills.len(),
            entries_this_week: entries
                .iter()
                .filter(|e| e.entry_date >= week_start && e.entry_date <= today)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn entry(user_id: &str, entry_date: NaiveDate, activity: &str, skills: &[&str]) -> NewJournalEntry {
        NewJournalEntry {
            user_id: user_id.to_string(),
            entry_date,
            activity_type: activity.to_string(),
            description: format!("{} on {}", activity, entry_date),
            hours_spent: Some(1.5),
            aet_skills: skills.iter().map(|s| s.to_string()).collect(),
            animals_involved: Vec::new(),
            photos: Vec::new(),
        }
    }

    async fn seeded() -> JournalService {
        let service = JournalService::new(Arc::new(MemoryStore::new()));
        let entries = [
            entry("u1", date(2, 1), "Feeding", &["Animal Care"]),
            entry("u1", date(2, 10), "Grooming", &["Animal Care", "Showmanship"]),
            entry("u1", date(2, 20), "Feeding", &["Record Keeping"]),
            entry("u2", date(2, 10), "Feeding", &["Animal Care"]),
        ];
        for e in &entries {
            service.create_journal_entry(e).await.into_result().unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let service = seeded().await;
        let entries = service
            .get_journal_entries("u1", &JournalFilter::default())
            .await
            .into_result()
            .unwrap();
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.entry_date).collect();
        assert_eq!(dates, vec![date(2, 20), date(2, 10), date(2, 1)]);
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let service = seeded().await;
        let filter = JournalFilter {
            start_date: Some(date(2, 1)),
            end_date: Some(date(2, 10)),
            ..Default::default()
        };
        let entries = service.get_journal_entries("u1", &filter).await.into_result().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_activity_and_skill_filters() {
        let service = seeded().await;

        let feeding = JournalFilter {
            activity_type: Some("Feeding".to_string()),
            ..Default::default()
        };
        assert_eq!(service.get_journal_entries("u1", &feeding).await.into_result().unwrap().len(), 2);

        let care = JournalFilter {
            aet_skill: Some("Animal Care".to_string()),
            ..Default::default()
        };
        let entries = service.get_journal_entries("u1", &care).await.into_result().unwrap();
        let activities: Vec<&str> = entries.iter().map(|e| e.activity_type.as_str()).collect();
        assert_eq!(activities, vec!["Grooming", "Feeding"]);
    }

    #[tokio::test]
    async fn test_summarize() {
        let service = seeded().await;
        let entries = service
            .get_journal_entries("u1", &JournalFilter::default())
            .await
            .into_result()
            .unwrap();

        let summary = JournalService::summarize(&entries, date(2, 21));
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.total_hours, 4.5);
        assert_eq!(summary.unique_skills, 3);
        assert_eq!(summary.entries_this_week, 1);

        assert_eq!(JournalService::summarize(&[], date(2, 21)), JournalSummary::default());
    }
}
