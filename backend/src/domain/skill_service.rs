//! # Skill Service
//!
//! The AET skills catalogue and each student's accumulated hours against it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{AetSkill, SkillProgress, SortDirection};
use tracing::info;

use crate::storage::{collections, Query, QueryResult, Repository, RowStore};

#[derive(Clone)]
pub struct SkillService {
    skills: Repository<AetSkill>,
    progress: Repository<SkillProgress>,
}

#[derive(Serialize)]
struct NewSkillProgress<'a> {
    user_id: &'a str,
    skill_id: &'a str,
    hours_completed: f64,
    date_started: DateTime<Utc>,
    is_completed: bool,
}

#[derive(Serialize)]
struct HoursUpdate {
    hours_completed: f64,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct Completion {
    is_completed: bool,
    date_completed: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SkillService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            skills: Repository::new(Arc::clone(&store), collections::AET_SKILLS),
            progress: Repository::new(store, collections::USER_SKILL_PROGRESS),
        }
    }

    /// The full catalogue, grouped by category
    pub async fn get_aet_skills(&self) -> QueryResult<Vec<AetSkill>> {
        info!("Listing AET skills");
        let query = Query::new().order("category", SortDirection::Asc);
        QueryResult::logged("list AET skills", self.skills.list(&query).await)
    }

    /// A user's progress rows, each carrying its skill definition
    pub async fn get_user_skill_progress(&self, user_id: &str) -> QueryResult<Vec<SkillProgress>> {
        info!("Listing skill progress for user {}", user_id);
        let query = Query::new()
            .eq("user_id", user_id)
            .embed(collections::AET_SKILLS, "skill_id");
        QueryResult::logged("list skill progress", self.progress.list(&query).await)
    }

    /// Add hours to the (user, skill) accumulator, creating it on first use.
    ///
    /// This reads then writes with no transaction: two concurrent calls for
    /// the same pair can lose an increment or insert two rows. Callers must
    /// serialise updates per pair. A failed read is returned as the error
    /// rather than treated as "no row yet".
    pub async fn update_skill_progress(
        &self,
        user_id: &str,
        skill_id: &str,
        hours_to_add: f64,
    ) -> QueryResult<SkillProgress> {
        info!(
            "Adding {} hours to skill {} for user {}",
            hours_to_add, skill_id, user_id
        );

        let existing_query = Query::new().eq("user_id", user_id).eq("skill_id", skill_id);
        let existing = match self.progress.find(&existing_query).await {
            Ok(existing) => existing,
            Err(e) => return QueryResult::logged("read skill progress", Err(e)),
        };

        let now = Utc::now();
        let result = match existing {
            Some(progress) => {
                let update = HoursUpdate {
                    hours_completed: progress.hours_completed + hours_to_add,
                    updated_at: now,
                };
                self.progress.update(&progress.id, &update).await
            }
            None => {
                let progress = NewSkillProgress {
                    user_id,
                    skill_id,
                    hours_completed: hours_to_add,
                    date_started: now,
                    is_completed: false,
                };
                self.progress.create(&progress).await
            }
        };
        QueryResult::logged("update skill progress", result)
    }

    /// Mark a progress row completed as of now
    pub async fn complete_skill(&self, progress_id: &str) -> QueryResult<SkillProgress> {
        info!("Completing skill progress {}", progress_id);
        let now = Utc::now();
        let completion = Completion {
            is_completed: true,
            date_completed: now,
            updated_at: now,
        };
        QueryResult::logged("complete skill", self.progress.update(progress_id, &completion).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{to_row, MemoryStore, StoreError};
    use serde_json::json;

    fn setup_test() -> (Arc<MemoryStore>, SkillService) {
        let store = Arc::new(MemoryStore::new());
        let service = SkillService::new(store.clone());
        (store, service)
    }

    fn seed_skills(store: &MemoryStore) {
        store.seed(
            collections::AET_SKILLS,
            [
                json!({"id": "s2", "category": "Showmanship", "title": "Ring Presence", "level": 2, "hours_required": 10}),
                json!({"id": "s1", "category": "Animal Care", "title": "Daily Feeding", "level": 1, "hours_required": 20}),
                json!({"id": "s3", "category": "Animal Care", "title": "Health Checks", "level": 2, "hours_required": 15}),
            ]
            .iter()
            .map(|v| to_row(v).unwrap()),
        );
    }

    #[tokio::test]
    async fn test_catalogue_ordered_by_category() {
        let (store, service) = setup_test();
        seed_skills(&store);

        let skills = service.get_aet_skills().await.into_result().unwrap();
        let ids: Vec<&str> = skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3", "s2"]);
    }

    #[tokio::test]
    async fn test_upsert_accumulates_into_one_row() {
        let (store, service) = setup_test();

        let first = service.update_skill_progress("u1", "s1", 2.0).await.into_result().unwrap();
        assert_eq!(first.hours_completed, 2.0);
        assert!(first.date_started.is_some());
        assert!(!first.is_completed);

        let second = service.update_skill_progress("u1", "s1", 3.0).await.into_result().unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.hours_completed, 5.0);
        assert_eq!(second.date_started, first.date_started);

        assert_eq!(store.row_count(collections::USER_SKILL_PROGRESS), 1);
    }

    #[tokio::test]
    async fn test_pairs_are_tracked_separately() {
        let (store, service) = setup_test();
        service.update_skill_progress("u1", "s1", 2.0).await.into_result().unwrap();
        service.update_skill_progress("u1", "s2", 4.0).await.into_result().unwrap();
        service.update_skill_progress("u2", "s1", 1.0).await.into_result().unwrap();
        assert_eq!(store.row_count(collections::USER_SKILL_PROGRESS), 3);
    }

    #[tokio::test]
    async fn test_progress_embeds_skill_and_completes() {
        let (store, service) = setup_test();
        seed_skills(&store);

        let progress = service.update_skill_progress("u1", "s3", 6.0).await.into_result().unwrap();
        let completed = service.complete_skill(&progress.id).await.into_result().unwrap();
        assert!(completed.is_completed);
        assert!(completed.date_completed.is_some());

        let rows = service.get_user_skill_progress("u1").await.into_result().unwrap();
        assert_eq!(rows.len(), 1);
        let skill = rows[0].skill.as_ref().unwrap();
        assert_eq!(skill.title, "Health Checks");
        assert_eq!(skill.hours_required, 15.0);

        let missing = service.complete_skill("nope").await;
        assert!(matches!(missing.error, Some(StoreError::NotFound { .. })));
    }
}
