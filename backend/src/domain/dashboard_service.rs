//! # Dashboard Service
//!
//! Builds the headline numbers on a student's dashboard from four concurrent
//! reads. A read that fails leaves its metrics at zero; the others still
//! count.

use chrono::{Local, NaiveDate};
use shared::{
    Animal, AnimalFilter, AnimalStatus, DashboardStats, Expense, ExpenseFilter, JournalEntry,
    JournalFilter, SkillProgress,
};
use tracing::{info, warn};

use super::{AnimalService, ExpenseService, JournalService, SkillService};
use crate::storage::QueryResult;

#[derive(Clone)]
pub struct DashboardService {
    animals: AnimalService,
    expenses: ExpenseService,
    journal: JournalService,
    skills: SkillService,
}

fn rows_or_empty<T>(what: &str, result: QueryResult<Vec<T>>) -> Vec<T> {
    if result.data.is_none() {
        warn!("No {} data for dashboard, counting as zero", what);
    }
    result.data.unwrap_or_default()
}

impl DashboardService {
    pub fn new(
        animals: AnimalService,
        expenses: ExpenseService,
        journal: JournalService,
        skills: SkillService,
    ) -> Self {
        Self {
            animals,
            expenses,
            journal,
            skills,
        }
    }

    pub async fn get_dashboard_stats(&self, user_id: &str) -> QueryResult<DashboardStats> {
        self.get_dashboard_stats_at(user_id, Local::now().date_naive()).await
    }

    /// Stats with "this month" taken from `today`
    pub async fn get_dashboard_stats_at(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> QueryResult<DashboardStats> {
        info!("Building dashboard for user {}", user_id);

        let animal_filter = AnimalFilter::default();
        let expense_filter = ExpenseFilter::default();
        let journal_filter = JournalFilter::default();

        let (animals, expenses, entries, progress) = tokio::join!(
            self.animals.get_animals(user_id, &animal_filter),
            self.expenses.get_expenses(user_id, &expense_filter),
            self.journal.get_journal_entries(user_id, &journal_filter),
            self.skills.get_user_skill_progress(user_id),
        );

        QueryResult::ok(reduce_stats(
            &rows_or_empty("animal", animals),
            &rows_or_empty("expense", expenses),
            &rows_or_empty("journal", entries),
            &rows_or_empty("skill progress", progress),
            today,
        ))
    }
}

pub(crate) fn reduce_stats(
    animals: &[Animal],
    expenses: &[Expense],
    entries: &[JournalEntry],
    progress: &[SkillProgress],
    today: NaiveDate,
) -> DashboardStats {
    DashboardStats {
        total_animals: animals.len(),
        active_animals: animals
            .iter()
            .filter(|a| a.status == AnimalStatus::Active)
            .count(),
        total_expenses: expenses.iter().map(|e| e.amount).sum(),
        monthly_expenses: ExpenseService::monthly_total(expenses, today),
        journal_entries: entries.len(),
        aet_hours: progress.iter().map(|p| p.hours_completed).sum(),
        completed_skills: progress.iter().filter(|p| p.is_completed).count(),
    }
}
