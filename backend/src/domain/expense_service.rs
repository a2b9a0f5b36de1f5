//! # Expense Service
//!
//! Project expenses and the month-over-month summary on the expenses page.

use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate};
use indexmap::IndexMap;
use shared::{
    calculate_growth_rate, Expense, ExpenseCategory, ExpenseFilter, ExpenseSummary,
    ExpenseUpdate, NewExpense, SortDirection,
};
use tracing::info;

use crate::storage::{collections, Query, QueryResult, Repository, RowStore};

#[derive(Clone)]
pub struct ExpenseService {
    expenses: Repository<Expense>,
}

pub(crate) fn expense_query(user_id: &str, filter: &ExpenseFilter) -> Query {
    let mut query = Query::new().eq("user_id", user_id);

    if let Some(start) = filter.start_date {
        query = query.gte("date", start.to_string());
    }
    if let Some(end) = filter.end_date {
        query = query.lte("date", end.to_string());
    }
    if let Some(category) = filter.category {
        query = query.eq("category", category.as_str());
    }
    if let Some(min) = filter.min_amount {
        query = query.gte("amount", min);
    }
    if let Some(max) = filter.max_amount {
        query = query.lte("amount", max);
    }

    query.order("date", SortDirection::Desc)
}

fn same_month(date: NaiveDate, month: NaiveDate) -> bool {
    date.year() == month.year() && date.month() == month.month()
}

impl ExpenseService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            expenses: Repository::new(store, collections::EXPENSES),
        }
    }

    pub async fn get_expenses(&self, user_id: &str, filter: &ExpenseFilter) -> QueryResult<Vec<Expense>> {
        info!("Listing expenses for user {} with {:?}", user_id, filter);
        let result = self.expenses.list(&expense_query(user_id, filter)).await;
        QueryResult::logged("list expenses", result)
    }

    pub async fn create_expense(&self, expense: &NewExpense) -> QueryResult<Expense> {
        info!(
            "Creating {} expense of {} for user {}",
            expense.category, expense.amount, expense.user_id
        );
        QueryResult::logged("create expense", self.expenses.create(expense).await)
    }

    pub async fn update_expense(&self, expense_id: &str, update: &ExpenseUpdate) -> QueryResult<Expense> {
        info!("Updating expense {}", expense_id);
        QueryResult::logged("update expense", self.expenses.update(expense_id, update).await)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> QueryResult<()> {
        info!("Deleting expense {}", expense_id);
        QueryResult::logged("delete expense", self.expenses.delete(expense_id).await)
    }

    /// Sum of expenses dated in the calendar month of `today`
    pub fn monthly_total(expenses: &[Expense], today: NaiveDate) -> f64 {
        expenses
            .iter()
            .filter(|e| same_month(e.date, today))
            .map(|e| e.amount)
            .sum()
    }

    pub fn summarize(expenses: &[Expense], today: NaiveDate) -> ExpenseSummary {
        let this_month = Self::monthly_total(expenses, today);
        let previous_month = today
            .checked_sub_months(Months::new(1))
            .map_or(0.0, |last| Self::monthly_total(expenses, last));

        let mut category_totals: IndexMap<ExpenseCategory, f64> = IndexMap::new();
        for expense in expenses {
            *category_totals.entry(expense.category).or_insert(0.0) += expense.amount;
        }

        ExpenseSummary {
            total: expenses.iter().map(|e| e.amount).sum(),
            this_month,
            previous_month,
            month_over_month_change: calculate_growth_rate(this_month, previous_month),
            category_totals,
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

    fn expense(category: ExpenseCategory, amount: f64, date: NaiveDate) -> NewExpense {
        NewExpense {
            user_id: "u1".to_string(),
            date,
            category,
            description: format!("{} purchase", category),
            amount,
            vendor: None,
            receipt_photo: None,
            animals_related: Vec::new(),
        }
    }

    async fn seeded() -> ExpenseService {
        let service = ExpenseService::new(Arc::new(MemoryStore::new()));
        let expenses = [
            expense(ExpenseCategory::Feed, 40.0, date(2, 5)),
            expense(ExpenseCategory::Medical, 120.0, date(3, 2)),
            expense(ExpenseCategory::Feed, 60.0, date(3, 18)),
            expense(ExpenseCategory::Show, 25.0, date(3, 20)),
        ];
        for e in &expenses {
            service.create_expense(e).await.into_result().unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_newest_first_and_category_filter() {
        let service = seeded().await;
        let all = service.get_expenses("u1", &ExpenseFilter::default()).await.into_result().unwrap();
        let dates: Vec<NaiveDate> = all.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(3, 20), date(3, 18), date(3, 2), date(2, 5)]);

        let feed = ExpenseFilter {
            category: Some(ExpenseCategory::Feed),
            ..Default::default()
        };
        assert_eq!(service.get_expenses("u1", &feed).await.into_result().unwrap().len(), 2);
        assert!(service
            .get_expenses("u2", &ExpenseFilter::default())
            .await
            .into_result()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_amount_and_date_ranges_are_inclusive() {
        let service = seeded().await;
        let filter = ExpenseFilter {
            min_amount: Some(40.0),
            max_amount: Some(60.0),
            ..Default::default()
        };
        let amounts: Vec<f64> = service
            .get_expenses("u1", &filter)
            .await
            .into_result()
            .unwrap()
            .iter()
            .map(|e| e.amount)
            .collect();
        assert_eq!(amounts, vec![60.0, 40.0]);

        let march = ExpenseFilter {
            start_date: Some(date(3, 2)),
            end_date: Some(date(3, 18)),
            ..Default::default()
        };
        assert_eq!(service.get_expenses("u1", &march).await.into_result().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summarize() {
        let service = seeded().await;
        let expenses = service.get_expenses("u1", &ExpenseFilter::default()).await.into_result().unwrap();

        let summary = ExpenseService::summarize(&expenses, date(3, 25));
        assert_eq!(summary.total, 245.0);
        assert_eq!(summary.this_month, 205.0);
        assert_eq!(summary.previous_month, 40.0);
        assert_eq!(summary.month_over_month_change, 412.5);

        let categories: Vec<(ExpenseCategory, f64)> =
            summary.category_totals.into_iter().collect();
        assert_eq!(
            categories,
            vec![
                (ExpenseCategory::Show, 25.0),
                (ExpenseCategory::Feed, 100.0),
                (ExpenseCategory::Medical, 120.0),
            ]
        );
    }

    #[test]
    fn test_summarize_empty() {
        let summary = ExpenseService::summarize(&[], date(1, 31));
        assert_eq!(summary, ExpenseSummary::default());
    }
}
