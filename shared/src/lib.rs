use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod utils;

pub use utils::*;

/// Error returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `as_str`, `Display` and `FromStr` for the lowercase string enums
/// stored in the row store.
macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Livestock species supported by the record book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Cattle,
    Swine,
    Sheep,
    Goats,
    Poultry,
}

string_enum!(Species, "species", {
    Cattle => "cattle",
    Swine => "swine",
    Sheep => "sheep",
    Goats => "goats",
    Poultry => "poultry",
});

/// Lifecycle status of an animal. In practice it only moves from
/// `Active` to `Sold` or `Deceased`, but nothing here enforces that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalStatus {
    #[default]
    Active,
    Sold,
    Deceased,
}

string_enum!(AnimalStatus, "animal status", {
    Active => "active",
    Sold => "sold",
    Deceased => "deceased",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRecordType {
    Vaccination,
    Treatment,
    Checkup,
}

string_enum!(HealthRecordType, "health record type", {
    Vaccination => "vaccination",
    Treatment => "treatment",
    Checkup => "checkup",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Feed,
    Medical,
    Equipment,
    Show,
    Other,
}

string_enum!(ExpenseCategory, "expense category", {
    Feed => "feed",
    Medical => "medical",
    Equipment => "equipment",
    Show => "show",
    Other => "other",
});

/// Unit a weight is expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

string_enum!(WeightUnit, "weight unit", {
    Lbs => "lbs",
    Kg => "kg",
});

/// Sort direction used by list utilities and row-store ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A student (or advisor) account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    /// FFA chapter name
    pub chapter: Option<String>,
    pub advisor_email: Option<String>,
    pub graduation_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    /// Identity issued by the auth collaborator, if already known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub full_name: String,
    pub chapter: Option<String>,
    pub advisor_email: Option<String>,
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Animals and their records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Always present, unlike the birth date
    pub acquisition_date: NaiveDate,
    pub acquisition_cost: Option<f64>,
    pub tag_number: Option<String>,
    /// Sire reference (free text or another animal id)
    pub sire: Option<String>,
    /// Dam reference (free text or another animal id)
    pub dam: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub notes: Option<String>,
    pub status: AnimalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnimal {
    pub user_id: String,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub acquisition_date: NaiveDate,
    pub acquisition_cost: Option<f64>,
    pub tag_number: Option<String>,
    pub sire: Option<String>,
    pub dam: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AnimalStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dam: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AnimalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single weigh-in. Listed oldest first so it can feed a growth curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: String,
    pub animal_id: String,
    pub weight: f64,
    pub weight_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWeightRecord {
    pub animal_id: String,
    pub weight: f64,
    pub weight_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    pub animal_id: String,
    pub record_type: HealthRecordType,
    pub date: NaiveDate,
    pub description: String,
    pub veterinarian: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthRecord {
    pub animal_id: String,
    pub record_type: HealthRecordType,
    pub date: NaiveDate,
    pub description: String,
    pub veterinarian: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<HealthRecordType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Journal, expenses and AET skills
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub entry_date: NaiveDate,
    /// Free text, e.g. "Feeding" or "Show Preparation"
    pub activity_type: String,
    pub description: String,
    pub hours_spent: Option<f64>,
    /// AET skill tags practiced during the activity
    #[serde(default)]
    pub aet_skills: Vec<String>,
    /// Ids of the animals involved
    #[serde(default)]
    pub animals_involved: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub activity_type: String,
    pub description: String,
    pub hours_spent: Option<f64>,
    #[serde(default)]
    pub aet_skills: Vec<String>,
    #[serde(default)]
    pub animals_involved: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aet_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animals_involved: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: f64,
    pub vendor: Option<String>,
    /// Blob path of the receipt photo, if one was uploaded
    pub receipt_photo: Option<String>,
    #[serde(default)]
    pub animals_related: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: String,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: f64,
    pub vendor: Option<String>,
    pub receipt_photo: Option<String>,
    #[serde(default)]
    pub animals_related: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animals_related: Option<Vec<String>>,
}

/// A skill definition from the Agricultural Experience Tracker catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AetSkill {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    /// Proficiency level, 1 through 4
    pub level: u8,
    pub hours_required: f64,
}

/// Accumulated hours a user has logged against one AET skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub id: String,
    pub user_id: String,
    pub skill_id: String,
    pub hours_completed: f64,
    pub date_started: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Skill definition, present when the query embedded it
    #[serde(rename = "aet_skills", default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<AetSkill>,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Filters for listing a user's animals. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalFilter {
    pub species: Option<Species>,
    pub status: Option<AnimalStatus>,
    /// Case-insensitive substring of the animal name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalFilter {
    /// Inclusive lower bound on `entry_date`
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `entry_date`
    pub end_date: Option<NaiveDate>,
    pub activity_type: Option<String>,
    /// Entry must carry this AET skill tag
    pub aet_skill: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Headline numbers for a user's dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_animals: usize,
    pub active_animals: usize,
    pub total_expenses: f64,
    /// Expenses dated in the current calendar month
    pub monthly_expenses: f64,
    pub journal_entries: usize,
    /// Sum of `hours_completed` across all skill progress rows
    pub aet_hours: f64,
    pub completed_skills: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub this_month: f64,
    pub previous_month: f64,
    /// Percent change of this month against the previous month
    pub month_over_month_change: f64,
    /// Totals per category, in order of first appearance
    pub category_totals: IndexMap<ExpenseCategory, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub total_entries: usize,
    pub total_hours: f64,
    pub unique_skills: usize,
    pub entries_this_week: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HerdSummary {
    pub total_animals: usize,
    pub active_animals: usize,
    /// Sum of acquisition costs; animals without a cost count as zero
    pub total_value: f64,
}

// ---------------------------------------------------------------------------
// API envelope
// ---------------------------------------------------------------------------

/// Body of a request adding hours to a skill accumulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSkillHoursRequest {
    pub hours: f64,
}

/// JSON envelope returned by the REST layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
            success: true,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_species_round_trips_through_strings() {
        for species in Species::ALL {
            assert_eq!(species.as_str().parse::<Species>().unwrap(), *species);
        }
        assert_eq!(Species::Goats.to_string(), "goats");

        let err = "llama".parse::<Species>().unwrap_err();
        assert_eq!(err.to_string(), "unknown species: llama");
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_value(ExpenseCategory::Show).unwrap(), json!("show"));
        assert_eq!(serde_json::to_value(AnimalStatus::Deceased).unwrap(), json!("deceased"));
        assert_eq!(serde_json::to_value(WeightUnit::Kg).unwrap(), json!("kg"));
        assert_eq!(AnimalStatus::default(), AnimalStatus::Active);
    }

    #[test]
    fn test_animal_deserializes_store_row() {
        let row = json!({
            "id": "a1",
            "user_id": "u1",
            "name": "Bessie",
            "species": "cattle",
            "breed": "Angus",
            "birth_date": "2023-03-15",
            "acquisition_date": "2023-05-01",
            "acquisition_cost": 1200.0,
            "tag_number": "T-101",
            "sire": null,
            "dam": null,
            "notes": null,
            "status": "active",
            "created_at": "2024-01-05T10:00:00+00:00",
            "updated_at": "2024-01-05T10:00:00+00:00"
        });

        let animal: Animal = serde_json::from_value(row).unwrap();
        assert_eq!(animal.species, Species::Cattle);
        assert_eq!(animal.birth_date, NaiveDate::from_ymd_opt(2023, 3, 15));
        assert!(animal.photos.is_empty());
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = AnimalUpdate {
            status: Some(AnimalStatus::Sold),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "sold" }));
    }

    #[test]
    fn test_skill_progress_reads_embedded_skill() {
        let row = json!({
            "id": "p1",
            "user_id": "u1",
            "skill_id": "s1",
            "hours_completed": 4.5,
            "date_started": "2024-02-01T08:00:00Z",
            "date_completed": null,
            "is_completed": false,
            "created_at": "2024-02-01T08:00:00Z",
            "updated_at": null,
            "aet_skills": {
                "id": "s1",
                "category": "Animal Care",
                "title": "Daily feeding",
                "description": null,
                "level": 1,
                "hours_required": 10.0
            }
        });

        let progress: SkillProgress = serde_json::from_value(row).unwrap();
        assert_eq!(progress.skill.unwrap().title, "Daily feeding");
    }

    #[test]
    fn test_api_response_constructors() {
        let ok = ApiResponse::ok(3);
        assert!(ok.success);
        assert_eq!(ok.data, Some(3));

        let failed: ApiResponse<i32> = ApiResponse::failure("boom");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
