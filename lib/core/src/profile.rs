//! Profile records and the column vocabulary
//!
//! A [`Profile`] is a flat JSON object keyed by the stable column names shared
//! with the data-generation and web collaborators. Accessors normalize the raw
//! string/number values into the types the pipeline needs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable column names of the profile record schema
pub mod columns {
    pub const CHILD_NICKNAME: &str = "Child_Nickname";
    pub const CHILD_AGE: &str = "Child_Age";
    pub const CHILD_GENDER: &str = "Child_Gender";
    pub const CHILD_REGION: &str = "Child_Region";
    pub const PREF_INTERACTION: &str = "Preference_Interaction_Outside_Class";
    pub const PREF_OVERLAPPING_TIME: &str = "Preference_Overlapping_Time";
    pub const PREF_SIMILAR_AGE: &str = "Preference_Similar_Age";
    pub const PREF_SAME_GENDER: &str = "Preference_Same_Gender";

    /// Categorical columns whose one-hot vocabulary is learned at fit time,
    /// in feature-block order
    pub const CATEGORICAL: [&str; 6] = [
        CHILD_GENDER,
        CHILD_REGION,
        PREF_INTERACTION,
        PREF_OVERLAPPING_TIME,
        PREF_SIMILAR_AGE,
        PREF_SAME_GENDER,
    ];

    pub const DAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    pub const TIMES_OF_DAY: [&str; 3] = ["Morning", "Afternoon", "Evening"];

    /// Fixed interest vocabulary, display names
    pub const INTEREST_TAGS: [&str; 7] = [
        "Science",
        "Coding/Game Design",
        "Reading/Writing",
        "Engineering",
        "Art",
        "Music",
        "Math",
    ];

    /// Column name for an interest tag (display `/` becomes `_`)
    pub fn interest_column(tag: &str) -> String {
        format!("Interest_{}", tag.replace('/', "_"))
    }

    /// Column name for an availability cell
    pub fn availability_column(day: &str, time: &str) -> String {
        format!("Available_Time_{day}_{time}")
    }

    /// All 21 availability columns in grid order (day-major)
    pub fn availability_columns() -> Vec<String> {
        DAYS.iter()
            .flat_map(|day| TIMES_OF_DAY.iter().map(move |time| availability_column(day, time)))
            .collect()
    }

    /// All 7 interest columns in tag order
    pub fn interest_columns() -> Vec<String> {
        INTEREST_TAGS.iter().map(|tag| interest_column(tag)).collect()
    }
}

/// Gender value for children who chose not to disclose
pub const GENDER_UNDISCLOSED: &str = "Prefer not to say";

/// Genders from the binary-identified set
pub const GENDER_BINARY: [&str; 2] = ["Male", "Female"];

/// Marker value for an available cell
pub const AVAILABLE: &str = "Available";

/// Marker value for a selected interest
pub const SELECTED: &str = "Selected";

/// One child's profile record
///
/// Serializes to/from the flat JSON object the web front end sends, with no
/// field renaming or reordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        self.0.insert(column.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// String value of a column, if present and a string
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_str)
    }

    /// String value of a required column
    pub fn require_str(&self, column: &str) -> Result<&str> {
        self.get_str(column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))
    }

    #[must_use]
    pub fn nickname(&self) -> Option<&str> {
        self.get_str(columns::CHILD_NICKNAME)
    }

    /// Age as an integer, accepting JSON numbers or numeric strings
    ///
    /// Queries arrive from web forms, so "7" is as valid as 7.
    pub fn age(&self) -> Result<i64> {
        let value = self
            .0
            .get(columns::CHILD_AGE)
            .ok_or_else(|| Error::MissingColumn(columns::CHILD_AGE.to_string()))?;

        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| invalid_age(value)),
            Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid_age(value)),
            _ => Err(invalid_age(value)),
        }
    }

    /// Normalize the age column to an integer JSON number in place
    pub fn normalize_age(&mut self) -> Result<()> {
        let age = self.age()?;
        self.insert(columns::CHILD_AGE, age);
        Ok(())
    }

    /// Whether the given availability cell is marked available
    ///
    /// Missing cells count as unavailable.
    #[must_use]
    pub fn is_available(&self, column: &str) -> bool {
        self.get_str(column) == Some(AVAILABLE)
    }

    /// Whether the given interest column is selected
    #[must_use]
    pub fn has_interest(&self, column: &str) -> bool {
        self.get_str(column) == Some(SELECTED)
    }

    /// Count of available cells over the full 7x3 grid
    #[must_use]
    pub fn available_cell_count(&self) -> usize {
        columns::availability_columns()
            .iter()
            .filter(|col| self.is_available(col))
            .count()
    }
}

fn invalid_age(value: &Value) -> Error {
    Error::InvalidValue {
        column: columns::CHILD_AGE.to_string(),
        message: format!("expected an integer age, got {value}"),
    }
}
