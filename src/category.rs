//! The fixed set of spending categories a bill can belong to.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A spending category.
///
/// Categories form a closed set. Anything outside it, including the absence
/// of a category, is treated as [Category::Other] so that display and
/// aggregation never have to deal with free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Restaurants, cafes, groceries.
    Food,
    /// Flights, taxis, public transport, accommodation.
    Travel,
    /// Power, water, internet, phone.
    Utilities,
    /// Retail purchases.
    Shopping,
    /// Doctors, pharmacies, insurance.
    Healthcare,
    /// Movies, concerts, subscriptions.
    Entertainment,
    /// Anything that does not fit the categories above.
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Travel,
        Category::Utilities,
        Category::Shopping,
        Category::Healthcare,
        Category::Entertainment,
        Category::Other,
    ];

    /// Parse a category name, case-insensitively.
    ///
    /// Unknown names map to [Category::Other] rather than failing, mirroring
    /// how unknown categories are treated everywhere else.
    pub fn from_name(name: &str) -> Category {
        match name.trim().to_ascii_lowercase().as_str() {
            "food" => Category::Food,
            "travel" => Category::Travel,
            "utilities" => Category::Utilities,
            "shopping" => Category::Shopping,
            "healthcare" => Category::Healthcare,
            "entertainment" => Category::Entertainment,
            _ => Category::Other,
        }
    }

    /// The lowercase name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Travel => "travel",
            Category::Utilities => "utilities",
            Category::Shopping => "shopping",
            Category::Healthcare => "healthcare",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }

    /// The capitalised name for display in tables and forms.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Utilities => "Utilities",
            Category::Shopping => "Shopping",
            Category::Healthcare => "Healthcare",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// A stable color per category, shared by the charts and the badges so
    /// the dashboard and history page agree.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#f59e0b",
            Category::Travel => "#3b82f6",
            Category::Utilities => "#10b981",
            Category::Shopping => "#ec4899",
            Category::Healthcare => "#ef4444",
            Category::Entertainment => "#8b5cf6",
            Category::Other => "#6b7280",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from_name(s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;

        Ok(Category::from_name(&name))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;

        Ok(Category::from_name(name))
    }
}
