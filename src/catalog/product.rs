//! Product record and upstream normalization
//!
//! Upstream catalog records are loosely shaped: fields go missing, change
//! type, or carry grades outside A-E. `RawProduct` absorbs all of that so
//! `normalize` never fails.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// Placeholder name for products without one upstream
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

/// Nutri-Score grade, `Unknown` renders as `?`
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum NutriScore {
    A,
    B,
    C,
    D,
    E,
    #[default]
    Unknown,
}

impl NutriScore {
    /// All grades in display order
    pub const ALL: [NutriScore; 6] = [
        NutriScore::A,
        NutriScore::B,
        NutriScore::C,
        NutriScore::D,
        NutriScore::E,
        NutriScore::Unknown,
    ];

    /// Parse an upstream grade, case-insensitive
    ///
    /// Anything that is not a single A-E letter (empty, "unknown",
    /// "not-applicable", ...) maps to `Unknown`.
    pub fn from_grade(grade: &str) -> Self {
        match grade.trim().to_ascii_uppercase().as_str() {
            "A" => NutriScore::A,
            "B" => NutriScore::B,
            "C" => NutriScore::C,
            "D" => NutriScore::D,
            "E" => NutriScore::E,
            _ => NutriScore::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutriScore::A => "A",
            NutriScore::B => "B",
            NutriScore::C => "C",
            NutriScore::D => "D",
            NutriScore::E => "E",
            NutriScore::Unknown => "?",
        }
    }

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        match self {
            NutriScore::A => 0,
            NutriScore::B => 1,
            NutriScore::C => 2,
            NutriScore::D => 3,
            NutriScore::E => 4,
            NutriScore::Unknown => 5,
        }
    }
}

impl fmt::Display for NutriScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NutriScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NutriScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let grade = Option::<String>::deserialize(deserializer)?;
        Ok(grade.as_deref().map(NutriScore::from_grade).unwrap_or_default())
    }
}

/// Normalized catalog product
///
/// Immutable once built; callers receive owned copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    barcode: String,
    name: String,
    brand: String,
    nutriscore: NutriScore,
    image: Option<String>,
    categories: String,
}

impl Product {
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn nutriscore(&self) -> NutriScore {
        self.nutriscore
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn categories(&self) -> &str {
        &self.categories
    }
}

/// Upstream product record with every field optional
///
/// Strings and numbers are both accepted for text fields; any other JSON
/// type is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brands: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nutriscore_grade: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_small_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub categories: Option<String>,
}

impl RawProduct {
    /// Read a raw record out of arbitrary JSON; non-objects yield an empty record
    pub fn from_json(value: &JsonValue) -> Self {
        if !value.is_object() {
            return RawProduct::default();
        }
        RawProduct::deserialize(value).unwrap_or_default()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Map an upstream record onto a `Product`
///
/// Barcode falls back from `code` to `_id` to empty; name defaults to
/// `UNKNOWN_PRODUCT_NAME`; grade defaults to `?`; image to absent;
/// brand and categories to empty.
pub fn normalize(raw: RawProduct) -> Product {
    Product {
        barcode: raw.code.or(raw.id).unwrap_or_default(),
        name: raw
            .product_name
            .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
        brand: raw.brands.unwrap_or_default(),
        nutriscore: raw
            .nutriscore_grade
            .as_deref()
            .map(NutriScore::from_grade)
            .unwrap_or_default(),
        image: raw.image_small_url,
        categories: raw.categories.unwrap_or_default(),
    }
}

/// Normalize a JSON value directly
pub fn normalize_json(value: &JsonValue) -> Product {
    normalize(RawProduct::from_json(value))
}
