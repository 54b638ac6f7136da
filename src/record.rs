//! The single-house feature record used at inference time.

use polars::prelude::*;

use crate::error::Result;

pub const LOCATION: &str = "location";

pub const TARGET: &str = "price";

/// Numeric features a record can supply, in record order.
pub const NUMERIC_FEATURES: [&str; 5] = ["area", "bedrooms", "bathrooms", "year_built", "age"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub area: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub year_built: i64,
    pub age: i64,
    pub location: String,
}

impl FeatureRecord {
    /// Wrap the record as a one-row frame with the training column names.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new("area", &[self.area]),
            Series::new("bedrooms", &[self.bedrooms]),
            Series::new("bathrooms", &[self.bathrooms]),
            Series::new("year_built", &[self.year_built]),
            Series::new("age", &[self.age]),
            Series::new(LOCATION, &[self.location.as_str()]),
        ])?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FeatureRecord {
        FeatureRecord {
            area: 2000,
            bedrooms: 3,
            bathrooms: 2,
            year_built: 1990,
            age: 35,
            location: "Pune".to_string(),
        }
    }

    #[test]
    fn test_to_frame_is_single_row() {
        let df = record().to_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 6);
        for name in NUMERIC_FEATURES {
            assert!(df.column(name).is_ok(), "{name} should be a column");
        }
        assert_eq!(
            df.column(LOCATION).unwrap().str().unwrap().get(0),
            Some("Pune")
        );
    }
}
