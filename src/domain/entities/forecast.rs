use serde::{Deserialize, Serialize};

/// One row of `GET /weatherforecast`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub date: String,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_accepts_null_summary() {
        let rows: Vec<Forecast> = serde_json::from_str(
            r#"[{"date":"2026-10-20","temperatureC":21,"temperatureF":69,"summary":null}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature_f, 69);
        assert!(rows[0].summary.is_none());
    }
}
