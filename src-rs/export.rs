//! Pattern snapshots.
//!
//! An [`ExportRecord`] is the JSON form of a chart. It is built in one go
//! from a grid and never edited afterwards; every other export (text,
//! printable, PNG) is produced from the same record.

use crate::color::Color;
use crate::error::ChartError;
use crate::grid::{Grid, GridDimensions};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const RECORD_TYPE: &str = "c2c_crochet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YarnWeight {
    Thread,
    Fine,
    Light,
    #[default]
    Medium,
    Bulky,
    SuperBulky,
}

impl YarnWeight {
    pub const ALL: [YarnWeight; 6] = [
        YarnWeight::Thread,
        YarnWeight::Fine,
        YarnWeight::Light,
        YarnWeight::Medium,
        YarnWeight::Bulky,
        YarnWeight::SuperBulky,
    ];

    pub fn id(self) -> &'static str {
        match self {
            YarnWeight::Thread => "thread",
            YarnWeight::Fine => "fine",
            YarnWeight::Light => "light",
            YarnWeight::Medium => "medium",
            YarnWeight::Bulky => "bulky",
            YarnWeight::SuperBulky => "super-bulky",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            YarnWeight::Thread => "Thread/Lace (Size 10, 20, 30)",
            YarnWeight::Fine => "Fine/Sport (Size 2)",
            YarnWeight::Light => "Light/DK (Size 3)",
            YarnWeight::Medium => "Medium/Worsted (Size 4)",
            YarnWeight::Bulky => "Bulky (Size 5)",
            YarnWeight::SuperBulky => "Super Bulky (Size 6)",
        }
    }
}

impl fmt::Display for YarnWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for YarnWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|yarn| yarn.id() == wanted)
            .ok_or_else(|| {
                let ids: Vec<&str> = Self::ALL.iter().map(|y| y.id()).collect();
                format!("unknown yarn weight {s:?} (expected one of: {})", ids.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    grid: Vec<Vec<Color>>,
    size: GridDimensions,
    yarn_type: YarnWeight,
    #[serde(rename = "type")]
    kind: String,
    timestamp: String,
}

impl ExportRecord {
    pub fn snapshot(grid: &Grid, yarn: YarnWeight) -> Self {
        Self::snapshot_at(grid, yarn, Utc::now())
    }

    pub fn snapshot_at(grid: &Grid, yarn: YarnWeight, at: DateTime<Utc>) -> Self {
        Self {
            grid: grid.rows().to_vec(),
            size: grid.dims(),
            yarn_type: yarn,
            kind: RECORD_TYPE.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn grid(&self) -> &[Vec<Color>] {
        &self.grid
    }

    pub fn size(&self) -> GridDimensions {
        self.size
    }

    pub fn yarn_type(&self) -> YarnWeight {
        self.yarn_type
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// RFC 3339 creation time, as written.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Rebuilds the grid, checking the record is a well-formed C2C pattern.
    pub fn to_grid(&self) -> Result<Grid, ChartError> {
        if self.kind != RECORD_TYPE {
            return Err(ChartError::InvalidRecord(format!(
                "type is {:?}, expected {RECORD_TYPE:?}",
                self.kind
            )));
        }
        let grid = Grid::from_rows(self.grid.clone())?;
        if grid.dims() != self.size {
            return Err(ChartError::InvalidRecord(format!(
                "size says {}x{} but grid is {}x{}",
                self.size.width,
                self.size.height,
                grid.width(),
                grid.height()
            )));
        }
        Ok(grid)
    }

    pub fn to_json_pretty(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ChartError> {
        let record: Self = serde_json::from_str(raw)?;
        record.to_grid()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(GridDimensions { width: 3, height: 2 });
        grid.set_cell(0, 0, Color::RED).unwrap();
        grid.set_cell(1, 2, Color::rgb(0x12, 0x34, 0x56)).unwrap();
        grid
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn record_uses_external_field_names() {
        let record =
            ExportRecord::snapshot_at(&sample_grid(), YarnWeight::SuperBulky, fixed_time());
        let value: Value = serde_json::from_str(&record.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["type"], "c2c_crochet");
        assert_eq!(value["yarnType"], "super-bulky");
        assert_eq!(value["size"]["width"], 3);
        assert_eq!(value["size"]["height"], 2);
        assert_eq!(value["grid"][0][0], "#FF0000");
        assert_eq!(value["grid"][1][2], "#123456");
        assert_eq!(value["timestamp"], "2024-03-09T14:05:00.000Z");
        assert_eq!(record.kind(), RECORD_TYPE);
        assert_eq!(record.timestamp(), "2024-03-09T14:05:00.000Z");
    }

    #[test]
    fn json_round_trip_restores_grid() {
        let grid = sample_grid();
        let record = ExportRecord::snapshot(&grid, YarnWeight::Fine);
        let back = ExportRecord::from_json(&record.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back.to_grid().unwrap(), grid);
        assert_eq!(back.yarn_type(), YarnWeight::Fine);
        assert_eq!(back.size(), grid.dims());
        assert_eq!(back.grid(), grid.rows());
        assert!(back.created_at().is_some());
    }

    #[test]
    fn accepts_lowercase_hex_from_other_writers() {
        let raw = r##"{"grid":[["#ff0000","#ffffff"]],"size":{"width":2,"height":1},
            "yarnType":"medium","type":"c2c_crochet","timestamp":"2024-01-01T00:00:00.000Z"}"##;
        let grid = ExportRecord::from_json(raw).unwrap().to_grid().unwrap();
        assert_eq!(grid.get(0, 0), Some(Color::RED));
        assert!(grid.get(0, 1).unwrap().is_background());
    }

    fn edited_json(edit: impl FnOnce(&mut Value)) -> String {
        let base = ExportRecord::snapshot_at(&sample_grid(), YarnWeight::Medium, fixed_time());
        let mut value: Value = serde_json::from_str(&base.to_json_pretty().unwrap()).unwrap();
        edit(&mut value);
        value.to_string()
    }

    #[test]
    fn rejects_malformed_records() {
        let wrong_type = edited_json(|v| v["type"] = "knitting".into());
        assert!(matches!(
            ExportRecord::from_json(&wrong_type),
            Err(ChartError::InvalidRecord(_))
        ));

        let wrong_size = edited_json(|v| v["size"]["width"] = 4.into());
        assert!(ExportRecord::from_json(&wrong_size).is_err());

        let ragged = edited_json(|v| {
            v["grid"][1].as_array_mut().unwrap().pop();
        });
        assert!(ExportRecord::from_json(&ragged).is_err());

        assert!(ExportRecord::from_json("{\"grid\": []}").is_err());
    }

    #[test]
    fn unvalidated_record_fails_on_restore() {
        let wrong_size = edited_json(|v| v["size"]["width"] = 2.into());
        let record: ExportRecord = serde_json::from_str(&wrong_size).unwrap();
        assert_eq!(record.size(), GridDimensions { width: 2, height: 2 });
        assert!(matches!(record.to_grid(), Err(ChartError::InvalidRecord(_))));
    }

    #[test]
    fn yarn_ids_parse() {
        assert_eq!("super_bulky".parse::<YarnWeight>(), Ok(YarnWeight::SuperBulky));
        assert_eq!("Thread".parse::<YarnWeight>(), Ok(YarnWeight::Thread));
        assert!("worsted".parse::<YarnWeight>().is_err());
        assert_eq!(YarnWeight::default().display_name(), "Medium/Worsted (Size 4)");
    }
}
