// Facility Sim - Value history
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Append-only log of flattened parameter values.
//!
//! One [`ValueRecord`] per parameter per tick. The log is never trimmed here;
//! consumers window their own copy.

use crate::error::Result;
use crate::keys::{ComponentId, ControllerParameterType, FacilityId, ParamKey};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One parameter value at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub facility: FacilityId,
    pub component: ComponentId,
    pub parameter: ControllerParameterType,
    pub value: f64,
    /// Tick time in seconds.
    pub time: f64,
}

impl ValueRecord {
    pub fn new(key: ParamKey, value: f64, time: f64) -> Self {
        Self {
            facility: key.facility,
            component: key.component,
            parameter: key.parameter,
            value,
            time,
        }
    }

    pub fn key(&self) -> ParamKey {
        ParamKey::new(self.facility, self.component, self.parameter)
    }
}

/// Append-only sequence of [`ValueRecord`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<ValueRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ValueRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ValueRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[ValueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueRecord> {
        self.records.iter()
    }

    /// Values of one parameter in tick order.
    pub fn series(&self, key: ParamKey) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.key() == key)
            .map(|r| r.value)
            .collect()
    }

    /// Export to CSV (`facility,component,parameter,value,time`).
    ///
    /// Floats keep their decimal point (`7.0`), matching the writer's CSV sink.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "facility,component,parameter,value,time")?;
        for r in &self.records {
            writeln!(
                writer,
                "{},{},{},{:?},{:?}",
                r.facility, r.component, r.parameter, r.value, r.time
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export as a JSON array of records.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn key(parameter: ControllerParameterType) -> ParamKey {
        ParamKey::new(FacilityId(1001), ComponentId(10011), parameter)
    }

    fn sample() -> History {
        let mut history = History::new();
        for t in 0..3 {
            let time = t as f64;
            history.push(ValueRecord::new(
                key(ControllerParameterType::PowerConsumption),
                7.0 + time,
                time,
            ));
            history.push(ValueRecord::new(
                key(ControllerParameterType::Temperature),
                70.0 - time,
                time,
            ));
        }
        history
    }

    #[test]
    fn test_append_only() {
        let history = sample();
        assert_eq!(history.len(), 6);
        assert!(!history.is_empty());
        assert_eq!(history.records()[0].time, 0.0);
        assert_eq!(history.records()[5].time, 2.0);
    }

    #[test]
    fn test_series() {
        let history = sample();
        assert_eq!(
            history.series(key(ControllerParameterType::Temperature)),
            vec![70.0, 69.0, 68.0]
        );
        assert!(history.series(key(ControllerParameterType::Vibration)).is_empty());
    }

    #[test]
    fn test_to_csv() {
        let history = sample();
        let file = NamedTempFile::new().unwrap();
        history.to_csv(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("facility,component,parameter,value,time"));
        assert_eq!(lines.next(), Some("1001,10011,power_consumption,7.0,0.0"));
        assert_eq!(content.lines().count(), 7);
    }

    #[test]
    fn test_to_json() {
        let history = sample();
        let file = NamedTempFile::new().unwrap();
        history.to_json(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let records: Vec<ValueRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(records, history.records());
    }
}
