// Facility Sim Writer - Output sinks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Destinations for generated values.

use crate::config::SinkSettings;
use crate::error::WriterError;
use facility_sim::ValueRecord;
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::Path;

/// Receives the values of each tick.
pub trait Sink {
    fn write(&mut self, records: &[ValueRecord]) -> Result<(), WriterError>;

    fn flush(&mut self) -> Result<(), WriterError>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, records: &[ValueRecord]) -> Result<(), WriterError> {
        (**self).write(records)
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        (**self).flush()
    }
}

/// Build the sink described by the settings.
pub fn from_settings(settings: &SinkSettings) -> Result<Box<dyn Sink>, WriterError> {
    Ok(match settings {
        SinkSettings::Csv { path } => Box::new(CsvSink::from_path(path)?),
        SinkSettings::Stdout => Box::new(JsonLinesSink::stdout()),
    })
}

/// CSV rows with a `facility,component,parameter,value,time` header.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> Sink for CsvSink<W> {
    fn write(&mut self, records: &[ValueRecord]) -> Result<(), WriterError> {
        for record in records {
            self.writer.serialize(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One JSON object per record and line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl JsonLinesSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn write(&mut self, records: &[ValueRecord]) -> Result<(), WriterError> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WriterError> {
        self.writer.flush()?;
        Ok(())
    }
}
