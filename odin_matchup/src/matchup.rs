/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! contract of the downstream matching stage, plus a CSV writer that records which observations
//! have validated granules

use std::{fs::{File, OpenOptions}, path::{Path,PathBuf}};
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;

use crate::input::ObservationRecord;
use crate::errors::Result;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum WriteMode {
    Create, // new output, header included
    Append,
}

/// one observation with the validated granules found for it
#[derive(Debug,Clone)]
pub struct RowResult {
    pub record: ObservationRecord,
    pub files: Vec<PathBuf>,
}

/// everything the matching stage gets for one calendar day
#[derive(Debug)]
pub struct DayBatch<'a> {
    pub day: NaiveDate,
    pub rows: &'a [RowResult],
    pub file: Option<&'a Path>, // first validated granule of the day
    pub mode: WriteMode,
}

/// the consumer of validated granules. Returns the number of matchups it produced
pub trait MatchUpStage: Send {
    fn process (&mut self, batch: &DayBatch)->Result<usize>;

    fn output_path (&self)->&Path;
}

#[derive(Serialize)]
struct CandidateRow<'a> {
    datetime: String,
    lat: f64,
    lon: f64,
    granule: &'a str,
    n_granules: usize,
}

/// `MatchUpStage` that writes one row per observation with at least one validated granule on disk
pub struct CandidateWriter {
    path: PathBuf,
}

impl CandidateWriter {
    pub fn new (path: impl AsRef<Path>)->Self {
        CandidateWriter { path: path.as_ref().to_path_buf() }
    }
}

impl MatchUpStage for CandidateWriter {
    fn process (&mut self, batch: &DayBatch)->Result<usize> {
        let rows: Vec<(&RowResult,Vec<&PathBuf>)> = batch.rows.iter()
            .map( |r| (r, r.files.iter().filter( |f| f.is_file()).collect::<Vec<_>>()))
            .filter( |(_,files)| !files.is_empty())
            .collect();
        if rows.is_empty() { return Ok(0) }

        let file = match batch.mode {
            WriteMode::Create => File::create( &self.path)?,
            WriteMode::Append => OpenOptions::new().create(true).append(true).open( &self.path)?,
        };
        let mut wtr = WriterBuilder::new()
            .has_headers( batch.mode == WriteMode::Create)
            .from_writer( file);

        for (r,files) in &rows {
            let granule = files[0].file_name().and_then( |n| n.to_str()).unwrap_or("");
            wtr.serialize( CandidateRow {
                datetime: r.record.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
                lat: r.record.lat,
                lon: r.record.lon,
                granule,
                n_granules: files.len(),
            })?;
        }
        wtr.flush()?;

        Ok( rows.len())
    }

    fn output_path (&self)->&Path { &self.path }
}
