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

//! drives search, download and triage per calendar day and hands each day's results to the matching
//! stage. Local granules never outlive the day they were downloaded for

use std::{collections::BTreeMap, fs, path::{Path,PathBuf}, sync::Arc, time::Instant};
use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

use crate::control_list::ControlList;
use crate::download::{Downloader, TransferPort};
use crate::geo::{check_geo, validate_lat, validate_lon};
use crate::input::ObservationRecord;
use crate::matchup::{DayBatch, MatchUpStage, RowResult, WriteMode};
use crate::params::{MatchupConfig, MatchupParams, TimeWindow};
use crate::query::QueryBuilder;
use crate::sanity::{FileSanity, VariableExtractor, remove_file};
use crate::satellites::SatelliteRegistry;
use crate::search::GranuleSearch;
use crate::errors::Result;

#[derive(Debug,Clone,PartialEq)]
pub enum MatchupOutcome {
    Saved { path: PathBuf, count: usize },
    /// nothing matched, contains the message reported to the user
    NoMatchups(String),
}

pub fn no_matchups_message (input: &str)->String {
    format!("No valid satellite match-ups found for any lat/lon/time pairs in {}", input)
}

/// what happened to one observation row
#[derive(Debug,Clone,PartialEq)]
pub enum RowStatus {
    OutSatTimeRange,
    NoValidLonLat,
    NoGranules,
    Processed { downloaded: Vec<PathBuf>, kept: Vec<PathBuf> },
}

impl RowStatus {
    pub fn kept (&self)->&[PathBuf] {
        match self {
            RowStatus::Processed { kept, .. } => kept,
            _ => &[]
        }
    }

    pub fn downloaded (&self)->&[PathBuf] {
        match self {
            RowStatus::Processed { downloaded, .. } => downloaded,
            _ => &[]
        }
    }
}

struct Progress {
    count: usize,
    total: usize,
}

impl Progress {
    fn next (&mut self)->String {
        self.count += 1;
        progress_message( self.count, self.total)
    }
}

pub fn progress_message (count: usize, total: usize)->String {
    let width = total.to_string().len();
    let pct = if total > 0 { count as f64 / total as f64 * 100.0 } else { 100.0 };
    format!("FileSearch: {:0width$} ({:.2}%) OUT-OF {}", count, pct, total, width = width)
}

pub struct DayBatchOrchestrator {
    registry: SatelliteRegistry,
    params: MatchupParams,
    builder: QueryBuilder,
    search: Arc<dyn GranuleSearch>,
    downloader: Downloader,
    sanity: FileSanity,
    control: ControlList,
}

impl DayBatchOrchestrator {
    pub fn new (registry: SatelliteRegistry, params: MatchupParams, config: &MatchupConfig,
                search: Arc<dyn GranuleSearch>, transfer: Arc<dyn TransferPort>, extractor: Arc<dyn VariableExtractor>)->Result<Self>
    {
        let desc = registry.get( params.satellite)?.clone();
        let builder = QueryBuilder::new( &desc, &params, config)?;

        fs::create_dir_all( &params.output_dir)?;
        let control = ControlList::ensure( params.control_file( config))?;
        let downloader = Downloader::new( transfer, control.clone(), &params.output_dir);
        let sanity = FileSanity::new( extractor, desc.format, params.satellite);

        Ok( DayBatchOrchestrator { registry, params, builder, search, downloader, sanity, control })
    }

    pub fn control_list (&self)->&ControlList { &self.control }

    /// search, download and triage granules for one observation
    pub async fn process_row (&self, rec: &ObservationRecord, progress: String)->Result<RowStatus> {
        let window = TimeWindow::around( rec.timestamp, self.params.max_time_diff);
        let message = format!("       Lon: {}\n       Lat: {}\n     Start: {}\n       End: {}\n{}",
                              rec.lon, rec.lat, window.start, window.end, progress);
        let sep = "=".repeat( progress.len().max( 26));

        if self.registry.skip( self.params.satellite, rec.timestamp.date().num_days_from_ce()) {
            info!("\n{}\nOutSatTimeRange\n{}", message, sep);
            return Ok( RowStatus::OutSatTimeRange)
        }
        if !rec.lat.is_finite() || !rec.lon.is_finite() {
            info!("\n{}\nNoValid: LonLat\n{}", message, sep);
            return Ok( RowStatus::NoValidLonLat)
        }
        validate_lon( rec.lon)?;
        validate_lat( rec.lat)?;
        info!("\n{}\n{}", message, sep);

        let query = self.builder.for_observation( rec, window)?;
        let granules = self.search.search( &query).await?;
        if granules.is_empty() {
            warn!("no matching granules found for row {}, continuing with the rest of the input", rec.index + 1);
            return Ok( RowStatus::NoGranules)
        }

        let downloaded = self.downloader.fetch_all( &granules).await?;
        let kept = self.sanity.check( &downloaded, &self.control)?;

        Ok( RowStatus::Processed { downloaded, kept })
    }

    /// run the complete matchup over `records`, one calendar day at a time
    pub async fn run (&self, records: &[ObservationRecord], input_name: &str, stage: &mut dyn MatchUpStage)->Result<MatchupOutcome> {
        let start = Instant::now();
        check_geo( records)?;

        let days = group_by_day( records);
        let n_days = days.len();
        let day_width = n_days.to_string().len();
        let mut progress = Progress { count: 0, total: records.len() };
        let mut mode = WriteMode::Create;
        let mut found = 0;

        for (d, (day, day_records)) in days.into_iter().enumerate() {
            let banner = format!("Day: {}, {:width$} in {}", day, d+1, n_days, width = day_width);
            let stars = "*".repeat( banner.len());
            info!("\n{}\n{}\n{}", stars, banner, stars);

            let mut rows: Vec<RowResult> = Vec::with_capacity( day_records.len());
            let mut day_files: Vec<PathBuf> = Vec::new();

            for rec in day_records {
                let status = self.process_row( rec, progress.next()).await?;
                for f in status.downloaded() {
                    if !day_files.contains(f) { day_files.push( f.clone()) }
                }
                rows.push( RowResult { record: rec.clone(), files: status.kept().to_vec() });
            }

            let first_file = rows.iter().flat_map( |r| r.files.iter()).find( |f| f.is_file()).map( |f| f.as_path());
            let batch = DayBatch { day, rows: &rows, file: first_file, mode };
            let result = stage.process( &batch);

            for f in &day_files { remove_file( f) }

            let n = result?;
            found += n;
            if n > 0 { mode = WriteMode::Append }
        }

        let output = stage.output_path().to_path_buf();
        info!("{} match-ups saved to: {:?}", found, output);
        log_elapsed( start);

        if found > 0 {
            Ok( MatchupOutcome::Saved { path: output, count: found })
        } else {
            let msg = no_matchups_message( input_name);
            info!("{}", msg);
            Ok( MatchupOutcome::NoMatchups( msg))
        }
    }

    /// download and validate granules for all records without matching them. Files are kept
    pub async fn fetch_granules (&self, records: &[ObservationRecord])->Result<Vec<PathBuf>> {
        let start = Instant::now();
        check_geo( records)?;

        let mut progress = Progress { count: 0, total: records.len() };
        let mut files: Vec<PathBuf> = Vec::new();

        for rec in records {
            let status = self.process_row( rec, progress.next()).await?;
            for f in status.kept() {
                if !files.contains(f) { files.push( f.clone()) }
            }
        }

        info!("{} granules available in {:?}", files.len(), self.params.output_dir);
        log_elapsed( start);
        Ok(files)
    }
}

/// records grouped by calendar day of their timestamp, days sorted, input order within each day
pub fn group_by_day (records: &[ObservationRecord])->BTreeMap<NaiveDate,Vec<&ObservationRecord>> {
    let mut days: BTreeMap<NaiveDate,Vec<&ObservationRecord>> = BTreeMap::new();
    for r in records {
        days.entry( r.day()).or_default().push( r);
    }
    days
}

fn log_elapsed (start: Instant) {
    let secs = start.elapsed().as_secs_f64();
    let hrs = (secs / 3600.0).floor();
    let mnt = ((secs % 3600.0) / 60.0).floor();
    let sec = secs % 60.0;
    info!("Processing Time: {}hrs {}min {:.2}sec", hrs, mnt, sec);
}
