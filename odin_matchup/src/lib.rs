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

#![allow(unused)]

//! acquisition and validation of level-2 ocean color and SST granules for in-situ matchups.
//!
//! An input table of (time, lat, lon) observations is normalized and validated, then processed one
//! calendar day at a time: per observation a catalog query is built and executed, the found granules
//! are downloaded (skipping granules recorded in the control list) and triaged, and the validated
//! files are handed to a [`MatchUpStage`] before they are deleted again.

use std::{fs, path::Path};
use serde::Deserialize;

pub mod errors;
pub mod satellites;
pub mod input;
pub mod geo;
pub mod params;
pub mod query;
pub mod search;
pub mod netrc;
pub mod control_list;
pub mod download;
pub mod sanity;
pub mod matchup;
pub mod orchestrator;

use errors::Result;

pub use satellites::{Satellite, SatelliteRegistry, SatelliteDescriptor, DataType, SstFlag, Catalog};
pub use input::{ObservationRecord, read_input_file};
pub use params::{MatchupConfig, MatchupParams, TimeWindow};
pub use query::{Query, QueryBuilder};
pub use search::{GranuleSearch, GranuleRef, CatalogClient, CatalogSource};
pub use control_list::ControlList;
pub use download::{TransferPort, TransferOutcome, WgetTransfer, Downloader};
pub use sanity::{FileSanity, GranuleFormat, GdalExtractor, MaskedArray, VariableExtractor, Verdict};
pub use matchup::{MatchUpStage, CandidateWriter, DayBatch, RowResult, WriteMode};
pub use orchestrator::{DayBatchOrchestrator, MatchupOutcome, RowStatus};

/// load a RON config file
pub fn load_config<C> (path: impl AsRef<Path>)->Result<C> where C: for<'a> Deserialize<'a> {
    let bytes = fs::read( path)?;
    Ok( ron::de::from_bytes( &bytes)? )
}

/// the shipped default config
pub fn default_config ()->Result<MatchupConfig> {
    Ok( ron::de::from_str( include_str!("../configs/matchup.ron"))? )
}
