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

use std::{path::{Path,PathBuf}, time::Duration};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::satellites::{DataType, Satellite, SatelliteRegistry, SstFlag};
use crate::errors::{Result, validation_error};

pub const MAX_TIME_DIFF_LIMIT: f64 = 36.0; // hours

/// endpoint and transfer settings. The `Default` matches configs/matchup.ron
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct MatchupConfig {
    pub cmr_url: String,
    pub provider: String,
    pub page_size: usize,
    pub browse_url: String,  // OceanColor level1or2 browser
    pub getfile_url: String, // base for files resolved from browse listings
    pub csw_url: String,

    pub earthdata_host: String, // netrc machine for CMR downloads
    pub gportal_host: String,   // netrc machine and FTP host for G-Portal downloads

    pub transfer_cmd: String,
    pub transfer_tries: u32,
    pub cookie_file: Option<PathBuf>, // defaults to ~/.urs_cookies
    pub request_timeout: Duration,

    pub box_half_width: f64, // deg
    pub control_file: String,
}

impl Default for MatchupConfig {
    fn default ()->Self {
        MatchupConfig {
            cmr_url: "https://cmr.earthdata.nasa.gov/search/granules.json".into(),
            provider: "OB_DAAC".into(),
            page_size: 2000,
            browse_url: "https://oceancolor.gsfc.nasa.gov/cgi/browse.pl".into(),
            getfile_url: "https://oceandata.sci.gsfc.nasa.gov/ob/getfile".into(),
            csw_url: "https://gportal.jaxa.jp/csw/csw".into(),
            earthdata_host: "urs.earthdata.nasa.gov".into(),
            gportal_host: "ftp.gportal.jaxa.jp".into(),
            transfer_cmd: "wget".into(),
            transfer_tries: 5,
            cookie_file: None,
            request_timeout: Duration::from_secs(30),
            box_half_width: 0.01,
            control_file: "control_list.txt".into(),
        }
    }
}

impl MatchupConfig {
    pub fn cookie_path (&self)->PathBuf {
        match &self.cookie_file {
            Some(path) => path.clone(),
            None => {
                let home = std::env::var("HOME").or_else( |_| std::env::var("USERPROFILE")).unwrap_or_else( |_| ".".into());
                Path::new( &home).join(".urs_cookies")
            }
        }
    }
}

/// validated parameters of one matchup run
#[derive(Debug,Clone)]
pub struct MatchupParams {
    pub satellite: Satellite,
    pub data_type: DataType,
    pub sst_flag: Option<SstFlag>, // only set for SST data
    pub max_time_diff: f64, // hours
    pub output_dir: PathBuf,
}

impl MatchupParams {
    pub fn new (registry: &SatelliteRegistry, satellite: Satellite, data_type: DataType, sst_flag: SstFlag,
                max_time_diff: f64, output_dir: impl AsRef<Path>)->Result<Self>
    {
        if !(0.0..=MAX_TIME_DIFF_LIMIT).contains( &max_time_diff) {
            return Err( validation_error!("max time difference must be within 0..{} hours. Received: {}", MAX_TIME_DIFF_LIMIT, max_time_diff))
        }
        registry.check_product( satellite, data_type)?;

        let sst_flag = if data_type.is_sst() { Some(sst_flag) } else { None };
        let output_dir = output_dir.as_ref().to_path_buf();

        Ok( MatchupParams { satellite, data_type, sst_flag, max_time_diff, output_dir } )
    }

    pub fn control_file (&self, config: &MatchupConfig)->PathBuf {
        self.output_dir.join( &config.control_file)
    }
}

/// search time window around an observation
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// whole hours and the fractional remainder (as minutes) are applied separately to both sides
    pub fn around (timestamp: NaiveDateTime, max_time_diff: f64)->Self {
        let hours = max_time_diff.trunc() as i64;
        let frac_ms = ((max_time_diff - max_time_diff.trunc()) * 3_600_000.0).round() as i64;

        let lower = TimeDelta::hours( -hours) + TimeDelta::milliseconds( -frac_ms);
        let upper = TimeDelta::hours( hours) + TimeDelta::milliseconds( frac_ms);

        TimeWindow { start: timestamp + lower, end: timestamp + upper }
    }

    pub fn with_start (self, start: NaiveDateTime)->Self {
        TimeWindow { start, end: self.end }
    }
}
