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

// run with "cargo test --test test_input -- --nocapture"

use std::fs;
use chrono::{NaiveDate, Timelike};
use encoding_rs::SHIFT_JIS;
use tempfile::TempDir;

use odin_matchup::{read_input_file, geo::check_geo};
use odin_matchup::errors::OdinMatchupError;

#[test]
fn test_shift_jis_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("obs.csv");
    let text = "観測日 date,time,latitude 緯度,longitude 経度\n2019/06/01,03:00,10.0,120.0\n2019/06/02,13:45:30,-5.5,-170.25\n";
    let (bytes, _, _) = SHIFT_JIS.encode( text);
    fs::write( &path, &bytes).unwrap();

    let recs = read_input_file( &path).unwrap();
    assert_eq!( recs.len(), 2);
    assert_eq!( recs[0].day(), NaiveDate::from_ymd_opt(2019,6,1).unwrap());
    assert_eq!( recs[1].timestamp.second(), 30);
    assert_eq!( recs[1].lon, -170.25);
    assert!( check_geo( &recs).is_ok());
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let err = read_input_file( dir.path().join("nope.csv")).unwrap_err();
    assert!( matches!( err, OdinMatchupError::ValidationError(_)));
}

#[test]
fn test_out_of_range_longitude_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("obs.csv");
    fs::write( &path, "year,month,day,hour,minute,lat,lon\n2019,6,1,3,0,10,120\n2019,6,1,4,0,10,190.5\n").unwrap();

    let recs = read_input_file( &path).unwrap();
    let err = check_geo( &recs).unwrap_err();
    assert!( err.to_string().contains("invalid longitude"));
    assert!( err.to_string().contains("190.5"));
}
