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

use std::{fs, path::{Path,PathBuf}};
use chrono::NaiveDate;
use odin_matchup::matchup::*;
use odin_matchup::input::ObservationRecord;

// run with "cargo test --test test_matchup -- --nocapture"

fn row (h: u32, files: &[PathBuf])->RowResult {
    let timestamp = NaiveDate::from_ymd_opt(2019,6,1).unwrap().and_hms_opt(h,0,0).unwrap();
    RowResult {
        record: ObservationRecord { index: 0, lon: 120.0, lat: 10.0, timestamp },
        files: files.to_vec(),
    }
}

fn granules (dir: &Path, names: &[&str])->Vec<PathBuf> {
    names.iter().map( |n| {
        let p = dir.join(n);
        fs::write( &p, b"granule").unwrap();
        p
    }).collect()
}

#[test]
fn test_candidate_writer_modes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matchups.csv");
    let mut w = CandidateWriter::new( &path);
    let day = NaiveDate::from_ymd_opt(2019,6,1).unwrap();
    let files = granules( dir.path(), &["A.L2.OC.nc", "B.L2.OC.nc", "C.L2.OC.nc"]);

    let rows = vec![ row(3, &files[..2]), row(4, &[])];
    let n = w.process( &DayBatch { day, rows: &rows, file: None, mode: WriteMode::Create }).unwrap();
    assert_eq!( n, 1);

    let rows = vec![ row(5, &files[2..])];
    let n = w.process( &DayBatch { day, rows: &rows, file: None, mode: WriteMode::Append }).unwrap();
    assert_eq!( n, 1);

    let text = fs::read_to_string( &path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!( lines.len(), 3);
    assert_eq!( lines[0], "datetime,lat,lon,granule,n_granules");
    assert_eq!( lines[1], "2019-06-01T03:00:00,10.0,120.0,A.L2.OC.nc,2");
    assert!( lines[2].starts_with( "2019-06-01T05:00:00"));
}

#[test]
fn test_candidate_writer_ignores_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matchups.csv");
    let mut w = CandidateWriter::new( &path);
    let day = NaiveDate::from_ymd_opt(2019,6,2).unwrap();

    let gone = dir.path().join("GONE.L2.OC.nc");
    let rows = vec![ row(0, &[gone.clone()])];
    let n = w.process( &DayBatch { day, rows: &rows, file: None, mode: WriteMode::Create }).unwrap();
    assert_eq!( n, 0);
    assert!( !path.exists());

    let files = granules( dir.path(), &["HERE.L2.OC.nc"]);
    let rows = vec![ row(1, &[gone, files[0].clone()])];
    let n = w.process( &DayBatch { day, rows: &rows, file: None, mode: WriteMode::Create }).unwrap();
    assert_eq!( n, 1);

    let text = fs::read_to_string( &path).unwrap();
    assert!( text.lines().nth(1).unwrap().ends_with( ",HERE.L2.OC.nc,1"));
}
