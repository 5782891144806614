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

use chrono::{Datelike, NaiveDate, Timelike};
use encoding_rs::SHIFT_JIS;
use odin_matchup::input::*;

// run with "cargo test --test test_parse -- --nocapture"

#[test]
fn test_iso_date_precedence() {
    let dt = parse_datetime( "2020-03-04", "10:15:00").unwrap();
    assert_eq!( (dt.year(), dt.month(), dt.day()), (2020, 3, 4));
    assert_eq!( (dt.hour(), dt.minute(), dt.second()), (10, 15, 0));
}

#[test]
fn test_month_first_before_day_first() {
    let d = parse_date( "03/04/2020").unwrap();
    assert_eq!( (d.month(), d.day()), (3, 4));

    // not a valid month-first date, falls through to day-first
    let d = parse_date( "25/04/2020").unwrap();
    assert_eq!( (d.month(), d.day()), (4, 25));

    let d = parse_date( "20200304").unwrap();
    assert_eq!( (d.year(), d.month(), d.day()), (2020, 3, 4));

    let d = parse_date( "3-4-2020").unwrap();
    assert_eq!( (d.month(), d.day()), (3, 4));
}

#[test]
fn test_natural_language_date() {
    let d = parse_date( "June 1, 2019").unwrap();
    assert_eq!( d, NaiveDate::from_ymd_opt( 2019, 6, 1).unwrap());
    assert!( parse_date( "sometime").is_err());
}

#[test]
fn test_time_forms() {
    let t = parse_time( "3:07").unwrap();
    assert_eq!( (t.hour(), t.minute(), t.second()), (3, 7, 0));
    let t = parse_time( "23:59:58").unwrap();
    assert_eq!( (t.hour(), t.minute(), t.second()), (23, 59, 58));

    // accepted by the patterns but not a clock value
    assert!( parse_time( "123:45:00").is_err());
    assert!( parse_time( "24:00").is_err());
    assert!( parse_time( "noon").is_err());
}

#[test]
fn test_column_resolution() {
    assert_eq!( resolve_column( "DateTime_UTC"), Some(Column::Datetime));
    assert_eq!( resolve_column( "Sample Date"), Some(Column::Date));
    assert_eq!( resolve_column( "Longitude"), Some(Column::Lon));
    assert_eq!( resolve_column( "LAT"), Some(Column::Lat));
    assert_eq!( resolve_column( "chl"), None);
}

#[test]
fn test_read_date_time_table() {
    let text = "Date,Time,Lat,Lon,chl\n2019-06-01,03:00:00,10.0,120.0,0.3\n\n06/02/2019,4:30,11.5,121.0,0.4\n";
    let recs = read_records( text).unwrap();
    assert_eq!( recs.len(), 2);
    assert_eq!( recs[0].timestamp, NaiveDate::from_ymd_opt(2019,6,1).unwrap().and_hms_opt(3,0,0).unwrap());
    assert_eq!( recs[1].timestamp, NaiveDate::from_ymd_opt(2019,6,2).unwrap().and_hms_opt(4,30,0).unwrap());
    assert_eq!( recs[1].lat, 11.5);
}

#[test]
fn test_read_ymdhms_table() {
    let text = "year;month;day;hour;minute;second;longitude;latitude\n2019;6;1;3;0;15;120;10\n";
    let recs = read_records( text).unwrap();
    assert_eq!( recs[0].timestamp, NaiveDate::from_ymd_opt(2019,6,1).unwrap().and_hms_opt(3,0,15).unwrap());
    assert_eq!( recs[0].lon, 120.0);
}

#[test]
fn test_missing_fields() {
    let err = read_records( "lat,lon,chl\n10,120,0.3\n").unwrap_err();
    assert!( err.to_string().contains( "missing fields in text file"));

    let err = read_records( "datetime,chl\n2019-06-01T03:00:00,0.3\n").unwrap_err();
    assert!( err.to_string().contains( "lat,lon"));
}

#[test]
fn test_empty_coords_become_nan() {
    let recs = read_records( "datetime,lat,lon\n2019-06-01 03:00,,120\n").unwrap();
    assert!( recs[0].lat.is_nan());
}

#[test]
fn test_shift_jis_fallback() {
    let (bytes, _, _) = SHIFT_JIS.encode( "日付,時刻,lat,lon\n");
    let text = decode_text( &bytes);
    assert!( text.starts_with( "日付"));
}

#[test]
fn test_unpadded_and_short_year_dates() {
    let d34 = NaiveDate::from_ymd_opt( 2020, 3, 4).unwrap();
    assert_eq!( parse_date( "2020-3-4").unwrap(), d34);
    assert_eq!( parse_date( "2020/3/4").unwrap(), d34);
    assert_eq!( parse_date( "2019-6-1").unwrap(), NaiveDate::from_ymd_opt( 2019, 6, 1).unwrap());

    assert_eq!( parse_date( "3/4/20").unwrap(), d34); // month first
    assert_eq!( parse_date( "20-3-4").unwrap(), d34);
    assert_eq!( parse_date( "4.3.20").unwrap(), d34);
    assert_eq!( parse_date( "1 June 2019").unwrap(), NaiveDate::from_ymd_opt( 2019, 6, 1).unwrap());
}

#[test]
fn test_multibyte_datetime_separator() {
    let expected = NaiveDate::from_ymd_opt(2019,6,1).unwrap().and_hms_opt(3,0,0).unwrap();

    let recs = read_records( "datetime,lat,lon\n2019-06-01\u{3000}03:00:00,10,120\n").unwrap();
    assert_eq!( recs[0].timestamp, expected);

    assert_eq!( parse_combined( "2019-06-01\u{00a0}03:00:00").unwrap(), expected);
    assert_eq!( parse_combined( "2019-06-01\u{3000}").unwrap(), expected.date().and_hms_opt(0,0,0).unwrap());
}

#[test]
fn test_date_errors_are_validation_errors() {
    use odin_matchup::errors::OdinMatchupError;
    assert!( matches!( parse_date( "sometime"), Err(OdinMatchupError::ValidationError(_))));
    assert!( matches!( parse_date( "2020-02-31"), Err(OdinMatchupError::ValidationError(_))));
    assert!( matches!( parse_combined( "2019-06-01 25:61"), Err(OdinMatchupError::ValidationError(_))));
}
