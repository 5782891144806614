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

//! reading in-situ observation tables. Column names are matched loosely against a fixed vocabulary,
//! timestamps are resolved from whatever date/time column grouping the table provides

use std::{collections::HashMap, fs, path::Path};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::SHIFT_JIS;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::{OdinMatchupError, Result, validation_error};

pub const MISSING_TIME_FIELDS: &str = "missing fields in text file. File must contain date/time, date/hour/minute/second, \
                                       year/month/day/time, OR year/month/day/hour/minute/second";
pub const MISSING_GEO_FIELDS: &str = "missing fields in INPUT file. File must contain lat,lon";

/// one resolved input row
#[derive(Debug,Clone,PartialEq)]
pub struct ObservationRecord {
    pub index: usize, // 0-based data row in input file
    pub lon: f64,
    pub lat: f64,
    pub timestamp: NaiveDateTime,
}

impl ObservationRecord {
    pub fn day (&self)->NaiveDate { self.timestamp.date() }
}

/* #region column resolution *******************************************************************/

/// canonical column names
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum Column { Datetime, Date, Year, Month, Day, Time, Hour, Minute, Second, Lon, Lat }

// order matters - combined timestamp names have to be tried before their 'date' and 'time' parts
const VOCABULARY: [(&str,Column); 12] = [
    ("datetime", Column::Datetime),
    ("timestamp", Column::Datetime),
    ("date", Column::Date),
    ("year", Column::Year),
    ("month", Column::Month),
    ("day", Column::Day),
    ("time", Column::Time),
    ("hour", Column::Hour),
    ("minute", Column::Minute),
    ("second", Column::Second),
    ("lon", Column::Lon),
    ("lat", Column::Lat),
];

/// case-insensitive substring match against the vocabulary, first match wins
pub fn resolve_column (name: &str)->Option<Column> {
    let name = name.to_lowercase();
    VOCABULARY.iter().find( |(word,_)| name.contains( word)).map( |(_,col)| *col)
}

/// the way timestamps are assembled from the resolved columns
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TimeGrouping {
    Combined,
    DateTime,
    DateHms,
    YmdTime,
    YmdHms,
}

/// maps canonical columns to field indices of the table
#[derive(Debug,Clone)]
pub struct ColumnMap {
    fields: HashMap<Column,usize>,
}

impl ColumnMap {
    pub fn from_headers (headers: &StringRecord)->Self {
        let mut fields = HashMap::new();
        for (i,h) in headers.iter().enumerate() {
            if let Some(col) = resolve_column( h) {
                // keep the first column that resolves to a given name
                fields.entry( col).or_insert( i);
            }
        }
        ColumnMap { fields }
    }

    pub fn get (&self, col: Column)->Option<usize> { self.fields.get( &col).copied() }

    pub fn has (&self, cols: &[Column])->bool { cols.iter().all( |c| self.fields.contains_key(c)) }

    pub fn grouping (&self)->Result<TimeGrouping> {
        use Column::*;
        if self.has( &[Datetime]) { Ok(TimeGrouping::Combined) }
        else if self.has( &[Date,Time]) { Ok(TimeGrouping::DateTime) }
        else if self.has( &[Date,Hour,Minute]) { Ok(TimeGrouping::DateHms) }
        else if self.has( &[Year,Month,Day,Time]) { Ok(TimeGrouping::YmdTime) }
        else if self.has( &[Year,Month,Day,Hour,Minute]) { Ok(TimeGrouping::YmdHms) }
        else { Err( validation_error!("{}", MISSING_TIME_FIELDS)) }
    }
}

/* #endregion column resolution */

/* #region date and time parsing ***************************************************************/

#[derive(Debug,Clone,Copy)]
enum FieldOrder { Ymd, Mdy, Dmy }

lazy_static! {
    // strict precedence: the first pattern that matches decides between month-first and day-first
    static ref DATE_PATTERNS: Vec<(Regex,FieldOrder)> = {
        let ymd = [
            r"(\d{4})(1[0-2]|0[1-9])(3[01]|[12][0-9]|0[1-9])",
            r"(\d{4})/(1[0-2]|0[1-9])/(3[01]|[12][0-9]|0[1-9])",
            r"(\d{4})-(1[0-2]|0[1-9])-(3[01]|[12][0-9]|0[1-9])",
        ];
        let mdy = [
            r"(1[0-2]|0[1-9])(3[01]|[12][0-9]|0[1-9])(\d{4})",
            r"(1[0-2]|0[1-9])/(3[01]|[12][0-9]|0[1-9])/(\d{4})",
            r"(1[0-2]|0[1-9])-(3[01]|[12][0-9]|0[1-9])-(\d{4})",
            r"(1[0-2]|[1-9])(3[01]|[12][0-9]|[1-9])(\d{4})",
            r"(1[0-2]|[1-9])/(3[01]|[12][0-9]|[1-9])/(\d{4})",
            r"(1[0-2]|[1-9])-(3[01]|[12][0-9]|[1-9])-(\d{4})",
        ];
        let dmy = [
            r"(3[01]|[12][0-9]|0[1-9])(1[0-2]|0[1-9])(\d{4})",
            r"(3[01]|[12][0-9]|0[1-9])/(1[0-2]|0[1-9])/(\d{4})",
            r"(3[01]|[12][0-9]|0[1-9])-(1[0-2]|0[1-9])-(\d{4})",
            r"(3[01]|[12][0-9]|[1-9])(1[0-2]|[1-9])(\d{4})",
            r"(3[01]|[12][0-9]|[1-9])/(1[0-2]|[1-9])/(\d{4})",
            r"(3[01]|[12][0-9]|[1-9])-(1[0-2]|[1-9])-(\d{4})",
        ];

        let mut patterns = Vec::new();
        for p in ymd { patterns.push( (Regex::new(p).unwrap(), FieldOrder::Ymd)) }
        for p in mdy { patterns.push( (Regex::new(p).unwrap(), FieldOrder::Mdy)) }
        for p in dmy { patterns.push( (Regex::new(p).unwrap(), FieldOrder::Dmy)) }
        patterns
    };

    static ref HMS_RE: Regex = Regex::new( r"([0-9]{1,2}|[1-2][0-3]{1,2}):([0-9]{1,2}|[1-5][0-9]{1,2}):([0-9]{1,2}|[1-5][0-9]{1,2})").unwrap();
    static ref HM_RE: Regex = Regex::new( r"([0-9]{1,2}|[1-2][0-3]{1,2}):([0-9]{1,2}|[1-5][0-9]{1,2})").unwrap();
}

// last resort for unpadded, two-digit year and spelled-out dates. Month-first wins for ambiguous
// two-digit years
const NATURAL_DATE_FORMATS: [&str; 20] = [
    "%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%Y.%m.%d", "%Y %m %d",
    "%m/%d/%y", "%m-%d-%y", "%y-%m-%d", "%y/%m/%d", "%d.%m.%Y", "%d.%m.%y",
    "%B %d, %Y", "%B %d %Y", "%b %d, %Y", "%b %d %Y",
    "%d %B %Y", "%d %b %Y", "%d-%b-%Y", "%d-%b-%y", "%b %d, %y",
];

fn cap_u32 (caps: &regex::Captures, i: usize)->u32 {
    caps.get(i).and_then( |m| m.as_str().parse().ok()).unwrap_or(0)
}

fn cap_i32 (caps: &regex::Captures, i: usize)->i32 {
    caps.get(i).and_then( |m| m.as_str().parse().ok()).unwrap_or(0)
}

/// parse a date string, trying year-first, then month-first, then day-first patterns
pub fn parse_date (s: &str)->Result<NaiveDate> {
    let s = s.trim();

    for (re,order) in DATE_PATTERNS.iter() {
        if let Some(caps) = re.captures( s) {
            let (y,m,d) = match order {
                FieldOrder::Ymd => (cap_i32(&caps,1), cap_u32(&caps,2), cap_u32(&caps,3)),
                FieldOrder::Mdy => (cap_i32(&caps,3), cap_u32(&caps,1), cap_u32(&caps,2)),
                FieldOrder::Dmy => (cap_i32(&caps,3), cap_u32(&caps,2), cap_u32(&caps,1)),
            };
            return NaiveDate::from_ymd_opt( y, m, d).ok_or_else( || validation_error!("invalid date '{}'", s))
        }
    }

    for fmt in NATURAL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str( s, fmt) {
            // %Y also takes short year fields, these are left to the %y forms
            if fmt.contains("%Y") && date.year() < 1000 { continue }
            return Ok(date)
        }
    }

    Err( validation_error!("unrecognized date '{}'", s))
}

/// parse hour:minute[:second]. Values outside of a valid clock range are rejected
pub fn parse_time (s: &str)->Result<NaiveTime> {
    let (h,m,sec) = if let Some(caps) = HMS_RE.captures( s) {
        (cap_u32(&caps,1), cap_u32(&caps,2), cap_u32(&caps,3))
    } else if let Some(caps) = HM_RE.captures( s) {
        (cap_u32(&caps,1), cap_u32(&caps,2), 0)
    } else {
        return Err( validation_error!("unrecognized time '{}'", s))
    };

    NaiveTime::from_hms_opt( h, m, sec).ok_or_else( || validation_error!("invalid time '{}': {}:{}:{}", s, h, m, sec))
}

pub fn parse_datetime (date: &str, time: &str)->Result<NaiveDateTime> {
    let t = parse_time( time)?;
    let d = parse_date( date)?;
    Ok( NaiveDateTime::new( d, t))
}

/// combined timestamp column, e.g. "2019-06-01T03:00:00Z" or "06/01/2019 03:00"
pub fn parse_combined (s: &str)->Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339( s) {
        return Ok( dt.naive_utc())
    }

    // separators can be multibyte (U+3000, U+00A0)
    let (date,time) = match s.char_indices().find( |(_,c)| *c == 'T' || c.is_whitespace()) {
        Some((i,c)) if !s[..i].chars().any( |c| c.is_alphabetic()) => (&s[..i], s[i+c.len_utf8()..].trim()),
        _ => (s, "")
    };

    if time.is_empty() || !time.contains(':') {
        let d = parse_date( s).or_else( |_| parse_date( date))?;
        Ok( d.and_time( NaiveTime::MIN))
    } else {
        parse_datetime( date, time)
    }
}

/* #endregion date and time parsing */

/* #region table reading ***********************************************************************/

/// decode table bytes as UTF-8, falling back to Shift_JIS
pub fn decode_text (bytes: &[u8])->String {
    match std::str::from_utf8( bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (text, _, had_errors) = SHIFT_JIS.decode( bytes);
            if had_errors { warn!("input is neither valid UTF-8 nor Shift_JIS, replaced undecodable bytes") }
            text.into_owned()
        }
    }
}

/// pick the delimiter by counting candidates in the header line
pub fn sniff_delimiter (text: &str)->u8 {
    let header = text.lines().find( |l| !l.trim().is_empty()).unwrap_or("");
    [b',', b';', b'\t', b'|'].into_iter()
        .max_by_key( |d| header.matches( *d as char).count())
        .filter( |d| header.contains( *d as char))
        .unwrap_or(b',')
}

fn field<'a> (rec: &'a StringRecord, cols: &ColumnMap, col: Column)->&'a str {
    cols.get( col).and_then( |i| rec.get(i)).unwrap_or("").trim()
}

fn int_field (rec: &StringRecord, cols: &ColumnMap, col: Column)->Result<u32> {
    let s = field( rec, cols, col);
    let v: f64 = s.parse().map_err( |_| validation_error!("invalid {:?} value '{}'", col, s))?;
    if v < 0.0 || v.fract() != 0.0 { return Err( validation_error!("invalid {:?} value '{}'", col, s)) }
    Ok( v as u32)
}

/// empty coordinate fields become NaN, everything else has to be numeric
fn coord_field (rec: &StringRecord, cols: &ColumnMap, col: Column)->Result<f64> {
    let s = field( rec, cols, col);
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        Ok( f64::NAN)
    } else {
        s.parse().map_err( |_| validation_error!("{}", MISSING_GEO_FIELDS))
    }
}

fn record_timestamp (rec: &StringRecord, cols: &ColumnMap, grouping: TimeGrouping)->Result<NaiveDateTime> {
    use Column::*;

    let ymd = || -> Result<NaiveDate> {
        let (y,m,d) = (int_field(rec,cols,Year)?, int_field(rec,cols,Month)?, int_field(rec,cols,Day)?);
        NaiveDate::from_ymd_opt( y as i32, m, d).ok_or_else( || validation_error!("invalid date {}-{}-{}", y, m, d))
    };
    let hms = || -> Result<NaiveTime> {
        let h = int_field(rec,cols,Hour)?;
        let m = int_field(rec,cols,Minute)?;
        let s = if cols.has(&[Second]) { int_field(rec,cols,Second)? } else { 0 };
        NaiveTime::from_hms_opt( h, m, s).ok_or_else( || validation_error!("invalid time {}:{}:{}", h, m, s))
    };

    match grouping {
        TimeGrouping::Combined => parse_combined( field(rec,cols,Datetime)),
        TimeGrouping::DateTime => parse_datetime( field(rec,cols,Date), field(rec,cols,Time)),
        TimeGrouping::DateHms => Ok( NaiveDateTime::new( parse_date( field(rec,cols,Date))?, hms()?)),
        TimeGrouping::YmdTime => Ok( NaiveDateTime::new( ymd()?, parse_time( field(rec,cols,Time))?)),
        TimeGrouping::YmdHms => Ok( NaiveDateTime::new( ymd()?, hms()?)),
    }
}

/// parse table text into observation records
pub fn read_records (text: &str)->Result<Vec<ObservationRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter( sniff_delimiter( text))
        .flexible( true)
        .trim( Trim::All)
        .from_reader( text.as_bytes());

    let headers = rdr.headers()?.clone();
    let cols = ColumnMap::from_headers( &headers);
    debug!("input columns {:?} resolved to {:?}", headers, cols.fields);

    let grouping = cols.grouping()?;
    if !cols.has( &[Column::Lon, Column::Lat]) {
        return Err( validation_error!("{}", MISSING_GEO_FIELDS))
    }

    let mut records = Vec::new();
    for (index,rec) in rdr.records().enumerate() {
        let rec = rec?;
        if rec.iter().all( |f| f.trim().is_empty()) { continue }

        let timestamp = record_timestamp( &rec, &cols, grouping)?;
        let lon = coord_field( &rec, &cols, Column::Lon)?;
        let lat = coord_field( &rec, &cols, Column::Lat)?;
        records.push( ObservationRecord { index, lon, lat, timestamp });
    }

    Ok(records)
}

/// read and normalize an input table file
pub fn read_input_file (path: impl AsRef<Path>)->Result<Vec<ObservationRecord>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err( validation_error!("invalid --text-file specified. Does: {} exist?", path.display()))
    }
    let bytes = fs::read( path)?;
    read_records( &decode_text( &bytes))
}

/* #endregion table reading */
