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

//! the static per-satellite table: instrument/platform names, catalog short-name patterns and
//! the operational lifespan of each mission

use std::{collections::HashMap, fmt, str::FromStr};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::sanity::GranuleFormat;
use crate::errors::{OdinMatchupError, Result, validation_error};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Satellite {
    Czcs,
    Goci,
    Meris,
    Modisa,
    Modist,
    Octs,
    Seawifs,
    Sgli,
    Viirsn,
    Viirsj,
}

impl Satellite {
    pub fn key (&self)->&'static str {
        match self {
            Satellite::Czcs => "czcs",
            Satellite::Goci => "goci",
            Satellite::Meris => "meris",
            Satellite::Modisa => "modisa",
            Satellite::Modist => "modist",
            Satellite::Octs => "octs",
            Satellite::Seawifs => "seawifs",
            Satellite::Sgli => "sgli",
            Satellite::Viirsn => "viirsn",
            Satellite::Viirsj => "viirsj",
        }
    }
}

impl fmt::Display for Satellite {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "{}", self.key())
    }
}

/// product selector. `All` is the catalog wildcard `*`
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum DataType { All, Oc, Iop, Rrs, Sst }

impl DataType {
    /// the token used in catalog short names
    pub fn code (&self)->&'static str {
        match self {
            DataType::All => "*",
            DataType::Oc => "OC",
            DataType::Iop => "IOP",
            DataType::Rrs => "RRS",
            DataType::Sst => "SST",
        }
    }

    pub fn is_sst (&self)->bool { *self == DataType::Sst }
}

impl FromStr for DataType {
    type Err = OdinMatchupError;

    fn from_str (s: &str)->Result<Self> {
        match s.to_lowercase().as_str() {
            "*" | "all" => Ok(DataType::All),
            "oc" => Ok(DataType::Oc),
            "iop" => Ok(DataType::Iop),
            "rrs" => Ok(DataType::Rrs),
            "sst" => Ok(DataType::Sst),
            other => Err( validation_error!("unknown data type '{}', expected one of *, oc, iop, rrs, sst", other))
        }
    }
}

impl fmt::Display for DataType {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "{}", self.code())
    }
}

/// day/night selector for SST products. `Sst3` and `Sst4` select the product variants instead
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum SstFlag { Night, Day, Sst3, Sst4 }

impl SstFlag {
    /// product token as used in catalog parameters and file names
    pub fn product (&self)->&'static str {
        match self {
            SstFlag::Sst3 => "SST3",
            SstFlag::Sst4 => "SST4",
            _ => "SST",
        }
    }

    /// the `N`|`D` day/night marker, if this is a day/night flag
    pub fn day_night (&self)->Option<char> {
        match self {
            SstFlag::Night => Some('N'),
            SstFlag::Day => Some('D'),
            _ => None
        }
    }
}

impl FromStr for SstFlag {
    type Err = OdinMatchupError;

    fn from_str (s: &str)->Result<Self> {
        match s.to_lowercase().as_str() {
            "n" | "night" => Ok(SstFlag::Night),
            "d" | "day" => Ok(SstFlag::Day),
            "3" => Ok(SstFlag::Sst3),
            "4" => Ok(SstFlag::Sst4),
            other => Err( validation_error!("unknown SST flag '{}', expected one of n, d, 3, 4", other))
        }
    }
}

/// which remote catalog indexes the granules of a mission
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Catalog {
    /// NASA CMR granule search (with OceanColor browse listings for SST)
    Cmr,
    /// JAXA G-Portal CSW dataset catalog
    GPortal,
}

#[derive(Debug,Clone)]
pub struct SatelliteDescriptor {
    pub satellite: Satellite,
    pub instrument: &'static str,
    pub platform: &'static str,
    /// short-name search prefix
    pub search: &'static str,
    /// OceanColor browse sensor code (only missions with SST browse listings have one)
    pub sensor: Option<&'static str>,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>, // None if still operating
    pub catalog: Catalog,
    pub format: GranuleFormat,
    pub has_sst: bool,
    pub has_iop: bool,
}

impl SatelliteDescriptor {
    /// lifespan as ordinal day numbers (days since 0001-01-01 as day 1). Open ends resolve to `today`
    pub fn lifespan (&self, today: NaiveDate)->(i32,i32) {
        let end = self.end.unwrap_or( today);
        (self.start.num_days_from_ce(), end.num_days_from_ce())
    }

    /// true if `day` (ordinal) is strictly outside of the mission lifespan
    pub fn is_outside (&self, day: i32, today: NaiveDate)->bool {
        let (start,end) = self.lifespan( today);
        day < start || day > end
    }

    /// does this mission use a bounding box instead of a point for all queries
    pub fn box_only (&self)->bool {
        self.catalog == Catalog::GPortal
    }
}

fn ymd (y: i32, m: u32, d: u32)->NaiveDate {
    // all table dates are literals
    NaiveDate::from_ymd_opt( y, m, d).unwrap_or_default()
}

/// immutable satellite lookup table, passed explicitly to the components that need it
#[derive(Debug,Clone)]
pub struct SatelliteRegistry {
    descriptors: HashMap<Satellite,SatelliteDescriptor>,
}

impl SatelliteRegistry {
    pub fn standard ()->Self {
        use Satellite::*;
        use GranuleFormat::*;

        let table = [
            (Czcs,    "CZCS",    "Nimbus-7",   "CZCS_L2_",         None,         ymd(1978,10,30), Some(ymd(1986,6,22)), Catalog::Cmr,     NetCdf4, false),
            (Goci,    "GOCI",    "COMS",       "GOCI_L2_",         None,         ymd(2011,4,1),   Some(ymd(2021,4,1)),  Catalog::Cmr,     NetCdf4, false),
            (Meris,   "MERIS",   "ENVISAT",    "MERIS_L2_",        Some("merr"), ymd(2002,4,29),  Some(ymd(2012,4,8)),  Catalog::Cmr,     Hdf4Sds, true),
            (Modisa,  "MODIS",   "AQUA",       "MODISA_L2_",       Some("amod"), ymd(2002,7,4),   None,                 Catalog::Cmr,     NetCdf4, true),
            (Modist,  "MODIS",   "TERRA",      "MODIST_L2_",       Some("tmod"), ymd(2000,2,24),  None,                 Catalog::Cmr,     NetCdf4, true),
            (Octs,    "OCTS",    "ADEOS-I",    "OCTS_L2_",         None,         ymd(1996,10,31), Some(ymd(1997,6,29)), Catalog::Cmr,     NetCdf4, false),
            (Seawifs, "SeaWiFS", "OrbView-2",  "SeaWiFS_L2_",      None,         ymd(1997,9,4),   Some(ymd(2010,12,11)),Catalog::Cmr,     NetCdf4, false),
            (Sgli,    "SGLI",    "GCOM-C",     "GC1SG1_*_L2SG_*_", None,         ymd(2018,1,1),   None,                 Catalog::GPortal, Hdf5Grid, true),
            (Viirsn,  "VIIRS",   "NPP",        "VIIRSN_L2_",       Some("vrsn"), ymd(2012,1,2),   None,                 Catalog::Cmr,     NetCdf4, true),
            (Viirsj,  "VIIRS",   "JPSS1",      "VIIRSJ1_L2_",      None,         ymd(2017,11,29), None,                 Catalog::Cmr,     NetCdf4, true),
        ];

        let descriptors = table.into_iter().map( |(satellite,instrument,platform,search,sensor,start,end,catalog,format,has_sst)| {
            let d = SatelliteDescriptor {
                satellite, instrument, platform, search, sensor, start, end, catalog, format, has_sst,
                has_iop: catalog != Catalog::GPortal,
            };
            (satellite, d)
        }).collect();

        SatelliteRegistry { descriptors }
    }

    pub fn get (&self, sat: Satellite)->Result<&SatelliteDescriptor> {
        self.descriptors.get( &sat).ok_or_else( || validation_error!("no descriptor for satellite {}", sat))
    }

    /// true iff `day` (ordinal) lies strictly outside of the lifespan of `sat`
    pub fn skip (&self, sat: Satellite, day: i32)->bool {
        self.skip_on( sat, day, Utc::now().date_naive())
    }

    pub fn skip_on (&self, sat: Satellite, day: i32, today: NaiveDate)->bool {
        match self.descriptors.get( &sat) {
            Some(d) => d.is_outside( day, today),
            None => true
        }
    }

    /// reject data type / satellite combinations for which no product exists
    pub fn check_product (&self, sat: Satellite, data_type: DataType)->Result<()> {
        let d = self.get( sat)?;
        match data_type {
            DataType::Iop if !d.has_iop => Err( validation_error!("IOP not defined for {}", d.instrument)),
            DataType::Sst if !d.has_sst => Err( validation_error!("SST not defined for {}", d.instrument)),
            _ => Ok(())
        }
    }
}

impl Default for SatelliteRegistry {
    fn default ()->Self { Self::standard() }
}
