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

//! catalog query construction. One `Query` is built per observation and turned into a request URL
//! for one of three dialects: CMR granule search, the OceanColor level-2 browser (SST) and the
//! G-Portal CSW dataset catalog

use chrono::{NaiveDate, NaiveDateTime};

use crate::geo::GeoBox;
use crate::input::ObservationRecord;
use crate::params::{MatchupConfig, MatchupParams, TimeWindow};
use crate::satellites::{Catalog, DataType, SatelliteDescriptor, SstFlag};
use crate::errors::{Result, op_failed, validation_error};

const CSW_TIME_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum Spatial {
    Point { lon: f64, lat: f64 },
    Box(GeoBox),
}

#[derive(Debug,Clone,PartialEq)]
pub enum Query {
    Cmr {
        short_name: String,
        window: TimeWindow,
        spatial: Spatial,
        instrument: &'static str,
        platform: &'static str,
    },
    OceanBrowser {
        sensor: &'static str,
        day: i64, // days since 1970-01-01
        area: GeoBox,
        day_night: Option<char>,
        product: &'static str, // SST, SST3 or SST4
    },
    Csw {
        dataset_ids: &'static str,
        area: GeoBox,
        window: TimeWindow,
        name_filter: Option<String>,
    },
}

fn iso (dt: &NaiveDateTime)->String { dt.format( CSW_TIME_FMT).to_string() }

fn days_since_epoch (dt: &NaiveDateTime)->i64 {
    let epoch = NaiveDate::from_ymd_opt(1970,1,1).unwrap_or_default().and_time( chrono::NaiveTime::MIN);
    (*dt - epoch).num_seconds().div_euclid( 86400)
}

impl Query {
    pub fn to_url (&self, config: &MatchupConfig)->String {
        match self {
            Query::Cmr { short_name, window, spatial: Spatial::Point{lon,lat}, .. } => {
                format!("{}?page_size={}&sort_key=short_name&sort_key=start_date&provider={}&short_name={}&temporal={},{}&point={},{}&options[short_name][pattern]=true",
                    config.cmr_url, config.page_size, config.provider, short_name, iso(&window.start), iso(&window.end), lon, lat)
            }
            Query::Cmr { short_name, window, spatial: Spatial::Box(b), instrument, platform } => {
                format!("{}?page_size={}&provider={}&bounding_box={},{},{},{}&instrument={}&platform={}&short_name={}&temporal={},{}&sort_key=short_name&options[short_name][pattern]=true",
                    config.cmr_url, config.page_size, config.provider, b.west, b.south, b.east, b.north, instrument, platform, short_name,
                    iso(&window.start), iso(&window.end))
            }
            Query::OceanBrowser { sensor, day, area, day_night, product } => {
                let dnm = match day_night {
                    Some(c) => format!("&dnm={}", c),
                    None => String::new()
                };
                format!("{}?sub=level1or2list&sen={}&per=DAY&day={}&n={}&s={}&w={}&e={}{}&prm={}",
                    config.browse_url, sensor, day, area.north, area.south, area.west, area.east, dnm, product)
            }
            Query::Csw { dataset_ids, area, window, .. } => {
                format!("{}?service=CSW&version=3.0.0&request=GetRecords&outputFormat=application/json&pslv=L2&count={}&sen=SGLI&sat=GCOM-C&bbox={},{},{},{}&datasetId={}&startTime={}&endTime={}",
                    config.csw_url, config.page_size, area.west, area.south, area.east, area.north, dataset_ids, iso(&window.start), iso(&window.end))
            }
        }
    }
}

/// G-Portal dataset ids per data type. IOP products do not exist for SGLI
pub fn csw_dataset_ids (data_type: DataType)->Result<&'static str> {
    match data_type {
        DataType::All => Ok("10002000,10002001,10002002"),
        DataType::Rrs => Ok("10002000"),
        DataType::Oc => Ok("10002001"),
        DataType::Sst => Ok("10002002"),
        DataType::Iop => Err( validation_error!("IOP not defined for SGLI")),
    }
}

/// builds per-observation queries for one satellite and product
#[derive(Debug,Clone)]
pub struct QueryBuilder {
    desc: SatelliteDescriptor,
    data_type: DataType,
    sst_flag: Option<SstFlag>,
    box_half_width: f64,
    short_name: String,
    dataset_ids: Option<&'static str>,
}

impl QueryBuilder {
    pub fn new (desc: &SatelliteDescriptor, params: &MatchupParams, config: &MatchupConfig)->Result<Self> {
        let data_type = params.data_type;
        let dataset_ids = match desc.catalog {
            Catalog::GPortal => Some( csw_dataset_ids( data_type)?),
            Catalog::Cmr => None
        };

        Ok( QueryBuilder {
            desc: desc.clone(),
            data_type,
            sst_flag: params.sst_flag,
            box_half_width: config.box_half_width,
            short_name: short_name( desc, data_type, params.sst_flag),
            dataset_ids,
        })
    }

    pub fn short_name (&self)->&str { &self.short_name }

    /// SST granules of missions with a browse sensor code are not found through the CMR granule search
    fn uses_browser (&self)->bool {
        self.data_type.is_sst() && self.desc.sensor.is_some() && !matches!( self.desc.platform, "JPSS1" | "ENVISAT")
    }

    /// box queries for SST and box-only missions, point queries otherwise. Non box-only SST
    /// searches do not look back before the observation
    pub fn for_observation (&self, rec: &ObservationRecord, window: TimeWindow)->Result<Query> {
        let use_box = self.data_type.is_sst() || self.desc.box_only();
        let spatial = if use_box {
            Spatial::Box( GeoBox::around( rec.lon, rec.lat, self.box_half_width))
        } else {
            Spatial::Point { lon: rec.lon, lat: rec.lat }
        };
        let window = if self.data_type.is_sst() && !self.desc.box_only() { window.with_start( rec.timestamp) } else { window };

        self.build( spatial, window)
    }

    pub fn build (&self, spatial: Spatial, window: TimeWindow)->Result<Query> {
        if let Some(dataset_ids) = self.dataset_ids {
            let area = match spatial {
                Spatial::Box(b) => b,
                Spatial::Point{lon,lat} => GeoBox::around( lon, lat, self.box_half_width)
            };
            let name_filter = self.sst_flag.and_then( |f| f.day_night()).map( |c| format!("SST{}", c));
            return Ok( Query::Csw { dataset_ids, area, window, name_filter })
        }

        if self.uses_browser() {
            let sensor = self.desc.sensor.ok_or_else( || op_failed!("no browse sensor code for {}", self.desc.satellite))?;
            let area = match spatial {
                Spatial::Box(b) => b,
                Spatial::Point{lon,lat} => GeoBox::around( lon, lat, self.box_half_width)
            };
            let flag = self.sst_flag.unwrap_or( SstFlag::Night);
            return Ok( Query::OceanBrowser {
                sensor,
                day: days_since_epoch( &window.start),
                area,
                day_night: flag.day_night(),
                product: flag.product(),
            })
        }

        Ok( Query::Cmr {
            short_name: self.short_name.clone(),
            window,
            spatial,
            instrument: self.desc.instrument,
            platform: self.desc.platform,
        })
    }
}

/// CMR short-name pattern. SST products are named after platform and instrument
pub fn short_name (desc: &SatelliteDescriptor, data_type: DataType, sst_flag: Option<SstFlag>)->String {
    if data_type.is_sst() {
        let platform = if desc.platform == "NPP" { "SNPP" } else { desc.platform };
        let product = sst_flag.map( |f| f.product()).unwrap_or("SST");
        format!("{}_{}*.L2.{}.nc", platform, desc.instrument, product)
    } else {
        format!("{}{}", desc.search, data_type.code())
    }
}
