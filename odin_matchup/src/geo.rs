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

use serde::{Deserialize, Serialize};
use crate::input::ObservationRecord;
use crate::errors::{Result, validation_error};

pub fn validate_lat (lat: f64)->Result<f64> {
    if lat.abs() > 90.0 {
        Err( validation_error!("invalid latitude: all LAT values MUST be between -90/90N deg. Received: {}", lat))
    } else {
        Ok(lat)
    }
}

pub fn validate_lon (lon: f64)->Result<f64> {
    if lon.abs() > 180.0 {
        Err( validation_error!("invalid longitude: all LON values MUST be between -180/180E deg. Received: {}", lon))
    } else {
        Ok(lon)
    }
}

/// check all records before anything is queried. The first out-of-range coordinate aborts.
/// Missing (NaN) coordinates pass here and are skipped per row later on
pub fn check_geo (records: &[ObservationRecord])->Result<()> {
    for r in records {
        validate_lat( r.lat)?;
        validate_lon( r.lon)?;
    }
    Ok(())
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBox {
    pub fn around (lon: f64, lat: f64, half_width: f64)->Self {
        GeoBox {
            west: lon - half_width,
            south: lat - half_width,
            east: lon + half_width,
            north: lat + half_width,
        }
    }
}
