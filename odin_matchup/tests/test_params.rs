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

use chrono::{NaiveDate, NaiveDateTime};
use odin_matchup::params::*;
use odin_matchup::satellites::{DataType, Satellite, SatelliteRegistry, SstFlag};

// run with "cargo test --test test_params -- --nocapture"

fn ts (h: u32, m: u32)->NaiveDateTime {
    NaiveDate::from_ymd_opt(2019,6,1).unwrap().and_hms_opt(h,m,0).unwrap()
}

#[test]
fn test_time_window() {
    let w = TimeWindow::around( ts(3,0), 1.5);
    assert_eq!( w.start, ts(1,30));
    assert_eq!( w.end, ts(4,30));

    let w = TimeWindow::around( ts(3,0), 0.0);
    assert_eq!( w.start, w.end);
}

#[test]
fn test_params_validation() {
    let reg = SatelliteRegistry::standard();
    assert!( MatchupParams::new( &reg, Satellite::Modisa, DataType::Oc, SstFlag::Night, 37.0, ".").is_err());
    assert!( MatchupParams::new( &reg, Satellite::Modisa, DataType::Oc, SstFlag::Night, -1.0, ".").is_err());
    assert!( MatchupParams::new( &reg, Satellite::Sgli, DataType::Iop, SstFlag::Night, 3.0, ".").is_err());

    let p = MatchupParams::new( &reg, Satellite::Modisa, DataType::Oc, SstFlag::Day, 3.0, ".").unwrap();
    assert_eq!( p.sst_flag, None);
    let p = MatchupParams::new( &reg, Satellite::Modisa, DataType::Sst, SstFlag::Day, 36.0, ".").unwrap();
    assert_eq!( p.sst_flag, Some(SstFlag::Day));
}

#[test]
fn test_default_config_parses() {
    let cfg: MatchupConfig = ron::de::from_str( include_str!("../configs/matchup.ron")).unwrap();
    assert_eq!( cfg.provider, "OB_DAAC");
    assert_eq!( cfg.transfer_tries, 5);
    assert_eq!( cfg.control_file, MatchupConfig::default().control_file);
}
