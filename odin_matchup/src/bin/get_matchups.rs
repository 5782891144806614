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

use std::{path::PathBuf, sync::Arc};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odin_matchup::{
    load_config, read_input_file, CandidateWriter, CatalogClient, DataType, DayBatchOrchestrator, GdalExtractor,
    MatchupConfig, MatchupOutcome, MatchupParams, Satellite, SatelliteRegistry, SstFlag, WgetTransfer,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "find, download and validate satellite granules for in-situ observations and write matchups")]
pub struct Args {
    /// satellite/instrument
    #[arg(long, value_enum)]
    pub sat: Satellite,

    /// product type: *, oc, iop, rrs or sst
    #[arg(long, default_value = "*", value_parser = parse_data_type)]
    pub data_type: DataType,

    /// input table with date/time, lat and lon columns
    #[arg(long)]
    pub text_file: PathBuf,

    /// max time difference between observation and satellite overpass in hours (0-36)
    #[arg(long, default_value_t = 3.0)]
    pub max_time_diff: f64,

    /// directory for downloaded granules, control list and output
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// SST day/night flag: n, d, 3 or 4
    #[arg(long, default_value = "n", value_parser = parse_sst_flag)]
    pub sst_flag: SstFlag,

    /// name of the matchup CSV file (in output_dir)
    #[arg(long)]
    pub output_file: Option<String>,

    /// RON config file overriding the default endpoints
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_data_type (s: &str)->std::result::Result<DataType,String> { s.parse().map_err( |e: odin_matchup::errors::OdinMatchupError| e.to_string()) }
fn parse_sst_flag (s: &str)->std::result::Result<SstFlag,String> { s.parse().map_err( |e: odin_matchup::errors::OdinMatchupError| e.to_string()) }

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config: MatchupConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => odin_matchup::default_config()?
    };
    let registry = SatelliteRegistry::standard();
    let params = MatchupParams::new( &registry, args.sat, args.data_type, args.sst_flag, args.max_time_diff, &args.output_dir)?;

    let records = read_input_file( &args.text_file)?;

    let output_file = args.output_file.clone().unwrap_or_else( || {
        let stem = args.text_file.file_stem().and_then( |s| s.to_str()).unwrap_or("input");
        let dt = if args.data_type == DataType::All { "all".to_string() } else { args.data_type.code().to_lowercase() };
        format!("{}_{}_{}_matchups.csv", stem, args.sat, dt)
    });
    let mut stage = CandidateWriter::new( args.output_dir.join( output_file));

    let orchestrator = DayBatchOrchestrator::new(
        registry, params, &config,
        Arc::new( CatalogClient::new( config.clone())?),
        Arc::new( WgetTransfer::new( config.clone())?),
        Arc::new( GdalExtractor),
    )?;

    let input_name = args.text_file.display().to_string();
    match orchestrator.run( &records, &input_name, &mut stage).await? {
        MatchupOutcome::Saved { path, count } => println!("{} match-ups saved to {:?}", count, path),
        MatchupOutcome::NoMatchups(msg) => println!("{}", msg),
    }

    Ok(())
}
