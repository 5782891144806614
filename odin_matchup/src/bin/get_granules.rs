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
    load_config, read_input_file, CatalogClient, DataType, DayBatchOrchestrator, GdalExtractor,
    MatchupConfig, MatchupParams, Satellite, SatelliteRegistry, SstFlag, WgetTransfer,
};

/// pre-fetch validated granules for all observations of an input table without matching them
#[derive(Parser, Debug)]
#[command(version, about, long_about = "download and validate satellite granules for in-situ observations")]
pub struct Args {
    #[arg(long, value_enum)]
    pub sat: Satellite,

    #[arg(long, default_value = "*", value_parser = parse_data_type)]
    pub data_type: DataType,

    #[arg(long)]
    pub text_file: PathBuf,

    #[arg(long, default_value_t = 3.0)]
    pub max_time_diff: f64,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = "n", value_parser = parse_sst_flag)]
    pub sst_flag: SstFlag,

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

    let orchestrator = DayBatchOrchestrator::new(
        registry, params, &config,
        Arc::new( CatalogClient::new( config.clone())?),
        Arc::new( WgetTransfer::new( config.clone())?),
        Arc::new( GdalExtractor),
    )?;

    let files = orchestrator.fetch_granules( &records).await?;
    for f in &files {
        println!("{}", f.display());
    }

    Ok(())
}
