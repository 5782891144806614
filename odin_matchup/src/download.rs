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

//! granule retrieval. Transfers are delegated to an external tool behind the `TransferPort` trait,
//! the control list makes repeated runs skip granules that were already validated

use std::{path::{Path,PathBuf}, process::ExitStatus, sync::Arc};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};
use which::which;

use crate::control_list::ControlList;
use crate::netrc::{Credentials, get_auth};
use crate::params::MatchupConfig;
use crate::search::{CatalogSource, GranuleRef};
use crate::errors::{OdinMatchupError, Result};

/// result of a single transfer. A failed transfer is not an error, the following
/// sanity check decides what is usable
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum TransferOutcome {
    Completed,
    Failed(String),
}

/// remote granule -> local file in `dir`
#[async_trait]
pub trait TransferPort: Send + Sync {
    async fn transfer (&self, granule: &GranuleRef, dir: &Path)->Result<TransferOutcome>;
}

/* #region wget transfer ***********************************************************************/

pub struct WgetTransfer {
    cmd: PathBuf,
    config: MatchupConfig,
}

impl WgetTransfer {
    pub fn new (config: MatchupConfig)->Result<Self> {
        let cmd = which( &config.transfer_cmd)
            .map_err( |e| OdinMatchupError::TransferError( format!("unable to locate transfer command {}: {}", config.transfer_cmd, e)))?;
        Ok( WgetTransfer { cmd, config })
    }

    fn host_for (&self, source: CatalogSource)->&str {
        match source {
            CatalogSource::Earthdata => &self.config.earthdata_host,
            CatalogSource::GPortal => &self.config.gportal_host,
        }
    }
}

/// command line arguments for retrieving `granule` into `dir`
pub fn wget_args (granule: &GranuleRef, dir: &Path, creds: &Credentials, config: &MatchupConfig)->Vec<String> {
    let mut args: Vec<String> = vec![ "-nc".into() ];
    let tries = format!("--tries={}", config.transfer_tries);
    let prefix = format!("--directory-prefix={}", dir.display());

    match granule.source {
        CatalogSource::Earthdata => {
            let cookies = config.cookie_path();
            args.extend([
                "--auth-no-challenge=on".to_string(),
                "--keep-session-cookies".to_string(),
                "--load-cookies".to_string(), cookies.display().to_string(),
                "--save-cookies".to_string(), cookies.display().to_string(),
                "--content-disposition".to_string(),
                tries,
            ]);
            // wget reads ~/.netrc itself, only the Windows build needs explicit credentials
            if cfg!(windows) {
                args.push( format!("--user={}", creds.login));
                args.push( format!("--password={}", creds.password));
            }
            args.push( granule.url.clone());
            args.push( prefix);
        }
        CatalogSource::GPortal => {
            let path = granule.url.trim_start_matches('/');
            args.extend([
                "--preserve-permissions".to_string(),
                "--remove-listing".to_string(),
                tries,
                format!("ftp://{}:{}@{}/{}", creds.login, creds.password, config.gportal_host, path),
                prefix,
            ]);
        }
    }
    args
}

fn exit_outcome (status: ExitStatus)->TransferOutcome {
    if status.success() {
        TransferOutcome::Completed
    } else {
        TransferOutcome::Failed( format!("exit status: {}", status))
    }
}

#[async_trait]
impl TransferPort for WgetTransfer {
    async fn transfer (&self, granule: &GranuleRef, dir: &Path)->Result<TransferOutcome> {
        let creds = get_auth( self.host_for( granule.source))?;
        let args = wget_args( granule, dir, &creds, &self.config);

        let mut cmd = Command::new( &self.cmd);
        cmd.args( &args);

        match cmd.status().await {
            Ok(status) => Ok( exit_outcome( status)),
            Err(e) => Err( OdinMatchupError::TransferError( format!("failed to run {}: {}", self.cmd.display(), e)))
        }
    }
}

/* #endregion wget transfer */

/// control-list aware granule downloads into one output directory
#[derive(Clone)]
pub struct Downloader {
    port: Arc<dyn TransferPort>,
    control: ControlList,
    dir: PathBuf,
}

impl Downloader {
    pub fn new (port: Arc<dyn TransferPort>, control: ControlList, dir: impl AsRef<Path>)->Self {
        Downloader { port, control, dir: dir.as_ref().to_path_buf() }
    }

    pub fn local_path (&self, granule: &GranuleRef)->PathBuf {
        self.dir.join( granule.local_name())
    }

    /// fetch one granule. Granules already in the control list are not transferred again.
    /// Returns None for granules that are never downloaded
    pub async fn fetch (&self, granule: &GranuleRef)->Result<Option<PathBuf>> {
        if granule.is_nrt() {
            info!("skipping near real time granule {} ({})", granule.id, granule.url);
            return Ok(None)
        }

        let local = self.local_path( granule);
        if self.control.contains( granule.local_name())? {
            debug!("{} already downloaded", local.display());
            return Ok( Some(local))
        }

        match self.port.transfer( granule, &self.dir).await? {
            TransferOutcome::Completed => info!("downloaded {}", local.display()),
            TransferOutcome::Failed(reason) => warn!("transfer of {} failed: {}", granule.url, reason),
        }
        Ok( Some(local))
    }

    /// sequentially fetch all granules, returning unique local paths in order
    pub async fn fetch_all (&self, granules: &[GranuleRef])->Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = Vec::with_capacity( granules.len());
        for g in granules {
            if let Some(path) = self.fetch( g).await? {
                if !files.contains( &path) { files.push( path) }
            }
        }
        Ok(files)
    }
}
