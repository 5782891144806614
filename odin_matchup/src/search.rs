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

//! remote granule search. Catalog responses of all dialects are normalized into `GranuleRef` lists

use std::{collections::HashSet, error::Error as StdError, io};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, Response, StatusCode, header::{ACCEPT, HeaderValue}};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::params::MatchupConfig;
use crate::query::Query;
use crate::errors::{OdinMatchupError, Result};

/// which transfer route a granule has to take
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum CatalogSource {
    Earthdata, // https with Earthdata login
    GPortal,   // G-Portal ftp
}

#[derive(Debug,Clone,PartialEq,Eq)]
pub struct GranuleRef {
    pub id: String,
    pub url: String,
    pub source: CatalogSource,
}

impl GranuleRef {
    pub fn new (id: impl ToString, url: impl ToString, source: CatalogSource)->Self {
        GranuleRef { id: id.to_string(), url: url.to_string(), source }
    }

    /// granule reference for a listed file path or URL, using the last path element as id
    pub fn from_path (path: &str, source: CatalogSource)->Self {
        GranuleRef::new( file_name( path), path, source)
    }

    /// name of the downloaded file. Transfers store granules under the URL basename, which does not
    /// have to be the catalog id
    pub fn local_name (&self)->&str { file_name( &self.url) }

    /// near real time products are superseded by their refined versions and never fetched
    pub fn is_nrt (&self)->bool { self.local_name().contains("SST.NRT.nc") }
}

/// last element of a path or URL
pub fn file_name (path: &str)->&str {
    path.rsplit('/').next().unwrap_or( path)
}

/// executes a query and returns the found granules. An empty list is not an error
#[async_trait]
pub trait GranuleSearch: Send + Sync {
    async fn search (&self, query: &Query)->Result<Vec<GranuleRef>>;
}

/* #region response dialects *******************************************************************/

#[derive(Debug,Deserialize)]
pub struct CmrResponse {
    pub feed: CmrFeed,
}

#[derive(Debug,Deserialize)]
pub struct CmrFeed {
    #[serde(default)]
    pub entry: Vec<CmrEntry>,
}

#[derive(Debug,Deserialize)]
pub struct CmrEntry {
    pub producer_granule_id: String,
    #[serde(default)]
    pub links: Vec<CmrLink>,
}

#[derive(Debug,Deserialize)]
pub struct CmrLink {
    pub href: String,
}

pub fn cmr_granules (resp: CmrResponse)->Vec<GranuleRef> {
    resp.feed.entry.into_iter().filter_map( |e| {
        let href = e.links.into_iter().next()?.href;
        Some( GranuleRef::new( e.producer_granule_id, href, CatalogSource::Earthdata))
    }).collect()
}

lazy_static! {
    static ref LISTING_ID_RE: Regex = Regex::new( r"filenamelist&id=(\d+\.\d+)").unwrap();
    static ref SGLI_FILE_RE: Regex = Regex::new( r"standard/GCOM-C/GCOM-C.SGLI/L2.OCEAN.*/GC1SG1_.*Q_.*.h5").unwrap();
}

/// what the first browse response gave us
#[derive(Debug,PartialEq)]
pub enum BrowseListing {
    /// secondary listing id to resolve with another request
    ListingId(String),
    /// file names extracted from the response itself
    Files(Vec<String>),
    Nothing,
}

/// full mission/instrument name used in browse file names
pub fn browse_sensor_name (sensor: &str)->Option<&'static str> {
    match sensor {
        "amod" => Some("AQUA_MODIS"),
        "tmod" => Some("TERRA_MODIS"),
        "vrsn" => Some("SNPP_VIIRS"),
        _ => None
    }
}

pub fn parse_browse_response (text: &str, sensor: &str, product: &str)->Result<BrowseListing> {
    if let Some(caps) = LISTING_ID_RE.captures( text) {
        return Ok( BrowseListing::ListingId( caps[1].to_string()))
    }

    if let Some(name) = browse_sensor_name( sensor) {
        let re = Regex::new( &format!( r"file=(.*?{}.*L2.{}.nc)", name, product))?;
        let files: Vec<String> = re.captures_iter( text)
            .map( |c| c[1].to_string())
            .filter( |f| !f.contains('&'))
            .collect();
        if !files.is_empty() {
            return Ok( BrowseListing::Files(files))
        }
    }

    Ok( BrowseListing::Nothing)
}

/// URL of the secondary file name listing referenced by a browse response
pub fn listing_url (browse_url: &str, id: &str, product: &str)->String {
    format!("{}?sub=filenamelist&id={}&prm={}", browse_url, id, product)
}

/// file names of a secondary listing response. A missing listing means no files
pub fn listing_files (status: StatusCode, text: &str)->Vec<String> {
    if status == StatusCode::NOT_FOUND { return Vec::new() }
    text.lines().map( |l| l.trim()).filter( |l| !l.is_empty()).map( String::from).collect()
}

/// join browse file names with the getfile base URL, dropping duplicates
pub fn browse_granules (getfile_url: &str, files: &[String])->Vec<GranuleRef> {
    let base = getfile_url.trim_end_matches('/');
    let granules = files.iter()
        .map( |f| GranuleRef::from_path( &format!("{}/{}", base, f), CatalogSource::Earthdata))
        .collect();
    dedup_granules( granules)
}

/// extract SGLI granule paths from a CSW GetRecords JSON response
pub fn csw_granules (content: &Value, name_filter: Option<&str>)->Vec<GranuleRef> {
    let n_records = content.pointer("/properties/numberOfRecordsReturned").and_then( |v| v.as_u64()).unwrap_or(0);
    if n_records == 0 { return Vec::new() }

    let names: Vec<&str> = content.get("features").and_then( |f| f.as_array())
        .map( |features| features.iter()
            .filter_map( |f| f.pointer("/properties/product/fileName").and_then( |n| n.as_str()))
            .collect())
        .unwrap_or_default();

    let joined = names.join("\n");
    SGLI_FILE_RE.find_iter( &joined)
        .map( |m| m.as_str())
        .filter( |path| name_filter.map( |flt| file_name( path).contains(flt)).unwrap_or(true))
        .map( |path| GranuleRef::from_path( path, CatalogSource::GPortal))
        .collect()
}

/// remove duplicates, keeping the first occurrence
pub fn dedup_granules (granules: Vec<GranuleRef>)->Vec<GranuleRef> {
    let mut seen = HashSet::new();
    granules.into_iter().filter( |g| seen.insert( g.url.clone())).collect()
}

/* #endregion response dialects */

/// true if the error chain contains a connection reset
pub fn is_connection_reset (err: &(dyn StdError + 'static))->bool {
    let mut e: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cur) = e {
        if let Some(ioe) = cur.downcast_ref::<io::Error>() {
            if ioe.kind() == io::ErrorKind::ConnectionReset { return true }
        }
        e = cur.source();
    }
    false
}

fn map_request_error (err: reqwest::Error)->OdinMatchupError {
    if is_connection_reset( &err) {
        OdinMatchupError::ConnectionResetError( err.to_string())
    } else {
        OdinMatchupError::HttpError( err)
    }
}

/// the production `GranuleSearch` that talks to the remote catalogs
pub struct CatalogClient {
    client: Client,
    config: MatchupConfig,
}

impl CatalogClient {
    pub fn new (config: MatchupConfig)->Result<Self> {
        let client = Client::builder()
            .timeout( config.request_timeout)
            .build()?;
        Ok( CatalogClient { client, config } )
    }

    async fn get (&self, url: &str)->Result<Response> {
        debug!("GET {}", url);
        self.client.get( url)
            .header( ACCEPT, HeaderValue::from_static("application/json, text/html, text/plain"))
            .send()
            .await
            .map_err( map_request_error)
    }

    async fn search_cmr (&self, url: &str)->Result<Vec<GranuleRef>> {
        let response = self.get( url).await?;
        match response.status() {
            StatusCode::OK => {
                let resp: CmrResponse = response.json().await.map_err( map_request_error)?;
                Ok( cmr_granules( resp))
            }
            other => {
                warn!("CMR search returned status {other:?}");
                Ok( Vec::new())
            }
        }
    }

    async fn search_browser (&self, url: &str, sensor: &str, product: &str)->Result<Vec<GranuleRef>> {
        let response = self.get( url).await?;
        let text = response.text().await.map_err( map_request_error)?;

        let files = match parse_browse_response( &text, sensor, product)? {
            BrowseListing::ListingId(id) => {
                let response = self.get( &listing_url( &self.config.browse_url, &id, product)).await?;
                let status = response.status();
                let text = response.text().await.map_err( map_request_error)?;
                listing_files( status, &text)
            }
            BrowseListing::Files(files) => files,
            BrowseListing::Nothing => {
                info!("no files found for browse query {}", url);
                Vec::new()
            }
        };

        Ok( browse_granules( &self.config.getfile_url, &files))
    }

    async fn search_csw (&self, url: &str, name_filter: Option<&str>)->Result<Vec<GranuleRef>> {
        let response = self.get( url).await?;
        if response.status() != StatusCode::OK {
            warn!("CSW search returned status {:?}", response.status());
            return Ok( Vec::new())
        }
        let content: Value = response.json().await.map_err( map_request_error)?;
        Ok( csw_granules( &content, name_filter))
    }
}

#[async_trait]
impl GranuleSearch for CatalogClient {
    async fn search (&self, query: &Query)->Result<Vec<GranuleRef>> {
        let url = query.to_url( &self.config);
        match query {
            Query::Cmr{..} => self.search_cmr( &url).await,
            Query::OceanBrowser { sensor, product, .. } => self.search_browser( &url, sensor, product).await,
            Query::Csw { name_filter, .. } => self.search_csw( &url, name_filter.as_deref()).await,
        }
    }
}
