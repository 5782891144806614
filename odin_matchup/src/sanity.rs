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

//! post-download triage. Every fresh granule is opened once and its representative product variable
//! is extracted. Files that fail to open, lack the variable or have no valid pixels are removed

use std::{fs, io, path::{Path,PathBuf}, sync::Arc};
use gdal::{Dataset, Metadata, raster::Buffer};
use tracing::{error, info, warn};

use crate::control_list::ControlList;
use crate::errors::{Result, op_failed};

/// the three on-disk format families of level-2 granules
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum GranuleFormat {
    /// netCDF-4 with a `geophysical_data` group
    NetCdf4,
    /// HDF4 scientific data set with a `bad_value_scaled` fill attribute
    Hdf4Sds,
    /// HDF5 `Image_data` grids with an `Error_DN` fill attribute
    Hdf5Grid,
}

impl GranuleFormat {
    /// the variable that represents the product of the granule. None selects the first
    /// variable of the group (IOP products)
    pub fn variable (&self, basename: &str)->Option<&'static str> {
        match self {
            GranuleFormat::NetCdf4 => {
                if basename.contains("IOP") { None }
                else if basename.contains("OC") { Some("chlor_a") }
                else if basename.contains("SST4") { Some("sst4") }
                else { Some("sst") }
            }
            GranuleFormat::Hdf4Sds => Some("chlor_a"),
            GranuleFormat::Hdf5Grid => {
                if basename.contains("SST") { Some("SST") }
                else if basename.contains("NWLR") { Some("NWLR_412") }
                else { Some("CHLA") }
            }
        }
    }
}

/// extracted values with their validity. `mask[i]` is true for invalid values
#[derive(Debug,Clone,PartialEq)]
pub struct MaskedArray {
    pub values: Vec<f64>,
    pub mask: Vec<bool>,
}

impl MaskedArray {
    /// mask NaNs and everything equal to `fill`
    pub fn with_fill (values: Vec<f64>, fill: Option<f64>)->Self {
        let mask = values.iter().map( |v| v.is_nan() || fill.map( |f| *v == f).unwrap_or(false)).collect();
        MaskedArray { values, mask }
    }

    pub fn len (&self)->usize { self.values.len() }

    pub fn n_valid (&self)->usize { self.mask.iter().filter( |m| !**m).count() }
}

/// reads the representative variable of a granule
pub trait VariableExtractor: Send + Sync {
    /// Ok(None) if the file does not contain the variable, Err if the file cannot be read
    fn extract (&self, format: GranuleFormat, path: &Path)->Result<Option<MaskedArray>>;
}

#[derive(Debug,PartialEq)]
pub enum Verdict {
    Pass,
    Corrupt(String),
    BadFile,
    Empty,
}

pub fn triage (extractor: &dyn VariableExtractor, format: GranuleFormat, path: &Path)->Verdict {
    match extractor.extract( format, path) {
        Err(e) => Verdict::Corrupt( e.to_string()),
        Ok(None) => Verdict::BadFile,
        Ok(Some(data)) if data.n_valid() == 0 => Verdict::Empty,
        Ok(Some(_)) => Verdict::Pass
    }
}

/* #region GDAL extraction *********************************************************************/

/// `VariableExtractor` based on GDAL's netCDF, HDF4 and HDF5 drivers
#[derive(Debug,Default,Clone)]
pub struct GdalExtractor;

/// (name,description) pairs of all subdatasets
fn subdatasets (ds: &Dataset)->Vec<(String,String)> {
    let items = ds.metadata_domain("SUBDATASETS").unwrap_or_default();
    let mut names: Vec<(usize,String)> = Vec::new();
    let mut descs: Vec<(usize,String)> = Vec::new();

    for item in items {
        if let Some((key,val)) = item.split_once('=') {
            let idx = key.trim_start_matches("SUBDATASET_").split('_').next().and_then( |n| n.parse::<usize>().ok()).unwrap_or(0);
            if key.ends_with("_NAME") { names.push( (idx, val.to_string())) }
            else if key.ends_with("_DESC") { descs.push( (idx, val.to_string())) }
        }
    }
    names.sort_by_key( |(i,_)| *i);

    names.into_iter().map( |(i,name)| {
        let desc = descs.iter().find( |(j,_)| *j == i).map( |(_,d)| d.clone()).unwrap_or_default();
        (name,desc)
    }).collect()
}

/// look up a numeric metadata item whose key ends with `suffix`
fn numeric_meta<M: Metadata> (meta: &M, suffix: &str)->Option<f64> {
    let items = meta.metadata_domain("")?;
    items.iter()
        .filter_map( |item| item.split_once('='))
        .find( |(k,_)| k.ends_with( suffix))
        .and_then( |(_,v)| v.split( |c: char| c == ',' || c.is_whitespace() || c == '{' || c == '}')
            .find( |s| !s.is_empty())
            .and_then( |s| s.parse().ok()))
}

fn read_band_f64 (ds: &Dataset)->Result<(Vec<f64>,Option<f64>)> {
    let band = ds.rasterband(1)?;
    let buf: Buffer<f64> = band.read_as( (0,0), band.size(), band.size(), None)?;
    Ok( (buf.data().to_vec(), band.no_data_value()) )
}

impl GdalExtractor {
    fn netcdf (&self, path: &Path, var: Option<&str>)->Result<Option<MaskedArray>> {
        let ds = Dataset::open( path)?;
        let subs = subdatasets( &ds);
        let found = subs.iter().find( |(name,_)| match var {
            Some(v) => name.ends_with( &format!("/geophysical_data/{}", v)),
            None => name.contains("/geophysical_data/")
        });

        match found {
            Some((name,_)) => {
                let sub = Dataset::open( name)?;
                let (values,no_data) = read_band_f64( &sub)?;
                Ok( Some( MaskedArray::with_fill( values, no_data)))
            }
            None => Ok(None)
        }
    }

    fn hdf4 (&self, path: &Path, var: &str)->Result<Option<MaskedArray>> {
        let ds = Dataset::open( path)?;
        let key = format!(" {} ", var);
        let found = subdatasets( &ds).into_iter().find( |(_,desc)| desc.contains( &key));

        match found {
            Some((name,_)) => {
                let sub = Dataset::open( &name)?;
                let fill = numeric_meta( &sub, "bad_value_scaled")
                    .ok_or_else( || op_failed!("no bad_value_scaled attribute for {}", var))?;
                let (values,_) = read_band_f64( &sub)?;
                Ok( Some( MaskedArray::with_fill( values, Some(fill))))
            }
            None => Ok(None)
        }
    }

    fn hdf5 (&self, path: &Path, var: &str)->Result<Option<MaskedArray>> {
        let ds = Dataset::open( path)?;
        let suffix = format!("/Image_data/{}", var);
        let found = subdatasets( &ds).into_iter().find( |(name,_)| name.ends_with( &suffix));

        match found {
            Some((name,_)) => {
                let sub = Dataset::open( &name)?;
                let band = sub.rasterband(1)?;
                let fill = numeric_meta( &band, "Error_DN").or_else( || numeric_meta( &sub, "Error_DN"))
                    .ok_or_else( || op_failed!("no Error_DN attribute for {}", var))?;
                let (values,_) = read_band_f64( &sub)?;
                Ok( Some( MaskedArray::with_fill( values, Some(fill))))
            }
            None => Ok(None)
        }
    }
}

impl VariableExtractor for GdalExtractor {
    fn extract (&self, format: GranuleFormat, path: &Path)->Result<Option<MaskedArray>> {
        let basename = path.file_name().and_then( |n| n.to_str()).unwrap_or("");
        let var = format.variable( basename);

        match format {
            GranuleFormat::NetCdf4 => self.netcdf( path, var),
            GranuleFormat::Hdf4Sds => self.hdf4( path, var.unwrap_or("chlor_a")),
            GranuleFormat::Hdf5Grid => self.hdf5( path, var.unwrap_or("CHLA")),
        }
    }
}

/* #endregion GDAL extraction */

const CHECKED_EXTENSIONS: [&str; 3] = ["nc", "hdf", "h5"];

pub fn is_checked_file (path: &Path)->bool {
    path.extension().and_then( |e| e.to_str()).map( |e| CHECKED_EXTENSIONS.contains( &e)).unwrap_or(false)
}

pub fn remove_file (path: &Path) {
    if let Err(e) = fs::remove_file( path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("failed to remove {}: {}", path.display(), e);
        }
    }
}

/// triages the downloaded files of one observation
pub struct FileSanity {
    extractor: Arc<dyn VariableExtractor>,
    format: GranuleFormat,
    label: String, // satellite key for log messages
}

impl FileSanity {
    pub fn new (extractor: Arc<dyn VariableExtractor>, format: GranuleFormat, label: impl ToString)->Self {
        FileSanity { extractor, format, label: label.to_string() }
    }

    /// returns the files that can be used for matching, in input order. Files already recorded in the
    /// control list are kept without being opened if they still exist, newly passed files are appended to it
    pub fn check (&self, files: &[PathBuf], control: &ControlList)->Result<Vec<PathBuf>> {
        let known = control.entries()?;
        let mut keep: Vec<PathBuf> = Vec::new();
        let mut passed: Vec<String> = Vec::new();

        for (i,file) in files.iter().enumerate() {
            let n = i+1;
            let bsn = file.file_name().and_then( |n| n.to_str()).unwrap_or("").to_string();

            if known.iter().any( |k| *k == bsn) {
                // validated before, but possibly already removed by the cleanup of an earlier day
                if file.is_file() {
                    keep.push( file.clone());
                } else {
                    info!("File#: {:3} | {}: validated earlier, local file no longer available", n, bsn);
                }
                continue
            }
            if !is_checked_file( file) { continue }

            match triage( self.extractor.as_ref(), self.format, file) {
                Verdict::Pass => {
                    info!("File#: {:3} | {}: Pass", n, bsn);
                    keep.push( file.clone());
                    passed.push( bsn);
                }
                Verdict::Corrupt(reason) => {
                    remove_file( file);
                    error!("File#: {:3} | {} | {}: {}", n, bsn, self.label, reason);
                }
                Verdict::BadFile => {
                    remove_file( file);
                    warn!("File#: {:3} | {}: BadFile, removed", n, bsn);
                }
                Verdict::Empty => {
                    remove_file( file);
                    warn!("File#: {:3} | {}: Empty, removed", n, bsn);
                }
            }
        }

        control.append_all( passed.iter().map( |s| s.as_str()))?;
        Ok(keep)
    }
}
