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

//! the append-only record of granules that were downloaded and passed validation.
//! One `<basename>:OK` line per entry. Single writer per output directory

use std::{fs::{self, OpenOptions}, io::Write, path::{Path,PathBuf}};
use crate::errors::Result;

pub const OK_SUFFIX: &str = ":OK";

#[derive(Debug,Clone)]
pub struct ControlList {
    path: PathBuf,
}

impl ControlList {
    /// open the control list, creating an empty file if there is none yet
    pub fn ensure (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() { fs::create_dir_all( dir)? }
        }
        OpenOptions::new().create(true).append(true).open( &path)?;
        Ok( ControlList { path })
    }

    pub fn path (&self)->&Path { &self.path }

    /// current entries, re-read from disk on each call
    pub fn entries (&self)->Result<Vec<String>> {
        if !self.path.is_file() { return Ok( Vec::new()) }
        let text = fs::read_to_string( &self.path)?;
        Ok( text.lines()
            .filter_map( |l| l.trim().strip_suffix( OK_SUFFIX))
            .map( String::from)
            .collect())
    }

    pub fn contains (&self, basename: &str)->Result<bool> {
        Ok( self.entries()?.iter().any( |e| e == basename))
    }

    pub fn append (&self, basename: &str)->Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open( &self.path)?;
        file.write_all( format!("{}{}\n", basename, OK_SUFFIX).as_bytes())?;
        Ok(())
    }

    /// append all basenames that are not yet recorded
    pub fn append_all<'a> (&self, basenames: impl IntoIterator<Item=&'a str>)->Result<usize> {
        let existing = self.entries()?;
        let mut n = 0;
        for bsn in basenames {
            if !existing.iter().any( |e| e == bsn) {
                self.append( bsn)?;
                n += 1;
            }
        }
        Ok(n)
    }
}
