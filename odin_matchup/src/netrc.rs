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

//! minimal reader for the user's netrc credential store

use std::{env, fs, path::{Path,PathBuf}};
use crate::errors::{OdinMatchupError, Result};

#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug,Clone,Default)]
pub struct Netrc {
    machines: Vec<(String,Credentials)>,
    default: Option<Credentials>,
}

impl Netrc {
    pub fn parse (text: &str)->Self {
        let mut netrc = Netrc::default();
        let mut tokens = tokenize( text).into_iter().peekable();

        let mut host: Option<String> = None; // None for 'default' entry
        let mut in_entry = false;
        let mut login = String::new();
        let mut password = String::new();

        let flush = |netrc: &mut Netrc, host: &Option<String>, login: &mut String, password: &mut String| {
            let creds = Credentials { login: std::mem::take(login), password: std::mem::take(password) };
            match host {
                Some(h) => netrc.machines.push( (h.clone(), creds)),
                None => netrc.default = Some(creds),
            }
        };

        while let Some(tok) = tokens.next() {
            match tok.as_str() {
                "machine" | "default" => {
                    if in_entry { flush( &mut netrc, &host, &mut login, &mut password) }
                    host = if tok == "machine" { tokens.next() } else { None };
                    in_entry = true;
                }
                "login" => { login = tokens.next().unwrap_or_default() }
                "password" => { password = tokens.next().unwrap_or_default() }
                "account" => { tokens.next(); }
                "macdef" => {
                    // macro bodies end at an empty line which tokenize() reports as a marker
                    tokens.next();
                    while let Some(t) = tokens.next() { if t == "\n\n" { break } }
                }
                _ => {}
            }
        }
        if in_entry { flush( &mut netrc, &host, &mut login, &mut password) }

        netrc
    }

    pub fn load (path: impl AsRef<Path>)->Result<Self> {
        let text = fs::read_to_string( path)?;
        Ok( Netrc::parse( &text))
    }

    /// `$NETRC` if set, otherwise ~/.netrc (~/_netrc on Windows)
    pub fn default_path ()->Option<PathBuf> {
        if let Ok(path) = env::var("NETRC") {
            return Some( PathBuf::from(path))
        }
        let home = env::var("HOME").or_else( |_| env::var("USERPROFILE")).ok()?;
        let name = if cfg!(windows) { "_netrc" } else { ".netrc" };
        Some( Path::new( &home).join( name))
    }

    pub fn authenticators (&self, host: &str)->Option<&Credentials> {
        self.machines.iter().find( |(h,_)| h == host).map( |(_,c)| c).or( self.default.as_ref())
    }
}

fn tokenize (text: &str)->Vec<String> {
    let mut tokens = Vec::new();
    let text = text.replace("\r\n", "\n");
    for para in text.split("\n\n") {
        for line in para.lines() {
            let line = line.trim();
            if line.starts_with('#') { continue }
            tokens.extend( line.split_whitespace().map( String::from));
        }
        tokens.push( "\n\n".into());
    }
    tokens
}

/// look up credentials for `host` in the default netrc file
pub fn get_auth (host: &str)->Result<Credentials> {
    let path = Netrc::default_path().ok_or_else( || OdinMatchupError::CredentialsError("no netrc location (HOME not set)".into()))?;
    if !path.is_file() {
        return Err( OdinMatchupError::CredentialsError( format!("netrc file {} not found", path.display())))
    }
    let netrc = Netrc::load( &path)?;
    netrc.authenticators( host).cloned()
        .ok_or_else( || OdinMatchupError::CredentialsError( format!("no netrc entry for {}", host)))
}
