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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinMatchupError>;

#[derive(Error,Debug)]
pub enum OdinMatchupError {

    /// fatal input or parameter error, reported before any network activity
    #[error("validation error: {0}")]
    ValidationError(String),

    /// a remote catalog reset the connection. This aborts the run
    #[error("connection reset: {0}")]
    ConnectionResetError(String),

    #[error("credentials error {0}")]
    CredentialsError(String),

    #[error("transfer error {0}")]
    TransferError(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("serde error {0}")]
    SerdeError( #[from] serde_json::Error),

    #[error("csv error {0}")]
    CsvError( #[from] csv::Error),

    #[error("config error {0}")]
    ConfigError( #[from] ron::error::SpannedError),

    #[error("regex error {0}")]
    RegexError( #[from] regex::Error),

    #[error("gdal error {0}")]
    GdalError( #[from] gdal::errors::GdalError),

    #[error("operation failed {0}")]
    OpFailedError(String),
}

impl OdinMatchupError {
    pub fn is_fatal_reset (&self)->bool {
        matches!( self, OdinMatchupError::ConnectionResetError(_))
    }
}

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinMatchupError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;

macro_rules! validation_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinMatchupError::ValidationError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use validation_error;
