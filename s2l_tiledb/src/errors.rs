/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
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

pub type Result<T> = std::result::Result<T, TileDbError>;

#[derive(Error,Debug)]
pub enum TileDbError {

    /// requested identifier is not in the grid store - callers can treat this as "no match"
    #[error("tile not found: {0}")]
    NotFound(String),

    #[error("invalid tile identifier: {0}")]
    InvalidIdentifier(String),

    /// malformed, non-areal or self-intersecting polygon
    #[error("geometry error: {0}")]
    GeometryError(String),

    /// unsupported EPSG code or a position that can't be projected into the requested zone
    #[error("projection error: {0}")]
    ProjectionError(String),

    /// grid table could not be opened or read
    #[error("grid storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("invalid record in grid table {table}: {msg}")]
    InvalidRecord { table: String, msg: String },

    #[error("config error: {0}")]
    ConfigError(String),
}

impl TileDbError {
    pub fn is_not_found (&self) -> bool {
        matches!( self, TileDbError::NotFound(_))
    }
}

macro_rules! geometry_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::TileDbError::GeometryError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use geometry_error;

macro_rules! projection_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::TileDbError::ProjectionError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use projection_error;

pub fn not_found<S: ToString> (id: S)->TileDbError {
    TileDbError::NotFound(id.to_string())
}

pub fn invalid_id<S: ToString> (id: S)->TileDbError {
    TileDbError::InvalidIdentifier(id.to_string())
}

pub fn storage_unavailable<S: ToString> (msg: S)->TileDbError {
    TileDbError::StorageUnavailable(msg.to_string())
}

pub fn invalid_record<T: ToString, S: ToString> (table: T, msg: S)->TileDbError {
    TileDbError::InvalidRecord{ table: table.to_string(), msg: msg.to_string() }
}

pub fn config_error<S: ToString> (msg: S)->TileDbError {
    TileDbError::ConfigError(msg.to_string())
}
