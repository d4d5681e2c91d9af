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

//! identifiers of the two tiling grids: Landsat WRS-2 path/row and Sentinel-2 MGRS tile codes

use std::{fmt, str::FromStr};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize,Deserialize};

use crate::errors::{Result, TileDbError, invalid_id};

lazy_static! {
    static ref WRS_RE: Regex = Regex::new( r"^\s*(\d{1,3})\s*[_/,]\s*(\d{1,3})\s*$").unwrap();
    static ref MGRS_RE: Regex = Regex::new( r"^T?(\d{2})([C-HJ-NP-X])([A-HJ-NP-Z])([A-HJ-NP-V])$").unwrap();
}

pub const MAX_WRS_PATH: u16 = 233;
pub const MAX_WRS_ROW: u16 = 248;

/// the tiling grid a footprint belongs to
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
pub enum GridKind {
    Wrs,
    Mgrs,
}

impl GridKind {
    pub fn other (&self) -> GridKind {
        match self {
            GridKind::Wrs => GridKind::Mgrs,
            GridKind::Mgrs => GridKind::Wrs,
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridKind::Wrs => write!(f, "WRS"),
            GridKind::Mgrs => write!(f, "MGRS"),
        }
    }
}

/* #region WrsId ******************************************************************************************/

/// Landsat WRS-2 path/row, displayed as "path_row" (e.g. "196_30")
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
pub struct WrsId {
    pub path: u16,
    pub row: u16,
}

impl WrsId {
    pub fn new (path: u16, row: u16) -> Result<WrsId> {
        if path >= 1 && path <= MAX_WRS_PATH && row >= 1 && row <= MAX_WRS_ROW {
            Ok( WrsId{path,row} )
        } else {
            Err( invalid_id( format!("WRS path/row out of range: {path}_{row}")))
        }
    }

    pub fn as_array (&self) -> [u16;2] { [self.path, self.row] }
}

impl fmt::Display for WrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.path, self.row)
    }
}

/// accepts "196_30", "196_030" or "196/30"
impl FromStr for WrsId {
    type Err = TileDbError;

    fn from_str (s: &str) -> Result<WrsId> {
        let cap = WRS_RE.captures(s).ok_or_else( || invalid_id(s))?;
        let path: u16 = cap[1].parse().map_err( |_| invalid_id(s))?;
        let row: u16 = cap[2].parse().map_err( |_| invalid_id(s))?;
        WrsId::new( path, row)
    }
}

impl TryFrom<(u16,u16)> for WrsId {
    type Error = TileDbError;

    fn try_from (pr: (u16,u16)) -> Result<WrsId> { WrsId::new( pr.0, pr.1) }
}

/* #endregion WrsId */

/* #region MgrsCode ***************************************************************************************/

/// 5 character Sentinel-2 MGRS tile code (e.g. "31TFJ"): UTM zone, latitude band and 100km square letters
#[derive(Debug,Clone,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
pub struct MgrsCode(String);

impl MgrsCode {
    pub fn as_str (&self) -> &str { self.0.as_str() }

    pub fn zone (&self) -> u32 {
        // validated at construction
        self.0[0..2].parse().unwrap_or(0)
    }

    pub fn band (&self) -> char {
        self.0.as_bytes()[2] as char
    }

    pub fn is_north (&self) -> bool { self.band() >= 'N' }
}

impl fmt::Display for MgrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// accepts an optional 'T' prefix (as used in product names) and lower case input
impl FromStr for MgrsCode {
    type Err = TileDbError;

    fn from_str (s: &str) -> Result<MgrsCode> {
        let code = s.trim().to_ascii_uppercase();
        let cap = MGRS_RE.captures(&code).ok_or_else( || invalid_id(s))?;
        let zone: u32 = cap[1].parse().map_err( |_| invalid_id(s))?;
        if zone < 1 || zone > 60 {
            return Err( invalid_id( format!("MGRS zone out of range: {s}")))
        }
        Ok( MgrsCode( format!("{}{}{}{}", &cap[1], &cap[2], &cap[3], &cap[4])) )
    }
}

/* #endregion MgrsCode */

/// identifier of a footprint in either grid
#[derive(Debug,Clone,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
pub enum TileId {
    Wrs(WrsId),
    Mgrs(MgrsCode),
}

impl TileId {
    pub fn parse (grid: GridKind, s: &str) -> Result<TileId> {
        match grid {
            GridKind::Wrs => Ok( TileId::Wrs( s.parse()?)),
            GridKind::Mgrs => Ok( TileId::Mgrs( s.parse()?)),
        }
    }

    pub fn grid (&self) -> GridKind {
        match self {
            TileId::Wrs(_) => GridKind::Wrs,
            TileId::Mgrs(_) => GridKind::Mgrs,
        }
    }

    pub fn as_wrs (&self) -> Option<&WrsId> {
        if let TileId::Wrs(id) = self { Some(id) } else { None }
    }

    pub fn as_mgrs (&self) -> Option<&MgrsCode> {
        if let TileId::Mgrs(code) = self { Some(code) } else { None }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileId::Wrs(id) => write!(f, "{id}"),
            TileId::Mgrs(code) => write!(f, "{code}"),
        }
    }
}

impl From<WrsId> for TileId {
    fn from (id: WrsId) -> Self { TileId::Wrs(id) }
}

impl From<MgrsCode> for TileId {
    fn from (code: MgrsCode) -> Self { TileId::Mgrs(code) }
}
