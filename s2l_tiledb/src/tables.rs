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

//! grid table formats. Tables are either CSV files with a header line or RON lists of records, in
//! both cases with the column names of the sen2like grid databases:
//!   WRS:  PATH_ROW, UTM, LL_WKT
//!   MGRS: TILE_ID, EPSG, UTM_WKT, LL_WKT

use std::{fmt, fs::File, io::BufReader, path::Path};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use s2l_common::fs::extension;

use crate::errors::{Result, TileDbError, invalid_record, storage_unavailable};
use crate::geometry::parse_wkt;
use crate::store::TileFootprint;
use crate::tile_id::{MgrsCode, WrsId};

/// the supported on-disk table formats. This is an explicit registry - formats are selected by
/// file extension and there is no runtime discovery
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TableFormat {
    Csv,
    Ron,
}

const FORMATS: [(&str,TableFormat);2] = [
    ("csv", TableFormat::Csv),
    ("ron", TableFormat::Ron),
];

impl TableFormat {
    pub fn all () -> impl Iterator<Item=(&'static str,TableFormat)> {
        FORMATS.iter().copied()
    }

    pub fn for_ext (ext: &str) -> Option<TableFormat> {
        FORMATS.iter().find( |(e,_)| e.eq_ignore_ascii_case(ext)).map( |(_,f)| *f)
    }

    pub fn for_path (path: &Path) -> Result<TableFormat> {
        extension( &path)
            .and_then( TableFormat::for_ext)
            .ok_or_else( || storage_unavailable( format!("unsupported grid table format: {path:?}")))
    }

    pub fn ext (&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Ron => "ron",
        }
    }

    pub fn read_records<R: DeserializeOwned> (&self, path: &Path) -> Result<Vec<R>> {
        let table = table_name( path);
        let file = File::open( path).map_err( |e| storage_unavailable( format!("cannot open {path:?}: {e}")))?;
        let reader = BufReader::new( file);

        match self {
            TableFormat::Csv => {
                let mut csv_reader = csv::ReaderBuilder::new()
                    .comment(Some(b'#'))
                    .trim(csv::Trim::All)
                    .from_reader(reader);

                let mut records = Vec::new();
                for (i,res) in csv_reader.deserialize::<R>().enumerate() {
                    match res {
                        Ok(rec) => records.push(rec),
                        Err(e) if e.is_io_error() => return Err( storage_unavailable( format!("error reading {path:?}: {e}"))),
                        Err(e) => return Err( invalid_record( &table, format!("record {}: {}", i+1, e)))
                    }
                }
                Ok(records)
            }
            TableFormat::Ron => {
                ron::de::from_reader( reader).map_err( |e| invalid_record( &table, e))
            }
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ext())
    }
}

fn table_name (path: &Path) -> String {
    path.file_name().map( |f| f.to_string_lossy().to_string()).unwrap_or_else( || format!("{path:?}"))
}

/* #region records ****************************************************************************************/

/// a row of the Landsat WRS-2 table
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct WrsRecord {
    #[serde(rename="PATH_ROW")]
    pub path_row: String,

    #[serde(rename="UTM")]
    pub utm: u32,

    #[serde(rename="LL_WKT")]
    pub ll_wkt: String,
}

impl WrsRecord {
    pub fn to_footprint (&self, table: &str) -> Result<TileFootprint> {
        let id: WrsId = self.path_row.parse().map_err( |e: TileDbError| invalid_record( table, e))?;
        let geo = parse_wkt( &self.ll_wkt).map_err( |e| invalid_record( table, format!("{id}: {e}")))?;
        TileFootprint::wrs( id, self.utm, geo).map_err( |e| invalid_record( table, format!("{id}: {e}")))
    }
}

/// a row of the Sentinel-2 MGRS table
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct MgrsRecord {
    #[serde(rename="TILE_ID")]
    pub tile_id: String,

    #[serde(rename="EPSG")]
    pub epsg: u32,

    #[serde(rename="UTM_WKT")]
    pub utm_wkt: String,

    #[serde(rename="LL_WKT")]
    pub ll_wkt: String,
}

impl MgrsRecord {
    pub fn to_footprint (&self, table: &str) -> Result<TileFootprint> {
        let code: MgrsCode = self.tile_id.parse().map_err( |e: TileDbError| invalid_record( table, e))?;
        let geo = parse_wkt( &self.ll_wkt).map_err( |e| invalid_record( table, format!("{code} LL_WKT: {e}")))?;
        let utm = parse_wkt( &self.utm_wkt).map_err( |e| invalid_record( table, format!("{code} UTM_WKT: {e}")))?;
        TileFootprint::mgrs( code, self.epsg, geo, utm).map_err( |e| invalid_record( table, format!("{}: {}", self.tile_id, e)))
    }
}

/* #endregion records */

pub fn load_wrs_table (path: &Path) -> Result<Vec<TileFootprint>> {
    let format = TableFormat::for_path( path)?;
    let table = table_name( path);
    let records: Vec<WrsRecord> = format.read_records( path)?;
    debug!("read {} WRS records from {:?}", records.len(), path);

    records.iter().map( |r| r.to_footprint( &table)).collect()
}

pub fn load_mgrs_table (path: &Path) -> Result<Vec<TileFootprint>> {
    let format = TableFormat::for_path( path)?;
    let table = table_name( path);
    let records: Vec<MgrsRecord> = format.read_records( path)?;
    debug!("read {} MGRS records from {:?}", records.len(), path);

    records.iter().map( |r| r.to_footprint( &table)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_registry () {
        let exts: Vec<&str> = TableFormat::all().map( |(e,_)| e).collect();
        assert_eq!( exts, vec!["csv", "ron"]);

        assert_eq!( TableFormat::for_ext("CSV"), Some(TableFormat::Csv));
        assert_eq!( TableFormat::for_path( Path::new("grids/s2tiles.ron")).unwrap(), TableFormat::Ron);
        assert!( matches!( TableFormat::for_path( Path::new("grids/s2tiles.db")), Err(TileDbError::StorageUnavailable(_))));
        assert!( TableFormat::for_path( Path::new("grids/s2tiles")).is_err());
    }
}
