//! Exchange file collaborators.
//! This crate does not parse nor produce exchange files: readers and
//! writers are provided by the caller through [StationReader] and [StationWriter].
use std::path::{Path, PathBuf};

use strum_macros::EnumString;

use crate::{
    error::Error,
    location::Location,
    station::Station,
    tensor::{Impedance, Tipper},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exchange file formats, identified by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum FileFormat {
    /// SEG Electrical Data Interchange
    #[strum(serialize = "edi")]
    Edi,
    /// EMTF XML
    #[strum(serialize = "xml")]
    Xml,
    /// Jones format (partial support)
    #[strum(serialize = "j")]
    J,
    /// ModEM data file (partial support)
    #[strum(serialize = "modem", serialize = "dat")]
    ModEm,
}

impl FileFormat {
    /// Identifies the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<Self>().ok())
    }

    /// Preferred file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Edi => "edi",
            Self::Xml => "xml",
            Self::J => "j",
            Self::ModEm => "dat",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Content of an exchange file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationData {
    pub name: String,
    pub location: Location,
    pub impedance: Impedance,
    /// Empty when the file has no tipper
    pub tipper: Tipper,
}

/// Exchange file reader
pub trait StationReader {
    fn read(&self, path: &Path) -> Result<StationData, Error>;
}

/// Exchange file writer. Returns the path actually written.
pub trait StationWriter {
    fn write(&self, station: &Station, path: &Path, format: FileFormat) -> Result<PathBuf, Error>;
}

/// Data is stored as read: the [Impedance] rotation angle becomes
/// the station frame, the [Tipper] is expressed in that frame.
impl From<StationData> for Station {
    fn from(data: StationData) -> Self {
        Station::new(&data.name)
            .with_location(data.location)
            .with_impedance(data.impedance)
            .with_tipper(data.tipper)
    }
}

impl Station {
    /// Builds a [Station] populated by given [StationReader]
    pub fn from_reader<R: StationReader>(reader: &R, path: &Path) -> Result<Self, Error> {
        Ok(Self::from(reader.read(path)?))
    }

    /// Hands this [Station] to given [StationWriter]. The format is deduced
    /// from the file extension, EDI by default.
    pub fn to_writer<W: StationWriter>(&self, writer: &W, path: &Path) -> Result<PathBuf, Error> {
        let format = FileFormat::from_path(path).unwrap_or(FileFormat::Edi);
        writer.write(self, path, format)
    }
}
