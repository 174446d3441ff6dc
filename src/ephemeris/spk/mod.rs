//! # SPK kernel ephemeris
//!
//! Offline, full-precision Earth positions read from a JPL planetary kernel
//! (`de440s.bsp`, `de442.bsp`, …) in NAIF SPK format.
//!
//! The kernel is decoded once into memory ([`SpkKernel`]): its DAF file record and
//! summaries ([`daf`]) locate the Chebyshev segments ([`chebyshev`]), which are indexed
//! by `(target, center)` NAIF codes. The heliocentric Earth is then chained from three
//! segments,
//!
//! ```text
//! Sun → Earth = (SSB → EMB) + (EMB → Earth) − (SSB → Sun)
//! ```
//!
//! and rotated from the kernel J2000 equator to the ecliptic.
//!
//! Kernels are cached under `<data_dir>/kernels/` and downloaded from the NAIF server on
//! first use ([`ensure_kernel`]).
use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::{Epoch, TimeScale};
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::{
    catalog::fetcher::download_big_file,
    constants::{Kilometer, MJD},
    env_state::NeoConfig,
    ephemeris::{
        frames::{equatorial_to_ecliptic, km_to_au},
        EphemerisProvider,
    },
    neolab_errors::NeoError,
};

pub mod chebyshev;
pub mod daf;

use chebyshev::ChebyshevSegment;
use daf::{read_summaries, DafHeader, Summary};

/// NAIF integer codes of the bodies involved in the Earth chain.
pub mod naif_id {
    pub const SOLAR_SYSTEM_BARYCENTER: i32 = 0;
    pub const EARTH_MOON_BARYCENTER: i32 = 3;
    pub const SUN: i32 = 10;
    pub const EARTH: i32 = 399;
}

/// TDB seconds past J2000 of an MJD in the TT scale.
fn mjd_to_et(mjd: MJD) -> f64 {
    Epoch::from_mjd_in_time_scale(mjd, TimeScale::TT).to_et_seconds()
}

/// A planetary SPK kernel decoded in memory.
#[derive(Debug, Clone)]
pub struct SpkKernel {
    header: DafHeader,
    segments: HashMap<(i32, i32), ChebyshevSegment>,
}

impl SpkKernel {
    /// Decode a kernel from its raw bytes.
    ///
    /// Segments of a type other than Chebyshev positions are skipped. When several
    /// segments share a `(target, center)` pair, the last one in the file wins.
    pub fn from_bytes(data: &[u8]) -> Result<Self, NeoError> {
        let header = DafHeader::read(data)?;

        let mut segments = HashMap::new();
        for summary in read_summaries(data, &header)? {
            match ChebyshevSegment::read(data, summary) {
                Ok(segment) => {
                    segments.insert((summary.target, summary.center), segment);
                }
                Err(err) if summary.data_type != chebyshev::CHEBYSHEV_POSITION_TYPE => {
                    debug!(
                        naif_target = summary.target,
                        naif_center = summary.center,
                        %err,
                        "segment skipped"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(SpkKernel { header, segments })
    }

    /// Read and decode a kernel file.
    pub fn read(path: &Utf8Path) -> Result<Self, NeoError> {
        let data = std::fs::read(path)?;
        let kernel = Self::from_bytes(&data)?;
        info!(
            %path,
            name = kernel.header.internal_filename.as_str(),
            n_segments = kernel.segments.len(),
            "SPK kernel loaded"
        );
        Ok(kernel)
    }

    pub fn header(&self) -> &DafHeader {
        &self.header
    }

    /// Descriptors of the loaded segments.
    pub fn summaries(&self) -> impl Iterator<Item = &Summary> {
        self.segments.values().map(|segment| &segment.summary)
    }

    /// Position of `target` relative to `center` at `mjd` (TT), J2000 equator, km.
    ///
    /// Arguments
    /// ---------
    /// * `target`: NAIF code of the body
    /// * `center`: NAIF code of the origin
    /// * `mjd`: epoch, MJD in the TT scale
    ///
    /// Return
    /// ------
    /// * the position, [`NeoError::SpkSegmentNotFound`] if the kernel has no such segment,
    ///   [`NeoError::EpochNotAvailable`] if the epoch is outside its coverage
    pub fn position(&self, target: i32, center: i32, mjd: MJD) -> Result<Vector3<Kilometer>, NeoError> {
        self.segments
            .get(&(target, center))
            .ok_or(NeoError::SpkSegmentNotFound { target, center })?
            .position(mjd_to_et(mjd))
            .ok_or(NeoError::EpochNotAvailable(mjd))
    }
}

/// Earth positions from an SPK kernel.
#[derive(Debug, Clone)]
pub struct SpkEphemeris {
    kernel: SpkKernel,
}

impl SpkEphemeris {
    pub fn new(kernel: SpkKernel) -> Self {
        SpkEphemeris { kernel }
    }

    /// Load the kernel at `path`.
    pub fn from_file(path: &Utf8Path) -> Result<Self, NeoError> {
        Ok(Self::new(SpkKernel::read(path)?))
    }

    /// Load the configured kernel, downloading it first if it is not cached.
    pub fn load(config: &NeoConfig) -> Result<Self, NeoError> {
        Self::from_file(&ensure_kernel(config)?)
    }

    pub fn kernel(&self) -> &SpkKernel {
        &self.kernel
    }

    /// Heliocentric Earth position, J2000 equator, km.
    pub fn earth_equatorial_km(&self, mjd: MJD) -> Result<Vector3<Kilometer>, NeoError> {
        use naif_id::*;

        let emb = self
            .kernel
            .position(EARTH_MOON_BARYCENTER, SOLAR_SYSTEM_BARYCENTER, mjd)?;
        let earth = self.kernel.position(EARTH, EARTH_MOON_BARYCENTER, mjd)?;
        let sun = self.kernel.position(SUN, SOLAR_SYSTEM_BARYCENTER, mjd)?;
        Ok(emb + earth - sun)
    }
}

impl EphemerisProvider for SpkEphemeris {
    fn earth_position(&self, mjd: MJD) -> Result<Vector3<f64>, NeoError> {
        let equatorial = self.earth_equatorial_km(mjd)?;
        Ok(equatorial_to_ecliptic(&km_to_au(&equatorial)))
    }
}

/// Path of the configured kernel, downloaded into the cache directory if missing.
///
/// Arguments
/// ---------
/// * `config`: gives the kernel version, the download location and the data directory
///
/// Return
/// ------
/// * the local kernel path
pub fn ensure_kernel(config: &NeoConfig) -> Result<Utf8PathBuf, NeoError> {
    let path = config.kernel_path();
    if path.is_file() {
        debug!(%path, "SPK kernel found in cache");
        return Ok(path);
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|err| NeoError::UnableToCreateBaseDir(format!("{dir}: {err}")))?;
    }

    let url = config.kernel_url();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { download_big_file(&url, &path).await })?;
    Ok(path)
}
