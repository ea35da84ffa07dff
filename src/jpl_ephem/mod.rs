//! # JPL binary planetary ephemerides
//!
//! Decoding of DE406 binary files into per-object [`ChebyshevPolyTrajectory`] values.
//!
//! ## Overview
//!
//! - [`de406_reader`] – nom decoder for the fixed-layout big-endian file.
//! - [`jpl_ids`] – slot order of the objects stored in the file.
//! - [`JplEphemeris`] – the decoded ephemeris, exposing one trajectory per object.
//!
//! Decoded trajectories are positions of each object relative to the solar system
//! barycenter (the Moon relative to the Earth-Moon barycenter), in kilometers.
//!
//! ## Example
//!
//! ```rust, no_run
//! use camino::Utf8Path;
//! use orrery::jpl_ephem::{JplEphemeris, jpl_ids::JplObjectId};
//!
//! let ephem = JplEphemeris::load(Utf8Path::new("data/de406_1800-2100.dat")).unwrap();
//! let mars = ephem.trajectory(JplObjectId::Mars).unwrap();
//! let state = mars.state(0.0);
//! println!("Mars at J2000: {:?}", state.position);
//! ```

pub mod de406_reader;
pub mod jpl_ids;

use std::rc::Rc;

use ahash::AHashMap;
use camino::Utf8Path;
use tracing::debug;

use crate::catalog_errors::CatalogError;
use crate::constants::{JulianDay, J2000_JD, SECONDS_PER_DAY};
use crate::trajectories::chebyshev::ChebyshevPolyTrajectory;

use de406_reader::{decode_de406, De406Data};
use jpl_ids::JplObjectId;

/// A decoded DE406 ephemeris.
#[derive(Debug, Clone)]
pub struct JplEphemeris {
    start_jd: JulianDay,
    end_jd: JulianDay,
    days_per_record: f64,
    km_per_au: f64,
    earth_moon_mass_ratio: f64,
    record_count: usize,
    trajectories: AHashMap<JplObjectId, Rc<ChebyshevPolyTrajectory>>,
}

impl JplEphemeris {
    /// Read and decode a DE406 file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: location of the binary file
    ///
    /// Return
    /// ----------
    /// * the ephemeris, or the I/O or decode error. Nothing is returned for a file that
    ///   decodes only partially.
    pub fn load(path: &Utf8Path) -> Result<Self, CatalogError> {
        debug!("Loading DE406 ephemeris {path}");
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).inspect_err(|e| debug!("Failed to decode {path}: {e}"))
    }

    /// Decode an in-memory DE406 image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        let data = decode_de406(bytes)?;
        Self::from_decoded(data)
    }

    fn from_decoded(data: De406Data) -> Result<Self, CatalogError> {
        let De406Data {
            header,
            record_count,
            object_coeffs,
        } = data;

        let start_time = (header.start_jd - J2000_JD) * SECONDS_PER_DAY;
        let mut trajectories = AHashMap::with_capacity(JplObjectId::ALL.len());

        for (id, coeffs) in JplObjectId::ALL.iter().zip(object_coeffs) {
            let info = header.coeff_info[*id as usize];
            if info.coeff_count == 0 || info.granule_count == 0 {
                debug!("No coefficients for {}", id.builtin_name());
                continue;
            }

            let granule_duration =
                header.days_per_record * SECONDS_PER_DAY / info.granule_count as f64;
            let trajectory = ChebyshevPolyTrajectory::new(
                coeffs,
                info.coeff_count as usize - 1,
                info.granule_count as usize * record_count,
                start_time,
                granule_duration,
            )?;
            trajectories.insert(*id, Rc::new(trajectory));
        }

        debug!(
            "Decoded {} ephemeris objects over {record_count} records",
            trajectories.len()
        );

        Ok(JplEphemeris {
            start_jd: header.start_jd,
            end_jd: header.end_jd,
            days_per_record: header.days_per_record,
            km_per_au: header.km_per_au,
            earth_moon_mass_ratio: header.earth_moon_mass_ratio,
            record_count,
            trajectories,
        })
    }

    pub fn start_jd(&self) -> JulianDay {
        self.start_jd
    }

    pub fn end_jd(&self) -> JulianDay {
        self.end_jd
    }

    pub fn days_per_record(&self) -> f64 {
        self.days_per_record
    }

    pub fn km_per_au(&self) -> f64 {
        self.km_per_au
    }

    pub fn earth_moon_mass_ratio(&self) -> f64 {
        self.earth_moon_mass_ratio
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Trajectory of one object, if the file carried coefficients for it.
    pub fn trajectory(&self, id: JplObjectId) -> Option<Rc<ChebyshevPolyTrajectory>> {
        self.trajectories.get(&id).cloned()
    }

    /// Every decoded trajectory with the name it is offered under as a builtin orbit,
    /// in slot order.
    pub fn builtin_trajectories(&self) -> Vec<(&'static str, Rc<ChebyshevPolyTrajectory>)> {
        JplObjectId::ALL
            .iter()
            .filter_map(|id| {
                self.trajectories
                    .get(id)
                    .map(|traj| (id.builtin_name(), Rc::clone(traj)))
            })
            .collect()
    }
}

#[cfg(test)]
mod jpl_ephem_test {
    use super::de406_reader::test_de406_reader::{default_layout, synthetic_de406};
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trajectories_from_synthetic_file() {
        let bytes = synthetic_de406(2451536.5, 32.0, 3, &default_layout(), 406);
        let ephem = JplEphemeris::from_bytes(&bytes).unwrap();

        assert_eq!(ephem.record_count(), 3);
        assert_relative_eq!(ephem.km_per_au(), 149_597_870.691);

        let mercury = ephem.trajectory(JplObjectId::Mercury).unwrap();
        assert_eq!(mercury.degree(), 2);
        assert_eq!(mercury.granule_count(), 6);
        assert_relative_eq!(mercury.start_time(), -8.5 * 86_400.0);
        assert_relative_eq!(mercury.granule_duration(), 16.0 * 86_400.0);

        let moon = ephem.trajectory(JplObjectId::Moon).unwrap();
        assert_eq!(moon.degree(), 3);
        assert_eq!(moon.granule_count(), 12);
        assert_relative_eq!(moon.granule_duration(), 8.0 * 86_400.0);

        let names: Vec<_> = ephem
            .builtin_trajectories()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names.len(), 11);
        assert_eq!(names[2], "EMB");
    }

    #[test]
    fn test_empty_slot_is_skipped() {
        let mut layout = default_layout();
        layout[8] = (0, 0);
        let bytes = synthetic_de406(2451536.5, 32.0, 1, &layout, 406);
        let ephem = JplEphemeris::from_bytes(&bytes).unwrap();
        assert!(ephem.trajectory(JplObjectId::Pluto).is_none());
        assert!(ephem.trajectory(JplObjectId::Sun).is_some());
    }
}
