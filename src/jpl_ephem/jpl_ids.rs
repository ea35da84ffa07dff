/// Object slots of a DE406-family binary ephemeris.
///
/// The header of the binary file describes twelve coefficient tables, in a fixed order.
/// The first eleven hold Chebyshev position series and become trajectories; the twelfth
/// holds nutation angles and is never converted.
///
/// Conversions
/// -----------
/// * Use [`TryFrom<u8>`] to convert a raw slot index to a `JplObjectId`. Indices past the
///   eleven position slots return an error.
/// * Use [`From<JplObjectId>`] to recover the slot index (`u8`).
///
/// Examples
/// --------
/// ```rust, no_run
/// use orrery::jpl_ephem::jpl_ids::JplObjectId;
/// use std::convert::TryFrom;
///
/// let id = JplObjectId::try_from(4).unwrap();
/// assert_eq!(id, JplObjectId::Jupiter);
///
/// let raw: u8 = JplObjectId::Moon.into();
/// assert_eq!(raw, 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JplObjectId {
    Mercury = 0,
    Venus = 1,
    EarthMoonBarycenter = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
    Pluto = 8,
    Moon = 9,
    Sun = 10,
}

impl JplObjectId {
    /// All objects converted to trajectories, in slot order.
    pub const ALL: [JplObjectId; 11] = [
        JplObjectId::Mercury,
        JplObjectId::Venus,
        JplObjectId::EarthMoonBarycenter,
        JplObjectId::Mars,
        JplObjectId::Jupiter,
        JplObjectId::Saturn,
        JplObjectId::Uranus,
        JplObjectId::Neptune,
        JplObjectId::Pluto,
        JplObjectId::Moon,
        JplObjectId::Sun,
    ];

    /// Name under which the decoded trajectory is offered as a builtin orbit.
    pub fn builtin_name(&self) -> &'static str {
        match self {
            JplObjectId::Mercury => "Mercury",
            JplObjectId::Venus => "Venus",
            JplObjectId::EarthMoonBarycenter => "EMB",
            JplObjectId::Mars => "Mars",
            JplObjectId::Jupiter => "Jupiter",
            JplObjectId::Saturn => "Saturn",
            JplObjectId::Uranus => "Uranus",
            JplObjectId::Neptune => "Neptune",
            JplObjectId::Pluto => "Pluto",
            JplObjectId::Moon => "Moon",
            JplObjectId::Sun => "Sun",
        }
    }
}

impl TryFrom<u8> for JplObjectId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        JplObjectId::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid JPL object slot: {value}"))
    }
}

impl From<JplObjectId> for u8 {
    fn from(id: JplObjectId) -> Self {
        id as u8
    }
}

#[cfg(test)]
mod jpl_ids_test {
    use super::*;

    #[test]
    fn test_slot_conversions() {
        for (slot, id) in JplObjectId::ALL.iter().enumerate() {
            assert_eq!(JplObjectId::try_from(slot as u8).unwrap(), *id);
            assert_eq!(u8::from(*id), slot as u8);
        }
        assert!(JplObjectId::try_from(11).is_err());
        assert_eq!(JplObjectId::EarthMoonBarycenter.builtin_name(), "EMB");
    }
}
