//! Binary decoder for DE406-family planetary ephemerides.
//!
//! The file is a sequence of fixed-size records of [`DE406_RECORD_SIZE`] eight-byte words,
//! all multi-byte fields big-endian. The first two records form the header:
//!
//! ```text
//! offset  size          content
//! 0       3 × 84        title labels (skipped)
//! 252     400 × 6       constant names (skipped)
//! 2652    3 × f64       start JD, end JD, days per record
//! 2676    u32           number of constants (skipped)
//! 2680    2 × f64       km per AU, Earth/Moon mass ratio
//! 2696    12 × 3 × u32  coefficient layout per object (1-based offset, coeffs, granules)
//! 2840    i32           ephemeris number (must be 406)
//! 2844    3 × u32       libration layout (skipped)
//! 2856    …             rest of the first record, then the constants record (skipped)
//! ```
//!
//! Data records follow: a `(start, end)` Julian Date pair, then for every object slot
//! with a non-empty layout `coeffCount * granuleCount` coefficient triples.
//!
//! Any short read aborts the whole decode: no partially populated ephemeris is ever
//! returned.

use nom::{
    bytes::complete::take,
    multi::count,
    number::complete::{be_f64, be_i32, be_u32},
    sequence::tuple,
    IResult,
};

use crate::catalog_errors::CatalogError;

const LABEL_SIZE: usize = 84;
const LABEL_COUNT: usize = 3;
const CONSTANT_COUNT: usize = 400;
const CONSTANT_NAME_LENGTH: usize = 6;

/// Number of object slots described by the header (11 bodies + nutation)
pub const OBJECT_SLOT_COUNT: usize = 12;

/// Record size of DE406, in eight-byte words
pub const DE406_RECORD_SIZE: usize = 728;

/// Byte offset at which the header fields stop being read
const HEADER_FIELDS_END: usize = 2856;

/// The only ephemeris number this decoder accepts
pub const DE406_NUMBER: i32 = 406;

/// Layout of one object slot inside a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoeffInfo {
    /// 0-based offset of the slot inside a data record
    pub offset: u32,
    /// Chebyshev coefficients per component
    pub coeff_count: u32,
    /// Granules per record
    pub granule_count: u32,
}

impl CoeffInfo {
    /// Coefficient triples stored per record for this slot.
    pub fn triples_per_record(&self) -> usize {
        self.coeff_count as usize * self.granule_count as usize
    }
}

/// Header fields of a DE406 file.
#[derive(Debug, Clone, PartialEq)]
pub struct De406Header {
    pub start_jd: f64,
    pub end_jd: f64,
    pub days_per_record: f64,
    pub km_per_au: f64,
    pub earth_moon_mass_ratio: f64,
    pub coeff_info: [CoeffInfo; OBJECT_SLOT_COUNT],
    pub ephemeris_number: i32,
}

impl De406Header {
    /// Number of data records announced by the header: `floor((end - start) / step)`.
    pub fn record_count(&self) -> usize {
        ((self.end_jd - self.start_jd) / self.days_per_record).floor() as usize
    }

    /// Bytes of one data record: its time span plus every slot's coefficients.
    /// `None` when the layout does not fit in memory.
    pub fn record_bytes(&self) -> Option<usize> {
        self.coeff_info.iter().try_fold(16usize, |total, info| {
            info.triples_per_record()
                .checked_mul(3 * 8)
                .and_then(|slot| total.checked_add(slot))
        })
    }
}

/// Decoded coefficient data, one flat buffer per object slot.
#[derive(Debug, Clone, PartialEq)]
pub struct De406Data {
    pub header: De406Header,
    pub record_count: usize,
    pub object_coeffs: [Vec<f64>; OBJECT_SLOT_COUNT],
}

fn truncated(context: &str) -> impl Fn(nom::Err<nom::error::Error<&[u8]>>) -> CatalogError + '_ {
    move |_| CatalogError::TruncatedEphemeris(context.to_string())
}

fn parse_coeff_info(input: &[u8]) -> IResult<&[u8], CoeffInfo> {
    let (input, (offset, coeff_count, granule_count)) = tuple((be_u32, be_u32, be_u32))(input)?;
    Ok((
        input,
        CoeffInfo {
            // header offsets are 1-based
            offset: offset.saturating_sub(1),
            coeff_count,
            granule_count,
        },
    ))
}

/// Parse the header fields up to and including the ephemeris number.
fn parse_header_fields(input: &[u8]) -> IResult<&[u8], De406Header> {
    let (input, _) = take(LABEL_SIZE * LABEL_COUNT)(input)?;
    let (input, _) = take(CONSTANT_COUNT * CONSTANT_NAME_LENGTH)(input)?;
    let (input, (start_jd, end_jd, days_per_record)) = tuple((be_f64, be_f64, be_f64))(input)?;
    let (input, _constant_count) = be_u32(input)?;
    let (input, (km_per_au, earth_moon_mass_ratio)) = tuple((be_f64, be_f64))(input)?;
    let (input, infos) = count(parse_coeff_info, OBJECT_SLOT_COUNT)(input)?;
    let (input, ephemeris_number) = be_i32(input)?;

    let mut coeff_info = [CoeffInfo::default(); OBJECT_SLOT_COUNT];
    coeff_info.copy_from_slice(&infos);

    Ok((
        input,
        De406Header {
            start_jd,
            end_jd,
            days_per_record,
            km_per_au,
            earth_moon_mass_ratio,
            coeff_info,
            ephemeris_number,
        },
    ))
}

/// Skip the libration layout, the rest of the header record and the constants record.
fn skip_header_tail(input: &[u8]) -> IResult<&[u8], ()> {
    let (input, _libration) = count(be_u32, 3)(input)?;
    let (input, _) = take(DE406_RECORD_SIZE * 8 - HEADER_FIELDS_END)(input)?;
    let (input, _) = take(DE406_RECORD_SIZE * 8)(input)?;
    Ok((input, ()))
}

/// Parse one data record, appending each slot's coefficients to its buffer.
fn parse_record<'a>(
    input: &'a [u8],
    coeff_info: &[CoeffInfo; OBJECT_SLOT_COUNT],
    object_coeffs: &mut [Vec<f64>; OBJECT_SLOT_COUNT],
) -> IResult<&'a [u8], ()> {
    let (mut input, (_record_start, _record_end)) = tuple((be_f64, be_f64))(input)?;

    for (info, coeffs) in coeff_info.iter().zip(object_coeffs.iter_mut()) {
        let triples = info.triples_per_record();
        if triples == 0 {
            continue;
        }
        let (rest, values) = count(be_f64, triples * 3)(input)?;
        coeffs.extend_from_slice(&values);
        input = rest;
    }

    Ok((input, ()))
}

/// Decode a complete DE406 image.
///
/// Arguments
/// -----------------
/// * `input`: the full file contents
///
/// Return
/// ----------
/// * the header and the per-slot coefficient buffers, or
///   - [`CatalogError::UnsupportedEphemeris`] when the ephemeris number is not 406,
///   - [`CatalogError::TruncatedEphemeris`] when any field or record is cut short,
///   - [`CatalogError::InvalidValue`] when the header time span is unusable.
pub fn decode_de406(input: &[u8]) -> Result<De406Data, CatalogError> {
    let (input, header) = parse_header_fields(input).map_err(truncated("header"))?;

    if header.ephemeris_number != DE406_NUMBER {
        return Err(CatalogError::UnsupportedEphemeris(header.ephemeris_number));
    }
    if !(header.days_per_record > 0.0) || !(header.end_jd >= header.start_jd) {
        return Err(CatalogError::InvalidValue(format!(
            "ephemeris span [{}, {}] with {} days per record",
            header.start_jd, header.end_jd, header.days_per_record
        )));
    }

    let (mut input, ()) = skip_header_tail(input).map_err(truncated("header record"))?;

    let record_count = header.record_count();
    let required = header
        .record_bytes()
        .and_then(|bytes| bytes.checked_mul(record_count));
    if required.map_or(true, |bytes| bytes > input.len()) {
        return Err(CatalogError::TruncatedEphemeris(format!(
            "{record_count} data records announced, {} bytes available",
            input.len()
        )));
    }

    let mut object_coeffs: [Vec<f64>; OBJECT_SLOT_COUNT] = Default::default();
    for (slot, coeffs) in object_coeffs.iter_mut().enumerate() {
        coeffs.reserve(record_count * header.coeff_info[slot].triples_per_record() * 3);
    }

    for _ in 0..record_count {
        let (rest, ()) = parse_record(input, &header.coeff_info, &mut object_coeffs)
            .map_err(truncated("data record"))?;
        input = rest;
    }

    Ok(De406Data {
        header,
        record_count,
        object_coeffs,
    })
}
