//! Compact binary encoding of provider records
//!
//! Layout, all integers little-endian, no padding:
//!
//! | field                 | encoding                     |
//! |-----------------------|------------------------------|
//! | provider_name         | u32 length + UTF-8 bytes     |
//! | number_of_jobs        | u32                          |
//! | number_of_jobs_24h    | u32                          |
//! | total_work            | f64                          |
//! | total_work_24h        | f64                          |
//! | total_cost            | f64                          |
//! | total_cost_24h        | f64                          |
//! | total_work_hours      | f64                          |
//! | total_work_hours_24h  | f64                          |
//! | job_id                | u32 length + UTF-8 bytes     |
//! | last_job_date         | f64 Unix time in ms          |
//! | longest_job           | f64                          |
//! | longest_job_24h       | f64                          |
//!
//! The provider id is the storage key and derived fields are recomputed, so
//! neither is encoded.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::entry::{recompute_fields, ProviderDataEntry};

/// Smallest valid record: both strings empty
pub const MIN_ENCODED_LEN: usize = 4 + 2 * 4 + 6 * 8 + 4 + 3 * 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Invalid last job date '{0}'")]
    InvalidDate(String),
    #[error("Field {field} is too long ({len} bytes)")]
    StringTooLong { field: &'static str, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Record is {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },
    #[error("Field {field} needs {needed} bytes at offset {offset}, only {available} left")]
    UnexpectedEof {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Field {field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },
    #[error("Timestamp {0} is not a representable date")]
    InvalidTimestamp(f64),
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn put_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn put_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        let len = u32::try_from(value.len())
            .map_err(|_| EncodeError::StringTooLong { field, len: value.len() })?;
        self.put_u32(len);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, field: &'static str, needed: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.data.len() - self.offset;
        if needed > available {
            return Err(DecodeError::UnexpectedEof {
                field,
                offset: self.offset,
                needed,
                available,
            });
        }
        let bytes = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(bytes)
    }

    fn get_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(field, 4)?);
        Ok(u32::from_le_bytes(raw))
    }

    fn get_f64(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(field, 8)?);
        Ok(f64::from_le_bytes(raw))
    }

    fn get_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.get_u32(field)? as usize;
        let bytes = self.take(field, len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}

fn date_to_millis(date: &str) -> Result<f64, EncodeError> {
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.timestamp_millis() as f64)
        .map_err(|_| EncodeError::InvalidDate(date.to_string()))
}

fn millis_to_date(millis: f64) -> Result<String, DecodeError> {
    if !millis.is_finite() {
        return Err(DecodeError::InvalidTimestamp(millis));
    }
    DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or(DecodeError::InvalidTimestamp(millis))
}

/// Encode a record; the result is exactly as long as the fields written
pub fn serialize_provider(entry: &ProviderDataEntry) -> Result<Vec<u8>, EncodeError> {
    let last_job = date_to_millis(&entry.last_job_date)?;

    let mut w = Writer::with_capacity(
        MIN_ENCODED_LEN + entry.provider_name.len() + entry.job_id.len(),
    );

    w.put_string("provider_name", &entry.provider_name)?;

    w.put_u32(entry.number_of_jobs);
    w.put_u32(entry.number_of_jobs_24h);

    w.put_f64(entry.total_work);
    w.put_f64(entry.total_work_24h);
    w.put_f64(entry.total_cost);
    w.put_f64(entry.total_cost_24h);
    w.put_f64(entry.total_work_hours);
    w.put_f64(entry.total_work_hours_24h);

    w.put_string("job_id", &entry.job_id)?;

    w.put_f64(last_job);

    w.put_f64(entry.longest_job);
    w.put_f64(entry.longest_job_24h);

    Ok(w.finish())
}

/// Decode a record stored under `provider_id`, recomputing derived fields
pub fn deserialize_provider(provider_id: &str, data: &[u8]) -> Result<ProviderDataEntry, DecodeError> {
    if data.len() < MIN_ENCODED_LEN {
        return Err(DecodeError::TooShort {
            len: data.len(),
            min: MIN_ENCODED_LEN,
        });
    }

    let mut r = Reader::new(data);

    let provider_name = r.get_string("provider_name")?;

    let number_of_jobs = r.get_u32("number_of_jobs")?;
    let number_of_jobs_24h = r.get_u32("number_of_jobs_24h")?;

    let total_work = r.get_f64("total_work")?;
    let total_work_24h = r.get_f64("total_work_24h")?;
    let total_cost = r.get_f64("total_cost")?;
    let total_cost_24h = r.get_f64("total_cost_24h")?;
    let total_work_hours = r.get_f64("total_work_hours")?;
    let total_work_hours_24h = r.get_f64("total_work_hours_24h")?;

    let job_id = r.get_string("job_id")?;

    let last_job_date = millis_to_date(r.get_f64("last_job_date")?)?;

    let longest_job = r.get_f64("longest_job")?;
    let longest_job_24h = r.get_f64("longest_job_24h")?;

    Ok(recompute_fields(ProviderDataEntry {
        provider_name,
        provider_id: provider_id.to_string(),
        number_of_jobs,
        number_of_jobs_24h,
        total_work,
        total_work_24h,
        total_cost,
        total_cost_24h,
        total_work_hours,
        total_work_hours_24h,
        job_id,
        last_job_date,
        longest_job,
        longest_job_24h,
        speed: 0.0,
        speed_24h: 0.0,
        efficiency: 0.0,
        efficiency_24h: 0.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProviderDataEntry {
        recompute_fields(ProviderDataEntry {
            provider_name: "Acme 🚀 Vanity".into(),
            provider_id: "0xprovider".into(),
            number_of_jobs: 10,
            number_of_jobs_24h: 2,
            total_work: 100.0,
            total_work_24h: 20.0,
            total_cost: 50.0,
            total_cost_24h: 5.0,
            total_work_hours: 40.0,
            total_work_hours_24h: 8.0,
            job_id: "job-xyz".into(),
            last_job_date: "2025-03-01T12:34:56.789Z".into(),
            longest_job: 12.0,
            longest_job_24h: 4.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_min_len() {
        assert_eq!(MIN_ENCODED_LEN, 88);
        let empty = ProviderDataEntry {
            last_job_date: "1970-01-01T00:00:00.000Z".into(),
            ..Default::default()
        };
        assert_eq!(serialize_provider(&empty).unwrap().len(), MIN_ENCODED_LEN);
    }

    #[test]
    fn test_exact_length_and_layout() {
        let entry = sample();
        let bytes = serialize_provider(&entry).unwrap();
        let name_len = entry.provider_name.len();
        assert_eq!(bytes.len(), MIN_ENCODED_LEN + name_len + entry.job_id.len());

        assert_eq!(&bytes[..4], &(name_len as u32).to_le_bytes());
        assert_eq!(&bytes[4..4 + name_len], entry.provider_name.as_bytes());
        assert_eq!(&bytes[4 + name_len..8 + name_len], &10u32.to_le_bytes());
        assert_eq!(&bytes[12 + name_len..20 + name_len], &100f64.to_le_bytes());
    }

    #[test]
    fn test_roundtrip_non_ascii_name() {
        let entry = sample();
        let bytes = serialize_provider(&entry).unwrap();
        let decoded = deserialize_provider("0xprovider", &bytes).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(decoded.speed, 100.0 / (40.0 * 3600.0));
        assert_eq!(decoded.efficiency, 2.0);
    }

    #[test]
    fn test_sub_millisecond_precision_is_dropped() {
        let mut entry = sample();
        entry.last_job_date = "2025-03-01T14:34:56.789999+02:00".into();
        let bytes = serialize_provider(&entry).unwrap();
        let decoded = deserialize_provider("0xprovider", &bytes).unwrap();
        assert_eq!(decoded.last_job_date, "2025-03-01T12:34:56.789Z");
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = serialize_provider(&sample()).unwrap();
        assert_eq!(
            deserialize_provider("p", &bytes[..MIN_ENCODED_LEN - 1]),
            Err(DecodeError::TooShort {
                len: MIN_ENCODED_LEN - 1,
                min: MIN_ENCODED_LEN
            })
        );
        assert!(matches!(
            deserialize_provider("p", &bytes[..bytes.len() - 1]),
            Err(DecodeError::UnexpectedEof { field: "longest_job_24h", .. })
        ));
    }

    #[test]
    fn test_string_length_past_end() {
        let mut bytes = serialize_provider(&sample()).unwrap();
        bytes[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            deserialize_provider("p", &bytes),
            Err(DecodeError::UnexpectedEof { field: "provider_name", .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = serialize_provider(&sample()).unwrap();
        bytes[4] = 0xff;
        assert_eq!(
            deserialize_provider("p", &bytes),
            Err(DecodeError::InvalidUtf8 { field: "provider_name" })
        );
    }

    #[test]
    fn test_invalid_date() {
        let mut entry = sample();
        entry.last_job_date = "last tuesday".into();
        assert!(matches!(serialize_provider(&entry), Err(EncodeError::InvalidDate(_))));
    }
}
