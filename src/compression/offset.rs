use crate::core::error::{Error, Result};

/// Largest offset the split encoding can carry (24 high bits + 16 low bits)
pub const MAX_OFFSET: u64 = (1 << 40) - 1;

/// Postings offset as stored in a node record
///
/// Values up to `i32::MAX` are kept in one integer. Larger values are split
/// into the high 24 bits and the negated low 16 bits; the two halves are
/// always written and read together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedOffset {
    Single(i32),
    Split { high: i32, low: i32 },
}

impl EncodedOffset {
    pub fn encode(offset: u64) -> Result<Self> {
        if offset > MAX_OFFSET {
            return Err(Error::invalid_input(format!(
                "Offset {} exceeds the encodable maximum {}",
                offset, MAX_OFFSET
            )));
        }
        if offset <= i32::MAX as u64 {
            return Ok(EncodedOffset::Single(offset as i32));
        }

        let high = ((offset >> 16) & 0xFF_FFFF) as i32;
        let low = -((offset & 0xFFFF) as i32);
        Ok(EncodedOffset::Split { high, low })
    }

    pub fn decode(&self) -> u64 {
        match *self {
            EncodedOffset::Single(value) => value as u64,
            EncodedOffset::Split { high, low } => {
                ((high as u64) << 16) + ((low.wrapping_neg() as u64) & 0xFFFF)
            }
        }
    }

    /// Number of integers this offset occupies in a compact record
    pub fn width(&self) -> usize {
        match self {
            EncodedOffset::Single(_) => 1,
            EncodedOffset::Split { .. } => 2,
        }
    }

    pub fn write_to(&self, out: &mut Vec<i32>) {
        match *self {
            EncodedOffset::Single(value) => out.push(value),
            EncodedOffset::Split { high, low } => {
                out.push(high);
                out.push(low);
            }
        }
    }

    /// Read one or two integers; the caller knows the width from the record length
    pub fn read_from(ints: &[i32]) -> Result<Self> {
        match *ints {
            [value] if value >= 0 => Ok(EncodedOffset::Single(value)),
            [high, low] if high >= 0 && low <= 0 => Ok(EncodedOffset::Split { high, low }),
            _ => Err(Error::invalid_input(format!(
                "Malformed offset encoding {:?}",
                ints
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_offsets_stay_single() {
        assert_eq!(EncodedOffset::encode(0).unwrap(), EncodedOffset::Single(0));
        assert_eq!(
            EncodedOffset::encode(i32::MAX as u64).unwrap(),
            EncodedOffset::Single(i32::MAX)
        );
    }

    #[test]
    fn large_offsets_split() {
        let offset = (1u64 << 35) + 0x1234;
        let encoded = EncodedOffset::encode(offset).unwrap();
        assert_eq!(encoded, EncodedOffset::Split { high: 1 << 19, low: -0x1234 });
        assert_eq!(encoded.width(), 2);
        assert_eq!(encoded.decode(), offset);
    }

    #[test]
    fn split_with_zero_low_half() {
        let offset = 1u64 << 32;
        let encoded = EncodedOffset::encode(offset).unwrap();
        assert_eq!(encoded, EncodedOffset::Split { high: 1 << 16, low: 0 });
        assert_eq!(encoded.decode(), offset);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(EncodedOffset::encode(MAX_OFFSET + 1).is_err());
        assert_eq!(EncodedOffset::encode(MAX_OFFSET).unwrap().decode(), MAX_OFFSET);
    }

    #[test]
    fn read_back_written_ints() {
        let encoded = EncodedOffset::encode(5_000_000_000).unwrap();
        let mut ints = Vec::new();
        encoded.write_to(&mut ints);
        assert_eq!(EncodedOffset::read_from(&ints).unwrap(), encoded);
    }
}
