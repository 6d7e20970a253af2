use std::fmt::{Display, Formatter, Result};

/// Resolution of a timestamp's integer representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Number of units in one second.
    pub const fn per_second(self) -> i64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Millisecond => 1_000,
            TimeUnit::Microsecond => 1_000_000,
            TimeUnit::Nanosecond => 1_000_000_000,
        }
    }

    /// Number of nanoseconds in one unit.
    pub const fn nanos_per_unit(self) -> i64 {
        1_000_000_000 / self.per_second()
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.abbreviation())
    }
}

/// Closed set of logical column types.
///
/// Equality is structural: two timestamps are equal only when both the unit
/// and the timezone string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    LargeUtf8,
    Binary,
    LargeBinary,
    /// Count of `unit` since the epoch, with an optional IANA name or fixed
    /// offset shared by every element.
    Timestamp(TimeUnit, Option<String>),
    /// Days since 1970-01-01.
    Date32,
    /// Microseconds since midnight.
    Time64,
}

impl DataType {
    pub fn timestamp(unit: TimeUnit, timezone: Option<&str>) -> Self {
        DataType::Timestamp(unit, timezone.map(str::to_string))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Timestamp(_, _) | DataType::Date32 | DataType::Time64
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Int8 => "Int8",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::UInt8 => "UInt8",
            DataType::UInt16 => "UInt16",
            DataType::UInt32 => "UInt32",
            DataType::UInt64 => "UInt64",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
            DataType::Utf8 => "Utf8",
            DataType::LargeUtf8 => "LargeUtf8",
            DataType::Binary => "Binary",
            DataType::LargeBinary => "LargeBinary",
            DataType::Timestamp(_, _) => "Timestamp",
            DataType::Date32 => "Date32",
            DataType::Time64 => "Time64",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DataType::Timestamp(unit, Some(tz)) => write!(f, "Timestamp({unit}, {tz})"),
            DataType::Timestamp(unit, None) => write!(f, "Timestamp({unit})"),
            other => f.write_str(other.type_name()),
        }
    }
}
