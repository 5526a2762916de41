use std::fmt;

/// Conditions raised by the zone designer.
///
/// Every fallible operation in this crate returns `anyhow::Result`; these
/// values are what sits inside the `anyhow::Error` when the failure is one of
/// ours, so callers can `downcast_ref::<DesignError>()` to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignError {
    /// Malformed input rejected at construction time.
    InvalidInput(String),
    /// An operation was called in a state that does not allow it.
    InvalidState(String),
    /// A derived value was read before it was computed.
    NotReady(&'static str),
    /// `generate_genotype` was called on a partition that already has seeds.
    AlreadyInitialized,
    /// `compose_partition` was called on a partition that already has zones.
    AlreadyComposed,
    /// A district was left without a zone after a full decode.
    UnmappedDistrict(String),
    /// Rejection sampling could not find a valid, unique seed point.
    SamplingExhausted { attempts: usize },
}

impl DesignError {
    /// True for errors caused by the caller's data or configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(self, DesignError::InvalidInput(_))
    }
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            DesignError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            DesignError::NotReady(what) => write!(f, "{what} read before it was computed"),
            DesignError::AlreadyInitialized => write!(f, "genotype is already initialized"),
            DesignError::AlreadyComposed => write!(f, "partition is already composed"),
            DesignError::UnmappedDistrict(code) => write!(f, "district '{code}' is not mapped to any zone"),
            DesignError::SamplingExhausted { attempts } => {
                write!(f, "no valid seed point found after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for DesignError {}

/// Shorthand for `bail!(DesignError::InvalidInput(format!(..)))`.
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        ::anyhow::bail!($crate::error::DesignError::InvalidInput(format!($($arg)*)))
    };
}

/// Shorthand for `bail!(DesignError::InvalidState(format!(..)))`.
macro_rules! invalid_state {
    ($($arg:tt)*) => {
        ::anyhow::bail!($crate::error::DesignError::InvalidState(format!($($arg)*)))
    };
}

pub(crate) use invalid_input;
pub(crate) use invalid_state;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        assert_eq!(
            DesignError::InvalidInput("num_zones must be >= 2".into()).to_string(),
            "invalid input: num_zones must be >= 2"
        );
        assert_eq!(DesignError::NotReady("zone cost").to_string(), "zone cost read before it was computed");
        assert_eq!(
            DesignError::UnmappedDistrict("07005".into()).to_string(),
            "district '07005' is not mapped to any zone"
        );
    }

    #[test]
    fn survives_anyhow_round_trip() {
        fn fails() -> anyhow::Result<()> { invalid_input!("population_cardinality {} is odd", 7) }

        let err = fails().unwrap_err();
        let inner = err.downcast_ref::<DesignError>().unwrap();
        assert!(inner.is_input_error());
        assert_eq!(inner, &DesignError::InvalidInput("population_cardinality 7 is odd".into()));
    }
}
