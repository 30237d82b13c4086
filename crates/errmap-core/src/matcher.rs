use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::recorded::RecordedError;

/// Why a rule matched a recorded error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// The recorded error itself equals the target value
    Identity,
    /// The target value was found `depth` links down the `source()` chain
    Wrapped { depth: usize },
    /// The recorded error is of the target kind
    Kind,
    /// A user predicate accepted the recorded error
    Predicate,
}

type ValueEq = dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync;
type PredicateFn = dyn Fn(&RecordedError) -> bool + Send + Sync;

/// What a rule matches against
pub(crate) enum Matcher {
    /// A specific error value, compared through the wrapping chain
    Value { type_name: &'static str, equals: Box<ValueEq> },
    /// Any error whose dynamic type is the target type
    Kind {
        type_name: &'static str,
        is_kind: fn(&(dyn Error + 'static)) -> bool,
    },
    /// Arbitrary user predicate
    Predicate(Box<PredicateFn>),
}

impl Matcher {
    pub(crate) fn value<E>(target: E) -> Self
    where
        E: Error + PartialEq + Send + Sync + 'static,
    {
        Self::Value {
            type_name: type_name::<E>(),
            equals: Box::new(move |error: &(dyn Error + 'static)| {
                downcast_through_pointers::<E>(error).is_some_and(|found| *found == target)
            }),
        }
    }

    pub(crate) fn kind<E>() -> Self
    where
        E: Error + 'static,
    {
        Self::Kind {
            type_name: type_name::<E>(),
            is_kind: is_kind::<E>,
        }
    }

    pub(crate) fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&RecordedError) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Box::new(predicate))
    }

    /// Test the recorded error against this matcher
    ///
    /// Value targets check the error itself first, then each wrapped cause
    /// in chain order. Kind targets only inspect the recorded error itself.
    pub(crate) fn matches(&self, error: &RecordedError) -> Option<MatchReason> {
        match self {
            Self::Value { equals, .. } => error.chain().enumerate().find_map(|(depth, link)| {
                if !equals(link) {
                    return None;
                }
                Some(if depth == 0 {
                    MatchReason::Identity
                } else {
                    MatchReason::Wrapped { depth }
                })
            }),
            Self::Kind { is_kind, .. } => is_kind(error.as_error()).then_some(MatchReason::Kind),
            Self::Predicate(predicate) => predicate(error).then_some(MatchReason::Predicate),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { type_name, .. } => write!(f, "value of {type_name}"),
            Self::Kind { type_name, .. } => write!(f, "kind {type_name}"),
            Self::Predicate(_) => f.write_str("predicate"),
        }
    }
}

/// Downcast to `E`, also looking through `Box<E>` and `Arc<E>`
fn downcast_through_pointers<'a, E>(error: &'a (dyn Error + 'static)) -> Option<&'a E>
where
    E: Error + 'static,
{
    error
        .downcast_ref::<E>()
        .or_else(|| error.downcast_ref::<Box<E>>().map(|boxed| &**boxed))
        .or_else(|| error.downcast_ref::<Arc<E>>().map(|shared| &**shared))
}

fn is_kind<E>(error: &(dyn Error + 'static)) -> bool
where
    E: Error + 'static,
{
    downcast_through_pointers::<E>(error).is_some()
}
