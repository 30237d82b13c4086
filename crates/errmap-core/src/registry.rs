use axum::response::Response;

use crate::context::ErrorContext;
use crate::matcher::MatchReason;
use crate::recorded::RecordedError;
use crate::rule::ErrorRule;

/// Ordered error mapping table
///
/// Rules are evaluated in insertion order and the first match wins. Built
/// once at startup and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct ErrorMappings {
    rules: Vec<ErrorRule>,
}

impl ErrorMappings {
    /// Create an empty table
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, builder style
    #[must_use]
    pub fn with(mut self, rule: ErrorRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule
    pub fn push(&mut self, rule: ErrorRule) {
        self.rules.push(rule);
    }

    /// Find the first rule matching `error`, in registration order
    pub fn find(&self, error: &RecordedError) -> Option<(&ErrorRule, MatchReason)> {
        self.rules
            .iter()
            .find_map(|rule| rule.matches(error).map(|reason| (rule, reason)))
    }

    /// Build the mapped response for `error`, or `None` when nothing matches
    pub fn respond(&self, context: &ErrorContext, error: &RecordedError) -> Option<Response> {
        self.find(error).map(|(rule, _)| rule.apply(context, error))
    }

    /// Iterate rules in match order
    pub fn iter(&self) -> std::slice::Iter<'_, ErrorRule> {
        self.rules.iter()
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<ErrorRule> for ErrorMappings {
    fn from_iter<I: IntoIterator<Item = ErrorRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<ErrorRule> for ErrorMappings {
    fn extend<I: IntoIterator<Item = ErrorRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ErrorMappings {
    type Item = &'a ErrorRule;
    type IntoIter = std::slice::Iter<'a, ErrorRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, Method, StatusCode, Uri};

    use super::*;
    use crate::error::MappingError;
    use crate::rule::{Strategy, map, map_if, map_kind};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
    enum StoreError {
        #[error("resource could not be found")]
        NotFound,
        #[error("conflict")]
        Conflict,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("lookup failed: {0}")]
    struct Lookup(#[source] StoreError);

    fn status_of(rule: &ErrorRule) -> Option<StatusCode> {
        match rule.strategy() {
            Strategy::Status(status) => Some(*status),
            Strategy::Respond(_) => None,
        }
    }

    #[test]
    fn first_registered_rule_wins() {
        let mappings = ErrorMappings::new()
            .with(map_kind::<StoreError>().to_status_code(StatusCode::BAD_REQUEST))
            .with(map(StoreError::NotFound).to_status_code(StatusCode::NOT_FOUND));

        let (rule, reason) = mappings.find(&StoreError::NotFound.into()).expect("match");
        assert_eq!(status_of(rule), Some(StatusCode::BAD_REQUEST));
        assert_eq!(reason, MatchReason::Kind);
    }

    #[test]
    fn later_rule_matches_when_earlier_does_not() {
        let mappings: ErrorMappings = [
            map(StoreError::Conflict).to_status_code(StatusCode::CONFLICT),
            map(StoreError::NotFound).to_status_code(StatusCode::NOT_FOUND),
        ]
        .into_iter()
        .collect();

        let (rule, reason) = mappings.find(&Lookup(StoreError::NotFound).into()).expect("match");
        assert_eq!(status_of(rule), Some(StatusCode::NOT_FOUND));
        assert_eq!(reason, MatchReason::Wrapped { depth: 1 });
    }

    #[test]
    fn no_match_returns_none() {
        let mut mappings = ErrorMappings::new();
        mappings.push(map(StoreError::Conflict).to_status_code(StatusCode::CONFLICT));
        mappings.extend([map_if(|error| error.is::<Lookup>()).to_status_code(StatusCode::BAD_GATEWAY)]);

        assert_eq!(mappings.len(), 2);
        assert!(mappings.find(&StoreError::NotFound.into()).is_none());

        let context = ErrorContext::new(Method::GET, Uri::from_static("/"), HeaderMap::new());
        assert!(mappings.respond(&context, &StoreError::NotFound.into()).is_none());
        let response = mappings
            .respond(&context, &Lookup(StoreError::NotFound).into())
            .expect("predicate match");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn fallible_rules_collect_into_result() {
        let built: Result<ErrorMappings, MappingError> = [
            map(StoreError::NotFound).try_to_status_code(404),
            map(StoreError::Conflict).try_to_status_code(1000),
        ]
        .into_iter()
        .collect();

        assert_eq!(built.unwrap_err(), MappingError::InvalidStatusCode { code: 1000 });
    }

    #[test]
    fn empty_table_matches_nothing() {
        let mappings = ErrorMappings::default();
        assert!(mappings.is_empty());
        assert_eq!(mappings.iter().count(), 0);
        assert!(mappings.find(&StoreError::Conflict.into()).is_none());
    }
}
