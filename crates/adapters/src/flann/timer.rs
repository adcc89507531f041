// Copyright 2025 nnbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Timer extraction from FLANN `allknn -v` output.
//!
//! The executable prints its phase timers somewhere in its verbose log:
//!
//! ```text
//! [INFO ] tree_building: 0.012345s
//! [INFO ] computing_neighbors: 0.678900s
//! ```
//!
//! Depending on the locale the numbers use either a decimal point or a
//! decimal comma. The convention is decided from the `tree_building` token
//! alone and applied to both fields.

use nnbench_benchmarks::{MethodError, TimingResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

static TIMER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)tree_building:(?P<tree_building>.*?)s.*?computing_neighbors:(?P<computing_neighbors>.*?)s",
    )
    .expect("timer pattern is valid")
});

/// Parse the timer data from the captured executable output.
///
/// Logs an error and returns [`MethodError::ParseFailure`] when the output
/// does not contain both timers or a timer is not a non-negative number.
pub fn parse_timer(data: &str) -> Result<TimingResult, MethodError> {
    let Some(caps) = TIMER_PATTERN.captures(data) else {
        error!("Can't parse the data: wrong format");
        return Err(MethodError::ParseFailure {
            reason: "wrong format".to_string(),
        });
    };

    let tree_building = caps["tree_building"].trim();
    let computing_neighbors = caps["computing_neighbors"].trim();

    let decimal_point = tree_building.matches('.').count() == 1;
    let parsed = if decimal_point {
        parse_seconds(tree_building).zip(parse_seconds(computing_neighbors))
    } else {
        parse_seconds(&tree_building.replace(',', "."))
            .zip(parse_seconds(&computing_neighbors.replace(',', ".")))
    };

    match parsed {
        Some((tree_building, computing_neighbors)) => {
            Ok(TimingResult::new(tree_building, computing_neighbors))
        }
        None => {
            error!(
                tree_building,
                computing_neighbors, "Can't parse the data: wrong format"
            );
            Err(MethodError::ParseFailure {
                reason: format!(
                    "invalid timer values tree_building={:?} computing_neighbors={:?}",
                    tree_building, computing_neighbors
                ),
            })
        }
    }
}

fn parse_seconds(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_point() {
        let output = "[INFO ] Loading 'ref.csv' as CSV data.\n\
                      [INFO ] tree_building: 1.5s\n\
                      [INFO ] computing_neighbors: 2.25s\n";
        let timer = parse_timer(output).unwrap();
        assert_eq!(timer.tree_building, 1.5);
        assert_eq!(timer.computing_neighbors, 2.25);
        assert_eq!(timer.total(), 3.75);
    }

    #[test]
    fn test_parse_decimal_comma() {
        let output = "tree_building: 1,5s\ncomputing_neighbors: 2,25s\n";
        let timer = parse_timer(output).unwrap();
        assert_eq!(timer, TimingResult::new(1.5, 2.25));
    }

    #[test]
    fn test_parse_without_space_after_label() {
        let timer = parse_timer("tree_building:0.5s computing_neighbors:0.25s").unwrap();
        assert_eq!(timer, TimingResult::new(0.5, 0.25));
    }

    #[test]
    fn test_integer_tokens_use_comma_branch() {
        // No '.' in the tree_building token, so the comma rule applies.
        let timer = parse_timer("tree_building: 2s\ncomputing_neighbors: 3s").unwrap();
        assert_eq!(timer, TimingResult::new(2.0, 3.0));
    }

    #[test]
    fn test_tree_building_convention_applies_to_both() {
        // Dot in tree_building means the comma in computing_neighbors is not rewritten.
        let result = parse_timer("tree_building: 1.5s\ncomputing_neighbors: 2,25s");
        assert!(matches!(result, Err(MethodError::ParseFailure { .. })));
    }

    #[test]
    fn test_missing_computing_neighbors() {
        let result = parse_timer("tree_building: 1.5s\n");
        assert!(matches!(result, Err(MethodError::ParseFailure { .. })));
    }

    #[test]
    fn test_missing_tree_building() {
        let result = parse_timer("computing_neighbors: 2.25s\n");
        assert!(matches!(result, Err(MethodError::ParseFailure { .. })));
    }

    #[test]
    fn test_labels_out_of_order() {
        let result = parse_timer("computing_neighbors: 2.25s\ntree_building: 1.5s\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = parse_timer("tree_building: fast\ncomputing_neighbors: 1.0s");
        assert_eq!(result.unwrap_err().code(), -1);
    }

    #[test]
    fn test_negative_token_rejected() {
        let result = parse_timer("tree_building: -1.0s\ncomputing_neighbors: 1.0s");
        assert!(result.is_err());
    }
}
