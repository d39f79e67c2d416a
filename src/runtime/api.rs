//! Request models that turn raw operator input into validated cell calls.

use serde::{Deserialize, Serialize};

use crate::core::{CellError, CellResult, RoboticCell, StageSpec};
use crate::util::serde::{ProductId, TaskId};

/// Validated ad-hoc task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Task label.
    pub task_type: String,
    /// Robots to bind.
    pub robots: usize,
    /// Workers to bind.
    pub workers: usize,
    /// Duration in seconds.
    pub duration: u32,
}

impl TaskRequest {
    /// Parse the four raw fields of an assignment.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank label, a non-integer or negative count,
    /// or a non-positive duration.
    pub fn parse(task_type: &str, robots: &str, workers: &str, duration: &str) -> CellResult<Self> {
        let task_type = parse_label("task type", task_type)?;
        Ok(Self {
            task_type,
            robots: parse_count("robots", robots)?,
            workers: parse_count("workers", workers)?,
            duration: parse_duration(duration)?,
        })
    }

    /// Allocate and start the task.
    ///
    /// # Errors
    ///
    /// See [`RoboticCell::assign_task`].
    pub fn submit(&self, cell: &RoboticCell) -> CellResult<TaskId> {
        cell.assign_task(&self.task_type, self.robots, self.workers, self.duration)
    }
}

/// Validated product definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRequest {
    /// Product name.
    pub name: String,
    /// Stages in execution order.
    pub stages: Vec<StageSpec>,
}

impl ProductRequest {
    /// Queue the product.
    ///
    /// # Errors
    ///
    /// See [`RoboticCell::define_product`].
    pub fn submit(self, cell: &RoboticCell) -> CellResult<ProductId> {
        cell.define_product(&self.name, self.stages)
    }
}

/// Answer to a removal confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Go ahead.
    Yes,
    /// Keep the resource.
    No,
}

impl Confirmation {
    /// Accept `yes`/`no` in any letter case, ignoring surrounding space.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for anything else.
    pub fn parse(raw: &str) -> CellResult<Self> {
        let answer = raw.trim();
        if answer.eq_ignore_ascii_case("yes") {
            Ok(Self::Yes)
        } else if answer.eq_ignore_ascii_case("no") {
            Ok(Self::No)
        } else {
            Err(CellError::invalid(format!(
                "expected Yes or No, got {answer:?}"
            )))
        }
    }
}

/// Non-blank, trimmed label.
///
/// # Errors
///
/// `InvalidArgument` when blank.
pub fn parse_label(field: &str, raw: &str) -> CellResult<String> {
    let label = raw.trim();
    if label.is_empty() {
        return Err(CellError::invalid(format!("{field} cannot be empty")));
    }
    Ok(label.to_string())
}

/// Non-negative integer count.
///
/// # Errors
///
/// `InvalidArgument` for non-integers and negatives.
pub fn parse_count(field: &str, raw: &str) -> CellResult<usize> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CellError::invalid(format!("number of {field} must be an integer")))?;
    usize::try_from(value)
        .map_err(|_| CellError::invalid(format!("number of {field} cannot be negative")))
}

/// Strictly positive duration in seconds.
///
/// # Errors
///
/// `InvalidArgument` for non-integers and values below one.
pub fn parse_duration(raw: &str) -> CellResult<u32> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CellError::invalid("task duration must be an integer"))?;
    match u32::try_from(value) {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(CellError::invalid("task duration must be a positive integer")),
    }
}

/// Strictly positive number of assembly stages.
///
/// # Errors
///
/// `InvalidArgument` for non-integers and values below one.
pub fn parse_stage_count(raw: &str) -> CellResult<usize> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CellError::invalid("number of assembly steps must be an integer"))?;
    match usize::try_from(value) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CellError::invalid(
            "the number of assembly steps must be greater than zero",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request_parse() {
        let req = TaskRequest::parse(" welding ", "2", " 1", "5 ").unwrap();
        assert_eq!(req.task_type, "welding");
        assert_eq!((req.robots, req.workers, req.duration), (2, 1, 5));
    }

    #[test]
    fn test_task_request_rejections() {
        for (t, r, w, d) in [
            ("", "1", "1", "1"),
            ("weld", "x", "1", "1"),
            ("weld", "-1", "1", "1"),
            ("weld", "1", "1.5", "1"),
            ("weld", "1", "1", "0"),
            ("weld", "1", "1", "-3"),
        ] {
            assert!(
                matches!(TaskRequest::parse(t, r, w, d), Err(CellError::InvalidArgument(_))),
                "{t:?} {r:?} {w:?} {d:?}"
            );
        }
    }

    #[test]
    fn test_confirmation_parse() {
        assert_eq!(Confirmation::parse("Yes").unwrap(), Confirmation::Yes);
        assert_eq!(Confirmation::parse(" yes ").unwrap(), Confirmation::Yes);
        assert_eq!(Confirmation::parse("NO").unwrap(), Confirmation::No);
        assert!(Confirmation::parse("y").is_err());
        assert!(Confirmation::parse("").is_err());
    }

    #[test]
    fn test_parse_stage_count() {
        assert_eq!(parse_stage_count("3").unwrap(), 3);
        assert!(parse_stage_count("0").is_err());
        assert!(parse_stage_count("two").is_err());
    }
}
