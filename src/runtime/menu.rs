//! Numbered text menu over any line-oriented input and output.
//!
//! The menu never holds the cell lock while waiting for a line: each cell
//! call takes and releases the lock on its own.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use crossbeam_channel::Receiver;

use crate::core::{CellError, CellEvent, CellEventKind, RoboticCell, StageSpec, StatusReport};
use crate::runtime::api::{
    parse_count, parse_duration, parse_label, parse_stage_count, Confirmation, ProductRequest,
    TaskRequest,
};
use crate::util::serde::ResourceKind;

const MENU: &str = "\
--- Robotic Cell Manager ---
1. Add Robot
2. Remove Robot
3. Hire a Worker
4. Fire a Worker
5. Assign Task
6. Assign Product
7. Display Status
8. Exit";

/// Interactive driver for a [`RoboticCell`].
pub struct Menu<'a, R, W> {
    cell: &'a RoboticCell,
    input: R,
    output: W,
    notices: Option<Receiver<CellEvent>>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Drive `cell` from `input`, writing prompts and results to `output`.
    pub const fn new(cell: &'a RoboticCell, input: R, output: W) -> Self {
        Self {
            cell,
            input,
            output,
            notices: None,
        }
    }

    /// Print completion notices from this receiver before each menu.
    #[must_use]
    pub fn with_notices(mut self, notices: Receiver<CellEvent>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Run until the operator picks Exit or input ends.
    ///
    /// # Errors
    ///
    /// I/O failures on the underlying streams.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_notices()?;
            writeln!(self.output, "\n{MENU}")?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let result = match choice.trim() {
                "1" => self.add(ResourceKind::Robot),
                "2" => self.remove(ResourceKind::Robot),
                "3" => self.add(ResourceKind::Worker),
                "4" => self.remove(ResourceKind::Worker),
                "5" => self.assign_task(),
                "6" => self.assign_product(),
                "7" => self.display_status(),
                "8" => {
                    writeln!(self.output, "BYE...")?;
                    break;
                }
                other => {
                    tracing::debug!(choice = other, "unknown menu choice");
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Ok(())
                }
            };
            match result {
                Ok(()) => {}
                Err(MenuError::Cell(e)) => writeln!(self.output, "Warning!!: {e}")?,
                Err(MenuError::Io(e)) => return Err(e),
            }
        }
        self.output.flush()
    }

    fn add(&mut self, kind: ResourceKind) -> Result<(), MenuError> {
        let id = self.ask(&format!("Enter {} ID: ", label(kind)))?;
        let id = id.trim();
        self.cell.add_resource(kind, id)?;
        writeln!(self.output, "{} '{id}' has been added.", label(kind))?;
        Ok(())
    }

    fn remove(&mut self, kind: ResourceKind) -> Result<(), MenuError> {
        let id = self.ask(&format!("Enter {} ID you want to remove: ", label(kind)))?;
        let id = id.trim().to_string();
        self.cell.check_removal(kind, &id)?;

        let answer = self.ask(&format!(
            "Are you sure you want to remove '{id}'? (Yes or No) "
        ))?;
        match Confirmation::parse(&answer)? {
            Confirmation::Yes => {
                self.cell.remove_resource(kind, &id)?;
                writeln!(self.output, "{} '{id}' has been removed.", label(kind))?;
            }
            Confirmation::No => writeln!(self.output, "That was a close call.")?,
        }
        Ok(())
    }

    fn assign_task(&mut self) -> Result<(), MenuError> {
        let task_type = self.ask("Enter Task Type (e.g., welding, assembling, testing): ")?;
        let robots = self.ask("Enter Number of Robots Required: ")?;
        let workers = self.ask("Enter Number of Workers Required: ")?;
        let duration = self.ask("Enter Task Duration (seconds): ")?;

        let request = TaskRequest::parse(&task_type, &robots, &workers, &duration)?;
        request.submit(self.cell)?;
        writeln!(
            self.output,
            "Task {} assigned with duration {}.",
            request.task_type, request.duration
        )?;
        Ok(())
    }

    fn assign_product(&mut self) -> Result<(), MenuError> {
        let name = parse_label("product name", &self.ask("Enter product name: ")?)?;
        let count = parse_stage_count(&self.ask("Enter the number of assembly steps: ")?)?;

        let mut stages = Vec::with_capacity(count);
        for n in 1..=count {
            writeln!(self.output, "Stage {n}:")?;
            let task_type = parse_label(
                "task type",
                &self.ask("  Enter task type (e.g., welding, assembling, testing): ")?,
            )?;
            let robots = parse_count("robots", &self.ask("  Enter the number of robots required: ")?)?;
            self.ensure_idle(ResourceKind::Robot, robots)?;
            let workers =
                parse_count("workers", &self.ask("  Enter the number of workers required: ")?)?;
            self.ensure_idle(ResourceKind::Worker, workers)?;
            let duration = parse_duration(&self.ask("  Enter the task duration (seconds): ")?)?;
            stages.push(StageSpec::new(task_type, robots, workers, duration));
        }

        let request = ProductRequest { name, stages };
        let name = request.name.clone();
        request.submit(self.cell)?;
        writeln!(self.output, "Product {name} added to the queue for assembly.")?;
        Ok(())
    }

    fn display_status(&mut self) -> Result<(), MenuError> {
        let report = self.cell.status();
        write!(self.output, "{}", render_status(&report))?;
        Ok(())
    }

    /// Fail fast while the operator is still typing stages.
    fn ensure_idle(&self, kind: ResourceKind, requested: usize) -> Result<(), MenuError> {
        let available = self.cell.idle_count(kind);
        if requested > available {
            return Err(CellError::InsufficientResources {
                kind,
                requested,
                available,
            }
            .into());
        }
        Ok(())
    }

    fn print_notices(&mut self) -> io::Result<()> {
        let Some(rx) = &self.notices else {
            return Ok(());
        };
        let events: Vec<CellEvent> = rx.try_iter().collect();
        for event in events {
            match event.kind {
                CellEventKind::TaskCompleted { task_type, .. } => {
                    writeln!(self.output, "Task {task_type} completed.")?;
                }
                CellEventKind::ProductCompleted { name, .. } => {
                    writeln!(self.output, "Product {name} fully assembled!")?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, MenuError> {
        Ok(self.prompt(prompt)?.unwrap_or_default())
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Human-readable dump of a status report.
#[must_use]
pub fn render_status(report: &StatusReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nRobots:");
    for r in &report.robots {
        let _ = writeln!(out, "  {}: {}", r.id, r.status);
    }
    let _ = writeln!(out, "\nWorkers:");
    for w in &report.workers {
        let _ = writeln!(out, "  {}: {}", w.id, w.status);
    }
    let _ = writeln!(out, "\nTasks:");
    for t in &report.tasks {
        let status = match t.status {
            crate::core::TaskStatus::InProgress => "in progress",
            crate::core::TaskStatus::Completed => "completed",
        };
        let _ = writeln!(
            out,
            "  {}: {status} (Duration left: {})",
            t.task_type, t.remaining
        );
    }
    let _ = writeln!(out, "\nProducts:");
    for p in &report.products {
        let status = match p.status {
            crate::core::ProductStatus::InProgress => "in progress",
            crate::core::ProductStatus::Completed => "completed",
        };
        let _ = writeln!(
            out,
            "  {}: {status} (Current stage: {}/{})",
            p.name, p.current_stage, p.stage_count
        );
    }
    out
}

const fn label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Robot => "Robot",
        ResourceKind::Worker => "Worker",
    }
}

enum MenuError {
    Cell(CellError),
    Io(io::Error),
}

impl From<CellError> for MenuError {
    fn from(e: CellError) -> Self {
        Self::Cell(e)
    }
}

impl From<io::Error> for MenuError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
