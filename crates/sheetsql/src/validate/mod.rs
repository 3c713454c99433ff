//! Template validation.
//!
//! Each group of rules lives in its own module. Rules never fail; they push
//! [`Violation`]s into a [`RuleContext`]. A sheet is valid when no rule
//! fired.

mod catalog;
mod completeness;
mod structure;

use std::fmt;

use sheetsql_template::{Coord, Template};
use tracing::debug;

use crate::{CatalogView, Result};

pub use catalog::*;
pub use completeness::*;
pub use structure::*;

/// Which family of check a violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The header is malformed.
    Structural,
    /// The header disagrees with the catalog.
    CatalogMismatch,
    /// A data cell needed by a statement is blank.
    DataCompleteness,
}

/// One failed check, located at a cell when it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Stable rule identifier, e.g. `unknown-column`.
    pub code: &'static str,
    pub coord: Option<Coord>,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coord {
            Some(coord) => write!(f, "{coord}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Builder for violations with less boilerplate.
pub struct ViolationBuilder {
    kind: ViolationKind,
    code: &'static str,
    coord: Option<Coord>,
    message: String,
}

impl ViolationBuilder {
    pub fn structural(code: &'static str) -> Self {
        Self::new(ViolationKind::Structural, code)
    }

    pub fn catalog(code: &'static str) -> Self {
        Self::new(ViolationKind::CatalogMismatch, code)
    }

    pub fn completeness(code: &'static str) -> Self {
        Self::new(ViolationKind::DataCompleteness, code)
    }

    fn new(kind: ViolationKind, code: &'static str) -> Self {
        Self {
            kind,
            code,
            coord: None,
            message: String::new(),
        }
    }

    /// Locate the violation. Columns past `AW` stay unlocated; such sheets
    /// are reported by [`lint_sheet_width`].
    pub fn at(mut self, column: usize, row: usize) -> Self {
        self.coord = Coord::new(column, row).ok();
        self
    }

    pub fn msg(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn emit(self, violations: &mut Vec<Violation>) {
        violations.push(Violation {
            kind: self.kind,
            code: self.code,
            coord: self.coord,
            message: self.message,
        });
    }
}

/// Context passed to rules.
pub struct RuleContext<'a> {
    pub template: &'a Template,
    pub violations: &'a mut Vec<Violation>,
}

impl<'a> RuleContext<'a> {
    pub fn new(template: &'a Template, violations: &'a mut Vec<Violation>) -> Self {
        Self {
            template,
            violations,
        }
    }
}

/// The outcome of validating one worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub sheet: String,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.code).collect()
    }
}

/// Check a template on its own: header structure, then data completeness.
pub fn validate_generic(template: &Template) -> ValidationResult {
    let mut violations = Vec::new();
    let mut ctx = RuleContext::new(template, &mut violations);

    check_structure(&mut ctx);
    check_completeness(&mut ctx);

    finish(template, violations)
}

/// Check a template against one database of the catalog.
///
/// Runs the structural rules, then the catalog rules, then completeness.
/// An unknown table stops validation after the structural rules. Errors
/// only when the catalog itself cannot be read.
pub fn validate_with_catalog(
    template: &Template,
    catalog: &CatalogView<'_>,
) -> Result<ValidationResult> {
    let mut violations = Vec::new();
    let mut ctx = RuleContext::new(template, &mut violations);

    check_structure(&mut ctx);

    if !lint_unknown_table(catalog, &mut ctx) {
        return Ok(finish(template, violations));
    }

    let columns = catalog.columns(&template.table)?;
    lint_unknown_columns(&columns, &mut ctx);
    lint_type_mismatches(&columns, &mut ctx);
    lint_include_policy(&columns, &mut ctx);

    check_completeness(&mut ctx);

    Ok(finish(template, violations))
}

fn check_structure(ctx: &mut RuleContext<'_>) {
    lint_table_name(ctx);
    lint_sheet_width(ctx);
    lint_script_kind(ctx);
    lint_flag_cells(ctx);
    lint_flagged_headers(ctx);
}

fn check_completeness(ctx: &mut RuleContext<'_>) {
    lint_missing_values(ctx);
}

fn finish(template: &Template, violations: Vec<Violation>) -> ValidationResult {
    debug!(
        sheet = %template.sheet,
        violations = violations.len(),
        "validated sheet"
    );
    ValidationResult {
        sheet: template.sheet.clone(),
        violations,
    }
}

#[cfg(test)]
mod tests;
