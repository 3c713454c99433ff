//! Validate spreadsheet templates and turn their rows into SQL scripts.
//!
//! A template sheet names a table and a script kind, declares columns with
//! their SQL types and flags which columns take part in the statement. Every
//! data row below the header becomes one parameterless statement.
//!
//! ```text
//! IOChannels   update
//! Id           Name          Notes
//! int          varchar(50)   varchar(max)
//!              include
//! where
//! 7            Pump
//! ```
//!
//! produces `UPDATE IOChannels SET Name = 'Pump' WHERE Id = 7;`.
//!
//! The pieces:
//!
//! - [`validate_generic`] and [`validate_with_catalog`] check a [`Template`]
//!   and collect [`Violation`]s.
//! - [`generate`] renders one statement per data row into a [`ScriptMap`].
//! - [`Orchestrator`] runs both over a whole workbook and writes the result
//!   to a `.sql` file or back into the workbook.
//! - [`Session`] drives a run interactively through a [`Prompter`].
//!
//! [`Template`]: sheetsql_template::Template

mod catalog;
pub use catalog::*;

mod error;
pub use error::*;

mod generate;
pub use generate::*;

mod orchestrate;
pub use orchestrate::*;

mod prompt;
pub use prompt::*;

mod session;
pub use session::*;

mod store;
pub use store::*;

mod template;
pub use template::*;

mod validate;
pub use validate::*;
