//! Testing utilities.
//!
//! - **Fixtures**: [`sample_flat_personas`], [`flat_personas_json`]
//! - **Workspaces**: [`TempWorkspace`] gives a test its own input/output roots
//!   and matching [`Settings`](crate::Settings)
//! - **Archives**: [`write_zip_fixture`] builds zip inputs, including hostile
//!   entry names
//!
//! # Quick Start
//!
//! ```no_run
//! use persona_forge::testing::*;
//! use persona_forge::{Mode, run};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ws = TempWorkspace::new()?;
//! ws.write_input("people.json", flat_personas_json(&sample_flat_personas()))?;
//!
//! let report = run(Mode::Convert, 0, ws.settings())?;
//! assert!(ws.output_path("people.json.parquet").exists());
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod mock_io;

pub use fixtures::*;
pub use mock_io::*;
