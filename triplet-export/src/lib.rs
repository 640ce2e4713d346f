//! Export sinks for a finished run's records.
//!
//! - [`remote`]: the whole collection wrapped as `{"data": [...]}` and POSTed
//!   once, without looking at the response.
//! - [`csv`]: image trials projected onto `item1,item2,item3,response,rt`
//!   and saved as `experiment_data.csv`.
//! - [`task_log`]: practice-free triple rows plus descriptor rows under a
//!   `task` column, for the texture experiment.
//!
//! Both only read the records they are given.

pub mod csv;
pub mod error;
pub mod remote;
pub mod task_log;

pub use csv::{CsvRow, Download, render_csv};
pub use error::ExportError;
pub use remote::{Envelope, RemoteSink, payload};
pub use task_log::{TaskRow, render_task_log};
