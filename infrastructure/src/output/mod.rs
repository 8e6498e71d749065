//! Run output: directory layout, atomic writes and run names

mod run_namer;
mod writer;

pub use run_namer::TimestampRunNamer;
pub use writer::FileOutputWriter;
