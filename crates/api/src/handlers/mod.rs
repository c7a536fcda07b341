pub mod cases;
pub mod references;
pub mod warranty;
