//! End-to-end scenario and cross-solver agreement tests: one file per
//! concern, re-exported here as submodules rather than one flat file.

mod scenarios;
