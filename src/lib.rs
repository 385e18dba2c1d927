// Doppel: near-duplicate document detection across mixed-format corpora
//
// This is the library root. Each module corresponds to a stage of the
// similarity pipeline: chunk -> embed -> scan -> cluster -> report.

pub mod chunk;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod embed;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod similarity;
