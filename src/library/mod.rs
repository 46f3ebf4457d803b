//! Germline reference library storage and loading.
//!
//! The library holds the germline segments a resolver serves: for each
//! identifier its base sequence, gene type, and P junctions. Libraries are
//! validated when they are built and are read-only afterwards.
//!
//! ## Sources
//!
//! - **JSON**: a library previously exported with [`GermlineLibrary::to_json`]
//! - **FASTA + annotations**: sequences from a germline FASTA (plain or IMGT
//!   headers) combined with a junction annotation TSV via [`LibraryBuilder`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use germline_resolver::library::builder::{LibraryBuilder, LoaderConfig};
//! use germline_resolver::GermlineLibrary;
//! use std::path::Path;
//!
//! // Load a previously exported library
//! let library = GermlineLibrary::load_from_file(Path::new("human_igh.json")).unwrap();
//!
//! // Or build one from reference files
//! let mut builder = LibraryBuilder::new(LoaderConfig::default());
//! builder.add_fasta(Path::new("IGH.fasta")).unwrap();
//! builder.add_annotations(Path::new("IGH_junctions.tsv")).unwrap();
//! let library = builder.build().unwrap();
//!
//! let json = library.to_json().unwrap();
//! ```
//!
//! [`GermlineLibrary::to_json`]: store::GermlineLibrary::to_json
//! [`LibraryBuilder`]: builder::LibraryBuilder

pub mod builder;
pub mod store;
