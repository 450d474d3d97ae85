//! Streaming conversion of LyX documents
//!
//!     This crate turns the line-oriented LyX file format into other formats (HTML first of all)
//!     by reconstructing a tree of typed containers from the flat line stream and running two
//!     processing passes over it. It is a pure lib: it powers lyxconv-cli but makes no
//!     assumptions about a shell environment (no printing, no env vars).
//!
//!     The file structure :
//!     .
//!     ├── lines.rs                # Line sources and the line writer
//!     ├── container.rs            # Container kinds and the container tree
//!     ├── config.rs               # Start markers, endings and parameter names per kind
//!     ├── dispatch.rs             # Longest-prefix start marker table
//!     ├── parser.rs               # Lone / bounded / nested-list / attributed / raw parsing
//!     ├── factory.rs              # Creates containers, co-recursing with the parser
//!     ├── process.rs              # Pass 1: local processing
//!     ├── postprocess.rs          # Pass 2: document-order stages
//!     ├── stages                  # Numbering, references, bibliography
//!     ├── state.rs                # Document-wide state shared by both passes
//!     ├── formula.rs              # Formula translation seam
//!     ├── translations.rs         # Localized fixed strings
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats                 # html, raw, treeviz, json
//!     └── convert.rs              # The driver tying it all together
//!
//! Core Algorithms
//!
//!     Dispatch: every line is classified by the longest configured start marker that prefixes
//!     it, compared token by token. Lines that match nothing are text.
//!
//!     Materialization: the factory picks the kind, the kind's parser consumes lines up to the
//!     ending marker and asks the factory for each child. Parsing and creation recurse into
//!     each other, so a container is complete, children first, before local processing runs on
//!     it. Branches are transparent and hand their lines to the parent as separate pieces.
//!
//!     Postprocessing: once the whole document is parsed, stages run over every node in
//!     document order. Each node's stages see the previously finalized node, which is what
//!     lets the bibliography heading appear only once, before the first entry.
//!
//! Formats
//!
//!     Output formats implement the Format trait and render one top-level container at a
//!     time. The HTML format renders the document header as the page opening and the footer
//!     as the page closing, so filtering both yields a bare fragment.
//!
pub mod config;
pub mod container;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod format;
pub mod formats;
pub mod formula;
pub mod lines;
pub mod parser;
pub mod postprocess;
pub mod process;
pub mod registry;
pub mod stages;
pub mod state;
pub mod translations;

pub use config::{ContainerConfig, KindDefinition};
pub use container::{Container, ContainerKind};
pub use convert::{convert, convert_str, ConvertOptions, ConvertReport, Converter, Document};
pub use error::ConvertError;
pub use format::{Format, RenderContext, RenderOptions};
pub use lines::{LineReader, LineSource, LineWriter, StringLines};
pub use registry::FormatRegistry;
pub use state::PipelineState;
