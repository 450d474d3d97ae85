//! Library half of the lyxconv binary: the inspect transforms, kept here so
//! they can be tested without spawning the binary.

pub mod transforms;
