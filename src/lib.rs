//! Batch query engine for sub-trajectory similarity under the continuous
//! Fréchet distance.
//!
//! The dataset is preprocessed into per-trajectory simplification ladders
//! and a spatial hash over start/end points; each query is then answered by
//! a staged pruning pipeline that falls back to a full decision Fréchet
//! computation only when every cheaper stage is inconclusive.

use rayon::ThreadPoolBuildError;

use crate::io::error::IoError;
use crate::util::err::err_macro::impl_err;

pub mod frechet;
pub mod geom;
pub mod index;
pub mod io;
pub mod model;
pub mod query;
pub mod settings;
pub mod simplify;
pub mod util;

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    Pool(ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl_err!(IoError, Io);
impl_err!(ThreadPoolBuildError, Pool);
