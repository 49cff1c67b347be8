//! Site building for folio.
//!
//! A [`Site`] renders every markdown post of the configured source directory
//! into a complete HTML document. [`Site::render`] keeps the pages in memory
//! for the server; [`Site::build`] writes them to the output directory along
//! with the highlighting stylesheet and any SVG files found next to the posts.
//!
//! ```no_run
//! use folio_config::Config;
//! use folio_site::Site;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None, None)?;
//! let report = Site::from_config(&config).await?.build().await?;
//! println!("{} pages written", report.pages);
//! # Ok(())
//! # }
//! ```

mod error;
mod site;
mod source;

pub use error::BuildError;
pub use site::{BuildReport, BuiltPage, SYNTAX_CSS, Site, diagram_engine};
pub use source::{PostSource, SourceFiles};
