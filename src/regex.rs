//! Pick the regex engine: `regex` by default, `regex_lite` with the `lite` feature.

#[cfg(feature = "lite")]
pub(crate) use regex_lite::Regex;
#[cfg(all(feature = "regex", not(feature = "lite")))]
pub(crate) use regex::Regex;

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("sitebib requires the \"regex\" or \"lite\" feature to be enabled");
