//! deploydash library
//!
//! Browser code editor and deployment dashboard backed by a hosting API.

pub mod app;
pub mod errors;
pub mod http;
pub mod logs;
pub mod server;
pub mod storage;
pub mod url;
pub mod utils;

/// Join URL segments, see [`url::url_join`]
#[macro_export]
macro_rules! url_join {
    ($($segment:expr),+ $(,)?) => {
        $crate::url::url_join([$(::std::convert::AsRef::<str>::as_ref(&$segment)),+])
    };
}
